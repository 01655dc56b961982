// src/core/template_engine.rs
//! Template registry: built-in styles plus templates discovered on disk

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::template_catalog::builtin_templates;
use crate::app_log;
use crate::utils::fill_placeholders;

pub const DEFAULT_TEMPLATE: &str = "modern";
pub const MANIFEST_FILE: &str = "manifest.toml";
pub const SKELETON_FILE: &str = "template.html";

// ===== Style Models =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    Header,
    Left,
    TwoCol,
    Center,
    Timeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    #[default]
    Stripe,
    Boxed,
    Centered,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletStyle {
    #[default]
    Arrow,
    Dot,
    Dash,
    None,
}

impl BulletStyle {
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Arrow => "▸",
            Self::Dot => "•",
            Self::Dash => "-",
            Self::None => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillStyle {
    #[default]
    Inline,
    Pills,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoPosition {
    Left,
    #[default]
    Right,
    Top,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Summary,
    Experience,
    Education,
    Skills,
}

impl Section {
    pub const DEFAULT_ORDER: [Section; 4] = [
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Palette {
    pub fn new(accent: &str, background: &str, text: &str) -> Self {
        Self {
            accent: accent.to_string(),
            background: background.to_string(),
            text: text.to_string(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new("#2563eb", "#ffffff", "#111827")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStyle {
    pub layout: Layout,
    pub header_style: HeaderStyle,
    pub bullet_style: BulletStyle,
    pub skill_style: SkillStyle,
    pub section_order: Vec<Section>,
    pub palette: Palette,
    pub font_family: String,
    pub photo_position: PhotoPosition,
    pub skills_background: bool,
}

impl Default for TemplateStyle {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            header_style: HeaderStyle::default(),
            bullet_style: BulletStyle::default(),
            skill_style: SkillStyle::default(),
            section_order: Section::DEFAULT_ORDER.to_vec(),
            palette: Palette::default(),
            font_family: "Inter, system-ui".to_string(),
            photo_position: PhotoPosition::default(),
            skills_background: false,
        }
    }
}

impl TemplateStyle {
    /// One line describing the look, used as a hint in prompts.
    pub fn describe(&self) -> String {
        format!(
            "{:?} layout, {:?} headers, {:?} skills, font {}",
            self.layout, self.header_style, self.skill_style, self.font_family
        )
        .to_lowercase()
    }
}

// ===== Template Models =====

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub label: String,
    pub description: String,
    pub style: TemplateStyle,
    pub builtin: bool,
    /// HTML skeleton with `{{var}}` placeholders, from `template.html`.
    #[serde(skip)]
    pub skeleton: Option<String>,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl TemplateInfo {
    pub fn builtin(id: &str, label: &str, description: &str, style: TemplateStyle) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            style,
            builtin: true,
            skeleton: None,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateManifest {
    pub name: String,
    pub description: Option<String>,
    /// Built-in template whose style is the starting point.
    pub base: Option<String>,
    pub layout: Option<Layout>,
    pub header_style: Option<HeaderStyle>,
    pub bullet_style: Option<BulletStyle>,
    pub skill_style: Option<SkillStyle>,
    pub section_order: Option<Vec<Section>>,
    pub accent: Option<String>,
    pub background: Option<String>,
    pub text: Option<String>,
    pub font_family: Option<String>,
    pub photo_position: Option<PhotoPosition>,
    pub skills_background: Option<bool>,
}

impl TemplateManifest {
    fn apply_to(&self, style: &mut TemplateStyle) {
        if let Some(layout) = self.layout {
            style.layout = layout;
        }
        if let Some(header_style) = self.header_style {
            style.header_style = header_style;
        }
        if let Some(bullet_style) = self.bullet_style {
            style.bullet_style = bullet_style;
        }
        if let Some(skill_style) = self.skill_style {
            style.skill_style = skill_style;
        }
        if let Some(order) = self.section_order.as_ref().filter(|o| !o.is_empty()) {
            style.section_order = order.clone();
        }
        if let Some(accent) = &self.accent {
            style.palette.accent = accent.clone();
        }
        if let Some(background) = &self.background {
            style.palette.background = background.clone();
        }
        if let Some(text) = &self.text {
            style.palette.text = text.clone();
        }
        if let Some(font) = &self.font_family {
            style.font_family = font.clone();
        }
        if let Some(photo) = self.photo_position {
            style.photo_position = photo;
        }
        if let Some(bg) = self.skills_background {
            style.skills_background = bg;
        }
    }
}

/// Lookup key: case, dashes, underscores and spaces ignored.
fn template_key(id: &str) -> String {
    id.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

// ===== Main Template Engine =====

pub struct TemplateEngine {
    templates_dir: PathBuf,
    templates: Vec<TemplateInfo>,
}

impl TemplateEngine {
    /// Built-in templates plus anything discovered under `templates_dir`.
    pub fn new(templates_dir: PathBuf) -> Result<Self> {
        let mut engine = Self {
            templates_dir,
            templates: builtin_templates(),
        };
        engine.discover_templates()?;
        Ok(engine)
    }

    pub fn builtin_only() -> Self {
        Self {
            templates_dir: PathBuf::new(),
            templates: builtin_templates(),
        }
    }

    fn discover_templates(&mut self) -> Result<()> {
        if !self.templates_dir.exists() {
            app_log!(
                debug,
                "Templates directory does not exist: {}",
                self.templates_dir.display()
            );
            return Ok(());
        }

        let entries = std::fs::read_dir(&self.templates_dir).with_context(|| {
            format!(
                "Failed to read templates directory: {}",
                self.templates_dir.display()
            )
        })?;

        let mut discovered = 0;
        for entry in entries {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(template_id) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match self.load_template_info(template_id, &path) {
                Ok(template) => {
                    app_log!(
                        trace,
                        "Loaded template: {} from {}",
                        template.id,
                        path.display()
                    );
                    self.insert(template);
                    discovered += 1;
                }
                Err(e) => app_log!(warn, "Failed to load template {}: {}", template_id, e),
            }
        }

        app_log!(
            info,
            "Discovered {} templates ({} available)",
            discovered,
            self.templates.len()
        );
        Ok(())
    }

    fn load_template_info(&self, template_id: &str, template_path: &Path) -> Result<TemplateInfo> {
        let manifest_path = template_path.join(MANIFEST_FILE);
        let manifest: TemplateManifest = if manifest_path.exists() {
            let content = std::fs::read_to_string(&manifest_path)
                .with_context(|| format!("Failed to read manifest: {}", manifest_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse manifest: {}", manifest_path.display()))?
        } else {
            TemplateManifest {
                name: template_id.to_string(),
                ..Default::default()
            }
        };

        let skeleton_path = template_path.join(SKELETON_FILE);
        let skeleton = if skeleton_path.exists() {
            Some(
                std::fs::read_to_string(&skeleton_path).with_context(|| {
                    format!("Failed to read skeleton: {}", skeleton_path.display())
                })?,
            )
        } else {
            None
        };

        let base_id = manifest.base.as_deref().unwrap_or(template_id);
        let base = self
            .find(base_id)
            .or_else(|| self.find(DEFAULT_TEMPLATE));
        let mut style = base.map(|t| t.style.clone()).unwrap_or_default();
        manifest.apply_to(&mut style);

        Ok(TemplateInfo {
            id: template_id.to_string(),
            label: manifest.name.clone(),
            description: manifest
                .description
                .clone()
                .or_else(|| base.map(|t| t.description.clone()))
                .unwrap_or_default(),
            style,
            builtin: false,
            skeleton,
            path: Some(template_path.to_path_buf()),
        })
    }

    /// Add a template, replacing any with the same id.
    pub fn insert(&mut self, template: TemplateInfo) {
        let key = template_key(&template.id);
        match self
            .templates
            .iter_mut()
            .find(|t| template_key(&t.id) == key)
        {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    fn find(&self, id: &str) -> Option<&TemplateInfo> {
        let key = template_key(id);
        self.templates.iter().find(|t| template_key(&t.id) == key)
    }

    pub fn list_templates(&self) -> &[TemplateInfo] {
        &self.templates
    }

    pub fn get_template(&self, template_id: &str) -> Option<&TemplateInfo> {
        self.find(template_id)
    }

    /// Canonical id for a requested name, falling back to `modern`.
    pub fn normalize_template(&self, requested: &str) -> String {
        match self.find(requested.trim()) {
            Some(t) => t.id.clone(),
            None => {
                if !requested.trim().is_empty() {
                    app_log!(
                        warn,
                        "Unknown template '{}', using {}",
                        requested,
                        DEFAULT_TEMPLATE
                    );
                }
                DEFAULT_TEMPLATE.to_string()
            }
        }
    }

    /// The template for a requested name, after normalization.
    pub fn resolve(&self, requested: Option<&str>) -> Result<&TemplateInfo> {
        let id = self.normalize_template(requested.unwrap_or(DEFAULT_TEMPLATE));
        self.find(&id).with_context(|| {
            format!(
                "Template '{}' not found. Templates directory: {}",
                id,
                self.templates_dir.display()
            )
        })
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    // ===== Variable Processing =====

    /// Replace `{{var}}` and `${var}` placeholders in one pass, so values that
    /// contain placeholder syntax are inserted as they are.
    pub fn process_variables(content: &str, variables: &HashMap<String, String>) -> String {
        fill_placeholders(content, &[("{{", "}}"), ("${", "}")], |key| {
            variables.get(key).map(String::as_str)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_template() {
        let engine = TemplateEngine::builtin_only();
        assert_eq!(engine.normalize_template("ProfessionalBlue"), "professionalBlue");
        assert_eq!(engine.normalize_template("professional-blue"), "professionalBlue");
        assert_eq!(engine.normalize_template(" CLASSIC "), "classic");
        assert_eq!(engine.normalize_template("does-not-exist"), "modern");
        assert_eq!(engine.normalize_template(""), "modern");
    }

    #[test]
    fn test_resolve_defaults_to_modern() {
        let engine = TemplateEngine::builtin_only();
        assert_eq!(engine.resolve(None).unwrap().id, "modern");
        assert_eq!(engine.resolve(Some("luxuryDark")).unwrap().style.palette.accent, "#fbbf24");
    }

    #[test]
    fn test_process_variables_both_syntaxes() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Ada".to_string());
        vars.insert("title".to_string(), "Engineer".to_string());

        let out = TemplateEngine::process_variables("<h1>{{name}}</h1><h2>${title}</h2>{{other}}", &vars);
        assert_eq!(out, "<h1>Ada</h1><h2>Engineer</h2>{{other}}");
    }

    #[test]
    fn test_process_variables_does_not_expand_values() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Ada {{body}} ${title}".to_string());
        vars.insert("body".to_string(), "<main>".to_string());
        vars.insert("title".to_string(), "Engineer".to_string());

        for _ in 0..5 {
            let out = TemplateEngine::process_variables("{{name}}|{{body}}", &vars);
            assert_eq!(out, "Ada {{body}} ${title}|<main>");
        }
    }

    #[test]
    fn test_discovery_with_manifest_and_skeleton() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("ocean");
        std::fs::create_dir_all(&custom).unwrap();
        std::fs::write(
            custom.join(MANIFEST_FILE),
            r##"
name = "Ocean"
description = "Calm blues"
base = "classic"
accent = "#0369a1"
section_order = ["skills", "experience"]
"##,
        )
        .unwrap();
        std::fs::write(custom.join(SKELETON_FILE), "<main>{{body}}</main>").unwrap();

        let engine = TemplateEngine::new(dir.path().to_path_buf()).unwrap();
        let ocean = engine.get_template("ocean").unwrap();
        assert!(!ocean.builtin);
        assert_eq!(ocean.label, "Ocean");
        assert_eq!(ocean.style.palette.accent, "#0369a1");
        // Everything else comes from the base
        assert_eq!(ocean.style.layout, Layout::Center);
        assert_eq!(ocean.style.section_order, vec![Section::Skills, Section::Experience]);
        assert_eq!(ocean.skeleton.as_deref(), Some("<main>{{body}}</main>"));
    }

    #[test]
    fn test_discovered_template_overrides_builtin() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("modern")).unwrap();

        let engine = TemplateEngine::new(dir.path().to_path_buf()).unwrap();
        let count = engine
            .list_templates()
            .iter()
            .filter(|t| t.id == "modern")
            .count();
        assert_eq!(count, 1);
        let modern = engine.get_template("modern").unwrap();
        assert!(!modern.builtin);
        assert_eq!(modern.style, TemplateEngine::builtin_only().get_template("modern").unwrap().style);
    }

    #[test]
    fn test_missing_directory_is_fine() {
        let engine = TemplateEngine::new(PathBuf::from("/definitely/not/here")).unwrap();
        assert_eq!(engine.list_templates().len(), TemplateEngine::builtin_only().list_templates().len());
    }
}
