// src/render/customization.rs
//! User overrides on top of a template's style

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::app_log;
use crate::core::template_engine::{Palette, PhotoPosition, TemplateStyle};

pub struct ColorPreset {
    pub name: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

pub const COLOR_PRESETS: &[ColorPreset] = &[
    ColorPreset { name: "Blue", accent: "#3B82F6", background: "#F0F9FF", text: "#1F2937" },
    ColorPreset { name: "Purple", accent: "#A855F7", background: "#FAF5FF", text: "#1F2937" },
    ColorPreset { name: "Rose", accent: "#E11D48", background: "#FFF1F2", text: "#1F2937" },
    ColorPreset { name: "Green", accent: "#10B981", background: "#F0FDF4", text: "#1F2937" },
    ColorPreset { name: "Teal", accent: "#14B8A6", background: "#F0FDFA", text: "#1F2937" },
    ColorPreset { name: "Dark", accent: "#6366F1", background: "#F8F9FA", text: "#111827" },
];

pub struct FontPreset {
    pub name: &'static str,
    pub font: &'static str,
    pub description: &'static str,
}

pub const FONT_PRESETS: &[FontPreset] = &[
    FontPreset { name: "Modern", font: "Arial, sans-serif", description: "Clean & Contemporary" },
    FontPreset { name: "New Roman", font: "'Times New Roman', serif", description: "Classic & Professional" },
    FontPreset { name: "Garamond", font: "'Garamond', serif", description: "Elegant & Traditional" },
    FontPreset { name: "Georgia", font: "'Georgia', serif", description: "Soft & Readable" },
    FontPreset { name: "Courier", font: "'Courier New', monospace", description: "Technical & Precise" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Friendly,
    Bold,
}

impl Tone {
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Formal => "Use a formal, professional tone.",
            Self::Friendly => "Use a warm, friendly but professional tone.",
            Self::Bold => "Use a bold, confident tone with strong action verbs.",
        }
    }
}

impl FromStr for Tone {
    type Err = std::convert::Infallible;

    /// Unknown tones read as formal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "friendly" | "casual" => Self::Friendly,
            "bold" | "confident" => Self::Bold,
            _ => Self::Formal,
        })
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Formal => "formal",
            Self::Friendly => "friendly",
            Self::Bold => "bold",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customization {
    /// Name of a colour preset; explicit colours below win over it.
    pub color_preset: Option<String>,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    /// Name of a font preset, or a CSS font-family list.
    pub font_family: Option<String>,
    pub tone: Tone,
    pub photo_position: Option<PhotoPosition>,
}

impl Customization {
    /// The template style with these overrides applied. Invalid colours and
    /// fonts are ignored.
    pub fn apply(&self, base: &TemplateStyle) -> TemplateStyle {
        let mut style = base.clone();

        if let Some(name) = &self.color_preset {
            match COLOR_PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim())) {
                Some(preset) => {
                    style.palette = Palette::new(preset.accent, preset.background, preset.text)
                }
                None => app_log!(warn, "Unknown colour preset: {}", name),
            }
        }

        override_color(&mut style.palette.accent, self.accent_color.as_deref());
        override_color(&mut style.palette.background, self.background_color.as_deref());
        override_color(&mut style.palette.text, self.text_color.as_deref());

        if let Some(font) = self.font_family.as_deref().and_then(resolve_font) {
            style.font_family = font;
        }
        if let Some(photo) = self.photo_position {
            style.photo_position = photo;
        }
        style
    }
}

fn override_color(slot: &mut String, value: Option<&str>) {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    if is_hex_color(value) {
        *slot = value.to_string();
    } else {
        app_log!(warn, "Ignoring invalid colour: {}", value);
    }
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .map(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

/// A preset name or a plain font-family list; anything that could break out
/// of a CSS declaration is rejected.
pub fn resolve_font(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(preset) = FONT_PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(value)) {
        return Some(preset.font.to_string());
    }
    let safe = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | ',' | '\'' | '-'));
    if safe {
        Some(value.to_string())
    } else {
        app_log!(warn, "Ignoring invalid font family: {}", value);
        None
    }
}
