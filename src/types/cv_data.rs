// src/types/cv_data.rs
//! CV form input and the structured CV record built from it

use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ===== Form Input =====

/// Raw form state as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub title: String,
    pub photo_url: String,
    pub summary: String,
    pub job_description: String,
    pub skills: String,
    pub certifications: String,
    pub languages: String,
    pub projects: String,
    pub experiences: Vec<ExperienceInput>,
    pub educations: Vec<EducationInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceInput {
    pub company: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationInput {
    pub school: String,
    pub degree: String,
    pub field: String,
    pub graduation_date: String,
    pub gpa: String,
    pub honors: String,
}

// ===== Structured CV Record =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvRecord {
    pub header: Header,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: SkillCategories,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub field: String,
    #[serde(alias = "graduationDate")]
    pub graduation_date: String,
    pub gpa: String,
}

// ===== Skill Categories =====

#[derive(Debug, Clone, PartialEq)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// Ordered mapping of category name to skills. Serialized as a JSON object
/// whose key order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillCategories(Vec<SkillCategory>);

impl SkillCategories {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillCategory> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.skills.as_slice())
    }

    /// Append skills to a category, creating it at the end if missing.
    /// Duplicate skills within a category are ignored.
    pub fn extend(&mut self, name: &str, skills: impl IntoIterator<Item = String>) {
        let idx = match self.0.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.0.push(SkillCategory {
                    name: name.to_string(),
                    skills: Vec::new(),
                });
                self.0.len() - 1
            }
        };
        let category = &mut self.0[idx];
        for skill in skills {
            if !skill.is_empty() && !category.skills.contains(&skill) {
                category.skills.push(skill);
            }
        }
    }

    /// Parse the free-text skills field.
    ///
    /// Each line of the form `Category: a, b` becomes a category. Lines
    /// without a colon are comma/semicolon lists filed under `Skills`.
    pub fn parse(text: &str) -> Self {
        let mut categories = Self::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (name, rest) = match line.split_once(':') {
                Some((name, rest)) if !name.trim().is_empty() => (name.trim(), rest),
                _ => ("Skills", line),
            };
            categories.extend(name, split_list(rest));
        }
        categories
    }

    /// One `Category: a, b` line per category.
    pub fn to_text(&self) -> String {
        self.0
            .iter()
            .map(|c| format!("{}: {}", c.name, c.skills.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn split_list(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Serialize for SkillCategories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for category in &self.0 {
            map.serialize_entry(&category.name, &category.skills)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillList {
    Many(Vec<String>),
    One(String),
}

struct SkillCategoriesVisitor;

impl<'de> Visitor<'de> for SkillCategoriesVisitor {
    type Value = SkillCategories;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of skill category to a list of skills")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut categories = SkillCategories::new();
        while let Some((name, list)) = access.next_entry::<String, SkillList>()? {
            let skills: Vec<String> = match list {
                SkillList::Many(items) => items
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                SkillList::One(text) => split_list(&text).collect(),
            };
            categories.extend(&name, skills);
        }
        Ok(categories)
    }
}

impl<'de> Deserialize<'de> for SkillCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SkillCategoriesVisitor)
    }
}

// ===== Field Addressing =====

/// A text field of a `CvRecord` that AI refine/tweak can substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Summary,
    HeaderTitle,
    Skills,
    ExperienceTitle(usize),
    ExperienceBullets(usize),
}

impl FromStr for FieldPath {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "summary" => return Ok(Self::Summary),
            "header.title" | "title" => return Ok(Self::HeaderTitle),
            "skills" => return Ok(Self::Skills),
            _ => {}
        }

        let rest = s
            .strip_prefix("experience[")
            .ok_or_else(|| anyhow::anyhow!("Unknown CV field: {}", s))?;
        let (index, tail) = rest
            .split_once(']')
            .ok_or_else(|| anyhow::anyhow!("Malformed CV field: {}", s))?;
        let index: usize = index
            .parse()
            .with_context(|| format!("Invalid experience index in field: {}", s))?;

        match tail {
            ".bullets" | "" => Ok(Self::ExperienceBullets(index)),
            ".title" => Ok(Self::ExperienceTitle(index)),
            _ => anyhow::bail!("Unknown CV field: {}", s),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary => f.write_str("summary"),
            Self::HeaderTitle => f.write_str("header.title"),
            Self::Skills => f.write_str("skills"),
            Self::ExperienceTitle(i) => write!(f, "experience[{}].title", i),
            Self::ExperienceBullets(i) => write!(f, "experience[{}].bullets", i),
        }
    }
}

// ===== Record Construction & Mutation =====

impl CvRecord {
    /// Build a record straight from the form, without any AI enhancement.
    pub fn from_form(form: &CvForm) -> Self {
        let experience = form
            .experiences
            .iter()
            .map(|exp| ExperienceEntry {
                company: exp.company.trim().to_string(),
                title: exp.title.trim().to_string(),
                dates: date_range(&exp.start_date, &exp.end_date),
                bullets: split_bullets(&exp.description),
            })
            .collect();

        let education = form
            .educations
            .iter()
            .map(|edu| EducationEntry {
                school: edu.school.trim().to_string(),
                degree: edu.degree.trim().to_string(),
                field: edu.field.trim().to_string(),
                graduation_date: edu.graduation_date.trim().to_string(),
                gpa: edu.gpa.trim().to_string(),
            })
            .collect();

        Self {
            header: Header {
                name: form.full_name.trim().to_string(),
                title: form.title.trim().to_string(),
                email: form.email.trim().to_string(),
                phone: form.phone.trim().to_string(),
                location: form.location.trim().to_string(),
            },
            summary: form.summary.trim().to_string(),
            experience,
            education,
            skills: SkillCategories::parse(&form.skills),
            certifications: split_lines(&form.certifications),
            languages: split_lines(&form.languages),
            projects: split_lines(&form.projects),
        }
    }

    /// Current text of an addressable field.
    pub fn field_text(&self, path: FieldPath) -> Result<String> {
        Ok(match path {
            FieldPath::Summary => self.summary.clone(),
            FieldPath::HeaderTitle => self.header.title.clone(),
            FieldPath::Skills => self.skills.to_text(),
            FieldPath::ExperienceTitle(i) => self.experience_at(i)?.title.clone(),
            FieldPath::ExperienceBullets(i) => self.experience_at(i)?.bullets.join("\n"),
        })
    }

    /// Replace the text of an addressable field.
    pub fn set_field_text(&mut self, path: FieldPath, text: &str) -> Result<()> {
        let text = text.trim();
        match path {
            FieldPath::Summary => self.summary = text.to_string(),
            FieldPath::HeaderTitle => self.header.title = text.to_string(),
            FieldPath::Skills => self.skills = SkillCategories::parse(text),
            FieldPath::ExperienceTitle(i) => self.experience_at_mut(i)?.title = text.to_string(),
            FieldPath::ExperienceBullets(i) => {
                self.experience_at_mut(i)?.bullets = split_bullets(text)
            }
        }
        Ok(())
    }

    /// Whether `path` addresses an existing field of this record.
    pub fn has_field(&self, path: FieldPath) -> bool {
        match path {
            FieldPath::ExperienceTitle(i) | FieldPath::ExperienceBullets(i) => {
                i < self.experience.len()
            }
            _ => true,
        }
    }

    fn experience_at(&self, index: usize) -> Result<&ExperienceEntry> {
        self.experience
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("No experience entry at index {}", index))
    }

    fn experience_at_mut(&mut self, index: usize) -> Result<&mut ExperienceEntry> {
        self.experience
            .get_mut(index)
            .ok_or_else(|| anyhow::anyhow!("No experience entry at index {}", index))
    }
}

fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (start, "") => format!("{} - Present", start),
        ("", end) => end.to_string(),
        (start, end) => format!("{} - {}", start, end),
    }
}

/// Split a description into bullets, one per non-empty line, dropping list markers.
pub fn split_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '*', '•', '▸', '→'])
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
