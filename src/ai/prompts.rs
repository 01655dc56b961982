// src/ai/prompts.rs
//! Prompt construction for generate, refine and tweak

use std::fmt::Write;

use crate::core::template_engine::TemplateInfo;
use crate::render::Tone;
use crate::types::{CvForm, CvRecord, FieldPath};
use crate::utils::fill_placeholders;

/// Full-CV generation prompt. Replace: {candidate}, {template_style}, {tone}
const GENERATE_PROMPT_TEMPLATE: &str = r#"You are an expert professional CV writer and designer. Your task is to create a polished, professionally formatted CV that impresses hiring managers.

CANDIDATE DATA:
{candidate}

TEMPLATE STYLE: {template_style}

TONE: {tone}

INSTRUCTIONS:
Your job is to create a professional CV using the data above. Follow these rules:

1. Transform EACH job description into 3-4 compelling bullet points with:
   - Action verbs (Led, Built, Developed, Optimized, Architected, etc.)
   - Quantifiable metrics where possible (increased by X%, served Y users, reduced by Z%)
   - Focus on business impact, not just tasks
   - 15-20 words per bullet maximum

2. Enhance the professional summary to be:
   - Compelling and specific (100-120 words)
   - Highlight the unique value proposition
   - Include 1-2 key achievements or specialties

3. Organize skills into 3-4 logical categories:
   - Examples: Technical, Leadership, Languages, Soft Skills, Tools & Technologies
   - List 3-8 skills per category

4. Format the ENTIRE response as VALID JSON ONLY with this EXACT schema:

{
  "header": {
    "name": "",
    "title": "",
    "email": "",
    "phone": "",
    "location": ""
  },
  "summary": "",
  "experience": [
    {
      "company": "",
      "title": "",
      "dates": "",
      "bullets": ["", "", ""]
    }
  ],
  "education": [
    {
      "school": "",
      "degree": "",
      "field": "",
      "graduation_date": "",
      "gpa": ""
    }
  ],
  "skills": {
    "Category1": ["skill1", "skill2", "skill3"],
    "Category2": ["skill4", "skill5", "skill6"]
  }
}

CRITICAL: Return ONLY valid JSON. Do not include any other text, markdown, code fences, or explanation."#;

/// Shared tail of both refine modes.
const REFINE_OUTPUT_RULES: &str = r#"Produce exactly 3 distinct refined versions. Keep each version factual: do not invent employers, dates, degrees or numbers that are not in the original text.

Return ONLY valid JSON with this EXACT schema (no markdown, no code fences, no explanation):
{"versions":[{"version":1,"text":"..."},{"version":2,"text":"..."},{"version":3,"text":"..."}]}"#;

/// Tweak prompt. Replace: {job}, {fields}, {allowed}
const TWEAK_PROMPT_TEMPLATE: &str = r#"You are an expert CV writer tailoring a CV to a specific job posting.

TARGET JOB DESCRIPTION:
{job}

CURRENT CV FIELDS:
{fields}

INSTRUCTIONS:
- Suggest changes only for fields that would clearly improve the match with the job.
- Reuse the job's keywords where they are truthful for this candidate.
- Never invent experience, employers, dates or metrics.
- Use only these field names: {allowed}
- For "skills", use one line per category formatted as "Category: skill1, skill2".
- For experience bullets, put one bullet per line.

Return ONLY valid JSON with this EXACT schema (no markdown, no code fences, no explanation):
{"tweaks":[{"field":"summary","original":"...","tweaked":"..."}]}"#;

/// What a refine should aim at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefineMode {
    /// Free-form instructions.
    #[default]
    Custom,
    /// Match a target job description.
    Job,
}

impl std::str::FromStr for RefineMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "custom" => Ok(Self::Custom),
            "job" => Ok(Self::Job),
            other => anyhow::bail!("Unknown refine mode: {} (expected custom or job)", other),
        }
    }
}

pub fn generate_prompt(form: &CvForm, template: &TemplateInfo, tone: Tone) -> String {
    let template_style = format!("{} - {}", template.label, template.style.describe());
    let candidate = candidate_block(form);
    fill_placeholders(GENERATE_PROMPT_TEMPLATE, &[("{", "}")], |key| match key {
        "candidate" => Some(candidate.as_str()),
        "template_style" => Some(template_style.as_str()),
        "tone" => Some(tone.instruction()),
        _ => None,
    })
}

fn candidate_block(form: &CvForm) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name: {}", form.full_name.trim());
    let _ = writeln!(out, "Email: {}", form.email.trim());
    let _ = writeln!(out, "Phone: {}", form.phone.trim());
    let _ = writeln!(out, "Location: {}", form.location.trim());
    let _ = writeln!(out, "Professional Title: {}", form.title.trim());

    let _ = writeln!(out, "\nPROFESSIONAL SUMMARY:\n{}", form.summary.trim());

    let experience = form
        .experiences
        .iter()
        .map(|exp| {
            format!(
                "Company: {}\nJob Title: {}\nDuration: {} to {}\nDescription: {}",
                exp.company.trim(),
                exp.title.trim(),
                exp.start_date.trim(),
                if exp.end_date.trim().is_empty() { "Present" } else { exp.end_date.trim() },
                exp.description.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let _ = writeln!(out, "\nWORK EXPERIENCE:\n{}", experience);

    let education = form
        .educations
        .iter()
        .map(|edu| {
            let mut block = format!("School: {}\nDegree: {}", edu.school.trim(), edu.degree.trim());
            push_optional(&mut block, "Field", &edu.field);
            let _ = write!(block, "\nGraduation: {}", edu.graduation_date.trim());
            push_optional(&mut block, "GPA", &edu.gpa);
            push_optional(&mut block, "Honors", &edu.honors);
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let _ = writeln!(out, "\nEDUCATION:\n{}", education);

    let _ = writeln!(out, "\nSKILLS:\n{}", form.skills.trim());

    for (title, text) in [
        ("CERTIFICATIONS", &form.certifications),
        ("LANGUAGES", &form.languages),
        ("PROJECTS", &form.projects),
    ] {
        if !text.trim().is_empty() {
            let _ = writeln!(out, "\n{}:\n{}", title, text.trim());
        }
    }

    out.trim_end().to_string()
}

fn push_optional(block: &mut String, label: &str, value: &str) {
    if !value.trim().is_empty() {
        let _ = write!(block, "\n{}: {}", label, value.trim());
    }
}

pub fn refine_prompt(text: &str, instructions: &str, mode: RefineMode, job: Option<&str>) -> String {
    let mut prompt = String::from("You are an expert CV writer refining one section of a CV.\n\n");
    let _ = writeln!(prompt, "ORIGINAL TEXT:\n{}\n", text.trim());

    match (mode, job.map(str::trim).filter(|j| !j.is_empty())) {
        (RefineMode::Job, Some(job)) => {
            let _ = writeln!(prompt, "TARGET JOB DESCRIPTION:\n{}\n", job);
            let _ = writeln!(
                prompt,
                "Rewrite the original text so it matches the target job: mirror its keywords and \
                 priorities where they are truthful for the candidate."
            );
        }
        _ => {
            let _ = writeln!(prompt, "Rewrite the original text following the instructions below.");
        }
    }

    let _ = writeln!(prompt, "\nINSTRUCTIONS:\n{}\n", instructions.trim());
    prompt.push_str(REFINE_OUTPUT_RULES);
    prompt
}

/// The fields a tweak may touch, in prompt order.
pub fn tweakable_fields(record: &CvRecord) -> Vec<FieldPath> {
    let mut fields = vec![FieldPath::Summary, FieldPath::HeaderTitle];
    for index in 0..record.experience.len() {
        fields.push(FieldPath::ExperienceBullets(index));
    }
    fields.push(FieldPath::Skills);
    fields
}

pub fn tweak_prompt(record: &CvRecord, job: &str) -> String {
    let fields = tweakable_fields(record);
    let mut listing = String::new();
    for path in &fields {
        let text = record.field_text(*path).unwrap_or_default();
        let label = match path {
            FieldPath::ExperienceBullets(i) => record
                .experience
                .get(*i)
                .map(|e| format!("{} ({} at {})", path, e.title, e.company))
                .unwrap_or_else(|| path.to_string()),
            _ => path.to_string(),
        };
        let _ = writeln!(listing, "[{}]\n{}\n", label, text.trim());
    }

    let allowed = fields
        .iter()
        .map(|f| format!("\"{}\"", f))
        .collect::<Vec<_>>()
        .join(", ");

    fill_placeholders(TWEAK_PROMPT_TEMPLATE, &[("{", "}")], |key| match key {
        "job" => Some(job.trim()),
        "fields" => Some(listing.trim_end()),
        "allowed" => Some(allowed.as_str()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::template_engine::TemplateStyle;
    use crate::types::{EducationInput, ExperienceEntry, ExperienceInput};

    fn form() -> CvForm {
        CvForm {
            full_name: "Ada Lovelace".to_string(),
            summary: "Mathematician".to_string(),
            skills: "Rust, Typst".to_string(),
            languages: "English\nFrench".to_string(),
            experiences: vec![ExperienceInput {
                company: "Analytical Co".to_string(),
                title: "Programmer".to_string(),
                start_date: "1842".to_string(),
                end_date: String::new(),
                description: "Wrote the first program".to_string(),
            }],
            educations: vec![EducationInput {
                school: "Home".to_string(),
                degree: "BSc".to_string(),
                gpa: "4.0".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_prompt_carries_candidate_style_and_tone() {
        let template =
            TemplateInfo::builtin("modern", "Modern Minimal", "Clean", TemplateStyle::default());
        let prompt = generate_prompt(&form(), &template, Tone::Bold);

        assert!(prompt.contains("Name: Ada Lovelace"));
        assert!(prompt.contains("Duration: 1842 to Present"));
        assert!(prompt.contains("GPA: 4.0"));
        assert!(!prompt.contains("Honors:"));
        assert!(prompt.contains("LANGUAGES:\nEnglish\nFrench"));
        assert!(!prompt.contains("CERTIFICATIONS:"));
        assert!(prompt.contains("TEMPLATE STYLE: Modern Minimal - "));
        assert!(prompt.contains(Tone::Bold.instruction()));
        assert!(!prompt.contains("{candidate}"));
    }

    #[test]
    fn test_refine_prompt_modes() {
        let custom = refine_prompt("Old text", "Make it shorter", RefineMode::Custom, None);
        assert!(custom.contains("ORIGINAL TEXT:\nOld text"));
        assert!(custom.contains("INSTRUCTIONS:\nMake it shorter"));
        assert!(!custom.contains("TARGET JOB"));
        assert!(custom.contains(r#"{"versions":[{"version":1"#));

        let job = refine_prompt("Old", "Focus", RefineMode::Job, Some("Rust engineer"));
        assert!(job.contains("TARGET JOB DESCRIPTION:\nRust engineer"));
    }

    #[test]
    fn test_tweak_prompt_lists_allowed_fields() {
        let record = CvRecord {
            summary: "Builds things".to_string(),
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                title: "Dev".to_string(),
                bullets: vec!["Shipped".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let prompt = tweak_prompt(&record, "We want Rust");
        assert!(prompt.contains("[experience[0].bullets (Dev at Acme)]\nShipped"));
        assert!(prompt.contains(r#""summary", "header.title", "experience[0].bullets", "skills""#));
        assert!(prompt.contains("TARGET JOB DESCRIPTION:\nWe want Rust"));
    }

    #[test]
    fn test_placeholders_in_user_text_stay_literal() {
        let template = TemplateInfo::builtin("modern", "Modern", "Clean", TemplateStyle::default());
        let mut form = form();
        form.full_name = "Ada {tone}".to_string();
        let prompt = generate_prompt(&form, &template, Tone::Bold);
        assert!(prompt.contains("Name: Ada {tone}"));

        let record = CvRecord {
            summary: "Builds things".to_string(),
            ..Default::default()
        };
        let prompt = tweak_prompt(&record, "Paste {fields} and {allowed} here");
        assert!(prompt.contains("Paste {fields} and {allowed} here"));
        assert_eq!(prompt.matches("[summary]").count(), 1);
    }

    #[test]
    fn test_refine_mode_parse() {
        assert_eq!("JOB".parse::<RefineMode>().unwrap(), RefineMode::Job);
        assert!("other".parse::<RefineMode>().is_err());
    }
}
