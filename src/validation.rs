// src/validation.rs
//! Submit-time checks on the CV form

use serde::Serialize;
use std::fmt;

use crate::types::CvForm;

pub const MIN_SUMMARY_CHARS: usize = 20;
pub const MIN_API_KEY_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    MissingPersonalInfo,
    SummaryTooShort,
    IncompleteExperience,
    IncompleteEducation,
    SkillsRequired,
    InvalidApiKey,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingPersonalInfo => "MISSING_PERSONAL_INFO",
            Self::SummaryTooShort => "SUMMARY_TOO_SHORT",
            Self::IncompleteExperience => "INCOMPLETE_EXPERIENCE",
            Self::IncompleteEducation => "INCOMPLETE_EDUCATION",
            Self::SkillsRequired => "SKILLS_REQUIRED",
            Self::InvalidApiKey => "INVALID_API_KEY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(code: IssueCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All issues found in a form, in form order.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{}", summarize(.issues))]
pub struct ValidationErrors {
    pub issues: Vec<ValidationIssue>,
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Check every required field. Returns all issues rather than stopping at the first.
pub fn validate_form(form: &CvForm) -> Result<(), ValidationErrors> {
    let mut issues = Vec::new();

    let personal = [
        ("full_name", &form.full_name),
        ("email", &form.email),
        ("phone", &form.phone),
        ("location", &form.location),
        ("title", &form.title),
    ];
    for (field, value) in personal {
        if blank(value) {
            issues.push(ValidationIssue::new(
                IssueCode::MissingPersonalInfo,
                field,
                "Please fill in all personal information fields",
            ));
        }
    }

    if form.summary.trim().chars().count() < MIN_SUMMARY_CHARS {
        issues.push(ValidationIssue::new(
            IssueCode::SummaryTooShort,
            "summary",
            format!(
                "Please write a detailed professional summary (minimum {} characters)",
                MIN_SUMMARY_CHARS
            ),
        ));
    }

    if form.experiences.is_empty() {
        issues.push(ValidationIssue::new(
            IssueCode::IncompleteExperience,
            "experiences",
            "Please add at least one work experience",
        ));
    }
    for (i, exp) in form.experiences.iter().enumerate() {
        let required = [
            &exp.company,
            &exp.title,
            &exp.start_date,
            &exp.end_date,
            &exp.description,
        ];
        if required.iter().any(|v| blank(v)) {
            issues.push(ValidationIssue::new(
                IssueCode::IncompleteExperience,
                format!("experiences[{}]", i),
                "Please complete all work experience entries",
            ));
        }
    }

    if form.educations.is_empty() {
        issues.push(ValidationIssue::new(
            IssueCode::IncompleteEducation,
            "educations",
            "Please add at least one education entry",
        ));
    }
    for (i, edu) in form.educations.iter().enumerate() {
        if blank(&edu.school) || blank(&edu.degree) || blank(&edu.graduation_date) {
            issues.push(ValidationIssue::new(
                IssueCode::IncompleteEducation,
                format!("educations[{}]", i),
                "Please complete all education entries (school, degree, graduation date required)",
            ));
        }
    }

    if blank(&form.skills) {
        issues.push(ValidationIssue::new(
            IssueCode::SkillsRequired,
            "skills",
            "Please list your skills",
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { issues })
    }
}

pub fn validate_api_key(key: &str) -> Result<(), ValidationIssue> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationIssue::new(
            IssueCode::InvalidApiKey,
            "api_key",
            "API key cannot be empty",
        ));
    }
    if key.chars().count() < MIN_API_KEY_CHARS {
        return Err(ValidationIssue::new(
            IssueCode::InvalidApiKey,
            "api_key",
            "API key appears to be invalid (too short)",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EducationInput, ExperienceInput};

    fn complete_form() -> CvForm {
        CvForm {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 1234".to_string(),
            location: "London".to_string(),
            title: "Engineer".to_string(),
            summary: "Mathematician and first programmer of the engine".to_string(),
            skills: "Mathematics, Writing".to_string(),
            experiences: vec![ExperienceInput {
                company: "Analytical Co".to_string(),
                title: "Programmer".to_string(),
                start_date: "1842".to_string(),
                end_date: "1843".to_string(),
                description: "Wrote notes".to_string(),
            }],
            educations: vec![EducationInput {
                school: "Home tutoring".to_string(),
                degree: "Mathematics".to_string(),
                graduation_date: "1835".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn codes(form: &CvForm) -> Vec<IssueCode> {
        match validate_form(form) {
            Ok(()) => vec![],
            Err(e) => e.issues.into_iter().map(|i| i.code).collect(),
        }
    }

    #[test]
    fn test_complete_form_passes() {
        assert!(validate_form(&complete_form()).is_ok());
    }

    #[test]
    fn test_blank_personal_fields_reported_individually() {
        let mut form = complete_form();
        form.email = "   ".to_string();
        form.phone.clear();
        let err = validate_form(&form).unwrap_err();
        let fields: Vec<_> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "phone"]);
        assert!(err.issues.iter().all(|i| i.code == IssueCode::MissingPersonalInfo));
    }

    #[test]
    fn test_summary_minimum_length_is_trimmed() {
        let mut form = complete_form();
        form.summary = format!("   {}   ", "x".repeat(19));
        assert_eq!(codes(&form), vec![IssueCode::SummaryTooShort]);

        form.summary = "x".repeat(20);
        assert!(codes(&form).is_empty());
    }

    #[test]
    fn test_experience_requires_every_field() {
        let mut form = complete_form();
        form.experiences.push(ExperienceInput {
            company: "Second".to_string(),
            ..Default::default()
        });
        let err = validate_form(&form).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "experiences[1]");
    }

    #[test]
    fn test_education_field_and_honors_optional() {
        let mut form = complete_form();
        form.educations[0].field.clear();
        form.educations[0].honors.clear();
        assert!(codes(&form).is_empty());

        form.educations[0].graduation_date.clear();
        assert_eq!(codes(&form), vec![IssueCode::IncompleteEducation]);
    }

    #[test]
    fn test_empty_lists_and_skills_collected_together() {
        let mut form = complete_form();
        form.experiences.clear();
        form.educations.clear();
        form.skills = "\n".to_string();
        assert_eq!(
            codes(&form),
            vec![
                IssueCode::IncompleteExperience,
                IssueCode::IncompleteEducation,
                IssueCode::SkillsRequired
            ]
        );
    }

    #[test]
    fn test_error_display_joins_issues() {
        let mut form = complete_form();
        form.skills.clear();
        let err = validate_form(&form).unwrap_err();
        assert_eq!(err.to_string(), "skills: Please list your skills");
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("").is_err());
        assert_eq!(
            validate_api_key("abc").unwrap_err().message,
            "API key appears to be invalid (too short)"
        );
        assert!(validate_api_key("abcdefghijklmnopqrstu").is_ok());
    }
}
