// src/ai/enhancer.rs
//! AI operations on a CV: full generation, refine and job tweaks

use std::collections::HashSet;
use thiserror::Error;

use super::prompts::{self, RefineMode};
use crate::app_log;
use crate::core::template_engine::TemplateInfo;
use crate::core::{LlmClient, LlmError};
use crate::render::Tone;
use crate::storage::usage::{CreditError, UsageTracker};
use crate::types::response::{RefineResponse, TweakResponse};
use crate::types::{CvForm, CvRecord, FieldPath, RefineVersion, TweakOutcome, TweakResult};
use crate::validation::{validate_form, ValidationErrors};

pub const MAX_VERSIONS: usize = 3;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Credits(#[from] CreditError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Please enter the text to refine")]
    EmptyText,

    #[error("Please enter refinement instructions")]
    EmptyInstructions,

    #[error("Please paste a job description or URL")]
    EmptyJobDescription,

    #[error("No versions generated. Please check your API key and try again.")]
    NoVersions,
}

impl EnhanceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Credits(e) => e.code(),
            Self::Llm(e) => e.code(),
            Self::EmptyText => "EMPTY_TEXT",
            Self::EmptyInstructions => "EMPTY_INSTRUCTIONS",
            Self::EmptyJobDescription => "EMPTY_JOB_DESCRIPTION",
            Self::NoVersions => "NO_VERSIONS",
        }
    }
}

pub struct Enhancer {
    client: LlmClient,
}

impl Enhancer {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Generate a polished record from the form. The form is validated and a
    /// credit must be available; the credit is only spent once the model
    /// answered with a usable record.
    pub async fn generate(
        &self,
        form: &CvForm,
        template: &TemplateInfo,
        tone: Tone,
        usage: &UsageTracker<'_>,
    ) -> Result<CvRecord, EnhanceError> {
        validate_form(form)?;

        let day = UsageTracker::today();
        let status = usage.status(day).await?;
        if status.remaining == 0 {
            return Err(CreditError::QuotaExceeded {
                per_day: status.per_day,
            }
            .into());
        }

        app_log!(
            info,
            "Generating CV for '{}' with template {} ({} tone)",
            form.full_name.trim(),
            template.id,
            tone
        );

        let prompt = prompts::generate_prompt(form, template, tone);
        let generated: CvRecord = self.client.call_json(&prompt).await?;
        let record = merge_with_form(generated, form);

        let status = usage.consume(day).await?;
        app_log!(
            info,
            "CV generated: {} experience entries, {} skill categories ({} credits left today)",
            record.experience.len(),
            record.skills.len(),
            status.remaining
        );
        Ok(record)
    }

    /// Up to three rewritten versions of `text`.
    pub async fn refine(
        &self,
        text: &str,
        instructions: &str,
        mode: RefineMode,
        job: Option<&str>,
    ) -> Result<Vec<RefineVersion>, EnhanceError> {
        if text.trim().is_empty() {
            return Err(EnhanceError::EmptyText);
        }
        if instructions.trim().is_empty() {
            return Err(EnhanceError::EmptyInstructions);
        }

        let prompt = prompts::refine_prompt(text, instructions, mode, job);
        let response: RefineResponse = self.client.call_json(&prompt).await?;
        let versions = collect_versions(response);

        app_log!(info, "Refine returned {} versions ({:?} mode)", versions.len(), mode);
        if versions.is_empty() {
            return Err(EnhanceError::NoVersions);
        }
        Ok(versions)
    }

    /// Suggested field changes that align the record with a job posting.
    pub async fn tweak(
        &self,
        record: &CvRecord,
        job_description: &str,
    ) -> Result<Vec<TweakResult>, EnhanceError> {
        if job_description.trim().is_empty() {
            return Err(EnhanceError::EmptyJobDescription);
        }

        let prompt = prompts::tweak_prompt(record, job_description);
        let response: TweakResponse = self.client.call_json(&prompt).await?;
        let tweaks = sanitize_tweaks(record, response.tweaks);

        app_log!(info, "Tweak suggested {} field changes", tweaks.len());
        Ok(tweaks)
    }
}

/// Keep the form's contact details and extra sections when the model drops them.
fn merge_with_form(mut record: CvRecord, form: &CvForm) -> CvRecord {
    let local = CvRecord::from_form(form);

    let header = &mut record.header;
    for (slot, fallback) in [
        (&mut header.name, local.header.name),
        (&mut header.title, local.header.title),
        (&mut header.email, local.header.email),
        (&mut header.phone, local.header.phone),
        (&mut header.location, local.header.location),
    ] {
        if slot.trim().is_empty() {
            *slot = fallback;
        }
    }

    if record.summary.trim().is_empty() {
        record.summary = local.summary;
    }
    if record.experience.is_empty() {
        record.experience = local.experience;
    }
    if record.education.is_empty() {
        record.education = local.education;
    }
    if record.skills.is_empty() {
        record.skills = local.skills;
    }
    if record.certifications.is_empty() {
        record.certifications = local.certifications;
    }
    if record.languages.is_empty() {
        record.languages = local.languages;
    }
    if record.projects.is_empty() {
        record.projects = local.projects;
    }
    record
}

fn collect_versions(response: RefineResponse) -> Vec<RefineVersion> {
    response
        .versions
        .into_iter()
        .map(|v| v.into_text().trim().to_string())
        .filter(|text| !text.is_empty())
        .take(MAX_VERSIONS)
        .enumerate()
        .map(|(i, text)| RefineVersion {
            version: i as u32 + 1,
            text,
        })
        .collect()
}

/// Drop tweaks for unknown or missing fields and no-op suggestions. Field
/// names are normalized and `original` is taken from the record itself.
fn sanitize_tweaks(record: &CvRecord, tweaks: Vec<TweakResult>) -> Vec<TweakResult> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for tweak in tweaks {
        let path = match tweak.field.parse::<FieldPath>() {
            Ok(path) if record.has_field(path) => path,
            _ => {
                app_log!(warn, "Dropping tweak for unknown field: {}", tweak.field);
                continue;
            }
        };
        if !seen.insert(path) {
            continue;
        }

        let original = record.field_text(path).unwrap_or_default();
        let tweaked = tweak.tweaked.trim().to_string();
        if tweaked.is_empty() || tweaked == original.trim() {
            continue;
        }

        kept.push(TweakResult {
            field: path.to_string(),
            original,
            tweaked,
        });
    }
    kept
}

/// Substitute the tweaks whose field is in `selected`. Anything else is
/// reported as skipped and leaves the record untouched.
pub fn apply_tweaks(record: &mut CvRecord, tweaks: &[TweakResult], selected: &[String]) -> TweakOutcome {
    let selected: HashSet<FieldPath> = selected
        .iter()
        .filter_map(|field| field.parse().ok())
        .collect();

    let mut applied = 0;
    let mut skipped = Vec::new();

    for tweak in tweaks {
        let path = match tweak.field.parse::<FieldPath>() {
            Ok(path) if selected.contains(&path) => path,
            _ => {
                skipped.push(tweak.field.clone());
                continue;
            }
        };
        match record.set_field_text(path, &tweak.tweaked) {
            Ok(()) => applied += 1,
            Err(e) => {
                app_log!(warn, "Could not apply tweak to {}: {}", tweak.field, e);
                skipped.push(tweak.field.clone());
            }
        }
    }

    TweakOutcome { applied, skipped }
}
