// src/web/handlers/helpers.rs
//! Error mapping and shared lookups for handlers

use rocket::http::Status;

use crate::ai::{EnhanceError, Enhancer};
use crate::app_log;
use crate::core::{LlmClient, LlmError};
use crate::storage::settings::SettingsRepository;
use crate::storage::usage::CreditError;
use crate::web::types::{ApiError, AppState, StandardErrorResponse};

pub fn api_error(
    status: Status,
    error: impl Into<String>,
    error_code: &str,
    suggestions: &[&str],
    conversation_id: Option<String>,
) -> ApiError {
    StandardErrorResponse::new(
        error.into(),
        error_code.to_string(),
        suggestions.iter().map(|s| s.to_string()).collect(),
        conversation_id,
    )
    .with_status(status)
}

pub fn internal_error(
    context: &str,
    error: anyhow::Error,
    conversation_id: Option<String>,
) -> ApiError {
    app_log!(error, "{}: {:#}", context, error);
    api_error(
        Status::InternalServerError,
        format!("{}: {}", context, error),
        "INTERNAL_ERROR",
        &["Try again in a few moments"],
        conversation_id,
    )
}

/// Another operation of the same kind is still running.
pub fn busy(operation: &str, conversation_id: Option<String>) -> ApiError {
    app_log!(warn, "Rejected concurrent {} request", operation);
    api_error(
        Status::Conflict,
        format!("A {} is already in progress", operation),
        "BUSY",
        &["Wait for the current request to finish"],
        conversation_id,
    )
}

pub fn enhance_error(error: EnhanceError, conversation_id: Option<String>) -> ApiError {
    let code = error.code();
    let (status, suggestions): (Status, &[&str]) = match &error {
        EnhanceError::Validation(_) => (Status::BadRequest, &["Fill in the highlighted fields"]),
        EnhanceError::Credits(CreditError::QuotaExceeded { .. }) => (
            Status::TooManyRequests,
            &["Try again tomorrow", "Redeem an affiliation code for more generations"],
        ),
        EnhanceError::Credits(_) => (Status::InternalServerError, &["Try again in a few moments"]),
        EnhanceError::Llm(LlmError::MissingApiKey) => (
            Status::BadRequest,
            &["Save your API key in the settings first"],
        ),
        EnhanceError::Llm(LlmError::Api { status: 400 | 401 | 403, .. }) => (
            Status::BadGateway,
            &["Check that your API key is valid"],
        ),
        EnhanceError::Llm(_) | EnhanceError::NoVersions => (
            Status::BadGateway,
            &["Check your API key and try again", "Try again in a few moments"],
        ),
        EnhanceError::EmptyText
        | EnhanceError::EmptyInstructions
        | EnhanceError::EmptyJobDescription => (Status::BadRequest, &[]),
    };

    app_log!(warn, "AI request failed ({}): {}", code, error);
    api_error(status, error.to_string(), code, suggestions, conversation_id)
}

/// The saved key wins over the one from the environment.
pub async fn resolve_api_key(state: &AppState) -> anyhow::Result<Option<String>> {
    let saved = SettingsRepository::new(state.database.pool()).api_key().await?;
    Ok(saved.or_else(|| state.config.llm.api_key.clone()))
}

pub async fn build_enhancer(
    state: &AppState,
    conversation_id: Option<String>,
) -> Result<Enhancer, ApiError> {
    let api_key = resolve_api_key(state)
        .await
        .map_err(|e| internal_error("Failed to read API key", e, conversation_id.clone()))?
        .unwrap_or_default();

    LlmClient::new(&state.config.llm, &api_key)
        .map(Enhancer::new)
        .map_err(|e| enhance_error(e.into(), conversation_id))
}
