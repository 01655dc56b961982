// src/web/handlers/system_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use super::helpers::{api_error, internal_error, resolve_api_key};
use crate::app_log;
use crate::storage::settings::SettingsRepository;
use crate::storage::usage::{CreditError, CreditStatus, UsageTracker};
use crate::storage::mask_api_key;
use crate::validation::validate_api_key;
use crate::web::types::*;

pub async fn health_handler(state: &State<AppState>) -> ApiResult<Json<TextResponse>> {
    state
        .database
        .health_check()
        .await
        .map_err(|e| internal_error("Database unavailable", e, None))?;
    Ok(Json(TextResponse::success("OK".to_string(), None)))
}

pub async fn get_templates_handler(
    state: &State<AppState>,
) -> Json<DataResponse<Vec<TemplateSummary>>> {
    let templates: Vec<TemplateSummary> = state
        .templates
        .list_templates()
        .iter()
        .map(|t| TemplateSummary {
            id: t.id.clone(),
            label: t.label.clone(),
            description: t.description.clone(),
            builtin: t.builtin,
        })
        .collect();

    Json(DataResponse::success(
        format!("{} templates available", templates.len()),
        templates,
        None,
    ))
}

pub async fn get_api_key_handler(state: &State<AppState>) -> ApiResult<Json<DataResponse<ApiKeyData>>> {
    let key = resolve_api_key(state)
        .await
        .map_err(|e| internal_error("Failed to read API key", e, None))?;

    let data = ApiKeyData {
        configured: key.is_some(),
        masked: key.as_deref().map(mask_api_key),
    };
    let message = if data.configured {
        "API key configured"
    } else {
        "No API key configured"
    };
    Ok(Json(DataResponse::success(message.to_string(), data, None)))
}

pub async fn save_api_key_handler(
    request: Json<StandardRequest<ApiKeyRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<ActionResponse>> {
    let conversation_id = request.conversation_id();
    let key = request.data.api_key.trim();

    if let Err(issue) = validate_api_key(key) {
        return Err(api_error(
            Status::BadRequest,
            issue.message,
            issue.code.as_str(),
            &["Paste the full key from your provider's console"],
            conversation_id,
        ));
    }

    SettingsRepository::new(state.database.pool())
        .save_api_key(key)
        .await
        .map_err(|e| internal_error("Failed to save API key", e, conversation_id.clone()))?;

    app_log!(info, "API key saved ({})", mask_api_key(key));
    Ok(Json(ActionResponse::success(
        "API key saved successfully".to_string(),
        "api_key_saved".to_string(),
        conversation_id,
    )))
}

pub async fn delete_api_key_handler(state: &State<AppState>) -> ApiResult<Json<ActionResponse>> {
    let removed = SettingsRepository::new(state.database.pool())
        .delete_api_key()
        .await
        .map_err(|e| internal_error("Failed to delete API key", e, None))?;

    let message = if removed {
        "API key removed"
    } else {
        "No API key was saved"
    };
    Ok(Json(ActionResponse::success(
        message.to_string(),
        "api_key_deleted".to_string(),
        None,
    )))
}

pub async fn sign_up_handler(
    request: Json<StandardRequest<SignUpRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<ActionResponse>> {
    let conversation_id = request.conversation_id();

    if !request.data.email.contains('@') {
        return Err(api_error(
            Status::BadRequest,
            "Please enter a valid email address",
            "INVALID_EMAIL",
            &[],
            conversation_id,
        ));
    }

    SettingsRepository::new(state.database.pool())
        .sign_up(&request.data.email)
        .await
        .map_err(|e| internal_error("Failed to sign up", e, conversation_id.clone()))?;
    UsageTracker::new(state.database.pool(), state.config.usage.generations_per_day)
        .reset(UsageTracker::today())
        .await
        .map_err(|e| credit_error(e, conversation_id.clone()))?;

    Ok(Json(
        ActionResponse::success(
            "Signed up successfully".to_string(),
            "signed_up".to_string(),
            conversation_id,
        )
        .with_next_actions(vec!["Save your API key".to_string()]),
    ))
}

pub async fn get_credits_handler(
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<CreditStatus>>> {
    let tracker = UsageTracker::new(state.database.pool(), state.config.usage.generations_per_day);
    let status = tracker
        .status(UsageTracker::today())
        .await
        .map_err(|e| credit_error(e, None))?;

    Ok(Json(DataResponse::success(
        format!("{} of {} generations left today", status.remaining, status.per_day),
        status,
        None,
    )))
}

pub async fn redeem_code_handler(
    request: Json<StandardRequest<RedeemRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<CreditStatus>>> {
    let conversation_id = request.conversation_id();
    let tracker = UsageTracker::new(state.database.pool(), state.config.usage.generations_per_day);

    let status = tracker
        .redeem(&request.data.code, UsageTracker::today())
        .await
        .map_err(|e| credit_error(e, conversation_id.clone()))?;

    app_log!(info, "Affiliation code redeemed, {} generations left", status.remaining);
    Ok(Json(DataResponse::success(
        "Code redeemed successfully".to_string(),
        status,
        conversation_id,
    )))
}

fn credit_error(error: CreditError, conversation_id: Option<String>) -> ApiError {
    match error {
        CreditError::Storage(e) => internal_error("Failed to read usage", e, conversation_id),
        other => api_error(
            Status::BadRequest,
            other.to_string(),
            other.code(),
            &[],
            conversation_id,
        ),
    }
}
