// src/web/handlers/ai_handlers.rs
//! Generate, refine and tweak through the hosted model
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::Instrument;

use super::helpers::{api_error, build_enhancer, busy, enhance_error, internal_error};
use crate::ai::apply_tweaks;
use crate::job_source::JobSource;
use crate::storage::usage::UsageTracker;
use crate::types::CvRecord;
use crate::web::types::*;
use crate::{app_log, app_span};

pub async fn generate_cv_handler(
    request: Json<StandardRequest<GenerateRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<CvRecord>>> {
    let conversation_id = request.conversation_id();
    let data = &request.data;

    let Some(_guard) = state.gates.generate.try_begin() else {
        return Err(busy("generation", conversation_id));
    };

    let template_id = state
        .templates
        .normalize_template(data.template.as_deref().unwrap_or_default());
    let span = app_span!("cv_generation", template = %template_id, tone = %data.tone);

    let template = state.templates.get_template(&template_id).ok_or_else(|| {
        api_error(
            Status::InternalServerError,
            format!("Template '{}' is not available", template_id),
            "TEMPLATE_NOT_FOUND",
            &[],
            conversation_id.clone(),
        )
    })?;

    let enhancer = build_enhancer(state, conversation_id.clone()).await?;
    let usage = UsageTracker::new(state.database.pool(), state.config.usage.generations_per_day);

    let record = enhancer
        .generate(&data.form, template, data.tone, &usage)
        .instrument(span)
        .await
        .map_err(|e| enhance_error(e, conversation_id.clone()))?;

    Ok(Json(DataResponse::success(
        "CV generated successfully".to_string(),
        record,
        conversation_id,
    )))
}

pub async fn refine_handler(
    request: Json<StandardRequest<RefineRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<RefineData>>> {
    let conversation_id = request.conversation_id();
    let data = &request.data;

    let Some(_guard) = state.gates.refine.try_begin() else {
        return Err(busy("refinement", conversation_id));
    };

    let enhancer = build_enhancer(state, conversation_id.clone()).await?;
    let versions = enhancer
        .refine(
            &data.text,
            &data.instructions,
            data.mode,
            data.job_description.as_deref(),
        )
        .instrument(app_span!("cv_refine", mode = ?data.mode))
        .await
        .map_err(|e| enhance_error(e, conversation_id.clone()))?;

    Ok(Json(DataResponse::success(
        format!("{} versions generated", versions.len()),
        RefineData { versions },
        conversation_id,
    )))
}

pub async fn tweak_handler(
    request: Json<StandardRequest<TweakRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<TweakData>>> {
    let conversation_id = request.conversation_id();
    let data = &request.data;

    let Some(_guard) = state.gates.tweak.try_begin() else {
        return Err(busy("job tweak", conversation_id));
    };

    let source = JobSource::new(state.config.llm.timeout_seconds).map_err(|e| {
        internal_error("HTTP client unavailable", e, conversation_id.clone())
    })?;
    let job = source.resolve(&data.job).await.map_err(|e| {
        app_log!(warn, "Job description unavailable: {:#}", e);
        api_error(
            Status::BadRequest,
            format!("Could not read the job description: {}", e),
            "JOB_SOURCE_ERROR",
            &[
                "Paste the job description text instead of the link",
                "Check that the URL is publicly reachable",
            ],
            conversation_id.clone(),
        )
    })?;

    let enhancer = build_enhancer(state, conversation_id.clone()).await?;
    let tweaks = enhancer
        .tweak(&data.record, &job)
        .instrument(app_span!("cv_tweak"))
        .await
        .map_err(|e| enhance_error(e, conversation_id.clone()))?;

    let message = if tweaks.is_empty() {
        "Your CV already matches this job well".to_string()
    } else {
        format!("{} suggested changes", tweaks.len())
    };
    Ok(Json(DataResponse::success(
        message,
        TweakData { tweaks },
        conversation_id,
    )))
}

pub async fn apply_tweaks_handler(
    request: Json<StandardRequest<ApplyTweaksRequest>>,
) -> Json<DataResponse<AppliedTweaksData>> {
    let conversation_id = request.conversation_id();
    let StandardRequest { data, .. } = request.into_inner();

    let mut record = data.record;
    let outcome = apply_tweaks(&mut record, &data.tweaks, &data.selected_fields);
    app_log!(
        info,
        "Applied {} tweaks, skipped {}",
        outcome.applied,
        outcome.skipped.len()
    );

    Json(DataResponse::success(
        format!("Applied {} changes", outcome.applied),
        AppliedTweaksData {
            record,
            applied: outcome.applied,
            skipped: outcome.skipped,
        },
        conversation_id,
    ))
}
