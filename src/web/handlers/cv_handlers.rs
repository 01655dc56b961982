// src/web/handlers/cv_handlers.rs
//! Local CV operations: validation, building, preview and export
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::Instrument;

use super::helpers::{api_error, busy, internal_error};
use crate::export::ExportJob;
use crate::types::CvRecord;
use crate::validation::validate_form;
use crate::web::types::*;
use crate::{app_log, app_span};

pub async fn validate_form_handler(
    request: Json<StandardRequest<FormRequest>>,
) -> Json<DataResponse<ValidationData>> {
    let conversation_id = request.conversation_id();
    let issues = match validate_form(&request.data.form) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.issues,
    };

    let message = if issues.is_empty() {
        "Form is complete".to_string()
    } else {
        format!("{} fields need attention", issues.len())
    };

    Json(DataResponse::success(
        message,
        ValidationData {
            valid: issues.is_empty(),
            issues,
        },
        conversation_id,
    ))
}

/// Build a record straight from the form, no AI involved.
pub async fn build_record_handler(
    request: Json<StandardRequest<FormRequest>>,
) -> Json<DataResponse<CvRecord>> {
    let conversation_id = request.conversation_id();
    let record = CvRecord::from_form(&request.data.form);
    app_log!(
        info,
        "Built record for '{}' with {} experience entries",
        record.header.name,
        record.experience.len()
    );
    Json(DataResponse::success(
        "CV built from form".to_string(),
        record,
        conversation_id,
    ))
}

pub async fn render_handler(
    request: Json<StandardRequest<RenderRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<RenderData>>> {
    let conversation_id = request.conversation_id();
    let data = &request.data;

    let template = state
        .templates
        .resolve(data.template.as_deref())
        .map_err(|e| internal_error("Template lookup failed", e, conversation_id.clone()))?;

    let job = ExportJob {
        record: &data.record,
        template,
        customization: &data.customization,
        photo: data.photo_url.as_deref(),
    };

    Ok(Json(DataResponse::success(
        format!("Rendered with template {}", template.id),
        RenderData {
            template: template.id.clone(),
            html: job.html(),
        },
        conversation_id,
    )))
}

pub async fn export_handler(
    request: Json<StandardRequest<ExportRequest>>,
    state: &State<AppState>,
) -> ApiResult<FileResponse> {
    let conversation_id = request.conversation_id();
    let data = &request.data;

    let Some(_guard) = state.gates.export.try_begin() else {
        return Err(busy("export", conversation_id));
    };

    let export_span = app_span!("cv_export",
        format = %data.format,
        template = %data.template.as_deref().unwrap_or("modern")
    );

    if data.record.header.name.trim().is_empty() {
        return Err(api_error(
            Status::BadRequest,
            "The CV has no name to export",
            "EMPTY_RECORD",
            &["Generate or build the CV first"],
            conversation_id,
        ));
    }

    let template = state
        .templates
        .resolve(data.template.as_deref())
        .map_err(|e| internal_error("Template lookup failed", e, conversation_id.clone()))?;

    let job = ExportJob {
        record: &data.record,
        template,
        customization: &data.customization,
        photo: data.photo.as_deref(),
    };

    match job.export(data.format).instrument(export_span).await {
        Ok(file) => {
            app_log!(
                info,
                "Export completed, filename: {}, size: {}",
                file.filename,
                file.bytes.len()
            );
            Ok(FileResponse::with_filename(file.bytes, file.content_type, file.filename))
        }
        Err(e) => {
            app_log!(error, "Export failed: {:#}", e);
            Err(api_error(
                Status::InternalServerError,
                format!("Export failed: {}", e),
                "EXPORT_ERROR",
                &[
                    "Check that typst (PDF/PNG) or pandoc (Word) is installed",
                    "Try the HTML or Markdown export",
                ],
                conversation_id,
            ))
        }
    }
}
