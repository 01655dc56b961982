// src/web/handlers/storage_handlers.rs
use rocket::data::{Data, Limits, ToByteUnit};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

use super::helpers::{api_error, internal_error};
use crate::app_log;
use crate::storage::{SavedCv, SavedCvRepository, SavedCvSummary};
use crate::web::types::*;

fn parse_id(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| {
        api_error(
            Status::BadRequest,
            format!("Invalid saved CV id: {}", id),
            "INVALID_ID",
            &[],
            None,
        )
    })
}

fn not_found(id: Uuid) -> ApiError {
    api_error(
        Status::NotFound,
        format!("Saved CV {} not found", id),
        "SAVED_CV_NOT_FOUND",
        &["Refresh the saved CV list"],
        None,
    )
}

async fn load(state: &AppState, id: &str) -> ApiResult<SavedCv> {
    let id = parse_id(id)?;
    SavedCvRepository::new(state.database.pool())
        .get(id)
        .await
        .map_err(|e| internal_error("Failed to load saved CV", e, None))?
        .ok_or_else(|| not_found(id))
}

pub async fn list_saved_handler(
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<SavedCvSummary>>>> {
    let saved = SavedCvRepository::new(state.database.pool())
        .list()
        .await
        .map_err(|e| internal_error("Failed to list saved CVs", e, None))?;

    let summaries: Vec<SavedCvSummary> = saved.iter().map(SavedCvSummary::from).collect();
    Ok(Json(DataResponse::success(
        format!("{} saved CVs", summaries.len()),
        summaries,
        None,
    )))
}

pub async fn save_cv_handler(
    request: Json<StandardRequest<SaveCvRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<SavedCvSummary>>> {
    let conversation_id = request.conversation_id();
    let saved = SavedCvRepository::new(state.database.pool())
        .save(&request.data.name, &request.data.form)
        .await
        .map_err(|e| internal_error("Failed to save CV", e, conversation_id.clone()))?;

    Ok(Json(DataResponse::success(
        format!("Saved as '{}'", saved.name),
        SavedCvSummary::from(&saved),
        conversation_id,
    )))
}

/// Read an exported file under the same size limit as JSON requests.
async fn read_import_body(body: Data<'_>, limits: &Limits) -> ApiResult<String> {
    let limit = limits.get("json").unwrap_or_else(|| 1.mebibytes());
    let body = body
        .open(limit)
        .into_string()
        .await
        .map_err(|e| internal_error("Failed to read import body", e.into(), None))?;

    if !body.is_complete() {
        return Err(api_error(
            Status::PayloadTooLarge,
            format!("Import file is larger than {}", limit),
            "PAYLOAD_TOO_LARGE",
            &["Remove the embedded photo and try again"],
            None,
        ));
    }
    Ok(body.into_inner())
}

pub async fn import_saved_handler(
    body: Data<'_>,
    limits: &Limits,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<SavedCvSummary>>> {
    let body = read_import_body(body, limits).await?;
    let saved = SavedCvRepository::new(state.database.pool())
        .import_json(&body)
        .await
        .map_err(|e| {
            app_log!(warn, "Import rejected: {:#}", e);
            api_error(
                Status::BadRequest,
                format!("{:#}", e),
                "INVALID_IMPORT",
                &["Import a file produced by the saved CV export"],
                None,
            )
        })?;

    Ok(Json(DataResponse::success(
        format!("Imported '{}'", saved.name),
        SavedCvSummary::from(&saved),
        None,
    )))
}

pub async fn get_saved_handler(
    id: &str,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<SavedCv>>> {
    let saved = load(state, id).await?;
    Ok(Json(DataResponse::success(
        format!("Loaded '{}'", saved.name),
        saved,
        None,
    )))
}

pub async fn delete_saved_handler(
    id: &str,
    state: &State<AppState>,
) -> ApiResult<Json<ActionResponse>> {
    let uuid = parse_id(id)?;
    let removed = SavedCvRepository::new(state.database.pool())
        .delete(uuid)
        .await
        .map_err(|e| internal_error("Failed to delete saved CV", e, None))?;

    if !removed {
        return Err(not_found(uuid));
    }
    Ok(Json(ActionResponse::success(
        "Saved CV deleted".to_string(),
        "saved_cv_deleted".to_string(),
        None,
    )))
}

/// The entry as a pretty JSON download.
pub async fn export_saved_handler(id: &str, state: &State<AppState>) -> ApiResult<FileResponse> {
    let saved = load(state, id).await?;
    let json = serde_json::to_vec_pretty(&saved)
        .map_err(|e| internal_error("Failed to serialize saved CV", e.into(), None))?;

    Ok(FileResponse::with_filename(
        json,
        "application/json",
        saved.export_filename(),
    ))
}
