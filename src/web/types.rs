// src/web/types.rs
use rocket::http::{ContentType, Status};
use rocket::response::status::Custom;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};

use crate::ai::RefineMode;
use crate::core::{ConfigManager, Database, OperationGates, TemplateEngine};
use crate::export::ExportFormat;
use crate::render::{Customization, Tone};
use crate::types::{CvForm, CvRecord, RefineVersion, TweakResult};

/// Shared server state handed to every route.
pub struct AppState {
    pub config: ConfigManager,
    pub database: Database,
    pub templates: TemplateEngine,
    pub gates: OperationGates,
}

/// A downloadable file, sent as an attachment under `filename`.
pub struct FileResponse {
    pub data: Vec<u8>,
    pub content_type: ContentType,
    pub filename: String,
}

impl FileResponse {
    pub fn with_filename(data: Vec<u8>, content_type: &str, filename: String) -> Self {
        Self {
            data,
            content_type: ContentType::parse_flexible(content_type).unwrap_or(ContentType::Binary),
            filename,
        }
    }
}

impl<'r> Responder<'r, 'static> for FileResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(self.content_type)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

// ===== Standard Response Types =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

/// Error body plus the HTTP status it is sent with.
pub type ApiError = Custom<Json<StandardErrorResponse>>;

pub type ApiResult<T> = Result<T, ApiError>;

// Request types with conversation_id support
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    pub conversation_id: Option<String>,
}

pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

impl TextResponse {
    pub fn success(message: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
            conversation_id,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
            next_actions: None,
            conversation_id,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }

    pub fn with_status(self, status: Status) -> ApiError {
        Custom(status, Json(self))
    }
}

// ===== Request Payloads =====

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct FormRequest {
    pub form: CvForm,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct GenerateRequest {
    pub form: CvForm,
    pub template: Option<String>,
    #[serde(default)]
    pub tone: Tone,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct RefineRequest {
    pub text: String,
    pub instructions: String,
    #[serde(default)]
    pub mode: RefineMode,
    pub job_description: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct TweakRequest {
    pub record: CvRecord,
    /// Pasted posting text or its URL.
    pub job: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ApplyTweaksRequest {
    pub record: CvRecord,
    pub tweaks: Vec<TweakResult>,
    #[serde(default)]
    pub selected_fields: Vec<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct RenderRequest {
    pub record: CvRecord,
    pub template: Option<String>,
    #[serde(default)]
    pub customization: Customization,
    pub photo_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ExportRequest {
    pub record: CvRecord,
    pub format: ExportFormat,
    pub template: Option<String>,
    #[serde(default)]
    pub customization: Customization,
    pub photo: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SaveCvRequest {
    pub name: String,
    pub form: CvForm,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ApiKeyRequest {
    pub api_key: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SignUpRequest {
    pub email: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct RedeemRequest {
    pub code: String,
}

// ===== Response Payloads =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TemplateSummary {
    pub id: String,
    pub label: String,
    pub description: String,
    pub builtin: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ValidationData {
    pub valid: bool,
    pub issues: Vec<crate::validation::ValidationIssue>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct RefineData {
    pub versions: Vec<RefineVersion>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TweakData {
    pub tweaks: Vec<TweakResult>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AppliedTweaksData {
    pub record: CvRecord,
    pub applied: usize,
    pub skipped: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct RenderData {
    pub template: String,
    pub html: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ApiKeyData {
    pub configured: bool,
    pub masked: Option<String>,
}
