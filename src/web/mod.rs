// src/web/mod.rs
//! Local HTTP API

pub mod handlers;
pub mod origin;
pub mod types;

pub use origin::{origin_allowed, TrustedOrigin};
pub use types::*;

use anyhow::Result;
use rocket::data::{Data, Limits};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, routes, Build, Request, Response, Rocket, State};

use crate::app_log;
use crate::core::{ConfigManager, Database, OperationGates, TemplateEngine};
use crate::storage::{CreditStatus, SavedCv, SavedCvSummary};
use crate::types::CvRecord;

// CORS Fairing
pub struct Cors {
    allowed_origins: Vec<String>,
}

impl Cors {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Vary", "Origin"));

        let Some(origin) = request.headers().get_one("Origin") else {
            return;
        };
        if !origin_allowed(origin, &self.allowed_origins) {
            return;
        }

        response.set_header(Header::new("Access-Control-Allow-Origin", origin.to_string()));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
        response.set_header(Header::new(
            "Access-Control-Expose-Headers",
            "Content-Disposition",
        ));
    }
}

#[get("/health")]
pub async fn health(
    _origin: TrustedOrigin,
    state: &State<AppState>,
) -> ApiResult<Json<TextResponse>> {
    handlers::health_handler(state).await
}

#[get("/templates")]
pub async fn get_templates(
    _origin: TrustedOrigin,
    state: &State<AppState>,
) -> Json<DataResponse<Vec<TemplateSummary>>> {
    handlers::get_templates_handler(state).await
}

#[post("/validate", data = "<request>")]
pub async fn validate_form(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<FormRequest>>,
) -> Json<DataResponse<ValidationData>> {
    handlers::validate_form_handler(request).await
}

#[post("/generate", data = "<request>")]
pub async fn generate_cv(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<GenerateRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<CvRecord>>> {
    handlers::generate_cv_handler(request, state).await
}

#[post("/build", data = "<request>")]
pub async fn build_record(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<FormRequest>>,
) -> Json<DataResponse<CvRecord>> {
    handlers::build_record_handler(request).await
}

#[post("/refine", data = "<request>")]
pub async fn refine(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<RefineRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<RefineData>>> {
    handlers::refine_handler(request, state).await
}

#[post("/tweak", data = "<request>")]
pub async fn tweak(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<TweakRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<TweakData>>> {
    handlers::tweak_handler(request, state).await
}

#[post("/tweak/apply", data = "<request>")]
pub async fn apply_tweaks(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<ApplyTweaksRequest>>,
) -> Json<DataResponse<AppliedTweaksData>> {
    handlers::apply_tweaks_handler(request).await
}

#[post("/render", data = "<request>")]
pub async fn render(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<RenderRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<RenderData>>> {
    handlers::render_handler(request, state).await
}

#[post("/export", data = "<request>")]
pub async fn export(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<ExportRequest>>,
    state: &State<AppState>,
) -> ApiResult<FileResponse> {
    handlers::export_handler(request, state).await
}

#[get("/saved")]
pub async fn list_saved(
    _origin: TrustedOrigin,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<SavedCvSummary>>>> {
    handlers::list_saved_handler(state).await
}

#[post("/saved", data = "<request>")]
pub async fn save_cv(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<SaveCvRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<SavedCvSummary>>> {
    handlers::save_cv_handler(request, state).await
}

#[post("/saved/import", data = "<body>")]
pub async fn import_saved(
    _origin: TrustedOrigin,
    body: Data<'_>,
    limits: &Limits,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<SavedCvSummary>>> {
    handlers::import_saved_handler(body, limits, state).await
}

#[get("/saved/<id>")]
pub async fn get_saved(
    _origin: TrustedOrigin,
    id: &str,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<SavedCv>>> {
    handlers::get_saved_handler(id, state).await
}

#[delete("/saved/<id>")]
pub async fn delete_saved(
    _origin: TrustedOrigin,
    id: &str,
    state: &State<AppState>,
) -> ApiResult<Json<ActionResponse>> {
    handlers::delete_saved_handler(id, state).await
}

#[get("/saved/<id>/export")]
pub async fn export_saved(
    _origin: TrustedOrigin,
    id: &str,
    state: &State<AppState>,
) -> ApiResult<FileResponse> {
    handlers::export_saved_handler(id, state).await
}

#[get("/settings/api-key")]
pub async fn get_api_key(
    _origin: TrustedOrigin,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<ApiKeyData>>> {
    handlers::get_api_key_handler(state).await
}

#[post("/settings/api-key", data = "<request>")]
pub async fn save_api_key(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<ApiKeyRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<ActionResponse>> {
    handlers::save_api_key_handler(request, state).await
}

#[delete("/settings/api-key")]
pub async fn delete_api_key(
    _origin: TrustedOrigin,
    state: &State<AppState>,
) -> ApiResult<Json<ActionResponse>> {
    handlers::delete_api_key_handler(state).await
}

#[post("/settings/signup", data = "<request>")]
pub async fn sign_up(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<SignUpRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<ActionResponse>> {
    handlers::sign_up_handler(request, state).await
}

#[get("/credits")]
pub async fn get_credits(
    _origin: TrustedOrigin,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<CreditStatus>>> {
    handlers::get_credits_handler(state).await
}

#[post("/credits/redeem", data = "<request>")]
pub async fn redeem_code(
    _origin: TrustedOrigin,
    request: Json<StandardRequest<RedeemRequest>>,
    state: &State<AppState>,
) -> ApiResult<Json<DataResponse<CreditStatus>>> {
    handlers::redeem_code_handler(request, state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(403)]
pub fn forbidden(request: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Requests from this origin are not allowed".to_string(),
        "ORIGIN_NOT_ALLOWED".to_string(),
        vec![format!(
            "Add {} to server.allowed_origins in config.yaml",
            request.headers().get_one("Origin").unwrap_or("the origin")
        )],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found(request: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("No route for {}", request.uri()),
        "NOT_FOUND".to_string(),
        vec![],
        None,
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body is too large".to_string(),
        "PAYLOAD_TOO_LARGE".to_string(),
        vec!["Remove the embedded photo and try again".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected shape".to_string(),
        "UNPROCESSABLE".to_string(),
        vec!["Verify field names and types".to_string()],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
        None,
    ))
}

/// Mount every route under `/api` on top of `rocket`.
pub fn mount(rocket: Rocket<Build>, state: AppState) -> Rocket<Build> {
    let cors = Cors::new(state.config.server.allowed_origins.clone());

    rocket
        .attach(cors)
        .manage(state)
        .register(
            "/api",
            catchers![
                bad_request,
                forbidden,
                not_found,
                payload_too_large,
                unprocessable,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![
                health,
                get_templates,
                validate_form,
                generate_cv,
                build_record,
                refine,
                tweak,
                apply_tweaks,
                render,
                export,
                list_saved,
                save_cv,
                import_saved,
                get_saved,
                delete_saved,
                export_saved,
                get_api_key,
                save_api_key,
                delete_api_key,
                sign_up,
                get_credits,
                redeem_code,
                options,
            ],
        )
}

pub async fn start_web_server(config: ConfigManager, port: u16) -> Result<()> {
    config.ensure_directories().await?;

    let database = Database::new(&config.environment.database_path).await?;
    let templates = TemplateEngine::new(config.environment.templates_path.clone())?;

    app_log!(info, "Starting cvcraft API server on 127.0.0.1:{}", port);
    app_log!(info, "Database: {}", config.environment.database_path.display());
    app_log!(
        info,
        "{} templates loaded from {}",
        templates.list_templates().len(),
        templates.templates_dir().display()
    );

    let state = AppState {
        config,
        database,
        templates,
        gates: OperationGates::default(),
    };

    let figment = rocket::Config::figment()
        .merge(("address", "127.0.0.1"))
        .merge(("port", port));

    mount(rocket::custom(figment), state)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use serde_json::{json, Value};

    async fn test_state(gates: OperationGates) -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ConfigManager::load_from(&dir.path().join("config.yaml"), dir.path()).unwrap();
        config.llm.api_key = None;

        AppState {
            config,
            database: Database::in_memory().await.unwrap(),
            templates: TemplateEngine::builtin_only(),
            gates,
        }
    }

    async fn client() -> Client {
        client_with_gates(OperationGates::default()).await
    }

    async fn client_with_gates(gates: OperationGates) -> Client {
        let rocket = mount(rocket::build(), test_state(gates).await);
        Client::tracked(rocket).await.unwrap()
    }

    async fn client_with_json_limit(limit: rocket::data::ByteUnit) -> Client {
        let figment = rocket::Config::figment().merge(("limits", Limits::new().limit("json", limit)));
        let rocket = mount(rocket::custom(figment), test_state(OperationGates::default()).await);
        Client::tracked(rocket).await.unwrap()
    }

    async fn post_json(client: &Client, uri: &str, body: Value) -> (Status, Value) {
        let response = client
            .post(uri.to_string())
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        let status = response.status();
        let body = response.into_json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn get_json(client: &Client, uri: &str) -> (Status, Value) {
        let response = client.get(uri.to_string()).dispatch().await;
        let status = response.status();
        let body = response.into_json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    fn form() -> Value {
        json!({
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "123",
            "location": "London",
            "title": "Engineer",
            "summary": "Mathematician and first programmer of the engine.",
            "skills": "Rust, Typst",
            "experiences": [{
                "company": "Analytical Co",
                "title": "Programmer",
                "start_date": "1842",
                "end_date": "1843",
                "description": "Wrote notes\nFound bugs"
            }],
            "educations": [{
                "school": "Home",
                "degree": "Mathematics",
                "graduation_date": "1835"
            }]
        })
    }

    #[rocket::async_test]
    async fn test_health_and_templates() {
        let client = client().await;

        let (status, body) = get_json(&client, "/api/health").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["message"], "OK");

        let (status, body) = get_json(&client, "/api/templates").await;
        assert_eq!(status, Status::Ok);
        let templates = body["data"].as_array().unwrap();
        assert!(templates.iter().any(|t| t["id"] == "modern"));
        assert_eq!(templates.len(), 82);
    }

    #[rocket::async_test]
    async fn test_validate_reports_all_issues() {
        let client = client().await;

        let (status, body) = post_json(&client, "/api/validate", json!({ "form": {} })).await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"]["valid"], false);
        assert!(body["data"]["issues"].as_array().unwrap().len() >= 5);

        let (_, body) = post_json(
            &client,
            "/api/validate",
            json!({ "form": form(), "conversation_id": "c-1" }),
        )
        .await;
        assert_eq!(body["data"]["valid"], true);
        assert_eq!(body["conversation_id"], "c-1");
    }

    #[rocket::async_test]
    async fn test_build_render_and_export() {
        let client = client().await;

        let (status, body) = post_json(&client, "/api/build", json!({ "form": form() })).await;
        assert_eq!(status, Status::Ok);
        let record = body["data"].clone();
        assert_eq!(record["header"]["name"], "Ada Lovelace");
        assert_eq!(record["experience"][0]["dates"], "1842 - 1843");

        let (status, body) = post_json(
            &client,
            "/api/render",
            json!({ "record": record, "template": "Classic", "customization": { "color_preset": "Rose" } }),
        )
        .await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"]["template"], "classic");
        assert!(body["data"]["html"].as_str().unwrap().contains("Ada Lovelace"));

        let response = client
            .post("/api/export")
            .header(ContentType::JSON)
            .body(json!({ "record": record, "format": "markdown" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Content-Disposition"),
            Some("attachment; filename=\"Ada_Lovelace_CV.md\"")
        );
        let text = response.into_string().await.unwrap();
        assert!(text.starts_with("# Ada Lovelace"));
    }

    #[rocket::async_test]
    async fn test_saved_cv_lifecycle() {
        let client = client().await;

        let (status, body) =
            post_json(&client, "/api/saved", json!({ "name": "Backend", "form": form() })).await;
        assert_eq!(status, Status::Ok);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (_, body) = get_json(&client, "/api/saved").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = get_json(&client, &format!("/api/saved/{}", id)).await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"]["form"]["full_name"], "Ada Lovelace");

        let response = client.get(format!("/api/saved/{}/export", id)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let disposition = response.headers().get_one("Content-Disposition").unwrap().to_string();
        assert!(disposition.contains("cv-data-Backend-"));
        let exported = response.into_string().await.unwrap();

        let response = client.delete(format!("/api/saved/{}", id)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let (status, body) = get_json(&client, &format!("/api/saved/{}", id)).await;
        assert_eq!(status, Status::NotFound);
        assert_eq!(body["error_code"], "SAVED_CV_NOT_FOUND");

        let response = client.post("/api/saved/import").body(exported).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let (status, _) = get_json(&client, &format!("/api/saved/{}", id)).await;
        assert_eq!(status, Status::Ok);

        let (status, _) = get_json(&client, "/api/saved/not-a-uuid").await;
        assert_eq!(status, Status::BadRequest);
    }

    #[rocket::async_test]
    async fn test_api_key_settings() {
        let client = client().await;

        let (_, body) = get_json(&client, "/api/settings/api-key").await;
        assert_eq!(body["data"]["configured"], false);

        let (status, body) =
            post_json(&client, "/api/settings/api-key", json!({ "api_key": "short" })).await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error_code"], "INVALID_API_KEY");

        let key = "AIzaSyTestKey0123456789abcd";
        let (status, _) = post_json(&client, "/api/settings/api-key", json!({ "api_key": key })).await;
        assert_eq!(status, Status::Ok);

        let (_, body) = get_json(&client, "/api/settings/api-key").await;
        assert_eq!(body["data"]["configured"], true);
        let masked = body["data"]["masked"].as_str().unwrap();
        assert!(masked.starts_with("AIza") && masked.ends_with("abcd"));
        assert!(!masked.contains("TestKey"));

        let response = client.delete("/api/settings/api-key").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let (_, body) = get_json(&client, "/api/settings/api-key").await;
        assert_eq!(body["data"]["configured"], false);
    }

    #[rocket::async_test]
    async fn test_credits_and_codes() {
        let client = client().await;

        let (status, body) = get_json(&client, "/api/credits").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"]["remaining"], body["data"]["per_day"]);

        let (status, body) =
            post_json(&client, "/api/credits/redeem", json!({ "code": "BOGUS" })).await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error_code"], "INVALID_CODE");

        let (status, _) =
            post_json(&client, "/api/credits/redeem", json!({ "code": "welcome2025" })).await;
        assert_eq!(status, Status::Ok);
        let (_, body) =
            post_json(&client, "/api/credits/redeem", json!({ "code": "WELCOME2025" })).await;
        assert_eq!(body["error_code"], "CODE_ALREADY_USED");
    }

    #[rocket::async_test]
    async fn test_ai_routes_need_key_and_gate() {
        let gates = OperationGates::default();
        let client = client_with_gates(gates.clone()).await;

        let (status, body) = post_json(
            &client,
            "/api/refine",
            json!({ "text": "Old", "instructions": "Shorter" }),
        )
        .await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error_code"], "API_KEY_MISSING");

        let _running = gates.refine.try_begin().unwrap();
        let (status, body) = post_json(
            &client,
            "/api/refine",
            json!({ "text": "Old", "instructions": "Shorter" }),
        )
        .await;
        assert_eq!(status, Status::Conflict);
        assert_eq!(body["error_code"], "BUSY");

        // other kinds are not blocked
        let (status, _) = post_json(&client, "/api/generate", json!({ "form": form() })).await;
        assert_eq!(status, Status::BadRequest);
    }

    #[rocket::async_test]
    async fn test_apply_selected_tweaks() {
        let client = client().await;
        let (_, body) = post_json(&client, "/api/build", json!({ "form": form() })).await;
        let record = body["data"].clone();

        let (status, body) = post_json(
            &client,
            "/api/tweak/apply",
            json!({
                "record": record,
                "tweaks": [
                    { "field": "summary", "original": "", "tweaked": "Rust-minded mathematician." },
                    { "field": "skills", "original": "", "tweaked": "Technical: Go" }
                ],
                "selected_fields": ["summary"]
            }),
        )
        .await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"]["applied"], 1);
        assert_eq!(body["data"]["record"]["summary"], "Rust-minded mathematician.");
        assert_eq!(body["data"]["skipped"][0], "skills");
    }

    #[rocket::async_test]
    async fn test_catchers_use_standard_errors() {
        let client = client().await;

        let response = client
            .post("/api/validate")
            .header(ContentType::JSON)
            .body("{ not json")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["type"], "error");

        let (status, body) = get_json(&client, "/api/nope").await;
        assert_eq!(status, Status::NotFound);
        assert_eq!(body["error_code"], "NOT_FOUND");
    }

    #[rocket::async_test]
    async fn test_foreign_origin_is_refused_and_not_echoed() {
        let client = client().await;

        let response = client
            .get("/api/health")
            .header(Header::new("Origin", "https://evil.example"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Forbidden);
        assert!(response.headers().get_one("Access-Control-Allow-Origin").is_none());
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "ORIGIN_NOT_ALLOWED");

        // a text/plain POST skips the browser preflight
        let response = client
            .post("/api/settings/api-key")
            .header(ContentType::Plain)
            .header(Header::new("Origin", "https://evil.example"))
            .body(json!({ "api_key": "AIzaSyTestKey0123456789abcd" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Forbidden);
        let (_, body) = get_json(&client, "/api/settings/api-key").await;
        assert_eq!(body["data"]["configured"], false);

        let response = client
            .options("/api/credits/redeem")
            .header(Header::new("Origin", "https://evil.example"))
            .dispatch()
            .await;
        assert!(response.headers().get_one("Access-Control-Allow-Origin").is_none());
    }

    #[rocket::async_test]
    async fn test_local_origin_is_echoed() {
        let client = client().await;

        let response = client
            .get("/api/health")
            .header(Header::new("Origin", "http://localhost:5173"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("http://localhost:5173")
        );
        assert_eq!(response.headers().get_one("Vary"), Some("Origin"));

        let (status, _) = get_json(&client, "/api/health").await;
        assert_eq!(status, Status::Ok);
    }

    #[rocket::async_test]
    async fn test_import_accepts_exports_larger_than_string_limit() {
        let client = client().await;

        let mut large = form();
        large["summary"] = Value::String("x".repeat(9000));
        let (status, body) =
            post_json(&client, "/api/saved", json!({ "name": "Long", "form": large })).await;
        assert_eq!(status, Status::Ok);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let response = client.get(format!("/api/saved/{}/export", id)).dispatch().await;
        let exported = response.into_string().await.unwrap();
        assert!(exported.len() > 9000);
        client.delete(format!("/api/saved/{}", id)).dispatch().await;

        let response = client.post("/api/saved/import").body(exported).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let (_, body) = get_json(&client, &format!("/api/saved/{}", id)).await;
        assert_eq!(body["data"]["form"]["summary"].as_str().unwrap().len(), 9000);
    }

    #[rocket::async_test]
    async fn test_import_over_json_limit_is_413() {
        use rocket::data::ToByteUnit;

        let client = client_with_json_limit(2.kibibytes()).await;
        let body = json!({ "padding": "x".repeat(4096) }).to_string();

        let response = client.post("/api/saved/import").body(body).dispatch().await;
        assert_eq!(response.status(), Status::PayloadTooLarge);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "PAYLOAD_TOO_LARGE");
    }

    #[rocket::async_test]
    async fn test_sign_up_starts_the_day_fresh() {
        use crate::storage::UsageTracker;

        let client = client().await;
        let state = client.rocket().state::<AppState>().unwrap();
        let tracker = UsageTracker::new(state.database.pool(), state.config.usage.generations_per_day);
        tracker.consume(UsageTracker::today()).await.unwrap();

        let (_, body) = get_json(&client, "/api/credits").await;
        assert_eq!(body["data"]["used"], 1);

        let (status, _) =
            post_json(&client, "/api/settings/signup", json!({ "email": "ada@example.com" })).await;
        assert_eq!(status, Status::Ok);

        let (_, body) = get_json(&client, "/api/credits").await;
        assert_eq!(body["data"]["used"], 0);
        assert_eq!(body["data"]["remaining"], body["data"]["per_day"]);
    }
}
