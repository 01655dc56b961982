// src/web/origin.rs
//! Browser origin checks for the local API

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

use crate::app_log;
use crate::web::types::AppState;

/// Whether a browser `Origin` header value is in `allowed`. An entry without
/// a port matches that scheme and host on any port.
pub fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    let origin = origin.trim().trim_end_matches('/').to_ascii_lowercase();

    allowed.iter().any(|entry| {
        let entry = entry.trim().trim_end_matches('/').to_ascii_lowercase();
        if entry == "*" || entry == origin {
            return true;
        }
        match origin.strip_prefix(&entry).and_then(|rest| rest.strip_prefix(':')) {
            Some(port) => !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()),
            None => false,
        }
    })
}

/// Request guard: requests without an `Origin` header (CLI, curl, same-origin
/// navigation) pass, browser requests must come from an allowed origin.
pub struct TrustedOrigin;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for TrustedOrigin {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(origin) = req.headers().get_one("Origin") else {
            return Outcome::Success(TrustedOrigin);
        };

        let allowed = req
            .rocket()
            .state::<AppState>()
            .map(|state| state.config.server.allowed_origins.as_slice())
            .unwrap_or_default();

        if origin_allowed(origin, allowed) {
            Outcome::Success(TrustedOrigin)
        } else {
            app_log!(warn, "Rejected request from origin {}", origin);
            Outcome::Error((Status::Forbidden, ()))
        }
    }
}
