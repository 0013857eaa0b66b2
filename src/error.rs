use rocket::http::Status;
use rocket::response::{self, status::Custom, Responder};
use rocket::serde::json::{json, Json, Value};
use rocket::Request;

/// Errors surfaced to API clients. Every variant maps onto a 4xx status
/// with an `{"error": <message>}` body; none of them are retried and none
/// take the process down.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("No task {0} provided")]
    Validation(&'static str),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized access")]
    Unauthorized,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::NotFound => Status::NotFound,
            ApiError::Unauthorized => Status::Unauthorized,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        Custom(self.status(), Json(json!({ "error": self.to_string() }))).respond_to(req)
    }
}

/// Keeps framework-generated errors (unknown routes, malformed JSON
/// bodies) in the same `{"error": ...}` shape as handler errors.
#[catch(default)]
pub fn fallback(status: Status, _req: &Request) -> Custom<Json<Value>> {
    Custom(status, Json(json!({ "error": status.reason_lossy() })))
}
