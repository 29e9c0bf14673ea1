use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Error taxonomy for engine commands. Every variant is recoverable by the
/// caller retrying with corrected input; commands never partially mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Referenced group/presentation/poll/template does not exist.
    NotFound(String),
    /// Malformed command input.
    Validation(String),
    /// Operation invalid for the current state machine position.
    StateConflict(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NotFound(what) => write!(f, "Not found: {what}"),
            EngineError::Validation(why) => write!(f, "Validation failed: {why}"),
            EngineError::StateConflict(why) => write!(f, "State conflict: {why}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl ResponseError for EngineError {
    fn error_response(&self) -> HttpResponse {
        match self {
            EngineError::NotFound(what) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "details": what,
            })),
            EngineError::Validation(why) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_failed",
                "details": why,
            })),
            EngineError::StateConflict(why) => {
                log::warn!("rejected command: {self}");
                HttpResponse::Conflict().json(serde_json::json!({
                    "error": "state_conflict",
                    "details": why,
                }))
            }
        }
    }
}
