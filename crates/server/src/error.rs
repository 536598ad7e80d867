use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use shared::security::authenticate::AuthError;
use std::fmt;

#[derive(Debug)]
pub enum ServerError {
    Redis(redis::RedisError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    NotFound(String),
    Validation(String),
    Unauthorized(String),
    Forbidden(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Redis(e) => write!(f, "Redis error: {e}"),
            ServerError::Io(e) => write!(f, "IO error: {e}"),
            ServerError::Serialization(e) => write!(f, "Serialization error: {e}"),
            ServerError::NotFound(msg)
            | ServerError::Validation(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::Forbidden(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<redis::RedisError> for ServerError {
    fn from(err: redis::RedisError) -> Self {
        ServerError::Redis(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(err)
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Serialization(err)
    }
}

impl From<AuthError> for ServerError {
    fn from(err: AuthError) -> Self {
        if err.status_code() == StatusCode::FORBIDDEN {
            ServerError::Forbidden(err.to_string())
        } else {
            ServerError::Unauthorized(err.to_string())
        }
    }
}

/// Terminal error surface: every handler funnels failures here and gets the
/// JSON envelope with the matching status code.
impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ServerError::NotFound(msg)
            | ServerError::Validation(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::Forbidden(msg) => msg.clone(),
            other => {
                error!("{other}");
                "Server error".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": message
        }))
    }
}
