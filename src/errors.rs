use std::fmt;

use derive_more::Display;
use reqwest::StatusCode;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    InvalidInput(String),
    DecodeError(String),
    IoError(String),
    Authorization(String),
    Network(String),
    Backend { status: Option<StatusCode>, message: String },
    NotFound(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::DecodeError(msg) => write!(f, "Could not decode image: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::Authorization(msg) => write!(f, "{}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Backend { status: Some(status), message } => {
                write!(f, "{} ({})", message, status.as_u16())
            }
            AppError::Backend { status: None, message } => write!(f, "{}", message),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Single-field validation failure, the shape most form checks produce.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, AppError::Authorization(_))
    }

    /// The message a user should see, without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(errors) => errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "Invalid value".to_string()),
            AppError::Backend { message, .. } => message.clone(),
            AppError::DecodeError(_) | AppError::IoError(_) => {
                "Error processing image. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        // field_errors() is backed by a map; keep the output stable for callers showing the first one
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Backend {
                status: err.status(),
                message: format!("Malformed response: {}", err),
            }
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => AppError::IoError(e.to_string()),
            _ => AppError::DecodeError(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Background task failed: {}", err))
    }
}

#[derive(Debug, Display)]
pub enum SessionError {
    #[display("Please login to {_0}")]
    NotAuthenticated(String),

    #[display("Missing credentials")]
    MissingCredentials,

    #[display("Session token could not be stored: {_0}")]
    TokenStorage(String),
}

impl std::error::Error for SessionError {}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotAuthenticated(_) => {
                AppError::Authorization(err.to_string())
            }
            SessionError::MissingCredentials => AppError::validation("credentials", err.to_string()),
            SessionError::TokenStorage(msg) => AppError::IoError(msg),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
