use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// `{success, data, message}` wrapper every backend response uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, treating `success: false` or a missing body as a backend failure.
    pub fn into_data(self, fallback: &str) -> Result<T, AppError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(AppError::Backend {
                status: None,
                message: self.message.unwrap_or_else(|| fallback.to_string()),
            }),
        }
    }

    pub fn into_unit(self, fallback: &str) -> Result<(), AppError> {
        if self.success {
            Ok(())
        } else {
            Err(AppError::Backend {
                status: None,
                message: self.message.unwrap_or_else(|| fallback.to_string()),
            })
        }
    }
}
