use crate::utils::error::{ErrorCategory, HousingError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl HousingError {
    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Input => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCategory::Data | ErrorCategory::Model => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::Configuration | ErrorCategory::System => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for HousingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if !self.is_client_error() {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                self,
                self.category(),
                self.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", self.recovery_suggestion());
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(json!({ "detail": self.user_friendly_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            HousingError::invalid_input("rooms", -1, "negative").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            HousingError::InsufficientData.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            HousingError::ModelCorrupt {
                path: "model.json".to_string(),
                reason: "bad".to_string()
            }
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            HousingError::ModelFit {
                message: "no convergence".to_string()
            }
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            HousingError::IoError(std::io::Error::other("disk")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
