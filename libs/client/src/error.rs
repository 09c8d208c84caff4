//! Client error taxonomy

use common::FieldErrors;
use thiserror::Error;

use crate::tokens::StoreError;
use crate::transport::TransportError;

/// Everything a client call can fail with
#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected before any request was sent
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// 401 that survived a refresh attempt, or no session at all
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// No response was received
    #[error(transparent)]
    Network(#[from] TransportError),

    /// 2xx response whose envelope reported `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Any other non-2xx response
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ClientError {
    /// Map a non-2xx status and its server message onto the taxonomy
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Api { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Short text suitable for a transient notification
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(errors) => errors
                .iter()
                .next()
                .and_then(|(_, messages)| messages.first().cloned())
                .unwrap_or_else(|| "Please check the form and try again.".to_string()),
            ClientError::Unauthorized(_) => "Your session has expired. Please sign in again.".to_string(),
            ClientError::Forbidden(message)
            | ClientError::NotFound(message)
            | ClientError::Rejected(message)
            | ClientError::Api { message, .. } => message.clone(),
            ClientError::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ClientError::Decode(_) | ClientError::Storage(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

impl From<common::Rejection> for ClientError {
    fn from(rejection: common::Rejection) -> Self {
        ClientError::Rejected(rejection.message)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classifies() {
        assert!(ClientError::from_status(404, "Image not found".into()).is_not_found());
        assert!(ClientError::from_status(401, "expired".into()).is_unauthorized());
        assert!(matches!(
            ClientError::from_status(409, "Slug taken".into()),
            ClientError::Api { status: 409, .. }
        ));
    }

    #[test]
    fn test_user_message_surfaces_server_text() {
        let error = ClientError::Rejected("Category already exists".to_string());
        assert_eq!(error.user_message(), "Category already exists");

        let mut fields = FieldErrors::new();
        fields.add("title", "Title is required");
        assert_eq!(
            ClientError::Validation(fields).user_message(),
            "Title is required"
        );
    }
}
