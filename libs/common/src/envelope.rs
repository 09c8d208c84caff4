//! Response envelope
//!
//! Most endpoints wrap their payload as `{ success, message, data }`.
//! Failures carry `success: false` and an `error` block instead of `data`.

use serde::{Deserialize, Serialize};

/// Machine-readable part of a failed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<crate::validation::FieldErrors>,
}

/// `{ success, message?, data?, error? }` wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

/// An envelope that reported `success: false`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Rejection {
    pub message: String,
    pub error: Option<ErrorDetail>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: ErrorDetail) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error: Some(error),
        }
    }

    /// Payload of a successful envelope
    ///
    /// `success: true` without `data` yields `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, Rejection> {
        if self.success {
            return Ok(self.data);
        }

        let message = self
            .message
            .or_else(|| self.error.as_ref().map(|e| e.description.clone()))
            .unwrap_or_else(|| "Request failed".to_string());

        Err(Rejection {
            message,
            error: self.error,
        })
    }
}

impl Envelope<()> {
    /// Successful envelope without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_unwraps_data() {
        let envelope: Envelope<Vec<i64>> =
            serde_json::from_str(r#"{"success":true,"message":"ok","data":[1,2]}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn test_failure_surfaces_message() {
        let envelope: Envelope<Vec<i64>> = serde_json::from_str(
            r#"{"success":false,"message":"The requested testimonial does not exist.",
                "error":{"code":"TESTIMONIAL_NOT_FOUND","description":"Testimonial not found"}}"#,
        )
        .unwrap();

        let rejection = envelope.into_result().unwrap_err();
        assert_eq!(rejection.message, "The requested testimonial does not exist.");
        assert_eq!(rejection.error.unwrap().code, "TESTIMONIAL_NOT_FOUND");
    }

    #[test]
    fn test_message_only_envelope_omits_data() {
        let json = serde_json::to_value(Envelope::message("Testimonial deleted.")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "message": "Testimonial deleted."})
        );
    }
}
