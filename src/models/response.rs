use serde::Serialize;

/// Per-field validation failure. `message` is reserved and always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorField {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl ErrorField {
    pub fn new(field: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: String::new(),
            code: code.into(),
        }
    }
}

/// The only externally observable result shape.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub message: String,
    pub status_code: u16,
    pub error_fields: Option<Vec<ErrorField>>,
}

impl ApiResponse {
    pub fn sent_ok() -> Self {
        Self {
            message: "SENT_OK".to_string(),
            status_code: 200,
            error_fields: None,
        }
    }

    pub fn invalid_payload(fields: Vec<ErrorField>) -> Self {
        Self {
            message: "INVALID_PAYLOAD".to_string(),
            status_code: 400,
            error_fields: Some(fields),
        }
    }

    pub fn internal_error() -> Self {
        Self {
            message: "ERROR".to_string(),
            status_code: 500,
            error_fields: None,
        }
    }
}
