//! Error types for calls to the registry API

use common::validation::{Field, FieldErrors};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single registry call
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Network or protocol failure before a response was read
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The requested record does not exist (404)
    #[error("Not found: {}", .message.as_deref().unwrap_or("resource does not exist"))]
    NotFound { message: Option<String> },

    /// Field-keyed validation errors reported by the registry
    #[error("Validation failed ({status}): {fields:?}")]
    Validation {
        status: StatusCode,
        message: Option<String>,
        fields: FieldErrors,
    },

    /// Any other non-2xx answer
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    /// 2xx answer whose body could not be decoded
    #[error("Unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ServiceError {
    /// Classify a non-2xx response from its status and raw body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let payload: Option<Value> = serde_json::from_str(body).ok();
        let message = payload
            .as_ref()
            .and_then(|payload| payload.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        if status == StatusCode::NOT_FOUND {
            return ServiceError::NotFound { message };
        }

        match payload.as_ref().and_then(|payload| field_errors(status, payload)) {
            Some(fields) => ServiceError::Validation {
                status,
                message,
                fields,
            },
            None => ServiceError::Api { status, message },
        }
    }

    /// Server supplied `message`, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            ServiceError::NotFound { message }
            | ServiceError::Validation { message, .. }
            | ServiceError::Api { message, .. } => message.as_deref(),
            ServiceError::Transport(_) | ServiceError::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }
}

/// Pull field errors out of a payload.
///
/// Accepts `{"errors": {field: message}}`, where unknown keys land under
/// `general`, or a flat object keyed by known form fields. The flat form
/// is only read from 400 and 422 answers, other statuses may echo a record.
fn field_errors(status: StatusCode, payload: &Value) -> Option<FieldErrors> {
    let mut fields = FieldErrors::new();

    if let Some(errors) = payload.get("errors").and_then(Value::as_object) {
        for (key, value) in errors {
            let Some(text) = value.as_str() else { continue };
            match Field::from_key(key) {
                Some(field) => {
                    fields.insert(field, text.to_string());
                }
                None => {
                    fields
                        .entry(Field::General)
                        .and_modify(|general| general.push_str(&format!("; {key}: {text}")))
                        .or_insert_with(|| format!("{key}: {text}"));
                }
            }
        }
    } else if let Some(object) = payload.as_object().filter(|_| is_rejection(status)) {
        for (key, value) in object {
            if let (Some(field), Some(text)) = (Field::from_key(key), value.as_str()) {
                fields.insert(field, text.to_string());
            }
        }
    }

    (!fields.is_empty()).then_some(fields)
}

fn is_rejection(status: StatusCode) -> bool {
    status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY
}

/// Type alias for registry call results
pub type ServiceResult<T> = Result<T, ServiceError>;
