use crate::error::UploadError;
use lambda_http::Body;
use serde_json::{Map, Value};

pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "application/pdf"];

pub const MAX_MB: u64 = 25;
pub const MAX_UPLOAD_BYTES: u64 = MAX_MB * 1024 * 1024;

/// What the client says it is about to upload, before any checks.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UploadRequest {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    /// Advisory only, the uploaded bytes are never measured.
    pub size_bytes: Option<f64>,
}

/// An upload that passed the policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidUpload {
    pub filename: String,
    pub content_type: String,
}

impl UploadRequest {
    /// Normalizes whatever the runtime handed us into a request.
    ///
    /// An empty body reads as `{}`. Text and binary bodies must be JSON.
    pub fn from_body(body: &Body) -> Result<Self, UploadError> {
        let value = match body {
            Body::Empty => return Ok(Self::default()),
            Body::Text(text) => serde_json::from_str::<Value>(text)?,
            Body::Binary(bytes) => serde_json::from_slice::<Value>(bytes)?,
        };

        Ok(Self::from_value(&value))
    }

    /// A non-string `filename` is treated as absent. A non-string `contentType`
    /// is kept as its JSON text so it fails the allow-list, unless it is falsy.
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);

        let filename = fields
            .get("filename")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let content_type = fields
            .get("contentType")
            .filter(|v| !is_falsy(v))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        let size_bytes = fields.get("sizeBytes").and_then(|v| match v {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            other => other.as_f64(),
        });

        UploadRequest {
            filename,
            content_type,
            size_bytes,
        }
    }

    pub fn validate(self) -> Result<ValidUpload, UploadError> {
        let (filename, content_type) = match (self.filename, self.content_type) {
            (Some(filename), Some(content_type)) => (filename, content_type),
            _ => return Err(UploadError::MissingFields),
        };

        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(UploadError::TypeNotAllowed);
        }

        if let Some(size) = self.size_bytes {
            if size > MAX_UPLOAD_BYTES as f64 {
                return Err(UploadError::TooLarge);
            }
        }

        Ok(ValidUpload {
            filename,
            content_type,
        })
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}
