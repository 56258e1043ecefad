use lambda_http::http::StatusCode;
use thiserror::Error;

/// Everything that can end an upload-init request early.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("missing filename/contentType")]
    MissingFields,

    #[error("file type not allowed")]
    TypeNotAllowed,

    #[error("file too large")]
    TooLarge,

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// A required environment variable was absent or empty.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("failed to presign upload: {0}")]
    Signing(String),
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingFields | Self::TypeNotAllowed | Self::TooLarge => StatusCode::BAD_REQUEST,
            Self::MalformedBody(_) | Self::MissingConfig(_) | Self::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message that is safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => "server error".to_string(),
            _ => self.to_string(),
        }
    }
}
