use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SidebarError>;

#[derive(Debug, Error)]
pub enum SidebarError {
    #[error("unable to load recipe manifest: {0}")]
    LoadFailure(Box<SidebarError>),

    #[error("no manifest candidates configured")]
    NoCandidates,

    #[error("fetch failed: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("invalid manifest location: {0}")]
    InvalidLocation(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl SidebarError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::LoadFailure(_) => "LOAD_FAILURE",
            Self::NoCandidates => "NO_CANDIDATES",
            Self::HttpStatus { .. } => "HTTP_STATUS",
            Self::InvalidLocation(_) => "INVALID_LOCATION",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Toml(_) => "TOML_ERROR",
        }
    }

    /// The error that made the last manifest candidate fail, when this is a
    /// `LoadFailure`.
    #[must_use]
    pub fn last_cause(&self) -> Option<&SidebarError> {
        match self {
            Self::LoadFailure(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            cause: self.last_cause().map(|inner| inner.code().to_string()),
        }
    }
}
