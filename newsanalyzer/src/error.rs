use rocket::http::Status;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to API callers. Each maps to one HTTP status and a
/// `{"error": "..."}` body; none of them is retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Missing or malformed input, rejected before any processing
    #[error("{0}")]
    Validation(String),

    /// The article could not be fetched or parsed
    #[error("could not extract article: {0}")]
    Extraction(String),

    /// The language model failed to translate the summary
    #[error("translation failed: {0}")]
    Translation(String),

    /// Any other language-model call failed (tone, style, chat)
    #[error("language service failed: {0}")]
    LanguageService(String),
}

impl AnalysisError {
    /// Wrap an adapter error, keeping its whole context chain in the message.
    pub fn extraction(err: anyhow::Error) -> Self {
        Self::Extraction(format!("{:#}", err))
    }

    pub fn translation(err: anyhow::Error) -> Self {
        Self::Translation(format!("{:#}", err))
    }

    pub fn language_service(err: anyhow::Error) -> Self {
        Self::LanguageService(format!("{:#}", err))
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::Extraction(_) => Status::UnprocessableEntity,
            Self::Translation(_) | Self::LanguageService(_) => Status::BadGateway,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

/// JSON error payload
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
