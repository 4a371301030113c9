use thiserror::Error;

/// Errors raised at the model adapter boundary
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Model provider credential is not configured")]
    MissingCredential,

    #[error("Request to model provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed model provider response: {0}")]
    MalformedResponse(String),
}

pub type LlmResult<T> = Result<T, LlmError>;
