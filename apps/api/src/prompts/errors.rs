use thiserror::Error;

use crate::llm::LlmError;

/// Client-caused request problems, reported before any model call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("promptType is required and must be a string")]
    MissingPromptType,

    #[error("Unknown promptType: {0}")]
    UnknownPromptType(String),

    #[error("params is required and must be an object")]
    MissingOrInvalidParams,

    #[error("params.{0} must be a string, number, boolean or list of strings")]
    InvalidParamValue(String),

    #[error("Missing required parameter '{param}' for promptType {prompt_type}")]
    MissingTemplateParameter { prompt_type: String, param: String },
}

/// Errors returned by the dispatch engine
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Model invocation failed: {0}")]
    Upstream(#[from] LlmError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
