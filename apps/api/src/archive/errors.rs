use thiserror::Error;

/// Failures of the archive-trigger call
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Archive trigger request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Archive trigger returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed archive trigger response: {0}")]
    MalformedResponse(String),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
