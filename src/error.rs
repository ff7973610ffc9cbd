//! Error types shared across the service.

use thiserror::Error;

use crate::services::results::Tab;

/// Message shown for any failed generation, whatever the cause.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate content. Please try again or check your API key.";

/// Rejected before any backend call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter text or upload an image/PDF.")]
    EmptySubmission,
}

/// Failure of a single generation call.
#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No response from AI")]
    EmptyReply,

    #[error("reply is not a valid study response: {message}")]
    Parse { message: String },
}

impl GenerationError {
    pub fn is_parse(&self) -> bool {
        matches!(self, GenerationError::EmptyReply | GenerationError::Parse { .. })
    }

    pub fn is_transport(&self) -> bool {
        !self.is_parse()
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        GenerationError::Transport { message }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Parse {
            message: err.to_string(),
        }
    }
}

/// Startup configuration problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing API key: set GEMINI_API_KEY")]
    MissingApiKey,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Rejected presentation transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("tab {0:?} is not available for this result")]
    IneligibleTab(Tab),

    #[error("no question at index {0}")]
    NoSuchQuestion(usize),

    #[error("question {index} has no option {option:?}")]
    NoSuchOption { index: usize, option: String },

    #[error("question {0} has no selected answer to check")]
    NothingSelected(usize),

    #[error("there is no result to interact with")]
    NoResult,
}
