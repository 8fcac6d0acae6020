//! Error types for Accesslens

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("provider invocation failed: {message}{}", fmt_stderr(.stderr))]
    Executor {
        message: String,
        /// Captured error-stream output from the provider process, if any.
        stderr: Option<String>,
    },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("graph error: {0}")]
    Graph(String),

    #[error("task limit exceeded: more than {limit} tasks spawned")]
    TaskLimitExceeded { limit: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

fn fmt_stderr(stderr: &Option<String>) -> String {
    match stderr {
        Some(s) if !s.trim().is_empty() => format!(" (stderr: {})", s.trim()),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn executor(message: impl Into<String>) -> Self {
        Self::Executor {
            message: message.into(),
            stderr: None,
        }
    }

    pub fn executor_with_stderr(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Executor {
            message: message.into(),
            stderr: Some(stderr.into()),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub fn graph(message: impl Into<String>) -> Self {
        Self::Graph(message.into())
    }

    /// Captured provider diagnostics, when this is an executor failure that
    /// carried error-stream output.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Executor {
                stderr: Some(s), ..
            } => Some(s),
            _ => None,
        }
    }
}
