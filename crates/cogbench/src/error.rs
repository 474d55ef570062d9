use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Missing {what} file: {}", .path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chat endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Chat endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures talking to the chat endpoint (connect, read, or status)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HarnessError::Transport(_) | HarnessError::HttpStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
