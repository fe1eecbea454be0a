use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error for file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download '{id}' after {attempts} attempt(s): {reason}")]
    Download {
        id: String,
        attempts: u32,
        reason: String,
    },
}

impl Error {
    pub fn from_io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn download(id: impl Into<String>, attempts: u32, reason: impl Into<String>) -> Self {
        Self::Download {
            id: id.into(),
            attempts,
            reason: reason.into(),
        }
    }
}
