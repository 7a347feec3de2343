use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`TranslateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected locally before any request was issued.
    Precondition,
    /// Network, timeout, proxy or non-success HTTP status.
    Transport,
    /// The endpoint answered but the page held no known marker.
    UnparseableResponse,
    /// Bad configuration file or environment value.
    Config,
}

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Text is too long: {len} characters (max {max})")]
    TextTooLong { len: usize, max: usize },

    #[error("File not found or not a regular file: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid proxy: {0}")]
    Proxy(String),

    #[error("Unparseable response ({} bytes): no translation marker found", .body.len())]
    UnparseableResponse { body: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::TextTooLong { .. }
            | TranslateError::FileNotFound(_)
            | TranslateError::Io(_) => ErrorKind::Precondition,
            TranslateError::Http(_) | TranslateError::Status { .. } | TranslateError::Proxy(_) => {
                ErrorKind::Transport
            }
            TranslateError::UnparseableResponse { .. } => ErrorKind::UnparseableResponse,
            TranslateError::Config(_) => ErrorKind::Config,
        }
    }

    /// Raw response body, when the endpoint answered with a page we could not read.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            TranslateError::UnparseableResponse { body } => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
