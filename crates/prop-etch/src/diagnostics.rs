//! Error types
//!
//! Only program construction and configuration loading can fail. Everything
//! that happens per export or per prop degrades to empty data instead of
//! producing an error.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for prop-etch operations
pub type DocResult<T> = Result<T, DocError>;

/// Main error type for prop-etch
#[derive(Debug, Error)]
pub enum DocError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A root source file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Path cannot be turned into a module specifier
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A root source file failed to parse
    #[error("TypeScript parse error in {file}: {message}")]
    TypeScriptParse { file: PathBuf, message: String },

    /// Invalid project configuration or options file
    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl DocError {
    /// Create a parse error
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DocError::TypeScriptParse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DocError::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            DocError::FileNotFound(path)
            | DocError::TypeScriptParse { file: path, .. }
            | DocError::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}
