use miette::Diagnostic;
use thiserror::Error;

/// Main error type for qm operations
#[derive(Error, Diagnostic, Debug)]
pub enum QmError {
    #[error("IO error: {0}")]
    #[diagnostic(code(qm::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(qm::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(qm::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Layout error: {message}")]
    #[diagnostic(code(qm::layout))]
    Layout {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Conversion error: {message}")]
    #[diagnostic(code(qm::convert))]
    Convert {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, QmError>;
