use miette::Diagnostic;
use thiserror::Error;

/// Main error type for themeconv operations
#[derive(Error, Diagnostic, Debug)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    #[diagnostic(code(themeconv::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(themeconv::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(themeconv::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Mapping error: {message}")]
    #[diagnostic(code(themeconv::mapping))]
    Mapping {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Encode error: {message}")]
    #[diagnostic(code(themeconv::encode))]
    Encode {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Decode error: {message}")]
    #[diagnostic(code(themeconv::decode))]
    Decode { message: String },
}

impl ThemeError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        ThemeError::Parse {
            message: message.into(),
            help: None,
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        ThemeError::Decode {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ThemeError>;
