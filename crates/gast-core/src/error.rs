use crate::lang::Language;
use thiserror::Error;
use std::result;

#[derive(Error, Debug)]
pub enum Error {
    /// The language parser rejected the input.
    #[error("{language} parse error: {message}")]
    Parse { language: Language, message: String },
    /// The language tree violates a shape its grammar guarantees.
    ///
    /// This is a defect of the upstream parser, never of the user's source.
    #[error("malformed {language} tree at `{kind}`: {detail}")]
    Malformed {
        language: Language,
        kind: String,
        detail: String,
    },
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("Generic error: {0}")]
    Generic(String),
}

impl Error {
    pub fn parse(language: Language, message: impl Into<String>) -> Self {
        Error::Parse {
            language,
            message: message.into(),
        }
    }

    pub fn malformed(language: Language, kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::Malformed {
            language,
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Malformed { .. })
    }
}

pub type Result<T> = result::Result<T, Error>;

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

// Convert from std::io::Error to our Error type
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Generic(s.to_string())
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
