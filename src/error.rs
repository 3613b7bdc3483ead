use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while transforming a catalog.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InputFormat(#[from] InputFormatError),

    #[error(transparent)]
    Transliteration(#[from] TransliterationError),

    #[error(transparent)]
    OutputWrite(#[from] OutputWriteError),
}

impl Error {
    /// Process exit code reported by the binary for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InputFormat(_) => 3,
            Error::Transliteration(_) => 4,
            Error::OutputWrite(_) => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum InputFormatError {
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid csv header in {path}: found [{found}], expected [{expected}]")]
    InvalidHeader {
        path: PathBuf,
        found: String,
        expected: String,
    },

    #[error("malformed row in {path}: {source}")]
    MalformedRow {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("empty title in {path} at line {line}")]
    EmptyTitle { path: PathBuf, line: u64 },
}

#[derive(Debug, Error)]
#[error("cannot transliterate {character:?} (U+{code:04X}) in title {title:?}: {reason}")]
pub struct TransliterationError {
    pub title: String,
    pub character: char,
    pub code: u32,
    pub reason: &'static str,
}

impl TransliterationError {
    pub(crate) fn new(title: &str, character: char, reason: &'static str) -> Self {
        TransliterationError {
            title: title.to_string(),
            character,
            code: character as u32,
            reason,
        }
    }
}

#[derive(Debug, Error)]
pub enum OutputWriteError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write csv to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot write yaml to {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot write json to {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
