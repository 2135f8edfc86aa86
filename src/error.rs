use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the summarizer. Each one is a user-facing state, not an internal fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// Country identifiers are matched exactly; an empty string can never match.
    #[error("country identifier must not be empty")]
    EmptyCountry,
    #[error("no data for country '{0}'")]
    NotFound(String),
    #[error("cannot compare '{0}' with itself; select two different countries")]
    InvalidComparison(String),
}

/// Errors raised while building a [`crate::Dataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("GET {url}: {message}")]
    Http { url: String, message: String },
    #[error("parse csv")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: empty country identifier")]
    MissingCountry { line: u64 },
    #[error("record for {year} has a blank country identifier")]
    BlankCountry { year: i32 },
    #[error("dataset contains no records")]
    Empty,
    #[error("duplicate record for {country} in {year}")]
    DuplicateYear { country: String, year: i32 },
    #[error("{country} {year}: '{field}' must be a finite, non-negative number")]
    InvalidValue {
        country: String,
        year: i32,
        field: &'static str,
    },
}
