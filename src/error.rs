// src/error.rs

use reqwest::StatusCode;

/// Failures that abort an ingestion run.
///
/// A 404 for a single source file is not represented here: the fetcher
/// reports it as [`crate::FetchOutcome::NotFound`] and the run carries on.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("missing required parameter {0}")]
    MissingParameter(&'static str),

    #[error("{name} is not a calendar date: {value:?}")]
    InvalidRange { name: &'static str, value: String },

    #[error("GET {url} returned {status}")]
    FetchStatus { url: String, status: StatusCode },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
