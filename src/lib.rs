pub mod config;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod months;
pub mod process;
pub mod schema;
pub mod sink;

pub use config::{IngestConfig, TaxiVars, VarsPayload};
pub use error::{IngestError, Result};
pub use fetch::{FetchOutcome, HttpSource, Source, SourceFileRef};
pub use ingest::{run, run_with_source, IngestOutput};
