// src/fetch/mod.rs

pub mod files;
pub mod urls;

pub use files::{fetch_source, FetchOutcome, HttpSource, Source};
pub use urls::{resolve, resolve_with_base, SourceFileRef, BASE_URL};
