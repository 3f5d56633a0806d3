// src/process/mod.rs

pub mod accumulate;
pub mod aggregate;
pub mod date_parser;
pub mod enrich;
pub mod normalize;
pub mod read;

pub use accumulate::{Accumulator, SourceKey};
pub use aggregate::aggregate;
pub use enrich::enrich;
pub use normalize::normalize;
pub use read::read_parquet;
