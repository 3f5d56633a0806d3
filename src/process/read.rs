// src/process/read.rs

use arrow::{compute::concat_batches, record_batch::RecordBatch};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::{debug, instrument};

use crate::error::Result;

/// Decode an in-memory Parquet file into a single batch, row groups in order.
#[instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn read_parquet(bytes: Bytes) -> Result<RecordBatch> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    let table = concat_batches(&schema, &batches)?;
    debug!(rows = table.num_rows(), cols = table.num_columns(), "decoded parquet");
    Ok(table)
}
