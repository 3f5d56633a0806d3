// src/process/accumulate.rs

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::process::aggregate::aggregate;

/// Position of one source in the output: month first, then the taxi type's
/// index in the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceKey {
    pub month: NaiveDate,
    pub type_rank: usize,
}

/// Ordered buffer of per-source tables. Insertion order does not matter; the
/// tables come back sorted by [`SourceKey`].
#[derive(Debug, Default)]
pub struct Accumulator {
    tables: BTreeMap<SourceKey, RecordBatch>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `table` under `key`, returning whatever was there before.
    pub fn insert(&mut self, key: SourceKey, table: RecordBatch) -> Option<RecordBatch> {
        self.tables.insert(key, table)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Rows across every buffered table.
    pub fn rows(&self) -> usize {
        self.tables.values().map(RecordBatch::num_rows).sum()
    }

    pub fn into_tables(self) -> Vec<RecordBatch> {
        self.tables.into_values().collect()
    }

    /// Aggregate everything buffered into the output table.
    pub fn finish(self) -> Result<RecordBatch> {
        aggregate(&self.into_tables())
    }
}
