// src/process/enrich.rs

use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::{iter, sync::Arc};

use crate::error::Result;
use crate::schema::{EXTRACTED_AT, SOURCE_FILE, TAXI_TYPE};

/// Append the lineage columns `taxi_type`, `source_file` and `extracted_at`,
/// each holding one constant value on every row.
pub fn enrich(
    table: &RecordBatch,
    taxi_type: &str,
    source_file: &str,
    extracted_at: &str,
) -> Result<RecordBatch> {
    let rows = table.num_rows();
    let schema = table.schema();

    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns: Vec<ArrayRef> = table.columns().to_vec();
    for (name, value) in [
        (TAXI_TYPE, taxi_type),
        (SOURCE_FILE, source_file),
        (EXTRACTED_AT, extracted_at),
    ] {
        fields.push(Field::new(name, DataType::Utf8, false));
        columns.push(Arc::new(StringArray::from_iter_values(
            iter::repeat(value).take(rows),
        )));
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(schema),
        columns,
        &options,
    )?)
}
