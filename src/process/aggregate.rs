// src/process/aggregate.rs

use arrow::{
    array::{new_null_array, Array, ArrayRef},
    compute::{cast_with_options, concat, CastOptions},
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::schema::canonical_schema;

/// Concatenate tables in order, keeping each table's row order.
///
/// The result carries the union of all columns in first-seen order; rows from
/// a table lacking a column get nulls there. With no input at all the result
/// is an empty table with the canonical output columns.
pub fn aggregate(tables: &[RecordBatch]) -> Result<RecordBatch> {
    if tables.is_empty() {
        return Ok(RecordBatch::new_empty(canonical_schema()));
    }

    let schema = Arc::new(Schema::new(union_fields(tables)));
    let rows: usize = tables.iter().map(RecordBatch::num_rows).sum();

    let mut columns = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let parts = tables
            .iter()
            .map(|t| align_column(t, field))
            .collect::<Result<Vec<ArrayRef>>>()?;
        let refs: Vec<&dyn Array> = parts.iter().map(|a| a.as_ref()).collect();
        columns.push(concat(&refs)?);
    }

    debug!(tables = tables.len(), rows, cols = columns.len(), "aggregated");
    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}

/// Nullable union of the tables' columns. A name seen with different types
/// gets the wider of the two (see [`widen`]).
fn union_fields(tables: &[RecordBatch]) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::new();
    for table in tables {
        for field in table.schema().fields() {
            match fields.iter_mut().find(|f| f.name() == field.name()) {
                Some(existing) => {
                    let ty = widen(existing.data_type(), field.data_type());
                    *existing = existing.clone().with_data_type(ty);
                }
                None => fields.push(field.as_ref().clone().with_nullable(true)),
            }
        }
    }
    fields
}

/// Common type for a column observed as both `a` and `b`.
fn widen(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        _ if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        _ if a.is_integer() && b.is_integer() => DataType::Int64,
        _ if a.is_numeric() && b.is_numeric() => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// `field`'s column from `table`, cast if needed, or all nulls when absent.
fn align_column(table: &RecordBatch, field: &Field) -> Result<ArrayRef> {
    let Some(column) = table.column_by_name(field.name()) else {
        return Ok(new_null_array(field.data_type(), table.num_rows()));
    };
    if column.data_type() == field.data_type() {
        return Ok(column.clone());
    }
    let options = CastOptions {
        safe: true,
        ..Default::default()
    };
    Ok(cast_with_options(column, field.data_type(), &options)?)
}
