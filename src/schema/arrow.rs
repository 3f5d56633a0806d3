// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema, SchemaRef};
use std::{collections::HashMap, sync::Arc};

use super::types::{Column, ColumnType};
use super::CANONICAL_COLUMNS;

/// Map a declared column type onto Arrow.
///
/// - Integer → Int64
/// - Double  → Float64
/// - String  → Utf8
pub fn map_to_arrow_type(ty: ColumnType) -> DataType {
    match ty {
        ColumnType::Integer => DataType::Int64,
        ColumnType::Double => DataType::Float64,
        ColumnType::String => DataType::Utf8,
    }
}

/// Build an ArrowSchema (inside an Arc) from a slice of `Column`s. Every field
/// is nullable and carries its description as `description` metadata.
pub fn build_arrow_schema(cols: &[Column]) -> SchemaRef {
    let fields: Vec<ArrowField> = cols
        .iter()
        .map(|col| {
            ArrowField::new(col.name, map_to_arrow_type(col.ty), true).with_metadata(
                HashMap::from([("description".to_string(), col.description.to_string())]),
            )
        })
        .collect();

    Arc::new(ArrowSchema::new(fields))
}

/// Schema of the output table.
pub fn canonical_schema() -> SchemaRef {
    build_arrow_schema(&CANONICAL_COLUMNS)
}
