// src/process/normalize.rs

use arrow::{
    array::{
        temporal_conversions::as_datetime_with_timezone, timezone::Tz, Array, ArrayRef, AsArray,
        StringArray,
    },
    compute::cast,
    datatypes::{DataType, Field, Schema, TimeUnit, TimestampMicrosecondType},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use chrono::DateTime;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::error::Result;
use crate::process::date_parser::parse_datetime;
use crate::schema::{DROPOFF_DATETIME, PICKUP_DATETIME, TIMESTAMP_FORMAT};

/// Source naming conventions for the trip timestamps, as (pickup, dropoff).
/// A convention applies when its pickup column is present.
const TIMESTAMP_CONVENTIONS: [(&str, &str); 2] = [
    ("tpep_pickup_datetime", "tpep_dropoff_datetime"),
    ("lpep_pickup_datetime", "lpep_dropoff_datetime"),
];

/// Bring one raw trip table onto the canonical column naming:
/// - lower-case every column label
/// - rename `tpep_*` / `lpep_*` pickup and dropoff columns to
///   `pickup_datetime` / `dropoff_datetime`
/// - render both timestamp columns as `YYYY-MM-DD HH:MM:SS` strings, with
///   unparseable values becoming null
///
/// Tables without timestamp columns pass through with only the renames.
/// Normalizing an already-normalized table is a no-op.
#[instrument(level = "debug", skip_all, fields(rows = raw.num_rows()))]
pub fn normalize(raw: &RecordBatch) -> Result<RecordBatch> {
    let schema = raw.schema();
    let names = canonical_names(schema.fields().iter().map(|f| f.name().as_str()));

    let mut seen = HashSet::with_capacity(names.len());
    for (name, field) in names.iter().zip(schema.fields()) {
        if !seen.insert(name.as_str()) {
            warn!(
                column = %field.name(),
                label = %name,
                "duplicate column label after lower-casing; only the first survives aggregation"
            );
        }
    }

    let mut fields = Vec::with_capacity(names.len());
    let mut columns = Vec::with_capacity(names.len());
    for ((field, column), name) in schema.fields().iter().zip(raw.columns()).zip(names) {
        if name == PICKUP_DATETIME || name == DROPOFF_DATETIME {
            columns.push(format_timestamps(&name, column));
            fields.push(Field::new(name, DataType::Utf8, true));
        } else {
            fields.push(field.as_ref().clone().with_name(name));
            columns.push(column.clone());
        }
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    let options = RecordBatchOptions::new().with_row_count(Some(raw.num_rows()));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(schema),
        columns,
        &options,
    )?)
}

/// Lower-cased labels with the known timestamp conventions renamed.
fn canonical_names<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = labels.map(str::to_lowercase).collect();
    for (pickup, dropoff) in TIMESTAMP_CONVENTIONS {
        if !names.iter().any(|n| n == pickup) {
            continue;
        }
        for name in names.iter_mut() {
            if name == pickup {
                *name = PICKUP_DATETIME.to_string();
            } else if name == dropoff {
                *name = DROPOFF_DATETIME.to_string();
            }
        }
    }
    names
}

/// Render a timestamp-ish column as fixed-format strings. Never fails: values
/// (or whole columns) that cannot be read as a date-time become null.
fn format_timestamps(name: &str, column: &ArrayRef) -> ArrayRef {
    let rendered: StringArray = match column.data_type() {
        DataType::Timestamp(_, Some(tz)) => {
            let zone = match tz.parse::<Tz>() {
                Ok(zone) => zone,
                Err(e) => {
                    warn!(column = name, timezone = %tz, error = %e, "unknown timezone; nulling column");
                    return Arc::new(StringArray::new_null(column.len()));
                }
            };
            let target = DataType::Timestamp(TimeUnit::Microsecond, Some(tz.clone()));
            match cast(column, &target) {
                // Wall-clock time in the column's own zone.
                Ok(micros) => micros
                    .as_primitive::<TimestampMicrosecondType>()
                    .iter()
                    .map(|v| {
                        v.and_then(|v| as_datetime_with_timezone::<TimestampMicrosecondType>(v, zone))
                            .map(|dt| dt.naive_local().format(TIMESTAMP_FORMAT).to_string())
                    })
                    .collect(),
                Err(e) => {
                    warn!(column = name, error = %e, "cannot read timestamps; nulling column");
                    StringArray::new_null(column.len())
                }
            }
        }
        DataType::Timestamp(_, None) | DataType::Date32 | DataType::Date64 => {
            match cast(column, &DataType::Timestamp(TimeUnit::Microsecond, None)) {
                Ok(micros) => micros
                    .as_primitive::<TimestampMicrosecondType>()
                    .iter()
                    .map(|v| {
                        v.and_then(DateTime::from_timestamp_micros)
                            .map(|dt| dt.naive_utc().format(TIMESTAMP_FORMAT).to_string())
                    })
                    .collect(),
                Err(e) => {
                    warn!(column = name, error = %e, "cannot read timestamps; nulling column");
                    StringArray::new_null(column.len())
                }
            }
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            match cast(column, &DataType::Utf8) {
                Ok(strings) => strings
                    .as_string::<i32>()
                    .iter()
                    .map(|v| {
                        v.and_then(parse_datetime)
                            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
                    })
                    .collect(),
                Err(e) => {
                    warn!(column = name, error = %e, "cannot read timestamps; nulling column");
                    StringArray::new_null(column.len())
                }
            }
        }
        other => {
            warn!(column = name, data_type = %other, "not a timestamp type; nulling column");
            StringArray::new_null(column.len())
        }
    };
    Arc::new(rendered)
}
