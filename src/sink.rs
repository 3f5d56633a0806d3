// src/sink.rs

use arrow::{
    array::new_null_array,
    compute::{cast_with_options, CastOptions},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::ArrowWriter,
    basic::Compression,
    file::properties::WriterProperties,
};
use std::{
    fs::{self, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

use crate::error::Result;
use crate::schema::canonical_schema;

/// Project `table` onto the canonical output columns, in canonical order,
/// casting to the declared types. Missing columns and values that do not
/// cast become null; extra columns are dropped.
pub fn conform(table: &RecordBatch) -> Result<RecordBatch> {
    let schema = canonical_schema();
    let options = CastOptions {
        safe: true,
        ..Default::default()
    };

    let mut columns = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let column = match table.column_by_name(field.name()) {
            Some(col) if col.data_type() == field.data_type() => col.clone(),
            Some(col) => cast_with_options(col, field.data_type(), &options)?,
            None => new_null_array(field.data_type(), table.num_rows()),
        };
        columns.push(column);
    }
    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Append `table` to the output directory as a new SNAPPY Parquet file named
/// after the run's `extracted_at`. Existing files are never touched; a name
/// clash gets a numeric suffix. Returns `None` for an empty table.
#[instrument(level = "info", skip(table), fields(rows = table.num_rows()))]
pub fn append_parquet(
    dir: &Path,
    table: &RecordBatch,
    extracted_at: &str,
) -> Result<Option<PathBuf>> {
    if table.num_rows() == 0 {
        info!("nothing to write");
        return Ok(None);
    }
    fs::create_dir_all(dir)?;

    let stamp: String = extracted_at
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let (path, file) = create_new(dir, &stamp)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, table.schema(), Some(props))?;
    writer.write(table)?;
    writer.close()?;

    info!(path = %path.display(), "wrote trips");
    Ok(Some(path))
}

fn create_new(dir: &Path, stamp: &str) -> Result<(PathBuf, fs::File)> {
    let mut attempt = 0;
    loop {
        let name = if attempt == 0 {
            format!("trips_{}.parquet", stamp)
        } else {
            format!("trips_{}_{}.parquet", stamp, attempt)
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
