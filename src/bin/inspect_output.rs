use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::{env, fs::File, path::Path, process::exit};
use taxi_ingest::schema::CANONICAL_COLUMNS;

const PREVIEW_ROWS: usize = 5;

fn main() {
    // Expect exactly one CLI argument: path to an output Parquet file.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <PARQUET_FILE>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_output(Path::new(&args[1])) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

/// Print row counts, the Arrow schema checked against the output columns, and
/// the first few rows.
fn inspect_output(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let reader = SerializedFileReader::new(File::open(path)?)?;
    let meta = reader.metadata();
    println!("=== Parquet File: {} ===", path.display());
    println!(
        "Created by:           {}",
        meta.file_metadata().created_by().unwrap_or("<unknown>")
    );
    println!("Total rows:           {}", meta.file_metadata().num_rows());
    println!("Number of row groups: {}", meta.num_row_groups());
    println!();

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
    let schema = builder.schema().clone();

    println!("=== Columns ===");
    for field in schema.fields() {
        let known = CANONICAL_COLUMNS.iter().any(|c| c.name == field.name());
        println!(
            "- {:<20} | {:<10} | {}",
            field.name(),
            field.data_type().to_string(),
            if known { "canonical" } else { "extra" }
        );
    }
    for col in CANONICAL_COLUMNS
        .iter()
        .filter(|c| schema.field_with_name(c.name).is_err())
    {
        println!("- {:<20} | MISSING", col.name);
    }
    println!();

    let reader = builder.with_batch_size(PREVIEW_ROWS).build()?;
    let preview: Vec<_> = reader.take(1).collect::<Result<_, _>>()?;
    println!("=== First {} rows ===", PREVIEW_ROWS);
    println!("{}", pretty_format_batches(&preview)?);
    Ok(())
}
