pub mod arrow;
pub mod types;

pub use self::arrow::{build_arrow_schema, canonical_schema, map_to_arrow_type};
pub use self::types::{Column, ColumnType};

use self::types::ColumnType as Ty;

pub const PICKUP_DATETIME: &str = "pickup_datetime";
pub const DROPOFF_DATETIME: &str = "dropoff_datetime";
pub const TAXI_TYPE: &str = "taxi_type";
pub const SOURCE_FILE: &str = "source_file";
pub const EXTRACTED_AT: &str = "extracted_at";

/// `YYYY-MM-DD HH:MM:SS`, used for both trip timestamps and `extracted_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The fifteen output columns, in output order.
pub const CANONICAL_COLUMNS: [Column; 15] = [
    col("vendorid", Ty::Integer, "Vendor identifier."),
    col(PICKUP_DATETIME, Ty::String, "Trip pickup timestamp."),
    col(DROPOFF_DATETIME, Ty::String, "Trip dropoff timestamp."),
    col("passenger_count", Ty::Integer, "Number of passengers."),
    col("trip_distance", Ty::Double, "Trip distance in miles."),
    col("ratecodeid", Ty::Integer, "Rate code identifier."),
    col("store_and_fwd_flag", Ty::String, "Store-and-forward flag."),
    col("pulocationid", Ty::Integer, "Pickup location ID."),
    col("dolocationid", Ty::Integer, "Dropoff location ID."),
    col("payment_type", Ty::Integer, "Payment type identifier."),
    col("fare_amount", Ty::Double, "Fare amount."),
    col("total_amount", Ty::Double, "Total charged amount."),
    col(TAXI_TYPE, Ty::String, "Taxi type (yellow/green)."),
    col(SOURCE_FILE, Ty::String, "Source parquet file name."),
    col(EXTRACTED_AT, Ty::String, "Ingestion timestamp in UTC."),
];

const fn col(name: &'static str, ty: ColumnType, description: &'static str) -> Column {
    Column {
        name,
        ty,
        description,
    }
}
