// src/fetch/urls.rs

use chrono::{Datelike, NaiveDate};

/// Public NYC TLC trip-data bucket.
pub const BASE_URL: &str = "https://d37ci6vzurychx.cloudfront.net/trip-data";

/// One monthly trip file for one taxi type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFileRef {
    pub taxi_type: String,
    pub year: i32,
    pub month: u32,
    /// `{taxi_type}_tripdata_{YYYY}-{MM}.parquet`
    pub file_name: String,
    pub url: String,
}

/// Resolve the file published on the public bucket for `month` and `taxi_type`.
pub fn resolve(month: NaiveDate, taxi_type: &str) -> SourceFileRef {
    resolve_with_base(BASE_URL, month, taxi_type)
}

/// Same as [`resolve`] against another base URL (mirrors, local servers).
pub fn resolve_with_base(base_url: &str, month: NaiveDate, taxi_type: &str) -> SourceFileRef {
    let (year, month) = (month.year(), month.month());
    let file_name = format!("{}_tripdata_{}-{:02}.parquet", taxi_type, year, month);
    let url = format!("{}/{}", base_url.trim_end_matches('/'), file_name);
    SourceFileRef {
        taxi_type: taxi_type.to_string(),
        year,
        month,
        file_name,
        url,
    }
}
