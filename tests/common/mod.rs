#![allow(dead_code)]

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned responses by request path, plus a log of every path requested.
#[derive(Clone, Default)]
pub struct Routes {
    responses: Arc<HashMap<String, (u16, Vec<u8>)>>,
    pub hits: Arc<Mutex<Vec<String>>>,
}

impl Routes {
    pub fn new(responses: Vec<(&str, u16, Vec<u8>)>) -> Self {
        let responses = responses
            .into_iter()
            .map(|(path, status, body)| (path.to_string(), (status, body)))
            .collect();
        Self {
            responses: Arc::new(responses),
            hits: Arc::default(),
        }
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Serve `routes` on an ephemeral local port until the test ends. Unknown
/// paths answer 404. Returns the base URL.
pub async fn serve(routes: Routes) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                routes.hits.lock().unwrap().push(path.clone());

                let (status, body) = routes
                    .responses
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, Vec::new()));
                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    503 => "Service Unavailable",
                    _ => "Unknown",
                };
                let head = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    reason,
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes()).await;
                let _ = stream.write_all(&body).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    format!("http://{}", addr)
}

/// Accept connections and read requests but never answer. Returns the base URL.
pub async fn serve_silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let _ = stream.read(&mut buf).await;
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                drop(stream);
            });
        }
    });
    format!("http://{}", addr)
}

/// 2023-01-01 00:00:00 UTC in microseconds.
pub const JAN_2023_MICROS: i64 = 1_672_531_200_000_000;

/// A small trip file in the TLC layout. `prefix` is `tpep` (yellow) or
/// `lpep` (green); `pickups` are minutes after 2023-01-01 00:00:00.
pub fn trip_file(prefix: &str, pickups: &[i64]) -> Vec<u8> {
    let ts = DataType::Timestamp(TimeUnit::Microsecond, None);
    let schema = Arc::new(Schema::new(vec![
        Field::new("VendorID", DataType::Int64, true),
        Field::new(format!("{prefix}_pickup_datetime"), ts.clone(), true),
        Field::new(format!("{prefix}_dropoff_datetime"), ts, true),
        Field::new("passenger_count", DataType::Float64, true),
        Field::new("trip_distance", DataType::Float64, true),
        Field::new("RatecodeID", DataType::Float64, true),
        Field::new("store_and_fwd_flag", DataType::Utf8, true),
        Field::new("PULocationID", DataType::Int64, true),
        Field::new("DOLocationID", DataType::Int64, true),
        Field::new("payment_type", DataType::Int64, true),
        Field::new("fare_amount", DataType::Float64, true),
        Field::new("total_amount", DataType::Float64, true),
    ]));
    let n = pickups.len();
    let pickup: Vec<i64> = pickups
        .iter()
        .map(|m| JAN_2023_MICROS + m * 60_000_000)
        .collect();
    let dropoff: Vec<i64> = pickup.iter().map(|p| p + 600_000_000).collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(vec![2; n])),
        Arc::new(TimestampMicrosecondArray::from(pickup)),
        Arc::new(TimestampMicrosecondArray::from(dropoff)),
        Arc::new(Float64Array::from(vec![1.0; n])),
        Arc::new(Float64Array::from(vec![2.5; n])),
        Arc::new(Float64Array::from(vec![1.0; n])),
        Arc::new(StringArray::from(vec!["N"; n])),
        Arc::new(Int64Array::from(vec![161; n])),
        Arc::new(Int64Array::from(vec![237; n])),
        Arc::new(Int64Array::from(vec![1; n])),
        Arc::new(Float64Array::from(vec![9.3; n])),
        Arc::new(Float64Array::from(vec![14.3; n])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    buf
}
