use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, DictionaryArray, Float64Array, Int64Array, StringArray, TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, Field, Int32Type, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use taxi_dashboard::charts::Dashboard;
use taxi_dashboard::data::loader::load_file;
use taxi_dashboard::data::model::{CellValue, NumericColumn, TaxiDataset, TaxiTrip};
use taxi_dashboard::data::stats::Summary;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/taxis_sample.csv")
}

fn load_fixture() -> TaxiDataset {
    load_file(&fixture()).expect("fixture loads")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn fixture_has_every_trip_and_both_colors() {
    let ds = load_fixture();
    assert_eq!(ds.len(), 10);
    let colors: Vec<&str> = ds.colors.iter().map(String::as_str).collect();
    assert_eq!(colors, ["yellow", "green"]);
}

#[test]
fn blank_fields_load_as_missing() {
    let ds = load_fixture();
    let trip = &ds.trips[6];
    assert_eq!(trip.passengers, 5);
    assert_eq!(trip.payment, None);
    assert_eq!(trip.pickup_borough, None);

    let preview = ds.head(10);
    assert_eq!(preview[6][9], CellValue::Null);
}

#[test]
fn total_summary_matches_describe() {
    let ds = load_fixture();
    let s = Summary::from_values(&NumericColumn::Total.values(&ds)).unwrap();
    assert_eq!(s.count, 10);
    assert_close(s.mean, 15.257);
    assert_close(s.min, 6.8);
    assert_close(s.q1, 9.9125);
    assert_close(s.median, 13.175);
    assert_close(s.q3, 17.64);
    assert_close(s.max, 36.95);
}

#[test]
fn tip_summary_matches_describe() {
    let ds = load_fixture();
    let s = Summary::from_values(&NumericColumn::Tip.values(&ds)).unwrap();
    assert_close(s.mean, 1.807);
    assert_close(s.q1, 0.275);
    assert_close(s.median, 1.655);
    assert_close(s.q3, 2.3075);
}

#[test]
fn categorical_page_counts_and_means() {
    let dashboard = Dashboard::build(&load_fixture());
    assert_eq!(
        dashboard.categorical.passenger_counts,
        vec![(1, 6), (2, 2), (3, 1), (5, 1)]
    );

    let means: Vec<(&str, f64)> = dashboard
        .categorical
        .tip_by_color
        .iter()
        .map(|(c, e)| (c.as_str(), e.mean))
        .collect();
    assert_eq!(means.len(), 2);
    assert_eq!(means[0].0, "yellow");
    assert_close(means[0].1, 2.46);
    assert_eq!(means[1].0, "green");
    assert_close(means[1].1, 0.8275);
}

#[test]
fn interactive_histogram_covers_every_trip() {
    let dashboard = Dashboard::build(&load_fixture());
    let hist = &dashboard.interactive.total_histogram;
    assert_eq!(hist.counts.len(), 40);
    assert_eq!(hist.total(), 10);
    assert_close(hist.edges[0], 6.8);
    assert_close(hist.edges[40], 36.95);

    let scattered: usize = dashboard
        .interactive
        .scatter
        .iter()
        .map(|g| g.points.len())
        .sum();
    assert_eq!(scattered, 10);
}

#[test]
fn json_copy_loads_the_same_trips() {
    let ds = load_fixture();
    let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    std::fs::write(file.path(), serde_json::to_string(&ds.trips).unwrap()).unwrap();

    let from_json = load_file(file.path()).unwrap();
    assert_eq!(from_json.trips, ds.trips);
    assert_eq!(from_json.colors, ds.colors);
}

/// Nanoseconds since the epoch for a `YYYY-MM-DD HH:MM:SS` UTC timestamp.
fn epoch_nanos(text: &str) -> i64 {
    let num = |range: std::ops::Range<usize>| text[range].parse::<i64>().unwrap();
    let (y, m, d) = (num(0..4), num(5..7), num(8..10));
    let secs_of_day = num(11..13) * 3600 + num(14..16) * 60 + num(17..19);

    let y = if m <= 2 { y - 1 } else { y };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let doy = (153 * ((m + 9) % 12) + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    let days = era * 146_097 + doe - 719_468;
    (days * 86_400 + secs_of_day) * 1_000_000_000
}

fn timestamps(trips: &[TaxiTrip], f: impl Fn(&TaxiTrip) -> &str) -> ArrayRef {
    let nanos: Vec<i64> = trips.iter().map(|t| epoch_nanos(f(t))).collect();
    Arc::new(TimestampNanosecondArray::from(nanos))
}

fn floats(trips: &[TaxiTrip], f: impl Fn(&TaxiTrip) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from(trips.iter().map(f).collect::<Vec<_>>()))
}

fn texts<'a>(trips: &'a [TaxiTrip], f: impl Fn(&'a TaxiTrip) -> Option<&'a str>) -> ArrayRef {
    Arc::new(trips.iter().map(f).collect::<StringArray>())
}

/// Pandas-style layout: `timestamp[ns]` pickups and a categorical `color`.
fn write_parquet_copy(trips: &[TaxiTrip]) -> tempfile::NamedTempFile {
    let timestamp = DataType::Timestamp(TimeUnit::Nanosecond, None);
    let category = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
    let color: DictionaryArray<Int32Type> = trips.iter().map(|t| t.color.as_str()).collect();

    let columns: Vec<(&str, DataType, ArrayRef)> = vec![
        ("pickup", timestamp.clone(), timestamps(trips, |t| t.pickup.as_str())),
        ("dropoff", timestamp, timestamps(trips, |t| t.dropoff.as_str())),
        (
            "passengers",
            DataType::Int64,
            Arc::new(Int64Array::from(trips.iter().map(|t| t.passengers).collect::<Vec<_>>())),
        ),
        ("distance", DataType::Float64, floats(trips, |t| t.distance)),
        ("fare", DataType::Float64, floats(trips, |t| t.fare)),
        ("tip", DataType::Float64, floats(trips, |t| t.tip)),
        ("tolls", DataType::Float64, floats(trips, |t| t.tolls)),
        ("total", DataType::Float64, floats(trips, |t| t.total)),
        ("color", category, Arc::new(color)),
        ("payment", DataType::Utf8, texts(trips, |t| t.payment.as_deref())),
        ("pickup_zone", DataType::Utf8, texts(trips, |t| t.pickup_zone.as_deref())),
        ("dropoff_zone", DataType::Utf8, texts(trips, |t| t.dropoff_zone.as_deref())),
        ("pickup_borough", DataType::Utf8, texts(trips, |t| t.pickup_borough.as_deref())),
        ("dropoff_borough", DataType::Utf8, texts(trips, |t| t.dropoff_borough.as_deref())),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, ty, _)| Field::new(*name, ty.clone(), true))
            .collect::<Vec<_>>(),
    ));
    let arrays = columns.into_iter().map(|(_, _, arr)| arr).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    file
}

#[test]
fn epoch_helper_matches_known_instant() {
    // 2019-03-01T00:00:00Z
    assert_eq!(epoch_nanos("2019-03-01 00:00:00"), 1_551_398_400_000_000_000);
}

#[test]
fn parquet_copy_loads_the_same_trips() {
    let ds = load_fixture();
    let file = write_parquet_copy(&ds.trips);

    let from_parquet = load_file(file.path()).unwrap();
    assert_eq!(from_parquet.trips[0].pickup, "2019-03-23 20:21:09");
    assert_eq!(from_parquet.trips, ds.trips);
    assert_eq!(from_parquet.colors, ds.colors);
}
