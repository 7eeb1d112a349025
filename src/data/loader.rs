use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::compute::{cast, cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use arrow::util::display::FormatOptions;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{Column, TaxiDataset, TaxiTrip};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a taxi dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the seaborn `taxis` column names
/// * `.json`    – `[{ "pickup": ..., "total": ..., ... }, ...]`
/// * `.parquet` – any column types Arrow can cast to numbers / text
pub fn load_file(path: &Path) -> Result<TaxiDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let trips = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DashboardError::unsupported_format(other)),
    };

    if trips.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }
    Ok(TaxiDataset::from_trips(trips))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one trip per line.
/// Empty cells in the nullable text columns become `None`.
fn load_csv(path: &Path) -> Result<Vec<TaxiTrip>> {
    let file = std::fs::File::open(path).map_err(|e| DashboardError::file_open(path, e))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    for column in Column::REQUIRED {
        if !headers.iter().any(|h| h == column.name()) {
            return Err(DashboardError::missing_column(column.name()));
        }
    }

    reader
        .deserialize::<TaxiTrip>()
        .enumerate()
        .map(|(row, result)| {
            result.map_err(|e| DashboardError::invalid_row(row, e.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "pickup": "2019-03-23 20:21:09",
///     "passengers": 1,
///     "distance": 1.6,
///     "tip": 2.15,
///     "total": 12.95,
///     "color": "yellow",
///     "payment": "credit card"
///   },
///   ...
/// ]
/// ```
///
/// Timestamps written as epoch milliseconds are kept as their decimal text.
fn load_json(path: &Path) -> Result<Vec<TaxiTrip>> {
    let text = std::fs::read_to_string(path).map_err(|e| DashboardError::file_open(path, e))?;
    let records: Vec<JsonValue> = serde_json::from_str(&text)?;

    records
        .iter()
        .enumerate()
        .map(|(row, rec)| {
            let obj = rec
                .as_object()
                .ok_or_else(|| DashboardError::invalid_row(row, "not a JSON object"))?;
            json_to_trip(obj, row)
        })
        .collect()
}

fn json_to_trip(obj: &Map<String, JsonValue>, row: usize) -> Result<TaxiTrip> {
    Ok(TaxiTrip {
        pickup: json_text(obj, Column::Pickup).unwrap_or_default(),
        dropoff: json_text(obj, Column::Dropoff).unwrap_or_default(),
        passengers: json_i64(obj, Column::Passengers, row)?,
        distance: json_f64(obj, Column::Distance, row)?,
        fare: json_f64(obj, Column::Fare, row).unwrap_or(0.0),
        tip: json_f64(obj, Column::Tip, row)?,
        tolls: json_f64(obj, Column::Tolls, row).unwrap_or(0.0),
        total: json_f64(obj, Column::Total, row)?,
        color: json_text(obj, Column::Color)
            .ok_or_else(|| DashboardError::missing_column(Column::Color.name()))?,
        payment: json_text(obj, Column::Payment),
        pickup_zone: json_text(obj, Column::PickupZone),
        dropoff_zone: json_text(obj, Column::DropoffZone),
        pickup_borough: json_text(obj, Column::PickupBorough),
        dropoff_borough: json_text(obj, Column::DropoffBorough),
    })
}

fn json_f64(obj: &Map<String, JsonValue>, column: Column, row: usize) -> Result<f64> {
    match obj.get(column.name()) {
        None => Err(DashboardError::missing_column(column.name())),
        Some(v) => v
            .as_f64()
            .ok_or_else(|| DashboardError::invalid_row(row, format!("'{column}' is not a number"))),
    }
}

fn json_i64(obj: &Map<String, JsonValue>, column: Column, row: usize) -> Result<i64> {
    match obj.get(column.name()) {
        None => Err(DashboardError::missing_column(column.name())),
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| {
                DashboardError::invalid_row(row, format!("'{column}' is not an integer"))
            }),
    }
}

fn json_text(obj: &Map<String, JsonValue>, column: Column) -> Option<String> {
    match obj.get(column.name())? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing taxi trips.
///
/// Columns are located by name and cast through Arrow, so Int32/Int64/Float
/// numerics and Utf8/LargeUtf8/Timestamp/Dictionary text columns all work.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<TaxiTrip>> {
    let file = std::fs::File::open(path).map_err(|e| DashboardError::file_open(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut trips = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        append_batch(&batch, &mut trips)?;
    }
    Ok(trips)
}

fn append_batch(batch: &RecordBatch, trips: &mut Vec<TaxiTrip>) -> Result<()> {
    let passengers = int_column(batch, Column::Passengers)?;
    let distance = float_column(batch, Column::Distance)?;
    let tip = float_column(batch, Column::Tip)?;
    let total = float_column(batch, Column::Total)?;
    let color = text_column(batch, Column::Color)?
        .ok_or_else(|| DashboardError::missing_column(Column::Color.name()))?;

    let fare = optional_float_column(batch, Column::Fare)?;
    let tolls = optional_float_column(batch, Column::Tolls)?;
    let pickup = text_column(batch, Column::Pickup)?;
    let dropoff = text_column(batch, Column::Dropoff)?;
    let payment = text_column(batch, Column::Payment)?;
    let pickup_zone = text_column(batch, Column::PickupZone)?;
    let dropoff_zone = text_column(batch, Column::DropoffZone)?;
    let pickup_borough = text_column(batch, Column::PickupBorough)?;
    let dropoff_borough = text_column(batch, Column::DropoffBorough)?;

    let offset = trips.len();
    for i in 0..batch.num_rows() {
        let row = offset + i;
        let required_text = |arr: &StringArray, column: Column| -> Result<String> {
            if arr.is_null(i) {
                return Err(DashboardError::invalid_row(row, format!("'{column}' is null")));
            }
            Ok(arr.value(i).to_string())
        };

        trips.push(TaxiTrip {
            pickup: text_at(pickup.as_ref(), i).unwrap_or_default(),
            dropoff: text_at(dropoff.as_ref(), i).unwrap_or_default(),
            passengers: required_int(&passengers, i, row, Column::Passengers)?,
            distance: required_float(&distance, i, row, Column::Distance)?,
            fare: float_at(fare.as_ref(), i),
            tip: required_float(&tip, i, row, Column::Tip)?,
            tolls: float_at(tolls.as_ref(), i),
            total: required_float(&total, i, row, Column::Total)?,
            color: required_text(&color, Column::Color)?,
            payment: text_at(payment.as_ref(), i),
            pickup_zone: text_at(pickup_zone.as_ref(), i),
            dropoff_zone: text_at(dropoff_zone.as_ref(), i),
            pickup_borough: text_at(pickup_borough.as_ref(), i),
            dropoff_borough: text_at(dropoff_borough.as_ref(), i),
        });
    }
    Ok(())
}

// -- Parquet / Arrow helpers --

/// Timestamps render the way the CSV export writes them.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TEXT_CAST: CastOptions<'static> = CastOptions {
    safe: true,
    format_options: FormatOptions::new()
        .with_timestamp_format(Some(TIMESTAMP_FORMAT))
        .with_timestamp_tz_format(Some(TIMESTAMP_FORMAT)),
};

fn required_column(batch: &RecordBatch, column: Column) -> Result<&ArrayRef> {
    batch
        .column_by_name(column.name())
        .ok_or_else(|| DashboardError::missing_column(column.name()))
}

fn float_column(batch: &RecordBatch, column: Column) -> Result<Float64Array> {
    let arr = cast(required_column(batch, column)?, &DataType::Float64)?;
    Ok(arr.as_primitive::<Float64Type>().clone())
}

fn optional_float_column(batch: &RecordBatch, column: Column) -> Result<Option<Float64Array>> {
    match batch.column_by_name(column.name()) {
        Some(col) => Ok(Some(cast(col, &DataType::Float64)?.as_primitive::<Float64Type>().clone())),
        None => Ok(None),
    }
}

fn int_column(batch: &RecordBatch, column: Column) -> Result<Int64Array> {
    let arr = cast(required_column(batch, column)?, &DataType::Int64)?;
    Ok(arr.as_primitive::<Int64Type>().clone())
}

/// Text columns are optional here; callers decide whether absence is fatal.
fn text_column(batch: &RecordBatch, column: Column) -> Result<Option<StringArray>> {
    match batch.column_by_name(column.name()) {
        Some(col) => Ok(Some(
            cast_with_options(col, &DataType::Utf8, &TEXT_CAST)?
                .as_string::<i32>()
                .clone(),
        )),
        None => Ok(None),
    }
}

fn required_float(arr: &Float64Array, i: usize, row: usize, column: Column) -> Result<f64> {
    if arr.is_null(i) {
        return Err(DashboardError::invalid_row(row, format!("'{column}' is null")));
    }
    Ok(arr.value(i))
}

fn required_int(arr: &Int64Array, i: usize, row: usize, column: Column) -> Result<i64> {
    if arr.is_null(i) {
        return Err(DashboardError::invalid_row(row, format!("'{column}' is null")));
    }
    Ok(arr.value(i))
}

fn float_at(arr: Option<&Float64Array>, i: usize) -> f64 {
    match arr {
        Some(a) if !a.is_null(i) => a.value(i),
        _ => 0.0,
    }
}

fn text_at(arr: Option<&StringArray>, i: usize) -> Option<String> {
    match arr {
        Some(a) if !a.is_null(i) => Some(a.value(i).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CSV: &str = "\
pickup,dropoff,passengers,distance,fare,tip,tolls,total,color,payment,pickup_zone,dropoff_zone,pickup_borough,dropoff_borough
2019-03-23 20:21:09,2019-03-23 20:27:24,1,1.6,7.0,2.15,0.0,12.95,yellow,credit card,Lenox Hill West,UN/Turtle Bay South,Manhattan,Manhattan
2019-03-04 16:11:55,2019-03-04 16:19:00,1,0.79,5.0,0.0,0.0,9.3,green,cash,,,Queens,
";

    fn write_temp(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_rows_deserialize_with_nullable_text() {
        let file = write_temp(".csv", CSV.as_bytes());
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        let second = &ds.trips[1];
        assert_eq!(second.color, "green");
        assert_eq!(second.pickup_zone, None);
        assert_eq!(second.pickup_borough.as_deref(), Some("Queens"));
        assert_eq!(second.dropoff_borough, None);
        assert!((second.total - 9.3).abs() < 1e-12);
    }

    #[test]
    fn csv_without_required_column_is_rejected() {
        let file = write_temp(".csv", b"passengers,distance,total,color\n1,1.0,10.0,yellow\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn { ref column } if column == "tip"));
    }

    #[test]
    fn csv_with_header_only_is_empty() {
        let file = write_temp(".csv", b"passengers,distance,tip,total,color\n");
        assert!(matches!(load_file(file.path()), Err(DashboardError::EmptyDataset)));
    }

    #[test]
    fn csv_bad_number_reports_row() {
        let file = write_temp(
            ".csv",
            b"passengers,distance,tip,total,color\n1,1.0,0.5,10.0,yellow\n1,abc,0.5,10.0,green\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRow { row: 1, .. }));
    }

    #[test]
    fn json_records_accept_numeric_timestamps() {
        let json = r#"[
            {"pickup": 1553372469000, "passengers": 2.0, "distance": 1.6, "tip": 2.15,
             "total": 12.95, "color": "yellow", "payment": null}
        ]"#;
        let file = write_temp(".json", json.as_bytes());
        let ds = load_file(file.path()).unwrap();
        let trip = &ds.trips[0];
        assert_eq!(trip.pickup, "1553372469000");
        assert_eq!(trip.passengers, 2);
        assert_eq!(trip.payment, None);
        assert_eq!(trip.fare, 0.0);
    }

    #[test]
    fn json_missing_total_is_rejected() {
        let json = r#"[{"passengers": 1, "distance": 1.0, "tip": 0.0, "color": "green"}]"#;
        let file = write_temp(".json", json.as_bytes());
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn { ref column } if column == "total"));
    }

    #[test]
    fn parquet_columns_are_cast_by_name() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("passengers", DataType::Int64, false),
            Field::new("distance", DataType::Float64, false),
            Field::new("tip", DataType::Float64, false),
            Field::new("total", DataType::Float64, false),
            Field::new("color", DataType::Utf8, false),
            Field::new("payment", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 3])),
                Arc::new(Float64Array::from(vec![1.6, 4.2])),
                Arc::new(Float64Array::from(vec![2.15, 0.0])),
                Arc::new(Float64Array::from(vec![12.95, 17.8])),
                Arc::new(StringArray::from(vec!["yellow", "green"])),
                Arc::new(StringArray::from(vec![Some("credit card"), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.trips[1].passengers, 3);
        assert_eq!(ds.trips[1].payment, None);
        assert_eq!(ds.trips[0].payment.as_deref(), Some("credit card"));
        assert_eq!(ds.trips[0].pickup, "");
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let file = write_temp(".xlsx", b"");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::UnsupportedFormat { ref extension } if extension == "xlsx"));
    }
}
