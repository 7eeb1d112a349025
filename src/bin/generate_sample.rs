use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use taxi_dashboard::data::model::TaxiTrip;

/// Write a synthetic dataset shaped like seaborn's `taxis` table.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file; the extension picks the format (.csv or .parquet)
    out: PathBuf,

    /// Number of trips
    #[arg(long, default_value_t = 6433)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Index drawn according to `weights`.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut r = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if r < *w {
                return i;
            }
            r -= w;
        }
        weights.len() - 1
    }
}

const PASSENGERS: [(i64, f64); 7] = [
    (0, 0.01),
    (1, 0.70),
    (2, 0.15),
    (3, 0.04),
    (4, 0.02),
    (5, 0.05),
    (6, 0.03),
];

const ZONES: [(&str, &str); 8] = [
    ("Midtown Center", "Manhattan"),
    ("Upper East Side North", "Manhattan"),
    ("Lenox Hill West", "Manhattan"),
    ("Times Sq/Theatre District", "Manhattan"),
    ("Astoria", "Queens"),
    ("JFK Airport", "Queens"),
    ("Williamsburg (North Side)", "Brooklyn"),
    ("Mott Haven/Port Morris", "Bronx"),
];

const MARCH_2019_SECONDS: f64 = 31.0 * 86_400.0;

/// `YYYY-MM-DD HH:MM:SS` for an offset from 2019-03-01 00:00:00.
fn timestamp(offset_secs: u64) -> String {
    let days = offset_secs / 86_400;
    let (month, day) = if days < 31 { (3, days + 1) } else { (4, days - 30) };
    let rem = offset_secs % 86_400;
    format!(
        "2019-{month:02}-{day:02} {:02}:{:02}:{:02}",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate_trip(rng: &mut SimpleRng) -> TaxiTrip {
    let green = rng.next_f64() < 0.15;
    let color = if green { "green" } else { "yellow" };

    let passenger_weights: Vec<f64> = PASSENGERS.iter().map(|p| p.1).collect();
    let passengers = PASSENGERS[rng.weighted(&passenger_weights)].0;

    let distance = round2(rng.gauss(if green { 0.9 } else { 0.5 }, 0.8).exp().min(36.0));
    let fare = ((2.5 + 2.6 * distance + rng.gauss(0.0, 1.5)).max(2.5) * 2.0).round() / 2.0;

    let payment = match rng.weighted(&[0.70, 0.29, 0.01]) {
        0 => Some("credit card"),
        1 => Some("cash"),
        _ => None,
    };
    let tip = match payment {
        Some("credit card") => round2(fare * rng.uniform(0.12, 0.28)),
        _ => 0.0,
    };
    let tolls = if rng.next_f64() < 0.05 { 5.76 } else { 0.0 };
    let surcharge = if green { 0.8 } else { 3.3 };
    let total = round2(fare + tip + tolls + surcharge);

    let pickup_offset = rng.uniform(0.0, MARCH_2019_SECONDS) as u64;
    let minutes = (distance * rng.uniform(2.5, 5.0)).max(1.0);
    let dropoff_offset = pickup_offset + (minutes * 60.0) as u64;

    let zone = |rng: &mut SimpleRng| {
        if rng.next_f64() < 0.02 {
            (None, None)
        } else {
            let (z, b) = ZONES[(rng.next_u64() % ZONES.len() as u64) as usize];
            (Some(z.to_string()), Some(b.to_string()))
        }
    };
    let (pickup_zone, pickup_borough) = zone(rng);
    let (dropoff_zone, dropoff_borough) = zone(rng);

    TaxiTrip {
        pickup: timestamp(pickup_offset),
        dropoff: timestamp(dropoff_offset),
        passengers,
        distance,
        fare,
        tip,
        tolls,
        total,
        color: color.to_string(),
        payment: payment.map(str::to_string),
        pickup_zone,
        dropoff_zone,
        pickup_borough,
        dropoff_borough,
    }
}

fn write_csv(path: &Path, trips: &[TaxiTrip]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for trip in trips {
        writer.serialize(trip).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn text_array<'a>(trips: &'a [TaxiTrip], f: impl Fn(&'a TaxiTrip) -> Option<&'a str>) -> ArrayRef {
    Arc::new(trips.iter().map(f).collect::<StringArray>())
}

fn float_array(trips: &[TaxiTrip], f: impl Fn(&TaxiTrip) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from(trips.iter().map(f).collect::<Vec<_>>()))
}

fn write_parquet(path: &Path, trips: &[TaxiTrip]) -> Result<()> {
    let passengers: ArrayRef = Arc::new(Int64Array::from(
        trips.iter().map(|t| t.passengers).collect::<Vec<_>>(),
    ));
    let columns: Vec<(&str, DataType, bool, ArrayRef)> = vec![
        ("pickup", DataType::Utf8, false, text_array(trips, |t| Some(t.pickup.as_str()))),
        ("dropoff", DataType::Utf8, false, text_array(trips, |t| Some(t.dropoff.as_str()))),
        ("passengers", DataType::Int64, false, passengers),
        ("distance", DataType::Float64, false, float_array(trips, |t| t.distance)),
        ("fare", DataType::Float64, false, float_array(trips, |t| t.fare)),
        ("tip", DataType::Float64, false, float_array(trips, |t| t.tip)),
        ("tolls", DataType::Float64, false, float_array(trips, |t| t.tolls)),
        ("total", DataType::Float64, false, float_array(trips, |t| t.total)),
        ("color", DataType::Utf8, false, text_array(trips, |t| Some(t.color.as_str()))),
        ("payment", DataType::Utf8, true, text_array(trips, |t| t.payment.as_deref())),
        ("pickup_zone", DataType::Utf8, true, text_array(trips, |t| t.pickup_zone.as_deref())),
        ("dropoff_zone", DataType::Utf8, true, text_array(trips, |t| t.dropoff_zone.as_deref())),
        ("pickup_borough", DataType::Utf8, true, text_array(trips, |t| t.pickup_borough.as_deref())),
        ("dropoff_borough", DataType::Utf8, true, text_array(trips, |t| t.dropoff_borough.as_deref())),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, ty, nullable, _)| Field::new(*name, ty.clone(), *nullable))
            .collect::<Vec<_>>(),
    ));
    let arrays = columns.into_iter().map(|(_, _, _, arr)| arr).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let trips: Vec<TaxiTrip> = (0..args.rows).map(|_| generate_trip(&mut rng)).collect();

    let ext = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&args.out, &trips)?,
        "parquet" | "pq" => write_parquet(&args.out, &trips)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} trips to {}", trips.len(), args.out.display());
    Ok(())
}
