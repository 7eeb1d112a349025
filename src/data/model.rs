use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CellValue – a single cell in the preview table
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell mirroring the dtypes of the taxis table.
/// Used as a `BTreeMap` key downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<Option<&str>> for CellValue {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => CellValue::Text(s.to_string()),
            None => CellValue::Null,
        }
    }
}

// ---------------------------------------------------------------------------
// TaxiTrip – one row of the dataset
// ---------------------------------------------------------------------------

/// A single taxi trip (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxiTrip {
    #[serde(default)]
    pub pickup: String,
    #[serde(default)]
    pub dropoff: String,
    pub passengers: i64,
    pub distance: f64,
    #[serde(default)]
    pub fare: f64,
    pub tip: f64,
    #[serde(default)]
    pub tolls: f64,
    pub total: f64,
    /// Vehicle color category ("yellow" / "green").
    pub color: String,
    #[serde(default)]
    pub payment: Option<String>,
    #[serde(default)]
    pub pickup_zone: Option<String>,
    #[serde(default)]
    pub dropoff_zone: Option<String>,
    #[serde(default)]
    pub pickup_borough: Option<String>,
    #[serde(default)]
    pub dropoff_borough: Option<String>,
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Every column of the taxis table, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Pickup,
    Dropoff,
    Passengers,
    Distance,
    Fare,
    Tip,
    Tolls,
    Total,
    Color,
    Payment,
    PickupZone,
    DropoffZone,
    PickupBorough,
    DropoffBorough,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Pickup,
        Column::Dropoff,
        Column::Passengers,
        Column::Distance,
        Column::Fare,
        Column::Tip,
        Column::Tolls,
        Column::Total,
        Column::Color,
        Column::Payment,
        Column::PickupZone,
        Column::DropoffZone,
        Column::PickupBorough,
        Column::DropoffBorough,
    ];

    /// Columns without which no chart can be drawn.
    pub const REQUIRED: [Column; 5] = [
        Column::Passengers,
        Column::Distance,
        Column::Tip,
        Column::Total,
        Column::Color,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Pickup => "pickup",
            Column::Dropoff => "dropoff",
            Column::Passengers => "passengers",
            Column::Distance => "distance",
            Column::Fare => "fare",
            Column::Tip => "tip",
            Column::Tolls => "tolls",
            Column::Total => "total",
            Column::Color => "color",
            Column::Payment => "payment",
            Column::PickupZone => "pickup_zone",
            Column::DropoffZone => "dropoff_zone",
            Column::PickupBorough => "pickup_borough",
            Column::DropoffBorough => "dropoff_borough",
        }
    }

    /// Read this column out of a trip.
    pub fn cell(self, trip: &TaxiTrip) -> CellValue {
        match self {
            Column::Pickup => CellValue::Text(trip.pickup.clone()),
            Column::Dropoff => CellValue::Text(trip.dropoff.clone()),
            Column::Passengers => CellValue::Integer(trip.passengers),
            Column::Distance => CellValue::Float(trip.distance),
            Column::Fare => CellValue::Float(trip.fare),
            Column::Tip => CellValue::Float(trip.tip),
            Column::Tolls => CellValue::Float(trip.tolls),
            Column::Total => CellValue::Float(trip.total),
            Column::Color => CellValue::Text(trip.color.clone()),
            Column::Payment => trip.payment.as_deref().into(),
            Column::PickupZone => trip.pickup_zone.as_deref().into(),
            Column::DropoffZone => trip.dropoff_zone.as_deref().into(),
            Column::PickupBorough => trip.pickup_borough.as_deref().into(),
            Column::DropoffBorough => trip.dropoff_borough.as_deref().into(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The numeric columns, i.e. those a `describe()` table summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericColumn {
    Passengers,
    Distance,
    Fare,
    Tip,
    Tolls,
    Total,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 6] = [
        NumericColumn::Passengers,
        NumericColumn::Distance,
        NumericColumn::Fare,
        NumericColumn::Tip,
        NumericColumn::Tolls,
        NumericColumn::Total,
    ];

    pub fn column(self) -> Column {
        match self {
            NumericColumn::Passengers => Column::Passengers,
            NumericColumn::Distance => Column::Distance,
            NumericColumn::Fare => Column::Fare,
            NumericColumn::Tip => Column::Tip,
            NumericColumn::Tolls => Column::Tolls,
            NumericColumn::Total => Column::Total,
        }
    }

    pub fn name(self) -> &'static str {
        self.column().name()
    }

    pub fn value(self, trip: &TaxiTrip) -> f64 {
        match self {
            NumericColumn::Passengers => trip.passengers as f64,
            NumericColumn::Distance => trip.distance,
            NumericColumn::Fare => trip.fare,
            NumericColumn::Tip => trip.tip,
            NumericColumn::Tolls => trip.tolls,
            NumericColumn::Total => trip.total,
        }
    }

    /// The whole column as a vector, in row order.
    pub fn values(self, dataset: &TaxiDataset) -> Vec<f64> {
        dataset.trips.iter().map(|t| self.value(t)).collect()
    }
}

// ---------------------------------------------------------------------------
// TaxiDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with the color categories pre-collected.
#[derive(Debug, Clone)]
pub struct TaxiDataset {
    /// All trips (rows), in file order.
    pub trips: Vec<TaxiTrip>,
    /// Unique values of the `color` column in order of first appearance.
    pub colors: Vec<String>,
}

impl TaxiDataset {
    /// Build the category index from the loaded trips.
    pub fn from_trips(trips: Vec<TaxiTrip>) -> Self {
        let mut colors: Vec<String> = Vec::new();
        for trip in &trips {
            if !colors.contains(&trip.color) {
                colors.push(trip.color.clone());
            }
        }
        TaxiDataset { trips, colors }
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// The first `n` rows rendered as cells, every column in source order.
    pub fn head(&self, n: usize) -> Vec<Vec<CellValue>> {
        self.trips
            .iter()
            .take(n)
            .map(|trip| Column::ALL.iter().map(|c| c.cell(trip)).collect())
            .collect()
    }

    /// Trips belonging to one color category.
    pub fn trips_with_color<'a>(&'a self, color: &'a str) -> impl Iterator<Item = &'a TaxiTrip> + 'a {
        self.trips.iter().filter(move |t| t.color == color)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn trip(color: &str, passengers: i64, distance: f64, tip: f64, total: f64) -> TaxiTrip {
        TaxiTrip {
            pickup: "2019-03-23 20:21:09".to_string(),
            dropoff: "2019-03-23 20:27:24".to_string(),
            passengers,
            distance,
            fare: total - tip,
            tip,
            tolls: 0.0,
            total,
            color: color.to_string(),
            payment: Some("credit card".to_string()),
            pickup_zone: None,
            dropoff_zone: None,
            pickup_borough: Some("Manhattan".to_string()),
            dropoff_borough: Some("Manhattan".to_string()),
        }
    }

    #[test]
    fn cell_values_sort_by_kind_then_value() {
        let mut cells = vec![
            CellValue::Text("b".into()),
            CellValue::Float(2.5),
            CellValue::Null,
            CellValue::Integer(3),
            CellValue::Text("a".into()),
            CellValue::Integer(1),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                CellValue::Null,
                CellValue::Integer(1),
                CellValue::Integer(3),
                CellValue::Float(2.5),
                CellValue::Text("a".into()),
                CellValue::Text("b".into()),
            ]
        );
    }

    #[test]
    fn floats_display_with_two_decimals() {
        assert_eq!(CellValue::Float(12.0).to_string(), "12.00");
        assert_eq!(CellValue::Null.to_string(), "<null>");
    }

    #[test]
    fn head_renders_every_column() {
        let ds = TaxiDataset::from_trips(vec![
            trip("yellow", 1, 1.6, 2.15, 12.95),
            trip("green", 2, 0.8, 0.0, 5.8),
        ]);
        let head = ds.head(5);
        assert_eq!(head.len(), 2);
        assert_eq!(head[0].len(), Column::ALL.len());
        assert_eq!(head[1][Column::ALL.iter().position(|c| *c == Column::Color).unwrap()],
            CellValue::Text("green".into()));
        assert_eq!(head[0][9], CellValue::Text("credit card".into()));
        assert_eq!(head[0][10], CellValue::Null);
    }

    #[test]
    fn colors_keep_first_appearance_order() {
        let ds = TaxiDataset::from_trips(vec![
            trip("yellow", 1, 1.0, 1.0, 10.0),
            trip("green", 1, 1.0, 1.0, 10.0),
            trip("yellow", 1, 1.0, 1.0, 10.0),
        ]);
        assert_eq!(ds.colors, vec!["yellow".to_string(), "green".to_string()]);
        assert_eq!(ds.trips_with_color("yellow").count(), 2);
    }

    #[test]
    fn numeric_column_values_follow_row_order() {
        let ds = TaxiDataset::from_trips(vec![
            trip("yellow", 3, 1.0, 1.5, 10.0),
            trip("green", 1, 2.0, 0.5, 20.0),
        ]);
        assert_eq!(NumericColumn::Passengers.values(&ds), vec![3.0, 1.0]);
        assert_eq!(NumericColumn::Total.values(&ds), vec![10.0, 20.0]);
        assert_eq!(NumericColumn::Fare.values(&ds), vec![8.5, 19.5]);
    }
}
