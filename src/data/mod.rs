/// Data layer: core types, loading, caching and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TaxiDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one Arc<TaxiDataset> per path
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  quantiles, bins, KDE, fits → charts
///   └──────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
pub mod stats;
