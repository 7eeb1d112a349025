//! Taxi Dashboard - an egui dashboard over the seaborn `taxis` trip records.
//!
//! The dataset is loaded once, every chart is precomputed into a
//! [`charts::Dashboard`], and a sidebar switches between five fixed pages:
//! Overview, Distribution, Relationships, Categorical Analysis and
//! Interactive Charts.
//!
//! # Example
//!
//! ```ignore
//! use taxi_dashboard::{charts::Dashboard, data::loader::load_file};
//! use std::path::Path;
//!
//! let dataset = load_file(Path::new("taxis.csv"))?;
//! let dashboard = Dashboard::build(&dataset);
//! println!("{} trips, fare histogram has {} bins",
//!     dashboard.rows, dashboard.distribution.total_histogram.counts.len());
//! ```

#![deny(unsafe_code)]

pub mod app;
pub mod charts;
pub mod color;
pub mod data;
pub mod error;
pub mod page;
pub mod state;
pub mod ui;

pub use error::{DashboardError, Result};
