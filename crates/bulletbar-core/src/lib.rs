#![forbid(unsafe_code)]

//! Record model and aggregation for stacked-bar bullet charts (headless).
//!
//! The pipeline is:
//! - validate loosely-typed host rows into [`Record`]s
//! - pick the first category and normalize its counts into [`Segment`]s summing to 100%
//!
//! Layout and drawing live in `bulletbar-render`.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod record;

pub use aggregate::{Aggregation, Segment, aggregate, rebalance, round_percent, summarize};
pub use config::{ChartConfig, DEFAULT_PALETTE, default_chart_config};
pub use error::{Error, Result};
pub use record::{Record, categories, records_from_json, records_from_value, total_counts};
