//! elecmap
//!
//! A Rust library for exploring country-level electricity self-sufficiency: a world
//! choropleth of one metric for one year, a ranked consumption/generation/imports bar
//! chart, and a country detail panel, kept in sync by a single interaction controller.
//! Pairs with the `elecmap` CLI and the `elecmap-gui` desktop viewer.
//!
//! ### Features
//! - Load a per-country metrics dataset (JSON or tidy CSV) and GeoJSON country shapes
//! - Resolve geography names to dataset records through an alias table
//! - Diverging break-even color scale for self-sufficiency, sequential Blues otherwise
//! - Ranked bar layout with Top-N truncation and a show-all toggle
//! - Render the whole dashboard to SVG or PNG
//!
//! ### Example
//! ```no_run
//! use elecmap::{Dashboard, DashboardConfig, Dataset, Event, Metric};
//!
//! let config = DashboardConfig::default();
//! let records = elecmap::storage::load_dataset("countries.json")?;
//! let features = elecmap::storage::load_geography("world.geojson")?;
//! let dataset = Dataset::with_aliases(records, config.alias_table());
//!
//! let mut dashboard = Dashboard::new(dataset, &features, config);
//! dashboard.handle(Event::YearChanged(2010));
//! dashboard.handle(Event::MetricChanged(Metric::NetGeneration));
//! elecmap::viz::render_dashboard(&dashboard, "dashboard.svg")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod choropleth;
pub mod color;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod detail;
pub mod error;
pub mod format;
pub mod legend;
pub mod models;
pub mod projection;
pub mod ranking;
pub mod stats;
pub mod storage;
pub mod ticks;
pub mod viz;

pub use color::{ColorScale, Rgb8};
pub use config::DashboardConfig;
pub use controller::{Dashboard, DashboardScene, Event, Redraw};
pub use dataset::{AliasTable, Dataset};
pub use error::{Error, Result};
pub use models::{CountryRecord, GeographyFeature, Metric, ScaleType, UiState};
