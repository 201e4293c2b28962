//! Dashboard configuration. Every field has a default; a TOML file may override any of them.
//!
//! ```toml
//! default_year = 2015
//! locale = "de"
//!
//! [bars]
//! top_n = 20
//!
//! [[aliases]]
//! from = "Czechia"
//! to = "Czech Republic"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dataset::{AliasTable, default_aliases};
use crate::error::{Error, Result};
use crate::models::DEFAULT_YEAR;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_year: i32,
    /// Locale tag for number formatting (`en`, `de`, ...).
    pub locale: String,
    /// Duration of choropleth fill transitions.
    pub transition_ms: u64,
    /// TTF used for text in PNG output. SVG output does not need it.
    pub font_path: Option<PathBuf>,
    pub map: MapLayout,
    pub legend: LegendLayout,
    pub bars: BarLayout,
    /// Extra geography→metrics name pairs, applied over the built-in table.
    pub aliases: Vec<AliasEntry>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_year: DEFAULT_YEAR,
            locale: "en".to_string(),
            transition_ms: 50,
            font_path: None,
            map: MapLayout::default(),
            legend: LegendLayout::default(),
            bars: BarLayout::default(),
            aliases: Vec::new(),
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Built-in alias table plus configured entries.
    pub fn alias_table(&self) -> AliasTable {
        let mut table = default_aliases();
        table.extend(self.aliases.iter().map(|a| (a.from.clone(), a.to.clone())));
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub from: String,
    pub to: String,
}

/// Projection target size of the world map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapLayout {
    pub width: u32,
    pub height: u32,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            width: 960,
            height: 500,
        }
    }
}

/// Gradient legend box, anchored to the map's upper right corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendLayout {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for LegendLayout {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 15.0,
            margin: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Ranked bar chart container and sizing rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarLayout {
    pub width: f64,
    pub height: f64,
    /// Subtracted from both container dimensions.
    pub padding: f64,
    pub margin: Margins,
    pub min_bar_height: f64,
    pub max_bar_height: f64,
    /// Upper bound on row labels, regardless of row count.
    pub max_labels: usize,
    /// Rows shown while "show all" is off.
    pub top_n: usize,
}

impl Default for BarLayout {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 420.0,
            padding: 16.0,
            margin: Margins {
                top: 10.0,
                right: 120.0,
                bottom: 50.0,
                left: 120.0,
            },
            min_bar_height: 2.0,
            max_bar_height: 8.0,
            max_labels: 50,
            top_n: 30,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        BarLayout::default().margin
    }
}
