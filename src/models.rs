use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Year-indexed values of one metric. Missing years are absent keys.
pub type Series = BTreeMap<i32, f64>;

/// The four fixed metrics of the electricity dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SelfSufficiencyRate,
    NetGeneration,
    NetConsumption,
    Imports,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::SelfSufficiencyRate,
        Metric::NetGeneration,
        Metric::NetConsumption,
        Metric::Imports,
    ];

    /// Field name used by the metrics dataset.
    pub fn id(self) -> &'static str {
        match self {
            Metric::SelfSufficiencyRate => "self_sufficiency_rate",
            Metric::NetGeneration => "net_generation",
            Metric::NetConsumption => "net_consumption",
            Metric::Imports => "imports",
        }
    }

    /// Human label with unit, as shown in legends and tooltips.
    pub fn label(self) -> &'static str {
        match self {
            Metric::SelfSufficiencyRate => "Self-Sufficiency Rate (%)",
            Metric::NetGeneration => "Net Generation (TWh)",
            Metric::NetConsumption => "Net Consumption (TWh)",
            Metric::Imports => "Electricity Imports (TWh)",
        }
    }

    pub fn is_percentage(self) -> bool {
        matches!(self, Metric::SelfSufficiencyRate)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        Metric::ALL
            .into_iter()
            .find(|m| m.id() == norm)
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

/// Normalization used by the sequential color scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    #[default]
    Linear,
    /// Log-space normalization; falls back to linear when the domain is not strictly positive.
    Log,
}

/// One country of the metrics dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    #[serde(default)]
    pub self_sufficiency_rate: Series,
    #[serde(default)]
    pub net_generation: Series,
    #[serde(default)]
    pub net_consumption: Series,
    #[serde(default)]
    pub imports: Series,
}

impl CountryRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder used by loaders and tests. Non-finite values are dropped.
    pub fn with(mut self, metric: Metric, values: &[(i32, f64)]) -> Self {
        for &(year, value) in values {
            self.insert(metric, year, value);
        }
        self
    }

    /// Store a value; NaN and infinities mean "no data" and are not stored.
    pub fn insert(&mut self, metric: Metric, year: i32, value: f64) {
        if value.is_finite() {
            self.series_mut(metric).insert(year, value);
        }
    }

    pub fn series(&self, metric: Metric) -> &Series {
        match metric {
            Metric::SelfSufficiencyRate => &self.self_sufficiency_rate,
            Metric::NetGeneration => &self.net_generation,
            Metric::NetConsumption => &self.net_consumption,
            Metric::Imports => &self.imports,
        }
    }

    fn series_mut(&mut self, metric: Metric) -> &mut Series {
        match metric {
            Metric::SelfSufficiencyRate => &mut self.self_sufficiency_rate,
            Metric::NetGeneration => &mut self.net_generation,
            Metric::NetConsumption => &mut self.net_consumption,
            Metric::Imports => &mut self.imports,
        }
    }

    /// Value for `metric` in `year`, or `None` when absent or not a finite number.
    pub fn value(&self, metric: Metric, year: i32) -> Option<f64> {
        self.series(metric)
            .get(&year)
            .copied()
            .filter(|v| v.is_finite())
    }
}

/// One closed ring of (longitude, latitude) degrees.
pub type Ring = Vec<(f64, f64)>;

/// A map region: display name plus polygons. The first ring of each polygon is the exterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographyFeature {
    pub name: String,
    pub polygons: Vec<Vec<Ring>>,
}

impl GeographyFeature {
    pub fn new(name: impl Into<String>, polygons: Vec<Vec<Ring>>) -> Self {
        Self {
            name: name.into(),
            polygons,
        }
    }
}

/// Dashboard controls. Owned by the controller, read by every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub year: i32,
    pub metric: Metric,
    pub scale: ScaleType,
    pub show_all: bool,
}

pub const DEFAULT_YEAR: i32 = 2018;

impl Default for UiState {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            metric: Metric::SelfSufficiencyRate,
            scale: ScaleType::Linear,
            show_all: false,
        }
    }
}
