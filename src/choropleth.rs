//! Per-region fills for the active metric and year.

use log::warn;
use serde::Serialize;
use std::time::Duration;

use crate::color::{ColorScale, NO_DATA, Rgb8};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::legend::{self, Legend};
use crate::models::{Metric, UiState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionFill {
    /// Geography display name.
    pub name: String,
    /// Canonical name of the resolved metrics record.
    pub record: Option<String>,
    pub value: Option<f64>,
    pub fill: Rgb8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethScene {
    pub metric: Metric,
    pub year: i32,
    /// One entry per region, in geography order.
    pub regions: Vec<RegionFill>,
    /// `None` when a sequential metric has no values for the year; the diverging legend is
    /// always present.
    pub legend: Option<Legend>,
    pub transition: Duration,
}

impl ChoroplethScene {
    pub fn region(&self, name: &str) -> Option<&RegionFill> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn fills(&self) -> Vec<Rgb8> {
        self.regions.iter().map(|r| r.fill).collect()
    }
}

/// Fill every region named in `region_names` for `state.metric` in `state.year`.
pub fn render<'a, I>(
    region_names: I,
    dataset: &Dataset,
    state: &UiState,
    map_width: f64,
    config: &DashboardConfig,
) -> ChoroplethScene
where
    I: IntoIterator<Item = &'a str>,
{
    let values = dataset.values(state.metric, state.year);
    let scale = ColorScale::for_metric(
        state.metric,
        state.scale,
        &values,
        dataset.global_max_self_sufficiency(),
    );
    if values.is_empty() {
        warn!("No data available for {} in {}", state.metric, state.year);
    }

    let regions = region_names
        .into_iter()
        .map(|name| {
            let record = dataset.resolve(name);
            let value = record.and_then(|r| r.value(state.metric, state.year));
            let fill = match (&scale, value) {
                (Some(s), Some(v)) => s.color(v),
                _ => NO_DATA,
            };
            RegionFill {
                name: name.to_string(),
                record: record.map(|r| r.name.clone()),
                value,
                fill,
            }
        })
        .collect();

    let legend = scale
        .as_ref()
        .map(|s| legend::build(s, state.metric, state.year, map_width, &config.legend));

    ChoroplethScene {
        metric: state.metric,
        year: state.year,
        regions,
        legend,
        transition: Duration::from_millis(config.transition_ms),
    }
}

/// In-between fills for an animated transition; `t` in `[0, 1]`.
/// Regions beyond the shorter list take the target fill.
pub fn blend_fills(from: &[Rgb8], to: &[Rgb8], t: f64) -> Vec<Rgb8> {
    to.iter()
        .enumerate()
        .map(|(i, &target)| match from.get(i) {
            Some(&start) => start.lerp(target, t),
            None => target,
        })
        .collect()
}
