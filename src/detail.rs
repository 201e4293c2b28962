//! Country detail panel: current-year figures plus a self-sufficiency history chart.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::format::{format_percent, format_twh};
use crate::models::{CountryRecord, Metric};
use crate::ticks::{self, BandScale};

pub const NOT_AVAILABLE: &str = "N/A";
pub const HISTORY_EMPTY_MESSAGE: &str = "No data available";

const CHART_WIDTH: f64 = 300.0;
const CHART_HEIGHT: f64 = 200.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_RIGHT: f64 = 10.0;
const MARGIN_BOTTOM: f64 = 30.0;
const MARGIN_LEFT: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPanel {
    /// Geography name of the clicked region.
    pub country: String,
    pub year: i32,
    pub production: String,
    pub consumption: String,
    pub trade: String,
    pub self_sufficiency: String,
    /// `None` when the region has no metrics record.
    pub history: Option<History>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum History {
    Chart(HistoryChart),
    NoData { message: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryBar {
    pub year: i32,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Hover text, e.g. `"2018: 87.5%"`.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryChart {
    pub size: (f64, f64),
    pub label: &'static str,
    pub bars: Vec<HistoryBar>,
    /// (x, label) under the baseline.
    pub x_ticks: Vec<(f64, String)>,
    /// (y, label) along the left axis.
    pub y_ticks: Vec<(f64, String)>,
    /// y of the zero baseline.
    pub baseline: f64,
    pub plot_left: f64,
    pub plot_right: f64,
    pub plot_top: f64,
}

/// Panel for a clicked geography region in `year`.
pub fn render(geography_name: &str, dataset: &Dataset, year: i32, locale: &str) -> DetailPanel {
    let record = dataset.resolve(geography_name);
    let twh = |metric: Metric| {
        record
            .and_then(|r| r.value(metric, year))
            .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_twh(v, locale))
    };
    DetailPanel {
        country: geography_name.to_string(),
        year,
        production: twh(Metric::NetGeneration),
        consumption: twh(Metric::NetConsumption),
        trade: twh(Metric::Imports),
        self_sufficiency: record
            .and_then(|r| r.value(Metric::SelfSufficiencyRate, year))
            .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_percent(v, 1)),
        history: record.map(history),
    }
}

/// Self-sufficiency across all years of one record.
pub fn history(record: &CountryRecord) -> History {
    let data: Vec<(i32, f64)> = record
        .self_sufficiency_rate
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(&y, &v)| (y, v))
        .collect();
    if data.is_empty() {
        return History::NoData {
            message: HISTORY_EMPTY_MESSAGE,
        };
    }

    let band = BandScale::new(data.len(), MARGIN_LEFT, CHART_WIDTH - MARGIN_RIGHT, 0.1);
    let max = data.iter().map(|&(_, v)| v).fold(0.0_f64, f64::max);
    let (_, y_max) = ticks::nice(0.0, max, 10);
    let baseline = CHART_HEIGHT - MARGIN_BOTTOM;
    let y = |v: f64| {
        if y_max > 0.0 {
            baseline - v / y_max * (baseline - MARGIN_TOP)
        } else {
            baseline
        }
    };

    let bars = data
        .iter()
        .enumerate()
        .map(|(i, &(year, value))| HistoryBar {
            year,
            value,
            x: band.position(i),
            y: y(value),
            width: band.bandwidth,
            height: baseline - y(value),
            title: format!("{}: {:.1}%", year, value),
        })
        .collect();

    let x_ticks = data
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 5 == 0)
        .map(|(i, &(year, _))| (band.position(i) + band.bandwidth / 2.0, year.to_string()))
        .collect();

    let y_ticks = ticks::ticks(0.0, y_max, 5)
        .into_iter()
        .map(|v| (y(v), format!("{}", v)))
        .collect();

    History::Chart(HistoryChart {
        size: (CHART_WIDTH, CHART_HEIGHT),
        label: Metric::SelfSufficiencyRate.label(),
        bars,
        x_ticks,
        y_ticks,
        baseline,
        plot_left: MARGIN_LEFT,
        plot_right: CHART_WIDTH - MARGIN_RIGHT,
        plot_top: MARGIN_TOP,
    })
}
