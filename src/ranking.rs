//! Ranked consumption bars: candidate join, ordering, truncation, and row geometry.
//!
//! A country is a candidate for a year only when generation, consumption, and imports are
//! all present. Rows are sorted by consumption, largest first; ties keep dataset order.
//! Each row has a background bar for consumption and an overlay of generation followed by
//! imports, all on one shared `[0, max(consumption, generation + imports)]` axis.

use serde::Serialize;
use std::cmp::Ordering;

use crate::color::Rgb8;
use crate::config::BarLayout;
use crate::dataset::Dataset;
use crate::models::Metric;
use crate::ticks;

pub const NO_DATA_MESSAGE: &str = "No data available for this year";
pub const AXIS_TITLE: &str = "Energy (TWh)";

pub const CONSUMPTION_COLOR: Rgb8 = Rgb8::new(0x33, 0x33, 0x33);
pub const GENERATION_COLOR: Rgb8 = Rgb8::new(0x21, 0x96, 0xF3);
pub const IMPORTS_COLOR: Rgb8 = Rgb8::new(0xE5, 0x3E, 0x3E);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub country: String,
    pub generation: f64,
    pub consumption: f64,
    pub imports: f64,
    /// `generation + imports`
    pub total: f64,
}

/// Every country with all three bar metrics for `year`, sorted by consumption (descending,
/// stable).
pub fn rank(dataset: &Dataset, year: i32) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = dataset
        .records()
        .iter()
        .filter_map(|r| {
            let generation = r.value(Metric::NetGeneration, year)?;
            let consumption = r.value(Metric::NetConsumption, year)?;
            let imports = r.value(Metric::Imports, year)?;
            Some(RankedEntry {
                country: r.name.clone(),
                generation,
                consumption,
                imports,
                total: generation + imports,
            })
        })
        .collect();
    // -0.0 and 0.0 tie.
    entries.sort_by(|a, b| {
        b.consumption
            .partial_cmp(&a.consumption)
            .unwrap_or(Ordering::Equal)
    });
    entries
}

/// Prefix shown for the toggle state.
pub fn visible(entries: &[RankedEntry], show_all: bool, top_n: usize) -> &[RankedEntry] {
    if show_all {
        entries
    } else {
        &entries[..entries.len().min(top_n)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRow {
    pub entry: RankedEntry,
    /// Top of the overlay bars.
    pub y: f64,
    pub consumption: Rect,
    pub generation: Rect,
    pub imports: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowLabel {
    pub row: usize,
    pub text: String,
    /// Right edge of the label.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swatch {
    pub label: &'static str,
    pub color: Rgb8,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleButton {
    pub rect: Rect,
    pub label: String,
    /// Signals that the hovered country is ranked outside the visible rows.
    pub glowing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: Rgb8,
    /// Centered on `x` when true, left-aligned otherwise.
    pub centered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarHighlight {
    pub row: usize,
    pub country: String,
    pub labels: Vec<ValueLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub year: i32,
    pub show_all: bool,
    /// Candidates before truncation.
    pub total_candidates: usize,
    pub rows: Vec<BarRow>,
    pub labels: Vec<RowLabel>,
    pub bar_height: f64,
    /// Upper end of the value axis.
    pub x_max: f64,
    /// Left edge and width of the plotting band.
    pub plot_x: f64,
    pub plot_width: f64,
    pub plot_top: f64,
    pub plot_bottom: f64,
    pub axis_ticks: Vec<AxisTick>,
    pub legend: Vec<Swatch>,
    pub legend_origin: (f64, f64),
    pub toggle: Option<ToggleButton>,
    pub highlight: Option<BarHighlight>,
    pub size: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BarChartScene {
    Empty {
        year: i32,
        message: &'static str,
        size: (f64, f64),
    },
    Chart(Box<BarChart>),
}

impl BarChartScene {
    pub fn chart(&self) -> Option<&BarChart> {
        match self {
            BarChartScene::Chart(c) => Some(c),
            BarChartScene::Empty { .. } => None,
        }
    }

    pub fn chart_mut(&mut self) -> Option<&mut BarChart> {
        match self {
            BarChartScene::Chart(c) => Some(c),
            BarChartScene::Empty { .. } => None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.chart().map_or(0, |c| c.rows.len())
    }
}

/// Lay out the ranked bar chart for `year`.
pub fn render(dataset: &Dataset, year: i32, show_all: bool, layout: &BarLayout) -> BarChartScene {
    let all = rank(dataset, year);
    let size = (layout.width - layout.padding, layout.height - layout.padding);
    let shown = visible(&all, show_all, layout.top_n);
    if shown.is_empty() {
        return BarChartScene::Empty {
            year,
            message: NO_DATA_MESSAGE,
            size,
        };
    }

    let m = layout.margin;
    let plot_x = m.left;
    let plot_width = (size.0 - m.left - m.right).max(0.0);
    let available = (size.1 - m.top - m.bottom).max(0.0);
    let n = shown.len();
    let bar_height = (available / n as f64 - 1.0).clamp(layout.min_bar_height, layout.max_bar_height);
    let row_y = |i: usize| m.top + available * i as f64 / n as f64;

    let x_max = shown
        .iter()
        .map(|e| e.consumption.max(e.total))
        .fold(0.0_f64, f64::max);
    let x = |v: f64| {
        if x_max > 0.0 {
            (v / x_max * plot_width).max(0.0)
        } else {
            0.0
        }
    };

    let rows = shown
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let y = row_y(i);
            BarRow {
                entry: e.clone(),
                y,
                consumption: Rect {
                    x: plot_x,
                    y: y - bar_height * 0.3,
                    width: x(e.consumption),
                    height: bar_height * 1.6,
                },
                generation: Rect {
                    x: plot_x,
                    y,
                    width: x(e.generation),
                    height: bar_height,
                },
                imports: Rect {
                    x: plot_x + x(e.generation),
                    y,
                    width: x(e.imports),
                    height: bar_height,
                },
            }
        })
        .collect();

    let step = label_step(n, layout.max_labels);
    let labels = (0..n)
        .step_by(step)
        .map(|i| RowLabel {
            row: i,
            text: shown[i].country.clone(),
            x: plot_x - 5.0,
            y: row_y(i) + bar_height / 2.0,
        })
        .collect();

    let axis_ticks = ticks::ticks(0.0, x_max, 5)
        .into_iter()
        .map(|v| AxisTick {
            value: v,
            x: plot_x + x(v),
            label: format_axis_value(v),
        })
        .collect();

    let toggle = (all.len() > layout.top_n).then(|| ToggleButton {
        rect: Rect {
            x: size.0 - 160.0,
            y: size.1 - 35.0,
            width: 150.0,
            height: 25.0,
        },
        label: toggle_label(show_all, layout.top_n),
        glowing: false,
    });

    BarChartScene::Chart(Box::new(BarChart {
        year,
        show_all,
        total_candidates: all.len(),
        rows,
        labels,
        bar_height,
        x_max,
        plot_x,
        plot_width,
        plot_top: m.top,
        plot_bottom: m.top + available,
        axis_ticks,
        legend: vec![
            Swatch {
                label: "Consumption",
                color: CONSUMPTION_COLOR,
                opacity: 0.8,
            },
            Swatch {
                label: "Generation",
                color: GENERATION_COLOR,
                opacity: 0.7,
            },
            Swatch {
                label: "Imports",
                color: IMPORTS_COLOR,
                opacity: 0.8,
            },
        ],
        legend_origin: (size.0 - 110.0, 15.0),
        toggle,
        highlight: None,
        size,
    }))
}

/// Label every `ceil(rows / max_labels)`-th row.
pub fn label_step(rows: usize, max_labels: usize) -> usize {
    rows.div_ceil(max_labels.max(1)).max(1)
}

pub fn toggle_label(show_all: bool, top_n: usize) -> String {
    if show_all {
        format!("Show Top {top_n}")
    } else {
        "Show All Countries".to_string()
    }
}

fn format_axis_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

impl BarChart {
    pub fn row_index(&self, country: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.entry.country == country)
    }

    /// Highlight for a rendered row, with its value labels; `None` when `country` is not in
    /// the visible rows.
    pub fn highlight_for(&self, country: &str) -> Option<BarHighlight> {
        let row = self.row_index(country)?;
        let r = &self.rows[row];
        let e = &r.entry;
        let scale = |v: f64| {
            if self.x_max > 0.0 {
                v / self.x_max * self.plot_width
            } else {
                0.0
            }
        };
        let mid_y = r.y + self.bar_height / 2.0;
        let below_y = mid_y + self.bar_height * 1.5;
        let mut labels = Vec::new();
        if e.consumption > 0.0 {
            labels.push(ValueLabel {
                text: format!("{:.1} TWh", e.consumption),
                x: self.plot_x + scale(e.consumption) + 15.0,
                y: mid_y,
                color: Rgb8::new(0x66, 0x66, 0x66),
                centered: false,
            });
        }
        if e.generation > 0.0 {
            labels.push(ValueLabel {
                text: format!("{:.1}", e.generation),
                x: self.plot_x + scale(e.generation / 2.0),
                y: below_y,
                color: GENERATION_COLOR,
                centered: true,
            });
        }
        if e.imports > 0.0 {
            labels.push(ValueLabel {
                text: format!("{:.1}", e.imports),
                x: self.plot_x + scale(e.generation) + scale(e.imports / 2.0),
                y: below_y,
                color: IMPORTS_COLOR,
                centered: true,
            });
        }
        Some(BarHighlight {
            row,
            country: e.country.clone(),
            labels,
        })
    }
}
