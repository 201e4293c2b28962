//! Gradient legend construction, kept consistent with the active [`ColorScale`].
//!
//! Diverging (self-sufficiency) layout: the legend spans `[0, 1.25]` normalized units,
//! the deficit segment `[0%, 100%]` takes the first unit and the surplus segment
//! `[100%, max]` the last quarter unit, so break-even sits at 80% of the width and the
//! surplus ticks crowd around it. A dashed guideline marks 100%.

use serde::Serialize;

use crate::color::{BREAK_EVEN, ColorScale, Rgb8};
use crate::config::LegendLayout;
use crate::models::Metric;

/// Normalized extent of the diverging legend.
const DIVERGING_SPAN: f64 = 1.25;
const SEQUENTIAL_STOPS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    /// 0..1 along the legend bar.
    pub offset: f64,
    pub color: Rgb8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendTick {
    pub value: f64,
    /// Pixels from the left edge of the legend bar.
    pub x: f64,
    pub label: String,
    pub anchor: Anchor,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,
    /// Upper left corner of the gradient bar, in map pixels.
    pub origin: (f64, f64),
    pub width: f64,
    pub height: f64,
    pub stops: Vec<GradientStop>,
    pub ticks: Vec<LegendTick>,
    /// Pixels from the left edge of the bar for the dashed 100% line.
    pub break_even_x: Option<f64>,
}

impl Legend {
    pub fn tick(&self, value: f64) -> Option<&LegendTick> {
        self.ticks.iter().find(|t| t.value == value)
    }

    /// Color at `offset` (0..1) by linear interpolation between stops.
    pub fn color_at(&self, offset: f64) -> Option<Rgb8> {
        let first = self.stops.first()?;
        if offset <= first.offset {
            return Some(first.color);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if offset <= b.offset {
                let span = b.offset - a.offset;
                let t = if span > 0.0 { (offset - a.offset) / span } else { 1.0 };
                return Some(a.color.lerp(b.color, t));
            }
        }
        self.stops.last().map(|s| s.color)
    }
}

/// Legend for `scale` while `metric`/`year` are active.
pub fn build(
    scale: &ColorScale,
    metric: Metric,
    year: i32,
    map_width: f64,
    layout: &LegendLayout,
) -> Legend {
    match *scale {
        ColorScale::Diverging { max } => diverging(scale, max, year, map_width, layout),
        ColorScale::Sequential { min, max, .. } => {
            sequential(scale, metric, min, max, map_width, layout)
        }
    }
}

/// Normalized position (0..1 of the bar) of a self-sufficiency value.
pub fn diverging_offset(value: f64, max: f64) -> f64 {
    let units = if value <= BREAK_EVEN {
        value.max(0.0) / BREAK_EVEN
    } else if max <= BREAK_EVEN {
        1.0
    } else {
        1.0 + (value.min(max) - BREAK_EVEN) / (max - BREAK_EVEN) * (DIVERGING_SPAN - 1.0)
    };
    units / DIVERGING_SPAN
}

fn origin(map_width: f64, layout: &LegendLayout) -> (f64, f64) {
    (map_width - layout.width - layout.margin, layout.margin)
}

fn diverging(scale: &ColorScale, max: f64, year: i32, map_width: f64, layout: &LegendLayout) -> Legend {
    let surplus = (max - BREAK_EVEN).max(0.0);
    // Denser stops approaching break-even.
    let mut values: Vec<f64> = vec![0.0, 20.0, 40.0, 60.0, 80.0, 95.0, BREAK_EVEN];
    values.extend((1..=4).map(|k| BREAK_EVEN + surplus * k as f64 / 4.0));
    let stops = values
        .iter()
        .map(|&v| GradientStop {
            offset: diverging_offset(v, max),
            color: scale.color(v),
        })
        .collect();

    let mut keys = vec![0.0, 50.0, BREAK_EVEN, (max / 2.0).round(), max];
    keys.sort_by(|a, b| a.total_cmp(b));
    keys.dedup();
    let ticks = keys
        .into_iter()
        .filter(|&v| v <= max)
        .map(|v| LegendTick {
            value: v,
            x: diverging_offset(v, max) * layout.width,
            label: format!("{}%", v),
            anchor: if v == 0.0 {
                Anchor::Start
            } else if v == max {
                Anchor::End
            } else {
                Anchor::Middle
            },
            emphasized: false,
        })
        .collect();

    Legend {
        title: format!("{} - {}", Metric::SelfSufficiencyRate.label(), year),
        origin: origin(map_width, layout),
        width: layout.width,
        height: layout.height,
        stops,
        ticks,
        break_even_x: Some(diverging_offset(BREAK_EVEN, max) * layout.width),
    }
}

fn sequential(
    scale: &ColorScale,
    metric: Metric,
    min: f64,
    max: f64,
    map_width: f64,
    layout: &LegendLayout,
) -> Legend {
    let stops = (0..=SEQUENTIAL_STOPS)
        .map(|i| {
            let t = i as f64 / SEQUENTIAL_STOPS as f64;
            GradientStop {
                offset: t,
                color: scale.color(min + t * (max - min)),
            }
        })
        .collect();

    let label = |v: f64| {
        if metric.is_percentage() {
            format!("{:.0}%", v)
        } else {
            format!("{:.1}", v)
        }
    };
    let mut ticks = vec![
        LegendTick {
            value: min,
            x: 0.0,
            label: label(min),
            anchor: Anchor::Start,
            emphasized: false,
        },
        LegendTick {
            value: max,
            x: layout.width,
            label: label(max),
            anchor: Anchor::End,
            emphasized: false,
        },
    ];
    if metric.is_percentage() && max > min && (min..=max).contains(&BREAK_EVEN) {
        ticks.insert(
            1,
            LegendTick {
                value: BREAK_EVEN,
                x: (BREAK_EVEN - min) / (max - min) * layout.width,
                label: "100%".to_string(),
                anchor: Anchor::Middle,
                emphasized: true,
            },
        );
    }

    Legend {
        title: metric.label().to_string(),
        origin: origin(map_width, layout),
        width: layout.width,
        height: layout.height,
        stops,
        ticks,
        break_even_x: None,
    }
}
