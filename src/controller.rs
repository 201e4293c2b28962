//! Interaction controller: control events → state mutation → selective re-render.
//!
//! The [`Dashboard`] is the single owner of [`UiState`]. Renderers are pure functions of
//! state and data; the controller only decides which of them to re-run for an event and
//! keeps the map, bar chart, tooltip, and detail panel in sync.

use serde::Serialize;

use crate::choropleth::{self, ChoroplethScene};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::detail::{self, DetailPanel};
use crate::format::{format_number, format_percent};
use crate::models::{GeographyFeature, Metric, ScaleType, UiState};
use crate::projection::ProjectedMap;
use crate::ranking::{self, BarChartScene};

pub const NO_DATA_TOOLTIP: &str = "No data available";

/// A control or pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    YearChanged(i32),
    MetricChanged(Metric),
    ScaleChanged(ScaleType),
    ToggleShowAll,
    RegionClicked(String),
    /// Pointer over a region at map position (`x`, `y`).
    RegionHovered { name: String, x: f64, y: f64 },
    HoverOut,
    CloseDetail,
}

/// Parts of the scene an event re-rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Redraw {
    pub choropleth: bool,
    pub bar_chart: bool,
    pub detail: bool,
    /// Tooltip, bar highlight, or toggle glow.
    pub overlay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub text: String,
    /// Top-left corner, offset from the pointer.
    pub x: f64,
    pub y: f64,
}

/// Everything the display needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardScene {
    pub choropleth: ChoroplethScene,
    pub bar_chart: BarChartScene,
    pub detail: Option<DetailPanel>,
    pub tooltip: Option<Tooltip>,
}

#[derive(Debug, Clone, PartialEq)]
struct Hover {
    name: String,
    x: f64,
    y: f64,
}

pub struct Dashboard {
    dataset: Dataset,
    map: ProjectedMap,
    config: DashboardConfig,
    state: UiState,
    year_span: Option<(i32, i32)>,
    selected: Option<String>,
    hover: Option<Hover>,
    scene: DashboardScene,
}

impl Dashboard {
    /// Project the geography to the configured map size and render the initial scene.
    pub fn new(dataset: Dataset, features: &[GeographyFeature], config: DashboardConfig) -> Self {
        let map = ProjectedMap::new(features, config.map.width, config.map.height);
        Self::with_map(dataset, map, config)
    }

    pub fn with_map(dataset: Dataset, map: ProjectedMap, config: DashboardConfig) -> Self {
        let year_span = dataset.year_span();
        let state = UiState {
            year: clamp_year(config.default_year, year_span),
            ..UiState::default()
        };
        let scene = DashboardScene {
            choropleth: choropleth::render(
                map.names(),
                &dataset,
                &state,
                map.width as f64,
                &config,
            ),
            bar_chart: ranking::render(&dataset, state.year, state.show_all, &config.bars),
            detail: None,
            tooltip: None,
        };
        Self {
            dataset,
            map,
            config,
            state,
            year_span,
            selected: None,
            hover: None,
            scene,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn scene(&self) -> &DashboardScene {
        &self.scene
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn map(&self) -> &ProjectedMap {
        &self.map
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Slider bounds: the dataset's year span.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        self.year_span
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn handle(&mut self, event: Event) -> Redraw {
        let mut redraw = Redraw::default();
        match event {
            Event::YearChanged(year) => {
                self.state.year = clamp_year(year, self.year_span);
                self.render_choropleth();
                self.render_bar_chart();
                redraw.choropleth = true;
                redraw.bar_chart = true;
                if self.selected.is_some() {
                    self.render_detail();
                    redraw.detail = true;
                }
                self.apply_hover();
                redraw.overlay = true;
            }
            Event::MetricChanged(metric) => {
                self.state.metric = metric;
                self.render_choropleth();
                redraw.choropleth = true;
                if self.hover.is_some() {
                    self.apply_hover();
                    redraw.overlay = true;
                }
            }
            Event::ScaleChanged(scale) => {
                self.state.scale = scale;
                self.render_choropleth();
                redraw.choropleth = true;
            }
            Event::ToggleShowAll => {
                self.state.show_all = !self.state.show_all;
                self.render_bar_chart();
                redraw.bar_chart = true;
                self.apply_hover();
                redraw.overlay = true;
            }
            Event::RegionClicked(name) => {
                self.selected = Some(name);
                self.render_detail();
                redraw.detail = true;
            }
            Event::RegionHovered { name, x, y } => {
                self.hover = Some(Hover { name, x, y });
                self.apply_hover();
                redraw.overlay = true;
            }
            Event::HoverOut => {
                self.hover = None;
                self.apply_hover();
                redraw.overlay = true;
            }
            Event::CloseDetail => {
                self.selected = None;
                self.scene.detail = None;
                redraw.detail = true;
            }
        }
        redraw
    }

    fn render_choropleth(&mut self) {
        self.scene.choropleth = choropleth::render(
            self.map.names(),
            &self.dataset,
            &self.state,
            self.map.width as f64,
            &self.config,
        );
    }

    fn render_bar_chart(&mut self) {
        self.scene.bar_chart = ranking::render(
            &self.dataset,
            self.state.year,
            self.state.show_all,
            &self.config.bars,
        );
    }

    fn render_detail(&mut self) {
        self.scene.detail = self.selected.as_deref().map(|name| {
            detail::render(name, &self.dataset, self.state.year, &self.config.locale)
        });
    }

    /// Recompute tooltip, bar highlight, and toggle glow from the current hover.
    fn apply_hover(&mut self) {
        let record_name = self
            .hover
            .as_ref()
            .and_then(|h| self.dataset.resolve(&h.name))
            .map(|r| r.name.clone());
        let show_all = self.state.show_all;

        if let Some(chart) = self.scene.bar_chart.chart_mut() {
            chart.highlight = record_name.as_deref().and_then(|n| chart.highlight_for(n));
            let off_screen = !show_all
                && record_name
                    .as_deref()
                    .is_some_and(|n| chart.row_index(n).is_none());
            if let Some(toggle) = chart.toggle.as_mut() {
                toggle.glowing = off_screen;
            }
        }

        self.scene.tooltip = self.hover.as_ref().map(|h| Tooltip {
            title: h.name.clone(),
            text: tooltip_text(&self.dataset, &h.name, &self.state, &self.config.locale),
            x: h.x + 10.0,
            y: h.y - 10.0,
        });
    }
}

/// Tooltip body for a hovered region under the active metric and year.
pub fn tooltip_text(dataset: &Dataset, geography_name: &str, state: &UiState, locale: &str) -> String {
    let Some(record) = dataset.resolve(geography_name) else {
        return NO_DATA_TOOLTIP.to_string();
    };
    let label = state.metric.label();
    match record.value(state.metric, state.year) {
        Some(v) if state.metric.is_percentage() => format!("{label}: {}", format_percent(v, 1)),
        Some(v) => format!("{label}: {}", format_number(v, locale)),
        None => format!("{label}: No data"),
    }
}

fn clamp_year(year: i32, span: Option<(i32, i32)>) -> i32 {
    match span {
        Some((lo, hi)) => year.clamp(lo, hi),
        None => year,
    }
}
