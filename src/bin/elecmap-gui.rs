/*!
 * Desktop viewer for elecmap - electricity self-sufficiency dashboard
 *
 * A cross-platform desktop application providing:
 * - A world choropleth with year slider, metric and scale selection
 * - A ranked consumption/generation/imports bar chart with a Top-N toggle
 * - A country detail panel on click, and SVG/PNG export of the current view
 *
 * Usage: elecmap-gui [DATASET] [GEOJSON] [CONFIG.toml]
 */

use anyhow::{Result, anyhow};
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Sense, Stroke, Vec2};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use std::path::PathBuf;
use std::time::Instant;

use elecmap::choropleth::blend_fills;
use elecmap::detail::History;
use elecmap::legend::{Anchor, Legend};
use elecmap::projection::ProjectedMap;
use elecmap::ranking::{self, BarChartScene};
use elecmap::{Dashboard, DashboardConfig, Dataset, Event, Metric, Redraw, Rgb8, ScaleType};
use elecmap::{storage, viz};

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1320.0, 1000.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Electricity Self-Sufficiency - elecmap"),
        ..Default::default()
    };

    eframe::run_native(
        "elecmap",
        options,
        Box::new(move |_cc| Ok(Box::new(ElecmapApp::new(&args)))),
    )
}

/// Fill animation between two choropleth renders.
struct Transition {
    from: Vec<Rgb8>,
    to: Vec<Rgb8>,
    started: Instant,
    duration: f64,
}

struct ElecmapApp {
    data_path: String,
    geo_path: String,
    config_path: String,

    dashboard: Option<Dashboard>,
    year: i32,
    map_texture: Option<egui::TextureHandle>,
    shown_fills: Vec<Rgb8>,
    transition: Option<Transition>,
    last_pointer: Option<(String, f64, f64)>,

    status_message: String,
    error_message: String,
}

impl ElecmapApp {
    fn new(args: &[String]) -> Self {
        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();
        let mut app = Self {
            data_path: arg(0),
            geo_path: arg(1),
            config_path: arg(2),
            dashboard: None,
            year: elecmap::models::DEFAULT_YEAR,
            map_texture: None,
            shown_fills: Vec::new(),
            transition: None,
            last_pointer: None,
            status_message: String::new(),
            error_message: String::new(),
        };
        if !app.data_path.is_empty() && !app.geo_path.is_empty() {
            app.load();
        }
        app
    }

    fn load(&mut self) {
        self.error_message.clear();
        match self.try_load() {
            Ok(dashboard) => {
                self.status_message = format!(
                    "Loaded {} countries, {} regions",
                    dashboard.dataset().len(),
                    dashboard.map().regions.len()
                );
                self.year = dashboard.state().year;
                self.shown_fills = dashboard.scene().choropleth.fills();
                self.transition = None;
                self.map_texture = None;
                self.last_pointer = None;
                self.dashboard = Some(dashboard);
            }
            Err(e) => self.error_message = format!("Load failed: {e:#}"),
        }
    }

    fn try_load(&self) -> Result<Dashboard> {
        let config = if self.config_path.trim().is_empty() {
            DashboardConfig::default()
        } else {
            DashboardConfig::load(self.config_path.trim())?
        };
        let records = storage::load_dataset(self.data_path.trim())?;
        let features = storage::load_geography(self.geo_path.trim())?;
        let dataset = Dataset::with_aliases(records, config.alias_table());
        Ok(Dashboard::new(dataset, &features, config))
    }

    /// Forward an event and start a fill transition when the map changed.
    fn dispatch(&mut self, event: Event) -> Redraw {
        let Some(dashboard) = self.dashboard.as_mut() else {
            return Redraw::default();
        };
        let redraw = dashboard.handle(event);
        if redraw.choropleth {
            let to = dashboard.scene().choropleth.fills();
            let duration = dashboard.scene().choropleth.transition.as_secs_f64();
            self.transition = Some(Transition {
                from: self.shown_fills.clone(),
                to,
                started: Instant::now(),
                duration,
            });
        }
        redraw
    }

    /// Advance the fill animation and refresh the map texture when fills changed.
    fn update_map_texture(&mut self, ctx: &egui::Context) {
        let Some(dashboard) = self.dashboard.as_ref() else {
            return;
        };
        let mut dirty = self.map_texture.is_none();
        if let Some(tr) = &self.transition {
            let t = if tr.duration > 0.0 {
                (tr.started.elapsed().as_secs_f64() / tr.duration).min(1.0)
            } else {
                1.0
            };
            self.shown_fills = blend_fills(&tr.from, &tr.to, t);
            dirty = true;
            if t >= 1.0 {
                self.transition = None;
            } else {
                ctx.request_repaint();
            }
        }
        if !dirty {
            return;
        }
        match rasterize(dashboard.map(), &self.shown_fills) {
            Ok(image) => match &mut self.map_texture {
                Some(tex) => tex.set(image, egui::TextureOptions::LINEAR),
                None => {
                    self.map_texture =
                        Some(ctx.load_texture("choropleth", image, egui::TextureOptions::LINEAR));
                }
            },
            Err(e) => self.error_message = format!("Map drawing failed: {e:#}"),
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Dataset:");
            ui.text_edit_singleline(&mut self.data_path);
            if ui.button("Browse").clicked()
                && let Some(path) = pick_file("Dataset", &["json", "csv"]) {
                self.data_path = path.to_string_lossy().to_string();
            }
            ui.label("Geography:");
            ui.text_edit_singleline(&mut self.geo_path);
            if ui.button("Browse").clicked()
                && let Some(path) = pick_file("GeoJSON", &["geojson", "json"]) {
                self.geo_path = path.to_string_lossy().to_string();
            }
            if ui.button("Load").clicked() {
                self.load();
            }
        });

        let Some(dashboard) = self.dashboard.as_ref() else {
            return;
        };
        let state = *dashboard.state();
        let range = dashboard.year_range();
        let mut events = Vec::new();

        ui.horizontal(|ui| {
            if let Some((lo, hi)) = range {
                let slider = ui.add(egui::Slider::new(&mut self.year, lo..=hi).text("Year"));
                if slider.changed() {
                    events.push(Event::YearChanged(self.year));
                }
            }

            let mut metric = state.metric;
            egui::ComboBox::from_label("Metric")
                .selected_text(metric.label())
                .show_ui(ui, |ui| {
                    for m in Metric::ALL {
                        ui.selectable_value(&mut metric, m, m.label());
                    }
                });
            if metric != state.metric {
                events.push(Event::MetricChanged(metric));
            }

            let mut scale = state.scale;
            ui.radio_value(&mut scale, ScaleType::Linear, "Linear");
            ui.radio_value(&mut scale, ScaleType::Log, "Log");
            if scale != state.scale {
                events.push(Event::ScaleChanged(scale));
            }

            if ui.button("Export…").clicked() {
                self.export();
            }
        });

        for event in events {
            self.dispatch(event);
        }
    }

    fn export(&mut self) {
        let Some(dashboard) = self.dashboard.as_ref() else {
            return;
        };
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let Some(path) = rfd::FileDialog::new()
            .set_directory(dir)
            .set_file_name("dashboard.svg")
            .add_filter("Image", &["svg", "png"])
            .save_file()
        else {
            return;
        };
        match viz::render_dashboard(dashboard, &path) {
            Ok(()) => self.status_message = format!("Exported {}", path.display()),
            Err(e) => self.error_message = format!("Export failed: {e:#}"),
        }
    }

    fn map_view(&mut self, ui: &mut egui::Ui) {
        let (Some(dashboard), Some(tex)) = (self.dashboard.as_ref(), self.map_texture.as_ref())
        else {
            return;
        };
        let map = dashboard.map();
        let size = Vec2::new(map.width as f32, map.height as f32);
        let response = ui.add(egui::Image::new((tex.id(), size)).sense(Sense::click()));
        let origin = response.rect.min;
        let painter = ui.painter_at(response.rect);

        let scene = dashboard.scene();
        if let Some(legend) = &scene.choropleth.legend {
            paint_legend(&painter, origin, legend);
        }
        if let Some(t) = &scene.tooltip {
            let pos = origin + Vec2::new(t.x as f32, t.y as f32);
            let w = (t.title.len().max(t.text.len()) as f32) * 7.0 + 16.0;
            let rect = egui::Rect::from_min_size(pos, Vec2::new(w, 40.0));
            painter.rect_filled(rect, 4.0, Color32::from_white_alpha(240));
            painter.rect_stroke(rect, 4.0, Stroke::new(1.0, Color32::from_gray(0xCC)));
            painter.text(pos + Vec2::new(8.0, 6.0), Align2::LEFT_TOP, &t.title, FontId::proportional(13.0), Color32::from_gray(0x33));
            painter.text(pos + Vec2::new(8.0, 23.0), Align2::LEFT_TOP, &t.text, FontId::proportional(12.0), Color32::from_gray(0x66));
        }

        let hit = response.hover_pos().and_then(|p| {
            let local = p - origin;
            let (x, y) = (local.x as f64, local.y as f64);
            map.hit_test(x, y).map(|name| (name.to_string(), x, y))
        });
        let clicked = response.clicked().then(|| hit.as_ref().map(|h| h.0.clone())).flatten();

        match (&hit, &self.last_pointer) {
            (Some(h), last) if last.as_ref() != Some(h) => {
                self.dispatch(Event::RegionHovered {
                    name: h.0.clone(),
                    x: h.1,
                    y: h.2,
                });
            }
            (None, Some(_)) => {
                self.dispatch(Event::HoverOut);
            }
            _ => {}
        }
        self.last_pointer = hit;
        if let Some(name) = clicked {
            self.dispatch(Event::RegionClicked(name));
        }
    }

    fn bar_view(&mut self, ui: &mut egui::Ui) {
        let Some(dashboard) = self.dashboard.as_ref() else {
            return;
        };
        let mut toggle_clicked = false;
        match &dashboard.scene().bar_chart {
            BarChartScene::Empty { message, size, .. } => {
                let (response, painter) =
                    ui.allocate_painter(Vec2::new(size.0 as f32, size.1 as f32), Sense::hover());
                painter.text(response.rect.center(), Align2::CENTER_CENTER, *message, FontId::proportional(14.0), Color32::from_gray(0x66));
            }
            BarChartScene::Chart(chart) => {
                let (response, painter) = ui.allocate_painter(
                    Vec2::new(chart.size.0 as f32, chart.size.1 as f32),
                    Sense::click(),
                );
                let o = response.rect.min;
                let hl = chart.highlight.as_ref().map(|h| h.row);
                for (i, row) in chart.rows.iter().enumerate() {
                    let fade = if hl.is_some_and(|h| h != i) { 0.4 } else { 1.0 };
                    painter.rect_filled(to_rect(o, &row.consumption), 0.0, c32a(ranking::CONSUMPTION_COLOR, 0.8 * fade));
                    painter.rect_filled(to_rect(o, &row.generation), 0.0, c32a(ranking::GENERATION_COLOR, 0.7 * fade));
                    painter.rect_filled(to_rect(o, &row.imports), 0.0, c32a(ranking::IMPORTS_COLOR, 0.8 * fade));
                }
                for l in &chart.labels {
                    painter.text(at(o, l.x, l.y), Align2::RIGHT_CENTER, &l.text, FontId::proportional(9.0), Color32::from_gray(0x33));
                }
                if let Some(h) = &chart.highlight {
                    for v in &h.labels {
                        let align = if v.centered { Align2::CENTER_CENTER } else { Align2::LEFT_CENTER };
                        painter.text(at(o, v.x, v.y), align, &v.text, FontId::proportional(10.0), c32(v.color));
                    }
                }
                let bottom = chart.plot_bottom;
                for tick in &chart.axis_ticks {
                    painter.line_segment([at(o, tick.x, chart.plot_top), at(o, tick.x, bottom)], Stroke::new(1.0, Color32::from_gray(0xE0)));
                    painter.text(at(o, tick.x, bottom + 6.0), Align2::CENTER_TOP, &tick.label, FontId::proportional(10.0), Color32::from_gray(0x66));
                }
                painter.text(
                    at(o, chart.plot_x + chart.plot_width / 2.0, bottom + 24.0),
                    Align2::CENTER_TOP,
                    ranking::AXIS_TITLE,
                    FontId::proportional(12.0),
                    Color32::from_gray(0x33),
                );
                for (i, s) in chart.legend.iter().enumerate() {
                    let p = at(o, chart.legend_origin.0, chart.legend_origin.1 + i as f64 * 18.0);
                    painter.rect_filled(egui::Rect::from_min_size(p, Vec2::splat(12.0)), 0.0, c32a(s.color, s.opacity));
                    painter.text(p + Vec2::new(18.0, 6.0), Align2::LEFT_CENTER, s.label, FontId::proportional(11.0), Color32::from_gray(0x33));
                }
                if let Some(toggle) = &chart.toggle {
                    let r = to_rect(o, &toggle.rect);
                    let (fill, stroke) = if toggle.glowing {
                        (Color32::from_rgb(0xFF, 0xEB, 0x3B), Stroke::new(2.0, Color32::from_rgb(0xFF, 0xC1, 0x07)))
                    } else {
                        (Color32::from_gray(0xF0), Stroke::new(1.0, Color32::from_gray(0xCC)))
                    };
                    painter.rect_filled(r, 3.0, fill);
                    painter.rect_stroke(r, 3.0, stroke);
                    painter.text(r.center(), Align2::CENTER_CENTER, &toggle.label, FontId::proportional(12.0), Color32::from_gray(0x33));
                    toggle_clicked = response.clicked()
                        && response.interact_pointer_pos().is_some_and(|p| r.contains(p));
                }
            }
        }
        if toggle_clicked {
            self.dispatch(Event::ToggleShowAll);
        }
    }

    fn detail_view(&mut self, ctx: &egui::Context) {
        let Some(panel) = self.dashboard.as_ref().and_then(|d| d.scene().detail.clone()) else {
            return;
        };
        let mut close = false;
        egui::SidePanel::right("detail").min_width(340.0).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&panel.country);
                if ui.button("✕").clicked() {
                    close = true;
                }
            });
            egui::Grid::new("detail_grid").num_columns(2).show(ui, |ui| {
                for (name, value) in [
                    ("Year", panel.year.to_string()),
                    ("Production", panel.production.clone()),
                    ("Consumption", panel.consumption.clone()),
                    ("Trade", panel.trade.clone()),
                    ("Self-Sufficiency", panel.self_sufficiency.clone()),
                ] {
                    ui.label(name);
                    ui.label(value);
                    ui.end_row();
                }
            });
            ui.add_space(10.0);
            match &panel.history {
                Some(History::Chart(chart)) => {
                    let (response, painter) = ui.allocate_painter(
                        Vec2::new(chart.size.0 as f32, chart.size.1 as f32),
                        Sense::hover(),
                    );
                    let o = response.rect.min;
                    for bar in &chart.bars {
                        let r = egui::Rect::from_min_size(at(o, bar.x, bar.y), Vec2::new(bar.width as f32, bar.height as f32));
                        painter.rect_filled(r, 0.0, Color32::from_rgb(0x46, 0x82, 0xB4));
                        if response.hover_pos().is_some_and(|p| r.contains(p)) {
                            response.clone().on_hover_text(&bar.title);
                        }
                    }
                    painter.line_segment([at(o, chart.plot_left, chart.baseline), at(o, chart.plot_right, chart.baseline)], Stroke::new(1.0, Color32::from_gray(0x66)));
                    for (x, text) in &chart.x_ticks {
                        painter.text(at(o, *x, chart.baseline + 4.0), Align2::CENTER_TOP, text, FontId::proportional(10.0), Color32::from_gray(0x66));
                    }
                    for (y, text) in &chart.y_ticks {
                        painter.text(at(o, chart.plot_left - 6.0, *y), Align2::RIGHT_CENTER, text, FontId::proportional(10.0), Color32::from_gray(0x66));
                    }
                }
                Some(History::NoData { message }) => {
                    ui.label(*message);
                }
                None => {}
            }
        });
        if close {
            self.dispatch(Event::CloseDetail);
        }
    }
}

impl eframe::App for ElecmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.controls(ui);
            if !self.status_message.is_empty() {
                ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
            }
            if !self.error_message.is_empty() {
                ui.colored_label(egui::Color32::RED, &self.error_message);
            }
        });

        self.detail_view(ctx);
        self.update_map_texture(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                if self.dashboard.is_none() {
                    ui.label("Choose a dataset and a GeoJSON file, then press Load.");
                    return;
                }
                self.map_view(ui);
                ui.add_space(8.0);
                self.bar_view(ui);
            });
        });
    }
}

/// Rasterize region polygons into an RGB image (text is painted by egui).
fn rasterize(map: &ProjectedMap, fills: &[Rgb8]) -> Result<egui::ColorImage> {
    let (w, h) = (map.width.max(1), map.height.max(1));
    let mut buf = vec![255u8; (w * h * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        viz::map::draw_regions(&root, map, fills)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(egui::ColorImage::from_rgb([w as usize, h as usize], &buf))
}

fn paint_legend(painter: &egui::Painter, origin: Pos2, legend: &Legend) {
    let o = origin + Vec2::new(legend.origin.0 as f32, legend.origin.1 as f32);
    let (w, h) = (legend.width as f32, legend.height as f32);
    let bg = egui::Rect::from_min_max(o - Vec2::new(10.0, 25.0), o + Vec2::new(w + 10.0, h + 25.0));
    painter.rect_filled(bg, 5.0, Color32::from_white_alpha(230));
    painter.rect_stroke(bg, 5.0, Stroke::new(1.0, Color32::from_gray(0xCC)));

    let slices = w.max(1.0) as usize;
    for i in 0..slices {
        let offset = (i as f64 + 0.5) / slices as f64;
        if let Some(c) = legend.color_at(offset) {
            let r = egui::Rect::from_min_size(o + Vec2::new(i as f32, 0.0), Vec2::new(1.0, h));
            painter.rect_filled(r, 0.0, c32(c));
        }
    }
    painter.text(o + Vec2::new(w / 2.0, -8.0), Align2::CENTER_BOTTOM, &legend.title, FontId::proportional(12.0), Color32::from_gray(0x33));

    for tick in &legend.ticks {
        let x = o.x + tick.x as f32;
        let color = if tick.emphasized { Color32::from_gray(0x33) } else { Color32::from_gray(0x66) };
        painter.line_segment([Pos2::new(x, o.y + h), Pos2::new(x, o.y + h + 5.0)], Stroke::new(1.0, color));
        let align = match tick.anchor {
            Anchor::Start => Align2::LEFT_TOP,
            Anchor::Middle => Align2::CENTER_TOP,
            Anchor::End => Align2::RIGHT_TOP,
        };
        painter.text(Pos2::new(x, o.y + h + 7.0), align, &tick.label, FontId::proportional(10.0), color);
    }

    if let Some(bx) = legend.break_even_x {
        let x = o.x + bx as f32;
        painter.extend(egui::Shape::dashed_line(
            &[Pos2::new(x, o.y - 20.0), Pos2::new(x, o.y + h + 5.0)],
            Stroke::new(1.0, Color32::from_gray(0x66)),
            2.0,
            2.0,
        ));
    }
}

fn pick_file(name: &str, extensions: &[&str]) -> Option<PathBuf> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    rfd::FileDialog::new()
        .set_directory(dir)
        .add_filter(name, extensions)
        .pick_file()
}

fn at(origin: Pos2, x: f64, y: f64) -> Pos2 {
    origin + Vec2::new(x as f32, y as f32)
}

fn to_rect(origin: Pos2, r: &ranking::Rect) -> egui::Rect {
    egui::Rect::from_min_size(at(origin, r.x, r.y), Vec2::new(r.width as f32, r.height as f32))
}

fn c32(c: Rgb8) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

fn c32a(c: Rgb8, opacity: f64) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
}
