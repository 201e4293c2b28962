//! Visualization: draw a [`Dashboard`] scene to **SVG** or **PNG**.
//!
//! The map sits top-left, the ranked bar chart below it, and the detail panel (when a
//! country is selected) to the right of the map. Scene geometry is computed by the
//! library; this module only turns it into Plotters primitives.
//!
//! Text on the bitmap path goes through `ab_glyph`, which does not discover OS fonts.
//! [`ensure_fonts_registered`] loads one at runtime; without it PNG output has no labels.

pub mod bars;
pub mod detail;
pub mod map;
pub mod text;
pub mod util;

use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::controller::Dashboard;

/// Common install locations of a sans-serif TrueType font.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Register a "sans-serif" font for the bitmap text path; runs once per process.
/// Tries `preferred` first, then [`SYSTEM_FONTS`]. Returns whether a font is available.
pub fn ensure_fonts_registered(preferred: Option<&Path>) -> bool {
    FONT.get_or_init(|| {
        let candidates = preferred
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));
        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            // ab_glyph keeps a 'static reference for the lifetime of the process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            match plotters::style::register_font(
                "sans-serif",
                plotters::style::FontStyle::Normal,
                bytes,
            ) {
                Ok(()) => {
                    debug!("registered font {}", path.display());
                    return Some(path);
                }
                Err(_) => warn!("{} is not a usable font", path.display()),
            }
        }
        warn!("no font found; bitmap output will have no text");
        None
    })
    .is_some()
}

/// Pixel size of the composed dashboard.
pub fn dashboard_size(dashboard: &Dashboard) -> (u32, u32) {
    let map = dashboard.map();
    let (bw, bh) = bar_size(dashboard);
    let detail_w = if dashboard.scene().detail.is_some() {
        detail::PANEL_WIDTH
    } else {
        0
    };
    let left = map.width.max(bw);
    let height = (map.height + bh).max(if detail_w > 0 { detail::PANEL_HEIGHT } else { 0 });
    (left + detail_w, height)
}

fn bar_size(dashboard: &Dashboard) -> (u32, u32) {
    let size = match &dashboard.scene().bar_chart {
        crate::ranking::BarChartScene::Empty { size, .. } => *size,
        crate::ranking::BarChartScene::Chart(c) => c.size,
    };
    (size.0.max(1.0).round() as u32, size.1.max(1.0).round() as u32)
}

/// Render the current scene to `out_path`; `.svg` selects SVG, anything else PNG.
pub fn render_dashboard<P: AsRef<Path>>(dashboard: &Dashboard, out_path: P) -> Result<()> {
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = dashboard_size(dashboard);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_dashboard(&root, dashboard, true)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    } else {
        let labels = ensure_fonts_registered(dashboard.config().font_path.as_deref());
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_dashboard(&root, dashboard, labels)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    info!("wrote {} ({}x{})", out_path.display(), size.0, size.1);
    Ok(())
}

/// Compose all panels onto `root`.
pub fn draw_dashboard<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dashboard: &Dashboard,
    labels: bool,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let scene = dashboard.scene();
    let projected = dashboard.map();
    let (bw, bh) = bar_size(dashboard);

    let map_area = root
        .clone()
        .shrink((0, 0), (projected.width, projected.height));
    map::draw_map(
        &map_area,
        projected,
        &scene.choropleth,
        scene.tooltip.as_ref(),
        labels,
    )?;

    let bar_area = root.clone().shrink((0, projected.height), (bw, bh));
    bars::draw_bar_chart(&bar_area, &scene.bar_chart, labels)?;

    if let Some(panel) = &scene.detail {
        let x = projected.width.max(bw);
        let area = root
            .clone()
            .shrink((x, 0), (detail::PANEL_WIDTH, detail::PANEL_HEIGHT));
        detail::draw_detail(&area, panel, labels)?;
    }
    Ok(())
}
