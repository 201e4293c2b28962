//! Choropleth drawing: region polygons, the gradient legend, and the hover tooltip.

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};

use super::text::estimate_text_width_px;
use super::util::{BORDER, MUTED, OUTLINE, TEXT, dashed_line, hpos, label, px, rgb, text_style};
use crate::choropleth::ChoroplethScene;
use crate::color::{NO_DATA, Rgb8};
use crate::controller::Tooltip;
use crate::legend::Legend;
use crate::projection::ProjectedMap;

/// Fill every projected region (exterior rings) with the matching entry of `fills`.
/// Regions past the end of `fills` get the no-data color.
pub fn draw_regions<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    map: &ProjectedMap,
    fills: &[Rgb8],
) -> Result<()> {
    let outline = ShapeStyle {
        color: OUTLINE.to_rgba(),
        filled: false,
        stroke_width: 1,
    };
    for (i, region) in map.regions.iter().enumerate() {
        let fill = rgb(fills.get(i).copied().unwrap_or(NO_DATA));
        for rings in &region.polygons {
            let Some(exterior) = rings.first() else {
                continue;
            };
            if exterior.len() < 3 {
                continue;
            }
            let mut points: Vec<(i32, i32)> = exterior.iter().map(|&(x, y)| (px(x), px(y))).collect();
            area.draw(&Polygon::new(points.clone(), fill.filled()))
                .map_err(|e| anyhow!("{:?}", e))?;
            points.push(points[0]);
            area.draw(&PathElement::new(points, outline))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    Ok(())
}

/// Gradient bar with title, tick labels, and the dashed break-even guide.
pub fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    legend: &Legend,
    labels: bool,
) -> Result<()> {
    let (ox, oy) = (px(legend.origin.0), px(legend.origin.1));
    let (w, h) = (px(legend.width).max(1), px(legend.height).max(1));

    area.draw(&Rectangle::new(
        [(ox - 10, oy - 25), (ox + w + 10, oy + h + 25)],
        WHITE.mix(0.9).filled(),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    area.draw(&Rectangle::new(
        [(ox - 10, oy - 25), (ox + w + 10, oy + h + 25)],
        BORDER.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    // One-pixel slices sampled at their centers.
    for i in 0..w {
        let offset = (i as f64 + 0.5) / w as f64;
        if let Some(c) = legend.color_at(offset) {
            area.draw(&Rectangle::new(
                [(ox + i, oy), (ox + i + 1, oy + h)],
                rgb(c).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    label(
        area,
        labels,
        &legend.title,
        (ox + w / 2, oy - 8),
        &text_style(12, TEXT, HPos::Center, VPos::Bottom),
    )?;

    for tick in &legend.ticks {
        let x = ox + px(tick.x);
        let color = if tick.emphasized { TEXT } else { MUTED };
        area.draw(&PathElement::new(vec![(x, oy + h), (x, oy + h + 5)], color.stroke_width(1)))
            .map_err(|e| anyhow!("{:?}", e))?;
        label(
            area,
            labels,
            &tick.label,
            (x, oy + h + 7),
            &text_style(10, color, hpos(tick.anchor), VPos::Top),
        )?;
    }

    if let Some(bx) = legend.break_even_x {
        let x = ox + px(bx);
        dashed_line(area, (x, oy - 20), (x, oy + h + 5), 2, 2, MUTED.stroke_width(1))?;
    }
    Ok(())
}

/// Tooltip box anchored at its top-left corner, kept inside the area.
pub fn draw_tooltip<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    tooltip: &Tooltip,
    labels: bool,
) -> Result<()> {
    if !labels {
        return Ok(());
    }
    let (aw, ah) = area.dim_in_pixel();
    let w = estimate_text_width_px(&tooltip.title, 13).max(estimate_text_width_px(&tooltip.text, 12)) as i32 + 16;
    let h = 40;
    let x = px(tooltip.x).min(aw as i32 - w).max(0);
    let y = px(tooltip.y).min(ah as i32 - h).max(0);

    area.draw(&Rectangle::new([(x, y), (x + w, y + h)], WHITE.mix(0.95).filled()))
        .map_err(|e| anyhow!("{:?}", e))?;
    area.draw(&Rectangle::new([(x, y), (x + w, y + h)], BORDER.stroke_width(1)))
        .map_err(|e| anyhow!("{:?}", e))?;
    label(area, true, &tooltip.title, (x + 8, y + 5), &text_style(13, TEXT, HPos::Left, VPos::Top))?;
    label(area, true, &tooltip.text, (x + 8, y + 22), &text_style(12, MUTED, HPos::Left, VPos::Top))?;
    Ok(())
}

/// Whole map panel: background, regions, legend, and tooltip.
pub fn draw_map<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    map: &ProjectedMap,
    scene: &ChoroplethScene,
    tooltip: Option<&Tooltip>,
    labels: bool,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    draw_regions(area, map, &scene.fills())?;
    if let Some(legend) = &scene.legend {
        draw_legend(area, legend, labels)?;
    }
    if let Some(t) = tooltip {
        draw_tooltip(area, t, labels)?;
    }
    Ok(())
}
