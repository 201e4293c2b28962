//! Ranked bar chart drawing.

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};

use super::text::truncate_to_width;
use super::util::{
    BORDER, BUTTON, GLOW_FILL, GLOW_STROKE, MUTED, TEXT, label, px, rgb, rgba, text_style,
};
use crate::ranking::{
    AXIS_TITLE, BarChart, BarChartScene, CONSUMPTION_COLOR, GENERATION_COLOR, IMPORTS_COLOR,
    Rect,
};

const GRID: RGBColor = RGBColor(0xE0, 0xE0, 0xE0);

fn rect<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    r: &Rect,
    style: ShapeStyle,
) -> Result<()> {
    if r.width <= 0.0 || r.height <= 0.0 {
        return Ok(());
    }
    area.draw(&Rectangle::new(
        [(px(r.x), px(r.y)), (px(r.x + r.width), px(r.y + r.height))],
        style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

pub fn draw_bar_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &BarChartScene,
    labels: bool,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    match scene {
        BarChartScene::Empty { message, size, .. } => label(
            area,
            labels,
            message,
            (px(size.0 / 2.0), px(size.1 / 2.0)),
            &text_style(14, MUTED, HPos::Center, VPos::Center),
        ),
        BarChartScene::Chart(chart) => draw_chart(area, chart, labels),
    }
}

fn draw_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &BarChart,
    labels: bool,
) -> Result<()> {
    let bottom = px(chart.plot_bottom);

    // Grid and axis
    for tick in &chart.axis_ticks {
        let x = px(tick.x);
        area.draw(&PathElement::new(
            vec![(x, px(chart.plot_top)), (x, bottom)],
            GRID.stroke_width(1),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        label(
            area,
            labels,
            &tick.label,
            (x, bottom + 6),
            &text_style(10, MUTED, HPos::Center, VPos::Top),
        )?;
    }
    area.draw(&PathElement::new(
        vec![(px(chart.plot_x), bottom), (px(chart.plot_x + chart.plot_width), bottom)],
        MUTED.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    label(
        area,
        labels,
        AXIS_TITLE,
        (px(chart.plot_x + chart.plot_width / 2.0), bottom + 24),
        &text_style(12, TEXT, HPos::Center, VPos::Top),
    )?;

    let highlighted = chart.highlight.as_ref().map(|h| h.row);
    for (i, row) in chart.rows.iter().enumerate() {
        // Other rows fade while one is highlighted.
        let fade = if highlighted.is_some_and(|h| h != i) { 0.4 } else { 1.0 };
        rect(area, &row.consumption, rgba(CONSUMPTION_COLOR, 0.8 * fade).filled())?;
        rect(area, &row.generation, rgba(GENERATION_COLOR, 0.7 * fade).filled())?;
        rect(area, &row.imports, rgba(IMPORTS_COLOR, 0.8 * fade).filled())?;
        if highlighted == Some(i) {
            rect(area, &row.consumption, BLACK.stroke_width(1))?;
        }
    }

    let label_px = (chart.plot_x - 10.0).max(0.0) as u32;
    for l in &chart.labels {
        let text = truncate_to_width(&l.text, 9, label_px);
        label(
            area,
            labels,
            &text,
            (px(l.x), px(l.y)),
            &text_style(9, TEXT, HPos::Right, VPos::Center),
        )?;
    }

    if let Some(h) = &chart.highlight {
        for v in &h.labels {
            let hp = if v.centered { HPos::Center } else { HPos::Left };
            label(
                area,
                labels,
                &v.text,
                (px(v.x), px(v.y)),
                &text_style(10, rgb(v.color), hp, VPos::Center),
            )?;
        }
    }

    // Legend
    let (lx, ly) = (px(chart.legend_origin.0), px(chart.legend_origin.1));
    for (i, swatch) in chart.legend.iter().enumerate() {
        let y = ly + i as i32 * 18;
        area.draw(&Rectangle::new(
            [(lx, y), (lx + 12, y + 12)],
            rgba(swatch.color, swatch.opacity).filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        label(
            area,
            labels,
            swatch.label,
            (lx + 18, y + 6),
            &text_style(11, TEXT, HPos::Left, VPos::Center),
        )?;
    }

    if let Some(toggle) = &chart.toggle {
        let (fill, stroke, width) = if toggle.glowing {
            (GLOW_FILL, GLOW_STROKE, 2)
        } else {
            (BUTTON, BORDER, 1)
        };
        rect(area, &toggle.rect, fill.filled())?;
        rect(area, &toggle.rect, stroke.stroke_width(width))?;
        let r = toggle.rect;
        label(
            area,
            labels,
            &toggle.label,
            (px(r.x + r.width / 2.0), px(r.y + r.height / 2.0)),
            &text_style(12, TEXT, HPos::Center, VPos::Center),
        )?;
    }
    Ok(())
}
