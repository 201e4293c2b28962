//! Country detail panel drawing.

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};

use super::util::{BORDER, MUTED, STEELBLUE, TEXT, label, px, text_style};
use crate::detail::{DetailPanel, History, HistoryChart};

pub const PANEL_WIDTH: u32 = 340;
pub const PANEL_HEIGHT: u32 = 380;
const PAD: i32 = 20;
const CHART_TOP: i32 = 160;

pub fn draw_detail<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &DetailPanel,
    labels: bool,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let (w, h) = area.dim_in_pixel();
    area.draw(&Rectangle::new(
        [(0, 0), (w as i32 - 1, h as i32 - 1)],
        BORDER.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    label(
        area,
        labels,
        &panel.country,
        (PAD, PAD),
        &text_style(18, TEXT, HPos::Left, VPos::Top),
    )?;
    let rows = [
        ("Year", panel.year.to_string()),
        ("Production", panel.production.clone()),
        ("Consumption", panel.consumption.clone()),
        ("Trade", panel.trade.clone()),
        ("Self-Sufficiency", panel.self_sufficiency.clone()),
    ];
    for (i, (name, value)) in rows.iter().enumerate() {
        let y = PAD + 32 + i as i32 * 20;
        label(area, labels, name, (PAD, y), &text_style(12, MUTED, HPos::Left, VPos::Top))?;
        label(
            area,
            labels,
            value,
            (PAD + 130, y),
            &text_style(12, TEXT, HPos::Left, VPos::Top),
        )?;
    }

    match &panel.history {
        Some(History::Chart(chart)) => {
            let sub = area.clone().shrink((PAD, CHART_TOP), (chart.size.0 as u32, chart.size.1 as u32));
            draw_history(&sub, chart, labels)?;
        }
        Some(History::NoData { message }) => label(
            area,
            labels,
            message,
            (PAD, CHART_TOP + 20),
            &text_style(12, MUTED, HPos::Left, VPos::Top),
        )?,
        None => {}
    }
    Ok(())
}

fn draw_history<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &HistoryChart,
    labels: bool,
) -> Result<()> {
    for bar in &chart.bars {
        if bar.height <= 0.0 {
            continue;
        }
        area.draw(&Rectangle::new(
            [(px(bar.x), px(bar.y)), (px(bar.x + bar.width), px(bar.y + bar.height))],
            STEELBLUE.filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    let base = px(chart.baseline);
    let left = px(chart.plot_left);
    area.draw(&PathElement::new(
        vec![(left, base), (px(chart.plot_right), base)],
        MUTED.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    area.draw(&PathElement::new(
        vec![(left, px(chart.plot_top)), (left, base)],
        MUTED.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    for (x, text) in &chart.x_ticks {
        label(area, labels, text, (px(*x), base + 4), &text_style(10, MUTED, HPos::Center, VPos::Top))?;
    }
    for (y, text) in &chart.y_ticks {
        let y = px(*y);
        area.draw(&PathElement::new(vec![(left - 4, y), (left, y)], MUTED.stroke_width(1)))
            .map_err(|e| anyhow!("{:?}", e))?;
        label(area, labels, text, (left - 6, y), &text_style(10, MUTED, HPos::Right, VPos::Center))?;
    }
    label(
        area,
        labels,
        chart.label,
        (px(chart.plot_left), 2),
        &text_style(10, TEXT, HPos::Left, VPos::Top),
    )?;
    Ok(())
}
