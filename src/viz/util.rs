//! Small drawing helpers shared by the map, bar chart, and detail renderers.

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::Rgb8;
use crate::legend::Anchor;

pub const TEXT: RGBColor = RGBColor(0x33, 0x33, 0x33);
pub const MUTED: RGBColor = RGBColor(0x66, 0x66, 0x66);
pub const BORDER: RGBColor = RGBColor(0xCC, 0xCC, 0xCC);
pub const OUTLINE: RGBColor = RGBColor(0x99, 0x99, 0x99);
pub const BUTTON: RGBColor = RGBColor(0xF0, 0xF0, 0xF0);
pub const GLOW_FILL: RGBColor = RGBColor(0xFF, 0xEB, 0x3B);
pub const GLOW_STROKE: RGBColor = RGBColor(0xFF, 0xC1, 0x07);
pub const STEELBLUE: RGBColor = RGBColor(0x46, 0x82, 0xB4);

#[inline]
pub fn rgb(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

#[inline]
pub fn rgba(c: Rgb8, opacity: f64) -> RGBAColor {
    RGBColor(c.r, c.g, c.b).mix(opacity)
}

#[inline]
pub fn px(v: f64) -> i32 {
    v.round() as i32
}

pub fn hpos(anchor: Anchor) -> HPos {
    match anchor {
        Anchor::Start => HPos::Left,
        Anchor::Middle => HPos::Center,
        Anchor::End => HPos::Right,
    }
}

pub fn text_style(size: u32, color: RGBColor, h: HPos, v: VPos) -> TextStyle<'static> {
    FontDesc::from((FontFamily::SansSerif, size))
        .color(&color)
        .pos(Pos::new(h, v))
}

/// Draw text only when glyphs can be rendered on this backend.
pub fn label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    labels: bool,
    text: &str,
    at: (i32, i32),
    style: &TextStyle,
) -> Result<()> {
    if !labels || text.is_empty() {
        return Ok(());
    }
    area.draw(&Text::new(text, at, style.clone()))
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Axis-aligned dashed line; `dash` on, `gap` off.
pub fn dashed_line<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    from: (i32, i32),
    to: (i32, i32),
    dash: i32,
    gap: i32,
    style: ShapeStyle,
) -> Result<()> {
    let vertical = from.0 == to.0;
    let (start, end) = if vertical { (from.1, to.1) } else { (from.0, to.0) };
    let mut p = start.min(end);
    let stop = start.max(end);
    while p < stop {
        let seg_end = (p + dash).min(stop);
        let seg = if vertical {
            vec![(from.0, p), (from.0, seg_end)]
        } else {
            vec![(p, from.1), (seg_end, from.1)]
        };
        area.draw(&PathElement::new(seg, style))
            .map_err(|e| anyhow!("{:?}", e))?;
        p = seg_end + gap;
    }
    Ok(())
}
