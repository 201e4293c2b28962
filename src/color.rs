//! Color scales for the choropleth.
//!
//! Design:
//! - Self-sufficiency rate uses a two-segment diverging scale with 100% as the break-even
//!   point: deep red → yellow on `[0, 100]`, yellow → deep green on `[100, global max]`.
//!   Both segments interpolate in HCL so midtones stay clean.
//! - Every other metric uses a sequential Blues ramp over the `[min, max]` of the values
//!   present for the active metric and year.
//! - Missing values always get [`NO_DATA`], which no scale produces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::Dataset;
use crate::models::{Metric, ScaleType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let h = hex.trim().trim_start_matches('#');
        if h.len() != 6 || !h.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
        Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Straight RGB mix, used for fill transitions.
    pub fn lerp(self, other: Rgb8, t: f64) -> Rgb8 {
        let t = clamp01(t);
        let mix = |a: u8, b: u8| channel(a as f64 + (b as f64 - a as f64) * t);
        Rgb8::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 0% self-sufficiency.
pub const DEEP_RED: Rgb8 = Rgb8::new(0xD7, 0x30, 0x27);
/// Break-even (100%).
pub const YELLOW: Rgb8 = Rgb8::new(0xFE, 0xE0, 0x8B);
/// Global maximum self-sufficiency.
pub const DEEP_GREEN: Rgb8 = Rgb8::new(0x1A, 0x98, 0x50);
/// Regions without data.
pub const NO_DATA: Rgb8 = Rgb8::new(0xEE, 0xEE, 0xEE);

/// ColorBrewer Blues (9 classes), sampled with a uniform B-spline.
pub const BLUES: [Rgb8; 9] = [
    Rgb8::new(0xF7, 0xFB, 0xFF),
    Rgb8::new(0xDE, 0xEB, 0xF7),
    Rgb8::new(0xC6, 0xDB, 0xEF),
    Rgb8::new(0x9E, 0xCA, 0xE1),
    Rgb8::new(0x6B, 0xAE, 0xD6),
    Rgb8::new(0x42, 0x92, 0xC6),
    Rgb8::new(0x21, 0x71, 0xB5),
    Rgb8::new(0x08, 0x51, 0x9C),
    Rgb8::new(0x08, 0x30, 0x6B),
];

pub const BREAK_EVEN: f64 = 100.0;

/// Active color mapping for one metric/year render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorScale {
    /// Self-sufficiency: `[0,100]` red→yellow, `[100,max]` yellow→green, clamped at `max`.
    Diverging { max: f64 },
    /// Blues over `[min, max]` of the values present.
    Sequential { min: f64, max: f64, kind: ScaleType },
}

impl ColorScale {
    /// Pick the scale for a metric. `values` are the finite values present for the active
    /// year; the sequential scale needs at least one, the diverging one needs none.
    pub fn for_metric(
        metric: Metric,
        scale: ScaleType,
        values: &[f64],
        global_max_ssr: f64,
    ) -> Option<Self> {
        if metric == Metric::SelfSufficiencyRate {
            return Some(ColorScale::Diverging {
                max: global_max_ssr,
            });
        }
        let (min, max) = min_max(values)?;
        Some(ColorScale::Sequential {
            min,
            max,
            kind: scale,
        })
    }

    pub fn color(&self, value: f64) -> Rgb8 {
        if !value.is_finite() {
            return NO_DATA;
        }
        match *self {
            ColorScale::Diverging { max } => diverging_color(value, max),
            ColorScale::Sequential { min, max, kind } => blues(normalize(value, min, max, kind)),
        }
    }

    /// Color for an optional value; absent values are neutral.
    pub fn color_opt(&self, value: Option<f64>) -> Rgb8 {
        value.map_or(NO_DATA, |v| self.color(v))
    }

    /// Value domain covered by the legend.
    pub fn domain(&self) -> (f64, f64) {
        match *self {
            ColorScale::Diverging { max } => (0.0, max),
            ColorScale::Sequential { min, max, .. } => (min, max),
        }
    }
}

/// `colorFor(metric, year, value)`: the color a region with `value` gets when `metric`
/// and `year` are active.
pub fn color_for(dataset: &Dataset, metric: Metric, year: i32, scale: ScaleType, value: f64) -> Rgb8 {
    let values = dataset.values(metric, year);
    ColorScale::for_metric(metric, scale, &values, dataset.global_max_self_sufficiency())
        .map_or(NO_DATA, |s| s.color(value))
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn diverging_color(value: f64, max: f64) -> Rgb8 {
    if value <= BREAK_EVEN {
        interpolate_hcl(DEEP_RED, YELLOW, value / BREAK_EVEN)
    } else if max <= BREAK_EVEN {
        YELLOW
    } else {
        let v = value.min(max);
        interpolate_hcl(YELLOW, DEEP_GREEN, (v - BREAK_EVEN) / (max - BREAK_EVEN))
    }
}

fn normalize(value: f64, min: f64, max: f64, kind: ScaleType) -> f64 {
    // Collapsed domain sits mid-ramp.
    if max <= min {
        return 0.5;
    }
    let t = match kind {
        ScaleType::Log if min > 0.0 && value > 0.0 => {
            (value.ln() - min.ln()) / (max.ln() - min.ln())
        }
        _ => (value - min) / (max - min),
    };
    clamp01(t)
}

/// Sample the Blues ramp at `t` in `[0, 1]`.
pub fn blues(t: f64) -> Rgb8 {
    let t = clamp01(t);
    let n = BLUES.len() - 1;
    let i = if t >= 1.0 {
        n - 1
    } else {
        (t * n as f64).floor() as usize
    };
    let local = (t - i as f64 / n as f64) * n as f64;
    let pick = |f: fn(Rgb8) -> u8| {
        let v1 = f(BLUES[i]) as f64;
        let v2 = f(BLUES[i + 1]) as f64;
        let v0 = if i > 0 { f(BLUES[i - 1]) as f64 } else { 2.0 * v1 - v2 };
        let v3 = if i + 2 <= n { f(BLUES[i + 2]) as f64 } else { 2.0 * v2 - v1 };
        channel(basis(local, v0, v1, v2, v3))
    };
    Rgb8::new(pick(|c| c.r), pick(|c| c.g), pick(|c| c.b))
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

// ------------------------ HCL interpolation ------------------------

/// Polar CIELAB (D50). `h` is `None` for achromatic colors.
#[derive(Clone, Copy, Debug)]
pub struct Hcl {
    pub h: Option<f64>, // degrees, 0..360
    pub c: f64,
    pub l: f64,
}

const XN: f64 = 0.96422;
const YN: f64 = 1.0;
const ZN: f64 = 0.82521;
const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

/// Interpolate between two colors in HCL, taking the shorter way around the hue circle.
/// The endpoints are returned unchanged.
pub fn interpolate_hcl(a: Rgb8, b: Rgb8, t: f64) -> Rgb8 {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    let (ha, hb) = (rgb_to_hcl(a), rgb_to_hcl(b));
    let h = match (ha.h, hb.h) {
        (Some(x), Some(y)) => {
            let mut d = y - x;
            if !(-180.0..=180.0).contains(&d) {
                d -= 360.0 * (d / 360.0).round();
            }
            Some(x + t * d)
        }
        (Some(x), None) => Some(x),
        (None, y) => y,
    };
    hcl_to_rgb(Hcl {
        h,
        c: ha.c + t * (hb.c - ha.c),
        l: ha.l + t * (hb.l - ha.l),
    })
}

pub fn rgb_to_hcl(c: Rgb8) -> Hcl {
    let r = srgb_to_linear(c.r);
    let g = srgb_to_linear(c.g);
    let b = srgb_to_linear(c.b);
    let y = xyz_to_lab((0.2225045 * r + 0.7168786 * g + 0.0606169 * b) / YN);
    let (x, z) = if c.r == c.g && c.g == c.b {
        (y, y)
    } else {
        (
            xyz_to_lab((0.4360747 * r + 0.3850649 * g + 0.1430804 * b) / XN),
            xyz_to_lab((0.0139322 * r + 0.0971045 * g + 0.7141733 * b) / ZN),
        )
    };
    let l = 116.0 * y - 16.0;
    let la = 500.0 * (x - y);
    let lb = 200.0 * (y - z);
    if la == 0.0 && lb == 0.0 {
        return Hcl { h: None, c: 0.0, l };
    }
    let mut h = lb.atan2(la).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    Hcl {
        h: Some(h),
        c: (la * la + lb * lb).sqrt(),
        l,
    }
}

pub fn hcl_to_rgb(hcl: Hcl) -> Rgb8 {
    let (la, lb) = match hcl.h {
        Some(h) => {
            let rad = h.to_radians();
            (rad.cos() * hcl.c, rad.sin() * hcl.c)
        }
        None => (0.0, 0.0),
    };
    let y0 = (hcl.l + 16.0) / 116.0;
    let x = XN * lab_to_xyz(y0 + la / 500.0);
    let y = YN * lab_to_xyz(y0);
    let z = ZN * lab_to_xyz(y0 - lb / 200.0);
    Rgb8::new(
        channel(linear_to_srgb(3.1338561 * x - 1.6168667 * y - 0.4906146 * z)),
        channel(linear_to_srgb(-0.9787684 * x + 1.9161415 * y + 0.0334540 * z)),
        channel(linear_to_srgb(0.0719453 * x - 0.2289914 * y + 1.4052427 * z)),
    )
}

fn xyz_to_lab(t: f64) -> f64 {
    if t > T3 { t.cbrt() } else { t / T2 + T0 }
}

fn lab_to_xyz(t: f64) -> f64 {
    if t > T1 { t * t * t } else { T2 * (t - T0) }
}

fn srgb_to_linear(v: u8) -> f64 {
    let x = v as f64 / 255.0;
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(x: f64) -> f64 {
    255.0
        * if x <= 0.0031308 {
            12.92 * x
        } else {
            1.055 * x.powf(1.0 / 2.4) - 0.055
        }
}

// ------------------------ Utilities ------------------------

fn clamp01(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

fn channel(v: f64) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, 255.0) as u8
    }
}
