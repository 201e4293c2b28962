//! Axis helpers: "nice" tick steps, niced domains, and band layout.

/// Tick step for roughly `count` ticks over `[start, stop]` (1/2/5 × 10^k).
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if span == 0.0 || count == 0 || !span.is_finite() {
        return 0.0;
    }
    let raw = span / count as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Tick values inside `[start, stop]`, multiples of [`tick_step`].
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let step = tick_step(start, stop, count);
    if step == 0.0 {
        return if start.is_finite() { vec![start] } else { Vec::new() };
    }
    let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    // Fractional steps divide by the inverse to avoid drift like 0.30000000000000004.
    let inverse = (1.0 / step).round();
    (first..=last)
        .map(|i| {
            if step >= 1.0 {
                i as f64 * step
            } else {
                i as f64 / inverse
            }
        })
        .collect()
}

/// Extend `[start, stop]` outward to whole tick steps.
pub fn nice(start: f64, stop: f64, count: usize) -> (f64, f64) {
    let mut lo = start;
    let mut hi = stop;
    // Two passes settle the step after the domain grows.
    for _ in 0..2 {
        let step = tick_step(lo, hi, count);
        if step == 0.0 {
            break;
        }
        lo = (lo / step).floor() * step;
        hi = (hi / step).ceil() * step;
    }
    (lo, hi)
}

/// Evenly spaced bands over `[range_start, range_end]` with equal inner/outer padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    pub start: f64,
    pub step: f64,
    pub bandwidth: f64,
}

impl BandScale {
    pub fn new(n: usize, range_start: f64, range_end: f64, padding: f64) -> Self {
        let width = range_end - range_start;
        let n_f = n as f64;
        let step = width / (n_f - padding + 2.0 * padding).max(1.0);
        let start = range_start + (width - step * (n_f - padding)) * 0.5;
        Self {
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of band `i`.
    pub fn position(&self, i: usize) -> f64 {
        self.start + self.step * i as f64
    }
}
