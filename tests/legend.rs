use elecmap::color::{DEEP_GREEN, DEEP_RED};
use elecmap::config::LegendLayout;
use elecmap::legend::{self, Anchor};
use elecmap::models::{Metric, ScaleType};
use elecmap::ColorScale;

#[test]
fn diverging_legend_for_max_200() {
    let layout = LegendLayout::default();
    let lg = legend::build(
        &ColorScale::Diverging { max: 200.0 },
        Metric::SelfSufficiencyRate,
        2018,
        960.0,
        &layout,
    );

    assert_eq!(lg.title, "Self-Sufficiency Rate (%) - 2018");
    assert_eq!(lg.origin, (740.0, 20.0));

    let values: Vec<f64> = lg.ticks.iter().map(|t| t.value).collect();
    assert_eq!(values, vec![0.0, 50.0, 100.0, 200.0]);

    let t100 = lg.tick(100.0).unwrap();
    let t200 = lg.tick(200.0).unwrap();
    assert_eq!(t100.label, "100%");
    assert_eq!(t200.label, "200%");
    assert!((t200.x - layout.width).abs() < 1e-9);
    assert!((t100.x - 160.0).abs() < 1e-9);
    assert_eq!(lg.tick(0.0).unwrap().anchor, Anchor::Start);
    assert_eq!(t200.anchor, Anchor::End);
    assert_eq!(t100.anchor, Anchor::Middle);

    let be = lg.break_even_x.unwrap();
    assert!((be - t100.x).abs() < 1e-9);
}

#[test]
fn gradient_runs_red_to_green_in_offset_order() {
    let lg = legend::build(
        &ColorScale::Diverging { max: 300.0 },
        Metric::SelfSufficiencyRate,
        2005,
        960.0,
        &LegendLayout::default(),
    );
    assert_eq!(lg.stops.first().unwrap().color, DEEP_RED);
    assert_eq!(lg.stops.last().unwrap().color, DEEP_GREEN);
    assert_eq!(lg.stops.last().unwrap().offset, 1.0);
    assert!(lg.stops.windows(2).all(|w| w[0].offset < w[1].offset));
    assert_eq!(lg.color_at(0.0), Some(DEEP_RED));
}

#[test]
fn max_at_break_even_has_finite_positions() {
    let lg = legend::build(
        &ColorScale::Diverging { max: 100.0 },
        Metric::SelfSufficiencyRate,
        2018,
        960.0,
        &LegendLayout::default(),
    );
    let values: Vec<f64> = lg.ticks.iter().map(|t| t.value).collect();
    assert_eq!(values, vec![0.0, 50.0, 100.0]);
    assert!(lg.ticks.iter().all(|t| t.x.is_finite()));
    assert!(lg.stops.iter().all(|s| s.offset.is_finite()));
}

#[test]
fn sequential_percentage_legend_marks_break_even() {
    let lg = legend::build(
        &ColorScale::Sequential { min: 50.0, max: 150.0, kind: ScaleType::Linear },
        Metric::SelfSufficiencyRate,
        2018,
        960.0,
        &LegendLayout::default(),
    );
    let labels: Vec<&str> = lg.ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["50%", "100%", "150%"]);
    let mid = lg.tick(100.0).unwrap();
    assert!(mid.emphasized);
    assert!((mid.x - 100.0).abs() < 1e-9);
    assert!(lg.break_even_x.is_none());
}

#[test]
fn sequential_energy_legend_shows_min_and_max() {
    let lg = legend::build(
        &ColorScale::Sequential { min: 1.5, max: 640.34, kind: ScaleType::Linear },
        Metric::NetGeneration,
        2018,
        960.0,
        &LegendLayout::default(),
    );
    assert_eq!(lg.title, "Net Generation (TWh)");
    let labels: Vec<&str> = lg.ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["1.5", "640.3"]);
    assert_eq!(lg.stops.len(), 21);
}
