use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use elecmap::models::{CountryRecord, GeographyFeature, Metric};
use elecmap::{viz, Dashboard, DashboardConfig, Dataset, Event};

fn square(name: &str, lon: f64, lat: f64) -> GeographyFeature {
    GeographyFeature::new(
        name,
        vec![vec![vec![
            (lon, lat),
            (lon + 20.0, lat),
            (lon + 20.0, lat + 15.0),
            (lon, lat + 15.0),
            (lon, lat),
        ]]],
    )
}

fn sample_dashboard() -> Dashboard {
    let records = (0..40)
        .map(|i| {
            CountryRecord::new(format!("Country {i}"))
                .with(Metric::SelfSufficiencyRate, &[(2018, 20.0 + 5.0 * i as f64)])
                .with(Metric::NetGeneration, &[(2018, 10.0 + i as f64)])
                .with(Metric::NetConsumption, &[(2018, 12.0 + 2.0 * i as f64)])
                .with(Metric::Imports, &[(2018, 1.5)])
        })
        .collect();
    let features: Vec<GeographyFeature> = (0..6)
        .map(|i| square(&format!("Country {i}"), -120.0 + 40.0 * i as f64, 10.0))
        .collect();
    Dashboard::new(Dataset::new(records), &features, DashboardConfig::default())
}

fn write_and_check(dashboard: &Dashboard, name: &str) -> String {
    let dir = tempdir().unwrap();
    let path: PathBuf = dir.path().join(format!("{name}.svg"));
    viz::render_dashboard(dashboard, &path).unwrap();
    let meta = fs::metadata(&path).expect("file created");
    assert!(meta.len() > 0, "svg has content");
    fs::read_to_string(&path).unwrap()
}

#[test]
fn svg_contains_legend_and_bars() {
    let d = sample_dashboard();
    let svg = write_and_check(&d, "initial");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Self-Sufficiency Rate (%) - 2018"));
    assert!(svg.contains("Show All Countries"));
    assert!(svg.contains("Energy (TWh)"));
}

#[test]
fn svg_includes_detail_panel_and_tooltip() {
    let mut d = sample_dashboard();
    d.handle(Event::RegionClicked("Country 3".into()));
    d.handle(Event::RegionHovered {
        name: "Atlantis".into(),
        x: 40.0,
        y: 60.0,
    });
    let (w, _) = viz::dashboard_size(&d);
    assert_eq!(w, 960 + viz::detail::PANEL_WIDTH);

    let svg = write_and_check(&d, "detail");
    assert!(svg.contains("Country 3"));
    assert!(svg.contains("Atlantis"));
    assert!(svg.contains("No data available"));
}

#[test]
fn empty_dataset_renders_bar_message() {
    let empty = Dashboard::new(Dataset::default(), &[], DashboardConfig::default());
    let svg = write_and_check(&empty, "empty");
    assert!(svg.contains("No data available for this year"));
}

#[test]
fn sequential_metric_renders() {
    let mut d = sample_dashboard();
    d.handle(Event::MetricChanged(Metric::Imports));
    let svg = write_and_check(&d, "imports");
    assert!(svg.contains("Electricity Imports (TWh)"));
}
