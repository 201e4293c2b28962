use elecmap::choropleth::{self, blend_fills};
use elecmap::color::{NO_DATA, YELLOW};
use elecmap::models::{CountryRecord, Metric, UiState};
use elecmap::{DashboardConfig, Dataset, Rgb8};

fn sample() -> Dataset {
    Dataset::new(vec![
        CountryRecord::new("Russia")
            .with(Metric::SelfSufficiencyRate, &[(2018, 100.0)])
            .with(Metric::NetGeneration, &[(2018, 1050.0)]),
        CountryRecord::new("France")
            .with(Metric::SelfSufficiencyRate, &[(2018, 112.0)])
            .with(Metric::NetGeneration, &[(2018, 540.0)]),
    ])
}

const REGIONS: [&str; 3] = ["Russian Federation", "France", "Atlantis"];

#[test]
fn unresolved_region_gets_neutral_fill() {
    let ds = sample();
    let scene = choropleth::render(REGIONS, &ds, &UiState::default(), 960.0, &DashboardConfig::default());

    assert_eq!(scene.regions.len(), 3);
    let atlantis = scene.region("Atlantis").unwrap();
    assert_eq!(atlantis.fill, NO_DATA);
    assert!(atlantis.record.is_none());

    let russia = scene.region("Russian Federation").unwrap();
    assert_eq!(russia.record.as_deref(), Some("Russia"));
    assert_eq!(russia.value, Some(100.0));
    assert_eq!(russia.fill, YELLOW);
}

#[test]
fn resolved_region_without_value_is_neutral() {
    let ds = sample();
    let state = UiState { year: 2010, ..UiState::default() };
    let scene = choropleth::render(REGIONS, &ds, &state, 960.0, &DashboardConfig::default());
    assert!(scene.regions.iter().all(|r| r.fill == NO_DATA));
    // The diverging legend does not depend on the year's values.
    assert!(scene.legend.is_some());
}

#[test]
fn sequential_metric_without_values_has_no_legend() {
    let ds = sample();
    let state = UiState {
        metric: Metric::Imports,
        ..UiState::default()
    };
    let scene = choropleth::render(REGIONS, &ds, &state, 960.0, &DashboardConfig::default());
    assert!(scene.legend.is_none());
    assert!(scene.fills().iter().all(|&c| c == NO_DATA));
}

#[test]
fn transition_duration_comes_from_config() {
    let config = DashboardConfig {
        transition_ms: 250,
        ..DashboardConfig::default()
    };
    let scene = choropleth::render(REGIONS, &sample(), &UiState::default(), 960.0, &config);
    assert_eq!(scene.transition.as_millis(), 250);
}

#[test]
fn blend_fills_hits_both_ends() {
    let from = [Rgb8::new(0, 0, 0), Rgb8::new(100, 100, 100)];
    let to = [Rgb8::new(200, 100, 0), Rgb8::new(100, 100, 100), Rgb8::new(9, 9, 9)];
    assert_eq!(blend_fills(&from, &to, 0.0)[..2], from);
    assert_eq!(blend_fills(&from, &to, 1.0), to.to_vec());
    let mid = blend_fills(&from, &to, 0.5);
    assert_eq!(mid[0], Rgb8::new(100, 50, 0));
    assert_eq!(mid[2], Rgb8::new(9, 9, 9));
}
