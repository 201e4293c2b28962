use elecmap::controller::{self, NO_DATA_TOOLTIP};
use elecmap::models::{CountryRecord, GeographyFeature, Metric, ScaleType, UiState};
use elecmap::{Dashboard, DashboardConfig, Dataset, Event, Redraw};

fn square(name: &str, lon: f64, lat: f64) -> GeographyFeature {
    GeographyFeature::new(
        name,
        vec![vec![vec![
            (lon, lat),
            (lon + 10.0, lat),
            (lon + 10.0, lat + 10.0),
            (lon, lat + 10.0),
            (lon, lat),
        ]]],
    )
}

fn country(name: &str, consumption: f64) -> CountryRecord {
    CountryRecord::new(name)
        .with(Metric::SelfSufficiencyRate, &[(2017, 90.0), (2018, 118.0)])
        .with(Metric::NetGeneration, &[(2017, 10.0), (2018, 12.0)])
        .with(Metric::NetConsumption, &[(2017, consumption), (2018, consumption)])
        .with(Metric::Imports, &[(2017, 1.0), (2018, 2.0)])
}

fn dashboard(n: usize) -> Dashboard {
    // Russia has the smallest consumption, so it ranks last.
    let mut records = vec![country("Russia", 1.0)];
    records.extend((0..n).map(|i| country(&format!("C{i:02}"), 100.0 + i as f64)));
    let features = vec![
        square("Russian Federation", 30.0, 50.0),
        square("Atlantis", -40.0, 0.0),
    ];
    Dashboard::new(Dataset::new(records), &features, DashboardConfig::default())
}

#[test]
fn starts_at_default_year_with_linear_ssr() {
    let d = dashboard(3);
    assert_eq!(*d.state(), UiState::default());
    assert_eq!(d.year_range(), Some((2017, 2018)));
    assert_eq!(d.scene().choropleth.regions.len(), 2);
    assert!(d.scene().detail.is_none());
}

#[test]
fn year_change_redraws_map_and_bars() {
    let mut d = dashboard(3);
    let redraw = d.handle(Event::YearChanged(2017));
    assert!(redraw.choropleth && redraw.bar_chart);
    assert!(!redraw.detail);
    assert_eq!(d.state().year, 2017);
    assert_eq!(d.scene().choropleth.year, 2017);
    assert_eq!(d.scene().bar_chart.chart().unwrap().year, 2017);
}

#[test]
fn year_is_clamped_to_dataset_span() {
    let mut d = dashboard(3);
    d.handle(Event::YearChanged(1960));
    assert_eq!(d.state().year, 2017);
    d.handle(Event::YearChanged(2050));
    assert_eq!(d.state().year, 2018);
}

#[test]
fn metric_and_scale_only_touch_the_map() {
    let mut d = dashboard(3);
    let redraw = d.handle(Event::MetricChanged(Metric::NetGeneration));
    assert_eq!(
        redraw,
        Redraw {
            choropleth: true,
            ..Redraw::default()
        }
    );
    assert_eq!(d.scene().choropleth.metric, Metric::NetGeneration);

    let redraw = d.handle(Event::ScaleChanged(ScaleType::Log));
    assert!(redraw.choropleth && !redraw.bar_chart);
    assert_eq!(d.state().scale, ScaleType::Log);
}

#[test]
fn click_opens_detail_that_follows_year_until_closed() {
    let mut d = dashboard(3);
    let redraw = d.handle(Event::RegionClicked("Russian Federation".into()));
    assert!(redraw.detail);
    let panel = d.scene().detail.as_ref().unwrap();
    assert_eq!(panel.country, "Russian Federation");
    assert_eq!(panel.self_sufficiency, "118.0%");

    let redraw = d.handle(Event::YearChanged(2017));
    assert!(redraw.detail);
    assert_eq!(d.scene().detail.as_ref().unwrap().self_sufficiency, "90.0%");

    d.handle(Event::CloseDetail);
    assert!(d.scene().detail.is_none());
    assert!(d.selected().is_none());
}

#[test]
fn hover_over_unresolved_region_says_no_data() {
    let mut d = dashboard(3);
    d.handle(Event::RegionHovered {
        name: "Atlantis".into(),
        x: 100.0,
        y: 50.0,
    });
    let tip = d.scene().tooltip.as_ref().unwrap();
    assert_eq!(tip.title, "Atlantis");
    assert_eq!(tip.text, NO_DATA_TOOLTIP);
    assert_eq!((tip.x, tip.y), (110.0, 40.0));

    d.handle(Event::HoverOut);
    assert!(d.scene().tooltip.is_none());
}

#[test]
fn tooltip_formats_active_metric() {
    let d = dashboard(3);
    let mut state = *d.state();
    assert_eq!(
        controller::tooltip_text(d.dataset(), "Russian Federation", &state, "en"),
        "Self-Sufficiency Rate (%): 118.0%"
    );
    state.metric = Metric::NetConsumption;
    state.year = 2018;
    assert_eq!(
        controller::tooltip_text(d.dataset(), "Russian Federation", &state, "en"),
        "Net Consumption (TWh): 1"
    );
    state.year = 1999;
    assert_eq!(
        controller::tooltip_text(d.dataset(), "Russian Federation", &state, "en"),
        "Net Consumption (TWh): No data"
    );
}

#[test]
fn hovering_country_outside_top_n_makes_toggle_glow() {
    let mut d = dashboard(35);
    d.handle(Event::RegionHovered {
        name: "Russian Federation".into(),
        x: 10.0,
        y: 10.0,
    });
    let chart = d.scene().bar_chart.chart().unwrap();
    assert!(chart.highlight.is_none());
    assert!(chart.toggle.as_ref().unwrap().glowing);

    d.handle(Event::ToggleShowAll);
    assert!(d.state().show_all);
    let chart = d.scene().bar_chart.chart().unwrap();
    assert!(!chart.toggle.as_ref().unwrap().glowing);
    let hl = chart.highlight.as_ref().unwrap();
    assert_eq!(hl.country, "Russia");
    assert_eq!(hl.row, chart.rows.len() - 1);

    d.handle(Event::HoverOut);
    assert!(d.scene().bar_chart.chart().unwrap().highlight.is_none());
}

#[test]
fn hovering_visible_country_highlights_its_bar() {
    let mut d = dashboard(3);
    d.handle(Event::RegionHovered {
        name: "Russian Federation".into(),
        x: 10.0,
        y: 10.0,
    });
    let chart = d.scene().bar_chart.chart().unwrap();
    assert!(chart.toggle.is_none());
    assert_eq!(chart.highlight.as_ref().unwrap().country, "Russia");
}

#[test]
fn hit_test_finds_projected_region() {
    let d = dashboard(1);
    let map = d.map();
    let region = &map.regions[0];
    let ring = &region.polygons[0][0];
    let n = (ring.len() - 1) as f64;
    let (cx, cy) = ring[..ring.len() - 1]
        .iter()
        .fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x / n, ay + y / n));
    assert_eq!(map.hit_test(cx, cy), Some("Russian Federation"));
    assert_eq!(map.hit_test(-1000.0, -1000.0), None);
}
