use std::fs;
use tempfile::tempdir;

use elecmap::{DashboardConfig, Error};

#[test]
fn defaults_match_the_dashboard_layout() {
    let cfg = DashboardConfig::default();
    assert_eq!(cfg.default_year, 2018);
    assert_eq!(cfg.locale, "en");
    assert_eq!((cfg.map.width, cfg.map.height), (960, 500));
    assert_eq!(cfg.legend.width, 200.0);
    assert_eq!(cfg.legend.height, 15.0);
    assert_eq!(cfg.legend.margin, 20.0);
    assert_eq!(cfg.bars.top_n, 30);
    assert_eq!(cfg.bars.max_labels, 50);
    assert!(cfg.font_path.is_none());
}

#[test]
fn load_reads_toml_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("elecmap.toml");
    fs::write(
        &path,
        "locale = \"de\"\ntransition_ms = 250\n\n[map]\nwidth = 800\n",
    )
    .unwrap();
    let cfg = DashboardConfig::load(&path).unwrap();
    assert_eq!(cfg.locale, "de");
    assert_eq!(cfg.transition_ms, 250);
    assert_eq!(cfg.map.width, 800);
    assert_eq!(cfg.map.height, 500);
    assert_eq!(cfg.default_year, 2018);
}

#[test]
fn missing_file_is_a_read_error() {
    let err = DashboardConfig::load("/no/such/elecmap.toml").unwrap_err();
    assert!(matches!(err, Error::FileRead { .. }));
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[bars\ntop_n = 3").unwrap();
    assert!(matches!(
        DashboardConfig::load(&path),
        Err(Error::TomlParse(_))
    ));
}
