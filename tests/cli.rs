use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const DATASET: &str = r#"{
  "RUS": { "name": "Russia",
           "self_sufficiency_rate": { "2018": 118.0 },
           "net_generation": { "2018": 1050.0 },
           "net_consumption": { "2018": 890.0 },
           "imports": { "2018": 3.0 } },
  "FRA": { "name": "France",
           "self_sufficiency_rate": { "2018": 112.0 },
           "net_generation": { "2018": 540.0 },
           "net_consumption": { "2018": 470.0 },
           "imports": { "2018": 13.0 } }
}"#;

const GEOJSON: &str = r#"{ "type": "FeatureCollection", "features": [
  { "type": "Feature", "properties": { "name": "Russian Federation" },
    "geometry": { "type": "Polygon", "coordinates": [[[40,50],[90,50],[90,70],[40,70],[40,50]]] } },
  { "type": "Feature", "properties": { "name": "France" },
    "geometry": { "type": "Polygon", "coordinates": [[[0,43],[7,43],[7,50],[0,50],[0,43]]] } }
] }"#;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("elecmap").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("elecmap"));
}

#[test]
fn resolve_uses_alias_table() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("countries.json");
    fs::write(&data, DATASET).unwrap();

    let mut cmd = Command::cargo_bin("elecmap").unwrap();
    cmd.arg("resolve")
        .arg("--data")
        .arg(&data)
        .args(["Russian Federation", "Atlantis"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Russian Federation -> Russia"))
        .stdout(predicate::str::contains("Atlantis -> (no data)"));
}

#[test]
fn rank_prints_and_exports() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("countries.json");
    let out = dir.path().join("ranking.csv");
    fs::write(&data, DATASET).unwrap();

    let mut cmd = Command::cargo_bin("elecmap").unwrap();
    cmd.arg("rank")
        .arg("--data")
        .arg(&data)
        .args(["--year", "2018", "--out"])
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1. Russia"))
        .stdout(predicate::str::contains("2. France"));
    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn render_writes_svg() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("countries.json");
    let geo = dir.path().join("world.geojson");
    let out = dir.path().join("dashboard.svg");
    fs::write(&data, DATASET).unwrap();
    fs::write(&geo, GEOJSON).unwrap();

    let mut cmd = Command::cargo_bin("elecmap").unwrap();
    cmd.arg("render")
        .arg("--data")
        .arg(&data)
        .arg("--geo")
        .arg(&geo)
        .arg("--out")
        .arg(&out)
        .args(["--select", "France", "--hover", "Russian Federation"]);
    cmd.assert().success();
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Self-Sufficiency Rate (%): 118.0%"));
}

#[test]
fn missing_dataset_fails() {
    let mut cmd = Command::cargo_bin("elecmap").unwrap();
    cmd.args(["stats", "--data", "/no/such/file.json"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("reading dataset"));
}
