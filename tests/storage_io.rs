use std::fs;
use tempfile::tempdir;

use elecmap::models::Metric;
use elecmap::ranking::RankedEntry;
use elecmap::{storage, Error};

const GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "name": "Squareland" },
      "geometry": { "type": "Polygon",
        "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]] } },
    { "type": "Feature", "properties": { "ADMIN": "Islands" },
      "geometry": { "type": "MultiPolygon",
        "coordinates": [[[[20,0],[22,0],[22,2],[20,0]]], [[[30,0],[32,0],[32,2],[30,0]]]] } },
    { "type": "Feature", "properties": { "name": "Pointy" },
      "geometry": { "type": "Point", "coordinates": [1, 1] } },
    { "type": "Feature", "properties": {},
      "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } }
  ]
}"#;

fn entries() -> Vec<RankedEntry> {
    vec![
        RankedEntry {
            country: "United States".into(),
            generation: 4178.0,
            consumption: 3902.0,
            imports: 44.0,
            total: 4222.0,
        },
        RankedEntry {
            country: "=HYPERLINK(\"http://evil\")".into(),
            generation: 1.0,
            consumption: 1.0,
            imports: 0.0,
            total: 1.0,
        },
    ]
}

#[test]
fn json_dataset_loads_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("countries.json");
    fs::write(
        &path,
        r#"{ "RUS": { "name": "Russia",
                      "self_sufficiency_rate": { "2018": 118.2, "2019": null },
                      "net_generation": { "2018": "1050.5" } } }"#,
    )
    .unwrap();
    let recs = storage::load_dataset(&path).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].value(Metric::SelfSufficiencyRate, 2018), Some(118.2));
    assert_eq!(recs[0].value(Metric::SelfSufficiencyRate, 2019), None);
    assert_eq!(recs[0].value(Metric::NetGeneration, 2018), Some(1050.5));
}

#[test]
fn tidy_csv_dataset_groups_rows_by_country() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("countries.csv");
    fs::write(
        &path,
        "country,metric,year,value\n\
         France,net_generation,2018,540.2\n\
         Chad,imports,2018,\n\
         France,self-sufficiency-rate,2018,112\n",
    )
    .unwrap();
    let recs = storage::load_dataset(&path).unwrap();
    let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["France", "Chad"]);
    assert_eq!(recs[0].value(Metric::SelfSufficiencyRate, 2018), Some(112.0));
    assert!(recs[1].imports.is_empty());
}

#[test]
fn unknown_metric_in_csv_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "country,metric,year,value\nFrance,exports,2018,1\n").unwrap();
    assert!(matches!(storage::load_dataset(&path), Err(Error::UnknownMetric(_))));
}

#[test]
fn missing_file_reports_path() {
    let err = storage::load_dataset("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, Error::FileRead { .. }));
    assert!(err.to_string().contains("/definitely/not/here.json"));
}

#[test]
fn geography_keeps_named_polygon_features() {
    let features = storage::parse_geography(GEOJSON).unwrap();
    let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Squareland", "Islands"]);
    assert_eq!(features[0].polygons.len(), 1);
    assert_eq!(features[0].polygons[0][0].len(), 5);
    assert_eq!(features[1].polygons.len(), 2);
    assert_eq!(features[1].polygons[1][0][0], (30.0, 0.0));
}

#[test]
fn bare_geometry_is_rejected() {
    let text = r#"{ "type": "Point", "coordinates": [1, 1] }"#;
    assert!(matches!(storage::parse_geography(text), Err(Error::Dataset(_))));
}

#[test]
fn ranking_exports_csv_and_json() {
    let dir = tempdir().unwrap();
    let rows = entries();

    let csv_path = dir.path().join("ranking.csv");
    storage::save_ranking_csv(&rows, &csv_path).unwrap();
    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["rank", "country", "consumption", "generation", "imports", "total"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "1");
    assert_eq!(&records[0][1], "United States");
    assert!(records[1][1].starts_with('\''), "formula cell is quoted");

    let json_path = dir.path().join("ranking.json");
    storage::save_ranking_json(&rows, &json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert_eq!(v[0]["country"], "United States");
    assert_eq!(v[0]["total"], 4222.0);
}
