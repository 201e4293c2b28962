//! Input loading (metrics dataset, geography) and ranking export.

use csv::WriterBuilder;
use geojson::GeoJson;
use indexmap::IndexMap;
use log::{debug, info};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{CountryRecord, GeographyFeature, Metric, Ring};
use crate::ranking::RankedEntry;

/// Property keys tried, in order, for a feature's display name.
const NAME_KEYS: [&str; 4] = ["name", "NAME", "ADMIN", "name_long"];

#[derive(Deserialize)]
struct RawCountry {
    name: String,
    #[serde(default)]
    self_sufficiency_rate: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    net_generation: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    net_consumption: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    imports: BTreeMap<String, serde_json::Value>,
}

/// Either `{ "<id>": { name, ... }, ... }` or `[ { name, ... }, ... ]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDataset {
    Keyed(IndexMap<String, RawCountry>),
    List(Vec<RawCountry>),
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a metrics dataset, choosing the format from the extension (`.csv`, else JSON).
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<CountryRecord>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let records = if is_csv {
        load_dataset_csv(path)?
    } else {
        parse_dataset_json(&read_text(path)?)?
    };
    info!("loaded {} country records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse the JSON metrics dataset, keeping the file's country order.
pub fn parse_dataset_json(text: &str) -> Result<Vec<CountryRecord>> {
    let raw: RawDataset = serde_json::from_str(text)?;
    let list: Vec<RawCountry> = match raw {
        RawDataset::Keyed(map) => map.into_values().collect(),
        RawDataset::List(list) => list,
    };
    Ok(list.into_iter().map(into_record).collect())
}

fn into_record(raw: RawCountry) -> CountryRecord {
    let mut rec = CountryRecord::new(raw.name);
    for (metric, series) in [
        (Metric::SelfSufficiencyRate, raw.self_sufficiency_rate),
        (Metric::NetGeneration, raw.net_generation),
        (Metric::NetConsumption, raw.net_consumption),
        (Metric::Imports, raw.imports),
    ] {
        for (year, value) in series {
            match (year.trim().parse::<i32>(), number(&value)) {
                (Ok(y), Some(v)) => rec.insert(metric, y, v),
                _ => debug!("{}: skipping {} entry {:?} = {}", rec.name, metric, year, value),
            }
        }
    }
    rec
}

/// Numbers and numeric strings; everything else is "no data".
fn number(value: &serde_json::Value) -> Option<f64> {
    let v = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

#[derive(Deserialize)]
struct TidyRow {
    country: String,
    metric: String,
    year: i32,
    #[serde(default)]
    value: String,
}

/// Tidy CSV: `country,metric,year,value`, one observation per row.
pub fn load_dataset_csv<P: AsRef<Path>>(path: P) -> Result<Vec<CountryRecord>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut by_name: IndexMap<String, CountryRecord> = IndexMap::new();
    for row in rdr.deserialize() {
        let row: TidyRow = row?;
        let metric: Metric = row.metric.parse()?;
        let rec = by_name
            .entry(row.country.clone())
            .or_insert_with(|| CountryRecord::new(row.country.clone()));
        match row.value.trim().parse::<f64>() {
            Ok(v) => rec.insert(metric, row.year, v),
            Err(_) => debug!("{}: no {} value for {}", row.country, metric, row.year),
        }
    }
    Ok(by_name.into_values().collect())
}

/// Load geography regions from a GeoJSON file.
pub fn load_geography<P: AsRef<Path>>(path: P) -> Result<Vec<GeographyFeature>> {
    let path = path.as_ref();
    let features = parse_geography(&read_text(path)?)?;
    info!("loaded {} geography features from {}", features.len(), path.display());
    Ok(features)
}

/// Parse a GeoJSON FeatureCollection (or single Feature) into named polygon features.
/// Features without a name or without (Multi)Polygon geometry are skipped.
pub fn parse_geography(text: &str) -> Result<Vec<GeographyFeature>> {
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(Error::Dataset(
                "geography must be a Feature or FeatureCollection".to_string(),
            ));
        }
    };

    let mut out = Vec::with_capacity(features.len());
    for feature in features {
        let name = feature.properties.as_ref().and_then(|p| {
            NAME_KEYS
                .iter()
                .find_map(|k| p.get(*k).and_then(|v| v.as_str()))
                .map(str::to_string)
        });
        let Some(name) = name else {
            debug!("skipping unnamed geography feature");
            continue;
        };
        let polygons = match feature.geometry.map(|g| g.value) {
            Some(geojson::Value::Polygon(rings)) => vec![to_rings(&rings)],
            Some(geojson::Value::MultiPolygon(polys)) => {
                polys.iter().map(|rings| to_rings(rings)).collect()
            }
            _ => {
                debug!("skipping {name}: no polygon geometry");
                continue;
            }
        };
        out.push(GeographyFeature::new(name, polygons));
    }
    Ok(out)
}

fn to_rings(rings: &[Vec<Vec<f64>>]) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter_map(|p| Some((*p.first()?, *p.get(1)?)))
                .collect()
        })
        .collect()
}

/// Save a ranking as CSV with header.
pub fn save_ranking_csv<P: AsRef<Path>>(entries: &[RankedEntry], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("rank", "country", "consumption", "generation", "imports", "total"))?;
    for (i, e) in entries.iter().enumerate() {
        wtr.serialize((i + 1, csv_safe(&e.country), e.consumption, e.generation, e.imports, e.total))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Quote cells that a spreadsheet would evaluate as a formula.
fn csv_safe(cell: &str) -> Cow<'_, str> {
    if cell.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        Cow::Owned(format!("'{cell}"))
    } else {
        Cow::Borrowed(cell)
    }
}

/// Save a ranking as pretty JSON array.
pub fn save_ranking_json<P: AsRef<Path>>(entries: &[RankedEntry], path: P) -> Result<()> {
    let path = path.as_ref();
    let write_err = |source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut f = File::create(path).map_err(write_err)?;
    let s = serde_json::to_string_pretty(entries)?;
    f.write_all(s.as_bytes()).map_err(write_err)?;
    Ok(())
}
