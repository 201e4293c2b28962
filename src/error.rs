use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading inputs, configuration, or writing exports.
///
/// Missing or non-numeric data is never an error; it degrades to "no data".
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

pub type Result<T> = std::result::Result<T, Error>;
