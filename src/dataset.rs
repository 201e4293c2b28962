//! Name resolution between the geography source and the metrics dataset.

use ahash::AHashMap;
use log::debug;

use crate::models::{CountryRecord, Metric};

/// Known naming divergences: geography-source name → metrics-source name.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("United States of America", "United States"),
    ("Russian Federation", "Russia"),
    ("United Kingdom", "United Kingdom"),
    ("Democratic Republic of the Congo", "Dem. Rep. Congo"),
    ("Central African Republic", "Central African Rep."),
    ("Dominican Rep.", "Dominican Republic"),
    ("Eq. Guinea", "Equatorial Guinea"),
    ("W. Sahara", "Western Sahara"),
    ("eSwatini", "Eswatini"),
    ("S. Sudan", "South Sudan"),
    ("Côte d'Ivoire", "Cote d'Ivoire"),
    ("Bosnia and Herz.", "Bosnia and Herzegovina"),
    ("Falkland Is.", "Falkland Islands"),
    ("Solomon Is.", "Solomon Islands"),
    ("Turkiye", "Turkey"),
];

/// Static lookup of geography names to metrics names.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    map: AHashMap<String, String>,
}

impl AliasTable {
    /// An empty table (exact matches only).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut table = Self::empty();
        table.extend(pairs);
        table
    }

    /// Add or override entries.
    pub fn extend<I, A, B>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        for (from, to) in pairs {
            self.map.insert(from.into(), to.into());
        }
    }

    pub fn get(&self, geography_name: &str) -> Option<&str> {
        self.map.get(geography_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Built-in alias table.
pub fn default_aliases() -> AliasTable {
    AliasTable::from_pairs(DEFAULT_ALIASES.iter().copied())
}

/// The immutable metrics dataset plus its name index.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<CountryRecord>,
    index: AHashMap<String, usize>,
    aliases: AliasTable,
    global_max_ssr: f64,
}

impl Dataset {
    /// Build with the built-in alias table.
    pub fn new(records: Vec<CountryRecord>) -> Self {
        Self::with_aliases(records, default_aliases())
    }

    pub fn with_aliases(records: Vec<CountryRecord>, aliases: AliasTable) -> Self {
        let mut index = AHashMap::with_capacity(records.len());
        // Later records win on duplicate names.
        for (i, rec) in records.iter().enumerate() {
            index.insert(rec.name.clone(), i);
        }
        let global_max_ssr = compute_global_max_ssr(&records);
        Self {
            records,
            index,
            aliases,
            global_max_ssr,
        }
    }

    /// Records in dataset order.
    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Exact name lookup.
    pub fn get(&self, name: &str) -> Option<&CountryRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Exact match first, then the alias table. `None` means "no data".
    pub fn resolve(&self, geography_name: &str) -> Option<&CountryRecord> {
        if let Some(rec) = self.get(geography_name) {
            return Some(rec);
        }
        let found = self
            .aliases
            .get(geography_name)
            .and_then(|alias| self.get(alias));
        if found.is_none() {
            debug!("no metrics record for geography name {geography_name:?}");
        }
        found
    }

    /// Maximum self-sufficiency value over all countries and years, rounded up to the
    /// nearest 100 and never below 100.
    pub fn global_max_self_sufficiency(&self) -> f64 {
        self.global_max_ssr
    }

    /// Finite values present for `metric` in `year`, in dataset order.
    pub fn values(&self, metric: Metric, year: i32) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| r.value(metric, year))
            .collect()
    }

    /// Inclusive span of years present in any series.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let years = self.records.iter().flat_map(|r| {
            Metric::ALL
                .into_iter()
                .flat_map(move |m| r.series(m).keys().copied())
        });
        years.fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn compute_global_max_ssr(records: &[CountryRecord]) -> f64 {
    let max = records
        .iter()
        .flat_map(|r| r.self_sufficiency_rate.values().copied())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    ((max / 100.0).ceil() * 100.0).max(100.0)
}
