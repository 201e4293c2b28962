use crate::dataset::Dataset;
use crate::models::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics of one metric across countries for one year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub metric: Metric,
    pub year: i32,
    pub count: usize,
    /// Countries without a value for this year.
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Per-year statistics of `metric` over the dataset's year span.
pub fn metric_summary(dataset: &Dataset, metric: Metric) -> Vec<Summary> {
    let Some((first, last)) = dataset.year_span() else {
        return Vec::new();
    };
    let mut groups: BTreeMap<i32, Vec<f64>> = (first..=last).map(|y| (y, Vec::new())).collect();
    for rec in dataset.records() {
        for (&year, &v) in rec.series(metric) {
            if v.is_finite()
                && let Some(vals) = groups.get_mut(&year)
            {
                vals.push(v);
            }
        }
    }

    let total = dataset.len();
    let mut out = Vec::new();
    for (year, mut vals) in groups {
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else { None };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary { metric, year, count, missing: total - count, min, max, mean, median });
    }
    out
}
