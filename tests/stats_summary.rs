use elecmap::models::{CountryRecord, Metric};
use elecmap::stats::metric_summary;
use elecmap::Dataset;

#[test]
fn per_year_summary_handles_missing_and_median_even_odd() {
    // 2018: [1, 2, 3, 4] -> median 2.5; 2019: [10, 30] with one country missing -> median 20;
    // 2020 has no values but lies inside the span.
    let ds = Dataset::new(vec![
        CountryRecord::new("A").with(Metric::Imports, &[(2018, 1.0), (2019, 10.0)]),
        CountryRecord::new("B").with(Metric::Imports, &[(2018, 2.0), (2019, f64::NAN)]),
        CountryRecord::new("C").with(Metric::Imports, &[(2018, 3.0), (2019, 30.0)]),
        CountryRecord::new("D")
            .with(Metric::Imports, &[(2018, 4.0)])
            .with(Metric::NetGeneration, &[(2021, 5.0)]),
    ]);
    let out = metric_summary(&ds, Metric::Imports);
    let years: Vec<i32> = out.iter().map(|s| s.year).collect();
    assert_eq!(years, vec![2018, 2019, 2020, 2021]);

    let y2018 = &out[0];
    assert_eq!(y2018.count, 4);
    assert_eq!(y2018.missing, 0);
    assert_eq!(y2018.min, Some(1.0));
    assert_eq!(y2018.max, Some(4.0));
    assert_eq!(y2018.mean, Some(2.5));
    assert_eq!(y2018.median, Some(2.5));

    let y2019 = &out[1];
    assert_eq!(y2019.count, 2);
    assert_eq!(y2019.missing, 2);
    assert_eq!(y2019.median, Some(20.0));

    let y2020 = &out[2];
    assert_eq!(y2020.count, 0);
    assert_eq!(y2020.missing, 4);
    assert!(y2020.mean.is_none() && y2020.median.is_none());
}

#[test]
fn empty_dataset_has_no_summary() {
    assert!(metric_summary(&Dataset::default(), Metric::SelfSufficiencyRate).is_empty());
}
