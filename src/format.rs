//! Number formatting for tooltips, labels, and the detail panel.

use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Locale number: thousands separators, at most three decimals, trailing zeros trimmed.
/// `format_number(12345.6789, "en") == "12,345.679"`
pub fn format_number(value: f64, locale_tag: &str) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let Ok(int_value) = int_part.parse::<u64>() else {
        return format!("{value}");
    };
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int_value != 0 || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&int_value.to_formatted_string(locale));
    if !frac.is_empty() {
        out.push(dec_sep);
        out.push_str(frac);
    }
    out
}

/// Energy quantity, e.g. `"512.3 TWh"`.
pub fn format_twh(value: f64, locale_tag: &str) -> String {
    format!("{} TWh", format_number(value, locale_tag))
}

/// Fixed-precision percentage, e.g. `"87.5%"`.
pub fn format_percent(value: f64, precision: usize) -> String {
    format!("{:.*}%", precision, value)
}

/// Format up to 4 decimals, then trim trailing zeros and trailing dot; `NA` if absent.
pub fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_grouping_and_trimming() {
        assert_eq!(format_number(12345.6789, "en"), "12,345.679");
        assert_eq!(format_number(4000.0, "en"), "4,000");
        assert_eq!(format_number(0.5, "en"), "0.5");
        assert_eq!(format_number(-1234.5, "en"), "-1,234.5");
        assert_eq!(format_number(-0.0001, "en"), "0");
    }

    #[test]
    fn german_separators() {
        assert_eq!(format_number(1234567.25, "de"), "1.234.567,25");
    }

    #[test]
    fn huge_magnitudes_are_not_zeroed() {
        assert_eq!(format_number(1e20, "en"), "100000000000000000000");
        assert_eq!(format_number(-1e20, "en"), "-100000000000000000000");
    }

    #[test]
    fn units() {
        assert_eq!(format_twh(512.3, "en"), "512.3 TWh");
        assert_eq!(format_percent(87.54, 1), "87.5%");
        assert_eq!(fmt_opt(Some(2.50)), "2.5");
        assert_eq!(fmt_opt(None), "NA");
    }
}
