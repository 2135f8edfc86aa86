//! Text rendering of summaries: metric cards, insight sentences, and the raw table.
//!
//! The summarizer only produces numbers; this module decides how they read.

use crate::models::Record;
use crate::summary::{ComparisonSummary, CountrySeries, Summary};
use num_format::{Locale, ToFormattedString};
use serde::Serialize;

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
        _ => (&Locale::en, '.'),
    }
}

/// Rounded integer with locale thousands separators (`8,425,333`).
pub fn format_count(v: f64, locale_tag: &str) -> String {
    let (locale, _) = map_locale(locale_tag);
    (v.round() as i64).to_formatted_string(locale)
}

/// Fixed decimals with locale grouping and decimal separator (`1.601,06` for `de`).
pub fn format_decimal(v: f64, decimals: usize, locale_tag: &str) -> String {
    let (locale, dec_sep) = map_locale(locale_tag);
    let s = format!("{:.*}", decimals, v.abs());
    let (int_part, frac) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(locale))
        .unwrap_or_else(|_| int_part.to_string());
    let negative = v < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::with_capacity(s.len() + 4);
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push(dec_sep);
        out.push_str(frac);
    }
    out
}

/// Dollar amount with two decimals (`$974.58`, `$-12.30`).
pub fn format_money(v: f64, locale_tag: &str) -> String {
    format!("${}", format_decimal(v, 2, locale_tag))
}

/// One headline number with its change, as shown above the charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub delta: String,
}

/// Cards for a single country: latest values and change since the first year.
pub fn summary_cards(summary: &Summary, locale_tag: &str) -> Vec<MetricCard> {
    let (first, last) = (&summary.first, &summary.last);
    vec![
        MetricCard {
            label: format!("Total Population ({})", last.year),
            value: format_count(last.population, locale_tag),
            delta: format!(
                "{} since {}",
                format_count(summary.population_delta, locale_tag),
                first.year
            ),
        },
        MetricCard {
            label: "GDP per Capita".into(),
            value: format_money(last.gdp_per_capita, locale_tag),
            delta: format_money(summary.gdp_delta, locale_tag),
        },
        MetricCard {
            label: "Life Expectancy".into(),
            value: format!("{} Yrs", format_decimal(last.life_expectancy, 2, locale_tag)),
            delta: format_decimal(summary.life_expectancy_delta, 2, locale_tag),
        },
    ]
}

/// Cards for a comparison: the primary country's latest values against the secondary's.
pub fn comparison_cards(cmp: &ComparisonSummary, locale_tag: &str) -> Vec<MetricCard> {
    let a = cmp.primary.country();
    let b = cmp.secondary.country();
    let last = &cmp.primary.last;
    vec![
        MetricCard {
            label: format!("Population ({a})"),
            value: format_count(last.population, locale_tag),
            delta: format!("{} vs {b}", format_count(cmp.population_diff, locale_tag)),
        },
        MetricCard {
            label: format!("GDP per Capita ({a})"),
            value: format_money(last.gdp_per_capita, locale_tag),
            delta: format!("{} vs {b}", format_money(cmp.gdp_diff, locale_tag)),
        },
        MetricCard {
            label: format!("Life Exp. ({a})"),
            value: format_decimal(last.life_expectancy, 2, locale_tag),
            delta: format!(
                "{} vs {b}",
                format_decimal(cmp.life_expectancy_diff, 2, locale_tag)
            ),
        },
    ]
}

/// One-sentence takeaway for a single country.
pub fn summary_insight(summary: &Summary) -> String {
    let mut s = format!(
        "Between {} and {}, {}'s ",
        summary.first.year,
        summary.last.year,
        summary.country()
    );
    if let Some(pct) = summary.gdp_growth_percent() {
        let verb = if pct >= 0.0 { "increased" } else { "decreased" };
        s.push_str(&format!("GDP {verb} by {:.1}%, while ", pct.abs()));
    }
    let life = summary.life_expectancy_delta;
    let verb = if life >= 0.0 { "improved" } else { "declined" };
    s.push_str(&format!("life expectancy {verb} by {:.1} years.", life.abs()));
    s
}

/// One-sentence takeaway for a comparison, based on the latest year of the primary country.
pub fn comparison_insight(cmp: &ComparisonSummary, locale_tag: &str) -> String {
    let direction = if cmp.gdp_diff > 0.0 { "higher" } else { "lower" };
    format!(
        "In {}, {}'s GDP per capita was {} {} than {}, with a life expectancy difference of {:.1} years.",
        cmp.primary.last.year,
        cmp.primary.country(),
        format_money(cmp.gdp_diff.abs(), locale_tag),
        direction,
        cmp.secondary.country(),
        cmp.life_expectancy_diff.abs()
    )
}

/// Raw rows for the data table, newest year first.
pub fn table_rows(series: &CountrySeries) -> Vec<&Record> {
    series.records().iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_follow_locale() {
        assert_eq!(format_decimal(1601.056136, 2, "en"), "1,601.06");
        assert_eq!(format_decimal(1601.056136, 2, "de"), "1.601,06");
        assert_eq!(format_decimal(-0.001, 2, "en"), "0.00");
        assert_eq!(format_decimal(-12.3, 2, "en"), "-12.30");
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(23_464_590.0, "en"), "23,464,590");
        assert_eq!(format_count(-1_500.0, "en"), "-1,500");
    }

    #[test]
    fn money_has_dollar_prefix() {
        assert_eq!(format_money(974.5803384, "en"), "$974.58");
    }
}
