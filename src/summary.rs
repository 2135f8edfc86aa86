//! Country time-series summarization.
//!
//! Everything here is a pure function over an immutable [`Dataset`]: the same inputs always
//! produce the same outputs, so callers are free to cache results per selection.

use crate::error::SummaryError;
use crate::models::{Dataset, Metric, Record};
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Distinct country identifiers, sorted alphabetically.
pub fn list_countries(dataset: &Dataset) -> Vec<String> {
    let names: BTreeSet<&str> = dataset.iter().map(|r| r.country.as_str()).collect();
    names.into_iter().map(str::to_owned).collect()
}

/// A single country's records sorted ascending by year. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySeries {
    country: String,
    records: Vec<Record>,
}

impl CountrySeries {
    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Observation for the earliest year.
    pub fn first(&self) -> &Record {
        &self.records[0]
    }

    /// Observation for the latest year.
    pub fn last(&self) -> &Record {
        &self.records[self.records.len() - 1]
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.iter().map(|r| r.year)
    }

    /// `(year, value)` pairs for one metric, ready for charting.
    pub fn points(&self, metric: Metric) -> Vec<(i32, f64)> {
        self.records
            .iter()
            .map(|r| (r.year, r.value(metric)))
            .collect()
    }
}

/// Filter the dataset to one country (exact, case-sensitive match) and sort by year.
pub fn build_series(dataset: &Dataset, country: &str) -> Result<CountrySeries, SummaryError> {
    if country.is_empty() {
        return Err(SummaryError::EmptyCountry);
    }
    let mut records: Vec<Record> = dataset
        .iter()
        .filter(|r| r.country == country)
        .cloned()
        .collect();
    if records.is_empty() {
        return Err(SummaryError::NotFound(country.to_string()));
    }
    records.sort_by_key(|r| r.year);
    debug!(
        "series for {}: {} records, {}..={}",
        country,
        records.len(),
        records[0].year,
        records[records.len() - 1].year
    );
    Ok(CountrySeries {
        country: country.to_string(),
        records,
    })
}

/// First/last observations of a country plus the change between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub first: Record,
    pub last: Record,
    pub population_delta: f64,
    pub gdp_delta: f64,
    pub life_expectancy_delta: f64,
    pub series: CountrySeries,
}

impl Summary {
    pub fn country(&self) -> &str {
        self.series.country()
    }

    /// `last - first` for the given metric.
    pub fn delta(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Population => self.population_delta,
            Metric::GdpPerCapita => self.gdp_delta,
            Metric::LifeExpectancy => self.life_expectancy_delta,
        }
    }

    /// Relative GDP per capita change in percent; `None` when the first value is zero.
    pub fn gdp_growth_percent(&self) -> Option<f64> {
        if self.first.gdp_per_capita == 0.0 {
            None
        } else {
            Some(self.gdp_delta / self.first.gdp_per_capita * 100.0)
        }
    }

    pub fn gdp_series(&self) -> Vec<(i32, f64)> {
        self.series.points(Metric::GdpPerCapita)
    }

    pub fn life_expectancy_series(&self) -> Vec<(i32, f64)> {
        self.series.points(Metric::LifeExpectancy)
    }
}

pub fn summarize(series: &CountrySeries) -> Summary {
    let first = series.first().clone();
    let last = series.last().clone();
    Summary {
        population_delta: last.population - first.population,
        gdp_delta: last.gdp_per_capita - first.gdp_per_capita,
        life_expectancy_delta: last.life_expectancy - first.life_expectancy,
        first,
        last,
        series: series.clone(),
    }
}

/// The three metric values of one observation, without the identifying fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub population: f64,
    pub gdp_per_capita: f64,
    pub life_expectancy: f64,
}

impl Observation {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Population => self.population,
            Metric::GdpPerCapita => self.gdp_per_capita,
            Metric::LifeExpectancy => self.life_expectancy,
        }
    }
}

impl From<&Record> for Observation {
    fn from(r: &Record) -> Self {
        Self {
            population: r.population,
            gdp_per_capita: r.gdp_per_capita,
            life_expectancy: r.life_expectancy,
        }
    }
}

/// One year present in both compared series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoinedPoint {
    pub year: i32,
    pub primary: Observation,
    pub secondary: Observation,
}

/// Two country summaries side by side.
///
/// `*_diff` fields are `primary.last - secondary.last`. `joined` holds only the years both
/// countries report, so comparison charts are truncated to the overlapping range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub primary: Summary,
    pub secondary: Summary,
    pub population_diff: f64,
    pub gdp_diff: f64,
    pub life_expectancy_diff: f64,
    pub joined: Vec<JoinedPoint>,
}

impl ComparisonSummary {
    pub fn diff(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Population => self.population_diff,
            Metric::GdpPerCapita => self.gdp_diff,
            Metric::LifeExpectancy => self.life_expectancy_diff,
        }
    }

    /// `(year, primary, secondary)` triples for one metric over the overlapping years.
    pub fn joined_points(&self, metric: Metric) -> Vec<(i32, f64, f64)> {
        self.joined
            .iter()
            .map(|p| (p.year, p.primary.get(metric), p.secondary.get(metric)))
            .collect()
    }
}

pub fn compare(primary: &Summary, secondary: &Summary) -> Result<ComparisonSummary, SummaryError> {
    if primary.country() == secondary.country() {
        return Err(SummaryError::InvalidComparison(primary.country().to_string()));
    }
    let joined = join_on_year(primary.series.records(), secondary.series.records());
    debug!(
        "comparing {} with {}: {} overlapping years",
        primary.country(),
        secondary.country(),
        joined.len()
    );
    Ok(ComparisonSummary {
        population_diff: primary.last.population - secondary.last.population,
        gdp_diff: primary.last.gdp_per_capita - secondary.last.gdp_per_capita,
        life_expectancy_diff: primary.last.life_expectancy - secondary.last.life_expectancy,
        primary: primary.clone(),
        secondary: secondary.clone(),
        joined,
    })
}

/// Inner join of two year-sorted, duplicate-free slices.
fn join_on_year(a: &[Record], b: &[Record]) -> Vec<JoinedPoint> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    while i < a.len() && j < b.len() {
        match a[i].year.cmp(&b[j].year) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(JoinedPoint {
                    year: a[i].year,
                    primary: Observation::from(&a[i]),
                    secondary: Observation::from(&b[j]),
                });
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// What the user currently has selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Nothing chosen yet. A valid state, not an error.
    None,
    Single(String),
    Compare(String, String),
}

/// Result of evaluating a [`Selection`].
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Empty,
    Single(Summary),
    Comparison(ComparisonSummary),
}

pub fn evaluate(dataset: &Dataset, selection: &Selection) -> Result<View, SummaryError> {
    match selection {
        Selection::None => Ok(View::Empty),
        Selection::Single(country) => {
            let series = build_series(dataset, country)?;
            Ok(View::Single(summarize(&series)))
        }
        Selection::Compare(a, b) => {
            if a == b {
                return Err(SummaryError::InvalidComparison(a.clone()));
            }
            let first = summarize(&build_series(dataset, a)?);
            let second = summarize(&build_series(dataset, b)?);
            Ok(View::Comparison(compare(&first, &second)?))
        }
    }
}
