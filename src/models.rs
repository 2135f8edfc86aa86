use crate::error::LoadError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One (country, year) observation.
///
/// Field order matches the Gapminder five-year CSV (`country,year,pop,continent,lifeExp,gdpPercap`)
/// and is also the column order used when a series is exported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub country: String,
    pub year: i32,
    #[serde(rename = "pop")]
    pub population: f64,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(rename = "lifeExp")]
    pub life_expectancy: f64,
    #[serde(rename = "gdpPercap")]
    pub gdp_per_capita: f64,
}

impl Record {
    /// Value of the given metric for this observation.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Population => self.population,
            Metric::GdpPerCapita => self.gdp_per_capita,
            Metric::LifeExpectancy => self.life_expectancy,
        }
    }
}

/// The three numeric indicators carried by a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Population,
    GdpPerCapita,
    LifeExpectancy,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::Population,
        Metric::GdpPerCapita,
        Metric::LifeExpectancy,
    ];

    /// Human-readable label used for chart captions and axis descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Population => "Population",
            Metric::GdpPerCapita => "GDP per Capita",
            Metric::LifeExpectancy => "Life Expectancy",
        }
    }

    /// Column name in the Gapminder CSV.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Population => "pop",
            Metric::GdpPerCapita => "gdpPercap",
            Metric::LifeExpectancy => "lifeExp",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable, cheaply clonable handle to the full set of observations.
///
/// Built once by the loader (or directly from records in tests) and passed into every
/// summarizer call. Construction rejects blank country identifiers, a second record for
/// an already seen (country, year) pair, and negative or non-finite values.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Arc<[Record]>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Result<Self, LoadError> {
        validate(&records)?;
        Ok(Self {
            records: records.into(),
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn validate(records: &[Record]) -> Result<(), LoadError> {
    let mut seen: AHashSet<(&str, i32)> = AHashSet::with_capacity(records.len());
    for r in records {
        if r.country.trim().is_empty() {
            return Err(LoadError::BlankCountry { year: r.year });
        }
        for metric in Metric::ALL {
            let v = r.value(metric);
            if !v.is_finite() || v < 0.0 {
                return Err(LoadError::InvalidValue {
                    country: r.country.clone(),
                    year: r.year,
                    field: metric.column(),
                });
            }
        }
        if !seen.insert((r.country.as_str(), r.year)) {
            return Err(LoadError::DuplicateYear {
                country: r.country.clone(),
                year: r.year,
            });
        }
    }
    Ok(())
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(country: &str, year: i32) -> Record {
        Record {
            country: country.into(),
            year,
            population: 1.0,
            continent: None,
            life_expectancy: 50.0,
            gdp_per_capita: 100.0,
        }
    }

    #[test]
    fn duplicate_year_is_rejected() {
        let err = Dataset::new(vec![rec("Chad", 1952), rec("Mali", 1952), rec("Chad", 1952)])
            .unwrap_err();
        match err {
            LoadError::DuplicateYear { country, year } => {
                assert_eq!(country, "Chad");
                assert_eq!(year, 1952);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_country_is_rejected() {
        for blank in ["", "   "] {
            assert!(matches!(
                Dataset::new(vec![rec("Chad", 1952), rec(blank, 1957)]),
                Err(LoadError::BlankCountry { year: 1957 })
            ));
        }
    }

    #[test]
    fn listed_countries_are_all_buildable() {
        let ds = Dataset::new(vec![rec("Chad", 1952), rec("Mali", 1957)]).unwrap();
        for country in crate::summary::list_countries(&ds) {
            assert!(crate::summary::build_series(&ds, &country).is_ok(), "{country}");
        }
    }

    #[test]
    fn negative_and_nan_values_are_rejected() {
        let mut bad = rec("Chad", 1957);
        bad.population = -3.0;
        assert!(matches!(
            Dataset::new(vec![bad]),
            Err(LoadError::InvalidValue { field: "pop", .. })
        ));

        let mut nan = rec("Chad", 1957);
        nan.life_expectancy = f64::NAN;
        assert!(matches!(
            Dataset::new(vec![nan]),
            Err(LoadError::InvalidValue { field: "lifeExp", .. })
        ));
    }

    #[test]
    fn clones_share_storage() {
        let ds = Dataset::new(vec![rec("Chad", 1952)]).unwrap();
        let other = ds.clone();
        assert!(std::ptr::eq(ds.records().as_ptr(), other.records().as_ptr()));
        assert_eq!(other.len(), 1);
    }
}
