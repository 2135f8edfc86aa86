//! gdi_rs
//!
//! A small Rust library for summarizing the Gapminder country development dataset
//! (population, GDP per capita, life expectancy per country and year). Pairs with the
//! `gdi` CLI.
//!
//! ### Features
//! - Load the dataset from a local CSV file or its public URL into an immutable handle
//! - Per-country series with first/last year deltas and GDP growth
//! - Two-country comparison with cross deltas and a year-aligned joined series
//! - Locale-aware metric cards and insight sentences
//! - SVG/PNG line charts and CSV/JSON export of a country's series
//!
//! ### Example
//! ```no_run
//! use gdi_rs::loader::{DataSource, Loader};
//! use gdi_rs::summary::{build_series, compare, summarize};
//!
//! let dataset = Loader::new()?.load(&DataSource::default())?;
//! let afg = summarize(&build_series(&dataset, "Afghanistan")?);
//! let alb = summarize(&build_series(&dataset, "Albania")?);
//! println!("population grew by {}", afg.population_delta);
//! let cmp = compare(&afg, &alb)?;
//! println!("{} shared years", cmp.joined.len());
//! gdi_rs::storage::save_csv(&afg.series, "Afghanistan_data.csv")?;
//! gdi_rs::viz::plot_summary(&afg, gdi_rs::Metric::GdpPerCapita, "afg.svg", 1000, 600, "en")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod storage;
pub mod summary;
pub mod viz;

pub use error::{LoadError, SummaryError};
pub use models::{Dataset, Metric, Record};
pub use summary::{ComparisonSummary, CountrySeries, Summary};
