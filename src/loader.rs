//! Load the Gapminder five-year dataset into an immutable [`Dataset`].
//!
//! Input is CSV with a header row. Columns are matched by name, so their order does not
//! matter; `country`, `year`, `pop`, `lifeExp` and `gdpPercap` are required and `continent`
//! is optional. Any other column is ignored.
//!
//! ```no_run
//! # use gdi_rs::loader::{DataSource, Loader};
//! let loader = Loader::new()?;
//! let dataset = loader.load(&DataSource::default())?;
//! println!("{} records", dataset.len());
//! # Ok::<(), gdi_rs::LoadError>(())
//! ```

use crate::error::LoadError;
use crate::models::{Dataset, Record};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Plotly's mirror of the Gapminder five-year dataset (1952..=2007, 142 countries).
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/plotly/datasets/master/gapminderDataFiveYear.csv";

const REQUIRED_COLUMNS: [&str; 5] = ["country", "year", "pop", "lifeExp", "gdpPercap"];

/// Where the dataset comes from: a local CSV file or an `http(s)://` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Url(DEFAULT_SOURCE_URL.to_string())
    }
}

impl FromStr for DataSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(DataSource::Url(s.to_string()))
        } else {
            Ok(DataSource::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(u) => f.write_str(u),
            DataSource::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Blocking loader. Owns the HTTP client used for URL sources.
#[derive(Debug, Clone)]
pub struct Loader {
    http: HttpClient,
}

impl Loader {
    pub fn new() -> Result<Self, LoadError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("gdi_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LoadError::Http {
                url: String::new(),
                message: format!("build http client: {e}"),
            })?;
        Ok(Self { http })
    }

    pub fn load(&self, source: &DataSource) -> Result<Dataset, LoadError> {
        match source {
            DataSource::Url(url) => self.load_url(url),
            DataSource::Path(path) => load_path(path),
        }
    }

    pub fn load_url(&self, url: &str) -> Result<Dataset, LoadError> {
        let body = self.fetch_bytes(url)?;
        let dataset = from_reader(body.as_slice())?;
        info!("loaded {} records from {}", dataset.len(), url);
        Ok(dataset)
    }

    /// GET with a small retry for transient failures (5xx / network errors).
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let http_err = |message: String| LoadError::Http {
            url: url.to_string(),
            message,
        };
        let mut last_err = String::from("no attempt made");
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    return r
                        .bytes()
                        .map(|b| b.to_vec())
                        .map_err(|e| http_err(format!("read body: {e}")));
                }
                Ok(r) if r.status().is_server_error() => {
                    last_err = format!("HTTP {}", r.status());
                }
                Ok(r) => return Err(http_err(format!("HTTP {}", r.status()))),
                Err(e) => last_err = e.to_string(),
            }
            warn!("GET {url} failed ({last_err}), retrying in {backoff_ms} ms");
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(http_err(last_err))
    }
}

/// Load a dataset from a local CSV file.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = from_reader(file)?;
    info!("loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Parse CSV from any reader. Fails on empty input, missing columns, blank country
/// identifiers, invalid values, and duplicate (country, year) pairs.
pub fn from_reader<R: Read>(rdr: R) -> Result<Dataset, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(rdr);
    let headers = reader.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col));
        }
    }

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    while reader.read_record(&mut row)? {
        let rec: Record = row.deserialize(Some(&headers))?;
        if rec.country.is_empty() {
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            return Err(LoadError::MissingCountry { line });
        }
        records.push(rec);
    }

    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    Dataset::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_from_str_detects_urls() {
        assert_eq!(
            "https://example.org/x.csv".parse::<DataSource>().unwrap(),
            DataSource::Url("https://example.org/x.csv".into())
        );
        assert_eq!(
            "HTTP://example.org/x.csv".parse::<DataSource>().unwrap(),
            DataSource::Url("HTTP://example.org/x.csv".into())
        );
        assert_eq!(
            "data/gapminder.csv".parse::<DataSource>().unwrap(),
            DataSource::Path(PathBuf::from("data/gapminder.csv"))
        );
    }

    #[test]
    fn default_source_is_gapminder_mirror() {
        assert_eq!(DataSource::default().to_string(), DEFAULT_SOURCE_URL);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
