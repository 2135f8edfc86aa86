use crate::summary::CountrySeries;
use anyhow::{Context, Result, anyhow};
use csv::WriterBuilder;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column order of exported series; identical to the field order of [`crate::Record`].
pub const CSV_HEADER: [&str; 6] = ["country", "year", "pop", "continent", "lifeExp", "gdpPercap"];

/// Default download name for a country's series, e.g. `Afghanistan_data.csv` for `ext = "csv"`.
pub fn export_file_name(country: &str, ext: &str) -> String {
    format!("{country}_data.{ext}")
}

/// Prefix cells that spreadsheet tools would evaluate as formulas.
fn sanitize_cell(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

/// Serialize a series as UTF-8 CSV bytes with a header row.
pub fn series_to_csv(series: &CountrySeries) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for r in series.records() {
        let continent = r.continent.as_deref().map(sanitize_cell);
        wtr.serialize((
            sanitize_cell(&r.country),
            r.year,
            r.population,
            continent,
            r.life_expectancy,
            r.gdp_per_capita,
        ))?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow!("flush csv buffer: {}", e.error()))
}

/// Save a series as CSV with header.
pub fn save_csv<P: AsRef<Path>>(series: &CountrySeries, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = series_to_csv(series)?;
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    f.write_all(&bytes)?;
    Ok(())
}

/// Save any serializable value (series, summary, comparison) as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_only_touches_risky_prefixes() {
        assert_eq!(sanitize_cell("=1+1"), "'=1+1");
        assert_eq!(sanitize_cell("@foo"), "'@foo");
        assert_eq!(sanitize_cell("Cote d'Ivoire"), "Cote d'Ivoire");
        assert_eq!(sanitize_cell(""), "");
    }

    #[test]
    fn export_name_uses_country() {
        assert_eq!(export_file_name("New Zealand", "csv"), "New Zealand_data.csv");
        assert_eq!(export_file_name("Chad", "json"), "Chad_data.json");
    }
}
