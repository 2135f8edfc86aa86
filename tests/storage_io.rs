use gdi_rs::summary::{build_series, summarize};
use gdi_rs::{Dataset, Record, storage};
use std::fs;
use tempfile::tempdir;

fn sample(n: usize) -> Dataset {
    let rows = (0..n)
        .map(|i| Record {
            country: "Germany".into(),
            year: 1952 + 5 * i as i32,
            population: 69_145_952.0 + i as f64,
            continent: Some("Europe".into()),
            life_expectancy: 67.5 + i as f64,
            gdp_per_capita: 7144.114393 + i as f64,
        })
        .collect();
    Dataset::new(rows).unwrap()
}

#[test]
fn csv_export_keeps_header_and_column_order() {
    let series = build_series(&sample(3), "Germany").unwrap();
    let bytes = storage::series_to_csv(&series).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("country,year,pop,continent,lifeExp,gdpPercap")
    );
    assert_eq!(
        lines.next(),
        Some("Germany,1952,69145952.0,Europe,67.5,7144.114393")
    );
    assert_eq!(text.lines().count(), 1 + 3);
}

#[test]
fn save_csv_and_json() {
    let ds = sample(3);
    let series = build_series(&ds, "Germany").unwrap();
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join(storage::export_file_name("Germany", "csv"));
    storage::save_csv(&series, &csv_path).unwrap();
    assert!(csv_path.ends_with("Germany_data.csv"));
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("country,year,"));
    assert_eq!(csv_txt.lines().count(), 1 + series.records().len());

    let json_path = dir.path().join("summary.json");
    storage::save_json(&summarize(&series), &json_path).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v["first"]["year"], 1952);
    assert_eq!(v["last"]["year"], 1962);
    assert_eq!(v["population_delta"], 2.0);
    assert_eq!(v["series"]["records"].as_array().unwrap().len(), 3);
}

// Country names like "=HYPERLINK(...)" would be evaluated by spreadsheet tools when the
// export is opened, so risky leading characters get a single-quote prefix.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let ds = Dataset::new(vec![Record {
        country: "=HYPERLINK(\"http://evil\")".into(),
        year: 2007,
        population: 1.0,
        continent: Some("@foo".into()),
        life_expectancy: 50.0,
        gdp_per_capita: 10.0,
    }])
    .unwrap();
    let series = build_series(&ds, "=HYPERLINK(\"http://evil\")").unwrap();
    let bytes = storage::series_to_csv(&series).unwrap();

    let mut rdr = csv::Reader::from_reader(bytes.as_slice());
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    let cell = |name: &str| {
        let idx = headers
            .iter()
            .position(|h| h == name)
            .expect("header present");
        row.get(idx).unwrap().to_string()
    };

    let country = cell("country");
    assert!(country.starts_with('\''), "country not prefixed: {country}");
    assert!(country.contains("=HYPERLINK"), "country content changed: {country}");

    let continent = cell("continent");
    assert_eq!(continent, "'@foo");
    assert_eq!(cell("year"), "2007");
}
