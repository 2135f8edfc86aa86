use gdi_rs::report::{
    comparison_cards, comparison_insight, summary_cards, summary_insight, table_rows,
};
use gdi_rs::summary::{build_series, compare, summarize};
use gdi_rs::{Dataset, Record, Summary};

fn rec(country: &str, year: i32, pop: f64, life: f64, gdp: f64) -> Record {
    Record {
        country: country.into(),
        year,
        population: pop,
        continent: None,
        life_expectancy: life,
        gdp_per_capita: gdp,
    }
}

fn dataset() -> Dataset {
    Dataset::new(vec![
        rec("Afghanistan", 1952, 8_425_333.0, 28.801, 779.4453145),
        rec("Afghanistan", 1977, 14_880_372.0, 38.438, 786.11336),
        rec("Afghanistan", 2007, 31_889_923.0, 43.828, 974.5803384),
        rec("Albania", 1952, 1_282_697.0, 55.23, 1601.056136),
        rec("Albania", 2007, 3_600_523.0, 76.423, 5937.029526),
    ])
    .unwrap()
}

fn summary_of(ds: &Dataset, country: &str) -> Summary {
    summarize(&build_series(ds, country).unwrap())
}

#[test]
fn single_country_cards() {
    let ds = dataset();
    let cards = summary_cards(&summary_of(&ds, "Afghanistan"), "en");
    assert_eq!(cards.len(), 3);

    assert_eq!(cards[0].label, "Total Population (2007)");
    assert_eq!(cards[0].value, "31,889,923");
    assert_eq!(cards[0].delta, "23,464,590 since 1952");

    assert_eq!(cards[1].label, "GDP per Capita");
    assert_eq!(cards[1].value, "$974.58");
    assert_eq!(cards[1].delta, "$195.14");

    assert_eq!(cards[2].label, "Life Expectancy");
    assert_eq!(cards[2].value, "43.83 Yrs");
    assert_eq!(cards[2].delta, "15.03");
}

#[test]
fn german_locale_swaps_separators() {
    let ds = dataset();
    let cards = summary_cards(&summary_of(&ds, "Albania"), "de");
    assert_eq!(cards[0].value, "3.600.523");
    assert_eq!(cards[1].value, "$5.937,03");
}

#[test]
fn comparison_cards_name_both_countries() {
    let ds = dataset();
    let cmp = compare(&summary_of(&ds, "Afghanistan"), &summary_of(&ds, "Albania")).unwrap();
    let cards = comparison_cards(&cmp, "en");
    assert_eq!(cards[0].label, "Population (Afghanistan)");
    assert_eq!(cards[0].delta, "28,289,400 vs Albania");
    assert_eq!(cards[1].label, "GDP per Capita (Afghanistan)");
    assert_eq!(cards[1].delta, "$-4,962.45 vs Albania");
    assert_eq!(cards[2].label, "Life Exp. (Afghanistan)");
    assert_eq!(cards[2].value, "43.83");
    assert_eq!(cards[2].delta, "-32.59 vs Albania");
}

#[test]
fn insights_read_naturally() {
    let ds = dataset();
    let afg = summary_of(&ds, "Afghanistan");
    assert_eq!(
        summary_insight(&afg),
        "Between 1952 and 2007, Afghanistan's GDP increased by 25.0%, \
         while life expectancy improved by 15.0 years."
    );

    let cmp = compare(&afg, &summary_of(&ds, "Albania")).unwrap();
    assert_eq!(
        comparison_insight(&cmp, "en"),
        "In 2007, Afghanistan's GDP per capita was $4,962.45 lower than Albania, \
         with a life expectancy difference of 32.6 years."
    );
}

#[test]
fn raw_table_is_newest_first() {
    let ds = dataset();
    let series = build_series(&ds, "Afghanistan").unwrap();
    let years: Vec<i32> = table_rows(&series).iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2007, 1977, 1952]);
}
