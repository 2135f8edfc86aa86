use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use gdi_rs::loader::{self, DataSource, Loader};
use gdi_rs::report::{self, MetricCard};
use gdi_rs::summary::{self, Selection, View};
use gdi_rs::{CountrySeries, Dataset, Metric, SummaryError, storage, viz};
use log::warn;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gdi",
    version,
    about = "Summarize, compare, chart & export Gapminder country development data"
)]
struct Cli {
    /// Dataset location: a local CSV file or an http(s) URL.
    #[arg(long, env = "GDI_DATA", default_value = loader::DEFAULT_SOURCE_URL, global = true)]
    data: String,
    /// Locale for number formatting (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en", global = true)]
    locale: String,
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all countries in the dataset, sorted alphabetically.
    Countries,
    /// Print headline metrics for a country, optionally compared with a second one.
    Summary(SummaryArgs),
    /// Write a country's full series to CSV or JSON.
    Export(ExportArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MetricArg {
    Gdp,
    LifeExp,
    Population,
}

impl From<MetricArg> for Metric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Gdp => Metric::GdpPerCapita,
            MetricArg::LifeExp => Metric::LifeExpectancy,
            MetricArg::Population => Metric::Population,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Main country, exactly as listed by `gdi countries` (e.g., "Afghanistan").
    country: String,
    /// Second country to compare against.
    #[arg(long)]
    compare: Option<String>,
    /// Print the summary as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Also print the raw data table (newest year first).
    #[arg(long, default_value_t = false)]
    table: bool,
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Metric to chart.
    #[arg(long, value_enum, default_value_t = MetricArg::Gdp)]
    metric: MetricArg,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Country to export.
    country: String,
    /// Output file. Defaults to "<COUNTRY>_data.csv" (or ".json" with --format json).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load(source: &DataSource) -> Result<Dataset> {
    let dataset = match source {
        DataSource::Path(path) => loader::load_path(path),
        DataSource::Url(_) => Loader::new()?.load(source),
    }
    .with_context(|| format!("load dataset from {source}"))?;
    Ok(dataset)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source: DataSource = cli.data.parse()?;
    let dataset = load(&source)?;

    match cli.cmd {
        Command::Countries => {
            for name in summary::list_countries(&dataset) {
                println!("{name}");
            }
            Ok(())
        }
        Command::Summary(args) => cmd_summary(&dataset, args, &cli.locale),
        Command::Export(args) => cmd_export(&dataset, args),
    }
}

fn cmd_summary(dataset: &Dataset, args: SummaryArgs, locale: &str) -> Result<()> {
    let selection = match &args.compare {
        Some(other) => Selection::Compare(args.country.clone(), other.clone()),
        None => Selection::Single(args.country.clone()),
    };
    let view = match summary::evaluate(dataset, &selection) {
        // Same country twice: warn and fall back to the single-country view.
        Err(SummaryError::InvalidComparison(country)) => {
            eprintln!("Please select two different countries to compare.");
            warn!("ignoring comparison of {country} with itself");
            summary::evaluate(dataset, &Selection::Single(country))?
        }
        other => other?,
    };
    let metric = Metric::from(args.metric);

    match &view {
        View::Empty => println!("No country selected."),
        View::Single(s) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(s)?);
            } else {
                print_cards(&format!("{} Analysis", s.country()), &report::summary_cards(s, locale));
                println!("{}", report::summary_insight(s));
            }
            if args.table {
                print_table(&s.series, locale);
            }
            if let Some(path) = &args.plot {
                viz::plot_summary(s, metric, path, args.width, args.height, locale)?;
                eprintln!("Wrote plot to {}", path.display());
            }
        }
        View::Comparison(c) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(c)?);
            } else {
                let title = format!("{} vs {}", c.primary.country(), c.secondary.country());
                print_cards(&title, &report::comparison_cards(c, locale));
                println!("{}", report::comparison_insight(c, locale));
                if c.joined.is_empty() {
                    println!("(no overlapping years to chart)");
                }
            }
            if args.table {
                print_table(&c.primary.series, locale);
            }
            if let Some(path) = &args.plot {
                viz::plot_comparison(c, metric, path, args.width, args.height, locale)?;
                eprintln!("Wrote plot to {}", path.display());
            }
        }
    }
    Ok(())
}

fn print_cards(title: &str, cards: &[MetricCard]) {
    println!("== {title} ==");
    for card in cards {
        println!("{}: {}  ({})", card.label, card.value, card.delta);
    }
    println!();
}

fn print_table(series: &CountrySeries, locale: &str) {
    println!();
    println!(
        "{:>6}  {:>15}  {:>8}  {:>12}",
        "year", "pop", "lifeExp", "gdpPercap"
    );
    for r in report::table_rows(series) {
        println!(
            "{:>6}  {:>15}  {:>8}  {:>12}",
            r.year,
            report::format_count(r.population, locale),
            report::format_decimal(r.life_expectancy, 3, locale),
            report::format_decimal(r.gdp_per_capita, 2, locale)
        );
    }
}

fn cmd_export(dataset: &Dataset, args: ExportArgs) -> Result<()> {
    let series = summary::build_series(dataset, &args.country)?;
    let fmt = match (&args.format, &args.out) {
        (Some(OutFormat::Csv), _) => "csv".to_string(),
        (Some(OutFormat::Json), _) => "json".to_string(),
        (None, Some(out)) => out
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv")
            .to_ascii_lowercase(),
        (None, None) => "csv".to_string(),
    };
    let path = args
        .out
        .unwrap_or_else(|| PathBuf::from(storage::export_file_name(&args.country, &fmt)));
    match fmt.as_str() {
        "csv" => storage::save_csv(&series, &path)?,
        "json" => storage::save_json(&series, &path)?,
        other => bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", series.records().len(), path.display());
    Ok(())
}
