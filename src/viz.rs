use crate::models::Metric;
use crate::report::{format_count, format_decimal};
use crate::summary::{ComparisonSummary, Summary};
use anyhow::{Result, anyhow, bail};
use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::Once;

/// Stroke colour of the primary (or only) country.
pub const PRIMARY_COLOR: RGBColor = RGBColor(0xFF, 0x4B, 0x4B);
/// Stroke colour of the second country in a comparison.
pub const SECONDARY_COLOR: RGBColor = RGBColor(0x00, 0x68, 0xC9);

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let registered = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../assets/DejaVuSans.ttf"),
        );
        if registered.is_err() {
            warn!("failed to register chart font");
        }
    });
}

struct Line {
    name: String,
    color: RGBColor,
    points: Vec<(i32, f64)>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Line chart of one metric for a single country over all of its years.
///
/// The output format follows the extension of `out_path`: `.svg` or `.png`.
pub fn plot_summary<P: AsRef<Path>>(
    summary: &Summary,
    metric: Metric,
    out_path: P,
    width: u32,
    height: u32,
    locale_tag: &str,
) -> Result<()> {
    let lines = vec![Line {
        name: summary.country().to_string(),
        color: PRIMARY_COLOR,
        points: summary
            .series
            .points(metric)
            .into_iter()
            .map(|(y, v)| (y, round2(v)))
            .collect(),
    }];
    let caption = format!("{} Over Time", metric.label());
    render(&lines, &caption, metric, out_path.as_ref(), width, height, locale_tag)
}

/// Two-line chart of one metric over the years both countries report.
///
/// Fails when the countries share no year, since there is nothing to align.
pub fn plot_comparison<P: AsRef<Path>>(
    cmp: &ComparisonSummary,
    metric: Metric,
    out_path: P,
    width: u32,
    height: u32,
    locale_tag: &str,
) -> Result<()> {
    if cmp.joined.is_empty() {
        bail!(
            "no overlapping years to plot for {} and {}",
            cmp.primary.country(),
            cmp.secondary.country()
        );
    }
    let joined = cmp.joined_points(metric);
    let lines = vec![
        Line {
            name: cmp.primary.country().to_string(),
            color: PRIMARY_COLOR,
            points: joined.iter().map(|&(y, a, _)| (y, round2(a))).collect(),
        },
        Line {
            name: cmp.secondary.country().to_string(),
            color: SECONDARY_COLOR,
            points: joined.iter().map(|&(y, _, b)| (y, round2(b))).collect(),
        },
    ];
    let caption = format!(
        "{}: {} vs {}",
        metric.label(),
        cmp.primary.country(),
        cmp.secondary.country()
    );
    render(&lines, &caption, metric, out_path.as_ref(), width, height, locale_tag)
}

fn render(
    lines: &[Line],
    caption: &str,
    metric: Metric,
    out_path: &Path,
    width: u32,
    height: u32,
    locale_tag: &str,
) -> Result<()> {
    let all = lines.iter().flat_map(|l| l.points.iter());
    let (mut min_year, mut max_year) = (i32::MAX, i32::MIN);
    let (mut min_val, mut max_val) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(y, v) in all {
        min_year = min_year.min(y);
        max_year = max_year.max(y);
        min_val = min_val.min(v);
        max_val = max_val.max(v);
    }
    if min_year > max_year {
        bail!("no data to plot");
    }
    if min_year == max_year {
        min_year -= 1;
        max_year += 1;
    }
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }
    // Keep lines off the frame.
    let pad = (max_val - min_val) * 0.05;
    let (min_val, max_val) = ((min_val - pad).max(0.0), max_val + pad);

    ensure_fonts_registered();
    let path_string = out_path.to_string_lossy().into_owned();
    let ext = out_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let bounds = Bounds {
        min_year,
        max_year,
        min_val,
        max_val,
    };
    debug!("rendering {} to {}", caption, path_string);
    match ext.as_str() {
        "svg" => {
            let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
            draw_chart(root, lines, caption, metric, &bounds, locale_tag)
        }
        "png" => {
            let root =
                BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
            draw_chart(root, lines, caption, metric, &bounds, locale_tag)
        }
        other => bail!("unsupported chart format '.{other}', use .svg or .png"),
    }
}

struct Bounds {
    min_year: i32,
    max_year: i32,
    min_val: f64,
    max_val: f64,
}

/// Helper that draws to any Plotters backend.
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    lines: &[Line],
    caption: &str,
    metric: Metric,
    b: &Bounds,
    locale_tag: &str,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 90)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(b.min_year..b.max_year, b.min_val..b.max_val)
        .map_err(|e| anyhow!("{:?}", e))?;

    // Narrow ranges (life expectancy) keep one decimal; wide ranges are grouped integers.
    let narrow = b.max_val - b.min_val < 100.0;
    let y_label_fmt = |v: &f64| {
        if narrow {
            format_decimal(*v, 1, locale_tag)
        } else {
            format_count(*v, locale_tag)
        }
    };
    let x_label_fmt = |y: &i32| y.to_string();

    // Limit label counts to avoid overlap
    let x_label_count = ((b.max_year - b.min_year + 1) as usize).min(12);

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(metric.label())
        .x_labels(x_label_count)
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for line in lines {
        let color = line.color;
        chart
            .draw_series(LineSeries::new(
                line.points.iter().copied(),
                color.stroke_width(2),
            ))
            .map_err(|e| anyhow!("{:?}", e))?
            .label(line.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
