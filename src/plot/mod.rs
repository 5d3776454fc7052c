//! Chart rendering for trend and decomposition views.
//!
//! Two chart kinds, both written as PNG: the pre/post partition view
//! (scatter plus a fitted trend line on each side of the cutoff) and the
//! decomposition view (observed versus deseasonalized series).

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;

use crate::decompose::Decomposition;
use crate::error::{Error, Result};
use crate::table::SeriesTable;
use crate::types::Observation;

/// Chart appearance settings.
#[derive(Debug, Clone)]
pub struct PlotSettings {
    /// Image width in pixels (default 1280).
    pub width: u32,
    /// Image height in pixels (default 480).
    pub height: u32,
    /// Chart title.
    pub title: String,
    /// Y-axis label (default `"Total"`).
    pub y_label: String,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 480,
            title: String::new(),
            y_label: "Total".to_string(),
        }
    }
}

/// Render the pre/post partition view: two side-by-side panels, scatter
/// of monthly observations with a least-squares trend line each.
///
/// `min_date` trims the series before plotting, for sources whose early
/// years are too noisy to show.
///
/// # Errors
///
/// Fails when the column is missing, either partition is empty (nothing
/// to fit), or the backend cannot write the image.
pub fn plot_partition_trends(
    table: &SeriesTable,
    column: &str,
    cutoff: NaiveDate,
    min_date: Option<NaiveDate>,
    path: impl AsRef<Path>,
    settings: &PlotSettings,
) -> Result<()> {
    let observations = table.observations(column)?;
    let observations: Vec<Observation> = observations
        .into_iter()
        .filter(|obs| min_date.map_or(true, |min| obs.date >= min))
        .collect();

    let split = observations.partition_point(|obs| obs.date < cutoff);
    let (pre, post) = observations.split_at(split);
    if pre.is_empty() || post.is_empty() {
        return Err(Error::Empty(
            "both sides of the cutoff need observations to plot".to_string(),
        ));
    }

    let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(to_plot_error)?;
    let panels = root.split_evenly((1, 2));

    draw_trend_panel(&panels[0], pre, &format!("{} \u{2014} before", settings.title), settings)?;
    draw_trend_panel(&panels[1], post, &format!("{} \u{2014} after", settings.title), settings)?;

    root.present().map_err(to_plot_error)?;
    Ok(())
}

/// Render the decomposition view: observed series (dashed) against the
/// deseasonalized series.
///
/// # Errors
///
/// Fails when the decomposition is empty or the backend cannot write the
/// image.
pub fn plot_decomposition(
    decomposition: &Decomposition,
    path: impl AsRef<Path>,
    settings: &PlotSettings,
) -> Result<()> {
    if decomposition.dates.is_empty() {
        return Err(Error::Empty("nothing to plot".to_string()));
    }

    let xs: Vec<f64> = decomposition
        .dates
        .iter()
        .map(|d| d.num_days_from_ce() as f64)
        .collect();
    let (x_range, y_range) = padded_ranges(
        &xs,
        decomposition
            .observed
            .iter()
            .chain(&decomposition.deseasonalized),
    );

    let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(to_plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&settings.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(to_plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(&settings.y_label)
        .x_label_formatter(&format_day_number)
        .draw()
        .map_err(to_plot_error)?;

    chart
        .draw_series(DashedLineSeries::new(
            xs.iter().zip(&decomposition.observed).map(|(&x, &y)| (x, y)),
            6,
            3,
            BLUE.mix(0.5).stroke_width(1),
        ))
        .map_err(to_plot_error)?
        .label("Observed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.mix(0.5)));

    chart
        .draw_series(LineSeries::new(
            xs.iter()
                .zip(&decomposition.deseasonalized)
                .map(|(&x, &y)| (x, y)),
            RED.stroke_width(2),
        ))
        .map_err(to_plot_error)?
        .label("Deseasonalized")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(to_plot_error)?;

    root.present().map_err(to_plot_error)?;
    Ok(())
}

/// Scatter plus least-squares line for one partition.
fn draw_trend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    observations: &[Observation],
    caption: &str,
    settings: &PlotSettings,
) -> Result<()> {
    let xs: Vec<f64> = observations
        .iter()
        .map(|obs| obs.date.num_days_from_ce() as f64)
        .collect();
    let ys: Vec<f64> = observations.iter().map(|obs| obs.value).collect();
    let (x_range, y_range) = padded_ranges(&xs, ys.iter());

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.clone(), y_range)
        .map_err(to_plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(&settings.y_label)
        .x_label_formatter(&format_day_number)
        .draw()
        .map_err(to_plot_error)?;

    chart
        .draw_series(
            xs.iter()
                .zip(&ys)
                .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.mix(0.5).filled())),
        )
        .map_err(to_plot_error)?;

    let (slope, intercept) = linear_fit(&xs, &ys);
    chart
        .draw_series(LineSeries::new(
            [x_range.start, x_range.end]
                .iter()
                .map(|&x| (x, slope * x + intercept)),
            RED.stroke_width(2),
        ))
        .map_err(to_plot_error)?;

    Ok(())
}

/// Ordinary least-squares fit of `y = slope * x + intercept`.
///
/// A single point (or zero x-variance) fits a flat line through the mean.
fn linear_fit(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        covariance += (x - x_mean) * (y - y_mean);
        variance += (x - x_mean) * (x - x_mean);
    }

    if variance == 0.0 {
        return (0.0, y_mean);
    }

    let slope = covariance / variance;
    (slope, y_mean - slope * x_mean)
}

/// Axis ranges with a 5% margin on each side.
fn padded_ranges<'a>(
    xs: &[f64],
    ys: impl Iterator<Item = &'a f64>,
) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let (x_min, x_max) = min_max(xs.iter());
    let (y_min, y_max) = min_max(ys);

    let x_pad = ((x_max - x_min) * 0.05).max(1.0);
    let y_pad = ((y_max - y_min) * 0.05).max(1.0);

    (
        (x_min - x_pad)..(x_max + x_pad),
        (y_min - y_pad)..(y_max + y_pad),
    )
}

fn min_max<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

fn format_day_number(days: &f64) -> String {
    match NaiveDate::from_num_days_from_ce_opt(*days as i32) {
        Some(date) => date.format("%Y-%m").to_string(),
        None => String::new(),
    }
}

fn to_plot_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}
