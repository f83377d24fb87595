use crate::{
    format::{format_filename, format_test_type},
    rates::Rates,
};
use clap::ValueEnum;
use glt_discovery::{BuildResult, ResultFile, ResultPayload, ResultSet};
use itertools::Itertools;
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

pub const CHART_TITLE: &str = "Requests/Second";
pub const CHART_SUBTITLE: &str = "Total, Updates, Writes, Retries";
pub const COLUMNS: [&str; 5] = [
    "Test type",
    "Total/sec",
    "Updates/sec",
    "Writes/sec",
    "Retries/sec",
];

/// width of the longest bar in a chart
const BAR_WIDTH: usize = 40;
/// one glyph per series: reads, updates, writes, retries
const BAR_GLYPHS: [char; 4] = ['█', '▓', '▒', '░'];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write report")]
    Io(#[from] io::Error),
    #[error("Failed to serialize report")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// stacked bar charts for the terminal
    Text,
    /// the report as a single JSON document
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub test_type: String,
    pub label: String,
    #[serde(flatten)]
    pub rates: Rates,
}

/// One stacked bar chart, drawn per result file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub file: String,
    pub label: String,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub rows: Vec<ChartRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    pub build_number: u64,
    pub charts: Vec<Chart>,
}

/// Presentation of a `ResultSet`, keeps its order (most recent build first)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub builds: Vec<BuildReport>,
}

impl Chart {
    pub fn new(file: &ResultFile, payload: &ResultPayload) -> Self {
        Self {
            file: file.name().to_string(),
            label: format_filename(file),
            title: CHART_TITLE,
            subtitle: CHART_SUBTITLE,
            rows: payload
                .data
                .iter()
                .map(|(test_type, metrics)| ChartRow {
                    test_type: test_type.clone(),
                    label: format_test_type(test_type),
                    rates: Rates::from_metrics(metrics),
                })
                .collect(),
        }
    }

    /// largest stacked value, the scale of every bar in this chart
    fn scale(&self) -> i64 {
        self.rows
            .iter()
            .map(|row| row.rates.stacked())
            .max()
            .unwrap_or(0)
    }
}

impl BuildReport {
    pub fn new(build: &BuildResult) -> Self {
        Self {
            build_number: build.build_number(),
            charts: build
                .results()
                .iter()
                .map(|(file, payload)| Chart::new(file, payload))
                .collect(),
        }
    }
}

impl Report {
    pub fn from_results(results: &ResultSet) -> Self {
        Self {
            builds: results.iter().map(BuildReport::new).collect(),
        }
    }
}

impl OutputFormat {
    pub fn render<W: Write>(&self, report: &Report, out: &mut W) -> Result<(), RenderError> {
        match self {
            Self::Text => render_text(report, out),
            Self::Json => {
                serde_json::to_writer_pretty(&mut *out, report)?;
                writeln!(out)?;

                Ok(())
            }
        }
    }
}

fn render_text<W: Write>(report: &Report, out: &mut W) -> Result<(), RenderError> {
    if report.builds.is_empty() {
        writeln!(out, "No results found")?;

        return Ok(());
    }

    for build in report.builds.iter() {
        writeln!(out, "Build number: {}", build.build_number)?;

        for chart in build.charts.iter() {
            writeln!(out)?;
            writeln!(out, "  Type: {}", chart.label)?;
            render_chart(chart, out)?;
        }

        writeln!(out)?;
    }

    Ok(())
}

fn render_chart<W: Write>(chart: &Chart, out: &mut W) -> Result<(), RenderError> {
    writeln!(out, "  {} ({})", chart.title, chart.subtitle)?;

    let label_width = chart
        .rows
        .iter()
        .map(|row| row.label.chars().count())
        .chain([COLUMNS[0].len()])
        .max()
        .unwrap_or(0);

    let header = COLUMNS[1..].iter().join("  ");
    writeln!(out, "  {:<label_width$}  {header}", COLUMNS[0])?;

    let scale = chart.scale();
    for row in chart.rows.iter() {
        let values = row
            .rates
            .series()
            .iter()
            .zip(COLUMNS[1..].iter())
            .map(|(value, column)| format!("{value:>width$}", width = column.len()))
            .join("  ");

        writeln!(
            out,
            "  {:<label_width$}  {values}  {}",
            row.label,
            stacked_bar(&row.rates, scale)
        )?;
    }

    Ok(())
}

/// Bar made of one run of glyphs per series, scaled so `scale` fills `BAR_WIDTH`
pub fn stacked_bar(rates: &Rates, scale: i64) -> String {
    if scale <= 0 {
        return String::new();
    }

    rates
        .series()
        .iter()
        .zip(BAR_GLYPHS)
        .map(|(value, glyph)| {
            let width = ((*value).max(0) as f64 * BAR_WIDTH as f64 / scale as f64).round() as usize;

            glyph.to_string().repeat(width)
        })
        .collect()
}
