//! Command-line interface components.

use crate::batch::{self, BatchReport, SheetReport};
use crate::config::HeatmapConfig;
use crate::constants::PROGRESS_TEMPLATE;
use crate::diagnostics::Diagnostics;
use crate::loader;
use crate::models::Matrix;
use crate::render::{ColorScale, Colormap, HeatmapLayout};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary and colour preview for the terminal
    Text,
    /// Layout and diagnostics as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "heatmap")]
#[command(about = "Turn spreadsheet-exported delimited text tables into heatmaps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Sheet files or directories containing them
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Field separator (a single character, or "tab")
    #[arg(short, long, value_parser = parse_separator)]
    pub separator: Option<char>,

    /// Read numbers written with a decimal comma (1,5)
    #[arg(long)]
    pub decimal_comma: bool,

    /// Keep whitespace around labels and values
    #[arg(long)]
    pub no_trim: bool,

    /// Colour map (seismic, bwr, ocean_r, Blues, binary, PuOr)
    #[arg(short, long)]
    pub colormap: Option<String>,

    /// Lowest value of the colour scale
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Highest value of the colour scale
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Value mapped to the middle colour (defaults to the midpoint of min and max)
    #[arg(long, allow_negative_numbers = true)]
    pub center: Option<f64>,

    /// Do not print values inside cells
    #[arg(long)]
    pub no_annotate: bool,

    /// Allow rectangular cells
    #[arg(long)]
    pub no_square: bool,

    /// Heatmap title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// JSON configuration file, overridden by command-line options
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum sheets parsed at the same time
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

fn parse_separator(value: &str) -> std::result::Result<char, String> {
    match value {
        "tab" | "\\t" => Ok('\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!(
                    "separator must be a single character, got {:?}",
                    value
                )),
            }
        }
    }
}

impl Args {
    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Layer command-line overrides on top of the file or default configuration
    pub fn build_config(&self) -> Result<HeatmapConfig> {
        let mut config = match &self.config {
            Some(path) => HeatmapConfig::from_json_file(path)?,
            None => HeatmapConfig::default(),
        };

        if let Some(separator) = self.separator {
            config = config.with_separator(separator);
        }
        if self.decimal_comma {
            config = config.with_decimal_comma();
        }
        if self.no_trim {
            config = config.without_trimming();
        }
        if let Some(name) = &self.colormap {
            config = config.with_colormap(name.parse::<Colormap>()?);
        }
        let min = self.min.unwrap_or(config.color_scale.min);
        let max = self.max.unwrap_or(config.color_scale.max);
        config = config.with_bounds(min, max);
        if let Some(center) = self.center {
            config = config.with_center(center);
        }
        if self.no_annotate {
            config = config.without_annotations();
        }
        if self.no_square {
            config = config.without_square_cells();
        }
        if let Some(title) = &self.title {
            config = config.with_title(title.clone());
        }
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrent_sheets(jobs);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("heatmap_maker={}", args.log_level())));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Run the tool; returns whether every sheet produced a matrix
pub async fn run(args: Args) -> Result<bool> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let config = args.build_config()?;
    let sheets = loader::discover_all(&args.inputs).context("Failed to resolve inputs")?;
    if sheets.is_empty() {
        anyhow::bail!("No sheet files found in the given inputs");
    }
    info!("Parsing {} sheet(s)", sheets.len());

    let progress = (sheets.len() > 1 && !args.quiet && args.format == OutputFormat::Text)
        .then(|| create_progress_bar(sheets.len() as u64));

    let report = batch::parse_sheets(
        sheets,
        &config.parse,
        config.max_concurrent_sheets,
        progress.as_ref(),
    )
    .await;

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let scale = ColorScale::new(&config.color_scale)?;
    match args.format {
        OutputFormat::Text => print_text_report(&report, &scale, &config),
        OutputFormat::Json => print_json_report(&report, &scale, &config)?,
    }

    Ok(report.all_succeeded())
}

/// Race `run` against a shutdown signal.
///
/// A signal ends the run as interrupted. If the signal handler cannot be
/// installed the run continues without it.
pub async fn run_until_shutdown<R, S>(run: R, shutdown: S) -> Result<bool>
where
    R: Future<Output = Result<bool>>,
    S: Future<Output = std::io::Result<()>>,
{
    let shutdown = async {
        if let Err(e) = shutdown.await {
            eprintln!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = run => result,
        _ = shutdown => {
            eprintln!("\nReceived CTRL+C, shutting down...");
            Err(anyhow::anyhow!("Interrupted by user"))
        }
    }
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("Parsing sheets");
    pb
}

fn print_text_report(report: &BatchReport, scale: &ColorScale, config: &HeatmapConfig) {
    for sheet in &report.sheets {
        print_sheet(sheet, scale, config);
        println!();
    }

    let stats = &report.stats;
    let summary = format!(
        "{} parsed, {} failed, {} cells, {} bad cells in {:.2?}",
        stats.sheets_parsed, stats.sheets_failed, stats.cells_parsed, stats.cell_errors, stats.elapsed
    );
    if report.all_succeeded() {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}

fn print_sheet(sheet: &SheetReport, scale: &ColorScale, config: &HeatmapConfig) {
    let name = sheet.path.display().to_string();
    let parsed = match &sheet.result {
        Ok(parsed) => parsed,
        Err(e) => {
            println!("{} {}: {}", "✗".red().bold(), name.bold(), e);
            return;
        }
    };

    match &parsed.outcome {
        Ok(matrix) => {
            let (min, max) = matrix.value_range().unwrap_or((0.0, 0.0));
            println!(
                "{} {}  {}×{}  values {} to {}",
                "✓".green().bold(),
                name.bold(),
                matrix.rows(),
                matrix.columns(),
                min,
                max
            );
            if let Some(title) = &config.layout.title {
                println!("{}", title.bold());
            }
            print_preview(matrix, scale, config);
        }
        Err(e) => {
            println!("{} {}: {}", "✗".red().bold(), name.bold(), e);
            print_diagnostics(&parsed.diagnostics);
        }
    }
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    for entry in diagnostics.view() {
        println!("    {}", entry.to_string().red());
    }
}

/// Draw the matrix with true-colour cell backgrounds
fn print_preview(matrix: &Matrix, scale: &ColorScale, config: &HeatmapConfig) {
    let precision = config.layout.annotation_precision;
    let cell_width = matrix
        .values()
        .iter()
        .map(|value| format!("{:.*}", precision, value).len())
        .chain(matrix.column_labels().iter().map(|label| label.chars().count()))
        .max()
        .unwrap_or(1)
        + 2;
    let label_width = matrix
        .row_labels()
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);

    let header: String = matrix
        .column_labels()
        .iter()
        .map(|label| format!("{:^width$}", label, width = cell_width))
        .collect();
    println!("{:label_width$} {}", "", header.dimmed());

    for (row, label) in matrix.row_labels().iter().enumerate() {
        print!("{:>label_width$} ", label);
        for value in matrix.row(row).unwrap_or_default() {
            let color = scale.color(*value);
            let text = if config.layout.annotate {
                format!("{:^width$.*}", precision, value, width = cell_width)
            } else {
                " ".repeat(cell_width)
            };
            let ink = if color.luminance() > 0.5 { 0 } else { 255 };
            print!(
                "{}",
                text.on_truecolor(color.r, color.g, color.b)
                    .truecolor(ink, ink, ink)
            );
        }
        println!();
    }
}

#[derive(Serialize)]
struct SheetOutput<'a> {
    path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a Diagnostics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<HeatmapLayout>,
}

fn print_json_report(report: &BatchReport, scale: &ColorScale, config: &HeatmapConfig) -> Result<()> {
    let mut outputs = Vec::with_capacity(report.sheets.len());
    for sheet in &report.sheets {
        let path = sheet.path.display().to_string();
        let output = match &sheet.result {
            Err(e) => SheetOutput {
                path,
                status: "unreadable",
                error: Some(e.to_string()),
                diagnostics: None,
                layout: None,
            },
            Ok(parsed) => match &parsed.outcome {
                Ok(matrix) => SheetOutput {
                    path,
                    status: "ok",
                    error: None,
                    diagnostics: Some(&parsed.diagnostics),
                    layout: Some(HeatmapLayout::build(matrix, scale, &config.layout)?),
                },
                Err(e) => SheetOutput {
                    path,
                    status: "failed",
                    error: Some(e.to_string()),
                    diagnostics: Some(&parsed.diagnostics),
                    layout: None,
                },
            },
        };
        outputs.push(output);
    }

    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_separator() {
        assert_eq!(parse_separator(";"), Ok(';'));
        assert_eq!(parse_separator("tab"), Ok('\t'));
        assert_eq!(parse_separator("\\t"), Ok('\t'));
        assert!(parse_separator(";;").is_err());
        assert!(parse_separator("").is_err());
    }

    #[test]
    fn test_args_override_defaults() {
        let args = Args::try_parse_from([
            "heatmap",
            "data.csv",
            "--separator",
            ",",
            "--colormap",
            "bwr",
            "--min",
            "-2",
            "--max",
            "6",
            "--no-annotate",
            "--jobs",
            "3",
        ])
        .unwrap();

        let config = args.build_config().unwrap();
        assert_eq!(config.parse.separator, ',');
        assert_eq!(config.color_scale.colormap, Colormap::Bwr);
        assert_eq!(config.color_scale.min, -2.0);
        assert_eq!(config.color_scale.max, 6.0);
        assert!(!config.layout.annotate);
        assert_eq!(config.max_concurrent_sheets, 3);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_conflicting_args_rejected() {
        let args = Args::try_parse_from([
            "heatmap",
            "data.csv",
            "--separator",
            ",",
            "--decimal-comma",
        ])
        .unwrap();
        assert!(args.build_config().is_err());

        let args = Args::try_parse_from(["heatmap", "data.csv", "--colormap", "rainbow"]).unwrap();
        assert!(args.build_config().is_err());
    }

    #[tokio::test]
    async fn test_failed_signal_handler_does_not_interrupt() {
        let result = run_until_shutdown(async { Ok(true) }, async {
            Err(std::io::Error::other("no signal support"))
        })
        .await;
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn test_signal_interrupts_run() {
        let result = run_until_shutdown(std::future::pending(), async { Ok(()) }).await;
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Interrupted by user");
    }

    #[test]
    fn test_inputs_required() {
        assert!(Args::try_parse_from(["heatmap"]).is_err());
        assert!(Args::try_parse_from(["heatmap", "a.csv", "-v", "-q"]).is_err());
    }
}
