//! # wafertally-cli
//!
//! Command-line interface for the wafertally defect report pipeline.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wafertally_report::{
    analyze_book, sheet_to_records, FilterCriteria, SchemaConfig, DEFAULT_TARGET_DEFECTS,
};
use wafertally_sheet::{Book, Sheet};

/// wafertally - per-device defect tallies from production test workbooks
#[derive(Parser)]
#[command(name = "wafertally")]
#[command(author, version, about = "Per-device defect tallies from production test workbooks", long_about = None)]
struct Cli {
    /// Input workbooks (.xlsx) or grids (.csv)
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Defect value to keep (repeatable; default: 脏污 and 划伤)
    #[arg(short = 'd', long = "defect", value_name = "DEFECT")]
    defects: Vec<String>,

    /// Line value to keep (repeatable; default: all lines)
    #[arg(short = 'l', long = "line", value_name = "LINE")]
    lines: Vec<String>,

    /// Keep every defect value instead of the default targets
    #[arg(long = "all-defects", conflicts_with = "defects")]
    all_defects: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "csv")]
    format: OutputFormat,

    /// Directory result files are written to
    #[arg(short = 'o', long = "out", default_value = ".")]
    out_dir: PathBuf,

    /// Print the extracted per-process records as JSON instead of writing
    /// result files
    #[arg(long = "dump-records")]
    dump_records: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for result grids.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// CSV with a UTF-8 BOM (default)
    #[default]
    Csv,
    /// JSON array of objects keyed by the header row
    Json,
    /// Excel workbook
    Xlsx,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let criteria = build_criteria(&cli);
    let config = SchemaConfig::default();

    let mut written = 0usize;
    for input in &cli.inputs {
        let book = load_book(input)?;

        if cli.dump_records {
            dump_records(&book, &config)?;
            continue;
        }

        let results = analyze_book(&book, &criteria, &config);
        if results.is_empty() {
            println!(
                "{} {}: nothing to report",
                "-".yellow(),
                input.display()
            );
            continue;
        }

        std::fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("Failed to create directory: {}", cli.out_dir.display()))?;

        for sheet in &results {
            let path = output_path(&cli.out_dir, sheet.name(), cli.format);
            write_sheet(sheet, &path, cli.format)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            println!("{} {}", "✓".green(), path.display());
            written += 1;
        }
    }

    if !cli.dump_records && written == 0 {
        println!("{}", "No result sheets were produced".yellow());
    }

    Ok(())
}

/// Combine CLI flags into filter criteria, falling back to the standard
/// defect targets when nothing was selected.
fn build_criteria(cli: &Cli) -> FilterCriteria {
    let criteria = FilterCriteria::default().with_lines(cli.lines.clone());
    if cli.all_defects {
        criteria
    } else if cli.defects.is_empty() {
        criteria.with_defects(DEFAULT_TARGET_DEFECTS)
    } else {
        criteria.with_defects(cli.defects.clone())
    }
}

/// Load an input file as a workbook, by extension.
fn load_book(path: &Path) -> Result<Book> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" => {
            Book::from_xlsx(path).with_context(|| format!("Failed to read: {}", path.display()))
        }
        "csv" => {
            let sheet = Sheet::from_csv(path)
                .with_context(|| format!("Failed to read: {}", path.display()))?;
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Sheet1");
            let mut book = Book::new();
            book.add_sheet(name, sheet)?;
            Ok(book)
        }
        _ => bail!(
            "Unsupported file format: '{}'. Supported: xlsx, csv",
            path.display()
        ),
    }
}

/// Print the extracted per-process records for every sheet as JSON.
fn dump_records(book: &Book, config: &SchemaConfig) -> Result<()> {
    for (name, sheet) in book.sheets() {
        let records = sheet_to_records(sheet, config);
        if records.is_empty() {
            continue;
        }
        println!("{}", name.cyan().bold());
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    Ok(())
}

fn output_path(out_dir: &Path, sheet_name: &str, format: OutputFormat) -> PathBuf {
    out_dir.join(format!("{sheet_name}_处理结果.{}", format.extension()))
}

fn write_sheet(sheet: &Sheet, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => sheet.save_as_csv(path)?,
        OutputFormat::Json => sheet.save_as_json_pretty(path)?,
        OutputFormat::Xlsx => sheet.save_as_xlsx(path)?,
    }
    Ok(())
}
