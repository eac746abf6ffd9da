use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use irpf_core::{CalculationInput, IrpfEngine};
use irpf_data::{TaxTableLoader, input_loader};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::report::{JsonReport, render_table, render_text};
use crate::utils::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Monthly IRPF withholding calculator (2026 rules).
///
/// Computes the tax under the itemized (LEGAL) and simplified methods and
/// reports the cheaper one.
#[derive(Debug, Parser)]
#[command(name = "irpf", version, about, long_about = None)]
pub struct Cli {
    /// TOML file with a complete tax table (defaults to the built-in 2026 table).
    #[arg(long, global = true)]
    pub table: Option<PathBuf>,

    /// CSV file whose brackets replace those of the active table.
    #[arg(long, global = true)]
    pub brackets: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate the monthly tax for one set of inputs.
    Calc(CalcArgs),

    /// Calculate one report per row of a CSV file
    /// (columns: gross_income, contribution, dependents).
    Batch {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the active bracket table and constants.
    Table,
}

#[derive(Debug, Args)]
pub struct CalcArgs {
    /// Gross monthly income, e.g. `6000.00` or `6.000,00`.
    #[arg(long, value_parser = parse_decimal, allow_negative_numbers = true)]
    pub gross: Decimal,

    /// Social-security (INSS) contribution withheld this month.
    #[arg(long, value_parser = parse_decimal, default_value = "0", allow_negative_numbers = true)]
    pub contribution: Decimal,

    /// Number of dependents.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub dependents: i32,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Calc(_) => "calc",
            Command::Batch { .. } => "batch",
            Command::Table => "table",
        }
    }
}

// ─── execution ───────────────────────────────────────────────────────────────

/// Runs the parsed command, writing the report to `out`.
pub fn run<W: Write>(
    cli: &Cli,
    out: &mut W,
) -> Result<()> {
    let table = TaxTableLoader::build(cli.table.as_deref(), cli.brackets.as_deref())
        .context("Failed to load tax table")?;
    let engine = IrpfEngine::new(table).context("Invalid tax table")?;

    match &cli.command {
        Command::Calc(args) => run_calc(&engine, args, out),
        Command::Batch { file, format } => run_batch(&engine, file, *format, out),
        Command::Table => {
            write!(out, "{}", render_table(engine.table()))?;
            Ok(())
        }
    }
}

fn run_calc<W: Write>(
    engine: &IrpfEngine,
    args: &CalcArgs,
    out: &mut W,
) -> Result<()> {
    let input = CalculationInput::new(args.gross, args.contribution, args.dependents)
        .context("Invalid calculation input")?;
    debug!(?input, "calculating");

    write_reports(engine, std::slice::from_ref(&input), args.format, false, out)
}

fn run_batch<W: Write>(
    engine: &IrpfEngine,
    file: &std::path::Path,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let inputs = input_loader::load_from_file(file)
        .with_context(|| format!("Failed to load inputs from: {}", file.display()))?;
    info!(rows = inputs.len(), "loaded batch inputs");

    write_reports(engine, &inputs, format, true, out)
}

fn write_reports<W: Write>(
    engine: &IrpfEngine,
    inputs: &[CalculationInput],
    format: OutputFormat,
    as_array: bool,
    out: &mut W,
) -> Result<()> {
    let comparisons: Vec<_> = inputs
        .iter()
        .map(|input| engine.select_best_method(input))
        .collect();

    match format {
        OutputFormat::Text => {
            let now = Local::now();
            let year = engine.table().year;
            for (index, (input, comparison)) in inputs.iter().zip(&comparisons).enumerate() {
                if index > 0 {
                    writeln!(out)?;
                }
                write!(out, "{}", render_text(input, comparison, year, &now))?;
            }
        }
        OutputFormat::Json => {
            let reports: Vec<_> = inputs
                .iter()
                .zip(&comparisons)
                .map(|(input, comparison)| JsonReport::new(input, comparison))
                .collect();
            match reports.as_slice() {
                [report] if !as_array => serde_json::to_writer_pretty(&mut *out, report)?,
                _ => serde_json::to_writer_pretty(&mut *out, &reports)?,
            }
            writeln!(out)?;
        }
    }

    Ok(())
}
