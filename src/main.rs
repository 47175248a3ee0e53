//! Bioreport - Venn diagrams for report pipelines.
//!
//! # Usage
//!
//! ```bash
//! bioreport genes.xlsx --out results/venn
//! bioreport sets.tsv --out venn --format svg --write-table
//! bioreport --no-console --log-file logs/run.txt --save
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use bioreport::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use bioreport::logger::{DebugValue, Logger};
use bioreport::table::read_table;
use bioreport::venn::{OutputFormat, VennError, draw_venn_plot};

/// Draw a Venn diagram from a table whose columns are sets
///
/// clap validates the flags and renders help; the effective option values
/// come from `parse_flag_tokens` over the raw arguments merged with the
/// rc files, so flags and saved defaults go through one parser.
#[derive(Parser, Debug)]
#[command(name = "bioreport", version, about, long_about = None)]
struct Cli {
    /// Input table (csv, tsv, txt, xlsx, xls, ods); columns are sets
    #[arg(value_name = "TABLE")]
    table: Option<PathBuf>,

    /// Output path without extension
    #[arg(long, value_name = "STEM", default_value = "venn")]
    out: PathBuf,

    /// Worksheet to read from a workbook (default: first sheet)
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// Output format; repeat for several (default: png and svg)
    #[arg(long = "format", value_enum)]
    formats: Vec<OutputFormat>,

    /// Append log lines to this file (default: log.txt)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Do not echo log lines to the terminal
    #[arg(long)]
    no_console: bool,

    /// Do not write the log file
    #[arg(long)]
    no_log_file: bool,

    /// Font family for labels and counts
    #[arg(long, value_name = "NAME")]
    font_family: Option<String>,

    /// Resolution of PNG output
    #[arg(long)]
    dpi: Option<u32>,

    /// Also write the padded set table to <STEM>.csv
    #[arg(long)]
    write_table: bool,

    /// Log structural dumps of the input and layout
    #[arg(long)]
    debug: bool,

    /// Save current command-line flags as defaults in .bioreportrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .bioreportrc
    #[arg(long)]
    clear: bool,
}

fn resolve_flags(cli: &Cli, raw_args: &[String]) -> Result<ConfigFlags> {
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    Ok(file_flags.union(&cli_flags))
}

fn table_path(stem: &Path) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".csv");
    PathBuf::from(name)
}

fn run(cli: &Cli, flags: &ConfigFlags, logger: &Logger) -> Result<()> {
    let Some(input) = cli.table.as_deref() else {
        if cli.save || cli.clear {
            return Ok(());
        }
        anyhow::bail!("No input table given");
    };

    logger.info(format!("Reading sets from {}", input.display()));
    let table = read_table(input, cli.sheet.as_deref())
        .with_context(|| format!("Failed to read table {}", input.display()))?;
    if flags.debug {
        logger.debug(&[DebugValue::from("input table"), DebugValue::from(&table)]);
    }

    let options = flags.venn_options();
    let result = draw_venn_plot(&table, &cli.out, &options, Some(logger))?;
    if flags.debug {
        logger.debug(&[
            DebugValue::dump(&result.plot.canvas).with_shape(format!(
                "{} x {} in",
                result.plot.canvas.width, result.plot.canvas.height
            )),
            DebugValue::dump_len(&result.plot.colors),
        ]);
    }

    for region in &result.plot.regions {
        let names = region
            .sets()
            .into_iter()
            .map(|index| result.table.headers[index].as_str())
            .collect::<Vec<_>>()
            .join(" & ");
        logger.info(format!("{names}: {}", region.count()));
    }

    if flags.write_table {
        let path = table_path(&cli.out);
        result
            .table
            .write_csv(&path)
            .with_context(|| format!("Failed to write set table {}", path.display()))?;
        logger.info(format!("Set table saved to {}", path.display()));
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();

    let flags = match resolve_flags(&cli, &raw_args) {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("[error] {err:#}");
            return ExitCode::FAILURE;
        }
    };
    let logger = Logger::global(flags.logger_config());

    match run(&cli, &flags, logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The engine logs malformed input itself before returning it.
            if !matches!(
                err.downcast_ref::<VennError>(),
                Some(VennError::InvalidInputKind(_))
            ) {
                logger.error(format!("{err:#}"));
            }
            ExitCode::FAILURE
        }
    }
}
