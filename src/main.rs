use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use l1_seed_rates::config::{DEFAULT_RATE_TYPE, DEFAULT_STEM, DEFAULT_TABLE, RunConfig};
use l1_seed_rates::run::run;

/// Categorise L1 seeds and chart their rates per category.
#[derive(Debug, Parser)]
#[command(about)]
struct Cli {
    /// Existing rate table
    #[arg(long = "rateTable", default_value = DEFAULT_TABLE)]
    rate_table: String,

    /// Name of created output file
    #[arg(long, default_value = DEFAULT_STEM)]
    output: String,

    /// Type of rate used in plots
    #[arg(long, default_value = DEFAULT_RATE_TYPE)]
    rate: String,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let cfg = RunConfig::new(&cli.rate_table, &cli.output, &cli.rate).with_env();

    match execute(&cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cfg: &RunConfig) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cfg, &mut out)
        .with_context(|| format!("processing {}", cfg.table_path.display()))?;
    Ok(())
}
