//! Zora CLI - inspect deployment settings, rehearse governance and plan
//! vesting schedules without a live chain.

mod commands;
mod config;
mod output;
mod release;
mod simulate;
mod telemetry;

use clap::Parser;
use colored::Colorize;

fn main() -> anyhow::Result<()> {
    let cli = commands::Cli::parse();
    telemetry::init_telemetry(&cli.log_level, cli.json)?;

    if let Err(e) = commands::execute(cli.command) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }

    Ok(())
}
