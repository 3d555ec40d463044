//! CLI command definitions and dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::{DeploymentConfig, Preset};
use crate::output::*;
use crate::release::release_schedule;
use crate::simulate;

/// Main CLI.
#[derive(Parser)]
#[command(name = "zora")]
#[command(about = "Zoracles governance, timelock and vesting toolkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Log filter, e.g. `info` or `warn,zora_governance=debug`
    #[arg(long, global = true, env = "ZORA_LOG", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective deployment configuration as TOML
    Config {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Preset used when no file is given
        #[arg(long, value_enum, default_value = "mainnet")]
        preset: Preset,
        /// Also write the configuration to this file
        #[arg(long)]
        write: Option<PathBuf>,
    },

    /// Run a mint proposal from creation to execution in memory
    Simulate {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Preset used when no file is given
        #[arg(long, value_enum, default_value = "devnet")]
        preset: Preset,
    },

    /// Print the day-by-day release table of a vesting schedule
    Vesting {
        /// Deposited amount in base units
        #[arg(long)]
        amount: u128,
        /// Cliff in days
        #[arg(long, default_value_t = 0)]
        cliff: u64,
        /// Vesting period in days
        #[arg(long)]
        period: u64,
        /// Last day to show (defaults to full maturity, at most a year past it)
        #[arg(long)]
        until: Option<u64>,
    },
}

pub fn execute(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Config {
            config,
            preset,
            write,
        } => execute_config(config, preset, write),
        Commands::Simulate { config, preset } => execute_simulate(config, preset),
        Commands::Vesting {
            amount,
            cliff,
            period,
            until,
        } => execute_vesting(amount, cliff, period, until),
    }
}

fn execute_config(
    path: Option<PathBuf>,
    preset: Preset,
    write: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = DeploymentConfig::resolve(path.as_deref(), preset)?;
    print!("{}", config.to_toml()?);

    if let Some(out) = write {
        config.save(&out)?;
        print_success(&format!("Configuration written to {}", out.display()));
    }
    Ok(())
}

fn execute_simulate(path: Option<PathBuf>, preset: Preset) -> anyhow::Result<()> {
    let config = DeploymentConfig::resolve(path.as_deref(), preset)?;
    let token = &config.token;

    print_header("Governance simulation");
    println!(
        "Voting period:    {} blocks",
        config.governor.voting_period.to_string().bright_yellow()
    );
    println!("Timelock delay:   {}", format_duration(config.timelock.delay).bright_yellow());

    let report = simulate::run(&config)?;
    println!(
        "Quorum:           {}",
        format_amount(report.quorum_votes, token.decimals, &token.symbol).bright_green()
    );
    println!(
        "Threshold:        {}",
        format_amount(report.proposal_threshold, token.decimals, &token.symbol).bright_green()
    );
    println!();

    for transition in &report.transitions {
        println!(
            "{:<14} block {:>6}  {}",
            transition.step,
            transition.block,
            format_state(transition.state)
        );
    }
    println!();
    print_table(report.transitions.clone());

    print_success(&format!(
        "Proposal {} executed, supply {} -> {}",
        report.proposal_id,
        format_amount(report.supply_before, token.decimals, &token.symbol),
        format_amount(report.supply_after, token.decimals, &token.symbol)
    ));
    Ok(())
}

fn execute_vesting(amount: u128, cliff: u64, period: u64, until: Option<u64>) -> anyhow::Result<()> {
    let (info, rows) = release_schedule(amount, cliff, period, until)?;

    print_header("Vesting schedule");
    println!("Amount:           {}", info.vested_tokens.to_string().bright_green());
    println!("Cliff:            {} days", info.cliff_period);
    println!("Period:           {} days", info.vesting_period);
    println!("Per day:          {}", info.withdrawal_per_day.to_string().bright_yellow());
    let dust = info.vested_tokens - info.withdrawal_per_day * u128::from(info.vesting_period);
    if dust > 0 {
        print_info(&format!("{} base units of rounding dust unlock on day {}", dust, info.vesting_period));
    }
    println!();

    print_table(rows);
    Ok(())
}
