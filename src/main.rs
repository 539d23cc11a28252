//! Card installment quote CLI
//!
//! Prices installment plans from the command line:
//!
//! ```text
//! moneyflow quote 1,000,000 6
//! moneyflow --exact table 550000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use moneyflow::format::won;
use moneyflow::validation::{validate_amount, validate_installment_months};
use moneyflow::{FeeArithmetic, INSTALLMENT_MONTHS, InstallmentPricer, PricerConfig, rate_tier};

#[derive(Parser, Debug)]
#[command(name = "moneyflow", version, about = "Card installment fee calculator")]
struct Cli {
    /// JSON pricer configuration, e.g. {"arithmetic": "exact_decimal"}
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use exact decimal arithmetic instead of double precision
    #[arg(long, global = true)]
    exact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a single installment plan
    Quote {
        /// Purchase amount, commas allowed
        #[arg(value_parser = parse_principal)]
        principal: i64,
        /// Number of monthly installments (1-12)
        months: i32,
        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare every plan from 1 to 12 months
    Table {
        /// Purchase amount, commas allowed
        #[arg(value_parser = parse_principal)]
        principal: i64,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.exact)?;
    let pricer = InstallmentPricer::new(config);

    match cli.command {
        Command::Quote {
            principal,
            months,
            json,
        } => quote(&pricer, principal, months, json),
        Command::Table { principal } => table(&pricer, principal),
    }
}

fn load_config(path: Option<&Path>, exact: bool) -> Result<PricerConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => PricerConfig::default(),
    };
    if exact {
        config.arithmetic = FeeArithmetic::ExactDecimal;
    }
    info!("pricing with {:?} arithmetic", config.arithmetic);
    Ok(config)
}

// Unlike `format::parse_amount`, which reads whatever leading number a form
// field holds, a typo on the command line must fail rather than price 0.
fn parse_principal(raw: &str) -> Result<i64, String> {
    raw.replace(',', "")
        .parse::<i64>()
        .map_err(|e| format!("invalid amount `{raw}`: {e}"))
}

fn quote(pricer: &InstallmentPricer, principal: i64, months: i32, json: bool) -> Result<()> {
    validate_amount(principal)?;
    validate_installment_months(months)?;

    let result = pricer.calculate_total_amount(principal, months);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", pricer.installment_preview(principal, months));
    println!("  Principal: {}", won(result.principal));
    println!("  Fee:       {}", won(result.fee));
    println!("  Total:     {}", won(result.total));
    println!("  Monthly:   {}", won(result.monthly_payment));
    Ok(())
}

fn table(pricer: &InstallmentPricer, principal: i64) -> Result<()> {
    validate_amount(principal)?;

    println!("Installment plans for {}", won(principal));
    println!("{:>6} {:>5} {:>14} {:>16} {:>14}", "Months", "APR", "Fee", "Total", "Monthly");
    println!("{}", "-".repeat(59));
    for months in INSTALLMENT_MONTHS {
        let result = pricer.calculate_total_amount(principal, months);
        let percent = rate_tier(months).map_or(0, |tier| tier.percent());
        println!(
            "{:>6} {:>4}% {:>14} {:>16} {:>14}",
            months,
            percent,
            won(result.fee),
            won(result.total),
            won(result.monthly_payment),
        );
    }
    Ok(())
}
