use std::fs::File;
use std::io::{BufWriter, Write};
use std::net::SocketAddr;
use std::path::Path;

use allowance_engine::api::{AppState, create_router};
use allowance_engine::calculation::{RosterSources, reconcile_rosters, run_allowance_batch};
use allowance_engine::config::ConfigLoader;
use allowance_engine::models::OrgLevel;
use allowance_engine::roster;
use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::options::{Args, Command};

mod options {
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use rust_decimal::Decimal;

    #[derive(Debug, clap::Parser)]
    #[command(
        name = "allowance-engine",
        about = "Prorate communication allowances and reconcile employee rosters"
    )]
    pub struct Args {
        /// YAML configuration file. Built-in defaults are used when omitted.
        #[arg(long, short = 'c', global = true)]
        pub config: Option<PathBuf>,
        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, clap::Subcommand)]
    pub enum Command {
        /// Merge the active roster, resigned roster and transfer log into one
        /// period per employee and organization.
        Reconcile {
            /// CSV export of employees currently in the company.
            #[arg(long, short = 'a')]
            active: Option<PathBuf>,
            /// CSV export of resigned employees.
            #[arg(long, short = 'r')]
            resigned: Option<PathBuf>,
            /// CSV export of organization transfers.
            #[arg(long, short = 't')]
            transfers: PathBuf,
            /// Organization level at which a transfer splits a record. Overrides the configuration.
            #[arg(long, short = 'l')]
            org_level: Option<u8>,
            /// Where to write reconciled periods. Defaults to stdout.
            #[arg(long, short = 'o')]
            output: Option<PathBuf>,
            /// Where to write periods of employees missing from both rosters.
            #[arg(long)]
            abnormal_output: Option<PathBuf>,
        },
        /// Compute the yearly allowance of every row of a fee sheet.
        Fees {
            /// CSV fee sheet, e.g. the output of `reconcile`.
            sheet: PathBuf,
            /// The year to compute for. Overrides the configuration.
            #[arg(long, short = 'y')]
            target_year: Option<i32>,
            /// Allowance per full month. Overrides the configuration.
            #[arg(long)]
            monthly_rate: Option<Decimal>,
            /// Day of month deciding full versus half months. Overrides the configuration.
            #[arg(long)]
            cutoff_day: Option<u32>,
            /// Where to write the computed sheet. Defaults to stdout.
            #[arg(long, short = 'o')]
            output: Option<PathBuf>,
        },
        /// Serve the JSON API.
        Serve {
            /// Address to listen on.
            #[arg(long, short = 'b', default_value = "127.0.0.1:3000")]
            bind: SocketAddr,
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let loader = match &args.config {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("Could not load configuration from '{}'", path.display()))?,
        None => ConfigLoader::default(),
    };

    match args.command {
        Command::Reconcile {
            active,
            resigned,
            transfers,
            org_level,
            output,
            abnormal_output,
        } => {
            let level = match org_level {
                Some(level) => OrgLevel::try_from(level)?,
                None => loader.config().org_level(),
            };
            let sources = RosterSources {
                active: read_optional(active.as_deref(), roster::read_active_roster)?,
                resigned: read_optional(resigned.as_deref(), roster::read_resigned_roster)?,
                transfers: roster::read_transfer_log(open(&transfers)?)
                    .with_context(|| format!("Could not read transfer log '{}'", transfers.display()))?,
            };

            let result = reconcile_rosters(&sources, level)?;
            roster::write_periods(&result.periods, create(output.as_deref())?)?;

            match abnormal_output {
                Some(path) => roster::write_periods(&result.abnormal_periods, create(Some(&path))?)?,
                None if !result.abnormal_periods.is_empty() => warn!(
                    abnormal_periods = result.abnormal_periods.len(),
                    "Periods of employees missing from both rosters were not written; pass --abnormal-output to keep them"
                ),
                None => {}
            }
        }
        Command::Fees {
            sheet,
            target_year,
            monthly_rate,
            cutoff_day,
            output,
        } => {
            let config = loader.config();
            let target_year = config.target_year(target_year)?;
            let mut settings = config.allowance_settings();
            if let Some(rate) = monthly_rate {
                settings.monthly_rate = rate;
            }
            if let Some(day) = cutoff_day {
                settings.cutoff_day = day;
            }
            settings.validate()?;

            let fee_sheet = roster::read_fee_sheet(open(&sheet)?)
                .with_context(|| format!("Could not read fee sheet '{}'", sheet.display()))?;
            let batch = run_allowance_batch(&fee_sheet.records, target_year, &settings)
                .with_rejected(fee_sheet.rejected);

            roster::write_fee_lines(&batch.lines, create(output.as_deref())?)?;

            for warning in &batch.warnings {
                warn!(
                    code = ?warning.code,
                    employee_id = %warning.employee_id,
                    line = warning.line,
                    "{}",
                    warning.message
                );
            }
            eprintln!(
                "{} row(s) computed, total allowance for {}: {}",
                batch.summary.computed_rows,
                target_year,
                batch.summary.total_amount.round_dp(2)
            );
        }
        Command::Serve { bind } => serve(loader, bind).await?,
    }
    Ok(())
}

async fn serve(loader: ConfigLoader, bind: SocketAddr) -> anyhow::Result<()> {
    let router = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Could not bind to {}", bind))?;
    info!(address = %bind, "Listening");
    axum::serve(listener, router).await?;
    Ok(())
}

/// Logs to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("Could not open '{}'", path.display()))
}

fn read_optional<T>(
    path: Option<&Path>,
    read: impl FnOnce(File) -> allowance_engine::error::EngineResult<Vec<T>>,
) -> anyhow::Result<Vec<T>> {
    match path {
        Some(path) => {
            read(open(path)?).with_context(|| format!("Could not read roster '{}'", path.display()))
        }
        None => Ok(Vec::new()),
    }
}

fn create(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Could not create '{}'", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    })
}

