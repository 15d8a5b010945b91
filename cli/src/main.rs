//! EduLake CLI - terminal client for the analytics query layer.
//!
//! One-shot runner standing in for the dashboard: builds a metric
//! selection from flags, runs it through the EduLake client, and prints
//! the shaped table.
//!
//! # Usage
//!
//! ```bash
//! # Graduation rate for CA and TX, 2010-2015, as a text table
//! edulake -u https://query.edulake.example --database us_education_curated \
//!     --region us-east-1 -m graduation_rate --min-year 2010 --max-year 2015 \
//!     -s CA -s TX
//!
//! # National expenditure trend as JSON
//! edulake -u https://query.edulake.example --national \
//!     -m expenditure_per_student --min-year 2000 --max-year 2016 -f json
//! ```

use std::time::Duration;

use clap::Parser;

use edulake_link::{
    AuthProvider, EduLinkClient, EduLinkTimeouts, Metric, MetricSelection, StateCode, StoreConfig,
};

mod args;
mod error;
mod formatter;
mod logging;

use args::Cli;
use error::{CliError, Result};
use formatter::OutputFormatter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    let timeouts = EduLinkTimeouts::builder()
        .poll_budget(Duration::from_secs(cli.timeout_secs))
        .build();

    let auth = match &cli.token {
        Some(token) => AuthProvider::bearer_token(token.clone()),
        None => AuthProvider::none(),
    };

    let client = EduLinkClient::builder()
        .base_url(&cli.endpoint)
        .config(config)
        .auth(auth)
        .timeouts(timeouts)
        .build()?;

    if cli.list_years {
        for year in client.years().await? {
            println!("{}", year);
        }
        return Ok(());
    }

    if cli.list_states {
        for state in client.states().await? {
            println!("{}", state);
        }
        return Ok(());
    }

    let metric: Metric = cli.metric.parse()?;

    let table = if cli.national {
        if !cli.states.is_empty() {
            return Err(CliError::UsageError(
                "--national and --state cannot be combined".to_string(),
            ));
        }
        client
            .national_trend(metric, (cli.min_year, cli.max_year))
            .await?
    } else {
        let mut selection = MetricSelection::new(metric, cli.min_year, cli.max_year);
        if !cli.states.is_empty() {
            let mut codes = Vec::with_capacity(cli.states.len());
            for state in &cli.states {
                codes.push(StateCode::parse(state)?);
            }
            selection = selection.with_states(codes);
        }
        client.run(&selection).await?
    };

    println!("{}", OutputFormatter::new(cli.format).format_table(&table));
    Ok(())
}

/// Resolve the store configuration from flags, falling back to the
/// `EDULAKE_*` environment for anything not given on the command line.
fn resolve_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match (&cli.region, &cli.database) {
        (Some(region), Some(database)) => StoreConfig::new(region, database),
        _ => {
            let mut env_config = StoreConfig::from_env().map_err(|_| {
                CliError::UsageError(
                    "--region and --database are required (or set EDULAKE_REGION and EDULAKE_DATABASE)"
                        .to_string(),
                )
            })?;
            if let Some(region) = &cli.region {
                env_config.region = region.clone();
            }
            if let Some(database) = &cli.database {
                env_config.database = database.clone();
            }
            env_config
        }
    };

    if let Some(location) = &cli.output_location {
        config = config.with_output_location(location);
    }
    if let Some(workgroup) = &cli.workgroup {
        config = config.with_workgroup(workgroup);
    }
    Ok(config)
}
