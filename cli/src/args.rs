use clap::{Parser, ValueEnum};

/// EduLake CLI - query the education analytics semantic layer
#[derive(Parser, Debug)]
#[command(name = "edulake")]
#[command(version)]
#[command(about = "Run analytical queries against the EduLake semantic views", long_about = None)]
pub struct Cli {
    /// Query endpoint URL (e.g., https://query.edulake.example)
    #[arg(short = 'u', long = "endpoint")]
    pub endpoint: String,

    /// Deployment region (falls back to EDULAKE_REGION)
    #[arg(long = "region")]
    pub region: Option<String>,

    /// Semantic-layer database (falls back to EDULAKE_DATABASE)
    #[arg(long = "database")]
    pub database: Option<String>,

    /// Result staging location (falls back to EDULAKE_OUTPUT_LOCATION)
    #[arg(long = "output-location")]
    pub output_location: Option<String>,

    /// Execution workgroup
    #[arg(long = "workgroup")]
    pub workgroup: Option<String>,

    /// Bearer token for the query endpoint
    #[arg(long = "token")]
    pub token: Option<String>,

    /// Metric column name (e.g. graduation_rate, expenditure_per_student)
    #[arg(short = 'm', long = "metric", default_value = "expenditure_per_student")]
    pub metric: String,

    /// First year of the inclusive range
    #[arg(long = "min-year", default_value_t = 1992)]
    pub min_year: i32,

    /// Last year of the inclusive range
    #[arg(long = "max-year", default_value_t = 2016)]
    pub max_year: i32,

    /// Restrict to these states (postal codes or full names, repeatable)
    #[arg(short = 's', long = "state")]
    pub states: Vec<String>,

    /// Query the national trend instead of per-state rows
    #[arg(long = "national")]
    pub national: bool,

    /// List the years available in the semantic layer and exit
    #[arg(long = "list-years")]
    pub list_years: bool,

    /// List the states present in the semantic layer and exit
    #[arg(long = "list-states")]
    pub list_states: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Overall polling budget in seconds
    #[arg(long = "timeout", default_value = "60")]
    pub timeout_secs: u64,

    /// Verbose logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// How to render a result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}
