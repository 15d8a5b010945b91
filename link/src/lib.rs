//! # edulake-link: EduLake analytics query client
//!
//! Client library for the EduLake education-statistics dashboard. Turns
//! dashboard selections into SQL over the curated semantic views, drives
//! the remote columnar store's asynchronous submit / poll / fetch protocol,
//! and shapes raw result pages into typed tables ready for charting.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edulake_link::{EduLinkClient, Metric, MetricSelection, StateCode, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EduLinkClient::builder()
//!         .base_url("https://query.edulake.example")
//!         .config(
//!             StoreConfig::new("us-east-1", "us_education_curated")
//!                 .with_output_location("s3://us-education-pipeline/results/"),
//!         )
//!         .build()?;
//!
//!     let selection = MetricSelection::new(Metric::GraduationRate, 2010, 2015)
//!         .with_states([StateCode::parse("CA")?, StateCode::parse("TX")?]);
//!
//!     let table = client.run(&selection).await?;
//!     for row in &table.rows {
//!         println!("{:?}", row);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error taxonomy
//!
//! Bad selections fail with `ValidationError` before anything touches the
//! network; submission rejections surface immediately as `ExecutionError`
//! or `ServerError`; a remote FAILED run carries its diagnostic in
//! `QueryFailedError`; an exhausted polling budget is `TimeoutError`; and
//! result schema drift is `ShapeError`. Every query run is independent — a
//! failure never poisons the client.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod query_builder;
pub mod selection;
pub mod shape;
pub mod store;
pub mod timeouts;

pub use auth::AuthProvider;
pub use client::{EduLinkClient, EduLinkClientBuilder};
pub use config::StoreConfig;
pub use error::{EduLinkError, Result};
pub use executor::{QueryExecution, QueryExecutor};
pub use models::QueryState;
pub use query_builder::{QuerySpec, KNOWN_VIEWS, NATIONAL_VIEW, STATE_YEAR_VIEW};
pub use selection::{Metric, MetricSelection, StateCode};
pub use shape::{shape_pages, CellValue, ColumnSpec, ColumnType, ResultTable};
pub use store::{HttpRemoteStore, RemoteStore};
pub use timeouts::{EduLinkTimeouts, EduLinkTimeoutsBuilder};
