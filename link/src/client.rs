//! Main EduLake client with builder pattern.
//!
//! The presentation layer sees one operation per query shape: build the
//! SQL, submit it, poll to completion, fetch the raw pages, and shape them
//! into a typed table.

use std::sync::Arc;

use log::debug;

use crate::auth::AuthProvider;
use crate::config::StoreConfig;
use crate::error::{EduLinkError, Result};
use crate::executor::QueryExecutor;
use crate::query_builder::{self, QuerySpec};
use crate::selection::{Metric, MetricSelection};
use crate::shape::{shape_pages, ResultTable};
use crate::store::{HttpRemoteStore, RemoteStore};
use crate::timeouts::EduLinkTimeouts;

/// Default page size for result fetches.
const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default cap on total rows per query.
const DEFAULT_MAX_ROWS: usize = 100_000;

/// Main EduLake client.
///
/// Use [`EduLinkClient::builder`] to construct instances with custom
/// configuration. The client is cheap to clone; clones share the pooled
/// HTTP connection and credentials read-only, so concurrent dashboard
/// sessions can run queries independently.
///
/// # Examples
///
/// ```rust,no_run
/// use edulake_link::{EduLinkClient, Metric, MetricSelection, StoreConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EduLinkClient::builder()
///     .base_url("https://query.edulake.example")
///     .config(StoreConfig::new("us-east-1", "us_education_curated"))
///     .build()?;
///
/// let selection = MetricSelection::new(Metric::ExpenditurePerStudent, 2010, 2016);
/// let table = client.run(&selection).await?;
/// println!("{} rows", table.row_count());
/// # Ok(())
/// # }
/// ```
pub struct EduLinkClient<S: RemoteStore = HttpRemoteStore> {
    executor: QueryExecutor<S>,
}

impl<S: RemoteStore> Clone for EduLinkClient<S> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
        }
    }
}

impl EduLinkClient<HttpRemoteStore> {
    /// Create a new builder for configuring the client.
    pub fn builder() -> EduLinkClientBuilder {
        EduLinkClientBuilder::new()
    }
}

impl<S: RemoteStore> EduLinkClient<S> {
    /// Build a client over any [`RemoteStore`] implementation.
    ///
    /// This is the seam tests use to substitute a fake store; production
    /// code goes through [`EduLinkClient::builder`].
    pub fn with_store(store: S, config: StoreConfig, timeouts: EduLinkTimeouts) -> Self {
        Self {
            executor: QueryExecutor::new(
                Arc::new(store),
                config,
                timeouts,
                DEFAULT_PAGE_SIZE,
                DEFAULT_MAX_ROWS,
            ),
        }
    }

    /// Run a metric selection to a shaped table.
    ///
    /// Synchronous from the caller's perspective: internally submit, poll
    /// with backoff, fetch all pages, and shape. Errors at any stage
    /// surface unchanged; no partial table is ever returned.
    pub async fn run(&self, selection: &MetricSelection) -> Result<ResultTable> {
        let spec = query_builder::metric_query(selection)?;
        self.run_spec(&spec).await
    }

    /// Run the national trend for a metric over a year range.
    pub async fn national_trend(
        &self,
        metric: Metric,
        year_range: (i32, i32),
    ) -> Result<ResultTable> {
        let spec = query_builder::national_trend_query(metric, year_range)?;
        self.run_spec(&spec).await
    }

    /// Years available in the semantic layer, ascending.
    ///
    /// Null years (absent in practice) are skipped rather than invented.
    pub async fn years(&self) -> Result<Vec<i64>> {
        let table = self.run_spec(&query_builder::years_query()).await?;
        Ok(table
            .rows
            .iter()
            .filter_map(|row| row[0].as_integer())
            .collect())
    }

    /// State identifiers present in the semantic layer, ascending.
    pub async fn states(&self) -> Result<Vec<String>> {
        let table = self.run_spec(&query_builder::states_query()).await?;
        Ok(table
            .rows
            .iter()
            .filter_map(|row| row[0].as_text().map(str::to_string))
            .collect())
    }

    async fn run_spec(&self, spec: &QuerySpec) -> Result<ResultTable> {
        debug!("[CLIENT] Running query against {}", spec.view_name);
        let mut execution = self.executor.submit(spec).await?;
        self.executor.wait(&mut execution).await?;
        let pages = self.executor.fetch(&execution).await?;
        let table = shape_pages(&spec.columns, &pages)?;
        debug!(
            "[CLIENT] Query {} shaped {} row(s)",
            execution.execution_id,
            table.row_count()
        );
        Ok(table)
    }
}

/// Builder for configuring [`EduLinkClient`] instances.
pub struct EduLinkClientBuilder {
    base_url: Option<String>,
    config: Option<StoreConfig>,
    auth: AuthProvider,
    timeouts: EduLinkTimeouts,
    page_size: usize,
    max_rows: usize,
}

impl EduLinkClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            config: None,
            auth: AuthProvider::none(),
            timeouts: EduLinkTimeouts::default(),
            page_size: DEFAULT_PAGE_SIZE,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    /// Set the base URL of the remote store's query endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the store configuration (region, database, output location).
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the authentication provider.
    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = auth;
        self
    }

    /// Set bearer token authentication.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthProvider::bearer_token(token.into());
        self
    }

    /// Set the timeout configuration for all operations.
    pub fn timeouts(mut self, timeouts: EduLinkTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the result page size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the cap on total rows per query. Queries whose results exceed
    /// the cap fail with `ResultTooLarge` instead of truncating.
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<EduLinkClient<HttpRemoteStore>> {
        let base_url = self
            .base_url
            .ok_or_else(|| EduLinkError::ConfigurationError("base_url is required".into()))?;
        let config = self
            .config
            .ok_or_else(|| EduLinkError::ConfigurationError("store config is required".into()))?;
        config.validate()?;
        if self.page_size == 0 {
            return Err(EduLinkError::ConfigurationError(
                "page_size must be positive".into(),
            ));
        }

        let store = HttpRemoteStore::new(base_url, self.auth, &self.timeouts)?;
        Ok(EduLinkClient {
            executor: QueryExecutor::new(
                Arc::new(store),
                config,
                self.timeouts,
                self.page_size,
                self.max_rows,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let result = EduLinkClient::builder()
            .base_url("http://localhost:3000")
            .config(StoreConfig::new("us-east-1", "us_education_curated"))
            .bearer_token("test_token")
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_missing_url() {
        let result = EduLinkClient::builder()
            .config(StoreConfig::new("us-east-1", "db"))
            .build();
        assert!(matches!(result, Err(EduLinkError::ConfigurationError(_))));
    }

    #[test]
    fn test_builder_missing_config() {
        let result = EduLinkClient::builder()
            .base_url("http://localhost:3000")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_zero_page_size_rejected() {
        let result = EduLinkClient::builder()
            .base_url("http://localhost:3000")
            .config(StoreConfig::new("us-east-1", "db"))
            .page_size(0)
            .build();
        assert!(result.is_err());
    }
}
