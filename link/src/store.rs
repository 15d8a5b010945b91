//! Remote columnar store boundary.
//!
//! [`RemoteStore`] is the client-side view of the store's asynchronous
//! submit / status / results / cancel protocol. [`HttpRemoteStore`] is the
//! production implementation over JSON/HTTP; tests substitute a scripted
//! fake behind the same trait.

use async_trait::async_trait;
use log::{debug, warn};

use crate::auth::AuthProvider;
use crate::config::StoreConfig;
use crate::error::{EduLinkError, Result};
use crate::models::{
    ErrorDetail, ResultsPage, StartQueryRequest, StartQueryResponse, StatusResponse,
};
use crate::timeouts::EduLinkTimeouts;

/// Client-side protocol of the remote columnar store.
///
/// Implementations issue independent stateless requests; a single instance
/// is shared read-only across concurrent query executions.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Submit SQL for asynchronous execution; returns the execution id.
    async fn start_query(&self, request: &StartQueryRequest) -> Result<String>;

    /// Probe the current state of an execution.
    async fn query_status(&self, execution_id: &str) -> Result<StatusResponse>;

    /// Fetch one page of results for a succeeded execution.
    async fn fetch_results(
        &self,
        execution_id: &str,
        page_token: Option<&str>,
        page_size: usize,
    ) -> Result<ResultsPage>;

    /// Request cancellation of an in-flight execution.
    async fn cancel_query(&self, execution_id: &str) -> Result<()>;
}

// Shared handles speak the protocol too, so callers can keep a reference
// to a store they also hand to the client.
#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for std::sync::Arc<T> {
    async fn start_query(&self, request: &StartQueryRequest) -> Result<String> {
        (**self).start_query(request).await
    }

    async fn query_status(&self, execution_id: &str) -> Result<StatusResponse> {
        (**self).query_status(execution_id).await
    }

    async fn fetch_results(
        &self,
        execution_id: &str,
        page_token: Option<&str>,
        page_size: usize,
    ) -> Result<ResultsPage> {
        (**self).fetch_results(execution_id, page_token, page_size).await
    }

    async fn cancel_query(&self, execution_id: &str) -> Result<()> {
        (**self).cancel_query(execution_id).await
    }
}

/// JSON/HTTP implementation of [`RemoteStore`].
///
/// Endpoints:
/// - `POST   {base}/v1/api/queries` — submit
/// - `GET    {base}/v1/api/queries/{id}` — status
/// - `GET    {base}/v1/api/queries/{id}/results` — paginated results
/// - `DELETE {base}/v1/api/queries/{id}` — cancel
#[derive(Clone)]
pub struct HttpRemoteStore {
    base_url: String,
    http_client: reqwest::Client,
    auth: AuthProvider,
}

impl HttpRemoteStore {
    /// Build a store client with a pooled HTTP client.
    pub fn new(
        base_url: impl Into<String>,
        auth: AuthProvider,
        timeouts: &EduLinkTimeouts,
    ) -> Result<Self> {
        // Keep-alive pooling: poll loops reuse the same connection
        let http_client = reqwest::Client::builder()
            .timeout(timeouts.request_timeout)
            .connect_timeout(timeouts.connection_timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .map_err(|e| EduLinkError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            auth,
        })
    }

    fn queries_url(&self) -> String {
        format!("{}/v1/api/queries", self.base_url)
    }

    fn query_url(&self, execution_id: &str) -> String {
        format!("{}/v1/api/queries/{}", self.base_url, execution_id)
    }

    /// Turn a non-success response into the matching error, extracting the
    /// structured message when the body parses as an [`ErrorDetail`].
    async fn error_from_response(response: reqwest::Response) -> EduLinkError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = match serde_json::from_str::<ErrorDetail>(&body) {
            Ok(detail) => detail.message,
            Err(_) => body,
        };
        warn!(
            "[STORE_HTTP] Server error: status={} message=\"{}\"",
            status, message
        );
        EduLinkError::ServerError {
            status_code: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn start_query(&self, request: &StartQueryRequest) -> Result<String> {
        let url = self.queries_url();
        debug!(
            "[STORE_HTTP] POST {} database={} sql_len={}",
            url,
            request.database,
            request.sql.len()
        );

        let req = self.auth.apply_to_request(self.http_client.post(&url));
        let response = req.json(request).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed: StartQueryResponse = response.json().await?;
        debug!("[STORE_HTTP] Submitted execution_id={}", parsed.execution_id);
        Ok(parsed.execution_id)
    }

    async fn query_status(&self, execution_id: &str) -> Result<StatusResponse> {
        let url = self.query_url(execution_id);
        let req = self.auth.apply_to_request(self.http_client.get(&url));
        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let status: StatusResponse = response.json().await?;
        debug!(
            "[STORE_HTTP] Status execution_id={} state={}",
            execution_id, status.state
        );
        Ok(status)
    }

    async fn fetch_results(
        &self,
        execution_id: &str,
        page_token: Option<&str>,
        page_size: usize,
    ) -> Result<ResultsPage> {
        let url = format!("{}/results", self.query_url(execution_id));
        let mut req = self
            .auth
            .apply_to_request(self.http_client.get(&url))
            .query(&[("page_size", page_size.to_string())]);
        if let Some(token) = page_token {
            req = req.query(&[("page_token", token)]);
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let page: ResultsPage = response.json().await?;
        debug!(
            "[STORE_HTTP] Results execution_id={} rows={} more={}",
            execution_id,
            page.rows.len(),
            page.has_more()
        );
        Ok(page)
    }

    async fn cancel_query(&self, execution_id: &str) -> Result<()> {
        let url = self.query_url(execution_id);
        debug!("[STORE_HTTP] DELETE {}", url);
        let req = self.auth.apply_to_request(self.http_client.delete(&url));
        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }
}

/// Build a [`StartQueryRequest`] for one SQL text under a configuration.
pub fn start_request(sql: &str, config: &StoreConfig) -> StartQueryRequest {
    StartQueryRequest {
        sql: sql.to_string(),
        database: config.database.clone(),
        output_location: config.output_location.clone(),
        workgroup: config.workgroup.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let store = HttpRemoteStore::new(
            "http://localhost:3000/",
            AuthProvider::none(),
            &EduLinkTimeouts::default(),
        )
        .unwrap();
        assert_eq!(store.queries_url(), "http://localhost:3000/v1/api/queries");
        assert_eq!(
            store.query_url("abc"),
            "http://localhost:3000/v1/api/queries/abc"
        );
    }

    #[test]
    fn start_request_carries_config() {
        let config = StoreConfig::new("us-east-1", "us_education_curated")
            .with_output_location("s3://bucket/results/");
        let request = start_request("SELECT 1", &config);
        assert_eq!(request.database, "us_education_curated");
        assert_eq!(
            request.output_location.as_deref(),
            Some("s3://bucket/results/")
        );
        assert!(request.workgroup.is_none());
    }
}
