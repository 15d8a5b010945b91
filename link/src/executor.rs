//! Query Executor: drives one execution through the remote store's
//! asynchronous protocol.
//!
//! The execution lifecycle is an explicit state machine:
//! `SUBMITTED → RUNNING → {SUCCEEDED | FAILED | CANCELLED}`. Submission
//! failures fail fast and are never retried; polling uses bounded
//! exponential backoff under an overall budget; fetch is valid only from
//! SUCCEEDED.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{EduLinkError, Result};
use crate::models::{QueryState, ResultsPage};
use crate::query_builder::QuerySpec;
use crate::store::{start_request, RemoteStore};
use crate::timeouts::EduLinkTimeouts;

/// One asynchronous query run against the remote store.
///
/// Created by [`QueryExecutor::submit`], mutated only by polling, and
/// discarded once results are retrieved or a terminal failure surfaced.
#[derive(Debug, Clone)]
pub struct QueryExecution {
    /// Opaque handle from the remote store.
    pub execution_id: String,

    /// Last observed state.
    pub status: QueryState,

    /// Result staging location, once the store reports one.
    pub result_location: Option<String>,
}

impl QueryExecution {
    fn new(execution_id: String) -> Self {
        Self {
            execution_id,
            status: QueryState::Submitted,
            result_location: None,
        }
    }

    /// True once the execution can no longer change state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Drives executions through submit / poll / fetch / cancel.
///
/// Holds no mutable state across executions; the store handle and
/// configuration are shared read-only, so concurrent submissions from
/// independent sessions do not interact.
pub struct QueryExecutor<S: RemoteStore> {
    store: Arc<S>,
    config: StoreConfig,
    timeouts: EduLinkTimeouts,
    page_size: usize,
    max_rows: usize,
}

impl<S: RemoteStore> Clone for QueryExecutor<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            timeouts: self.timeouts.clone(),
            page_size: self.page_size,
            max_rows: self.max_rows,
        }
    }
}

impl<S: RemoteStore> QueryExecutor<S> {
    pub(crate) fn new(
        store: Arc<S>,
        config: StoreConfig,
        timeouts: EduLinkTimeouts,
        page_size: usize,
        max_rows: usize,
    ) -> Self {
        Self {
            store,
            config,
            timeouts,
            page_size,
            max_rows,
        }
    }

    /// Submit a query for execution.
    ///
    /// Rejections (auth, malformed SQL, unavailable service) surface
    /// immediately; they indicate a caller or configuration defect and are
    /// not retried.
    pub async fn submit(&self, spec: &QuerySpec) -> Result<QueryExecution> {
        debug!(
            "[EXECUTOR] Submitting query against {} (sql_len={})",
            spec.view_name,
            spec.sql.len()
        );
        let request = start_request(&spec.sql, &self.config);
        let execution_id = self.store.start_query(&request).await.map_err(|e| match e {
            // Transport failures on submit are still submission failures
            EduLinkError::NetworkError(msg) => {
                EduLinkError::ExecutionError(format!("submission failed: {}", msg))
            }
            other => other,
        })?;
        debug!("[EXECUTOR] Submitted execution_id={}", execution_id);
        Ok(QueryExecution::new(execution_id))
    }

    /// Probe the remote state once and update the execution.
    ///
    /// Terminal states are final: polling a finished execution is a no-op.
    pub async fn poll(&self, execution: &mut QueryExecution) -> Result<()> {
        if execution.is_terminal() {
            return Ok(());
        }

        let status = self.store.query_status(&execution.execution_id).await?;
        debug!(
            "[EXECUTOR] Poll execution_id={} state={}",
            execution.execution_id, status.state
        );
        execution.status = status.state;
        if status.state == QueryState::Failed {
            let message = status
                .error_message()
                .unwrap_or("remote execution failed without diagnostic")
                .to_string();
            return Err(EduLinkError::QueryFailedError {
                execution_id: execution.execution_id.clone(),
                message,
            });
        }
        if status.result_location.is_some() {
            execution.result_location = status.result_location;
        }
        Ok(())
    }

    /// Poll with bounded exponential backoff until the execution reaches a
    /// terminal state or the budget runs out.
    ///
    /// - Budget exhausted while in flight: best-effort cancel, then
    ///   `TimeoutError`.
    /// - Remote FAILED: `QueryFailedError` with the store's diagnostic.
    /// - Remote CANCELLED: `Cancelled`.
    /// - Transient network errors on a probe are absorbed and re-polled
    ///   within the same budget.
    pub async fn wait(&self, execution: &mut QueryExecution) -> Result<()> {
        let started = Instant::now();
        let mut delay = self.timeouts.initial_poll_delay;

        loop {
            match self.poll(execution).await {
                Ok(()) => {}
                Err(e) if e.is_transient() => {
                    warn!(
                        "[EXECUTOR] Transient poll error for {}: {}",
                        execution.execution_id, e
                    );
                }
                Err(e) => return Err(e),
            }

            match execution.status {
                QueryState::Succeeded => return Ok(()),
                QueryState::Cancelled => {
                    return Err(EduLinkError::Cancelled(execution.execution_id.clone()))
                }
                // Failed is surfaced by poll(); Submitted/Running keep waiting
                _ => {}
            }

            if started.elapsed() + delay > self.timeouts.poll_budget {
                warn!(
                    "[EXECUTOR] Poll budget {:?} exhausted for {} (last state {})",
                    self.timeouts.poll_budget, execution.execution_id, execution.status
                );
                self.cancel(execution).await;
                return Err(EduLinkError::TimeoutError(format!(
                    "query {} still {} after {:?}",
                    execution.execution_id,
                    execution.status,
                    self.timeouts.poll_budget
                )));
            }

            tokio::time::sleep(delay).await;
            delay = self.timeouts.next_poll_delay(delay);
        }
    }

    /// Fetch all result pages for a succeeded execution.
    ///
    /// Pages of `page_size` rows are accumulated up to `max_rows`;
    /// exceeding the cap fails with `ResultTooLarge` rather than silently
    /// truncating.
    pub async fn fetch(&self, execution: &QueryExecution) -> Result<Vec<ResultsPage>> {
        if execution.status != QueryState::Succeeded {
            return Err(EduLinkError::ExecutionError(format!(
                "cannot fetch results for {} in state {}",
                execution.execution_id, execution.status
            )));
        }

        let mut pages = Vec::new();
        let mut total_rows = 0usize;
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .store
                .fetch_results(
                    &execution.execution_id,
                    page_token.as_deref(),
                    self.page_size,
                )
                .await?;

            total_rows += page.rows.len();
            if total_rows > self.max_rows {
                return Err(EduLinkError::ResultTooLarge(self.max_rows));
            }

            let next = page.next_page_token.clone();
            pages.push(page);
            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            "[EXECUTOR] Fetched {} rows in {} page(s) for {}",
            total_rows,
            pages.len(),
            execution.execution_id
        );
        Ok(pages)
    }

    /// Best-effort remote cancel, bounded by `cancel_timeout`.
    ///
    /// Never blocks past the bound and never fails the caller: a missed
    /// cancellation only wastes a remote run that nobody will fetch.
    pub async fn cancel(&self, execution: &QueryExecution) {
        if execution.is_terminal() {
            return;
        }
        let result = tokio::time::timeout(
            self.timeouts.cancel_timeout,
            self.store.cancel_query(&execution.execution_id),
        )
        .await;
        match result {
            Ok(Ok(())) => debug!("[EXECUTOR] Cancelled {}", execution.execution_id),
            Ok(Err(e)) => warn!(
                "[EXECUTOR] Cancel of {} failed: {}",
                execution.execution_id, e
            ),
            Err(_) => warn!(
                "[EXECUTOR] Cancel of {} did not confirm within {:?}",
                execution.execution_id, self.timeouts.cancel_timeout
            ),
        }
    }
}
