//! Shared test helpers: an in-process fake remote store.
//!
//! `FakeStore` understands exactly the SQL shapes the query builder emits
//! (metric query, national trend, year/state discovery) over a canned
//! dataset, answers the submit/status/results/cancel protocol, and records
//! every interaction so tests can assert on protocol behavior.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use edulake_link::models::{
    ColumnInfo, ErrorDetail, QueryState, ResultsPage, StartQueryRequest, StatusResponse,
};
use edulake_link::{EduLinkError, RemoteStore, Result};

/// Enable log output for a test run when `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One row of the fake `v_state_year_metrics` view.
#[derive(Debug, Clone)]
pub struct FakeRow {
    pub state: &'static str,
    pub year: i32,
    pub metric: Option<f64>,
}

pub fn row(state: &'static str, year: i32, metric: Option<f64>) -> FakeRow {
    FakeRow {
        state,
        year,
        metric,
    }
}

/// How the fake store should behave for every execution.
#[derive(Debug, Clone, Default)]
pub struct FakeBehavior {
    /// Number of RUNNING statuses to report before SUCCEEDED.
    pub polls_before_success: usize,

    /// Report FAILED with this diagnostic instead of succeeding.
    pub fail_with: Option<String>,

    /// Never leave RUNNING (drives timeout tests).
    pub always_running: bool,

    /// Rows per results page (0 = everything in one page).
    pub page_rows: usize,
}

struct ExecutionRecord {
    sql: String,
    polls: usize,
}

/// Scripted [`RemoteStore`] backed by a canned dataset.
pub struct FakeStore {
    dataset: Vec<FakeRow>,
    national: Vec<(i32, Option<f64>)>,
    behavior: FakeBehavior,
    next_id: AtomicU64,
    executions: Mutex<HashMap<String, ExecutionRecord>>,
    pub submissions: Mutex<Vec<String>>,
    pub fetch_calls: AtomicU64,
    pub cancel_calls: AtomicU64,
}

impl FakeStore {
    pub fn new(dataset: Vec<FakeRow>, behavior: FakeBehavior) -> Self {
        Self {
            dataset,
            national: Vec::new(),
            behavior,
            next_id: AtomicU64::new(1),
            executions: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            fetch_calls: AtomicU64::new(0),
            cancel_calls: AtomicU64::new(0),
        }
    }

    pub fn with_national(mut self, national: Vec<(i32, Option<f64>)>) -> Self {
        self.national = national;
        self
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// Evaluate the builder's SQL shapes against the canned dataset.
    fn evaluate(&self, sql: &str) -> (Vec<ColumnInfo>, Vec<Vec<JsonValue>>) {
        if sql.contains("DISTINCT year") {
            let mut years: Vec<i32> = self.dataset.iter().map(|r| r.year).collect();
            years.sort_unstable();
            years.dedup();
            return (
                vec![column("year", "integer")],
                years.into_iter().map(|y| vec![json!(y.to_string())]).collect(),
            );
        }

        if sql.contains("DISTINCT state") {
            let mut states: Vec<&str> = self.dataset.iter().map(|r| r.state).collect();
            states.sort_unstable();
            states.dedup();
            return (
                vec![column("state", "varchar")],
                states.into_iter().map(|s| vec![json!(s)]).collect(),
            );
        }

        let (min_year, max_year) = parse_year_range(sql);

        if sql.contains("v_national_summary") {
            let rows = self
                .national
                .iter()
                .filter(|(year, _)| *year >= min_year && *year <= max_year)
                .map(|(year, value)| {
                    vec![
                        json!(year.to_string()),
                        value.map(|v| json!(v.to_string())).unwrap_or(JsonValue::Null),
                    ]
                })
                .collect();
            return (
                vec![column("year", "integer"), column("metric", "double")],
                rows,
            );
        }

        // Per-state metric query
        let states = parse_state_filter(sql);
        let mut selected: Vec<&FakeRow> = self
            .dataset
            .iter()
            .filter(|r| r.year >= min_year && r.year <= max_year)
            .filter(|r| {
                states
                    .as_ref()
                    .map(|s| s.iter().any(|code| code == r.state))
                    .unwrap_or(true)
            })
            .collect();
        selected.sort_by(|a, b| (a.year, a.state).cmp(&(b.year, b.state)));

        let rows = selected
            .into_iter()
            .map(|r| {
                vec![
                    json!(r.state),
                    json!(r.year.to_string()),
                    r.metric
                        .map(|v| json!(v.to_string()))
                        .unwrap_or(JsonValue::Null),
                ]
            })
            .collect();

        (
            vec![
                column("state", "varchar"),
                column("year", "integer"),
                column("metric", "double"),
            ],
            rows,
        )
    }
}

fn column(name: &str, data_type: &str) -> ColumnInfo {
    ColumnInfo {
        name: name.to_string(),
        data_type: data_type.to_string(),
    }
}

/// Pull `BETWEEN <min> AND <max>` out of builder SQL.
fn parse_year_range(sql: &str) -> (i32, i32) {
    let after = sql
        .split("BETWEEN ")
        .nth(1)
        .expect("builder SQL always carries a year range");
    let mut parts = after.split(' ');
    let min = parts.next().unwrap().parse().unwrap();
    let max = parts.nth(1).unwrap().parse().unwrap();
    (min, max)
}

/// Pull the optional `state IN ('CA', 'TX')` list out of builder SQL.
fn parse_state_filter(sql: &str) -> Option<Vec<String>> {
    let after = sql.split("state IN (").nth(1)?;
    let list = after.split(')').next()?;
    Some(
        list.split(',')
            .map(|s| s.trim().trim_matches('\'').to_string())
            .collect(),
    )
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn start_query(&self, request: &StartQueryRequest) -> Result<String> {
        let id = format!("exec-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.submissions.lock().unwrap().push(request.sql.clone());
        self.executions.lock().unwrap().insert(
            id.clone(),
            ExecutionRecord {
                sql: request.sql.clone(),
                polls: 0,
            },
        );
        Ok(id)
    }

    async fn query_status(&self, execution_id: &str) -> Result<StatusResponse> {
        let mut executions = self.executions.lock().unwrap();
        let record = executions
            .get_mut(execution_id)
            .ok_or_else(|| EduLinkError::ExecutionError(format!("unknown id {}", execution_id)))?;
        record.polls += 1;

        let state = if self.behavior.always_running {
            QueryState::Running
        } else if let Some(message) = &self.behavior.fail_with {
            return Ok(StatusResponse {
                execution_id: execution_id.to_string(),
                state: QueryState::Failed,
                error: Some(ErrorDetail {
                    code: "QUERY_FAILED".to_string(),
                    message: message.clone(),
                    details: None,
                }),
                result_location: None,
            });
        } else if record.polls > self.behavior.polls_before_success {
            QueryState::Succeeded
        } else {
            QueryState::Running
        };

        Ok(StatusResponse {
            execution_id: execution_id.to_string(),
            state,
            error: None,
            result_location: (state == QueryState::Succeeded)
                .then(|| format!("s3://fake-results/{}", execution_id)),
        })
    }

    async fn fetch_results(
        &self,
        execution_id: &str,
        page_token: Option<&str>,
        _page_size: usize,
    ) -> Result<ResultsPage> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        let sql = {
            let executions = self.executions.lock().unwrap();
            executions
                .get(execution_id)
                .ok_or_else(|| {
                    EduLinkError::ExecutionError(format!("unknown id {}", execution_id))
                })?
                .sql
                .clone()
        };

        let (columns, all_rows) = self.evaluate(&sql);
        let page_rows = if self.behavior.page_rows == 0 {
            all_rows.len().max(1)
        } else {
            self.behavior.page_rows
        };

        let offset: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (offset + page_rows).min(all_rows.len());
        let next_page_token = (end < all_rows.len()).then(|| end.to_string());

        Ok(ResultsPage {
            columns,
            rows: all_rows[offset..end].to_vec(),
            next_page_token,
        })
    }

    async fn cancel_query(&self, _execution_id: &str) -> Result<()> {
        self.cancel_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
