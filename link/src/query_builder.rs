//! Query Builder: dashboard selections into SQL over the semantic views.
//!
//! The builder only ever references the pre-registered semantic views,
//! never raw tables, and every fragment of SQL text comes from closed
//! enumerations or validated integers — injection has no path in.

use crate::error::Result;
use crate::selection::{Metric, MetricSelection};
use crate::shape::ColumnSpec;

/// Per-state, per-year metrics view maintained by the curation stage.
pub const STATE_YEAR_VIEW: &str = "v_state_year_metrics";

/// National aggregates view.
pub const NATIONAL_VIEW: &str = "v_national_summary";

/// Every view the builder may reference.
pub const KNOWN_VIEWS: &[&str] = &[STATE_YEAR_VIEW, NATIONAL_VIEW];

/// A deterministic, immutable query derived from a selection.
///
/// Carries the SQL text, the view it reads, and the declared output schema
/// the shaper will enforce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// The semantic view this query reads.
    pub view_name: &'static str,

    /// Full SQL text.
    pub sql: String,

    /// Declared output columns, in SELECT order.
    pub columns: Vec<ColumnSpec>,
}

/// Build the per-state metric query for a selection.
///
/// ```sql
/// SELECT state, year, <metric_column> AS metric
/// FROM v_state_year_metrics
/// WHERE year BETWEEN <min> AND <max> [AND state IN ('CA', 'TX')]
/// ORDER BY year, state
/// ```
pub fn metric_query(selection: &MetricSelection) -> Result<QuerySpec> {
    selection.validate()?;

    let (min_year, max_year) = selection.year_range;
    let mut sql = format!(
        "SELECT state, year, {} AS metric FROM {} WHERE year BETWEEN {} AND {}",
        selection.metric.column(),
        STATE_YEAR_VIEW,
        min_year,
        max_year
    );

    if let Some(states) = &selection.state_filter {
        // StateCode is a closed enumeration, so quoting is safe by construction
        let list = states
            .iter()
            .map(|code| format!("'{}'", code))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(" AND state IN ({})", list));
    }

    sql.push_str(" ORDER BY year, state");

    Ok(QuerySpec {
        view_name: STATE_YEAR_VIEW,
        sql,
        columns: vec![
            ColumnSpec::text("state"),
            ColumnSpec::integer("year"),
            ColumnSpec::double("metric"),
        ],
    })
}

/// Build the national trend query for a metric over a year range.
///
/// Reads `v_national_summary`, aliasing the per-metric national expression
/// to `metric` so the output schema matches the per-state query minus the
/// state column.
pub fn national_trend_query(metric: Metric, year_range: (i32, i32)) -> Result<QuerySpec> {
    // Reuse the selection invariants for the year range
    MetricSelection::new(metric, year_range.0, year_range.1).validate()?;

    let sql = format!(
        "SELECT year, {} AS metric FROM {} WHERE year BETWEEN {} AND {} ORDER BY year",
        metric.national_expr(),
        NATIONAL_VIEW,
        year_range.0,
        year_range.1
    );

    Ok(QuerySpec {
        view_name: NATIONAL_VIEW,
        sql,
        columns: vec![ColumnSpec::integer("year"), ColumnSpec::double("metric")],
    })
}

/// Build the year-discovery query (populates the year slider).
pub fn years_query() -> QuerySpec {
    QuerySpec {
        view_name: STATE_YEAR_VIEW,
        sql: format!(
            "SELECT DISTINCT year FROM {} ORDER BY year",
            STATE_YEAR_VIEW
        ),
        columns: vec![ColumnSpec::integer("year")],
    }
}

/// Build the state-discovery query (populates the state picker).
pub fn states_query() -> QuerySpec {
    QuerySpec {
        view_name: STATE_YEAR_VIEW,
        sql: format!(
            "SELECT DISTINCT state FROM {} ORDER BY state",
            STATE_YEAR_VIEW
        ),
        columns: vec![ColumnSpec::text("state")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EduLinkError;
    use crate::selection::StateCode;

    #[test]
    fn metric_query_references_only_known_views() {
        for metric in Metric::ALL {
            let spec = metric_query(&MetricSelection::new(*metric, 2000, 2016)).unwrap();
            assert!(KNOWN_VIEWS.contains(&spec.view_name));
            assert!(spec.sql.contains(STATE_YEAR_VIEW));
            // No raw table leaks into the SQL
            assert!(!spec.sql.contains("states_all"));
        }
    }

    #[test]
    fn metric_query_full_shape() {
        let selection = MetricSelection::new(Metric::GraduationRate, 2010, 2015).with_states([
            StateCode::parse("TX").unwrap(),
            StateCode::parse("CA").unwrap(),
        ]);

        let spec = metric_query(&selection).unwrap();
        assert_eq!(
            spec.sql,
            "SELECT state, year, graduation_rate AS metric FROM v_state_year_metrics \
             WHERE year BETWEEN 2010 AND 2015 AND state IN ('CA', 'TX') \
             ORDER BY year, state"
        );
    }

    #[test]
    fn state_filter_is_sorted_and_deduplicated() {
        let selection = MetricSelection::new(Metric::TotalRevenue, 2010, 2012).with_states([
            StateCode::parse("TX").unwrap(),
            StateCode::parse("CA").unwrap(),
            StateCode::parse("texas").unwrap(),
        ]);

        let spec = metric_query(&selection).unwrap();
        assert!(spec.sql.contains("state IN ('CA', 'TX')"));
    }

    #[test]
    fn no_state_filter_means_no_in_clause() {
        let spec = metric_query(&MetricSelection::new(Metric::TotalRevenue, 2010, 2012)).unwrap();
        assert!(!spec.sql.contains(" IN ("));
    }

    #[test]
    fn inverted_year_range_fails_validation() {
        let err = metric_query(&MetricSelection::new(Metric::TotalRevenue, 2015, 2010)).unwrap_err();
        assert!(matches!(err, EduLinkError::ValidationError(_)));
    }

    #[test]
    fn query_spec_is_deterministic() {
        let selection = MetricSelection::new(Metric::SurplusDeficit, 2005, 2010)
            .with_states([StateCode::parse("NY").unwrap()]);
        assert_eq!(
            metric_query(&selection).unwrap(),
            metric_query(&selection).unwrap()
        );
    }

    #[test]
    fn national_trend_query_shape() {
        let spec = national_trend_query(Metric::ExpenditurePerStudent, (2000, 2016)).unwrap();
        assert_eq!(spec.view_name, NATIONAL_VIEW);
        assert_eq!(
            spec.sql,
            "SELECT year, national_spend_per_student AS metric FROM v_national_summary \
             WHERE year BETWEEN 2000 AND 2016 ORDER BY year"
        );
        assert_eq!(spec.columns.len(), 2);
    }

    #[test]
    fn national_trend_per_student_revenue_divides_enrollment() {
        let spec = national_trend_query(Metric::RevenuePerStudent, (2000, 2016)).unwrap();
        assert!(spec
            .sql
            .contains("national_revenue / NULLIF(national_enrollment, 0)"));
    }

    #[test]
    fn discovery_queries_use_the_semantic_view() {
        assert!(years_query().sql.contains("DISTINCT year"));
        assert!(states_query().sql.contains("DISTINCT state"));
        assert!(years_query().sql.contains(STATE_YEAR_VIEW));
        assert!(states_query().sql.contains(STATE_YEAR_VIEW));
    }
}
