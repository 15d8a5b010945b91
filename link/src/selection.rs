//! Dashboard selection types: metrics, state codes, and the validated
//! selection the query builder consumes.
//!
//! Everything here is a closed enumeration. SQL text is assembled only from
//! these types, so free-form user input can never reach the query layer.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EduLinkError, Result};

/// Analytical metrics exposed by the semantic layer.
///
/// Each variant maps to a column of the `v_state_year_metrics` view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ExpenditurePerStudent,
    RevenuePerStudent,
    SurplusDeficit,
    TotalExpenditure,
    TotalRevenue,
    GraduationRate,
}

impl Metric {
    /// All known metrics, in display order.
    pub const ALL: &'static [Metric] = &[
        Metric::ExpenditurePerStudent,
        Metric::RevenuePerStudent,
        Metric::SurplusDeficit,
        Metric::TotalExpenditure,
        Metric::TotalRevenue,
        Metric::GraduationRate,
    ];

    /// Column name in `v_state_year_metrics`.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::ExpenditurePerStudent => "expenditure_per_student",
            Metric::RevenuePerStudent => "revenue_per_student",
            Metric::SurplusDeficit => "surplus_deficit",
            Metric::TotalExpenditure => "total_expenditure",
            Metric::TotalRevenue => "total_revenue",
            Metric::GraduationRate => "graduation_rate",
        }
    }

    /// Expression over `v_national_summary` approximating this metric at
    /// the national level. Per-student metrics divide national totals by
    /// national enrollment; totals map straight to the summary columns.
    pub fn national_expr(&self) -> &'static str {
        match self {
            Metric::ExpenditurePerStudent => "national_spend_per_student",
            Metric::RevenuePerStudent => "national_revenue / NULLIF(national_enrollment, 0)",
            Metric::SurplusDeficit => "national_revenue - national_expenditure",
            Metric::TotalExpenditure => "national_expenditure",
            Metric::TotalRevenue => "national_revenue",
            Metric::GraduationRate => "national_graduation_rate",
        }
    }

    /// Human-readable label for display surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::ExpenditurePerStudent => "Expenditure per student",
            Metric::RevenuePerStudent => "Revenue per student",
            Metric::SurplusDeficit => "Surplus / Deficit",
            Metric::TotalExpenditure => "Total Expenditure",
            Metric::TotalRevenue => "Total Revenue",
            Metric::GraduationRate => "Graduation Rate",
        }
    }
}

impl FromStr for Metric {
    type Err = EduLinkError;

    /// Parse a metric by its column name (e.g. `graduation_rate`).
    fn from_str(s: &str) -> Result<Self> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.column() == s)
            .ok_or_else(|| EduLinkError::ValidationError(format!("unknown metric '{}'", s)))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// (full name, postal code) for the 50 states plus DC.
const STATE_TABLE: &[(&str, &str)] = &[
    ("ALABAMA", "AL"),
    ("ALASKA", "AK"),
    ("ARIZONA", "AZ"),
    ("ARKANSAS", "AR"),
    ("CALIFORNIA", "CA"),
    ("COLORADO", "CO"),
    ("CONNECTICUT", "CT"),
    ("DELAWARE", "DE"),
    ("DISTRICT OF COLUMBIA", "DC"),
    ("FLORIDA", "FL"),
    ("GEORGIA", "GA"),
    ("HAWAII", "HI"),
    ("IDAHO", "ID"),
    ("ILLINOIS", "IL"),
    ("INDIANA", "IN"),
    ("IOWA", "IA"),
    ("KANSAS", "KS"),
    ("KENTUCKY", "KY"),
    ("LOUISIANA", "LA"),
    ("MAINE", "ME"),
    ("MARYLAND", "MD"),
    ("MASSACHUSETTS", "MA"),
    ("MICHIGAN", "MI"),
    ("MINNESOTA", "MN"),
    ("MISSISSIPPI", "MS"),
    ("MISSOURI", "MO"),
    ("MONTANA", "MT"),
    ("NEBRASKA", "NE"),
    ("NEVADA", "NV"),
    ("NEW HAMPSHIRE", "NH"),
    ("NEW JERSEY", "NJ"),
    ("NEW MEXICO", "NM"),
    ("NEW YORK", "NY"),
    ("NORTH CAROLINA", "NC"),
    ("NORTH DAKOTA", "ND"),
    ("OHIO", "OH"),
    ("OKLAHOMA", "OK"),
    ("OREGON", "OR"),
    ("PENNSYLVANIA", "PA"),
    ("RHODE ISLAND", "RI"),
    ("SOUTH CAROLINA", "SC"),
    ("SOUTH DAKOTA", "SD"),
    ("TENNESSEE", "TN"),
    ("TEXAS", "TX"),
    ("UTAH", "UT"),
    ("VERMONT", "VT"),
    ("VIRGINIA", "VA"),
    ("WASHINGTON", "WA"),
    ("WEST VIRGINIA", "WV"),
    ("WISCONSIN", "WI"),
    ("WYOMING", "WY"),
];

/// A validated two-letter state code drawn from the closed state table.
///
/// Curated data sometimes carries full state names in upper-snake form
/// (`NEW_YORK`); [`StateCode::parse`] normalizes those as well as plain
/// postal codes in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateCode(&'static str);

impl StateCode {
    /// Resolve a postal code or full state name to a validated code.
    ///
    /// Accepts `"CA"`, `"ca"`, `"California"`, `"NEW_YORK"`,
    /// `"district of  columbia"` — underscores become spaces, whitespace
    /// collapses, case is ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input
            .replace('_', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();

        if normalized.len() == 2 {
            if let Some((_, code)) = STATE_TABLE.iter().find(|(_, c)| *c == normalized) {
                return Ok(StateCode(code));
            }
        }
        if let Some((_, code)) = STATE_TABLE.iter().find(|(name, _)| *name == normalized) {
            return Ok(StateCode(code));
        }

        Err(EduLinkError::ValidationError(format!(
            "unknown state '{}'",
            input
        )))
    }

    /// The two-letter postal code.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl TryFrom<String> for StateCode {
    type Error = EduLinkError;

    fn try_from(value: String) -> Result<Self> {
        StateCode::parse(&value)
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.0.to_string()
    }
}

// Hand-written serde impls: the derive would tie the deserializer's
// lifetime to the `&'static str` field.
impl Serialize for StateCode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for StateCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        StateCode::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// A dashboard selection: which metric, over which years, for which states.
///
/// Invariants (enforced by [`MetricSelection::validate`], which the query
/// builder calls): `min_year <= max_year`; the state filter, if present, is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSelection {
    /// The metric to chart.
    pub metric: Metric,

    /// Inclusive `(min_year, max_year)` range.
    pub year_range: (i32, i32),

    /// Optional restriction to a set of states. `None` means all states.
    pub state_filter: Option<BTreeSet<StateCode>>,
}

impl MetricSelection {
    /// Selection covering all states.
    pub fn new(metric: Metric, min_year: i32, max_year: i32) -> Self {
        Self {
            metric,
            year_range: (min_year, max_year),
            state_filter: None,
        }
    }

    /// Restrict the selection to the given states.
    pub fn with_states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = StateCode>,
    {
        self.state_filter = Some(states.into_iter().collect());
        self
    }

    /// Check the selection invariants.
    pub fn validate(&self) -> Result<()> {
        let (min_year, max_year) = self.year_range;
        if min_year > max_year {
            return Err(EduLinkError::ValidationError(format!(
                "inverted year range: {} > {}",
                min_year, max_year
            )));
        }
        if let Some(states) = &self.state_filter {
            if states.is_empty() {
                return Err(EduLinkError::ValidationError(
                    "state filter must not be empty; omit it to select all states".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_round_trips_through_column_name() {
        for metric in Metric::ALL {
            let parsed: Metric = metric.column().parse().unwrap();
            assert_eq!(parsed, *metric);
        }
    }

    #[test]
    fn unknown_metric_is_validation_error() {
        let err = "dropout_rate".parse::<Metric>().unwrap_err();
        assert!(matches!(err, EduLinkError::ValidationError(_)));
    }

    #[test]
    fn state_code_from_postal_code() {
        assert_eq!(StateCode::parse("CA").unwrap().as_str(), "CA");
        assert_eq!(StateCode::parse("tx").unwrap().as_str(), "TX");
    }

    #[test]
    fn state_code_from_full_name() {
        assert_eq!(StateCode::parse("California").unwrap().as_str(), "CA");
        assert_eq!(StateCode::parse("NEW_YORK").unwrap().as_str(), "NY");
        assert_eq!(
            StateCode::parse("district of  columbia").unwrap().as_str(),
            "DC"
        );
    }

    #[test]
    fn bogus_state_rejected() {
        assert!(StateCode::parse("ZZ").is_err());
        assert!(StateCode::parse("Atlantis").is_err());
        assert!(StateCode::parse("").is_err());
    }

    #[test]
    fn inverted_year_range_rejected() {
        let selection = MetricSelection::new(Metric::GraduationRate, 2015, 2010);
        assert!(matches!(
            selection.validate(),
            Err(EduLinkError::ValidationError(_))
        ));
    }

    #[test]
    fn single_year_range_is_valid() {
        let selection = MetricSelection::new(Metric::TotalRevenue, 2015, 2015);
        assert!(selection.validate().is_ok());
    }

    #[test]
    fn state_code_serde_goes_through_parse() {
        let code: StateCode = serde_json::from_str("\"texas\"").unwrap();
        assert_eq!(code.as_str(), "TX");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"TX\"");
        assert!(serde_json::from_str::<StateCode>("\"ZZ\"").is_err());
    }

    #[test]
    fn selection_round_trips_through_serde() {
        let selection = MetricSelection::new(Metric::GraduationRate, 2010, 2015)
            .with_states([
                StateCode::parse("CA").unwrap(),
                StateCode::parse("TX").unwrap(),
            ]);
        let json = serde_json::to_string(&selection).unwrap();
        let back: MetricSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }

    #[test]
    fn empty_state_filter_rejected() {
        let selection =
            MetricSelection::new(Metric::TotalRevenue, 2010, 2015).with_states(Vec::new());
        assert!(selection.validate().is_err());
    }
}
