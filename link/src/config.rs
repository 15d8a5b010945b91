//! Store configuration: where queries run and where results land.

use serde::{Deserialize, Serialize};

use crate::error::{EduLinkError, Result};

/// Environment variable for the deployment region.
pub const ENV_REGION: &str = "EDULAKE_REGION";
/// Environment variable for the semantic-layer database.
pub const ENV_DATABASE: &str = "EDULAKE_DATABASE";
/// Environment variable for the result staging location.
pub const ENV_OUTPUT_LOCATION: &str = "EDULAKE_OUTPUT_LOCATION";
/// Environment variable for the execution workgroup.
pub const ENV_WORKGROUP: &str = "EDULAKE_WORKGROUP";

/// Connection-independent query execution settings.
///
/// Passed explicitly to the client builder; [`StoreConfig::from_env`] is
/// the opt-in way to pick these up from the process environment instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Deployment region of the remote store.
    pub region: String,

    /// Database holding the curated semantic views.
    pub database: String,

    /// Where the store stages raw result sets, if the deployment
    /// requires an explicit location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_location: Option<String>,

    /// Execution workgroup, when the deployment routes queries through one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workgroup: Option<String>,
}

impl StoreConfig {
    /// Configuration with the required fields only.
    pub fn new(region: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            database: database.into(),
            output_location: None,
            workgroup: None,
        }
    }

    /// Set the result staging location.
    pub fn with_output_location(mut self, location: impl Into<String>) -> Self {
        self.output_location = Some(location.into());
        self
    }

    /// Set the execution workgroup.
    pub fn with_workgroup(mut self, workgroup: impl Into<String>) -> Self {
        self.workgroup = Some(workgroup.into());
        self
    }

    /// Read the configuration from `EDULAKE_*` environment variables.
    ///
    /// `EDULAKE_REGION` and `EDULAKE_DATABASE` are required; the staging
    /// location and workgroup are picked up when present.
    pub fn from_env() -> Result<Self> {
        let region = std::env::var(ENV_REGION)
            .map_err(|_| EduLinkError::ConfigurationError(format!("{} is not set", ENV_REGION)))?;
        let database = std::env::var(ENV_DATABASE).map_err(|_| {
            EduLinkError::ConfigurationError(format!("{} is not set", ENV_DATABASE))
        })?;

        let mut config = Self::new(region, database);
        if let Ok(location) = std::env::var(ENV_OUTPUT_LOCATION) {
            config.output_location = Some(location);
        }
        if let Ok(workgroup) = std::env::var(ENV_WORKGROUP) {
            config.workgroup = Some(workgroup);
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations with blank required fields.
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(EduLinkError::ConfigurationError(
                "region must not be empty".to_string(),
            ));
        }
        if self.database.trim().is_empty() {
            return Err(EduLinkError::ConfigurationError(
                "database must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_optional_fields() {
        let config = StoreConfig::new("us-east-1", "us_education_curated")
            .with_output_location("s3://bucket/results/")
            .with_workgroup("dashboard");

        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.database, "us_education_curated");
        assert_eq!(config.output_location.as_deref(), Some("s3://bucket/results/"));
        assert_eq!(config.workgroup.as_deref(), Some("dashboard"));
    }

    #[test]
    fn blank_required_fields_fail_validation() {
        assert!(StoreConfig::new("", "db").validate().is_err());
        assert!(StoreConfig::new("us-east-1", "  ").validate().is_err());
        assert!(StoreConfig::new("us-east-1", "db").validate().is_ok());
    }
}
