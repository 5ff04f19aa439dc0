//! Technology domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::technologies_constants::{is_valid_maturity_level, is_valid_risk_level};
use crate::{errors::ValidationError, Error, Result};

/// Domain model representing a technology attached to a portfolio.
///
/// Holds only the forward reference (`portfolio_id`); the portfolio side
/// never embeds a technology collection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
    pub category: String,
    pub technology_type: String,
    pub maturity_level: String,
    pub risk_level: String,
    pub annual_cost: Option<f64>,
    pub license_cost: Option<f64>,
    pub maintenance_cost: Option<f64>,
    pub vendor_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for attaching a new technology to a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTechnology {
    pub name: String,
    pub category: String,
    pub technology_type: String,
    pub maturity_level: String,
    pub risk_level: String,
    pub annual_cost: Option<f64>,
    pub license_cost: Option<f64>,
    pub maintenance_cost: Option<f64>,
    pub vendor_name: Option<String>,
}

impl NewTechnology {
    /// Validates the new technology data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Technology name cannot be empty".to_string(),
            )));
        }
        if !is_valid_maturity_level(&self.maturity_level) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown maturity level '{}'",
                self.maturity_level
            ))));
        }
        if !is_valid_risk_level(&self.risk_level) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown risk level '{}'",
                self.risk_level
            ))));
        }
        for (field, cost) in [
            ("annualCost", self.annual_cost),
            ("licenseCost", self.license_cost),
            ("maintenanceCost", self.maintenance_cost),
        ] {
            if let Some(value) = cost {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "{} must be a non-negative number",
                        field
                    ))));
                }
            }
        }
        Ok(())
    }
}

/// Input model for updating an existing technology.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyUpdate {
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub technology_type: String,
    pub maturity_level: String,
    pub risk_level: String,
    pub annual_cost: Option<f64>,
    pub license_cost: Option<f64>,
    pub maintenance_cost: Option<f64>,
    pub vendor_name: Option<String>,
}

impl TechnologyUpdate {
    /// Validates the technology update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Technology ID is required for updates".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Technology name cannot be empty".to_string(),
            )));
        }
        if !is_valid_maturity_level(&self.maturity_level) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown maturity level '{}'",
                self.maturity_level
            ))));
        }
        if !is_valid_risk_level(&self.risk_level) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown risk level '{}'",
                self.risk_level
            ))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new_technology() -> NewTechnology {
        NewTechnology {
            name: "Postgres".to_string(),
            category: "Database".to_string(),
            technology_type: "PLATFORM".to_string(),
            maturity_level: "MATURE".to_string(),
            risk_level: "LOW".to_string(),
            annual_cost: Some(1200.0),
            license_cost: None,
            maintenance_cost: None,
            vendor_name: Some("PostgreSQL Global Development Group".to_string()),
        }
    }

    #[test]
    fn new_technology_accepts_valid_input() {
        assert!(valid_new_technology().validate().is_ok());
    }

    #[test]
    fn new_technology_accepts_absent_costs() {
        let mut input = valid_new_technology();
        input.annual_cost = None;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn new_technology_rejects_negative_cost() {
        let mut input = valid_new_technology();
        input.annual_cost = Some(-1.0);
        assert!(input.validate().is_err());
    }

    #[test]
    fn new_technology_rejects_unknown_risk_level() {
        let mut input = valid_new_technology();
        input.risk_level = "EXTREME".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_requires_id() {
        let update = TechnologyUpdate {
            id: None,
            name: "Postgres".to_string(),
            category: "Database".to_string(),
            technology_type: "PLATFORM".to_string(),
            maturity_level: "MATURE".to_string(),
            risk_level: "LOW".to_string(),
            annual_cost: None,
            license_cost: None,
            maintenance_cost: None,
            vendor_name: None,
        };
        assert!(update.validate().is_err());
    }
}
