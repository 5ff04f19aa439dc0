//! Portfolio domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::portfolios_constants::{is_valid_portfolio_status, is_valid_portfolio_type};
use crate::{errors::ValidationError, Error, Result};

/// Domain model representing a technology portfolio.
///
/// Technologies reference a portfolio by id only; the portfolio never holds
/// a collection of its technologies.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub portfolio_type: String,
    pub status: String,
    pub owner_id: String,
    pub organization_id: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub name: String,
    pub description: Option<String>,
    pub portfolio_type: String,
    #[serde(default)]
    pub status: Option<String>,
    pub owner_id: String,
    pub organization_id: String,
}

impl NewPortfolio {
    /// Validates the new portfolio data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Portfolio name cannot be empty".to_string(),
            )));
        }
        if !is_valid_portfolio_type(&self.portfolio_type) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown portfolio type '{}'",
                self.portfolio_type
            ))));
        }
        if let Some(status) = &self.status {
            if !is_valid_portfolio_status(status) {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Unknown portfolio status '{}'",
                    status
                ))));
            }
        }
        if self.organization_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "organizationId".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for updating an existing portfolio.
///
/// Updates are last-write-wins on the mutable fields; id, owner and
/// organization are fixed after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub portfolio_type: String,
    pub status: String,
}

impl PortfolioUpdate {
    /// Validates the portfolio update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Portfolio ID is required for updates".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Portfolio name cannot be empty".to_string(),
            )));
        }
        if !is_valid_portfolio_type(&self.portfolio_type) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown portfolio type '{}'",
                self.portfolio_type
            ))));
        }
        if !is_valid_portfolio_status(&self.status) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown portfolio status '{}'",
                self.status
            ))));
        }
        Ok(())
    }
}

/// Filters for listing portfolios.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioFilters {
    pub portfolio_type: Option<String>,
    pub status: Option<String>,
    pub organization_id: Option<String>,
    /// Defaults to active-only when None.
    pub is_active: Option<bool>,
}
