//! Derived portfolio summary model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portfolios::Portfolio;

/// Derived summary of a portfolio and its active technologies.
///
/// Never persisted and never cached across requests: each instance is
/// recomputed against the current technology set, so the count and cost are
/// jointly consistent with one observed interleaving of the two fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub id: String,
    pub name: String,
    pub portfolio_type: String,
    pub status: String,
    /// Count of active technologies referencing this portfolio.
    pub technology_count: i64,
    /// Sum of active technologies' annual cost; absent costs contribute zero.
    pub total_annual_cost: f64,
    pub last_updated: DateTime<Utc>,
}

impl PortfolioSummary {
    /// Joins a portfolio with its two resolved aggregates.
    pub fn join(portfolio: &Portfolio, technology_count: i64, total_annual_cost: f64) -> Self {
        Self {
            id: portfolio.id.clone(),
            name: portfolio.name.clone(),
            portfolio_type: portfolio.portfolio_type.clone(),
            status: portfolio.status.clone(),
            technology_count,
            total_annual_cost,
            last_updated: Utc::now(),
        }
    }
}
