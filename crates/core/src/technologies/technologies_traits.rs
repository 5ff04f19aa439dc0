//! Technology repository and service traits.

use async_trait::async_trait;

use super::technologies_model::{NewTechnology, Technology, TechnologyUpdate};
use crate::errors::Result;

/// Trait defining the contract for Technology repository operations.
///
/// Reads are non-blocking and represent not-found as `Ok(None)` or an empty
/// Vec. The count and cost aggregates run server-side so the summary join
/// never materializes the full collection when storage can avoid it.
#[async_trait]
pub trait TechnologyRepositoryTrait: Send + Sync {
    /// Creates a new technology under the given portfolio.
    async fn create(&self, portfolio_id: &str, new_technology: NewTechnology)
        -> Result<Technology>;

    /// Updates an existing technology (last-write-wins).
    async fn update(&self, update: TechnologyUpdate) -> Result<Technology>;

    /// Logically deletes a technology (`is_active = false`).
    ///
    /// Returns the number of affected rows.
    async fn deactivate(&self, technology_id: &str) -> Result<usize>;

    /// Fetches a technology by id. Absent is `Ok(None)`.
    async fn get_by_id(&self, technology_id: &str) -> Result<Option<Technology>>;

    /// Lists the active technologies of a portfolio.
    async fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Technology>>;

    /// Counts the active technologies of a portfolio.
    async fn count_by_portfolio(&self, portfolio_id: &str) -> Result<i64>;

    /// Sums the annual cost of a portfolio's active technologies.
    ///
    /// Technologies without an annual cost contribute zero.
    async fn sum_annual_cost(&self, portfolio_id: &str) -> Result<f64>;
}

/// Trait defining the contract for Technology service operations.
#[async_trait]
pub trait TechnologyServiceTrait: Send + Sync {
    /// Attaches a technology to an existing, active portfolio.
    async fn create_technology(
        &self,
        portfolio_id: &str,
        new_technology: NewTechnology,
    ) -> Result<Technology>;

    /// Updates an existing technology with business validation.
    async fn update_technology(&self, update: TechnologyUpdate) -> Result<Technology>;

    /// Logically deletes a technology.
    async fn delete_technology(&self, technology_id: &str) -> Result<()>;

    /// Fetches a technology by id. Absent is `Ok(None)`.
    async fn get_technology(&self, technology_id: &str) -> Result<Option<Technology>>;

    /// Lists the active technologies of a portfolio.
    async fn list_technologies(&self, portfolio_id: &str) -> Result<Vec<Technology>>;
}
