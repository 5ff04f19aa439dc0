//! Portfolio repository and service traits.
//!
//! These traits define the contract for portfolio operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioFilters, PortfolioUpdate};
use crate::errors::Result;

/// Trait defining the contract for Portfolio repository operations.
///
/// All operations are non-blocking: implementations release the calling
/// task at the I/O boundary. Read paths represent not-found as `Ok(None)`
/// or an empty Vec; an `Err` always means the storage engine itself failed.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Creates a new portfolio; the storage layer assigns the id.
    ///
    /// The active-name uniqueness constraint is enforced atomically by
    /// storage and surfaces as a unique-violation error.
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    /// Updates an existing portfolio (last-write-wins).
    async fn update(&self, update: PortfolioUpdate) -> Result<Portfolio>;

    /// Logically deletes a portfolio (`is_active = false`).
    ///
    /// Returns the number of affected rows.
    async fn deactivate(&self, portfolio_id: &str) -> Result<usize>;

    /// Fetches a portfolio by id. Absent is `Ok(None)`, never an error.
    async fn get_by_id(&self, portfolio_id: &str) -> Result<Option<Portfolio>>;

    /// Lists portfolios matching the given filters.
    async fn list(&self, filters: &PortfolioFilters) -> Result<Vec<Portfolio>>;

    /// Finds an active portfolio by exact name.
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Portfolio>>;
}

/// Trait defining the contract for Portfolio service operations.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    /// Creates a new portfolio with business validation.
    ///
    /// A duplicate active name fails with a validation error.
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    /// Updates an existing portfolio with business validation.
    async fn update_portfolio(&self, update: PortfolioUpdate) -> Result<Portfolio>;

    /// Logically deletes a portfolio.
    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()>;

    /// Fetches a portfolio by id. Absent is `Ok(None)`.
    async fn get_portfolio(&self, portfolio_id: &str) -> Result<Option<Portfolio>>;

    /// Lists portfolios matching the given filters.
    async fn list_portfolios(&self, filters: &PortfolioFilters) -> Result<Vec<Portfolio>>;
}
