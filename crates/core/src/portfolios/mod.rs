//! Portfolios module - domain models, services, and traits.

mod portfolios_constants;
mod portfolios_model;
mod portfolios_service;
mod portfolios_traits;

// Re-export the public interface
pub use portfolios_constants::*;
pub use portfolios_model::{NewPortfolio, Portfolio, PortfolioFilters, PortfolioUpdate};
pub use portfolios_service::PortfolioService;
pub use portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
