//! Portfolio summary module - the derived aggregation over a portfolio and
//! its technologies.

mod summary_model;
mod summary_service;

pub use summary_model::PortfolioSummary;
pub use summary_service::{SummaryService, SummaryServiceTrait};
