//! Summary aggregation service.
//!
//! Joins a portfolio with two concurrently-fetched aggregates over its
//! technology collection. The join resolves only once both branches have;
//! a portfolio with zero technologies yields the explicit `{0, 0}` default
//! rather than hanging or failing on the empty collection.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::summary_model::PortfolioSummary;
use crate::errors::{Error, Result};
use crate::portfolios::{PortfolioFilters, PortfolioRepositoryTrait};
use crate::retry::{self, RetryPolicy};
use crate::technologies::TechnologyRepositoryTrait;

/// Trait defining the contract for summary computation.
#[async_trait]
pub trait SummaryServiceTrait: Send + Sync {
    /// Computes the summary for one portfolio.
    ///
    /// An unknown id is `Ok(None)`, never an error. A failure in either
    /// secondary fetch after the portfolio resolved degrades the whole
    /// computation to `Error::Aggregation` - partial failure is surfaced,
    /// not masked as zero counts.
    async fn get_summary(&self, portfolio_id: &str) -> Result<Option<PortfolioSummary>>;

    /// Computes summaries for every portfolio matching the filters.
    async fn list_summaries(&self, filters: &PortfolioFilters) -> Result<Vec<PortfolioSummary>>;
}

/// Service computing derived portfolio summaries.
pub struct SummaryService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    technology_repository: Arc<dyn TechnologyRepositoryTrait>,
    retry_policy: RetryPolicy,
}

impl SummaryService {
    /// Creates a new SummaryService instance.
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        technology_repository: Arc<dyn TechnologyRepositoryTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            technology_repository,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Overrides the storage retry policy.
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Runs the two dependent fetches concurrently and joins the results.
    async fn join_aggregates(&self, portfolio_id: &str) -> Result<(i64, f64)> {
        let count_fut = self.technology_repository.count_by_portfolio(portfolio_id);
        let cost_fut = self.technology_repository.sum_annual_cost(portfolio_id);

        // Both branches must resolve before the combined result is emitted.
        let (count, cost) = tokio::try_join!(count_fut, cost_fut)
            .map_err(|e| Error::Aggregation(format!("secondary fetch failed: {}", e)))?;
        Ok((count, cost))
    }
}

#[async_trait]
impl SummaryServiceTrait for SummaryService {
    async fn get_summary(&self, portfolio_id: &str) -> Result<Option<PortfolioSummary>> {
        let portfolio = match retry::with_backoff(self.retry_policy, || {
            self.portfolio_repository.get_by_id(portfolio_id)
        })
        .await?
        {
            Some(portfolio) => portfolio,
            None => return Ok(None),
        };

        let (count, cost) = self.join_aggregates(portfolio_id).await?;
        debug!(
            "Computed summary for '{}': {} technologies, {:.2} annual cost",
            portfolio.name, count, cost
        );
        Ok(Some(PortfolioSummary::join(&portfolio, count, cost)))
    }

    async fn list_summaries(&self, filters: &PortfolioFilters) -> Result<Vec<PortfolioSummary>> {
        let portfolios = retry::with_backoff(self.retry_policy, || {
            self.portfolio_repository.list(filters)
        })
        .await?;

        let mut summaries = Vec::with_capacity(portfolios.len());
        for portfolio in &portfolios {
            let (count, cost) = self.join_aggregates(&portfolio.id).await?;
            summaries.push(PortfolioSummary::join(portfolio, count, cost));
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DatabaseError;
    use crate::portfolios::{NewPortfolio, Portfolio, PortfolioUpdate};
    use crate::technologies::{NewTechnology, Technology, TechnologyUpdate};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FixedPortfolioRepository {
        rows: HashMap<String, Portfolio>,
    }

    impl FixedPortfolioRepository {
        fn with(portfolio: Portfolio) -> Self {
            let mut rows = HashMap::new();
            rows.insert(portfolio.id.clone(), portfolio);
            Self { rows }
        }
    }

    #[async_trait]
    impl PortfolioRepositoryTrait for FixedPortfolioRepository {
        async fn create(&self, _new: NewPortfolio) -> Result<Portfolio> {
            unimplemented!("read-only fixture")
        }
        async fn update(&self, _update: PortfolioUpdate) -> Result<Portfolio> {
            unimplemented!("read-only fixture")
        }
        async fn deactivate(&self, _id: &str) -> Result<usize> {
            unimplemented!("read-only fixture")
        }
        async fn get_by_id(&self, id: &str) -> Result<Option<Portfolio>> {
            Ok(self.rows.get(id).cloned())
        }
        async fn list(&self, _filters: &PortfolioFilters) -> Result<Vec<Portfolio>> {
            Ok(self.rows.values().cloned().collect())
        }
        async fn find_active_by_name(&self, name: &str) -> Result<Option<Portfolio>> {
            Ok(self.rows.values().find(|p| p.name == name).cloned())
        }
    }

    /// Technology fixture with per-portfolio aggregates and switchable failure.
    #[derive(Default)]
    struct FixedTechnologyRepository {
        aggregates: HashMap<String, (i64, f64)>,
        fail_secondary: Mutex<bool>,
    }

    impl FixedTechnologyRepository {
        fn with(portfolio_id: &str, count: i64, cost: f64) -> Self {
            let mut aggregates = HashMap::new();
            aggregates.insert(portfolio_id.to_string(), (count, cost));
            Self {
                aggregates,
                fail_secondary: Mutex::new(false),
            }
        }

        fn fail_secondary_fetches(&self) {
            *self.fail_secondary.lock().unwrap() = true;
        }

        fn check_failure(&self) -> Result<()> {
            if *self.fail_secondary.lock().unwrap() {
                Err(Error::Database(DatabaseError::QueryFailed(
                    "technology fetch failed".into(),
                )))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl TechnologyRepositoryTrait for FixedTechnologyRepository {
        async fn create(&self, _pid: &str, _new: NewTechnology) -> Result<Technology> {
            unimplemented!("read-only fixture")
        }
        async fn update(&self, _update: TechnologyUpdate) -> Result<Technology> {
            unimplemented!("read-only fixture")
        }
        async fn deactivate(&self, _id: &str) -> Result<usize> {
            unimplemented!("read-only fixture")
        }
        async fn get_by_id(&self, _id: &str) -> Result<Option<Technology>> {
            Ok(None)
        }
        async fn list_by_portfolio(&self, _pid: &str) -> Result<Vec<Technology>> {
            Ok(Vec::new())
        }
        async fn count_by_portfolio(&self, portfolio_id: &str) -> Result<i64> {
            self.check_failure()?;
            Ok(self.aggregates.get(portfolio_id).map(|a| a.0).unwrap_or(0))
        }
        async fn sum_annual_cost(&self, portfolio_id: &str) -> Result<f64> {
            self.check_failure()?;
            Ok(self.aggregates.get(portfolio_id).map(|a| a.1).unwrap_or(0.0))
        }
    }

    fn edge_infra() -> Portfolio {
        Portfolio {
            id: "p-1".to_string(),
            name: "Edge Infra".to_string(),
            portfolio_type: "ENTERPRISE".to_string(),
            status: "ACTIVE".to_string(),
            is_active: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn summary_joins_count_and_cost() {
        let service = SummaryService::new(
            Arc::new(FixedPortfolioRepository::with(edge_infra())),
            Arc::new(FixedTechnologyRepository::with("p-1", 2, 1200.0)),
        );

        let summary = service.get_summary("p-1").await.unwrap().unwrap();
        assert_eq!(summary.technology_count, 2);
        assert_eq!(summary.total_annual_cost, 1200.0);
        assert_eq!(summary.name, "Edge Infra");
    }

    #[tokio::test]
    async fn zero_technologies_yields_explicit_default() {
        let service = SummaryService::new(
            Arc::new(FixedPortfolioRepository::with(edge_infra())),
            Arc::new(FixedTechnologyRepository::default()),
        );

        let summary = service.get_summary("p-1").await.unwrap().unwrap();
        assert_eq!(summary.technology_count, 0);
        assert_eq!(summary.total_annual_cost, 0.0);
    }

    #[tokio::test]
    async fn unknown_portfolio_is_none_not_error() {
        let service = SummaryService::new(
            Arc::new(FixedPortfolioRepository::default()),
            Arc::new(FixedTechnologyRepository::default()),
        );

        assert!(service.get_summary("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn secondary_fetch_failure_surfaces_as_aggregation_error() {
        let technologies = Arc::new(FixedTechnologyRepository::with("p-1", 2, 1200.0));
        technologies.fail_secondary_fetches();

        let service = SummaryService::new(
            Arc::new(FixedPortfolioRepository::with(edge_infra())),
            technologies,
        );

        let result = service.get_summary("p-1").await;
        assert!(matches!(result, Err(Error::Aggregation(_))));
    }
}
