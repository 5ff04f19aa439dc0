use log::debug;
use std::sync::Arc;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioFilters, PortfolioUpdate};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::errors::{DatabaseError, Error, Result, ValidationError};
use crate::events::{dispatch_best_effort, ChangeEvent, ChangeKind, EventDispatcher};
use crate::retry::{self, RetryPolicy};

/// Service for managing technology portfolios.
///
/// Coordinates validation, storage access (with transient-failure retry on
/// reads) and best-effort change-event dispatch after mutations.
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    dispatcher: Arc<dyn EventDispatcher>,
    retry_policy: RetryPolicy,
}

impl PortfolioService {
    /// Creates a new PortfolioService instance.
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        dispatcher: Arc<dyn EventDispatcher>,
    ) -> Self {
        Self {
            repository,
            dispatcher,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Overrides the storage retry policy.
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }
}

#[async_trait::async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;
        debug!("Creating portfolio '{}'", new_portfolio.name);

        // Friendlier early rejection; the storage unique index stays the
        // authority under concurrent creates.
        if self
            .repository
            .find_active_by_name(&new_portfolio.name)
            .await?
            .is_some()
        {
            return Err(Error::Validation(ValidationError::DuplicateName(
                new_portfolio.name,
            )));
        }

        let created = match self.repository.create(new_portfolio).await {
            Ok(portfolio) => portfolio,
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => {
                return Err(Error::Validation(ValidationError::DuplicateName(
                    "portfolio name".to_string(),
                )))
            }
            Err(err) => return Err(err),
        };

        dispatch_best_effort(
            self.dispatcher.clone(),
            ChangeEvent::portfolio(&created.id, ChangeKind::Created, &created),
        );
        Ok(created)
    }

    async fn update_portfolio(&self, update: PortfolioUpdate) -> Result<Portfolio> {
        update.validate()?;
        let updated = self.repository.update(update).await?;

        dispatch_best_effort(
            self.dispatcher.clone(),
            ChangeEvent::portfolio(&updated.id, ChangeKind::Updated, &updated),
        );
        Ok(updated)
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        let snapshot = self.repository.get_by_id(portfolio_id).await?;
        self.repository.deactivate(portfolio_id).await?;

        if let Some(portfolio) = snapshot {
            dispatch_best_effort(
                self.dispatcher.clone(),
                ChangeEvent::portfolio(portfolio_id, ChangeKind::Deleted, &portfolio),
            );
        }
        Ok(())
    }

    async fn get_portfolio(&self, portfolio_id: &str) -> Result<Option<Portfolio>> {
        retry::with_backoff(self.retry_policy, || {
            self.repository.get_by_id(portfolio_id)
        })
        .await
    }

    async fn list_portfolios(&self, filters: &PortfolioFilters) -> Result<Vec<Portfolio>> {
        retry::with_backoff(self.retry_policy, || self.repository.list(filters)).await
    }
}
