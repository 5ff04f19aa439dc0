use log::debug;
use std::sync::Arc;

use super::technologies_model::{NewTechnology, Technology, TechnologyUpdate};
use super::technologies_traits::{TechnologyRepositoryTrait, TechnologyServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::events::{dispatch_best_effort, ChangeEvent, ChangeKind, EventDispatcher};
use crate::portfolios::PortfolioRepositoryTrait;
use crate::retry::{self, RetryPolicy};

/// Service for managing the technologies attached to portfolios.
pub struct TechnologyService {
    repository: Arc<dyn TechnologyRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    dispatcher: Arc<dyn EventDispatcher>,
    retry_policy: RetryPolicy,
}

impl TechnologyService {
    /// Creates a new TechnologyService instance.
    pub fn new(
        repository: Arc<dyn TechnologyRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        dispatcher: Arc<dyn EventDispatcher>,
    ) -> Self {
        Self {
            repository,
            portfolio_repository,
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
impl TechnologyServiceTrait for TechnologyService {
    async fn create_technology(
        &self,
        portfolio_id: &str,
        new_technology: NewTechnology,
    ) -> Result<Technology> {
        new_technology.validate()?;

        let portfolio = self
            .portfolio_repository
            .get_by_id(portfolio_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "Portfolio '{}' does not exist or is inactive",
                    portfolio_id
                )))
            })?;

        debug!(
            "Attaching technology '{}' to portfolio '{}'",
            new_technology.name, portfolio.name
        );
        let created = self.repository.create(portfolio_id, new_technology).await?;

        dispatch_best_effort(
            self.dispatcher.clone(),
            ChangeEvent::technology(&created.id, ChangeKind::Created, &created),
        );
        Ok(created)
    }

    async fn update_technology(&self, update: TechnologyUpdate) -> Result<Technology> {
        update.validate()?;
        let updated = self.repository.update(update).await?;

        dispatch_best_effort(
            self.dispatcher.clone(),
            ChangeEvent::technology(&updated.id, ChangeKind::Updated, &updated),
        );
        Ok(updated)
    }

    async fn delete_technology(&self, technology_id: &str) -> Result<()> {
        let snapshot = self.repository.get_by_id(technology_id).await?;
        self.repository.deactivate(technology_id).await?;

        if let Some(technology) = snapshot {
            dispatch_best_effort(
                self.dispatcher.clone(),
                ChangeEvent::technology(technology_id, ChangeKind::Deleted, &technology),
            );
        }
        Ok(())
    }

    async fn get_technology(&self, technology_id: &str) -> Result<Option<Technology>> {
        retry::with_backoff(self.retry_policy, || self.repository.get_by_id(technology_id)).await
    }

    async fn list_technologies(&self, portfolio_id: &str) -> Result<Vec<Technology>> {
        retry::with_backoff(self.retry_policy, || {
            self.repository.list_by_portfolio(portfolio_id)
        })
        .await
    }
}
