use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use techfolio_core::portfolios::{
    NewPortfolio, Portfolio, PortfolioFilters, PortfolioRepositoryTrait, PortfolioUpdate,
};
use techfolio_core::errors::{DatabaseError, Error, Result};

use super::model::{NewPortfolioDB, PortfolioDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::portfolios;
use crate::schema::portfolios::dsl::*;

/// Repository for managing portfolio data in the database.
///
/// Reads run on the blocking pool; writes go through the single-writer
/// actor. Not-found is `Ok(None)`, never an error.
pub struct PortfolioRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl PortfolioRepository {
    /// Creates a new PortfolioRepository instance
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Runs a read query on the blocking pool so the async caller's thread
    /// is released at the I/O boundary.
    async fn read<F, T>(&self, query: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = get_connection(&pool)?;
            query(&mut conn)
        })
        .await
        .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))?
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        self.writer
            .exec(move |conn| {
                let row = NewPortfolioDB::from_domain(Uuid::new_v4().to_string(), new_portfolio);

                let result_db = diesel::insert_into(portfolios::table)
                    .values(&row)
                    .returning(PortfolioDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Portfolio::from(result_db))
            })
            .await
    }

    async fn update(&self, update: PortfolioUpdate) -> Result<Portfolio> {
        self.writer
            .exec(move |conn| {
                let update_id = update.id.clone().unwrap_or_default();

                let mut row = portfolios
                    .select(PortfolioDB::as_select())
                    .find(&update_id)
                    .first::<PortfolioDB>(conn)
                    .into_core()?;

                row.name = update.name;
                row.description = update.description;
                row.portfolio_type = update.portfolio_type;
                row.status = update.status;
                row.updated_at = chrono::Utc::now().naive_utc();

                diesel::update(portfolios.find(&update_id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;

                Ok(Portfolio::from(row))
            })
            .await
    }

    async fn deactivate(&self, portfolio_id_param: &str) -> Result<usize> {
        let id_owned = portfolio_id_param.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(portfolios.find(&id_owned))
                    .set((
                        is_active.eq(false),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn get_by_id(&self, portfolio_id_param: &str) -> Result<Option<Portfolio>> {
        let id_owned = portfolio_id_param.to_string();
        self.read(move |conn| {
            let row = portfolios
                .select(PortfolioDB::as_select())
                .find(&id_owned)
                .first::<PortfolioDB>(conn)
                .optional()
                .into_core()?;
            Ok(row.map(Portfolio::from))
        })
        .await
    }

    async fn list(&self, filters: &PortfolioFilters) -> Result<Vec<Portfolio>> {
        let filters = filters.clone();
        self.read(move |conn| {
            let mut query = portfolios::table.into_boxed();

            // Listings default to active portfolios unless asked otherwise.
            query = query.filter(is_active.eq(filters.is_active.unwrap_or(true)));

            if let Some(type_filter) = &filters.portfolio_type {
                query = query.filter(portfolio_type.eq(type_filter.clone()));
            }
            if let Some(status_filter) = &filters.status {
                query = query.filter(status.eq(status_filter.clone()));
            }
            if let Some(org_filter) = &filters.organization_id {
                query = query.filter(organization_id.eq(org_filter.clone()));
            }

            let results = query
                .select(PortfolioDB::as_select())
                .order(name.asc())
                .load::<PortfolioDB>(conn)
                .into_core()?;

            Ok(results.into_iter().map(Portfolio::from).collect())
        })
        .await
    }

    async fn find_active_by_name(&self, name_param: &str) -> Result<Option<Portfolio>> {
        let name_owned = name_param.to_string();
        self.read(move |conn| {
            let row = portfolios
                .select(PortfolioDB::as_select())
                .filter(name.eq(&name_owned))
                .filter(is_active.eq(true))
                .first::<PortfolioDB>(conn)
                .optional()
                .into_core()?;
            Ok(row.map(Portfolio::from))
        })
        .await
    }
}
