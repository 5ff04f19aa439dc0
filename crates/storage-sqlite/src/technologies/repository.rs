use async_trait::async_trait;
use diesel::dsl::sum;
use diesel::prelude::*;
use uuid::Uuid;

use techfolio_core::errors::{DatabaseError, Error, Result};
use techfolio_core::technologies::{
    NewTechnology, Technology, TechnologyRepositoryTrait, TechnologyUpdate,
};

use super::model::{NewTechnologyDB, TechnologyDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::technologies;
use crate::schema::technologies::dsl::*;

/// Repository for managing technology data in the database.
///
/// The count and cost aggregates are computed server-side so the summary
/// join never loads the full collection.
pub struct TechnologyRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl TechnologyRepository {
    /// Creates a new TechnologyRepository instance
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

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
impl TechnologyRepositoryTrait for TechnologyRepository {
    async fn create(
        &self,
        portfolio_id_param: &str,
        new_technology: NewTechnology,
    ) -> Result<Technology> {
        let portfolio_id_owned = portfolio_id_param.to_string();
        self.writer
            .exec(move |conn| {
                let row = NewTechnologyDB::from_domain(
                    Uuid::new_v4().to_string(),
                    portfolio_id_owned,
                    new_technology,
                );

                let result_db = diesel::insert_into(technologies::table)
                    .values(&row)
                    .returning(TechnologyDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Technology::from(result_db))
            })
            .await
    }

    async fn update(&self, update: TechnologyUpdate) -> Result<Technology> {
        self.writer
            .exec(move |conn| {
                let update_id = update.id.clone().unwrap_or_default();

                let mut row = technologies
                    .select(TechnologyDB::as_select())
                    .find(&update_id)
                    .first::<TechnologyDB>(conn)
                    .into_core()?;

                row.name = update.name;
                row.category = update.category;
                row.technology_type = update.technology_type;
                row.maturity_level = update.maturity_level;
                row.risk_level = update.risk_level;
                row.annual_cost = update.annual_cost;
                row.license_cost = update.license_cost;
                row.maintenance_cost = update.maintenance_cost;
                row.vendor_name = update.vendor_name;
                row.updated_at = chrono::Utc::now().naive_utc();

                diesel::update(technologies.find(&update_id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;

                Ok(Technology::from(row))
            })
            .await
    }

    async fn deactivate(&self, technology_id: &str) -> Result<usize> {
        let id_owned = technology_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(technologies.find(&id_owned))
                    .set((
                        is_active.eq(false),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn get_by_id(&self, technology_id: &str) -> Result<Option<Technology>> {
        let id_owned = technology_id.to_string();
        self.read(move |conn| {
            let row = technologies
                .select(TechnologyDB::as_select())
                .find(&id_owned)
                .first::<TechnologyDB>(conn)
                .optional()
                .into_core()?;
            Ok(row.map(Technology::from))
        })
        .await
    }

    async fn list_by_portfolio(&self, portfolio_id_param: &str) -> Result<Vec<Technology>> {
        let portfolio_id_owned = portfolio_id_param.to_string();
        self.read(move |conn| {
            let results = technologies
                .select(TechnologyDB::as_select())
                .filter(portfolio_id.eq(&portfolio_id_owned))
                .filter(is_active.eq(true))
                .order(name.asc())
                .load::<TechnologyDB>(conn)
                .into_core()?;
            Ok(results.into_iter().map(Technology::from).collect())
        })
        .await
    }

    async fn count_by_portfolio(&self, portfolio_id_param: &str) -> Result<i64> {
        let portfolio_id_owned = portfolio_id_param.to_string();
        self.read(move |conn| {
            technologies
                .filter(portfolio_id.eq(&portfolio_id_owned))
                .filter(is_active.eq(true))
                .count()
                .get_result::<i64>(conn)
                .into_core()
        })
        .await
    }

    async fn sum_annual_cost(&self, portfolio_id_param: &str) -> Result<f64> {
        let portfolio_id_owned = portfolio_id_param.to_string();
        self.read(move |conn| {
            // SUM over an empty or all-NULL set is NULL; absent costs
            // contribute zero either way.
            let total: Option<f64> = technologies
                .filter(portfolio_id.eq(&portfolio_id_owned))
                .filter(is_active.eq(true))
                .select(sum(annual_cost))
                .get_result(conn)
                .into_core()?;
            Ok(total.unwrap_or(0.0))
        })
        .await
    }
}
