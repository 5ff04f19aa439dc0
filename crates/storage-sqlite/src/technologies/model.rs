//! Database models for technologies.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use techfolio_core::technologies::{NewTechnology, Technology};

use crate::portfolios::PortfolioDB;

/// Database model for technologies
#[derive(
    Queryable,
    Identifiable,
    Associations,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(PortfolioDB, foreign_key = portfolio_id))]
#[diesel(table_name = crate::schema::technologies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TechnologyDB {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
    pub category: String,
    pub technology_type: String,
    pub maturity_level: String,
    pub risk_level: String,
    pub annual_cost: Option<f64>,
    pub license_cost: Option<f64>,
    pub maintenance_cost: Option<f64>,
    pub vendor_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for attaching a new technology
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::technologies)]
#[serde(rename_all = "camelCase")]
pub struct NewTechnologyDB {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
    pub category: String,
    pub technology_type: String,
    pub maturity_level: String,
    pub risk_level: String,
    pub annual_cost: Option<f64>,
    pub license_cost: Option<f64>,
    pub maintenance_cost: Option<f64>,
    pub vendor_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion to domain models
impl From<TechnologyDB> for Technology {
    fn from(db: TechnologyDB) -> Self {
        Self {
            id: db.id,
            portfolio_id: db.portfolio_id,
            name: db.name,
            category: db.category,
            technology_type: db.technology_type,
            maturity_level: db.maturity_level,
            risk_level: db.risk_level,
            annual_cost: db.annual_cost,
            license_cost: db.license_cost,
            maintenance_cost: db.maintenance_cost,
            vendor_name: db.vendor_name,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl NewTechnologyDB {
    /// Builds an insertable row from the domain input; the caller supplies
    /// the storage-assigned id and the owning portfolio.
    pub fn from_domain(id: String, portfolio_id: String, domain: NewTechnology) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            portfolio_id,
            name: domain.name,
            category: domain.category,
            technology_type: domain.technology_type,
            maturity_level: domain.maturity_level,
            risk_level: domain.risk_level,
            annual_cost: domain.annual_cost,
            license_cost: domain.license_cost,
            maintenance_cost: domain.maintenance_cost,
            vendor_name: domain.vendor_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
