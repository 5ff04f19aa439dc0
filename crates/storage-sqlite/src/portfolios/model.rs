//! Database models for portfolios.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use techfolio_core::portfolios::{NewPortfolio, Portfolio};

/// Database model for portfolios
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub portfolio_type: String,
    pub status: String,
    pub owner_id: String,
    pub organization_id: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for creating a new portfolio
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub portfolio_type: String,
    pub status: String,
    pub owner_id: String,
    pub organization_id: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion to domain models
impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            portfolio_type: db.portfolio_type,
            status: db.status,
            owner_id: db.owner_id,
            organization_id: db.organization_id,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl NewPortfolioDB {
    /// Builds an insertable row from the domain input; the caller supplies
    /// the storage-assigned id.
    pub fn from_domain(id: String, domain: NewPortfolio) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            name: domain.name,
            description: domain.description,
            portfolio_type: domain.portfolio_type,
            status: domain
                .status
                .unwrap_or_else(|| techfolio_core::portfolios::DEFAULT_PORTFOLIO_STATUS.to_string()),
            owner_id: domain.owner_id,
            organization_id: domain.organization_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
