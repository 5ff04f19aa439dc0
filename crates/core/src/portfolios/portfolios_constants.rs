/// Default portfolio type for new portfolios
pub const DEFAULT_PORTFOLIO_TYPE: &str = "ENTERPRISE";

/// Default status for new portfolios
pub const DEFAULT_PORTFOLIO_STATUS: &str = "ACTIVE";

/// Portfolio type constants
pub mod portfolio_types {
    pub const ENTERPRISE: &str = "ENTERPRISE";
    pub const DEPARTMENT: &str = "DEPARTMENT";
    pub const PROJECT: &str = "PROJECT";
    pub const RESEARCH: &str = "RESEARCH";
}

/// Portfolio status constants
pub mod portfolio_statuses {
    pub const ACTIVE: &str = "ACTIVE";
    pub const UNDER_REVIEW: &str = "UNDER_REVIEW";
    pub const DEPRECATED: &str = "DEPRECATED";
    pub const ARCHIVED: &str = "ARCHIVED";
}

/// Returns true if the given portfolio type is valid.
pub fn is_valid_portfolio_type(portfolio_type: &str) -> bool {
    matches!(
        portfolio_type,
        portfolio_types::ENTERPRISE
            | portfolio_types::DEPARTMENT
            | portfolio_types::PROJECT
            | portfolio_types::RESEARCH
    )
}

/// Returns true if the given portfolio status is valid.
pub fn is_valid_portfolio_status(status: &str) -> bool {
    matches!(
        status,
        portfolio_statuses::ACTIVE
            | portfolio_statuses::UNDER_REVIEW
            | portfolio_statuses::DEPRECATED
            | portfolio_statuses::ARCHIVED
    )
}
