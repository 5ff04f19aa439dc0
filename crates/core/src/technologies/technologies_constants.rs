/// Technology maturity level constants
pub mod maturity_levels {
    pub const EMERGING: &str = "EMERGING";
    pub const GROWTH: &str = "GROWTH";
    pub const MATURE: &str = "MATURE";
    pub const DECLINING: &str = "DECLINING";
    pub const LEGACY: &str = "LEGACY";
}

/// Technology risk level constants
pub mod risk_levels {
    pub const LOW: &str = "LOW";
    pub const MEDIUM: &str = "MEDIUM";
    pub const HIGH: &str = "HIGH";
    pub const CRITICAL: &str = "CRITICAL";
}

/// Returns true if the given maturity level is valid.
pub fn is_valid_maturity_level(level: &str) -> bool {
    matches!(
        level,
        maturity_levels::EMERGING
            | maturity_levels::GROWTH
            | maturity_levels::MATURE
            | maturity_levels::DECLINING
            | maturity_levels::LEGACY
    )
}

/// Returns true if the given risk level is valid.
pub fn is_valid_risk_level(level: &str) -> bool {
    matches!(
        level,
        risk_levels::LOW | risk_levels::MEDIUM | risk_levels::HIGH | risk_levels::CRITICAL
    )
}
