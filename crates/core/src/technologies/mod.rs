//! Technologies module - domain models, services, and traits.

mod technologies_constants;
mod technologies_model;
mod technologies_service;
mod technologies_traits;

// Re-export the public interface
pub use technologies_constants::*;
pub use technologies_model::{NewTechnology, Technology, TechnologyUpdate};
pub use technologies_service::TechnologyService;
pub use technologies_traits::{TechnologyRepositoryTrait, TechnologyServiceTrait};
