mod model;
mod repository;

pub use model::{NewTechnologyDB, TechnologyDB};
pub use repository::TechnologyRepository;
