mod model;
mod repository;

pub use model::{NewPortfolioDB, PortfolioDB};
pub use repository::PortfolioRepository;
