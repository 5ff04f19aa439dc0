use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use techfolio_core::events::{EventDispatcher, HttpEventDispatcher, NoopEventDispatcher};
use techfolio_core::portfolios::{PortfolioService, PortfolioServiceTrait};
use techfolio_core::stream::{StreamConfig, SummaryStreamService};
use techfolio_core::summary::{SummaryService, SummaryServiceTrait};
use techfolio_core::technologies::{TechnologyService, TechnologyServiceTrait};
use techfolio_storage_sqlite::db::{self, spawn_writer};
use techfolio_storage_sqlite::portfolios::PortfolioRepository;
use techfolio_storage_sqlite::technologies::TechnologyRepository;

pub struct AppState {
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub technology_service: Arc<dyn TechnologyServiceTrait>,
    pub summary_service: Arc<dyn SummaryServiceTrait>,
    pub stream_service: SummaryStreamService,
    pub api_token: Option<String>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("TF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer(pool.clone())?;

    let portfolio_repository = Arc::new(PortfolioRepository::new(pool.clone(), writer.clone()));
    let technology_repository = Arc::new(TechnologyRepository::new(pool.clone(), writer.clone()));

    // Dispatch is best-effort: without a configured sink, events are dropped.
    let dispatcher: Arc<dyn EventDispatcher> = match &config.event_sink_url {
        Some(url) => {
            tracing::info!("Publishing change events to {}", url);
            Arc::new(HttpEventDispatcher::new(
                url.clone(),
                config.event_sink_timeout,
            ))
        }
        None => Arc::new(NoopEventDispatcher),
    };

    let portfolio_service: Arc<dyn PortfolioServiceTrait> = Arc::new(PortfolioService::new(
        portfolio_repository.clone(),
        dispatcher.clone(),
    ));
    let technology_service: Arc<dyn TechnologyServiceTrait> = Arc::new(TechnologyService::new(
        technology_repository.clone(),
        portfolio_repository.clone(),
        dispatcher,
    ));
    let summary_service: Arc<dyn SummaryServiceTrait> = Arc::new(SummaryService::new(
        portfolio_repository,
        technology_repository,
    ));

    let stream_service = SummaryStreamService::new(
        summary_service.clone(),
        StreamConfig {
            tick_interval: config.stream_tick,
            ..Default::default()
        },
    );

    Ok(Arc::new(AppState {
        portfolio_service,
        technology_service,
        summary_service,
        stream_service,
        api_token: config.api_token.clone(),
        db_path,
    }))
}
