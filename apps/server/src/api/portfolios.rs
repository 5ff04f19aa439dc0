use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::{error::ApiError, error::ApiResult, main_lib::AppState};
use techfolio_core::portfolios::{NewPortfolio, Portfolio, PortfolioFilters, PortfolioUpdate};
use techfolio_core::summary::PortfolioSummary;

async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    Json(new_portfolio): Json<NewPortfolio>,
) -> ApiResult<(StatusCode, Json<Portfolio>)> {
    let created = state.portfolio_service.create_portfolio(new_portfolio).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Portfolio>> {
    let portfolio = state
        .portfolio_service
        .get_portfolio(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("portfolio"))?;
    Ok(Json(portfolio))
}

/// Collection listing returns derived summaries, recomputed per request.
async fn list_portfolios(
    Query(filters): Query<PortfolioFilters>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PortfolioSummary>>> {
    let summaries = state.summary_service.list_summaries(&filters).await?;
    Ok(Json(summaries))
}

async fn update_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut update): Json<PortfolioUpdate>,
) -> ApiResult<Json<Portfolio>> {
    update.id = Some(id);
    let updated = state.portfolio_service.update_portfolio(update).await?;
    Ok(Json(updated))
}

async fn delete_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.portfolio_service.delete_portfolio(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_summary(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioSummary>> {
    let summary = state
        .summary_service
        .get_summary(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("portfolio"))?;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolios", get(list_portfolios).post(create_portfolio))
        .route(
            "/portfolios/{id}",
            get(get_portfolio)
                .put(update_portfolio)
                .delete(delete_portfolio),
        )
        .route("/portfolios/{id}/summary", get(get_summary))
}
