use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use crate::{error::ApiError, error::ApiResult, main_lib::AppState};
use techfolio_core::technologies::{NewTechnology, Technology, TechnologyUpdate};

async fn create_technology(
    Path(portfolio_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(new_technology): Json<NewTechnology>,
) -> ApiResult<(StatusCode, Json<Technology>)> {
    let created = state
        .technology_service
        .create_technology(&portfolio_id, new_technology)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_technologies(
    Path(portfolio_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Technology>>> {
    let technologies = state
        .technology_service
        .list_technologies(&portfolio_id)
        .await?;
    Ok(Json(technologies))
}

async fn get_technology(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Technology>> {
    let technology = state
        .technology_service
        .get_technology(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("technology"))?;
    Ok(Json(technology))
}

async fn update_technology(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut update): Json<TechnologyUpdate>,
) -> ApiResult<Json<Technology>> {
    update.id = Some(id);
    let updated = state.technology_service.update_technology(update).await?;
    Ok(Json(updated))
}

async fn delete_technology(
    Path((portfolio_id, tech_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    // The technology must belong to the portfolio named in the path.
    let technology = state
        .technology_service
        .get_technology(&tech_id)
        .await?
        .filter(|t| t.portfolio_id == portfolio_id)
        .ok_or_else(|| ApiError::not_found("technology"))?;

    state
        .technology_service
        .delete_technology(&technology.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/portfolios/{id}/technologies",
            get(list_technologies).post(create_technology),
        )
        .route(
            "/portfolios/{id}/technologies/{techId}",
            delete(delete_technology),
        )
        .route(
            "/technologies/{id}",
            get(get_technology).put(update_technology),
        )
}
