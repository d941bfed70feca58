use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use crate::lookup::LookupService;
use crate::model::{Athlete, Country, Sport};
use crate::server::extract::{JsonBody, QueryParams};
use crate::server::{ApiError, AppState};
use crate::submission::AthleteSubmission;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct AthleteParams {
    pub id: i64,
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn list_athletes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Athlete>>, ApiError> {
    let athletes = state
        .with_store(|store| LookupService::new(store.reader()).athletes())
        .await?;
    Ok(Json(athletes))
}

pub async fn get_athlete(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<AthleteParams>,
) -> Result<Json<Athlete>, ApiError> {
    let athlete = state
        .with_store(move |store| LookupService::new(store.reader()).athlete(params.id))
        .await?;
    Ok(Json(athlete))
}

pub async fn list_countries(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Country>>, ApiError> {
    let countries = state
        .with_store(|store| LookupService::new(store.reader()).countries())
        .await?;
    Ok(Json(countries))
}

pub async fn list_sports(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Sport>>, ApiError> {
    let sports = state
        .with_store(|store| LookupService::new(store.reader()).sports())
        .await?;
    Ok(Json(sports))
}

pub async fn save_athlete(
    State(state): State<Arc<AppState>>,
    JsonBody(submission): JsonBody<AthleteSubmission>,
) -> Result<Json<Athlete>, ApiError> {
    let saved = state
        .with_store(move |store| store.save_athlete(&submission))
        .await?;
    tracing::info!("Saved athlete {} ({} results)", saved.id, saved.results.len());
    Ok(Json(saved))
}

/// Body is a bare athlete id, e.g. `42`
pub async fn delete_athlete(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<StatusCode, ApiError> {
    let id = parse_athlete_id(&body)?;
    state.with_store(move |store| store.delete_athlete(id)).await?;
    tracing::info!("Deleted athlete {}", id);
    Ok(StatusCode::OK)
}

fn parse_athlete_id(body: &str) -> Result<i64, ApiError> {
    body.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("expected a numeric athlete id, got '{}'", body.trim())))
}
