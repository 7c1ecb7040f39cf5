// src/handlers/valuation.rs
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::{PeerRow, Valuation};
use crate::services::charts::{build_charts, DashboardCharts};
use crate::services::valuation::value_company;
use super::error::ApiError;
use super::query::ValuationQuery;

#[derive(Serialize)]
struct ValuationResponse {
    #[serde(flatten)]
    valuation: Valuation,
    recommendation_label: &'static str,
}

#[derive(Serialize)]
struct DashboardResponse {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    charts: DashboardCharts,
}

/// Runs the valuation pipeline for one request.
pub fn run_valuation(query: &ValuationQuery, peers: &[PeerRow]) -> Result<Valuation, ApiError> {
    let inputs = query.to_inputs().map_err(|e| {
        error!("Rejected valuation inputs {:?}: {}", query, e);
        ApiError::from(e)
    })?;
    let valuation = value_company(&inputs, peers).map_err(|e| {
        error!("Valuation failed: {}", e);
        ApiError::from(e)
    })?;
    debug!("Valuation result: {:?}", valuation);
    Ok(valuation)
}

pub async fn get_valuation(query: ValuationQuery, peers: Arc<Vec<PeerRow>>) -> Result<Json, Rejection> {
    info!("Handling request to value company: {:?}", query);

    let valuation = run_valuation(&query, &peers).map_err(warp::reject::custom)?;
    let recommendation_label = valuation.blended.recommendation.label();
    info!(
        "Blended value {:.2} -> {}",
        valuation.blended.blended_value, recommendation_label
    );

    Ok(warp::reply::json(&ValuationResponse {
        valuation,
        recommendation_label,
    }))
}

pub async fn get_dashboard(query: ValuationQuery, peers: Arc<Vec<PeerRow>>) -> Result<Json, Rejection> {
    info!("Handling request to build dashboard: {:?}", query);

    let valuation = run_valuation(&query, &peers).map_err(warp::reject::custom)?;
    let charts = build_charts(&valuation, &peers);

    Ok(warp::reply::json(&DashboardResponse {
        generated_at: Utc::now(),
        charts,
    }))
}

pub async fn get_peers(peers: Arc<Vec<PeerRow>>) -> Result<Json, Rejection> {
    info!("Handling request to list {} peers", peers.len());
    Ok(warp::reply::json(&*peers))
}
