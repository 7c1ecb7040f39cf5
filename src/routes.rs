// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;
use log::info;
use warp::http::StatusCode;
use warp::reject::{InvalidQuery, Rejection};
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::export::{get_excel_report, get_pdf_report};
use crate::handlers::query::ValuationQuery;
use crate::handlers::valuation::{get_dashboard, get_peers, get_valuation};
use crate::models::PeerRow;

// Every error becomes a JSON body with the matching status code
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(invalid) = err.find::<InvalidQuery>() {
        code = StatusCode::BAD_REQUEST;
        message = invalid.to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(peers: Arc<Vec<PeerRow>>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let peers_filter = warp::any().map(move || peers.clone());
    let inputs = warp::query::<ValuationQuery>();

    let valuation_route = warp::path!("api" / "v1" / "valuation")
        .and(warp::get())
        .and(inputs.clone())
        .and(peers_filter.clone())
        .and_then(get_valuation);

    let dashboard_route = warp::path!("api" / "v1" / "dashboard")
        .and(warp::get())
        .and(inputs.clone())
        .and(peers_filter.clone())
        .and_then(get_dashboard);

    let peers_route = warp::path!("api" / "v1" / "peers")
        .and(warp::get())
        .and(peers_filter.clone())
        .and_then(get_peers);

    let excel_route = warp::path!("api" / "v1" / "export" / "xlsx")
        .and(warp::get())
        .and(inputs.clone())
        .and(peers_filter.clone())
        .and_then(get_excel_report);

    let pdf_route = warp::path!("api" / "v1" / "export" / "pdf")
        .and(warp::get())
        .and(inputs)
        .and(peers_filter)
        .and_then(get_pdf_report);

    info!("All routes configured successfully.");

    valuation_route
        .or(dashboard_route)
        .or(peers_route)
        .or(excel_route)
        .or(pdf_route)
        .recover(handle_rejection)
}
