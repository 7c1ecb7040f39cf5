// src/handlers/export.rs
use log::{error, info};
use std::sync::Arc;
use warp::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use warp::http::Response;
use warp::Rejection;

use crate::models::PeerRow;
use crate::services::report::{
    render_document, render_spreadsheet, DOCUMENT_FILE_NAME, SPREADSHEET_FILE_NAME,
};
use super::error::ApiError;
use super::query::ValuationQuery;
use super::valuation::run_valuation;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PDF_MIME: &str = "application/pdf";

fn attachment(bytes: Vec<u8>, mime: &str, file_name: &str) -> Result<Response<Vec<u8>>, Rejection> {
    Response::builder()
        .header(CONTENT_TYPE, mime)
        .header(CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name))
        .body(bytes)
        .map_err(|e| {
            error!("Failed to build download response: {}", e);
            warp::reject::custom(ApiError::export_error(e.to_string()))
        })
}

pub async fn get_excel_report(query: ValuationQuery, peers: Arc<Vec<PeerRow>>) -> Result<Response<Vec<u8>>, Rejection> {
    info!("Handling request to export Excel report");

    let valuation = run_valuation(&query, &peers).map_err(warp::reject::custom)?;
    let bytes = render_spreadsheet(&valuation.summary(), &peers)
        .map_err(|e| warp::reject::custom(ApiError::from(e)))?;

    attachment(bytes, XLSX_MIME, SPREADSHEET_FILE_NAME)
}

pub async fn get_pdf_report(query: ValuationQuery, peers: Arc<Vec<PeerRow>>) -> Result<Response<Vec<u8>>, Rejection> {
    info!("Handling request to export PDF report");

    let valuation = run_valuation(&query, &peers).map_err(warp::reject::custom)?;
    let label = valuation.blended.recommendation.label();
    let bytes = render_document(&valuation.summary(), label)
        .map_err(|e| warp::reject::custom(ApiError::from(e)))?;

    attachment(bytes, PDF_MIME, DOCUMENT_FILE_NAME)
}
