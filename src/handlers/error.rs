// src/handlers/error.rs
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;

use crate::services::valuation::ValuationError;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn export_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ValuationError> for ApiError {
    fn from(err: ValuationError) -> Self {
        match err {
            ValuationError::InvalidInput(_) => ApiError::invalid_input(err.to_string()),
            ValuationError::Export(_) => ApiError::export_error(err.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
