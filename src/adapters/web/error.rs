//! HTTP error responses for the web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::FincrossError;

use super::templates::ErrorTemplate;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<FincrossError> for WebError {
    fn from(err: FincrossError) -> Self {
        let status = match &err {
            FincrossError::NoData { .. } => StatusCode::NOT_FOUND,
            FincrossError::DuplicateDate { .. } | FincrossError::EmptySeries => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            FincrossError::ConfigParse { .. }
            | FincrossError::ConfigMissing { .. }
            | FincrossError::ConfigInvalid { .. } => StatusCode::BAD_REQUEST,
            FincrossError::Fetch { .. } | FincrossError::RateLimited { .. } => {
                StatusCode::BAD_GATEWAY
            }
            FincrossError::Database { .. }
            | FincrossError::DatabaseQuery { .. }
            | FincrossError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let template = ErrorTemplate {
            message: self.message.clone(),
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_maps_to_not_found() {
        let err = WebError::from(FincrossError::NoData {
            symbol: "ZZZZ".into(),
        });
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.message.contains("ZZZZ"));
    }

    #[test]
    fn empty_series_maps_to_unprocessable() {
        let err = WebError::from(FincrossError::EmptySeries);
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn fetch_failure_maps_to_bad_gateway() {
        let err = WebError::from(FincrossError::Fetch {
            symbol: "AAPL".into(),
            reason: "timed out".into(),
        });
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }
}
