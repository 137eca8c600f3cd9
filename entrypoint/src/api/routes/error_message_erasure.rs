use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::put_metric;
use mongodb_connector::errors::CatalogError;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error(transparent)]
    QueryExtractorRejection(#[from] QueryRejection),
    #[error(transparent)]
    PathExtractorRejection(#[from] PathRejection),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::QueryExtractorRejection(_) | Self::PathExtractorRejection(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Catalog(CatalogError::InvalidArguments(_)) => StatusCode::BAD_REQUEST,
            Self::Catalog(CatalogError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Catalog(CatalogError::Configuration(_) | CatalogError::Store(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// only the status leaves the server, details stay in the logs
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::QueryExtractorRejection(rejection) => {
                debug!("Failed to parse incoming query: {}", rejection.body_text());
            }
            Self::PathExtractorRejection(rejection) => {
                debug!("Failed to parse incoming path: {}", rejection.body_text());
            }
            Self::Catalog(CatalogError::Cancelled) => {
                put_metric!(metrics::Metrics::CatalogCancelled, 1);
                debug!("Request cancelled before the catalog answered");
            }
            Self::Catalog(err @ CatalogError::Store(_)) => {
                put_metric!(metrics::Metrics::CatalogStoreFailure, 1);
                error!("Catalog store failure: {err}");
            }
            Self::Catalog(err) => {
                debug!("Rejected catalog request with {status}: {err}");
            }
        }

        status.into_response()
    }
}
