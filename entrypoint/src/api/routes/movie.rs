use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use metrics::{put_latency, put_metric};
use tokio::time::Instant;
use tracing::debug;

use crate::{ServerState, routes::error_message_erasure::ApiError};

pub(crate) async fn movie_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Response, ApiError> {
    let start_time = Instant::now();

    put_metric!(metrics::Metrics::CatalogRequest, 1, "operation" => "movie");

    let Some(movie) = state
        .catalog
        .get_movie(&id, &state.shutdown.child_token())
        .await?
    else {
        debug!("No movie for {id:?}");
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    put_latency!("movie", start_time);

    Ok(Json(movie).into_response())
}
