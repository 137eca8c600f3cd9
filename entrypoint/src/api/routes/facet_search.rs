use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use common::search_params::ApiFacetSearchInput;
use metrics::{put_latency, put_metric};
use tokio::time::Instant;
use tracing::debug;

use crate::{ServerState, routes::error_message_erasure::ApiError};

pub(crate) async fn facet_search_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(params), _): WithRejection<Query<ApiFacetSearchInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let start_time = Instant::now();

    put_metric!(metrics::Metrics::CatalogRequest, 1, "operation" => "facet-search");

    let facets = state
        .catalog
        .faceted_search_by_cast(
            &params.cast,
            params.page.unwrap_or(0).into(),
            &state.shutdown.child_token(),
        )
        .await?;

    put_metric!(metrics::Metrics::MoviesReturned, facets.movies.len() as u64);

    debug!("Request time: {}ms", start_time.elapsed().as_millis());

    put_latency!("facet-search", start_time);

    Ok(Json(facets))
}
