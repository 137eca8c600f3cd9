use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use common::search_params::ApiCountriesInput;
use metrics::{put_latency, put_metric};
use tokio::time::Instant;
use tracing::debug;

use crate::{ServerState, routes::error_message_erasure::ApiError};

pub(crate) async fn countries_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(params), _): WithRejection<Query<ApiCountriesInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let start_time = Instant::now();

    put_metric!(metrics::Metrics::CatalogRequest, 1, "operation" => "countries");

    let movies = state
        .catalog
        .list_movies_by_country(&params.countries, &state.shutdown.child_token())
        .await?;

    put_metric!(metrics::Metrics::MoviesReturned, movies.len() as u64);

    debug!(
        "{} movies from {:?}, request time: {}ms",
        movies.len(),
        params.countries,
        start_time.elapsed().as_millis()
    );

    put_latency!("countries", start_time);

    Ok(Json(movies))
}
