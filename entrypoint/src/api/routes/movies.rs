use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use common::search_params::ApiMoviesInput;
use metrics::{put_latency, put_metric};
use mongodb_connector::stages::{page_stage::PageWindow, sort_stage::SortKey};
use tokio::time::Instant;
use tracing::debug;

use crate::{ServerState, routes::error_message_erasure::ApiError};

pub(crate) async fn movies_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(params), _): WithRejection<Query<ApiMoviesInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let start_time = Instant::now();

    put_metric!(metrics::Metrics::CatalogRequest, 1, "operation" => "movies");

    let window = PageWindow::new(params.page().into(), params.per_page().into())?;
    let sort = params.sort_by.as_ref().map(|field| SortKey::Field {
        field: field.clone(),
        direction: params.direction,
    });

    let page = state
        .catalog
        .get_movies(&params.filter(), window, sort, &state.shutdown.child_token())
        .await?;

    put_metric!(metrics::Metrics::MoviesReturned, page.movies.len() as u64);

    debug!(
        "Movies page {} of {} results, request time: {}ms",
        params.page(),
        page.total_results,
        start_time.elapsed().as_millis()
    );

    put_latency!("movies", start_time);

    Ok(Json(page))
}
