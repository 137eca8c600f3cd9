use std::sync::Arc;

use axum::{Router, routing::get};
use clap::Parser;
use mimalloc::MiMalloc;
use mongodb_connector::{
    catalog::MoviesCatalog,
    config::FacetConfig,
    connector::{MongoDBConnector, default_database_name},
    store::mongo::MongoStore,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    routes::{
        countries::countries_handler, facet_search::facet_search_handler, movie::movie_handler,
        movies::movies_handler,
    },
    service_layers::build_service_layers,
};

mod routes;
mod service_layers;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "api", about = "Read-only HTTP API over the movie catalog")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Database holding the movies and comments collections, falls back to MONGO_DB_NAME
    #[arg(long)]
    database: Option<String>,
}

pub(crate) struct ServerState {
    pub(crate) catalog: MoviesCatalog<MongoStore>,
    /// Parent of every request token, cancelled on shutdown
    pub(crate) shutdown: CancellationToken,
}

#[tokio::main]
async fn main() {
    let env_log = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()
        .expect("Failed to create tracing filter");

    let subscriber = FmtSubscriber::builder()
        .pretty()
        .compact()
        .with_file(false)
        .with_env_filter(env_log);

    tracing::subscriber::set_global_default(subscriber.finish())
        .expect("Failed to create log subscription");

    let args = Args::parse();
    let database = args.database.unwrap_or_else(default_database_name);

    let catalog = match MongoDBConnector::connect(&database, FacetConfig::default()).await {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("Failed to open catalog {database}: {err}");
            return;
        }
    };

    let shutdown = CancellationToken::new();

    let state = Arc::new(ServerState {
        catalog,
        shutdown: shutdown.clone(),
    });

    let app = Router::new()
        .route("/api/v1/movies", get(movies_handler))
        .route("/api/v1/movies/countries", get(countries_handler))
        .route("/api/v1/movies/facet-search", get(facet_search_handler))
        .route("/api/v1/movies/id/{id}", get(movie_handler))
        .layer(build_service_layers())
        .with_state(state);

    let address = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind API listener");

    info!("Serving catalog API on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("API server to not crash");

    if let Err(err) = metrics::shutdown() {
        error!("Failed to flush metrics: {err}");
    }
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
    }

    info!("Shutting down, cancelling in-flight catalog requests");

    shutdown.cancel();
}
