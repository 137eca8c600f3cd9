use std::{env, sync::LazyLock};

use mongodb::{
    Client, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use tracing::{info, warn};

use crate::{
    catalog::MoviesCatalog,
    config::FacetConfig,
    constants::{
        COLLECTION_COMMENTS_NAME, COLLECTION_MOVIES_NAME, COLLECTION_MOVIES_SEARCH_INDEX,
        DEFAULT_DATABASE_NAME,
    },
    errors::CatalogError,
    store::mongo::MongoStore,
};

static CONNECTION_URI: LazyLock<String> = LazyLock::new(|| {
    let host = env::var("MONGO_DB_HOST").unwrap_or("localhost".into());
    let port = env::var("MONGO_DB_PORT").unwrap_or("27017".into());
    let user = env::var("MONGO_DB_USER").unwrap_or("root".into());
    let password = env::var("MONGO_DB_PASSWORD").unwrap_or("root".into());

    format!("mongodb://{user}:{password}@{host}:{port}")
});

pub fn default_database_name() -> String {
    env::var("MONGO_DB_NAME").unwrap_or(DEFAULT_DATABASE_NAME.into())
}

pub struct MongoDBConnector;

impl MongoDBConnector {
    pub async fn connect(
        database_name: &str,
        facet_config: FacetConfig,
    ) -> Result<MoviesCatalog<MongoStore>, CatalogError> {
        let client = Client::with_uri_str(CONNECTION_URI.as_str()).await?;
        let db = client.database(database_name);

        Self::create_indexes(&db).await;

        info!("Connected to catalog database {database_name}");

        MoviesCatalog::with_facet_config(MongoStore::new(db), facet_config)
    }

    // both indexes may already exist under other names, which is fine
    async fn create_indexes(db: &Database) {
        let search_index = IndexModel::builder()
            .keys(doc! {
                "title": "text",
                "genres": "text",
                "cast": "text",
                "plot": "text",
            })
            .options(
                IndexOptions::builder()
                    .name(COLLECTION_MOVIES_SEARCH_INDEX.to_string())
                    .build(),
            )
            .build();

        if let Err(err) = db
            .collection::<Document>(COLLECTION_MOVIES_NAME)
            .create_index(search_index)
            .await
        {
            warn!("Keeping existing text index on {COLLECTION_MOVIES_NAME}: {err}");
        }

        let comments_index = IndexModel::builder()
            .keys(doc! {
                "movie_id": 1,
            })
            .build();

        if let Err(err) = db
            .collection::<Document>(COLLECTION_COMMENTS_NAME)
            .create_index(comments_index)
            .await
        {
            warn!("Failed to index {COLLECTION_COMMENTS_NAME} by movie: {err}");
        }
    }
}
