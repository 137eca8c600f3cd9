use async_trait::async_trait;
use mongodb::{Cursor, Database, bson::Document};
use tracing::{debug, trace};

use crate::{errors::StoreError, stages::traits::Pipeline};

use super::{DocumentStore, FindQuery};

/// `DocumentStore` over a MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    // mongodb structs are already Arc, thread safe
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    async fn collect(mut cursor: Cursor<Document>) -> Result<Vec<Document>, StoreError> {
        let mut documents: Vec<Document> = Vec::new();

        while cursor.advance().await? {
            documents.push(cursor.deserialize_current()?);
        }

        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(
        &self,
        collection: &str,
        query: &FindQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let documents = self.database.collection::<Document>(collection);

        let mut find = documents.find(query.filter_document()).skip(query.skip());

        if let Some(projection) = query.projection_document() {
            find = find.projection(projection);
        }

        if let Some(sort) = query.sort_document() {
            find = find.sort(sort);
        }

        if let Some(limit) = query.limit() {
            find = find.limit(limit as i64);
        }

        debug!("Find on {collection}: {:?}", query.filter_document());

        let cursor = find.await?;

        Self::collect(cursor).await
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>, StoreError> {
        let documents = pipeline.get_stage_documents();

        trace!("Aggregate on {collection}: {:#?}", documents);

        let cursor = self
            .database
            .collection::<Document>(collection)
            .aggregate(documents)
            .await?;

        Self::collect(cursor).await
    }
}
