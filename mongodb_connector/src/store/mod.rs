use async_trait::async_trait;
use mongodb::bson::{Document, doc};

use crate::{
    constants::FIELD_SCORE,
    errors::StoreError,
    pipelines::query::QueryPredicate,
    stages::{
        match_stage::MatchStage,
        page_stage::PageWindow,
        sort_stage::SortKey,
        traits::Pipeline,
    },
};

#[cfg(test)]
pub(crate) mod memory;
pub mod mongo;

/// The handful of store primitives the catalog is built on.
///
/// Implementations must be cheap to share between concurrent requests.
/// Dropping a returned future abandons the request.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, query: &FindQuery)
    -> Result<Vec<Document>, StoreError>;

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>, StoreError>;
}

/// A plain find with its cursor options.
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    filter: MatchStage,
    projection: Vec<String>,
    sort: Option<SortKey>,
    skip: u64,
    limit: Option<u64>,
}

impl FindQuery {
    pub fn new(filter: MatchStage) -> Self {
        Self {
            filter,
            projection: Vec::new(),
            sort: None,
            skip: 0,
            limit: None,
        }
    }

    /// A find over the same filter and ordering as the aggregations built
    /// from `predicate`.
    pub fn from_predicate(predicate: &QueryPredicate) -> Self {
        Self::new(predicate.filter().clone()).with_sort(predicate.sort().clone())
    }

    pub fn with_projection(mut self, fields: &[&str]) -> Self {
        self.projection = fields.iter().map(|field| field.to_string()).collect();
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_window(mut self, window: &PageWindow) -> Self {
        self.skip = window.skip();
        self.limit = Some(window.page_size());
        self
    }

    pub fn filter(&self) -> &MatchStage {
        &self.filter
    }

    pub fn projection(&self) -> &[String] {
        &self.projection
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn filter_document(&self) -> Document {
        self.filter.filter_document()
    }

    /// Sorting on relevance also projects it, so callers can read `score`.
    pub fn projection_document(&self) -> Option<Document> {
        let mut projection = Document::new();

        for field in &self.projection {
            projection.insert(field, 1);
        }

        if let Some(SortKey::TextScore) = self.sort {
            projection.insert(FIELD_SCORE, doc! { "$meta": "textScore" });
        }

        if projection.is_empty() {
            return None;
        }

        Some(projection)
    }

    pub fn sort_document(&self) -> Option<Document> {
        self.sort.as_ref().map(SortKey::sort_document)
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::Bson;

    use crate::stages::match_stage::Predicate;

    use super::*;

    #[test]
    fn test_text_query_projects_score() {
        let query = FindQuery::new(MatchStage::new(
            "$text",
            Predicate::Text(vec!["heat".to_string()]),
        ))
        .with_sort(SortKey::TextScore)
        .with_window(&PageWindow::new(2, 10).unwrap());

        assert_eq!(
            query.projection_document(),
            Some(doc! { "score": { "$meta": "textScore" } })
        );
        assert_eq!(
            query.sort_document(),
            Some(doc! { "score": { "$meta": "textScore" } })
        );
        assert_eq!(query.skip(), 20);
        assert_eq!(query.limit(), Some(10));
    }

    #[test]
    fn test_projection_and_plain_sort() {
        let query = FindQuery::new(MatchStage::new(
            "countries",
            Predicate::In(vec![Bson::String("Italy".into())]),
        ))
        .with_projection(&["title"])
        .with_sort(SortKey::descending("title"));

        assert_eq!(query.projection_document(), Some(doc! { "title": 1 }));
        assert_eq!(query.sort_document(), Some(doc! { "title": -1 }));
        assert_eq!(query.limit(), None);
    }

    #[test]
    fn test_find_follows_predicate() {
        let predicate = QueryPredicate::new(
            "genres",
            Predicate::in_strings(&["Drama".to_string()]),
            SortKey::default(),
        )
        .unwrap();

        let query = FindQuery::from_predicate(&predicate);

        assert_eq!(query.filter(), predicate.filter());
        assert_eq!(query.sort(), Some(predicate.sort()));
        assert_eq!(
            query.sort_document(),
            Some(doc! { "tomatoes.viewer.numReviews": -1 })
        );
    }

    #[test]
    fn test_no_projection_by_default() {
        let query = FindQuery::new(MatchStage::new("_id", Predicate::Any));

        assert_eq!(query.projection_document(), None);
        assert_eq!(query.sort_document(), None);
    }
}
