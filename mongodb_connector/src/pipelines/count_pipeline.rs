use common::catalog::facet::FacetResult;
use mongodb::bson::{Document, from_document};
use serde::Deserialize;

use crate::{
    constants::FIELD_COUNT,
    errors::{CatalogError, StoreError},
    stages::{builder::build_count, traits::Pipeline},
};

use super::query::QueryPredicate;

#[derive(Debug, Deserialize)]
pub(crate) struct Count {
    pub(crate) count: u64,
}

/// `match -> sort -> count`
///
/// Reuses the exact match and sort of the facet pipeline. The sort does not
/// change the count, it is kept so both pipelines stay identical up to
/// pagination. The two pipelines are separate round trips without a shared
/// snapshot, so under concurrent writes the count can disagree with the page.
pub struct CountPipeline<'a> {
    query: &'a QueryPredicate,
}

impl<'a> CountPipeline<'a> {
    pub fn new(query: &'a QueryPredicate) -> Self {
        Self { query }
    }

    pub fn get_pipeline(&self) -> Result<Pipeline, CatalogError> {
        let mut stages = self.query.get_stages()?;
        stages.push(build_count(FIELD_COUNT)?.into());

        Ok(Pipeline::from(stages))
    }

    /// `$count` emits nothing for an empty input, which means zero.
    pub(crate) fn read_count(documents: Vec<Document>) -> Result<u64, StoreError> {
        let Some(document) = documents.into_iter().next() else {
            return Ok(0);
        };

        Ok(from_document::<Count>(document)?.count)
    }
}

/// Attaches the store wide count to a page-scoped facet result.
pub fn reconcile(mut facets: FacetResult, count: u64) -> FacetResult {
    facets.count = count;
    facets
}
