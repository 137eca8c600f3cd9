use common::catalog::facet::FacetResult;
use mongodb::bson::{Document, from_document};
use tracing::debug;

use crate::{
    config::FacetConfig,
    constants::{
        FACET_MOVIES, FACET_RATING, FACET_RUNTIME, FIELD_COUNT, FIELD_CRITIC_METER,
        FIELD_RUNTIME, FIELD_TITLE,
    },
    errors::{CatalogError, StoreError},
    stages::{
        builder::{build_add_fields, build_bucket, build_facet},
        facet_stage::Facet,
        page_stage::PageWindow,
        traits::Pipeline,
    },
};

use super::query::{PagedQuery, QueryPredicate};

/// `match -> sort -> skip -> limit -> facet{runtime, rating, movies}`
///
/// The facet runs after pagination, so both histograms only describe the
/// page of movies returned next to them.
pub struct FacetPipeline<'a> {
    query: &'a QueryPredicate,
    config: &'a FacetConfig,
    page: u64,
}

impl<'a> FacetPipeline<'a> {
    pub fn new(query: &'a QueryPredicate, config: &'a FacetConfig, page: u64) -> Self {
        Self {
            query,
            config,
            page,
        }
    }

    pub fn get_pipeline(&self) -> Result<Pipeline, CatalogError> {
        self.config.validate()?;

        let window = PageWindow::new(self.page, self.config.movies_per_page)
            .map_err(|err| CatalogError::Configuration(err.to_string()))?;

        let facets = build_facet(vec![
            Facet::new(
                FACET_RUNTIME,
                Pipeline::new().with_stage(build_bucket(
                    FIELD_RUNTIME,
                    &self.config.runtime_boundaries,
                    &self.config.default_bucket,
                    FIELD_COUNT,
                )?),
            ),
            Facet::new(
                FACET_RATING,
                Pipeline::new().with_stage(build_bucket(
                    FIELD_CRITIC_METER,
                    &self.config.rating_boundaries,
                    &self.config.default_bucket,
                    FIELD_COUNT,
                )?),
            ),
            Facet::new(
                FACET_MOVIES,
                Pipeline::new().with_stage(build_add_fields(FIELD_TITLE, FIELD_TITLE)?),
            ),
        ])?;

        let pipeline = PagedQuery::new(self.query.clone(), window)
            .get_pipeline()?
            .with_stage(facets);

        debug!(
            "Facet pipeline: skip {}, limit {}",
            window.skip(),
            window.page_size()
        );

        Ok(pipeline)
    }

    /// The facet stage always emits one document; an empty cursor is
    /// treated the same as three empty facets.
    pub(crate) fn read_facets(documents: Vec<Document>) -> Result<FacetResult, StoreError> {
        let Some(document) = documents.into_iter().next() else {
            return Ok(FacetResult::default());
        };

        Ok(from_document::<FacetResult>(document)?)
    }
}
