use mongodb::bson::{Bson, Document};

use super::traits::{Pipeline, StageDocument};

/// Named sub-pipeline of a `$facet`.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    name: String,
    pipeline: Pipeline,
}

impl Facet {
    pub fn new(name: impl Into<String>, pipeline: impl Into<Pipeline>) -> Self {
        Self {
            name: name.into(),
            pipeline: pipeline.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

/// Runs every facet over the same input batch and emits a single document
/// holding one array per facet.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetStage {
    facets: Vec<Facet>,
}

impl FacetStage {
    pub(crate) fn new(facets: Vec<Facet>) -> Self {
        Self { facets }
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }
}

impl StageDocument for FacetStage {
    fn get_stage_document(&self) -> Document {
        let mut facets = Document::new();

        for facet in &self.facets {
            let stages = facet
                .pipeline
                .get_stage_documents()
                .into_iter()
                .map(Bson::Document)
                .collect::<Vec<Bson>>();

            facets.insert(&facet.name, stages);
        }

        let mut document = Document::new();
        document.insert("$facet", facets);
        document
    }
}
