use mongodb::bson::Document;
use tracing::trace;

use super::{
    add_fields_stage::AddFieldsStage,
    bucket_stage::BucketStage,
    count_stage::CountStage,
    facet_stage::FacetStage,
    lookup_stage::LookupStage,
    match_stage::MatchStage,
    page_stage::{LimitStage, SkipStage},
    sort_stage::SortStage,
};

pub trait StageDocument {
    fn get_stage_document(&self) -> Document;
}

/// One aggregation step. Stages carry their parameters and say nothing
/// about where they sit in a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(MatchStage),
    Sort(SortStage),
    Skip(SkipStage),
    Limit(LimitStage),
    Bucket(BucketStage),
    Facet(FacetStage),
    Count(CountStage),
    Lookup(LookupStage),
    AddFields(AddFieldsStage),
}

impl StageDocument for Stage {
    fn get_stage_document(&self) -> Document {
        match self {
            Stage::Match(stage) => stage.get_stage_document(),
            Stage::Sort(stage) => stage.get_stage_document(),
            Stage::Skip(stage) => stage.get_stage_document(),
            Stage::Limit(stage) => stage.get_stage_document(),
            Stage::Bucket(stage) => stage.get_stage_document(),
            Stage::Facet(stage) => stage.get_stage_document(),
            Stage::Count(stage) => stage.get_stage_document(),
            Stage::Lookup(stage) => stage.get_stage_document(),
            Stage::AddFields(stage) => stage.get_stage_document(),
        }
    }
}

macro_rules! impl_into_stage {
    ($($variant:ident => $stage:ty),* $(,)?) => {
        $(
            impl From<$stage> for Stage {
                fn from(stage: $stage) -> Self {
                    Stage::$variant(stage)
                }
            }
        )*
    };
}

impl_into_stage!(
    Match => MatchStage,
    Sort => SortStage,
    Skip => SkipStage,
    Limit => LimitStage,
    Bucket => BucketStage,
    Facet => FacetStage,
    Count => CountStage,
    Lookup => LookupStage,
    AddFields => AddFieldsStage,
);

/// Ordered stages, each one feeding the next.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn push(&mut self, stage: impl Into<Stage>) {
        self.stages.push(stage.into());
    }

    pub fn with_stage(mut self, stage: impl Into<Stage>) -> Self {
        self.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get_stage_documents(&self) -> Vec<Document> {
        let documents = self
            .stages
            .iter()
            .map(StageDocument::get_stage_document)
            .collect::<Vec<Document>>();

        trace!("Documents: {:#?}", documents);

        documents
    }
}

impl From<Vec<Stage>> for Pipeline {
    fn from(stages: Vec<Stage>) -> Self {
        Self { stages }
    }
}
