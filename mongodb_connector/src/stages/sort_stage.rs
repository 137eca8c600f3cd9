use common::search_params::SortDirection;
use mongodb::bson::{Document, doc};

use crate::constants::{FIELD_SCORE, FIELD_VIEWER_REVIEWS};

use super::traits::StageDocument;

/// Total order over the input. Ties keep the store's natural order, which
/// is not guaranteed to be stable between calls.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Field {
        field: String,
        direction: SortDirection,
    },
    /// Descending text relevance, only valid after a text match.
    TextScore,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::descending(FIELD_VIEWER_REVIEWS)
    }
}

impl SortKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        SortKey::Field {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        SortKey::Field {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    pub(crate) fn sort_document(&self) -> Document {
        match self {
            SortKey::Field { field, direction } => {
                let mut document = Document::new();
                document.insert(field, direction.as_i32());
                document
            }
            SortKey::TextScore => doc! {
                FIELD_SCORE: {
                    "$meta": "textScore"
                }
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortStage {
    key: SortKey,
}

impl SortStage {
    pub(crate) fn new(key: SortKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &SortKey {
        &self.key
    }
}

impl StageDocument for SortStage {
    fn get_stage_document(&self) -> Document {
        doc! {
            "$sort": self.key.sort_document()
        }
    }
}
