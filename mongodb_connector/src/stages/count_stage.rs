use mongodb::bson::{Document, doc};

use super::traits::StageDocument;

/// Collapses the input into one `{output_field: n}` record. Yields nothing
/// at all when the input is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CountStage {
    output_field: String,
}

impl CountStage {
    pub(crate) fn new(output_field: impl Into<String>) -> Self {
        Self {
            output_field: output_field.into(),
        }
    }

    pub fn output_field(&self) -> &str {
        &self.output_field
    }
}

impl StageDocument for CountStage {
    fn get_stage_document(&self) -> Document {
        doc! {
            "$count": self.output_field.as_str()
        }
    }
}
