use mongodb::bson::Document;

use super::traits::StageDocument;

/// Copies `source` into `target` on every document, leaving the rest as is.
#[derive(Debug, Clone, PartialEq)]
pub struct AddFieldsStage {
    target: String,
    source: String,
}

impl AddFieldsStage {
    pub(crate) fn new(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: source.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl StageDocument for AddFieldsStage {
    fn get_stage_document(&self) -> Document {
        let mut fields = Document::new();
        fields.insert(&self.target, format!("${}", self.source));

        let mut document = Document::new();
        document.insert("$addFields", fields);
        document
    }
}
