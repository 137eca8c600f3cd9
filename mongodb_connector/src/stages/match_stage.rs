use mongodb::bson::{Bson, Document, doc};

use super::traits::StageDocument;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every document.
    Any,
    Equals(Bson),
    /// Set membership. Array fields match when any element is in the set.
    /// An empty set matches every document.
    In(Vec<Bson>),
    /// Free text search terms, scored by relevance.
    Text(Vec<String>),
}

impl Predicate {
    pub fn in_strings(values: &[String]) -> Self {
        Predicate::In(values.iter().cloned().map(Bson::String).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchStage {
    field: String,
    predicate: Predicate,
}

impl MatchStage {
    pub(crate) fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            field: field.into(),
            predicate,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The bare filter, shared by `$match` and plain finds.
    pub fn filter_document(&self) -> Document {
        let mut filter = Document::new();

        match &self.predicate {
            Predicate::Any => {}
            Predicate::In(values) if values.is_empty() => {}
            Predicate::Equals(value) => {
                filter.insert(&self.field, value.clone());
            }
            Predicate::In(values) => {
                filter.insert(&self.field, doc! { "$in": values.clone() });
            }
            Predicate::Text(terms) => {
                filter.insert(
                    "$text",
                    doc! {
                        "$search": terms.join(" ")
                    },
                );
            }
        }

        filter
    }
}

impl StageDocument for MatchStage {
    fn get_stage_document(&self) -> Document {
        doc! {
            "$match": self.filter_document()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_filter() {
        let stage = MatchStage::new("cast", Predicate::in_strings(&["Tom Hanks".to_string()]));

        assert_eq!(
            stage.get_stage_document(),
            doc! { "$match": { "cast": { "$in": ["Tom Hanks"] } } }
        );
    }

    #[test]
    fn test_empty_set_matches_everything() {
        let stage = MatchStage::new("genres", Predicate::In(vec![]));

        assert_eq!(stage.filter_document(), doc! {});
        assert_eq!(MatchStage::new("_id", Predicate::Any).filter_document(), doc! {});
    }

    #[test]
    fn test_text_filter_ignores_field() {
        let stage = MatchStage::new(
            "$text",
            Predicate::Text(vec!["space".to_string(), "odyssey".to_string()]),
        );

        assert_eq!(
            stage.filter_document(),
            doc! { "$text": { "$search": "space odyssey" } }
        );
    }
}
