use mongodb::bson::{Document, doc};

use super::{sort_stage::SortKey, traits::StageDocument};

const LOOKUP_VARIABLE: &str = "lookup_key";

/// Left outer join: attaches every `from` document whose `foreign_field`
/// equals this document's `local_field`, as an array under `as_field`.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupStage {
    from: String,
    local_field: String,
    foreign_field: String,
    sort: Option<SortKey>,
    as_field: String,
}

impl LookupStage {
    pub(crate) fn new(
        from: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        sort: Option<SortKey>,
        as_field: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            sort,
            as_field: as_field.into(),
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn local_field(&self) -> &str {
        &self.local_field
    }

    pub fn foreign_field(&self) -> &str {
        &self.foreign_field
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    pub fn as_field(&self) -> &str {
        &self.as_field
    }
}

impl StageDocument for LookupStage {
    fn get_stage_document(&self) -> Document {
        let mut pipeline = vec![doc! {
            "$match": {
                "$expr": {
                    "$eq": [format!("${}", self.foreign_field), format!("$${LOOKUP_VARIABLE}")]
                }
            }
        }];

        if let Some(sort) = &self.sort {
            pipeline.push(doc! {
                "$sort": sort.sort_document()
            });
        }

        let mut variables = Document::new();
        variables.insert(LOOKUP_VARIABLE, format!("${}", self.local_field));

        doc! {
            "$lookup": {
                "from": self.from.as_str(),
                "let": variables,
                "pipeline": pipeline,
                "as": self.as_field.as_str(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_document() {
        let stage = LookupStage::new(
            "comments",
            "_id",
            "movie_id",
            Some(SortKey::descending("date")),
            "comments",
        );

        assert_eq!(
            stage.get_stage_document(),
            doc! {
                "$lookup": {
                    "from": "comments",
                    "let": { "lookup_key": "$_id" },
                    "pipeline": [
                        { "$match": { "$expr": { "$eq": ["$movie_id", "$$lookup_key"] } } },
                        { "$sort": { "date": -1 } },
                    ],
                    "as": "comments",
                }
            }
        );
    }
}
