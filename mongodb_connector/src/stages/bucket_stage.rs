use mongodb::bson::{Document, doc};

use crate::errors::CatalogError;

use super::traits::StageDocument;

/// Histogram over half-open intervals `[b_i, b_i+1)`, with one default
/// bucket for absent values and values outside `[first, last)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStage {
    group_by: String,
    boundaries: Vec<i64>,
    default_key: String,
    output_field: String,
}

impl BucketStage {
    pub(crate) fn new(
        group_by: impl Into<String>,
        boundaries: Vec<i64>,
        default_key: impl Into<String>,
        output_field: impl Into<String>,
    ) -> Self {
        Self {
            group_by: group_by.into(),
            boundaries,
            default_key: default_key.into(),
            output_field: output_field.into(),
        }
    }

    pub fn group_by(&self) -> &str {
        &self.group_by
    }

    pub fn boundaries(&self) -> &[i64] {
        &self.boundaries
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn output_field(&self) -> &str {
        &self.output_field
    }

    /// Lower boundary of the bucket `value` lands in, `None` for the default bucket.
    pub fn bucket_for(&self, value: Option<f64>) -> Option<i64> {
        bucket_for(&self.boundaries, value)
    }
}

impl StageDocument for BucketStage {
    fn get_stage_document(&self) -> Document {
        let mut output = Document::new();
        output.insert(&self.output_field, doc! { "$sum": 1 });

        doc! {
            "$bucket": {
                "groupBy": format!("${}", self.group_by),
                "boundaries": self.boundaries.clone(),
                "default": self.default_key.as_str(),
                "output": output,
            }
        }
    }
}

pub fn validate_boundaries(boundaries: &[i64]) -> Result<(), CatalogError> {
    if boundaries.len() < 2 {
        return Err(CatalogError::Configuration(format!(
            "bucket boundaries need at least 2 entries, got {}",
            boundaries.len()
        )));
    }

    if boundaries.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(CatalogError::Configuration(format!(
            "bucket boundaries are not strictly ascending: {boundaries:?}"
        )));
    }

    Ok(())
}

pub fn bucket_for(boundaries: &[i64], value: Option<f64>) -> Option<i64> {
    let value = value?;

    boundaries
        .windows(2)
        .find(|pair| value >= pair[0] as f64 && value < pair[1] as f64)
        .map(|pair| pair[0])
}
