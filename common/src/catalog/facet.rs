use serde::{Deserialize, Serialize};

use crate::catalog::movie::Movie;

/// `_id` of a histogram bucket: the inclusive lower boundary of its interval,
/// or the default key for values outside every interval.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum BucketKey {
    Boundary(i64),
    Other(String),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BucketCount {
    #[serde(rename = "_id")]
    pub key: BucketKey,
    pub count: u64,
}

/// Result of a faceted cast search.
///
/// `runtime` and `rating` are computed over the returned page of `movies`
/// only, while `count` is the size of the whole matching set.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct FacetResult {
    #[serde(default)]
    pub runtime: Vec<BucketCount>,
    #[serde(default)]
    pub rating: Vec<BucketCount>,
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub count: u64,
}

impl FacetResult {
    pub fn runtime_total(&self) -> u64 {
        self.runtime.iter().map(|bucket| bucket.count).sum()
    }

    pub fn rating_total(&self) -> u64 {
        self.rating.iter().map(|bucket| bucket.count).sum()
    }
}
