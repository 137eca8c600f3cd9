use mongodb::bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string};
use serde::{Deserialize, Serialize};

use crate::catalog::comment::Comment;

/// One side of the `tomatoes` rating block, either critics or viewers.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub num_reviews: i64,
    /// 0-100 score, this is what the rating histogram groups on
    #[serde(default)]
    pub meter: Option<i32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Ratings {
    #[serde(default)]
    pub viewer: Option<Review>,
    #[serde(default)]
    pub critic: Option<Review>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Movie {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tomatoes: Option<Ratings>,
    // only present on text searches, the store's relevance score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    // only attached on single movie lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

/// A page of movies plus the size of the whole filtered set.
#[derive(Serialize, Debug, Default)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub total_results: u64,
}
