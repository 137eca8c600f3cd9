use mongodb::bson::{
    DateTime,
    oid::ObjectId,
    serde_helpers::{bson_datetime_as_rfc3339_string, serialize_object_id_as_hex_string},
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Comment {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub movie_id: ObjectId,
    pub text: String,
    #[serde(serialize_with = "bson_datetime_as_rfc3339_string::serialize")]
    pub date: DateTime,
}
