pub mod catalog;
pub mod deserialize_disallow_empty_string;
pub mod search_params;
