pub mod add_fields_stage;
pub mod bucket_stage;
pub mod builder;
pub mod count_stage;
pub mod facet_stage;
pub mod lookup_stage;
pub mod match_stage;
pub mod page_stage;
pub mod sort_stage;
pub mod traits;
