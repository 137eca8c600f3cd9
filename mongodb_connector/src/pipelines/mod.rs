pub mod count_pipeline;
pub mod facet_pipeline;
pub mod query;
