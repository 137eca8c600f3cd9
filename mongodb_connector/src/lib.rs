pub mod catalog;
pub mod config;
pub mod connector;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod stages;
pub mod store;
