pub mod comment;
pub mod facet;
pub mod movie;
