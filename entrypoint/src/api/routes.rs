pub(crate) mod countries;
pub(crate) mod error_message_erasure;
pub(crate) mod facet_search;
pub(crate) mod movie;
pub(crate) mod movies;
