use crate::{
    constants::{DEFAULT_BUCKET_KEY, FACET_MOVIES_PER_PAGE, RATING_BOUNDARIES, RUNTIME_BOUNDARIES},
    errors::CatalogError,
    stages::bucket_stage::validate_boundaries,
};

/// Boundary tables and page size used by the faceted search.
///
/// Passed explicitly into the facet pipeline so tests and tenants can swap
/// the tables. Validated every time a pipeline is built.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetConfig {
    pub runtime_boundaries: Vec<i64>,
    pub rating_boundaries: Vec<i64>,
    pub default_bucket: String,
    pub movies_per_page: u64,
}

impl Default for FacetConfig {
    fn default() -> Self {
        Self {
            runtime_boundaries: RUNTIME_BOUNDARIES.to_vec(),
            rating_boundaries: RATING_BOUNDARIES.to_vec(),
            default_bucket: DEFAULT_BUCKET_KEY.to_string(),
            movies_per_page: FACET_MOVIES_PER_PAGE,
        }
    }
}

impl FacetConfig {
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_boundaries(&self.runtime_boundaries)?;
        validate_boundaries(&self.rating_boundaries)?;

        if self.default_bucket.is_empty() {
            return Err(CatalogError::Configuration(
                "default bucket key is empty".into(),
            ));
        }

        if self.movies_per_page == 0 {
            return Err(CatalogError::Configuration(
                "facet page size must be positive".into(),
            ));
        }

        Ok(())
    }
}
