//! Validating constructors for every stage kind.
//!
//! Builders only check their own inputs. Ordering is the caller's job.

use common::search_params::SortDirection;

use crate::errors::CatalogError;

use super::{
    add_fields_stage::AddFieldsStage,
    bucket_stage::{BucketStage, validate_boundaries},
    count_stage::CountStage,
    facet_stage::{Facet, FacetStage},
    lookup_stage::LookupStage,
    match_stage::{MatchStage, Predicate},
    page_stage::{LimitStage, SkipStage},
    sort_stage::{SortKey, SortStage},
};

fn require_field(kind: &str, field: &str) -> Result<(), CatalogError> {
    if field.is_empty() {
        return Err(CatalogError::Configuration(format!(
            "{kind} stage needs a field name"
        )));
    }

    Ok(())
}

fn to_stage_count(kind: &str, count: u64) -> Result<i64, CatalogError> {
    i64::try_from(count)
        .map_err(|_| CatalogError::Configuration(format!("{kind} of {count} is out of range")))
}

pub fn build_match(field: &str, predicate: Predicate) -> Result<MatchStage, CatalogError> {
    require_field("match", field)?;

    Ok(MatchStage::new(field, predicate))
}

pub fn build_sort(field: &str, direction: SortDirection) -> Result<SortStage, CatalogError> {
    require_field("sort", field)?;

    Ok(SortStage::new(SortKey::Field {
        field: field.to_string(),
        direction,
    }))
}

pub fn build_sort_by_key(key: SortKey) -> Result<SortStage, CatalogError> {
    match key {
        SortKey::Field { field, direction } => build_sort(&field, direction),
        SortKey::TextScore => Ok(SortStage::new(SortKey::TextScore)),
    }
}

/// `$skip: 0` is accepted and leaves the input untouched.
pub fn build_skip(count: u64) -> Result<SkipStage, CatalogError> {
    Ok(SkipStage::new(to_stage_count("skip", count)?))
}

/// The store rejects `$limit: 0`, so it is refused here instead of meaning "unbounded".
pub fn build_limit(count: u64) -> Result<LimitStage, CatalogError> {
    if count == 0 {
        return Err(CatalogError::Configuration(
            "limit must be positive".into(),
        ));
    }

    Ok(LimitStage::new(to_stage_count("limit", count)?))
}

pub fn build_bucket(
    group_by: &str,
    boundaries: &[i64],
    default_key: &str,
    output_field: &str,
) -> Result<BucketStage, CatalogError> {
    require_field("bucket", group_by)?;
    require_field("bucket output", output_field)?;
    validate_boundaries(boundaries)?;

    Ok(BucketStage::new(
        group_by,
        boundaries.to_vec(),
        default_key,
        output_field,
    ))
}

pub fn build_count(output_field: &str) -> Result<CountStage, CatalogError> {
    require_field("count", output_field)?;

    // $count refuses names starting with `$` or containing `.`
    if output_field.starts_with('$') || output_field.contains('.') {
        return Err(CatalogError::Configuration(format!(
            "invalid count field {output_field:?}"
        )));
    }

    Ok(CountStage::new(output_field))
}

pub fn build_lookup(
    from: &str,
    local_field: &str,
    foreign_field: &str,
    sort: Option<SortKey>,
    as_field: &str,
) -> Result<LookupStage, CatalogError> {
    require_field("lookup collection", from)?;
    require_field("lookup local", local_field)?;
    require_field("lookup foreign", foreign_field)?;
    require_field("lookup output", as_field)?;

    Ok(LookupStage::new(
        from,
        local_field,
        foreign_field,
        sort,
        as_field,
    ))
}

pub fn build_facet(facets: Vec<Facet>) -> Result<FacetStage, CatalogError> {
    if facets.is_empty() {
        return Err(CatalogError::Configuration(
            "facet stage needs at least one facet".into(),
        ));
    }

    for facet in &facets {
        require_field("facet", facet.name())?;
    }

    Ok(FacetStage::new(facets))
}

pub fn build_add_fields(target: &str, source: &str) -> Result<AddFieldsStage, CatalogError> {
    require_field("add fields target", target)?;
    require_field("add fields source", source)?;

    Ok(AddFieldsStage::new(target, source))
}
