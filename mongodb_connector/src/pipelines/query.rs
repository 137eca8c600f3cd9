use crate::{
    errors::CatalogError,
    stages::{
        builder::{build_limit, build_match, build_skip, build_sort_by_key},
        match_stage::{MatchStage, Predicate},
        page_stage::PageWindow,
        sort_stage::SortKey,
        traits::{Pipeline, Stage},
    },
};

/// Filter and ordering shared by every pipeline of one request, so the
/// page, the histograms and the count all describe the same set.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPredicate {
    filter: MatchStage,
    sort: SortKey,
}

impl QueryPredicate {
    pub fn new(field: &str, predicate: Predicate, sort: SortKey) -> Result<Self, CatalogError> {
        // validate the sort up front, pipelines rebuild it from the key
        build_sort_by_key(sort.clone())?;

        Ok(Self {
            filter: build_match(field, predicate)?,
            sort,
        })
    }

    pub fn filter(&self) -> &MatchStage {
        &self.filter
    }

    pub fn sort(&self) -> &SortKey {
        &self.sort
    }

    pub(crate) fn get_stages(&self) -> Result<Vec<Stage>, CatalogError> {
        Ok(vec![
            self.filter.clone().into(),
            build_sort_by_key(self.sort.clone())?.into(),
        ])
    }
}

/// `match -> sort -> skip -> limit`
#[derive(Debug, Clone, PartialEq)]
pub struct PagedQuery {
    pub predicate: QueryPredicate,
    pub window: PageWindow,
}

impl PagedQuery {
    pub fn new(predicate: QueryPredicate, window: PageWindow) -> Self {
        Self { predicate, window }
    }

    pub fn get_pipeline(&self) -> Result<Pipeline, CatalogError> {
        let mut stages = self.predicate.get_stages()?;

        stages.push(build_skip(self.window.skip())?.into());
        stages.push(build_limit(self.window.page_size())?.into());

        Ok(Pipeline::from(stages))
    }

    /// Reads a query back out of the four leading stages it produced.
    pub fn from_stages(stages: &[Stage]) -> Option<Self> {
        let [
            Stage::Match(filter),
            Stage::Sort(sort),
            Stage::Skip(skip),
            Stage::Limit(limit),
            ..,
        ] = stages
        else {
            return None;
        };

        let page_size = limit.count();

        if skip.count() % page_size != 0 {
            return None;
        }

        let window = PageWindow::new(skip.count() / page_size, page_size).ok()?;

        Some(Self {
            predicate: QueryPredicate {
                filter: filter.clone(),
                sort: sort.key().clone(),
            },
            window,
        })
    }
}
