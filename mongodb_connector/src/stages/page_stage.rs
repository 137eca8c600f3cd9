use common::search_params::DEFAULT_MOVIES_PER_PAGE;
use mongodb::bson::{Document, doc};

use crate::errors::CatalogError;

use super::traits::StageDocument;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipStage {
    count: i64,
}

impl SkipStage {
    pub(crate) fn new(count: i64) -> Self {
        Self { count }
    }

    pub fn count(&self) -> u64 {
        self.count as u64
    }
}

impl StageDocument for SkipStage {
    fn get_stage_document(&self) -> Document {
        doc! {
            "$skip": self.count
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitStage {
    count: i64,
}

impl LimitStage {
    pub(crate) fn new(count: i64) -> Self {
        Self { count }
    }

    pub fn count(&self) -> u64 {
        self.count as u64
    }
}

impl StageDocument for LimitStage {
    fn get_stage_document(&self) -> Document {
        doc! {
            "$limit": self.count
        }
    }
}

/// Zero based page of `page_size` documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u64,
    page_size: u64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_MOVIES_PER_PAGE as u64,
        }
    }
}

impl PageWindow {
    pub fn new(page: u64, page_size: u64) -> Result<Self, CatalogError> {
        if page_size == 0 {
            return Err(CatalogError::InvalidArguments(
                "page size must be positive".into(),
            ));
        }

        // skip and limit travel as signed 64 bit integers
        let fits = page
            .checked_mul(page_size)
            .is_some_and(|skip| i64::try_from(skip).is_ok());

        if !fits {
            return Err(CatalogError::InvalidArguments(format!(
                "page {page} of size {page_size} is out of range"
            )));
        }

        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(self.page_size)
    }
}
