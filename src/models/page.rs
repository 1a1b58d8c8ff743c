//! `from`/`size` pagination

use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Raw pagination query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Index of the first element wanted (default: 0)
    pub from: Option<i64>,
    /// Page size (default: 10)
    pub size: Option<i64>,
}

/// Validated page window.
///
/// `from` is rounded down to the start of its page, so `from=5&size=2`
/// returns elements 4 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    from: i64,
    size: i64,
}

impl PageRequest {
    pub fn new(from: i64, size: i64) -> AppResult<Self> {
        if from < 0 {
            return Err(AppError::Validation("from must not be negative".to_string()));
        }
        if size <= 0 {
            return Err(AppError::Validation("size must be positive".to_string()));
        }
        Ok(Self { from, size })
    }

    pub fn from(&self) -> i64 {
        self.from
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.from / self.size) * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { from: 0, size: DEFAULT_PAGE_SIZE }
    }
}

impl TryFrom<&PageQuery> for PageRequest {
    type Error = AppError;

    fn try_from(query: &PageQuery) -> AppResult<Self> {
        PageRequest::new(query.from.unwrap_or(0), query.size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}
