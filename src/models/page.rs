//! Paged history models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::Config;

/// One page of results.
///
/// Accepts both the Spring page shape (`pageable`, `number`, `first`, `last`) and
/// the portal's own shape (`page`, `hasNext`, `hasPrevious`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub pageable: Option<PageableInfo>,
    /// 0-based
    #[serde(default, alias = "number")]
    pub page: Option<usize>,
    pub total_elements: u64,
    pub total_pages: usize,
    #[serde(default)]
    pub first: Option<bool>,
    #[serde(default)]
    pub last: Option<bool>,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub has_previous: Option<bool>,
    #[serde(default)]
    pub number_of_elements: usize,
    #[serde(default)]
    pub empty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageableInfo {
    pub page_number: usize,
    pub page_size: usize,
    #[serde(default)]
    pub offset: u64,
}

impl<T> PagedResult<T> {
    /// `hasNext` when sent, else `!last`, else worked out from the page counters.
    pub fn has_next(&self) -> bool {
        self.has_next
            .or(self.last.map(|last| !last))
            .unwrap_or_else(|| self.page_number(0) + 1 < self.total_pages)
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
            .or(self.first.map(|first| !first))
            .unwrap_or_else(|| self.page_number(0) > 0)
    }

    /// 0-based page number reported by the backend, or `requested` when it sent none.
    pub fn page_number(&self, requested: usize) -> usize {
        self.page
            .or_else(|| self.pageable.as_ref().map(|p| p.page_number))
            .unwrap_or(requested)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("ASC"),
            SortDirection::Desc => f.write_str("DESC"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}', use ASC or DESC", other)),
        }
    }
}

/// Query parameters for `GET /topup/history`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub page: usize,
    pub size: usize,
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

impl HistoryQuery {
    pub const DEFAULT_SORT_FIELD: &'static str = "createdAt";

    /// First page, newest first, with the configured default size.
    pub fn first_page(config: &Config) -> Self {
        Self {
            page: 0,
            size: config.default_page_size,
            sort_field: Self::DEFAULT_SORT_FIELD.to_string(),
            sort_direction: SortDirection::Desc,
        }
    }

    /// Clamp the page size into `1..=max_page_size` and fill an empty sort field.
    pub fn normalized(mut self, config: &Config) -> Self {
        self.size = self.size.clamp(1, config.max_page_size.max(1));
        if self.sort_field.trim().is_empty() {
            self.sort_field = Self::DEFAULT_SORT_FIELD.to_string();
        }
        self
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sortField", self.sort_field.clone()),
            ("sortDirection", self.sort_direction.to_string()),
        ]
    }
}
