//! Request parameter codec.
//!
//! Maps a filter/pagination/sort descriptor onto query-string pairs. Absent
//! values are omitted entirely; escaping is left to the transport.

use serde::{Deserialize, Serialize};

/// A single field/value equality filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequestFilter {
    pub field: String,
    pub value: String,
}

impl ApiRequestFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Pagination, search, sort and filter options for a collection fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequestParams {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<ApiRequestFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl ApiRequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(ApiRequestFilter::new(field, value));
        self
    }

    /// Encode as query pairs: `offset`, `limit`, `search`, `order` when
    /// present, then one pair per filter in list order.
    ///
    /// Filter keys are not deduplicated against the named parameters; a
    /// filter on `order` yields a second `order` pair.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(4 + self.filters.len());

        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        for filter in &self.filters {
            pairs.push((filter.field.clone(), filter.value.clone()));
        }

        pairs
    }
}
