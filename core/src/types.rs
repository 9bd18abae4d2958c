//! Response envelope returned by paginated collection endpoints.
//!
//! # Design
//! Navigation URLs are optional: servers send `null` for `prev`/`next` at
//! the ends of the range and for disabled entries in `meta.links`, and
//! `from`/`to` are `null` for an empty page.

use serde::{Deserialize, Serialize};

/// One page of items plus navigation and pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Vec<T>,
    pub links: ApiResponseLinks,
    pub meta: ApiResponseMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponseLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// A numbered or prev/next entry of the pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponseMetaLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponseMeta {
    pub current_page: u64,
    pub from: Option<u64>,
    pub last_page: u64,
    #[serde(default)]
    pub links: Vec<ApiResponseMetaLink>,
    pub path: String,
    pub per_page: u64,
    pub to: Option<u64>,
    pub total: u64,
}

impl ApiResponseMeta {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.last_page
    }
}
