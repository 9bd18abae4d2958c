//! Stateless HTTP request builder and response parser for one resource.
//!
//! # Design
//! `ResourceClient` holds only the resource's base URL and carries no
//! mutable state between calls. Each CRUD operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Caching lives one layer up in
//! `ResourceService`.

use std::marker::PhantomData;

use crate::error::{ResourceError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, CONTENT_TYPE_JSON};
use crate::params::ApiRequestParams;
use crate::resource::{PrimaryKey, Resource};
use crate::types::ApiResponse;

/// Request builder and response parser for resource `R`.
///
/// Collection URLs end in `/`, item reads use `{base}/{pk}` and item writes
/// use `{base}/{pk}/`.
#[derive(Debug)]
pub struct ResourceClient<R> {
    base_url: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    /// Bind to `{api_url}/{R::RESOURCE_PATH}`.
    pub fn new(api_url: &str) -> Self {
        let api_url = api_url.trim_end_matches('/');
        let path = R::RESOURCE_PATH.trim_matches('/');
        Self {
            base_url: format!("{api_url}/{path}"),
            _resource: PhantomData,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_items(&self, params: &ApiRequestParams) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/", self.base_url), params.to_query_pairs(), None)
    }

    pub fn build_get_by_pk(&self, pk: &PrimaryKey) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/{pk}", self.base_url), Vec::new(), None)
    }

    pub fn build_create_item(&self, data: &R) -> Result<HttpRequest> {
        let body = serialize(data)?;
        Ok(self.request(HttpMethod::Post, format!("{}/", self.base_url), Vec::new(), Some(body)))
    }

    pub fn build_update_item(&self, pk: &PrimaryKey, data: &R) -> Result<HttpRequest> {
        let body = serialize(data)?;
        Ok(self.request(HttpMethod::Put, format!("{}/{pk}/", self.base_url), Vec::new(), Some(body)))
    }

    pub fn build_delete_item(&self, pk: &PrimaryKey) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{}/{pk}/", self.base_url), Vec::new(), None)
    }

    pub fn parse_get_items(&self, response: HttpResponse) -> Result<ApiResponse<R>> {
        check_status(&response)?;
        deserialize(&response.body)
    }

    /// An empty or `null` body counts as "no such item".
    pub fn parse_get_by_pk(&self, pk: &PrimaryKey, response: HttpResponse) -> Result<R> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Err(ResourceError::NotFound { pk: pk.clone() });
        }
        let item: Option<R> = deserialize(&response.body)?;
        item.ok_or_else(|| ResourceError::NotFound { pk: pk.clone() })
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<R> {
        check_status(&response)?;
        deserialize(&response.body)
    }

    pub fn parse_update_item(&self, response: HttpResponse) -> Result<R> {
        check_status(&response)?;
        deserialize(&response.body)
    }

    /// The server's delete confirmation. A bodiless success counts as `true`.
    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<bool> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(true);
        }
        deserialize(&response.body)
    }

    fn request(
        &self,
        method: HttpMethod,
        path: String,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> HttpRequest {
        HttpRequest {
            method,
            path,
            query,
            headers: vec![(CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string())],
            body,
        }
    }
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ResourceError::Serialization(e.to_string()))
}

fn deserialize<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ResourceError::Deserialization(e.to_string()))
}

/// Map any non-2xx status to `ResourceError::Http`.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let body = response.body.trim();
    let message = if body.is_empty() {
        "Http failure response".to_string()
    } else {
        body.to_string()
    };
    Err(ResourceError::Http {
        status: response.status,
        message,
    })
}
