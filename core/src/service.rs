//! Caching CRUD service over one resource endpoint.
//!
//! # Design
//! `ResourceService` composes the stateless `ResourceClient`, a `Transport`
//! and a `ResourceCache`. Every operation is a single future that resolves
//! once. The cache is only touched after the remote call succeeded and the
//! response parsed; any earlier failure leaves both caches as they were.
//!
//! Writes that derive from the previous collection (create, update, delete)
//! are applied to the latest collection, not to the one observed when the
//! request was sent. When the collection version moved during the request,
//! the interleaving is logged and the last writer wins.

use std::future::Future;

use tokio::sync::watch;

use crate::cache::{ResourceCache, Versioned};
use crate::client::ResourceClient;
use crate::error::{ResourceError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::params::ApiRequestParams;
use crate::resource::{PrimaryKey, Resource};
use crate::transport::Transport;
use crate::types::ApiResponse;

/// CRUD operations plus the two observable caches for resource `T`.
pub trait ApiService<T> {
    /// Stream of the current item.
    fn item(&self) -> watch::Receiver<Versioned<T>>;

    /// Stream of the current collection.
    fn items(&self) -> watch::Receiver<Versioned<Vec<T>>>;

    /// Fetch one page and make its items the current collection.
    fn get_items(
        &self,
        params: &ApiRequestParams,
    ) -> impl Future<Output = Result<ApiResponse<T>>> + Send;

    /// Look `pk` up in the current collection without any I/O and select it.
    fn find_by_pk(&self, pk: PrimaryKey) -> Result<T>;

    /// Fetch one item from the server and select it.
    fn get_by_pk(&self, pk: PrimaryKey) -> impl Future<Output = Result<T>> + Send;

    /// Create an item and put it at the front of the current collection.
    fn create_item(&self, data: &T) -> impl Future<Output = Result<T>> + Send;

    /// Update an item and replace it in the current collection, and in the
    /// current item if that is the same one.
    fn update_item_by_pk(
        &self,
        pk: PrimaryKey,
        data: &T,
    ) -> impl Future<Output = Result<T>> + Send;

    /// Delete an item, drop it from the current collection and return the
    /// server's confirmation.
    fn delete_item_by_pk(&self, pk: PrimaryKey) -> impl Future<Output = Result<bool>> + Send;
}

pub struct ResourceService<R, X> {
    client: ResourceClient<R>,
    transport: X,
    cache: ResourceCache<R>,
}

impl<R: Resource, X: Transport> ResourceService<R, X> {
    pub fn new(api_url: &str, transport: X) -> Self {
        Self {
            client: ResourceClient::new(api_url),
            transport,
            cache: ResourceCache::new(),
        }
    }

    pub fn client(&self) -> &ResourceClient<R> {
        &self.client
    }

    pub fn cache(&self) -> &ResourceCache<R> {
        &self.cache
    }

    pub fn item_snapshot(&self) -> Versioned<R> {
        self.cache.item_snapshot()
    }

    pub fn items_snapshot(&self) -> Versioned<Vec<R>> {
        self.cache.items_snapshot()
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");
        let response = self
            .transport
            .execute(request)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "transport failure"))?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "request rejected");
        }
        Ok(response)
    }
}

/// Whether another publish landed between observing `observed` and applying
/// this write as `applied`. Logs when it did.
fn note_interleaving(operation: &'static str, observed: u64, applied: u64) -> bool {
    let interleaved = applied > observed.saturating_add(1);
    if interleaved {
        tracing::warn!(
            operation,
            observed,
            applied,
            "collection cache changed while request was in flight"
        );
    }
    interleaved
}

impl<R: Resource, X: Transport> ApiService<R> for ResourceService<R, X> {
    fn item(&self) -> watch::Receiver<Versioned<R>> {
        self.cache.subscribe_item()
    }

    fn items(&self) -> watch::Receiver<Versioned<Vec<R>>> {
        self.cache.subscribe_items()
    }

    #[tracing::instrument(skip_all, fields(resource = R::RESOURCE_PATH))]
    async fn get_items(&self, params: &ApiRequestParams) -> Result<ApiResponse<R>> {
        let request = self.client.build_get_items(params);
        let response = self.send(request).await?;
        let page = self.client.parse_get_items(response)?;

        let version = self.cache.replace_items(page.data.clone());
        tracing::debug!(count = page.data.len(), version, "collection replaced");
        Ok(page)
    }

    fn find_by_pk(&self, pk: PrimaryKey) -> Result<R> {
        let Some(item) = self.cache.find(|item| item.has_primary_key(&pk)) else {
            return Err(ResourceError::NotFound { pk });
        };
        self.cache.set_item(item.clone());
        Ok(item)
    }

    #[tracing::instrument(skip_all, fields(resource = R::RESOURCE_PATH, pk = %pk))]
    async fn get_by_pk(&self, pk: PrimaryKey) -> Result<R> {
        let request = self.client.build_get_by_pk(&pk);
        let response = self.send(request).await?;
        let item = self.client.parse_get_by_pk(&pk, response)?;

        self.cache.set_item(item.clone());
        Ok(item)
    }

    #[tracing::instrument(skip_all, fields(resource = R::RESOURCE_PATH))]
    async fn create_item(&self, data: &R) -> Result<R> {
        let observed = self.cache.items_version();
        let request = self.client.build_create_item(data)?;
        let response = self.send(request).await?;
        let created = self.client.parse_create_item(response)?;

        let applied = self.cache.prepend_item(created.clone());
        note_interleaving("create", observed, applied);
        Ok(created)
    }

    #[tracing::instrument(skip_all, fields(resource = R::RESOURCE_PATH, pk = %pk))]
    async fn update_item_by_pk(&self, pk: PrimaryKey, data: &R) -> Result<R> {
        let observed = self.cache.items_version();
        let request = self.client.build_update_item(&pk, data)?;
        let response = self.send(request).await?;
        let updated = self.client.parse_update_item(response)?;

        if self
            .cache
            .replace_item_if(|item| item.has_primary_key(&pk), updated.clone())
        {
            tracing::debug!("selected item refreshed");
        }

        let Some(applied) = self
            .cache
            .replace_first(|item| item.has_primary_key(&pk), updated.clone())
        else {
            tracing::warn!("updated item is missing from the cached collection");
            return Err(ResourceError::NotInCollection { pk });
        };
        note_interleaving("update", observed, applied);
        Ok(updated)
    }

    #[tracing::instrument(skip_all, fields(resource = R::RESOURCE_PATH, pk = %pk))]
    async fn delete_item_by_pk(&self, pk: PrimaryKey) -> Result<bool> {
        let observed = self.cache.items_version();
        let request = self.client.build_delete_item(&pk);
        let response = self.send(request).await?;
        let deleted = self.client.parse_delete_item(response)?;

        let (removed, applied) = self.cache.remove_first(|item| item.has_primary_key(&pk));
        note_interleaving("delete", observed, applied);
        tracing::debug!(deleted, removed = removed.is_some(), "delete applied");
        Ok(deleted)
    }
}
