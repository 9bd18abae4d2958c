//! Observable item and collection caches.
//!
//! # Design
//! Each cache is a `watch` channel holding a `Versioned` value. Every publish
//! bumps the cache's version, so a caller that remembers the version it saw
//! before an await can tell whether another write landed in between.
//! Mutations go through `send_modify` / `send_if_modified`, which apply to
//! the latest value under the channel's lock.

use tokio::sync::watch;

/// A cached value plus the number of times the cache has been published.
///
/// `value` is `None` until the first publish.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<V> {
    pub version: u64,
    pub value: Option<V>,
}

impl<V> Versioned<V> {
    fn empty() -> Self {
        Self {
            version: 0,
            value: None,
        }
    }

    fn publish(&mut self, value: V) -> u64 {
        self.value = Some(value);
        self.version += 1;
        self.version
    }
}

/// The current item and current collection for one resource type.
#[derive(Debug)]
pub struct ResourceCache<T> {
    item: watch::Sender<Versioned<T>>,
    items: watch::Sender<Versioned<Vec<T>>>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResourceCache<T> {
    pub fn new() -> Self {
        Self {
            item: watch::Sender::new(Versioned::empty()),
            items: watch::Sender::new(Versioned::empty()),
        }
    }

    pub fn subscribe_item(&self) -> watch::Receiver<Versioned<T>> {
        self.item.subscribe()
    }

    pub fn subscribe_items(&self) -> watch::Receiver<Versioned<Vec<T>>> {
        self.items.subscribe()
    }

    pub fn item_version(&self) -> u64 {
        self.item.borrow().version
    }

    pub fn items_version(&self) -> u64 {
        self.items.borrow().version
    }

    /// Replace the whole collection. Returns the new version.
    pub fn replace_items(&self, items: Vec<T>) -> u64 {
        let mut version = 0;
        self.items.send_modify(|state| version = state.publish(items));
        version
    }

    /// Replace the current item. Returns the new version.
    pub fn set_item(&self, item: T) -> u64 {
        let mut version = 0;
        self.item.send_modify(|state| version = state.publish(item));
        version
    }

    /// Insert `item` at the front of the collection. A collection that was
    /// never loaded starts out empty.
    pub fn prepend_item(&self, item: T) -> u64 {
        let mut version = 0;
        self.items.send_modify(|state| {
            let mut items = state.value.take().unwrap_or_default();
            items.insert(0, item);
            version = state.publish(items);
        });
        version
    }

    /// Replace the first element matching `pred` in place.
    ///
    /// Returns the new version, or `None` (and publishes nothing) when no
    /// element matches.
    pub fn replace_first(&self, pred: impl Fn(&T) -> bool, item: T) -> Option<u64> {
        let mut version = None;
        self.items.send_if_modified(|state| {
            let Some(items) = state.value.as_mut() else {
                return false;
            };
            let Some(slot) = items.iter_mut().find(|existing| pred(existing)) else {
                return false;
            };
            *slot = item;
            state.version += 1;
            version = Some(state.version);
            true
        });
        version
    }

    /// Remove the first element matching `pred` and republish, whether or
    /// not anything matched. Returns the removed element and the version
    /// after the call.
    ///
    /// A collection that was never loaded stays unloaded and nothing is
    /// published.
    pub fn remove_first(&self, pred: impl Fn(&T) -> bool) -> (Option<T>, u64) {
        let mut removed = None;
        let mut version = 0;
        self.items.send_if_modified(|state| {
            version = state.version;
            let Some(items) = state.value.as_mut() else {
                return false;
            };
            if let Some(index) = items.iter().position(|existing| pred(existing)) {
                removed = Some(items.remove(index));
            }
            state.version += 1;
            version = state.version;
            true
        });
        (removed, version)
    }

    /// Replace the current item only when it satisfies `pred`.
    pub fn replace_item_if(&self, pred: impl Fn(&T) -> bool, item: T) -> bool {
        self.item.send_if_modified(|state| {
            if !state.value.as_ref().is_some_and(|current| pred(current)) {
                return false;
            }
            state.publish(item);
            true
        })
    }
}

impl<T: Clone> ResourceCache<T> {
    pub fn item_snapshot(&self) -> Versioned<T> {
        self.item.borrow().clone()
    }

    pub fn items_snapshot(&self) -> Versioned<Vec<T>> {
        self.items.borrow().clone()
    }

    /// First element of the latest collection matching `pred`.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.items
            .borrow()
            .value
            .as_ref()
            .and_then(|items| items.iter().find(|item| pred(item)).cloned())
    }
}
