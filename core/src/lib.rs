//! Data layer for the admin application.
//!
//! # Overview
//! A generic, caching CRUD client for paginated REST resources, the request
//! parameter codec it uses, application configuration, and the dual n-back
//! type contracts.
//!
//! # Design
//! - `ResourceClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`, so the I/O boundary is explicit.
//! - `Transport` performs the round-trip; `ReqwestTransport` is the network
//!   implementation and tests substitute scripted ones.
//! - `ResourceService` ties both to a `ResourceCache` of versioned `watch`
//!   channels and implements `ApiService`.
//! - A resource is any serde type implementing `Resource`, which names the
//!   endpoint path and the primary-key field.

pub mod cache;
pub mod client;
pub mod config;
pub mod dual_n_back;
pub mod error;
pub mod http;
pub mod params;
pub mod resource;
pub mod service;
pub mod transport;
pub mod types;

pub use cache::{ResourceCache, Versioned};
pub use client::ResourceClient;
pub use config::{AppConfig, Config, Scheme};
pub use error::{ConfigError, ResourceError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{ApiRequestFilter, ApiRequestParams};
pub use resource::{PrimaryKey, Resource};
pub use service::{ApiService, ResourceService};
pub use transport::{ReqwestTransport, Transport};
pub use types::{ApiResponse, ApiResponseLinks, ApiResponseMeta, ApiResponseMetaLink};
