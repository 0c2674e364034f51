//! # redfish-core
//!
//! Shared machinery for Redfish and Swordfish clients.
//!
//! Every resource kind in the Redfish/Swordfish schema is fetched, listed and
//! updated the same way. This crate provides that machinery once:
//!
//! ## Modules
//!
//! - [`error`] - Error types, HTTP status mapping and the per-link collection error
//! - [`config`] - Configuration structures for Redfish clients
//! - [`client`] - The [`ResourceClient`] capability and its HTTP implementation
//! - [`entity`] - Resource identity, client binding and the fetch-into primitive
//! - [`link`] - Wire shapes for links, link lists and collection documents
//! - [`collection`] - Concurrent, order-preserving collection resolution
//! - [`update`] - Snapshot capture and diff-based partial updates
//! - [`common`] - Small schema types shared by many resource kinds

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod collection;
pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod link;
pub mod update;

#[cfg(test)]
pub(crate) mod testing;

#[doc(hidden)]
pub mod __private {
    //! Dependencies used by exported macros.
    pub use serde_json;
}

// Re-export commonly used types
pub use client::{HttpClient, HttpClientBuilder, ResourceClient, Response, SharedClient};
pub use collection::{resolve_collection, CollectionResolver, Concurrency};
pub use config::RedfishClientConfig;
pub use entity::{fetch, fetch_into, refresh, Entity, Resource};
pub use error::{CollectionError, Error, Result};
pub use link::{Link, Links};
pub use update::{MutableField, Snapshot, Updatable};
