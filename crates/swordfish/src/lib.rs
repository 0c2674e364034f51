//! Typed Swordfish storage resources.
//!
//! Swordfish extends Redfish with storage service models. The resources here
//! are fetched, listed and updated with the shared machinery in
//! [`redfish_core`].

#![deny(missing_docs)]

pub mod data_storage_line_of_service;
pub mod io_connectivity_los_capabilities;

pub use data_storage_line_of_service::{
    DataStorageLineOfService, ProvisioningPolicy, RecoveryAccessScope, StorageAccessCapability,
};
pub use io_connectivity_los_capabilities::{
    IOConnectivityLineOfService, IOConnectivityLoSCapabilities, Protocol,
};

/// Convenient result alias that reuses the shared Redfish error type.
pub type Result<T> = redfish_core::Result<T>;
