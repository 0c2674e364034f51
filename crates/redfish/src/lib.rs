//! Typed Redfish resources for management controllers.
//!
//! Provides resource models and an asynchronous client for navigating a Redfish
//! service. Fetching, collection resolution and partial updates are shared
//! machinery from [`redfish_core`].

#![deny(missing_docs)]

pub mod battery_metrics;
pub mod client;
pub mod service_root;
pub mod session;
pub mod session_service;
pub mod vlan;

pub use battery_metrics::{BatteryMetrics, SensorCurrentExcerpt, SensorExcerpt, SensorVoltageExcerpt};
pub use client::{RedfishClient, RedfishClientBuilder};
pub use redfish_core::{Error, Link, Updatable};
pub use service_root::ServiceRoot;
pub use session::Session;
pub use session_service::SessionService;
pub use vlan::{VLanNetworkInterface, Vlan};

/// Convenient result alias that reuses the shared Redfish error type.
pub type Result<T> = redfish_core::Result<T>;
