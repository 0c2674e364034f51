//! Resource identity and the fetch-and-decode primitive.
//!
//! Every resource kind embeds an [`Entity`] (flattened into its JSON shape) and
//! implements [`Resource`]. [`fetch`] and [`fetch_into`] are the only way
//! resources are materialized: they issue the GET, decode the body, let mutable
//! kinds capture their snapshot, and bind the client used for the fetch.

use crate::client::SharedClient;
use crate::error::{Error, Result};
use crate::update::Snapshot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Identity shared by every fetched resource.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Entity {
    /// Canonical URI of the resource
    #[serde(rename = "@odata.id", default)]
    pub odata_id: String,

    /// Short identifier, unique within the parent collection
    #[serde(rename = "Id", default)]
    pub id: String,

    /// Human-readable name
    #[serde(rename = "Name", default)]
    pub name: String,

    /// Entity tag of the representation, used for conditional updates
    #[serde(rename = "@odata.etag", default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(skip)]
    client: Option<SharedClient>,
}

impl Entity {
    /// Create an unbound entity with the given URI and identifier.
    #[must_use]
    pub fn new(odata_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            odata_id: odata_id.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    /// Bind the client this entity was fetched with.
    pub fn bind(&mut self, client: SharedClient) {
        self.client = Some(client);
    }

    /// Returns true if a client is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.client.is_some()
    }

    /// The client this entity was fetched with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unbound`] for entities built in memory rather than fetched.
    pub fn client(&self) -> Result<&SharedClient> {
        self.client
            .as_ref()
            .ok_or_else(|| Error::Unbound(self.odata_id.clone()))
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.odata_id == other.odata_id
            && self.id == other.id
            && self.name == other.name
            && self.etag == other.etag
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("odata_id", &self.odata_id)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("etag", &self.etag)
            .field("bound", &self.client.is_some())
            .finish()
    }
}

/// A decodable resource kind.
pub trait Resource: DeserializeOwned + Send + 'static {
    /// The embedded identity.
    fn entity(&self) -> &Entity;

    /// Mutable access to the embedded identity.
    fn entity_mut(&mut self) -> &mut Entity;

    /// Storage for the raw representation, for kinds that support updates.
    fn snapshot_mut(&mut self) -> Option<&mut Snapshot> {
        None
    }
}

/// Decode a fetched body into `T`, capture its snapshot and bind `client`.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] if the body does not have the shape of `T`.
pub fn decode<T: Resource>(client: &SharedClient, uri: &str, body: &[u8]) -> Result<T> {
    let mut resource: T = serde_json::from_slice(body)
        .map_err(|err| Error::DecodeError(format!("`{uri}`: {err}")))?;

    if let Some(snapshot) = resource.snapshot_mut() {
        snapshot.capture(body);
    }

    let entity = resource.entity_mut();
    if entity.odata_id.is_empty() {
        entity.odata_id = uri.to_string();
    }
    entity.bind(Arc::clone(client));

    Ok(resource)
}

/// Fetch `uri` and decode it as `T`.
///
/// # Errors
///
/// Returns the transport error from the GET or a decode error.
pub async fn fetch<T: Resource>(client: &SharedClient, uri: &str) -> Result<T> {
    debug!(uri, "fetching resource");
    let response = client.get(uri).await?;
    decode(client, uri, response.body())
}

/// Fetch `uri` and decode it into `target`.
///
/// `target` is left untouched when an error is returned.
///
/// # Errors
///
/// Returns the transport error from the GET or a decode error.
pub async fn fetch_into<T: Resource>(client: &SharedClient, uri: &str, target: &mut T) -> Result<()> {
    *target = fetch(client, uri).await?;
    Ok(())
}

/// Re-fetch a resource from its own URI with its bound client.
///
/// This is how a fresh snapshot is obtained after an update.
///
/// # Errors
///
/// Returns [`Error::Unbound`] if the resource was never fetched, or any fetch error.
pub async fn refresh<T: Resource>(resource: &mut T) -> Result<()> {
    let client = Arc::clone(resource.entity().client()?);
    let uri = resource.entity().odata_id.clone();
    fetch_into(&client, &uri, resource).await
}
