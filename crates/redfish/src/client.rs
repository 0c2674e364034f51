//! Asynchronous Redfish client implementation.

use crate::service_root::{ServiceRoot, SERVICE_ROOT};
use crate::session::Session;
use crate::session_service::SessionService;
use crate::Result;
use redfish_core::client::HttpClientConfig;
use redfish_core::{
    fetch, fetch_into, CollectionResolver, Concurrency, Error, HttpClientBuilder, Link,
    RedfishClientConfig, Resource, SharedClient, Updatable,
};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Builder for [`RedfishClient`].
#[derive(Debug, Clone)]
pub struct RedfishClientBuilder {
    inner: HttpClientBuilder,
    concurrency: Concurrency,
}

impl RedfishClientBuilder {
    /// Create a builder for the specified service endpoint.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            inner: HttpClientBuilder::new(endpoint)?,
            concurrency: Concurrency::Unbounded,
        })
    }

    /// Create a builder from a [`RedfishClientConfig`].
    pub fn from_config(config: &RedfishClientConfig) -> Result<Self> {
        Ok(Self {
            inner: HttpClientBuilder::from_config(config)?,
            concurrency: config.concurrency(),
        })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.inner = self.inner.with_basic_auth(username, password);
        self
    }

    /// Configure an X-Auth-Token header.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.inner = self.inner.with_tls_verify(verify);
        self
    }

    /// Limit how many collection members are fetched at once.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<RedfishClient> {
        let http = self.inner.build()?;
        let base_url = http.base_url().clone();
        let client = http.into_shared();
        let resolver = CollectionResolver::new(Arc::clone(&client)).with_concurrency(self.concurrency);

        Ok(RedfishClient {
            client,
            resolver,
            base_url: Some(base_url),
        })
    }
}

/// Asynchronous Redfish client.
///
/// Resources fetched through this client are bound to it, so their own
/// navigation and [`Updatable::update`] calls reuse the same connection pool
/// and credentials.
#[derive(Clone)]
pub struct RedfishClient {
    client: SharedClient,
    resolver: CollectionResolver,
    base_url: Option<Url>,
}

impl RedfishClient {
    /// Construct a client directly from the service endpoint.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        RedfishClientBuilder::new(endpoint)?.build()
    }

    /// Construct a client from a [`RedfishClientConfig`].
    pub fn from_config(config: &RedfishClientConfig) -> Result<Self> {
        RedfishClientBuilder::from_config(config)?.build()
    }

    /// Start a builder for the given service endpoint.
    pub fn builder(endpoint: impl AsRef<str>) -> Result<RedfishClientBuilder> {
        RedfishClientBuilder::new(endpoint)
    }

    /// Wrap an existing [`SharedClient`], e.g. a test double.
    #[must_use]
    pub fn from_client(client: SharedClient) -> Self {
        let resolver = CollectionResolver::new(Arc::clone(&client));
        Self {
            client,
            resolver,
            base_url: None,
        }
    }

    /// Change how many collection members are fetched at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.resolver = self.resolver.with_concurrency(concurrency);
        self
    }

    /// Return the service endpoint, when built over HTTP.
    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// The underlying resource client.
    #[must_use]
    pub fn client(&self) -> &SharedClient {
        &self.client
    }

    /// Fetch a single resource by URI.
    pub async fn get<T: Resource>(&self, uri: &str) -> Result<T> {
        fetch(&self.client, uri).await
    }

    /// Re-populate `target` from the resource at `uri`.
    pub async fn get_into<T: Resource>(&self, uri: &str, target: &mut T) -> Result<()> {
        fetch_into(&self.client, uri, target).await
    }

    /// Resolve every member of the collection at `link`, in declared order.
    ///
    /// Fails with [`Error::Collection`] naming each member that could not be
    /// fetched; no partial list is returned.
    pub async fn list<T: Resource>(&self, link: &Link) -> Result<Vec<T>> {
        debug!(link = link.as_str(), "listing collection");
        self.resolver.resolve(link).await
    }

    /// Write changed mutable fields of `resource` through this client.
    pub async fn update<T: Updatable>(&self, resource: &T) -> Result<()> {
        resource.update_with(&self.client).await
    }

    /// Fetch the service root.
    pub async fn service_root(&self) -> Result<ServiceRoot> {
        self.get(SERVICE_ROOT).await
    }

    /// Fetch the session service linked from the service root.
    pub async fn session_service(&self) -> Result<SessionService> {
        let root = self.service_root().await?;
        let uri = root
            .session_service
            .uri()
            .ok_or_else(|| Error::NotFound("service root has no SessionService".to_string()))?;
        self.get(uri).await
    }

    /// List the open sessions.
    pub async fn sessions(&self) -> Result<Vec<Session>> {
        let service = self.session_service().await?;
        self.list(&service.sessions).await
    }
}
