//! The resource client capability and its HTTP implementation.
//!
//! Everything above this module talks to a Redfish service through the
//! [`ResourceClient`] trait only. [`HttpClient`] is the `reqwest`-backed
//! implementation; tests substitute a mock.

use crate::config::RedfishClientConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, IF_MATCH};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("redfish-core/", env!("CARGO_PKG_VERSION"));
const ODATA_VERSION: &str = "4.0";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Default idle timeout for connection pools.
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host.
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Shared handle to a resource client.
///
/// Many resources hold the same handle; it outlives any single resource.
pub type SharedClient = Arc<dyn ResourceClient>;

/// A successful response: the resource URI and the full body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    uri: String,
    status: u16,
    body: Vec<u8>,
}

impl Response {
    /// Create a response.
    #[must_use]
    pub fn new(uri: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            uri: uri.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a `200 OK` response with a JSON body.
    #[must_use]
    pub fn json(uri: impl Into<String>, body: &serde_json::Value) -> Self {
        Self::new(uri, 200, body.to_string())
    }

    /// URI the response was fetched from.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Borrow the body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Take ownership of the body.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Capability to read and partially update resources by URI.
///
/// Implementations own transport concerns: authentication, timeouts and any
/// retry policy. Nothing above this trait retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetch the resource at `uri`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service answers with a
    /// non-success status.
    async fn get(&self, uri: &str) -> Result<Response>;

    /// Apply a partial update to the resource at `uri`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects the patch.
    async fn patch(&self, uri: &str, payload: &serde_json::Value) -> Result<()>;

    /// Apply a partial update only if the resource still carries `etag`.
    ///
    /// Transports without conditional requests fall back to [`patch`](Self::patch).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service rejects the patch, or
    /// the resource changed since `etag` was observed.
    async fn patch_with_etag(
        &self,
        uri: &str,
        payload: &serde_json::Value,
        etag: &str,
    ) -> Result<()> {
        let _ = etag;
        self.patch(uri, payload).await
    }
}

/// HTTP client configuration.
///
/// Configures transport behavior including timeouts and connection pooling.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request logging
    pub enable_logging: bool,
}

impl HttpClientConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable request logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
enum Auth {
    None,
    Basic {
        username: String,
        password: SecretString,
    },
    Token(SecretString),
}

/// Builder for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    base_url: Url,
    http_config: HttpClientConfig,
    auth: Auth,
    tls_verify: bool,
    tls_ca_cert: Option<std::path::PathBuf>,
}

impl HttpClientBuilder {
    /// Create a builder for the specified service base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;

        Ok(Self {
            base_url,
            http_config: HttpClientConfig::new(),
            auth: Auth::None,
            tls_verify: true,
            tls_ca_cert: None,
        })
    }

    /// Create a builder from a [`RedfishClientConfig`].
    pub fn from_config(config: &RedfishClientConfig) -> Result<Self> {
        let mut builder = Self::new(config.parse_endpoint()?)?
            .with_http_config(HttpClientConfig::new().with_timeout(config.timeout()))
            .with_tls_verify(config.tls_verify);

        if let Some(ca_cert) = &config.tls_ca_cert {
            builder = builder.with_ca_cert(ca_cert.clone());
        }

        if let Some(token) = &config.auth_token {
            builder.auth = Auth::Token(token.clone());
        } else if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder.auth = Auth::Basic {
                username: username.clone(),
                password: password.clone(),
            };
        }

        Ok(builder)
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Auth::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        };
        self
    }

    /// Configure an X-Auth-Token header.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Auth::Token(SecretString::from(token.into()));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional CA certificate (PEM).
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient> {
        let config = &self.http_config;
        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host);

        if !self.tls_verify {
            warn!("TLS verification disabled for Redfish client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.tls_ca_cert {
            debug!("loading CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpClient {
            http,
            base_url: self.base_url,
            auth: self.auth,
            enable_logging: self.http_config.enable_logging,
        })
    }
}

/// Asynchronous HTTP implementation of [`ResourceClient`].
///
/// Resource URIs are resolved against the base URL, so the service-relative
/// `@odata.id` values found in payloads can be passed in directly.
#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    base_url: Url,
    auth: Auth,
    enable_logging: bool,
}

impl HttpClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        HttpClientBuilder::new(base_url)?.build()
    }

    /// Construct a client from a [`RedfishClientConfig`].
    pub fn from_config(config: &RedfishClientConfig) -> Result<Self> {
        HttpClientBuilder::from_config(config)?.build()
    }

    /// Start a builder for the given base URL.
    pub fn builder(base_url: impl AsRef<str>) -> Result<HttpClientBuilder> {
        HttpClientBuilder::new(base_url)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Wrap the client in a [`SharedClient`] handle.
    #[must_use]
    pub fn into_shared(self) -> SharedClient {
        Arc::new(self)
    }

    fn resolve(&self, uri: &str) -> Result<Url> {
        self.base_url
            .join(uri)
            .map_err(|err| Error::InvalidEndpoint(format!("`{uri}`: {err}")))
    }

    fn request(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header(ACCEPT, "application/json")
            .header("OData-Version", ODATA_VERSION);

        match &self.auth {
            Auth::None => request,
            Auth::Basic { username, password } => {
                request.basic_auth(username, Some(password.expose_secret()))
            }
            Auth::Token(token) => request.header("X-Auth-Token", token.expose_secret()),
        }
    }

    async fn send(&self, uri: &str, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = self.request(request).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                if self.enable_logging {
                    debug!(%status, uri, error = %err, "failed to read error body");
                }
                String::new()
            }
        };
        if self.enable_logging {
            debug!(%status, uri, "request rejected");
        }
        Err(Error::from_status(status, uri, &text))
    }

    async fn send_patch(
        &self,
        uri: &str,
        payload: &serde_json::Value,
        etag: Option<&str>,
    ) -> Result<()> {
        let url = self.resolve(uri)?;
        if self.enable_logging {
            debug!(%url, conditional = etag.is_some(), "PATCH");
        }

        let mut request = self.http.patch(url).json(payload);
        if let Some(etag) = etag {
            request = request.header(IF_MATCH, etag);
        }

        self.send(uri, request).await?;
        Ok(())
    }
}

#[async_trait]
impl ResourceClient for HttpClient {
    async fn get(&self, uri: &str) -> Result<Response> {
        let url = self.resolve(uri)?;
        if self.enable_logging {
            debug!(%url, "GET");
        }

        let response = self.send(uri, self.http.get(url)).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(Response::new(uri, status, body.to_vec()))
    }

    async fn patch(&self, uri: &str, payload: &serde_json::Value) -> Result<()> {
        self.send_patch(uri, payload, None).await
    }

    async fn patch_with_etag(
        &self,
        uri: &str,
        payload: &serde_json::Value,
        etag: &str,
    ) -> Result<()> {
        self.send_patch(uri, payload, Some(etag)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_http_config_builder() {
        let config = HttpClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(5))
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_logging(false);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.enable_logging);
    }

    #[test]
    fn test_http_config_default() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT));
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
        assert!(config.enable_logging);
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = HttpClient::new("::not a url::").err().unwrap();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_response_accessors() {
        let response = Response::json("/redfish/v1", &json!({"Id": "RootService"}));
        assert_eq!(response.uri(), "/redfish/v1");
        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), br#"{"Id":"RootService"}"#);
    }

    #[tokio::test]
    async fn get_resolves_relative_uri_and_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/redfish/v1/SessionService"))
            .and(header("OData-Version", "4.0"))
            .and(header("X-Auth-Token", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "@odata.id": "/redfish/v1/SessionService",
                "Id": "SessionService"
            })))
            .mount(&server)
            .await;

        let client = HttpClient::builder(server.uri())
            .unwrap()
            .with_token("abc123")
            .build()
            .unwrap();

        let response = client.get("/redfish/v1/SessionService").await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["Id"], "SessionService");
    }

    #[tokio::test]
    async fn get_maps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/redfish/v1/Systems/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client.get("/redfish/v1/Systems/missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn get_maps_status_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/redfish/v1/Systems/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::builder(server.uri())
            .unwrap()
            .with_http_config(HttpClientConfig::new().with_logging(true))
            .build()
            .unwrap();
        let err = client.get("/redfish/v1/Systems/gone").await.unwrap_err();
        assert_eq!(err, Error::NotFound("/redfish/v1/Systems/gone: ".to_string()));
    }

    #[tokio::test]
    async fn patch_with_etag_sends_if_match() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/redfish/v1/SessionService"))
            .and(header("If-Match", "W/\"1234\""))
            .and(body_json(json!({"SessionTimeout": 60})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder(server.uri())
            .unwrap()
            .with_basic_auth("root", "calvin")
            .build()
            .unwrap();

        client
            .patch_with_etag(
                "/redfish/v1/SessionService",
                &json!({"SessionTimeout": 60}),
                "W/\"1234\"",
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn patch_surfaces_server_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/redfish/v1/SessionService"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": "Base.1.8.PropertyValueNotInList",
                    "message": "bad value"
                }
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client
            .patch("/redfish/v1/SessionService", &json!({"SessionTimeout": -1}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidRequest("/redfish/v1/SessionService: bad value".to_string())
        );
    }
}
