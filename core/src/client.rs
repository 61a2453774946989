//! Entry point of the REST client.
//!
//! # Design
//! `RestClient` owns the base address, the default headers and the injected
//! collaborators (transport, serializer, deserializer registry). Nothing is
//! global: tests hand a fake transport to `RestClient::builder` instead of
//! swapping a process-wide factory. Every `RequestBuilder` starts from a
//! snapshot of the default headers taken when it is created.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::deserializer::DeserializerRegistry;
use crate::error::{RestError, Result};
use crate::http::{HeaderSet, HttpResponse};
use crate::request::RequestBuilder;
use crate::response::TypedResponse;
use crate::serializer::{JsonSerializer, Serializer};
use crate::transport::{Transport, UreqTransport};

/// Collaborators shared by a client and every builder it creates.
pub(crate) struct Shared {
    pub(crate) endpoint: Url,
    pub(crate) config: ClientConfig,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) serializer: Arc<dyn Serializer>,
    pub(crate) registry: Arc<DeserializerRegistry>,
}

pub struct RestClient {
    shared: Arc<Shared>,
    headers: HeaderSet,
}

impl RestClient {
    /// Client with default configuration over `UreqTransport`.
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::builder(endpoint).build()
    }

    pub fn builder(endpoint: &str) -> RestClientBuilder {
        RestClientBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.shared.endpoint
    }

    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    /// Default header applied to every builder created after this call.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.add(name, value);
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderSet {
        &mut self.headers
    }

    /// GET the bare endpoint.
    pub fn get(&self) -> Result<HttpResponse> {
        self.request(None).get()
    }

    pub fn get_as<T: DeserializeOwned>(&self) -> Result<TypedResponse<T>> {
        self.request(None).get_as()
    }

    /// Builder scoped to `name` under the endpoint.
    pub fn resource(&self, name: &str) -> RequestBuilder {
        self.request(Some(name.to_string()))
    }

    fn request(&self, resource: Option<String>) -> RequestBuilder {
        RequestBuilder::new(Arc::clone(&self.shared), resource, self.headers.clone())
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("endpoint", &self.shared.endpoint.as_str())
            .field("config", &self.shared.config)
            .field("headers", &self.headers)
            .finish()
    }
}

/// Configures a `RestClient`. Unset collaborators fall back to
/// `UreqTransport`, `JsonSerializer` and the default JSON registry.
pub struct RestClientBuilder {
    endpoint: String,
    config: ClientConfig,
    headers: HeaderSet,
    transport: Option<Arc<dyn Transport>>,
    serializer: Option<Arc<dyn Serializer>>,
    registry: Option<DeserializerRegistry>,
}

impl RestClientBuilder {
    fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            config: ClientConfig::default(),
            headers: HeaderSet::new(),
            transport: None,
            serializer: None,
            registry: None,
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn registry(mut self, registry: DeserializerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<RestClient> {
        let endpoint = parse_endpoint(&self.endpoint)?;
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::from_config(&self.config)),
        };
        let serializer: Arc<dyn Serializer> = match self.serializer {
            Some(serializer) => serializer,
            None => Arc::new(JsonSerializer::new()),
        };

        let shared = Shared {
            endpoint,
            config: self.config,
            transport,
            serializer,
            registry: Arc::new(self.registry.unwrap_or_else(DeserializerRegistry::with_defaults)),
        };

        Ok(RestClient {
            shared: Arc::new(shared),
            headers: self.headers,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let endpoint = Url::parse(raw).map_err(|e| RestError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if endpoint.cannot_be_a_base() {
        return Err(RestError::InvalidEndpoint {
            url: raw.to_string(),
            reason: "endpoint cannot carry a path".to_string(),
        });
    }
    Ok(endpoint)
}
