//! Fluent request builder scoped to one resource.
//!
//! # Design
//! A `RequestBuilder` is created by `RestClient::resource` with a copy of the
//! client's default headers. `add_*` methods consume and return the builder
//! so calls chain; the `get*`/`post*` methods borrow it, so one builder can
//! issue several calls. A POST body travels as a `RequestBody` parameter
//! built for that call only: the builder's own parameter list is never
//! touched by `post`, and repeated posts do not pile up bodies.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::client::Shared;
use crate::error::{RestError, Result};
use crate::http::{HeaderSet, HttpMethod, HttpRequest, HttpResponse};
use crate::parameter::{Parameter, ParameterKind};
use crate::response::{to_typed, TypedResponse};
use crate::uri::build_uri;

const USER_AGENT: &str = "User-Agent";
const CONTENT_TYPE: &str = "Content-Type";

/// Accumulates headers and parameters for calls against one resource.
pub struct RequestBuilder {
    shared: Arc<Shared>,
    resource: Option<String>,
    headers: HeaderSet,
    parameters: Vec<Parameter>,
}

impl RequestBuilder {
    pub(crate) fn new(shared: Arc<Shared>, resource: Option<String>, headers: HeaderSet) -> Self {
        Self {
            shared,
            resource,
            headers,
            parameters: Vec::new(),
        }
    }

    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    pub fn add_query_parameter(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_parameter(Parameter::query(name, value))
    }

    pub fn add_matrix_parameter(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_parameter(Parameter::matrix(name, value))
    }

    /// Append any parameter, e.g. one with a missing value.
    pub fn add_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// The URI a call with `identifier` would target.
    pub fn uri(&self, identifier: Option<&str>) -> Url {
        build_uri(
            &self.shared.endpoint,
            self.resource.as_deref(),
            identifier,
            &self.parameters,
            self.shared.config.omit_empty_parameters,
        )
    }

    /// GET the resource collection.
    pub fn get(&self) -> Result<HttpResponse> {
        self.execute(HttpMethod::Get, self.uri(None), None)
    }

    pub fn get_as<T: DeserializeOwned>(&self) -> Result<TypedResponse<T>> {
        to_typed(self.get()?, &self.shared.registry)
    }

    /// GET a single entity of the resource.
    pub fn get_by_id(&self, id: &str) -> Result<HttpResponse> {
        self.execute(HttpMethod::Get, self.uri(Some(id)), None)
    }

    pub fn get_by_id_as<T: DeserializeOwned>(&self, id: &str) -> Result<TypedResponse<T>> {
        to_typed(self.get_by_id(id)?, &self.shared.registry)
    }

    /// Serialize `body` with the client's serializer and POST it.
    pub fn post<B: Serialize + ?Sized>(&self, body: &B) -> Result<HttpResponse> {
        let value =
            serde_json::to_value(body).map_err(|e| RestError::SerializationError(e.to_string()))?;
        let serializer = &self.shared.serializer;
        let text = serializer.serialize(&value)?;
        let body = Parameter::request_body(serializer.content_type(), text);
        self.execute(HttpMethod::Post, self.uri(None), Some(body))
    }

    /// POST `body` and decode the response into `T`.
    pub fn post_as<B, T>(&self, body: &B) -> Result<TypedResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        to_typed(self.post(body)?, &self.shared.registry)
    }

    fn prepare(&self, method: HttpMethod, uri: Url, body: Option<Parameter>) -> HttpRequest {
        let mut headers = self.headers.clone();
        if !headers.contains(USER_AGENT) {
            headers.add(USER_AGENT, self.shared.config.user_agent.as_str());
        }

        let (content_type, body) = match body {
            Some(p) if p.kind() == ParameterKind::RequestBody => {
                (Some(p.name().to_string()), p.value().map(str::to_string))
            }
            _ => (None, None),
        };
        // The serializer's content type travels separately and wins.
        if content_type.is_some() {
            headers.remove(CONTENT_TYPE);
        }

        HttpRequest {
            method,
            url: uri.into(),
            headers,
            body,
            content_type,
        }
    }

    fn execute(&self, method: HttpMethod, uri: Url, body: Option<Parameter>) -> Result<HttpResponse> {
        let request = self.prepare(method, uri, body);
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.shared.transport.execute(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("endpoint", &self.shared.endpoint.as_str())
            .field("resource", &self.resource)
            .field("headers", &self.headers)
            .field("parameters", &self.parameters)
            .finish()
    }
}
