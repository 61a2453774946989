//! Small fluent REST client.
//!
//! # Overview
//! `RestClient` holds a base endpoint and default headers and hands out
//! `RequestBuilder`s scoped to one resource. A builder collects headers plus
//! query and matrix parameters, builds the request URI, sends GET or POST
//! through a `Transport`, and returns the raw `HttpResponse` or a
//! `TypedResponse<T>` decoded by content type.
//!
//! ```no_run
//! use restlib_core::{RestClient, TypedResponse};
//!
//! # fn main() -> restlib_core::Result<()> {
//! let client = RestClient::new("http://localhost:3000")?;
//! let customers: TypedResponse<Vec<serde_json::Value>> = client
//!     .resource("customers")
//!     .add_query_parameter("name", "Jane")
//!     .get_as()?;
//! println!("{} -> {:?}", customers.status, customers.data);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Calls are synchronous; the default transport is a blocking `ureq` agent.
//! - 4xx/5xx responses are data, not errors. Only transport failures,
//!   serialization problems and undecodable successful bodies are `Err`.
//! - Collaborators are injected through `RestClient::builder`; there is no
//!   global state.

pub mod client;
pub mod config;
pub mod deserializer;
pub mod error;
pub mod http;
pub mod parameter;
pub mod request;
pub mod response;
pub mod serializer;
pub mod transport;
pub mod uri;

pub use client::{RestClient, RestClientBuilder};
pub use config::ClientConfig;
pub use deserializer::{Deserializer, DeserializerRegistry, JsonDeserializer};
pub use error::{RestError, Result, TransportError};
pub use http::{HeaderSet, HttpMethod, HttpRequest, HttpResponse};
pub use parameter::{Parameter, ParameterKind};
pub use request::RequestBuilder;
pub use response::{to_typed, TypedResponse};
pub use serializer::{JsonSerializer, Serializer};
pub use transport::{Transport, UreqTransport};
