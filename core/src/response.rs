//! Typed overlay on top of a raw `HttpResponse`.

use serde::de::DeserializeOwned;

use crate::deserializer::DeserializerRegistry;
use crate::error::{RestError, Result};
use crate::http::{HeaderSet, HttpResponse};

/// Raw response fields plus the decoded payload.
///
/// `data` is `None` whenever the response has no body or its status is not
/// 200/201; the raw `body` is kept either way so callers can inspect error
/// payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedResponse<T> {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: Option<String>,
    pub headers: HeaderSet,
    pub data: Option<T>,
}

impl<T> TypedResponse<T> {
    pub fn is_success(&self) -> bool {
        HttpResponse::SUCCESS_STATUSES.contains(&self.status)
    }
}

/// Decode `response` into `TypedResponse<T>` using the content-type registry.
pub fn to_typed<T: DeserializeOwned>(
    response: HttpResponse,
    registry: &DeserializerRegistry,
) -> Result<TypedResponse<T>> {
    let data = match response.body.as_deref() {
        Some(body) if response.is_success() => {
            let content_type = response
                .content_type
                .as_deref()
                .ok_or(RestError::MissingContentType)?;
            Some(registry.deserialize(content_type, body)?)
        }
        _ => None,
    };

    Ok(TypedResponse {
        status: response.status,
        status_text: response.status_text,
        content_type: response.content_type,
        body: response.body,
        headers: response.headers,
        data,
    })
}
