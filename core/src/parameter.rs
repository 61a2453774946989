//! Named request values tagged with where they travel.

/// Where a `Parameter` is placed in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// `name=value` pairs joined with `&` in the query string.
    QueryString,
    /// `;name=value` segments appended to the request path.
    Matrix,
    /// Serialized request body; `name` holds the content type.
    RequestBody,
}

/// A single request parameter. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    value: Option<String>,
    kind: ParameterKind,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: Option<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
        }
    }

    pub fn query(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Some(value.into()), ParameterKind::QueryString)
    }

    pub fn matrix(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Some(value.into()), ParameterKind::Matrix)
    }

    /// Body parameter: the content type is stored as the name, the serialized
    /// text as the value.
    pub fn request_body(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(content_type, Some(body.into()), ParameterKind::RequestBody)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// True when the value is missing or whitespace only.
    pub fn is_empty(&self) -> bool {
        self.value.as_deref().map_or(true, |v| v.trim().is_empty())
    }
}
