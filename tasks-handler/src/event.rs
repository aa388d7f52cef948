//! Inbound event normalization.
//!
//! API Gateway delivers two proxy event conventions:
//! - HTTP API (payload v2): method at `requestContext.http.method`, path at `rawPath`.
//! - REST API (payload v1): method at `httpMethod`, path at `path`.
//!
//! Both are folded into a single [`TaskRequest`] here, so the router never has to know which
//! gateway invoked the function. Each field prefers the v2 location and falls back to v1.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::task::TaskFields;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(default)]
    request_context: Option<RawRequestContext>,
    #[serde(default)]
    raw_path: Option<String>,
    #[serde(default)]
    http_method: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    is_base64_encoded: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRequestContext {
    #[serde(default)]
    http: Option<RawHttpDescription>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHttpDescription {
    #[serde(default)]
    method: Option<String>,
}

/// Why a POST/PUT body could not be read as task fields.
#[derive(Debug, thiserror::Error)]
pub enum MalformedBody {
    #[error("body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("body is not a valid task document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Transport-independent view of one inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRequest {
    /// `None` when the event carries no usable method.
    pub method: Option<Method>,
    /// Empty when the event carries no path.
    pub path: String,
    pub path_parameters: HashMap<String, String>,
    pub query_parameters: HashMap<String, String>,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl TaskRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_query_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters.insert(name.into(), value.into());
        self
    }

    /// Normalize a raw Lambda event (either API Gateway convention).
    pub fn from_event(event: &Value) -> Result<Self, serde_json::Error> {
        let raw = RawEvent::deserialize(event)?;

        let v2_method = raw
            .request_context
            .and_then(|ctx| ctx.http)
            .and_then(|http| http.method);
        let method = non_empty(v2_method)
            .or_else(|| non_empty(raw.http_method))
            .and_then(|m| Method::from_bytes(m.as_bytes()).ok());

        let path = non_empty(raw.raw_path)
            .or_else(|| non_empty(raw.path))
            .unwrap_or_default();

        Ok(Self {
            method,
            path,
            path_parameters: raw.path_parameters.unwrap_or_default(),
            query_parameters: raw.query_string_parameters.unwrap_or_default(),
            body: raw.body,
            is_base64_encoded: raw.is_base64_encoded.unwrap_or(false),
        })
    }

    /// Id addressed by a `/tasks/{id}` request.
    ///
    /// The gateway's `id` path parameter wins when present and non-empty; otherwise the last
    /// `/`-delimited path segment is used.
    pub fn resource_id(&self) -> &str {
        match self.path_parameters.get("id") {
            Some(id) if !id.is_empty() => id.as_str(),
            _ => self.path.rsplit('/').next().unwrap_or_default(),
        }
    }

    /// Query parameter value, treating an empty value as absent.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_parameters
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Parse the body as task fields. An absent or empty body reads as `{}`.
    pub fn parse_fields(&self) -> Result<TaskFields, MalformedBody> {
        let text = match &self.body {
            None => return Ok(TaskFields::default()),
            Some(body) if self.is_base64_encoded => String::from_utf8(STANDARD.decode(body)?)?,
            Some(body) => body.clone(),
        };

        if text.is_empty() {
            return Ok(TaskFields::default());
        }
        Ok(serde_json::from_str(&text)?)
    }
}
