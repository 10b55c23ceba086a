//! Transport to the Marathon control plane
//!
//! Entities never talk to `reqwest` directly: they hold an
//! `Arc<dyn Transport>` injected at construction and hand it fully described
//! [`Request`]s. [`client::HttpClient`] is the production implementation.

pub mod client;
pub mod deployments;
pub mod paths;

use async_trait::async_trait;
use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ClientError;

/// A request against the API root
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path relative to the API root, e.g. `/v2/apps/infra/redis-1`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Add `force=true` when the write must supersede an in-flight deployment
    pub fn with_force(mut self, force: bool) -> Self {
        if force {
            self.query.push(("force".to_string(), "true".to_string()));
        }
        self
    }

    /// True when the request carries `force=true`
    pub fn is_forced(&self) -> bool {
        self.query.iter().any(|(k, v)| k == "force" && v == "true")
    }
}

/// Capability to execute requests against the control plane
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the decoded JSON body (`null` when empty)
    async fn send(&self, request: Request) -> Result<serde_json::Value, ClientError>;
}

/// Send a request and decode the response into `T`
pub async fn call<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: Request,
) -> Result<T, ClientError> {
    let value = transport.send(request).await?;
    Ok(serde_json::from_value(value)?)
}
