//! # Remote: the transport seam between the client and the backend
//!
//! [`Remote`] is the single async method every backend implements: take a
//! [`Request`], hand back the raw [`Reply`] (HTTP status + JSON body) or a
//! [`SyncError::Transport`] when no response arrived. Interpreting the reply
//! (status codes, the `{ status, data, message }` envelope) is done once, in
//! [`crate::Client`], so every backend gets identical error semantics.
//!
//! Implementations:
//! - [`crate::MemoryRemote`]: in-process backend used by tests and the offline demo.
//! - `api::HttpRemote`: JSON over HTTP(S) via `reqwest`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SyncError;

/// HTTP verbs used by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call to the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path below the base URL, always starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    /// JSON body; never set for `GET`.
    pub body: Option<Value>,
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

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        if self.method != Method::Get {
            self.body = Some(body);
        }
        self
    }

    /// `path?k=v&...` for logging and for backends that route on the full target.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", self.path, query.join("&"))
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The raw answer of the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub status: u16,
    /// Parsed JSON body, `Value::Null` when the body was empty or not JSON.
    pub body: Value,
}

impl Reply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Value of [`Envelope::status`] on success.
pub const STATUS_SUCCESS: &str = "Success";

/// The JSON object every endpoint answers with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: "Failed".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Async transport for backend requests.
pub trait Remote {
    fn send(&self, request: Request) -> impl std::future::Future<Output = Result<Reply, SyncError>>;
}

impl<R: Remote> Remote for &R {
    fn send(&self, request: Request) -> impl std::future::Future<Output = Result<Reply, SyncError>> {
        (**self).send(request)
    }
}
