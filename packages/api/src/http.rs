//! JSON over HTTP(S) transport.

use serde_json::Value;
use store::{Method, Remote, Reply, Request, SyncError};

/// [`Remote`] that sends every request to `base_url` with `reqwest`.
///
/// The session travels as a cookie: the browser attaches it when the request is made
/// with `credentials: include`, native builds keep it in the client's cookie store.
#[derive(Clone, Debug)]
pub struct HttpRemote {
    base_url: String,
    http: reqwest::Client,
}

fn transport(e: reqwest::Error) -> SyncError {
    SyncError::Transport(e.to_string())
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SyncError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);
        let http = builder.build().map_err(transport)?;

        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Remote for HttpRemote {
    async fn send(&self, request: Request) -> Result<Reply, SyncError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .http
            .request(method(request.method), url)
            .query(&request.query);

        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        // `json` also sets `content-type: application/json`.
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport)?;
        let body = serde_json::from_str(&text).unwrap_or_else(|_| {
            if !text.is_empty() {
                tracing::warn!("{} {} answered {status} with a non-JSON body", request.method, request.path);
            }
            Value::Null
        });
        Ok(Reply::new(status, body))
    }
}
