use bytes::Bytes;
use hyper::client::HttpConnector;
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Client, Request};
use hyper_tls::HttpsConnector;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::error::ToolError;
use crate::Result;

/// A downloaded body plus the Content-Type the server reported, if any.
#[derive(Debug)]
pub struct FetchedMedia {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

pub struct NetworkClient {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    fetch_timeout: Duration,
}

impl NetworkClient {
    pub fn new(fetch_timeout: Duration) -> Self {
        let https = HttpsConnector::new();
        Self {
            client: Client::builder().build::<_, Body>(https),
            fetch_timeout,
        }
    }

    /// GETs `url` and returns the full body. The timeout bounds the whole
    /// exchange, headers and body both, and surfaces as `Timeout`.
    pub async fn fetch(&self, url: &str) -> Result<FetchedMedia> {
        debug!("Fetching {}", url);
        let req = Request::builder()
            .method("GET")
            .uri(url)
            .body(Body::empty())
            .map_err(|e| ToolError::Network(e.to_string()))?;

        let resp = timeout(self.fetch_timeout, self.client.request(req))
            .await
            .map_err(|_| ToolError::Timeout(format!("fetching {}", url)))?
            .map_err(|e| ToolError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ToolError::Upstream {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

        let bytes = timeout(self.fetch_timeout, hyper::body::to_bytes(resp.into_body()))
            .await
            .map_err(|_| ToolError::Timeout(format!("reading body of {}", url)))?
            .map_err(|e| ToolError::Network(e.to_string()))?;

        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(FetchedMedia {
            bytes,
            content_type,
        })
    }
}
