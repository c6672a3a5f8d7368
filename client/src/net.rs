//! Live network leg of the request pipeline
//!
//! Thin reqwest adapter implementing the cache policy's [`Network`]
//! trait: server-relative request values in, response values out,
//! transport failures mapped to [`FetchError::Network`] so the policy
//! can fall back to the store.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use babynap_shared::offline::{Method, Network, Request, Response};
use babynap_shared::FetchError;
use std::time::Duration;

/// reqwest-backed [`Network`]
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    base_url: String,
    cookie: Option<String>,
    client: reqwest::Client,
}

impl HttpNetwork {
    /// Build a network against an API origin, e.g. `http://127.0.0.1:8080`
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        cookie: Option<String>,
    ) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cookie,
            client,
        })
    }

    fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let url = self.absolute(&request.url);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url).body(request.body.clone()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header("cookie", cookie);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
            .to_vec();

        Ok(Response::new(status, headers, body))
    }
}
