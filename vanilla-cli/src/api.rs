///! JSON-RPC client for flavor plugins

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use vanilla_common::rpc::{Request, Response};

pub struct RpcClient {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string() + "/",
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Call `method` on the plugin and decode its result
    pub async fn call<P: Serialize, R: DeserializeOwned>(&self, method: &str, params: &P) -> Result<R> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::new(method, params, id)?;

        let response = self.client.post(&self.url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Plugin request failed: {} - {}", status, error_text);
        }

        let response: Response = response.json().await?;
        decode_response(response)
    }
}

/// Turn a response envelope into the call's result, or its remote error
pub fn decode_response<R: DeserializeOwned>(response: Response) -> Result<R> {
    if let Some(error) = response.error {
        anyhow::bail!("Plugin call failed: {}", error);
    }

    let result = response
        .result
        .ok_or_else(|| anyhow!("Plugin response carried no result"))?;
    Ok(serde_json::from_value(result)?)
}
