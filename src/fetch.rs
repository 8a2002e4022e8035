//! JSON payload retrieval.
//!
//! The pipeline only consumes decoded payloads; this module is the
//! collaborator that produces them. `data:` URLs are decoded locally.

use crate::error::{ErrorCode, Result, ViewerError};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DATA_URL_PREFIX: &str = "data:";
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub type Unpack<'a> = &'a dyn Fn(Value) -> Result<Value>;

pub trait PayloadSource {
    fn get(&self, url: &str) -> Result<Value>;
    fn post(
        &self,
        url: &str,
        body: &str,
        content_type: Option<&str>,
        unpack: Option<Unpack<'_>>,
    ) -> Result<Value>;
}

/// Decodes the JSON body of a `data:` URL; `None` for any other URL.
pub fn decode_data_url(url: &str) -> Option<Result<Value>> {
    if !url.starts_with(DATA_URL_PREFIX) {
        return None;
    }
    let decoded = percent_decode_str(url).decode_utf8_lossy();
    let body = match decoded.find(',') {
        Some(comma) => &decoded[comma + 1..],
        None => &decoded[..],
    };
    Some(serde_json::from_str(body).map_err(|e| {
        ViewerError::new(
            ErrorCode::Parse,
            format!("Could not parse data URL payload: {e}"),
        )
    }))
}

fn fetch_error(url: &str, e: reqwest::Error) -> ViewerError {
    ViewerError::new(ErrorCode::Fetch, format!("Request to '{url}' failed: {e}"))
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                ViewerError::new(ErrorCode::Fetch, format!("could not build HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }
}

impl PayloadSource for HttpSource {
    fn get(&self, url: &str) -> Result<Value> {
        if let Some(payload) = decode_data_url(url) {
            return payload;
        }
        debug!(url, "GET");
        self.client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<Value>())
            .map_err(|e| fetch_error(url, e))
    }

    fn post(
        &self,
        url: &str,
        body: &str,
        content_type: Option<&str>,
        unpack: Option<Unpack<'_>>,
    ) -> Result<Value> {
        debug!(url, content_type = ?content_type, "POST");
        let mut request = self.client.post(url).body(body.to_string());
        if let Some(content_type) = content_type {
            request = request.header("Content-Type", content_type);
        }
        let value = request
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<Value>())
            .map_err(|e| fetch_error(url, e))?;
        match unpack {
            Some(unpack) => unpack(value),
            None => Ok(value),
        }
    }
}
