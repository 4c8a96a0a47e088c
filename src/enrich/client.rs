// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;

use crate::enrich::EnrichError;
use crate::error::Fallible;

pub const DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// An HTTP-like response before any interpretation.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The source of raw word data. The production implementation talks HTTP;
/// tests substitute canned responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, EnrichError>;
}

/// [`Transport`] over a real HTTP client with a bounded timeout and no
/// retries.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Fallible<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, EnrichError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EnrichError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| EnrichError::Network(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

/// Fetches raw dictionary data for a single word.
pub struct DictClient<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> DictClient<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.to_string(),
        }
    }

    pub async fn fetch(&self, word: &str) -> Result<RawResponse, EnrichError> {
        let encoded = utf8_percent_encode(word, NON_ALPHANUMERIC);
        let url = format!("{}{}", self.base_url, encoded);
        log::debug!("Fetching word data from {url}");
        self.transport.get(&url).await
    }
}

/// Map an HTTP status to a domain error, or pass the response through.
pub fn classify_status(status: u16, word: &str) -> Option<EnrichError> {
    match status {
        204 => Some(EnrichError::EmptyResult {
            word: word.to_string(),
        }),
        400..=403 => Some(EnrichError::BadRequest {
            status,
            word: word.to_string(),
        }),
        404 => Some(EnrichError::WordNotFound {
            word: word.to_string(),
        }),
        429 | 500..=599 => Some(EnrichError::ServiceUnavailable {
            status,
            word: word.to_string(),
        }),
        _ => None,
    }
}
