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

//! Turning a bare word into a displayable card payload through an
//! external dictionary lookup: fetch, status check, validate, parse.

pub mod client;
pub mod parser;
pub mod validator;

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use serde_json::Value;

use crate::enrich::client::DictClient;
use crate::enrich::client::Transport;
use crate::enrich::client::classify_status;
use crate::enrich::parser::parse;
use crate::enrich::validator::ValidationError;
use crate::enrich::validator::validate;
use crate::types::payload::EnrichedWordPayload;

/// Everything that can go wrong between a word and its payload. Carried
/// outward in the job's notification; never retried internally.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichError {
    /// Transport-level failure: timeout, refused connection, I/O.
    Network(String),
    /// The provider rejected the request (HTTP 400-403).
    BadRequest { status: u16, word: String },
    /// The provider has no data for the word (HTTP 404).
    WordNotFound { word: String },
    /// The provider is down or throttling (HTTP 429 or 5xx).
    ServiceUnavailable { status: u16, word: String },
    /// The provider answered with no content (HTTP 204).
    EmptyResult { word: String },
    /// The response arrived but its structure is unusable.
    Validation(ValidationError),
}

impl EnrichError {
    /// Stable machine-readable tag, used as the notification kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EnrichError::Network(_) => "network_error",
            EnrichError::BadRequest { .. } => "bad_request",
            EnrichError::WordNotFound { .. } => "word_not_found",
            EnrichError::ServiceUnavailable { .. } => "service_unavailable",
            EnrichError::EmptyResult { .. } => "empty_result",
            EnrichError::Validation(_) => "invalid_response",
        }
    }
}

impl Display for EnrichError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichError::Network(message) => {
                write!(f, "network error while fetching word data: {message}")
            }
            EnrichError::BadRequest { status, word } => {
                write!(f, "request for word '{word}' was rejected with status {status}")
            }
            EnrichError::WordNotFound { word } => {
                write!(
                    f,
                    "Data not available for word '{word}'. Are you sure you spelled it correctly?"
                )
            }
            EnrichError::ServiceUnavailable { status, word } => {
                write!(
                    f,
                    "dictionary service unavailable (status {status}) while fetching '{word}'"
                )
            }
            EnrichError::EmptyResult { word } => {
                write!(f, "the dictionary returned no content for word '{word}'")
            }
            EnrichError::Validation(error) => write!(f, "{error}"),
        }
    }
}

impl Error for EnrichError {}

impl From<ValidationError> for EnrichError {
    fn from(error: ValidationError) -> Self {
        EnrichError::Validation(error)
    }
}

/// Orchestrates client, validator and parser into a single call.
pub struct EnrichmentPipeline<T> {
    client: DictClient<T>,
    max_definitions: usize,
}

impl<T: Transport> EnrichmentPipeline<T> {
    pub fn new(transport: T, base_url: &str, max_definitions: usize) -> Self {
        Self {
            client: DictClient::new(transport, base_url),
            max_definitions,
        }
    }

    /// Fetch, validate and parse data for a given word.
    pub async fn enrich(&self, word: &str) -> Result<EnrichedWordPayload, EnrichError> {
        let raw = self.client.fetch(word).await?;
        if let Some(error) = classify_status(raw.status, word) {
            log::warn!("Status {} indicates error for word '{word}': {error}", raw.status);
            return Err(error);
        }
        let json: Value = serde_json::from_str(&raw.body).map_err(|_| {
            ValidationError::InvalidFieldType {
                field: "response".to_string(),
                expected: "a JSON document",
                actual: "unparseable text".to_string(),
            }
        })?;
        validate(&json)?;
        Ok(parse(&json, self.max_definitions))
    }
}
