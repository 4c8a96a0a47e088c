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

//! Shared test fixtures.

use async_trait::async_trait;

use crate::enrich::EnrichError;
use crate::enrich::client::RawResponse;
use crate::enrich::client::Transport;

/// A transport that answers every request with the same canned response.
#[derive(Clone)]
pub struct StubTransport {
    status: u16,
    body: String,
}

impl StubTransport {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, _url: &str) -> Result<RawResponse, EnrichError> {
        Ok(RawResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

/// A well-formed dictionary response for the word "test", with three noun
/// definitions and one verb definition.
pub fn sample_entry_body() -> String {
    serde_json::json!([{
        "word": "test",
        "phonetic": "tɛst",
        "phonetics": [
            {"text": "tɛst", "audio": ""},
            {"text": "tɛst", "audio": "https://audio.test/test.mp3"},
        ],
        "origin": "Latin",
        "meanings": [
            {
                "partOfSpeech": "noun",
                "definitions": [
                    {"definition": "A procedure to assess something.", "example": "This is a test."},
                    {"definition": "A cupel or cupelling hearth."},
                    {"definition": "A challenge, trial."},
                ],
            },
            {
                "partOfSpeech": "verb",
                "definitions": [
                    {"definition": "To carry out a test.", "example": " "},
                ],
            },
        ],
    }])
    .to_string()
}
