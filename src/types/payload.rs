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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// A single dictionary definition with an optional usage example.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionEntry {
    pub definition: String,
    /// Absent rather than empty: a blank example from the provider is
    /// dropped during parsing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// The displayable content of a card, produced once by the enrichment
/// pipeline and stored verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedWordPayload {
    pub word: String,
    pub phonetic: String,
    /// The first non-empty pronunciation audio URL, if the provider has one.
    pub audio: Option<String>,
    /// Definitions grouped by part of speech. A part of speech with no
    /// usable definitions keeps its (empty) entry: the word still has that
    /// part of speech even when no definition qualified.
    pub definitions: BTreeMap<String, Vec<DefinitionEntry>>,
}
