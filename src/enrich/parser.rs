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

//! Parsing of validated dictionary responses into card payloads.

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

use crate::types::payload::DefinitionEntry;
use crate::types::payload::EnrichedWordPayload;

/// Label for meanings that carry no part of speech.
pub const UNKNOWN_PART_OF_SPEECH: &str = "unknown";

/// Extract a card payload from a validated response. Groups definitions
/// by part of speech, keeping at most `max_definitions` per group in
/// source order.
pub fn parse(raw: &Value, max_definitions: usize) -> EnrichedWordPayload {
    let empty = Map::new();
    let entry = raw
        .get(0)
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    EnrichedWordPayload {
        word: string_field(entry, "word"),
        phonetic: string_field(entry, "phonetic"),
        audio: parse_audio(entry),
        definitions: group_definitions(entry, max_definitions),
    }
}

fn string_field(entry: &Map<String, Value>, field: &str) -> String {
    entry
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// The first non-empty audio URL across the phonetic entries.
fn parse_audio(entry: &Map<String, Value>) -> Option<String> {
    let phonetics = entry.get("phonetics").and_then(Value::as_array)?;
    for phonetic in phonetics {
        if let Some(audio) = phonetic.get("audio").and_then(Value::as_str) {
            if !audio.is_empty() {
                return Some(audio.to_string());
            }
        }
    }
    None
}

fn group_definitions(
    entry: &Map<String, Value>,
    max_definitions: usize,
) -> BTreeMap<String, Vec<DefinitionEntry>> {
    let mut grouped: BTreeMap<String, Vec<DefinitionEntry>> = BTreeMap::new();
    let Some(meanings) = entry.get("meanings").and_then(Value::as_array) else {
        return grouped;
    };
    for meaning in meanings {
        let label = meaning
            .get("partOfSpeech")
            .and_then(Value::as_str)
            .filter(|label| !label.is_empty())
            .unwrap_or(UNKNOWN_PART_OF_SPEECH);
        // Meanings repeating a part of speech merge into one group.
        let group = grouped.entry(label.to_string()).or_default();
        let Some(definitions) = meaning.get("definitions").and_then(Value::as_array) else {
            continue;
        };
        for definition in definitions {
            if group.len() >= max_definitions {
                break;
            }
            if let Some(parsed) = transform_definition(definition) {
                group.push(parsed);
            }
        }
    }
    grouped
}

fn transform_definition(definition: &Value) -> Option<DefinitionEntry> {
    let text = definition.get("definition").and_then(Value::as_str)?;
    if text.trim().is_empty() {
        return None;
    }
    let example = definition
        .get("example")
        .and_then(Value::as_str)
        .filter(|example| !example.trim().is_empty())
        .map(String::from);
    Some(DefinitionEntry {
        definition: text.to_string(),
        example,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_entry() -> Value {
        json!([{
            "word": "test",
            "phonetic": "tɛst",
            "phonetics": [{"text": "tɛst", "audio": "https://audio.test/test.mp3"}],
            "origin": "Latin",
            "meanings": [
                {
                    "partOfSpeech": "noun",
                    "definitions": [
                        {"definition": "A procedure to assess something.", "example": "This is a test."},
                        {"definition": "Another definition without example."},
                    ],
                },
                {
                    "partOfSpeech": "verb",
                    "definitions": [
                        {"definition": "To carry out a test."}
                    ],
                },
            ],
        }])
    }

    #[test]
    fn test_parse_word_basic() {
        let payload = parse(&valid_entry(), 5);
        assert_eq!(payload.word, "test");
        assert_eq!(payload.phonetic, "tɛst");
        assert_eq!(payload.audio.as_deref(), Some("https://audio.test/test.mp3"));
        assert!(payload.definitions.contains_key("noun"));
        assert!(payload.definitions.contains_key("verb"));
    }

    #[test]
    fn test_definitions_grouped_in_source_order() {
        let payload = parse(&valid_entry(), 5);
        let nouns = &payload.definitions["noun"];
        assert_eq!(nouns.len(), 2);
        assert_eq!(nouns[0].definition, "A procedure to assess something.");
        assert_eq!(nouns[0].example.as_deref(), Some("This is a test."));
        assert_eq!(nouns[1].definition, "Another definition without example.");
        assert_eq!(nouns[1].example, None);
    }

    #[test]
    fn test_max_definitions_limit() {
        let raw = json!([{
            "word": "test",
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [
                    {"definition": "one"},
                    {"definition": "two"},
                    {"definition": "three"},
                    {"definition": "four"},
                    {"definition": "five"},
                ],
            }],
        }]);
        let payload = parse(&raw, 2);
        let nouns = &payload.definitions["noun"];
        assert_eq!(nouns.len(), 2);
        assert_eq!(nouns[0].definition, "one");
        assert_eq!(nouns[1].definition, "two");
    }

    #[test]
    fn test_empty_definitions_skipped() {
        let raw = json!([{
            "word": "example",
            "phonetic": "ɪgˈzɑːmpəl",
            "phonetics": [{"text": "ɪgˈzɑːmpəl", "audio": ""}],
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [
                    {"definition": ""},
                    {"definition": "A representative instance."},
                ],
            }],
        }]);
        let payload = parse(&raw, 5);
        let nouns = &payload.definitions["noun"];
        assert_eq!(nouns.len(), 1);
        assert_eq!(nouns[0].definition, "A representative instance.");
        assert_eq!(nouns[0].example, None);
    }

    #[test]
    fn test_blank_example_becomes_absent() {
        let raw = json!([{
            "word": "test",
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{"definition": "A thing.", "example": "   "}],
            }],
        }]);
        let payload = parse(&raw, 5);
        assert_eq!(payload.definitions["noun"][0].example, None);
    }

    #[test]
    fn test_no_phonetics_audio() {
        let raw = json!([{
            "word": "empty",
            "phonetic": "",
            "phonetics": [],
            "meanings": [{"partOfSpeech": "noun", "definitions": [{"definition": "Nothingness"}]}],
        }]);
        let payload = parse(&raw, 5);
        assert_eq!(payload.audio, None);
        assert_eq!(payload.phonetic, "");
    }

    #[test]
    fn test_first_audio_url_wins() {
        let raw = json!([{
            "word": "test",
            "phonetics": [
                {"text": "a", "audio": ""},
                {"text": "b", "audio": "https://audio.test/first.mp3"},
                {"text": "c", "audio": "https://audio.test/second.mp3"},
            ],
            "meanings": [{"partOfSpeech": "noun", "definitions": [{"definition": "x"}]}],
        }]);
        let payload = parse(&raw, 5);
        assert_eq!(payload.audio.as_deref(), Some("https://audio.test/first.mp3"));
    }

    #[test]
    fn test_missing_part_of_speech_defaults_to_unknown() {
        let raw = json!([{
            "word": "foo",
            "meanings": [{"definitions": [{"definition": "A test"}]}],
        }]);
        let payload = parse(&raw, 5);
        let group = &payload.definitions[UNKNOWN_PART_OF_SPEECH];
        assert_eq!(group[0].definition, "A test");
        assert_eq!(group[0].example, None);
    }

    #[test]
    fn test_part_of_speech_with_no_usable_definitions_kept_empty() {
        let raw = json!([{
            "word": "foo",
            "meanings": [
                {"partOfSpeech": "noun", "definitions": [{"definition": "A thing."}]},
                {"partOfSpeech": "interjection", "definitions": [{"definition": ""}]},
            ],
        }]);
        let payload = parse(&raw, 5);
        assert_eq!(payload.definitions["interjection"].len(), 0);
        assert_eq!(payload.definitions["noun"].len(), 1);
    }

    #[test]
    fn test_repeated_part_of_speech_merges() {
        let raw = json!([{
            "word": "run",
            "meanings": [
                {"partOfSpeech": "verb", "definitions": [{"definition": "To move fast."}]},
                {"partOfSpeech": "verb", "definitions": [{"definition": "To operate."}]},
            ],
        }]);
        let payload = parse(&raw, 5);
        let verbs = &payload.definitions["verb"];
        assert_eq!(verbs.len(), 2);
        assert_eq!(verbs[0].definition, "To move fast.");
        assert_eq!(verbs[1].definition, "To operate.");
    }
}
