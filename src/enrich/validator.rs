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

//! Structural validation of raw dictionary responses, before parsing.
//!
//! Expected response shape:
//!
//! ```text
//! [
//!     {
//!         "word": "string",
//!         "phonetic": "string",
//!         "phonetics": [{"text": "string", "audio": "string (optional)"}],
//!         "meanings": [
//!             {
//!                 "partOfSpeech": "string",
//!                 "definitions": [
//!                     {"definition": "string", "example": "string (optional)"}
//!                 ]
//!             }
//!         ]
//!     }
//! ]
//! ```

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The response list had no entries.
    EmptyResponse,
    /// A required field was absent.
    MissingField(String),
    /// A field was present but had the wrong type or an empty value.
    InvalidFieldType {
        field: String,
        expected: &'static str,
        actual: String,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyResponse => {
                write!(f, "response list is empty - no entries found")
            }
            ValidationError::MissingField(name) => {
                write!(f, "missing required field: '{name}'")
            }
            ValidationError::InvalidFieldType {
                field,
                expected,
                actual,
            } => {
                write!(f, "field '{field}' must be {expected}, got {actual}")
            }
        }
    }
}

impl Error for ValidationError {}

fn invalid(field: &str, expected: &'static str, value: &Value) -> ValidationError {
    ValidationError::InvalidFieldType {
        field: field.to_string(),
        expected,
        actual: json_type_name(value).to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Check that a raw response is well-formed enough to parse: a non-empty
/// list whose first entry carries a non-empty `word` and a non-empty
/// `meanings` list, where every meaning has a `definitions` list with at
/// least one non-empty definition.
pub fn validate(raw: &Value) -> Result<(), ValidationError> {
    let entries = raw
        .as_array()
        .ok_or_else(|| invalid("response", "a list", raw))?;
    if entries.is_empty() {
        return Err(ValidationError::EmptyResponse);
    }

    let entry = entries[0]
        .as_object()
        .ok_or_else(|| invalid("entry", "an object", &entries[0]))?;

    let word = entry
        .get("word")
        .ok_or_else(|| ValidationError::MissingField("word".to_string()))?;
    match word.as_str() {
        Some(w) if !w.trim().is_empty() => {}
        _ => return Err(invalid("word", "a non-empty string", word)),
    }

    let meanings = entry
        .get("meanings")
        .ok_or_else(|| ValidationError::MissingField("meanings".to_string()))?;
    let meanings = match meanings.as_array() {
        Some(list) if !list.is_empty() => list,
        _ => return Err(invalid("meanings", "a non-empty list", meanings)),
    };

    for meaning in meanings {
        let meaning = meaning
            .as_object()
            .ok_or_else(|| invalid("meaning", "an object", meaning))?;
        let definitions = meaning
            .get("definitions")
            .ok_or_else(|| ValidationError::MissingField("definitions".to_string()))?;
        let definitions = definitions
            .as_array()
            .ok_or_else(|| invalid("definitions", "a list", definitions))?;
        let has_valid_definition = definitions.iter().any(|definition| {
            definition
                .get("definition")
                .and_then(Value::as_str)
                .is_some_and(|text| !text.trim().is_empty())
        });
        if !has_valid_definition {
            return Err(ValidationError::InvalidFieldType {
                field: "definitions".to_string(),
                expected: "a list with at least one valid definition",
                actual: "no valid definition".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_entry() -> Value {
        json!([{
            "word": "test",
            "phonetic": "tɛst",
            "phonetics": [{"text": "tɛst", "audio": ""}],
            "origin": "Latin",
            "meanings": [
                {
                    "partOfSpeech": "noun",
                    "definitions": [
                        {
                            "definition": "A procedure to assess something.",
                            "example": "This is a test.",
                            "synonyms": [],
                            "antonyms": [],
                        }
                    ],
                }
            ],
        }])
    }

    #[test]
    fn test_valid_response() {
        assert_eq!(validate(&valid_entry()), Ok(()));
    }

    #[test]
    fn test_non_list_response() {
        let raw = json!({"word": "test"});
        match validate(&raw) {
            Err(ValidationError::InvalidFieldType { field, .. }) => assert_eq!(field, "response"),
            other => panic!("Expected InvalidFieldType, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list() {
        let raw = json!([]);
        assert_eq!(validate(&raw), Err(ValidationError::EmptyResponse));
    }

    #[test]
    fn test_missing_word() {
        let raw = json!([{"phonetic": "tɛst", "meanings": [{"definitions": [{"definition": "x"}]}]}]);
        assert_eq!(
            validate(&raw),
            Err(ValidationError::MissingField("word".to_string()))
        );
    }

    #[test]
    fn test_empty_word() {
        let raw = json!([{"word": "", "meanings": [{"definitions": [{"definition": "x"}]}]}]);
        match validate(&raw) {
            Err(ValidationError::InvalidFieldType { field, .. }) => assert_eq!(field, "word"),
            other => panic!("Expected InvalidFieldType, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_meanings() {
        let raw = json!([{"word": "test"}]);
        assert_eq!(
            validate(&raw),
            Err(ValidationError::MissingField("meanings".to_string()))
        );
    }

    #[test]
    fn test_empty_meanings() {
        let raw = json!([{"word": "test", "meanings": []}]);
        match validate(&raw) {
            Err(ValidationError::InvalidFieldType { field, .. }) => assert_eq!(field, "meanings"),
            other => panic!("Expected InvalidFieldType, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_definitions() {
        let raw = json!([{"word": "test", "meanings": [{"partOfSpeech": "noun"}]}]);
        assert_eq!(
            validate(&raw),
            Err(ValidationError::MissingField("definitions".to_string()))
        );
    }

    #[test]
    fn test_all_definitions_blank() {
        let raw = json!([{
            "word": "test",
            "meanings": [{"partOfSpeech": "noun", "definitions": [{"definition": ""}, {"definition": "   "}]}],
        }]);
        match validate(&raw) {
            Err(ValidationError::InvalidFieldType { field, actual, .. }) => {
                assert_eq!(field, "definitions");
                assert_eq!(actual, "no valid definition");
            }
            other => panic!("Expected InvalidFieldType, got {other:?}"),
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingField("word".to_string()).to_string(),
            "missing required field: 'word'"
        );
        assert_eq!(
            ValidationError::EmptyResponse.to_string(),
            "response list is empty - no entries found"
        );
    }
}
