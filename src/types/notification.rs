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

use serde::Serialize;

use crate::types::payload::EnrichedWordPayload;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Error,
}

/// One message per completed card job, delivered to the owning user's
/// notification group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NotificationMessage {
    pub status: NotificationStatus,
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<EnrichedWordPayload>,
}

impl NotificationMessage {
    pub fn success(kind: &'static str, message: String, payload: EnrichedWordPayload) -> Self {
        Self {
            status: NotificationStatus::Success,
            kind,
            message,
            payload: Some(payload),
        }
    }

    pub fn error(kind: &'static str, message: String) -> Self {
        Self {
            status: NotificationStatus::Error,
            kind,
            message,
            payload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_shape() {
        let message = NotificationMessage::error("card_exists", "Word already in the deck.".to_string());
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["kind"], "card_exists");
        assert!(json.get("payload").is_none());
    }
}
