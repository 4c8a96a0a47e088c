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

use crate::types::id::CardId;
use crate::types::id::DeckId;
use crate::types::id::UserId;
use crate::types::payload::EnrichedWordPayload;
use crate::types::timestamp::Timestamp;

/// Review scheduling parameters of a card. Owned exclusively by the card
/// and recomputed as a whole on every review: one update writes all five
/// fields.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SchedulingState {
    /// The most recent feedback grade, in `0..=max_quality`.
    pub quality: u8,
    pub ease_factor: f64,
    /// Count of consecutive successful reviews. Always a whole number.
    pub repetitions: u32,
    /// Review interval in days. Stored fractional; rounded to whole days
    /// only when the due date is computed.
    pub interval: f64,
    pub due_date: Timestamp,
}

/// A vocabulary flashcard.
#[derive(Clone, Debug, Serialize)]
pub struct Card {
    pub card_id: CardId,
    pub deck_id: DeckId,
    pub word: String,
    pub payload: EnrichedWordPayload,
    pub scheduling: SchedulingState,
}

/// A named, per-user collection of cards.
#[derive(Clone, Debug, Serialize)]
pub struct Deck {
    pub deck_id: DeckId,
    pub user_id: UserId,
    pub deck_name: String,
    pub created_at: Timestamp,
}
