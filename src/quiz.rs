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

//! Stratified quiz assembly: draw cards from difficulty bands by ease
//! factor, then backfill any shortfall from the rest of the pool.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::db::Database;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::id::DeckId;
use crate::types::id::UserId;

pub const DEFAULT_QUIZ_TOTAL: usize = 20;

const HARD_QUOTA: usize = 6;
const MEDIUM_QUOTA: usize = 8;
const EASY_QUOTA: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Hard,
    Medium,
    Easy,
    /// Drawn outside the band quotas to fill up a short session.
    Fallback,
}

#[derive(Clone, Debug, Serialize)]
pub struct QuizEntry {
    pub difficulty: Difficulty,
    pub card: Card,
}

/// Assemble a quiz session of up to `total` cards from the user's decks.
///
/// Each difficulty band is sampled without replacement up to its quota;
/// quotas are soft, and any shortfall is backfilled from the remaining
/// candidates. The result is shorter than `total` only when the candidate
/// pool itself is. No card appears twice.
pub fn sample_quiz(
    db: &Database,
    user: UserId,
    deck_ids: &[DeckId],
    total: usize,
) -> Fallible<Vec<QuizEntry>> {
    let mut rng = rand::thread_rng();
    let mut entries: Vec<QuizEntry> = Vec::new();
    let mut drawn: HashSet<_> = HashSet::new();

    let bands = [
        (Difficulty::Hard, 1.3, Some(2.0), HARD_QUOTA),
        (Difficulty::Medium, 2.0, Some(3.5), MEDIUM_QUOTA),
        (Difficulty::Easy, 3.5, None, EASY_QUOTA),
    ];
    for (difficulty, lo, hi, quota) in bands {
        let mut cards = db.cards_in_ease_range(user, deck_ids, lo, hi)?;
        cards.shuffle(&mut rng);
        for card in cards.into_iter().take(quota) {
            drawn.insert(card.card_id);
            entries.push(QuizEntry { difficulty, card });
        }
    }
    entries.truncate(total);

    if entries.len() < total {
        let mut pool: Vec<Card> = db
            .cards_in_ease_range(user, deck_ids, 0.0, None)?
            .into_iter()
            .filter(|card| !drawn.contains(&card.card_id))
            .collect();
        pool.shuffle(&mut rng);
        for card in pool.into_iter().take(total - entries.len()) {
            entries.push(QuizEntry {
                difficulty: Difficulty::Fallback,
                card,
            });
        }
    }

    log::debug!(
        "Sampled {} quiz cards for user {user} across {} decks.",
        entries.len(),
        deck_ids.len()
    );
    Ok(entries)
}
