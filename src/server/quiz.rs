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

use axum::Json;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::enrich::client::Transport;
use crate::quiz::DEFAULT_QUIZ_TOTAL;
use crate::quiz::QuizEntry;
use crate::quiz::sample_quiz;
use crate::server::state::ServerState;
use crate::server::state::authenticate;
use crate::server::state::internal_error;
use crate::types::date::Date;
use crate::types::id::DeckId;

#[derive(Deserialize)]
pub struct QuizParams {
    /// Comma-separated deck ids.
    decks: String,
    total: Option<usize>,
}

/// Assemble a quiz session from the given decks. Starting a session also
/// bumps the caller's daily review counter.
pub async fn quiz<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    headers: HeaderMap,
    Query(params): Query<QuizParams>,
) -> Result<Json<Vec<QuizEntry>>, (StatusCode, String)> {
    let user = authenticate(&headers)?;
    let deck_ids = parse_deck_ids(&params.decks)?;
    let total = params.total.unwrap_or(DEFAULT_QUIZ_TOTAL);
    state
        .db
        .increment_daily_stat(user, Date::today())
        .map_err(internal_error)?;
    let entries = sample_quiz(&state.db, user, &deck_ids, total).map_err(internal_error)?;
    Ok(Json(entries))
}

fn parse_deck_ids(decks: &str) -> Result<Vec<DeckId>, (StatusCode, String)> {
    let mut deck_ids = Vec::new();
    for part in decks.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id: i64 = part.parse().map_err(|_| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("invalid deck id: '{part}'"),
            )
        })?;
        deck_ids.push(DeckId::new(id));
    }
    Ok(deck_ids)
}
