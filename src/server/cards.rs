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

//! Card and deck plumbing: submission, browsing, deletion.

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use crate::enrich::client::Transport;
use crate::server::state::ServerState;
use crate::server::state::authenticate;
use crate::server::state::internal_error;
use crate::types::card::Card;
use crate::types::card::Deck;
use crate::types::id::CardId;
use crate::types::id::DeckId;

// The longest word in English, 'pneumonoultramicroscopicsilicovolcanoconiosis',
// has 45 characters.
const MAX_WORD_LENGTH: usize = 45;

#[derive(Deserialize)]
pub struct CreateCardRequest {
    word: String,
    deck_name: String,
}

#[derive(Serialize)]
pub struct QueuedResponse {
    status: &'static str,
    word: String,
}

/// Submit a word for enrichment. Returns immediately; the outcome arrives
/// through the notification channel.
pub async fn create_card<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    headers: HeaderMap,
    Json(request): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<QueuedResponse>), (StatusCode, String)> {
    let user = authenticate(&headers)?;
    let word = request.word.trim().to_string();
    if word.is_empty() || word.len() > MAX_WORD_LENGTH {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("word must be between 1 and {MAX_WORD_LENGTH} characters"),
        ));
    }
    let deck_name = request.deck_name.trim().to_string();
    if deck_name.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "deck_name must not be empty".to_string(),
        ));
    }
    log::debug!("Queueing card job for '{word}' in deck '{deck_name}'.");
    // The job runs detached; its outcome arrives via the event stream.
    let _ = state.jobs.enqueue(word.clone(), deck_name, user);
    Ok((
        StatusCode::ACCEPTED,
        Json(QueuedResponse {
            status: "queued",
            word,
        }),
    ))
}

#[derive(Deserialize)]
pub struct SearchParams {
    search: Option<String>,
}

pub async fn list_decks<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Deck>>, (StatusCode, String)> {
    let user = authenticate(&headers)?;
    let decks = state
        .db
        .list_decks(user, params.search.as_deref())
        .map_err(internal_error)?;
    Ok(Json(decks))
}

pub async fn list_cards<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    headers: HeaderMap,
    Path(deck_id): Path<i64>,
) -> Result<Json<Vec<Card>>, (StatusCode, String)> {
    let user = authenticate(&headers)?;
    let cards = state
        .db
        .list_cards(user, DeckId::new(deck_id))
        .map_err(internal_error)?;
    Ok(Json(cards))
}

pub async fn delete_deck<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    headers: HeaderMap,
    Path(deck_id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    let user = authenticate(&headers)?;
    let deleted = state
        .db
        .delete_deck(DeckId::new(deck_id), user)
        .map_err(internal_error)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "deck not found".to_string()))
    }
}

pub async fn delete_card<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    headers: HeaderMap,
    Path(card_id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    let user = authenticate(&headers)?;
    let deleted = state
        .db
        .delete_card(CardId::new(card_id), user)
        .map_err(internal_error)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "card not found".to_string()))
    }
}
