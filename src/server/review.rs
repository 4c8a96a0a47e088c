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

//! Review submission and the daily review counter.

use axum::Json;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use crate::enrich::client::Transport;
use crate::scheduler;
use crate::server::state::ServerState;
use crate::server::state::authenticate;
use crate::server::state::internal_error;
use crate::types::card::SchedulingState;
use crate::types::date::Date;
use crate::types::id::CardId;
use crate::types::timestamp::Timestamp;

#[derive(Deserialize)]
pub struct ReviewRequest {
    quality: u8,
}

/// Record review feedback for a card and return its new scheduling
/// state. The feedback grade is validated here, before the scheduler is
/// called.
pub async fn review_card<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    headers: HeaderMap,
    Path(card_id): Path<i64>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<SchedulingState>, (StatusCode, String)> {
    let user = authenticate(&headers)?;
    let max_quality = state.scheduler.max_quality();
    if request.quality > max_quality {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("quality must be between 0 and {max_quality}"),
        ));
    }
    let card_id = CardId::new(card_id);
    let card = state
        .db
        .get_card(card_id, user)
        .map_err(internal_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "card not found".to_string()))?;

    let current = card.scheduling;
    let next = scheduler::compute(
        current.repetitions,
        current.interval,
        current.ease_factor,
        request.quality,
        &state.scheduler,
        Timestamp::now(),
    );
    let updated = state
        .db
        .update_scheduling(card_id, user, &next)
        .map_err(internal_error)?;
    if !updated {
        return Err((StatusCode::NOT_FOUND, "card not found".to_string()));
    }
    log::debug!(
        "Reviewed card {card_id} with quality {}: repetitions={} interval={:.2}d ef={:.2}",
        request.quality,
        next.repetitions,
        next.interval,
        next.ease_factor
    );
    Ok(Json(next))
}

#[derive(Serialize)]
pub struct TodayStats {
    date: Date,
    count: u64,
}

/// How many review sessions the caller has started today.
pub async fn today_stats<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    headers: HeaderMap,
) -> Result<Json<TodayStats>, (StatusCode, String)> {
    let user = authenticate(&headers)?;
    let date = Date::today();
    let count = state.db.daily_stat(user, date).map_err(internal_error)?;
    Ok(Json(TodayStats { date, count }))
}
