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

//! The notification stream: each connected client joins its own user's
//! group and receives one server-sent event per completed card job.

use std::convert::Infallible;

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::Event;
use axum::response::sse::KeepAlive;
use axum::response::sse::Sse;
use futures::Stream;
use futures::StreamExt;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;

use crate::enrich::client::Transport;
use crate::server::state::ServerState;
use crate::server::state::unauthorized;
use crate::types::id::UserId;

#[derive(Deserialize)]
pub struct EventParams {
    /// Connection credential. SSE clients cannot set headers, so the
    /// token travels as a query parameter.
    token: Option<String>,
}

pub async fn events<T: Transport + 'static>(
    State(state): State<ServerState<T>>,
    Query(params): Query<EventParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)> {
    let token = params.token.ok_or_else(unauthorized)?;
    let id: i64 = token.parse().map_err(|_| unauthorized())?;
    let user = UserId::new(id);

    let receiver = state.hub.subscribe(user);
    log::debug!(
        "User {user} subscribed to notifications ({} in group).",
        state.hub.subscriber_count(user)
    );

    let stream = BroadcastStream::new(receiver).filter_map(|result| async move {
        match result {
            Ok(message) => Event::default().json_data(&message).ok().map(Ok),
            Err(error) => {
                // The subscriber lagged behind the group buffer; skip.
                log::warn!("Dropping notification for lagging subscriber: {error}");
                None
            }
        }
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
