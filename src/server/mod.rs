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

mod cards;
mod events;
mod quiz;
mod review;
mod state;

use std::time::Duration;

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::db::Database;
use crate::enrich::EnrichmentPipeline;
use crate::enrich::client::HttpTransport;
use crate::enrich::client::Transport;
use crate::error::Fallible;
use crate::job::JobRunner;
use crate::notify::NotificationHub;
pub use crate::server::state::ServerState;

pub fn router<T: Transport + 'static>(state: ServerState<T>) -> Router {
    let app = Router::new();
    let app = app.route("/cards", post(cards::create_card::<T>));
    let app = app.route("/cards/{card_id}", delete(cards::delete_card::<T>));
    let app = app.route("/cards/{card_id}/review", post(review::review_card::<T>));
    let app = app.route("/decks", get(cards::list_decks::<T>));
    let app = app.route("/decks/{deck_id}", delete(cards::delete_deck::<T>));
    let app = app.route("/decks/{deck_id}/cards", get(cards::list_cards::<T>));
    let app = app.route("/quiz", get(quiz::quiz::<T>));
    let app = app.route("/events", get(events::events::<T>));
    let app = app.route("/stats/today", get(review::today_stats::<T>));
    app.with_state(state)
}

/// Wire the concrete implementations together and serve. The scheduler
/// tunables are validated here; an out-of-range value aborts startup.
pub async fn start_server(
    config: Config,
    db_path: &str,
    bind_override: Option<String>,
) -> Fallible<()> {
    let scheduler = config.scheduler.build()?;
    let db = Database::new(db_path)?;
    let hub = NotificationHub::new();
    let transport = HttpTransport::new(Duration::from_secs(config.enrichment.timeout_secs))?;
    let pipeline = EnrichmentPipeline::new(
        transport,
        &config.enrichment.api_url,
        config.enrichment.max_definitions,
    );
    let jobs = JobRunner::new(
        db.clone(),
        hub.clone(),
        pipeline,
        config.enrichment.initial_ease_factor,
    );
    let state = ServerState {
        db,
        hub,
        jobs,
        scheduler,
    };
    let app = router(state);

    let bind = bind_override.unwrap_or(config.server.bind);
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
