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

//! Asynchronous card creation: run the enrichment pipeline, persist the
//! card, and notify the owner. Jobs run detached from the request that
//! triggered them.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::db::Database;
use crate::enrich::EnrichmentPipeline;
use crate::enrich::client::Transport;
use crate::error::Fallible;
use crate::notify::NotificationHub;
use crate::types::card::SchedulingState;
use crate::types::id::UserId;
use crate::types::notification::NotificationMessage;
use crate::types::timestamp::Timestamp;

/// Spawns and executes card creation jobs.
pub struct JobRunner<T> {
    db: Database,
    hub: NotificationHub,
    pipeline: Arc<EnrichmentPipeline<T>>,
    initial_ease_factor: f64,
}

impl<T> Clone for JobRunner<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            hub: self.hub.clone(),
            pipeline: Arc::clone(&self.pipeline),
            initial_ease_factor: self.initial_ease_factor,
        }
    }
}

impl<T: Transport + 'static> JobRunner<T> {
    pub fn new(
        db: Database,
        hub: NotificationHub,
        pipeline: EnrichmentPipeline<T>,
        initial_ease_factor: f64,
    ) -> Self {
        Self {
            db,
            hub,
            pipeline: Arc::new(pipeline),
            initial_ease_factor,
        }
    }

    /// Fire-and-forget submission. The returned handle is informational;
    /// the job is not cancelled by dropping it.
    pub fn enqueue(&self, word: String, deck_name: String, user: UserId) -> JoinHandle<()> {
        let runner = self.clone();
        tokio::spawn(async move {
            runner.run(&word, &deck_name, user).await;
        })
    }

    /// Run a job to completion. Exactly one notification is published
    /// regardless of outcome; unexpected failures are downgraded to an
    /// error notification at this boundary.
    pub async fn run(&self, word: &str, deck_name: &str, user: UserId) {
        let message = match self.execute(word, deck_name, user).await {
            Ok(message) => message,
            Err(error) => {
                log::error!("Card job for '{word}' failed: {error}");
                NotificationMessage::error("exception", error.to_string())
            }
        };
        log::debug!(
            "Publishing {:?} notification '{}' to user {user}.",
            message.status,
            message.kind
        );
        self.hub.publish(user, message);
    }

    async fn execute(
        &self,
        word: &str,
        deck_name: &str,
        user: UserId,
    ) -> Fallible<NotificationMessage> {
        let deck_id = self.db.get_or_create_deck(user, deck_name)?;
        if self.db.card_exists(deck_id, word)? {
            return Ok(duplicate_message(word, deck_name));
        }

        let payload = match self.pipeline.enrich(word).await {
            Ok(payload) => payload,
            Err(error) => {
                log::warn!("Enrichment failed for '{word}': {error}");
                return Ok(NotificationMessage::error(error.kind(), error.to_string()));
            }
        };

        let state = SchedulingState {
            quality: 0,
            ease_factor: self.initial_ease_factor,
            repetitions: 0,
            interval: 1.0,
            due_date: Timestamp::now(),
        };
        // The existence check above and this insert are separate
        // statements; the uniqueness constraint catches submissions that
        // raced between them.
        match self.db.insert_card(deck_id, &payload.word, &payload, &state)? {
            Some(card_id) => {
                log::debug!("Created card {card_id} for '{}'.", payload.word);
                let text = format!("Card for '{}' created.", payload.word);
                Ok(NotificationMessage::success("card_created", text, payload))
            }
            None => Ok(duplicate_message(word, deck_name)),
        }
    }
}

fn duplicate_message(word: &str, deck_name: &str) -> NotificationMessage {
    NotificationMessage::error(
        "card_exists",
        format!("Word already in the deck: '{word}' is in '{deck_name}'."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::helper::StubTransport;
    use crate::helper::sample_entry_body;
    use crate::types::notification::NotificationStatus;

    const BASE_URL: &str = "https://dictionary.invalid/entries/en/";

    fn runner(status: u16, body: &str) -> (JobRunner<StubTransport>, Database, NotificationHub) {
        let db = Database::new(":memory:").unwrap();
        let hub = NotificationHub::new();
        let pipeline = EnrichmentPipeline::new(StubTransport::new(status, body), BASE_URL, 2);
        let runner = JobRunner::new(db.clone(), hub.clone(), pipeline, 1.3);
        (runner, db, hub)
    }

    #[tokio::test]
    async fn test_successful_job_creates_card_and_notifies() {
        let (runner, db, hub) = runner(200, &sample_entry_body());
        let user = UserId::new(1);
        let mut receiver = hub.subscribe(user);

        runner.run("test", "words", user).await;

        let message = receiver.recv().await.unwrap();
        assert_eq!(message.status, NotificationStatus::Success);
        assert_eq!(message.kind, "card_created");
        assert_eq!(message.payload.as_ref().unwrap().word, "test");
        // Exactly one message was published.
        assert!(receiver.try_recv().is_err());

        let deck = db.get_or_create_deck(user, "words").unwrap();
        let cards = db.list_cards(user, deck).unwrap();
        assert_eq!(cards.len(), 1);
        let scheduling = cards[0].scheduling;
        assert_eq!(scheduling.repetitions, 0);
        assert_eq!(scheduling.interval, 1.0);
        assert!((scheduling.ease_factor - 1.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_word_not_found_notifies_and_persists_nothing() {
        let (runner, db, hub) = runner(404, "[]");
        let user = UserId::new(1);
        let mut receiver = hub.subscribe(user);

        runner.run("catt", "words", user).await;

        let message = receiver.recv().await.unwrap();
        assert_eq!(message.status, NotificationStatus::Error);
        assert_eq!(message.kind, "word_not_found");
        assert!(message.payload.is_none());

        let deck = db.get_or_create_deck(user, "words").unwrap();
        assert!(db.list_cards(user, deck).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_word_rejected() {
        let (runner, db, hub) = runner(200, &sample_entry_body());
        let user = UserId::new(1);
        let mut receiver = hub.subscribe(user);

        runner.run("test", "words", user).await;
        receiver.recv().await.unwrap();
        // The check is case-insensitive.
        runner.run("TEST", "words", user).await;

        let message = receiver.recv().await.unwrap();
        assert_eq!(message.kind, "card_exists");

        let deck = db.get_or_create_deck(user, "words").unwrap();
        assert_eq!(db.list_cards(user, deck).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_response_notifies_error() {
        let (runner, _db, hub) = runner(200, r#"[{"word": "cat"}]"#);
        let user = UserId::new(1);
        let mut receiver = hub.subscribe(user);

        runner.run("cat", "words", user).await;

        let message = receiver.recv().await.unwrap();
        assert_eq!(message.kind, "invalid_response");
    }

    #[tokio::test]
    async fn test_job_without_subscriber_completes_quietly() {
        let (runner, db, _hub) = runner(200, &sample_entry_body());
        let user = UserId::new(1);
        runner.run("test", "words", user).await;
        let deck = db.get_or_create_deck(user, "words").unwrap();
        assert_eq!(db.list_cards(user, deck).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_enqueue_runs_detached() {
        let (runner, db, hub) = runner(200, &sample_entry_body());
        let user = UserId::new(1);
        let mut receiver = hub.subscribe(user);
        let handle = runner.enqueue("test".to_string(), "words".to_string(), user);
        handle.await.unwrap();
        assert_eq!(receiver.recv().await.unwrap().kind, "card_created");
        let deck = db.get_or_create_deck(user, "words").unwrap();
        assert_eq!(db.list_cards(user, deck).unwrap().len(), 1);
    }
}
