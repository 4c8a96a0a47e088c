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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::ToSql;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card::Deck;
use crate::types::card::SchedulingState;
use crate::types::date::Date;
use crate::types::id::CardId;
use crate::types::id::DeckId;
use crate::types::id::UserId;
use crate::types::payload::EnrichedWordPayload;
use crate::types::timestamp::Timestamp;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// Find the deck with the given name, creating it if it does not
    /// exist. Idempotent.
    pub fn get_or_create_deck(&self, user: UserId, deck_name: &str) -> Fallible<DeckId> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        tx.execute(
            "insert into decks (user_id, deck_name, created_at) values (?, ?, ?) on conflict (user_id, deck_name) do nothing;",
            (user, deck_name, Timestamp::now()),
        )?;
        let deck_id: DeckId = tx.query_row(
            "select deck_id from decks where user_id = ? and deck_name = ?;",
            (user, deck_name),
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(deck_id)
    }

    /// List a user's decks, newest first, optionally filtered by a name
    /// prefix.
    pub fn list_decks(&self, user: UserId, search: Option<&str>) -> Fallible<Vec<Deck>> {
        let conn = self.acquire();
        let mut decks = Vec::new();
        let sql = "select deck_id, user_id, deck_name, created_at from decks where user_id = ? and deck_name like ? || '%' order by created_at desc;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query((user, search.unwrap_or("")))?;
        while let Some(row) = rows.next()? {
            decks.push(Deck {
                deck_id: row.get(0)?,
                user_id: row.get(1)?,
                deck_name: row.get(2)?,
                created_at: row.get(3)?,
            });
        }
        Ok(decks)
    }

    /// Delete a user's deck and, through the foreign key, its cards.
    /// Returns false if the deck does not exist or belongs to someone
    /// else.
    pub fn delete_deck(&self, deck: DeckId, owner: UserId) -> Fallible<bool> {
        let conn = self.acquire();
        let affected = conn.execute(
            "delete from decks where deck_id = ? and user_id = ?;",
            (deck, owner),
        )?;
        Ok(affected > 0)
    }

    /// Whether the deck already holds a card for this word. The word
    /// column is case-insensitive.
    pub fn card_exists(&self, deck: DeckId, word: &str) -> Fallible<bool> {
        let conn = self.acquire();
        let count: i64 = conn.query_row(
            "select count(*) from cards where deck_id = ? and word = ?;",
            (deck, word),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert a new card. Returns `None` when the deck already holds the
    /// word: the uniqueness constraint is the last line of defense
    /// against concurrent submissions of the same word.
    pub fn insert_card(
        &self,
        deck: DeckId,
        word: &str,
        payload: &EnrichedWordPayload,
        state: &SchedulingState,
    ) -> Fallible<Option<CardId>> {
        let payload_json = serde_json::to_string(payload)?;
        let conn = self.acquire();
        let sql = "insert into cards (deck_id, word, payload, quality, ease_factor, repetitions, interval, due_date) values (?, ?, ?, ?, ?, ?, ?, ?) returning card_id;";
        let result = conn.query_row(
            sql,
            (
                deck,
                word,
                &payload_json,
                state.quality,
                state.ease_factor,
                state.repetitions,
                state.interval,
                state.due_date,
            ),
            |row| row.get(0),
        );
        match result {
            Ok(card_id) => Ok(Some(card_id)),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a card by id, checking ownership.
    pub fn get_card(&self, card: CardId, owner: UserId) -> Fallible<Option<Card>> {
        let conn = self.acquire();
        let sql = "select c.card_id, c.deck_id, c.word, c.payload, c.quality, c.ease_factor, c.repetitions, c.interval, c.due_date from cards c join decks d on d.deck_id = c.deck_id where c.card_id = ? and d.user_id = ?;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query((card, owner))?;
        match rows.next()? {
            Some(row) => Ok(Some(read_card(row)?)),
            None => Ok(None),
        }
    }

    /// List a deck's cards, soonest due first.
    pub fn list_cards(&self, owner: UserId, deck: DeckId) -> Fallible<Vec<Card>> {
        let conn = self.acquire();
        let sql = "select c.card_id, c.deck_id, c.word, c.payload, c.quality, c.ease_factor, c.repetitions, c.interval, c.due_date from cards c join decks d on d.deck_id = c.deck_id where d.user_id = ? and c.deck_id = ? order by c.due_date asc;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query((owner, deck))?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(read_card(row)?);
        }
        Ok(cards)
    }

    /// Delete a user's card. Returns false if the card does not exist or
    /// belongs to someone else.
    pub fn delete_card(&self, card: CardId, owner: UserId) -> Fallible<bool> {
        let conn = self.acquire();
        let affected = conn.execute(
            "delete from cards where card_id = ? and deck_id in (select deck_id from decks where user_id = ?);",
            (card, owner),
        )?;
        Ok(affected > 0)
    }

    /// A user's cards within the given decks whose ease factor falls in
    /// `[lo, hi)`, or `[lo, ∞)` when `hi` is absent.
    pub fn cards_in_ease_range(
        &self,
        owner: UserId,
        deck_ids: &[DeckId],
        lo: f64,
        hi: Option<f64>,
    ) -> Fallible<Vec<Card>> {
        if deck_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; deck_ids.len()].join(", ");
        let mut sql = format!(
            "select c.card_id, c.deck_id, c.word, c.payload, c.quality, c.ease_factor, c.repetitions, c.interval, c.due_date from cards c join decks d on d.deck_id = c.deck_id where d.user_id = ? and c.deck_id in ({placeholders}) and c.ease_factor >= ?"
        );
        if hi.is_some() {
            sql.push_str(" and c.ease_factor < ?");
        }
        sql.push(';');

        let mut params: Vec<&dyn ToSql> = vec![&owner];
        for deck_id in deck_ids {
            params.push(deck_id);
        }
        params.push(&lo);
        if let Some(hi) = &hi {
            params.push(hi);
        }

        let conn = self.acquire();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(&params[..])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(read_card(row)?);
        }
        Ok(cards)
    }

    /// Overwrite a card's scheduling state in a single statement. Returns
    /// false if the card does not exist or belongs to someone else.
    pub fn update_scheduling(
        &self,
        card: CardId,
        owner: UserId,
        state: &SchedulingState,
    ) -> Fallible<bool> {
        let conn = self.acquire();
        let sql = "update cards set quality = ?, ease_factor = ?, repetitions = ?, interval = ?, due_date = ? where card_id = ? and deck_id in (select deck_id from decks where user_id = ?);";
        let affected = conn.execute(
            sql,
            (
                state.quality,
                state.ease_factor,
                state.repetitions,
                state.interval,
                state.due_date,
                card,
                owner,
            ),
        )?;
        Ok(affected > 0)
    }

    /// Bump the user's review counter for the given day, creating the row
    /// on the first session. The upsert makes concurrent increments safe.
    pub fn increment_daily_stat(&self, user: UserId, date: Date) -> Fallible<u64> {
        let conn = self.acquire();
        let count: i64 = conn.query_row(
            "insert into daily_stats (user_id, date, count) values (?, ?, 1) on conflict (user_id, date) do update set count = count + 1 returning count;",
            (user, date),
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// The user's review counter for the given day, zero if absent.
    pub fn daily_stat(&self, user: UserId, date: Date) -> Fallible<u64> {
        let conn = self.acquire();
        let mut stmt =
            conn.prepare("select count from daily_stats where user_id = ? and date = ?;")?;
        let mut rows = stmt.query((user, date))?;
        match rows.next()? {
            Some(row) => Ok(row.get::<_, i64>(0)? as u64),
            None => Ok(0),
        }
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

fn read_card(row: &rusqlite::Row<'_>) -> Fallible<Card> {
    let payload_json: String = row.get(3)?;
    let payload: EnrichedWordPayload = serde_json::from_str(&payload_json)?;
    Ok(Card {
        card_id: row.get(0)?,
        deck_id: row.get(1)?,
        word: row.get(2)?,
        payload,
        scheduling: SchedulingState {
            quality: row.get(4)?,
            ease_factor: row.get(5)?,
            repetitions: row.get(6)?,
            interval: row.get(7)?,
            due_date: row.get(8)?,
        },
    })
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}
