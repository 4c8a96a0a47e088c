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

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use tokio::sync::broadcast;

use crate::types::id::UserId;
use crate::types::notification::NotificationMessage;

/// How many undelivered messages a group buffers for a slow subscriber.
const GROUP_CAPACITY: usize = 16;

/// Per-user broadcast groups. A connected client subscribes to its own
/// group; card jobs publish one message per completed job into it.
///
/// Delivery is at-most-once and fire-and-forget: with no live subscriber
/// the message is dropped. There is no backlog or replay.
#[derive(Clone)]
pub struct NotificationHub {
    groups: Arc<Mutex<HashMap<UserId, broadcast::Sender<NotificationMessage>>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            groups: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Join the user's group, creating it on first subscription.
    pub fn subscribe(&self, user: UserId) -> broadcast::Receiver<NotificationMessage> {
        let mut groups = self.groups.lock().unwrap();
        groups
            .entry(user)
            .or_insert_with(|| broadcast::channel(GROUP_CAPACITY).0)
            .subscribe()
    }

    /// Publish a message into the user's group. Never blocks; if nobody
    /// is listening the message is dropped and the idle group pruned.
    pub fn publish(&self, user: UserId, message: NotificationMessage) {
        let mut groups = self.groups.lock().unwrap();
        let Some(sender) = groups.get(&user) else {
            log::debug!("No notification group for user {user}; dropping message.");
            return;
        };
        if sender.send(message).is_err() {
            // All receivers disconnected since the group was created.
            groups.remove(&user);
            log::debug!("Pruned empty notification group for user {user}.");
        }
    }

    /// Number of live subscribers in the user's group.
    pub fn subscriber_count(&self, user: UserId) -> usize {
        let groups = self.groups.lock().unwrap();
        groups
            .get(&user)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
