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

use std::error::Error;

use axum::http::HeaderMap;
use axum::http::StatusCode;

use crate::db::Database;
use crate::job::JobRunner;
use crate::notify::NotificationHub;
use crate::scheduler::SchedulerConfig;
use crate::types::id::UserId;

/// Everything the request handlers need, wired once at startup.
pub struct ServerState<T> {
    pub db: Database,
    pub hub: NotificationHub,
    pub jobs: JobRunner<T>,
    pub scheduler: SchedulerConfig,
}

impl<T> Clone for ServerState<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            hub: self.hub.clone(),
            jobs: self.jobs.clone(),
            scheduler: self.scheduler,
        }
    }
}

/// Resolve the caller's identity from the connection credential. The
/// credential is issued and checked by the authentication layer in front
/// of this service; here it is only decoded.
pub fn authenticate(headers: &HeaderMap) -> Result<UserId, (StatusCode, String)> {
    let value = headers.get("x-user-id").ok_or_else(unauthorized)?;
    let value = value.to_str().map_err(|_| unauthorized())?;
    let id: i64 = value.parse().map_err(|_| unauthorized())?;
    Ok(UserId::new(id))
}

pub fn unauthorized() -> (StatusCode, String) {
    (
        StatusCode::UNAUTHORIZED,
        "missing or invalid user credential".to_string(),
    )
}

pub fn internal_error(error: Box<dyn Error + Send + Sync>) -> (StatusCode, String) {
    log::error!("Internal error: {error}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate() {
        let mut headers = HeaderMap::new();
        assert!(authenticate(&headers).is_err());
        headers.insert("x-user-id", "17".parse().unwrap());
        assert_eq!(authenticate(&headers).unwrap(), UserId::new(17));
        headers.insert("x-user-id", "not-a-number".parse().unwrap());
        assert!(authenticate(&headers).is_err());
    }
}
