// Copyright 2025 Chisomo Makombo Sakala
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

//! The process-wide table of live sessions.
//!
//! One lock guards only the map itself; looking up, inserting, or removing
//! an entry never blocks on anything a session is doing, since each
//! session's own state lives behind its own lock (see [`crate::session`]).

use crate::session::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Holds every currently-live session, keyed by session id.
#[derive(Default)]
pub struct SessionRegistry {
  sessions: Mutex<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn insert(&self, session: Arc<Session>) {
    let mut sessions = self.sessions.lock().await;
    sessions.insert(session.id().to_string(), session);
  }

  pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
    let sessions = self.sessions.lock().await;
    sessions.get(id).cloned()
  }

  pub async fn remove(&self, id: &str) -> Option<Arc<Session>> {
    let mut sessions = self.sessions.lock().await;
    sessions.remove(id)
  }

  pub async fn len(&self) -> usize {
    self.sessions.lock().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::command::CommandArgs;
  use crate::config::SupervisorConfig;
  use std::path::PathBuf;

  fn mock_session() -> Arc<Session> {
    Arc::new(Session::new_for_test(
      "sess-1".to_string(),
      SupervisorConfig {
        interpreter: CommandArgs {
          command: PathBuf::from("/bin/sh"),
          args: vec![],
        },
        ..SupervisorConfig::default()
      },
    ))
  }

  #[tokio::test]
  async fn insert_then_get_then_remove() {
    let registry = SessionRegistry::new();
    let session = mock_session();
    registry.insert(session.clone()).await;

    assert_eq!(registry.len().await, 1);
    assert!(registry.get("sess-1").await.is_some());

    let removed = registry.remove("sess-1").await;
    assert!(removed.is_some());
    assert!(registry.is_empty().await);
  }

  #[tokio::test]
  async fn get_missing_returns_none() {
    let registry = SessionRegistry::new();
    assert!(registry.get("nope").await.is_none());
  }
}
