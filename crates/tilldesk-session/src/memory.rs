// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session backend.
//!
//! Default backend for tests and single-process deployments. Entries are
//! dropped lazily once idle longer than `max_idle`; dashmap's per-entry
//! locking provides the per-session serialization the store relies on.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use tilldesk_core::{SessionBackend, SessionId, TilldeskError};

struct MemoryEntry {
    state: String,
    last_access: Instant,
}

/// Session backend keeping serialized state in a process-local map.
pub struct MemorySessionBackend {
    entries: DashMap<String, MemoryEntry>,
    max_idle: Duration,
}

impl MemorySessionBackend {
    pub fn new(max_idle: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_idle,
        }
    }

    /// Drop every entry idle longer than `max_idle`.
    pub fn purge_stale(&self) -> usize {
        let before = self.entries.len();
        let max_idle = self.max_idle;
        self.entries
            .retain(|_, entry| entry.last_access.elapsed() <= max_idle);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemorySessionBackend {
    fn default() -> Self {
        // Matches the classic server-side session idle window.
        Self::new(Duration::from_secs(24 * 60 * 60))
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn load(&self, sid: &SessionId) -> Result<Option<String>, TilldeskError> {
        if let Some(mut entry) = self.entries.get_mut(sid.as_str()) {
            if entry.last_access.elapsed() > self.max_idle {
                drop(entry);
                self.entries.remove(sid.as_str());
                return Ok(None);
            }
            entry.last_access = Instant::now();
            return Ok(Some(entry.state.clone()));
        }
        Ok(None)
    }

    async fn save(&self, sid: &SessionId, state: &str) -> Result<(), TilldeskError> {
        self.entries.insert(
            sid.as_str().to_string(),
            MemoryEntry {
                state: state.to_string(),
                last_access: Instant::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, sid: &SessionId) -> Result<(), TilldeskError> {
        self.entries.remove(sid.as_str());
        Ok(())
    }
}
