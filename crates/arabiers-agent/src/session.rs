//! Ephemeral per-session question/answer history
//!
//! Nothing here is persisted. A session lives until it is removed, sits
//! idle longer than the store's TTL, or the process exits.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::HistoryEntry;

/// Default idle time before a session is evicted
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// State kept for one browser session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Entries in the order they were asked
    pub history: Vec<HistoryEntry>,
    /// Most recent answer, used for the PDF download
    pub last_response: Option<String>,
    /// Last time the session was read or written
    last_access: Instant,
}

impl SessionState {
    fn new() -> Self {
        Self {
            history: Vec::new(),
            last_response: None,
            last_access: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_access = Instant::now();
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_access.elapsed() > ttl
    }
}

/// Concurrent map of UI sessions
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionState>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose sessions are dropped after `idle_ttl` without access
    pub fn with_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl,
        }
    }

    /// Start a new empty session, evicting idle ones first
    pub fn create(&self) -> Uuid {
        self.evict_expired();

        let id = Uuid::new_v4();
        self.sessions.insert(id, SessionState::new());
        tracing::debug!(session = %id, "Session created");
        id
    }

    /// Drop every session idle for longer than the TTL.
    ///
    /// Returns the number of sessions removed.
    pub fn evict_expired(&self) -> usize {
        let ttl = self.idle_ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(ttl));
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::debug!(removed, "Evicted idle sessions");
        }
        removed
    }

    pub fn exists(&self, id: &Uuid) -> bool {
        self.sessions
            .get(id)
            .map(|session| !session.is_expired(self.idle_ttl))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Append a question/answer pair and make it the last response
    pub fn record(&self, id: &Uuid, question: &str, answer: &str) -> Result<HistoryEntry> {
        self.with_session(id, |session| {
            let entry = HistoryEntry::new(question, answer);
            session.history.push(entry.clone());
            session.last_response = Some(answer.to_string());
            entry
        })
    }

    /// History, newest first
    pub fn history(&self, id: &Uuid) -> Result<Vec<HistoryEntry>> {
        self.with_session(id, |session| session.history.iter().rev().cloned().collect())
    }

    pub fn last_response(&self, id: &Uuid) -> Result<Option<String>> {
        self.with_session(id, |session| session.last_response.clone())
    }

    /// Drop all entries and the last response, keeping the session
    pub fn clear(&self, id: &Uuid) -> Result<()> {
        self.with_session(id, |session| {
            session.history.clear();
            session.last_response = None;
        })
    }

    /// Forget a session entirely
    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Run `f` on a live session and mark it as accessed
    fn with_session<T>(&self, id: &Uuid, f: impl FnOnce(&mut SessionState) -> T) -> Result<T> {
        let mut session = self
            .sessions
            .get_mut(id)
            .filter(|session| !session.is_expired(self.idle_ttl))
            .ok_or(Error::SessionNotFound(*id))?;
        session.touch();
        Ok(f(session.value_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_newest_first() {
        let store = SessionStore::new();
        let id = store.create();

        store.record(&id, "Who are you?", "Arabiers AI Agent").unwrap();
        store.record(&id, "rate in Kandy", "USD 120").unwrap();

        let history = store.history(&id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "rate in Kandy");
        assert_eq!(history[1].question, "Who are you?");
        assert_eq!(store.last_response(&id).unwrap().as_deref(), Some("USD 120"));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create();
        let b = store.create();

        store.record(&a, "q", "a").unwrap();
        assert_eq!(store.history(&a).unwrap().len(), 1);
        assert!(store.history(&b).unwrap().is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clear_and_remove() {
        let store = SessionStore::new();
        let id = store.create();
        store.record(&id, "q", "a").unwrap();

        store.clear(&id).unwrap();
        assert!(store.history(&id).unwrap().is_empty());
        assert_eq!(store.last_response(&id).unwrap(), None);

        assert!(store.remove(&id));
        assert!(!store.exists(&id));
        assert!(matches!(store.history(&id), Err(Error::SessionNotFound(_))));
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new();
        let err = store.record(&Uuid::new_v4(), "q", "a").unwrap_err();
        assert!(matches!(err, Error::SessionNotFound(_)));
    }

    #[test]
    fn test_idle_sessions_are_evicted() {
        let store = SessionStore::with_ttl(Duration::from_millis(200));
        let idle = store.create();
        let active = store.create();

        std::thread::sleep(Duration::from_millis(120));
        store.record(&active, "rate in Galle", "USD 150").unwrap();
        std::thread::sleep(Duration::from_millis(120));

        // idle is past the TTL, active was touched 120ms ago
        assert!(!store.exists(&idle));
        assert!(matches!(store.history(&idle), Err(Error::SessionNotFound(_))));
        assert!(store.exists(&active));

        let fresh = store.create();
        assert_eq!(store.len(), 2);
        assert!(store.exists(&fresh));
        assert!(store.exists(&active));
    }

    #[test]
    fn test_evict_expired_counts_removed() {
        let store = SessionStore::with_ttl(Duration::from_millis(10));
        for _ in 0..5 {
            store.create();
        }
        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(store.evict_expired(), 5);
        assert!(store.is_empty());
    }
}
