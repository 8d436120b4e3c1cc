//! Session State Store: immutable snapshots swapped per session.
//!
//! Each transition builds a new `SessionSnapshot` from the current one and the
//! store swaps the pointer under a short write lock. Readers hold an
//! `Arc<SessionSnapshot>` and can never observe a half-applied transition.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::parser::{ParseSource, ParsedAnalysis, Scores};

/// The analysis group. Always replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisState {
    pub general_section: String,
    pub ats_section: String,
    pub scores: Scores,
    /// Exact profile text the analysis ran on; reused for cover letters.
    pub profile_snapshot: String,
    pub source: Option<ParseSource>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl AnalysisState {
    pub fn is_degraded(&self) -> bool {
        self.analyzed_at.is_some()
            && self.ats_section.is_empty()
            && self.scores.iter().all(|(_, s)| !s.is_available())
    }
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: Uuid,
    /// Bumped on every transition.
    pub version: u64,
    pub analysis: AnalysisState,
    pub generated_resume: String,
    pub generated_cover_letter: String,
    api_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn new(id: Uuid, api_key: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            version: 0,
            analysis: AnalysisState::default(),
            generated_resume: String::new(),
            generated_cover_letter: String::new(),
            api_key: normalize_key(api_key),
            created_at: now,
            updated_at: now,
        }
    }

    /// Per-session key override, if any. Never serialized.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_analysis(&self) -> bool {
        self.analysis.analyzed_at.is_some()
    }

    /// Replaces general, ATS, scores and profile snapshot together.
    pub fn with_analysis(&self, parsed: ParsedAnalysis, profile_text: String) -> Self {
        let now = Utc::now();
        let mut next = self.next_version(now);
        next.analysis = AnalysisState {
            general_section: parsed.general_section,
            ats_section: parsed.ats_section,
            scores: parsed.scores,
            profile_snapshot: profile_text,
            source: Some(parsed.source),
            analyzed_at: Some(now),
        };
        next
    }

    pub fn with_resume(&self, resume: String) -> Self {
        let mut next = self.next_version(Utc::now());
        next.generated_resume = resume;
        next
    }

    pub fn with_cover_letter(&self, cover_letter: String) -> Self {
        let mut next = self.next_version(Utc::now());
        next.generated_cover_letter = cover_letter;
        next
    }

    pub fn with_api_key(&self, api_key: Option<String>) -> Self {
        let mut next = self.next_version(Utc::now());
        next.api_key = normalize_key(api_key);
        next
    }

    fn next_version(&self, now: DateTime<Utc>) -> Self {
        Self {
            version: self.version + 1,
            updated_at: now,
            ..self.clone()
        }
    }
}

fn normalize_key(api_key: Option<String>) -> Option<String> {
    api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

/// Sessions idle longer than this are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

struct Entry {
    snapshot: Arc<SessionSnapshot>,
    last_access: Instant,
}

/// In-memory registry of live sessions. Nothing outlives the process, and a
/// session nobody touches for `idle_ttl` is treated as ended.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub fn create(&self, api_key: Option<String>) -> Arc<SessionSnapshot> {
        let snapshot = Arc::new(SessionSnapshot::new(Uuid::new_v4(), api_key));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                snapshot.id,
                Entry {
                    snapshot: Arc::clone(&snapshot),
                    last_access: Instant::now(),
                },
            );
        debug!("Created session {}", snapshot.id);
        snapshot
    }

    /// The latest snapshot for `id`. Reading counts as activity.
    pub fn get(&self, id: Uuid) -> Option<Arc<SessionSnapshot>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let entry = self.live_entry(&mut sessions, id, now)?;
        entry.last_access = now;
        Some(Arc::clone(&entry.snapshot))
    }

    /// Applies `transition` to the latest snapshot and publishes the result.
    /// Returns `None` if the session does not exist or has expired.
    pub fn update<F>(&self, id: Uuid, transition: F) -> Option<Arc<SessionSnapshot>>
    where
        F: FnOnce(&SessionSnapshot) -> SessionSnapshot,
    {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let entry = self.live_entry(&mut sessions, id, now)?;
        let next = Arc::new(transition(&entry.snapshot));
        entry.snapshot = Arc::clone(&next);
        entry.last_access = now;
        debug!("Session {} advanced to version {}", id, next.version);
        Some(next)
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        self.live_entry(&mut sessions, id, now).is_some() && sessions.remove(&id).is_some()
    }

    /// Number of sessions that have not expired.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|entry| !self.is_expired(entry, now))
            .count()
    }

    /// Drops every expired session and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        before - sessions.len()
    }

    /// Looks up `id`, evicting it on the spot if it has expired.
    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<Uuid, Entry>,
        id: Uuid,
        now: Instant,
    ) -> Option<&'a mut Entry> {
        if sessions.get(&id).is_some_and(|entry| self.is_expired(entry, now)) {
            sessions.remove(&id);
            debug!("Session {id} expired");
            return None;
        }
        sessions.get_mut(&id)
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_access) > self.idle_ttl
    }
}

/// Periodically drops idle sessions. Runs until the process exits.
pub async fn run_expiry_sweep(store: SessionStore, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let purged = store.purge_expired();
        if purged > 0 {
            info!("Expired {purged} idle sessions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parser::{parse_legacy, Score, ScoreLabel};

    #[test]
    fn test_new_session_has_defaults() {
        let store = SessionStore::new();
        let session = store.create(None);

        assert_eq!(session.version, 0);
        assert!(!session.has_analysis());
        assert_eq!(session.analysis.general_section, "");
        assert_eq!(session.analysis.ats_section, "");
        assert_eq!(session.analysis.profile_snapshot, "");
        assert!(session
            .analysis
            .scores
            .iter()
            .all(|(_, s)| s == Score::Unavailable));
        assert_eq!(session.generated_resume, "");
        assert_eq!(session.generated_cover_letter, "");
        assert!(!session.analysis.is_degraded());
    }

    #[test]
    fn test_with_analysis_replaces_whole_group() {
        let base = SessionSnapshot::new(Uuid::new_v4(), None);
        let first = base.with_analysis(
            parse_legacy("Old\n## ATS ASSESSMENT START\nold ats\n## ATS ASSESSMENT END\nClarity Score: 10%"),
            "old profile".to_string(),
        );
        let second = first.with_analysis(parse_legacy("New feedback"), "new profile".to_string());

        assert_eq!(second.analysis.general_section, "New feedback");
        assert_eq!(second.analysis.ats_section, "");
        assert_eq!(
            second.analysis.scores.get(ScoreLabel::Clarity),
            Score::Unavailable
        );
        assert_eq!(second.analysis.profile_snapshot, "new profile");
        assert!(second.analysis.is_degraded());
        // The previous snapshot is untouched.
        assert_eq!(first.analysis.profile_snapshot, "old profile");
        assert_eq!(
            first.analysis.scores.get(ScoreLabel::Clarity),
            Score::Percent(10)
        );
    }

    #[test]
    fn test_artifacts_are_independent_of_analysis() {
        let base = SessionSnapshot::new(Uuid::new_v4(), None)
            .with_resume("resume".to_string())
            .with_cover_letter("letter".to_string());
        let analyzed = base.with_analysis(parse_legacy("feedback"), "profile".to_string());

        assert_eq!(analyzed.generated_resume, "resume");
        assert_eq!(analyzed.generated_cover_letter, "letter");

        let regenerated = analyzed.with_resume("resume v2".to_string());
        assert_eq!(regenerated.analysis, analyzed.analysis);
        assert_eq!(regenerated.generated_cover_letter, "letter");
    }

    #[test]
    fn test_versions_increase_per_transition() {
        let base = SessionSnapshot::new(Uuid::new_v4(), None);
        let next = base.with_resume("r".to_string()).with_cover_letter("c".to_string());
        assert_eq!(next.version, 2);
        assert!(next.updated_at >= base.updated_at);
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let session = SessionSnapshot::new(Uuid::new_v4(), Some("  ".to_string()));
        assert_eq!(session.api_key(), None);
        let keyed = session.with_api_key(Some(" sk-test ".to_string()));
        assert_eq!(keyed.api_key(), Some("sk-test"));
        assert_eq!(keyed.with_api_key(None).api_key(), None);
    }

    #[test]
    fn test_store_update_publishes_new_snapshot() {
        let store = SessionStore::new();
        let created = store.create(None);

        let updated = store
            .update(created.id, |s| s.with_resume("resume".to_string()))
            .unwrap();

        assert_eq!(updated.version, 1);
        assert_eq!(store.get(created.id).unwrap().generated_resume, "resume");
        // Readers holding the old Arc still see the old state.
        assert_eq!(created.generated_resume, "");
    }

    #[test]
    fn test_store_update_unknown_session() {
        let store = SessionStore::new();
        assert!(store
            .update(Uuid::new_v4(), |s| s.with_resume("x".to_string()))
            .is_none());
    }

    #[test]
    fn test_store_remove() {
        let store = SessionStore::new();
        let session = store.create(None);
        assert_eq!(store.len(), 1);
        assert!(store.remove(session.id));
        assert!(!store.remove(session.id));
        assert!(store.get(session.id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let session = store.create(None);

        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(store.get(session.id).is_none());
        assert!(store
            .update(session.id, |s| s.with_resume("late".to_string()))
            .is_none());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_keeps_session_alive() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let session = store.create(None);

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(store.get(session.id).is_some());
        tokio::time::advance(Duration::from_secs(45)).await;

        assert!(store.get(session.id).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_removes_only_expired_sessions() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let stale = store.create(None);
        tokio::time::advance(Duration::from_secs(50)).await;
        let fresh = store.create(None);
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(store.purge_expired(), 1);
        assert!(store.get(stale.id).is_none());
        assert!(store.get(fresh.id).is_some());
    }
}
