use retouch_core::models::StoredFile;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Read-only snapshot of one session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: String,
    /// Storage keys in registration order.
    pub files: Vec<String>,
    pub last_activity: Instant,
}

struct SessionEntry {
    files: Vec<String>,
    last_activity: Instant,
}

#[derive(Default)]
struct RegistryInner {
    sessions: HashMap<String, SessionEntry>,
    /// filename -> metadata index, for transform-route lookups.
    files: HashMap<String, StoredFile>,
}

/// In-memory mapping from session id to the files it owns.
///
/// Shared by concurrent request handlers and the cleanup scheduler; all
/// access goes through a mutex whose scope never spans I/O. There is no
/// per-session file cap - a client that registers files and never cleans up
/// grows the map until the idle sweep evicts it.
pub struct SessionRegistry {
    inner: Mutex<RegistryInner>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // A poisoned lock only means a panicking thread held it; the map
        // itself is still coherent for our append/remove operations.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a file under a session, creating the session on first use
    /// and refreshing its last-activity timestamp.
    pub fn register_file(&self, session_id: &str, file: StoredFile) {
        let filename = file.filename.clone();
        let mut inner = self.lock();

        let entry = inner
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = %session_id, "New session created");
                SessionEntry {
                    files: Vec::new(),
                    last_activity: Instant::now(),
                }
            });

        entry.files.push(filename.clone());
        entry.last_activity = Instant::now();
        let file_count = entry.files.len();

        inner.files.insert(filename.clone(), file);

        tracing::debug!(
            session_id = %session_id,
            filename = %filename,
            file_count = file_count,
            "File registered"
        );
    }

    /// Read-only snapshot of a session, if it exists.
    pub fn session_info(&self, session_id: &str) -> Option<SessionInfo> {
        let inner = self.lock();
        inner.sessions.get(session_id).map(|entry| SessionInfo {
            session_id: session_id.to_string(),
            files: entry.files.clone(),
            last_activity: entry.last_activity,
        })
    }

    pub fn active_session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Metadata for a stored file, if any session tracks it.
    pub fn lookup_file(&self, filename: &str) -> Option<StoredFile> {
        self.lock().files.get(filename).cloned()
    }

    /// Remove a session and its file-index entries, returning the file list
    /// for deletion. The entry is gone regardless of what the caller manages
    /// to delete afterwards.
    pub fn take_session(&self, session_id: &str) -> Option<Vec<String>> {
        let mut inner = self.lock();
        let entry = inner.sessions.remove(session_id)?;
        for filename in &entry.files {
            inner.files.remove(filename);
        }
        Some(entry.files)
    }

    /// Session ids idle strictly longer than `max_idle` at `now`.
    /// Collected first so cleanup never mutates the map mid-iteration.
    pub fn idle_session_ids(&self, max_idle: Duration, now: Instant) -> Vec<String> {
        let inner = self.lock();
        inner
            .sessions
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_activity) > max_idle)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn file(filename: &str, session_id: &str) -> StoredFile {
        StoredFile {
            filename: filename.to_string(),
            session_id: session_id.to_string(),
            content_type: "image/png".to_string(),
            size_bytes: 1,
            url: format!("http://localhost:3000/uploads/{}", filename),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_register_appends_in_call_order() {
        let registry = SessionRegistry::new();
        let keys = ["1_a.png", "2_b.png", "3_c.png", "4_d.png"];
        for key in keys {
            registry.register_file("sess", file(key, "sess"));
        }

        let info = registry.session_info("sess").expect("session exists");
        assert_eq!(info.files, keys);
        assert_eq!(registry.active_session_count(), 1);
    }

    #[test]
    fn test_unknown_session_info_is_none() {
        let registry = SessionRegistry::new();
        assert!(registry.session_info("missing").is_none());
        assert_eq!(registry.active_session_count(), 0);
    }

    #[test]
    fn test_lookup_file() {
        let registry = SessionRegistry::new();
        registry.register_file("sess", file("1_a.png", "sess"));

        let found = registry.lookup_file("1_a.png").expect("indexed");
        assert_eq!(found.session_id, "sess");
        assert!(registry.lookup_file("2_b.png").is_none());
    }

    #[test]
    fn test_take_session_clears_index() {
        let registry = SessionRegistry::new();
        registry.register_file("sess", file("1_a.png", "sess"));
        registry.register_file("sess", file("2_b.png", "sess"));

        let files = registry.take_session("sess").expect("session existed");
        assert_eq!(files, vec!["1_a.png", "2_b.png"]);
        assert_eq!(registry.active_session_count(), 0);
        assert!(registry.lookup_file("1_a.png").is_none());

        assert!(registry.take_session("sess").is_none());
    }

    #[test]
    fn test_idle_boundary_is_strictly_greater() {
        let registry = SessionRegistry::new();
        registry.register_file("sess", file("1_a.png", "sess"));
        let last = registry.session_info("sess").unwrap().last_activity;
        let max_idle = Duration::from_millis(500);

        // One past the threshold: swept
        let swept = registry.idle_session_ids(max_idle, last + max_idle + Duration::from_millis(1));
        assert_eq!(swept, vec!["sess".to_string()]);

        // One before the threshold: kept
        let kept = registry.idle_session_ids(max_idle, last + max_idle - Duration::from_millis(1));
        assert!(kept.is_empty());

        // Exactly the threshold: kept
        let exact = registry.idle_session_ids(max_idle, last + max_idle);
        assert!(exact.is_empty());
    }

    #[test]
    fn test_registration_refreshes_activity() {
        let registry = SessionRegistry::new();
        registry.register_file("sess", file("1_a.png", "sess"));
        let first = registry.session_info("sess").unwrap().last_activity;

        std::thread::sleep(Duration::from_millis(5));
        registry.register_file("sess", file("2_b.png", "sess"));
        let second = registry.session_info("sess").unwrap().last_activity;

        assert!(second > first);
    }

    #[test]
    fn test_concurrent_registrations_are_not_lost() {
        let registry = Arc::new(SessionRegistry::new());
        let mut handles = Vec::new();

        for thread_id in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for i in 0..25 {
                    let key = format!("{}_{}.png", thread_id, i);
                    registry.register_file("shared", file(&key, "shared"));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("thread finished");
        }

        let info = registry.session_info("shared").expect("session exists");
        assert_eq!(info.files.len(), 8 * 25);
    }
}
