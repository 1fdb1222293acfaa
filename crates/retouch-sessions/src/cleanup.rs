use crate::registry::SessionRegistry;
use retouch_storage::Storage;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::time::interval;

/// Thresholds and switches for the background sweeps.
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Sessions idle strictly longer than this are evicted.
    pub max_idle: Duration,
    /// Interval between scheduled sweep runs.
    pub sweep_interval: Duration,
    /// Files on disk older than this are deleted even when untracked.
    pub orphan_max_age: Duration,
    pub orphan_sweep_enabled: bool,
}

/// Deletes session files on explicit request, on idle timeout, and via the
/// orphan-file backstop. Every deletion is best-effort: failures are logged
/// and never abort the rest of a sweep, and they never propagate to any
/// caller.
pub struct CleanupService {
    registry: Arc<SessionRegistry>,
    storage: Arc<dyn Storage>,
    config: CleanupConfig,
}

impl CleanupService {
    pub fn new(
        registry: Arc<SessionRegistry>,
        storage: Arc<dyn Storage>,
        config: CleanupConfig,
    ) -> Self {
        Self {
            registry,
            storage,
            config,
        }
    }

    /// Delete every file a session owns and drop the session.
    ///
    /// Unknown sessions are a no-op, not an error. The registry entry is
    /// removed unconditionally, even when some deletions fail - a file that
    /// could not be deleted becomes an orphan and is reclaimed by
    /// `sweep_orphaned_files`. Returns the number of successful deletions.
    pub async fn cleanup_session(&self, session_id: &str) -> usize {
        let Some(files) = self.registry.take_session(session_id) else {
            tracing::debug!(
                session_id = %session_id,
                "Session not found (already cleaned or never existed)"
            );
            return 0;
        };

        let mut deleted = 0;
        for key in &files {
            match self.storage.delete(key).await {
                Ok(()) => {
                    deleted += 1;
                    tracing::debug!(session_id = %session_id, key = %key, "Deleted session file");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        session_id = %session_id,
                        key = %key,
                        "Failed to delete session file, continuing"
                    );
                }
            }
        }

        tracing::info!(
            session_id = %session_id,
            file_count = files.len(),
            deleted = deleted,
            "Session cleaned up"
        );

        deleted
    }

    /// Evict every session idle strictly longer than the configured
    /// threshold. Sessions are collected first, then cleaned sequentially.
    pub async fn sweep_idle_sessions(&self) -> usize {
        self.sweep_idle_at(Instant::now()).await
    }

    /// Deterministic variant of [`Self::sweep_idle_sessions`] taking the
    /// reference time, so a single sweep can be driven without a timer.
    pub async fn sweep_idle_at(&self, now: Instant) -> usize {
        let idle = self.registry.idle_session_ids(self.config.max_idle, now);

        if idle.is_empty() {
            tracing::debug!(
                active_sessions = self.registry.active_session_count(),
                "No idle sessions to clean up"
            );
            return 0;
        }

        for session_id in &idle {
            tracing::info!(session_id = %session_id, "Session idle past threshold, cleaning up");
            self.cleanup_session(session_id).await;
        }

        tracing::info!(swept = idle.len(), "Idle sweep completed");
        idle.len()
    }

    /// Delete every file in the upload directory older than the configured
    /// age, regardless of whether any session still tracks it. This is the
    /// backstop for files stranded by failed deletions or a process restart
    /// that wiped the in-memory registry.
    pub async fn sweep_orphaned_files(&self) -> usize {
        let entries = match self.storage.list_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(error = %e, "Orphan sweep failed to list upload directory");
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;

        for entry in entries {
            // A modification time in the future means the clock moved; skip
            let Ok(age) = now.duration_since(entry.modified) else {
                continue;
            };

            if age <= self.config.orphan_max_age {
                continue;
            }

            match self.storage.delete(&entry.key).await {
                Ok(()) => {
                    removed += 1;
                    tracing::info!(key = %entry.key, age_secs = age.as_secs(), "Orphan removed");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        key = %entry.key,
                        "Failed to remove orphan, continuing"
                    );
                }
            }
        }

        tracing::debug!(removed = removed, "Orphan sweep completed");
        removed
    }

    /// Start the periodic sweep task. The handle lives as long as the
    /// process; there is no graceful drain - aborting mid-sweep at worst
    /// leaves orphans for the next run.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(self.config.sweep_interval);

            loop {
                sweep_interval.tick().await;

                tracing::debug!("Starting scheduled cleanup sweep");
                self.sweep_idle_sessions().await;

                if self.config.orphan_sweep_enabled {
                    self.sweep_orphaned_files().await;
                }
            }
        })
    }
}
