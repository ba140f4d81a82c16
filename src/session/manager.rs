use std::sync::Arc;
use std::time::Duration;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use crate::errors::BcbError;
use crate::extraction::DocumentExtractor;
use crate::llm::LLMProvider;
use super::orchestrator::DemoSession;
use super::progress::DemoTiming;
use super::random::{RandomSource, ThreadRandom};
use tracing::{debug, info};

/// Upper bound on the pause between idle sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct ManagedSession {
    session: DemoSession,
    last_access: Instant,
}

impl ManagedSession {
    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_access)
    }
}

/// Owns every live session of a server process, keyed by session id.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<DashMap<String, ManagedSession>>,
    llm: Arc<dyn LLMProvider>,
    extractor: Arc<dyn DocumentExtractor>,
    rng: Arc<dyn RandomSource>,
    timing: DemoTiming,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(
        llm: Arc<dyn LLMProvider>,
        extractor: Arc<dyn DocumentExtractor>,
        timing: DemoTiming,
    ) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            llm,
            extractor,
            rng: Arc::new(ThreadRandom),
            timing,
            max_sessions: 256,
        }
    }

    pub fn with_random_source(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    pub fn create(&self) -> Result<DemoSession, BcbError> {
        if self.sessions.len() >= self.max_sessions {
            return Err(BcbError::Unavailable(format!(
                "Session limit reached ({} active)",
                self.max_sessions
            )));
        }
        let session = DemoSession::new(self.llm.clone(), self.extractor.clone(), self.timing)
            .with_random_source(self.rng.clone());
        self.sessions.insert(
            session.id().to_string(),
            ManagedSession { session: session.clone(), last_access: Instant::now() },
        );
        info!(session = %session.id(), active = self.sessions.len(), "Session created");
        Ok(session)
    }

    /// Look up a session and mark it as accessed.
    pub fn get(&self, id: &str) -> Result<DemoSession, BcbError> {
        let mut entry = self.sessions
            .get_mut(id)
            .ok_or_else(|| BcbError::NotFound(format!("Session not found: {}", id)))?;
        entry.last_access = Instant::now();
        Ok(entry.session.clone())
    }

    /// Remove a session and stop its timers.
    pub async fn remove(&self, id: &str) -> Result<(), BcbError> {
        let (_, entry) = self.sessions
            .remove(id)
            .ok_or_else(|| BcbError::NotFound(format!("Session not found: {}", id)))?;
        entry.session.shutdown().await;
        Ok(())
    }

    /// Discard sessions not accessed for at least `ttl`. Returns how many were removed.
    pub async fn sweep_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let stale: Vec<String> = self.sessions.iter()
            .filter(|entry| entry.idle_for(now) >= ttl)
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for id in stale {
            // Re-check: a request may have touched the session since the scan.
            let expired = self.sessions.remove_if(&id, |_, entry| entry.idle_for(Instant::now()) >= ttl);
            if let Some((_, entry)) = expired {
                entry.session.shutdown().await;
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, active = self.sessions.len(), "Expired idle sessions");
        }
        removed
    }

    /// Periodically sweep idle sessions until `cancel` fires.
    pub fn spawn_idle_sweeper(&self, ttl: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let manager = self.clone();
        let period = ttl.min(SWEEP_INTERVAL).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        manager.sweep_idle(ttl).await;
                    }
                }
            }
            debug!("Idle session sweeper stopped");
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub async fn shutdown_all(&self) {
        let ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            let _ = self.remove(&id).await;
        }
    }
}
