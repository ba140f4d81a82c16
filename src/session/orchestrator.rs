use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use chrono::Utc;
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use crate::errors::BcbError;
use crate::extraction::{DocumentExtractor, PDF_MIME};
use crate::llm::{self, LLMProvider};
use crate::phases::{self, PhaseId};
use crate::prompts;
use super::events::SessionEvent;
use super::progress::{self, DemoTiming, PROGRESS_COMPLETE};
use super::random::{self, RandomSource, ThreadRandom};
use super::state::{AutomationProgress, Feedback, SessionSnapshot, SessionState, TtrComparison, View};
use tracing::{debug, info, warn};

/// What happened to a call of [`DemoSession::run_phase_generation`].
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// Required inputs are missing for this phase
    NotReady,
    /// Same prompt as the last issued request; nothing sent
    Unchanged,
    /// Result stored as the phase output
    Applied(String),
    /// A newer response was already stored; this one was dropped
    Discarded,
    /// Session shut down while the request was in flight
    Cancelled,
}

/// Drives one user's walk through the remediation demo.
///
/// Cheap to clone: clones share state, timers and background tasks.
#[derive(Clone)]
pub struct DemoSession {
    id: String,
    state: Arc<RwLock<SessionState>>,
    llm: Arc<dyn LLMProvider>,
    extractor: Arc<dyn DocumentExtractor>,
    rng: Arc<dyn RandomSource>,
    timing: DemoTiming,
    cancel_token: CancellationToken,
    tasks: TaskTracker,
    event_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl DemoSession {
    pub fn new(
        llm: Arc<dyn LLMProvider>,
        extractor: Arc<dyn DocumentExtractor>,
        timing: DemoTiming,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: Arc::new(RwLock::new(SessionState::new())),
            llm,
            extractor,
            rng: Arc::new(ThreadRandom),
            timing,
            cancel_token: CancellationToken::new(),
            tasks: TaskTracker::new(),
            event_tx: None,
        }
    }

    /// Replace the random source behind progress ticks and the TTR baseline.
    pub fn with_random_source(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Attach an event channel for streaming session events to a renderer.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_closed(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    fn ensure_open(&self) -> Result<(), BcbError> {
        if self.is_closed() {
            return Err(BcbError::Validation(format!("Session {} has ended", self.id)));
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot(&self.id)
    }

    pub async fn active_phase(&self) -> PhaseId {
        self.state.read().await.active_phase
    }

    pub async fn select_phase(&self, id: &str) -> Result<PhaseId, BcbError> {
        self.ensure_open()?;
        let phase = phases::by_id(id)
            .ok_or_else(|| BcbError::Validation(format!("Unknown phase: {}", id)))?
            .id;

        {
            let mut state = self.state.write().await;
            let previous = state.active_phase;
            if previous != phase {
                // Leaving a phase tears its demo down; coming back regenerates it.
                if let Some(output) = state.outputs.get_mut(&previous) {
                    output.issued_key = None;
                }
                if previous == PhaseId::Phase3 {
                    state.cancel_automation();
                }
            }
            state.active_phase = phase;
        }
        info!(session = %self.id, phase = %phase, "Phase selected");
        self.refresh_generation().await;
        Ok(phase)
    }

    pub async fn set_bug_description(&self, text: impl Into<String>) -> Result<(), BcbError> {
        self.ensure_open()?;
        let text = text.into();
        debug!(session = %self.id, len = text.len(), "Bug description updated");
        self.state.write().await.bug_description = text;
        self.refresh_generation().await;
        Ok(())
    }

    /// Store system information verbatim; no format is imposed.
    pub async fn upload_system_info(&self, contents: impl Into<String>) -> Result<(), BcbError> {
        self.ensure_open()?;
        let contents = contents.into();
        info!(session = %self.id, bytes = contents.len(), "System info uploaded");
        self.state.write().await.system_info = Some(contents);
        self.refresh_generation().await;
        Ok(())
    }

    /// Extract and store the text of an uploaded PDF.
    ///
    /// Returns the number of characters extracted. On any error the
    /// previously stored document text is kept.
    pub async fn upload_document(&self, bytes: &[u8], mime_type: &str) -> Result<usize, BcbError> {
        self.ensure_open()?;
        if mime_type != PDF_MIME {
            warn!(session = %self.id, mime_type, "Rejected non-PDF upload");
            return Err(BcbError::Validation(format!(
                "Please upload a valid PDF file (got {})",
                if mime_type.is_empty() { "no content type" } else { mime_type }
            )));
        }

        let text = self.extractor.extract_text(bytes).await.map_err(|e| {
            warn!(
                session = %self.id,
                extractor = self.extractor.name(),
                error = %e,
                "Error parsing PDF"
            );
            match e {
                BcbError::Extraction(_) => e,
                other => BcbError::Extraction(other.to_string()),
            }
        })?;

        let chars = text.chars().count();
        self.state.write().await.document_text = Some(text);
        info!(session = %self.id, chars, "PDF uploaded and processed");
        self.refresh_generation().await;
        Ok(chars)
    }

    pub async fn show_view(&self, view: View) -> Result<(), BcbError> {
        self.ensure_open()?;
        self.state.write().await.view = view;
        Ok(())
    }

    /// Begin a remediation run.
    ///
    /// Returns once the splash is scheduled; the remediation clock starts
    /// when the splash delay elapses.
    pub async fn start_remediation(&self) -> Result<(), BcbError> {
        self.ensure_open()?;
        {
            let mut state = self.state.write().await;
            if state.bug_description.trim().is_empty() {
                return Err(BcbError::Validation(
                    "Please enter a bug description before starting remediation.".into(),
                ));
            }
            state.loading = true;
        }
        self.emit(SessionEvent::Loading);

        let session = self.clone();
        let delay = self.timing.splash_delay;
        self.tasks.spawn(async move {
            tokio::select! {
                _ = session.cancel_token.cancelled() => {
                    debug!(session = %session.id, "Splash cancelled");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            session.finish_splash().await;
        });
        Ok(())
    }

    async fn finish_splash(&self) {
        let (phase, started_at) = {
            let mut state = self.state.write().await;
            let now = Utc::now();
            state.loading = false;
            state.remediation_start = Some(now);
            state.remediation_end = None;
            state.ttr = None;
            state.feedback = None;
            state.view = View::Remediation;
            state.demo_visible = true;
            // Showing the demo again always regenerates and restarts progress.
            for output in state.outputs.values_mut() {
                output.issued_key = None;
            }
            (state.active_phase, now)
        };
        info!(session = %self.id, phase = %phase, "Remediation started");
        self.emit(SessionEvent::RemediationStarted { phase, started_at });
        self.refresh_generation().await;
    }

    /// Re-issue generation for the active phase while the demo is shown.
    async fn refresh_generation(&self) {
        let (visible, phase) = {
            let state = self.state.read().await;
            (state.demo_visible, state.active_phase)
        };
        if !visible || self.is_closed() {
            return;
        }
        let session = self.clone();
        self.tasks.spawn(async move {
            session.run_phase_generation(phase).await;
        });
    }

    /// Compose the phase prompt from current inputs, run it and store the result.
    ///
    /// A request is only sent when the prompt differs from the last one
    /// issued for this phase. Responses are applied in issue order: one that
    /// arrives after a newer response has been stored is dropped.
    pub async fn run_phase_generation(&self, phase: PhaseId) -> GenerationOutcome {
        let (prompt, seq) = {
            let mut state = self.state.write().await;
            let vars = state.prompt_variables();
            if !prompts::is_ready(phase, &vars) {
                return GenerationOutcome::NotReady;
            }
            let prompt = prompts::build_prompt(phase, &vars);
            let key = prompt_key(&prompt);
            let output = state.outputs.entry(phase).or_default();
            if output.issued_key == Some(key) {
                return GenerationOutcome::Unchanged;
            }
            output.issued_key = Some(key);
            output.issued_seq += 1;
            (prompt, output.issued_seq)
        };

        info!(session = %self.id, phase = %phase, seq, "Generation issued");
        self.emit(SessionEvent::GenerationIssued { phase, seq });
        if phase == PhaseId::Phase3 {
            self.restart_automation().await;
        }

        let text = tokio::select! {
            _ = self.cancel_token.cancelled() => return GenerationOutcome::Cancelled,
            text = llm::generate(self.llm.as_ref(), &prompt) => text,
        };
        let text = if text.trim().is_empty() && phase != PhaseId::Phase3 {
            prompts::empty_result_fallback(phase).to_string()
        } else {
            text
        };

        {
            let mut state = self.state.write().await;
            let output = state.outputs.entry(phase).or_default();
            if seq <= output.applied_seq {
                debug!(
                    session = %self.id,
                    phase = %phase,
                    seq,
                    applied = output.applied_seq,
                    "Discarding stale generation response"
                );
                drop(state);
                self.emit(SessionEvent::GenerationDiscarded { phase, seq });
                return GenerationOutcome::Discarded;
            }
            output.applied_seq = seq;
            if phase == PhaseId::Phase3 {
                output.steps = prompts::split_steps(&text);
            }
            output.suggestion = Some(text.clone());
        }

        info!(session = %self.id, phase = %phase, seq, chars = text.len(), "Generation applied");
        self.emit(SessionEvent::SuggestionReady { phase, text: text.clone() });
        GenerationOutcome::Applied(text)
    }

    /// Reset the simulated progress and start a fresh ticker.
    async fn restart_automation(&self) {
        let token = self.cancel_token.child_token();
        let run = {
            let mut state = self.state.write().await;
            state.cancel_automation();
            state.progress_token = Some(token.clone());
            let run = state.automation.run + 1;
            state.automation = AutomationProgress { run, ..Default::default() };
            run
        };

        let session = self.clone();
        self.tasks.spawn(async move {
            session.drive_automation(run, token).await;
        });
    }

    async fn drive_automation(&self, run: u64, token: CancellationToken) {
        let timing = self.timing;
        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(timing.tick_interval) => {}
            }

            let unit = self.rng.next_unit();
            let (value, ticks) = {
                let mut state = self.state.write().await;
                if state.automation.run != run {
                    return;
                }
                let automation = &mut state.automation;
                automation.ticks += 1;
                automation.value = if automation.ticks >= timing.max_ticks {
                    PROGRESS_COMPLETE
                } else {
                    progress::advance(automation.value, unit)
                };
                (automation.value, automation.ticks)
            };
            self.emit(SessionEvent::ProgressTick { value, ticks });

            if value >= PROGRESS_COMPLETE {
                break;
            }
        }

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(timing.completion_delay) => {}
        }

        {
            let mut state = self.state.write().await;
            if state.automation.run != run {
                return;
            }
            state.automation.complete = true;
            state.progress_token = None;
        }
        info!(session = %self.id, "Automated remediation complete");
        self.emit(SessionEvent::AutomationComplete);
    }

    /// Stop the remediation clock and compute the TTR comparison.
    ///
    /// The no-system figure is simulated: the measured TTR times a
    /// multiplier drawn from `[1.5, 3.0)`.
    pub async fn end_remediation(&self) -> Result<TtrComparison, BcbError> {
        let ttr = {
            let mut state = self.state.write().await;
            let start = state.remediation_start
                .ok_or_else(|| BcbError::Validation("Remediation has not been started".into()))?;
            let end = Utc::now();
            let with_system_secs = (end - start).to_std().map(|d| d.as_secs_f64()).unwrap_or(0.0);
            let multiplier = random::ttr_multiplier(self.rng.as_ref());
            let ttr = TtrComparison {
                with_system_secs,
                without_system_secs: with_system_secs * multiplier,
            };
            state.remediation_end = Some(end);
            state.ttr = Some(ttr);
            ttr
        };

        info!(
            session = %self.id,
            ttr_with_system = ttr.with_system_secs,
            ttr_without_system = ttr.without_system_secs,
            "Remediation ended"
        );
        self.emit(SessionEvent::TtrComputed {
            with_system_secs: ttr.with_system_secs,
            without_system_secs: ttr.without_system_secs,
        });
        Ok(ttr)
    }

    /// Record thumbs up/down, hide the demo panel and end the remediation.
    pub async fn submit_feedback(&self, positive: bool) -> Result<TtrComparison, BcbError> {
        self.ensure_open()?;
        let feedback = Feedback::from(positive);
        {
            let mut state = self.state.write().await;
            state.feedback = Some(feedback);
            state.demo_visible = false;
            state.cancel_automation();
        }
        info!(session = %self.id, feedback = %feedback, "Feedback received");
        self.emit(SessionEvent::FeedbackReceived { positive });
        self.end_remediation().await
    }

    /// Wait until every background task spawned so far has finished.
    pub async fn idle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        if self.is_closed() {
            return;
        }
        self.tasks.reopen();
        // shutdown() may have closed the tracker between the check and reopen.
        if self.is_closed() {
            self.tasks.close();
        }
    }

    /// Cancel timers and in-flight requests, then wait for tasks to exit.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        info!(session = %self.id, "Session closed");
    }
}

fn prompt_key(prompt: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    prompt.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::LLMResponse;
    use crate::session::random::SequenceRandom;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct Recording {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl Recording {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self { reply: reply.to_string(), prompts: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl LLMProvider for Recording {
        async fn complete(&self, prompt: &str, _system: Option<&str>) -> Result<LLMResponse, BcbError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(LLMResponse {
                content: self.reply.clone(),
                input_tokens: None,
                output_tokens: None,
                model: "recording".into(),
            })
        }
        fn provider_name(&self) -> &str { "recording" }
        fn model_name(&self) -> &str { "recording" }
    }

    struct NoExtract;

    #[async_trait]
    impl DocumentExtractor for NoExtract {
        async fn extract_text(&self, _bytes: &[u8]) -> Result<String, BcbError> {
            Err(BcbError::Extraction("unavailable".into()))
        }
        fn name(&self) -> &str { "none" }
    }

    fn fast_timing() -> DemoTiming {
        DemoTiming {
            splash_delay: Duration::from_millis(10),
            tick_interval: Duration::from_millis(500),
            completion_delay: Duration::from_millis(500),
            max_ticks: 100,
        }
    }

    fn session(llm: Arc<Recording>) -> DemoSession {
        DemoSession::new(llm, Arc::new(NoExtract), fast_timing())
            .with_random_source(Arc::new(SequenceRandom::new(vec![0.5])))
    }

    #[tokio::test]
    async fn test_not_ready_without_description() {
        let s = session(Recording::new("x"));
        assert_eq!(s.run_phase_generation(PhaseId::Phase1).await, GenerationOutcome::NotReady);
    }

    #[tokio::test]
    async fn test_same_inputs_issue_once() {
        let llm = Recording::new("run: df -h");
        let s = session(llm.clone());
        s.set_bug_description("disk full").await.unwrap();
        assert_eq!(
            s.run_phase_generation(PhaseId::Phase1).await,
            GenerationOutcome::Applied("run: df -h".into())
        );
        assert_eq!(s.run_phase_generation(PhaseId::Phase1).await, GenerationOutcome::Unchanged);
        assert_eq!(llm.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_system_info_does_not_retrigger_phase1() {
        let llm = Recording::new("ok");
        let s = session(llm.clone());
        s.set_bug_description("disk full").await.unwrap();
        s.run_phase_generation(PhaseId::Phase1).await;
        s.upload_system_info("Ubuntu 22.04").await.unwrap();
        assert_eq!(s.run_phase_generation(PhaseId::Phase1).await, GenerationOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_empty_reply_uses_phase_fallback() {
        let s = session(Recording::new("   "));
        s.set_bug_description("bug").await.unwrap();
        s.upload_system_info("uname -a").await.unwrap();
        assert_eq!(
            s.run_phase_generation(PhaseId::Phase2).await,
            GenerationOutcome::Applied("Unable to generate personalized suggestion.".into())
        );
    }

    #[tokio::test]
    async fn test_end_without_start_fails() {
        let s = session(Recording::new("x"));
        assert!(matches!(s.end_remediation().await, Err(BcbError::Validation(_))));
        assert!(s.snapshot().await.ttr.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_splash() {
        let s = session(Recording::new("x"));
        s.set_bug_description("bug").await.unwrap();
        s.start_remediation().await.unwrap();
        s.shutdown().await;
        let snap = s.snapshot().await;
        assert!(snap.loading);
        assert!(snap.remediation_start.is_none());
        assert!(s.start_remediation().await.is_err());
    }

    #[tokio::test]
    async fn test_idle_after_shutdown_keeps_tracker_closed() {
        let s = session(Recording::new("x"));
        s.shutdown().await;
        s.idle().await;
        assert!(s.tasks.is_closed());
    }

    #[tokio::test]
    async fn test_leaving_phase_clears_issued_prompt() {
        let llm = Recording::new("ok");
        let s = session(llm.clone());
        s.set_bug_description("disk full").await.unwrap();
        s.run_phase_generation(PhaseId::Phase1).await;
        s.select_phase("phase3").await.unwrap();
        s.select_phase("phase1").await.unwrap();
        assert_eq!(
            s.run_phase_generation(PhaseId::Phase1).await,
            GenerationOutcome::Applied("ok".into())
        );
        assert_eq!(llm.prompts.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_prompt_key_stable() {
        assert_eq!(prompt_key("a"), prompt_key("a"));
        assert_ne!(prompt_key("a"), prompt_key("b"));
    }
}
