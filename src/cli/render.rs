use std::time::Duration;
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use crate::phases::PhaseId;
use crate::session::{SessionEvent, SessionSnapshot, TtrComparison};

/// Renders session events as indicatif spinners and bars.
pub struct DemoProgress {
    multi: MultiProgress,
    splash: Option<ProgressBar>,
    generation: Option<ProgressBar>,
    automation: Option<ProgressBar>,
}

impl DemoProgress {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            splash: None,
            generation: None,
            automation: None,
        }
    }

    fn spinner(&self, message: String) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
        );
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }

    pub fn handle_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Loading => {
                self.splash = Some(self.spinner("Preparing your personalized remediation...".into()));
            }
            SessionEvent::RemediationStarted { phase, .. } => {
                if let Some(bar) = self.splash.take() {
                    bar.finish_and_clear();
                }
                self.println(&format!("  {} Remediation started ({})", style("▶").cyan(), phase));
            }
            SessionEvent::GenerationIssued { phase, .. } => {
                let message = match phase {
                    PhaseId::Phase2 => "Generating personalized suggestion...",
                    PhaseId::Phase3 => "Generating automated remediation steps...",
                    PhaseId::Phase1 => "Generating suggestion...",
                };
                let spinner = self.spinner(message.into());
                if let Some(old) = self.generation.replace(spinner) {
                    old.finish_and_clear();
                }
                if *phase == PhaseId::Phase3 {
                    let bar = self.multi.add(ProgressBar::new(100));
                    bar.set_style(
                        ProgressStyle::default_bar()
                            .template("  {bar:30.green/dark_gray} {pos}% Complete")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("█▓░")
                    );
                    if let Some(old) = self.automation.replace(bar) {
                        old.finish_and_clear();
                    }
                }
            }
            SessionEvent::SuggestionReady { .. } | SessionEvent::GenerationDiscarded { .. } => {
                if let Some(bar) = self.generation.take() {
                    bar.finish_and_clear();
                }
            }
            SessionEvent::ProgressTick { value, .. } => {
                if let Some(bar) = &self.automation {
                    bar.set_position(value.round() as u64);
                }
            }
            SessionEvent::AutomationComplete => {
                if let Some(bar) = self.automation.take() {
                    bar.finish();
                }
                self.println(&format!("  {}", style("Remediation Complete!").green().bold()));
            }
            SessionEvent::FeedbackReceived { positive } => {
                let label = if *positive { "Positive" } else { "Negative" };
                self.println(&format!("  Feedback received: {}", label));
            }
            SessionEvent::TtrComputed { .. } => {}
        }
    }

    pub fn println(&self, msg: &str) {
        let _ = self.multi.println(msg);
    }

    pub fn finish(&mut self) {
        for bar in [self.splash.take(), self.generation.take(), self.automation.take()].into_iter().flatten() {
            bar.finish_and_clear();
        }
    }
}

impl Default for DemoProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume events until every sender is dropped.
pub async fn render_events(mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
    let mut progress = DemoProgress::new();
    while let Some(event) = rx.recv().await {
        progress.handle_event(&event);
    }
    progress.finish();
}

pub fn print_outputs(snapshot: &SessionSnapshot) {
    let phase = snapshot.active_phase;
    let Some(output) = snapshot.output(phase) else {
        if phase == PhaseId::Phase2 && snapshot.system_info.is_none() {
            println!("  {} Upload system info (--system-info) for personalized steps.", style("!").yellow());
        }
        return;
    };

    println!();
    match phase {
        PhaseId::Phase1 => println!("  {}", style("Suggested Command Line Fixes").bold()),
        PhaseId::Phase2 => println!("  {}", style("Personalized Remediation Steps").bold()),
        PhaseId::Phase3 => println!("  {}", style("Automated Remediation Process").bold()),
    }
    println!();

    if phase == PhaseId::Phase3 {
        let done = snapshot.automation.steps_completed;
        for (i, step) in output.steps.iter().enumerate() {
            if i < done {
                println!("  {} {}", style("✓").green(), style(step).green());
            } else {
                println!("  • {}", step);
            }
        }
    } else if let Some(text) = &output.suggestion {
        for line in text.lines() {
            println!("    {}", line);
        }
    }
    println!();
}

pub fn print_ttr(ttr: &TtrComparison) {
    println!("  {}", style("TTR Comparison").bold());
    println!("    TTR with system: {:.2} seconds", ttr.with_system_secs);
    println!("    Estimated TTR without system: {:.2} seconds", ttr.without_system_secs);
    match ttr.improvement_pct() {
        Some(pct) => println!("    {}", style(format!("Improvement: {:.2}%", pct)).green().bold()),
        None => println!("    Improvement: n/a"),
    }
}
