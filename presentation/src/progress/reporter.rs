//! Progress reporting for council runs

use colored::Colorize;
use council_application::ports::progress::ProgressNotifier;
use council_domain::{ModeSelection, Phase, ProviderId, Role, TriageDecision};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a council run with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: &Phase) -> &'static str {
        match phase {
            Phase::Draft => "Draft: independent drafts",
            Phase::Improve => "Improve: revise with peers",
            Phase::Triage => "Triage: pick the leader",
            Phase::Attack => "Attack: stress-test the leader",
            Phase::Synthesis => "Synthesis: final artifact",
        }
    }

    fn task_label(role: Role, provider: Option<&ProviderId>, success: bool) -> String {
        let who = match provider {
            Some(provider) => format!("{} ({})", role.label(), provider),
            None => role.label().to_string(),
        };
        if success {
            format!("{} {}", "v".green(), who)
        } else {
            format!("{} {}", "x".red(), who)
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_mode_selected(&self, selection: &ModeSelection) {
        let _ = self.multi.println(format!(
            "{} {} mode: {}",
            "->".cyan(),
            selection.mode.to_string().bold(),
            selection.mode.description()
        ));
    }

    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_display_name(phase).to_string());
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, _phase: &Phase, role: Role, provider: Option<&ProviderId>, success: bool) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(Self::task_label(role, provider, success));
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &Phase) {
        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} complete", phase.display_name().green()));
        }
    }

    fn on_triage(&self, decision: &TriageDecision) {
        let line = match decision.leader() {
            Some(role) => format!("{} leading draft: {}", "->".cyan(), role.label().bold()),
            None => format!("{} consensus reached, skipping attack", "->".cyan()),
        };
        let _ = self.multi.println(line);
    }
}

/// Plain line-per-event progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_mode_selected(&self, selection: &ModeSelection) {
        eprintln!("{} {} mode", "->".cyan(), selection.mode.to_string().bold());
    }

    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::phase_display_name(phase).bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &Phase, role: Role, provider: Option<&ProviderId>, success: bool) {
        let label = ProgressReporter::task_label(role, provider, success);
        if success {
            eprintln!("  {}", label);
        } else {
            eprintln!("  {} (failed)", label);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {}

    fn on_triage(&self, decision: &TriageDecision) {
        match decision.leader() {
            Some(role) => eprintln!("  leading draft: {}", role.label()),
            None => eprintln!("  consensus reached"),
        }
    }
}
