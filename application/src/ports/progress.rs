//! Progress notification port
//!
//! Defines the interface for reporting progress during a council run.

use council_domain::{ModeSelection, Phase, ProviderId, Role, TriageDecision};

/// Callback for progress updates during a council run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called once the mode is fixed, before any participant is invoked
    fn on_mode_selected(&self, _selection: &ModeSelection) {}

    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when a participant settles within a phase.
    ///
    /// `provider` is the provider that produced the draft, if any.
    fn on_task_complete(&self, phase: &Phase, role: Role, provider: Option<&ProviderId>, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);

    /// Called after triage (adversarial mode)
    fn on_triage(&self, _decision: &TriageDecision) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(
        &self,
        _phase: &Phase,
        _role: Role,
        _provider: Option<&ProviderId>,
        _success: bool,
    ) {
    }
    fn on_phase_complete(&self, _phase: &Phase) {}
}
