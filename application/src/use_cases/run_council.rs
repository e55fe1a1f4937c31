//! Run Council use case
//!
//! Orchestrates a full council run:
//!
//! - **Collaborative**: Draft → Improve → Synthesize
//! - **Adversarial**: Draft → Triage → Attack → Judge
//!
//! Every phase is dispatched concurrently and joined behind a barrier; the
//! next phase is only ever built from the previous phase's sealed round.

use crate::config::CouncilConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::dispatcher::{Dispatcher, ParticipantRequest};
use council_domain::council::round_builder::{
    attack_payloads, draft_payloads, improve_payloads, judge_payload, synthesis_payload,
};
use council_domain::council::verdict::strip_verdict_lines;
use council_domain::{
    CouncilOutcome, Critique, DomainError, FinalArtifact, Mode, ParticipantFailure, Payload,
    Phase, ProviderAttempt, ProviderId, Role, Round, SlotOutcome, Task, Transcript,
    TriageDecision, VerdictAssessment, ensure_emergent_ideas, find_emergent_ideas, select_mode,
    triage,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a council run
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("All participants failed in the {phase} phase: {}", describe_failures(.failures))]
    RunFailed {
        phase: Phase,
        failures: Vec<ParticipantFailure>,
    },

    #[error("Synthesis failed: {}", describe_attempts(.attempts))]
    SynthesisFailed { attempts: Vec<ProviderAttempt> },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Domain error: {0}")]
    Domain(DomainError),
}

impl RunCouncilError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunCouncilError::Cancelled)
    }
}

impl From<DomainError> for RunCouncilError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Cancelled => RunCouncilError::Cancelled,
            other => RunCouncilError::Domain(other),
        }
    }
}

fn describe_failures(failures: &[ParticipantFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.role, f.reason()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_attempts(attempts: &[ProviderAttempt]) -> String {
    if attempts.is_empty() {
        return "no synthesizer providers configured".to_string();
    }
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.provider, a.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct CouncilInput {
    pub task: Task,
    /// Explicit mode, winning over any marker or keyword in the task
    pub override_mode: Option<Mode>,
    /// Expose every round and decision in the outcome
    pub verbose: bool,
}

impl CouncilInput {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            override_mode: None,
            verbose: false,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.override_mode = Some(mode);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Use case for running a council
pub struct RunCouncilUseCase<G: LlmGateway + 'static> {
    dispatcher: Dispatcher<G>,
    config: CouncilConfig,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> RunCouncilUseCase<G> {
    pub fn new(gateway: Arc<G>, config: CouncilConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(gateway, config.timeout()),
            config,
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    /// Record a JSONL transcript of the run
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: CouncilInput) -> Result<CouncilOutcome, RunCouncilError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: CouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilOutcome, RunCouncilError> {
        self.check_cancelled()?;

        let selection = select_mode(
            input.task.content(),
            input.override_mode.or(self.config.default_mode()),
        );
        let mode = selection.mode;
        info!("Starting council in {} mode ({:?})", mode, selection.reason);
        progress.on_mode_selected(&selection);
        self.logger.log(ConversationEvent::new(
            "mode_selected",
            json!({
                "task": input.task.content(),
                "mode": mode,
                "reason": &selection.reason,
            }),
        ));

        let mut transcript = Transcript::new(selection);

        // Phase 1: Draft
        let drafts = self
            .run_phase(Phase::Draft, draft_payloads(mode, &input.task)?, progress)
            .await?;
        transcript.push_round(drafts.clone());

        let (final_artifact, verdict) = match mode {
            Mode::Collaborative => {
                let artifact = self
                    .run_collaborative(&input.task, drafts, &mut transcript, progress)
                    .await?;
                (artifact, None)
            }
            Mode::Adversarial => {
                let (artifact, verdict) = self
                    .run_adversarial(&input.task, drafts, &mut transcript, progress)
                    .await?;
                (artifact, Some(verdict))
            }
        };

        if let Some(note) = &transcript.incomplete_input {
            warn!("{}", note);
        }
        self.logger.log(ConversationEvent::new(
            "final_artifact",
            json!({
                "producer": &final_artifact.producer,
                "content": &final_artifact.content,
                "emergent_ideas": final_artifact.emergent_ideas.len(),
                "incomplete_input": &transcript.incomplete_input,
            }),
        ));
        info!("Council complete");

        Ok(CouncilOutcome {
            task: input.task,
            mode,
            final_artifact,
            verdict,
            transcript: input.verbose.then_some(transcript),
        })
    }

    /// Improve (when at least two drafts exist), then synthesize
    async fn run_collaborative(
        &self,
        task: &Task,
        drafts: Round,
        transcript: &mut Transcript,
        progress: &dyn ProgressNotifier,
    ) -> Result<FinalArtifact, RunCouncilError> {
        // Phase 2: Improve
        let terminal = if drafts.draft_count() >= 2 {
            let payloads = improve_payloads(Mode::Collaborative, task, &drafts)?;
            let improved = self.run_phase(Phase::Improve, payloads, progress).await?;
            transcript.push_round(improved.clone());
            improved
        } else {
            info!("Only one draft available; skipping the improve phase");
            drafts
        };

        // Phase 3: Synthesis
        let emergent = find_emergent_ideas(&terminal);
        debug!("{} emergent idea(s) found", emergent.len());

        let payload = synthesis_payload(task, &terminal, &emergent);
        let (producer, text) = self.synthesize(&payload, progress).await?;

        let content = ensure_emergent_ideas(text, &emergent);
        Ok(FinalArtifact::new(content, producer).with_emergent_ideas(emergent))
    }

    /// Triage, attack the leading draft, then judge
    async fn run_adversarial(
        &self,
        task: &Task,
        drafts: Round,
        transcript: &mut Transcript,
        progress: &dyn ProgressNotifier,
    ) -> Result<(FinalArtifact, VerdictAssessment), RunCouncilError> {
        // Phase 2: Triage (no external call)
        let Some(decision) = triage(&drafts, self.config.consensus_threshold()) else {
            return Err(RunCouncilError::RunFailed {
                phase: Phase::Draft,
                failures: drafts.failures().cloned().collect(),
            });
        };
        match &decision {
            TriageDecision::Consensus { reason } => info!("Triage: consensus ({:?})", reason),
            TriageDecision::Leading { role, .. } => info!("Triage: {} leads", role),
        }
        progress.on_triage(&decision);
        self.logger
            .log(ConversationEvent::new("triage", json!({ "decision": &decision })));
        transcript.triage = Some(decision.clone());

        let Some(leader) = decision.leader() else {
            // Consensus: no attack phase, the judge merges the agreeing drafts
            let payload = judge_payload(task, &drafts, None, None)?;
            let (producer, text) = self.synthesize(&payload, progress).await?;
            let verdict = VerdictAssessment::consensus();
            self.log_verdict(&verdict);
            return Ok((
                FinalArtifact::new(strip_verdict_lines(&text), producer),
                verdict,
            ));
        };

        // Phase 3: Attack
        let payloads = attack_payloads(Mode::Adversarial, task, &drafts, leader)?;
        let attacks = if payloads.is_empty() {
            info!("No attackers available; the leading draft goes straight to the judge");
            None
        } else {
            let round = self.run_phase(Phase::Attack, payloads, progress).await?;
            transcript.push_round(round.clone());
            Some(round)
        };

        let critiques: Vec<Critique> = attacks
            .iter()
            .flat_map(|round| round.drafts())
            .map(|draft| Critique::from_draft(draft))
            .collect();
        transcript.critiques = critiques.clone();

        // Phase 4: Judge
        let payload = judge_payload(task, &drafts, Some(leader), attacks.as_ref())?;
        let (producer, text) = self.synthesize(&payload, progress).await?;

        let expected_attackers = Mode::Adversarial.roster().len() - 1;
        let verdict = VerdictAssessment::from_attack(&text, &critiques, expected_attackers);
        info!("Verdict: {} ({})", verdict.verdict, verdict.confidence);
        self.log_verdict(&verdict);

        Ok((FinalArtifact::new(strip_verdict_lines(&text), producer), verdict))
    }

    /// Dispatch one phase and log its outcomes.
    ///
    /// Fails the run only when every participant of a drafting phase failed.
    /// An attack round with no critiques still goes to the judge.
    async fn run_phase(
        &self,
        phase: Phase,
        payloads: BTreeMap<Role, Payload>,
        progress: &dyn ProgressNotifier,
    ) -> Result<Round, RunCouncilError> {
        self.check_cancelled()?;
        self.logger.log(ConversationEvent::new(
            "phase_start",
            json!({
                "phase": phase,
                "participants": payloads.keys().collect::<Vec<_>>(),
            }),
        ));

        let requests = payloads
            .into_iter()
            .map(|(role, payload)| ParticipantRequest {
                role,
                chain: self.config.roster().chain_for(role),
                payload,
            })
            .collect();

        let round = self
            .dispatcher
            .dispatch(phase, requests, progress, self.cancellation_token.as_ref())
            .await?;

        for role in round.roles() {
            match round.outcome(role) {
                Some(SlotOutcome::Drafted(draft)) => self.logger.log(ConversationEvent::new(
                    "participant_draft",
                    json!({
                        "phase": phase,
                        "role": role,
                        "provider": &draft.provider,
                        "content": &draft.content,
                    }),
                )),
                Some(SlotOutcome::Failed(failure)) => self.logger.log(ConversationEvent::new(
                    "participant_failed",
                    json!({
                        "phase": phase,
                        "role": role,
                        "reason": failure.reason(),
                        "deadline_exceeded": failure.deadline_exceeded,
                    }),
                )),
                None => {}
            }
        }

        if phase != Phase::Attack && round.is_total_failure() {
            return Err(RunCouncilError::RunFailed {
                phase,
                failures: round.failures().cloned().collect(),
            });
        }
        Ok(round)
    }

    /// Call the synthesizer/judge chain
    async fn synthesize(
        &self,
        payload: &Payload,
        progress: &dyn ProgressNotifier,
    ) -> Result<(ProviderId, String), RunCouncilError> {
        self.check_cancelled()?;
        info!("Phase {}: calling synthesizer", Phase::Synthesis);
        progress.on_phase_start(&Phase::Synthesis, 1);
        self.logger.log(ConversationEvent::new(
            "phase_start",
            json!({ "phase": Phase::Synthesis, "participants": ["synthesizer"] }),
        ));

        let chain = self.config.roster().synthesizer();
        let result = self
            .dispatcher
            .call_chain(chain, payload, self.cancellation_token.as_ref())
            .await?;
        progress.on_phase_complete(&Phase::Synthesis);

        match result {
            Ok((provider, text)) => Ok((provider, text)),
            Err(attempts) => {
                warn!("Synthesizer failed: {}", describe_attempts(&attempts));
                Err(RunCouncilError::SynthesisFailed { attempts })
            }
        }
    }

    fn log_verdict(&self, verdict: &VerdictAssessment) {
        self.logger
            .log(ConversationEvent::new("verdict", json!(verdict)));
    }

    fn check_cancelled(&self) -> Result<(), RunCouncilError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(RunCouncilError::Cancelled);
        }
        Ok(())
    }
}
