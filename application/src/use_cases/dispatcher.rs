//! Phase dispatcher
//!
//! Fans out every participant call of a phase concurrently and joins behind a
//! full barrier. Each participant walks its provider chain (primary, then
//! fallbacks), every attempt bounded by the per-call timeout. The phase itself
//! is bounded by the slowest allowed participant budget; when it passes, the
//! calls still running are aborted and their slots fail.
//!
//! Results are keyed by role, so completion order never shows up in a round.

use crate::config::ProviderChain;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::ProgressNotifier;
use council_domain::{
    DomainError, Draft, ParticipantFailure, Payload, Phase, ProviderAttempt, ProviderId, Role,
    Round, RoundAccumulator, SlotOutcome,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One participant call in a phase
#[derive(Debug, Clone)]
pub struct ParticipantRequest {
    pub role: Role,
    pub chain: ProviderChain,
    pub payload: Payload,
}

/// Concurrent fan-out/fan-in over a gateway
pub struct Dispatcher<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    per_call_timeout: Duration,
}

impl<G: LlmGateway + 'static> Dispatcher<G> {
    pub fn new(gateway: Arc<G>, per_call_timeout: Duration) -> Self {
        Self {
            gateway,
            per_call_timeout,
        }
    }

    /// Phase deadline: `per_call_timeout * chain length`, max over participants.
    ///
    /// Saturates at `Duration::MAX` for huge timeouts.
    pub fn phase_deadline(&self, requests: &[ParticipantRequest]) -> Duration {
        requests
            .iter()
            .map(|r| {
                let attempts = u32::try_from(r.chain.len().max(1)).unwrap_or(u32::MAX);
                self.per_call_timeout
                    .checked_mul(attempts)
                    .unwrap_or(Duration::MAX)
            })
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Run one phase and return its sealed round.
    ///
    /// Individual failures never abort the phase; only cancellation does.
    pub async fn dispatch(
        &self,
        phase: Phase,
        requests: Vec<ParticipantRequest>,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Round, DomainError> {
        info!("Phase {}: dispatching {} participant(s)", phase, requests.len());
        progress.on_phase_start(&phase, requests.len());

        let mut accumulator = RoundAccumulator::new(phase, requests.iter().map(|r| r.role));
        let deadline = self.phase_deadline(&requests);

        let mut join_set = JoinSet::new();
        let mut task_roles = HashMap::new();
        for request in requests {
            debug!(
                "Dispatching {} ({} provider(s)), prompt {} bytes",
                request.role,
                request.chain.len(),
                request.payload.prompt.len()
            );
            let gateway = Arc::clone(&self.gateway);
            let timeout = self.per_call_timeout;
            let role = request.role;

            let handle = join_set.spawn(async move {
                let outcome = match Self::try_chain(&gateway, &request.chain, &request.payload, timeout).await
                {
                    Ok((provider, content)) => SlotOutcome::Drafted(Arc::new(Draft::new(
                        request.role,
                        phase,
                        provider,
                        content,
                    ))),
                    Err(attempts) => {
                        SlotOutcome::Failed(ParticipantFailure::new(request.role, phase, attempts))
                    }
                };
                (request.role, outcome)
            });
            task_roles.insert(handle.id(), role);
        }

        let cancelled = async {
            match cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(cancelled);
        let barrier = tokio::time::sleep(deadline);
        tokio::pin!(barrier);

        loop {
            tokio::select! {
                biased;

                _ = &mut cancelled => {
                    warn!("Phase {} cancelled", phase);
                    join_set.abort_all();
                    return Err(DomainError::Cancelled);
                }
                joined = join_set.join_next() => match joined {
                    Some(Ok((role, outcome))) => {
                        let provider = outcome.draft().map(|d| d.provider.clone());
                        match &outcome {
                            SlotOutcome::Drafted(_) => info!("{} responded in {}", role, phase),
                            SlotOutcome::Failed(failure) => {
                                warn!("{} failed in {}: {}", role, phase, failure.reason())
                            }
                        }
                        progress.on_task_complete(&phase, role, provider.as_ref(), outcome.is_drafted());
                        accumulator.record(role, outcome);
                    }
                    Some(Err(e)) => {
                        warn!("Task join error: {}", e);
                        if let Some(role) = task_roles.get(&e.id()).copied() {
                            progress.on_task_complete(&phase, role, None, false);
                            accumulator.record(
                                role,
                                SlotOutcome::Failed(ParticipantFailure::new(
                                    role,
                                    phase,
                                    vec![ProviderAttempt {
                                        provider: ProviderId::new("dispatcher"),
                                        error: e.to_string(),
                                    }],
                                )),
                            );
                        }
                    }
                    None => break,
                },
                _ = &mut barrier => {
                    let pending = accumulator.pending();
                    warn!(
                        "Phase {} deadline of {:?} exceeded; {} participant(s) still running",
                        phase,
                        deadline,
                        pending.len()
                    );
                    join_set.abort_all();
                    for role in pending {
                        progress.on_task_complete(&phase, role, None, false);
                    }
                    accumulator.expire_pending();
                    break;
                }
            }
        }

        progress.on_phase_complete(&phase);
        accumulator.seal()
    }

    /// Call a single provider chain outside any phase barrier (synthesizer/judge).
    ///
    /// Cancellation aborts the call; otherwise every attempt error is returned.
    pub async fn call_chain(
        &self,
        chain: &ProviderChain,
        payload: &Payload,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Result<(ProviderId, String), Vec<ProviderAttempt>>, DomainError> {
        let call = Self::try_chain(&self.gateway, chain, payload, self.per_call_timeout);
        match cancellation {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(DomainError::Cancelled),
                result = call => Ok(result),
            },
            None => Ok(call.await),
        }
    }

    /// Try every provider of the chain in order until one answers
    async fn try_chain(
        gateway: &G,
        chain: &ProviderChain,
        payload: &Payload,
        timeout: Duration,
    ) -> Result<(ProviderId, String), Vec<ProviderAttempt>> {
        let mut attempts = Vec::new();

        for provider in chain.providers() {
            let result = tokio::time::timeout(
                timeout,
                gateway.invoke(provider, &payload.system, &payload.prompt),
            )
            .await
            .unwrap_or(Err(GatewayError::Timeout))
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(GatewayError::EmptyResponse)
                } else {
                    Ok(text)
                }
            });

            match result {
                Ok(text) => return Ok((provider.clone(), text)),
                Err(e) => {
                    warn!("Provider {} failed: {}", provider, e);
                    attempts.push(ProviderAttempt {
                        provider: provider.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Err(attempts)
    }
}
