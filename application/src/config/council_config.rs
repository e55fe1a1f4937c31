//! Council configuration container.
//!
//! [`CouncilConfig`] holds everything a run reads but never writes: which
//! providers back each role, who synthesizes, and the run's time and
//! consensus limits. It is built once at startup and shared read-only.

use council_domain::{DEFAULT_CONSENSUS_THRESHOLD, Mode, ProviderId, Role};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Ordered provider list: the primary first, then fallbacks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderChain {
    providers: Vec<ProviderId>,
}

impl ProviderChain {
    pub fn new(primary: impl Into<ProviderId>) -> Self {
        Self {
            providers: vec![primary.into()],
        }
    }

    pub fn with_fallback(mut self, provider: impl Into<ProviderId>) -> Self {
        self.providers.push(provider.into());
        self
    }

    pub fn with_fallbacks<I, P>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProviderId>,
    {
        self.providers.extend(providers.into_iter().map(Into::into));
        self
    }

    pub fn primary(&self) -> Option<&ProviderId> {
        self.providers.first()
    }

    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Provider bindings for every seat and the synthesizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouncilRoster {
    participants: BTreeMap<Role, ProviderChain>,
    synthesizer: ProviderChain,
}

impl CouncilRoster {
    pub fn new(synthesizer: ProviderChain) -> Self {
        Self {
            participants: BTreeMap::new(),
            synthesizer,
        }
    }

    /// Every role and the synthesizer use the same chain
    pub fn uniform(chain: ProviderChain) -> Self {
        let participants = Mode::Collaborative
            .roster()
            .into_iter()
            .chain(Mode::Adversarial.roster())
            .map(|role| (role, chain.clone()))
            .collect();
        Self {
            participants,
            synthesizer: chain,
        }
    }

    pub fn with_participant(mut self, role: Role, chain: ProviderChain) -> Self {
        self.participants.insert(role, chain);
        self
    }

    /// Chain for a role; empty when the role is unbound
    pub fn chain_for(&self, role: Role) -> ProviderChain {
        self.participants.get(&role).cloned().unwrap_or_default()
    }

    pub fn synthesizer(&self) -> &ProviderChain {
        &self.synthesizer
    }

    pub fn participants(&self) -> impl Iterator<Item = (&Role, &ProviderChain)> {
        self.participants.iter()
    }
}

/// Read-only configuration for council runs
#[derive(Debug, Clone, PartialEq)]
pub struct CouncilConfig {
    roster: CouncilRoster,
    timeout: Duration,
    consensus_threshold: f64,
    default_mode: Option<Mode>,
}

impl CouncilConfig {
    pub fn new(roster: CouncilRoster) -> Self {
        Self {
            roster,
            timeout: DEFAULT_TIMEOUT,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
            default_mode: None,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_consensus_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    /// Force a mode whenever the caller passes no explicit override
    pub fn with_default_mode(mut self, mode: Option<Mode>) -> Self {
        self.default_mode = mode;
        self
    }

    // ==================== Accessors ====================

    pub fn roster(&self) -> &CouncilRoster {
        &self.roster
    }

    /// Per-call timeout applied to every provider attempt
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn consensus_threshold(&self) -> f64 {
        self.consensus_threshold
    }

    pub fn default_mode(&self) -> Option<Mode> {
        self.default_mode
    }
}
