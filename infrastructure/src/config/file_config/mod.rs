//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod council;
mod output;
mod providers;
mod roles;

pub use council::{FileCouncilConfig, MAX_TIMEOUT_SECONDS};
pub use output::{FileLoggingConfig, FileOutputConfig};
pub use providers::FileProviderConfig;
pub use roles::FileChainConfig;

use council_application::{CouncilConfig, CouncilRoster, ProviderChain};
use council_domain::{Mode, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Run limits and mode override
    pub council: FileCouncilConfig,
    /// Provider chain per role
    pub roles: BTreeMap<Role, FileChainConfig>,
    /// Provider chain for the synthesizer/judge seat
    pub synthesizer: Option<FileChainConfig>,
    /// Backends, keyed by the id roles refer to
    pub providers: BTreeMap<String, FileProviderConfig>,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
}

/// A problem found while validating a [`FileConfig`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("council.timeout_seconds must be between 1 and {max}, got {0}", max = MAX_TIMEOUT_SECONDS)]
    InvalidTimeout(u64),

    #[error("council.consensus_threshold must be within (0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("{section} refers to undefined provider '{provider}'")]
    UndefinedProvider { section: String, provider: String },

    #[error("providers.{id}: {reason}")]
    InvalidProvider { id: String, reason: String },

    #[error("{seat} has no provider (set [{seat}] provider or council.default_provider)")]
    Unbound { seat: String },
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected problems.
    ///
    /// Checks run limits, every provider entry, and that each seat is bound
    /// to providers that exist in the `[providers]` table.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let timeout = self.council.timeout_seconds;
        if timeout == 0 || timeout > MAX_TIMEOUT_SECONDS {
            errors.push(ConfigValidationError::InvalidTimeout(timeout));
        }
        let threshold = self.council.consensus_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            errors.push(ConfigValidationError::InvalidThreshold(threshold));
        }

        for (id, provider) in &self.providers {
            if let Some(reason) = provider.problem() {
                errors.push(ConfigValidationError::InvalidProvider {
                    id: id.clone(),
                    reason,
                });
            }
        }

        if let Some(default) = &self.council.default_provider {
            self.check_defined("council.default_provider", default, &mut errors);
        }

        for (section, binding) in self.seat_bindings() {
            match binding {
                Some(binding) => {
                    for provider in binding.provider_ids() {
                        self.check_defined(&section, provider, &mut errors);
                    }
                }
                None if self.council.default_provider.is_none() => {
                    errors.push(ConfigValidationError::Unbound { seat: section });
                }
                None => {}
            }
        }

        errors
    }

    /// Build the read-only run configuration.
    ///
    /// Seats without their own binding fall back to `council.default_provider`.
    pub fn council_config(&self) -> CouncilConfig {
        let default_chain = self
            .council
            .default_provider
            .as_deref()
            .map(ProviderChain::new)
            .unwrap_or_default();

        let synthesizer = self
            .synthesizer
            .as_ref()
            .map(FileChainConfig::to_chain)
            .unwrap_or_else(|| default_chain.clone());

        let roster = all_roles().fold(CouncilRoster::new(synthesizer), |roster, role| {
            let chain = self
                .roles
                .get(&role)
                .map(FileChainConfig::to_chain)
                .unwrap_or_else(|| default_chain.clone());
            roster.with_participant(role, chain)
        });

        CouncilConfig::new(roster)
            .with_timeout(self.council.timeout())
            .with_consensus_threshold(self.council.consensus_threshold)
            .with_default_mode(self.council.default_mode)
    }

    /// Every seat with its section name and explicit binding
    fn seat_bindings(&self) -> Vec<(String, Option<&FileChainConfig>)> {
        all_roles()
            .map(|role| (format!("roles.{}", role.as_str()), self.roles.get(&role)))
            .chain(std::iter::once((
                "synthesizer".to_string(),
                self.synthesizer.as_ref(),
            )))
            .collect()
    }

    fn check_defined(&self, section: &str, provider: &str, errors: &mut Vec<ConfigValidationError>) {
        if !self.providers.contains_key(provider) {
            errors.push(ConfigValidationError::UndefinedProvider {
                section: section.to_string(),
                provider: provider.to_string(),
            });
        }
    }
}

fn all_roles() -> impl Iterator<Item = Role> {
    Mode::Collaborative
        .roster()
        .into_iter()
        .chain(Mode::Adversarial.roster())
}
