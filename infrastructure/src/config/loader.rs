//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "agent-council";
const PROJECT_FILES: [&str; 2] = ["council.toml", ".council.toml"];
const ENV_PREFIX: &str = "COUNCIL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `COUNCIL_` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./council.toml` or `./.council.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/agent-council/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/agent-council/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./council.toml or ./.council.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Mode, Role};
    use figment::Jail;

    /// Keep the developer's global config out of the jail
    fn isolate(jail: &mut Jail) {
        let dir = jail.directory().display().to_string();
        jail.set_env("XDG_CONFIG_HOME", &dir);
        jail.set_env("HOME", &dir);
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.council.timeout_seconds, 120);
        assert!(config.providers.is_empty());
        assert!(config.logging.transcript_dir.is_none());
    }

    #[test]
    fn test_global_config_path_names_app_dir() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.to_string_lossy().contains("agent-council"));
            assert!(path.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_project_file_is_merged_over_defaults() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(
                "council.toml",
                r#"
[council]
timeout_seconds = 45

[roles.visionary]
provider = "claude"

[providers.claude]
kind = "command"
program = "claude"
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.council.timeout_seconds, 45);
            assert!((config.council.consensus_threshold - 0.8).abs() < f64::EPSILON);
            assert_eq!(config.roles[&Role::Visionary].provider, "claude");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(".council.toml", "[council]\ntimeout_seconds = 45\n")?;
            jail.create_file("custom.toml", "[council]\ntimeout_seconds = 10\n")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.council.timeout_seconds, 10);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("council.toml", "[council]\ndefault_mode = \"collaborative\"\n")?;
            jail.set_env("COUNCIL_COUNCIL__DEFAULT_MODE", "adversarial");
            jail.set_env("COUNCIL_COUNCIL__TIMEOUT_SECONDS", "7");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.council.default_mode, Some(Mode::Adversarial));
            assert_eq!(config.council.timeout_seconds, 7);
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("council.toml", "[council]\ntimeout_seconds = \"soon\"\n")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }
}
