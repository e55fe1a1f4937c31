//! Provider table from TOML (`[providers.<id>]` sections)
//!
//! Each entry names one backend the gateway can route to. Roles and the
//! synthesizer refer to entries by their table key.
//!
//! ```toml
//! [providers.claude]
//! kind = "command"
//! program = "claude"
//! args = ["-p"]
//!
//! [providers.gpt]
//! kind = "openai"
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4o"
//! ```

use serde::{Deserialize, Serialize};

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

/// One configured backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileProviderConfig {
    /// Local CLI that reads the prompt on stdin and answers on stdout
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// OpenAI-compatible `/chat/completions` endpoint
    #[serde(rename = "openai")]
    OpenAi {
        #[serde(default = "default_openai_base_url")]
        base_url: String,
        model: String,
        /// Environment variable holding the bearer token
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_max_tokens")]
        max_tokens: u32,
    },
}

impl FileProviderConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            FileProviderConfig::Command { .. } => "command",
            FileProviderConfig::OpenAi { .. } => "openai",
        }
    }

    /// Reason the entry cannot be used, if any
    pub fn problem(&self) -> Option<String> {
        match self {
            FileProviderConfig::Command { program, .. } if program.trim().is_empty() => {
                Some("program must not be empty".to_string())
            }
            FileProviderConfig::OpenAi { model, .. } if model.trim().is_empty() => {
                Some("model must not be empty".to_string())
            }
            FileProviderConfig::OpenAi { base_url, .. }
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) =>
            {
                Some(format!("base_url '{}' is not an http(s) URL", base_url))
            }
            FileProviderConfig::OpenAi { max_tokens: 0, .. } => {
                Some("max_tokens must be greater than 0".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_deserialize_both_kinds() {
        let toml_str = r#"
[claude]
kind = "command"
program = "claude"
args = ["-p"]

[gpt]
kind = "openai"
model = "gpt-4o"
"#;
        let table: BTreeMap<String, FileProviderConfig> = toml::from_str(toml_str).unwrap();

        assert_eq!(
            table["claude"],
            FileProviderConfig::Command {
                program: "claude".to_string(),
                args: vec!["-p".to_string()],
            }
        );
        match &table["gpt"] {
            FileProviderConfig::OpenAi {
                base_url,
                api_key_env,
                max_tokens,
                ..
            } => {
                assert_eq!(base_url, "https://api.openai.com/v1");
                assert_eq!(api_key_env, "OPENAI_API_KEY");
                assert_eq!(*max_tokens, 4096);
            }
            other => panic!("expected openai, got {:?}", other),
        }
        assert_eq!(table["gpt"].kind(), "openai");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result: Result<FileProviderConfig, _> = toml::from_str(
            r#"
kind = "carrier-pigeon"
program = "coo"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_problem_detection() {
        let empty = FileProviderConfig::Command {
            program: "  ".to_string(),
            args: vec![],
        };
        assert!(empty.problem().is_some());

        let bad_url = FileProviderConfig::OpenAi {
            base_url: "api.example.com".to_string(),
            model: "m".to_string(),
            api_key_env: "K".to_string(),
            max_tokens: 10,
        };
        assert!(bad_url.problem().unwrap().contains("not an http(s) URL"));

        let fine = FileProviderConfig::Command {
            program: "gemini".to_string(),
            args: vec![],
        };
        assert!(fine.problem().is_none());
    }
}
