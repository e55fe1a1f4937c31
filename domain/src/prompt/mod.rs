//! Prompt domain
//!
//! The `(Mode, Phase, Role)` template table and the synthesizer/judge prompts.

mod template;

pub use template::{PromptTemplate, RoleTemplate, role_template};
