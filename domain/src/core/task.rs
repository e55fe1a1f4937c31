//! Task value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A request to be answered by the council (Value Object)
///
/// Immutable once a run starts; every phase reads the same text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task {
    content: String,
}

impl Task {
    /// Create a new task, rejecting empty or whitespace-only text
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyTask);
        }
        Ok(Self { content })
    }

    /// Get the task content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for Task {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Task::new(s)
    }
}

impl TryFrom<String> for Task {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Task::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("design a caching layer").unwrap();
        assert_eq!(task.content(), "design a caching layer");
    }

    #[test]
    fn test_empty_task_rejected() {
        assert_eq!(Task::new(""), Err(DomainError::EmptyTask));
        assert_eq!(Task::new("   \n"), Err(DomainError::EmptyTask));
    }

    #[test]
    fn test_try_from_str() {
        let task: Task = "REST or gRPC?".try_into().unwrap();
        assert_eq!(task.to_string(), "REST or gRPC?");
    }
}
