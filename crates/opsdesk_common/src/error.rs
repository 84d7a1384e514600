//! Typed errors surfaced to the request layer.
//!
//! Only resolution submission has a caller-visible error: blank
//! required fields. Everything else in the engine degrades to an
//! empty/default result plus a log line.

use thiserror::Error;

/// Required resolution fields were blank after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {}", .missing_fields.join(", "))]
pub struct ValidationFailure {
    pub missing_fields: Vec<String>,
}

impl ValidationFailure {
    /// Validate a resolution submission. Fields are trimmed before the
    /// blank check, matching what callers persist.
    pub fn check(
        root_cause: &str,
        solution: &str,
        resolved_by: &str,
    ) -> Result<(), ValidationFailure> {
        let mut missing_fields = Vec::new();
        if root_cause.trim().is_empty() {
            missing_fields.push("root_cause".to_string());
        }
        if solution.trim().is_empty() {
            missing_fields.push("solution".to_string());
        }
        if resolved_by.trim().is_empty() {
            missing_fields.push("resolved_by".to_string());
        }

        if missing_fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { missing_fields })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_present() {
        assert!(ValidationFailure::check("bad deploy", "rollback", "alice").is_ok());
    }

    #[test]
    fn test_whitespace_only_is_blank() {
        let err = ValidationFailure::check("  ", "rollback", "alice").unwrap_err();
        assert_eq!(err.missing_fields, vec!["root_cause"]);
    }

    #[test]
    fn test_multiple_blank_fields_all_reported() {
        let err = ValidationFailure::check("", "fix", "").unwrap_err();
        assert_eq!(err.missing_fields, vec!["root_cause", "resolved_by"]);
        assert!(err.to_string().contains("root_cause"));
        assert!(err.to_string().contains("resolved_by"));
    }

    #[test]
    fn test_prevention_is_never_required() {
        // prevention is optional by contract and is not checked at all
        assert!(ValidationFailure::check("cause", "fix", "bob").is_ok());
    }
}
