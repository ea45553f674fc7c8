//! Domain-level errors (no external dependencies)

use itertools::Itertools;
use thiserror::Error;

/// Domain errors represent invalid input caught before any remote call.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// Every required flag that was left at its zero value, in declaration order.
    #[error("required flag(s) {} not set", quoted(.0))]
    MissingFlags(Vec<String>),

    #[error("{field} mismatch: file has '{from_file}' but --{field} is '{from_flag}'")]
    NameMismatch {
        field: String,
        from_file: String,
        from_flag: String,
    },

    #[error("invalid value for --{flag}: {reason}")]
    InvalidFlag { flag: String, reason: String },

    #[error("connector config[\"name\"] '{given}' does not match the existing one '{existing}'")]
    ConnectorNameConflict { given: String, existing: String },
}

impl DomainError {
    pub fn invalid_flag(flag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFlag {
            flag: flag.into(),
            reason: reason.into(),
        }
    }

    /// Names of the missing flags, empty for other variants.
    pub fn missing_flags(&self) -> &[String] {
        match self {
            Self::MissingFlags(names) => names,
            _ => &[],
        }
    }
}

fn quoted(names: &[String]) -> String {
    names.iter().map(|n| format!("\"{n}\"")).join(", ")
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_missing_flags_when_displayed_then_lists_all_quoted() {
        let err = DomainError::MissingFlags(vec!["clusterName".into(), "name".into()]);
        assert_eq!(
            err.to_string(),
            r#"required flag(s) "clusterName", "name" not set"#
        );
    }
}
