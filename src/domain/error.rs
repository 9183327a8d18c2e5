//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent tree lookups that could not be satisfied.
///
/// There is a single kind: a path segment, a parent, or a leaf was not found.
/// `missing` carries the unresolved path prefix, `context` the message shown
/// to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{context}")]
    NotFound { missing: String, context: String },
}

impl DomainError {
    /// `<missing> does not exist`
    pub fn not_found(missing: impl Into<String>) -> Self {
        let missing = missing.into();
        Self::NotFound {
            context: format!("{missing} does not exist"),
            missing,
        }
    }

    /// Wrap a lookup failure encountered while deleting `path`.
    pub fn cannot_delete(path: &str, cause: DomainError) -> Self {
        let DomainError::NotFound { missing, context } = cause;
        Self::NotFound {
            context: format!("Cannot delete {path} - {context}"),
            missing,
        }
    }

    /// Target lies inside the subtree being moved.
    pub fn inside_source(source: &str, target: &str) -> Self {
        Self::NotFound {
            context: format!(
                "Cannot move {source} into {target} - {target} does not exist once {source} is detached"
            ),
            missing: target.to_string(),
        }
    }

    /// The root is not a child of anything and cannot be moved.
    pub fn root_source(source: &str) -> Self {
        Self::NotFound {
            context: format!("Cannot move {source} - the root has no parent to detach from"),
            missing: source.to_string(),
        }
    }

    /// The unresolved path prefix.
    pub fn missing(&self) -> &str {
        match self {
            DomainError::NotFound { missing, .. } => missing,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
