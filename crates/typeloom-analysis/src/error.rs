//! Error types for emission ordering

use std::fmt;
use thiserror::Error;

/// Fatal ordering failures.
///
/// All of these mean the caller's dependency model is structurally invalid
/// and must be fixed upstream before regeneration is attempted; none are
/// retried or partially recovered. Variants carry the still-pending
/// declarations, in input order, so the caller can report exactly what
/// could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError<T>
where
    T: fmt::Debug + fmt::Display,
{
    /// Declarations that mutually wait on each other (self-edges included)
    #[error("dependency cycle among declarations: {}", display_list(.pending))]
    Cycle { pending: Vec<T> },

    /// A declaration depends on something no pair ever supplies
    #[error("declaration `{item}` requires {}, which is never provided", display_list(.missing))]
    MissingDependency {
        item: T,
        missing: Vec<T>,
        pending: Vec<T>,
    },

    /// A lazy dependency source exhausted without yielding a single pair
    #[error("dependency source yielded no pairs before exhausting")]
    EmptySource,
}

impl<T> OrderError<T>
where
    T: fmt::Debug + fmt::Display,
{
    /// Declarations that were still unresolved when ordering failed
    pub fn pending_items(&self) -> &[T] {
        match self {
            OrderError::Cycle { pending } => pending,
            OrderError::MissingDependency { pending, .. } => pending,
            OrderError::EmptySource => &[],
        }
    }
}

fn display_list<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
