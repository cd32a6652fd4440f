//! Analysis primitives for the typeloom code generator
//!
//! Two independent, leaf-level components consumed by the generator:
//! exhaustiveness checking over single-rooted type hierarchies
//! ([`CoverageChecker`]) and dependency-safe ordering of generated
//! declarations ([`EmissionOrder`]). They share no state and can be used
//! side by side.

pub mod coverage;
pub mod emit_order;
pub mod error;
pub mod hierarchy;

pub use coverage::CoverageChecker;
pub use emit_order::{emission_order, EmissionOrder};
pub use error::OrderError;
pub use hierarchy::{Hierarchy, NodeId, TypeHierarchy};
