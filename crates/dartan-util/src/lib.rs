//! dartan-util - Foundation types for the Dart analyzer.
//!
//! This crate provides the types shared by every analysis phase:
//!
//! - [`Span`]: source location tracking (byte offsets plus line/column)
//! - [`Diagnostic`] and [`Phase`]: the structured error model produced by
//!   the lexical, syntactic and semantic passes
//! - [`Handler`]: a per-pass diagnostic collector
//!
//! Everything here is instance-scoped. The analyzer deliberately has no
//! global state of any kind, so that independent analyses never observe
//! each other.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, Handler, Phase};
pub use span::Span;
