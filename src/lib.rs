//! fallthrough - Composable, nested failure handlers
//!
//! # Overview
//!
//! A handler pairs a failure filter with a decision and an optional cleanup
//! step. Handlers compose with [`nest`] so that the inner one sees a failure
//! first and the outer one only sees what the inner one let through, exactly
//! like writing the protected blocks inside each other by hand.
//!
//! Failures are ordinary values: every guarded call returns `Result<T,
//! Failure<E>>`, there is no hidden control flow. A failure that no handler
//! suppresses comes back as the same value that was raised, with its trace
//! still pointing at the raise site.
//!
//! # Quick Start
//!
//! ```
//! use fallthrough::{on, raise, Failure, Guard};
//!
//! #[derive(Debug)]
//! struct Timeout;
//!
//! fn fetch() -> Result<String, Failure<Timeout>> {
//!     raise(Timeout)
//! }
//!
//! let mut handler = on::<Timeout>().recover(|_| String::from("cached"));
//! assert_eq!(handler.guard(fetch).unwrap(), "cached");
//! ```
//!
//! # Handlers
//!
//! ## Filters
//!
//! | Constructor | Matches |
//! |-------------|---------|
//! | `on::<C>()` | Source of type `C`, or an erased source that downcasts to `C` |
//! | `on_kind(kind)` | Kind enum source that `is_a(kind)` |
//! | `on_kind_of::<E>(kind)` | `Kinded` source `E` whose kind `is_a(kind)` |
//! | `on_when(\|e\| cond)` | Source satisfying the predicate |
//! | `on_any::<E>()` | Everything |
//!
//! ## Decisions
//!
//! | Method | Decision returns | Result on match |
//! |--------|------------------|-----------------|
//! | `.handle(\|e\| ..)` | `()` | Suppressed |
//! | `.handle_if(\|e\| ..)` | `bool` | `true` suppresses, `false` re-signals |
//! | `.recover(\|e\| ..)` | `T` | Replaced by the value |
//! | `.recover_if(\|e\| ..)` | `Maybe<T>` | `Just` replaces, `Nothing` re-signals |
//!
//! `handle_if` and `recover_if` also accept a decision returning
//! `Result<_, Failure<E>>`; an `Err` replaces the original failure.
//!
//! ## Cleanup and chains
//!
//! | Pattern | Description |
//! |---------|-------------|
//! | `.finally(\|\| ..)` | Runs once per invocation, on every path |
//! | `nest(outer, inner)` | `inner` tried first, then `outer` |
//! | `nest!(a, b, c)` | `nest(a, nest(b, c))` |
//! | `nest_op(outer, op)` | Bind an operation to a guard for later |
//!
//! # Features
//!
//! - `serde`: serialize [`Maybe`] like `Option` and [`Failure`] as its
//!   message and trace.
//! - `tracing`: emit an event (target `fallthrough`) for every failure a
//!   handler suppresses, declines or does not match.

// Lets derive output name `::fallthrough` inside this crate's own tests.
extern crate self as fallthrough;

// ============================================================
// Modules
// ============================================================

#[macro_use]
mod macros;

mod ext;
mod failure;
mod filter;
mod handler;
mod kind;
mod maybe;
mod nest;

// ============================================================
// Re-exports
// ============================================================

pub use ext::{Raise, ResultExt};
pub use failure::{
    raise, Error, Failure, FrameView, StringError, TryCatch, DEFAULT_CONTEXT_LIMIT,
    DEFAULT_TRACE_LIMIT,
};
pub use filter::{Any, Filter, Is, Select, Type, When};
pub use handler::{
    on, on_any, on_kind, on_kind_of, on_when, Cleanup, Conditional, Decide, Finally, Guard,
    Handler, NoCleanup, On, Optional, Outcome, Substitute, Suppress, Verdict,
};
pub use kind::{FailureKind, Kinded, Lineage};
pub use maybe::Maybe::{Just, Nothing};
pub use maybe::{just, nothing, Maybe, NothingError};
pub use nest::{nest, nest_op, Nest};

// ============================================================
// Type aliases
// ============================================================

/// Result type alias.
///
/// - `Result<T>` = `core::result::Result<T, Failure>` (type-erased)
/// - `Result<T, Failure<io::Error>>` keeps the concrete source type
pub type Result<T, E = Failure> = core::result::Result<T, E>;
