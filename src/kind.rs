//! Failure kinds and the is-a relation between them.
//!
//! A kind is a variant of a field-less enum. Each kind names at most one
//! parent; `is_a` follows that chain, so a handler filtering on a parent kind
//! also catches every descendant.
//!
//! ```
//! use fallthrough::FailureKind;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, FailureKind)]
//! enum Fault {
//!     Exception,
//!     #[kind(is_a = Exception)]
//!     Argument,
//!     #[kind(is_a = Argument)]
//!     ArgumentNull,
//! }
//!
//! assert!(Fault::ArgumentNull.is_a(Fault::Exception));
//! assert!(!Fault::Argument.is_a(Fault::ArgumentNull));
//! ```

use core::fmt;

pub use fallthrough_macros::FailureKind;

/// A closed set of failure kinds with a single-parent hierarchy.
///
/// Usually derived. Manual implementations must keep every parent chain
/// finite; the derive rejects cycles at compile time.
pub trait FailureKind: Copy + Eq + fmt::Debug + 'static {
    /// The kind this one specialises, if any.
    fn parent(self) -> Option<Self>;

    /// Name of the kind, as written in source.
    fn name(self) -> &'static str;

    /// Whether `self` is `ancestor` or one of its descendants.
    fn is_a(self, ancestor: Self) -> bool {
        self.lineage().any(|kind| kind == ancestor)
    }

    /// This kind followed by each of its ancestors, nearest first.
    fn lineage(self) -> Lineage<Self> {
        Lineage { next: Some(self) }
    }
}

/// Iterator over a kind and its ancestors. See [`FailureKind::lineage`].
#[derive(Debug, Clone)]
pub struct Lineage<K> {
    next: Option<K>,
}

impl<K: FailureKind> Iterator for Lineage<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let kind = self.next?;
        self.next = kind.parent();
        Some(kind)
    }
}

/// An error that reports which kind of failure it is.
pub trait Kinded {
    type Kind: FailureKind;

    fn kind(&self) -> Self::Kind;
}

// A kind enum can be raised directly as the failure source.
impl<K: FailureKind> Kinded for K {
    type Kind = K;

    #[inline]
    fn kind(&self) -> K {
        *self
    }
}
