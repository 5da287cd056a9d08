//! Failure filters: which failures a handler is willing to look at.

use core::marker::PhantomData;

use crate::failure::{Failure, TryCatch};
use crate::kind::{FailureKind, Kinded};

/// A class of failures a handler recognises.
///
/// `Caught` is what the decision function receives for a matching failure.
pub trait Filter {
    type Caught;
}

/// Selection of matching failures with source type `E`.
pub trait Select<E>: Filter {
    /// The caught view of `failure`, or `None` if it does not match.
    fn select<'a>(&self, failure: &'a Failure<E>) -> Option<&'a Self::Caught>;
}

/// Matches failures whose source is, or downcasts to, `C`.
pub struct Type<C>(PhantomData<fn() -> C>);

impl<C> Type<C> {
    pub const fn new() -> Self {
        Type(PhantomData)
    }
}

impl<C> Default for Type<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Filter for Type<C> {
    type Caught = C;
}

impl<C, E: TryCatch<C>> Select<E> for Type<C> {
    #[inline]
    fn select<'a>(&self, failure: &'a Failure<E>) -> Option<&'a C> {
        failure.try_catch()
    }
}

/// Matches failures whose kind is `kind` or one of its descendants.
pub struct Is<E: Kinded> {
    kind: E::Kind,
}

impl<E: Kinded> Is<E> {
    pub fn new(kind: E::Kind) -> Self {
        Is { kind }
    }

    pub fn kind(&self) -> E::Kind {
        self.kind
    }
}

impl<E: Kinded> Filter for Is<E> {
    type Caught = E;
}

impl<E: Kinded> Select<E> for Is<E> {
    fn select<'a>(&self, failure: &'a Failure<E>) -> Option<&'a E> {
        let source = failure.source_ref();
        source.kind().is_a(self.kind).then_some(source)
    }
}

/// Matches failures whose source satisfies a predicate.
pub struct When<E, P> {
    predicate: P,
    _source: PhantomData<fn(&E)>,
}

impl<E, P: Fn(&E) -> bool> When<E, P> {
    pub fn new(predicate: P) -> Self {
        When {
            predicate,
            _source: PhantomData,
        }
    }
}

impl<E, P> Filter for When<E, P> {
    type Caught = E;
}

impl<E, P: Fn(&E) -> bool> Select<E> for When<E, P> {
    fn select<'a>(&self, failure: &'a Failure<E>) -> Option<&'a E> {
        let source = failure.source_ref();
        (self.predicate)(source).then_some(source)
    }
}

/// Matches every failure.
pub struct Any<E>(PhantomData<fn() -> E>);

impl<E> Any<E> {
    pub const fn new() -> Self {
        Any(PhantomData)
    }
}

impl<E> Default for Any<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Filter for Any<E> {
    type Caught = E;
}

impl<E> Select<E> for Any<E> {
    #[inline]
    fn select<'a>(&self, failure: &'a Failure<E>) -> Option<&'a E> {
        Some(failure.source_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::Error;
    use std::io;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, crate::FailureKind)]
    enum Fault {
        Exception,
        #[kind(is_a = Exception)]
        Argument,
        #[kind(is_a = Argument)]
        ArgumentNull,
        #[kind(is_a = Exception)]
        InvalidOperation,
    }

    #[derive(Debug)]
    struct Tagged {
        kind: Fault,
        code: u16,
    }

    impl Kinded for Tagged {
        type Kind = Fault;

        fn kind(&self) -> Fault {
            self.kind
        }
    }

    #[test]
    fn type_filter_matches_concrete_source() {
        let failure = Failure::new(Fault::Argument);
        assert_eq!(Type::<Fault>::new().select(&failure), Some(&Fault::Argument));
    }

    #[test]
    fn type_filter_downcasts_erased_source() {
        let failure: Failure<Error> = Failure::wrap(io::Error::new(io::ErrorKind::Other, "x"));
        assert!(Type::<io::Error>::new().select(&failure).is_some());
        assert!(Type::<std::fmt::Error>::new().select(&failure).is_none());
    }

    #[test]
    fn kind_filter_follows_hierarchy() {
        let filter = Is::<Fault>::new(Fault::Argument);
        assert!(filter.select(&Failure::new(Fault::Argument)).is_some());
        assert!(filter.select(&Failure::new(Fault::ArgumentNull)).is_some());
        assert!(filter.select(&Failure::new(Fault::InvalidOperation)).is_none());
        assert!(filter.select(&Failure::new(Fault::Exception)).is_none());
    }

    #[test]
    fn kind_filter_on_kinded_struct() {
        let filter = Is::<Tagged>::new(Fault::Exception);
        let failure = Failure::new(Tagged {
            kind: Fault::InvalidOperation,
            code: 7,
        });
        assert_eq!(filter.select(&failure).map(|t| t.code), Some(7));
        assert_eq!(filter.kind(), Fault::Exception);
    }

    #[test]
    fn predicate_filter() {
        let filter = When::new(|t: &Tagged| t.code >= 500);
        let low = Failure::new(Tagged {
            kind: Fault::Exception,
            code: 404,
        });
        let high = Failure::new(Tagged {
            kind: Fault::Exception,
            code: 503,
        });
        assert!(filter.select(&low).is_none());
        assert!(filter.select(&high).is_some());
    }

    #[test]
    fn any_filter_matches_everything() {
        assert!(Any::new().select(&Failure::new(Fault::Exception)).is_some());
        assert!(Any::new().select(&Failure::msg("text")).is_some());
    }
}
