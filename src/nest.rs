//! Handler chains.
//!
//! `nest(outer, inner)` behaves like writing the inner protected block
//! textually inside the outer one:
//!
//! ```text
//! try {
//!     try { op() } catch (inner) { .. } finally { inner cleanup }
//! } catch (outer) { .. } finally { outer cleanup }
//! ```
//!
//! The inner handler sees every failure first. The outer handler only sees
//! failures the inner one declined, did not match, or raised itself. Longer
//! chains are built pairwise, or with [`nest!`](crate::nest!).

use crate::failure::Failure;
use crate::handler::Guard;

/// Two guards composed into one. See [`nest`].
#[must_use = "a chain does nothing until it guards an operation"]
pub struct Nest<O, I> {
    outer: O,
    inner: I,
}

/// Compose two guards so that `inner` is tried before `outer`.
///
/// ```
/// use std::cell::RefCell;
/// use fallthrough::{nest, on, raise, Guard};
///
/// #[derive(Debug)]
/// struct Timeout;
///
/// let seen = RefCell::new(Vec::new());
/// let inner = on::<Timeout>().handle_if(|_| {
///     seen.borrow_mut().push("inner");
///     false
/// });
/// let outer = on::<Timeout>().handle(|_| seen.borrow_mut().push("outer"));
///
/// let result = nest(outer, inner).guard(|| raise(Timeout));
/// assert!(result.is_ok());
/// assert_eq!(*seen.borrow(), ["inner", "outer"]);
/// ```
pub fn nest<O, I>(outer: O, inner: I) -> Nest<O, I> {
    Nest { outer, inner }
}

impl<O, I> Nest<O, I> {
    /// Split the chain back into its outer and inner guards.
    pub fn into_parts(self) -> (O, I) {
        (self.outer, self.inner)
    }
}

impl<T, E, O, I> Guard<T, E> for Nest<O, I>
where
    O: Guard<T, E>,
    I: Guard<T, E>,
{
    fn guard<P>(&mut self, op: P) -> Result<T, Failure<E>>
    where
        P: FnOnce() -> Result<T, Failure<E>>,
    {
        let Nest { outer, inner } = self;
        outer.guard(|| inner.guard(op))
    }
}

/// Bind `op` to `outer`, producing a zero-argument operation.
///
/// Each call of the result runs `op` under `outer`, so the bound operation
/// can be invoked repeatedly. Use it when the inner side is already a
/// concrete operation rather than another guard.
pub fn nest_op<T, E, G, P>(mut outer: G, mut op: P) -> impl FnMut() -> Result<T, Failure<E>>
where
    G: Guard<T, E>,
    P: FnMut() -> Result<T, Failure<E>>,
{
    move || outer.guard(&mut op)
}
