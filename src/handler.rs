//! Guarded invocations.
//!
//! A [`Handler`] wraps a protected operation with a failure filter, a
//! decision function and an optional cleanup step:
//!
//! | Constructor | Decision | Protected op |
//! |-------------|----------|--------------|
//! | `.handle(\|e\| ..)` | always handled | `() -> Result<(), _>` |
//! | `.handle_if(\|e\| bool)` | `true` suppresses, `false` re-signals | `() -> Result<(), _>` |
//! | `.recover(\|e\| value)` | always substitutes `value` | `() -> Result<T, _>` |
//! | `.recover_if(\|e\| Maybe<T>)` | `Just` substitutes, `Nothing` re-signals | `() -> Result<T, _>` |
//!
//! Running a handler is equivalent to:
//!
//! ```text
//! try { op() }
//! catch (e: Filter) { decide(e) or rethrow }
//! finally { cleanup() }
//! ```

#[cfg(feature = "tracing")]
use core::any::type_name;

use crate::failure::{Error, Failure};
use crate::filter::{Any, Filter, Is, Select, Type, When};
use crate::kind::{FailureKind, Kinded};
use crate::maybe::Maybe;

// ============================================================
// Guard - the protected-call shape shared by handlers and chains
// ============================================================

/// Something that runs a protected operation on the caller's behalf.
///
/// `T` is the operation's success type: `()` for the void form, anything
/// else for the value-returning form.
pub trait Guard<T, E = Error> {
    fn guard<O>(&mut self, op: O) -> Result<T, Failure<E>>
    where
        O: FnOnce() -> Result<T, Failure<E>>;
}

impl<T, E, G> Guard<T, E> for &mut G
where
    G: Guard<T, E> + ?Sized,
{
    #[inline]
    fn guard<O>(&mut self, op: O) -> Result<T, Failure<E>>
    where
        O: FnOnce() -> Result<T, Failure<E>>,
    {
        (**self).guard(op)
    }
}

// ============================================================
// Decisions
// ============================================================

/// Decision function result for the void form.
///
/// `bool` for a plain decision, `Result<bool, Failure<E>>` for one that can
/// itself fail.
pub trait Verdict<E> {
    fn into_verdict(self) -> Result<bool, Failure<E>>;
}

impl<E> Verdict<E> for bool {
    #[inline]
    fn into_verdict(self) -> Result<bool, Failure<E>> {
        Ok(self)
    }
}

impl<E> Verdict<E> for Result<bool, Failure<E>> {
    #[inline]
    fn into_verdict(self) -> Result<bool, Failure<E>> {
        self
    }
}

/// Decision function result for the value-returning form.
pub trait Outcome<T, E> {
    fn into_outcome(self) -> Result<Maybe<T>, Failure<E>>;
}

impl<T, E> Outcome<T, E> for Maybe<T> {
    #[inline]
    fn into_outcome(self) -> Result<Maybe<T>, Failure<E>> {
        Ok(self)
    }
}

impl<T, E> Outcome<T, E> for Result<Maybe<T>, Failure<E>> {
    #[inline]
    fn into_outcome(self) -> Result<Maybe<T>, Failure<E>> {
        self
    }
}

/// A decision over a caught failure. `Just` suppresses, `Nothing` declines,
/// `Err` replaces the original failure.
pub trait Decide<C, T, E> {
    fn decide(&mut self, caught: &C) -> Result<Maybe<T>, Failure<E>>;
}

/// Unconditional void decision.
pub struct Suppress<A>(A);

impl<C, E, A> Decide<C, (), E> for Suppress<A>
where
    A: FnMut(&C),
{
    #[inline]
    fn decide(&mut self, caught: &C) -> Result<Maybe<()>, Failure<E>> {
        (self.0)(caught);
        Ok(Maybe::Just(()))
    }
}

/// Conditional void decision.
pub struct Conditional<D>(D);

impl<C, E, D, V> Decide<C, (), E> for Conditional<D>
where
    D: FnMut(&C) -> V,
    V: Verdict<E>,
{
    #[inline]
    fn decide(&mut self, caught: &C) -> Result<Maybe<()>, Failure<E>> {
        let handled = (self.0)(caught).into_verdict()?;
        Ok(if handled { Maybe::Just(()) } else { Maybe::Nothing })
    }
}

/// Unconditional value decision.
pub struct Substitute<D>(D);

impl<C, T, E, D> Decide<C, T, E> for Substitute<D>
where
    D: FnMut(&C) -> T,
{
    #[inline]
    fn decide(&mut self, caught: &C) -> Result<Maybe<T>, Failure<E>> {
        Ok(Maybe::Just((self.0)(caught)))
    }
}

/// Conditional value decision.
pub struct Optional<D>(D);

impl<C, T, E, D, S> Decide<C, T, E> for Optional<D>
where
    D: FnMut(&C) -> S,
    S: Outcome<T, E>,
{
    #[inline]
    fn decide(&mut self, caught: &C) -> Result<Maybe<T>, Failure<E>> {
        (self.0)(caught).into_outcome()
    }
}

// ============================================================
// Cleanup
// ============================================================

/// The cleanup step of a handler. Runs once per invocation.
pub trait Cleanup {
    fn run(&mut self);
}

/// No cleanup step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCleanup;

impl Cleanup for NoCleanup {
    #[inline]
    fn run(&mut self) {}
}

/// Cleanup step from a closure.
pub struct Finally<G>(G);

impl<G: FnMut()> Cleanup for Finally<G> {
    #[inline]
    fn run(&mut self) {
        (self.0)()
    }
}

/// Runs the cleanup step when dropped, including during unwinding.
struct Deferred<'a, G: Cleanup>(&'a mut G);

impl<G: Cleanup> Drop for Deferred<'_, G> {
    fn drop(&mut self) {
        self.0.run();
    }
}

// ============================================================
// Construction
// ============================================================

/// A handler under construction: the filter is chosen, the decision is not.
#[must_use = "a filter does nothing until a decision is attached"]
pub struct On<F> {
    filter: F,
}

/// Handle failures whose source is, or downcasts to, `C`.
///
/// ```
/// use fallthrough::{on, raise, Guard};
///
/// #[derive(Debug)]
/// struct NotFound(&'static str);
///
/// let mut log = Vec::new();
/// let mut handler = on::<NotFound>().handle(|e| log.push(e.0));
/// let result = handler.guard(|| raise(NotFound("config.toml")));
///
/// assert!(result.is_ok());
/// drop(handler);
/// assert_eq!(log, ["config.toml"]);
/// ```
pub fn on<C>() -> On<Type<C>> {
    On { filter: Type::new() }
}

/// Handle failures of `kind` or any kind that `is_a(kind)`, where the kind
/// enum itself is the failure source.
pub fn on_kind<K: FailureKind>(kind: K) -> On<Is<K>> {
    On {
        filter: Is::new(kind),
    }
}

/// Handle failures of kind `kind` (or a descendant) raised with source `E`.
pub fn on_kind_of<E: Kinded>(kind: E::Kind) -> On<Is<E>> {
    On {
        filter: Is::new(kind),
    }
}

/// Handle failures whose source satisfies `predicate`.
pub fn on_when<E, P>(predicate: P) -> On<When<E, P>>
where
    P: Fn(&E) -> bool,
{
    On {
        filter: When::new(predicate),
    }
}

/// Handle every failure.
pub fn on_any<E>() -> On<Any<E>> {
    On { filter: Any::new() }
}

impl<F: Filter> On<F> {
    /// Unconditional void handler: a matching failure is always suppressed
    /// once `action` has run.
    pub fn handle<A>(self, action: A) -> Handler<F, Suppress<A>>
    where
        A: FnMut(&F::Caught),
    {
        Handler::new(self.filter, Suppress(action))
    }

    /// Conditional void handler: `decide` returns `true` to suppress the
    /// failure or `false` to re-signal it.
    pub fn handle_if<D, V>(self, decide: D) -> Handler<F, Conditional<D>>
    where
        D: FnMut(&F::Caught) -> V,
    {
        Handler::new(self.filter, Conditional(decide))
    }

    /// Unconditional value handler: a matching failure is replaced by the
    /// value `produce` returns.
    pub fn recover<D, T>(self, produce: D) -> Handler<F, Substitute<D>>
    where
        D: FnMut(&F::Caught) -> T,
    {
        Handler::new(self.filter, Substitute(produce))
    }

    /// Conditional value handler: `decide` returns `Just(value)` to replace
    /// the failure or `Nothing` to re-signal it.
    pub fn recover_if<D, S>(self, decide: D) -> Handler<F, Optional<D>>
    where
        D: FnMut(&F::Caught) -> S,
    {
        Handler::new(self.filter, Optional(decide))
    }
}

// ============================================================
// Handler
// ============================================================

/// A guarded invocation: filter `F`, decision `D`, cleanup `G`.
///
/// A handler can be invoked any number of times; each invocation runs the
/// cleanup step exactly once.
#[must_use = "a handler does nothing until it guards an operation"]
pub struct Handler<F, D, G = NoCleanup> {
    filter: F,
    decision: D,
    cleanup: G,
}

impl<F, D> Handler<F, D> {
    fn new(filter: F, decision: D) -> Self {
        Handler {
            filter,
            decision,
            cleanup: NoCleanup,
        }
    }

    /// Add a cleanup step, run after the protected operation on every path.
    pub fn finally<G: FnMut()>(self, cleanup: G) -> Handler<F, D, Finally<G>> {
        Handler {
            filter: self.filter,
            decision: self.decision,
            cleanup: Finally(cleanup),
        }
    }
}

impl<T, E, F, D, G> Guard<T, E> for Handler<F, D, G>
where
    F: Select<E>,
    D: Decide<F::Caught, T, E>,
    G: Cleanup,
{
    fn guard<O>(&mut self, op: O) -> Result<T, Failure<E>>
    where
        O: FnOnce() -> Result<T, Failure<E>>,
    {
        let Handler {
            filter,
            decision,
            cleanup,
        } = self;
        invoke(filter, decision, cleanup, op)
    }
}

fn invoke<T, E, F, D, G, O>(
    filter: &F,
    decision: &mut D,
    cleanup: &mut G,
    op: O,
) -> Result<T, Failure<E>>
where
    F: Select<E>,
    D: Decide<F::Caught, T, E>,
    G: Cleanup,
    O: FnOnce() -> Result<T, Failure<E>>,
{
    // Dropped last, after the return value is settled.
    let _cleanup = Deferred(cleanup);

    let failure = match op() {
        Ok(value) => return Ok(value),
        Err(failure) => failure,
    };

    let outcome = match filter.select(&failure) {
        Some(caught) => decision.decide(caught),
        None => {
            event!(
                debug,
                caught = type_name::<F::Caught>(),
                origin = %origin_of(&failure),
                "failure unmatched, re-signalling"
            );
            return Err(failure);
        }
    };

    match outcome {
        Ok(Maybe::Just(value)) => {
            event!(
                trace,
                caught = type_name::<F::Caught>(),
                origin = %origin_of(&failure),
                "failure suppressed"
            );
            Ok(value)
        }
        Ok(Maybe::Nothing) => {
            event!(
                debug,
                caught = type_name::<F::Caught>(),
                origin = %origin_of(&failure),
                "failure declined, re-signalling"
            );
            Err(failure)
        }
        Err(raised) => {
            event!(
                debug,
                caught = type_name::<F::Caught>(),
                origin = %origin_of(&failure),
                raised = %origin_of(&raised),
                "decision raised a new failure"
            );
            Err(raised)
        }
    }
}

#[cfg(feature = "tracing")]
fn origin_of<E>(failure: &Failure<E>) -> String {
    failure
        .origin()
        .map_or_else(|| String::from("<untraced>"), |frame| frame.to_string())
}
