//! Extension traits for `Result` types.

use core::panic::Location;
use std::error::Error as StdError;

use crate::failure::{Error, Failure};

/// Trace helpers for `Result<T, Failure<E>>`.
///
/// Each method records the caller as a new frame when the result is an
/// error, so a failure propagated through several layers keeps a readable
/// path back to its origin.
pub trait ResultExt<T, E> {
    /// Add the caller as a frame on error.
    fn trace(self) -> Self;

    /// Add the caller as a frame on error, with a context message.
    fn context(self, ctx: impl Into<String>) -> Self;

    /// Chain another fallible step, adding the caller as a frame if it fails.
    fn then<U, F>(self, f: F) -> Result<U, Failure<E>>
    where
        F: FnOnce(T) -> Result<U, Failure<E>>;
}

impl<T, E> ResultExt<T, E> for Result<T, Failure<E>> {
    #[track_caller]
    fn trace(self) -> Self {
        let loc = Location::caller();
        self.map_err(|e| e.frame(loc))
    }

    #[track_caller]
    fn context(self, ctx: impl Into<String>) -> Self {
        let loc = Location::caller();
        self.map_err(|e| {
            let depth = e.depth();
            let e = e.frame(loc);
            // A full trace drops the frame; the message would land on an
            // unrelated one.
            if e.depth() > depth {
                e.context(ctx)
            } else {
                e
            }
        })
    }

    #[track_caller]
    fn then<U, F>(self, f: F) -> Result<U, Failure<E>>
    where
        F: FnOnce(T) -> Result<U, Failure<E>>,
    {
        let loc = Location::caller();
        match self {
            Ok(v) => f(v).map_err(|e| e.frame(loc)),
            Err(e) => Err(e),
        }
    }
}

/// Lift a plain `Result` into the failure currency.
pub trait Raise<T, E> {
    /// Raise the error as a `Failure<E>` originating at the caller.
    fn or_raise(self) -> Result<T, Failure<E>>;

    /// Raise the error as a type-erased `Failure` originating at the caller.
    fn or_raise_erased(self) -> Result<T, Failure<Error>>
    where
        E: StdError + Send + Sync + 'static;
}

impl<T, E> Raise<T, E> for Result<T, E> {
    #[track_caller]
    fn or_raise(self) -> Result<T, Failure<E>> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Failure::new(e)),
        }
    }

    // An error that already is an erased failure keeps its own trace.
    #[track_caller]
    fn or_raise_erased(self) -> Result<T, Failure<Error>>
    where
        E: StdError + Send + Sync + 'static,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Failure::wrap(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{raise, DEFAULT_TRACE_LIMIT};

    #[derive(Debug, PartialEq)]
    struct Boom;

    fn fail() -> Result<u8, Failure<Boom>> {
        raise(Boom)
    }

    #[test]
    fn trace_adds_caller_frame() {
        let line = line!() + 1;
        let failure = fail().trace().unwrap_err();
        assert_eq!(failure.depth(), 2);
        assert_eq!(failure.frames().nth(1).unwrap().line, line);
    }

    #[test]
    fn trace_leaves_success_alone() {
        let ok: Result<u8, Failure<Boom>> = Ok(1);
        assert_eq!(ok.trace().unwrap(), 1);
    }

    #[test]
    fn context_labels_new_frame() {
        let failure = fail().context("reading header").unwrap_err();
        let frames: Vec<_> = failure.frames().collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].context, None);
        assert_eq!(frames[1].context, Some("reading header"));
    }

    #[test]
    fn context_skipped_when_trace_is_full() {
        let mut failure = Failure::new(Boom).context("origin");
        while failure.depth() < DEFAULT_TRACE_LIMIT {
            failure = failure.here();
        }
        let last = failure.frames().last().unwrap().line;

        let failure = Err::<(), _>(failure).context("dropped").unwrap_err();
        assert_eq!(failure.depth(), DEFAULT_TRACE_LIMIT);
        assert_eq!(failure.frames().last().unwrap().line, last);
        assert_eq!(failure.frames().last().unwrap().context, None);
        assert_eq!(failure.context_count(), 1);
        assert_eq!(failure.origin().unwrap().context, Some("origin"));
    }

    #[test]
    fn then_frames_only_the_failing_step() {
        let ok: Result<u8, Failure<Boom>> = Ok(1);
        let failure = ok.then(|_| fail()).unwrap_err();
        assert_eq!(failure.depth(), 2);

        let failure = fail().then(|n| Ok::<_, Failure<Boom>>(n + 1)).unwrap_err();
        assert_eq!(failure.depth(), 1);
    }

    #[test]
    fn or_raise_records_caller() {
        let line = line!() + 1;
        let failure = Err::<(), _>(Boom).or_raise().unwrap_err();
        assert_eq!(failure.origin().unwrap().line, line);
        assert_eq!(failure.source_ref(), &Boom);
    }

    #[test]
    fn or_raise_erased_downcasts() {
        let parsed = "x".parse::<u8>().or_raise_erased();
        let failure = parsed.unwrap_err();
        assert!(failure.downcast_ref::<std::num::ParseIntError>().is_some());
        assert_eq!(failure.depth(), 1);
    }
}
