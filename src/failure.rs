//! Failure type carrying a diagnostic trace.

use core::fmt;
use core::panic::Location;
use std::error::Error as StdError;

use smallvec::SmallVec;

// ============================================================
// Limits
// ============================================================

/// Maximum number of frames kept in a trace. Further frames are dropped.
pub const DEFAULT_TRACE_LIMIT: usize = 32;

/// Maximum number of context messages kept on one failure.
pub const DEFAULT_CONTEXT_LIMIT: usize = 8;

/// Frames stored inline before the trace spills to the heap.
const INLINE_FRAMES: usize = 4;

type Trace = SmallVec<[&'static Location<'static>; INLINE_FRAMES]>;

// ============================================================
// Core types
// ============================================================

/// A failure raised by a protected operation.
///
/// `Failure<E>` wraps a source error `E` together with the trace of source
/// locations it passed through. The first frame is the origin, recorded when
/// the failure is created with [`Failure::new`] or [`raise`](crate::raise).
///
/// Handlers never rebuild a failure they decline: the value handed back to
/// the caller is the one the protected operation produced, so its trace
/// still points at the original raise site.
///
/// # Examples
///
/// ```
/// use fallthrough::{raise, Failure};
///
/// #[derive(Debug, PartialEq)]
/// struct Timeout;
///
/// let result: Result<(), Failure<Timeout>> = raise(Timeout);
/// let failure = result.unwrap_err();
/// assert_eq!(failure.source_ref(), &Timeout);
/// assert_eq!(failure.depth(), 1);
/// ```
#[derive(Debug)]
pub struct Failure<E = Error> {
    pub(crate) source: E,
    pub(crate) trace: Trace,
    /// Only allocated when `.context()` is used.
    pub(crate) contexts: Option<Vec<ContextEntry>>,
}

/// Context message attached to one frame of the trace.
#[derive(Debug, Clone)]
pub(crate) struct ContextEntry {
    pub(crate) frame: u16,
    pub(crate) message: String,
}

/// Type-erased error for failures whose concrete source type is not fixed.
///
/// Wraps a `Box<dyn Error>`. It deliberately does not implement `Error`
/// itself, so the blanket `From<E: Error>` conversion and the typed
/// [`TryCatch`] impls do not collide with the reflexive ones.
#[derive(Debug)]
pub struct Error(Box<dyn StdError + Send + Sync + 'static>);

impl Error {
    /// Create from any error type.
    #[inline]
    pub fn new<E: StdError + Send + Sync + 'static>(e: E) -> Self {
        Self(Box::new(e))
    }

    /// Create from a boxed error.
    #[inline]
    pub fn from_box(e: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self(e)
    }

    /// Get the inner error as a trait object reference.
    #[inline]
    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Try to downcast to a specific error type.
    #[inline]
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Try to downcast and consume the error.
    #[inline]
    pub fn downcast<T: StdError + 'static>(self) -> Result<T, Self> {
        match self.0.downcast::<T>() {
            Ok(e) => Ok(*e),
            Err(e) => Err(Self(e)),
        }
    }

    /// Get the inner boxed error.
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<E: StdError + Send + Sync + 'static> From<E> for Error {
    fn from(e: E) -> Self {
        Error::new(e)
    }
}

/// Error built from a plain message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringError(pub(crate) String);

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for StringError {}

// ============================================================
// TryCatch - typed access to the source of a failure
// ============================================================

/// Attempt to view a failure source as a specific type.
///
/// Concrete sources match their own type directly. The erased [`Error`]
/// matches any `Error` type it actually holds, by downcast.
pub trait TryCatch<Target> {
    fn try_catch(&self) -> Option<&Target>;
}

impl<T> TryCatch<T> for T {
    #[inline]
    fn try_catch(&self) -> Option<&T> {
        Some(self)
    }
}

impl<T: StdError + 'static> TryCatch<T> for Error {
    #[inline]
    fn try_catch(&self) -> Option<&T> {
        self.downcast_ref::<T>()
    }
}

// ============================================================
// Frames
// ============================================================

/// View into a single frame of a failure trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameView<'a> {
    /// Source file path
    pub file: &'static str,
    /// Line number
    pub line: u32,
    /// Column number
    pub col: u32,
    /// Optional context message
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub context: Option<&'a str>,
}

impl fmt::Display for FrameView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

// ============================================================
// Failure<E>
// ============================================================

impl<E> Failure<E> {
    /// Create a failure, recording the caller's location as its origin.
    #[track_caller]
    #[inline]
    pub fn new(source: E) -> Self {
        Self::untraced(source).here()
    }

    /// Create a failure with an empty trace.
    #[inline]
    pub fn untraced(source: E) -> Self {
        Self {
            source,
            trace: SmallVec::new(),
            contexts: None,
        }
    }

    /// Append the caller's location to the trace.
    #[track_caller]
    #[inline]
    pub fn here(self) -> Self {
        self.frame(Location::caller())
    }

    #[doc(hidden)]
    #[inline]
    pub fn frame(mut self, location: &'static Location<'static>) -> Self {
        if self.trace.len() < DEFAULT_TRACE_LIMIT {
            self.trace.push(location);
        }
        self
    }

    /// Attach a context message to the most recent frame.
    ///
    /// A second message on the same frame replaces the first.
    pub fn context(mut self, msg: impl Into<String>) -> Self {
        let frame = self.trace.len().saturating_sub(1) as u16;
        let contexts = self.contexts.get_or_insert_with(Vec::new);

        if let Some(entry) = contexts.iter_mut().find(|e| e.frame == frame) {
            entry.message = msg.into();
        } else if contexts.len() < DEFAULT_CONTEXT_LIMIT {
            contexts.push(ContextEntry {
                frame,
                message: msg.into(),
            });
        }
        self
    }

    /// Get the underlying error source.
    pub fn source_ref(&self) -> &E {
        &self.source
    }

    /// Consume and return the underlying error.
    pub fn into_source(self) -> E {
        self.source
    }

    /// The source error rendered as a string.
    pub fn message(&self) -> String
    where
        E: fmt::Display,
    {
        self.source.to_string()
    }

    /// Try to get a reference to a specific source type.
    #[inline]
    pub fn try_catch<Target>(&self) -> Option<&Target>
    where
        E: TryCatch<Target>,
    {
        self.source.try_catch()
    }

    /// Iterate over frames, origin first.
    pub fn frames(&self) -> impl Iterator<Item = FrameView<'_>> {
        let contexts = self.contexts.as_deref().unwrap_or(&[]);
        self.trace.iter().enumerate().map(move |(idx, loc)| FrameView {
            file: loc.file(),
            line: loc.line(),
            col: loc.column(),
            context: contexts
                .iter()
                .find(|c| c.frame as usize == idx)
                .map(|c| c.message.as_str()),
        })
    }

    /// The frame where the failure was raised.
    pub fn origin(&self) -> Option<FrameView<'_>> {
        self.frames().next()
    }

    /// Number of frames in the trace.
    pub fn depth(&self) -> usize {
        self.trace.len()
    }

    /// Number of frames carrying a context message.
    pub fn context_count(&self) -> usize {
        self.contexts.as_ref().map_or(0, Vec::len)
    }

    /// Map the source error while keeping the trace.
    pub fn map_source<F, O>(self, f: F) -> Failure<O>
    where
        F: FnOnce(E) -> O,
    {
        Failure {
            source: f(self.source),
            trace: self.trace,
            contexts: self.contexts,
        }
    }

    /// Convert to a type-erased failure, keeping the trace.
    pub fn erase(self) -> Failure<Error>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.map_source(Error::new)
    }
}

// ============================================================
// Failure<Error> specific methods (type-erased)
// ============================================================

impl Failure<Error> {
    /// Wrap any error, recording the caller as origin.
    ///
    /// An error that already is a `Failure<Error>` is returned as is, with
    /// its original trace.
    #[track_caller]
    pub fn wrap<E>(e: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::wrap_box(Box::new(e))
    }

    /// Wrap a boxed error, unwrapping it if it already is a `Failure<Error>`.
    #[track_caller]
    pub fn wrap_box(e: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match e.downcast::<Self>() {
            Ok(failure) => *failure,
            Err(e) => Self::new(Error::from_box(e)),
        }
    }

    /// Create from a message string.
    #[track_caller]
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Error::new(StringError(message.into())))
    }

    /// Get the root error as a trait object.
    pub fn root(&self) -> &(dyn StdError + 'static) {
        self.source.as_error()
    }

    /// Try to downcast the source to a specific error type.
    #[inline]
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.source.downcast_ref::<T>()
    }
}

/// Return `Err` with a new failure raised at the caller's location.
///
/// ```
/// use fallthrough::{raise, Failure};
///
/// fn parse(s: &str) -> Result<u8, Failure<String>> {
///     match s.parse() {
///         Ok(n) => Ok(n),
///         Err(_) => raise(format!("not a number: {s}")),
///     }
/// }
///
/// assert!(parse("x").is_err());
/// ```
#[track_caller]
#[inline]
pub fn raise<T, E>(source: E) -> Result<T, Failure<E>> {
    Err(Failure::new(source))
}

// ============================================================
// Display and Error implementations
// ============================================================

impl<E: fmt::Display> fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.source)?;

        if !self.trace.is_empty() {
            writeln!(f, "\nTrace (most recent last):")?;
            for frame in self.frames() {
                write!(f, "  {}", frame)?;
                if let Some(msg) = frame.context {
                    write!(f, "\n    \u{2192} {}", msg)?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

// Only the erased failure is an `Error`; see the note on `Error`.
impl StdError for Failure<Error> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_error())
    }
}

// ============================================================
// From impls for type-erased Failure
// ============================================================

impl From<&str> for Failure<Error> {
    #[track_caller]
    fn from(s: &str) -> Self {
        Self::msg(s)
    }
}

impl From<String> for Failure<Error> {
    #[track_caller]
    fn from(s: String) -> Self {
        Self::msg(s)
    }
}

impl From<Box<dyn StdError + Send + Sync + 'static>> for Failure<Error> {
    #[track_caller]
    fn from(e: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self::wrap_box(e)
    }
}

impl From<std::io::Error> for Failure<Error> {
    #[track_caller]
    fn from(e: std::io::Error) -> Self {
        Self::wrap(e)
    }
}

impl From<std::num::ParseIntError> for Failure<Error> {
    #[track_caller]
    fn from(e: std::num::ParseIntError) -> Self {
        Self::wrap(e)
    }
}

// ============================================================
// Serde support
// ============================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Serialize, Serializer};

    #[derive(Serialize)]
    struct SerializedFailure<'a> {
        message: String,
        trace: Vec<FrameView<'a>>,
    }

    impl<E: fmt::Display> Serialize for Failure<E> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            SerializedFailure {
                message: self.message(),
                trace: self.frames().collect(),
            }
            .serialize(serializer)
        }
    }
}
