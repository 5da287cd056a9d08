//! Optional values reported by handler decisions.

use core::any::type_name;
use core::fmt;

/// A value that may or may not be present.
///
/// Handler decisions return `Maybe` to say whether they produced a substitute
/// result (`Just`) or declined (`Nothing`). `Just` may hold any value of `T`,
/// including `T`'s own notion of absence, such as `Just(None)`.
///
/// Reading the value of `Nothing` is a programming error and is reported as
/// [`NothingError`], never replaced with a default.
///
/// `Display` requires `T: Display`. `Nothing` renders as `<nothing<T>>`
/// using the short type name of `T`.
///
/// # Examples
///
/// ```
/// use fallthrough::{just, nothing, Maybe};
///
/// let found: Maybe<u8> = just(3);
/// assert!(found.has_value());
/// assert_eq!(found.value(), Ok(&3));
///
/// let missing = nothing::<u8>();
/// assert!(!missing.has_value());
/// assert!(missing.value().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Maybe<T> {
    /// Has a value.
    Just(T),
    /// Has no value.
    Nothing,
}

/// Raised when the value of a `Nothing` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Nothing has no value")]
pub struct NothingError;

/// Create a `Maybe` holding `value`.
#[inline]
pub fn just<T>(value: T) -> Maybe<T> {
    Maybe::Just(value)
}

/// Create a `Maybe` with no value.
#[inline]
pub fn nothing<T>() -> Maybe<T> {
    Maybe::Nothing
}

impl<T> Maybe<T> {
    /// Whether there is a value.
    #[inline]
    pub const fn has_value(&self) -> bool {
        matches!(self, Maybe::Just(_))
    }

    /// Borrow the value.
    pub fn value(&self) -> Result<&T, NothingError> {
        match self {
            Maybe::Just(value) => Ok(value),
            Maybe::Nothing => Err(NothingError),
        }
    }

    /// Take the value.
    pub fn into_value(self) -> Result<T, NothingError> {
        match self {
            Maybe::Just(value) => Ok(value),
            Maybe::Nothing => Err(NothingError),
        }
    }

    /// Take the value, panicking on `Nothing`.
    ///
    /// # Panics
    ///
    /// Panics with the [`NothingError`] message if there is no value.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self {
            Maybe::Just(value) => value,
            Maybe::Nothing => panic!("{}", NothingError),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Maybe::Just(value) => value,
            Maybe::Nothing => default,
        }
    }

    pub fn unwrap_or_else<F: FnOnce() -> T>(self, f: F) -> T {
        match self {
            Maybe::Just(value) => value,
            Maybe::Nothing => f(),
        }
    }

    pub fn as_ref(&self) -> Maybe<&T> {
        match self {
            Maybe::Just(value) => Maybe::Just(value),
            Maybe::Nothing => Maybe::Nothing,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Maybe<U> {
        match self {
            Maybe::Just(value) => Maybe::Just(f(value)),
            Maybe::Nothing => Maybe::Nothing,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Maybe<U>>(self, f: F) -> Maybe<U> {
        match self {
            Maybe::Just(value) => f(value),
            Maybe::Nothing => Maybe::Nothing,
        }
    }

    /// Convert from `Option`, mapping `None` to `Nothing`.
    pub fn from_option(option: Option<T>) -> Self {
        match option {
            Some(value) => Maybe::Just(value),
            None => Maybe::Nothing,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Maybe::Just(value) => Some(value),
            Maybe::Nothing => None,
        }
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Maybe::Nothing
    }
}

// A bare value is always a `Just`, even when it is itself an absence
// (`Maybe::from(None::<u8>)` is `Just(None)`).
impl<T> From<T> for Maybe<T> {
    #[inline]
    fn from(value: T) -> Self {
        Maybe::Just(value)
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    #[inline]
    fn from(maybe: Maybe<T>) -> Self {
        maybe.into_option()
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Maybe::Just(value) => value.fmt(f),
            Maybe::Nothing => write!(f, "<nothing<{}>>", short_type_name::<T>()),
        }
    }
}

/// `type_name` with every module path stripped, keeping reference sigils and
/// generic arguments (`&alloc::string::String` becomes `&String`).
fn short_type_name<T: ?Sized>() -> String {
    let full = type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut start = 0;
    for (idx, ch) in full.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '&' | '*' | '(' | ')' | '[' | ']' | ';') {
            short.push_str(last_segment(&full[start..idx]));
            short.push(ch);
            start = idx + ch.len_utf8();
        }
    }
    short.push_str(last_segment(&full[start..]));
    short
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

// ============================================================
// Serde support
// ============================================================

// Encoded exactly like `Option<T>`.
#[cfg(feature = "serde")]
mod serde_impl {
    use super::Maybe;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl<T: Serialize> Serialize for Maybe<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Maybe::Just(value) => serializer.serialize_some(value),
                Maybe::Nothing => serializer.serialize_none(),
            }
        }
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for Maybe<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Option::<T>::deserialize(deserializer).map(Maybe::from_option)
        }
    }
}
