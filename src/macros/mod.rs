//! Declarative macros for fallthrough.

/// Chain any number of guards, innermost last.
///
/// `nest!(a, b, c)` is `nest(a, nest(b, c))`: `c` sees a failure first, then
/// `b`, then `a`. A single guard is returned unchanged.
///
/// ```
/// use std::cell::RefCell;
/// use fallthrough::{nest, on, raise, Guard};
///
/// #[derive(Debug)]
/// struct Busy;
///
/// let order = RefCell::new(Vec::new());
/// let level = |name: &'static str, handled: bool| {
///     let order = &order;
///     on::<Busy>().handle_if(move |_| {
///         order.borrow_mut().push(name);
///         handled
///     })
/// };
///
/// let mut chain = nest!(level("outer", true), level("middle", false), level("inner", false));
/// assert!(chain.guard(|| raise(Busy)).is_ok());
/// assert_eq!(*order.borrow(), ["inner", "middle", "outer"]);
/// ```
#[macro_export]
macro_rules! nest {
    ($only:expr $(,)?) => {
        $only
    };
    ($outer:expr, $($rest:expr),+ $(,)?) => {
        $crate::nest($outer, $crate::nest!($($rest),+))
    };
}

// Internal diagnostics. Expands to nothing without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! event {
    ($level:ident, $($rest:tt)+) => {
        ::tracing::$level!(target: "fallthrough", $($rest)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! event {
    ($($rest:tt)*) => {};
}
