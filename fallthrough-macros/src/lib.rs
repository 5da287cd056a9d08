//! Proc macros for the fallthrough crate.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod kind;

/// Derive `FailureKind` for a field-less enum.
///
/// Each variant may name its parent kind with `#[kind(is_a = Parent)]`.
/// Variants without the attribute are roots. The parent relation must be
/// acyclic; cycles, unknown parents and variants with fields are compile
/// errors.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, FailureKind)]
/// enum Fault {
///     Exception,
///     #[kind(is_a = Exception)]
///     Argument,
/// }
/// ```
#[proc_macro_derive(FailureKind, attributes(kind))]
pub fn derive_failure_kind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    kind::expand(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
