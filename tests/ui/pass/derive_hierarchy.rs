//! Derive on a public enum with several roots.

use fallthrough::FailureKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FailureKind)]
pub enum Fault {
    Exception,
    #[kind(is_a = Exception)]
    Argument,
    #[kind(is_a = Argument)]
    ArgumentNull,
    Io,
    #[kind(is_a = Io)]
    Timeout,
}

fn main() {
    assert!(Fault::ArgumentNull.is_a(Fault::Exception));
    assert!(!Fault::Timeout.is_a(Fault::Exception));
    assert_eq!(Fault::Timeout.name(), "Timeout");
}
