//! Kind filters compose with `nest!` like any other handler.

use fallthrough::{nest, on_kind, raise, FailureKind, Guard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, FailureKind)]
enum Fault {
    Exception,
    #[kind(is_a = Exception)]
    Argument,
}

fn main() {
    let mut chain = nest!(
        on_kind(Fault::Exception).handle(|_| {}),
        on_kind(Fault::Argument).handle_if(|_| false),
    );
    assert!(chain.guard(|| raise(Fault::Argument)).is_ok());
}
