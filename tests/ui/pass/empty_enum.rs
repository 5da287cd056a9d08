//! An enum with no variants still derives.

use fallthrough::FailureKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FailureKind)]
enum Never {}

fn main() {}
