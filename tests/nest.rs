//! Handler chains built with `nest`, `nest!` and `nest_op`.

use std::cell::{Cell, RefCell};

use fallthrough::{
    just, nest, nest_op, nothing, on, on_kind, raise, Failure, FailureKind, Guard,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, FailureKind)]
enum Fault {
    Exception,
    #[kind(is_a = Exception)]
    Argument,
    #[kind(is_a = Exception)]
    InvalidOperation,
}

type Log = RefCell<Vec<&'static str>>;

fn entries(log: &Log) -> Vec<&'static str> {
    log.borrow().clone()
}

// Scenario B
#[test]
fn test_three_levels_inner_to_outer() {
    let counter = Cell::new(0);
    let log = Log::default();
    let level = |name: &'static str, handled: bool| {
        let (counter, log) = (&counter, &log);
        on::<Fault>().handle_if(move |_| {
            counter.set(counter.get() + 1);
            log.borrow_mut().push(name);
            handled
        })
    };

    let mut chain = nest!(
        level("outer", true),
        level("middle", false),
        level("inner", false),
    );
    assert!(chain.guard(|| raise(Fault::Argument)).is_ok());
    assert_eq!(counter.get(), 3);
    assert_eq!(entries(&log), ["inner", "middle", "outer"]);
}

#[test]
fn test_macro_matches_pairwise_nesting() {
    let log = Log::default();
    let level = |name: &'static str| {
        let log = &log;
        on::<Fault>().handle_if(move |_| {
            log.borrow_mut().push(name);
            false
        })
    };

    let mut pairwise = nest(level("a"), nest(level("b"), level("c")));
    let _ = pairwise.guard(|| raise(Fault::Argument));
    let by_pairs = log.take();

    let mut chained = nest!(level("a"), level("b"), level("c"));
    let _ = chained.guard(|| raise(Fault::Argument));
    assert_eq!(log.take(), by_pairs);
    assert_eq!(by_pairs, ["c", "b", "a"]);
}

#[test]
fn test_inner_suppression_hides_failure_from_outer() {
    let outer_called = Cell::new(false);
    let inner = on::<Fault>().handle(|_| {});
    let outer = on::<Fault>().handle(|_| outer_called.set(true));

    assert!(nest(outer, inner).guard(|| raise(Fault::Argument)).is_ok());
    assert!(!outer_called.get());
}

#[test]
fn test_only_outer_matches() {
    let inner_called = Cell::new(false);
    let inner = on_kind(Fault::Argument).handle(|_| inner_called.set(true));
    let outer = on_kind(Fault::Exception).handle_if(|_| true);

    let mut chain = nest(outer, inner);
    assert!(chain.guard(|| raise(Fault::InvalidOperation)).is_ok());
    assert!(!inner_called.get());
}

#[test]
fn test_inner_declines_before_outer_is_consulted() {
    let log = Log::default();
    let inner = on_kind(Fault::Exception).handle_if(|_| {
        log.borrow_mut().push("inner");
        false
    });
    let outer = on_kind(Fault::InvalidOperation).handle_if(|_| {
        log.borrow_mut().push("outer");
        true
    });

    assert!(nest(outer, inner).guard(|| raise(Fault::InvalidOperation)).is_ok());
    assert_eq!(entries(&log), ["inner", "outer"]);
}

#[test]
fn test_declined_everywhere_keeps_original_trace() {
    let inner = on::<Fault>().handle_if(|_| false);
    let outer = on::<Fault>().handle_if(|_| false);

    let line = line!() + 1;
    let failure = nest(outer, inner).guard(|| raise(Fault::Argument)).unwrap_err();
    assert_eq!(failure.depth(), 1);
    assert_eq!(failure.origin().unwrap().line, line);
    assert_eq!(*failure.source_ref(), Fault::Argument);
}

#[test]
fn test_each_level_cleans_up_in_its_own_scope() {
    let log = Log::default();
    let inner = on::<Fault>()
        .handle_if(|_| {
            log.borrow_mut().push("inner decides");
            false
        })
        .finally(|| log.borrow_mut().push("inner cleanup"));
    let outer = on::<Fault>()
        .handle_if(|_| {
            log.borrow_mut().push("outer decides");
            true
        })
        .finally(|| log.borrow_mut().push("outer cleanup"));

    assert!(nest(outer, inner).guard(|| raise(Fault::Argument)).is_ok());
    assert_eq!(
        entries(&log),
        ["inner decides", "inner cleanup", "outer decides", "outer cleanup"]
    );
}

#[test]
fn test_cleanup_once_per_level_on_success() {
    let runs = Cell::new(0);
    let bump = || runs.set(runs.get() + 1);
    let inner = on::<Fault>().handle(|_| {}).finally(bump);
    let outer = on::<Fault>().handle(|_| {}).finally(bump);

    let mut chain = nest(outer, inner);
    assert!(chain.guard(|| Ok::<_, Failure<Fault>>(())).is_ok());
    assert_eq!(runs.get(), 2);
}

#[test]
fn test_value_chain() {
    let inner = on_kind(Fault::Argument).recover_if(|_| nothing::<i32>());
    let outer = on::<Fault>().recover_if(|e| match e {
        Fault::Argument => just(-1),
        _ => nothing(),
    });

    let mut chain = nest(outer, inner);
    assert_eq!(chain.guard(|| raise(Fault::Argument)).unwrap(), -1);
    assert_eq!(chain.guard(|| Ok::<_, Failure<Fault>>(7)).unwrap(), 7);
    assert!(chain.guard(|| raise(Fault::InvalidOperation)).is_err());
}

#[test]
fn test_borrowed_handler_reused_across_chains() {
    let count = Cell::new(0);
    let mut shared = on::<Fault>().handle(|_| count.set(count.get() + 1));

    let first = on::<Fault>().handle_if(|_| false);
    assert!(nest(&mut shared, first).guard(|| raise(Fault::Argument)).is_ok());

    let second = on::<Fault>().handle_if(|_| false);
    assert!(nest(&mut shared, second).guard(|| raise(Fault::Exception)).is_ok());

    assert_eq!(count.get(), 2);
}

#[test]
fn test_bound_operation() {
    let ran = Cell::new(false);
    let handler = on::<Fault>().handle_if(|_| true);
    let mut bound = nest_op(handler, || {
        ran.set(true);
        raise(Fault::Argument)
    });

    assert!(!ran.get());
    assert!(bound().is_ok());
    assert!(ran.get());
}

#[test]
fn test_bound_operation_with_chain() {
    let log = Log::default();
    let inner = on::<Fault>().recover_if(|_| {
        log.borrow_mut().push("inner");
        nothing::<&str>()
    });
    let outer = on::<Fault>().recover(|_| {
        log.borrow_mut().push("outer");
        "recovered"
    });

    let mut bound = nest_op(nest(outer, inner), || raise(Fault::Exception));
    assert_eq!(bound().unwrap(), "recovered");
    assert_eq!(entries(&log), ["inner", "outer"]);
}
