//! Internal testing utilities for the ndkit crates.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};

/// Utility for writing table-driven tests.
///
/// Describe each case with a struct (conventionally named `Case`) that
/// implements `Debug`, collect the cases into an array or `Vec` and call one
/// of the `test_each*` methods with the body of the test:
///
/// ```
/// use ndkit_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     shape: Vec<usize>,
///     len: usize,
/// }
///
/// let cases = [
///     Case { shape: vec![2, 3], len: 6 },
///     Case { shape: vec![4, 0], len: 0 },
///     Case { shape: vec![], len: 1 },
/// ];
///
/// cases.test_each(|case| {
///     assert_eq!(case.shape.iter().product::<usize>(), case.len);
/// });
/// ```
///
/// Every case is run even if earlier ones fail. Panics are caught and, once
/// all cases have run, a single panic is raised which lists the debug
/// representation of each failing case.
///
/// Cases and the values captured by the test closure must be unwind safe.
/// Create values with interior mutability inside the closure, or wrap them
/// with [`AssertUnwindSafe`](std::panic::AssertUnwindSafe).
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Run `test` with a reference to each case.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Run `test` with a clone of each case.
    fn test_each_clone(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + Clone + UnwindSafe;

    /// Run `test` with each case by value.
    ///
    /// The case is formatted before the test runs so that it can be reported
    /// if the test panics.
    fn test_each_value(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe;
}

/// Run `run` for each item, collecting the descriptions of failed items, and
/// panic at the end if there were any.
fn run_cases<C>(cases: impl IntoIterator<Item = C>, run: impl Fn(C) -> Option<String>) {
    let failures: Vec<String> = cases.into_iter().filter_map(run).collect();
    if !failures.is_empty() {
        panic!(
            "{} test cases failed: [{}]",
            failures.len(),
            failures.join(", ")
        );
    }
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        I::Item: Debug + RefUnwindSafe,
    {
        run_cases(self, |case| {
            std::panic::catch_unwind(|| test(&case))
                .err()
                .map(|_| format!("{:?}", case))
        })
    }

    fn test_each_clone(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        I::Item: Debug + Clone + UnwindSafe,
    {
        run_cases(self, |case| {
            let value = case.clone();
            let test = &test;
            std::panic::catch_unwind(move || test(value))
                .err()
                .map(|_| format!("{:?}", case))
        })
    }

    fn test_each_value(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        I::Item: Debug + UnwindSafe,
    {
        run_cases(self, |case| {
            let description = format!("{:?}", case);
            let test = &test;
            std::panic::catch_unwind(move || test(case))
                .err()
                .map(|_| description)
        })
    }
}
