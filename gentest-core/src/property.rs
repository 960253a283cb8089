//! Property definitions for property-based testing.

use crate::data::{Random, RunOptions, Size};
use crate::error::{GentestError, Result};
use crate::gen::{Gen, Shape};
use crate::runner::{run_property, Outcome};
use crate::tree::Tree;
use crate::value::Record;
use std::any::Any;
use std::fmt::{self, Debug, Display};
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// The identity of a panic or error raised by a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    /// `"panic"` for panics, otherwise the type name of the returned error.
    pub name: String,
    pub message: String,
}

impl CapturedError {
    /// Capture an error value returned by a predicate.
    pub fn from_error<E: Display>(error: &E) -> Self {
        CapturedError {
            name: std::any::type_name::<E>().to_string(),
            message: error.to_string(),
        }
    }

    /// Capture the payload of a caught panic.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "Box<dyn Any>".to_string(),
            },
        };
        CapturedError {
            name: "panic".to_string(),
            message,
        }
    }
}

impl Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// Outcome of running a predicate once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub success: bool,
    /// Set when the predicate panicked or returned an error.
    pub error: Option<CapturedError>,
}

impl TestResult {
    pub fn pass() -> Self {
        TestResult {
            success: true,
            error: None,
        }
    }

    pub fn fail() -> Self {
        TestResult {
            success: false,
            error: None,
        }
    }

    /// A failure caused by a panic or error rather than a false predicate.
    pub fn exception(error: CapturedError) -> Self {
        TestResult {
            success: false,
            error: Some(error),
        }
    }
}

/// Things a predicate may return.
pub trait Testable {
    fn into_result(self) -> TestResult;
}

impl Testable for bool {
    fn into_result(self) -> TestResult {
        if self {
            TestResult::pass()
        } else {
            TestResult::fail()
        }
    }
}

impl Testable for TestResult {
    fn into_result(self) -> TestResult {
        self
    }
}

impl<E: Display> Testable for std::result::Result<bool, E> {
    fn into_result(self) -> TestResult {
        match self {
            Ok(holds) => holds.into_result(),
            Err(error) => TestResult::exception(CapturedError::from_error(&error)),
        }
    }
}

impl<E: Display> Testable for std::result::Result<(), E> {
    fn into_result(self) -> TestResult {
        self.map(|()| true).into_result()
    }
}

type Predicate<A> = Box<dyn Fn(&A) -> TestResult>;

/// A named predicate bound to the generator of its arguments.
pub struct Property<A> {
    name: String,
    generator: Gen<A>,
    predicate: Predicate<A>,
}

impl<A> Property<A>
where
    A: Clone + Debug + 'static,
{
    /// Create a property from a generator of argument lists and a predicate.
    pub fn new<F, R>(name: impl Into<String>, generator: Gen<A>, predicate: F) -> Self
    where
        F: Fn(&A) -> R + 'static,
        R: Testable,
    {
        Property {
            name: name.into(),
            generator,
            predicate: Box::new(move |args| predicate(args).into_result()),
        }
    }

    /// Create a property from positional or named argument generators.
    ///
    /// See [`Args`] for the accepted forms.
    pub fn for_all<G, F, R>(args: G, name: impl Into<String>, predicate: F) -> Self
    where
        G: Args<Output = A>,
        F: Fn(&A) -> R + 'static,
        R: Testable,
    {
        Property::new(name, args.into_gen(), predicate)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generate a test case: a tree of argument lists.
    pub fn gen_test(&self, random: &mut Random, size: usize) -> Result<Tree<A>> {
        if size == 0 {
            return Err(GentestError::InvalidSize { size });
        }
        self.generator.generate(random, Size(size))
    }

    /// Run the predicate against the root of a test case.
    ///
    /// Panics and returned errors count as failures and are captured.
    pub fn run_test(&self, test_case: &Tree<A>) -> TestResult {
        self.run_args(test_case.root())
    }

    /// Run the predicate against one argument list.
    pub fn run_args(&self, args: &A) -> TestResult {
        catch_unwind(AssertUnwindSafe(|| (self.predicate)(args)))
            .unwrap_or_else(|payload| TestResult::exception(CapturedError::from_panic(payload)))
    }

    /// Search the shrinks of a failing test case for a smaller failure.
    ///
    /// `test_case` should be a tree from [`Property::gen_test`] whose root
    /// failed [`Property::run_test`].
    pub fn shrink_failing_test(&self, test_case: Tree<A>) -> ShrinkSearch<'_, A> {
        ShrinkSearch {
            property: self,
            node: test_case,
            child_index: 0,
        }
    }

    /// Run this property on its own and turn a counterexample into an error.
    ///
    /// Usage errors (generation exhaustion, bad options) are returned as is.
    pub fn check(&self, options: &RunOptions) -> Result<()> {
        options.validate()?;
        let mut random = Random::new(options.resolve_seed());
        match run_property(self, &mut random, options, &mut io::sink())? {
            Outcome::Passed { .. } => Ok(()),
            Outcome::Failed {
                counterexample,
                error: Some(error),
                ..
            } => Err(GentestError::Exception {
                property: self.name.clone(),
                counterexample,
                name: error.name,
                message: error.message,
            }),
            Outcome::Failed { counterexample, .. } => Err(GentestError::Failure {
                property: self.name.clone(),
                counterexample,
            }),
        }
    }
}

/// Create a property from positional or named argument generators.
pub fn for_all<G, F, R>(args: G, name: impl Into<String>, predicate: F) -> Property<G::Output>
where
    G: Args,
    F: Fn(&G::Output) -> R + 'static,
    R: Testable,
{
    Property::for_all(args, name, predicate)
}

/// One predicate invocation made while shrinking.
#[derive(Debug, Clone, PartialEq)]
pub struct ShrinkAttempt<A> {
    pub args: A,
    pub result: TestResult,
}

/// Summary of a finished shrink search.
#[derive(Debug, Clone, PartialEq)]
pub struct ShrinkOutcome<A> {
    /// The smallest failing argument list found.
    pub minimal: A,
    /// The error raised by `minimal`, if it raised one.
    pub error: Option<CapturedError>,
    /// Predicate invocations made.
    pub attempts: usize,
    /// Invocations that still failed.
    pub shrinks: usize,
}

/// Greedy depth-first search for a locally minimal failing case.
///
/// Each call to `next` runs the predicate on one shrink of the current
/// node. The first shrink that still fails becomes the current node and the
/// scan restarts at its own shrinks; the remaining siblings are never tried.
/// The iterator ends when every shrink of the current node passes.
pub struct ShrinkSearch<'p, A> {
    property: &'p Property<A>,
    node: Tree<A>,
    child_index: usize,
}

impl<'p, A> ShrinkSearch<'p, A>
where
    A: Clone + Debug + 'static,
{
    /// The smallest failing case found so far.
    pub fn current(&self) -> &Tree<A> {
        &self.node
    }

    /// Drive the search to completion.
    ///
    /// `original` is the result of the failing root, used when no shrink
    /// fails.
    pub fn run_to_end(mut self, original: &TestResult) -> ShrinkOutcome<A> {
        let mut error = original.error.clone();
        let mut attempts = 0;
        let mut shrinks = 0;

        while let Some(attempt) = self.next() {
            attempts += 1;
            if !attempt.result.success {
                shrinks += 1;
                error = attempt.result.error;
            }
        }

        ShrinkOutcome {
            minimal: self.node.root().clone(),
            error,
            attempts,
            shrinks,
        }
    }
}

impl<'p, A> Iterator for ShrinkSearch<'p, A>
where
    A: Clone + Debug + 'static,
{
    type Item = ShrinkAttempt<A>;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.node.children().get(self.child_index)?.clone();
        let result = self.property.run_test(&child);
        log::trace!(
            "shrink attempt {:?} for `{}`: {}",
            child.root(),
            self.property.name,
            if result.success { "passed" } else { "failed" }
        );

        if result.success {
            self.child_index += 1;
        } else {
            log::debug!("`{}` still fails with {}", self.property.name, child.render_shrinks());
            self.node = child.clone();
            self.child_index = 0;
        }

        Some(ShrinkAttempt {
            args: child.root().clone(),
            result,
        })
    }
}

/// Argument generators accepted by [`for_all`].
///
/// - positional: a tuple of generators `(Gen<A>, Gen<B>, ...)` (up to six)
///   yields `(A, B, ...)`; a `Vec<Gen<T>>` yields a `Vec<T>` of fixed length;
/// - named: a [`Shape`] yields `(Record<T>,)`, a single record argument.
///
/// Every form shrinks its arguments in place, first argument first, without
/// ever changing their number.
pub trait Args {
    type Output: Clone + Debug + 'static;

    fn into_gen(self) -> Gen<Self::Output>;
}

impl<T: Clone + Debug + 'static> Args for Gen<T> {
    type Output = T;

    fn into_gen(self) -> Gen<T> {
        self
    }
}

impl<T: Clone + Debug + 'static> Args for Vec<Gen<T>> {
    type Output = Vec<T>;

    fn into_gen(self) -> Gen<Vec<T>> {
        Gen::tuple(self)
    }
}

impl<T: Clone + Debug + 'static> Args for Shape<T> {
    type Output = (Record<T>,);

    fn into_gen(self) -> Gen<(Record<T>,)> {
        Gen::shape(self).map(|record| (record.clone(),))
    }
}

impl<A: Clone + Debug + 'static> Args for (Gen<A>,) {
    type Output = (A,);

    fn into_gen(self) -> Gen<(A,)> {
        self.0.map(|a| (a.clone(),))
    }
}

macro_rules! impl_args_tuple {
    ($($name:ident $var:ident),+ ; $last:ident $last_var:ident) => {
        impl<$($name,)+ $last> Args for ($(Gen<$name>,)+ Gen<$last>)
        where
            $($name: Clone + Debug + 'static,)+
            $last: Clone + Debug + 'static,
        {
            type Output = ($($name,)+ $last);

            fn into_gen(self) -> Gen<Self::Output> {
                let ($($var,)+ $last_var) = self;
                ($($var,)+)
                    .into_gen()
                    .zip($last_var)
                    .map(|(($($var,)+), $last_var)| ($($var.clone(),)+ $last_var.clone()))
            }
        }
    };
}

impl_args_tuple!(A a ; B b);
impl_args_tuple!(A a, B b ; C c);
impl_args_tuple!(A a, B b, C c ; D d);
impl_args_tuple!(A a, B b, C c, D d ; E e);
impl_args_tuple!(A a, B b, C c, D d, E e ; F f);
