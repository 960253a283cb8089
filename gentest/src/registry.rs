//! Declaring suites of properties.

use gentest_core::{for_all, Args, Check, Runner, Testable};

/// Collects properties into categories for a [`Runner`].
///
/// Properties declared at the top level land in the default category.
/// [`Registry::describe`] opens a named category; it stays current until
/// the next `describe`, including for properties declared after its body
/// returns.
#[derive(Default)]
pub struct Registry {
    runner: Runner,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Open the category `name` and declare its properties in `body`.
    pub fn describe<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: FnOnce(&mut Registry),
    {
        let name = name.into();
        log::trace!("declaring category `{name}`");
        self.runner.new_category(name);
        body(self);
        self
    }

    /// Declare a property over positional or named arguments.
    pub fn for_all<G, F, R>(&mut self, args: G, name: impl Into<String>, predicate: F) -> &mut Self
    where
        G: Args,
        F: Fn(&G::Output) -> R + 'static,
        R: Testable,
    {
        self.runner.add(for_all(args, name, predicate));
        self
    }

    /// Declare an already built property.
    pub fn add<C: Check + 'static>(&mut self, property: C) -> &mut Self {
        self.runner.add(property);
        self
    }

    /// Number of properties declared so far.
    pub fn len(&self) -> usize {
        self.runner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runner.is_empty()
    }

    pub fn into_runner(self) -> Runner {
        self.runner
    }
}

/// Build a runner from a suite function.
pub fn suite<F>(body: F) -> Runner
where
    F: FnOnce(&mut Registry),
{
    let mut registry = Registry::new();
    body(&mut registry);
    registry.into_runner()
}
