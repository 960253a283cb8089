//! Running groups of properties and reporting the results.

use crate::data::{Random, RunOptions};
use crate::error::Result;
use crate::property::{CapturedError, Property};
use std::cell::Cell;
use std::fmt::{self, Debug};
use std::io::{self, Write};
use std::panic;
use std::sync::Once;

/// The size used for sample `k` (counting from 1) of `num_tests`.
///
/// Grows from 1 toward `max_size`, reaching it on the last sample.
pub fn sample_size(k: usize, num_tests: usize, max_size: usize) -> usize {
    let ratio = k as f64 / num_tests as f64;
    (ratio * (max_size as f64 - 0.5)).floor() as usize + 1
}

/// How one property fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every sample passed.
    Passed { tests: usize },
    /// A sample failed and was shrunk.
    Failed {
        /// Samples drawn, including the failing one.
        tests_run: usize,
        /// `Debug` rendering of the minimal failing arguments.
        counterexample: String,
        /// What the minimal counterexample raised, if anything.
        error: Option<CapturedError>,
        attempts: usize,
        shrinks: usize,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Passed { .. })
    }
}

/// The result of one property in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReport {
    pub category: Option<String>,
    pub name: String,
    pub outcome: Outcome,
}

/// The result of a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The seed the run used; pass it back in to reproduce the run.
    pub seed: u32,
    pub properties: Vec<PropertyReport>,
}

impl RunReport {
    /// Number of properties run.
    pub fn total(&self) -> usize {
        self.properties.len()
    }

    pub fn passed(&self) -> usize {
        self.properties
            .iter()
            .filter(|report| report.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Whether every property held.
    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    /// Reports of the properties that failed.
    pub fn failures(&self) -> impl Iterator<Item = &PropertyReport> {
        self.properties
            .iter()
            .filter(|report| !report.outcome.is_success())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        let noun = if total == 1 { "property" } else { "properties" };
        match self.failed() {
            0 => write!(f, "{total} {noun} verified."),
            failed => write!(f, "{failed} of {total} {noun} violated."),
        }
    }
}

/// A property with its argument type erased, so one runner can hold
/// properties over different argument types.
pub trait Check {
    fn name(&self) -> &str;

    /// Sample, and on failure shrink, this property.
    fn check(
        &self,
        random: &mut Random,
        options: &RunOptions,
        out: &mut dyn Write,
    ) -> Result<Outcome>;
}

impl<A> Check for Property<A>
where
    A: Clone + Debug + 'static,
{
    fn name(&self) -> &str {
        Property::name(self)
    }

    fn check(
        &self,
        random: &mut Random,
        options: &RunOptions,
        out: &mut dyn Write,
    ) -> Result<Outcome> {
        run_property(self, random, options, out)
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

/// While alive, panics on this thread are not printed by the panic hook.
///
/// Predicate panics are reported through the outcome instead. The hook
/// installed here defers to the previous one for every other panic.
struct QuietPanics {
    was_quiet: bool,
}

impl QuietPanics {
    fn enter() -> Self {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if !QUIET_PANICS.with(Cell::get) {
                    previous(info);
                }
            }));
        });
        QuietPanics {
            was_quiet: QUIET_PANICS.with(|quiet| quiet.replace(true)),
        }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        QUIET_PANICS.with(|quiet| quiet.set(self.was_quiet));
    }
}

pub(crate) fn run_property<A>(
    property: &Property<A>,
    random: &mut Random,
    options: &RunOptions,
    out: &mut dyn Write,
) -> Result<Outcome>
where
    A: Clone + Debug + 'static,
{
    let _quiet = QuietPanics::enter();
    let name = property.name();
    let num_tests = options.num_tests;

    for k in 1..=num_tests {
        write!(out, "\r{k}/{num_tests} {name}")?;
        let size = sample_size(k, num_tests, options.max_size);
        let test_case = property.gen_test(random, size)?;
        let result = property.run_test(&test_case);
        if result.success {
            continue;
        }

        log::debug!(
            "`{name}` failed on sample {k} at size {size} with {}",
            test_case.render_compact(1)
        );
        log::trace!("shrink tree of `{name}`:\n{}", test_case.render(2));

        let mut minimal = test_case.root().clone();
        let mut error = result.error;
        let mut attempts = 0;
        let mut shrinks = 0;
        for attempt in property.shrink_failing_test(test_case) {
            if let Some(deferred) = random.take_deferred_error() {
                return Err(deferred);
            }
            attempts += 1;
            if !attempt.result.success {
                shrinks += 1;
                minimal = attempt.args;
                error = attempt.result.error;
            }
            write!(out, "\r{k}/{num_tests} {name}, shrinking {shrinks}/{attempts}")?;
        }
        if let Some(deferred) = random.take_deferred_error() {
            return Err(deferred);
        }

        let counterexample = format!("{minimal:?}");
        return Ok(Outcome::Failed {
            tests_run: k,
            counterexample,
            error,
            attempts,
            shrinks,
        });
    }

    Ok(Outcome::Passed { tests: num_tests })
}

struct Category {
    name: Option<String>,
    properties: Vec<Box<dyn Check>>,
}

/// An ordered collection of categorised properties.
///
/// Properties added before the first call to [`Runner::new_category`] go
/// into a nameless default category, which always runs first.
pub struct Runner {
    categories: Vec<Category>,
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Runner {
            categories: vec![Category {
                name: None,
                properties: Vec::new(),
            }],
        }
    }

    /// Start a new category; later properties are added to it.
    pub fn new_category(&mut self, name: impl Into<String>) {
        self.categories.push(Category {
            name: Some(name.into()),
            properties: Vec::new(),
        });
    }

    /// Add a property to the current category.
    pub fn add<C: Check + 'static>(&mut self, property: C) {
        if let Some(category) = self.categories.last_mut() {
            category.properties.push(Box::new(property));
        }
    }

    /// Number of registered properties, ignoring any filter.
    pub fn len(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.properties.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every property, writing progress to standard error unless
    /// `options.silent` is set.
    pub fn run(&self, options: &RunOptions) -> Result<RunReport> {
        self.run_with_writer(options, &mut io::stderr())
    }

    /// Run every property, writing progress to `out` unless
    /// `options.silent` is set.
    ///
    /// A single random source seeded from `options` is shared by every
    /// property in order, so the whole run is reproducible from its seed.
    /// Failing properties are reported, not returned as errors; generation
    /// and usage errors abort the run.
    pub fn run_with_writer(&self, options: &RunOptions, out: &mut dyn Write) -> Result<RunReport> {
        options.validate()?;
        let mut sink = io::sink();
        let out: &mut dyn Write = if options.silent { &mut sink } else { out };

        let seed = options.resolve_seed();
        let mut random = Random::new(seed);
        let mut properties = Vec::new();
        log::debug!("running {} properties with seed {seed}", self.len());

        for category in &self.categories {
            let selected: Vec<&dyn Check> = category
                .properties
                .iter()
                .map(|property| property.as_ref())
                .filter(|property| match &options.grep {
                    Some(pattern) => property.name().contains(pattern.as_str()),
                    None => true,
                })
                .collect();
            if selected.is_empty() {
                continue;
            }

            if let Some(name) = &category.name {
                write!(out, "\n{name}:\n")?;
            }

            for property in selected {
                let outcome = property.check(&mut random, options, out)?;
                write_outcome(out, property.name(), &outcome)?;
                properties.push(PropertyReport {
                    category: category.name.clone(),
                    name: property.name().to_string(),
                    outcome,
                });
            }
        }

        let report = RunReport { seed, properties };
        writeln!(out, "\n{report}")?;
        out.flush()?;
        Ok(report)
    }
}

fn write_outcome(out: &mut dyn Write, name: &str, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::Passed { tests } => writeln!(out, "\r✓ {name}, passed {tests} tests"),
        Outcome::Failed {
            counterexample,
            error,
            ..
        } => {
            writeln!(out, "\r✘ {name}, counterexample found:")?;
            writeln!(out, "{counterexample}")?;
            if let Some(error) = error {
                writeln!(out, "exception raised: {}", error.name)?;
                writeln!(out, "{}", error.message)?;
            }
            Ok(())
        }
    }
}
