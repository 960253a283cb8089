//! Generator combinators for property-based testing.

use crate::data::{Random, Size};
use crate::error::{GentestError, Result};
use crate::shrink::{int_tree, sequence_tree};
use crate::tree::Tree;
use crate::value::{Record, Value};
use std::rc::Rc;

/// Number of attempts [`Gen::such_that`] makes before giving up.
pub const DEFAULT_MAX_TRIES: usize = 10;

/// Lowest and highest printable ASCII code points.
const PRINTABLE_ASCII: (i64, i64) = (32, 126);

type GenFn<T> = dyn Fn(&mut Random, Size) -> Result<Tree<T>>;

/// A generator for test data of type `T`.
///
/// A generator is a function from a random source and a size to a lazy
/// tree holding the generated value and its shrinks. The random source is
/// its only source of entropy, so generating twice from the same source
/// state and size yields the same tree. Generators are cheap to clone.
pub struct Gen<T> {
    generator: Rc<GenFn<T>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            generator: Rc::clone(&self.generator),
        }
    }
}

impl<T: 'static> Gen<T> {
    /// Create a new generator from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Random, Size) -> Result<Tree<T>> + 'static,
    {
        Gen {
            generator: Rc::new(f),
        }
    }

    /// Generate a value tree using the given random source and size.
    pub fn generate(&self, random: &mut Random, size: Size) -> Result<Tree<T>> {
        (self.generator)(random, size)
    }

    /// A generator that always produces `value`, with no shrinks.
    pub fn constant(value: T) -> Self
    where
        T: Clone,
    {
        Gen::new(move |_random, _size| Ok(Tree::leaf(value.clone())))
    }

    /// Map a function over the generated values, keeping their shrinks.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        U: 'static,
        F: Fn(&T) -> U + 'static,
    {
        let f = Rc::new(f);
        Gen::new(move |random, size| {
            let f = Rc::clone(&f);
            Ok(self.generate(random, size)?.map(move |value| f(value)))
        })
    }

    /// Dependent generation: use a generated value to pick the next generator.
    ///
    /// The shrinks of the inner generator come first, then the inner
    /// generator re-run on each shrink of the outer value. The inner
    /// generator always runs from the same sub-seed, drawn once from the
    /// random source, so re-running it during shrinking is deterministic.
    ///
    /// An error from the inner generator on a shrink of the outer value is
    /// deferred to `random` (see [`Random::take_deferred_error`]).
    pub fn bind<U, F>(self, f: F) -> Gen<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> Gen<U> + 'static,
    {
        let f = Rc::new(f);
        Gen::new(move |random, size| {
            let outer = self.generate(random, size)?;
            let inner_random = random.split();
            let deferred = inner_random.clone();
            let f = Rc::clone(&f);
            outer.try_flat_map(
                move |value| f(value).generate(&mut inner_random.clone(), size),
                move |error| {
                    log::debug!("bound generator failed on a shrink: {error}");
                    deferred.defer_error(error);
                },
            )
        })
    }

    /// Only produce values satisfying `predicate`, retrying up to
    /// [`DEFAULT_MAX_TRIES`] times.
    pub fn such_that<F>(self, predicate: F) -> Gen<T>
    where
        T: Clone,
        F: Fn(&T) -> bool + 'static,
    {
        self.such_that_tries(predicate, DEFAULT_MAX_TRIES)
    }

    /// Only produce values satisfying `predicate`, retrying up to `max_tries`
    /// times before failing with [`GentestError::GenerationExhausted`].
    ///
    /// Shrinks that violate the predicate are pruned, so shrinking never
    /// leaves the filtered set.
    pub fn such_that_tries<F>(self, predicate: F, max_tries: usize) -> Gen<T>
    where
        T: Clone,
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        Gen::new(move |random, size| {
            for _ in 0..max_tries.max(1) {
                let tree = self.generate(random, size)?;
                if predicate(tree.root()) {
                    let predicate = Rc::clone(&predicate);
                    return Ok(tree.filter_subtrees(move |value| predicate(value)));
                }
            }
            Err(GentestError::GenerationExhausted { tries: max_tries })
        })
    }

    /// Generate pairs. Shrinks the left component first.
    pub fn zip<U>(self, other: Gen<U>) -> Gen<(T, U)>
    where
        T: Clone,
        U: Clone + 'static,
    {
        Gen::new(move |random, size| {
            let left = self.generate(random, size)?;
            let right = other.generate(random, size)?;
            Ok(left.zip(&right))
        })
    }

    /// Generate sequences of any length up to the size, shrinking by
    /// removing elements and by shrinking elements in place.
    pub fn array_of(element: Gen<T>) -> Gen<Vec<T>>
    where
        T: Clone,
    {
        let length = Gen::<i64>::int_non_negative();
        Gen::new(move |random, size| {
            let len = usize::try_from(*length.generate(random, size)?.root()).unwrap_or(0);
            let elements = (0..len)
                .map(|_| element.generate(random, size))
                .collect::<Result<Vec<_>>>()?;
            Ok(sequence_tree(elements, true))
        })
    }

    /// Generate fixed-length sequences, one element per generator.
    ///
    /// Elements shrink in place but are never removed.
    pub fn tuple(gens: Vec<Gen<T>>) -> Gen<Vec<T>>
    where
        T: Clone,
    {
        Gen::new(move |random, size| {
            let elements = gens
                .iter()
                .map(|gen| gen.generate(random, size))
                .collect::<Result<Vec<_>>>()?;
            Ok(sequence_tree(elements, false))
        })
    }

    /// Choose uniformly between generators.
    ///
    /// A single generator is returned unchanged. Shrinking moves toward
    /// earlier generators in the list.
    pub fn one_of(gens: Vec<Gen<T>>) -> Result<Gen<T>>
    where
        T: Clone,
    {
        let mut gens = gens;
        match gens.len() {
            0 => Err(GentestError::contract("empty list passed to one_of")),
            1 => Ok(gens.remove(0)),
            _ => Ok(Gen::pick(gens)),
        }
    }

    /// Choose uniformly between constant values.
    pub fn elements(values: Vec<T>) -> Result<Gen<T>>
    where
        T: Clone,
    {
        if values.is_empty() {
            return Err(GentestError::contract("empty list passed to elements"));
        }
        Gen::one_of(values.into_iter().map(Gen::constant).collect())
    }

    fn pick(gens: Vec<Gen<T>>) -> Gen<T>
    where
        T: Clone,
    {
        let last = gens.len() as i64 - 1;
        Gen::<i64>::choose(0, last).bind(move |&index| gens[index as usize].clone())
    }

    /// Generate records with one field per named generator.
    pub fn shape(shape: Shape<T>) -> Gen<Record<T>>
    where
        T: Clone,
    {
        let (names, gens): (Vec<String>, Vec<Gen<T>>) = shape.fields.into_iter().unzip();
        let names: Rc<[String]> = names.into();
        Gen::tuple(gens).map(move |values| {
            Record::new(names.iter().cloned().zip(values.iter().cloned()).collect())
        })
    }

    /// Erase the value type so generators of different types can be mixed,
    /// e.g. as fields of one [`Shape`].
    pub fn dynamic(self) -> Gen<Value>
    where
        T: Clone + Into<Value>,
    {
        self.map(|value| value.clone().into())
    }
}

impl Gen<i64> {
    /// Integers in `[low, high]`, shrinking toward `low`.
    pub fn choose(low: i64, high: i64) -> Self {
        Gen::choose_toward(low, high, low)
    }

    /// Integers in `[low, high]`, shrinking toward `center`.
    ///
    /// Ignores the size. Fails with a contract error when `low > high`.
    pub fn choose_toward(low: i64, high: i64, center: i64) -> Self {
        Gen::new(move |random, _size| {
            let n = draw_between(random, low, high)?;
            Ok(int_tree(n, center))
        })
    }

    /// Integers in `[-size, size]`, shrinking toward zero.
    pub fn int() -> Self {
        Gen::new(|random, size| {
            let bound = size.as_i64();
            Gen::choose_toward(-bound, bound, 0).generate(random, size)
        })
    }

    /// Integers in `[0, size]`, shrinking toward zero.
    pub fn int_non_negative() -> Self {
        Gen::new(|random, size| Gen::choose(0, size.as_i64()).generate(random, size))
    }

    /// Integers in `[1, size + 1]`, shrinking toward one.
    pub fn int_positive() -> Self {
        Gen::new(|random, size| {
            Gen::choose(1, size.as_i64().saturating_add(1)).generate(random, size)
        })
    }

    /// Integers in `[-size, size]` other than zero.
    pub fn int_non_zero() -> Self {
        Gen::int().such_that(|&n| n != 0)
    }
}

fn draw_between(random: &mut Random, low: i64, high: i64) -> Result<i64> {
    if low > high {
        return Err(GentestError::contract(format!(
            "choose called with low {low} greater than high {high}"
        )));
    }
    let span = (i128::from(high) - i128::from(low) + 1) as f64;
    let offset = (random.float() * span).floor() as i128;
    Ok((i128::from(low) + offset).min(i128::from(high)) as i64)
}

impl Gen<char> {
    /// Printable ASCII characters, shrinking toward the space character.
    pub fn char() -> Self {
        let (low, high) = PRINTABLE_ASCII;
        Gen::<i64>::choose(low, high).map(|&code| u8::try_from(code).map_or(' ', char::from))
    }
}

impl Gen<String> {
    /// Strings of printable ASCII characters.
    pub fn string() -> Self {
        Gen::array_of(Gen::char()).map(|chars| chars.iter().collect())
    }
}

impl Gen<bool> {
    /// Booleans, shrinking toward `false`.
    pub fn bool() -> Self {
        Gen::pick(vec![Gen::constant(false), Gen::constant(true)])
    }
}

/// Named field generators for [`Gen::shape`].
///
/// Fields keep the order in which they were first declared. Declaring a
/// field again replaces its generator in place.
pub struct Shape<T> {
    fields: Vec<(String, Gen<T>)>,
}

impl<T: 'static> Shape<T> {
    pub fn new() -> Self {
        Shape { fields: Vec::new() }
    }

    /// Add or replace a field.
    pub fn field(mut self, name: impl Into<String>, gen: Gen<T>) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = gen,
            None => self.fields.push((name, gen)),
        }
        self
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl<T: 'static> Default for Shape<T> {
    fn default() -> Self {
        Shape::new()
    }
}
