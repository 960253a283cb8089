//! Draw example values from a generator.
//!
//! Handy for eyeballing what a generator produces and for testing
//! generators themselves. Sizes grow slowly: the `i`th value is drawn with
//! size `i / 2 + 1`.

use crate::data::{clock_seed, Random, Size};
use crate::error::Result;
use crate::gen::Gen;
use crate::tree::Tree;

/// Draw `count` values, seeding from the wall clock.
pub fn sample<T: Clone + 'static>(gen: &Gen<T>, count: usize) -> Result<Vec<T>> {
    sample_seeded(gen, count, clock_seed())
}

/// Draw `count` values from a fixed seed.
pub fn sample_seeded<T: Clone + 'static>(gen: &Gen<T>, count: usize, seed: u32) -> Result<Vec<T>> {
    Ok(sample_trees(gen, count, seed)?
        .iter()
        .map(|tree| tree.root().clone())
        .collect())
}

/// Draw `count` whole value trees from a fixed seed, so their shrinks can
/// be inspected.
pub fn sample_trees<T: 'static>(gen: &Gen<T>, count: usize, seed: u32) -> Result<Vec<Tree<T>>> {
    let mut random = Random::new(seed);
    (0..count)
        .map(|i| gen.generate(&mut random, Size(i / 2 + 1)))
        .collect()
}
