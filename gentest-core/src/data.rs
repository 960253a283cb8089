//! Core data types: size, random source and run configuration.

use crate::error::{GentestError, Result};
use rand::{Rng, RngCore, SeedableRng};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Size parameter for controlling test data generation.
///
/// Size is a hint, not a bound: integer generators draw from
/// `[-size, size]` and sequence generators draw lengths up to `size`.
/// The runner raises it from 1 to the configured maximum over a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Size(pub usize);

impl Size {
    /// Create a new size value.
    pub fn new(value: usize) -> Self {
        Size(value)
    }

    /// Get the inner size value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// The size as a signed integer bound, saturating at `i64::MAX`.
    pub fn as_i64(&self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }
}

impl From<usize> for Size {
    fn from(value: usize) -> Self {
        Size(value)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size({})", self.0)
    }
}

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded source of uniform random numbers.
///
/// A SplitMix64 stream seeded from a 32-bit integer. The same seed and the
/// same sequence of calls always produce the same outputs. It implements
/// [`RngCore`], so any `rand` distribution can sample from it.
///
/// Sources split from one another share a slot for generation errors that
/// surface after generation returned, while shrink candidates are realized.
/// Equality compares only the stream position.
#[derive(Debug, Clone)]
pub struct Random {
    seed: u32,
    state: u64,
    deferred: Rc<RefCell<Option<GentestError>>>,
}

impl Random {
    /// Create a random source from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Random {
            seed,
            state: mix64(u64::from(seed)),
            deferred: Rc::default(),
        }
    }

    /// The seed this source was created from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// A uniform float in `[0, 1)`.
    pub fn float(&mut self) -> f64 {
        self.gen::<f64>()
    }

    /// Draw a seed for an independent random source.
    pub fn next_seed(&mut self) -> u32 {
        self.next_u32()
    }

    /// Split off an independent random source, advancing this one.
    ///
    /// The split source reports deferred errors to the same slot as this one.
    pub fn split(&mut self) -> Random {
        let seed = self.next_seed();
        Random {
            seed,
            state: mix64(u64::from(seed)),
            deferred: Rc::clone(&self.deferred),
        }
    }

    /// Record an error raised while realizing shrink candidates lazily.
    ///
    /// Only the first error is kept until it is taken.
    pub fn defer_error(&self, error: GentestError) {
        let mut slot = self.deferred.borrow_mut();
        if slot.is_none() {
            *slot = Some(error);
        }
    }

    /// Take the first deferred error recorded by this source or any source
    /// split from it.
    pub fn take_deferred_error(&self) -> Option<GentestError> {
        self.deferred.borrow_mut().take()
    }
}

impl PartialEq for Random {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed && self.state == other.state
    }
}

impl Eq for Random {}

impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix64(self.state)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Random {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Random::new(u32::from_le_bytes(seed))
    }
}

/// SplitMix64 output function.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// A seed taken from the wall clock, masked to 32 bits.
pub fn clock_seed() -> u32 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    (millis & 0xffff_ffff) as u32
}

/// Configuration for a test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Seed for the run's random source; the wall clock when `None`.
    pub seed: Option<u32>,

    /// Number of samples drawn per property.
    pub num_tests: usize,

    /// Size used for the last sample of each property.
    pub max_size: usize,

    /// Only run properties whose name contains this substring.
    pub grep: Option<String>,

    /// Suppress progress output.
    pub silent: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            seed: None,
            num_tests: 100,
            max_size: 50,
            grep: None,
            silent: false,
        }
    }
}

impl RunOptions {
    /// Use a fixed seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draw the given number of samples per property.
    pub fn with_tests(mut self, tests: usize) -> Self {
        self.num_tests = tests;
        self
    }

    /// Grow the size parameter up to `size`.
    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    /// Only run properties whose names contain `pattern`.
    pub fn with_grep(mut self, pattern: impl Into<String>) -> Self {
        self.grep = Some(pattern.into());
        self
    }

    /// Suppress progress output.
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// The seed to use, drawing one from the clock if none was configured.
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(clock_seed)
    }

    /// Check that the options describe a runnable configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_tests == 0 {
            return Err(GentestError::contract("num_tests must be at least 1"));
        }
        if self.max_size == 0 {
            return Err(GentestError::contract("max_size must be at least 1"));
        }
        Ok(())
    }
}
