//! Core functionality for gentest property-based testing.
//!
//! Generators produce lazy rose trees: a value together with the values it
//! can shrink to. Properties pair a generator with a predicate, and the
//! runner samples them with growing sizes, shrinking any failure it finds
//! down to a locally minimal counterexample.

pub mod data;
pub mod error;
pub mod gen;
pub mod lazy;
pub mod property;
pub mod runner;
pub mod sample;
pub mod shrink;
pub mod tree;
pub mod value;

// Re-export the main types
pub use data::*;
pub use error::*;
pub use gen::*;
pub use property::*;
pub use runner::*;
pub use sample::*;
pub use tree::*;
pub use value::*;
