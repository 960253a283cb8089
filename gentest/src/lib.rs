//! gentest property-based testing library.
//!
//! This is the main entry point for gentest: it re-exports the engine from
//! `gentest-core` and adds the [`Registry`] used to declare suites and the
//! [`cli`] module that runs them from the command line.
//!
//! ```no_run
//! use gentest::{Gen, Registry};
//!
//! fn suite(r: &mut Registry) {
//!     r.for_all((Gen::int(), Gen::int()), "sum commutes", |&(a, b)| a + b == b + a);
//!     r.describe("strings", |r| {
//!         r.for_all((Gen::string(),), "ascii only", |(s,): &(String,)| s.is_ascii());
//!     });
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     gentest::cli::main(suite)
//! }
//! ```

pub use gentest_core::*;

pub mod cli;
pub mod registry;

pub use registry::{suite, Registry};
