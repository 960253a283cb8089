//! Command line entry point for property suites.

use crate::registry::{suite, Registry};
use clap::Parser;
use colored::*;
use gentest_core::{GentestError, Outcome, RunOptions, RunReport};
use std::io::IsTerminal;
use std::process::ExitCode;

/// Exit status when every property holds.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status when at least one property was violated.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status for usage and generation errors.
pub const EXIT_ERROR: u8 = 2;

/// Run a suite of gentest properties
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "gentest")]
pub struct Cli {
    /// Number of test cases per property
    #[arg(short = 'n', long, default_value_t = 100)]
    pub num_tests: usize,

    /// Max value of the size parameter for generated values
    #[arg(short = 'S', long, default_value_t = 50)]
    pub max_size: usize,

    /// Only run properties whose name contains this pattern
    #[arg(short, long)]
    pub grep: Option<String>,

    /// Seed for the run; taken from the clock when omitted
    #[arg(long)]
    pub seed: Option<u32>,

    /// Suppress progress output
    #[arg(long)]
    pub silent: bool,
}

impl Cli {
    pub fn options(&self) -> RunOptions {
        RunOptions {
            seed: self.seed,
            num_tests: self.num_tests,
            max_size: self.max_size,
            grep: self.grep.clone(),
            silent: self.silent,
        }
    }
}

/// Parse the process arguments, run `body`'s properties and report.
///
/// Meant to be returned from a binary's `main`.
pub fn main<F>(body: F) -> ExitCode
where
    F: FnOnce(&mut Registry),
{
    let should_use_colors = std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err();
    colored::control::set_override(should_use_colors);

    ExitCode::from(run(&Cli::parse(), body))
}

/// Run `body`'s properties with the given arguments, print a summary and
/// return the process exit status.
pub fn run<F>(cli: &Cli, body: F) -> u8
where
    F: FnOnce(&mut Registry),
{
    let runner = suite(body);
    let result = runner.run(&cli.options());
    match &result {
        Ok(report) => print!("{}", format_report(report)),
        Err(error) => eprintln!("{}", format_error(error)),
    }
    exit_code(&result)
}

/// The exit status for the result of a run.
pub fn exit_code(result: &Result<RunReport, GentestError>) -> u8 {
    match result {
        Ok(report) if report.success() => EXIT_SUCCESS,
        Ok(_) => EXIT_FAILURE,
        Err(_) => EXIT_ERROR,
    }
}

/// Summarise a finished run, listing each violated property.
pub fn format_report(report: &RunReport) -> String {
    let mut output = String::new();

    for failure in report.failures() {
        if let Outcome::Failed {
            counterexample,
            error,
            tests_run,
            shrinks,
            ..
        } = &failure.outcome
        {
            output.push_str(&format!("{} {}\n", "✘".bright_red(), failure.name.bold()));
            output.push_str(&format!(
                "  counterexample: {}\n",
                counterexample.bright_cyan()
            ));
            output.push_str(&format!(
                "  after {tests_run} tests and {shrinks} shrinks\n"
            ));
            if let Some(error) = error {
                output.push_str(&format!("  raised {}\n", error.to_string().bright_red()));
            }
        }
    }

    let summary = report.to_string();
    if report.success() {
        output.push_str(&format!("{}\n", summary.bright_green().bold()));
    } else {
        output.push_str(&format!("{}\n", summary.bright_red().bold()));
        output.push_str(&format!(
            "rerun with {} to reproduce\n",
            format!("--seed {}", report.seed).bright_yellow()
        ));
    }
    output
}

fn format_error(error: &GentestError) -> String {
    format!("{} {error}", "error:".bright_red().bold())
}
