//! A small suite run through the gentest command line.
//!
//! ```text
//! cargo run -p gentest --example arithmetic -- --seed 1 -n 200
//! ```

use gentest::{Gen, Registry, Shape, Value};
use std::process::ExitCode;

fn suite(r: &mut Registry) {
    r.for_all((Gen::int(), Gen::int()), "sum commutes", |&(a, b)| {
        a + b == b + a
    });
    r.for_all((Gen::int(),), "negation is an involution", |&(n,)| -(-n) == n);

    r.describe("division", |r| {
        r.for_all(
            (Gen::int(), Gen::int_non_zero()),
            "quotient and remainder recombine",
            |&(a, b)| (a / b) * b + a % b == a,
        );
        r.for_all((Gen::int(),), "checked division by zero", |&(n,)| {
            n.checked_div(0).is_none()
        });
    });

    r.describe("lists", |r| {
        r.for_all(
            (Gen::array_of(Gen::int()),),
            "reverse is an involution",
            |(v,): &(Vec<i64>,)| {
                let mut twice = v.clone();
                twice.reverse();
                twice.reverse();
                twice == *v
            },
        );
        r.for_all(
            (Gen::array_of(Gen::int_non_negative()),),
            "sum is at least the maximum",
            |(v,): &(Vec<i64>,)| v.iter().sum::<i64>() >= v.iter().copied().max().unwrap_or(0),
        );
    });

    r.describe("records", |r| {
        let point = Shape::new()
            .field("x", Gen::int().dynamic())
            .field("y", Gen::int().dynamic())
            .field("label", Gen::string().dynamic());
        r.for_all(point, "points keep their fields", |(point,)| {
            let coordinate = |name| point.get(name).and_then(Value::as_int);
            coordinate("x").is_some()
                && coordinate("y").is_some()
                && point.get("label").and_then(Value::as_str).is_some()
        });
    });
}

fn main() -> ExitCode {
    gentest::cli::main(suite)
}
