//! Generator invariants
//!
//! Properties every generator must satisfy regardless of seed and size.

use crate::{arbitrary_seed, arbitrary_size, meta_options};
use gentest::*;

/// Property: `int` stays within `[-size, size]`, shrinks included
pub fn test_int_respects_size() {
    let prop = for_all(
        (arbitrary_size(), arbitrary_seed()),
        "int respects size",
        |&(size, seed)| -> Result<bool> {
            let tree = Gen::int().generate(&mut Random::new(seed), Size(size))?;
            let bound = size as i64;
            Ok(tree.expand(3).iter().all(|n| n.abs() <= bound))
        },
    );
    prop.check(&meta_options()).unwrap();
}

/// Property: `choose` stays within its bounds, whatever the order of growth
pub fn test_choose_respects_bounds() {
    let prop = for_all(
        (Gen::int(), Gen::int_non_negative(), arbitrary_seed()),
        "choose respects bounds",
        |&(low, width, seed)| -> Result<bool> {
            let high = low + width;
            let tree = Gen::choose(low, high).generate(&mut Random::new(seed), Size(1))?;
            Ok(tree.expand(4).iter().all(|n| (low..=high).contains(n)))
        },
    );
    prop.check(&meta_options()).unwrap();
}

/// Property: filtered generators never shrink outside the filter
pub fn test_such_that_shrinks_stay_filtered() {
    let prop = for_all(
        (arbitrary_size(), arbitrary_seed()),
        "such_that shrinks stay filtered",
        |&(size, seed)| -> Result<bool> {
            let gen = Gen::int().such_that_tries(|n| n % 3 == 0, 100);
            let tree = gen.generate(&mut Random::new(seed), Size(size))?;
            Ok(tree.expand(4).iter().all(|n| n % 3 == 0))
        },
    );
    prop.check(&meta_options()).unwrap();
}

/// Property: shapes produce records with exactly their declared fields
pub fn test_shape_round_trip() {
    let shape = Shape::new()
        .field("id", Gen::int_positive().dynamic())
        .field("name", Gen::string().dynamic())
        .field("admin", Gen::bool().dynamic())
        .field("tags", Gen::array_of(Gen::char()).dynamic());
    let gen = Gen::shape(shape);

    let records = sample_seeded(&gen, 200, 7).unwrap();
    assert_eq!(records.len(), 200);
    for record in records {
        assert_eq!(
            record.names().collect::<Vec<_>>(),
            vec!["id", "name", "admin", "tags"]
        );
        assert!(record.get("id").and_then(Value::as_int).unwrap() >= 1);
        assert!(record.get("name").and_then(Value::as_str).is_some());
        assert!(record.get("admin").and_then(Value::as_bool).is_some());
        let tags = record.get("tags").and_then(Value::as_list).unwrap();
        assert!(tags.iter().all(|tag| tag.as_char().is_some()));
    }
}

/// Property: regenerating a bound generator from the same seed gives the
/// same tree
pub fn test_bind_is_deterministic() {
    let prop = for_all(
        (arbitrary_size(), arbitrary_seed()),
        "bind is deterministic",
        |&(size, seed)| -> Result<bool> {
            let gen = Gen::int_non_negative().bind(|&len| {
                Gen::tuple(vec![Gen::bool(); len as usize])
            });
            let first = gen.generate(&mut Random::new(seed), Size(size))?;
            let second = gen.generate(&mut Random::new(seed), Size(size))?;
            Ok(first.expand(2) == second.expand(2))
        },
    );
    prop.check(&meta_options()).unwrap();
}
