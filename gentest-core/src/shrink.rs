//! Shrink algorithms for primitive and composite values.
//!
//! Every function here orders its candidates from the most drastic
//! simplification to the most conservative one, since the shrink search
//! accepts the first candidate that still fails.

use crate::tree::Tree;

/// Candidates for shrinking `n` toward `center`.
///
/// The distance `center - n` is halved (rounding toward zero) until it
/// reaches zero, and `n + distance` is emitted at each step. When
/// `n != center` the output starts with `center` and ends with the integer
/// adjacent to `n` on the side of `center`.
pub fn shrink_int(n: i64, center: i64) -> Vec<i64> {
    let mut out = Vec::new();
    let mut diff = i128::from(center) - i128::from(n);
    while diff != 0 {
        // n + diff lies between n and center, so it always fits in an i64.
        out.push((i128::from(n) + diff) as i64);
        diff /= 2;
    }
    out
}

/// A tree of `n` whose descendants shrink toward `center`.
pub fn int_tree(n: i64, center: i64) -> Tree<i64> {
    Tree::unfold(n, move |&value| shrink_int(value, center))
}

/// Shrinks of a sequence built from already generated element trees.
///
/// With `allow_removal`, one candidate per element with that element removed
/// comes first. Then, for every element, one candidate per child of that
/// element's tree substituted in place. Each candidate keeps the element
/// trees it was built from, so it shrinks further the same way.
///
/// Fixed-arity tuples pass `allow_removal = false`.
pub fn shrink_array<T>(trees: &[Tree<T>], allow_removal: bool) -> Vec<Tree<Vec<T>>>
where
    T: Clone + 'static,
{
    let mut removed = Vec::new();
    let mut shrunk = Vec::new();

    for (index, tree) in trees.iter().enumerate() {
        if allow_removal {
            let mut without = Vec::with_capacity(trees.len().saturating_sub(1));
            without.extend_from_slice(&trees[..index]);
            without.extend_from_slice(&trees[index + 1..]);
            removed.push(without);
        }

        for child in tree.children() {
            let mut replaced = trees.to_vec();
            replaced[index] = child.clone();
            shrunk.push(replaced);
        }
    }

    removed
        .into_iter()
        .chain(shrunk)
        .map(|elements| sequence_tree(elements, allow_removal))
        .collect()
}

/// Assemble element trees into a tree of the sequence of their roots.
pub fn sequence_tree<T>(elements: Vec<Tree<T>>, allow_removal: bool) -> Tree<Vec<T>>
where
    T: Clone + 'static,
{
    let root = elements.iter().map(|tree| tree.root().clone()).collect();
    Tree::new(root, move || shrink_array(&elements, allow_removal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots<T: Clone>(trees: &[Tree<T>]) -> Vec<T> {
        trees.iter().map(|t| t.root().clone()).collect()
    }

    #[test]
    fn test_shrink_int_toward_zero() {
        assert_eq!(shrink_int(10, 0), vec![0, 5, 8, 9]);
        assert_eq!(shrink_int(-7, 0), vec![0, -4, -6]);
        assert_eq!(shrink_int(1, 0), vec![0]);
        assert!(shrink_int(0, 0).is_empty());
    }

    #[test]
    fn test_shrink_int_toward_center() {
        assert_eq!(shrink_int(3, 10), vec![10, 6, 4]);
        assert_eq!(shrink_int(-3, -5), vec![-5, -4]);
    }

    #[test]
    fn test_shrink_int_includes_center_and_neighbour() {
        for n in -200i64..=200 {
            for center in [-17i64, 0, 3, 50] {
                if n == center {
                    continue;
                }
                let candidates = shrink_int(n, center);
                assert_eq!(candidates[0], center);
                let neighbour = n + (center - n).signum();
                assert!(candidates.contains(&neighbour), "{n} toward {center}");
            }
        }
    }

    #[test]
    fn test_shrink_int_candidates_approach_center() {
        for n in [-1000i64, -33, 7, 64, 999] {
            let distances: Vec<i64> = shrink_int(n, 0).iter().map(|c| c.abs()).collect();
            assert!(distances.iter().all(|&d| d < n.abs()));
            // ordered from the center outward
            assert!(distances.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_shrink_int_extreme_values() {
        assert_eq!(shrink_int(i64::MIN, i64::MAX)[0], i64::MAX);
        assert_eq!(shrink_int(i64::MAX, i64::MIN)[0], i64::MIN);
    }

    #[test]
    fn test_int_tree_recurses() {
        let tree = int_tree(4, 0);
        assert_eq!(roots(tree.children()), vec![0, 2, 3]);
        assert_eq!(roots(tree.children()[1].children()), vec![0, 1]);
        assert!(tree.children()[0].children().is_empty());
    }

    #[test]
    fn test_shrink_array_removals_then_substitutions() {
        let elements = vec![int_tree(2, 0), int_tree(1, 0)];
        let candidates = roots(&shrink_array(&elements, true));
        assert_eq!(
            candidates,
            vec![vec![1], vec![2], vec![0, 1], vec![1, 1], vec![2, 0]]
        );
    }

    #[test]
    fn test_shrink_array_without_removal() {
        let elements = vec![int_tree(2, 0), Tree::leaf(7)];
        let candidates = roots(&shrink_array(&elements, false));
        assert_eq!(candidates, vec![vec![0, 7], vec![1, 7]]);
    }

    #[test]
    fn test_shrink_array_coverage() {
        let elements: Vec<Tree<i64>> = (1..=5).map(|n| int_tree(n, 0)).collect();
        let candidates = shrink_array(&elements, true);

        let removals = candidates.iter().filter(|c| c.root().len() == 4).count();
        let substitutions = candidates.iter().filter(|c| c.root().len() == 5).count();
        assert_eq!(removals, 5);
        assert!(substitutions >= 5);
    }

    #[test]
    fn test_sequence_tree_shrinks_recursively() {
        let tree = sequence_tree(vec![int_tree(3, 0)], true);
        assert_eq!(*tree.root(), vec![3]);
        let shrunk = &tree.children()[1];
        assert_eq!(*shrunk.root(), vec![0]);
        assert_eq!(roots(shrunk.children()), vec![Vec::<i64>::new()]);
    }
}
