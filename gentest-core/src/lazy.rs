//! Single-shot memoized deferred computations.

use std::cell::{Cell, OnceCell};
use std::fmt;

type Init<V> = Box<dyn FnOnce() -> V>;

/// A deferred computation that is evaluated at most once.
///
/// The closure is dropped as soon as it has run, releasing whatever it
/// captured. Later calls to [`Thunk::force`] return the cached value.
pub struct Thunk<V> {
    value: OnceCell<V>,
    init: Cell<Option<Init<V>>>,
}

impl<V> Thunk<V> {
    /// Defer `f` until the value is first needed.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> V + 'static,
    {
        Thunk {
            value: OnceCell::new(),
            init: Cell::new(Some(Box::new(f))),
        }
    }

    /// A thunk that is already realized.
    pub fn ready(value: V) -> Self {
        Thunk {
            value: OnceCell::from(value),
            init: Cell::new(None),
        }
    }

    /// Evaluate the computation if needed and return the cached value.
    ///
    /// # Panics
    ///
    /// Panics if the computation forces its own thunk.
    pub fn force(&self) -> &V {
        self.value.get_or_init(|| match self.init.take() {
            Some(f) => f(),
            None => panic!("thunk forced while it was being evaluated"),
        })
    }

    /// Whether the computation has already run.
    pub fn is_realized(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<V: fmt::Debug> fmt::Debug for Thunk<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => f.debug_tuple("Thunk").field(value).finish(),
            None => f.write_str("Thunk(<deferred>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_thunk_evaluates_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let thunk = Thunk::new(move || {
            counter.set(counter.get() + 1);
            vec![1, 2, 3]
        });

        assert!(!thunk.is_realized());
        assert_eq!(thunk.force(), &vec![1, 2, 3]);
        assert_eq!(thunk.force(), &vec![1, 2, 3]);
        assert!(thunk.is_realized());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_thunk_releases_captured_state() {
        let captured = Rc::new(5);
        let held = Rc::clone(&captured);
        let thunk = Thunk::new(move || *held * 2);

        assert_eq!(Rc::strong_count(&captured), 2);
        assert_eq!(*thunk.force(), 10);
        assert_eq!(Rc::strong_count(&captured), 1);
    }

    #[test]
    fn test_ready_thunk() {
        let thunk = Thunk::ready("done");
        assert!(thunk.is_realized());
        assert_eq!(*thunk.force(), "done");
    }
}
