//! Lazy rose tree implementation for shrinking test values.

use crate::lazy::Thunk;
use std::fmt;
use std::rc::Rc;

pub mod render;

/// A rose tree containing a value and its shrink possibilities.
///
/// The children of a node are computed on first access and cached for the
/// lifetime of the node. Cloning a tree is cheap: clones share the same node,
/// so children realized through one handle are visible through every other.
/// Children are ordered from the most aggressive simplification to the most
/// conservative one.
pub struct Tree<T> {
    node: Rc<Node<T>>,
}

struct Node<T> {
    root: T,
    children: Thunk<Vec<Tree<T>>>,
}

impl<T> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Tree {
            node: Rc::clone(&self.node),
        }
    }
}

impl<T> Tree<T> {
    /// Create a tree with no children.
    pub fn leaf(root: T) -> Self {
        Tree {
            node: Rc::new(Node {
                root,
                children: Thunk::ready(Vec::new()),
            }),
        }
    }

    /// Create a tree whose children are computed from `children` on demand.
    pub fn new<F>(root: T, children: F) -> Self
    where
        F: FnOnce() -> Vec<Tree<T>> + 'static,
    {
        Tree {
            node: Rc::new(Node {
                root,
                children: Thunk::new(children),
            }),
        }
    }

    /// Create a tree with the given, already built children.
    pub fn with_children(root: T, children: Vec<Tree<T>>) -> Self {
        Tree {
            node: Rc::new(Node {
                root,
                children: Thunk::ready(children),
            }),
        }
    }

    /// The value at this node.
    pub fn root(&self) -> &T {
        &self.node.root
    }

    /// The immediate shrinks of this node, realizing them if necessary.
    pub fn children(&self) -> &[Tree<T>] {
        self.node.children.force()
    }

    /// Whether this node has any shrinks. Realizes the children.
    pub fn has_shrinks(&self) -> bool {
        !self.children().is_empty()
    }

    /// Whether the children of this node have been computed yet.
    pub fn is_expanded(&self) -> bool {
        self.node.children.is_realized()
    }

    /// Count the nodes reachable within `max_depth` levels below the root.
    pub fn count_nodes(&self, max_depth: usize) -> usize {
        if max_depth == 0 {
            return 1;
        }
        1 + self
            .children()
            .iter()
            .map(|child| child.count_nodes(max_depth - 1))
            .sum::<usize>()
    }
}

impl<T: 'static> Tree<T> {
    /// Build a tree from a root value and a function listing smaller values.
    ///
    /// Every child is built with the same function, so shrinking continues
    /// recursively.
    pub fn unfold<F>(root: T, shrink: F) -> Self
    where
        T: Clone,
        F: Fn(&T) -> Vec<T> + 'static,
    {
        Self::unfold_with(root, Rc::new(shrink))
    }

    fn unfold_with(root: T, shrink: Rc<dyn Fn(&T) -> Vec<T>>) -> Self
    where
        T: Clone,
    {
        let value = root.clone();
        Tree::new(root, move || {
            shrink(&value)
                .into_iter()
                .map(|candidate| Tree::unfold_with(candidate, Rc::clone(&shrink)))
                .collect()
        })
    }

    /// Map a function over every value in the tree, preserving its shape.
    ///
    /// The function is applied to the root immediately and to the children
    /// only when they are realized.
    pub fn map<U, F>(&self, f: F) -> Tree<U>
    where
        U: 'static,
        F: Fn(&T) -> U + 'static,
    {
        self.map_with(Rc::new(f))
    }

    fn map_with<U: 'static>(&self, f: Rc<dyn Fn(&T) -> U>) -> Tree<U> {
        let source = self.clone();
        let root = f(self.root());
        Tree::new(root, move || {
            source
                .children()
                .iter()
                .map(|child| child.map_with(Rc::clone(&f)))
                .collect()
        })
    }

    /// Monadic bind: substitute a tree for every value and flatten.
    ///
    /// The children of `f(root)` come first, followed by the bound children
    /// of the original tree.
    pub fn flat_map<U, F>(&self, f: F) -> Tree<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> Tree<U> + 'static,
    {
        self.map(f).flatten()
    }

    /// Monadic bind with a fallible substitution.
    ///
    /// An error for the root is returned. Descendants are substituted only
    /// when realized, after this call has returned, so an error for one of
    /// them is handed to `on_error` and that descendant is left out of the
    /// shrinks.
    pub fn try_flat_map<U, E, F, H>(&self, f: F, on_error: H) -> std::result::Result<Tree<U>, E>
    where
        U: Clone + 'static,
        E: 'static,
        F: Fn(&T) -> std::result::Result<Tree<U>, E> + 'static,
        H: Fn(E) + 'static,
    {
        let inner = f(self.root())?;
        Ok(self.bind_realized(inner, Rc::new(f), Rc::new(on_error)))
    }

    fn bind_realized<U, E>(
        &self,
        inner: Tree<U>,
        f: Rc<dyn Fn(&T) -> std::result::Result<Tree<U>, E>>,
        on_error: Rc<dyn Fn(E)>,
    ) -> Tree<U>
    where
        U: Clone + 'static,
        E: 'static,
    {
        let outer = self.clone();
        Tree::new(inner.root().clone(), move || {
            let mut children = inner.children().to_vec();
            for child in outer.children() {
                match f(child.root()) {
                    Ok(substituted) => children.push(child.bind_realized(
                        substituted,
                        Rc::clone(&f),
                        Rc::clone(&on_error),
                    )),
                    Err(error) => on_error(error),
                }
            }
            children
        })
    }

    /// Keep only descendants whose values satisfy `predicate`.
    ///
    /// The root itself is not checked. A rejected child is dropped together
    /// with its whole subtree.
    pub fn filter_subtrees<F>(&self, predicate: F) -> Tree<T>
    where
        T: Clone,
        F: Fn(&T) -> bool + 'static,
    {
        self.filter_with(Rc::new(predicate))
    }

    fn filter_with(&self, predicate: Rc<dyn Fn(&T) -> bool>) -> Tree<T>
    where
        T: Clone,
    {
        let source = self.clone();
        Tree::new(self.root().clone(), move || {
            source
                .children()
                .iter()
                .filter(|child| predicate(child.root()))
                .map(|child| child.filter_with(Rc::clone(&predicate)))
                .collect()
        })
    }

    /// Pair this tree with another.
    ///
    /// Shrinks of the left component come first, with the right held fixed,
    /// then shrinks of the right component with the left held fixed.
    pub fn zip<U>(&self, other: &Tree<U>) -> Tree<(T, U)>
    where
        T: Clone,
        U: Clone + 'static,
    {
        let left = self.clone();
        let right = other.clone();
        Tree::new((self.root().clone(), other.root().clone()), move || {
            let mut children: Vec<Tree<(T, U)>> = left
                .children()
                .iter()
                .map(|shrunk| shrunk.zip(&right))
                .collect();
            children.extend(right.children().iter().map(|shrunk| left.zip(shrunk)));
            children
        })
    }

    /// Collect values level by level down to `max_depth`, root first.
    pub fn expand(&self, max_depth: usize) -> Vec<T>
    where
        T: Clone,
    {
        let mut result = vec![self.root().clone()];
        let mut level = vec![self.clone()];
        for _ in 0..max_depth {
            let next: Vec<Tree<T>> = level
                .iter()
                .flat_map(|tree| tree.children().iter().cloned())
                .collect();
            if next.is_empty() {
                break;
            }
            result.extend(next.iter().map(|tree| tree.root().clone()));
            level = next;
        }
        result
    }
}

impl<T: Clone + 'static> Tree<Tree<T>> {
    /// Flatten a tree of trees by one level (monadic join).
    pub fn flatten(&self) -> Tree<T> {
        let inner = self.root().clone();
        let outer = self.clone();
        Tree::new(inner.root().clone(), move || {
            let mut children = inner.children().to_vec();
            children.extend(outer.children().iter().map(Tree::flatten));
            children
        })
    }
}

impl<T> From<T> for Tree<T> {
    fn from(value: T) -> Self {
        Tree::leaf(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", self.root())
            .field("children", &self.node.children)
            .finish()
    }
}
