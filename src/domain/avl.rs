use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::mem;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::{info, instrument};

/// `tracing` target carrying the tree's diagnostic trace lines.
pub const DIAGNOSTICS_TARGET: &str = "coursecat::diagnostics";

type Link = Option<Index>;

/// Tree node in the arena-backed AVL structure.
#[derive(Debug)]
struct AvlNode<K, V> {
    key: K,
    value: V,
    /// Index of the left child in the arena
    left: Link,
    /// Index of the right child in the arena
    right: Link,
    /// Height of the subtree rooted here, 1 for a leaf
    height: usize,
}

impl<K, V> AvlNode<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }
}

/// Self-balancing binary search tree (AVL) stored in a generational arena.
///
/// Every node satisfies |height(left) - height(right)| <= 1 after each
/// completed insert or remove, which keeps lookups, inserts and removals at
/// `O(log n)`. Keys are unique; an in-order walk yields them ascending.
///
/// Nodes refer to their children by arena index only. There are no parent
/// links: insert and remove recurse down and rebalance on the way back up,
/// returning the (possibly new) subtree root at each level.
///
/// With diagnostics enabled the tree emits one event on
/// [`DIAGNOSTICS_TARGET`] for every direction decision, rotation and balance
/// factor computation. Results are the same either way.
#[derive(Debug)]
pub struct AvlTree<K, V> {
    /// Arena storage for all tree nodes
    arena: Arena<AvlNode<K, V>>,
    /// Index of the root node, None for empty trees
    root: Link,
    diagnostics: bool,
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            diagnostics: false,
        }
    }
}

impl<K: Ord + fmt::Display, V> AvlTree<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostics(diagnostics: bool) -> Self {
        Self {
            diagnostics,
            ..Self::default()
        }
    }

    /// Number of records stored.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.arena.is_empty(), self.root.is_none());
        self.root.is_none()
    }

    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }

    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.diagnostics = enabled;
    }

    /// Flip the diagnostics flag, returning the new state.
    pub fn toggle_diagnostics(&mut self) -> bool {
        self.diagnostics = !self.diagnostics;
        self.diagnostics
    }

    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    /// Key and value at the root, if any.
    ///
    /// The root can be any stored node; use the iterators for a guaranteed
    /// ordering.
    pub fn root(&self) -> Option<(&K, &V)> {
        self.root.map(|idx| {
            let node = &self.arena[idx];
            (&node.key, &node.value)
        })
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Returns the value stored under `key`, or `None`.
    ///
    /// Time complexity: `O(log n)`
    #[instrument(level = "trace", skip_all)]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.arena[idx];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => {
                    self.trace(format_args!("Search: going left from {}", node.key));
                    current = node.left;
                }
                Ordering::Greater => {
                    self.trace(format_args!("Search: going right from {}", node.key));
                    current = node.right;
                }
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns `false` for a duplicate key, in which case the stored node is
    /// left untouched and `key`/`value` are dropped.
    ///
    /// Time complexity: `O(log n)`
    #[instrument(level = "trace", skip_all, fields(key = %key))]
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut inserted = None;
        let root = self.insert_at(self.root, key, value, &mut inserted);
        self.root = Some(root);
        inserted.is_some()
    }

    /// Removes the node stored under `key` and returns its value, or `None`
    /// if no such key exists.
    ///
    /// Time complexity: `O(log n)`
    #[instrument(level = "trace", skip_all)]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut removed = None;
        self.root = self.remove_at(self.root, key, &mut removed);
        removed
    }

    /// Ascending key order.
    pub fn iter_inorder(&self) -> InorderIter<'_, K, V> {
        InorderIter::new(self)
    }

    /// Node, then left subtree, then right subtree.
    pub fn iter_preorder(&self) -> PreorderIter<'_, K, V> {
        PreorderIter::new(self)
    }

    /// Left subtree, then right subtree, then node.
    pub fn iter_postorder(&self) -> PostorderIter<'_, K, V> {
        PostorderIter::new(self)
    }

    /// Breadth-first, top level first, left to right.
    pub fn iter_levelorder(&self) -> LevelorderIter<'_, K, V> {
        LevelorderIter::new(self)
    }

    /// Checks the ordering and AVL invariants and that every stored height
    /// is accurate.
    pub fn is_balanced(&self) -> bool {
        self.check_subtree(self.root, None, None).is_some()
    }

    /// Renders the tree shape, root first, keys only.
    pub fn structure(&self) -> Tree<String> {
        match self.root {
            Some(root) => self.build_structure(root),
            None => Tree::new("(empty)".to_string()),
        }
    }

    fn build_structure(&self, idx: Index) -> Tree<String> {
        let node = &self.arena[idx];
        let mut tree = Tree::new(format!("{} (h={})", node.key, node.height));
        if node.left.is_none() && node.right.is_none() {
            return tree;
        }
        for (side, child) in [("L", node.left), ("R", node.right)] {
            match child {
                Some(child) => {
                    let mut sub = self.build_structure(child);
                    sub.root = format!("{}: {}", side, sub.root);
                    tree.push(sub);
                }
                None => {
                    tree.push(Tree::new(format!("{}: -", side)));
                }
            }
        }
        tree
    }

    /// Returns the subtree height when the subtree is a valid AVL tree with
    /// keys strictly between `lower` and `upper`.
    fn check_subtree(&self, link: Link, lower: Option<&K>, upper: Option<&K>) -> Option<usize> {
        let Some(idx) = link else {
            return Some(0);
        };
        let node = self.arena.get(idx)?;
        if lower.is_some_and(|lo| node.key <= *lo) || upper.is_some_and(|hi| node.key >= *hi) {
            return None;
        }
        let left = self.check_subtree(node.left, lower, Some(&node.key))?;
        let right = self.check_subtree(node.right, Some(&node.key), upper)?;
        let height = 1 + left.max(right);
        if left.abs_diff(right) > 1 || height != node.height {
            return None;
        }
        Some(height)
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        if self.diagnostics {
            info!(target: DIAGNOSTICS_TARGET, "{}", args);
        }
    }

    fn height_of(&self, link: Link) -> usize {
        link.map_or(0, |idx| self.arena[idx].height)
    }

    fn update_height(&mut self, idx: Index) {
        let node = &self.arena[idx];
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.arena[idx].height = height;
    }

    fn balance_factor(&self, link: Link) -> isize {
        match link {
            Some(idx) => {
                let node = &self.arena[idx];
                self.height_of(node.left) as isize - self.height_of(node.right) as isize
            }
            None => 0,
        }
    }

    /// Right rotation around `y`; its left child becomes the subtree root.
    ///
    /// ```text
    ///       y            x
    ///      / \          / \
    ///     x   C  ==>   A   y
    ///    / \              / \
    ///   A   B            B   C
    /// ```
    fn rotate_right(&mut self, y: Index) -> Index {
        let Some(x) = self.arena[y].left else {
            return y;
        };
        self.trace(format_args!("Rotate right at {}", self.arena[y].key));
        let b = self.arena[x].right;
        self.arena[x].right = Some(y);
        self.arena[y].left = b;
        self.update_height(y);
        self.update_height(x);
        x
    }

    /// Left rotation around `x`; its right child becomes the subtree root.
    fn rotate_left(&mut self, x: Index) -> Index {
        let Some(y) = self.arena[x].right else {
            return x;
        };
        self.trace(format_args!("Rotate left at {}", self.arena[x].key));
        let b = self.arena[y].left;
        self.arena[y].left = Some(x);
        self.arena[x].right = b;
        self.update_height(x);
        self.update_height(y);
        y
    }

    fn insert_at(&mut self, link: Link, key: K, value: V, inserted: &mut Option<Index>) -> Index {
        let Some(idx) = link else {
            self.trace(format_args!("Insert: {}", key));
            let idx = self.arena.insert(AvlNode::new(key, value));
            *inserted = Some(idx);
            return idx;
        };

        match key.cmp(&self.arena[idx].key) {
            Ordering::Less => {
                self.trace(format_args!("Going left from {}", self.arena[idx].key));
                let child = self.insert_at(self.arena[idx].left, key, value, inserted);
                self.arena[idx].left = Some(child);
            }
            Ordering::Greater => {
                self.trace(format_args!("Going right from {}", self.arena[idx].key));
                let child = self.insert_at(self.arena[idx].right, key, value, inserted);
                self.arena[idx].right = Some(child);
            }
            Ordering::Equal => {
                self.trace(format_args!("Duplicate key: {}", key));
                return idx;
            }
        }

        // Duplicate further down: nothing changed on this path
        let Some(new_idx) = *inserted else {
            return idx;
        };

        self.update_height(idx);
        let bf = self.balance_factor(Some(idx));
        self.trace(format_args!("Balance factor at {} is {}", self.arena[idx].key, bf));

        if bf > 1 {
            if let Some(left) = self.arena[idx].left {
                match self.arena[new_idx].key.cmp(&self.arena[left].key) {
                    Ordering::Less => return self.rotate_right(idx),
                    Ordering::Greater => {
                        let left = self.rotate_left(left);
                        self.arena[idx].left = Some(left);
                        return self.rotate_right(idx);
                    }
                    Ordering::Equal => {}
                }
            }
        }
        if bf < -1 {
            if let Some(right) = self.arena[idx].right {
                match self.arena[new_idx].key.cmp(&self.arena[right].key) {
                    Ordering::Greater => return self.rotate_left(idx),
                    Ordering::Less => {
                        let right = self.rotate_right(right);
                        self.arena[idx].right = Some(right);
                        return self.rotate_left(idx);
                    }
                    Ordering::Equal => {}
                }
            }
        }
        idx
    }

    fn remove_at<Q>(&mut self, link: Link, key: &Q, removed: &mut Option<V>) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let idx = link?;

        match key.cmp(self.arena[idx].key.borrow()) {
            Ordering::Less => {
                self.trace(format_args!("Going left to delete from {}", self.arena[idx].key));
                self.arena[idx].left = self.remove_at(self.arena[idx].left, key, removed);
            }
            Ordering::Greater => {
                self.trace(format_args!("Going right to delete from {}", self.arena[idx].key));
                self.arena[idx].right = self.remove_at(self.arena[idx].right, key, removed);
            }
            Ordering::Equal => {
                self.trace(format_args!("Deleting {}", self.arena[idx].key));
                let (left, right) = (self.arena[idx].left, self.arena[idx].right);
                match (left, right) {
                    (Some(_), Some(right)) => {
                        // Take over the successor's payload; the successor
                        // slot now holds the doomed one and is still the
                        // minimum of the right subtree, so removing `key`
                        // there finds it.
                        let successor = self.min_node(right);
                        if let (Some(node), Some(succ)) = self.arena.get2_mut(idx, successor) {
                            mem::swap(&mut node.key, &mut succ.key);
                            mem::swap(&mut node.value, &mut succ.value);
                        }
                        self.arena[idx].right = self.remove_at(Some(right), key, removed);
                    }
                    (child, None) | (None, child) => {
                        let node = self.arena.remove(idx)?;
                        *removed = Some(node.value);
                        return child;
                    }
                }
            }
        }

        if removed.is_none() {
            return Some(idx);
        }

        self.update_height(idx);
        let bf = self.balance_factor(Some(idx));
        self.trace(format_args!(
            "Balance factor after deletion at {} is {}",
            self.arena[idx].key, bf
        ));

        if bf > 1 {
            let left = self.arena[idx].left;
            if self.balance_factor(left) >= 0 {
                return Some(self.rotate_right(idx));
            }
            if let Some(left) = left {
                let left = self.rotate_left(left);
                self.arena[idx].left = Some(left);
            }
            return Some(self.rotate_right(idx));
        }
        if bf < -1 {
            let right = self.arena[idx].right;
            if self.balance_factor(right) <= 0 {
                return Some(self.rotate_left(idx));
            }
            if let Some(right) = right {
                let right = self.rotate_right(right);
                self.arena[idx].right = Some(right);
            }
            return Some(self.rotate_left(idx));
        }
        Some(idx)
    }

    /// Leftmost node of the subtree rooted at `idx`.
    fn min_node(&self, mut idx: Index) -> Index {
        while let Some(left) = self.arena[idx].left {
            idx = left;
        }
        idx
    }
}

/// In-order iterator, ascending keys.
pub struct InorderIter<'a, K, V> {
    arena: &'a Arena<AvlNode<K, V>>,
    stack: Vec<Index>,
    current: Link,
}

impl<'a, K, V> InorderIter<'a, K, V> {
    fn new(tree: &'a AvlTree<K, V>) -> Self {
        Self {
            arena: &tree.arena,
            stack: Vec::new(),
            current: tree.root,
        }
    }
}

impl<'a, K, V> Iterator for InorderIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.current {
            self.stack.push(idx);
            self.current = self.arena[idx].left;
        }
        let idx = self.stack.pop()?;
        let node = &self.arena[idx];
        self.current = node.right;
        Some((&node.key, &node.value))
    }
}

/// Pre-order iterator.
pub struct PreorderIter<'a, K, V> {
    arena: &'a Arena<AvlNode<K, V>>,
    stack: Vec<Index>,
}

impl<'a, K, V> PreorderIter<'a, K, V> {
    fn new(tree: &'a AvlTree<K, V>) -> Self {
        Self {
            arena: &tree.arena,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for PreorderIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = &self.arena[idx];
        // Right first so the left subtree is visited first
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some((&node.key, &node.value))
    }
}

/// Post-order iterator.
pub struct PostorderIter<'a, K, V> {
    arena: &'a Arena<AvlNode<K, V>>,
    stack: Vec<(Index, bool)>,
}

impl<'a, K, V> PostorderIter<'a, K, V> {
    fn new(tree: &'a AvlTree<K, V>) -> Self {
        Self {
            arena: &tree.arena,
            stack: tree.root.map(|idx| (idx, false)).into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for PostorderIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, visited)) = self.stack.pop() {
            let node = &self.arena[idx];
            if visited {
                return Some((&node.key, &node.value));
            }
            self.stack.push((idx, true));
            self.stack.extend(node.right.map(|r| (r, false)));
            self.stack.extend(node.left.map(|l| (l, false)));
        }
        None
    }
}

/// Level-order (breadth-first) iterator.
pub struct LevelorderIter<'a, K, V> {
    arena: &'a Arena<AvlNode<K, V>>,
    queue: VecDeque<Index>,
}

impl<'a, K, V> LevelorderIter<'a, K, V> {
    fn new(tree: &'a AvlTree<K, V>) -> Self {
        Self {
            arena: &tree.arena,
            queue: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for LevelorderIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.queue.pop_front()?;
        let node = &self.arena[idx];
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        Some((&node.key, &node.value))
    }
}
