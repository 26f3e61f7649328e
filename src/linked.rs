//! A link-based BST with no automatic balancing. Items are stored in owned boxes and the tree
//! can be rebuilt into a minimal-height shape on demand with [`Tree::rebalance`].
//!
//! # Examples
//!
//! ```
//! use ordered_tree::linked::Tree;
//!
//! let mut tree: Tree<i32> = [50, 30, 70, 20, 40, 60, 80].into_iter().collect();
//!
//! assert_eq!(tree.find(&40), Some(&40));
//! assert_eq!(tree.height(), 2);
//!
//! // Removing returns the item that was stored.
//! assert_eq!(tree.remove(&30), Ok(Some(30)));
//! assert_eq!(tree.find(&30), None);
//!
//! // Sorted iteration comes from the in-order walk.
//! let sorted: Vec<_> = tree.inorder().copied().collect();
//! assert_eq!(sorted, [20, 40, 50, 60, 70, 80]);
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::util::balance_bound;

type Link<T> = Option<Box<Node<T>>>;

/// An ordered collection backed by a binary search tree. Items that compare less than a node
/// live in its left subtree and everything else (including equal items) lives in its right
/// subtree, so duplicates are allowed.
///
/// Nothing is rebalanced automatically. Inserting sorted input degrades the tree into a list;
/// call [`Tree::rebalance`] to rebuild it with minimal height.
pub struct Tree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        dismantle(self.root.take());
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone + Ord,
{
    // Re-inserting in preorder reproduces the same shape.
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inorder()).finish()
    }
}

/// Renders the tree rotated 90 degrees counter-clockwise: the right subtree above its parent,
/// the left subtree below, each level indented by one more `"| "`.
///
/// ```
/// use ordered_tree::linked::Tree;
///
/// let tree: Tree<i32> = [2, 1, 3].into_iter().collect();
/// assert_eq!(tree.to_string(), "| 3\n2\n| 1\n");
/// ```
impl<T> fmt::Display for Tree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = Vec::new();
        let mut current = self.root.as_deref().map(|node| (node, 0));
        loop {
            while let Some((node, depth)) = current {
                stack.push((node, depth));
                current = node.right.as_deref().map(|right| (right, depth + 1));
            }
            let Some((node, depth)) = stack.pop() else {
                return Ok(());
            };
            writeln!(f, "{}{}", "| ".repeat(depth), node.item)?;
            current = node.left.as_deref().map(|left| (left, depth + 1));
        }
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Tree<T> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// The number of items in the tree, counting every duplicate.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        trace!(len = self.len, "clearing tree");
        dismantle(self.root.take());
        self.len = 0;
    }

    /// The default iteration order: each node before its children, left subtree before right
    /// subtree. Every call starts a fresh traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::linked::Tree;
    ///
    /// let tree: Tree<i32> = [2, 1, 3].into_iter().collect();
    /// let items: Vec<_> = tree.iter().copied().collect();
    ///
    /// assert_eq!(items, [2, 1, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Preorder traversal (node, left, right). This is the same sequence as [`Tree::iter`].
    pub fn preorder(&self) -> Iter<'_, T> {
        self.iter()
    }

    /// In-order traversal (left, node, right), which yields the items in ascending order.
    pub fn inorder(&self) -> Inorder<'_, T> {
        let mut inorder = Inorder { stack: Vec::new() };
        inorder.push_left_spine(self.root.as_deref());
        inorder
    }

    /// Postorder traversal (left, right, node).
    pub fn postorder(&self) -> std::vec::IntoIter<&T> {
        // Walking node, right, left and reversing gives left, right, node.
        let mut items = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node<T>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            items.push(&node.item);
            stack.extend(node.left.as_deref());
            stack.extend(node.right.as_deref());
        }
        items.reverse();
        items.into_iter()
    }

    /// Breadth-first traversal, left to right within each level.
    pub fn levelorder(&self) -> Levelorder<'_, T> {
        Levelorder {
            queue: self.root.as_deref().into_iter().collect(),
        }
    }

    /// The number of edges on the longest path from the root to a leaf. A tree with a single
    /// item has height `0` and an empty tree has height `-1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.height(), -1);
    ///
    /// tree.insert(1);
    /// assert_eq!(tree.height(), 0);
    ///
    /// tree.insert(2);
    /// tree.insert(3);
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn height(&self) -> isize {
        let mut levels: usize = 0;
        let mut stack: Vec<_> = self.root.as_deref().map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            levels = levels.max(depth);
            stack.extend(node.left.as_deref().map(|left| (left, depth + 1)));
            stack.extend(node.right.as_deref().map(|right| (right, depth + 1)));
        }
        levels as isize - 1
    }

    /// Whether the height is below `2 * ln(len + 1) - 1`. This is a coarse, whole-tree bound
    /// rather than a per-node check. An empty tree counts as balanced.
    pub fn is_balanced(&self) -> bool {
        self.is_empty() || (self.height() as f64) < balance_bound(self.len)
    }

    /// Moves every item out of the tree in ascending order, leaving it empty.
    fn drain_sorted(&mut self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut current = self.root.take();
        loop {
            while let Some(mut node) = current {
                current = node.left.take();
                stack.push(node);
            }
            let Some(mut node) = stack.pop() else {
                break;
            };
            current = node.right.take();
            items.push(node.item);
        }
        self.len = 0;
        items
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    /// Potentially finds the stored item equal to `item`. Among duplicates, the one met first on
    /// the search path from the root is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.find(&1), Some(&1));
    /// assert_eq!(tree.find(&42), None);
    /// ```
    pub fn find(&self, item: &T) -> Option<&T> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match item.cmp(&node.item) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Equal => return Some(&node.item),
                Ordering::Greater => current = node.right.as_deref(),
            }
        }
        None
    }

    /// Whether an item equal to `item` is in the tree.
    pub fn contains(&self, item: &T) -> bool {
        self.find(item).is_some()
    }

    /// Adds `item` as a new leaf. Equal items are kept, to the right of the existing ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, item: T) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if item < node.item {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Node::new_boxed(item));
        self.len += 1;
    }

    /// Overwrites the first item on the search path that equals `item` with `new_item` and
    /// returns the old one. The shape of the tree is untouched, so `new_item` should order the
    /// same way `item` does or later searches may miss it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::linked::Tree;
    ///
    /// let mut tree: Tree<(i32, &str)> = [(1, "a"), (2, "b")].into_iter().collect();
    ///
    /// assert_eq!(tree.replace(&(2, "b"), (2, "c")), Some((2, "b")));
    /// assert_eq!(tree.replace(&(3, "x"), (3, "y")), None);
    /// ```
    pub fn replace(&mut self, item: &T, new_item: T) -> Option<T> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match item.cmp(&node.item) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Equal => return Some(mem::replace(&mut node.item, new_item)),
                Ordering::Greater => current = node.right.as_deref_mut(),
            }
        }
        None
    }

    /// Removes one item equal to `item` and returns it.
    ///
    /// An empty tree reports `Ok(None)`. A non-empty tree without the item is an
    /// [`Error::NotFound`]. When several equal items are present, the one met first on the
    /// search path is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{linked::Tree, Error};
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.remove(&1), Ok(None));
    ///
    /// tree.insert(1);
    /// assert_eq!(tree.remove(&2), Err(Error::NotFound));
    /// assert_eq!(tree.remove(&1), Ok(Some(1)));
    /// ```
    pub fn remove(&mut self, item: &T) -> Result<Option<T>> {
        if self.is_empty() {
            return Ok(None);
        }

        // `self.root` stands in for the parent link of the root, so removing the root needs no
        // special handling.
        let mut slot = &mut self.root;
        loop {
            let ordering = match slot.as_deref() {
                Some(node) => item.cmp(&node.item),
                None => return Err(Error::NotFound),
            };
            if ordering == Ordering::Equal {
                break;
            }
            if let Some(node) = slot {
                slot = if ordering == Ordering::Less {
                    &mut node.left
                } else {
                    &mut node.right
                };
            }
        }

        let mut target = slot.take().expect("Search stopped on an occupied slot");
        let removed = match (target.left.take(), target.right.take()) {
            (Some(left), Some(right)) => {
                trace!("removing node with two children, promoting its in-order predecessor");
                let (predecessor, rest) = Node::split_max(left);
                target.left = rest;
                target.right = Some(right);
                let removed = mem::replace(&mut target.item, predecessor);
                *slot = Some(target);
                removed
            }
            (None, right) => {
                trace!(has_right = right.is_some(), "removing node without a left child");
                *slot = right;
                target.item
            }
            (left, None) => {
                trace!("removing node with only a left child");
                *slot = left;
                target.item
            }
        };

        self.len -= 1;
        Ok(Some(removed))
    }

    /// Every item `v` with `low <= v <= high`, in ascending order. Subtrees that lie entirely
    /// outside the bounds are never visited.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::linked::Tree;
    ///
    /// let tree: Tree<i32> = [50, 30, 70, 20, 40, 60, 80].into_iter().collect();
    ///
    /// assert_eq!(tree.range_find(&25, &65), [&30, &40, &50, &60]);
    /// assert!(tree.range_find(&65, &25).is_empty());
    /// ```
    pub fn range_find(&self, low: &T, high: &T) -> Vec<&T> {
        let mut found = Vec::new();
        let mut stack = Vec::new();
        let mut current = self.root.as_deref();
        loop {
            while let Some(node) = current {
                stack.push(node);
                // A left subtree only holds items below its parent.
                current = if node.item >= *low {
                    node.left.as_deref()
                } else {
                    None
                };
            }
            let Some(node) = stack.pop() else {
                break;
            };
            if node.item > *high {
                break;
            }
            if node.item >= *low {
                found.push(&node.item);
            }
            current = node.right.as_deref();
        }
        found
    }

    /// The smallest item strictly greater than `item`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::linked::Tree;
    ///
    /// let tree: Tree<i32> = [20, 10, 30].into_iter().collect();
    ///
    /// assert_eq!(tree.successor(&10), Some(&20));
    /// assert_eq!(tree.successor(&15), Some(&20));
    /// assert_eq!(tree.successor(&30), None);
    /// ```
    pub fn successor(&self, item: &T) -> Option<&T> {
        let mut best = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if node.item > *item {
                best = Some(&node.item);
                current = node.left.as_deref();
            } else {
                current = node.right.as_deref();
            }
        }
        best
    }

    /// The largest item strictly less than `item`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::linked::Tree;
    ///
    /// let tree: Tree<i32> = [20, 10, 30].into_iter().collect();
    ///
    /// assert_eq!(tree.predecessor(&30), Some(&20));
    /// assert_eq!(tree.predecessor(&25), Some(&20));
    /// assert_eq!(tree.predecessor(&10), None);
    /// ```
    pub fn predecessor(&self, item: &T) -> Option<&T> {
        let mut best = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if node.item < *item {
                best = Some(&node.item);
                current = node.right.as_deref();
            } else {
                current = node.left.as_deref();
            }
        }
        best
    }

    /// Rebuilds the tree from its own items so that every subtree is split as evenly as
    /// possible. With distinct items the resulting height is `ceil(log2(len + 1)) - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::linked::Tree;
    ///
    /// let mut tree: Tree<i32> = (1..=7).collect();
    /// assert_eq!(tree.height(), 6);
    /// assert!(!tree.is_balanced());
    ///
    /// assert_eq!(tree.rebalance().height(), 2);
    /// assert!(tree.is_balanced());
    /// ```
    pub fn rebalance(&mut self) -> &mut Self {
        let height_before = self.height();
        let mut items: Vec<_> = self.drain_sorted().into_iter().map(Some).collect();
        self.insert_medians(&mut items);
        debug!(
            len = self.len,
            height_before,
            height_after = self.height(),
            "rebalanced tree"
        );
        self
    }

    /// Inserts the middle of `items`, then the middles of the halves on either side of it.
    fn insert_medians(&mut self, items: &mut [Option<T>]) {
        if items.is_empty() {
            return;
        }
        let mid = items.len() / 2;
        let (below, rest) = items.split_at_mut(mid);
        if let Some(item) = rest[0].take() {
            self.insert(item);
        }
        self.insert_medians(below);
        self.insert_medians(&mut rest[1..]);
    }
}

/// Releases a subtree node by node so deep trees can't overflow the stack.
fn dismantle<T>(link: Link<T>) {
    let mut stack: Vec<_> = link.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

struct Node<T> {
    item: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn new_boxed(item: T) -> Box<Self> {
        Box::new(Node {
            item,
            left: None,
            right: None,
        })
    }

    /// Detaches the largest node of the subtree rooted at `top`. Returns its item and what is
    /// left of the subtree. The largest node has no right child, so its left subtree takes its
    /// place.
    fn split_max(mut top: Box<Self>) -> (T, Link<T>) {
        let mut slot = &mut top.right;
        while slot.as_deref().map_or(false, |node| node.right.is_some()) {
            if let Some(node) = slot {
                slot = &mut node.right;
            }
        }
        match slot.take() {
            Some(max) => {
                let Node { item, left, .. } = *max;
                *slot = left;
                (item, Some(top))
            }
            None => {
                let Node { item, left, .. } = *top;
                (item, left)
            }
        }
    }
}

/// Iterator returned by [`Tree::iter`] and [`Tree::preorder`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right goes on first so the left subtree comes out first.
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        Some(&node.item)
    }
}

/// Iterator returned by [`Tree::inorder`].
pub struct Inorder<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Inorder<'a, T> {
    fn push_left_spine(&mut self, mut current: Option<&'a Node<T>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Inorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.item)
    }
}

/// Iterator returned by [`Tree::levelorder`].
pub struct Levelorder<'a, T> {
    queue: VecDeque<&'a Node<T>>,
}

impl<'a, T> Iterator for Levelorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left.as_deref());
        self.queue.extend(node.right.as_deref());
        Some(&node.item)
    }
}
