//! An ordered collection built on a plain Binary Search Tree (BST) with an
//! explicit, on-demand rebalance.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and remove stored items. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores one item and
//! will sometimes have child `Node`s. The invariants kept here are:
//!
//! 1. For every `Node` in the tree, all the `Node`s in its left subtree have an
//!    item less than its own item.
//! 2. For every `Node` in the tree, all the `Node`s in its right subtree have an
//!    item greater than or equal to its own item. Duplicates are allowed.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). This tree never rotates, so
//! sorted input makes it as tall as it is long. [`Tree::rebalance`] rebuilds
//! it by repeatedly picking medians, bringing the height back down to
//! `O(lg N)` where `N` is the number of items. BSTs also naturally support
//! sorted iteration by visiting the left subtree, then the subtree root, then
//! the right subtree.
//!
//! Nothing here is synchronized. Mutation goes through `&mut self`, so sharing a
//! tree between threads means wrapping it in a lock.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod linked;
mod util;

#[cfg(test)]
mod test;

pub use error::{Error, Result};
pub use linked::Tree;
