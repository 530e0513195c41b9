// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expansion state store: which branches currently show their submenu.
//!
//! The store keeps two invariants after every mutation:
//!
//! - **Sibling exclusivity**: within one parent's children, at most one key is expanded.
//! - **No orphans**: an expanded key's ancestors are all expanded. Collapsing a node
//!   collapses its descendants; expanding a node expands its ancestors.
//!
//! Together they mean the expanded set is always a single root-to-node chain, which
//! [`ExpansionState::expanded_path`] returns in order.

use core::hash::Hash;

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::tree::MenuTree;

/// Result of [`ExpansionState::toggle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Toggle {
    /// The key is now expanded.
    Expanded,
    /// The key and its descendants are now collapsed.
    Collapsed,
    /// Nothing changed: the key is a leaf or unknown.
    Ignored,
}

/// Set of expanded branch keys.
#[derive(Clone, Debug)]
pub struct ExpansionState<K> {
    expanded: HashSet<K>,
}

impl<K: Copy + Eq + Hash> Default for ExpansionState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> ExpansionState<K> {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            expanded: HashSet::new(),
        }
    }

    /// Whether `key` is expanded.
    pub fn is_expanded(&self, key: &K) -> bool {
        self.expanded.contains(key)
    }

    /// Number of expanded keys.
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// Whether nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Expanded keys in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.expanded.iter()
    }

    /// Flip `key`: collapse it (and its descendants) if expanded, otherwise expand it.
    ///
    /// Leaves and unknown keys are ignored.
    pub fn toggle<T>(&mut self, tree: &MenuTree<K, T>, key: K) -> Toggle {
        if !tree.is_branch(&key) {
            return Toggle::Ignored;
        }
        if self.collapse(tree, key) {
            Toggle::Collapsed
        } else {
            self.expand(tree, key);
            Toggle::Expanded
        }
    }

    /// Expand `key`, closing any expanded sibling subtree and opening its ancestors.
    ///
    /// Returns `false` if nothing changed (already expanded, leaf, or unknown key).
    pub fn expand<T>(&mut self, tree: &MenuTree<K, T>, key: K) -> bool {
        if !tree.is_branch(&key) || self.expanded.contains(&key) {
            return false;
        }
        let mut chain: SmallVec<[K; 4]> = tree.ancestors(key).collect();
        chain.reverse();
        chain.push(key);
        for k in chain {
            if self.expanded.contains(&k) {
                continue;
            }
            self.collapse_under(tree, tree.parent_of(&k));
            self.expanded.insert(k);
        }
        true
    }

    /// Collapse `key` and every expanded descendant.
    ///
    /// Returns `false` if `key` was not expanded.
    pub fn collapse<T>(&mut self, tree: &MenuTree<K, T>, key: K) -> bool {
        if !self.expanded.remove(&key) {
            return false;
        }
        self.expanded.retain(|k| !tree.is_ancestor_or_self(&key, k));
        true
    }

    /// Collapse whichever child of `parent` is expanded, with its descendants.
    ///
    /// `None` addresses the top level. Returns `true` if anything collapsed.
    pub fn collapse_under<T>(&mut self, tree: &MenuTree<K, T>, parent: Option<K>) -> bool {
        match self.expanded_child(tree, parent) {
            Some(child) => self.collapse(tree, child),
            None => false,
        }
    }

    /// Clear the set. Used when the whole menu closes.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// The expanded child of `parent`, if any; `None` addresses the top level.
    pub fn expanded_child<T>(&self, tree: &MenuTree<K, T>, parent: Option<K>) -> Option<K> {
        tree.children(parent).find(|k| self.expanded.contains(k))
    }

    /// Whether any descendant of `parent` is expanded; `None` asks about the whole tree.
    pub fn is_any_expanded_under<T>(&self, tree: &MenuTree<K, T>, parent: Option<K>) -> bool {
        match parent {
            None => !self.expanded.is_empty(),
            Some(p) => self.expanded_child(tree, Some(p)).is_some(),
        }
    }

    /// Expanded keys from the top level down.
    pub fn expanded_path<T>(&self, tree: &MenuTree<K, T>) -> SmallVec<[K; 4]> {
        let mut path = SmallVec::new();
        let mut parent = None;
        while let Some(child) = self.expanded_child(tree, parent) {
            path.push(child);
            parent = Some(child);
        }
        path
    }

    /// Drop keys that can no longer be expanded: unknown, leaf, or disabled.
    ///
    /// Descendants of a dropped key are dropped with it. Returns `true` if anything changed.
    pub fn retain_expandable<T>(&mut self, tree: &MenuTree<K, T>) -> bool {
        let mut changed = false;
        for key in self.expanded_path(tree) {
            if tree.is_disabled(&key) {
                changed |= self.collapse(tree, key);
                break;
            }
        }
        let before = self.expanded.len();
        self.expanded.retain(|k| tree.is_branch(k));
        changed || before != self.expanded.len()
    }
}
