// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item tree model: caller-supplied entries, validated once into an immutable arena.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::MenuError;

/// A caller-supplied menu entry.
///
/// Entries are ingested by [`MenuTree::build`], which resolves each one into a
/// [`NodeKind`] exactly once. Sections are accepted here only so that they can be
/// rejected with a proper error.
#[derive(Clone, Debug)]
pub enum MenuEntry<K, T> {
    /// A selectable item. A non-empty `children` list turns it into a submenu trigger.
    Item {
        /// Key, unique across the tree and stable across rebuilds.
        key: K,
        /// Display payload, opaque to this crate.
        label: T,
        /// Nested entries, in display order.
        children: Vec<Self>,
    },
    /// A grouped sub-list with a non-selectable header. Unsupported.
    Section {
        /// Key of the section.
        key: K,
        /// Optional header payload.
        title: Option<T>,
        /// Grouped entries.
        items: Vec<Self>,
    },
}

impl<K, T> MenuEntry<K, T> {
    /// A leaf item.
    pub fn item(key: K, label: T) -> Self {
        Self::Item {
            key,
            label,
            children: Vec::new(),
        }
    }

    /// An item that opens a nested menu.
    pub fn submenu(key: K, label: T, children: impl IntoIterator<Item = Self>) -> Self {
        Self::Item {
            key,
            label,
            children: children.into_iter().collect(),
        }
    }

    /// A section. [`MenuTree::build`] rejects these.
    pub fn section(key: K, title: Option<T>, items: impl IntoIterator<Item = Self>) -> Self {
        Self::Section {
            key,
            title,
            items: items.into_iter().collect(),
        }
    }

    /// The entry's key.
    pub fn key(&self) -> &K {
        match self {
            Self::Item { key, .. } | Self::Section { key, .. } => key,
        }
    }
}

/// Kind of an ingested node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// No children. Activating it runs the action callback.
    Leaf,
    /// Has children. Activating it toggles its submenu.
    Branch,
}

#[derive(Clone, Debug)]
struct Node<K, T> {
    key: K,
    label: T,
    kind: NodeKind,
    parent: Option<usize>,
    children: SmallVec<[usize; 8]>,
    depth: usize,
    disabled: bool,
}

/// Validated, immutable menu hierarchy.
///
/// Nodes live in a flat arena and are addressed by key. Structure never changes after
/// [`MenuTree::build`]; only disabled flags can be re-derived with
/// [`MenuTree::set_disabled_keys`].
///
/// Lookups with a key that is not in the tree return `None`, `false` or an empty
/// iterator rather than panicking, since stale keys can legitimately arrive from the
/// host after a rebuild.
#[derive(Clone, Debug)]
pub struct MenuTree<K, T> {
    nodes: Vec<Node<K, T>>,
    roots: SmallVec<[usize; 8]>,
    index: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash, T> MenuTree<K, T> {
    /// Validate and ingest a list of top-level entries.
    ///
    /// Fails with [`MenuError::SectionUnsupported`] if a section appears anywhere in the
    /// hierarchy, and with [`MenuError::DuplicateKey`] if a key repeats. Nothing is
    /// retained on failure.
    pub fn build(entries: impl IntoIterator<Item = MenuEntry<K, T>>) -> Result<Self, MenuError<K>> {
        let mut tree = Self {
            nodes: Vec::new(),
            roots: SmallVec::new(),
            index: HashMap::new(),
        };

        // Entries are ingested depth-first with an explicit stack, so nesting depth is
        // bounded only by memory. Each entry carries its parent slot and depth.
        let mut stack: Vec<(MenuEntry<K, T>, Option<usize>, usize)> =
            entries.into_iter().map(|entry| (entry, None, 0)).collect();
        stack.reverse();

        while let Some((entry, parent, depth)) = stack.pop() {
            let (key, label, children) = match entry {
                MenuEntry::Item {
                    key,
                    label,
                    children,
                } => (key, label, children),
                MenuEntry::Section { key, .. } => return Err(MenuError::SectionUnsupported { key }),
            };
            if tree.index.contains_key(&key) {
                return Err(MenuError::DuplicateKey { key });
            }
            let idx = tree.nodes.len();
            let kind = if children.is_empty() {
                NodeKind::Leaf
            } else {
                NodeKind::Branch
            };
            tree.nodes.push(Node {
                key,
                label,
                kind,
                parent,
                children: SmallVec::new(),
                depth,
                disabled: false,
            });
            tree.index.insert(key, idx);
            match parent {
                Some(p) => tree.nodes[p].children.push(idx),
                None => tree.roots.push(idx),
            }

            // Reversed so that children pop, and are linked, in display order.
            for child in children.into_iter().rev() {
                stack.push((child, Some(idx), depth + 1));
            }
        }
        Ok(tree)
    }

    /// Builder form of [`MenuTree::set_disabled_keys`].
    #[must_use]
    pub fn with_disabled_keys(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.set_disabled_keys(keys);
        self
    }

    /// Replace the disabled set. Keys not in the tree are ignored.
    pub fn set_disabled_keys(&mut self, keys: impl IntoIterator<Item = K>) {
        for node in &mut self.nodes {
            node.disabled = false;
        }
        for key in keys {
            if let Some(&idx) = self.index.get(&key) {
                self.nodes[idx].disabled = true;
            }
        }
    }

    /// Number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `key` names a node.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn node(&self, key: &K) -> Option<&Node<K, T>> {
        self.index.get(key).map(|&idx| &self.nodes[idx])
    }

    /// Kind of the node, or `None` for an unknown key.
    pub fn kind(&self, key: &K) -> Option<NodeKind> {
        self.node(key).map(|n| n.kind)
    }

    /// Whether `key` is a known branch.
    pub fn is_branch(&self, key: &K) -> bool {
        self.kind(key) == Some(NodeKind::Branch)
    }

    /// Whether `key` is a known leaf.
    pub fn is_leaf(&self, key: &K) -> bool {
        self.kind(key) == Some(NodeKind::Leaf)
    }

    /// Whether `key` is in the disabled set.
    pub fn is_disabled(&self, key: &K) -> bool {
        self.node(key).is_some_and(|n| n.disabled)
    }

    /// Display payload of the node.
    pub fn label(&self, key: &K) -> Option<&T> {
        self.node(key).map(|n| &n.label)
    }

    /// Parent key, or `None` for top-level and unknown keys.
    pub fn parent_of(&self, key: &K) -> Option<K> {
        self.node(key)?.parent.map(|p| self.nodes[p].key)
    }

    /// Nesting depth; top-level items are at depth 0.
    pub fn depth_of(&self, key: &K) -> Option<usize> {
        self.node(key).map(|n| n.depth)
    }

    fn child_slice(&self, parent: Option<K>) -> &[usize] {
        match parent {
            None => &self.roots,
            Some(key) => self.node(&key).map_or(&[][..], |n| n.children.as_slice()),
        }
    }

    /// Children of `parent` in display order; `None` yields the top-level items.
    pub fn children(&self, parent: Option<K>) -> impl Iterator<Item = K> + '_ {
        self.child_slice(parent).iter().map(|&i| self.nodes[i].key)
    }

    /// Number of children of `parent`; `None` counts the top-level items.
    pub fn child_count(&self, parent: Option<K>) -> usize {
        self.child_slice(parent).len()
    }

    /// First child of `parent`.
    pub fn first_child(&self, parent: Option<K>) -> Option<K> {
        self.child_slice(parent).first().map(|&i| self.nodes[i].key)
    }

    /// Last child of `parent`.
    pub fn last_child(&self, parent: Option<K>) -> Option<K> {
        self.child_slice(parent).last().map(|&i| self.nodes[i].key)
    }

    /// Child of `parent` at `position`.
    pub fn child_at(&self, parent: Option<K>, position: usize) -> Option<K> {
        self.child_slice(parent)
            .get(position)
            .map(|&i| self.nodes[i].key)
    }

    /// Position of `key` among its siblings.
    pub fn position_of(&self, key: &K) -> Option<usize> {
        let &idx = self.index.get(key)?;
        let parent = self.nodes[idx].parent.map(|p| self.nodes[p].key);
        self.child_slice(parent).iter().position(|&i| i == idx)
    }

    /// Ancestors of `key`, nearest first. Excludes `key` itself.
    pub fn ancestors(&self, key: K) -> impl Iterator<Item = K> + '_ {
        let mut cursor = self.node(&key).and_then(|n| n.parent);
        core::iter::from_fn(move || {
            let idx = cursor?;
            cursor = self.nodes[idx].parent;
            Some(self.nodes[idx].key)
        })
    }

    /// Whether `ancestor` is `key` or lies on the path from the root to `key`.
    pub fn is_ancestor_or_self(&self, ancestor: &K, key: &K) -> bool {
        self.contains(key) && (ancestor == key || self.ancestors(*key).any(|a| a == *ancestor))
    }
}
