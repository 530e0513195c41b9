// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors raised while ingesting a menu.

use thiserror::Error;

/// A menu description that cannot be turned into a [`MenuTree`](crate::MenuTree).
///
/// These are hard failures: they surface before any menu state exists. Stale references
/// at interaction time (a key that is no longer in the tree, an event for a closed
/// level) are not errors; they are absorbed as no-ops.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MenuError<K> {
    /// A grouped sub-list with a non-selectable header was supplied.
    #[error("menu sections are not supported (section {key:?})")]
    SectionUnsupported {
        /// Key of the offending section.
        key: K,
    },
    /// Two entries share a key. Keys must be unique across the whole tree.
    #[error("menu key {key:?} is used more than once")]
    DuplicateKey {
        /// The repeated key.
        key: K,
    },
}
