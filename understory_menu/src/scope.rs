// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-level keyboard subscriptions.
//!
//! Every open level owns exactly one [`Subscription`]. Key input is only delivered to a
//! level that holds a live subscription, so once a level is disposed it can no longer
//! mutate menu state. Handles are generational: disposing twice, or disposing a handle
//! from a slot that has since been reused, is a no-op.

use alloc::vec::Vec;

use crate::types::Level;

/// Handle to a live keyboard subscription.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    slot: u32,
    generation: u32,
}

/// Registry of keyboard subscriptions, one per open level.
#[derive(Clone, Debug)]
pub struct KeyboardScopes<K> {
    slots: Vec<Option<Level<K>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    live: usize,
}

impl<K> Default for KeyboardScopes<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }
}

impl<K: Copy + Eq> KeyboardScopes<K> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `level` for key input.
    pub fn subscribe(&mut self, level: Level<K>) -> Subscription {
        let slot = if let Some(slot) = self.free_list.pop() {
            self.generations[slot] = self.generations[slot].wrapping_add(1);
            self.slots[slot] = Some(level);
            slot
        } else {
            self.slots.push(Some(level));
            self.generations.push(1);
            self.slots.len() - 1
        };
        self.live += 1;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "One slot per open level; never near u32::MAX."
        )]
        let index = slot as u32;
        Subscription {
            slot: index,
            generation: self.generations[slot],
        }
    }

    /// Release a subscription. Returns `false` for stale handles.
    pub fn dispose(&mut self, subscription: Subscription) -> bool {
        if !self.is_live(subscription) {
            return false;
        }
        let slot = subscription.slot as usize;
        self.slots[slot] = None;
        self.free_list.push(slot);
        self.live -= 1;
        true
    }

    /// Whether the handle still refers to a registered level.
    pub fn is_live(&self, subscription: Subscription) -> bool {
        let slot = subscription.slot as usize;
        self.generations.get(slot) == Some(&subscription.generation)
            && self.slots.get(slot).is_some_and(Option::is_some)
    }

    /// Level a live handle was registered for.
    pub fn level_of(&self, subscription: Subscription) -> Option<Level<K>> {
        if !self.is_live(subscription) {
            return None;
        }
        self.slots[subscription.slot as usize]
    }

    /// Whether key input addressed to `level` should be delivered.
    pub fn accepts(&self, level: &Level<K>) -> bool {
        self.slots.iter().flatten().any(|l| l == level)
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no level is subscribed.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}
