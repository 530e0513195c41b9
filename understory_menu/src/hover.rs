// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking with optional intent delay.
//!
//! [`HoverState`] records which item the pointer is over and decides when that hover
//! should take effect. With no delay, entering an item takes effect immediately. With a
//! delay, entering records a pending hover that only fires from [`HoverState::poll`]
//! once its deadline passes and the pointer is still over the same item.
//!
//! A pending hover never outlives a later event: entering another item replaces it,
//! leaving the item drops it, and [`HoverState::cancel`] discards it outright. There is
//! no queued replay.
//!
//! ```
//! use understory_menu::hover::{HoverResult, HoverState};
//!
//! let mut hover: HoverState<u32> = HoverState::with_delay(150);
//!
//! assert_eq!(hover.on_enter(7, false, 1_000), HoverResult::Pending(7));
//! assert_eq!(hover.poll(1_100), None); // too early
//! assert_eq!(hover.poll(1_150), Some(7)); // deadline reached
//! assert_eq!(hover.poll(1_200), None); // fires once
//!
//! // Disabled items never take hover.
//! assert_eq!(hover.on_enter(8, true, 2_000), HoverResult::Suppressed);
//! assert!(hover.hovered().is_none());
//! ```

/// A hover waiting for its intent delay to elapse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingHover<K> {
    /// Item the pointer entered.
    pub target: K,
    /// Timestamp (milliseconds) at which the hover takes effect.
    pub deadline: u64,
}

/// Result of [`HoverState::on_enter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoverResult<K> {
    /// The hover takes effect now.
    Enter(K),
    /// The hover will take effect from [`HoverState::poll`] after the delay.
    Pending(K),
    /// The item is disabled; nothing is hovered.
    Suppressed,
}

/// Pointer hover state for one menu tree.
#[derive(Clone, Debug)]
pub struct HoverState<K> {
    hovered: Option<K>,
    pending: Option<PendingHover<K>>,
    /// Intent delay in milliseconds. Zero applies hovers immediately.
    pub delay: u64,
}

impl<K: Copy + PartialEq> HoverState<K> {
    /// Hover state with no intent delay.
    pub fn new() -> Self {
        Self::with_delay(0)
    }

    /// Hover state with an intent delay in milliseconds.
    pub fn with_delay(delay: u64) -> Self {
        Self {
            hovered: None,
            pending: None,
            delay,
        }
    }

    /// Record the pointer entering `target` at `timestamp`.
    ///
    /// Any pending hover for a different item is cancelled. Disabled targets clear the
    /// hovered item and are suppressed.
    pub fn on_enter(&mut self, target: K, disabled: bool, timestamp: u64) -> HoverResult<K> {
        self.pending = None;
        if disabled {
            self.hovered = None;
            return HoverResult::Suppressed;
        }
        self.hovered = Some(target);
        if self.delay == 0 {
            HoverResult::Enter(target)
        } else {
            self.pending = Some(PendingHover {
                target,
                deadline: timestamp.saturating_add(self.delay),
            });
            HoverResult::Pending(target)
        }
    }

    /// Record the pointer leaving `target`.
    ///
    /// Returns `true` if `target` was the hovered item.
    pub fn on_leave(&mut self, target: &K) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.target == *target) {
            self.pending = None;
        }
        if self.hovered.as_ref() == Some(target) {
            self.hovered = None;
            true
        } else {
            false
        }
    }

    /// Fire the pending hover if its deadline has passed.
    ///
    /// Returns the target at most once per pending hover.
    pub fn poll(&mut self, now: u64) -> Option<K> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        (self.hovered == Some(pending.target)).then_some(pending.target)
    }

    /// Drop the pending hover, if any, keeping the hovered item.
    ///
    /// Returns `true` if something was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.hovered = None;
        self.pending = None;
    }

    /// The item under the pointer, if it is enabled.
    pub fn hovered(&self) -> Option<&K> {
        self.hovered.as_ref()
    }

    /// Whether `target` is the hovered item.
    pub fn is_hovered(&self, target: &K) -> bool {
        self.hovered.as_ref() == Some(target)
    }

    /// The hover waiting on its delay, if any.
    pub fn pending(&self) -> Option<&PendingHover<K>> {
        self.pending.as_ref()
    }
}

impl<K: Copy + PartialEq> Default for HoverState<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_hover_enters() {
        let mut state: HoverState<u32> = HoverState::new();
        assert_eq!(state.on_enter(1, false, 0), HoverResult::Enter(1));
        assert!(state.is_hovered(&1));
        assert!(state.pending().is_none());
    }

    #[test]
    fn later_enter_replaces_pending() {
        let mut state: HoverState<u32> = HoverState::with_delay(100);
        state.on_enter(1, false, 0);
        state.on_enter(2, false, 50);

        // The first deadline (100) passes, but only item 2 is pending, due at 150.
        assert_eq!(state.poll(120), None);
        assert_eq!(state.poll(150), Some(2));
    }

    #[test]
    fn leaving_drops_pending() {
        let mut state: HoverState<u32> = HoverState::with_delay(100);
        state.on_enter(1, false, 0);
        assert!(state.on_leave(&1));
        assert_eq!(state.poll(500), None);
        assert!(state.hovered().is_none());
    }

    #[test]
    fn leaving_other_item_keeps_hover() {
        let mut state: HoverState<u32> = HoverState::with_delay(100);
        state.on_enter(1, false, 0);
        assert!(!state.on_leave(&9));
        assert_eq!(state.poll(100), Some(1));
    }

    #[test]
    fn cancel_keeps_hovered_item() {
        let mut state: HoverState<u32> = HoverState::with_delay(100);
        state.on_enter(1, false, 0);
        assert!(state.cancel());
        assert!(!state.cancel());
        assert!(state.is_hovered(&1));
        assert_eq!(state.poll(1_000), None);
    }

    #[test]
    fn disabled_enter_cancels_previous_pending() {
        let mut state: HoverState<u32> = HoverState::with_delay(100);
        state.on_enter(1, false, 0);
        assert_eq!(state.on_enter(2, true, 10), HoverResult::Suppressed);
        assert_eq!(state.poll(1_000), None);
        assert!(state.hovered().is_none());
    }

    #[test]
    fn deadline_saturates() {
        let mut state: HoverState<u32> = HoverState::with_delay(10);
        assert_eq!(state.on_enter(1, false, u64::MAX), HoverResult::Pending(1));
        assert_eq!(state.pending().unwrap().deadline, u64::MAX);
        assert_eq!(state.poll(u64::MAX), Some(1));
    }
}
