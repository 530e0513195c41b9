// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction resolver: turns item-level input into expansion and focus changes.
//!
//! Each event is handled in a single pass: the next expansion state is computed from
//! the current state and the event, and the resulting focus moves and activations are
//! appended to an effect list. Nothing observes its own writes, so there are no
//! feedback loops between "pointer is over X" and "X is expanded".
//!
//! ## Rules
//!
//! - **Hover**: entering an enabled branch expands it (closing any open sibling);
//!   entering an enabled leaf collapses whichever sibling subtree is open. Focus follows
//!   the pointer without a visible focus ring.
//! - **Keyboard**: `ArrowRight` on the focused branch expands it and moves into its
//!   first child. `ArrowLeft` inside a submenu collapses it and returns focus to the
//!   item that owns it. `ArrowDown`/`ArrowUp`/`Home`/`End` move within the level and
//!   close any sibling subtree left open behind them. `Enter`/`Space` activate.
//!   `Escape` and `Tab` close the whole menu.
//! - **Activation**: a leaf reports [`MenuEffect::Action`] and requests a full close; a
//!   branch toggles instead.
//! - **Disabled** items can be focused by keyboard traversal but never expand, take
//!   hover, or activate.
//! - **Ordering**: later events win. Any key press or press cancels a delayed hover
//!   still in flight, as does focus moving to another item.

use core::fmt::Debug;
use core::hash::Hash;

use crate::expansion::ExpansionState;
use crate::hover::{HoverResult, HoverState};
use crate::tree::MenuTree;
use crate::types::{CloseReason, Effects, FocusStrategy, KeyCode, MenuEffect, MenuEvent, Modality};

/// Focus, hover and modality for one menu tree, plus the rules that act on them.
#[derive(Clone, Debug)]
pub struct InteractionResolver<K> {
    hover: HoverState<K>,
    focused: Option<K>,
    modality: Modality,
    wrap_focus: bool,
}

impl<K: Copy + Eq + Hash + Debug> InteractionResolver<K> {
    /// A resolver with the given hover intent delay (milliseconds) and wrap behavior.
    pub fn new(hover_delay: u64, wrap_focus: bool) -> Self {
        Self {
            hover: HoverState::with_delay(hover_delay),
            focused: None,
            modality: Modality::Pointer,
            wrap_focus,
        }
    }

    /// Change the hover intent delay. A hover already pending keeps its deadline.
    pub fn set_hover_delay(&mut self, delay: u64) {
        self.hover.delay = delay;
    }

    /// Enable or disable wrapping traversal.
    pub fn set_wrap_focus(&mut self, wrap: bool) {
        self.wrap_focus = wrap;
    }

    /// Forget focus, hover and any pending hover.
    pub fn reset(&mut self) {
        self.hover.clear();
        self.focused = None;
        self.modality = Modality::Pointer;
    }

    /// The focused item.
    pub fn focused(&self) -> Option<K> {
        self.focused
    }

    /// Whether the focused item should show a focus ring.
    pub fn is_focus_visible(&self) -> bool {
        self.focused.is_some() && self.modality == Modality::Keyboard
    }

    /// Input source that last drove the menu.
    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// Hover tracking state.
    pub fn hover(&self) -> &HoverState<K> {
        &self.hover
    }

    /// Drop a delayed hover that has not fired yet. Returns `true` if one was pending.
    pub fn cancel_hover(&mut self) -> bool {
        self.hover.cancel()
    }

    /// Place initial focus on the top level after the menu opens.
    pub fn focus_initial<T>(
        &mut self,
        tree: &MenuTree<K, T>,
        strategy: FocusStrategy,
        modality: Modality,
        effects: &mut Effects<K>,
    ) {
        self.modality = modality;
        let target = match strategy {
            FocusStrategy::First => tree.first_child(None),
            FocusStrategy::Last => tree.last_child(None),
        };
        if let Some(key) = target {
            self.set_focus(key, effects);
        }
    }

    /// Apply one item-level event.
    ///
    /// Trigger and outside events are not item-level and are ignored here. Returns the
    /// reason the whole menu should close, if the event requires it.
    pub fn resolve<T>(
        &mut self,
        tree: &MenuTree<K, T>,
        expansion: &mut ExpansionState<K>,
        event: MenuEvent<K>,
        effects: &mut Effects<K>,
    ) -> Option<CloseReason> {
        match event {
            MenuEvent::PointerEnter { key, time } => {
                self.pointer_enter(tree, expansion, key, time, effects);
                None
            }
            MenuEvent::PointerLeave { key } => {
                self.hover.on_leave(&key);
                None
            }
            MenuEvent::Press(key) => {
                self.modality = Modality::Pointer;
                self.hover.cancel();
                self.activate(tree, expansion, key, effects)
            }
            MenuEvent::KeyDown(code) => self.key_down(tree, expansion, code, effects),
            MenuEvent::Focus(key) => {
                if tree.contains(&key) {
                    if self.hover.pending().is_some_and(|p| p.target != key) {
                        self.hover.cancel();
                    }
                    self.focused = Some(key);
                }
                None
            }
            MenuEvent::Tick(now) => {
                if let Some(key) = self.hover.poll(now)
                    && tree.contains(&key)
                    && !tree.is_disabled(&key)
                {
                    apply_hover(tree, expansion, key);
                }
                None
            }
            MenuEvent::TriggerPress
            | MenuEvent::TriggerKey(_)
            | MenuEvent::OutsideInteraction => None,
        }
    }

    /// Move focus out of any level that is no longer open, onto the item that owned it.
    pub fn reconcile_focus<T>(
        &mut self,
        tree: &MenuTree<K, T>,
        expansion: &ExpansionState<K>,
        effects: &mut Effects<K>,
    ) {
        let Some(focused) = self.focused else {
            return;
        };
        if !tree.contains(&focused) {
            self.focused = None;
            return;
        }
        let mut target = focused;
        while let Some(parent) = tree.parent_of(&target) {
            if expansion.is_expanded(&parent) {
                break;
            }
            target = parent;
        }
        self.set_focus(target, effects);
    }

    fn set_focus(&mut self, key: K, effects: &mut Effects<K>) {
        if self.focused != Some(key) {
            self.focused = Some(key);
            effects.push(MenuEffect::Focus(key));
        }
    }

    fn pointer_enter<T>(
        &mut self,
        tree: &MenuTree<K, T>,
        expansion: &mut ExpansionState<K>,
        key: K,
        time: u64,
        effects: &mut Effects<K>,
    ) {
        if !tree.contains(&key) {
            #[cfg(feature = "tracing")]
            tracing::trace!(?key, "pointer entered unknown item");
            return;
        }
        let disabled = tree.is_disabled(&key);
        match self.hover.on_enter(key, disabled, time) {
            HoverResult::Suppressed => {}
            HoverResult::Enter(key) => {
                self.modality = Modality::Pointer;
                self.set_focus(key, effects);
                apply_hover(tree, expansion, key);
            }
            HoverResult::Pending(key) => {
                self.modality = Modality::Pointer;
                self.set_focus(key, effects);
            }
        }
    }

    fn activate<T>(
        &mut self,
        tree: &MenuTree<K, T>,
        expansion: &mut ExpansionState<K>,
        key: K,
        effects: &mut Effects<K>,
    ) -> Option<CloseReason> {
        if !tree.contains(&key) || tree.is_disabled(&key) {
            #[cfg(feature = "tracing")]
            tracing::trace!(?key, "activation ignored");
            return None;
        }
        self.set_focus(key, effects);
        if tree.is_branch(&key) {
            expansion.toggle(tree, key);
            None
        } else {
            effects.push(MenuEffect::Action(key));
            Some(CloseReason::Activated)
        }
    }

    fn key_down<T>(
        &mut self,
        tree: &MenuTree<K, T>,
        expansion: &mut ExpansionState<K>,
        code: KeyCode,
        effects: &mut Effects<K>,
    ) -> Option<CloseReason> {
        self.modality = Modality::Keyboard;
        self.hover.cancel();

        match code {
            KeyCode::Escape => return Some(CloseReason::Escape),
            KeyCode::Tab => return Some(CloseReason::Tab),
            _ => {}
        }

        let Some(focused) = self.focused.filter(|k| tree.contains(k)) else {
            let target = match code {
                KeyCode::ArrowDown | KeyCode::Home => tree.first_child(None),
                KeyCode::ArrowUp | KeyCode::End => tree.last_child(None),
                _ => None,
            };
            if let Some(key) = target {
                self.set_focus(key, effects);
            }
            return None;
        };

        match code {
            KeyCode::ArrowDown | KeyCode::ArrowUp | KeyCode::Home | KeyCode::End => {
                if let Some(target) = self.step(tree, focused, code) {
                    self.set_focus(target, effects);
                    if let Some(open) = expansion.expanded_child(tree, tree.parent_of(&target))
                        && open != target
                    {
                        expansion.collapse(tree, open);
                    }
                }
                None
            }
            KeyCode::ArrowRight => {
                if tree.is_branch(&focused) && !tree.is_disabled(&focused) {
                    expansion.expand(tree, focused);
                    if let Some(child) = tree.first_child(Some(focused)) {
                        self.set_focus(child, effects);
                    }
                }
                None
            }
            KeyCode::ArrowLeft => {
                match tree.parent_of(&focused) {
                    Some(parent) if expansion.is_expanded(&parent) => {
                        expansion.collapse(tree, parent);
                        self.set_focus(parent, effects);
                    }
                    None => {
                        expansion.collapse(tree, focused);
                    }
                    Some(_) => {}
                }
                None
            }
            KeyCode::Enter | KeyCode::Space => self.activate(tree, expansion, focused, effects),
            KeyCode::Escape | KeyCode::Tab => None,
        }
    }

    /// Sibling that `code` moves to from `from`. Disabled siblings are valid targets.
    fn step<T>(&self, tree: &MenuTree<K, T>, from: K, code: KeyCode) -> Option<K> {
        let parent = tree.parent_of(&from);
        let count = tree.child_count(parent);
        let pos = tree.position_of(&from)?;
        let last = count.checked_sub(1)?;
        let index = match code {
            KeyCode::Home => 0,
            KeyCode::End => last,
            KeyCode::ArrowDown if pos < last => pos + 1,
            KeyCode::ArrowDown if self.wrap_focus => 0,
            KeyCode::ArrowUp if pos > 0 => pos - 1,
            KeyCode::ArrowUp if self.wrap_focus => last,
            _ => return None,
        };
        tree.child_at(parent, index)
    }
}

/// Hover rule for an enabled item that the pointer has settled on.
fn apply_hover<K: Copy + Eq + Hash, T>(
    tree: &MenuTree<K, T>,
    expansion: &mut ExpansionState<K>,
    key: K,
) {
    if tree.is_branch(&key) {
        expansion.expand(tree, key);
    } else {
        expansion.collapse_under(tree, tree.parent_of(&key));
    }
}
