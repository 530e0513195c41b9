// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public vocabulary shared by the resolver and the controller: levels, input events,
//! effects, and per-item render state.

use smallvec::SmallVec;
use understory_placement::RecomputeToken;

/// One rendered panel of the menu tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Level<K> {
    /// The top-level panel attached to the trigger.
    Root,
    /// The submenu owned by this branch item.
    Submenu(K),
}

impl<K: Copy> Level<K> {
    /// The level whose items are the children of `parent` (`None` for the top level).
    pub fn of_parent(parent: Option<K>) -> Self {
        match parent {
            None => Self::Root,
            Some(key) => Self::Submenu(key),
        }
    }

    /// Key of the branch that owns this level, or `None` for the root.
    pub fn parent_key(&self) -> Option<K> {
        match self {
            Self::Root => None,
            Self::Submenu(key) => Some(*key),
        }
    }
}

/// Keys the menu reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Next item in the level.
    ArrowDown,
    /// Previous item in the level.
    ArrowUp,
    /// Open the focused submenu and move into it.
    ArrowRight,
    /// Close the current submenu and return to its trigger item.
    ArrowLeft,
    /// First item in the level.
    Home,
    /// Last item in the level.
    End,
    /// Activate the focused item.
    Enter,
    /// Activate the focused item.
    Space,
    /// Close the whole menu.
    Escape,
    /// Close the whole menu.
    Tab,
}

/// Where focus lands when the menu opens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusStrategy {
    /// The first top-level item.
    First,
    /// The last top-level item.
    Last,
}

/// Which input source last drove the menu. Focus is only visible under `Keyboard`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modality {
    /// Pointer hover or press.
    Pointer,
    /// Key presses.
    Keyboard,
}

/// Why the menu closed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// [`MenuController::close`](crate::MenuController::close) or `toggle` was called.
    Programmatic,
    /// A leaf item was activated, at any depth.
    Activated,
    /// Escape was pressed.
    Escape,
    /// Tab moved focus out of the menu.
    Tab,
    /// The user interacted outside the menu, or it lost focus.
    Outside,
}

/// Raw input from the rendering collaborator.
///
/// Timestamps are milliseconds on any monotonic clock the host chooses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuEvent<K> {
    /// The trigger was clicked or tapped.
    TriggerPress,
    /// A key was pressed while the trigger had focus.
    TriggerKey(KeyCode),
    /// The pointer entered an item.
    PointerEnter {
        /// Item under the pointer.
        key: K,
        /// Event time.
        time: u64,
    },
    /// The pointer left an item.
    PointerLeave {
        /// Item the pointer left.
        key: K,
    },
    /// An item was pressed (clicked, tapped).
    Press(K),
    /// A key was pressed inside an open menu.
    KeyDown(KeyCode),
    /// The host moved focus to an item by other means.
    Focus(K),
    /// A pointer press landed outside every open panel, or focus left the menu.
    OutsideInteraction,
    /// Time advanced; used to fire delayed hovers.
    Tick(u64),
}

/// Something the host should act on after an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuEffect<K> {
    /// The menu went from closed to open.
    Opened,
    /// The menu closed; all levels are gone.
    Closed(CloseReason),
    /// A leaf was activated. Reported once per activation, before `Closed`.
    Action(K),
    /// Focus moved to this item; forward it to the focus-management collaborator.
    Focus(K),
    /// A panel should be mounted and positioned.
    ///
    /// Call [`MenuController::place`](crate::MenuController::place) with the token once
    /// to get a provisional placement, and again after the next layout pass.
    LevelOpened {
        /// The new panel.
        level: Level<K>,
        /// Token for this open cycle of the panel.
        token: RecomputeToken,
    },
    /// A panel should be unmounted. Its token is no longer valid.
    LevelClosed(Level<K>),
}

/// Effects produced by one event, in the order they happened.
pub type Effects<K> = SmallVec<[MenuEffect<K>; 4]>;

bitflags::bitflags! {
    /// Per-item state for the rendering collaborator.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemState: u8 {
        /// Item is disabled; it can hold focus but does nothing.
        const DISABLED      = 0b0000_0001;
        /// Item has focus.
        const FOCUSED       = 0b0000_0010;
        /// Item has focus and the focus ring should be drawn.
        const FOCUS_VISIBLE = 0b0000_0100;
        /// Pointer is over the item.
        const HOVERED       = 0b0000_1000;
        /// Item's submenu is open.
        const EXPANDED      = 0b0001_0000;
        /// Item opens a submenu.
        const HAS_SUBMENU   = 0b0010_0000;
    }
}

/// Accessibility-facing props for the trigger control.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TriggerProps {
    /// The trigger opens a menu.
    pub has_popup: bool,
    /// The menu is currently open.
    pub expanded: bool,
}
