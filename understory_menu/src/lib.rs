// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Menu: a headless controller for cascading pop-up menus.
//!
//! This crate owns the state of a trigger and its tree of nested menus, and nothing
//! else. Painting, hit testing and focus rings stay with the host:
//!
//! - [`MenuTree`] is the validated item hierarchy. Sections are rejected with a
//!   [`MenuError`] when the tree is built, before any state exists.
//! - [`ExpansionState`] records which branches show their submenu. Within one parent
//!   at most one child is expanded, and collapsing a node collapses its descendants.
//! - [`InteractionResolver`] turns hover, key and press events into expansion changes,
//!   focus moves and activations in a single pass per event.
//! - [`MenuController`] ties these to the open/closed state, hands each open level a
//!   keyboard [`Subscription`], and positions panels through
//!   [`understory_placement`]'s two-phase protocol.
//!
//! The host feeds [`MenuEvent`]s to [`MenuController::handle`] and acts on the returned
//! [`MenuEffect`]s: mount or unmount panels, move platform focus, run actions.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_menu::{
//!     CloseReason, KeyCode, Level, MenuConfig, MenuController, MenuEffect, MenuEntry, MenuEvent,
//! };
//!
//! let mut menu = MenuController::new(
//!     [
//!         MenuEntry::item("copy", "Copy"),
//!         MenuEntry::submenu(
//!             "move",
//!             "Move",
//!             [
//!                 MenuEntry::item("move-to-shared", "Shared"),
//!                 MenuEntry::item("move-to-desktop", "Desktop"),
//!             ],
//!         ),
//!         MenuEntry::item("delete", "Delete"),
//!     ],
//!     MenuConfig::default(),
//! )?;
//!
//! // Opening from the keyboard focuses the first item and shows the focus ring.
//! menu.handle(MenuEvent::TriggerKey(KeyCode::ArrowDown));
//! assert_eq!(menu.focused(), Some("copy"));
//! assert!(menu.is_focus_visible());
//!
//! // Walk down to the branch and open it.
//! menu.handle(MenuEvent::KeyDown(KeyCode::ArrowDown));
//! let effects = menu.handle(MenuEvent::KeyDown(KeyCode::ArrowRight));
//! assert!(effects.iter().any(|e| matches!(
//!     e,
//!     MenuEffect::LevelOpened { level: Level::Submenu("move"), .. }
//! )));
//! assert_eq!(menu.focused(), Some("move-to-shared"));
//!
//! // Activating a nested leaf reports the action and closes the whole tree.
//! let effects = menu.handle(MenuEvent::KeyDown(KeyCode::Enter));
//! assert!(effects.contains(&MenuEffect::Action("move-to-shared")));
//! assert_eq!(effects.last(), Some(&MenuEffect::Closed(CloseReason::Activated)));
//! assert!(!menu.is_open());
//! # Ok::<(), understory_menu::MenuError<&str>>(())
//! ```
//!
//! ## Placement
//!
//! Every [`MenuEffect::LevelOpened`] carries a [`RecomputeToken`]. Pass it to
//! [`MenuController::place`] right away for a provisional placement (keep the panel
//! hidden), then again once the panel has been laid out and can report its size. Tokens
//! go stale when their level closes, so a late layout callback for a panel that is gone
//! is ignored.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo` and `tracing`.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point math.
//! - `tracing`: emits `tracing` events for level transitions and dropped input.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
mod error;
mod expansion;
pub mod hover;
mod resolver;
mod scope;
mod tree;
mod types;

pub use controller::{Measure, MenuConfig, MenuController};
pub use error::MenuError;
pub use expansion::{ExpansionState, Toggle};
pub use resolver::InteractionResolver;
pub use scope::{KeyboardScopes, Subscription};
pub use tree::{MenuEntry, MenuTree, NodeKind};
pub use types::{
    CloseReason, Effects, FocusStrategy, ItemState, KeyCode, Level, MenuEffect, MenuEvent,
    Modality, TriggerProps,
};

pub use understory_placement::{Placement, PlacementOptions, RecomputeToken, Side};
