// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root trigger controller: the open/closed state of the whole menu tree.
//!
//! [`MenuController`] owns every piece of menu state and is the only thing a host talks
//! to. Input goes in through [`MenuController::handle`]; what the host must do in
//! response comes back as [`MenuEffect`]s. Open panels are derived from the expansion
//! state after every event. Each one holds a keyboard [`Subscription`] for exactly as
//! long as it is open. Its [`OverlayPosition`] outlives it, so a reopened panel gets a
//! fresh [`RecomputeToken`] and a size hint from its last layout.

use alloc::boxed::Box;
use core::fmt;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use smallvec::SmallVec;
use understory_placement::{OverlayPosition, Placement, PlacementOptions, RecomputeToken, Side};

use crate::error::MenuError;
use crate::expansion::ExpansionState;
use crate::resolver::InteractionResolver;
use crate::scope::{KeyboardScopes, Subscription};
use crate::tree::{MenuEntry, MenuTree};
use crate::types::{
    CloseReason, Effects, FocusStrategy, ItemState, KeyCode, Level, MenuEffect, MenuEvent,
    Modality, TriggerProps,
};

/// Geometry the host reports back to the controller.
///
/// All rectangles share one coordinate space, typically viewport pixels.
pub trait Measure<K> {
    /// Bounds panels must stay within.
    fn viewport(&self) -> Rect;
    /// Rectangle of the root trigger control.
    fn trigger_rect(&self) -> Rect;
    /// Rectangle of a mounted item, used to anchor its submenu.
    fn item_rect(&self, key: &K) -> Option<Rect>;
    /// Measured size of a mounted panel; `None` until it has been laid out once.
    fn panel_size(&self, level: &Level<K>) -> Option<Size>;
}

/// Behavior knobs for a [`MenuController`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MenuConfig {
    /// Placement of the top-level panel relative to the trigger.
    pub root_placement: PlacementOptions,
    /// Placement of each submenu relative to the item that owns it.
    pub submenu_placement: PlacementOptions,
    /// Hover intent delay in milliseconds; zero expands on enter.
    pub hover_delay: u64,
    /// Whether `ArrowDown`/`ArrowUp` wrap around at the ends of a level.
    pub wrap_focus: bool,
}

impl MenuConfig {
    /// Gap between a panel and its anchor used by the defaults, in pixels.
    pub const DEFAULT_OFFSET: f64 = 6.0;

    /// Set the top-level placement.
    #[must_use]
    pub fn root_placement(mut self, options: PlacementOptions) -> Self {
        self.root_placement = options;
        self
    }

    /// Set the submenu placement.
    #[must_use]
    pub fn submenu_placement(mut self, options: PlacementOptions) -> Self {
        self.submenu_placement = options;
        self
    }

    /// Set the hover intent delay in milliseconds.
    #[must_use]
    pub fn hover_delay(mut self, delay: u64) -> Self {
        self.hover_delay = delay;
        self
    }

    /// Enable or disable wrapping traversal.
    #[must_use]
    pub fn wrap_focus(mut self, wrap: bool) -> Self {
        self.wrap_focus = wrap;
        self
    }

    /// Placement options for the panel of `level`.
    pub fn placement_for<K>(&self, level: &Level<K>) -> PlacementOptions {
        match level {
            Level::Root => self.root_placement,
            Level::Submenu(_) => self.submenu_placement,
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            root_placement: PlacementOptions::new(Side::BOTTOM_START).offset(Self::DEFAULT_OFFSET),
            submenu_placement: PlacementOptions::new(Side::RIGHT_START)
                .offset(Self::DEFAULT_OFFSET),
            hover_delay: 0,
            wrap_focus: false,
        }
    }
}

#[derive(Clone, Debug)]
struct OpenLevel<K> {
    level: Level<K>,
    subscription: Subscription,
}

/// Headless controller for a trigger and its cascading menu.
///
/// See the [crate docs](crate) for an end-to-end example.
pub struct MenuController<K, T> {
    tree: MenuTree<K, T>,
    config: MenuConfig,
    expansion: ExpansionState<K>,
    resolver: InteractionResolver<K>,
    scopes: KeyboardScopes<K>,
    levels: SmallVec<[OpenLevel<K>; 4]>,
    positions: HashMap<Level<K>, OverlayPosition>,
    is_open: bool,
    on_action: Option<Box<dyn FnMut(K)>>,
}

impl<K: Debug, T: Debug> Debug for MenuController<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuController")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .field("expansion", &self.expansion)
            .field("resolver", &self.resolver)
            .field("levels", &self.levels)
            .field("positions", &self.positions)
            .field("is_open", &self.is_open)
            .field("on_action", &self.on_action.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash + Debug, T> MenuController<K, T> {
    /// Build a closed controller from caller entries.
    ///
    /// Fails before any state exists if the entries contain a section or a repeated key.
    pub fn new(
        entries: impl IntoIterator<Item = MenuEntry<K, T>>,
        config: MenuConfig,
    ) -> Result<Self, MenuError<K>> {
        MenuTree::build(entries).map(|tree| Self::from_tree(tree, config))
    }

    /// Wrap an already validated tree.
    pub fn from_tree(tree: MenuTree<K, T>, config: MenuConfig) -> Self {
        Self {
            tree,
            config,
            expansion: ExpansionState::new(),
            resolver: InteractionResolver::new(config.hover_delay, config.wrap_focus),
            scopes: KeyboardScopes::new(),
            levels: SmallVec::new(),
            positions: HashMap::new(),
            is_open: false,
            on_action: None,
        }
    }

    /// Callback invoked once per leaf activation, before the menu closes.
    #[must_use]
    pub fn with_on_action(mut self, f: impl FnMut(K) + 'static) -> Self {
        self.set_on_action(f);
        self
    }

    /// Replace the activation callback.
    pub fn set_on_action(&mut self, f: impl FnMut(K) + 'static) {
        self.on_action = Some(Box::new(f));
    }

    /// Mark keys as disabled at construction time.
    #[must_use]
    pub fn with_disabled_keys(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.tree.set_disabled_keys(keys);
        self
    }

    /// Replace the disabled-key set.
    ///
    /// An expanded branch that becomes disabled is collapsed, closing its panels.
    pub fn set_disabled_keys(&mut self, keys: impl IntoIterator<Item = K>) -> Effects<K> {
        let mut effects = Effects::new();
        self.tree.set_disabled_keys(keys);
        if self.expansion.retain_expandable(&self.tree) {
            self.sync_levels(&mut effects);
            self.resolver
                .reconcile_focus(&self.tree, &self.expansion, &mut effects);
        }
        effects
    }

    /// Replace the configuration of a live controller.
    ///
    /// Hover delay and wrapping apply from the next event. Placement options apply to
    /// every panel, open or not, from its next placement or relayout.
    pub fn set_config(&mut self, config: MenuConfig) {
        #[cfg(feature = "tracing")]
        tracing::debug!(?config, "menu config replaced");
        self.config = config;
        self.resolver.set_hover_delay(config.hover_delay);
        self.resolver.set_wrap_focus(config.wrap_focus);
        for (level, position) in &mut self.positions {
            position.set_options(config.placement_for(level));
        }
    }

    /// Open with pointer modality, focusing the first item. No-op when already open.
    pub fn open(&mut self) -> Effects<K> {
        self.open_with(FocusStrategy::First, Modality::Pointer)
    }

    /// Open with an explicit initial focus and modality. No-op when already open.
    pub fn open_with(&mut self, strategy: FocusStrategy, modality: Modality) -> Effects<K> {
        let mut effects = Effects::new();
        self.open_into(strategy, modality, &mut effects);
        effects
    }

    /// Close the whole tree. No-op when already closed.
    pub fn close(&mut self) -> Effects<K> {
        let mut effects = Effects::new();
        self.close_into(CloseReason::Programmatic, &mut effects);
        effects
    }

    /// Open if closed, close if open.
    pub fn toggle(&mut self) -> Effects<K> {
        if self.is_open {
            self.close()
        } else {
            self.open()
        }
    }

    /// Feed one input event through the controller.
    pub fn handle(&mut self, event: MenuEvent<K>) -> Effects<K> {
        let mut effects = Effects::new();
        if !self.is_open {
            match event {
                MenuEvent::TriggerPress => {
                    self.open_into(FocusStrategy::First, Modality::Pointer, &mut effects);
                }
                MenuEvent::TriggerKey(KeyCode::Enter | KeyCode::Space | KeyCode::ArrowDown) => {
                    self.open_into(FocusStrategy::First, Modality::Keyboard, &mut effects);
                }
                MenuEvent::TriggerKey(KeyCode::ArrowUp) => {
                    self.open_into(FocusStrategy::Last, Modality::Keyboard, &mut effects);
                }
                _ => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(?event, "menu closed; event dropped");
                }
            }
            return effects;
        }

        match event {
            MenuEvent::TriggerKey(KeyCode::Escape) => {
                self.close_into(CloseReason::Escape, &mut effects);
            }
            MenuEvent::OutsideInteraction => {
                self.close_into(CloseReason::Outside, &mut effects);
            }
            MenuEvent::TriggerPress | MenuEvent::TriggerKey(_) => {}
            MenuEvent::KeyDown(_) => {
                let level = self.focus_level();
                if self.scopes.accepts(&level) {
                    self.resolve(event, &mut effects);
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(?level, "key input for a level without a live subscription");
                }
            }
            MenuEvent::PointerEnter { key, .. } | MenuEvent::Press(key) | MenuEvent::Focus(key) => {
                if self.is_mounted(&key) {
                    self.resolve(event, &mut effects);
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(?key, "event for an item that is not mounted");
                }
            }
            MenuEvent::PointerLeave { .. } | MenuEvent::Tick(_) => {
                self.resolve(event, &mut effects);
            }
        }
        effects
    }

    /// Compute a placement for an open level.
    ///
    /// Call once right after [`MenuEffect::LevelOpened`] (before the panel has a size)
    /// for a provisional placement, and again after layout to settle it. Returns `None`
    /// if the token is stale or the anchor cannot be measured.
    pub fn place<M: Measure<K> + ?Sized>(
        &mut self,
        level: Level<K>,
        token: RecomputeToken,
        measure: &M,
    ) -> Option<Placement> {
        let Some(position) = self.positions.get_mut(&level) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(?level, "placement requested for a level that never opened");
            return None;
        };
        if !position.is_current(token) {
            #[cfg(feature = "tracing")]
            tracing::trace!(?level, "stale recompute token");
            return None;
        }
        let anchor = anchor_rect(&level, measure)?;
        let viewport = measure.viewport();
        match measure.panel_size(&level) {
            None => position.provisional(anchor, viewport, None),
            Some(size) => position.settle(token, anchor, viewport, size),
        }
    }

    /// Recompute every open level after a resize or content change.
    ///
    /// Levels are visited from the root down; levels whose anchor or size is not
    /// available yet are skipped.
    pub fn relayout<M: Measure<K> + ?Sized>(
        &mut self,
        measure: &M,
    ) -> SmallVec<[(Level<K>, Placement); 4]> {
        let viewport = measure.viewport();
        let mut placed = SmallVec::new();
        for open in &self.levels {
            let (Some(position), Some(anchor), Some(size)) = (
                self.positions.get_mut(&open.level),
                anchor_rect(&open.level, measure),
                measure.panel_size(&open.level),
            ) else {
                continue;
            };
            if let Some(placement) = position.update(anchor, viewport, size) {
                placed.push((open.level, placement));
            }
        }
        placed
    }

    /// Last computed placement for an open level.
    pub fn placement(&self, level: &Level<K>) -> Option<&Placement> {
        self.positions
            .get(level)
            .and_then(OverlayPosition::placement)
    }

    /// Placement options the panel of `level` negotiates with; `None` if it never opened.
    pub fn placement_options(&self, level: &Level<K>) -> Option<&PlacementOptions> {
        self.positions.get(level).map(OverlayPosition::options)
    }

    /// Whether an open level has settled and should be shown.
    pub fn is_level_visible(&self, level: &Level<K>) -> bool {
        self.positions
            .get(level)
            .is_some_and(OverlayPosition::is_visible)
    }

    /// Whether the menu is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Open levels from the root down.
    pub fn open_levels(&self) -> impl Iterator<Item = Level<K>> + '_ {
        self.levels.iter().map(|l| l.level)
    }

    /// Whether `level` is currently open.
    pub fn is_level_open(&self, level: &Level<K>) -> bool {
        self.levels.iter().any(|l| l.level == *level)
    }

    /// Item keys to render in `level`, in order. Empty if the level is not open.
    pub fn items(&self, level: Level<K>) -> impl Iterator<Item = K> + '_ {
        self.is_level_open(&level)
            .then(|| self.tree.children(level.parent_key()))
            .into_iter()
            .flatten()
    }

    /// Render state for one item.
    pub fn item_state(&self, key: &K) -> ItemState {
        let focused = self.resolver.focused().as_ref() == Some(key);
        let mut state = ItemState::empty();
        state.set(ItemState::DISABLED, self.tree.is_disabled(key));
        state.set(ItemState::FOCUSED, focused);
        state.set(
            ItemState::FOCUS_VISIBLE,
            focused && self.resolver.is_focus_visible(),
        );
        state.set(ItemState::HOVERED, self.resolver.hover().is_hovered(key));
        state.set(ItemState::EXPANDED, self.expansion.is_expanded(key));
        state.set(ItemState::HAS_SUBMENU, self.tree.is_branch(key));
        state
    }

    /// Props for the trigger control.
    pub fn trigger_props(&self) -> TriggerProps {
        TriggerProps {
            has_popup: true,
            expanded: self.is_open,
        }
    }

    /// Render the trigger with its props and the open flag.
    pub fn render_trigger<R>(&self, render: impl FnOnce(TriggerProps, bool) -> R) -> R {
        render(self.trigger_props(), self.is_open)
    }

    /// The focused item.
    pub fn focused(&self) -> Option<K> {
        self.resolver.focused()
    }

    /// Whether the focus ring should be drawn.
    pub fn is_focus_visible(&self) -> bool {
        self.resolver.is_focus_visible()
    }

    /// The item tree.
    pub fn tree(&self) -> &MenuTree<K, T> {
        &self.tree
    }

    /// Current configuration.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Expansion state.
    pub fn expansion(&self) -> &ExpansionState<K> {
        &self.expansion
    }

    /// Keyboard subscriptions, one per open level.
    pub fn scopes(&self) -> &KeyboardScopes<K> {
        &self.scopes
    }

    fn open_into(&mut self, strategy: FocusStrategy, modality: Modality, effects: &mut Effects<K>) {
        if self.is_open {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(?strategy, ?modality, "menu opened");
        self.is_open = true;
        self.expansion.collapse_all();
        self.resolver.reset();
        effects.push(MenuEffect::Opened);
        self.sync_levels(effects);
        self.resolver
            .focus_initial(&self.tree, strategy, modality, effects);
    }

    fn close_into(&mut self, reason: CloseReason, effects: &mut Effects<K>) {
        if !self.is_open {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(?reason, "menu closed");
        self.is_open = false;
        self.expansion.collapse_all();
        self.resolver.reset();
        self.sync_levels(effects);
        effects.push(MenuEffect::Closed(reason));
    }

    fn resolve(&mut self, event: MenuEvent<K>, effects: &mut Effects<K>) {
        let close = self
            .resolver
            .resolve(&self.tree, &mut self.expansion, event, effects);
        match close {
            Some(reason) => {
                if let Some(on_action) = self.on_action.as_mut() {
                    for effect in effects.iter() {
                        if let MenuEffect::Action(key) = effect {
                            on_action(*key);
                        }
                    }
                }
                self.close_into(reason, effects);
            }
            None => {
                self.sync_levels(effects);
                self.resolver
                    .reconcile_focus(&self.tree, &self.expansion, effects);
            }
        }
    }

    /// Bring the open panels in line with the expansion state.
    ///
    /// Panels that are no longer wanted close deepest first, releasing their keyboard
    /// subscription and cancelling their recompute token. New panels open root first.
    fn sync_levels(&mut self, effects: &mut Effects<K>) {
        let mut desired: SmallVec<[Level<K>; 4]> = SmallVec::new();
        if self.is_open {
            desired.push(Level::Root);
            desired.extend(
                self.expansion
                    .expanded_path(&self.tree)
                    .into_iter()
                    .map(Level::Submenu),
            );
        }

        let keep = self
            .levels
            .iter()
            .zip(desired.iter())
            .take_while(|(open, want)| open.level == **want)
            .count();

        for open in self.levels.drain(keep..).rev() {
            self.scopes.dispose(open.subscription);
            if let Some(position) = self.positions.get_mut(&open.level) {
                position.close();
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(level = ?open.level, "level closed");
            effects.push(MenuEffect::LevelClosed(open.level));
        }

        for &level in &desired[keep..] {
            let options = self.config.placement_for(&level);
            let token = self
                .positions
                .entry(level)
                .or_insert_with(|| OverlayPosition::new(options))
                .open();
            let subscription = self.scopes.subscribe(level);
            #[cfg(feature = "tracing")]
            tracing::debug!(?level, "level opened");
            self.levels.push(OpenLevel {
                level,
                subscription,
            });
            effects.push(MenuEffect::LevelOpened { level, token });
        }

        let stale_hover = self
            .resolver
            .hover()
            .pending()
            .is_some_and(|p| !self.is_mounted(&p.target));
        if stale_hover {
            self.resolver.cancel_hover();
        }
    }

    /// Whether `key` is rendered in a currently open level.
    fn is_mounted(&self, key: &K) -> bool {
        self.tree.contains(key) && self.is_level_open(&Level::of_parent(self.tree.parent_of(key)))
    }

    /// Level holding the focused item, or the root when nothing is focused.
    fn focus_level(&self) -> Level<K> {
        let parent = self
            .resolver
            .focused()
            .and_then(|k| self.tree.parent_of(&k));
        Level::of_parent(parent)
    }
}

fn anchor_rect<K, M: Measure<K> + ?Sized>(level: &Level<K>, measure: &M) -> Option<Rect> {
    match level {
        Level::Root => Some(measure.trigger_rect()),
        Level::Submenu(key) => measure.item_rect(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};
    use understory_placement::Edge;

    type Menu = MenuController<&'static str, &'static str>;

    fn entries() -> Vec<MenuEntry<&'static str, &'static str>> {
        alloc::vec![
            MenuEntry::item("copy", "Copy"),
            MenuEntry::item("rename", "Rename"),
            MenuEntry::submenu(
                "move",
                "Move",
                [
                    MenuEntry::item("move-to-shared", "Shared"),
                    MenuEntry::submenu(
                        "move-to-desktop",
                        "Desktop",
                        [
                            MenuEntry::item("desktop-1", "Desktop 1"),
                            MenuEntry::item("desktop-2", "Desktop 2"),
                        ],
                    ),
                    MenuEntry::item("move-to-favorite", "Favorite"),
                ],
            ),
            MenuEntry::item("delete", "Delete"),
        ]
    }

    fn menu() -> Menu {
        MenuController::new(entries(), MenuConfig::default()).unwrap()
    }

    fn enter(menu: &mut Menu, key: &'static str) -> Effects<&'static str> {
        menu.handle(MenuEvent::PointerEnter { key, time: 0 })
    }

    fn levels(menu: &Menu) -> Vec<Level<&'static str>> {
        menu.open_levels().collect()
    }

    struct Layout {
        viewport: Rect,
        trigger: Rect,
        item: Rect,
        panel: Option<Size>,
    }

    impl Measure<&'static str> for Layout {
        fn viewport(&self) -> Rect {
            self.viewport
        }

        fn trigger_rect(&self) -> Rect {
            self.trigger
        }

        fn item_rect(&self, _key: &&'static str) -> Option<Rect> {
            Some(self.item)
        }

        fn panel_size(&self, _level: &Level<&'static str>) -> Option<Size> {
            self.panel
        }
    }

    fn layout(panel: Option<Size>) -> Layout {
        Layout {
            viewport: Rect::new(0.0, 0.0, 800.0, 600.0),
            trigger: Rect::new(20.0, 20.0, 120.0, 50.0),
            item: Rect::new(20.0, 100.0, 220.0, 130.0),
            panel,
        }
    }

    #[test]
    fn open_emits_root_level_and_initial_focus() {
        let mut menu = menu();
        let effects = menu.handle(MenuEvent::TriggerPress);

        assert!(menu.is_open());
        assert_eq!(effects[0], MenuEffect::Opened);
        assert!(matches!(
            effects[1],
            MenuEffect::LevelOpened {
                level: Level::Root,
                ..
            }
        ));
        assert_eq!(effects[2], MenuEffect::Focus("copy"));
        assert_eq!(menu.focused(), Some("copy"));
        assert!(!menu.is_focus_visible());
        assert_eq!(menu.scopes().len(), 1);
    }

    #[test]
    fn trigger_keys_pick_initial_focus() {
        let mut menu = menu();
        menu.handle(MenuEvent::TriggerKey(KeyCode::ArrowUp));
        assert_eq!(menu.focused(), Some("delete"));
        assert!(menu.is_focus_visible());

        let mut menu = self::menu();
        menu.handle(MenuEvent::TriggerKey(KeyCode::Enter));
        assert_eq!(menu.focused(), Some("copy"));

        let mut menu = self::menu();
        let effects = menu.handle(MenuEvent::TriggerKey(KeyCode::Escape));
        assert!(effects.is_empty());
        assert!(!menu.is_open());
    }

    #[test]
    fn repeated_trigger_press_is_idempotent() {
        let mut menu = menu();
        menu.handle(MenuEvent::TriggerPress);
        enter(&mut menu, "move");
        let before = levels(&menu);

        assert!(menu.handle(MenuEvent::TriggerPress).is_empty());
        assert!(menu.open().is_empty());
        assert_eq!(levels(&menu), before);
        assert_eq!(menu.scopes().len(), 2);
    }

    #[test]
    fn toggle_flips_open_state() {
        let mut menu = menu();
        menu.toggle();
        assert!(menu.is_open());
        let effects = menu.toggle();
        assert!(!menu.is_open());
        assert_eq!(
            effects.last(),
            Some(&MenuEffect::Closed(CloseReason::Programmatic))
        );
    }

    #[test]
    fn hover_opens_cascading_levels() {
        let mut menu = menu();
        menu.open();
        enter(&mut menu, "move");
        let effects = enter(&mut menu, "move-to-desktop");

        assert_eq!(
            levels(&menu),
            [
                Level::Root,
                Level::Submenu("move"),
                Level::Submenu("move-to-desktop")
            ]
        );
        assert!(effects.iter().any(|e| matches!(
            e,
            MenuEffect::LevelOpened {
                level: Level::Submenu("move-to-desktop"),
                ..
            }
        )));
        assert_eq!(menu.scopes().len(), 3);

        let effects = enter(&mut menu, "move-to-favorite");
        assert_eq!(levels(&menu), [Level::Root, Level::Submenu("move")]);
        assert!(effects.contains(&MenuEffect::LevelClosed(Level::Submenu("move-to-desktop"))));
        assert_eq!(menu.scopes().len(), 2);
    }

    #[test]
    fn close_tears_down_every_level() {
        let mut menu = menu();
        menu.open();
        enter(&mut menu, "move");
        enter(&mut menu, "move-to-desktop");

        let effects = menu.close();
        assert_eq!(
            effects.as_slice(),
            &[
                MenuEffect::LevelClosed(Level::Submenu("move-to-desktop")),
                MenuEffect::LevelClosed(Level::Submenu("move")),
                MenuEffect::LevelClosed(Level::Root),
                MenuEffect::Closed(CloseReason::Programmatic),
            ]
        );
        assert!(menu.expansion().is_empty());
        assert_eq!(menu.focused(), None);
        assert!(menu.scopes().is_empty());
        assert!(menu.close().is_empty());

        // Reopening starts collapsed.
        menu.open();
        assert_eq!(levels(&menu), [Level::Root]);
    }

    #[test]
    fn escape_and_outside_close() {
        let mut menu = menu();
        menu.open();
        let effects = menu.handle(MenuEvent::KeyDown(KeyCode::Escape));
        assert_eq!(
            effects.last(),
            Some(&MenuEffect::Closed(CloseReason::Escape))
        );

        menu.open();
        let effects = menu.handle(MenuEvent::OutsideInteraction);
        assert_eq!(
            effects.last(),
            Some(&MenuEffect::Closed(CloseReason::Outside))
        );
    }

    #[test]
    fn nested_activation_calls_back_once_and_closes_tree() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let mut menu = menu().with_on_action(move |key| sink.borrow_mut().push(key));

        menu.open();
        enter(&mut menu, "move");
        enter(&mut menu, "move-to-desktop");
        let effects = menu.handle(MenuEvent::Press("desktop-1"));

        assert_eq!(calls.borrow().as_slice(), &["desktop-1"]);
        assert_eq!(
            effects
                .iter()
                .filter(|e| matches!(e, MenuEffect::Closed(_)))
                .count(),
            1
        );
        assert_eq!(
            effects.last(),
            Some(&MenuEffect::Closed(CloseReason::Activated))
        );
        assert!(!menu.is_open());
        assert!(menu.expansion().is_empty());
    }

    #[test]
    fn pressing_branch_toggles_without_action() {
        let count = Rc::new(Cell::new(0_u32));
        let sink = Rc::clone(&count);
        let mut menu = menu().with_on_action(move |_| sink.set(sink.get() + 1));
        menu.open();

        menu.handle(MenuEvent::Press("move"));
        assert_eq!(levels(&menu), [Level::Root, Level::Submenu("move")]);
        menu.handle(MenuEvent::Press("move"));
        assert_eq!(levels(&menu), [Level::Root]);
        assert!(menu.is_open());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn events_for_unmounted_items_are_dropped() {
        let mut menu = menu();
        menu.open();
        assert!(menu.handle(MenuEvent::Press("desktop-1")).is_empty());
        assert!(enter(&mut menu, "move-to-desktop").is_empty());
        assert!(menu.handle(MenuEvent::Press("nope")).is_empty());
        assert_eq!(levels(&menu), [Level::Root]);
    }

    #[test]
    fn events_while_closed_do_nothing() {
        let mut menu = menu();
        let effects = menu.handle(MenuEvent::KeyDown(KeyCode::ArrowDown));
        assert!(effects.is_empty());
        assert!(menu.handle(MenuEvent::Press("copy")).is_empty());
        assert!(menu.handle(MenuEvent::OutsideInteraction).is_empty());
        assert!(!menu.is_open());
    }

    #[test]
    fn arrow_left_from_nested_item_returns_to_owner() {
        let mut menu = menu();
        menu.handle(MenuEvent::TriggerKey(KeyCode::ArrowDown));
        menu.handle(MenuEvent::KeyDown(KeyCode::ArrowDown));
        menu.handle(MenuEvent::KeyDown(KeyCode::ArrowDown));
        assert_eq!(menu.focused(), Some("move"));
        menu.handle(MenuEvent::KeyDown(KeyCode::ArrowRight));
        menu.handle(MenuEvent::KeyDown(KeyCode::ArrowDown));
        menu.handle(MenuEvent::KeyDown(KeyCode::ArrowRight));
        assert_eq!(menu.focused(), Some("desktop-1"));

        let effects = menu.handle(MenuEvent::KeyDown(KeyCode::ArrowLeft));
        assert_eq!(menu.focused(), Some("move-to-desktop"));
        assert_eq!(levels(&menu), [Level::Root, Level::Submenu("move")]);
        assert!(effects.contains(&MenuEffect::LevelClosed(Level::Submenu("move-to-desktop"))));
        assert!(!menu.scopes().accepts(&Level::Submenu("move-to-desktop")));
    }

    #[test]
    fn disabling_expanded_branch_closes_its_panel() {
        let mut menu = menu();
        menu.open();
        enter(&mut menu, "move");
        enter(&mut menu, "move-to-desktop");
        enter(&mut menu, "desktop-2");

        let effects = menu.set_disabled_keys(["move-to-desktop"]);
        assert_eq!(levels(&menu), [Level::Root, Level::Submenu("move")]);
        assert!(effects.contains(&MenuEffect::LevelClosed(Level::Submenu("move-to-desktop"))));
        assert_eq!(menu.focused(), Some("move-to-desktop"));
        assert!(
            menu.item_state(&"move-to-desktop")
                .contains(ItemState::DISABLED | ItemState::HAS_SUBMENU)
        );
    }

    #[test]
    fn closing_ancestor_cancels_pending_hover() {
        let config = MenuConfig::default().hover_delay(100);
        let mut menu = MenuController::new(entries(), config).unwrap();
        menu.open();
        menu.handle(MenuEvent::PointerEnter {
            key: "move",
            time: 0,
        });
        menu.handle(MenuEvent::Tick(100));
        menu.handle(MenuEvent::PointerEnter {
            key: "move-to-desktop",
            time: 200,
        });
        menu.set_disabled_keys(["move"]);
        assert_eq!(levels(&menu), [Level::Root]);

        menu.handle(MenuEvent::Tick(1_000));
        assert_eq!(levels(&menu), [Level::Root]);
        assert!(menu.expansion().is_empty());
    }

    #[test]
    fn two_phase_placement() {
        let mut menu = menu();
        let effects = menu.open();
        let Some(MenuEffect::LevelOpened { level, token }) = effects
            .iter()
            .copied()
            .find(|e| matches!(e, MenuEffect::LevelOpened { .. }))
        else {
            panic!("root level should open");
        };

        let provisional = menu.place(level, token, &layout(None)).unwrap();
        assert_eq!(provisional.rect.y0, 56.0);
        assert!(!menu.is_level_visible(&level));

        let measured = layout(Some(Size::new(180.0, 140.0)));
        let settled = menu.place(level, token, &measured).unwrap();
        assert!(menu.is_level_visible(&level));
        assert_eq!(settled.rect.size(), Size::new(180.0, 140.0));
        assert_eq!(menu.place(level, token, &measured), Some(settled));
        assert_eq!(menu.placement(&level), Some(&settled));

        menu.close();
        assert_eq!(menu.place(level, token, &measured), None);
    }

    #[test]
    fn config_change_reaches_live_panels() {
        let mut menu = menu();
        let effects = menu.open();
        let Some(MenuEffect::LevelOpened { level, token }) = effects
            .iter()
            .copied()
            .find(|e| matches!(e, MenuEffect::LevelOpened { .. }))
        else {
            panic!("root level should open");
        };
        let measured = layout(Some(Size::new(180.0, 140.0)));
        let below = menu.place(level, token, &measured).unwrap();
        assert_eq!(below.side.edge, Edge::Bottom);

        let beside = PlacementOptions::new(Side::RIGHT_START);
        let config = MenuConfig::default().root_placement(beside).wrap_focus(true);
        menu.set_config(config);
        assert_eq!(menu.config(), &config);
        assert_eq!(menu.placement_options(&level), Some(&beside));

        let placed = menu.relayout(&measured);
        assert_eq!(placed[0].1.side, Side::RIGHT_START);
        assert_eq!(placed[0].1.rect.x0, 120.0);

        // Wrapping applies to the very next key press.
        menu.handle(MenuEvent::KeyDown(KeyCode::ArrowUp));
        assert_eq!(menu.focused(), Some("delete"));
    }

    #[test]
    fn reopened_level_rejects_old_token() {
        let mut menu = menu();
        menu.open();
        let effects = enter(&mut menu, "move");
        let Some(MenuEffect::LevelOpened { token: old, .. }) = effects.last().copied() else {
            panic!("submenu should open");
        };
        enter(&mut menu, "copy");
        enter(&mut menu, "move");

        let measured = layout(Some(Size::new(160.0, 90.0)));
        assert_eq!(menu.place(Level::Submenu("move"), old, &measured), None);
    }

    #[test]
    fn submenu_anchors_on_its_item_and_flips() {
        let mut menu = menu();
        menu.open();
        let effects = enter(&mut menu, "move");
        let Some(MenuEffect::LevelOpened { level, token }) = effects.last().copied() else {
            panic!("submenu should open");
        };

        let mut measured = layout(Some(Size::new(200.0, 100.0)));
        let placement = menu.place(level, token, &measured).unwrap();
        assert_eq!(placement.side.edge, Edge::Right);
        assert_eq!(placement.rect.x0, 226.0);
        assert_eq!(placement.rect.y0, 100.0);

        // Push the owning item against the right edge and relayout.
        measured.item = Rect::new(600.0, 100.0, 790.0, 130.0);
        let placed = menu.relayout(&measured);
        let (_, moved) = placed.iter().copied().find(|(l, _)| *l == level).unwrap();
        assert!(moved.flipped);
        assert_eq!(moved.side.edge, Edge::Left);
        assert_eq!(menu.relayout(&measured), placed);
    }

    #[test]
    fn items_and_states_for_rendering() {
        let mut menu = menu();
        assert_eq!(menu.items(Level::Root).count(), 0);

        menu.handle(MenuEvent::TriggerKey(KeyCode::ArrowDown));
        enter(&mut menu, "move");
        assert_eq!(
            menu.items(Level::Submenu("move")).collect::<Vec<_>>(),
            ["move-to-shared", "move-to-desktop", "move-to-favorite"]
        );
        assert_eq!(menu.items(Level::Submenu("move-to-desktop")).count(), 0);

        let state = menu.item_state(&"move");
        assert!(state.contains(ItemState::FOCUSED | ItemState::HOVERED | ItemState::EXPANDED));
        assert!(!state.contains(ItemState::FOCUS_VISIBLE));

        menu.handle(MenuEvent::KeyDown(KeyCode::ArrowRight));
        let state = menu.item_state(&"move-to-shared");
        assert!(state.contains(ItemState::FOCUSED | ItemState::FOCUS_VISIBLE));
        assert!(!state.contains(ItemState::HAS_SUBMENU));
    }

    #[test]
    fn trigger_rendering_reflects_open_state() {
        let mut menu = menu();
        assert!(!menu.render_trigger(|props, open| props.expanded || open));
        menu.open();
        let (props, open) = menu.render_trigger(|props, open| (props, open));
        assert!(open);
        assert_eq!(
            props,
            TriggerProps {
                has_popup: true,
                expanded: true
            }
        );
    }

    #[test]
    fn sections_fail_before_any_state_exists() {
        let result = Menu::new(
            [
                MenuEntry::item("copy", "Copy"),
                MenuEntry::section("edit", Some("Edit"), [MenuEntry::item("cut", "Cut")]),
            ],
            MenuConfig::default(),
        );
        assert_eq!(
            result.err(),
            Some(MenuError::SectionUnsupported { key: "edit" })
        );
    }
}
