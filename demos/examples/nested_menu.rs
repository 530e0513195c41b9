// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascading "Actions" menu driven by a scripted event stream.
//!
//! This example shows how a host wires `understory_menu` into a frame loop:
//! - feed input as `MenuEvent`s and act on the returned `MenuEffect`s,
//! - mount each opened level hidden, place it provisionally, then settle it once the
//!   panel has been "laid out",
//! - relayout every open level after the viewport changes.
//!
//! Run:
//! - `cargo run -p understory_demos --example nested_menu`

use std::collections::{HashMap, HashSet};

use kurbo::{Rect, Size};
use understory_menu::{
    Effects, ItemState, KeyCode, Level, Measure, MenuConfig, MenuController, MenuEffect, MenuEntry,
    MenuError, MenuEvent,
};

type Key = &'static str;
type Menu = MenuController<Key, &'static str>;

const ROW_HEIGHT: f64 = 32.0;
const PANEL_WIDTH: f64 = 180.0;

/// Stand-in for the host's layout engine.
#[derive(Debug)]
struct Scene {
    viewport: Rect,
    trigger: Rect,
    laid_out: HashSet<Level<Key>>,
    items: HashMap<Key, Rect>,
    rows: HashMap<Level<Key>, usize>,
}

impl Scene {
    fn new(viewport: Rect, trigger: Rect) -> Self {
        Self {
            viewport,
            trigger,
            laid_out: HashSet::new(),
            items: HashMap::new(),
            rows: HashMap::new(),
        }
    }

    /// Record the rows of a placed panel so submenus can anchor on them.
    fn record(&mut self, panel: Rect, keys: &[Key]) {
        for (row, key) in keys.iter().enumerate() {
            let y0 = panel.y0 + row as f64 * ROW_HEIGHT;
            self.items
                .insert(*key, Rect::new(panel.x0, y0, panel.x1, y0 + ROW_HEIGHT));
        }
    }

    fn unmount(&mut self, level: &Level<Key>) {
        self.laid_out.remove(level);
    }
}

impl Measure<Key> for Scene {
    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn trigger_rect(&self) -> Rect {
        self.trigger
    }

    fn item_rect(&self, key: &Key) -> Option<Rect> {
        self.items.get(key).copied()
    }

    fn panel_size(&self, level: &Level<Key>) -> Option<Size> {
        if !self.laid_out.contains(level) {
            return None;
        }
        let rows = self.rows.get(level).copied().unwrap_or(0);
        Some(Size::new(PANEL_WIDTH, rows as f64 * ROW_HEIGHT))
    }
}

fn actions() -> Vec<MenuEntry<Key, &'static str>> {
    vec![
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
                        MenuEntry::item("move-to-desktop-1", "Desktop 1"),
                        MenuEntry::item("move-to-desktop-2", "Desktop 2"),
                    ],
                ),
                MenuEntry::item("move-to-favorite", "Favorite"),
            ],
        ),
        MenuEntry::item("delete", "Delete"),
    ]
}

/// Apply effects the way a host would: mount, place, unmount, report.
fn apply(menu: &mut Menu, scene: &mut Scene, effects: Effects<Key>) {
    for effect in effects {
        match effect {
            MenuEffect::LevelOpened { level, token } => {
                let keys: Vec<Key> = menu.items(level).collect();
                scene.rows.insert(level, keys.len());

                // First pass: the panel is mounted but hidden, size unknown.
                if let Some(provisional) = menu.place(level, token, &*scene) {
                    tracing::info!(?level, rect = ?provisional.rect, "provisional placement");
                }

                // Second pass after layout.
                scene.laid_out.insert(level);
                if let Some(settled) = menu.place(level, token, &*scene) {
                    tracing::info!(
                        ?level,
                        side = ?settled.side,
                        flipped = settled.flipped,
                        rect = ?settled.rect,
                        "settled placement"
                    );
                    scene.record(settled.rect, &keys);
                }
            }
            MenuEffect::LevelClosed(level) => scene.unmount(&level),
            MenuEffect::Focus(key) => tracing::info!(key, "move platform focus"),
            MenuEffect::Action(key) => println!(">> action: {key}"),
            MenuEffect::Opened => println!(">> opened"),
            MenuEffect::Closed(reason) => println!(">> closed ({reason:?})"),
        }
    }
}

fn send(menu: &mut Menu, scene: &mut Scene, event: MenuEvent<Key>) {
    println!("-- {event:?}");
    let effects = menu.handle(event);
    apply(menu, scene, effects);
}

fn enter(menu: &mut Menu, scene: &mut Scene, key: Key, time: u64) {
    send(menu, scene, MenuEvent::PointerEnter { key, time });
}

fn key(menu: &mut Menu, scene: &mut Scene, code: KeyCode) {
    send(menu, scene, MenuEvent::KeyDown(code));
}

/// Print the open panels the way a renderer would walk them.
fn render(menu: &Menu) {
    let trigger = menu.render_trigger(|props, open| {
        let arrow = if open { " ▾" } else { "" };
        format!("[Actions{arrow}] expanded={}", props.expanded)
    });
    println!("{trigger}");
    for level in menu.open_levels() {
        let visible = if menu.is_level_visible(&level) {
            ""
        } else {
            " (hidden)"
        };
        println!("  {level:?}{visible}");
        for key in menu.items(level) {
            let state = menu.item_state(&key);
            let label = menu.tree().label(&key).copied().unwrap_or(key);
            let marker = match (
                state.contains(ItemState::FOCUS_VISIBLE),
                state.contains(ItemState::FOCUSED),
            ) {
                (true, _) => '>',
                (false, true) => '*',
                _ => ' ',
            };
            let submenu = if state.contains(ItemState::HAS_SUBMENU) {
                " ›"
            } else {
                ""
            };
            let disabled = if state.contains(ItemState::DISABLED) {
                " (disabled)"
            } else {
                ""
            };
            println!("    {marker} {label}{submenu}{disabled}");
        }
    }
}

fn main() -> Result<(), MenuError<Key>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut menu = MenuController::new(actions(), MenuConfig::default())?
        .with_on_action(|key| println!(">> on_action({key})"))
        .with_disabled_keys(["rename"]);
    let mut scene = Scene::new(
        Rect::new(0.0, 0.0, 640.0, 480.0),
        Rect::new(24.0, 24.0, 120.0, 56.0),
    );

    // Pointer: open, hover through the cascade, then slide onto a leaf.
    send(&mut menu, &mut scene, MenuEvent::TriggerPress);
    enter(&mut menu, &mut scene, "move", 10);
    enter(&mut menu, &mut scene, "move-to-desktop", 20);
    render(&menu);
    enter(&mut menu, &mut scene, "move-to-favorite", 30);
    render(&menu);

    // Keyboard takes over: into the desktop submenu and back out, then dismiss.
    key(&mut menu, &mut scene, KeyCode::ArrowUp);
    key(&mut menu, &mut scene, KeyCode::ArrowRight);
    render(&menu);
    key(&mut menu, &mut scene, KeyCode::ArrowLeft);
    key(&mut menu, &mut scene, KeyCode::Escape);
    render(&menu);

    // Keyboard from the start: rename is disabled but still reachable.
    send(
        &mut menu,
        &mut scene,
        MenuEvent::TriggerKey(KeyCode::ArrowDown),
    );
    key(&mut menu, &mut scene, KeyCode::ArrowDown);
    key(&mut menu, &mut scene, KeyCode::Enter);
    key(&mut menu, &mut scene, KeyCode::ArrowDown);
    key(&mut menu, &mut scene, KeyCode::ArrowRight);
    key(&mut menu, &mut scene, KeyCode::ArrowDown);
    key(&mut menu, &mut scene, KeyCode::ArrowRight);
    key(&mut menu, &mut scene, KeyCode::ArrowDown);
    render(&menu);
    key(&mut menu, &mut scene, KeyCode::Enter);

    // Relayout: the toolbar moves the trigger against the right edge, so the submenu
    // no longer fits on the right and flips.
    send(&mut menu, &mut scene, MenuEvent::TriggerPress);
    enter(&mut menu, &mut scene, "move", 100);
    scene.trigger = Rect::new(520.0, 24.0, 616.0, 56.0);
    // Submenus anchor on rows of the panel above them, so a second pass picks up the
    // rows moved by the first.
    for pass in 1..=2 {
        for (level, placement) in menu.relayout(&scene) {
            let keys: Vec<Key> = menu.items(level).collect();
            scene.record(placement.rect, &keys);
            println!(
                "   relayout #{pass} {level:?}: {:?} flipped={}",
                placement.side, placement.flipped
            );
        }
    }
    render(&menu);
    send(&mut menu, &mut scene, MenuEvent::OutsideInteraction);

    Ok(())
}
