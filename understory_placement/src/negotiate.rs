// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side negotiation: candidate rectangle, flip decision, cross-axis clamping.

use kurbo::{Rect, Size};

use crate::types::{Align, Edge, Placement, PlacementOptions, Side};

/// Compute where a panel of `panel` size goes relative to `anchor` inside `viewport`.
///
/// The candidate rectangle is built on the preferred side at the configured offset.
/// When flipping is enabled and the candidate overflows the padded viewport along the
/// main axis, the opposite edge is used instead if it fits, or if it simply has more
/// room than the preferred edge. The cross axis is then clamped so the panel never
/// starts outside the padded viewport.
///
/// This is a pure function: the same inputs always yield the same [`Placement`].
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use understory_placement::{negotiate, PlacementOptions, Side};
///
/// let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
/// let trigger = Rect::new(100.0, 100.0, 180.0, 130.0);
/// let options = PlacementOptions::new(Side::BOTTOM_START).offset(6.0);
///
/// let placement = negotiate(trigger, viewport, Size::new(200.0, 150.0), &options);
/// assert_eq!(placement.side, Side::BOTTOM_START);
/// assert!(!placement.flipped);
/// assert_eq!(placement.rect.origin(), kurbo::Point::new(100.0, 136.0));
/// ```
#[must_use]
pub fn negotiate(
    anchor: Rect,
    viewport: Rect,
    panel: Size,
    options: &PlacementOptions,
) -> Placement {
    let bounds = padded(viewport, options.container_padding);
    let preferred = options.preferred;

    let mut side = preferred;
    if options.should_flip {
        let needed = main_extent(preferred.edge, panel);
        let room = available(preferred.edge, anchor, bounds, options.offset);
        if needed > room {
            let mirrored = preferred.flipped();
            let mirrored_room = available(mirrored.edge, anchor, bounds, options.offset);
            if mirrored_room >= needed || mirrored_room > room {
                side = mirrored;
            }
        }
    }

    Placement {
        side,
        offset: options.offset,
        flipped: side != preferred,
        rect: layout(side, anchor, bounds, panel, options.offset),
        max_extent: available(side.edge, anchor, bounds, options.offset),
    }
}

fn padded(viewport: Rect, padding: f64) -> Rect {
    let x0 = viewport.x0 + padding;
    let y0 = viewport.y0 + padding;
    Rect::new(
        x0,
        y0,
        (viewport.x1 - padding).max(x0),
        (viewport.y1 - padding).max(y0),
    )
}

fn main_extent(edge: Edge, panel: Size) -> f64 {
    if edge.is_vertical() {
        panel.height
    } else {
        panel.width
    }
}

/// Room between the anchor (plus offset) and the padded viewport edge on `edge`.
fn available(edge: Edge, anchor: Rect, bounds: Rect, offset: f64) -> f64 {
    let room = match edge {
        Edge::Top => anchor.y0 - offset - bounds.y0,
        Edge::Bottom => bounds.y1 - (anchor.y1 + offset),
        Edge::Left => anchor.x0 - offset - bounds.x0,
        Edge::Right => bounds.x1 - (anchor.x1 + offset),
    };
    room.max(0.0)
}

fn layout(side: Side, anchor: Rect, bounds: Rect, panel: Size, offset: f64) -> Rect {
    let Size { width, height } = panel;
    let (x, y) = match side.edge {
        Edge::Top | Edge::Bottom => {
            let y = if side.edge == Edge::Top {
                anchor.y0 - offset - height
            } else {
                anchor.y1 + offset
            };
            let x = match side.align {
                Align::Start => anchor.x0,
                Align::End => anchor.x1 - width,
            };
            (clamp_start(x, width, bounds.x0, bounds.x1), y)
        }
        Edge::Left | Edge::Right => {
            let x = if side.edge == Edge::Left {
                anchor.x0 - offset - width
            } else {
                anchor.x1 + offset
            };
            let y = match side.align {
                Align::Start => anchor.y0,
                Align::End => anchor.y1 - height,
            };
            (x, clamp_start(y, height, bounds.y0, bounds.y1))
        }
    };
    Rect::new(x, y, x + width, y + height)
}

/// Keep `start..start + extent` inside `lo..hi` where possible, favoring `lo`.
fn clamp_start(start: f64, extent: f64, lo: f64, hi: f64) -> f64 {
    let max_start = (hi - extent).max(lo);
    start.max(lo).min(max_start)
}
