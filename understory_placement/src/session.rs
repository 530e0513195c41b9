// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-phase positioning for a single overlay panel.
//!
//! A panel's true size is unknown until it has been attached to the render tree, so the
//! placement computed at open time is only provisional. [`OverlayPosition`] makes the
//! correction explicit:
//!
//! 1. [`OverlayPosition::open`] starts a new open cycle and hands out a [`RecomputeToken`].
//! 2. [`OverlayPosition::provisional`] computes a best-effort placement from a size hint.
//!    The panel should stay hidden (see [`OverlayPosition::is_visible`]).
//! 3. After the next layout pass the host calls [`OverlayPosition::settle`] with the token
//!    and the measured size. Settling is idempotent for the same inputs.
//! 4. [`OverlayPosition::close`] ends the cycle; tokens from it are rejected afterwards.
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_placement::{OverlayPosition, PlacementOptions, Side};
//!
//! let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let trigger = Rect::new(10.0, 10.0, 90.0, 40.0);
//! let mut position = OverlayPosition::new(PlacementOptions::new(Side::BOTTOM_START));
//!
//! let token = position.open();
//! position.provisional(trigger, viewport, None);
//! assert!(!position.is_visible());
//!
//! let settled = position.settle(token, trigger, viewport, Size::new(120.0, 80.0));
//! assert!(settled.is_some());
//! assert!(position.is_visible());
//!
//! position.close();
//! assert!(position.settle(token, trigger, viewport, Size::new(120.0, 80.0)).is_none());
//! ```

use kurbo::{Rect, Size};

use crate::negotiate::negotiate;
use crate::types::{Placement, PlacementOptions};

/// Identifies one open cycle of an [`OverlayPosition`].
///
/// Tokens are cheap to copy and compare. A token becomes stale as soon as the panel is
/// closed or reopened, which is how pending recomputations are cancelled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecomputeToken(u32);

/// Where an [`OverlayPosition`] is in its open protocol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not open; no placement.
    Closed,
    /// Open, waiting for the post-layout pass. The panel should stay hidden.
    Provisional,
    /// Placement computed from a measured panel size.
    Settled,
}

/// Position state for one overlay panel.
#[derive(Clone, Debug)]
pub struct OverlayPosition {
    options: PlacementOptions,
    generation: u32,
    phase: Phase,
    current: Option<Placement>,
    last_size: Option<Size>,
}

impl OverlayPosition {
    /// Create a closed position with the given options.
    pub fn new(options: PlacementOptions) -> Self {
        Self {
            options,
            generation: 0,
            phase: Phase::Closed,
            current: None,
            last_size: None,
        }
    }

    /// Placement options used for every negotiation.
    pub fn options(&self) -> &PlacementOptions {
        &self.options
    }

    /// Replace the placement options. Takes effect at the next computation.
    pub fn set_options(&mut self, options: PlacementOptions) {
        self.options = options;
    }

    /// Begin a new open cycle and return its token.
    ///
    /// Any token from a previous cycle becomes stale.
    pub fn open(&mut self) -> RecomputeToken {
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Provisional;
        self.current = None;
        RecomputeToken(self.generation)
    }

    /// End the current cycle, dropping the placement and cancelling outstanding tokens.
    pub fn close(&mut self) {
        if self.phase == Phase::Closed {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Closed;
        self.current = None;
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a cycle is in progress.
    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    /// Whether the panel should be shown. Only settled placements are visible.
    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Settled
    }

    /// Whether `token` belongs to the current open cycle.
    pub fn is_current(&self, token: RecomputeToken) -> bool {
        self.is_open() && token.0 == self.generation
    }

    /// Most recently computed placement, if open.
    pub fn placement(&self) -> Option<&Placement> {
        self.current.as_ref()
    }

    /// Compute a best-effort placement before the panel has been measured.
    ///
    /// Uses `size_hint`, falling back to the size measured in an earlier cycle, then to
    /// an empty size. Does not leave the provisional phase. Returns `None` when closed.
    pub fn provisional(
        &mut self,
        anchor: Rect,
        viewport: Rect,
        size_hint: Option<Size>,
    ) -> Option<Placement> {
        if self.phase == Phase::Closed {
            return None;
        }
        let size = size_hint.or(self.last_size).unwrap_or(Size::ZERO);
        let placement = negotiate(anchor, viewport, size, &self.options);
        self.current = Some(placement);
        Some(placement)
    }

    /// Correct the placement after layout, using the measured panel size.
    ///
    /// Returns `None` if `token` is stale. Calling this repeatedly with the same inputs
    /// yields the same placement.
    pub fn settle(
        &mut self,
        token: RecomputeToken,
        anchor: Rect,
        viewport: Rect,
        panel: Size,
    ) -> Option<Placement> {
        if !self.is_current(token) {
            return None;
        }
        Some(self.compute(anchor, viewport, panel))
    }

    /// Recompute for the current cycle after a resize or content change.
    ///
    /// Returns `None` when closed.
    pub fn update(&mut self, anchor: Rect, viewport: Rect, panel: Size) -> Option<Placement> {
        if self.phase == Phase::Closed {
            return None;
        }
        Some(self.compute(anchor, viewport, panel))
    }

    fn compute(&mut self, anchor: Rect, viewport: Rect, panel: Size) -> Placement {
        let placement = negotiate(anchor, viewport, panel, &self.options);
        self.phase = Phase::Settled;
        self.current = Some(placement);
        self.last_size = Some(panel);
        placement
    }
}
