// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public placement vocabulary: edges, alignment, options and results.

use kurbo::Rect;

/// Edge of the anchor the panel is attached to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Above the anchor.
    Top,
    /// Below the anchor.
    Bottom,
    /// Left of the anchor.
    Left,
    /// Right of the anchor.
    Right,
}

impl Edge {
    /// The mirrored edge on the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether the panel is stacked above or below the anchor.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Cross-axis alignment of the panel against the anchor.
///
/// For [`Edge::Top`]/[`Edge::Bottom`] this aligns left (`Start`) or right (`End`)
/// edges; for [`Edge::Left`]/[`Edge::Right`] it aligns top (`Start`) or bottom (`End`) edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Align {
    /// Align the leading edges.
    Start,
    /// Align the trailing edges.
    End,
}

/// A placement side: an anchor edge plus a cross-axis alignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Side {
    /// Anchor edge the panel sits against.
    pub edge: Edge,
    /// Cross-axis alignment.
    pub align: Align,
}

impl Side {
    /// Below the anchor, left edges aligned. The usual drop-down placement.
    pub const BOTTOM_START: Self = Self::new(Edge::Bottom, Align::Start);
    /// Below the anchor, right edges aligned.
    pub const BOTTOM_END: Self = Self::new(Edge::Bottom, Align::End);
    /// Above the anchor, left edges aligned.
    pub const TOP_START: Self = Self::new(Edge::Top, Align::Start);
    /// Above the anchor, right edges aligned.
    pub const TOP_END: Self = Self::new(Edge::Top, Align::End);
    /// Right of the anchor, top edges aligned. The usual cascading flyout placement.
    pub const RIGHT_START: Self = Self::new(Edge::Right, Align::Start);
    /// Right of the anchor, bottom edges aligned.
    pub const RIGHT_END: Self = Self::new(Edge::Right, Align::End);
    /// Left of the anchor, top edges aligned.
    pub const LEFT_START: Self = Self::new(Edge::Left, Align::Start);
    /// Left of the anchor, bottom edges aligned.
    pub const LEFT_END: Self = Self::new(Edge::Left, Align::End);

    /// Create a side from an edge and an alignment.
    #[must_use]
    pub const fn new(edge: Edge, align: Align) -> Self {
        Self { edge, align }
    }

    /// The same alignment on the opposite edge.
    #[must_use]
    pub const fn flipped(self) -> Self {
        Self::new(self.edge.opposite(), self.align)
    }
}

/// Caller preferences for negotiating a panel's position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementOptions {
    /// Side to try first.
    pub preferred: Side,
    /// Gap between anchor and panel along the main axis, in pixels.
    pub offset: f64,
    /// Whether the panel may move to the opposite edge when the preferred one overflows.
    pub should_flip: bool,
    /// Inset applied to every viewport edge before overflow and clamping checks.
    pub container_padding: f64,
}

impl PlacementOptions {
    /// Default container padding, in pixels.
    pub const DEFAULT_CONTAINER_PADDING: f64 = 12.0;

    /// Options for `preferred` with no offset, flipping enabled and the default padding.
    #[must_use]
    pub const fn new(preferred: Side) -> Self {
        Self {
            preferred,
            offset: 0.0,
            should_flip: true,
            container_padding: Self::DEFAULT_CONTAINER_PADDING,
        }
    }

    /// Set the anchor gap.
    #[must_use]
    pub const fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Enable or disable flipping.
    #[must_use]
    pub const fn should_flip(mut self, should_flip: bool) -> Self {
        self.should_flip = should_flip;
        self
    }

    /// Set the viewport inset.
    #[must_use]
    pub const fn container_padding(mut self, padding: f64) -> Self {
        self.container_padding = padding;
        self
    }
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self::new(Side::BOTTOM_START)
    }
}

/// Outcome of a negotiation.
///
/// Placements carry no identity beyond the panel they describe; they are recomputed,
/// never persisted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Side actually used.
    pub side: Side,
    /// Anchor gap that was applied.
    pub offset: f64,
    /// True when `side` is the mirror of the preferred side.
    pub flipped: bool,
    /// Panel rectangle in viewport coordinates.
    pub rect: Rect,
    /// Space available along the main axis on the chosen side, after padding.
    ///
    /// Hosts typically use this as a max height (vertical edges) or max width.
    pub max_extent: f64,
}
