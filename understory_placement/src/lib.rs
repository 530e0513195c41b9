// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Placement: anchored overlay positioning.
//!
//! Given an anchor rectangle (a trigger button, or the item that owns a submenu), a
//! preferred [`Side`], a pixel offset and the viewport, this crate decides where a
//! floating panel goes:
//!
//! - [`negotiate`] builds the candidate rectangle on the preferred side, flips to the
//!   opposite edge when the preferred one would overflow (if allowed), and clamps the
//!   cross axis so the panel never starts off-screen.
//! - [`OverlayPosition`] wraps negotiation in an explicit two-phase open protocol:
//!   a provisional placement at open time, then a corrected placement once the panel
//!   has been measured. Each open cycle is identified by a [`RecomputeToken`]; closing
//!   the panel cancels outstanding tokens.
//!
//! Cascading flyouts fall out naturally: each nested panel negotiates against its own
//! trigger item's rectangle, not the root trigger's.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_placement::{negotiate, Edge, PlacementOptions, Side};
//!
//! let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
//! // A submenu item hugging the right edge of the window.
//! let item = Rect::new(620.0, 80.0, 780.0, 110.0);
//! let options = PlacementOptions::new(Side::RIGHT_START).offset(6.0);
//!
//! let placement = negotiate(item, viewport, Size::new(200.0, 120.0), &options);
//! assert!(placement.flipped);
//! assert_eq!(placement.side.edge, Edge::Left);
//! ```
//!
//! All coordinates are expected to be finite and share one space (typically viewport
//! pixels).
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std`.

#![no_std]

mod negotiate;
mod session;
mod types;

pub use negotiate::negotiate;
pub use session::{OverlayPosition, Phase, RecomputeToken};
pub use types::{Align, Edge, Placement, PlacementOptions, Side};
