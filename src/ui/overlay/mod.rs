//! Anchored overlays: menus that open under a trigger, follow it on
//! resize, and close on the first pointer-down outside themselves.

mod anchored;
mod geometry;
mod menu;
mod pointer;

pub use anchored::{AnchoredOverlay, OverlayEntry, OverlayView};
pub use menu::render_overlay_menu;
pub use pointer::PointerBus;
