//! Pure placement math for anchored overlays
//!
//! Nothing here touches the terminal: an anchor rectangle and the viewport
//! size go in, a panel rectangle comes out.

use ratatui::layout::{Position, Rect, Size};

/// Where an overlay sits relative to the viewport.
///
/// `right` is measured from the viewport's right edge, so a panel keeps
/// hugging the anchor's right side when the terminal is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPosition {
    pub top: u16,
    pub right: u16,
}

/// Place a panel directly under `anchor`, right edges flush.
pub fn anchored_position(anchor: Rect, viewport: Size, gap: u16) -> OverlayPosition {
    OverlayPosition {
        top: anchor.bottom().saturating_add(gap),
        right: viewport.width.saturating_sub(anchor.right()),
    }
}

impl OverlayPosition {
    /// Turn the position into the panel's rectangle, clamped to the viewport.
    pub fn resolve(self, size: Size, viewport: Size) -> Rect {
        let width = size.width.min(viewport.width);
        let right_edge = viewport.width.saturating_sub(self.right);
        let x = right_edge.saturating_sub(width);
        let y = self.top.min(viewport.height);
        let height = size.height.min(viewport.height - y);
        Rect::new(x, y, width, height)
    }
}

/// Hit-test areas for outside-interaction dismissal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitBounds {
    pub anchor: Rect,
    pub panel: Rect,
}

impl HitBounds {
    pub fn contains(&self, at: Position) -> bool {
        self.anchor.contains(at) || self.panel.contains(at)
    }
}
