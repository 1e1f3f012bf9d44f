//! Contextual menu anchored under a trigger element

use std::cell::Cell;
use std::rc::Rc;

use ratatui::layout::{Position, Rect, Size};
use unicode_width::UnicodeWidthStr;

use super::geometry::{HitBounds, OverlayPosition, anchored_position};
use super::pointer::{ListenerControl, PointerBus, Subscription};

/// A selectable menu row carrying an opaque payload
#[derive(Debug, Clone)]
pub struct OverlayEntry<T> {
    pub label: String,
    pub payload: T,
}

impl<T> OverlayEntry<T> {
    pub fn new(label: impl Into<String>, payload: T) -> Self {
        Self {
            label: label.into(),
            payload,
        }
    }
}

/// Render snapshot of an open overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub area: Rect,
    pub labels: Vec<String>,
    pub highlighted: usize,
}

/// State that only exists while the overlay is open
struct OpenOverlay {
    anchor: Rect,
    position: OverlayPosition,
    area: Rect,
    bounds: Rc<Cell<HitBounds>>,
    /// Outside-interaction listener; dropping it deregisters
    _listener: Subscription,
}

/// A single-slot anchored overlay.
///
/// While open it holds exactly one pointer subscription. Closing, tearing
/// down or reopening drops that subscription before anything else happens.
pub struct AnchoredOverlay<T> {
    entries: Vec<OverlayEntry<T>>,
    gap: u16,
    highlighted: usize,
    open: Option<OpenOverlay>,
}

impl<T> AnchoredOverlay<T> {
    pub fn new(entries: Vec<OverlayEntry<T>>, gap: u16) -> Self {
        Self {
            entries,
            gap,
            highlighted: 0,
            open: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Panel size: widest label plus borders and padding, one row per entry
    pub fn panel_size(&self) -> Size {
        let widest = self
            .entries
            .iter()
            .map(|e| e.label.width())
            .max()
            .unwrap_or(0);
        Size::new(
            u16::try_from(widest).unwrap_or(u16::MAX).saturating_add(4),
            u16::try_from(self.entries.len())
                .unwrap_or(u16::MAX)
                .saturating_add(2),
        )
    }

    /// Open under `anchor`. `on_close` runs at most once, on the first
    /// pointer-down outside both the panel and the anchor.
    ///
    /// Any previous open state is released first. Returns false (and stays
    /// closed) when the anchor is not mounted.
    pub fn open<F>(
        &mut self,
        anchor: Option<Rect>,
        viewport: Size,
        bus: &PointerBus,
        mut on_close: F,
    ) -> bool
    where
        F: FnMut() + 'static,
    {
        self.close();

        let Some(anchor) = anchor else {
            tracing::debug!("Overlay anchor not mounted, not opening");
            return false;
        };

        let position = anchored_position(anchor, viewport, self.gap);
        let area = position.resolve(self.panel_size(), viewport);
        let bounds = Rc::new(Cell::new(HitBounds {
            anchor,
            panel: area,
        }));

        let hit_bounds = Rc::clone(&bounds);
        let listener = bus.subscribe(move |at| {
            if hit_bounds.get().contains(at) {
                ListenerControl::Keep
            } else {
                on_close();
                ListenerControl::Remove
            }
        });

        tracing::debug!("Overlay opened at {:?} (anchor {:?})", area, anchor);
        self.highlighted = 0;
        self.open = Some(OpenOverlay {
            anchor,
            position,
            area,
            bounds,
            _listener: listener,
        });
        true
    }

    /// Close and release the pointer listener. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        self.open.take().is_some()
    }

    /// Re-measure after a viewport or layout change.
    ///
    /// A missing anchor means the trigger is no longer mounted; the overlay
    /// is torn down rather than positioned from a stale rectangle.
    pub fn reposition(&mut self, anchor: Option<Rect>, viewport: Size) {
        if self.open.is_none() {
            return;
        }

        let Some(anchor) = anchor else {
            tracing::debug!("Overlay anchor unmounted, tearing down");
            self.open = None;
            return;
        };

        let size = self.panel_size();
        let Some(open) = self.open.as_mut() else {
            return;
        };
        let position = anchored_position(anchor, viewport, self.gap);
        if position != open.position {
            tracing::trace!("Overlay moved from {:?} to {:?}", open.position, position);
        }
        open.anchor = anchor;
        open.position = position;
        open.area = position.resolve(size, viewport);
        open.bounds.set(HitBounds {
            anchor,
            panel: open.area,
        });
    }

    pub fn area(&self) -> Option<Rect> {
        self.open.as_ref().map(|o| o.area)
    }

    #[cfg(test)]
    pub fn position(&self) -> Option<OverlayPosition> {
        self.open.as_ref().map(|o| o.position)
    }

    pub fn anchor(&self) -> Option<Rect> {
        self.open.as_ref().map(|o| o.anchor)
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlight_next(&mut self) {
        if self.is_open() && self.highlighted + 1 < self.entries.len() {
            self.highlighted += 1;
        }
    }

    pub fn highlight_prev(&mut self) {
        if self.is_open() {
            self.highlighted = self.highlighted.saturating_sub(1);
        }
    }

    /// Entry row under a screen cell, if any
    pub fn entry_at(&self, at: Position) -> Option<usize> {
        let area = self.area()?;
        if !area.contains(at) {
            return None;
        }
        // One-cell border around the rows
        let row = at.y.checked_sub(area.y + 1)? as usize;
        (row < self.entries.len() && at.y < area.bottom().saturating_sub(1)).then_some(row)
    }

    /// Choose an entry and get its payload. The overlay stays open; the
    /// caller decides when to close it.
    pub fn select(&mut self, index: usize) -> Option<&T> {
        if !self.is_open() {
            return None;
        }
        let entry = self.entries.get(index)?;
        self.highlighted = index;
        Some(&entry.payload)
    }

    pub fn selected_payload(&self) -> Option<&T> {
        if !self.is_open() {
            return None;
        }
        self.entries.get(self.highlighted).map(|e| &e.payload)
    }

    /// Snapshot for the render thread; `None` when closed
    pub fn view(&self) -> Option<OverlayView> {
        let open = self.open.as_ref()?;
        if open.area.is_empty() {
            return None;
        }
        Some(OverlayView {
            area: open.area,
            labels: self.entries.iter().map(|e| e.label.clone()).collect(),
            highlighted: self.highlighted,
        })
    }
}
