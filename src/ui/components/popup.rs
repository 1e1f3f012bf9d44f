use ratatui::layout::Rect;

/// A centered rect whose size is clamped between min and max, then to the
/// area with a two-cell margin.
pub fn centered_rect_constrained(
    area: Rect,
    min_width: u16,
    max_width: u16,
    min_height: u16,
    max_height: u16,
) -> Rect {
    let w = max_width
        .min(area.width.saturating_sub(4))
        .max(min_width)
        .min(area.width);
    let h = max_height
        .min(area.height.saturating_sub(4))
        .max(min_height)
        .min(area.height);

    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
