//! Resize handles for a parked selection: hit testing and the clamped
//! geometry adjustments they drive.

use crate::geometry::{ScreenPoint, SelectionRect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// Hit radius around each handle anchor, in pixels.
const HIT_RADIUS: i32 = 5;
/// Selections never shrink below this edge length while being resized.
const MIN_SIZE: i32 = 4;

/// Anchor points of the eight handles: corners plus edge midpoints, on the
/// outermost pixels of the rect.
pub fn handle_anchors(rect: &SelectionRect) -> [(i32, i32, ResizeHandle); 8] {
    let l = rect.x;
    let t = rect.y;
    let r = rect.right() - 1;
    let b = rect.bottom() - 1;
    let mx = rect.x + (rect.width / 2) as i32;
    let my = rect.y + (rect.height / 2) as i32;
    [
        (l, t, ResizeHandle::TopLeft),
        (mx, t, ResizeHandle::Top),
        (r, t, ResizeHandle::TopRight),
        (r, my, ResizeHandle::Right),
        (r, b, ResizeHandle::BottomRight),
        (mx, b, ResizeHandle::Bottom),
        (l, b, ResizeHandle::BottomLeft),
        (l, my, ResizeHandle::Left),
    ]
}

pub fn hit_test_handle(p: ScreenPoint, rect: &SelectionRect) -> Option<ResizeHandle> {
    if !rect.is_valid() {
        return None;
    }
    for (hx, hy, handle) in handle_anchors(rect) {
        if (p.x - hx).abs() <= HIT_RADIUS && (p.y - hy).abs() <= HIT_RADIUS {
            return Some(handle);
        }
    }
    None
}

/// Drag one handle to the pointer. The opposite edges stay fixed; the moving
/// edges are clamped to the desktop and to the minimum size.
pub fn resize_by_handle(
    rect: SelectionRect,
    handle: ResizeHandle,
    p: ScreenPoint,
    desktop_width: u32,
    desktop_height: u32,
) -> SelectionRect {
    let mut l = rect.x;
    let mut t = rect.y;
    let mut r = rect.right();
    let mut b = rect.bottom();

    let pull_left = |r: i32| p.x.min(r - MIN_SIZE).max(0);
    let pull_top = |b: i32| p.y.min(b - MIN_SIZE).max(0);
    let pull_right = |l: i32| p.x.max(l + MIN_SIZE).min(desktop_width as i32);
    let pull_bottom = |t: i32| p.y.max(t + MIN_SIZE).min(desktop_height as i32);

    match handle {
        ResizeHandle::TopLeft => {
            l = pull_left(r);
            t = pull_top(b);
        }
        ResizeHandle::Top => t = pull_top(b),
        ResizeHandle::TopRight => {
            t = pull_top(b);
            r = pull_right(l);
        }
        ResizeHandle::Right => r = pull_right(l),
        ResizeHandle::BottomRight => {
            r = pull_right(l);
            b = pull_bottom(t);
        }
        ResizeHandle::Bottom => b = pull_bottom(t),
        ResizeHandle::BottomLeft => {
            b = pull_bottom(t);
            l = pull_left(r);
        }
        ResizeHandle::Left => l = pull_left(r),
    }

    SelectionRect::new(l, t, (r - l).max(1) as u32, (b - t).max(1) as u32)
}

/// Move the rect so its origin lands at (x, y), kept fully on the desktop.
pub fn move_within(
    rect: SelectionRect,
    x: i32,
    y: i32,
    desktop_width: u32,
    desktop_height: u32,
) -> SelectionRect {
    let max_x = (desktop_width as i32 - rect.width as i32).max(0);
    let max_y = (desktop_height as i32 - rect.height as i32).max(0);
    SelectionRect::new(x.clamp(0, max_x), y.clamp(0, max_y), rect.width, rect.height)
}
