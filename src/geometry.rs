// geometry: desktop-coordinate points and normalized selection rectangles.

/// A point in desktop coordinates. Negative values are legal on multi-head
/// setups where a monitor sits left of or above the primary origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned selection rectangle. Always normalized: the origin is the
/// per-axis minimum of the two corners it was built from, so width/height
/// never go negative no matter which direction the user drags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl SelectionRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).unsigned_abs(),
            height: (a.y - b.y).unsigned_abs(),
        }
    }

    /// Only rectangles with real area may be emitted as selections; a
    /// zero-area rect is treated as a cancel by the overlay.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// One past the right-most column.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// One past the bottom-most row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_is_commutative() {
        let a = ScreenPoint::new(110, 60);
        let b = ScreenPoint::new(10, 10);
        assert_eq!(
            SelectionRect::from_corners(a, b),
            SelectionRect::from_corners(b, a)
        );
    }

    #[test]
    fn from_corners_normalizes_every_drag_direction() {
        let expected = SelectionRect::new(10, 10, 100, 50);
        let corners = [
            (ScreenPoint::new(10, 10), ScreenPoint::new(110, 60)),
            (ScreenPoint::new(110, 10), ScreenPoint::new(10, 60)),
            (ScreenPoint::new(10, 60), ScreenPoint::new(110, 10)),
            (ScreenPoint::new(110, 60), ScreenPoint::new(10, 10)),
        ];
        for (a, b) in corners {
            assert_eq!(SelectionRect::from_corners(a, b), expected);
        }
    }

    #[test]
    fn from_corners_stays_inside_bounding_box() {
        let a = ScreenPoint::new(-20, 45);
        let b = ScreenPoint::new(13, -7);
        let rect = SelectionRect::from_corners(a, b);
        assert!(rect.x >= a.x.min(b.x) && rect.right() <= a.x.max(b.x));
        assert!(rect.y >= a.y.min(b.y) && rect.bottom() <= a.y.max(b.y));
    }

    #[test]
    fn identical_corners_make_a_degenerate_rect() {
        let p = ScreenPoint::new(0, 0);
        let rect = SelectionRect::from_corners(p, p);
        assert_eq!((rect.width, rect.height), (0, 0));
        assert!(!rect.is_valid());
    }

    #[test]
    fn contains_is_inclusive_exclusive() {
        let rect = SelectionRect::new(10, 10, 100, 50);
        assert!(rect.contains(ScreenPoint::new(10, 10)));
        assert!(rect.contains(ScreenPoint::new(109, 59)));
        assert!(!rect.contains(ScreenPoint::new(110, 59)));
        assert!(!rect.contains(ScreenPoint::new(9, 10)));
    }
}
