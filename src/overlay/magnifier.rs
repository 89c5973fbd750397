//! Magnifying glass: a fixed-zoom preview of the frozen pixels around the
//! pointer. Only available while a frozen snapshot backs the overlay.

use crate::geometry::ScreenPoint;
use crate::overlay::draw::{Frame, WHITE};

/// Half-width of the sampled square; 2 * GRAB_HALF + 1 source pixels per axis.
pub const GRAB_HALF: i32 = 10;
/// Fixed integer upscale factor.
pub const ZOOM: i32 = 4;
/// Gap between the pointer and the magnifier box.
const OFFSET: i32 = 24;

/// Side length of the rendered box in frame pixels.
pub fn box_side() -> i32 {
    (GRAB_HALF * 2 + 1) * ZOOM
}

/// Clamp a sample coordinate into the image. Sampling therefore repeats edge
/// pixels instead of ever reading out of bounds.
fn clamped_sample(image_w: u32, image_h: u32, x: i32, y: i32) -> (u32, u32) {
    (
        x.clamp(0, image_w as i32 - 1) as u32,
        y.clamp(0, image_h as i32 - 1) as u32,
    )
}

/// Render the magnifier near `at`, flipping to the opposite side of the
/// pointer when the default placement would clip at a screen edge.
pub fn draw_magnifier(
    frame: &mut Frame,
    image_w: u32,
    image_h: u32,
    rgba: &[u8],
    at: ScreenPoint,
    border_color: u32,
) {
    if image_w == 0 || image_h == 0 {
        return;
    }
    let side = box_side();
    let mut bx = at.x + OFFSET;
    if bx + side > frame.width as i32 {
        bx = at.x - OFFSET - side;
    }
    let mut by = at.y + OFFSET;
    if by + side > frame.height as i32 {
        by = at.y - OFFSET - side;
    }
    let bx = bx.max(0);
    let by = by.max(0);

    for dy in -GRAB_HALF..=GRAB_HALF {
        for dx in -GRAB_HALF..=GRAB_HALF {
            let (sx, sy) = clamped_sample(image_w, image_h, at.x + dx, at.y + dy);
            let idx = ((sy * image_w + sx) * 4) as usize;
            let color = u32::from_le_bytes([rgba[idx + 2], rgba[idx + 1], rgba[idx], 0xFF]);
            frame.fill(
                bx + (dx + GRAB_HALF) * ZOOM,
                by + (dy + GRAB_HALF) * ZOOM,
                ZOOM,
                ZOOM,
                color,
            );
        }
    }

    // Center crosshair marking the sampled pixel, then the border on top.
    let cx = bx + side / 2;
    let cy = by + side / 2;
    frame.hline(bx + 2, bx + side - 3, cy, WHITE);
    frame.vline(cx, by + 2, by + side - 3, WHITE);
    frame.stroke(bx, by, side, side, border_color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_clamps_to_image_bounds() {
        assert_eq!(clamped_sample(10, 10, -5, -5), (0, 0));
        assert_eq!(clamped_sample(10, 10, 12, 9), (9, 9));
        assert_eq!(clamped_sample(10, 10, 4, 20), (4, 9));
        assert_eq!(clamped_sample(1, 1, 100, -100), (0, 0));
    }

    #[test]
    fn corner_pointer_never_reads_out_of_bounds() {
        // A tiny image: every sample around a corner pointer must clamp.
        let (w, h) = (5u32, 5u32);
        let mut rgba = Vec::new();
        for i in 0..(w * h) {
            rgba.extend_from_slice(&[i as u8, 0, 0, 255]);
        }
        let mut buf = vec![0u32; 300 * 300];
        let mut frame = Frame::new(&mut buf, 300, 300);
        // Would panic on an out-of-bounds index if clamping were wrong.
        draw_magnifier(&mut frame, w, h, &rgba, ScreenPoint::new(0, 0), WHITE);
        draw_magnifier(&mut frame, w, h, &rgba, ScreenPoint::new(4, 4), WHITE);
        draw_magnifier(&mut frame, w, h, &rgba, ScreenPoint::new(200, 200), WHITE);
    }

    #[test]
    fn box_flips_away_from_the_bottom_right_edge() {
        let (w, h) = (3u32, 3u32);
        let rgba = vec![0u8; (w * h * 4) as usize];
        let side = box_side();
        let fw = 200u32;
        let mut buf = vec![0u32; (fw * fw) as usize];
        let mut frame = Frame::new(&mut buf, fw, fw);
        let at = ScreenPoint::new(fw as i32 - 2, fw as i32 - 2);
        draw_magnifier(&mut frame, w, h, &rgba, at, WHITE);
        // Border must have landed fully left/above the pointer.
        let expected = at.x - OFFSET - side;
        assert_eq!(frame.get(expected, at.y - OFFSET - side), Some(WHITE));
    }
}
