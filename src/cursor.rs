//! Pointer-following crosshair cursor. The overlay hides the OS cursor while
//! active, so this renders the replacement with the configured color and
//! thickness. The sprite is stroked once with tiny-skia at construction and
//! blitted per frame.

use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::config::CursorColor;
use crate::geometry::ScreenPoint;
use crate::overlay::draw::Frame;

/// Crosshair arm length on each side of the hotspot.
const ARM: u32 = 9;

pub struct CrosshairCursor {
    thickness: u32,
    side: u32,
    half: i32,
    /// Prerendered BGRA sprite; zero-alpha words are skipped on blit.
    pixels: Vec<u32>,
}

impl CrosshairCursor {
    pub fn new(color: CursorColor, thickness: u32) -> Self {
        // Malformed sizes clamp to the thinnest usable cursor.
        let thickness = thickness.max(1);
        let side = ARM * 2 + thickness;
        // Non-zero by construction, so Pixmap::new cannot fail.
        let mut sprite = Pixmap::new(side, side).expect("sprite side is non-zero");

        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(color.r, color.g, color.b, 0xFF));
        paint.anti_alias = false;
        let stroke = Stroke {
            width: thickness as f32,
            ..Stroke::default()
        };
        let center = side as f32 / 2.0;
        let mut pb = PathBuilder::new();
        pb.move_to(center, 0.0);
        pb.line_to(center, side as f32);
        pb.move_to(0.0, center);
        pb.line_to(side as f32, center);
        if let Some(path) = pb.finish() {
            sprite.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }

        let words: &[u32] = bytemuck::cast_slice(sprite.data());
        let pixels = words.iter().map(|&w| swap_red_blue(w)).collect();

        Self {
            thickness,
            side,
            half: side as i32 / 2,
            pixels,
        }
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    /// Blit the crosshair centered on `at`. Pure drawing; the frame clips.
    pub fn render(&self, frame: &mut Frame, at: ScreenPoint) {
        for (i, &px) in self.pixels.iter().enumerate() {
            if px >> 24 == 0 {
                continue;
            }
            let dx = (i as u32 % self.side) as i32;
            let dy = (i as u32 / self.side) as i32;
            frame.set(at.x - self.half + dx, at.y - self.half + dy, px);
        }
    }
}

/// tiny-skia premultiplied RGBA word -> framebuffer BGRA word.
fn swap_red_blue(w: u32) -> u32 {
    (w & 0xFF00FF00) | ((w & 0x0000_00FF) << 16) | ((w >> 16) & 0x0000_00FF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_clamps_to_one() {
        let cursor = CrosshairCursor::new(CursorColor::default(), 0);
        assert_eq!(cursor.thickness(), 1);
        let cursor = CrosshairCursor::new(CursorColor::default(), 3);
        assert_eq!(cursor.thickness(), 3);
    }

    #[test]
    fn sprite_carries_the_configured_color() {
        let color = CursorColor { r: 10, g: 200, b: 30 };
        let cursor = CrosshairCursor::new(color, 2);
        let expected = color.to_bgra();
        assert!(cursor.pixels.iter().any(|&px| px == expected));
    }

    #[test]
    fn render_near_an_edge_stays_in_bounds() {
        let cursor = CrosshairCursor::new(CursorColor::default(), 3);
        let mut buf = vec![0u32; 16 * 16];
        let mut frame = Frame::new(&mut buf, 16, 16);
        cursor.render(&mut frame, ScreenPoint::new(0, 0));
        cursor.render(&mut frame, ScreenPoint::new(15, 15));
        cursor.render(&mut frame, ScreenPoint::new(-40, 999));
        // Something was drawn at the corner hotspot rows.
        assert!(buf.iter().any(|&px| px != 0));
    }
}
