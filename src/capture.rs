//! Desktop capture: the frozen background snapshot the overlay draws over,
//! and the clamped crop applied once a region has been selected.

use image::RgbaImage;
use screenshots::Screen;
use thiserror::Error;

use crate::geometry::SelectionRect;

/// Environment failures are terminal to the current activation; the caller
/// logs them and the overlay is never shown.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("no displays detected")]
    NoDisplays,
    #[error("desktop geometry has zero area")]
    EmptyDesktop,
    #[error("screen capture failed: {0}")]
    Capture(String),
}

/// Raw RGBA snapshot of the whole virtual desktop.
pub struct Frozen {
    /// Top-left of the monitor union in desktop coordinates.
    pub origin: (i32, i32),
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Capture every screen and blit into one buffer covering the union of all
/// monitor rectangles. Gaps in non-rectangular layouts stay black.
pub fn capture_desktop_raw() -> Result<Frozen, EnvError> {
    let screens = Screen::all().map_err(|e| EnvError::Capture(e.to_string()))?;
    if screens.is_empty() {
        return Err(EnvError::NoDisplays);
    }

    let min_x = screens.iter().map(|s| s.display_info.x).min().unwrap_or(0);
    let min_y = screens.iter().map(|s| s.display_info.y).min().unwrap_or(0);
    let max_x = screens
        .iter()
        .map(|s| s.display_info.x + s.display_info.width as i32)
        .max()
        .unwrap_or(0);
    let max_y = screens
        .iter()
        .map(|s| s.display_info.y + s.display_info.height as i32)
        .max()
        .unwrap_or(0);

    let width = (max_x - min_x).max(0) as u32;
    let height = (max_y - min_y).max(0) as u32;
    if width == 0 || height == 0 {
        return Err(EnvError::EmptyDesktop);
    }

    let mut pixels = vec![0u8; width as usize * height as usize * 4];
    for screen in &screens {
        let img = screen
            .capture()
            .map_err(|e| EnvError::Capture(e.to_string()))?;
        let off_x = (screen.display_info.x - min_x) as u32;
        let off_y = (screen.display_info.y - min_y) as u32;
        let copy_w = img.width().min(width.saturating_sub(off_x));
        let copy_h = img.height().min(height.saturating_sub(off_y));
        let raw = img.as_raw();
        for row in 0..copy_h {
            let src = (row * img.width()) as usize * 4;
            let dst = ((off_y + row) * width + off_x) as usize * 4;
            let bytes = copy_w as usize * 4;
            pixels[dst..dst + bytes].copy_from_slice(&raw[src..src + bytes]);
        }
    }

    Ok(Frozen {
        origin: (min_x, min_y),
        width,
        height,
        pixels,
    })
}

/// Crop a selected region out of a raw RGBA buffer. The rect is in
/// buffer-local coordinates; out-of-range parts are clamped away. Returns
/// None for degenerate rects or rects entirely outside the buffer.
pub fn crop_region(width: u32, height: u32, pixels: &[u8], rect: &SelectionRect) -> Option<RgbaImage> {
    if !rect.is_valid() {
        return None;
    }
    let x = rect.x.max(0) as u32;
    let y = rect.y.max(0) as u32;
    if x >= width || y >= height {
        return None;
    }
    let w = (rect.right().clamp(0, width as i32) as u32).saturating_sub(x);
    let h = (rect.bottom().clamp(0, height as i32) as u32).saturating_sub(y);
    if w == 0 || h == 0 {
        return None;
    }

    let mut out: Vec<u8> = Vec::with_capacity((w * h * 4) as usize);
    for row in 0..h {
        let start = (((y + row) * width) + x) as usize * 4;
        let end = start + w as usize * 4;
        out.extend_from_slice(&pixels[start..end]);
    }
    RgbaImage::from_raw(w, h, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 4x3 buffer whose pixel (x, y) has r = x, g = y.
    fn checker() -> Vec<u8> {
        let mut pixels = Vec::new();
        for y in 0..3u8 {
            for x in 0..4u8 {
                pixels.extend_from_slice(&[x, y, 0, 255]);
            }
        }
        pixels
    }

    #[test]
    fn crop_extracts_the_requested_region() {
        let pixels = checker();
        let img = crop_region(4, 3, &pixels, &SelectionRect::new(1, 1, 2, 2)).unwrap();
        assert_eq!((img.width(), img.height()), (2, 2));
        assert_eq!(img.get_pixel(0, 0).0, [1, 1, 0, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [2, 2, 0, 255]);
    }

    #[test]
    fn crop_clamps_to_buffer_bounds() {
        let pixels = checker();
        let img = crop_region(4, 3, &pixels, &SelectionRect::new(2, 1, 10, 10)).unwrap();
        assert_eq!((img.width(), img.height()), (2, 2));
        let img = crop_region(4, 3, &pixels, &SelectionRect::new(-2, -1, 3, 3)).unwrap();
        assert_eq!((img.width(), img.height()), (1, 2));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn degenerate_or_outside_rects_crop_to_none() {
        let pixels = checker();
        assert!(crop_region(4, 3, &pixels, &SelectionRect::new(0, 0, 0, 0)).is_none());
        assert!(crop_region(4, 3, &pixels, &SelectionRect::new(4, 0, 2, 2)).is_none());
        assert!(crop_region(4, 3, &pixels, &SelectionRect::new(0, 3, 2, 2)).is_none());
        assert!(crop_region(4, 3, &pixels, &SelectionRect::new(-5, -5, 3, 3)).is_none());
    }
}
