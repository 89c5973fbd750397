//! Settings persistence and the immutable per-activation config snapshot.
//!
//! The settings UI (not part of this crate's core) is the only writer; the
//! overlay reads a one-time [`OverlayConfig`] snapshot at activation and
//! never sees later mutation.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";
const APP_DIR: &str = "rsnip";

/// Serializable cursor color, stored as 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for CursorColor {
    fn default() -> Self {
        // Red, matching the classic snipping crosshair
        Self { r: 255, g: 0, b: 0 }
    }
}

impl CursorColor {
    /// Pack into the little-endian BGRA word the overlay framebuffer uses.
    pub fn to_bgra(self) -> u32 {
        u32::from_le_bytes([self.b, self.g, self.r, 0xFF])
    }
}

/// Snipping-area settings persisted between sessions.
///
/// Fields are private; the accessors implement the boundary semantics
/// (platform-forced values surface as read-only flags).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnipSettings {
    /// Capture a static snapshot of the desktop before the overlay shows,
    /// instead of snipping over the live desktop.
    freeze_image_while_snipping: bool,
    /// Horizontal and vertical lines from the desktop edges to the cursor.
    snipping_area_rulers: bool,
    /// Zoomed preview of the pixels around the cursor. Needs a frozen image.
    snipping_area_magnifying_glass: bool,
    /// Pointer position before the drag, selection size during it.
    snipping_area_position_and_size_info: bool,
    /// Park in a resizable state after release instead of emitting at once.
    allow_resizing_rect_selection: bool,
    /// Usage hint banner while the overlay is idle.
    show_snipping_area_info_text: bool,
    snipping_cursor_color: CursorColor,
    snipping_cursor_size: u32,
}

impl Default for SnipSettings {
    fn default() -> Self {
        Self {
            freeze_image_while_snipping: true,
            snipping_area_rulers: true,
            snipping_area_magnifying_glass: true,
            snipping_area_position_and_size_info: true,
            allow_resizing_rect_selection: false,
            show_snipping_area_info_text: true,
            snipping_cursor_color: CursorColor::default(),
            snipping_cursor_size: 1,
        }
    }
}

/// Platform-forced freeze value. The freeze snapshot path is unavailable on
/// Wayland sessions and is the only reliable path on macOS.
fn forced_freeze() -> Option<bool> {
    if cfg!(target_os = "macos") {
        return Some(true);
    }
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        return Some(false);
    }
    None
}

impl SnipSettings {
    /// Load settings from disk, or defaults if missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            log::warn!("no config directory, using default settings");
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("could not parse {}, using defaults: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist to disk. Failures are logged, not fatal.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else {
            log::error!("no config directory, settings not saved");
            return;
        };
        if let Some(dir) = path.parent() {
            if let Err(err) = fs::create_dir_all(dir) {
                log::error!("could not create {}: {err}", dir.display());
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(raw) => {
                if let Err(err) = fs::write(&path, raw) {
                    log::error!("could not write {}: {err}", path.display());
                }
            }
            Err(err) => log::error!("could not serialize settings: {err}"),
        }
    }

    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    pub fn freeze_image_while_snipping_enabled(&self) -> bool {
        forced_freeze().unwrap_or(self.freeze_image_while_snipping)
    }

    pub fn is_freeze_image_while_snipping_read_only(&self) -> bool {
        forced_freeze().is_some()
    }

    /// The magnifying glass samples the frozen image, so it follows freeze:
    /// disabled whenever freeze is off.
    pub fn snipping_area_magnifying_glass_enabled(&self) -> bool {
        self.freeze_image_while_snipping_enabled() && self.snipping_area_magnifying_glass
    }

    pub fn is_snipping_area_magnifying_glass_read_only(&self) -> bool {
        forced_freeze() == Some(false)
    }

    pub fn snipping_area_rulers_enabled(&self) -> bool {
        self.snipping_area_rulers
    }

    pub fn snipping_area_position_and_size_info_enabled(&self) -> bool {
        self.snipping_area_position_and_size_info
    }

    pub fn allow_resizing_rect_selection(&self) -> bool {
        self.allow_resizing_rect_selection
    }

    pub fn show_snipping_area_info_text(&self) -> bool {
        self.show_snipping_area_info_text
    }

    pub fn snipping_cursor_color(&self) -> CursorColor {
        self.snipping_cursor_color
    }

    pub fn snipping_cursor_size(&self) -> u32 {
        self.snipping_cursor_size
    }

    // Write accessors, used by the settings UI only; the overlay core never
    // calls these.

    pub fn set_freeze_image_while_snipping_enabled(&mut self, enabled: bool) {
        self.freeze_image_while_snipping = enabled;
    }

    pub fn set_snipping_area_rulers_enabled(&mut self, enabled: bool) {
        self.snipping_area_rulers = enabled;
    }

    pub fn set_snipping_area_magnifying_glass_enabled(&mut self, enabled: bool) {
        self.snipping_area_magnifying_glass = enabled;
    }

    pub fn set_snipping_area_position_and_size_info_enabled(&mut self, enabled: bool) {
        self.snipping_area_position_and_size_info = enabled;
    }

    pub fn set_allow_resizing_rect_selection(&mut self, enabled: bool) {
        self.allow_resizing_rect_selection = enabled;
    }

    pub fn set_show_snipping_area_info_text(&mut self, enabled: bool) {
        self.show_snipping_area_info_text = enabled;
    }

    pub fn set_snipping_cursor_color(&mut self, color: CursorColor) {
        self.snipping_cursor_color = color;
    }

    pub fn set_snipping_cursor_size(&mut self, size: u32) {
        self.snipping_cursor_size = size;
    }
}

/// Immutable-for-session configuration snapshot handed to the overlay at
/// activation. A read-only flag renders exactly like a writable one; the
/// read-only-ness only matters to the settings UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    pub freeze_image: bool,
    pub rulers: bool,
    pub magnifier: bool,
    pub position_size_info: bool,
    pub allow_resizing: bool,
    pub info_text: bool,
    pub cursor_color: CursorColor,
    pub cursor_size: u32,
}

impl OverlayConfig {
    pub fn snapshot(settings: &SnipSettings) -> Self {
        Self {
            freeze_image: settings.freeze_image_while_snipping_enabled(),
            rulers: settings.snipping_area_rulers_enabled(),
            magnifier: settings.snipping_area_magnifying_glass_enabled(),
            position_size_info: settings.snipping_area_position_and_size_info_enabled(),
            allow_resizing: settings.allow_resizing_rect_selection(),
            info_text: settings.show_snipping_area_info_text(),
            cursor_color: settings.snipping_cursor_color(),
            cursor_size: settings.snipping_cursor_size().max(1),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::snapshot(&SnipSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_behavior() {
        let settings = SnipSettings::default();
        assert!(settings.snipping_area_rulers_enabled());
        assert!(settings.snipping_area_position_and_size_info_enabled());
        assert!(settings.show_snipping_area_info_text());
        assert!(!settings.allow_resizing_rect_selection());
        assert_eq!(settings.snipping_cursor_size(), 1);
        assert_eq!(settings.snipping_cursor_color(), CursorColor::default());
    }

    #[test]
    fn magnifying_glass_follows_freeze() {
        let mut settings = SnipSettings::default();
        settings.set_snipping_area_magnifying_glass_enabled(true);
        settings.set_freeze_image_while_snipping_enabled(false);
        if !settings.is_freeze_image_while_snipping_read_only() {
            assert!(!settings.snipping_area_magnifying_glass_enabled());
        }
        settings.set_freeze_image_while_snipping_enabled(true);
        if !settings.is_freeze_image_while_snipping_read_only() {
            assert!(settings.snipping_area_magnifying_glass_enabled());
        }
    }

    #[test]
    fn read_only_flags_are_consistent() {
        let mut settings = SnipSettings::default();
        settings.set_freeze_image_while_snipping_enabled(false);
        if settings.is_freeze_image_while_snipping_read_only() {
            // A forced flag ignores the stored value entirely.
            settings.set_freeze_image_while_snipping_enabled(true);
            let forced = settings.freeze_image_while_snipping_enabled();
            settings.set_freeze_image_while_snipping_enabled(false);
            assert_eq!(settings.freeze_image_while_snipping_enabled(), forced);
        } else {
            assert!(!settings.freeze_image_while_snipping_enabled());
        }
    }

    #[test]
    fn partial_settings_file_fills_defaults() {
        let parsed: SnipSettings =
            serde_json::from_str(r#"{ "allow_resizing_rect_selection": true }"#).unwrap();
        assert!(parsed.allow_resizing_rect_selection());
        assert!(parsed.snipping_area_rulers_enabled());
        assert_eq!(parsed.snipping_cursor_size(), 1);
    }

    #[test]
    fn snapshot_clamps_cursor_size() {
        let mut settings = SnipSettings::default();
        settings.set_snipping_cursor_size(0);
        let config = OverlayConfig::snapshot(&settings);
        assert_eq!(config.cursor_size, 1);
    }

    #[test]
    fn cursor_color_packs_as_bgra() {
        let color = CursorColor { r: 30, g: 20, b: 10 };
        assert_eq!(color.to_bgra(), u32::from_le_bytes([10, 20, 30, 255]));
    }
}
