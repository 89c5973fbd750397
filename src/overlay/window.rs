//! winit/softbuffer host for the snipping state machine. Translates window
//! events into core events, executes the returned actions, and renders the
//! overlay frame.

use std::num::NonZeroU32;

use anyhow::{anyhow, Result};
use softbuffer::{Context, Surface};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowLevel},
};

use crate::capture::EnvError;
use crate::config::OverlayConfig;
use crate::cursor::CrosshairCursor;
use crate::geometry::{ScreenPoint, SelectionRect};
use crate::overlay::draw::{self, Frame};
use crate::overlay::magnifier;
use crate::overlay::state::{OverlayAction, OverlayEvent, OverlayKey, OverlayPhase, OverlayState};

/// Veil drawn over the live desktop when no frozen snapshot backs the
/// overlay; needs a compositor honoring window transparency.
const LIVE_VEIL: u32 = 0x88000000;

/// Terminal result of one activation, in desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOutcome {
    Selected(SelectionRect),
    Cancelled,
}

pub struct OverlayWindow {
    window: &'static Window,
    _context: Context<&'static Window>,
    surface: Surface<&'static Window, &'static Window>,
    pub visible: bool,
    /// Top-left of the monitor union in desktop coordinates.
    origin: (i32, i32),
    desktop_size: (u32, u32),
    state: OverlayState,
    cursor_sprite: CrosshairCursor,
    screenshot: Option<(u32, u32, Vec<u8>)>, // frozen RGBA
    dim_cache: Option<Vec<u32>>,             // dimmed BGRA rows
    last_cursor: (f64, f64),
}

impl OverlayWindow {
    /// Create the (hidden) overlay window covering the full virtual desktop.
    /// Fails with an environment error when there is nothing to cover.
    pub fn new(active: &ActiveEventLoop) -> Result<Self> {
        let (origin, desktop_size) = virtual_desktop(active)?;
        let attrs = WindowAttributes::default()
            .with_decorations(false)
            .with_resizable(false)
            .with_transparent(true)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_visible(false)
            .with_title("rsnip overlay")
            .with_inner_size(PhysicalSize::new(desktop_size.0, desktop_size.1));
        let window = active.create_window(attrs)?;
        let window: &'static Window = Box::leak(Box::new(window));
        let context = Context::new(window).map_err(|e| anyhow!("overlay ctx: {e}"))?;
        let surface =
            Surface::new(&context, window).map_err(|e| anyhow!("overlay surface: {e}"))?;
        Ok(Self {
            window,
            _context: context,
            surface,
            visible: false,
            origin,
            desktop_size,
            state: OverlayState::new(OverlayConfig::default(), desktop_size.0, desktop_size.1),
            cursor_sprite: CrosshairCursor::new(OverlayConfig::default().cursor_color, 1),
            screenshot: None,
            dim_cache: None,
            last_cursor: (0.0, 0.0),
        })
    }

    /// Show the overlay with a fresh config snapshot and, when freezing, the
    /// desktop image. Resets the state machine to Idle and grabs focus; the
    /// OS cursor is hidden in favor of the crosshair sprite.
    pub fn activate(&mut self, config: OverlayConfig, frozen: Option<(u32, u32, Vec<u8>)>) {
        self.cursor_sprite = CrosshairCursor::new(config.cursor_color, config.cursor_size);
        self.state = OverlayState::new(config, self.desktop_size.0, self.desktop_size.1);
        self.dim_cache = frozen.as_ref().map(|(_, _, px)| draw::build_dim_cache(px));
        self.screenshot = frozen;
        self.visible = true;
        self.window.set_visible(true);
        self.window
            .set_outer_position(PhysicalPosition::new(self.origin.0, self.origin.1));
        self.window.set_cursor_visible(false);
        self.window.focus_window();
        self.window.request_redraw();
    }

    pub fn window_id(&self) -> winit::window::WindowId {
        self.window.id()
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Feed one window event through the state machine. Returns the terminal
    /// outcome once the activation ends, None while it is still running.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<OverlayOutcome> {
        if !self.visible {
            return None;
        }
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor = (position.x, position.y);
                let p = self.cursor_point();
                self.dispatch(OverlayEvent::PointerMove(p))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let p = self.cursor_point();
                let event = match state {
                    ElementState::Pressed => OverlayEvent::PointerDown(p),
                    ElementState::Released => OverlayEvent::PointerUp(p),
                };
                self.dispatch(event)
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let key = match code {
                    KeyCode::Escape => Some(OverlayKey::Escape),
                    KeyCode::Enter | KeyCode::NumpadEnter => Some(OverlayKey::Enter),
                    _ => None,
                };
                match key {
                    Some(key) => self.dispatch(OverlayEvent::KeyPress(key)),
                    None => None,
                }
            }
            WindowEvent::Resized(_) => {
                self.window.request_redraw();
                None
            }
            _ => None,
        }
    }

    fn dispatch(&mut self, event: OverlayEvent) -> Option<OverlayOutcome> {
        match self.state.handle_event(event) {
            OverlayAction::None => None,
            OverlayAction::Redraw => {
                self.window.request_redraw();
                None
            }
            OverlayAction::AreaSelected(rect) => {
                self.close();
                Some(OverlayOutcome::Selected(SelectionRect::new(
                    rect.x + self.origin.0,
                    rect.y + self.origin.1,
                    rect.width,
                    rect.height,
                )))
            }
            OverlayAction::Cancelled => {
                self.close();
                Some(OverlayOutcome::Cancelled)
            }
        }
    }

    fn cursor_point(&self) -> ScreenPoint {
        ScreenPoint::new(self.last_cursor.0 as i32, self.last_cursor.1 as i32)
    }

    fn close(&mut self) {
        self.visible = false;
        self.window.set_visible(false);
        self.window.set_cursor_visible(true);
        // Release the snapshot and cache right away; a full-desktop RGBA
        // buffer is too large to keep across idle time.
        self.screenshot = None;
        self.dim_cache = None;
    }

    pub fn redraw(&mut self) {
        if !self.visible {
            return;
        }
        let size = self.window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);
        let _ = self.surface.resize(
            NonZeroU32::new(width).unwrap(),
            NonZeroU32::new(height).unwrap(),
        );
        let Ok(mut buffer) = self.surface.buffer_mut() else {
            return;
        };

        // Background: dimmed frozen snapshot, or the translucent veil when
        // snipping over the live desktop.
        if let (Some(cache), Some((sw, sh, _))) = (&self.dim_cache, self.screenshot.as_ref()) {
            let copy_w = (*sw).min(width) as usize;
            let copy_h = (*sh).min(height);
            for y in 0..copy_h {
                let dst = (y * width) as usize;
                let src = (y * sw) as usize;
                buffer[dst..dst + copy_w].copy_from_slice(&cache[src..src + copy_w]);
            }
        } else {
            buffer.fill(LIVE_VEIL);
        }

        {
            let cfg = *self.state.config();
            let phase = self.state.phase();
            let cursor = self.state.cursor();
            let selection = self.state.selection().filter(|r| r.is_valid());
            let cursor_color = cfg.cursor_color.to_bgra();
            let mut frame = Frame::new(&mut buffer[..], width, height);

            if let Some(rect) = selection {
                if let Some((sw, sh, px)) = self.screenshot.as_ref() {
                    restore_interior(&mut frame, &rect, *sw, *sh, px);
                }
                draw::draw_selection(&mut frame, &rect, phase == OverlayPhase::Resizable);
            }
            if cfg.rulers {
                draw::draw_rulers(&mut frame, cursor, cursor_color);
            }
            if cfg.magnifier {
                if let Some((sw, sh, px)) = self.screenshot.as_ref() {
                    magnifier::draw_magnifier(&mut frame, *sw, *sh, px, cursor, cursor_color);
                }
            }
            self.cursor_sprite.render(&mut frame, cursor);
            if cfg.position_size_info {
                match selection {
                    Some(rect) if phase != OverlayPhase::Idle => {
                        draw::draw_size_readout(&mut frame, &rect)
                    }
                    _ => draw::draw_position_readout(&mut frame, cursor),
                }
            }
            if cfg.info_text && phase == OverlayPhase::Idle {
                let text = if cfg.allow_resizing {
                    "CLICK AND DRAG TO SELECT, THEN ENTER TO CONFIRM OR ESC TO CANCEL"
                } else {
                    "CLICK AND DRAG TO SELECT AN AREA, ESC TO CANCEL"
                };
                draw::draw_info_banner(&mut frame, text);
            }
        }

        let _ = buffer.present();
    }
}

/// Undo the dimming inside the selection by blitting the original pixels.
fn restore_interior(frame: &mut Frame, rect: &SelectionRect, img_w: u32, img_h: u32, rgba: &[u8]) {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = rect.right().min(img_w as i32).min(frame.width as i32);
    let y1 = rect.bottom().min(img_h as i32).min(frame.height as i32);
    for y in y0..y1 {
        for x in x0..x1 {
            let idx = ((y as u32 * img_w + x as u32) * 4) as usize;
            frame.set(
                x,
                y,
                u32::from_le_bytes([rgba[idx + 2], rgba[idx + 1], rgba[idx], rgba[idx + 3]]),
            );
        }
    }
}

/// Union of all monitor rectangles, as (origin, size).
fn virtual_desktop(active: &ActiveEventLoop) -> Result<((i32, i32), (u32, u32)), EnvError> {
    let mut monitors = active.available_monitors().peekable();
    if monitors.peek().is_none() {
        return Err(EnvError::NoDisplays);
    }
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;
    for monitor in monitors {
        let pos = monitor.position();
        let size = monitor.size();
        min_x = min_x.min(pos.x);
        min_y = min_y.min(pos.y);
        max_x = max_x.max(pos.x + size.width as i32);
        max_y = max_y.max(pos.y + size.height as i32);
    }
    let width = (max_x - min_x).max(0) as u32;
    let height = (max_y - min_y).max(0) as u32;
    if width == 0 || height == 0 {
        return Err(EnvError::EmptyDesktop);
    }
    Ok(((min_x, min_y), (width, height)))
}
