//! The snipping-area state machine, free of any windowing toolkit. The host
//! adapter feeds it [`OverlayEvent`]s and executes the [`OverlayAction`]s it
//! returns; the adapter owns windows and buffers, this type owns the rules.

use crate::config::OverlayConfig;
use crate::geometry::{ScreenPoint, SelectionRect};
use crate::overlay::handles::{hit_test_handle, move_within, resize_by_handle, ResizeHandle};

/// Keys the overlay reacts to. Everything else is dropped by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayKey {
    Escape,
    Enter,
}

/// Inbound events, in desktop-union-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayEvent {
    PointerDown(ScreenPoint),
    PointerMove(ScreenPoint),
    PointerUp(ScreenPoint),
    KeyPress(OverlayKey),
}

/// What the host must do after dispatching an event. `AreaSelected` and
/// `Cancelled` are terminal: the machine ignores everything afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayAction {
    None,
    Redraw,
    AreaSelected(SelectionRect),
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayPhase {
    /// No button down, no rectangle.
    Idle,
    /// Primary button held since the anchor press.
    Dragging,
    /// Released with resizing allowed; waiting for Enter, Escape, or a
    /// handle/move adjustment.
    Resizable,
    /// Terminal, after either emission. Events are ignored here.
    Done,
}

/// An in-flight adjustment while in `Resizable`. Not a phase of its own:
/// Escape and Enter keep their meaning mid-adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Adjust {
    Handle(ResizeHandle),
    Move { grab_x: i32, grab_y: i32 },
}

pub struct OverlayState {
    config: OverlayConfig,
    desktop_width: u32,
    desktop_height: u32,
    phase: OverlayPhase,
    anchor: Option<ScreenPoint>,
    cursor: ScreenPoint,
    selection: Option<SelectionRect>,
    adjust: Option<Adjust>,
}

impl OverlayState {
    pub fn new(config: OverlayConfig, desktop_width: u32, desktop_height: u32) -> Self {
        Self {
            config,
            desktop_width,
            desktop_height,
            phase: OverlayPhase::Idle,
            anchor: None,
            cursor: ScreenPoint::default(),
            selection: None,
            adjust: None,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn cursor(&self) -> ScreenPoint {
        self.cursor
    }

    pub fn selection(&self) -> Option<SelectionRect> {
        self.selection
    }

    /// Dispatch one event. Events invalid for the current phase are expected
    /// input noise and fall through to `None` rather than erroring.
    pub fn handle_event(&mut self, event: OverlayEvent) -> OverlayAction {
        if self.phase == OverlayPhase::Done {
            return OverlayAction::None;
        }
        match event {
            OverlayEvent::KeyPress(OverlayKey::Escape) => {
                self.phase = OverlayPhase::Done;
                log::debug!("snipping cancelled via Escape");
                OverlayAction::Cancelled
            }
            OverlayEvent::KeyPress(OverlayKey::Enter) => self.confirm(),
            OverlayEvent::PointerDown(p) => self.pointer_down(p),
            OverlayEvent::PointerMove(p) => self.pointer_move(p),
            OverlayEvent::PointerUp(p) => self.pointer_up(p),
        }
    }

    fn confirm(&mut self) -> OverlayAction {
        match (self.phase, self.selection) {
            (OverlayPhase::Resizable, Some(rect)) if rect.is_valid() => {
                self.phase = OverlayPhase::Done;
                OverlayAction::AreaSelected(rect)
            }
            // Enter is only meaningful once a selection is parked.
            _ => OverlayAction::None,
        }
    }

    fn pointer_down(&mut self, p: ScreenPoint) -> OverlayAction {
        self.cursor = p;
        match self.phase {
            OverlayPhase::Idle => {
                self.anchor = Some(p);
                self.selection = None;
                self.phase = OverlayPhase::Dragging;
                OverlayAction::Redraw
            }
            OverlayPhase::Resizable => {
                let Some(rect) = self.selection else {
                    return OverlayAction::None;
                };
                if let Some(handle) = hit_test_handle(p, &rect) {
                    self.adjust = Some(Adjust::Handle(handle));
                    OverlayAction::Redraw
                } else if rect.contains(p) {
                    self.adjust = Some(Adjust::Move {
                        grab_x: p.x - rect.x,
                        grab_y: p.y - rect.y,
                    });
                    OverlayAction::Redraw
                } else {
                    OverlayAction::None
                }
            }
            // A second press mid-gesture is noise from the host event system.
            OverlayPhase::Dragging | OverlayPhase::Done => OverlayAction::None,
        }
    }

    fn pointer_move(&mut self, p: ScreenPoint) -> OverlayAction {
        self.cursor = p;
        match self.phase {
            OverlayPhase::Dragging => {
                // Normalized on every move so the outline never has a
                // negative extent, not just at release.
                if let Some(anchor) = self.anchor {
                    self.selection = Some(SelectionRect::from_corners(anchor, p));
                }
                OverlayAction::Redraw
            }
            OverlayPhase::Resizable => {
                match (self.adjust, self.selection) {
                    (Some(Adjust::Handle(handle)), Some(rect)) => {
                        self.selection = Some(resize_by_handle(
                            rect,
                            handle,
                            p,
                            self.desktop_width,
                            self.desktop_height,
                        ));
                    }
                    (Some(Adjust::Move { grab_x, grab_y }), Some(rect)) => {
                        self.selection = Some(move_within(
                            rect,
                            p.x - grab_x,
                            p.y - grab_y,
                            self.desktop_width,
                            self.desktop_height,
                        ));
                    }
                    _ => {}
                }
                OverlayAction::Redraw
            }
            // Cursor-following visuals (crosshair, rulers, position readout)
            // track the pointer even before any press.
            OverlayPhase::Idle => OverlayAction::Redraw,
            OverlayPhase::Done => OverlayAction::None,
        }
    }

    fn pointer_up(&mut self, p: ScreenPoint) -> OverlayAction {
        self.cursor = p;
        match self.phase {
            OverlayPhase::Dragging => {
                let rect = self.anchor.take().map(|a| SelectionRect::from_corners(a, p));
                self.selection = rect;
                match rect {
                    Some(rect) if rect.is_valid() => {
                        if self.config.allow_resizing {
                            self.phase = OverlayPhase::Resizable;
                            OverlayAction::Redraw
                        } else {
                            self.phase = OverlayPhase::Done;
                            OverlayAction::AreaSelected(rect)
                        }
                    }
                    // Zero-area release: treated as a cancel, never emitted
                    // as a degenerate selection.
                    _ => {
                        self.phase = OverlayPhase::Done;
                        OverlayAction::Cancelled
                    }
                }
            }
            OverlayPhase::Resizable => {
                if self.adjust.take().is_some() {
                    OverlayAction::Redraw
                } else {
                    OverlayAction::None
                }
            }
            OverlayPhase::Idle | OverlayPhase::Done => OverlayAction::None,
        }
    }
}
