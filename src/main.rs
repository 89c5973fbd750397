use anyhow::Result;
use log::{error, info, warn};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
};

use rsnip::capture::{capture_desktop_raw, crop_region, Frozen};
use rsnip::config::{OverlayConfig, SnipSettings};
use rsnip::geometry::SelectionRect;
use rsnip::hotkey::subscribe_print_screen;
use rsnip::overlay::{OverlayOutcome, OverlayWindow};

#[allow(deprecated)]
fn main() -> Result<()> {
    env_logger::init();
    info!("starting rsnip (snipping overlay mode)");
    let settings = SnipSettings::load();
    let event_loop = EventLoop::new()?;
    let mut hotkey_rx = match subscribe_print_screen() {
        Ok(rx) => Some(rx),
        Err(err) => {
            warn!("global hotkey unavailable: {err}");
            None
        }
    };
    let mut overlay: Option<OverlayWindow> = None;
    let mut frozen: Option<Frozen> = None;
    let _ = event_loop.run(|event, elwt| match event {
        Event::AboutToWait => {
            // Poll hotkey presses: each one starts a snipping activation,
            // unless the overlay is already up.
            if let Some(rx) = &mut hotkey_rx {
                while rx.try_recv().is_ok() {
                    let already_visible = overlay.as_ref().map(|o| o.visible).unwrap_or(false);
                    if already_visible {
                        continue;
                    }
                    if overlay.is_none() {
                        match OverlayWindow::new(elwt) {
                            Ok(ov) => overlay = Some(ov),
                            Err(err) => {
                                error!("snipping activation failed: {err}");
                                continue;
                            }
                        }
                    }
                    let config = OverlayConfig::snapshot(&settings);
                    frozen = if config.freeze_image {
                        match capture_desktop_raw() {
                            Ok(shot) => Some(shot),
                            Err(err) => {
                                warn!("freeze capture failed, snipping over live desktop: {err}");
                                None
                            }
                        }
                    } else {
                        None
                    };
                    if let Some(ov) = &mut overlay {
                        let image = frozen
                            .as_ref()
                            .map(|f| (f.width, f.height, f.pixels.clone()));
                        ov.activate(config, image);
                    }
                }
            }
            if let Some(ov) = &overlay {
                if ov.visible {
                    ov.request_redraw();
                }
            }
        }
        Event::WindowEvent {
            event: WindowEvent::RedrawRequested,
            window_id,
        } => {
            if let Some(ov) = &mut overlay {
                if window_id == ov.window_id() {
                    ov.redraw();
                }
            }
        }
        Event::WindowEvent { event, window_id } => {
            if let Some(ov) = &mut overlay {
                if window_id == ov.window_id() {
                    match ov.handle_window_event(&event) {
                        Some(OverlayOutcome::Selected(rect)) => {
                            info!(
                                "area selected: {}x{} at ({}, {})",
                                rect.width, rect.height, rect.x, rect.y
                            );
                            if let Some(shot) = frozen.take() {
                                // Crop in snapshot-local coordinates; the
                                // consumer of the image is downstream of us.
                                let local = SelectionRect::new(
                                    rect.x - shot.origin.0,
                                    rect.y - shot.origin.1,
                                    rect.width,
                                    rect.height,
                                );
                                match crop_region(shot.width, shot.height, &shot.pixels, &local) {
                                    Some(img) => {
                                        info!("captured region {}x{}", img.width(), img.height())
                                    }
                                    None => warn!("selection fell outside the frozen snapshot"),
                                }
                            }
                        }
                        Some(OverlayOutcome::Cancelled) => {
                            info!("snipping cancelled");
                            frozen = None;
                        }
                        None => {}
                    }
                }
            }
        }
        _ => {}
    });
    Ok(())
}
