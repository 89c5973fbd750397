use anyhow::Result;
use global_hotkey::hotkey::{Code, HotKey};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// Subscribe to PrintScreen presses: each press sends one (), for the
/// lifetime of the process. The manager must outlive the subscription, hence
/// the leak.
pub fn subscribe_print_screen() -> Result<Receiver<()>> {
    let manager: &'static mut GlobalHotKeyManager =
        Box::leak(Box::new(GlobalHotKeyManager::new()?));
    let hotkey = HotKey::new(None, Code::PrintScreen);
    let id = hotkey.id();
    manager.register(hotkey)?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let rx_events = GlobalHotKeyEvent::receiver();
        for event in rx_events {
            if event.id == id && matches!(event.state, HotKeyState::Pressed) {
                let _ = tx.send(());
            }
        }
    });
    Ok(rx)
}
