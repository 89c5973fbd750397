pub mod draw;
pub mod handles;
pub mod magnifier;
pub mod state;
pub mod window;

pub use handles::ResizeHandle;
pub use state::{OverlayAction, OverlayEvent, OverlayKey, OverlayPhase, OverlayState};
pub use window::{OverlayOutcome, OverlayWindow};
