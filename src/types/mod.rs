mod overlay;

pub use overlay::{Overlay, OverlayDraft, OverlayPatch, Position, Size};
