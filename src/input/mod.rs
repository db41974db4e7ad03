mod shortcut;

pub use shortcut::{
    resolve_shortcut, InputContext, ShortcutAction, ShortcutKey, ShortcutModifiers,
};

/// Pointer button reported by the surface. Only the primary button drives
/// panning and painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}
