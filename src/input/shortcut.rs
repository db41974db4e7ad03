#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub has_image: bool,
    pub mask_mode_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    ZoomIn,
    ZoomOut,
    ResetView,
    FitToView,
    Undo,
    BrushGrow,
    BrushShrink,
    ClearMask,
    ExitMaskMode,
    DismissError,
}

fn resolve_mask_mode_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl) {
        (ShortcutKey::Character(']'), false) => Some(ShortcutAction::BrushGrow),
        (ShortcutKey::Character('['), false) => Some(ShortcutAction::BrushShrink),
        (ShortcutKey::Character('x'), false) => Some(ShortcutAction::ClearMask),
        (ShortcutKey::Escape, _) => Some(ShortcutAction::ExitMaskMode),
        _ => None,
    }
}

fn resolve_viewer_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Character('=' | '+'), true, _) => Some(ShortcutAction::ZoomIn),
        (ShortcutKey::Character('-'), true, _) => Some(ShortcutAction::ZoomOut),
        (ShortcutKey::Character('0'), true, _) => Some(ShortcutAction::ResetView),
        (ShortcutKey::Character('f'), false, false) => Some(ShortcutAction::FitToView),
        (ShortcutKey::Character('z'), true, false) => Some(ShortcutAction::Undo),
        (ShortcutKey::Escape, false, false) => Some(ShortcutAction::DismissError),
        _ => None,
    }
}

/// Resolves a key press against the active interaction context. Mask-mode
/// bindings win over viewer bindings; viewer bindings require a loaded image.
pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    if !context.has_image {
        return None;
    }

    if context.mask_mode_active {
        if let Some(action) = resolve_mask_mode_shortcut(key, modifiers) {
            return Some(action);
        }
    }

    resolve_viewer_shortcut(key, modifiers)
}
