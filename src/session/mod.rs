//! Composition root: routes input events to the viewport or the mask,
//! drives external edits, and commits their results to the history stack.

use serde_json::Value;
use thiserror::Error;

use crate::backend::{EditBackend, EditRejected};
use crate::config::{load_app_config, AppConfig};
use crate::geometry::{ContainerSize, ScreenPoint};
use crate::history::{EditKind, HistoryStack};
use crate::input::{
    resolve_shortcut, InputContext, PointerButton, ShortcutAction, ShortcutKey, ShortcutModifiers,
};
use crate::mask::{clamp_brush_size, MaskBuffer};
use crate::media::{DecodeError, ImageInfo, ImageProbe};
use crate::viewport::{ViewportTransform, KEY_ZOOM_FACTOR};

const BRUSH_SIZE_STEP: u32 = 5;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an edit is already in progress")]
    Busy,
    #[error("no image loaded")]
    NoImage,
    #[error("mask mode is not active")]
    MaskNotActive,
    #[error(transparent)]
    Edit(#[from] EditRejected),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Which consumer pointer input is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    View,
    Mask,
}

/// Explicit pointer-interaction state machine, driven by pointer
/// down/up/leave and the active mode. Replaces ad hoc drag booleans.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerState {
    Idle,
    Panning { last: ScreenPoint },
    Painting,
}

/// The displayed artifact. Replaced wholesale on every successful edit and on
/// new file load, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub info: ImageInfo,
    pub display_url: String,
}

/// Image and history live and die together.
#[derive(Debug)]
struct OpenDocument {
    image: LoadedImage,
    history: HistoryStack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MaskPayload {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

/// An edit captured at submission time. Holding one means the session's busy
/// flag is set; hand it back through [`EditSession::finish_edit`].
#[derive(Debug)]
pub struct PendingEdit {
    kind: EditKind,
    label: String,
    params: Value,
    source_ref: String,
    mask: Option<MaskPayload>,
}

impl PendingEdit {
    pub const fn kind(&self) -> EditKind {
        self.kind
    }

    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }

    pub const fn params(&self) -> &Value {
        &self.params
    }
}

pub struct EditSession<B, P> {
    backend: B,
    probe: P,
    document: Option<OpenDocument>,
    viewport: ViewportTransform,
    mask: Option<MaskBuffer>,
    mode: InteractionMode,
    pointer: PointerState,
    busy: bool,
    error: Option<String>,
    brush_size: u32,
    container: ContainerSize,
    cursor: Option<ScreenPoint>,
}

impl<B: EditBackend, P: ImageProbe> EditSession<B, P> {
    pub fn new(backend: B, probe: P) -> Self {
        Self::with_config(backend, probe, &load_app_config())
    }

    pub(crate) fn with_config(backend: B, probe: P, config: &AppConfig) -> Self {
        Self {
            backend,
            probe,
            document: None,
            viewport: ViewportTransform::new(),
            mask: None,
            mode: InteractionMode::View,
            pointer: PointerState::Idle,
            busy: false,
            error: None,
            brush_size: config.brush_size(),
            container: ContainerSize::new(0.0, 0.0),
            cursor: None,
        }
    }

    // --- state snapshots for UI consumers ---

    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.document.as_ref().map(|doc| &doc.image)
    }

    pub fn history(&self) -> Option<&HistoryStack> {
        self.document.as_ref().map(|doc| &doc.history)
    }

    pub fn current_artifact_ref(&self) -> Option<&str> {
        self.document
            .as_ref()
            .map(|doc| doc.history.current_artifact_ref())
    }

    pub fn mask(&self) -> Option<&MaskBuffer> {
        self.mask.as_ref()
    }

    pub const fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub const fn container(&self) -> ContainerSize {
        self.container
    }

    pub const fn cursor(&self) -> Option<ScreenPoint> {
        self.cursor
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // --- image lifecycle ---

    /// Probes and loads a fresh image. Any previously loaded image is cleared
    /// wholesale first, so a decode failure leaves the session imageless with
    /// the message surfaced.
    pub fn load_image(&mut self, artifact_ref: &str) -> SessionResult<()> {
        self.clear_image();
        match self.probe.probe(artifact_ref) {
            Ok(info) => {
                tracing::info!(
                    artifact_ref,
                    width = info.width,
                    height = info.height,
                    "image loaded"
                );
                let display_url = self.backend.resolve_display_url(artifact_ref);
                self.viewport.fit_to_view(self.container, info.size());
                self.document = Some(OpenDocument {
                    image: LoadedImage { info, display_url },
                    history: HistoryStack::new(artifact_ref),
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(artifact_ref, %err, "image load failed");
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    pub fn clear_image(&mut self) {
        self.document = None;
        self.mask = None;
        self.mode = InteractionMode::View;
        self.pointer = PointerState::Idle;
        self.viewport.reset_view();
    }

    // --- mask lifecycle ---

    /// Enters mask mode, allocating a blank buffer at the image's natural
    /// dimensions. Re-entering while already active keeps the current strokes.
    pub fn enter_mask_mode(&mut self) -> SessionResult<()> {
        let doc = self.document.as_ref().ok_or(SessionError::NoImage)?;
        if self.mode != InteractionMode::Mask {
            self.mask = Some(MaskBuffer::new(doc.image.info.width, doc.image.info.height));
            self.mode = InteractionMode::Mask;
            self.pointer = PointerState::Idle;
        }
        Ok(())
    }

    /// Leaves mask mode and discards the buffer; the next entry starts empty.
    pub fn exit_mask_mode(&mut self) {
        self.mask = None;
        self.mode = InteractionMode::View;
        self.pointer = PointerState::Idle;
    }

    pub fn clear_mask(&mut self) {
        if let Some(mask) = self.mask.as_mut() {
            mask.clear();
        }
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = clamp_brush_size(size);
    }

    // --- input events ---

    /// Stores the new surface size. Triggers a redraw only; the transform is
    /// deliberately not refit.
    pub fn handle_resize(&mut self, container: ContainerSize) {
        self.container = container;
    }

    pub fn handle_pointer_down(&mut self, position: ScreenPoint, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        self.cursor = Some(position);
        if self.document.is_none() {
            return;
        }
        match self.mode {
            InteractionMode::Mask => {
                self.pointer = PointerState::Painting;
                self.paint_at(position);
            }
            InteractionMode::View => {
                self.pointer = PointerState::Panning { last: position };
            }
        }
    }

    pub fn handle_pointer_move(&mut self, position: ScreenPoint) {
        self.cursor = Some(position);
        match self.pointer {
            PointerState::Idle => {}
            PointerState::Panning { last } => {
                self.viewport
                    .pan_by(position.x - last.x, position.y - last.y);
                self.pointer = PointerState::Panning { last: position };
            }
            PointerState::Painting => self.paint_at(position),
        }
    }

    pub fn handle_pointer_up(&mut self) {
        self.pointer = PointerState::Idle;
    }

    pub fn handle_pointer_leave(&mut self) {
        self.pointer = PointerState::Idle;
        self.cursor = None;
    }

    /// Wheel zoom anchored at the cursor; scrolling up zooms in.
    pub fn handle_wheel(&mut self, position: ScreenPoint, delta_y: f64) {
        if self.document.is_none() {
            return;
        }
        self.viewport
            .zoom_at_cursor(position, self.container, delta_y < 0.0);
    }

    /// Resolves and applies a keyboard shortcut. Returns whether the key was
    /// handled.
    pub fn handle_key(&mut self, key: ShortcutKey, modifiers: ShortcutModifiers) -> bool {
        let context = InputContext {
            has_image: self.document.is_some(),
            mask_mode_active: self.mode == InteractionMode::Mask,
        };
        let Some(action) = resolve_shortcut(key, modifiers, context) else {
            return false;
        };

        match action {
            ShortcutAction::ZoomIn => {
                let zoom = self.viewport.zoom();
                self.viewport.set_zoom(zoom * KEY_ZOOM_FACTOR);
            }
            ShortcutAction::ZoomOut => {
                let zoom = self.viewport.zoom();
                self.viewport.set_zoom(zoom / KEY_ZOOM_FACTOR);
            }
            ShortcutAction::ResetView => self.viewport.reset_view(),
            ShortcutAction::FitToView => {
                if let Some(doc) = self.document.as_ref() {
                    self.viewport
                        .fit_to_view(self.container, doc.image.info.size());
                }
            }
            ShortcutAction::Undo => {
                let _ = self.undo();
            }
            ShortcutAction::BrushGrow => {
                self.set_brush_size(self.brush_size.saturating_add(BRUSH_SIZE_STEP));
            }
            ShortcutAction::BrushShrink => {
                self.set_brush_size(self.brush_size.saturating_sub(BRUSH_SIZE_STEP));
            }
            ShortcutAction::ClearMask => self.clear_mask(),
            ShortcutAction::ExitMaskMode => self.exit_mask_mode(),
            ShortcutAction::DismissError => self.dismiss_error(),
        }
        true
    }

    fn paint_at(&mut self, position: ScreenPoint) {
        let Some(doc) = self.document.as_ref() else {
            return;
        };
        let Some(mask) = self.mask.as_mut() else {
            return;
        };
        let point =
            self.viewport
                .screen_to_image(position, self.container, doc.image.info.size());
        mask.paint(point, f64::from(self.brush_size) / 2.0);
    }

    // --- edit lifecycle ---

    /// Captures an edit request and sets the busy flag. Rejected while another
    /// edit is outstanding; pan/zoom and mask painting stay available in the
    /// meantime. For [`EditKind::Inpaint`] the current mask raster is exported
    /// into the request.
    pub fn begin_edit(
        &mut self,
        kind: EditKind,
        label: impl Into<String>,
        params: Value,
    ) -> SessionResult<PendingEdit> {
        if self.busy {
            tracing::debug!(kind = kind.as_str(), "edit rejected: busy");
            return Err(SessionError::Busy);
        }
        let doc = self.document.as_ref().ok_or(SessionError::NoImage)?;

        let mask = if kind == EditKind::Inpaint {
            let mask = self.mask.as_ref().ok_or(SessionError::MaskNotActive)?;
            Some(MaskPayload {
                bytes: mask.export().to_vec(),
                width: mask.width(),
                height: mask.height(),
            })
        } else {
            None
        };

        self.busy = true;
        let source_ref = doc.history.current_artifact_ref().to_string();
        tracing::info!(kind = kind.as_str(), source_ref = %source_ref, "edit submitted");
        Ok(PendingEdit {
            kind,
            label: label.into(),
            params,
            source_ref,
            mask,
        })
    }

    /// Commits the backend's outcome for an edit started with `begin_edit`.
    /// Success pushes history and replaces the image wholesale; failure
    /// surfaces the message and changes nothing else. The busy flag clears
    /// either way.
    pub fn finish_edit(
        &mut self,
        pending: PendingEdit,
        outcome: std::result::Result<String, EditRejected>,
    ) -> SessionResult<()> {
        self.busy = false;

        let new_ref = match outcome {
            Ok(new_ref) => new_ref,
            Err(rejected) => {
                tracing::warn!(kind = pending.kind.as_str(), %rejected, "edit failed");
                self.error = Some(rejected.message.clone());
                return Err(rejected.into());
            }
        };

        let info = match self.probe.probe(&new_ref) {
            Ok(info) => info,
            Err(err) => {
                tracing::warn!(artifact_ref = %new_ref, %err, "edit result unreadable");
                self.error = Some(err.to_string());
                return Err(err.into());
            }
        };

        let Some(doc) = self.document.as_mut() else {
            // Image was cleared while the edit was in flight; nothing to commit to.
            tracing::warn!(artifact_ref = %new_ref, "dropping edit result for closed document");
            return Ok(());
        };

        doc.history.push(pending.kind, pending.label, new_ref.clone());
        doc.image = LoadedImage {
            display_url: self.backend.resolve_display_url(&new_ref),
            info,
        };
        let size = doc.image.info.size();
        self.mask = None;
        self.mode = InteractionMode::View;
        self.pointer = PointerState::Idle;
        self.viewport.fit_to_view(self.container, size);
        self.error = None;
        Ok(())
    }

    /// Drives a full edit cycle through the stored backend.
    pub fn apply_edit(
        &mut self,
        kind: EditKind,
        label: impl Into<String>,
        params: Value,
    ) -> SessionResult<()> {
        let pending = self.begin_edit(kind, label, params)?;
        let outcome = match &pending.mask {
            Some(payload) => self.backend.apply_masked_edit(
                pending.kind,
                &pending.source_ref,
                &payload.bytes,
                payload.width,
                payload.height,
                &pending.params,
            ),
            None => self
                .backend
                .apply_edit(pending.kind, &pending.source_ref, &pending.params),
        };
        self.finish_edit(pending, outcome)
    }

    /// Runs the inpainting edit over the current mask.
    pub fn apply_inpaint(&mut self, params: Value) -> SessionResult<()> {
        self.apply_edit(EditKind::Inpaint, "Inpainting", params)
    }

    /// Steps the history back by one entry and restores the previous artifact.
    /// Returns `Ok(false)` when there is nothing to undo. The restore target
    /// is probed before the stack is touched, so a missing artifact surfaces
    /// as a decode failure with the history intact.
    pub fn undo(&mut self) -> SessionResult<bool> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        let Some(doc) = self.document.as_ref() else {
            return Ok(false);
        };
        let Some(target) = doc.history.undo_target_ref() else {
            return Ok(false);
        };
        let target = target.to_string();

        let info = match self.probe.probe(&target) {
            Ok(info) => info,
            Err(err) => {
                tracing::warn!(artifact_ref = %target, %err, "undo target unreadable");
                self.error = Some(err.to_string());
                return Err(err.into());
            }
        };

        let Some(doc) = self.document.as_mut() else {
            return Ok(false);
        };
        doc.history.undo();
        doc.image = LoadedImage {
            display_url: self.backend.resolve_display_url(&target),
            info,
        };
        let size = doc.image.info.size();
        self.mask = None;
        self.mode = InteractionMode::View;
        self.pointer = PointerState::Idle;
        self.viewport.fit_to_view(self.container, size);
        self.error = None;
        Ok(true)
    }
}
