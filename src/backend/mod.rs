//! Contract consumed from the external edit backend.
//!
//! The backend is opaque to this crate: every operation takes the current
//! artifact reference and returns a brand new one, never mutating the source
//! in place. A failed call carries a human-readable message and changes
//! nothing.

use serde_json::Value;
use thiserror::Error;

use crate::history::EditKind;

/// Rejection from the external backend. The message is surfaced to the user
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EditRejected {
    pub message: String,
}

impl EditRejected {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type BackendResult = std::result::Result<String, EditRejected>;

pub trait EditBackend {
    /// Applies an unmasked edit to `artifact_ref`, returning the reference of
    /// the newly produced artifact. Never partially succeeds.
    fn apply_edit(&self, kind: EditKind, artifact_ref: &str, params: &Value) -> BackendResult;

    /// Applies a masked edit (inpainting) consuming the exported mask raster.
    /// `mask_bytes` is row-major, `mask_width * mask_height` single-byte cells.
    fn apply_masked_edit(
        &self,
        kind: EditKind,
        artifact_ref: &str,
        mask_bytes: &[u8],
        mask_width: u32,
        mask_height: u32,
        params: &Value,
    ) -> BackendResult;

    /// Maps an artifact reference to a renderable URL. Pure and infallible;
    /// a missing file behind the URL is the rendering layer's concern.
    fn resolve_display_url(&self, artifact_ref: &str) -> String;
}
