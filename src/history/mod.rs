//! Append-only record of applied edits and single-step destructive undo.
//!
//! Edits are opaque transformations that always produce a new artifact
//! reference, so the stack only remembers the sequence of references. Push and
//! undo are O(1) and memory stays bounded regardless of image size; the cost
//! is that truncated entries are gone for good (no redo).

/// The closed set of edit operations the session can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Resize,
    Crop,
    Rotate,
    Flip,
    Brightness,
    Contrast,
    Hue,
    Saturation,
    Lightness,
    Blur,
    Sharpen,
    RemoveBackground,
    Upscale,
    StyleTransfer,
    Inpaint,
}

impl EditKind {
    /// Stable wire name handed to the backend contract.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Crop => "crop",
            Self::Rotate => "rotate",
            Self::Flip => "flip",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Lightness => "lightness",
            Self::Blur => "blur",
            Self::Sharpen => "sharpen",
            Self::RemoveBackground => "remove_background",
            Self::Upscale => "upscale",
            Self::StyleTransfer => "style_transfer",
            Self::Inpaint => "inpaint",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: EditKind,
    pub label: String,
    pub artifact_ref: String,
}

/// Ordered chain of artifacts produced by successive edits.
///
/// Invariant: the current artifact is the last entry's reference, or the base
/// reference when no edits have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStack {
    base_artifact_ref: String,
    entries: Vec<HistoryEntry>,
}

impl HistoryStack {
    pub fn new(base_artifact_ref: impl Into<String>) -> Self {
        Self {
            base_artifact_ref: base_artifact_ref.into(),
            entries: Vec::new(),
        }
    }

    pub fn base_artifact_ref(&self) -> &str {
        &self.base_artifact_ref
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_artifact_ref(&self) -> &str {
        self.entries
            .last()
            .map_or(self.base_artifact_ref.as_str(), |entry| {
                entry.artifact_ref.as_str()
            })
    }

    /// The reference `undo` would restore; `None` when the stack is empty.
    pub fn undo_target_ref(&self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        Some(match self.entries.len() {
            1 => self.base_artifact_ref.as_str(),
            n => self.entries[n - 2].artifact_ref.as_str(),
        })
    }

    /// Appends one entry per successful edit. Never called on failure.
    pub fn push(&mut self, kind: EditKind, label: impl Into<String>, artifact_ref: impl Into<String>) {
        let entry = HistoryEntry {
            kind,
            label: label.into(),
            artifact_ref: artifact_ref.into(),
        };
        tracing::debug!(
            kind = entry.kind.as_str(),
            artifact_ref = %entry.artifact_ref,
            depth = self.entries.len() + 1,
            "history push"
        );
        self.entries.push(entry);
    }

    /// Removes the last entry and returns it; a no-op returning `None` when
    /// the stack is empty. The removed entry is permanently discarded.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.entries.pop();
        match &entry {
            Some(entry) => tracing::debug!(
                kind = entry.kind.as_str(),
                restored = %self.current_artifact_ref(),
                "history undo"
            ),
            None => tracing::debug!("history undo on empty stack"),
        }
        entry
    }

    /// Clears all entries and rebases; called on fresh image load.
    pub fn reset(&mut self, new_base_artifact_ref: impl Into<String>) {
        self.base_artifact_ref = new_base_artifact_ref.into();
        self.entries.clear();
        tracing::debug!(base = %self.base_artifact_ref, "history reset");
    }
}
