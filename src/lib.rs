//! Interactive core of the PixelForge image editor: viewport transform,
//! inpainting mask editor, and linear edit history. Pixel processing lives
//! behind the [`backend::EditBackend`] contract; rendering consumes the pure
//! plan from [`render::compute_render_plan`].

pub mod backend;
mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod logging;
pub mod mask;
pub mod media;
pub mod render;
pub mod session;
pub mod viewport;

pub use backend::{EditBackend, EditRejected};
pub use error::{AppError, AppResult};
pub use history::{EditKind, HistoryEntry, HistoryStack};
pub use mask::MaskBuffer;
pub use media::{DecodeError, FileImageProbe, ImageInfo, ImageProbe};
pub use render::{compute_render_plan, DrawCommand};
pub use session::{EditSession, InteractionMode, SessionError};
pub use viewport::ViewportTransform;
