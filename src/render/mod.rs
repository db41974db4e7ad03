//! Pure render-plan computation.
//!
//! Nothing here touches a drawing surface. The session's consumed state is
//! folded into an ordered list of draw commands; a side-effecting renderer
//! replays them whenever any consumed state changes. Keeping the split means
//! the transform, mask, and history logic stay unit-testable without a
//! canvas.

use crate::backend::EditBackend;
use crate::geometry::{DrawRect, ScreenPoint};
use crate::media::ImageProbe;
use crate::session::{EditSession, InteractionMode};

/// Side length of one checkerboard cell, in screen pixels.
pub const CHECKERBOARD_CELL_SIZE: f64 = 16.0;

/// One drawing step. Order within the plan is significant.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface with the theme background.
    BackgroundFill,
    /// Checkerboard pattern clipped to the image's drawn rectangle.
    Checkerboard { rect: DrawRect, cell_size: f64 },
    /// The image itself, scaled and positioned by the viewport transform.
    /// Smoothing is only wanted below 100% zoom; above it, crisp pixels.
    Image {
        url: String,
        rect: DrawRect,
        smoothing: bool,
    },
    /// Translucent tint of the mask raster composited over the drawn
    /// rectangle. Only present in mask mode.
    MaskOverlay { rect: DrawRect },
    /// Two-tone dashed ring showing the brush footprint at the raw screen
    /// cursor position. `radius` is already scaled by the current zoom.
    BrushCursor { center: ScreenPoint, radius: f64 },
}

/// Folds the session's consumed state into the fixed draw order: background,
/// checkerboard, image, mask overlay, brush cursor.
pub fn compute_render_plan<B: EditBackend, P: ImageProbe>(
    session: &EditSession<B, P>,
) -> Vec<DrawCommand> {
    let mut plan = vec![DrawCommand::BackgroundFill];

    let Some(image) = session.image() else {
        return plan;
    };

    let viewport = session.viewport();
    let rect = viewport.draw_rect(session.container(), image.info.size());

    plan.push(DrawCommand::Checkerboard {
        rect,
        cell_size: CHECKERBOARD_CELL_SIZE,
    });
    plan.push(DrawCommand::Image {
        url: image.display_url.clone(),
        rect,
        smoothing: viewport.zoom() < 1.0,
    });

    if session.mode() == InteractionMode::Mask {
        if session.mask().is_some() {
            plan.push(DrawCommand::MaskOverlay { rect });
        }
        if let Some(cursor) = session.cursor() {
            plan.push(DrawCommand::BrushCursor {
                center: cursor,
                radius: f64::from(session.brush_size()) / 2.0 * viewport.zoom(),
            });
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendResult, EditRejected};
    use crate::config::AppConfig;
    use crate::geometry::ContainerSize;
    use crate::history::EditKind;
    use crate::input::PointerButton;
    use crate::media::{ImageInfo, MediaResult};
    use serde_json::Value;

    struct StubBackend;

    impl EditBackend for StubBackend {
        fn apply_edit(&self, _kind: EditKind, _artifact_ref: &str, _params: &Value) -> BackendResult {
            Err(EditRejected::new("unused"))
        }

        fn apply_masked_edit(
            &self,
            _kind: EditKind,
            _artifact_ref: &str,
            _mask_bytes: &[u8],
            _mask_width: u32,
            _mask_height: u32,
            _params: &Value,
        ) -> BackendResult {
            Err(EditRejected::new("unused"))
        }

        fn resolve_display_url(&self, artifact_ref: &str) -> String {
            format!("asset://{artifact_ref}")
        }
    }

    struct StubProbe;

    impl ImageProbe for StubProbe {
        fn probe(&self, artifact_ref: &str) -> MediaResult<ImageInfo> {
            Ok(ImageInfo {
                width: 400,
                height: 300,
                format: "PNG".into(),
                file_size_bytes: 1,
                file_name: "stub.png".into(),
                file_path: artifact_ref.to_string(),
                needs_conversion: false,
            })
        }
    }

    fn loaded_session() -> EditSession<StubBackend, StubProbe> {
        let mut session = EditSession::with_config(StubBackend, StubProbe, &AppConfig::default());
        session.handle_resize(ContainerSize::new(800.0, 600.0));
        session.load_image("/img.png").unwrap();
        session
    }

    #[test]
    fn empty_session_renders_background_only() {
        let session = EditSession::with_config(StubBackend, StubProbe, &AppConfig::default());
        assert_eq!(compute_render_plan(&session), vec![DrawCommand::BackgroundFill]);
    }

    #[test]
    fn loaded_image_renders_in_draw_order() {
        let session = loaded_session();
        let plan = compute_render_plan(&session);

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0], DrawCommand::BackgroundFill);
        let DrawCommand::Checkerboard { rect, cell_size } = plan[1].clone() else {
            panic!("expected checkerboard, got {:?}", plan[1]);
        };
        assert_eq!(cell_size, CHECKERBOARD_CELL_SIZE);
        // 400x300 fits a 800x600 container at 100%, centered.
        assert_eq!(rect, DrawRect::new(200.0, 150.0, 400.0, 300.0));

        let DrawCommand::Image { url, rect: image_rect, smoothing } = plan[2].clone() else {
            panic!("expected image, got {:?}", plan[2]);
        };
        assert_eq!(url, "asset:///img.png");
        assert_eq!(image_rect, rect);
        assert!(!smoothing, "no smoothing at 100%");
    }

    #[test]
    fn smoothing_enabled_below_actual_size() {
        let mut session = loaded_session();
        session.handle_resize(ContainerSize::new(200.0, 150.0));
        session.handle_key(
            crate::input::ShortcutKey::Character('f'),
            crate::input::ShortcutModifiers::default(),
        );
        let plan = compute_render_plan(&session);
        let DrawCommand::Image { smoothing, .. } = &plan[2] else {
            panic!("expected image");
        };
        assert!(*smoothing);
    }

    #[test]
    fn mask_mode_appends_overlay_and_cursor_ring() {
        let mut session = loaded_session();
        session.enter_mask_mode().unwrap();
        session.set_brush_size(30);
        session.handle_pointer_move(ScreenPoint::new(320.0, 240.0));

        let plan = compute_render_plan(&session);
        assert_eq!(plan.len(), 5);
        assert!(matches!(plan[3], DrawCommand::MaskOverlay { .. }));
        let DrawCommand::BrushCursor { center, radius } = plan[4].clone() else {
            panic!("expected brush cursor, got {:?}", plan[4]);
        };
        assert_eq!(center, ScreenPoint::new(320.0, 240.0));
        // Diameter 30 at zoom 1.0.
        assert_eq!(radius, 15.0);
    }

    #[test]
    fn cursor_ring_scales_with_zoom_and_vanishes_off_surface() {
        let mut session = loaded_session();
        session.enter_mask_mode().unwrap();
        session.set_brush_size(40);
        session.handle_pointer_move(ScreenPoint::new(100.0, 100.0));
        session.handle_wheel(ScreenPoint::new(400.0, 300.0), -1.0);

        let plan = compute_render_plan(&session);
        let DrawCommand::BrushCursor { radius, .. } = plan.last().unwrap() else {
            panic!("expected brush cursor");
        };
        assert!((radius - 20.0 * 1.1).abs() < 1e-9);

        session.handle_pointer_leave();
        let plan = compute_render_plan(&session);
        assert!(!plan
            .iter()
            .any(|command| matches!(command, DrawCommand::BrushCursor { .. })));
    }

    #[test]
    fn overlay_disappears_after_leaving_mask_mode() {
        let mut session = loaded_session();
        session.enter_mask_mode().unwrap();
        session.handle_pointer_down(ScreenPoint::new(400.0, 300.0), PointerButton::Primary);
        session.handle_pointer_up();
        session.exit_mask_mode();

        let plan = compute_render_plan(&session);
        assert!(!plan
            .iter()
            .any(|command| matches!(command, DrawCommand::MaskOverlay { .. })));
    }
}
