//! Projection math.

use glam::Mat4;

const FOV_Y_DEGREES: f32 = 45.0;
const NEAR_PLANE: f32 = 1.0;
const FAR_PLANE: f32 = 100.0;

/// Clamps a reported surface size before any aspect computation.
///
/// X11 can report a zero height mid-resize; height 0 would make the aspect
/// ratio divide by zero.
pub fn clamp_surface(width: i32, height: i32) -> (i32, i32) {
    (width, height.max(1))
}

/// Perspective projection for a surface of the given (already clamped) size.
pub fn perspective_for(width: i32, height: i32) -> Mat4 {
    let (width, height) = clamp_surface(width, height);
    Mat4::perspective_rh_gl(
        FOV_Y_DEGREES.to_radians(),
        width as f32 / height as f32,
        NEAR_PLANE,
        FAR_PLANE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_height_clamps_to_one() {
        assert_eq!(clamp_surface(800, 0), (800, 1));
    }

    #[test]
    fn positive_height_is_unchanged() {
        assert_eq!(clamp_surface(800, 600), (800, 600));
    }

    #[test]
    fn projection_at_zero_height_is_finite() {
        let projection = perspective_for(800, 0);
        assert!(projection.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn projection_matches_default_window_aspect() {
        let projection = perspective_for(800, 600);
        let expected = Mat4::perspective_rh_gl(45.0_f32.to_radians(), 800.0 / 600.0, 1.0, 100.0);
        assert_eq!(projection, expected);
    }
}
