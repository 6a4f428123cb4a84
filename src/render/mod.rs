//! Per-frame rendering.
//!
//! One frame is: clear, bind program, bind VAO, bind texture on unit 0,
//! upload the combined matrix, issue the fan draws, unbind. Presentation
//! (buffer swap) stays with the caller, which owns the GLX drawable.

mod projection;

pub use projection::{clamp_surface, perspective_for};

use gl::types::{GLint, GLsizei};
use glam::{Mat4, Vec3};

use crate::pipeline::ShaderProgram;
use crate::scene::Scene;

/// How the quad's draw calls are issued.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DrawStyle {
    /// Historical behavior: six 4-vertex fans at first-vertex offsets
    /// 0,4,8,12,16,20 against a buffer holding only 4 vertices, so five of
    /// the six draws read out-of-range vertex data.
    #[default]
    LegacyFans,
    /// One 4-vertex fan, matching the uploaded geometry.
    SingleQuad,
}

/// The (first, count) pairs drawn for a style.
pub fn fan_ranges(style: DrawStyle) -> &'static [(GLint, GLsizei)] {
    match style {
        DrawStyle::LegacyFans => &[(0, 4), (4, 4), (8, 4), (12, 4), (16, 4), (20, 4)],
        DrawStyle::SingleQuad => &[(0, 4)],
    }
}

/// The quad's fixed model-view transform.
fn model_view() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -6.0))
}

/// One-time raster state, applied after context creation.
pub fn init_raster_state() {
    unsafe {
        gl::ClearColor(0.0, 0.0, 0.0, 1.0);
        gl::ClearDepth(1.0);
        gl::Enable(gl::DEPTH_TEST);
        gl::DepthFunc(gl::LEQUAL);
    }
}

/// Renders one frame of the scene. The caller swaps buffers afterwards.
pub fn draw_frame(pipeline: &ShaderProgram, scene: &Scene, projection: Mat4, style: DrawStyle) {
    let mvp = projection * model_view();
    let mvp = mvp.to_cols_array();

    unsafe {
        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT);

        gl::UseProgram(pipeline.id());
        gl::BindVertexArray(scene.geometry.vao());

        gl::ActiveTexture(gl::TEXTURE0);
        gl::BindTexture(gl::TEXTURE_2D, scene.texture.id());
        gl::Uniform1i(pipeline.sampler_uniform(), 0);

        gl::UniformMatrix4fv(pipeline.mvp_uniform(), 1, gl::FALSE, mvp.as_ptr());

        for &(first, count) in fan_ranges(style) {
            gl::DrawArrays(gl::TRIANGLE_FAN, first, count);
        }

        gl::BindVertexArray(0);
        gl::UseProgram(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_style_issues_six_fans_past_the_buffer() {
        let ranges = fan_ranges(DrawStyle::LegacyFans);
        assert_eq!(ranges.len(), 6);
        assert_eq!(
            ranges,
            &[(0, 4), (4, 4), (8, 4), (12, 4), (16, 4), (20, 4)]
        );
        // Only the first range fits in the 4-vertex buffer.
        assert!(ranges[1..].iter().all(|&(first, _)| first >= 4));
    }

    #[test]
    fn corrected_style_issues_one_fan() {
        assert_eq!(fan_ranges(DrawStyle::SingleQuad), &[(0, 4)]);
    }

    #[test]
    fn model_view_translates_into_the_scene() {
        let translation = model_view().col(3);
        assert_eq!(translation.z, -6.0);
    }
}
