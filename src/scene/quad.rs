//! Quad geometry upload.

use anyhow::Result;
use gl::types::{GLsizeiptr, GLuint};

use crate::pipeline::{ATTRIB_POSITION, ATTRIB_TEXCOORD0};

/// One planar quad facing +Z. Four vertices, drawn as a triangle fan.
const QUAD_VERTICES: [f32; 12] = [
    1.0, 1.0, 1.0, //
    -1.0, 1.0, 1.0, //
    -1.0, -1.0, 1.0, //
    1.0, -1.0, 1.0, //
];

const QUAD_TEXCOORDS: [f32; 8] = [
    1.0, 0.0, //
    0.0, 0.0, //
    0.0, 1.0, //
    1.0, 1.0, //
];

/// Vertex-array object with position and texcoord buffers.
///
/// Buffer contents are immutable after the initial upload.
pub struct QuadGeometry {
    vao: GLuint,
    vbo_position: GLuint,
    vbo_texcoord: GLuint,
}

impl QuadGeometry {
    /// Number of vertices in one fan.
    pub const VERTEX_COUNT: i32 = 4;

    /// Allocates the VAO and uploads both buffers as static draw data.
    pub fn upload() -> Result<Self> {
        let mut geometry = Self {
            vao: 0,
            vbo_position: 0,
            vbo_texcoord: 0,
        };

        unsafe {
            gl::GenVertexArrays(1, &mut geometry.vao);
            gl::BindVertexArray(geometry.vao);

            gl::GenBuffers(1, &mut geometry.vbo_position);
            gl::BindBuffer(gl::ARRAY_BUFFER, geometry.vbo_position);

            let positions: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                positions.len() as GLsizeiptr,
                positions.as_ptr().cast(),
                gl::STATIC_DRAW,
            );
            gl::VertexAttribPointer(
                ATTRIB_POSITION,
                3,
                gl::FLOAT,
                gl::FALSE,
                0,
                std::ptr::null(),
            );
            gl::EnableVertexAttribArray(ATTRIB_POSITION);

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);

            gl::GenBuffers(1, &mut geometry.vbo_texcoord);
            gl::BindBuffer(gl::ARRAY_BUFFER, geometry.vbo_texcoord);

            let texcoords: &[u8] = bytemuck::cast_slice(&QUAD_TEXCOORDS);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                texcoords.len() as GLsizeiptr,
                texcoords.as_ptr().cast(),
                gl::STATIC_DRAW,
            );
            gl::VertexAttribPointer(
                ATTRIB_TEXCOORD0,
                2,
                gl::FLOAT,
                gl::FALSE,
                0,
                std::ptr::null(),
            );
            gl::EnableVertexAttribArray(ATTRIB_TEXCOORD0);

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        Ok(geometry)
    }

    pub fn vao(&self) -> GLuint {
        self.vao
    }

    /// Deletes the VAO and both buffers. Idempotent.
    pub fn release(&mut self) {
        unsafe {
            if self.vao != 0 {
                gl::DeleteVertexArrays(1, &self.vao);
                self.vao = 0;
            }

            if self.vbo_position != 0 {
                gl::DeleteBuffers(1, &self.vbo_position);
                self.vbo_position = 0;
            }

            if self.vbo_texcoord != 0 {
                gl::DeleteBuffers(1, &self.vbo_texcoord);
                self.vbo_texcoord = 0;
            }
        }
    }
}

impl Default for QuadGeometry {
    fn default() -> Self {
        Self {
            vao: 0,
            vbo_position: 0,
            vbo_texcoord: 0,
        }
    }
}

impl Drop for QuadGeometry {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_planar_facing_positive_z() {
        for vertex in QUAD_VERTICES.chunks(3) {
            assert_eq!(vertex[2], 1.0);
        }
    }

    #[test]
    fn texcoords_cover_unit_square() {
        for coord in QUAD_TEXCOORDS {
            assert!((0.0..=1.0).contains(&coord));
        }
    }

    #[test]
    fn release_on_default_geometry_is_noop() {
        let mut geometry = QuadGeometry::default();
        geometry.release();
        geometry.release();

        assert_eq!(geometry.vao, 0);
        assert_eq!(geometry.vbo_position, 0);
        assert_eq!(geometry.vbo_texcoord, 0);
    }
}
