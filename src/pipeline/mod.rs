//! Shader pipeline.
//!
//! Compiles the fixed vertex/fragment pair, links them with conventional
//! attribute slots bound by name, and caches the two uniform locations the
//! scene needs. Compile and link diagnostics are captured in full and
//! surfaced through the returned error; there is no recovery path.

use std::ffi::CString;
use std::ptr;

use anyhow::{bail, Context, Result};
use gl::types::{GLenum, GLint, GLuint};

/// Conventional attribute slots. Slots 1 and 2 are reserved for color and
/// normal attributes this scene does not use.
pub const ATTRIB_POSITION: GLuint = 0;
pub const ATTRIB_COLOR: GLuint = 1;
pub const ATTRIB_NORMAL: GLuint = 2;
pub const ATTRIB_TEXCOORD0: GLuint = 3;

const VERTEX_SHADER_SRC: &str = "\
#version 450 core

in vec4 vertexPosition;
in vec2 vertexTextureCoordinate0;

out vec2 outVertexTextureCoordinate0;

uniform mat4 mvpMatrix;

void main(void)
{
    gl_Position = mvpMatrix * vertexPosition;
    outVertexTextureCoordinate0 = vertexTextureCoordinate0;
}
";

const FRAGMENT_SHADER_SRC: &str = "\
#version 450 core

in vec2 outVertexTextureCoordinate0;

out vec4 fragmentColor;

uniform sampler2D textureSampler0;

void main(void)
{
    fragmentColor = texture(textureSampler0, outVertexTextureCoordinate0);
}
";

/// A linked program plus the uniform locations resolved after link.
pub struct ShaderProgram {
    program: GLuint,
    vertex: GLuint,
    fragment: GLuint,
    mvp_uniform: GLint,
    sampler_uniform: GLint,
}

impl ShaderProgram {
    /// Compiles, binds attribute slots and links the fixed shader pair.
    pub fn build() -> Result<Self> {
        let vertex = compile_shader(gl::VERTEX_SHADER, VERTEX_SHADER_SRC)
            .context("vertex shader compilation failed")?;
        let fragment = compile_shader(gl::FRAGMENT_SHADER, FRAGMENT_SHADER_SRC)
            .context("fragment shader compilation failed")?;

        let program = unsafe { gl::CreateProgram() };

        unsafe {
            gl::AttachShader(program, vertex);
            gl::AttachShader(program, fragment);

            // Attribute slots must be bound before linking.
            gl::BindAttribLocation(program, ATTRIB_POSITION, c"vertexPosition".as_ptr().cast());
            gl::BindAttribLocation(
                program,
                ATTRIB_TEXCOORD0,
                c"vertexTextureCoordinate0".as_ptr().cast(),
            );

            gl::LinkProgram(program);
        }

        let mut link_status: GLint = 0;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut link_status);
        }

        if link_status == gl::FALSE as GLint {
            let diagnostic = program_info_log(program);
            unsafe {
                gl::DeleteProgram(program);
                gl::DeleteShader(vertex);
                gl::DeleteShader(fragment);
            }
            bail!("shader program link failed: {diagnostic}");
        }

        // Uniform locations are only meaningful after a successful link.
        let (mvp_uniform, sampler_uniform) = unsafe {
            (
                gl::GetUniformLocation(program, c"mvpMatrix".as_ptr().cast()),
                gl::GetUniformLocation(program, c"textureSampler0".as_ptr().cast()),
            )
        };

        Ok(Self {
            program,
            vertex,
            fragment,
            mvp_uniform,
            sampler_uniform,
        })
    }

    pub fn id(&self) -> GLuint {
        self.program
    }

    /// Location of the 4x4 model-view-projection uniform.
    pub fn mvp_uniform(&self) -> GLint {
        self.mvp_uniform
    }

    /// Location of the sampler-index uniform.
    pub fn sampler_uniform(&self) -> GLint {
        self.sampler_uniform
    }

    /// Detaches and deletes shaders and program. Idempotent.
    pub fn release(&mut self) {
        unsafe {
            if self.program != 0 {
                if self.vertex != 0 {
                    gl::DetachShader(self.program, self.vertex);
                }
                if self.fragment != 0 {
                    gl::DetachShader(self.program, self.fragment);
                }
            }

            if self.vertex != 0 {
                gl::DeleteShader(self.vertex);
                self.vertex = 0;
            }

            if self.fragment != 0 {
                gl::DeleteShader(self.fragment);
                self.fragment = 0;
            }

            if self.program != 0 {
                gl::DeleteProgram(self.program);
                self.program = 0;
            }
        }
    }
}

impl Default for ShaderProgram {
    /// A released program; all handles at their sentinels.
    fn default() -> Self {
        Self {
            program: 0,
            vertex: 0,
            fragment: 0,
            mvp_uniform: -1,
            sampler_uniform: -1,
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.release();
    }
}

fn compile_shader(kind: GLenum, source: &str) -> Result<GLuint> {
    let shader = unsafe { gl::CreateShader(kind) };

    let source = CString::new(source).context("shader source contains NUL")?;
    unsafe {
        gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
        gl::CompileShader(shader);
    }

    let mut compile_status: GLint = 0;
    unsafe {
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut compile_status);
    }

    if compile_status == gl::FALSE as GLint {
        let diagnostic = shader_info_log(shader);
        unsafe {
            gl::DeleteShader(shader);
        }
        bail!("{diagnostic}");
    }

    Ok(shader)
}

fn shader_info_log(shader: GLuint) -> String {
    let mut length: GLint = 0;
    unsafe {
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut length);
    }

    if length <= 0 {
        return String::from("(no diagnostic reported)");
    }

    let mut buffer = vec![0u8; length as usize];
    unsafe {
        gl::GetShaderInfoLog(shader, length, ptr::null_mut(), buffer.as_mut_ptr().cast());
    }

    c_buffer_to_string(buffer)
}

fn program_info_log(program: GLuint) -> String {
    let mut length: GLint = 0;
    unsafe {
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length);
    }

    if length <= 0 {
        return String::from("(no diagnostic reported)");
    }

    let mut buffer = vec![0u8; length as usize];
    unsafe {
        gl::GetProgramInfoLog(program, length, ptr::null_mut(), buffer.as_mut_ptr().cast());
    }

    c_buffer_to_string(buffer)
}

fn c_buffer_to_string(mut buffer: Vec<u8>) -> String {
    if let Some(end) = buffer.iter().position(|&b| b == 0) {
        buffer.truncate(end);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_slots_follow_convention() {
        // Position and texcoord are deliberately non-contiguous; color and
        // normal sit between them.
        assert_eq!(ATTRIB_POSITION, 0);
        assert_eq!(ATTRIB_COLOR, 1);
        assert_eq!(ATTRIB_NORMAL, 2);
        assert_eq!(ATTRIB_TEXCOORD0, 3);
    }

    #[test]
    fn shader_sources_declare_bound_attributes() {
        assert!(VERTEX_SHADER_SRC.contains("vertexPosition"));
        assert!(VERTEX_SHADER_SRC.contains("vertexTextureCoordinate0"));
        assert!(VERTEX_SHADER_SRC.contains("mvpMatrix"));
        assert!(FRAGMENT_SHADER_SRC.contains("textureSampler0"));
    }

    #[test]
    fn release_on_default_program_is_noop() {
        let mut program = ShaderProgram::default();
        program.release();
        program.release();

        assert_eq!(program.program, 0);
        assert_eq!(program.vertex, 0);
        assert_eq!(program.fragment, 0);
    }

    #[test]
    fn info_log_buffer_truncates_at_nul() {
        let buffer = b"error: bad shader\0\0\0".to_vec();
        assert_eq!(c_buffer_to_string(buffer), "error: bad shader");
    }
}
