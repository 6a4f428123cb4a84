//! Texture decode and upload.

use std::path::Path;

use anyhow::{Context, Result};
use gl::types::{GLint, GLsizei, GLuint};

/// A GPU-resident mipmapped 2D texture.
///
/// Id 0 means "no texture"; drawing with it samples undefined/black, which
/// is the documented degraded mode after a decode failure.
#[derive(Default)]
pub struct Texture {
    id: GLuint,
}

impl Texture {
    /// Decodes `path` into RGB pixels and uploads them with a full mipmap
    /// chain. On decode failure no GPU allocation happens.
    pub fn load(path: &Path) -> Result<Self> {
        let decoded = image::open(path)
            .with_context(|| format!("failed to decode {}", path.display()))?
            .to_rgb8();

        let (width, height) = decoded.dimensions();
        let pixels = decoded.into_raw();

        let mut id: GLuint = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as GLint,
            );

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGB as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                gl::RGB,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr().cast(),
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);

            // Unbind so this texture does not leak into unrelated bind state.
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }

        log::info!("texture {} loaded ({width}x{height})", path.display());

        Ok(Self { id })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Deletes the texture. Idempotent.
    pub fn release(&mut self) {
        if self.id != 0 {
            unsafe {
                gl::DeleteTextures(1, &self.id);
            }
            self.id = 0;
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_is_an_error() {
        // Decode failure must not allocate; the returned error carries the path.
        let result = Texture::load(Path::new("definitely/not/here.bmp"));
        assert!(result.is_err());
    }

    #[test]
    fn release_on_default_texture_is_noop() {
        let mut texture = Texture::default();
        texture.release();
        texture.release();
        assert_eq!(texture.id, 0);
    }
}
