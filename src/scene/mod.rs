//! The fixed scene: one textured quad.

mod quad;
mod texture;

pub use quad::QuadGeometry;
pub use texture::Texture;

use anyhow::Result;
use std::path::Path;

/// GPU residency for the scene's geometry and texture.
pub struct Scene {
    pub geometry: QuadGeometry,
    pub texture: Texture,
}

impl Scene {
    /// Uploads the quad and loads the texture.
    ///
    /// A texture decode failure is non-fatal: rendering continues with
    /// texture id 0 and the failure is logged as a warning.
    pub fn create(texture_path: &Path) -> Result<Self> {
        let geometry = QuadGeometry::upload()?;

        let texture = match Texture::load(texture_path) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!(
                    "texture {} failed to load, rendering untextured: {e:#}",
                    texture_path.display()
                );
                Texture::default()
            }
        };

        Ok(Self { geometry, texture })
    }

    /// Releases texture then geometry. Idempotent.
    pub fn release(&mut self) {
        self.texture.release();
        self.geometry.release();
    }
}
