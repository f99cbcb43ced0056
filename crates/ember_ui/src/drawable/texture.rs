//! Single textured box.

use ember_shared::{Colour, Matrix3, Vec2};

use super::{Drawable, TextureInfo};
use crate::render::{CanvasRenderer, Uvs};

/// Stretches one texture region over the whole widget.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDrawable {
    texture: TextureInfo,
    uvs: Uvs,
}

impl TextureDrawable {
    /// Draws the whole texture.
    #[must_use]
    pub fn new(texture: TextureInfo) -> Self {
        Self {
            texture,
            uvs: Uvs::FULL,
        }
    }

    /// Restricts drawing to a texture sub-rectangle.
    #[must_use]
    pub const fn with_uvs(mut self, uvs: Uvs) -> Self {
        self.uvs = uvs;
        self
    }
}

impl Drawable for TextureDrawable {
    fn preferred_size(&self) -> Vec2 {
        self.texture.size * self.uvs.extent()
    }

    fn draw(&self, renderer: &mut dyn CanvasRenderer, transform: &Matrix3, size: Vec2, colour: Colour) {
        renderer.draw_box(transform, size, Vec2::ZERO, self.texture.id, self.uvs, colour);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingRenderer, RenderCommand, TextureId};

    #[test]
    fn test_preferred_size_follows_uvs() {
        let drawable = TextureDrawable::new(TextureInfo::new(TextureId(1), Vec2::new(256.0, 128.0)))
            .with_uvs(Uvs::new(0.0, 0.0, 0.5, 0.25));

        assert_eq!(drawable.preferred_size(), Vec2::new(128.0, 32.0));
    }

    #[test]
    fn test_draws_one_box() {
        let drawable = TextureDrawable::new(TextureInfo::new(TextureId(7), Vec2::new(16.0, 16.0)));
        let mut renderer = RecordingRenderer::new();

        drawable.draw(&mut renderer, &Matrix3::IDENTITY, Vec2::new(40.0, 20.0), Colour::RED);

        assert_eq!(
            renderer.commands(),
            &[RenderCommand::Box {
                transform: Matrix3::IDENTITY,
                size: Vec2::new(40.0, 20.0),
                offset: Vec2::ZERO,
                texture: TextureId(7),
                uvs: Uvs::FULL,
                colour: Colour::RED,
                clip: None,
            }]
        );
    }
}
