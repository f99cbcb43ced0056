//! Drawable strategies.
//!
//! A drawable knows how to render a widget's visuals and what size it would
//! like to be. It keeps no widget geometry: the tree hands it the final
//! transform, size and colour on every draw.

mod patch;
mod texture;

use std::collections::HashMap;

pub use patch::{NinePatchDrawable, NinePatchInsets, Patch, ThreePatchDrawable};
pub use texture::TextureDrawable;

use ember_shared::{Colour, Matrix3, Vec2};
use tracing::warn;

use crate::error::{UiError, UiResult};
use crate::layout::{descriptor_properties, descriptor_type, Direction};
use crate::property::{PropertyDesc, PropertyMap, PropertyType};
use crate::render::{CanvasRenderer, TextureId, Uvs};

/// Renders a widget's visuals.
pub trait Drawable: std::fmt::Debug {
    /// Size the drawable would like to be, from its own content.
    fn preferred_size(&self) -> Vec2;

    /// Issues draw calls for a widget with the given final transform, size and
    /// colour.
    fn draw(&self, renderer: &mut dyn CanvasRenderer, transform: &Matrix3, size: Vec2, colour: Colour);
}

/// A texture known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureInfo {
    /// Renderer handle.
    pub id: TextureId,
    /// Size in pixels.
    pub size: Vec2,
}

impl TextureInfo {
    /// Creates texture info.
    #[must_use]
    pub const fn new(id: TextureId, size: Vec2) -> Self {
        Self { id, size }
    }
}

/// Resolves texture names used in drawable descriptors.
pub trait TextureSource {
    /// Looks up a texture by name.
    fn texture(&self, name: &str) -> Option<TextureInfo>;
}

impl TextureSource for HashMap<String, TextureInfo> {
    fn texture(&self, name: &str) -> Option<TextureInfo> {
        self.get(name).copied()
    }
}

/// A texture source that knows no textures.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextures;

impl TextureSource for NoTextures {
    fn texture(&self, _name: &str) -> Option<TextureInfo> {
        None
    }
}

const TEXTURE_DESCS: &[PropertyDesc] = &[
    PropertyDesc::new(PropertyType::String, "Type", "Texture"),
    PropertyDesc::new(PropertyType::String, "TextureLocation", ""),
    PropertyDesc::new(PropertyType::Vec4, "UVs", "0 0 1 1"),
];

const NINE_PATCH_DESCS: &[PropertyDesc] = &[
    PropertyDesc::new(PropertyType::String, "Type", "NinePatch"),
    PropertyDesc::new(PropertyType::String, "TextureLocation", ""),
    PropertyDesc::new(PropertyType::Vec4, "UVs", "0 0 1 1"),
    PropertyDesc::new(PropertyType::Vec4, "Insets", "0.01 0.01 0.01 0.01"),
];

const THREE_PATCH_DESCS: &[PropertyDesc] = &[
    PropertyDesc::new(PropertyType::String, "Type", "ThreePatch"),
    PropertyDesc::new(PropertyType::String, "TextureLocation", ""),
    PropertyDesc::new(PropertyType::Vec4, "UVs", "0 0 1 1"),
    PropertyDesc::new(PropertyType::String, "Direction", "Horizontal"),
    PropertyDesc::new(PropertyType::Vec2, "Insets", "0.01 0.01"),
];

/// Builds a drawable from a descriptor table such as
/// `{ Type = "NinePatch", TextureLocation = "button", Insets = "0.1 0.1 0.2 0.2" }`.
///
/// `Type = "None"` yields `Ok(None)`. A texture name the source does not know
/// is logged and also yields `Ok(None)`, leaving the widget undrawn.
///
/// # Errors
///
/// Returns [`UiError::InvalidDescriptor`] for an unknown type, an unknown key
/// or a malformed value.
pub fn drawable_from_desc(desc: &toml::Table, textures: &dyn TextureSource) -> UiResult<Option<Box<dyn Drawable>>> {
    let drawable: Box<dyn Drawable> = match descriptor_type(desc)? {
        "None" => return Ok(None),
        "Texture" => {
            let props = descriptor_properties("Texture", TEXTURE_DESCS, desc)?;
            let Some(texture) = resolve_texture(&props, textures)? else {
                return Ok(None);
            };
            Box::new(TextureDrawable::new(texture).with_uvs(uvs(&props)?))
        }
        "NinePatch" => {
            let props = descriptor_properties("NinePatch", NINE_PATCH_DESCS, desc)?;
            let Some(texture) = resolve_texture(&props, textures)? else {
                return Ok(None);
            };
            let insets = NinePatchInsets::from_array(props.get("Insets")?);
            Box::new(NinePatchDrawable::new(texture, insets)?.with_uvs(uvs(&props)?))
        }
        "ThreePatch" => {
            let props = descriptor_properties("ThreePatch", THREE_PATCH_DESCS, desc)?;
            let Some(texture) = resolve_texture(&props, textures)? else {
                return Ok(None);
            };
            let direction: Direction = props
                .get::<String>("Direction")?
                .parse()
                .map_err(|direction| UiError::InvalidDescriptor(format!("ThreePatch: unknown direction {direction:?}")))?;
            let insets: Vec2 = props.get("Insets")?;
            Box::new(ThreePatchDrawable::new(texture, direction, insets.x, insets.y)?.with_uvs(uvs(&props)?))
        }
        other => return Err(UiError::InvalidDescriptor(format!("unknown drawable type {other:?}"))),
    };
    Ok(Some(drawable))
}

fn resolve_texture(props: &PropertyMap, textures: &dyn TextureSource) -> UiResult<Option<TextureInfo>> {
    let name: String = props.get("TextureLocation")?;
    let texture = textures.texture(&name);
    if texture.is_none() {
        warn!(texture = %name, "drawable names an unknown texture");
    }
    Ok(texture)
}

fn uvs(props: &PropertyMap) -> UiResult<Uvs> {
    let [u, v, s, t]: [f32; 4] = props.get("UVs")?;
    Ok(Uvs::new(u, v, s, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;

    fn textures() -> HashMap<String, TextureInfo> {
        HashMap::from([("panel".to_string(), TextureInfo::new(TextureId(5), Vec2::new(64.0, 32.0)))])
    }

    fn table(src: &str) -> toml::Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn test_texture_from_desc() {
        let drawable = drawable_from_desc(
            &table(
                r#"
                Type = "Texture"
                TextureLocation = "panel"
                UVs = "0 0 0.5 1"
                "#,
            ),
            &textures(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(drawable.preferred_size(), Vec2::new(32.0, 32.0));
    }

    #[test]
    fn test_nine_patch_from_desc() {
        let drawable = drawable_from_desc(
            &table(
                r#"
                Type = "NinePatch"
                TextureLocation = "panel"
                Insets = [0.25, 0.25, 0.25, 0.25]
                "#,
            ),
            &textures(),
        )
        .unwrap()
        .unwrap();

        let mut renderer = RecordingRenderer::new();
        drawable.draw(&mut renderer, &Matrix3::IDENTITY, Vec2::new(100.0, 100.0), Colour::WHITE);
        assert_eq!(renderer.box_count(), 9);
    }

    #[test]
    fn test_three_patch_from_desc() {
        let drawable = drawable_from_desc(
            &table(
                r#"
                Type = "ThreePatch"
                TextureLocation = "panel"
                Direction = "Vertical"
                Insets = "0.2 0.2"
                "#,
            ),
            &textures(),
        )
        .unwrap()
        .unwrap();

        let mut renderer = RecordingRenderer::new();
        drawable.draw(&mut renderer, &Matrix3::IDENTITY, Vec2::new(10.0, 100.0), Colour::WHITE);
        assert_eq!(renderer.box_count(), 3);
    }

    #[test]
    fn test_unknown_texture_yields_nothing() {
        let drawable = drawable_from_desc(
            &table(
                r#"
                Type = "Texture"
                TextureLocation = "missing"
                "#,
            ),
            &textures(),
        )
        .unwrap();

        assert!(drawable.is_none());
        assert!(drawable_from_desc(&table(r#"Type = "None""#), &NoTextures).unwrap().is_none());
    }

    #[test]
    fn test_bad_drawable_descriptors() {
        assert!(matches!(
            drawable_from_desc(&table(r#"Type = "Sprite""#), &textures()),
            Err(UiError::InvalidDescriptor(_))
        ));
        assert!(matches!(
            drawable_from_desc(
                &table(
                    r#"
                    Type = "NinePatch"
                    TextureLocation = "panel"
                    Insets = "0.9 0.9 0 0"
                    "#
                ),
                &textures()
            ),
            Err(UiError::InvalidDescriptor(_))
        ));
    }
}
