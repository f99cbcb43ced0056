//! Nine-patch and three-patch drawables.
//!
//! The texture is cut into a grid by normalised insets. Corner (cap) patches
//! keep their texture size and the remaining patches stretch to fill the
//! widget. When the widget is smaller than the caps, the caps shrink
//! proportionally and the stretched patches collapse to zero.

use ember_shared::{Colour, Matrix3, Vec2};

use super::{Drawable, TextureInfo};
use crate::error::{UiError, UiResult};
use crate::layout::Direction;
use crate::render::{CanvasRenderer, Uvs};

/// One piece of a patch drawable, relative to the widget centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    /// Centre of the piece relative to the widget centre.
    pub offset: Vec2,
    /// Size of the piece.
    pub size: Vec2,
    /// Texture region of the piece.
    pub uvs: Uvs,
}

/// Nine-patch insets as fractions of the texture region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NinePatchInsets {
    /// Left column width.
    pub left: f32,
    /// Right column width.
    pub right: f32,
    /// Top row height.
    pub top: f32,
    /// Bottom row height.
    pub bottom: f32,
}

impl NinePatchInsets {
    /// Same inset on every side.
    #[must_use]
    pub const fn uniform(inset: f32) -> Self {
        Self {
            left: inset,
            right: inset,
            top: inset,
            bottom: inset,
        }
    }

    /// Builds insets from `[left, right, top, bottom]`.
    #[must_use]
    pub const fn from_array([left, right, top, bottom]: [f32; 4]) -> Self {
        Self { left, right, top, bottom }
    }

    fn validate(self) -> UiResult<Self> {
        validate_pair("NinePatch", self.left, self.right)?;
        validate_pair("NinePatch", self.top, self.bottom)?;
        Ok(self)
    }
}

/// Scales a box with fixed corners and stretched edges and centre.
#[derive(Debug, Clone, PartialEq)]
pub struct NinePatchDrawable {
    texture: TextureInfo,
    uvs: Uvs,
    insets: NinePatchInsets,
}

impl NinePatchDrawable {
    /// Creates a nine-patch over the whole texture.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidDescriptor`] if an inset lies outside
    /// `[0, 1]` or opposite insets overlap.
    pub fn new(texture: TextureInfo, insets: NinePatchInsets) -> UiResult<Self> {
        Ok(Self {
            texture,
            uvs: Uvs::FULL,
            insets: insets.validate()?,
        })
    }

    /// Restricts the patch to a texture sub-rectangle.
    #[must_use]
    pub const fn with_uvs(mut self, uvs: Uvs) -> Self {
        self.uvs = uvs;
        self
    }

    /// The nine pieces for a widget of `size`, top row first, left to right.
    #[must_use]
    pub fn patches(&self, size: Vec2) -> [Patch; 9] {
        let preferred = self.preferred_size();
        let insets = self.insets;
        let columns = Span::new(size.x, preferred.x * insets.left, preferred.x * insets.right);
        let rows = Span::new(size.y, preferred.y * insets.top, preferred.y * insets.bottom);
        let u_bands = bands(self.uvs.u, self.uvs.s, insets.left, insets.right);
        let v_bands = bands(self.uvs.v, self.uvs.t, insets.top, insets.bottom);

        std::array::from_fn(|index| {
            let (row, column) = (index / 3, index % 3);
            let (x, width) = columns.ascending(column);
            let (y, height) = rows.descending(row);
            let (u, s) = u_bands[column];
            let (v, t) = v_bands[row];
            Patch {
                offset: Vec2::new(x, y),
                size: Vec2::new(width, height),
                uvs: Uvs::new(u, v, s, t),
            }
        })
    }
}

impl Drawable for NinePatchDrawable {
    fn preferred_size(&self) -> Vec2 {
        self.texture.size * self.uvs.extent()
    }

    fn draw(&self, renderer: &mut dyn CanvasRenderer, transform: &Matrix3, size: Vec2, colour: Colour) {
        for patch in self.patches(size) {
            renderer.draw_box(transform, patch.size, patch.offset, self.texture.id, patch.uvs, colour);
        }
    }
}

/// Scales a bar with fixed end caps and a stretched middle.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreePatchDrawable {
    texture: TextureInfo,
    uvs: Uvs,
    direction: Direction,
    start: f32,
    end: f32,
}

impl ThreePatchDrawable {
    /// Creates a three-patch over the whole texture. `start` and `end` are the
    /// cap insets: left and right for horizontal bars, top and bottom for
    /// vertical ones.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidDescriptor`] if an inset lies outside
    /// `[0, 1]` or the two insets overlap.
    pub fn new(texture: TextureInfo, direction: Direction, start: f32, end: f32) -> UiResult<Self> {
        validate_pair("ThreePatch", start, end)?;
        Ok(Self {
            texture,
            uvs: Uvs::FULL,
            direction,
            start,
            end,
        })
    }

    /// Restricts the patch to a texture sub-rectangle.
    #[must_use]
    pub const fn with_uvs(mut self, uvs: Uvs) -> Self {
        self.uvs = uvs;
        self
    }

    /// The three pieces for a widget of `size`, left-to-right or top-to-bottom.
    #[must_use]
    pub fn patches(&self, size: Vec2) -> [Patch; 3] {
        let preferred = self.preferred_size();
        let uvs = self.uvs;

        match self.direction {
            Direction::Horizontal => {
                let span = Span::new(size.x, preferred.x * self.start, preferred.x * self.end);
                let u_bands = bands(uvs.u, uvs.s, self.start, self.end);
                std::array::from_fn(|index| {
                    let (x, width) = span.ascending(index);
                    let (u, s) = u_bands[index];
                    Patch {
                        offset: Vec2::new(x, 0.0),
                        size: Vec2::new(width, size.y),
                        uvs: Uvs::new(u, uvs.v, s, uvs.t),
                    }
                })
            }
            Direction::Vertical => {
                let span = Span::new(size.y, preferred.y * self.start, preferred.y * self.end);
                let v_bands = bands(uvs.v, uvs.t, self.start, self.end);
                std::array::from_fn(|index| {
                    let (y, height) = span.descending(index);
                    let (v, t) = v_bands[index];
                    Patch {
                        offset: Vec2::new(0.0, y),
                        size: Vec2::new(size.x, height),
                        uvs: Uvs::new(uvs.u, v, uvs.s, t),
                    }
                })
            }
        }
    }
}

impl Drawable for ThreePatchDrawable {
    fn preferred_size(&self) -> Vec2 {
        self.texture.size * self.uvs.extent()
    }

    fn draw(&self, renderer: &mut dyn CanvasRenderer, transform: &Matrix3, size: Vec2, colour: Colour) {
        for patch in self.patches(size) {
            renderer.draw_box(transform, patch.size, patch.offset, self.texture.id, patch.uvs, colour);
        }
    }
}

/// One axis cut into start cap, stretched middle and end cap.
#[derive(Debug, Clone, Copy)]
struct Span {
    half: f32,
    start: f32,
    middle: f32,
    end: f32,
}

impl Span {
    fn new(length: f32, start: f32, end: f32) -> Self {
        let caps = start + end;
        let (start, end) = if caps > length && caps > 0.0 {
            let shrink = length / caps;
            (start * shrink, end * shrink)
        } else {
            (start, end)
        };
        Self {
            half: length * 0.5,
            start,
            middle: (length - start - end).max(0.0),
            end,
        }
    }

    /// `(centre, length)` of a piece, pieces running in the positive direction.
    fn ascending(self, piece: usize) -> (f32, f32) {
        match piece {
            0 => (-self.half + self.start * 0.5, self.start),
            1 => (-self.half + self.start + self.middle * 0.5, self.middle),
            _ => (self.half - self.end * 0.5, self.end),
        }
    }

    /// `(centre, length)` of a piece, pieces running in the negative direction.
    fn descending(self, piece: usize) -> (f32, f32) {
        let (centre, length) = self.ascending(piece);
        (-centre, length)
    }
}

/// `(origin, extent)` of the three texture bands along one axis.
fn bands(origin: f32, extent: f32, start: f32, end: f32) -> [(f32, f32); 3] {
    [
        (origin, extent * start),
        (origin + extent * start, extent * (1.0 - start - end)),
        (origin + extent * (1.0 - end), extent * end),
    ]
}

fn validate_pair(kind: &str, start: f32, end: f32) -> UiResult<()> {
    let in_range = |inset: f32| (0.0..=1.0).contains(&inset);
    if in_range(start) && in_range(end) && start + end <= 1.0 {
        Ok(())
    } else {
        Err(UiError::InvalidDescriptor(format!("{kind}: invalid insets {start} and {end}")))
    }
}
