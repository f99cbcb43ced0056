//! Rendering boundary.
//!
//! Widgets never talk to the GPU. Drawables issue textured boxes to a
//! [`CanvasRenderer`]; the canvas asks a [`Screen`] for its resolution when
//! culling. [`RecordingRenderer`] records the calls as [`RenderCommand`]s.

use ember_shared::{Colour, Matrix3, Vec2};

/// Handle to a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

/// Texture sub-rectangle: origin `(u, v)` and extent `(s, t)`.
///
/// `v` runs top-down, as texture atlases are authored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uvs {
    /// Left edge.
    pub u: f32,
    /// Top edge.
    pub v: f32,
    /// Width.
    pub s: f32,
    /// Height.
    pub t: f32,
}

impl Uvs {
    /// The whole texture.
    pub const FULL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Creates UVs from origin and extent.
    #[must_use]
    pub const fn new(u: f32, v: f32, s: f32, t: f32) -> Self {
        Self { u, v, s, t }
    }

    /// Extent as a vector.
    #[must_use]
    pub const fn extent(self) -> Vec2 {
        Vec2::new(self.s, self.t)
    }
}

impl Default for Uvs {
    fn default() -> Self {
        Self::FULL
    }
}

/// Supplies the current canvas resolution.
pub trait Screen {
    /// Resolution in canvas units.
    fn resolution(&self) -> Vec2;
}

/// A screen with a fixed resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScreen(pub Vec2);

impl Screen for FixedScreen {
    fn resolution(&self) -> Vec2 {
        self.0
    }
}

/// Receives draw and clip calls from the widget tree.
pub trait CanvasRenderer {
    /// Draws a textured box of `size` centred at `offset` in the space of
    /// `transform`.
    fn draw_box(&mut self, transform: &Matrix3, size: Vec2, offset: Vec2, texture: TextureId, uvs: Uvs, colour: Colour);

    /// Restricts subsequent drawing to the intersection of the current clip
    /// region and the world-space box at `bottom_left` with `size`.
    fn push_clip_bounds(&mut self, bottom_left: Vec2, size: Vec2);

    /// Restores the clip region from before the matching push.
    fn pop_clip_bounds(&mut self);
}

/// An axis-aligned rectangle, y-up, anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from its bottom-left corner and size.
    #[must_use]
    pub const fn from_corner_size(bottom_left: Vec2, size: Vec2) -> Self {
        Self::new(bottom_left.x, bottom_left.y, size.x, size.y)
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.top()
    }

    /// Returns true if two rectangles intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right() && self.right() > other.x && self.y < other.top() && self.top() > other.y
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());

        Some(Self::new(x, y, right - x, top - y))
    }
}

/// A recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Textured box.
    Box {
        /// Space the box is drawn in.
        transform: Matrix3,
        /// Box size.
        size: Vec2,
        /// Box centre within `transform`'s space.
        offset: Vec2,
        /// Texture.
        texture: TextureId,
        /// Texture sub-rectangle.
        uvs: Uvs,
        /// Tint.
        colour: Colour,
        /// Active clip region, if any.
        clip: Option<Rect>,
    },
    /// Scissor rect (clip children), already intersected with its parent.
    PushClip {
        /// Clip bounds.
        bounds: Rect,
    },
    /// Pop scissor rect.
    PopClip,
}

/// Renderer that records every call, for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<RenderCommand>,
    clip_stack: Vec<Rect>,
}

impl RecordingRenderer {
    /// Creates a new recording renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(256),
            clip_stack: Vec::with_capacity(8),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
    }

    /// Commands recorded since the last `begin_frame`.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the renderer empty.
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of boxes recorded.
    #[must_use]
    pub fn box_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::Box { .. }))
            .count()
    }

    /// Returns the current clip rect.
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }
}

impl CanvasRenderer for RecordingRenderer {
    fn draw_box(&mut self, transform: &Matrix3, size: Vec2, offset: Vec2, texture: TextureId, uvs: Uvs, colour: Colour) {
        self.commands.push(RenderCommand::Box {
            transform: *transform,
            size,
            offset,
            texture,
            uvs,
            colour,
            clip: self.current_clip(),
        });
    }

    fn push_clip_bounds(&mut self, bottom_left: Vec2, size: Vec2) {
        let bounds = Rect::from_corner_size(bottom_left, size);
        // Intersect with current clip if any
        let actual_clip = match self.clip_stack.last() {
            Some(current) => current.intersection(&bounds).unwrap_or(Rect::ZERO),
            None => bounds,
        };

        self.clip_stack.push(actual_clip);
        self.commands.push(RenderCommand::PushClip { bounds: actual_clip });
    }

    fn pop_clip_bounds(&mut self) {
        self.clip_stack.pop();
        self.commands.push(RenderCommand::PopClip);
    }
}
