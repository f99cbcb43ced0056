//! Per-frame update and draw walks.

use ember_shared::Vec2;

use super::node::{ChildKind, WidgetFlags};
use super::{WidgetId, WidgetTree};
use crate::anchor::AlignmentAnchor;
use crate::error::UiResult;
use crate::render::{CanvasRenderer, Screen};

impl WidgetTree {
    /// Runs the behaviour update hook on the widget, then on its internal
    /// children, then on its ordinary children.
    ///
    /// Hooks may restructure the tree; each child list is walked from a
    /// snapshot and widgets destroyed along the way are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`](crate::UiError::UnknownWidget) for a
    /// dead handle.
    pub fn update(&mut self, id: WidgetId, dt: f32) -> UiResult<()> {
        self.node(id)?;
        self.call_behaviour(id, |behaviour, tree| behaviour.on_update(tree, id, dt));

        for kind in ChildKind::DRAW_ORDER {
            let Some(node) = self.nodes.get(&id) else {
                return Ok(());
            };
            let children = node.list(kind).widgets.clone();
            for child in children {
                if self.contains_widget(child) {
                    self.update(child, dt)?;
                }
            }
        }
        Ok(())
    }

    /// Draws the widget and its subtree in painter's order: the widget's own
    /// drawable, its internal children, then its ordinary children.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NotAttached`](crate::UiError::NotAttached) if the
    /// widget is not on a canvas.
    pub fn draw(&self, id: WidgetId, renderer: &mut dyn CanvasRenderer, screen: &dyn Screen) -> UiResult<()> {
        let node = self.node(id)?;
        if !node.flags.has(WidgetFlags::VISIBLE) {
            return Ok(());
        }

        let size = self.final_size(id)?;
        if let Some(drawable) = &node.drawable {
            if !should_cull(self.final_position(id)?, size, screen.resolution()) {
                drawable.draw(renderer, &self.final_transform(id)?, size, self.final_colour(id)?);
            }
        }

        let clipping = node.flags.has(WidgetFlags::CLIP_CHILDREN);
        if clipping {
            let bottom_left = AlignmentAnchor::BottomLeft.anchor_point(size * 0.5) + self.final_position(id)?;
            renderer.push_clip_bounds(bottom_left, size);
        }

        for kind in ChildKind::DRAW_ORDER {
            for &child in &node.list(kind).widgets {
                self.draw(child, renderer, screen)?;
            }
        }

        if clipping {
            renderer.pop_clip_bounds();
        }
        Ok(())
    }
}

/// True if a widget is entirely off screen. Bounds are treated as a square of
/// the larger half-extent so rotation can be ignored.
fn should_cull(position: Vec2, size: Vec2, resolution: Vec2) -> bool {
    let half = size.x.max(size.y) * 0.5;
    let bottom_left = position - Vec2::new(half, half);
    let top_right = position + Vec2::new(half, half);

    top_right.y < 0.0 || bottom_left.y > resolution.y || top_right.x < 0.0 || bottom_left.x > resolution.x
}
