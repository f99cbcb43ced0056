//! Canvas roots.
//!
//! A canvas is an ordinary widget that is its own canvas. It spans the screen:
//! its size is the resolution and its centre sits at half the resolution, so
//! world space has its origin at the screen's bottom-left corner.

use ember_shared::Vec2;
use tracing::debug;

use super::{WidgetId, WidgetTree};
use crate::error::{UiError, UiResult};

impl WidgetTree {
    /// Creates a canvas root covering a screen of `resolution`.
    pub fn create_canvas(&mut self, resolution: Vec2) -> WidgetId {
        let id = self.create_widget();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = "Canvas".to_string();
            node.canvas = Some(id);
            node.local.absolute_size = resolution;
            node.local.absolute_position = resolution * 0.5;
        }
        debug!(canvas = %id, width = resolution.x, height = resolution.y, "canvas created");
        id
    }

    /// Follows a screen resolution change, re-resolving the whole canvas.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidChild`] if `id` is not a canvas root.
    pub fn resize_canvas(&mut self, id: WidgetId, resolution: Vec2) -> UiResult<()> {
        let node = self.node_mut(id)?;
        if !node.is_canvas(id) {
            return Err(UiError::InvalidChild { child: id, parent: id });
        }
        node.local.absolute_size = resolution;
        node.local.absolute_position = resolution * 0.5;
        debug!(canvas = %id, width = resolution.x, height = resolution.y, "canvas resized");
        self.invalidate(id)
    }

    /// Returns true if the widget is a canvas root.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn is_canvas(&self, id: WidgetId) -> UiResult<bool> {
        Ok(self.node(id)?.is_canvas(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AlignmentAnchor;

    #[test]
    fn test_canvas_covers_screen() {
        let mut tree = WidgetTree::new();
        let canvas = tree.create_canvas(Vec2::new(800.0, 600.0));

        assert!(tree.is_canvas(canvas).unwrap());
        assert_eq!(tree.name(canvas).unwrap(), "Canvas");
        assert_eq!(tree.canvas(canvas).unwrap(), Some(canvas));
        assert_eq!(tree.final_size(canvas).unwrap(), Vec2::new(800.0, 600.0));
        assert_eq!(tree.final_position(canvas).unwrap(), Vec2::new(400.0, 300.0));
        assert!(!tree.is_input_enabled(canvas).unwrap());
    }

    #[test]
    fn test_resize_moves_anchored_children() {
        let mut tree = WidgetTree::new();
        let canvas = tree.create_canvas(Vec2::new(800.0, 600.0));
        let corner = tree.create_widget();
        tree.set_absolute_size(corner, Vec2::new(10.0, 10.0)).unwrap();
        tree.set_parental_anchor(corner, AlignmentAnchor::TopRight).unwrap();
        tree.set_origin_anchor(corner, AlignmentAnchor::TopRight).unwrap();
        tree.add_widget(canvas, corner).unwrap();
        assert_eq!(tree.final_position(corner).unwrap(), Vec2::new(795.0, 595.0));

        tree.resize_canvas(canvas, Vec2::new(1024.0, 768.0)).unwrap();

        assert_eq!(tree.final_position(corner).unwrap(), Vec2::new(1019.0, 763.0));
    }

    #[test]
    fn test_canvas_cannot_be_a_child() {
        let mut tree = WidgetTree::new();
        let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
        let other = tree.create_widget();

        assert_eq!(
            tree.add_widget(other, canvas),
            Err(UiError::InvalidChild { child: canvas, parent: other })
        );
        assert!(matches!(tree.resize_canvas(other, Vec2::ONE), Err(UiError::InvalidChild { .. })));
    }
}
