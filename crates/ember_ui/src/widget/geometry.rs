//! Geometry resolution: parent-relative declarations to world space.
//!
//! Sizes and positions are declared relative to the parent (or to the parent's
//! layout cell) and resolved lazily. World space is y-up with the canvas'
//! bottom-left corner at the origin. A widget's transform maps its local,
//! centre-origin space into world space; rotation pivots about the origin
//! anchor.
//!
//! Resolved values are cached per widget until [`WidgetTree::invalidate`]
//! marks them dirty.

use ember_shared::{Colour, Matrix3, Vec2};
use tracing::trace;

use super::node::Node;
use super::{WidgetId, WidgetTree};
use crate::anchor::AlignmentAnchor;
use crate::cache::SizeWatch;
use crate::error::{UiError, UiResult};

impl WidgetTree {
    /// Final size in canvas units, after layout, size policy and scale.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NotAttached`] if the widget is not on a canvas.
    pub fn final_size(&self, id: WidgetId) -> UiResult<Vec2> {
        let node = self.attached(id)?;
        if let Some(size) = node.cache.final_size() {
            return Ok(size);
        }

        let candidate = match node.parent {
            Some(parent) => self.calculate_child_final_size(parent, id)?,
            None => node.local.absolute_size,
        };
        let size = node.local.size_policy.apply(candidate, preferred_size_of(node)) * node.local.scale;

        node.cache.store_final_size(size);
        trace!(widget = %id, width = size.x, height = size.y, "final size resolved");
        Ok(size)
    }

    /// Size of `child` before its own size policy and scale: a share of the
    /// parent's size, or of its layout cell when the parent lays it out.
    fn calculate_child_final_size(&self, parent: WidgetId, child: WidgetId) -> UiResult<Vec2> {
        let parent_node = self.node(parent)?;
        let local = &self.node(child)?.local;
        let (kind, index) = parent_node.slot_of(child).ok_or(UiError::NotAChild { child, parent })?;

        let reference = match &parent_node.list(kind).layout {
            Some(layout) => layout.size_for_index(index),
            None => self.final_size(parent)?,
        };
        Ok(reference * local.relative_size + local.absolute_size)
    }

    /// Size the widget would like to be: its drawable's, if it has one,
    /// otherwise the explicit default.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn preferred_size(&self, id: WidgetId) -> UiResult<Vec2> {
        Ok(preferred_size_of(self.node(id)?))
    }

    /// Position of the widget's centre relative to its parent's centre.
    ///
    /// Without a parent layout the widget's origin anchor is placed at the
    /// parent's parental-anchor point, offset by relative (fraction of parent
    /// size) and absolute position. Under a layout the parental anchor and
    /// offsets apply to the widget's cell instead.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NotAttached`] off-canvas and [`UiError::NoParent`]
    /// for a root.
    pub fn parent_space_position(&self, id: WidgetId) -> UiResult<Vec2> {
        let node = self.attached(id)?;
        let parent = node.parent.ok_or(UiError::NoParent(id))?;
        let parent_node = self.node(parent)?;
        let local = &node.local;

        let parent_size = self.final_size(parent)?;
        let parent_half = parent_size * 0.5;
        let origin_offset = local.origin_anchor.align_offset(self.final_size(id)? * 0.5);

        let (kind, index) = parent_node.slot_of(id).ok_or(UiError::NotAChild { child: id, parent })?;
        let position = match &parent_node.list(kind).layout {
            None => {
                local.parental_anchor.anchor_point(parent_half)
                    + parent_size * local.relative_position
                    + local.absolute_position
            }
            Some(layout) => {
                let cell = layout.size_for_index(index);
                AlignmentAnchor::BottomLeft.anchor_point(parent_half)
                    + layout.position_for_index(index)
                    + local.parental_anchor.anchor_point(cell * 0.5)
                    + cell * local.relative_position
                    + local.absolute_position
            }
        };
        Ok(position + origin_offset)
    }

    /// Transform from the widget's local space into its parent's space.
    ///
    /// # Errors
    ///
    /// As [`parent_space_position`](Self::parent_space_position).
    pub fn local_transform(&self, id: WidgetId) -> UiResult<Matrix3> {
        let node = self.attached(id)?;
        if let Some(transform) = node.cache.local_transform() {
            return Ok(transform);
        }

        let pivot = node.local.origin_anchor.anchor_point(self.final_size(id)? * 0.5);
        let transform = Matrix3::translation(self.parent_space_position(id)? + pivot)
            * Matrix3::rotation(node.local.rotation)
            * Matrix3::translation(-pivot);

        node.cache.store_local_transform(transform);
        Ok(transform)
    }

    /// Transform from the widget's local space into world space.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NotAttached`] if the widget is not on a canvas.
    pub fn final_transform(&self, id: WidgetId) -> UiResult<Matrix3> {
        let node = self.attached(id)?;
        if let Some(transform) = node.cache.final_transform() {
            return Ok(transform);
        }

        let transform = if node.is_canvas(id) {
            Matrix3::from_translation_rotation(node.local.absolute_position, node.local.rotation)
        } else {
            let parent = node.parent.ok_or(UiError::NoParent(id))?;
            self.final_transform(parent)? * self.local_transform(id)?
        };

        node.cache.store_final_transform(transform);
        Ok(transform)
    }

    /// World position of the widget's centre.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NotAttached`] if the widget is not on a canvas.
    pub fn final_position(&self, id: WidgetId) -> UiResult<Vec2> {
        Ok(self.final_transform(id)?.get_translation())
    }

    /// Sum of local rotations up to the root.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn final_rotation(&self, id: WidgetId) -> UiResult<f32> {
        self.fold_ancestors(id, 0.0, |rotation, node| rotation + node.local.rotation)
    }

    /// Product of local scales up to the root.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn final_scale(&self, id: WidgetId) -> UiResult<Vec2> {
        self.fold_ancestors(id, Vec2::ONE, |scale, node| scale * node.local.scale)
    }

    /// Componentwise product of local colours up to the root.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn final_colour(&self, id: WidgetId) -> UiResult<Colour> {
        self.fold_ancestors(id, Colour::WHITE, |colour, node| colour * node.local.colour)
    }

    /// Returns true if the world-space point lies inside the widget's
    /// (possibly rotated) bounds, edges included.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NotAttached`] if the widget is not on a canvas.
    pub fn contains(&self, id: WidgetId, point: Vec2) -> UiResult<bool> {
        let half = self.final_size(id)? * 0.5;
        // A degenerate (zero-scale) transform covers no area.
        let Some(inverse) = self.final_transform(id)?.inverse() else {
            return Ok(false);
        };
        let local = inverse.transform_point(point);
        Ok(local.x >= -half.x && local.x <= half.x && local.y >= -half.y && local.y <= half.y)
    }

    /// Handle for reading the widget's resolved size from another thread.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn size_watch(&self, id: WidgetId) -> UiResult<SizeWatch> {
        Ok(self.node(id)?.cache.watch())
    }

    fn attached(&self, id: WidgetId) -> UiResult<&Node> {
        let node = self.node(id)?;
        if node.canvas.is_none() {
            return Err(UiError::NotAttached(id));
        }
        Ok(node)
    }

    fn fold_ancestors<T>(&self, id: WidgetId, init: T, mut f: impl FnMut(T, &Node) -> T) -> UiResult<T> {
        let mut acc = init;
        let mut current = Some(id);
        while let Some(widget) = current {
            let node = self.node(widget)?;
            acc = f(acc, node);
            current = node.parent;
        }
        Ok(acc)
    }
}

fn preferred_size_of(node: &Node) -> Vec2 {
    node.drawable
        .as_ref()
        .map_or(node.local.preferred_size, |drawable| drawable.preferred_size())
}
