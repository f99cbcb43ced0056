//! Pointer event dispatch.
//!
//! Events travel front-to-back: the topmost ordinary child sees a pointer
//! first, then the rest of the ordinary children, then the internal children,
//! and finally the widget itself. The shared [`InputFilter`] stops the walk as
//! soon as a consuming widget handles the event.

use tracing::trace;

use super::node::{ChildKind, WidgetFlags};
use super::{WidgetId, WidgetTree};
use crate::error::UiResult;
use crate::input::{InputFilter, InputType, Pointer, PointerId, WidgetEvent, WidgetEventKind};

impl WidgetTree {
    /// Delivers a pointer press to the subtree rooted at `id`.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NotAttached`](crate::UiError::NotAttached) if an
    /// input-enabled widget in the subtree is not on a canvas.
    pub fn on_pointer_down(
        &mut self,
        id: WidgetId,
        pointer: &Pointer,
        input: InputType,
        filter: &mut InputFilter,
    ) -> UiResult<()> {
        if self.dispatch_to_children(id, filter, |tree, child, filter| {
            tree.on_pointer_down(child, pointer, input, filter)
        })? {
            return Ok(());
        }
        if !self.node(id)?.flags.has(WidgetFlags::INPUT_ENABLED) || !self.contains(id, pointer.position)? {
            return Ok(());
        }

        self.node_mut(id)?.pressed.insert(pointer.id);
        self.notify(id, WidgetEventKind::PressedInside, pointer, Some(input), filter)
    }

    /// Delivers a pointer move to the subtree rooted at `id`. Every
    /// input-enabled widget reached fires exactly one move event.
    ///
    /// # Errors
    ///
    /// As [`on_pointer_down`](Self::on_pointer_down).
    pub fn on_pointer_moved(&mut self, id: WidgetId, pointer: &Pointer, filter: &mut InputFilter) -> UiResult<()> {
        if self.dispatch_to_children(id, filter, |tree, child, filter| {
            tree.on_pointer_moved(child, pointer, filter)
        })? {
            return Ok(());
        }
        if !self.node(id)?.flags.has(WidgetFlags::INPUT_ENABLED) {
            return Ok(());
        }

        let was_inside = self.contains(id, pointer.previous_position)?;
        let is_inside = self.contains(id, pointer.position)?;
        let kind = match (was_inside, is_inside) {
            (false, true) => WidgetEventKind::MoveEntered,
            (true, false) => WidgetEventKind::MoveExited,
            (false, false) => WidgetEventKind::MovedOutside,
            (true, true) => WidgetEventKind::MovedInside,
        };
        self.notify(id, kind, pointer, None, filter)
    }

    /// Delivers a pointer release to the subtree rooted at `id`. Only widgets
    /// the same pointer was pressed on respond.
    ///
    /// # Errors
    ///
    /// As [`on_pointer_down`](Self::on_pointer_down).
    pub fn on_pointer_up(
        &mut self,
        id: WidgetId,
        pointer: &Pointer,
        input: InputType,
        filter: &mut InputFilter,
    ) -> UiResult<()> {
        if self.dispatch_to_children(id, filter, |tree, child, filter| {
            tree.on_pointer_up(child, pointer, input, filter)
        })? {
            return Ok(());
        }
        let node = self.node_mut(id)?;
        let was_pressed = node.pressed.remove(&pointer.id);
        if !was_pressed || !node.flags.has(WidgetFlags::INPUT_ENABLED) {
            return Ok(());
        }

        let kind = if self.contains(id, pointer.position)? {
            WidgetEventKind::ReleasedInside
        } else {
            WidgetEventKind::ReleasedOutside
        };
        self.notify(id, kind, pointer, Some(input), filter)
    }

    /// Returns true if pointer `pointer` is currently pressed on the widget.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`](crate::UiError::UnknownWidget) for a
    /// dead handle.
    pub fn is_pressed_by(&self, id: WidgetId, pointer: PointerId) -> UiResult<bool> {
        Ok(self.node(id)?.pressed.contains(&pointer))
    }

    /// Visits children in input order, stopping once the filter is set.
    /// Returns true if the event was consumed.
    fn dispatch_to_children(
        &mut self,
        id: WidgetId,
        filter: &mut InputFilter,
        mut visit: impl FnMut(&mut Self, WidgetId, &mut InputFilter) -> UiResult<()>,
    ) -> UiResult<bool> {
        for kind in ChildKind::INPUT_ORDER {
            let children = self.node(id)?.list(kind).widgets.clone();
            for child in children.into_iter().rev() {
                visit(self, child, filter)?;
                if filter.is_filtered() {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn notify(
        &mut self,
        id: WidgetId,
        kind: WidgetEventKind,
        pointer: &Pointer,
        input: Option<InputType>,
        filter: &mut InputFilter,
    ) -> UiResult<()> {
        trace!(widget = %id, pointer = %pointer.id, ?kind, "pointer event");
        self.emit(WidgetEvent {
            widget: id,
            kind,
            pointer: pointer.id,
            input,
            active_inputs: pointer.active_inputs,
        });
        if self.node(id)?.flags.has(WidgetFlags::CONSUME_INPUT) {
            filter.set_filtered();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ember_shared::Vec2;

    use super::*;

    fn button(tree: &mut WidgetTree, parent: WidgetId, size: Vec2) -> WidgetId {
        let widget = tree.create_widget();
        tree.set_absolute_size(widget, size).unwrap();
        tree.set_input_enabled(widget, true).unwrap();
        tree.add_widget(parent, widget).unwrap();
        widget
    }

    #[test]
    fn test_press_and_release_inside() {
        let mut tree = WidgetTree::new();
        let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
        let widget = button(&mut tree, canvas, Vec2::new(20.0, 20.0));
        let mut pointer = Pointer::new(PointerId(1), Vec2::new(50.0, 50.0));

        let mut filter = InputFilter::new();
        tree.on_pointer_down(canvas, &pointer, InputType::Touch, &mut filter).unwrap();
        assert!(filter.is_filtered());
        assert!(tree.is_pressed_by(widget, PointerId(1)).unwrap());

        pointer.move_to(Vec2::new(52.0, 48.0));
        let mut filter = InputFilter::new();
        tree.on_pointer_up(canvas, &pointer, InputType::Touch, &mut filter).unwrap();

        let kinds: Vec<_> = tree.drain_events().into_iter().map(|event| event.kind).collect();
        assert_eq!(kinds, vec![WidgetEventKind::PressedInside, WidgetEventKind::ReleasedInside]);
        assert!(!tree.is_pressed_by(widget, PointerId(1)).unwrap());
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut tree = WidgetTree::new();
        let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
        button(&mut tree, canvas, Vec2::new(20.0, 20.0));
        let pointer = Pointer::new(PointerId(1), Vec2::new(50.0, 50.0));

        let mut filter = InputFilter::new();
        tree.on_pointer_up(canvas, &pointer, InputType::Touch, &mut filter).unwrap();

        assert!(!filter.is_filtered());
        assert!(tree.drain_events().is_empty());
    }

    #[test]
    fn test_pointers_tracked_independently() {
        let mut tree = WidgetTree::new();
        let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
        let widget = button(&mut tree, canvas, Vec2::new(20.0, 20.0));
        let first = Pointer::new(PointerId(1), Vec2::new(50.0, 50.0));
        let second = Pointer::new(PointerId(2), Vec2::new(5.0, 5.0));

        tree.on_pointer_down(canvas, &first, InputType::Touch, &mut InputFilter::new()).unwrap();
        tree.on_pointer_down(canvas, &second, InputType::Touch, &mut InputFilter::new()).unwrap();

        assert!(tree.is_pressed_by(widget, PointerId(1)).unwrap());
        assert!(!tree.is_pressed_by(widget, PointerId(2)).unwrap());
    }

    #[test]
    fn test_non_consuming_widget_passes_event_on() {
        let mut tree = WidgetTree::new();
        let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
        let below = button(&mut tree, canvas, Vec2::new(40.0, 40.0));
        let above = button(&mut tree, canvas, Vec2::new(20.0, 20.0));
        tree.set_consume_input_enabled(above, false).unwrap();
        let pointer = Pointer::new(PointerId(1), Vec2::new(50.0, 50.0));

        tree.on_pointer_down(canvas, &pointer, InputType::LeftMouseButton, &mut InputFilter::new())
            .unwrap();

        let widgets: Vec<_> = tree.drain_events().into_iter().map(|event| event.widget).collect();
        assert_eq!(widgets, vec![above, below]);
    }
}
