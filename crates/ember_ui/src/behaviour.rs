//! Per-widget behaviour hooks.
//!
//! A behaviour is attached to one widget and called synchronously at fixed
//! points of tree traversal. While a hook runs the behaviour is detached from
//! its widget, so hooks get full mutable access to the tree.

use crate::widget::{WidgetId, WidgetTree};

/// Lifecycle hooks for a widget. Every hook defaults to doing nothing.
pub trait Behaviour {
    /// The widget (or an ancestor) was attached to a canvas.
    fn on_added_to_canvas(&mut self, _tree: &mut WidgetTree, _widget: WidgetId) {}

    /// The widget (or an ancestor) was detached from its canvas.
    fn on_removed_from_canvas(&mut self, _tree: &mut WidgetTree, _widget: WidgetId) {}

    /// Called once per update with the elapsed time in seconds.
    fn on_update(&mut self, _tree: &mut WidgetTree, _widget: WidgetId, _dt: f32) {}
}

impl WidgetTree {
    /// Runs `hook` with the widget's behaviour detached. Does nothing when the
    /// widget has no behaviour. The detached behaviour goes back only if the
    /// hook left the slot alone; a replacement or a removal made through
    /// [`set_behaviour`](Self::set_behaviour) sticks.
    pub(crate) fn call_behaviour(&mut self, id: WidgetId, hook: impl FnOnce(&mut dyn Behaviour, &mut Self)) {
        let Some((mut behaviour, generation)) = self
            .nodes
            .get_mut(&id)
            .and_then(|node| node.behaviour.take().map(|behaviour| (behaviour, node.behaviour_generation)))
        else {
            return;
        };

        hook(behaviour.as_mut(), self);

        if let Some(node) = self.nodes.get_mut(&id) {
            if node.behaviour_generation == generation {
                node.behaviour = Some(behaviour);
            }
        }
    }
}
