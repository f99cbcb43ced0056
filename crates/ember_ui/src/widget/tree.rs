//! Widget arena and hierarchy management.

use std::collections::HashMap;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, trace, warn};

use super::node::{ChildKind, Node};
use super::WidgetId;
use crate::drawable::{NoTextures, TextureSource};
use crate::error::{UiError, UiResult};
use crate::input::WidgetEvent;
use crate::layout::LayoutContext;
use crate::property::PropertyMap;

/// Events buffered before the oldest unread ones start being dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Owns every widget and the links between them.
///
/// Widgets are addressed by [`WidgetId`]. Parent and canvas links are ids, so
/// the tree holds no reference cycles; a handle stays valid after its widget
/// is removed from a parent and only dies with [`destroy`](Self::destroy).
pub struct WidgetTree {
    pub(crate) nodes: HashMap<WidgetId, Node>,
    next_id: u64,
    events_tx: Sender<WidgetEvent>,
    events_rx: Receiver<WidgetEvent>,
    pub(crate) textures: Box<dyn TextureSource>,
}

impl WidgetTree {
    /// Creates a new empty widget tree.
    #[must_use]
    pub fn new() -> Self {
        Self::with_event_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a tree whose event channel buffers `capacity` events.
    #[must_use]
    pub fn with_event_capacity(capacity: usize) -> Self {
        let (events_tx, events_rx) = bounded(capacity);
        Self {
            nodes: HashMap::with_capacity(256),
            next_id: 1,
            events_tx,
            events_rx,
            textures: Box::new(NoTextures),
        }
    }

    /// Sets the texture source used when a "Drawable" descriptor is applied.
    pub fn set_texture_source(&mut self, textures: impl TextureSource + 'static) {
        self.textures = Box::new(textures);
    }

    /// Returns a receiver for widget events. Every receiver shares one queue.
    #[must_use]
    pub fn events(&self) -> Receiver<WidgetEvent> {
        self.events_rx.clone()
    }

    /// Takes every event queued so far.
    pub fn drain_events(&self) -> Vec<WidgetEvent> {
        self.events_rx.try_iter().collect()
    }

    pub(crate) fn emit(&self, event: WidgetEvent) {
        match self.events_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(widget = %event.widget, kind = ?event.kind, "widget event queue full, dropping event");
            }
            // The tree holds a receiver, so the channel cannot disconnect.
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    /// Creates a detached widget with default properties.
    pub fn create_widget(&mut self) -> WidgetId {
        self.create_widget_with_custom(PropertyMap::new())
    }

    /// Creates a detached widget carrying user extension properties.
    pub fn create_widget_with_custom(&mut self, custom: PropertyMap) -> WidgetId {
        let id = WidgetId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(custom));
        trace!(widget = %id, "widget created");
        id
    }

    /// Returns true if the handle names a live widget.
    #[must_use]
    pub fn contains_widget(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no widgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, id: WidgetId) -> UiResult<&Node> {
        self.nodes.get(&id).ok_or(UiError::UnknownWidget(id))
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> UiResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(UiError::UnknownWidget(id))
    }

    /// Returns the widget's parent.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn parent(&self, id: WidgetId) -> UiResult<Option<WidgetId>> {
        Ok(self.node(id)?.parent)
    }

    /// Returns the canvas the widget is attached to, if any.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn canvas(&self, id: WidgetId) -> UiResult<Option<WidgetId>> {
        Ok(self.node(id)?.canvas)
    }

    /// Returns one of the widget's child lists in painter's order.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn children(&self, id: WidgetId, kind: ChildKind) -> UiResult<&[WidgetId]> {
        Ok(&self.node(id)?.list(kind).widgets)
    }

    /// Finds the first ordinary child with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn get_widget(&self, id: WidgetId, name: &str) -> UiResult<Option<WidgetId>> {
        self.find_child(id, ChildKind::Ordinary, name)
    }

    /// Finds the first internal child with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn get_internal_widget(&self, id: WidgetId, name: &str) -> UiResult<Option<WidgetId>> {
        self.find_child(id, ChildKind::Internal, name)
    }

    fn find_child(&self, id: WidgetId, kind: ChildKind, name: &str) -> UiResult<Option<WidgetId>> {
        Ok(self
            .node(id)?
            .list(kind)
            .widgets
            .iter()
            .copied()
            .find(|child| self.nodes.get(child).is_some_and(|node| node.name == name)))
    }

    /// Adds an ordinary child on top of its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::AlreadyParented`] if `child` has a parent and
    /// [`UiError::InvalidChild`] if it is a canvas or an ancestor of `parent`.
    pub fn add_widget(&mut self, parent: WidgetId, child: WidgetId) -> UiResult<()> {
        self.attach(parent, child, ChildKind::Ordinary)
    }

    /// Adds an internal child on top of its internal siblings.
    ///
    /// # Errors
    ///
    /// As [`add_widget`](Self::add_widget).
    pub fn add_internal_widget(&mut self, parent: WidgetId, child: WidgetId) -> UiResult<()> {
        self.attach(parent, child, ChildKind::Internal)
    }

    fn attach(&mut self, parent: WidgetId, child: WidgetId, kind: ChildKind) -> UiResult<()> {
        let child_node = self.node(child)?;
        if child_node.parent.is_some() {
            return Err(UiError::AlreadyParented(child));
        }
        if child_node.is_canvas(child) || self.is_ancestor_or_self(child, parent)? {
            return Err(UiError::InvalidChild { child, parent });
        }

        let parent_node = self.node_mut(parent)?;
        parent_node.list_mut(kind).widgets.push(child);
        let canvas = parent_node.canvas;
        self.node_mut(child)?.parent = Some(parent);
        debug!(%parent, %child, ?kind, "widget attached");

        self.relayout(parent, kind)?;
        self.set_canvas(child, canvas)
    }

    /// Removes an ordinary child from `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NotAChild`] if `child` is not an ordinary child of
    /// `parent`.
    pub fn remove_widget(&mut self, parent: WidgetId, child: WidgetId) -> UiResult<()> {
        let index = self
            .node(parent)?
            .children
            .index_of(child)
            .ok_or(UiError::NotAChild { child, parent })?;
        self.detach(parent, child, ChildKind::Ordinary, index)
    }

    /// Removes the widget from whichever list of its parent holds it.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NoParent`] for a root widget.
    pub fn remove_from_parent(&mut self, child: WidgetId) -> UiResult<()> {
        let parent = self.node(child)?.parent.ok_or(UiError::NoParent(child))?;
        let (kind, index) = self
            .node(parent)?
            .slot_of(child)
            .ok_or(UiError::NotAChild { child, parent })?;
        self.detach(parent, child, kind, index)
    }

    fn detach(&mut self, parent: WidgetId, child: WidgetId, kind: ChildKind, index: usize) -> UiResult<()> {
        self.node_mut(parent)?.list_mut(kind).widgets.remove(index);
        self.node_mut(child)?.parent = None;
        debug!(%parent, %child, ?kind, "widget detached");

        self.set_canvas(child, None)?;
        // A removal hook may have destroyed the former parent.
        if !self.contains_widget(parent) {
            return Ok(());
        }
        self.relayout(parent, kind)
    }

    /// Destroys the widget and its whole subtree, detaching it from its parent
    /// (or its canvas) first. Every handle into the subtree becomes dead.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn destroy(&mut self, id: WidgetId) -> UiResult<()> {
        let node = self.node(id)?;
        if node.parent.is_some() {
            self.remove_from_parent(id)?;
        } else if node.canvas.is_some() {
            self.set_canvas(id, None)?;
        }

        // Hooks above may already have destroyed part of the subtree.
        if !self.contains_widget(id) {
            return Ok(());
        }
        let doomed: Vec<_> = self.iter_dfs(id).collect();
        for widget in &doomed {
            self.nodes.remove(widget);
        }
        debug!(widget = %id, count = doomed.len(), "widget destroyed");
        Ok(())
    }

    /// Moves an ordinary child to the top of its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NoParent`] for a root widget.
    pub fn bring_to_front(&mut self, id: WidgetId) -> UiResult<()> {
        self.rearrange(id, |widgets, index| {
            let widget = widgets.remove(index);
            widgets.push(widget);
        })
    }

    /// Moves an ordinary child one place up its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NoParent`] for a root widget.
    pub fn bring_forward(&mut self, id: WidgetId) -> UiResult<()> {
        self.rearrange(id, |widgets, index| {
            if index + 1 < widgets.len() {
                widgets.swap(index, index + 1);
            }
        })
    }

    /// Moves an ordinary child one place down its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NoParent`] for a root widget.
    pub fn send_backward(&mut self, id: WidgetId) -> UiResult<()> {
        self.rearrange(id, |widgets, index| {
            if index > 0 {
                widgets.swap(index, index - 1);
            }
        })
    }

    /// Moves an ordinary child to the bottom of its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NoParent`] for a root widget.
    pub fn send_to_back(&mut self, id: WidgetId) -> UiResult<()> {
        self.rearrange(id, |widgets, index| {
            let widget = widgets.remove(index);
            widgets.insert(0, widget);
        })
    }

    fn rearrange(&mut self, id: WidgetId, reorder: impl FnOnce(&mut Vec<WidgetId>, usize)) -> UiResult<()> {
        let parent = self.node(id)?.parent.ok_or(UiError::NoParent(id))?;
        let widgets = &mut self.node_mut(parent)?.children.widgets;
        let index = widgets
            .iter()
            .position(|&child| child == id)
            .ok_or(UiError::NotAChild { child: id, parent })?;
        reorder(widgets, index);
        self.relayout(parent, ChildKind::Ordinary)
    }

    /// Rebuilds the layout of one child list and invalidates every child in
    /// it, after the list's membership or order changed.
    fn relayout(&mut self, parent: WidgetId, kind: ChildKind) -> UiResult<()> {
        self.build_layout(parent, kind)?;
        let siblings = self.node(parent)?.list(kind).widgets.clone();
        for sibling in siblings {
            self.invalidate(sibling)?;
        }
        Ok(())
    }

    /// Rebuilds one layout of an attached widget. Detached widgets defer
    /// until attachment.
    pub(crate) fn build_layout(&mut self, id: WidgetId, kind: ChildKind) -> UiResult<()> {
        let node = self.node(id)?;
        if node.canvas.is_none() || node.list(kind).layout.is_none() {
            return Ok(());
        }
        let ctx = LayoutContext {
            final_size: self.final_size(id)?,
            child_count: node.list(kind).widgets.len(),
        };

        if let Some(layout) = self.node_mut(id)?.list_mut(kind).layout.as_mut() {
            layout.build_layout(ctx);
            trace!(widget = %id, ?kind, "layout rebuilt");
        }
        Ok(())
    }

    /// Marks the widget and every descendant dirty, then rebuilds the layouts
    /// of attached widgets top-down.
    pub(crate) fn invalidate(&mut self, id: WidgetId) -> UiResult<()> {
        self.node(id)?;
        let subtree: Vec<_> = self.iter_dfs(id).collect();
        for widget in &subtree {
            if let Some(node) = self.nodes.get(widget) {
                node.cache.invalidate();
            }
        }
        for widget in subtree {
            for kind in ChildKind::DRAW_ORDER {
                self.build_layout(widget, kind)?;
            }
        }
        Ok(())
    }

    /// Points the widget and its subtree at a canvas (or none), then fires
    /// canvas hooks on every widget whose attachment changed, children before
    /// parents. Widgets leaving a canvas forget their pressed pointers.
    pub(crate) fn set_canvas(&mut self, id: WidgetId, canvas: Option<WidgetId>) -> UiResult<()> {
        let subtree: Vec<_> = self.iter_dfs(id).collect();
        let mut transitions = Vec::new();
        for widget in subtree {
            if let Some(node) = self.nodes.get_mut(&widget) {
                if node.canvas != canvas {
                    node.canvas = canvas;
                    if canvas.is_none() {
                        node.pressed.clear();
                    }
                    transitions.push(widget);
                }
            }
        }
        self.invalidate(id)?;

        for widget in transitions.into_iter().rev() {
            if canvas.is_some() {
                self.call_behaviour(widget, |behaviour, tree| behaviour.on_added_to_canvas(tree, widget));
            } else {
                self.call_behaviour(widget, |behaviour, tree| behaviour.on_removed_from_canvas(tree, widget));
            }
        }
        Ok(())
    }

    pub(crate) fn is_ancestor_or_self(&self, candidate: WidgetId, id: WidgetId) -> UiResult<bool> {
        let mut current = Some(id);
        while let Some(widget) = current {
            if widget == candidate {
                return Ok(true);
            }
            current = self.node(widget)?.parent;
        }
        Ok(false)
    }

    /// Returns the widget and its descendants in depth-first order: each
    /// widget, then its internal children, then its ordinary children.
    pub fn iter_dfs(&self, root: WidgetId) -> impl Iterator<Item = WidgetId> + '_ {
        WidgetDfsIterator {
            tree: self,
            stack: if self.nodes.contains_key(&root) { vec![root] } else { Vec::new() },
        }
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first iterator over widget tree.
struct WidgetDfsIterator<'a> {
    tree: &'a WidgetTree,
    stack: Vec<WidgetId>,
}

impl Iterator for WidgetDfsIterator<'_> {
    type Item = WidgetId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Push children in reverse order so they're processed first-to-last
        if let Some(node) = self.tree.nodes.get(&id) {
            for kind in ChildKind::DRAW_ORDER.into_iter().rev() {
                self.stack.extend(node.list(kind).widgets.iter().rev().copied());
            }
        }

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_hierarchy() {
        let mut tree = WidgetTree::new();

        let root = tree.create_widget();
        let first = tree.create_widget();
        let second = tree.create_widget();
        let internal = tree.create_widget();

        tree.add_widget(root, first).unwrap();
        tree.add_widget(root, second).unwrap();
        tree.add_internal_widget(root, internal).unwrap();

        assert_eq!(tree.children(root, ChildKind::Ordinary).unwrap(), &[first, second]);
        assert_eq!(tree.parent(second).unwrap(), Some(root));

        let order: Vec<_> = tree.iter_dfs(root).collect();
        assert_eq!(order, vec![root, internal, first, second]);
    }

    #[test]
    fn test_double_parenting_fails() {
        let mut tree = WidgetTree::new();
        let a = tree.create_widget();
        let b = tree.create_widget();
        let child = tree.create_widget();

        tree.add_widget(a, child).unwrap();

        assert_eq!(tree.add_widget(b, child), Err(UiError::AlreadyParented(child)));
        assert_eq!(tree.children(b, ChildKind::Ordinary).unwrap(), &[] as &[WidgetId]);
    }

    #[test]
    fn test_cycles_rejected() {
        let mut tree = WidgetTree::new();
        let a = tree.create_widget();
        let b = tree.create_widget();
        tree.add_widget(a, b).unwrap();

        assert_eq!(tree.add_widget(b, a), Err(UiError::InvalidChild { child: a, parent: b }));
        assert_eq!(tree.add_widget(a, a), Err(UiError::InvalidChild { child: a, parent: a }));
    }

    #[test]
    fn test_rearrange() {
        let mut tree = WidgetTree::new();
        let root = tree.create_widget();
        let [a, b, c] = [tree.create_widget(), tree.create_widget(), tree.create_widget()];
        for child in [a, b, c] {
            tree.add_widget(root, child).unwrap();
        }

        tree.bring_to_front(a).unwrap();
        assert_eq!(tree.children(root, ChildKind::Ordinary).unwrap(), &[b, c, a]);

        tree.send_backward(a).unwrap();
        assert_eq!(tree.children(root, ChildKind::Ordinary).unwrap(), &[b, a, c]);

        tree.send_to_back(c).unwrap();
        assert_eq!(tree.children(root, ChildKind::Ordinary).unwrap(), &[c, b, a]);

        tree.bring_forward(c).unwrap();
        assert_eq!(tree.children(root, ChildKind::Ordinary).unwrap(), &[b, c, a]);

        assert_eq!(tree.bring_to_front(root), Err(UiError::NoParent(root)));
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let mut tree = WidgetTree::new();
        let root = tree.create_widget();
        let child = tree.create_widget();
        let grandchild = tree.create_widget();
        tree.add_widget(root, child).unwrap();
        tree.add_widget(child, grandchild).unwrap();

        tree.destroy(child).unwrap();

        assert!(tree.contains_widget(root));
        assert!(!tree.contains_widget(child));
        assert!(!tree.contains_widget(grandchild));
        assert!(tree.children(root, ChildKind::Ordinary).unwrap().is_empty());
        assert_eq!(tree.destroy(child), Err(UiError::UnknownWidget(child)));
    }

    #[test]
    fn test_find_by_name() {
        let mut tree = WidgetTree::new();
        let root = tree.create_widget();
        let child = tree.create_widget();
        tree.set_name(child, "ok_button").unwrap();
        tree.add_widget(root, child).unwrap();

        assert_eq!(tree.get_widget(root, "ok_button").unwrap(), Some(child));
        assert_eq!(tree.get_widget(root, "cancel").unwrap(), None);
        assert_eq!(tree.get_internal_widget(root, "ok_button").unwrap(), None);
    }
}
