//! Per-widget storage.

use std::collections::{HashMap, HashSet};
use std::fmt;

use ember_shared::{Colour, Vec2};

use crate::anchor::AlignmentAnchor;
use crate::behaviour::Behaviour;
use crate::cache::NodeCache;
use crate::drawable::Drawable;
use crate::input::PointerId;
use crate::layout::Layout;
use crate::property::PropertyMap;
use crate::size_policy::SizePolicy;

/// Unique identifier for a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Creates a new widget ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Selects one of a widget's two child lists and the layout slot that governs
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    /// User-visible children.
    Ordinary,
    /// Engine-constructed children of composite widgets.
    Internal,
}

impl ChildKind {
    /// Both kinds, in the order children are updated and drawn.
    pub const DRAW_ORDER: [Self; 2] = [Self::Internal, Self::Ordinary];

    /// Both kinds, in the order input visits children.
    pub const INPUT_ORDER: [Self; 2] = [Self::Ordinary, Self::Internal];
}

/// Widget state flags (bitfield).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WidgetFlags(u32);

impl WidgetFlags {
    /// Widget and its subtree are drawn.
    pub const VISIBLE: u32 = 1 << 0;
    /// Children are clipped to the widget's bounds.
    pub const CLIP_CHILDREN: u32 = 1 << 1;
    /// Widget receives pointer events.
    pub const INPUT_ENABLED: u32 = 1 << 2;
    /// Events the widget handles stop propagating.
    pub const CONSUME_INPUT: u32 = 1 << 3;

    /// Default flags for a new widget.
    pub const DEFAULT: Self = Self(Self::VISIBLE | Self::CONSUME_INPUT);

    /// Returns true if the flag is set.
    #[inline]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Declarative, parent-relative geometry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LocalTransform {
    pub relative_position: Vec2,
    pub absolute_position: Vec2,
    pub relative_size: Vec2,
    pub absolute_size: Vec2,
    pub preferred_size: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub colour: Colour,
    pub origin_anchor: AlignmentAnchor,
    pub parental_anchor: AlignmentAnchor,
    pub size_policy: SizePolicy,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            relative_position: Vec2::ZERO,
            absolute_position: Vec2::ZERO,
            relative_size: Vec2::ZERO,
            absolute_size: Vec2::ZERO,
            preferred_size: Vec2::ONE,
            rotation: 0.0,
            scale: Vec2::ONE,
            colour: Colour::WHITE,
            origin_anchor: AlignmentAnchor::MiddleCentre,
            parental_anchor: AlignmentAnchor::MiddleCentre,
            size_policy: SizePolicy::UseOriginal,
        }
    }
}

/// One ordered child list and the layout that governs it.
#[derive(Debug, Default)]
pub(crate) struct ChildList {
    pub widgets: Vec<WidgetId>,
    pub layout: Option<Box<dyn Layout>>,
}

impl ChildList {
    pub fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|&child| child == id)
    }
}

/// Property names a widget forwards elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PropertyLinks {
    /// Alias to one of the widget's own schema properties.
    pub default: HashMap<String, String>,
    /// Alias to a property of a descendant.
    pub custom: HashMap<String, (WidgetId, String)>,
}

/// A widget in the arena.
pub(crate) struct Node {
    pub name: String,
    pub type_name: String,
    pub local: LocalTransform,
    pub flags: WidgetFlags,
    pub parent: Option<WidgetId>,
    pub canvas: Option<WidgetId>,
    pub children: ChildList,
    pub internal: ChildList,
    pub drawable: Option<Box<dyn Drawable>>,
    pub behaviour: Option<Box<dyn Behaviour>>,
    /// Bumped on every write to `behaviour` through the public setter.
    pub behaviour_generation: u64,
    pub custom: PropertyMap,
    pub links: PropertyLinks,
    pub pressed: HashSet<PointerId>,
    pub cache: NodeCache,
}

impl Node {
    pub fn new(custom: PropertyMap) -> Self {
        Self {
            name: String::new(),
            type_name: String::new(),
            local: LocalTransform::default(),
            flags: WidgetFlags::DEFAULT,
            parent: None,
            canvas: None,
            children: ChildList::default(),
            internal: ChildList::default(),
            drawable: None,
            behaviour: None,
            behaviour_generation: 0,
            custom,
            links: PropertyLinks::default(),
            pressed: HashSet::new(),
            cache: NodeCache::default(),
        }
    }

    pub fn list(&self, kind: ChildKind) -> &ChildList {
        match kind {
            ChildKind::Ordinary => &self.children,
            ChildKind::Internal => &self.internal,
        }
    }

    pub fn list_mut(&mut self, kind: ChildKind) -> &mut ChildList {
        match kind {
            ChildKind::Ordinary => &mut self.children,
            ChildKind::Internal => &mut self.internal,
        }
    }

    /// Which list holds `child`, and where.
    pub fn slot_of(&self, child: WidgetId) -> Option<(ChildKind, usize)> {
        ChildKind::INPUT_ORDER
            .into_iter()
            .find_map(|kind| self.list(kind).index_of(child).map(|index| (kind, index)))
    }

    /// True if this node is the root of its own canvas.
    pub fn is_canvas(&self, id: WidgetId) -> bool {
        self.canvas == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut flags = WidgetFlags::DEFAULT;
        assert!(flags.has(WidgetFlags::VISIBLE));
        assert!(!flags.has(WidgetFlags::INPUT_ENABLED));

        flags.assign(WidgetFlags::INPUT_ENABLED, true);
        flags.assign(WidgetFlags::VISIBLE, false);

        assert!(flags.has(WidgetFlags::INPUT_ENABLED));
        assert!(!flags.has(WidgetFlags::VISIBLE));
    }

    #[test]
    fn test_slot_lookup() {
        let mut node = Node::new(PropertyMap::new());
        node.children.widgets = vec![WidgetId(4), WidgetId(5)];
        node.internal.widgets = vec![WidgetId(9)];

        assert_eq!(node.slot_of(WidgetId(5)), Some((ChildKind::Ordinary, 1)));
        assert_eq!(node.slot_of(WidgetId(9)), Some((ChildKind::Internal, 0)));
        assert_eq!(node.slot_of(WidgetId(1)), None);
    }
}
