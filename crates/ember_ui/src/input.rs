//! Pointer input consumed by widget dispatch, and the events it produces.
//!
//! A [`Pointer`] carries its current and previous world position plus the set
//! of inputs (buttons, touch) currently held. Dispatch threads one
//! [`InputFilter`] through the whole tree; the first consuming widget marks it
//! and everything behind stops seeing the event.

use std::fmt;

use ember_shared::Vec2;

use crate::widget::WidgetId;

/// Identifies one pointer (a mouse, or one finger) across events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer {}", self.0)
    }
}

/// Physical input that pressed or released a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    /// Touch contact.
    Touch,
    /// Left mouse button.
    LeftMouseButton,
    /// Middle mouse button (scroll wheel click).
    MiddleMouseButton,
    /// Right mouse button.
    RightMouseButton,
}

impl InputType {
    /// Every input type.
    pub const ALL: [Self; 4] = [
        Self::Touch,
        Self::LeftMouseButton,
        Self::MiddleMouseButton,
        Self::RightMouseButton,
    ];

    const fn mask(self) -> u8 {
        match self {
            Self::Touch => 1,
            Self::LeftMouseButton => 2,
            Self::MiddleMouseButton => 4,
            Self::RightMouseButton => 8,
        }
    }
}

/// Set of inputs currently held on a pointer (bitfield).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActiveInputs(u8);

impl ActiveInputs {
    /// No inputs held.
    pub const NONE: Self = Self(0);

    /// Returns true if the input is held.
    #[inline]
    #[must_use]
    pub const fn contains(self, input: InputType) -> bool {
        (self.0 & input.mask()) != 0
    }

    /// Marks an input as held.
    #[inline]
    pub fn insert(&mut self, input: InputType) {
        self.0 |= input.mask();
    }

    /// Marks an input as released.
    #[inline]
    pub fn remove(&mut self, input: InputType) {
        self.0 &= !input.mask();
    }

    /// Returns true if nothing is held.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Held inputs in declaration order.
    pub fn iter(self) -> impl Iterator<Item = InputType> {
        InputType::ALL.into_iter().filter(move |input| self.contains(*input))
    }
}

impl FromIterator<InputType> for ActiveInputs {
    fn from_iter<I: IntoIterator<Item = InputType>>(iter: I) -> Self {
        let mut inputs = Self::NONE;
        for input in iter {
            inputs.insert(input);
        }
        inputs
    }
}

/// A pointer as seen by widget dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Pointer identity.
    pub id: PointerId,
    /// Current world position.
    pub position: Vec2,
    /// World position before the latest move.
    pub previous_position: Vec2,
    /// Inputs currently held.
    pub active_inputs: ActiveInputs,
}

impl Pointer {
    /// Creates a pointer at rest at `position`.
    #[must_use]
    pub const fn new(id: PointerId, position: Vec2) -> Self {
        Self {
            id,
            position,
            previous_position: position,
            active_inputs: ActiveInputs::NONE,
        }
    }

    /// Moves the pointer, remembering where it came from.
    pub fn move_to(&mut self, position: Vec2) {
        self.previous_position = self.position;
        self.position = position;
    }

    /// Records an input going down.
    pub fn press(&mut self, input: InputType) {
        self.active_inputs.insert(input);
    }

    /// Records an input going up.
    pub fn release(&mut self, input: InputType) {
        self.active_inputs.remove(input);
    }
}

/// Shared consumption flag for one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFilter {
    filtered: bool,
}

impl InputFilter {
    /// Creates an unfiltered filter.
    #[must_use]
    pub const fn new() -> Self {
        Self { filtered: false }
    }

    /// Returns true once a widget has consumed the event.
    #[must_use]
    pub const fn is_filtered(self) -> bool {
        self.filtered
    }

    /// Marks the event consumed.
    pub fn set_filtered(&mut self) {
        self.filtered = true;
    }
}

/// What happened to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetEventKind {
    /// Pointer went down inside the widget.
    PressedInside,
    /// A pointer pressed on this widget went up inside it.
    ReleasedInside,
    /// A pointer pressed on this widget went up outside it.
    ReleasedOutside,
    /// Pointer moved from outside to inside.
    MoveEntered,
    /// Pointer moved from inside to outside.
    MoveExited,
    /// Pointer moved and stayed inside.
    MovedInside,
    /// Pointer moved and stayed outside.
    MovedOutside,
}

/// An event fired by dispatch, delivered over the tree's event channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetEvent {
    /// Widget the event fired on.
    pub widget: WidgetId,
    /// Event kind.
    pub kind: WidgetEventKind,
    /// Pointer that caused it.
    pub pointer: PointerId,
    /// Input that went down or up; `None` for moves.
    pub input: Option<InputType>,
    /// Inputs held on the pointer at the time.
    pub active_inputs: ActiveInputs,
}
