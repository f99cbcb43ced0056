//! # UI Error Types
//!
//! All errors that can occur while building or querying a widget tree.

use thiserror::Error;

use crate::widget::WidgetId;

/// Errors that can occur in the UI system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    /// The handle does not name a live widget.
    #[error("unknown widget: {0}")]
    UnknownWidget(WidgetId),

    /// World-space geometry was queried before the widget reached a canvas.
    #[error("widget {0} is not attached to a canvas")]
    NotAttached(WidgetId),

    /// The widget already has a parent.
    #[error("widget {0} already has a parent")]
    AlreadyParented(WidgetId),

    /// The widget would become its own ancestor, or is a canvas.
    #[error("widget {child} cannot be added beneath {parent}")]
    InvalidChild {
        /// Widget being added.
        child: WidgetId,
        /// Intended parent.
        parent: WidgetId,
    },

    /// The widget is not a child of the given parent.
    #[error("widget {child} is not a child of {parent}")]
    NotAChild {
        /// Widget being removed.
        child: WidgetId,
        /// Parent it was removed from.
        parent: WidgetId,
    },

    /// The operation needs a parent and the widget has none.
    #[error("widget {0} has no parent")]
    NoParent(WidgetId),

    /// No property with this name exists.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// The property exists but holds a different type.
    #[error("property {name} has type {expected}, got {found}")]
    PropertyType {
        /// Property name.
        name: String,
        /// Declared type.
        expected: &'static str,
        /// Type that was supplied or requested.
        found: &'static str,
    },

    /// A literal could not be parsed into the property's type.
    #[error("invalid value for property {name}: {value:?}")]
    InvalidPropertyValue {
        /// Property name.
        name: String,
        /// Offending literal.
        value: String,
    },

    /// The property can be set but not read back.
    #[error("property {0} is write-only")]
    WriteOnlyProperty(String),

    /// A layout or drawable descriptor is malformed.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// Widget description TOML failed to parse.
    #[error("invalid widget description: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for UiError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err.to_string())
    }
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
