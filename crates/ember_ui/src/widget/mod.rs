//! Widget tree: hierarchy, geometry, input and traversal.
//!
//! Widgets are the building blocks of every interface. Each one lives in a
//! [`WidgetTree`] arena and is addressed by a [`WidgetId`]; operations on a
//! widget are methods on the tree taking its id.

mod canvas;
mod dispatch;
mod geometry;
mod node;
mod properties;
mod traversal;
mod tree;

pub use node::{ChildKind, WidgetId};
pub use properties::WIDGET_PROPERTY_DESCS;
pub use tree::{WidgetTree, DEFAULT_EVENT_CAPACITY};
