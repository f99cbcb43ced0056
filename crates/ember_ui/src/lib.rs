//! # Ember UI
//!
//! Retained-mode widget tree for the Ember engine:
//! - Parent-relative, property-driven geometry resolved lazily and cached
//! - Pluggable layout and drawable strategies
//! - Front-to-back pointer dispatch with consumption filtering
//! - TOML widget templates
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        UI PIPELINE                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  Pointer → Widget Tree → Geometry Cache → CanvasRenderer │
//! │     ↓           ↓              ↓                ↓        │
//! │  Dispatch   Behaviours      Layouts        Draw / Clip   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! World space is y-up with the origin at the bottom-left of the screen. A
//! canvas root spans the screen; every other widget is sized and placed
//! relative to its parent, or to a cell of its parent's layout.
//!
//! ```
//! use ember_shared::Vec2;
//! use ember_ui::WidgetTree;
//!
//! let mut tree = WidgetTree::new();
//! let canvas = tree.create_canvas(Vec2::new(800.0, 600.0));
//! let panel = tree.create_widget();
//! tree.set_relative_size(panel, Vec2::new(0.5, 0.5))?;
//! tree.add_widget(canvas, panel)?;
//!
//! assert_eq!(tree.final_size(panel)?, Vec2::new(400.0, 300.0));
//! assert_eq!(tree.final_position(panel)?, Vec2::new(400.0, 300.0));
//! # Ok::<(), ember_ui::UiError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod anchor;
pub mod behaviour;
pub mod cache;
pub mod desc;
pub mod drawable;
pub mod error;
pub mod input;
pub mod layout;
pub mod property;
pub mod render;
pub mod size_policy;
pub mod widget;

pub use anchor::AlignmentAnchor;
pub use behaviour::Behaviour;
pub use cache::{Cached, SizeWatch};
pub use desc::{LinkDesc, WidgetDesc};
pub use drawable::{Drawable, TextureInfo, TextureSource};
pub use error::{UiError, UiResult};
pub use input::{InputFilter, InputType, Pointer, PointerId, WidgetEvent, WidgetEventKind};
pub use layout::{Layout, LayoutContext};
pub use property::{PropertyDesc, PropertyMap, PropertyType, PropertyValue};
pub use render::{CanvasRenderer, RecordingRenderer, RenderCommand, Screen};
pub use size_policy::SizePolicy;
pub use widget::{ChildKind, WidgetId, WidgetTree, WIDGET_PROPERTY_DESCS};
