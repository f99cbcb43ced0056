//! # Ember Shared
//!
//! Math types used across the engine: 2D vectors, 2D affine transforms and
//! RGBA colours.
//!
//! ## Conventions
//!
//! - Y points up. The world origin sits at the bottom-left of the screen.
//! - `Matrix3` is column-major and transforms column vectors, so
//!   `parent * child` applies `child` first.
//! - Positive rotation is counter-clockwise, in radians.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod colour;
pub mod math;

pub use colour::Colour;
pub use math::{Matrix3, Vec2};
