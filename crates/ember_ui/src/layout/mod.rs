//! Layout strategies.
//!
//! A layout owns the geometry of one child list of a widget: given the
//! owner's final size and the child count it computes a cell size and a cell
//! centre (relative to the owner's bottom-left corner) per child index.
//! Widgets rebuild their layouts whenever their geometry is invalidated while
//! attached to a canvas; the per-index reads are pure.

mod grid;
mod list;

pub use grid::{CellOrder, GridLayout, Margins};
pub use list::{Direction, ListLayout};

use ember_shared::Vec2;

use crate::error::{UiError, UiResult};
use crate::property::{PropertyDesc, PropertyMap, PropertyType};

/// Inputs to [`Layout::build_layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    /// Final size of the owning widget.
    pub final_size: Vec2,
    /// Number of children in the governed list.
    pub child_count: usize,
}

/// Computes cell geometry for a widget's children.
pub trait Layout: std::fmt::Debug {
    /// Recomputes and caches the cell for every index.
    fn build_layout(&mut self, ctx: LayoutContext);

    /// Size of the cell at `index`, as of the last build.
    fn size_for_index(&self, index: usize) -> Vec2;

    /// Centre of the cell at `index` relative to the owner's bottom-left
    /// corner, as of the last build.
    fn position_for_index(&self, index: usize) -> Vec2;
}

const GRID_DESCS: &[PropertyDesc] = &[
    PropertyDesc::new(PropertyType::String, "Type", "Grid"),
    PropertyDesc::new(PropertyType::Int, "NumRows", "1"),
    PropertyDesc::new(PropertyType::Int, "NumCols", "1"),
    PropertyDesc::new(PropertyType::String, "CellOrder", "RowMajor"),
    PropertyDesc::new(PropertyType::Vec4, "RelMargins", "0 0 0 0"),
    PropertyDesc::new(PropertyType::Vec4, "AbsMargins", "0 0 0 0"),
    PropertyDesc::new(PropertyType::Float, "RelHSpacing", "0"),
    PropertyDesc::new(PropertyType::Float, "AbsHSpacing", "0"),
    PropertyDesc::new(PropertyType::Float, "RelVSpacing", "0"),
    PropertyDesc::new(PropertyType::Float, "AbsVSpacing", "0"),
];

const LIST_DESCS: &[PropertyDesc] = &[
    PropertyDesc::new(PropertyType::String, "Type", "HList"),
    PropertyDesc::new(PropertyType::Vec4, "RelMargins", "0 0 0 0"),
    PropertyDesc::new(PropertyType::Vec4, "AbsMargins", "0 0 0 0"),
    PropertyDesc::new(PropertyType::Float, "RelSpacing", "0"),
    PropertyDesc::new(PropertyType::Float, "AbsSpacing", "0"),
];

/// Builds a layout from a descriptor table such as
/// `{ Type = "Grid", NumRows = 2, NumCols = 3 }`.
///
/// `Type = "None"` yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`UiError::InvalidDescriptor`] for an unknown type, an unknown key
/// or a malformed value.
pub fn layout_from_desc(desc: &toml::Table) -> UiResult<Option<Box<dyn Layout>>> {
    let layout: Box<dyn Layout> = match descriptor_type(desc)? {
        "None" => return Ok(None),
        "Grid" => {
            let props = descriptor_properties("Grid", GRID_DESCS, desc)?;
            let order = props
                .get::<String>("CellOrder")?
                .parse()
                .map_err(|order| UiError::InvalidDescriptor(format!("Grid: unknown cell order {order:?}")))?;

            Box::new(
                GridLayout::new(cell_count(&props, "NumRows")?, cell_count(&props, "NumCols")?)
                    .with_order(order)
                    .with_relative_margins(props.get("RelMargins")?)
                    .with_absolute_margins(props.get("AbsMargins")?)
                    .with_relative_spacing(Vec2::new(props.get("RelHSpacing")?, props.get("RelVSpacing")?))
                    .with_absolute_spacing(Vec2::new(props.get("AbsHSpacing")?, props.get("AbsVSpacing")?)),
            )
        }
        kind @ ("HList" | "VList") => {
            let props = descriptor_properties(kind, LIST_DESCS, desc)?;
            let list = if kind == "HList" {
                ListLayout::horizontal()
            } else {
                ListLayout::vertical()
            };

            Box::new(
                list.with_relative_margins(props.get("RelMargins")?)
                    .with_absolute_margins(props.get("AbsMargins")?)
                    .with_relative_spacing(props.get("RelSpacing")?)
                    .with_absolute_spacing(props.get("AbsSpacing")?),
            )
        }
        other => return Err(UiError::InvalidDescriptor(format!("unknown layout type {other:?}"))),
    };
    Ok(Some(layout))
}

/// Reads the `Type` key of a layout or drawable descriptor.
pub(crate) fn descriptor_type(desc: &toml::Table) -> UiResult<&str> {
    match desc.get("Type") {
        Some(toml::Value::String(kind)) => Ok(kind.as_str()),
        Some(other) => Err(UiError::InvalidDescriptor(format!("Type must be a string, got {other}"))),
        None => Err(UiError::InvalidDescriptor("missing Type".to_string())),
    }
}

/// Overlays a descriptor onto its schema, reporting failures as descriptor
/// errors.
pub(crate) fn descriptor_properties(kind: &str, descs: &[PropertyDesc], desc: &toml::Table) -> UiResult<PropertyMap> {
    PropertyMap::with_overrides(descs, desc).map_err(|err| UiError::InvalidDescriptor(format!("{kind}: {err}")))
}

fn cell_count(props: &PropertyMap, name: &str) -> UiResult<usize> {
    let count: i64 = props.get(name)?;
    usize::try_from(count)
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| UiError::InvalidDescriptor(format!("Grid: {name} must be positive, got {count}")))
}
