//! Typed widget state accessors and routing of schema property names.
//!
//! A name passed to [`WidgetTree::set_property`] or [`WidgetTree::property`]
//! resolves in order: the widget schema, the widget's property links, then
//! its custom properties. A default link aliases one of the widget's own
//! schema properties; a custom link forwards to a property of a descendant,
//! which is how a composite widget exposes the properties of its parts.

use std::collections::HashMap;

use ember_shared::{Colour, Vec2};

use super::node::{Node, PropertyLinks, WidgetFlags};
use super::{WidgetId, WidgetTree};
use crate::anchor::AlignmentAnchor;
use crate::behaviour::Behaviour;
use crate::drawable::{drawable_from_desc, Drawable};
use crate::error::{UiError, UiResult};
use crate::layout::{layout_from_desc, Layout};
use crate::property::{FromProperty, PropertyDesc, PropertyMap, PropertyType, PropertyValue};
use crate::size_policy::SizePolicy;

/// Default schema every widget is built from, in declaration order.
pub const WIDGET_PROPERTY_DESCS: &[PropertyDesc] = &[
    PropertyDesc::new(PropertyType::String, "Type", ""),
    PropertyDesc::new(PropertyType::String, "Name", ""),
    PropertyDesc::new(PropertyType::Vec2, "RelPosition", "0 0"),
    PropertyDesc::new(PropertyType::Vec2, "AbsPosition", "0 0"),
    PropertyDesc::new(PropertyType::Vec2, "RelSize", "0 0"),
    PropertyDesc::new(PropertyType::Vec2, "AbsSize", "0 0"),
    PropertyDesc::new(PropertyType::Vec2, "PreferredSize", "1 1"),
    PropertyDesc::new(PropertyType::Vec2, "Scale", "1 1"),
    PropertyDesc::new(PropertyType::Colour, "Colour", "1 1 1 1"),
    PropertyDesc::new(PropertyType::Float, "Rotation", "0"),
    PropertyDesc::new(PropertyType::AlignmentAnchor, "OriginAnchor", "MiddleCentre"),
    PropertyDesc::new(PropertyType::AlignmentAnchor, "ParentalAnchor", "MiddleCentre"),
    PropertyDesc::new(PropertyType::Bool, "Visible", "true"),
    PropertyDesc::new(PropertyType::Bool, "ClipChildren", "false"),
    PropertyDesc::new(PropertyType::Bool, "InputEnabled", "false"),
    PropertyDesc::new(PropertyType::Bool, "ConsumeInput", "true"),
    PropertyDesc::new(PropertyType::SizePolicy, "SizePolicy", "None"),
    PropertyDesc::new(PropertyType::Table, "Layout", "{ Type = \"None\" }"),
    PropertyDesc::new(PropertyType::Table, "Drawable", "{ Type = \"None\" }"),
];

/// Generates a getter and an invalidating setter for a geometric field.
macro_rules! geometry_accessors {
    ($($(#[$doc:meta])* $field:ident: $ty:ty => $getter:ident, $setter:ident;)*) => {
        impl WidgetTree {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// Returns [`UiError::UnknownWidget`] for a dead handle.
                pub fn $getter(&self, id: WidgetId) -> UiResult<$ty> {
                    Ok(self.node(id)?.local.$field)
                }

                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// Returns [`UiError::UnknownWidget`] for a dead handle.
                pub fn $setter(&mut self, id: WidgetId, value: $ty) -> UiResult<()> {
                    self.node_mut(id)?.local.$field = value;
                    self.invalidate(id)
                }
            )*
        }
    };
}

geometry_accessors! {
    /// Position as a fraction of the parent's (or cell's) size.
    relative_position: Vec2 => relative_position, set_relative_position;
    /// Position offset in canvas units.
    absolute_position: Vec2 => absolute_position, set_absolute_position;
    /// Size as a fraction of the parent's (or cell's) size.
    relative_size: Vec2 => relative_size, set_relative_size;
    /// Size offset in canvas units.
    absolute_size: Vec2 => absolute_size, set_absolute_size;
    /// Preferred size used when no drawable supplies one.
    preferred_size: Vec2 => default_preferred_size, set_default_preferred_size;
    /// Rotation in radians, counter-clockwise.
    rotation: f32 => rotation, set_rotation;
    /// Local scale.
    scale: Vec2 => scale, set_scale;
    /// Anchor on this widget that is placed and rotated about.
    origin_anchor: AlignmentAnchor => origin_anchor, set_origin_anchor;
    /// Anchor on the parent (or cell) the widget is placed at.
    parental_anchor: AlignmentAnchor => parental_anchor, set_parental_anchor;
    /// How the declared size reconciles with the preferred size.
    size_policy: SizePolicy => size_policy, set_size_policy;
}

impl WidgetTree {
    /// Moves the widget by a fraction of its parent's size.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn relative_move_by(&mut self, id: WidgetId, delta: Vec2) -> UiResult<()> {
        let current = self.relative_position(id)?;
        self.set_relative_position(id, current + delta)
    }

    /// Moves the widget by a distance in canvas units.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn absolute_move_by(&mut self, id: WidgetId, delta: Vec2) -> UiResult<()> {
        let current = self.absolute_position(id)?;
        self.set_absolute_position(id, current + delta)
    }

    /// Adds to the widget's rotation.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn rotate_by(&mut self, id: WidgetId, radians: f32) -> UiResult<()> {
        let current = self.rotation(id)?;
        self.set_rotation(id, current + radians)
    }

    /// Sets the widget's rotation.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn rotate_to(&mut self, id: WidgetId, radians: f32) -> UiResult<()> {
        self.set_rotation(id, radians)
    }

    /// Multiplies the widget's scale componentwise.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn scale_by(&mut self, id: WidgetId, factor: Vec2) -> UiResult<()> {
        let current = self.scale(id)?;
        self.set_scale(id, current * factor)
    }

    /// Sets the widget's scale.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn scale_to(&mut self, id: WidgetId, scale: Vec2) -> UiResult<()> {
        self.set_scale(id, scale)
    }

    /// Local colour.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn colour(&self, id: WidgetId) -> UiResult<Colour> {
        Ok(self.node(id)?.local.colour)
    }

    /// Sets the local colour, clamping each channel to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_colour(&mut self, id: WidgetId, colour: Colour) -> UiResult<()> {
        self.node_mut(id)?.local.colour = colour.clamped();
        Ok(())
    }

    /// Widget name.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn name(&self, id: WidgetId) -> UiResult<&str> {
        Ok(&self.node(id)?.name)
    }

    /// Sets the widget name. Names need not be unique.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_name(&mut self, id: WidgetId, name: impl Into<String>) -> UiResult<()> {
        self.node_mut(id)?.name = name.into();
        Ok(())
    }

    /// Free-form type tag, such as "Button".
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn type_name(&self, id: WidgetId) -> UiResult<&str> {
        Ok(&self.node(id)?.type_name)
    }

    /// Sets the type tag.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_type_name(&mut self, id: WidgetId, type_name: impl Into<String>) -> UiResult<()> {
        self.node_mut(id)?.type_name = type_name.into();
        Ok(())
    }

    /// Returns true if the widget and its subtree are drawn.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn is_visible(&self, id: WidgetId) -> UiResult<bool> {
        self.flag(id, WidgetFlags::VISIBLE)
    }

    /// Shows or hides the widget and its subtree.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> UiResult<()> {
        self.set_flag(id, WidgetFlags::VISIBLE, visible)
    }

    /// Returns true if children are clipped to the widget's bounds.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn is_clipping_enabled(&self, id: WidgetId) -> UiResult<bool> {
        self.flag(id, WidgetFlags::CLIP_CHILDREN)
    }

    /// Enables or disables clipping of children.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_clipping_enabled(&mut self, id: WidgetId, enabled: bool) -> UiResult<()> {
        self.set_flag(id, WidgetFlags::CLIP_CHILDREN, enabled)
    }

    /// Returns true if the widget receives pointer events.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn is_input_enabled(&self, id: WidgetId) -> UiResult<bool> {
        self.flag(id, WidgetFlags::INPUT_ENABLED)
    }

    /// Enables or disables pointer events on the widget itself. Children are
    /// unaffected. Disabling forgets every press the widget was tracking.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_input_enabled(&mut self, id: WidgetId, enabled: bool) -> UiResult<()> {
        self.set_flag(id, WidgetFlags::INPUT_ENABLED, enabled)?;
        if !enabled {
            self.node_mut(id)?.pressed.clear();
        }
        Ok(())
    }

    /// Returns true if events the widget handles stop propagating.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn is_consume_input_enabled(&self, id: WidgetId) -> UiResult<bool> {
        self.flag(id, WidgetFlags::CONSUME_INPUT)
    }

    /// Sets whether handled events stop propagating.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_consume_input_enabled(&mut self, id: WidgetId, enabled: bool) -> UiResult<()> {
        self.set_flag(id, WidgetFlags::CONSUME_INPUT, enabled)
    }

    fn flag(&self, id: WidgetId, flag: u32) -> UiResult<bool> {
        Ok(self.node(id)?.flags.has(flag))
    }

    fn set_flag(&mut self, id: WidgetId, flag: u32, on: bool) -> UiResult<()> {
        self.node_mut(id)?.flags.assign(flag, on);
        Ok(())
    }

    /// Replaces the widget's drawable. The preferred size follows it.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_drawable(&mut self, id: WidgetId, drawable: Option<Box<dyn Drawable>>) -> UiResult<()> {
        self.node_mut(id)?.drawable = drawable;
        self.invalidate(id)
    }

    /// Returns true if the widget has a drawable.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn has_drawable(&self, id: WidgetId) -> UiResult<bool> {
        Ok(self.node(id)?.drawable.is_some())
    }

    /// Replaces the layout governing the ordinary children.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_layout(&mut self, id: WidgetId, layout: Option<Box<dyn Layout>>) -> UiResult<()> {
        self.node_mut(id)?.children.layout = layout;
        self.invalidate(id)
    }

    /// Replaces the layout governing the internal children.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_internal_layout(&mut self, id: WidgetId, layout: Option<Box<dyn Layout>>) -> UiResult<()> {
        self.node_mut(id)?.internal.layout = layout;
        self.invalidate(id)
    }

    /// Returns true if the ordinary children are laid out.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn has_layout(&self, id: WidgetId) -> UiResult<bool> {
        Ok(self.node(id)?.children.layout.is_some())
    }

    /// Binds a behaviour to the widget, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn set_behaviour(&mut self, id: WidgetId, behaviour: Option<Box<dyn Behaviour>>) -> UiResult<()> {
        let node = self.node_mut(id)?;
        node.behaviour = behaviour;
        node.behaviour_generation += 1;
        Ok(())
    }

    /// The widget's user extension properties.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for a dead handle.
    pub fn custom_properties(&self, id: WidgetId) -> UiResult<&PropertyMap> {
        Ok(&self.node(id)?.custom)
    }

    /// Sets a property by schema name. Names outside
    /// [`WIDGET_PROPERTY_DESCS`] follow the widget's property links, then go
    /// to the custom properties.
    ///
    /// "Layout" and "Drawable" take descriptor tables and build the strategy
    /// they describe.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::PropertyType`] if the value has the wrong type,
    /// [`UiError::InvalidDescriptor`] for a bad descriptor and
    /// [`UiError::UnknownProperty`] for a name found nowhere.
    pub fn set_property(&mut self, id: WidgetId, name: &str, value: impl Into<PropertyValue>) -> UiResult<()> {
        let value = value.into();
        match name {
            "Type" => self.set_type_name(id, typed::<String>(name, &value)?),
            "Name" => self.set_name(id, typed::<String>(name, &value)?),
            "RelPosition" => self.set_relative_position(id, typed(name, &value)?),
            "AbsPosition" => self.set_absolute_position(id, typed(name, &value)?),
            "RelSize" => self.set_relative_size(id, typed(name, &value)?),
            "AbsSize" => self.set_absolute_size(id, typed(name, &value)?),
            "PreferredSize" => self.set_default_preferred_size(id, typed(name, &value)?),
            "Scale" => self.set_scale(id, typed(name, &value)?),
            "Colour" => self.set_colour(id, typed(name, &value)?),
            "Rotation" => self.set_rotation(id, typed(name, &value)?),
            "OriginAnchor" => self.set_origin_anchor(id, typed(name, &value)?),
            "ParentalAnchor" => self.set_parental_anchor(id, typed(name, &value)?),
            "Visible" => self.set_visible(id, typed(name, &value)?),
            "ClipChildren" => self.set_clipping_enabled(id, typed(name, &value)?),
            "InputEnabled" => self.set_input_enabled(id, typed(name, &value)?),
            "ConsumeInput" => self.set_consume_input_enabled(id, typed(name, &value)?),
            "SizePolicy" => self.set_size_policy(id, typed(name, &value)?),
            "Layout" => {
                let layout = layout_from_desc(&typed::<toml::Table>(name, &value)?)?;
                self.set_layout(id, layout)
            }
            "Drawable" => {
                let drawable = drawable_from_desc(&typed::<toml::Table>(name, &value)?, self.textures.as_ref())?;
                self.set_drawable(id, drawable)
            }
            _ => match self.link(id, name)? {
                Some(LinkTarget::Own(target)) => self.set_property(id, &target, value),
                Some(LinkTarget::Child(child, target)) => self.set_property(child, &target, value),
                None => self.node_mut(id)?.custom.set(name, value),
            },
        }
    }

    /// Reads a property by schema name, falling back to property links and
    /// then the custom properties.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::WriteOnlyProperty`] for "Layout" and "Drawable" and
    /// [`UiError::UnknownProperty`] for a name found nowhere.
    pub fn property(&self, id: WidgetId, name: &str) -> UiResult<PropertyValue> {
        let node = self.node(id)?;
        let local = &node.local;
        let value: PropertyValue = match name {
            "Type" => node.type_name.clone().into(),
            "Name" => node.name.clone().into(),
            "RelPosition" => local.relative_position.into(),
            "AbsPosition" => local.absolute_position.into(),
            "RelSize" => local.relative_size.into(),
            "AbsSize" => local.absolute_size.into(),
            "PreferredSize" => local.preferred_size.into(),
            "Scale" => local.scale.into(),
            "Colour" => local.colour.into(),
            "Rotation" => local.rotation.into(),
            "OriginAnchor" => local.origin_anchor.into(),
            "ParentalAnchor" => local.parental_anchor.into(),
            "Visible" => node.flags.has(WidgetFlags::VISIBLE).into(),
            "ClipChildren" => node.flags.has(WidgetFlags::CLIP_CHILDREN).into(),
            "InputEnabled" => node.flags.has(WidgetFlags::INPUT_ENABLED).into(),
            "ConsumeInput" => node.flags.has(WidgetFlags::CONSUME_INPUT).into(),
            "SizePolicy" => local.size_policy.into(),
            "Layout" | "Drawable" => return Err(UiError::WriteOnlyProperty(name.to_string())),
            _ => match self.link(id, name)? {
                Some(LinkTarget::Own(target)) => return self.property(id, &target),
                Some(LinkTarget::Child(child, target)) => return self.property(child, &target),
                None => custom_value(node, name)?,
            },
        };
        Ok(value)
    }

    /// Applies every entry of a TOML table through
    /// [`set_property`](Self::set_property), converting each value to the
    /// schema type of its name.
    ///
    /// # Errors
    ///
    /// Fails on the first entry that cannot be applied.
    pub fn apply_properties(&mut self, id: WidgetId, table: &toml::Table) -> UiResult<()> {
        for (name, raw) in table {
            let value = PropertyValue::from_toml(self.property_type(id, name)?, name, raw)?;
            self.set_property(id, name, value)?;
        }
        Ok(())
    }

    /// Type of the property a name resolves to, following links.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownProperty`] for a name found nowhere.
    pub fn property_type(&self, id: WidgetId, name: &str) -> UiResult<PropertyType> {
        if let Some(desc) = WIDGET_PROPERTY_DESCS.iter().find(|desc| desc.name == name) {
            return Ok(desc.ty);
        }
        match self.link(id, name)? {
            Some(LinkTarget::Own(target)) => self.property_type(id, &target),
            Some(LinkTarget::Child(child, target)) => self.property_type(child, &target),
            None => self
                .node(id)?
                .custom
                .property_type(name)
                .ok_or_else(|| UiError::UnknownProperty(name.to_string())),
        }
    }

    /// Replaces the widget's property links.
    ///
    /// `default` maps an alias to one of the widget's own schema properties.
    /// `custom` maps an alias to a `(descendant, property)` pair. Aliases that
    /// shadow a schema name are never consulted.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownProperty`] if a default link targets a name
    /// outside [`WIDGET_PROPERTY_DESCS`] and [`UiError::NotAChild`] if a
    /// custom link targets a widget outside the subtree.
    pub fn set_property_links(
        &mut self,
        id: WidgetId,
        default: HashMap<String, String>,
        custom: HashMap<String, (WidgetId, String)>,
    ) -> UiResult<()> {
        if let Some(target) = default.values().find(|target| !is_schema_property(target)) {
            return Err(UiError::UnknownProperty(target.clone()));
        }
        for &(child, _) in custom.values() {
            self.check_descendant(id, child)?;
        }
        self.node_mut(id)?.links = PropertyLinks { default, custom };
        Ok(())
    }

    /// Where a linked name points, if it is linked at all. Custom link targets
    /// are re-checked on every use.
    fn link(&self, id: WidgetId, name: &str) -> UiResult<Option<LinkTarget>> {
        let links = &self.node(id)?.links;
        if let Some(target) = links.default.get(name) {
            return Ok(Some(LinkTarget::Own(target.clone())));
        }
        let Some((child, target)) = links.custom.get(name) else {
            return Ok(None);
        };
        self.check_descendant(id, *child)?;
        Ok(Some(LinkTarget::Child(*child, target.clone())))
    }

    fn check_descendant(&self, id: WidgetId, child: WidgetId) -> UiResult<()> {
        self.node(child)?;
        if child == id || !self.is_ancestor_or_self(id, child)? {
            return Err(UiError::NotAChild { child, parent: id });
        }
        Ok(())
    }
}

/// Resolved destination of a property link.
enum LinkTarget {
    Own(String),
    Child(WidgetId, String),
}

fn is_schema_property(name: &str) -> bool {
    WIDGET_PROPERTY_DESCS.iter().any(|desc| desc.name == name)
}

fn typed<T: FromProperty>(name: &str, value: &PropertyValue) -> UiResult<T> {
    T::from_property(value).ok_or_else(|| UiError::PropertyType {
        name: name.to_string(),
        expected: T::TYPE.name(),
        found: value.ty().name(),
    })
}

fn custom_value(node: &Node, name: &str) -> UiResult<PropertyValue> {
    node.custom
        .value(name)
        .cloned()
        .ok_or_else(|| UiError::UnknownProperty(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_defaults_match_widget_defaults() {
        let mut tree = WidgetTree::new();
        let widget = tree.create_widget();
        let schema = PropertyMap::from_descs(WIDGET_PROPERTY_DESCS).unwrap();

        for name in schema.keys().filter(|name| !matches!(*name, "Layout" | "Drawable")) {
            assert_eq!(
                tree.property(widget, name).unwrap(),
                schema.value(name).cloned().unwrap(),
                "{name}"
            );
        }
    }

    #[test]
    fn test_set_property_routes_to_setters() {
        let mut tree = WidgetTree::new();
        let widget = tree.create_widget();

        tree.set_property(widget, "Name", "title").unwrap();
        tree.set_property(widget, "AbsSize", Vec2::new(30.0, 40.0)).unwrap();
        tree.set_property(widget, "OriginAnchor", AlignmentAnchor::TopLeft).unwrap();
        tree.set_property(widget, "InputEnabled", true).unwrap();

        assert_eq!(tree.name(widget).unwrap(), "title");
        assert_eq!(tree.absolute_size(widget).unwrap(), Vec2::new(30.0, 40.0));
        assert_eq!(tree.origin_anchor(widget).unwrap(), AlignmentAnchor::TopLeft);
        assert!(tree.is_input_enabled(widget).unwrap());
    }

    #[test]
    fn test_property_errors() {
        let mut tree = WidgetTree::new();
        let widget = tree.create_widget();

        assert!(matches!(
            tree.set_property(widget, "RelSize", 1.0_f32),
            Err(UiError::PropertyType { .. })
        ));
        assert!(matches!(tree.set_property(widget, "Bogus", 1.0_f32), Err(UiError::UnknownProperty(_))));
        assert_eq!(
            tree.property(widget, "Layout"),
            Err(UiError::WriteOnlyProperty("Layout".to_string()))
        );
    }

    #[test]
    fn test_custom_properties_fall_through() {
        let mut tree = WidgetTree::new();
        let mut custom = PropertyMap::new();
        custom.insert("Health", PropertyValue::Int(10));
        let widget = tree.create_widget_with_custom(custom);

        tree.set_property(widget, "Health", 7_i64).unwrap();

        assert_eq!(tree.property(widget, "Health").unwrap(), PropertyValue::Int(7));
        assert_eq!(tree.custom_properties(widget).unwrap().get::<i64>("Health").unwrap(), 7);
    }

    #[test]
    fn test_colour_is_clamped() {
        let mut tree = WidgetTree::new();
        let widget = tree.create_widget();

        tree.set_colour(widget, Colour::rgba(2.0, -1.0, 0.5, 1.0)).unwrap();

        assert_eq!(tree.colour(widget).unwrap(), Colour::rgba(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_relative_mutators() {
        let mut tree = WidgetTree::new();
        let widget = tree.create_widget();

        tree.absolute_move_by(widget, Vec2::new(3.0, 4.0)).unwrap();
        tree.absolute_move_by(widget, Vec2::new(1.0, 1.0)).unwrap();
        tree.rotate_by(widget, 0.5).unwrap();
        tree.rotate_by(widget, 0.25).unwrap();
        tree.scale_by(widget, Vec2::new(2.0, 3.0)).unwrap();

        assert_eq!(tree.absolute_position(widget).unwrap(), Vec2::new(4.0, 5.0));
        assert!((tree.rotation(widget).unwrap() - 0.75).abs() < 1e-6);
        assert_eq!(tree.scale(widget).unwrap(), Vec2::new(2.0, 3.0));

        tree.rotate_to(widget, 0.0).unwrap();
        tree.scale_to(widget, Vec2::ONE).unwrap();
        assert_eq!(tree.rotation(widget).unwrap(), 0.0);
        assert_eq!(tree.scale(widget).unwrap(), Vec2::ONE);
    }

    #[test]
    fn test_property_links_forward_to_self_and_children() {
        let mut tree = WidgetTree::new();
        let button = tree.create_widget();
        let mut label_props = PropertyMap::new();
        label_props.insert("Text", PropertyValue::String(String::new()));
        let label = tree.create_widget_with_custom(label_props);
        tree.add_widget(button, label).unwrap();

        tree.set_property_links(
            button,
            HashMap::from([("Tint".to_string(), "Colour".to_string())]),
            HashMap::from([
                ("Caption".to_string(), (label, "Text".to_string())),
                ("CaptionColour".to_string(), (label, "Colour".to_string())),
            ]),
        )
        .unwrap();

        tree.set_property(button, "Caption", "Play").unwrap();
        tree.set_property(button, "CaptionColour", Colour::RED).unwrap();
        tree.set_property(button, "Tint", Colour::BLUE).unwrap();

        assert_eq!(tree.property(label, "Text").unwrap(), PropertyValue::String("Play".to_string()));
        assert_eq!(tree.property(button, "Caption").unwrap(), PropertyValue::String("Play".to_string()));
        assert_eq!(tree.colour(label).unwrap(), Colour::RED);
        assert_eq!(tree.colour(button).unwrap(), Colour::BLUE);
        assert_eq!(tree.property_type(button, "Caption").unwrap(), PropertyType::String);
        assert!(matches!(
            tree.set_property(button, "Caption", 3_i64),
            Err(UiError::PropertyType { .. })
        ));
    }

    #[test]
    fn test_property_links_are_validated() {
        let mut tree = WidgetTree::new();
        let widget = tree.create_widget();
        let stranger = tree.create_widget();
        let child = tree.create_widget();
        tree.add_widget(widget, child).unwrap();

        assert_eq!(
            tree.set_property_links(
                widget,
                HashMap::from([("Tint".to_string(), "Bogus".to_string())]),
                HashMap::new()
            ),
            Err(UiError::UnknownProperty("Bogus".to_string()))
        );
        assert_eq!(
            tree.set_property_links(
                widget,
                HashMap::new(),
                HashMap::from([("Other".to_string(), (stranger, "Name".to_string()))])
            ),
            Err(UiError::NotAChild { child: stranger, parent: widget })
        );

        // A link whose target has left the subtree stops resolving.
        tree.set_property_links(
            widget,
            HashMap::new(),
            HashMap::from([("ChildName".to_string(), (child, "Name".to_string()))]),
        )
        .unwrap();
        tree.remove_widget(widget, child).unwrap();
        assert_eq!(
            tree.property(widget, "ChildName"),
            Err(UiError::NotAChild { child, parent: widget })
        );
    }

    #[test]
    fn test_disabling_input_clears_presses() {
        let mut tree = WidgetTree::new();
        let widget = tree.create_widget();
        tree.set_input_enabled(widget, true).unwrap();
        tree.node_mut(widget).unwrap().pressed.insert(crate::input::PointerId(4));

        tree.set_input_enabled(widget, false).unwrap();

        assert!(!tree.is_pressed_by(widget, crate::input::PointerId(4)).unwrap());
    }

    #[test]
    fn test_apply_properties_from_toml() {
        let mut tree = WidgetTree::new();
        let widget = tree.create_widget();
        let table: toml::Table = toml::from_str(
            r#"
            RelSize = "0.5 0.25"
            Visible = false
            SizePolicy = "FitOriginal"
            Layout = { Type = "HList" }
            "#,
        )
        .unwrap();

        tree.apply_properties(widget, &table).unwrap();

        assert_eq!(tree.relative_size(widget).unwrap(), Vec2::new(0.5, 0.25));
        assert!(!tree.is_visible(widget).unwrap());
        assert_eq!(tree.size_policy(widget).unwrap(), SizePolicy::FitOriginal);
        assert!(tree.has_layout(widget).unwrap());
    }
}
