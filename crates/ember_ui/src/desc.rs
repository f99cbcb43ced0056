//! Widget templates described in TOML.
//!
//! ```toml
//! [properties]
//! Name = "dialog"
//! RelSize = "0.5 0.5"
//! Layout = { Type = "VList", RelSpacing = 0.05 }
//!
//! [custom]
//! Title = "Settings"
//!
//! [default_links]
//! Tint = "Colour"
//!
//! [custom_links]
//! OkColour = { widget = "ok", property = "Colour" }
//!
//! [[children]]
//! properties = { Name = "ok", Drawable = { Type = "Texture", TextureLocation = "button" } }
//! ```
//!
//! `properties` overrides the widget schema, `custom` declares extension
//! properties (typed by their TOML shape), and `children` / `internal` nest
//! further templates. `default_links` and `custom_links` declare property
//! links; a custom link names a direct child, ordinary or internal. Children
//! and links are built before `properties` is applied, so `properties` may
//! set linked names.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{UiError, UiResult};
use crate::property::{PropertyMap, PropertyValue};
use crate::widget::{ChildKind, WidgetId, WidgetTree};

/// A widget template.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetDesc {
    /// Values for schema properties, by name.
    pub properties: toml::Table,
    /// Extension properties and their initial values.
    pub custom: toml::Table,
    /// Ordinary children, bottom to top.
    pub children: Vec<WidgetDesc>,
    /// Internal children, bottom to top.
    pub internal: Vec<WidgetDesc>,
    /// Aliases for the widget's own schema properties.
    pub default_links: BTreeMap<String, String>,
    /// Aliases for properties of named children.
    pub custom_links: BTreeMap<String, LinkDesc>,
}

/// Target of a custom property link in a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkDesc {
    /// Name of a direct child.
    pub widget: String,
    /// Property of that child.
    pub property: String,
}

impl WidgetDesc {
    /// Parses a template from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Toml`](crate::UiError::Toml) if the text is not a
    /// valid template.
    pub fn from_toml_str(source: &str) -> UiResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Number of widgets the template instantiates.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .chain(&self.internal)
            .map(Self::widget_count)
            .sum::<usize>()
    }

    fn custom_properties(&self) -> UiResult<PropertyMap> {
        let mut map = PropertyMap::new();
        for (name, raw) in &self.custom {
            map.insert(name.clone(), PropertyValue::infer_from_toml(name, raw)?);
        }
        Ok(map)
    }
}

impl WidgetTree {
    /// Instantiates a template as a detached subtree and returns its root.
    /// Nothing is left behind on failure.
    ///
    /// # Errors
    ///
    /// Fails if any property or descriptor in the template is invalid.
    pub fn build_from_desc(&mut self, desc: &WidgetDesc) -> UiResult<WidgetId> {
        let id = self.create_widget_with_custom(desc.custom_properties()?);
        match self.populate(id, desc) {
            Ok(()) => {
                debug!(widget = %id, count = desc.widget_count(), "widget built from description");
                Ok(id)
            }
            Err(err) => {
                self.destroy(id)?;
                Err(err)
            }
        }
    }

    /// Parses and instantiates a TOML template.
    ///
    /// # Errors
    ///
    /// As [`WidgetDesc::from_toml_str`] and
    /// [`build_from_desc`](Self::build_from_desc).
    pub fn build_from_toml(&mut self, source: &str) -> UiResult<WidgetId> {
        self.build_from_desc(&WidgetDesc::from_toml_str(source)?)
    }

    fn populate(&mut self, id: WidgetId, desc: &WidgetDesc) -> UiResult<()> {
        for (kind, children) in [(ChildKind::Ordinary, &desc.children), (ChildKind::Internal, &desc.internal)] {
            for child_desc in children {
                let child = self.build_from_desc(child_desc)?;
                match kind {
                    ChildKind::Ordinary => self.add_widget(id, child)?,
                    ChildKind::Internal => self.add_internal_widget(id, child)?,
                }
            }
        }

        let mut custom_links = HashMap::with_capacity(desc.custom_links.len());
        for (name, link) in &desc.custom_links {
            let child = match self.get_widget(id, &link.widget)? {
                Some(child) => Some(child),
                None => self.get_internal_widget(id, &link.widget)?,
            }
            .ok_or_else(|| UiError::InvalidDescriptor(format!("link {name}: no child named {:?}", link.widget)))?;
            custom_links.insert(name.clone(), (child, link.property.clone()));
        }
        let default_links = desc.default_links.clone().into_iter().collect();
        self.set_property_links(id, default_links, custom_links)?;

        self.apply_properties(id, &desc.properties)
    }
}
