//! # Property Maps
//!
//! Typed, named property storage built from an ordered schema of
//! `(type, name, default literal)` descriptors.
//!
//! Literals use the engine's text forms:
//!
//! | Type            | Literal            |
//! |-----------------|--------------------|
//! | Bool            | `true`             |
//! | Int / Float     | `3` / `0.5`        |
//! | Vec2            | `0.5 1`            |
//! | Vec4            | `0 0 0 0`          |
//! | Colour          | `1 1 1 1`          |
//! | AlignmentAnchor | `MiddleCentre`     |
//! | SizePolicy      | `FitOriginal`      |
//! | Table           | `{ Type = "None" }`|
//!
//! Values may also come from TOML, where native booleans, numbers and arrays
//! are accepted alongside the string literals.

use std::borrow::Cow;
use std::collections::HashMap;

use ember_shared::{Colour, Vec2};

use crate::anchor::AlignmentAnchor;
use crate::error::{UiError, UiResult};
use crate::size_policy::SizePolicy;

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// `bool`
    Bool,
    /// `i64`
    Int,
    /// `f32`
    Float,
    /// `String`
    String,
    /// [`Vec2`]
    Vec2,
    /// `[f32; 4]`, used for margins (top, right, bottom, left).
    Vec4,
    /// [`Colour`]
    Colour,
    /// [`AlignmentAnchor`]
    AlignmentAnchor,
    /// [`SizePolicy`]
    SizePolicy,
    /// Nested descriptor table (layout and drawable descriptions).
    Table,
}

impl PropertyType {
    /// Returns the type name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Vec2 => "Vec2",
            Self::Vec4 => "Vec4",
            Self::Colour => "Colour",
            Self::AlignmentAnchor => "AlignmentAnchor",
            Self::SizePolicy => "SizePolicy",
            Self::Table => "Table",
        }
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f32),
    /// String value.
    String(String),
    /// 2D vector value.
    Vec2(Vec2),
    /// Four floats.
    Vec4([f32; 4]),
    /// Colour value.
    Colour(Colour),
    /// Anchor value.
    AlignmentAnchor(AlignmentAnchor),
    /// Size policy value.
    SizePolicy(SizePolicy),
    /// Nested descriptor.
    Table(toml::Table),
}

impl PropertyValue {
    /// Returns the type of the value.
    #[must_use]
    pub const fn ty(&self) -> PropertyType {
        match self {
            Self::Bool(_) => PropertyType::Bool,
            Self::Int(_) => PropertyType::Int,
            Self::Float(_) => PropertyType::Float,
            Self::String(_) => PropertyType::String,
            Self::Vec2(_) => PropertyType::Vec2,
            Self::Vec4(_) => PropertyType::Vec4,
            Self::Colour(_) => PropertyType::Colour,
            Self::AlignmentAnchor(_) => PropertyType::AlignmentAnchor,
            Self::SizePolicy(_) => PropertyType::SizePolicy,
            Self::Table(_) => PropertyType::Table,
        }
    }

    /// Parses a text literal as the given type.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidPropertyValue`] if the literal does not parse.
    pub fn parse(ty: PropertyType, name: &str, literal: &str) -> UiResult<Self> {
        let invalid = || UiError::InvalidPropertyValue {
            name: name.to_string(),
            value: literal.to_string(),
        };
        let trimmed = literal.trim();

        let value = match ty {
            PropertyType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" => Self::Bool(true),
                "false" => Self::Bool(false),
                _ => return Err(invalid()),
            },
            PropertyType::Int => Self::Int(trimmed.parse().map_err(|_| invalid())?),
            PropertyType::Float => Self::Float(trimmed.parse().map_err(|_| invalid())?),
            PropertyType::String => Self::String(literal.to_string()),
            PropertyType::Vec2 => {
                let [x, y] = parse_floats::<2>(trimmed).ok_or_else(invalid)?;
                Self::Vec2(Vec2::new(x, y))
            }
            PropertyType::Vec4 => Self::Vec4(parse_floats::<4>(trimmed).ok_or_else(invalid)?),
            PropertyType::Colour => {
                let [r, g, b, a] = parse_floats::<4>(trimmed).ok_or_else(invalid)?;
                Self::Colour(Colour::rgba(r, g, b, a))
            }
            PropertyType::AlignmentAnchor => Self::AlignmentAnchor(trimmed.parse().map_err(|_| invalid())?),
            PropertyType::SizePolicy => Self::SizePolicy(trimmed.parse().map_err(|_| invalid())?),
            PropertyType::Table => Self::Table(parse_inline_table(trimmed).ok_or_else(invalid)?),
        };
        Ok(value)
    }

    /// Converts a TOML value into the given type.
    ///
    /// Strings go through [`parse`](Self::parse); booleans, numbers, arrays
    /// and tables convert directly.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidPropertyValue`] if the value does not fit.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn from_toml(ty: PropertyType, name: &str, value: &toml::Value) -> UiResult<Self> {
        let invalid = || UiError::InvalidPropertyValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        match (ty, value) {
            (_, toml::Value::String(s)) => Self::parse(ty, name, s),
            (PropertyType::Bool, toml::Value::Boolean(b)) => Ok(Self::Bool(*b)),
            (PropertyType::Int, toml::Value::Integer(i)) => Ok(Self::Int(*i)),
            (PropertyType::Float, toml::Value::Integer(i)) => Ok(Self::Float(*i as f32)),
            (PropertyType::Float, toml::Value::Float(f)) => Ok(Self::Float(*f as f32)),
            (PropertyType::Vec2, toml::Value::Array(items)) => {
                let [x, y] = toml_floats::<2>(items).ok_or_else(invalid)?;
                Ok(Self::Vec2(Vec2::new(x, y)))
            }
            (PropertyType::Vec4, toml::Value::Array(items)) => Ok(Self::Vec4(toml_floats::<4>(items).ok_or_else(invalid)?)),
            (PropertyType::Colour, toml::Value::Array(items)) => {
                let [r, g, b, a] = toml_floats::<4>(items).ok_or_else(invalid)?;
                Ok(Self::Colour(Colour::rgba(r, g, b, a)))
            }
            (PropertyType::Table, toml::Value::Table(table)) => Ok(Self::Table(table.clone())),
            _ => Err(invalid()),
        }
    }

    /// Infers a value from TOML alone. Used for custom properties, which have
    /// no schema: 2-element arrays become `Vec2`, 4-element arrays `Vec4`.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidPropertyValue`] for unsupported shapes.
    pub fn infer_from_toml(name: &str, value: &toml::Value) -> UiResult<Self> {
        let ty = match value {
            toml::Value::String(_) => PropertyType::String,
            toml::Value::Integer(_) => PropertyType::Int,
            toml::Value::Float(_) => PropertyType::Float,
            toml::Value::Boolean(_) => PropertyType::Bool,
            toml::Value::Array(items) if items.len() == 2 => PropertyType::Vec2,
            toml::Value::Array(items) if items.len() == 4 => PropertyType::Vec4,
            toml::Value::Table(_) => PropertyType::Table,
            _ => {
                return Err(UiError::InvalidPropertyValue {
                    name: name.to_string(),
                    value: value.to_string(),
                })
            }
        };
        Self::from_toml(ty, name, value)
    }
}

fn parse_floats<const N: usize>(literal: &str) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    let mut parts = literal.split_whitespace();
    for slot in &mut out {
        *slot = parts.next()?.parse().ok()?;
    }
    parts.next().is_none().then_some(out)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn toml_floats<const N: usize>(items: &[toml::Value]) -> Option<[f32; N]> {
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = match item {
            toml::Value::Float(f) => *f as f32,
            toml::Value::Integer(i) => *i as f32,
            _ => return None,
        };
    }
    Some(out)
}

fn parse_inline_table(literal: &str) -> Option<toml::Table> {
    let mut doc: toml::Table = toml::from_str(&format!("value = {literal}")).ok()?;
    match doc.remove("value")? {
        toml::Value::Table(table) => Some(table),
        _ => None,
    }
}

/// Types that can be read out of a [`PropertyValue`].
pub trait FromProperty: Sized {
    /// Type tag used in error messages.
    const TYPE: PropertyType;

    /// Extracts the value if the variant matches.
    fn from_property(value: &PropertyValue) -> Option<Self>;
}

macro_rules! impl_property_conversions {
    ($ty:ty, $variant:ident) => {
        impl FromProperty for $ty {
            const TYPE: PropertyType = PropertyType::$variant;

            fn from_property(value: &PropertyValue) -> Option<Self> {
                match value {
                    PropertyValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl From<$ty> for PropertyValue {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    };
}

impl_property_conversions!(bool, Bool);
impl_property_conversions!(i64, Int);
impl_property_conversions!(f32, Float);
impl_property_conversions!(String, String);
impl_property_conversions!(Vec2, Vec2);
impl_property_conversions!([f32; 4], Vec4);
impl_property_conversions!(Colour, Colour);
impl_property_conversions!(AlignmentAnchor, AlignmentAnchor);
impl_property_conversions!(SizePolicy, SizePolicy);
impl_property_conversions!(toml::Table, Table);

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Declares one property: its type, name and default literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDesc {
    /// Declared type.
    pub ty: PropertyType,
    /// Property name.
    pub name: Cow<'static, str>,
    /// Default value as a text literal.
    pub default: Cow<'static, str>,
}

impl PropertyDesc {
    /// Creates a descriptor from static strings, usable in constant schemas.
    #[must_use]
    pub const fn new(ty: PropertyType, name: &'static str, default: &'static str) -> Self {
        Self {
            ty,
            name: Cow::Borrowed(name),
            default: Cow::Borrowed(default),
        }
    }
}

/// Typed, named property storage.
///
/// The set of keys and their types is fixed at construction; `set` can only
/// replace a value with one of the same type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    values: HashMap<String, PropertyValue>,
    order: Vec<String>,
}

impl PropertyMap {
    /// Creates an empty map with no keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map holding every descriptor's default value.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidPropertyValue`] if a default literal does not
    /// parse as its declared type.
    pub fn from_descs(descs: &[PropertyDesc]) -> UiResult<Self> {
        let mut map = Self::new();
        for desc in descs {
            let value = PropertyValue::parse(desc.ty, &desc.name, &desc.default)?;
            map.insert(desc.name.to_string(), value);
        }
        Ok(map)
    }

    /// Creates a map from a schema, then overlays TOML values onto it.
    ///
    /// # Errors
    ///
    /// Fails as [`from_descs`](Self::from_descs) and
    /// [`apply_toml`](Self::apply_toml) do.
    pub fn with_overrides(descs: &[PropertyDesc], overrides: &toml::Table) -> UiResult<Self> {
        let mut map = Self::from_descs(descs)?;
        map.apply_toml(overrides)?;
        Ok(map)
    }

    /// Adds a key, or replaces an existing key's value and type.
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        let name = name.into();
        if !self.values.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.values.insert(name, value);
    }

    /// Returns true if the key exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the declared type of a key.
    #[must_use]
    pub fn property_type(&self, name: &str) -> Option<PropertyType> {
        self.values.get(name).map(PropertyValue::ty)
    }

    /// Returns the raw value of a key.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Reads a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownProperty`] for a missing key and
    /// [`UiError::PropertyType`] if the key holds another type.
    pub fn get<T: FromProperty>(&self, name: &str) -> UiResult<T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| UiError::UnknownProperty(name.to_string()))?;
        T::from_property(value).ok_or_else(|| UiError::PropertyType {
            name: name.to_string(),
            expected: value.ty().name(),
            found: T::TYPE.name(),
        })
    }

    /// Replaces the value of an existing key.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownProperty`] for a missing key and
    /// [`UiError::PropertyType`] if the value's type differs.
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) -> UiResult<()> {
        let value = value.into();
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| UiError::UnknownProperty(name.to_string()))?;
        if slot.ty() != value.ty() {
            return Err(UiError::PropertyType {
                name: name.to_string(),
                expected: slot.ty().name(),
                found: value.ty().name(),
            });
        }
        *slot = value;
        Ok(())
    }

    /// Overlays TOML values onto existing keys, converting each to the key's
    /// declared type.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown key or unconvertible value.
    pub fn apply_toml(&mut self, table: &toml::Table) -> UiResult<()> {
        for (name, raw) in table {
            let ty = self
                .property_type(name)
                .ok_or_else(|| UiError::UnknownProperty(name.clone()))?;
            let value = PropertyValue::from_toml(ty, name, raw)?;
            self.values.insert(name.clone(), value);
        }
        Ok(())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the map has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
