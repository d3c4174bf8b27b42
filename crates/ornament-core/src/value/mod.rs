#[cfg(feature = "json")]
mod json;


use crate::{
    model::EnumBacking,
    traits::{Decorator, ModelEnum},
};
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// Value
///
/// Dynamically typed field value. Raw input rows arrive as `Value`s and the
/// decoration engine turns them into the declared shape of each field.
///
/// Null   → the field holds no value (SQL NULL).
/// Object → a constructed decorator or plain object type.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
#[remain::sorted]
pub enum Value {
    Bool(bool),
    Enum(ValueEnum),
    Float(f64),
    Int(i64),
    /// Ordered list of values.
    List(Vec<Self>),
    /// Keyed values; insertion order is preserved.
    Map(#[serde(serialize_with = "serialize_entries")] Vec<(String, Self)>),
    Null,
    Object(ObjectValue),
    Text(String),
}

impl Value {
    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Absent values never count as set: `isset` is false and dirty
    /// tracking treats two absent values as equal.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.is_null()
    }

    /// Returns true for the "empty scalar" inputs that nullable fields
    /// collapse to `Null`: `Null` itself and the empty string.
    #[must_use]
    pub const fn is_empty_scalar(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_enum(&self) -> Option<&ValueEnum> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Look up an entry of a `Map` value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Enum(e) => write!(f, "{e}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Self::Null => Ok(()),
            Self::Object(o) => write!(f, "{}", o.render()),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

fn serialize_entries<S: Serializer>(entries: &[(String, Value)], s: S) -> Result<S::Ok, S::Error> {
    let mut map = s.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

///
/// CONVERSIONS
///

macro_rules! impl_from_int {
    ( $( $ty:ty ),* ) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<ValueEnum> for Value {
    fn from(v: ValueEnum) -> Self {
        Self::Enum(v)
    }
}

impl From<ObjectValue> for Value {
    fn from(v: ObjectValue) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<BTreeMap<String, T>> for Value {
    fn from(v: BTreeMap<String, T>) -> Self {
        Self::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

///
/// ValueEnum
/// A decoded member of a model enum.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValueEnum {
    pub path: &'static str,
    pub variant: &'static str,
    pub backing: EnumBacking,
}

impl ValueEnum {
    /// Build the value for a Rust enum member.
    #[must_use]
    pub fn from_enum<E: ModelEnum>(value: &E) -> Self {
        let variant = value.variant();
        let backing = E::MODEL
            .variant(variant)
            .map_or(EnumBacking::Text(variant), |v| v.backing);

        Self {
            path: E::MODEL.path,
            variant,
            backing,
        }
    }

    /// Convert back into the Rust enum, if the paths agree.
    #[must_use]
    pub fn to_enum<E: ModelEnum>(&self) -> Option<E> {
        if self.path != E::MODEL.path {
            return None;
        }

        E::from_variant(self.variant)
    }
}

impl fmt::Display for ValueEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.backing)
    }
}

impl Serialize for ValueEnum {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self.backing {
            EnumBacking::Int(i) => s.serialize_i64(i),
            EnumBacking::Text(t) => s.serialize_str(t),
        }
    }
}

///
/// ObjectValue
///
/// Shared handle to a constructed decorator or plain object. Cloning is
/// cheap; equality compares type path, raw source and derived value.
///

#[derive(Clone, Debug)]
pub struct ObjectValue(Arc<dyn Decorator>);

impl ObjectValue {
    #[must_use]
    pub fn new<T: Decorator>(object: T) -> Self {
        Self(Arc::new(object))
    }

    #[must_use]
    pub fn path(&self) -> &'static str {
        self.0.path()
    }

    /// The raw value the object was constructed from.
    #[must_use]
    pub fn source(&self) -> &Value {
        self.0.source()
    }

    /// The object's derived value.
    #[must_use]
    pub fn value(&self) -> Value {
        self.0.value()
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.0.render()
    }

    /// Borrow the concrete object type.
    #[must_use]
    pub fn downcast_ref<T: Decorator>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.path() == other.path()
                && self.source() == other.source()
                && self.value() == other.value())
    }
}

impl fmt::Display for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl Serialize for ObjectValue {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.render())
    }
}
