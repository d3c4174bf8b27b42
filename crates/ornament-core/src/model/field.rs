use crate::{model::enumeration::EnumModel, value::Value};
use std::fmt;

///
/// FieldModel
/// Runtime metadata for one declared field.
///

#[derive(Clone, Debug, PartialEq)]
pub struct FieldModel {
    /// Field name as used in input rows and property access.
    pub name: &'static str,
    /// Declared semantic type.
    pub kind: FieldKind,
    /// Whether the field accepts an absent value.
    pub nullable: bool,
    /// Written once, during construction.
    pub read_only: bool,
    pub visibility: Visibility,
    /// False when the field opted out of decoration.
    pub decorate: bool,
    /// Literal arguments appended when constructing object-typed values.
    pub construct_args: Vec<Value>,
    /// Value held before any input is applied. `None` leaves the field
    /// uninitialised.
    pub default: Option<Value>,
}

impl FieldModel {
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            read_only: false,
            visibility: Visibility::Public,
            decorate: true,
            construct_args: Vec::new(),
            default: None,
        }
    }

    /// Readable through the generic getter and tracked for dirtiness.
    #[must_use]
    pub const fn is_exposed(&self) -> bool {
        self.visibility.is_exposed()
    }

    /// Writable through the generic setter (visibility only; see `read_only`).
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
    }

    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self.kind, FieldKind::Enum(_))
    }

    /// Part of the decoration table: exposed and not opted out.
    #[must_use]
    pub const fn is_decorated(&self) -> bool {
        self.decorate && self.is_exposed()
    }

    /// Type a value for storage in this field's slot.
    #[must_use]
    pub fn admit(&self, value: Value) -> Value {
        match self.kind {
            FieldKind::Primitive(kind) => kind.admit(value),
            _ => value,
        }
    }

    /// Included in the flat row handed to persistence adapters.
    #[must_use]
    pub const fn is_persistable(&self) -> bool {
        self.is_public() && !self.read_only
    }
}

///
/// FieldKind
///
/// Declared semantic type of a field.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Primitive(PrimitiveKind),
    Enum(&'static EnumModel),
    /// Object or decorator type, resolved by path at decoration time.
    Object(&'static str),
    /// No declared type; values pass through untouched.
    Untyped,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Enum(e) => write!(f, "enum {}", e.path),
            Self::Object(path) => write!(f, "object {path}"),
            Self::Untyped => write!(f, "untyped"),
        }
    }
}

///
/// PrimitiveKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum PrimitiveKind {
    Bool,
    Float,
    Int,
    List,
    Map,
    Null,
    Text,
}

impl PrimitiveKind {
    /// Slot typing applied when a value is stored.
    ///
    /// Numeric text becomes a number in `Int` and `Float` slots (finite
    /// values only), and `0`/`1` become booleans in `Bool` slots. Anything that does not convert
    /// losslessly is stored as given.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn admit(self, value: Value) -> Value {
        match (self, value) {
            (Self::Int, Value::Text(text)) => {
                text.trim().parse().map_or(Value::Text(text), Value::Int)
            }
            (Self::Float, Value::Int(i)) => Value::Float(i as f64),
            (Self::Float, Value::Text(text)) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map_or(Value::Text(text), Value::Float),
            (Self::Bool, Value::Int(i @ (0 | 1))) => Value::Bool(i == 1),
            (Self::Bool, Value::Text(text)) => match text.as_str() {
                "0" => Value::Bool(false),
                "1" => Value::Bool(true),
                _ => Value::Text(text),
            },
            (_, value) => value,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Int => "int",
            Self::List => "list",
            Self::Map => "map",
            Self::Null => "null",
            Self::Text => "text",
        };
        write!(f, "{label}")
    }
}

///
/// Visibility
///
/// Public and protected fields are exposed; private fields hold state but
/// never leave the model through the generic accessors.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn is_exposed(self) -> bool {
        matches!(self, Self::Public | Self::Protected)
    }
}
