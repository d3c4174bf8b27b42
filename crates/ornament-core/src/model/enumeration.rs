use crate::value::{Value, ValueEnum};
use std::fmt;

///
/// EnumModel
/// Static description of a model enum and its backing values.
///

#[derive(Debug, PartialEq)]
pub struct EnumModel {
    pub path: &'static str,
    pub variants: &'static [EnumVariant],
}

impl EnumModel {
    #[must_use]
    pub const fn new(path: &'static str, variants: &'static [EnumVariant]) -> Self {
        Self { path, variants }
    }

    /// Look up a member by variant name.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&'static EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Match a raw value against the members' backings.
    ///
    /// Text matches a text backing exactly. Ints match an int backing, and
    /// so does numeric text, since database rows deliver strings.
    #[must_use]
    pub fn parse(&self, raw: &Value) -> Option<ValueEnum> {
        let found = self.variants.iter().find(|v| v.backing.matches(raw))?;

        Some(ValueEnum {
            path: self.path,
            variant: found.name,
            backing: found.backing,
        })
    }
}

///
/// EnumVariant
///

#[derive(Debug, Eq, PartialEq)]
pub struct EnumVariant {
    pub name: &'static str,
    pub backing: EnumBacking,
}

impl EnumVariant {
    /// Variant backed by text.
    #[must_use]
    pub const fn text(name: &'static str, backing: &'static str) -> Self {
        Self {
            name,
            backing: EnumBacking::Text(backing),
        }
    }

    /// Variant backed by an integer.
    #[must_use]
    pub const fn int(name: &'static str, backing: i64) -> Self {
        Self {
            name,
            backing: EnumBacking::Int(backing),
        }
    }
}

///
/// EnumBacking
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnumBacking {
    Int(i64),
    Text(&'static str),
}

impl EnumBacking {
    fn matches(self, raw: &Value) -> bool {
        match (self, raw) {
            (Self::Text(t), Value::Text(s)) => t == s,
            (Self::Int(i), Value::Int(n)) => i == *n,
            (Self::Int(i), Value::Text(s)) => s.trim().parse::<i64>().is_ok_and(|n| n == i),
            _ => false,
        }
    }
}

impl fmt::Display for EnumBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(t) => write!(f, "{t}"),
        }
    }
}
