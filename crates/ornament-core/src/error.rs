use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Runtime error surfaced by decoration, field access and persistence.
/// Every variant carries the model path it was raised for.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("cannot {op} '{field}' on {model}: {reason}")]
    Access {
        model: &'static str,
        field: String,
        op: AccessOp,
        reason: AccessViolation,
    },

    #[error("failed to construct {ty} for '{field}' on {model}: {source}")]
    Construct {
        model: &'static str,
        field: String,
        ty: &'static str,
        source: ConstructError,
    },

    #[error("a row with primary key [{key}] already exists on {model}")]
    DuplicateKey { model: &'static str, key: String },

    #[error("invalid value '{value}' for enum {path} ('{field}' on {model})")]
    EnumDecode {
        model: &'static str,
        field: String,
        path: &'static str,
        value: String,
    },

    #[error("primary key '{field}' is not set on {model}")]
    MissingPrimaryKey { model: &'static str, field: String },

    #[error("no row matches primary key [{key}] on {model}")]
    NotFound { model: &'static str, key: String },

    #[error("unknown decorator type '{ty}' for '{field}' on {model}")]
    UnknownDecoratorType {
        model: &'static str,
        field: String,
        ty: &'static str,
    },

    #[error("unknown field '{field}' on {model}")]
    UnknownField { model: &'static str, field: String },
}

impl Error {
    pub(crate) fn access(
        model: &'static str,
        field: impl Into<String>,
        op: AccessOp,
        reason: AccessViolation,
    ) -> Self {
        Self::Access {
            model,
            field: field.into(),
            op,
            reason,
        }
    }

    pub(crate) fn unknown_field(model: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            model,
            field: field.into(),
        }
    }

    /// Classify this error for callers that branch on failure kind.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Access { .. } => ErrorClass::Access,
            Self::UnknownDecoratorType { .. } | Self::UnknownField { .. } => {
                ErrorClass::Configuration
            }
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Construct { .. }
            | Self::DuplicateKey { .. }
            | Self::EnumDecode { .. }
            | Self::MissingPrimaryKey { .. } => ErrorClass::Validation,
        }
    }

    /// Access violation carried by this error, if any.
    #[must_use]
    pub const fn access_violation(&self) -> Option<AccessViolation> {
        match self {
            Self::Access { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ConstructError
///
/// Raised by an object constructor that rejects its argument list.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConstructError {
    #[error("expected {expected}, found {found}")]
    InvalidSource {
        expected: &'static str,
        found: String,
    },

    #[error("invalid construction argument {index}: {message}")]
    InvalidArgument { index: usize, message: String },
}

///
/// AccessOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessOp {
    Get,
    Set,
}

impl fmt::Display for AccessOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Get => "get",
            Self::Set => "set",
        };
        write!(f, "{label}")
    }
}

///
/// AccessViolation
/// Why a get/set was refused.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessViolation {
    /// Not a declared field nor a virtual property.
    Undeclared,
    /// Private field; holds state but is never exposed.
    NotExposed,
    /// Only public fields accept writes.
    NotPublic,
    /// Read-only fields are written once, during construction.
    ReadOnly,
    /// Virtual properties are computed and cannot be assigned.
    Virtual,
}

impl fmt::Display for AccessViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Undeclared => "no such property",
            Self::NotExposed => "property is private",
            Self::NotPublic => "only public properties can be set",
            Self::ReadOnly => "property is read-only",
            Self::Virtual => "virtual properties are read-only",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Access,
    Configuration,
    NotFound,
    Validation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Access => "access",
            Self::Configuration => "configuration",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_errors_render_operation_and_reason() {
        let err = Error::access("demo::CoreModel", "id", AccessOp::Set, AccessViolation::ReadOnly);

        assert_eq!(err.class(), ErrorClass::Access);
        assert_eq!(err.access_violation(), Some(AccessViolation::ReadOnly));
        assert_eq!(
            err.to_string(),
            "cannot set 'id' on demo::CoreModel: property is read-only"
        );
        assert!(
            err.display_with_class().starts_with("access: "),
            "class prefix should lead the rendered message"
        );
    }

    #[test]
    fn enum_decode_is_a_validation_failure() {
        let err = Error::EnumDecode {
            model: "demo::Ticket",
            field: "status".to_string(),
            path: "demo::Status",
            value: "bogus".to_string(),
        };

        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(err.access_violation(), None);
    }

    #[test]
    fn duplicate_keys_are_a_validation_failure() {
        let err = Error::DuplicateKey {
            model: "demo::Comment",
            key: "1".to_string(),
        };

        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(
            err.to_string(),
            "a row with primary key [1] already exists on demo::Comment"
        );
    }
}
