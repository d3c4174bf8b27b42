use crate::{model::FieldModel, value::Value};
use std::sync::Arc;

///
/// ConstructArgs
///
/// Ordered argument list handed to an object constructor: the raw value,
/// then the originating field (decorator kinds only), then the field's
/// literal construction arguments in declaration order.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ConstructArgs {
    pub source: Value,
    pub field: Option<Arc<FieldModel>>,
    pub extra: Vec<Value>,
}

impl ConstructArgs {
    #[must_use]
    pub const fn new(source: Value) -> Self {
        Self {
            source,
            field: None,
            extra: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: Arc<FieldModel>) -> Self {
        self.field = Some(field);
        self
    }

    #[must_use]
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = Value>) -> Self {
        self.extra.extend(extra);
        self
    }

    /// Extra argument by position (0 = first literal argument).
    #[must_use]
    pub fn extra_arg(&self, index: usize) -> Option<&Value> {
        self.extra.get(index)
    }
}
