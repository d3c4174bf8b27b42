use crate::{
    decorate::register_object,
    model::{
        field::{FieldKind, FieldModel, Visibility},
        metadata::{Getter, ModelMetadata},
    },
    traits::{DecoratorType, FieldType, ModelEnum},
    value::Value,
};
use convert_case::{Case, Casing};
use std::collections::BTreeMap;

///
/// ModelBuilder
///
/// Explicit registration step for one model kind. `ModelKind::declare`
/// receives a builder and lists every field; the cache calls it once per
/// concrete type.
///

pub struct ModelBuilder {
    path: &'static str,
    identifier: Option<String>,
    primary_key: Option<Vec<&'static str>>,
    fields: Vec<FieldModel>,
    virtuals: BTreeMap<&'static str, Getter>,
}

impl ModelBuilder {
    #[must_use]
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            identifier: None,
            primary_key: None,
            fields: Vec::new(),
            virtuals: BTreeMap::new(),
        }
    }

    /// Declare a field of the given kind.
    ///
    /// Redeclaring a name replaces the earlier declaration in place.
    pub fn field(&mut self, name: &'static str, kind: FieldKind) -> FieldBuilder<'_> {
        let slot = match self.fields.iter().position(|f| f.name == name) {
            Some(slot) => {
                self.fields[slot] = FieldModel::new(name, kind);
                slot
            }
            None => {
                self.fields.push(FieldModel::new(name, kind));
                self.fields.len() - 1
            }
        };

        FieldBuilder {
            field: &mut self.fields[slot],
        }
    }

    /// Declare a field whose kind and nullability follow a Rust type.
    pub fn typed<T: FieldType>(&mut self, name: &'static str) -> FieldBuilder<'_> {
        let mut builder = self.field(name, T::KIND);
        if T::NULLABLE {
            builder.nullable();
        }

        builder
    }

    /// Declare an enum-typed field.
    pub fn enumeration<E: ModelEnum>(&mut self, name: &'static str) -> FieldBuilder<'_> {
        self.field(name, FieldKind::Enum(E::MODEL))
    }

    /// Declare an object-typed field and make sure `T` can be resolved.
    pub fn object<T: DecoratorType>(&mut self, name: &'static str) -> FieldBuilder<'_> {
        register_object::<T>();

        self.field(name, FieldKind::Object(T::PATH))
    }

    /// Declare an object-typed field by path only. The type must be
    /// registered before the field is decorated.
    pub fn object_named(&mut self, name: &'static str, path: &'static str) -> FieldBuilder<'_> {
        self.field(name, FieldKind::Object(path))
    }

    /// Register a virtual property. Registering a name twice keeps the
    /// last getter.
    pub fn getter(&mut self, name: &'static str, getter: Getter) -> &mut Self {
        self.virtuals.insert(name, getter);
        self
    }

    pub fn identifier(&mut self, identifier: impl Into<String>) -> &mut Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn primary_key(&mut self, fields: &[&'static str]) -> &mut Self {
        self.primary_key = Some(fields.to_vec());
        self
    }

    #[must_use]
    pub fn build(self) -> ModelMetadata {
        let identifier = self
            .identifier
            .unwrap_or_else(|| default_identifier(self.path));
        let primary_key = self.primary_key.unwrap_or_else(|| vec!["id"]);

        ModelMetadata::new(self.path, identifier, primary_key, self.fields, self.virtuals)
    }
}

// last path segment, snake-cased: `demo::MyTableModel` -> `my_table_model`
fn default_identifier(path: &str) -> String {
    let name = path.rsplit("::").next().unwrap_or(path);

    name.to_case(Case::Snake)
}

///
/// FieldBuilder
///

pub struct FieldBuilder<'a> {
    field: &'a mut FieldModel,
}

impl FieldBuilder<'_> {
    pub const fn nullable(&mut self) -> &mut Self {
        self.field.nullable = true;
        self
    }

    pub const fn read_only(&mut self) -> &mut Self {
        self.field.read_only = true;
        self
    }

    pub const fn protected(&mut self) -> &mut Self {
        self.field.visibility = Visibility::Protected;
        self
    }

    pub const fn private(&mut self) -> &mut Self {
        self.field.visibility = Visibility::Private;
        self
    }

    /// Exclude the field from decoration. It stays readable and writable.
    pub const fn no_decoration(&mut self) -> &mut Self {
        self.field.decorate = false;
        self
    }

    pub fn default(&mut self, value: impl Into<Value>) -> &mut Self {
        self.field.default = Some(value.into());
        self
    }

    /// Append a literal construction argument (kept in call order).
    pub fn construct(&mut self, arg: impl Into<Value>) -> &mut Self {
        self.field.construct_args.push(arg.into());
        self
    }
}
