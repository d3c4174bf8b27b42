use crate::{
    decorate::ConstructArgs,
    error::ConstructError,
    instance::FieldSet,
    model::{EnumModel, EnumVariant, ModelBuilder},
    traits::{Any, Decorator, DecoratorType, ModelEnum, ModelKind, ObjectKind},
    types::DateTime,
    value::Value,
};

///
/// CoreModel
/// read-only id, defaulted name, private flag
///

pub struct CoreModel;

impl ModelKind for CoreModel {
    const PATH: &'static str = "test_fixtures::CoreModel";

    fn declare(model: &mut ModelBuilder) {
        model.typed::<i64>("id").read_only();
        model.typed::<String>("name").default("Marijn");
        model.typed::<bool>("invisible").private().default(true);
    }
}

///
/// StateModel
///

pub struct StateModel;

impl ModelKind for StateModel {
    const PATH: &'static str = "test_fixtures::StateModel";

    fn declare(model: &mut ModelBuilder) {
        model.typed::<i64>("id").read_only();
        model.typed::<String>("name").default("Marijn");
        model.typed::<Option<String>>("note");
        model.typed::<String>("secret").protected().default("s3cret");
        model.typed::<bool>("invisible").private().default(true);
    }
}

///
/// ScoreModel
///

pub struct ScoreModel;

impl ModelKind for ScoreModel {
    const PATH: &'static str = "test_fixtures::ScoreModel";

    fn declare(model: &mut ModelBuilder) {
        model.typed::<f64>("score");
    }
}

///
/// VersionedModel
/// Read-only field with a default.
///

pub struct VersionedModel;

impl ModelKind for VersionedModel {
    const PATH: &'static str = "test_fixtures::VersionedModel";

    fn declare(model: &mut ModelBuilder) {
        model.typed::<i64>("version").read_only().default(1);
        model.typed::<String>("name");
    }
}

///
/// SubtractOne
/// Decorator whose derived value is its integer source minus one.
///

#[derive(Debug)]
pub struct SubtractOne {
    source: Value,
    pub field: Option<&'static str>,
}

impl Decorator for SubtractOne {
    fn path(&self) -> &'static str {
        Self::PATH
    }

    fn source(&self) -> &Value {
        &self.source
    }

    fn value(&self) -> Value {
        match self.source.as_int() {
            Some(n) => Value::Int(n - 1),
            None => Value::Null,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DecoratorType for SubtractOne {
    const PATH: &'static str = "test_fixtures::SubtractOne";
    const KIND: ObjectKind = ObjectKind::Decorator;

    fn construct(args: ConstructArgs) -> Result<Self, ConstructError> {
        let source = match args.source {
            Value::Int(n) => Value::Int(n),
            Value::Text(ref text) => text
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| ConstructError::InvalidSource {
                    expected: "integer",
                    found: text.clone(),
                })?,
            other => {
                return Err(ConstructError::InvalidSource {
                    expected: "integer",
                    found: other.to_string(),
                });
            }
        };

        Ok(Self {
            source,
            field: args.field.map(|field| field.name),
        })
    }
}

///
/// Point
/// Plain object: never receives the field back-reference.
///

#[derive(Debug)]
pub struct Point {
    source: Value,
    pub saw_field: bool,
    pub extra: Vec<Value>,
}

impl Decorator for Point {
    fn path(&self) -> &'static str {
        Self::PATH
    }

    fn source(&self) -> &Value {
        &self.source
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DecoratorType for Point {
    const PATH: &'static str = "test_fixtures::Point";
    const KIND: ObjectKind = ObjectKind::Plain;

    fn construct(args: ConstructArgs) -> Result<Self, ConstructError> {
        Ok(Self {
            source: args.source,
            saw_field: args.field.is_some(),
            extra: args.extra,
        })
    }
}

fn virtual_property(fields: &FieldSet) -> Value {
    Value::Text(
        fields
            .value("field")
            .map(ToString::to_string)
            .unwrap_or_default(),
    )
}

fn shadowed(_: &FieldSet) -> Value {
    Value::from("first")
}

fn field_plus_private(fields: &FieldSet) -> Value {
    let hidden = fields.value("hidden").and_then(Value::as_int).unwrap_or(0);

    Value::Int(hidden + 1)
}

///
/// DecoratedModel
///

pub struct DecoratedModel;

impl ModelKind for DecoratedModel {
    const PATH: &'static str = "test_fixtures::DecoratedModel";

    fn declare(model: &mut ModelBuilder) {
        model.object::<SubtractOne>("field");
        model.object::<Point>("point").nullable().construct(1).construct("two");
        model.typed::<i64>("hidden").private().default(41);
        model
            .getter("virtual_property", shadowed)
            .getter("virtual_property", virtual_property)
            .getter("hidden_plus_one", field_plus_private);
    }
}

///
/// DateTimeModel
///

pub struct DateTimeModel;

impl ModelKind for DateTimeModel {
    const PATH: &'static str = "test_fixtures::DateTimeModel";

    fn declare(model: &mut ModelBuilder) {
        model
            .object::<DateTime>("datecreated")
            .read_only()
            .construct("+09:00");
    }
}

///
/// Status / Priority
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Active,
    Inactive,
}

impl ModelEnum for Status {
    const MODEL: &'static EnumModel = &EnumModel::new(
        "test_fixtures::Status",
        &[
            EnumVariant::text("Active", "active"),
            EnumVariant::text("Inactive", "inactive"),
        ],
    );

    fn from_variant(variant: &str) -> Option<Self> {
        match variant {
            "Active" => Some(Self::Active),
            "Inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    fn variant(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Priority {
    Low,
    High,
}

impl ModelEnum for Priority {
    const MODEL: &'static EnumModel = &EnumModel::new(
        "test_fixtures::Priority",
        &[EnumVariant::int("Low", 1), EnumVariant::int("High", 2)],
    );

    fn from_variant(variant: &str) -> Option<Self> {
        match variant {
            "Low" => Some(Self::Low),
            "High" => Some(Self::High),
            _ => None,
        }
    }

    fn variant(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::High => "High",
        }
    }
}

///
/// EnumModelFixture
///

pub struct EnumModelFixture;

impl ModelKind for EnumModelFixture {
    const PATH: &'static str = "test_fixtures::EnumModelFixture";

    fn declare(model: &mut ModelBuilder) {
        model.enumeration::<Status>("status");
        model.enumeration::<Priority>("priority").nullable();
    }
}

///
/// OverlapA / OverlapB
/// Distinct kinds sharing field names.
///

pub struct OverlapA;

impl ModelKind for OverlapA {
    const PATH: &'static str = "test_fixtures::OverlapA";

    fn declare(model: &mut ModelBuilder) {
        model.typed::<i64>("shared");
        model.typed::<String>("only_a");
    }
}

pub struct OverlapB;

impl ModelKind for OverlapB {
    const PATH: &'static str = "test_fixtures::OverlapB";

    fn declare(model: &mut ModelBuilder) {
        model.typed::<Option<String>>("shared").protected();
    }
}

///
/// PlainModel
/// nullable primitives, an opted-out field and an untyped field
///

pub struct PlainModel;

impl ModelKind for PlainModel {
    const PATH: &'static str = "test_fixtures::PlainModel";

    fn declare(model: &mut ModelBuilder) {
        model.typed::<Option<String>>("nickname");
        model.typed::<String>("title");
        model.typed::<Option<i64>>("age");
        model.typed::<String>("raw").no_decoration();
        model.typed::<Value>("anything");
        model.object_named("missing", "test_fixtures::Unregistered");
    }
}

///
/// MyTableModel
///

pub struct MyTableModel;

impl ModelKind for MyTableModel {
    const PATH: &'static str = "test_fixtures::MyTableModel";

    fn declare(model: &mut ModelBuilder) {
        model.typed::<Option<i64>>("id");
        model.typed::<Option<String>>("name");
        model.typed::<Option<String>>("comment");
        model.typed::<Option<String>>("token").private();
    }
}

///
/// LinkModel
/// Composite key, explicit identifier.
///

pub struct LinkModel;

impl ModelKind for LinkModel {
    const PATH: &'static str = "test_fixtures::LinkModel";

    fn declare(model: &mut ModelBuilder) {
        model.typed::<i64>("a").read_only();
        model.typed::<i64>("b").read_only();
        model.typed::<Option<i64>>("points");
        model.identifier("links").primary_key(&["a", "b"]);
    }
}
