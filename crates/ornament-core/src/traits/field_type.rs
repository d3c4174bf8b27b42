use crate::{
    model::{FieldKind, PrimitiveKind},
    value::Value,
};
use std::collections::BTreeMap;

///
/// FieldType
///
/// Maps a Rust type onto a declared field kind. `Option<T>` keeps the
/// kind of `T` and marks the field nullable.
///

pub trait FieldType {
    const KIND: FieldKind;
    const NULLABLE: bool = false;
}

macro_rules! impl_field_type {
    ( $( $ty:ty => $kind:ident ),* $(,)? ) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::Primitive(PrimitiveKind::$kind);
            }
        )*
    };
}

impl_field_type!(
    bool => Bool,
    f32 => Float,
    f64 => Float,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    String => Text,
    () => Null,
);

impl<T> FieldType for Vec<T> {
    const KIND: FieldKind = FieldKind::Primitive(PrimitiveKind::List);
}

impl<T> FieldType for BTreeMap<String, T> {
    const KIND: FieldKind = FieldKind::Primitive(PrimitiveKind::Map);
}

impl FieldType for Value {
    const KIND: FieldKind = FieldKind::Untyped;
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = true;
}
