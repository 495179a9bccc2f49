//! Encoding: projections of decoded values back into each representation.

use serde_json::{Map, Value};
use std::fmt;

use crate::fields::{RawFields, Repr, TypedFields};
use crate::type_name::StructTag;

/// Projects a host value into one of the source representations.
pub trait Encode {
    fn encode(&self, repr: Repr) -> Value;

    /// True for `Option<T>`. Lets an enclosing option pick a shape that keeps
    /// `Some(None)` apart from `None`.
    #[doc(hidden)]
    fn is_option() -> bool
    where
        Self: Sized,
    {
        false
    }
}

/// Bound for host types that stand in for Move values.
pub trait MoveType: Encode + Clone + fmt::Debug + PartialEq + Send + Sync + 'static {}

impl<T> MoveType for T where T: Encode + Clone + fmt::Debug + PartialEq + Send + Sync + 'static {}

/// A decoded record value.
pub trait MoveStruct: MoveType {
    /// The record's full type, including its instantiated arguments.
    fn struct_tag(&self) -> &StructTag;

    /// The record's own fields, each encoded in `repr`.
    fn encode_fields(&self, repr: Repr) -> Map<String, Value>;

    /// Canonical full type name.
    fn type_name(&self) -> String {
        self.struct_tag().to_string()
    }

    fn to_fields(&self) -> RawFields {
        self.encode_fields(Repr::Raw)
    }

    fn to_fields_with_types(&self) -> TypedFields {
        TypedFields::new(self.type_name(), self.encode_fields(Repr::Typed))
    }

    /// Value-only projection: nested records are projected recursively.
    fn to_json_field(&self) -> Value {
        self.encode(Repr::Json)
    }

    /// Full projection: the field projection plus `$typeName` and, for
    /// generic records, `$typeArgs`.
    fn to_json(&self) -> Value {
        let tag = self.struct_tag();
        let mut obj = Map::new();
        obj.insert("$typeName".into(), Value::String(tag.base_name()));
        if !tag.type_params.is_empty() {
            obj.insert(
                "$typeArgs".into(),
                Value::Array(
                    tag.type_param_names()
                        .into_iter()
                        .map(Value::String)
                        .collect(),
                ),
            );
        }
        obj.extend(self.encode_fields(Repr::Json));
        Value::Object(obj)
    }
}

/// The standard [`Encode`] body for records: a plain field object in the raw
/// and JSON representations, `{ "type", "fields" }` in the typed one.
pub fn encode_record<S: MoveStruct>(record: &S, repr: Repr) -> Value {
    match repr {
        Repr::Raw | Repr::Json => Value::Object(record.encode_fields(repr)),
        Repr::Typed => record.to_fields_with_types().into_value(),
    }
}

/// Collects encoded fields in declaration order.
pub struct FieldWriter {
    repr: Repr,
    fields: Map<String, Value>,
}

impl FieldWriter {
    pub fn new(repr: Repr) -> Self {
        Self {
            repr,
            fields: Map::new(),
        }
    }

    pub fn field(mut self, name: &str, value: &dyn Encode) -> Self {
        self.fields.insert(name.to_string(), value.encode(self.repr));
        self
    }

    pub fn finish(self) -> Map<String, Value> {
        self.fields
    }
}
