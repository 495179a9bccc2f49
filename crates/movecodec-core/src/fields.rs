//! Field containers handed to the decoding engine, and the per-record field
//! reader that walks them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::reified::Reified;
use crate::type_name::StructTag;

/// Field name -> untyped value, in the shape produced by BCS parsing.
pub type RawFields = Map<String, Value>;

/// Which source representation a value is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repr {
    /// Raw fields, as produced by parsing BCS.
    Raw,
    /// RPC content annotated with declared types (`{ "type", "fields" }`).
    Typed,
    /// The JSON projection produced by `to_json_field`.
    Json,
}

/// Record content as returned by an RPC layer that annotates values with
/// their declared on-chain type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedFields {
    #[serde(rename = "type")]
    pub type_: String,
    pub fields: Map<String, Value>,
}

impl TypedFields {
    pub fn new(type_: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            type_: type_.into(),
            fields,
        }
    }

    /// Reads `{ "type": ..., "fields": { ... } }` out of a JSON value.
    pub fn from_value(value: &Value) -> Result<(&str, &Map<String, Value>), DecodeError> {
        let obj = value
            .as_object()
            .ok_or_else(|| DecodeError::invalid("typed struct object", value))?;
        let type_ = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::MissingField {
                field: "type".into(),
            })?;
        let fields = obj
            .get("fields")
            .and_then(Value::as_object)
            .ok_or_else(|| DecodeError::MissingField {
                field: "fields".into(),
            })?;
        Ok((type_, fields))
    }

    pub fn into_value(self) -> Value {
        let mut obj = Map::with_capacity(2);
        obj.insert("type".into(), Value::String(self.type_));
        obj.insert("fields".into(), Value::Object(self.fields));
        Value::Object(obj)
    }
}

/// Read access to one record's fields during decoding.
///
/// Record constructors pull each declared field by name with the field's own
/// descriptor; the reader applies whichever representation is being decoded.
pub struct FieldReader<'a> {
    tag: &'a StructTag,
    fields: &'a Map<String, Value>,
    repr: Repr,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(tag: &'a StructTag, fields: &'a Map<String, Value>, repr: Repr) -> Self {
        Self { tag, fields, repr }
    }

    /// The full type of the record being decoded, including its arguments.
    pub fn struct_tag(&self) -> &'a StructTag {
        self.tag
    }

    pub fn repr(&self) -> Repr {
        self.repr
    }

    /// Decode the field `name` with the descriptor `ty`.
    pub fn decode<F>(&self, name: &str, ty: &Reified<F>) -> Result<F, DecodeError> {
        let value = self.fields.get(name).ok_or_else(|| DecodeError::MissingField {
            field: name.to_string(),
        })?;
        ty.decode_value(value, self.repr)
            .map_err(|e| e.in_field(name))
    }
}
