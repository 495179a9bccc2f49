//! `0x2::object`: object identifiers.
//!
//! Both records are rendered flattened by the RPC layer: an `ID` is a bare
//! address string and a `UID` is `{ "id": "0x..." }`.

use movecodec_core::{
    builtin, encode_record, Address, DecodeError, Encode, MoveStruct, PhantomReified, Reified,
    Repr, StructBuilder, StructTag,
};
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

use crate::{base_tag, is_base};

pub const ID_TYPE: &str = "0x2::object::ID";
pub const UID_TYPE: &str = "0x2::object::UID";

/// `0x2::object::ID { bytes: address }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ID {
    pub bytes: Address,
}

impl ID {
    pub fn new(bytes: Address) -> Self {
        Self { bytes }
    }

    pub fn phantom() -> PhantomReified {
        Self::reified().phantom()
    }

    pub fn reified() -> Reified<ID> {
        let address = builtin::address();
        let flat = |value: &Value, repr: Repr| builtin::address().decode_value(value, repr).map(ID::new);
        StructBuilder::new(ID_TYPE)
            .field_of("bytes", &address)
            .flatten_typed(flat)
            .flatten_json(flat)
            .build(move |r| Ok(ID::new(r.decode("bytes", &address)?)))
    }

    pub fn is_type(type_string: &str) -> bool {
        is_base(type_string, ID_TYPE)
    }
}

impl MoveStruct for ID {
    fn struct_tag(&self) -> &StructTag {
        ID_TAG.get_or_init(|| base_tag(ID_TYPE))
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("bytes".into(), self.bytes.encode(repr));
        fields
    }
}

impl Encode for ID {
    fn encode(&self, repr: Repr) -> Value {
        match repr {
            Repr::Raw => encode_record(self, repr),
            Repr::Typed | Repr::Json => self.bytes.encode(repr),
        }
    }
}

/// `0x2::object::UID { id: ID }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UID {
    pub id: ID,
}

impl UID {
    pub fn new(id: Address) -> Self {
        Self { id: ID::new(id) }
    }

    pub fn address(&self) -> Address {
        self.id.bytes
    }

    pub fn phantom() -> PhantomReified {
        Self::reified().phantom()
    }

    pub fn reified() -> Reified<UID> {
        let id = ID::reified();
        let flat_id = id.clone();
        let flat = move |value: &Value, repr: Repr| -> Result<UID, DecodeError> {
            let inner = value
                .get("id")
                .ok_or_else(|| DecodeError::MissingField { field: "id".into() })?;
            flat_id
                .decode_value(inner, repr)
                .map(|id| UID { id })
                .map_err(|e| e.in_field("id"))
        };
        StructBuilder::new(UID_TYPE)
            .field_of("id", &id)
            .flatten_typed(flat)
            .build(move |r| Ok(UID { id: r.decode("id", &id)? }))
    }

    pub fn is_type(type_string: &str) -> bool {
        is_base(type_string, UID_TYPE)
    }
}

impl MoveStruct for UID {
    fn struct_tag(&self) -> &StructTag {
        UID_TAG.get_or_init(|| base_tag(UID_TYPE))
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("id".into(), self.id.encode(repr));
        fields
    }
}

impl Encode for UID {
    fn encode(&self, repr: Repr) -> Value {
        match repr {
            Repr::Raw | Repr::Json => encode_record(self, repr),
            Repr::Typed => json!({ "id": self.id.encode(repr) }),
        }
    }
}

static ID_TAG: OnceLock<StructTag> = OnceLock::new();
static UID_TAG: OnceLock<StructTag> = OnceLock::new();
