//! `0x2::borrow`: a hot-potato wrapper for lending out a stored value.

use movecodec_core::{
    builtin, encode_record, instantiate, Address, Encode, FieldWriter, IntoTypeArgument,
    MoveStruct, MoveType, PhantomReified, Reified, Repr, StructBuilder, StructTag,
};
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::object::ID;
use crate::{base_tag, is_base};

pub const REFERENT_TYPE: &str = "0x2::borrow::Referent";
pub const BORROW_TYPE: &str = "0x2::borrow::Borrow";

static BORROW_TAG: OnceLock<StructTag> = OnceLock::new();

/// Whether `type_string` is any instantiation of `Referent`.
pub fn is_referent(type_string: &str) -> bool {
    is_base(type_string, REFERENT_TYPE)
}

/// `0x2::borrow::Referent<T> { id: address, value: Option<T> }`
#[derive(Debug, Clone, PartialEq)]
pub struct Referent<T> {
    tag: StructTag,
    pub id: Address,
    pub value: Option<T>,
}

impl<T: MoveType> Referent<T> {
    pub fn new(t: &Reified<T>, id: Address, value: Option<T>) -> Self {
        Self {
            tag: instantiate(REFERENT_TYPE, &[t.to_type_argument()]),
            id,
            value,
        }
    }

    pub fn reified(t: &Reified<T>) -> Reified<Referent<T>> {
        let id = builtin::address();
        let value = builtin::option(t);
        StructBuilder::new(REFERENT_TYPE)
            .type_arg(t)
            .field_of("id", &id)
            .field_of("value", &value)
            .build(move |r| {
                Ok(Referent {
                    tag: r.struct_tag().clone(),
                    id: r.decode("id", &id)?,
                    value: r.decode("value", &value)?,
                })
            })
    }

    pub fn phantom(t: &Reified<T>) -> PhantomReified {
        Self::reified(t).phantom()
    }
}

impl<T: MoveType> MoveStruct for Referent<T> {
    fn struct_tag(&self) -> &StructTag {
        &self.tag
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr)
            .field("id", &self.id)
            .field("value", &self.value)
            .finish()
    }
}

impl<T: MoveType> Encode for Referent<T> {
    fn encode(&self, repr: Repr) -> Value {
        encode_record(self, repr)
    }
}

/// `0x2::borrow::Borrow { ref: address, obj: ID }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Borrow {
    pub ref_: Address,
    pub obj: ID,
}

impl Borrow {
    pub fn new(ref_: Address, obj: ID) -> Self {
        Self { ref_, obj }
    }

    pub fn phantom() -> PhantomReified {
        Self::reified().phantom()
    }

    pub fn reified() -> Reified<Borrow> {
        let address = builtin::address();
        let id = ID::reified();
        StructBuilder::new(BORROW_TYPE)
            .field_of("ref", &address)
            .field_of("obj", &id)
            .build(move |r| {
                Ok(Borrow {
                    ref_: r.decode("ref", &address)?,
                    obj: r.decode("obj", &id)?,
                })
            })
    }

    pub fn is_type(type_string: &str) -> bool {
        is_base(type_string, BORROW_TYPE)
    }
}

impl MoveStruct for Borrow {
    fn struct_tag(&self) -> &StructTag {
        BORROW_TAG.get_or_init(|| base_tag(BORROW_TYPE))
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr)
            .field("ref", &self.ref_)
            .field("obj", &self.obj)
            .finish()
    }
}

impl Encode for Borrow {
    fn encode(&self, repr: Repr) -> Value {
        encode_record(self, repr)
    }
}
