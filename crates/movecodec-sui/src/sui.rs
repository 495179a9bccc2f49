//! `0x2::sui::SUI`, the native coin's one-time witness.

use movecodec_core::{
    builtin, encode_record, Encode, FieldWriter, MoveStruct, PhantomReified, Reified, Repr,
    StructBuilder, StructTag,
};
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::{base_tag, is_base};

pub const SUI_TYPE: &str = "0x2::sui::SUI";

static SUI_TAG: OnceLock<StructTag> = OnceLock::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SUI {
    pub dummy_field: bool,
}

impl SUI {
    pub fn reified() -> Reified<SUI> {
        let flag = builtin::bool();
        StructBuilder::new(SUI_TYPE)
            .field_of("dummy_field", &flag)
            .build(move |r| {
                Ok(SUI {
                    dummy_field: r.decode("dummy_field", &flag)?,
                })
            })
    }

    /// `SUI` as a phantom argument, e.g. for `Balance<SUI>`.
    pub fn phantom() -> PhantomReified {
        Self::reified().phantom()
    }

    pub fn is_type(type_string: &str) -> bool {
        is_base(type_string, SUI_TYPE)
    }
}

impl MoveStruct for SUI {
    fn struct_tag(&self) -> &StructTag {
        SUI_TAG.get_or_init(|| base_tag(SUI_TYPE))
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr)
            .field("dummy_field", &self.dummy_field)
            .finish()
    }
}

impl Encode for SUI {
    fn encode(&self, repr: Repr) -> Value {
        encode_record(self, repr)
    }
}
