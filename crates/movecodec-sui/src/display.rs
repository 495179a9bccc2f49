//! `0x2::display`: per-type display templates and the events emitted when
//! they change.

use movecodec_core::{
    builtin, encode_record, instantiate, Encode, FieldWriter, IntoTypeArgument, MoveStruct,
    PhantomReified, Reified, Repr, StructBuilder, StructTag,
};
use serde_json::{Map, Value};

use crate::object::{ID, UID};
use crate::vec_map::VecMap;
use crate::is_base;

pub const DISPLAY_TYPE: &str = "0x2::display::Display";
pub const DISPLAY_CREATED_TYPE: &str = "0x2::display::DisplayCreated";
pub const VERSION_UPDATED_TYPE: &str = "0x2::display::VersionUpdated";

fn template_map() -> Reified<VecMap<String, String>> {
    VecMap::reified(&builtin::string(), &builtin::string())
}

/// `0x2::display::Display<phantom T> { id: UID, fields: VecMap<String, String>, version: u16 }`
#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    tag: StructTag,
    pub id: UID,
    pub fields: VecMap<String, String>,
    pub version: u16,
}

impl Display {
    pub fn new(
        t: &impl IntoTypeArgument,
        id: UID,
        fields: VecMap<String, String>,
        version: u16,
    ) -> Self {
        Self {
            tag: instantiate(DISPLAY_TYPE, &[t.to_type_argument()]),
            id,
            fields,
            version,
        }
    }

    pub fn reified(t: &impl IntoTypeArgument) -> Reified<Display> {
        let (id, fields, version) = (UID::reified(), template_map(), builtin::u16());
        StructBuilder::new(DISPLAY_TYPE)
            .type_arg(t)
            .field_of("id", &id)
            .field_of("fields", &fields)
            .field_of("version", &version)
            .build(move |r| {
                Ok(Display {
                    tag: r.struct_tag().clone(),
                    id: r.decode("id", &id)?,
                    fields: r.decode("fields", &fields)?,
                    version: r.decode("version", &version)?,
                })
            })
    }

    pub fn phantom(t: &impl IntoTypeArgument) -> PhantomReified {
        Self::reified(t).phantom()
    }

    pub fn is_type(type_string: &str) -> bool {
        is_base(type_string, DISPLAY_TYPE)
    }

    /// Template for `key`, if one is set.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }
}

impl MoveStruct for Display {
    fn struct_tag(&self) -> &StructTag {
        &self.tag
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr)
            .field("id", &self.id)
            .field("fields", &self.fields)
            .field("version", &self.version)
            .finish()
    }
}

impl Encode for Display {
    fn encode(&self, repr: Repr) -> Value {
        encode_record(self, repr)
    }
}

/// `0x2::display::DisplayCreated<phantom T> { id: ID }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCreated {
    tag: StructTag,
    pub id: ID,
}

impl DisplayCreated {
    pub fn new(t: &impl IntoTypeArgument, id: ID) -> Self {
        Self {
            tag: instantiate(DISPLAY_CREATED_TYPE, &[t.to_type_argument()]),
            id,
        }
    }

    pub fn reified(t: &impl IntoTypeArgument) -> Reified<DisplayCreated> {
        let id = ID::reified();
        StructBuilder::new(DISPLAY_CREATED_TYPE)
            .type_arg(t)
            .field_of("id", &id)
            .build(move |r| {
                Ok(DisplayCreated {
                    tag: r.struct_tag().clone(),
                    id: r.decode("id", &id)?,
                })
            })
    }

    pub fn phantom(t: &impl IntoTypeArgument) -> PhantomReified {
        Self::reified(t).phantom()
    }

    pub fn is_type(type_string: &str) -> bool {
        is_base(type_string, DISPLAY_CREATED_TYPE)
    }
}

impl MoveStruct for DisplayCreated {
    fn struct_tag(&self) -> &StructTag {
        &self.tag
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr).field("id", &self.id).finish()
    }
}

impl Encode for DisplayCreated {
    fn encode(&self, repr: Repr) -> Value {
        encode_record(self, repr)
    }
}

/// `0x2::display::VersionUpdated<phantom T> { id: ID, version: u16, fields: VecMap<String, String> }`
#[derive(Debug, Clone, PartialEq)]
pub struct VersionUpdated {
    tag: StructTag,
    pub id: ID,
    pub version: u16,
    pub fields: VecMap<String, String>,
}

impl VersionUpdated {
    pub fn new(
        t: &impl IntoTypeArgument,
        id: ID,
        version: u16,
        fields: VecMap<String, String>,
    ) -> Self {
        Self {
            tag: instantiate(VERSION_UPDATED_TYPE, &[t.to_type_argument()]),
            id,
            version,
            fields,
        }
    }

    pub fn reified(t: &impl IntoTypeArgument) -> Reified<VersionUpdated> {
        let (id, version, fields) = (ID::reified(), builtin::u16(), template_map());
        StructBuilder::new(VERSION_UPDATED_TYPE)
            .type_arg(t)
            .field_of("id", &id)
            .field_of("version", &version)
            .field_of("fields", &fields)
            .build(move |r| {
                Ok(VersionUpdated {
                    tag: r.struct_tag().clone(),
                    id: r.decode("id", &id)?,
                    version: r.decode("version", &version)?,
                    fields: r.decode("fields", &fields)?,
                })
            })
    }

    pub fn phantom(t: &impl IntoTypeArgument) -> PhantomReified {
        Self::reified(t).phantom()
    }

    pub fn is_type(type_string: &str) -> bool {
        is_base(type_string, VERSION_UPDATED_TYPE)
    }
}

impl MoveStruct for VersionUpdated {
    fn struct_tag(&self) -> &StructTag {
        &self.tag
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr)
            .field("id", &self.id)
            .field("version", &self.version)
            .field("fields", &self.fields)
            .finish()
    }
}

impl Encode for VersionUpdated {
    fn encode(&self, repr: Repr) -> Value {
        encode_record(self, repr)
    }
}
