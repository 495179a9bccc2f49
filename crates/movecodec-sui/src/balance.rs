//! `0x2::balance`: `Balance<phantom T>` and `Supply<phantom T>`.
//!
//! The coin type is phantom, so it only shows up in the type name. The RPC
//! layer renders a nested `Balance` as its bare decimal value.

use movecodec_core::{
    builtin, encode_record, instantiate, is_type, DecodeError, Encode, FieldWriter,
    IntoTypeArgument, MoveStruct, PhantomReified, Reified, Repr, StructBuilder, StructTag,
};
use serde_json::{Map, Value};

use crate::base_tag;

pub const BALANCE_TYPE: &str = "0x2::balance::Balance";
pub const SUPPLY_TYPE: &str = "0x2::balance::Supply";

/// `0x2::balance::Balance<phantom T> { value: u64 }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    tag: StructTag,
    pub value: u64,
}

impl Balance {
    pub fn new(coin: &impl IntoTypeArgument, value: u64) -> Self {
        Self {
            tag: instantiate(BALANCE_TYPE, &[coin.to_type_argument()]),
            value,
        }
    }

    pub fn reified(coin: &impl IntoTypeArgument) -> Reified<Balance> {
        let value = builtin::u64();
        let flat_value = value.clone();
        let tag = instantiate(BALANCE_TYPE, &[coin.to_type_argument()]);
        StructBuilder::new(BALANCE_TYPE)
            .type_arg(coin)
            .field_of("value", &value)
            .flatten_typed(move |v, repr| {
                Ok(Balance {
                    tag: tag.clone(),
                    value: flat_value.decode_value(v, repr)?,
                })
            })
            .build(move |r| {
                Ok(Balance {
                    tag: r.struct_tag().clone(),
                    value: r.decode("value", &value)?,
                })
            })
    }

    pub fn phantom(coin: &impl IntoTypeArgument) -> PhantomReified {
        Self::reified(coin).phantom()
    }

    /// Whether `type_string` is any instantiation of `Balance`.
    pub fn is_type(type_string: &str) -> bool {
        is_type(type_string, &base_tag(BALANCE_TYPE))
    }

    /// Canonical name of the coin type.
    pub fn coin_type(&self) -> String {
        self.tag.type_param_names().into_iter().next().unwrap_or_default()
    }

    /// Adds `other` to this balance. Both must share a coin type.
    pub fn join(&mut self, other: Balance) -> Result<u64, DecodeError> {
        if self.tag != other.tag {
            return Err(DecodeError::TypeMismatch {
                expected: self.tag.to_string(),
                got: other.tag.to_string(),
            });
        }
        self.value = self
            .value
            .checked_add(other.value)
            .ok_or_else(|| DecodeError::InvalidValue {
                expected: "u64 balance".into(),
                got: format!("{} + {}", self.value, other.value),
            })?;
        Ok(self.value)
    }
}

impl MoveStruct for Balance {
    fn struct_tag(&self) -> &StructTag {
        &self.tag
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr).field("value", &self.value).finish()
    }
}

impl Encode for Balance {
    fn encode(&self, repr: Repr) -> Value {
        match repr {
            Repr::Typed => self.value.encode(repr),
            Repr::Raw | Repr::Json => encode_record(self, repr),
        }
    }
}

/// `0x2::balance::Supply<phantom T> { value: u64 }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supply {
    tag: StructTag,
    pub value: u64,
}

impl Supply {
    pub fn new(coin: &impl IntoTypeArgument, value: u64) -> Self {
        Self {
            tag: instantiate(SUPPLY_TYPE, &[coin.to_type_argument()]),
            value,
        }
    }

    pub fn reified(coin: &impl IntoTypeArgument) -> Reified<Supply> {
        let value = builtin::u64();
        StructBuilder::new(SUPPLY_TYPE)
            .type_arg(coin)
            .field_of("value", &value)
            .build(move |r| {
                Ok(Supply {
                    tag: r.struct_tag().clone(),
                    value: r.decode("value", &value)?,
                })
            })
    }

    pub fn phantom(coin: &impl IntoTypeArgument) -> PhantomReified {
        Self::reified(coin).phantom()
    }

    pub fn is_type(type_string: &str) -> bool {
        is_type(type_string, &base_tag(SUPPLY_TYPE))
    }
}

impl MoveStruct for Supply {
    fn struct_tag(&self) -> &StructTag {
        &self.tag
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr).field("value", &self.value).finish()
    }
}

impl Encode for Supply {
    fn encode(&self, repr: Repr) -> Value {
        encode_record(self, repr)
    }
}
