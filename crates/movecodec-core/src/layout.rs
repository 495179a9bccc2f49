//! Binary (BCS) layouts.
//!
//! A [`Layout`] is the fixed binary schema of one concrete type
//! instantiation. Generic slots are filled in when the owning descriptor is
//! built, so a layout never needs type arguments at parse time.
//!
//! Parsing produces the *raw* JSON representation that
//! [`Reified::from_fields`](crate::reified::Reified::from_fields) consumes:
//! small integers become numbers, `u64`/`u128`/`u256` become decimal strings,
//! addresses become `0x`-prefixed 64-digit hex, vectors become arrays and
//! structs become objects keyed by field name.

use alloy_primitives::U256;
use bytes::{Buf, BufMut};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;

use crate::address::Address;
use crate::error::LayoutError;

/// The binary schema of a Move value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    /// 32 raw bytes on the wire, `0x`-hex everywhere else.
    Address,
    /// ULEB128 length prefix followed by the elements.
    Vector(Box<Layout>),
    Struct(StructLayout),
}

/// Fields of a struct in declaration order. The order is part of the binary
/// contract and is never changed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    pub name: String,
    pub fields: IndexMap<String, Layout>,
}

impl StructLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, layout: Layout) -> Self {
        self.fields.insert(name.into(), layout);
        self
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Bool => write!(f, "bool"),
            Layout::U8 => write!(f, "u8"),
            Layout::U16 => write!(f, "u16"),
            Layout::U32 => write!(f, "u32"),
            Layout::U64 => write!(f, "u64"),
            Layout::U128 => write!(f, "u128"),
            Layout::U256 => write!(f, "u256"),
            Layout::Address => write!(f, "address"),
            Layout::Vector(elem) => write!(f, "vector<{elem}>"),
            Layout::Struct(s) => write!(f, "{}", s.name),
        }
    }
}

impl Layout {
    pub fn vector(elem: Layout) -> Self {
        Layout::Vector(Box::new(elem))
    }

    /// Parse exactly one value from `bytes`; leftover input is an error.
    pub fn parse(&self, bytes: &[u8]) -> Result<Value, LayoutError> {
        let mut buf = bytes;
        let value = self.read(&mut buf)?;
        if buf.has_remaining() {
            return Err(LayoutError::TrailingBytes {
                count: buf.remaining(),
            });
        }
        Ok(value)
    }

    /// Serialize a raw-representation value into BCS bytes.
    pub fn serialize(&self, value: &Value) -> Result<Vec<u8>, LayoutError> {
        let mut out = Vec::new();
        self.write(value, &mut out)?;
        Ok(out)
    }

    fn read(&self, buf: &mut &[u8]) -> Result<Value, LayoutError> {
        Ok(match self {
            Layout::Bool => match take(buf, 1)?.get_u8() {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                byte => return Err(LayoutError::InvalidBool { byte }),
            },
            Layout::U8 => Value::from(take(buf, 1)?.get_u8()),
            Layout::U16 => Value::from(take(buf, 2)?.get_u16_le()),
            Layout::U32 => Value::from(take(buf, 4)?.get_u32_le()),
            Layout::U64 => Value::String(take(buf, 8)?.get_u64_le().to_string()),
            Layout::U128 => Value::String(take(buf, 16)?.get_u128_le().to_string()),
            Layout::U256 => {
                let mut raw = [0u8; 32];
                take(buf, 32)?.copy_to_slice(&mut raw);
                Value::String(U256::from_le_bytes::<32>(raw).to_string())
            }
            Layout::Address => {
                let mut raw = [0u8; Address::LENGTH];
                take(buf, Address::LENGTH)?.copy_to_slice(&mut raw);
                Value::String(Address::new(raw).to_hex_literal())
            }
            Layout::Vector(elem) => {
                let len = read_uleb128(buf)?;
                let mut items = Vec::with_capacity(len.min(buf.remaining()));
                for _ in 0..len {
                    items.push(elem.read(buf)?);
                }
                Value::Array(items)
            }
            Layout::Struct(s) => {
                let mut obj = Map::with_capacity(s.fields.len());
                for (name, layout) in &s.fields {
                    obj.insert(name.clone(), layout.read(buf)?);
                }
                Value::Object(obj)
            }
        })
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), LayoutError> {
        let mismatch = || LayoutError::ValueMismatch {
            expected: self.to_string(),
            got: value.to_string(),
        };

        match self {
            Layout::Bool => out.put_u8(u8::from(value.as_bool().ok_or_else(mismatch)?)),
            Layout::U8 => {
                let v = uint_value(value).and_then(|v| u8::try_from(v).ok());
                out.put_u8(v.ok_or_else(mismatch)?);
            }
            Layout::U16 => {
                let v = uint_value(value).and_then(|v| u16::try_from(v).ok());
                out.put_u16_le(v.ok_or_else(mismatch)?);
            }
            Layout::U32 => {
                let v = uint_value(value).and_then(|v| u32::try_from(v).ok());
                out.put_u32_le(v.ok_or_else(mismatch)?);
            }
            Layout::U64 => {
                let v = uint_value(value).and_then(|v| u64::try_from(v).ok());
                out.put_u64_le(v.ok_or_else(mismatch)?);
            }
            Layout::U128 => out.put_u128_le(uint_value(value).ok_or_else(mismatch)?),
            Layout::U256 => {
                let v = u256_value(value).ok_or_else(mismatch)?;
                out.put_slice(&v.to_le_bytes::<32>());
            }
            Layout::Address => {
                let addr = value
                    .as_str()
                    .and_then(|s| s.parse::<Address>().ok())
                    .ok_or_else(mismatch)?;
                out.put_slice(addr.as_bytes());
            }
            Layout::Vector(elem) => {
                let items = value.as_array().ok_or_else(mismatch)?;
                let len = u32::try_from(items.len()).map_err(|_| LayoutError::LengthOverflow)?;
                write_uleb128(len, out);
                for item in items {
                    elem.write(item, out)?;
                }
            }
            Layout::Struct(s) => {
                let obj = value.as_object().ok_or_else(mismatch)?;
                for (name, layout) in &s.fields {
                    let field = obj.get(name).ok_or_else(|| LayoutError::MissingField {
                        field: name.clone(),
                    })?;
                    layout.write(field, out)?;
                }
            }
        }
        Ok(())
    }
}

/// Ensures `n` bytes are available and returns a cursor over them, advancing
/// `buf` past them.
fn take<'a>(buf: &mut &'a [u8], n: usize) -> Result<&'a [u8], LayoutError> {
    if buf.remaining() < n {
        return Err(LayoutError::UnexpectedEof {
            needed: n - buf.remaining(),
        });
    }
    let (head, tail) = buf.split_at(n);
    *buf = tail;
    Ok(head)
}

fn read_uleb128(buf: &mut &[u8]) -> Result<usize, LayoutError> {
    let mut value: u64 = 0;
    for shift in (0..32).step_by(7) {
        let byte = take(buf, 1)?.get_u8();
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            if byte == 0 && shift > 0 {
                return Err(LayoutError::NonCanonicalLength);
            }
            return usize::try_from(u32::try_from(value).map_err(|_| LayoutError::LengthOverflow)?)
                .map_err(|_| LayoutError::LengthOverflow);
        }
    }
    Err(LayoutError::LengthOverflow)
}

fn write_uleb128(mut value: u32, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.put_u8(value as u8);
}

/// Decimal strings must be all ASCII digits; `+1` or ` 1` are rejected.
pub(crate) fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Reads an unsigned integer from a JSON number or decimal string.
pub(crate) fn uint_value(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n.as_u64().map(u128::from),
        Value::String(s) if is_decimal(s) => s.parse().ok(),
        _ => None,
    }
}

pub(crate) fn u256_value(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) if is_decimal(s) => U256::from_str_radix(s, 10).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn balance_layout() -> Layout {
        Layout::Struct(StructLayout::new("Balance").field("value", Layout::U64))
    }

    #[test]
    fn u64_is_little_endian() {
        let bytes = 1_000_000u64.to_le_bytes();
        let parsed = balance_layout().parse(&bytes).unwrap();
        assert_eq!(parsed, json!({ "value": "1000000" }));
        assert_eq!(balance_layout().serialize(&parsed).unwrap(), bytes.to_vec());
    }

    #[test]
    fn address_uses_hex_transform() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0xab;
        let parsed = Layout::Address.parse(&bytes).unwrap();
        assert_eq!(
            parsed,
            json!("0x00000000000000000000000000000000000000000000000000000000000000ab")
        );
        assert_eq!(Layout::Address.serialize(&json!("0xab")).unwrap(), bytes.to_vec());
    }

    #[test]
    fn option_is_a_presence_tagged_vector() {
        let option = Layout::Struct(
            StructLayout::new("0x1::option::Option<u16>").field("vec", Layout::vector(Layout::U16)),
        );
        assert_eq!(option.parse(&[0]).unwrap(), json!({ "vec": [] }));
        assert_eq!(option.parse(&[1, 0x34, 0x12]).unwrap(), json!({ "vec": [0x1234] }));
    }

    #[test]
    fn field_order_is_declaration_order() {
        let layout = Layout::Struct(
            StructLayout::new("Pair")
                .field("z", Layout::U8)
                .field("a", Layout::Bool),
        );
        let bytes = layout.serialize(&json!({ "a": true, "z": 7 })).unwrap();
        assert_eq!(bytes, vec![7, 1]);
    }

    #[test]
    fn long_vectors_use_multi_byte_length() {
        let layout = Layout::vector(Layout::U8);
        let value = Value::Array(vec![json!(1); 200]);
        let bytes = layout.serialize(&value).unwrap();
        assert_eq!(&bytes[..2], &[0xc8, 0x01]);
        assert_eq!(layout.parse(&bytes).unwrap(), value);
    }

    #[test]
    fn padded_length_prefix_is_rejected() {
        let layout = Layout::vector(Layout::U8);
        assert_eq!(layout.parse(&[0x80, 0x00]), Err(LayoutError::NonCanonicalLength));
        assert_eq!(layout.parse(&[0x81, 0x00, 7]), Err(LayoutError::NonCanonicalLength));
        assert_eq!(layout.parse(&[0x01, 7]).unwrap(), json!([7]));
        assert_eq!(layout.parse(&[0x00]).unwrap(), json!([]));
    }

    #[test]
    fn u256_round_trips_as_decimal() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let bytes = Layout::U256.serialize(&json!(max)).unwrap();
        assert_eq!(bytes, vec![0xff; 32]);
        assert_eq!(Layout::U256.parse(&bytes).unwrap(), json!(max));
    }

    #[test]
    fn truncated_and_trailing_input_fail() {
        assert_eq!(
            Layout::U64.parse(&[1, 2, 3]),
            Err(LayoutError::UnexpectedEof { needed: 5 })
        );
        assert_eq!(
            Layout::U8.parse(&[1, 2]),
            Err(LayoutError::TrailingBytes { count: 1 })
        );
        assert_eq!(
            Layout::Bool.parse(&[2]),
            Err(LayoutError::InvalidBool { byte: 2 })
        );
    }

    #[test]
    fn serialize_rejects_out_of_range_and_non_numeric() {
        assert!(Layout::U8.serialize(&json!(256)).is_err());
        assert!(Layout::U64.serialize(&json!("12a")).is_err());
        assert!(matches!(
            balance_layout().serialize(&json!({})),
            Err(LayoutError::MissingField { .. })
        ));
    }
}
