//! Built-in descriptors: primitives, `vector<T>`, and the move-stdlib types
//! the RPC layer renders specially (`Option`, `String`, `ascii::String`).
//!
//! Host types: `bool`, `u8` .. `u128`, [`U256`], [`Address`], `Vec<T>`,
//! `Option<T>` and `String`.

use alloy_primitives::U256;
use serde_json::{json, Value};

use crate::address::Address;
use crate::encode::Encode;
use crate::error::DecodeError;
use crate::fields::Repr;
use crate::layout::{u256_value, uint_value, Layout};
use crate::reified::{IntoTypeArgument, Reified, StructBuilder};
use crate::type_name::{StructTag, TypeTag};

pub const OPTION: &str = "0x1::option::Option";
pub const STRING: &str = "0x1::string::String";
pub const ASCII_STRING: &str = "0x1::ascii::String";

fn uint<T: TryFrom<u128> + 'static>(tag: TypeTag, layout: Layout) -> Reified<T> {
    let name = tag.to_string();
    Reified::from_fn(tag, layout, Vec::new(), move |value, _| {
        uint_value(value)
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| DecodeError::invalid(name.as_str(), value))
    })
}

pub fn bool() -> Reified<bool> {
    Reified::from_fn(TypeTag::Bool, Layout::Bool, Vec::new(), |value, _| {
        value.as_bool().ok_or_else(|| DecodeError::invalid("bool", value))
    })
}

pub fn u8() -> Reified<u8> {
    uint(TypeTag::U8, Layout::U8)
}

pub fn u16() -> Reified<u16> {
    uint(TypeTag::U16, Layout::U16)
}

pub fn u32() -> Reified<u32> {
    uint(TypeTag::U32, Layout::U32)
}

pub fn u64() -> Reified<u64> {
    uint(TypeTag::U64, Layout::U64)
}

pub fn u128() -> Reified<u128> {
    uint(TypeTag::U128, Layout::U128)
}

pub fn u256() -> Reified<U256> {
    Reified::from_fn(TypeTag::U256, Layout::U256, Vec::new(), |value, _| {
        u256_value(value).ok_or_else(|| DecodeError::invalid("u256", value))
    })
}

pub fn address() -> Reified<Address> {
    Reified::from_fn(TypeTag::Address, Layout::Address, Vec::new(), |value, _| {
        value
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| DecodeError::invalid("address", value))
    })
}

/// `vector<T>`. Element errors carry their index in the field path.
pub fn vector<T: 'static>(elem: &Reified<T>) -> Reified<Vec<T>> {
    let tag = TypeTag::vector(elem.type_tag().clone());
    let layout = Layout::vector(elem.layout().clone());
    let args = vec![elem.to_type_argument()];
    let elem = elem.clone();
    let name = tag.to_string();
    Reified::from_fn(tag, layout, args, move |value, repr| {
        let items = value
            .as_array()
            .ok_or_else(|| DecodeError::invalid(name.as_str(), value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                elem.decode_value(item, repr)
                    .map_err(|e| e.in_field(&i.to_string()))
            })
            .collect()
    })
}

/// `0x1::option::Option<T>`: a `vec` field of zero or one elements on the
/// wire, `null` or the bare value in the typed and JSON representations.
///
/// An option of an option keeps the `{ "vec": [...] }` shape in every
/// representation, otherwise `Some(None)` and `None` would both be `null`.
pub fn option<T: 'static>(inner: &Reified<T>) -> Reified<Option<T>> {
    let elems = vector(inner);
    let builder = StructBuilder::new(OPTION)
        .type_arg(inner)
        .field_of("vec", &elems);

    let builder = if is_option(inner) {
        let flat_elems = elems.clone();
        let flat = move |value: &Value, repr: Repr| -> Result<Option<T>, DecodeError> {
            let vec = value
                .get("vec")
                .ok_or_else(|| DecodeError::MissingField { field: "vec".into() })?;
            let items = flat_elems
                .decode_value(vec, repr)
                .map_err(|e| e.in_field("vec"))?;
            at_most_one(items)
        };
        builder.flatten_typed(flat.clone()).flatten_json(flat)
    } else {
        let flat_inner = inner.clone();
        let flat = move |value: &Value, repr: Repr| match value {
            Value::Null => Ok(None),
            other => flat_inner.decode_value(other, repr).map(Some),
        };
        builder.flatten_typed(flat.clone()).flatten_json(flat)
    };

    builder.build(move |r| at_most_one(r.decode("vec", &elems)?))
}

fn is_option<T>(ty: &Reified<T>) -> bool {
    match (ty.struct_tag(), OPTION.parse::<StructTag>()) {
        (Some(tag), Ok(base)) => tag.same_base(&base),
        _ => false,
    }
}

fn at_most_one<T>(mut items: Vec<T>) -> Result<Option<T>, DecodeError> {
    match items.len() {
        0 => Ok(None),
        1 => Ok(items.pop()),
        n => Err(DecodeError::InvalidValue {
            expected: "option with at most one element".into(),
            got: format!("{n} elements"),
        }
        .in_field("vec")),
    }
}

fn string_descriptor(base: &str, ascii_only: bool) -> Reified<String> {
    let bytes = vector(&u8());
    let flat = move |value: &Value, _: Repr| -> Result<String, DecodeError> {
        let s = value
            .as_str()
            .ok_or_else(|| DecodeError::invalid("string", value))?;
        if ascii_only && !s.is_ascii() {
            return Err(DecodeError::invalid("ascii string", value));
        }
        Ok(s.to_string())
    };

    StructBuilder::new(base)
        .field_of("bytes", &bytes)
        .flatten_typed(flat)
        .flatten_json(flat)
        .build(move |r| {
            let raw = r.decode("bytes", &bytes)?;
            if ascii_only && !raw.is_ascii() {
                return Err(DecodeError::InvalidValue {
                    expected: "ascii bytes".into(),
                    got: hex::encode(&raw),
                });
            }
            String::from_utf8(raw).map_err(|e| DecodeError::InvalidValue {
                expected: "utf-8 bytes".into(),
                got: e.to_string(),
            })
        })
}

/// `0x1::string::String` (UTF-8).
pub fn string() -> Reified<String> {
    string_descriptor(STRING, false)
}

/// `0x1::ascii::String`.
pub fn ascii_string() -> Reified<String> {
    string_descriptor(ASCII_STRING, true)
}

impl Encode for bool {
    fn encode(&self, _: Repr) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! encode_as_number {
    ($($t:ty),*) => {
        $(impl Encode for $t {
            fn encode(&self, _: Repr) -> Value {
                Value::from(*self)
            }
        })*
    };
}

macro_rules! encode_as_decimal {
    ($($t:ty),*) => {
        $(impl Encode for $t {
            fn encode(&self, _: Repr) -> Value {
                Value::String(self.to_string())
            }
        })*
    };
}

encode_as_number!(u8, u16, u32);
encode_as_decimal!(u64, u128, U256);

impl Encode for Address {
    fn encode(&self, _: Repr) -> Value {
        Value::String(self.to_hex_literal())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, repr: Repr) -> Value {
        Value::Array(self.iter().map(|v| v.encode(repr)).collect())
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, repr: Repr) -> Value {
        let keep_vec = repr == Repr::Raw || T::is_option();
        match (keep_vec, self) {
            (true, Some(v)) => json!({ "vec": [v.encode(repr)] }),
            (true, None) => json!({ "vec": [] }),
            (false, Some(v)) => v.encode(repr),
            (false, None) => Value::Null,
        }
    }

    fn is_option() -> bool {
        true
    }
}

impl Encode for String {
    fn encode(&self, repr: Repr) -> Value {
        match repr {
            Repr::Raw => json!({ "bytes": self.as_bytes() }),
            Repr::Typed | Repr::Json => Value::String(self.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_accept_numbers_and_decimal_strings() {
        assert_eq!(u64().decode_value(&json!("18446744073709551615"), Repr::Raw), Ok(u64::MAX));
        assert_eq!(u64().decode_value(&json!(42), Repr::Typed), Ok(42));
        assert_eq!(u8().decode_value(&json!("255"), Repr::Raw), Ok(255));
        assert!(u8().decode_value(&json!(256), Repr::Raw).is_err());
        assert!(u64().decode_value(&json!("-1"), Repr::Raw).is_err());
        assert!(u64().decode_value(&json!("12 "), Repr::Raw).is_err());
        assert!(u64().decode_value(&json!(1.5), Repr::Raw).is_err());
    }

    #[test]
    fn u128_and_u256_use_decimal_strings() {
        let big = u128::MAX.to_string();
        assert_eq!(u128().decode_value(&json!(big), Repr::Raw), Ok(u128::MAX));
        let v = u256().decode_value(&json!("1000"), Repr::Raw).unwrap();
        assert_eq!(v, U256::from(1000u64));
        assert_eq!(v.encode(Repr::Json), json!("1000"));
    }

    #[test]
    fn vector_errors_carry_the_element_index() {
        let err = vector(&u16())
            .decode_value(&json!([1, 2, "x"]), Repr::Raw)
            .unwrap_err();
        assert_eq!(err.field_path().as_deref(), Some("2"));
    }

    #[test]
    fn option_raw_and_flat_forms() {
        let ty = option(&u64());
        assert_eq!(ty.type_name(), "0x1::option::Option<u64>");

        assert_eq!(ty.decode_value(&json!({ "vec": [] }), Repr::Raw), Ok(None));
        assert_eq!(ty.decode_value(&json!({ "vec": ["9"] }), Repr::Raw), Ok(Some(9)));
        assert_eq!(ty.decode_value(&Value::Null, Repr::Typed), Ok(None));
        assert_eq!(ty.decode_value(&json!("9"), Repr::Json), Ok(Some(9)));

        let err = ty
            .decode_value(&json!({ "vec": ["1", "2"] }), Repr::Raw)
            .unwrap_err();
        assert_eq!(err.field_path().as_deref(), Some("vec"));

        assert_eq!(Some(9u64).encode(Repr::Raw), json!({ "vec": ["9"] }));
        assert_eq!(None::<u64>.encode(Repr::Typed), Value::Null);
    }

    #[test]
    fn nested_option_keeps_some_none_distinct() {
        let ty = option(&option(&u64()));
        let cases = [None, Some(None), Some(Some(3u64))];
        for value in cases {
            for repr in [Repr::Raw, Repr::Typed, Repr::Json] {
                assert_eq!(ty.decode_value(&value.encode(repr), repr), Ok(value), "{repr:?}");
            }
            assert_eq!(ty.from_bcs(&ty.to_bcs(&value).unwrap()), Ok(value));
        }
        assert_eq!(Some(None::<u64>).encode(Repr::Typed), json!({ "vec": [null] }));
        assert_eq!(None::<Option<u64>>.encode(Repr::Json), json!({ "vec": [] }));
        assert_eq!(Some(Some(3u64)).encode(Repr::Json), json!({ "vec": ["3"] }));
    }

    #[test]
    fn option_bcs_round_trip() {
        let ty = option(&u64());
        let bytes = ty.to_bcs(&Some(7)).unwrap();
        assert_eq!(bytes, [&[1u8][..], &7u64.to_le_bytes()[..]].concat());
        assert_eq!(ty.from_bcs(&bytes), Ok(Some(7)));
        assert_eq!(ty.from_bcs(&[0]), Ok(None));
    }

    #[test]
    fn strings_are_length_prefixed_utf8() {
        let ty = string();
        let bytes = ty.to_bcs(&"héllo".to_string()).unwrap();
        assert_eq!(bytes[0] as usize, "héllo".len());
        assert_eq!(ty.from_bcs(&bytes).unwrap(), "héllo");
        assert_eq!(
            ty.decode_value(&json!("plain"), Repr::Typed).unwrap(),
            "plain"
        );

        let err = ty
            .decode_value(&json!({ "bytes": [0xff, 0xfe] }), Repr::Raw)
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { .. }));
    }

    #[test]
    fn ascii_string_rejects_non_ascii() {
        let ty = ascii_string();
        assert_eq!(ty.type_name(), "0x1::ascii::String");
        assert!(ty.decode_value(&json!("héllo"), Repr::Json).is_err());
        assert!(ty
            .decode_value(&json!({ "bytes": "héllo".as_bytes() }), Repr::Raw)
            .is_err());
    }

    #[test]
    fn address_accepts_short_form_and_renders_long() {
        let a = address().decode_value(&json!("0x2"), Repr::Raw).unwrap();
        assert_eq!(a, Address::from_u8(2));
        assert_eq!(
            a.encode(Repr::Raw),
            json!("0x0000000000000000000000000000000000000000000000000000000000000002")
        );
    }
}
