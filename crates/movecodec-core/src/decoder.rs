//! The decoding engine: raw fields, typed fields, JSON and BCS entry points
//! on [`Reified`], plus the generic-argument check.
//!
//! Check order for typed input is fixed: the base name is compared first,
//! then the type-argument list, then the fields.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::encode::Encode;
use crate::error::{DecodeError, LayoutError};
use crate::fields::{FieldReader, RawFields, Repr, TypedFields};
use crate::reified::{Decoder, Reified, TypeArgument};
use crate::type_name::{StructTag, TypeTag};

/// Compares a descriptor's instantiated arguments with those declared by the
/// input, pairwise. The first divergence (or a length mismatch) is reported
/// together with both full lists.
pub fn check_type_args(
    expected_type: &StructTag,
    got_type: &StructTag,
    expected: &[TypeArgument],
) -> Result<(), DecodeError> {
    let got = &got_type.type_params;
    let position = expected
        .iter()
        .zip(got)
        .position(|(e, g)| e.type_tag() != g)
        .or_else(|| (expected.len() != got.len()).then(|| expected.len().min(got.len())));

    match position {
        None => Ok(()),
        Some(position) => Err(DecodeError::GenericArgumentMismatch {
            expected: expected_type.to_string(),
            got: got_type.to_string(),
            expected_args: expected.iter().map(TypeArgument::type_name).collect(),
            got_args: got.iter().map(ToString::to_string).collect(),
            position,
        }),
    }
}

impl<T> Reified<T> {
    fn record_tag(&self) -> Result<&StructTag, DecodeError> {
        self.struct_tag().ok_or_else(|| DecodeError::NotARecord {
            type_name: self.type_name(),
        })
    }

    fn construct(&self, fields: &Map<String, Value>, repr: Repr) -> Result<T, DecodeError> {
        let tag = self.record_tag()?;
        match &self.inner.decoder {
            Decoder::Struct { construct, .. } => construct(&FieldReader::new(tag, fields, repr)),
            Decoder::Value(_) => Err(DecodeError::NotARecord {
                type_name: self.type_name(),
            }),
        }
    }

    /// Verifies that `declared` names this descriptor's type: base name
    /// first, then the type arguments.
    pub fn check_type(&self, declared: &str) -> Result<(), DecodeError> {
        let tag = self.record_tag()?;
        let got = match declared.parse::<TypeTag>()? {
            TypeTag::Struct(got) if got.same_base(tag) => got,
            _ => {
                return Err(DecodeError::TypeMismatch {
                    expected: tag.to_string(),
                    got: declared.to_string(),
                })
            }
        };
        check_type_args(tag, &got, self.type_args())
    }

    /// Decode one value in the given representation. Record constructors
    /// reach this through [`FieldReader::decode`].
    pub fn decode_value(&self, value: &Value, repr: Repr) -> Result<T, DecodeError> {
        match (&self.inner.decoder, repr) {
            (Decoder::Value(decode), _) => decode(value, repr),
            (Decoder::Struct { flat_typed: Some(flat), .. }, Repr::Typed)
            | (Decoder::Struct { flat_json: Some(flat), .. }, Repr::Json) => flat(value, repr),
            (Decoder::Struct { .. }, Repr::Typed) => {
                let (declared, fields) = TypedFields::from_value(value)?;
                self.decode_typed(declared, fields)
            }
            (Decoder::Struct { .. }, Repr::Raw | Repr::Json) => {
                let fields = value
                    .as_object()
                    .ok_or_else(|| DecodeError::invalid(self.type_name(), value))?;
                self.construct(fields, repr)
            }
        }
    }

    fn decode_typed(&self, declared: &str, fields: &Map<String, Value>) -> Result<T, DecodeError> {
        self.check_type(declared)?;
        self.construct(fields, Repr::Typed)
    }

    /// Decode from raw fields. The caller vouches for the type; no type
    /// string is checked.
    pub fn from_fields(&self, fields: &RawFields) -> Result<T, DecodeError> {
        trace!(type_name = %self.type_tag(), "decoding from raw fields");
        self.construct(fields, Repr::Raw)
    }

    /// Decode from RPC content annotated with its declared type.
    pub fn from_fields_with_types(&self, item: &TypedFields) -> Result<T, DecodeError> {
        trace!(type_name = %self.type_tag(), declared = %item.type_, "decoding from typed fields");
        self.decode_typed(&item.type_, &item.fields)
    }

    /// Decode from BCS bytes. Binary data carries no type tag; confirm the
    /// object's type out of band before calling this.
    pub fn from_bcs(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        debug!(type_name = %self.type_tag(), len = bytes.len(), "decoding from bcs");
        let raw = self.layout().parse(bytes)?;
        self.decode_value(&raw, Repr::Raw)
    }

    /// Decode from the JSON field projection (`to_json_field`).
    pub fn from_json_field(&self, value: &Value) -> Result<T, DecodeError> {
        self.decode_value(value, Repr::Json)
    }

    /// Decode from the full JSON projection (`to_json`), checking its
    /// `$typeName` and `$typeArgs` against this descriptor first.
    pub fn from_json(&self, value: &Value) -> Result<T, DecodeError> {
        let tag = self.record_tag()?;
        let obj = value
            .as_object()
            .ok_or_else(|| DecodeError::invalid(self.type_name(), value))?;

        let declared_base = obj
            .get("$typeName")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::MissingField {
                field: "$typeName".into(),
            })?;
        let mut declared = declared_base.parse::<StructTag>()?;
        if !declared.same_base(tag) || !declared.type_params.is_empty() {
            return Err(DecodeError::TypeMismatch {
                expected: tag.base_name(),
                got: declared_base.to_string(),
            });
        }

        // Single-parameter records may carry `$typeArg` instead of a one-element `$typeArgs`.
        let args = match (obj.get("$typeArgs"), obj.get("$typeArg")) {
            (Some(args), _) => args
                .as_array()
                .ok_or_else(|| DecodeError::invalid("$typeArgs array", args))?
                .as_slice(),
            (None, Some(arg)) => std::slice::from_ref(arg),
            (None, None) => &[],
        };
        for arg in args {
            let arg = arg
                .as_str()
                .ok_or_else(|| DecodeError::invalid("type argument string", arg))?;
            declared.type_params.push(arg.parse()?);
        }
        check_type_args(tag, &declared, self.type_args())?;

        self.construct(obj, Repr::Json)
    }

    /// Decode the `content` of an RPC object response
    /// (`{ "dataType": "moveObject", "type": ..., "fields": ... }`).
    pub fn from_parsed_data(&self, content: &Value) -> Result<T, DecodeError> {
        match content.get("dataType").and_then(Value::as_str) {
            Some("moveObject") => {}
            _ => return Err(DecodeError::invalid("moveObject content", content)),
        }
        let (declared, fields) = TypedFields::from_value(content)?;
        self.decode_typed(declared, fields)
    }
}

impl<T: Encode> Reified<T> {
    /// Encode `value` to BCS with this descriptor's layout.
    pub fn to_bcs(&self, value: &T) -> Result<Vec<u8>, LayoutError> {
        self.layout().serialize(&value.encode(Repr::Raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use crate::error::ErrorKind;
    use crate::reified::{IntoTypeArgument, StructBuilder};
    use serde_json::json;

    /// A two-field generic record used to exercise the engine without the
    /// framework record modules.
    #[derive(Debug, Clone, PartialEq)]
    struct Wrapper<V> {
        tag: StructTag,
        count: u64,
        inner: V,
    }

    fn wrapper<V: Send + Sync + 'static>(v: &Reified<V>) -> Reified<Wrapper<V>> {
        let inner_ty = v.clone();
        StructBuilder::new("0x42::wrap::Wrapper")
            .type_arg(v)
            .field_of("count", &builtin::u64())
            .field_of("inner", v)
            .build(move |r| {
                Ok(Wrapper {
                    tag: r.struct_tag().clone(),
                    count: r.decode("count", &builtin::u64())?,
                    inner: r.decode("inner", &inner_ty)?,
                })
            })
    }

    #[test]
    fn raw_fields_decode_without_type_check() {
        let ty = wrapper(&builtin::u8());
        let fields = json!({ "count": "12", "inner": 7 });
        let w = ty.from_fields(fields.as_object().unwrap()).unwrap();
        assert_eq!(w.count, 12);
        assert_eq!(w.inner, 7);
        assert_eq!(w.tag.to_string(), "0x42::wrap::Wrapper<u8>");
    }

    #[test]
    fn missing_field_and_bad_digits_are_shape_errors() {
        let ty = wrapper(&builtin::u8());

        let missing = ty
            .from_fields(json!({ "count": "1" }).as_object().unwrap())
            .unwrap_err();
        assert_eq!(
            missing,
            DecodeError::MissingField {
                field: "inner".into()
            }
        );

        let bad = ty
            .from_fields(json!({ "count": "1x", "inner": 1 }).as_object().unwrap())
            .unwrap_err();
        assert_eq!(bad.kind(), ErrorKind::Shape);
        assert_eq!(bad.field_path().as_deref(), Some("count"));
    }

    #[test]
    fn typed_fields_check_base_name_first() {
        let ty = wrapper(&builtin::u64());
        let item = TypedFields::new(
            "0x43::wrap::Wrapper<u8>",
            json!({ "count": "1", "inner": "2" }).as_object().unwrap().clone(),
        );
        let err = ty.from_fields_with_types(&item).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                expected: "0x42::wrap::Wrapper<u64>".into(),
                got: "0x43::wrap::Wrapper<u8>".into(),
            }
        );
    }

    #[test]
    fn typed_fields_reject_different_arguments() {
        let ty = wrapper(&builtin::u64());
        let item = TypedFields::new(
            "0x42::wrap::Wrapper<u8>",
            json!({ "count": "1", "inner": 2 }).as_object().unwrap().clone(),
        );
        match ty.from_fields_with_types(&item).unwrap_err() {
            DecodeError::GenericArgumentMismatch {
                expected_args,
                got_args,
                position,
                ..
            } => {
                assert_eq!(expected_args, vec!["u64"]);
                assert_eq!(got_args, vec!["u8"]);
                assert_eq!(position, 0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn argument_count_mismatch_is_reported() {
        let ty = wrapper(&builtin::u64());
        let err = ty.check_type("0x42::wrap::Wrapper").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::GenericArgumentMismatch { position: 0, .. }
        ));
    }

    #[test]
    fn nested_arguments_compare_recursively() {
        let ty = wrapper(&wrapper(&builtin::u64()));
        assert!(ty
            .check_type("0x42::wrap::Wrapper<0x0042::wrap::Wrapper<u64>>")
            .is_ok());
        let err = ty
            .check_type("0x42::wrap::Wrapper<0x42::wrap::Wrapper<u128>>")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GenericArgumentMismatch);
    }

    #[test]
    fn nested_typed_record_is_rechecked() {
        let ty = wrapper(&wrapper(&builtin::bool()));
        let value = json!({
            "type": "0x42::wrap::Wrapper<0x42::wrap::Wrapper<bool>>",
            "fields": {
                "count": "3",
                "inner": {
                    "type": "0x42::other::Wrapper<bool>",
                    "fields": { "count": "4", "inner": true }
                }
            }
        });
        let err = ty.decode_value(&value, Repr::Typed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.field_path().as_deref(), Some("inner"));
    }

    #[test]
    fn bcs_routes_through_raw_fields() {
        let ty = wrapper(&builtin::bool());
        let mut bytes = 5u64.to_le_bytes().to_vec();
        bytes.push(1);
        let w = ty.from_bcs(&bytes).unwrap();
        assert_eq!(w.count, 5);
        assert!(w.inner);
    }

    #[test]
    fn from_json_accepts_single_type_arg_key() {
        let ty = wrapper(&builtin::u8());
        let value = json!({
            "$typeName": "0x42::wrap::Wrapper",
            "$typeArg": "u8",
            "count": "2",
            "inner": 9
        });
        let w = ty.from_json(&value).unwrap();
        assert_eq!((w.count, w.inner), (2, 9));

        let other = json!({
            "$typeName": "0x42::wrap::Wrapper",
            "$typeArg": "u16",
            "count": "2",
            "inner": 9
        });
        assert_eq!(
            ty.from_json(&other).unwrap_err().kind(),
            ErrorKind::GenericArgumentMismatch
        );
    }

    #[test]
    fn from_fields_on_a_primitive_is_rejected() {
        let err = builtin::u64().from_fields(&Map::new()).unwrap_err();
        assert!(matches!(err, DecodeError::NotARecord { .. }));
    }

    #[test]
    fn check_type_args_reports_first_divergence() {
        let expected_type: StructTag = "0x1::m::T<u8, u16, u32>".parse().unwrap();
        let got_type: StructTag = "0x1::m::T<u8, u64, u128>".parse().unwrap();
        let args = vec![
            builtin::u8().to_type_argument(),
            builtin::u16().to_type_argument(),
            builtin::u32().to_type_argument(),
        ];
        let err = check_type_args(&expected_type, &got_type, &args).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::GenericArgumentMismatch { position: 1, .. }
        ));
    }
}
