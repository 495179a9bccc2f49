//! `0x2::vec_map`: an insertion-ordered map stored as a vector of entries.

use movecodec_core::{
    builtin, encode_record, instantiate, DecodeError, Encode, FieldWriter, IntoTypeArgument,
    MoveStruct, MoveType, PhantomReified, Reified, Repr, StructBuilder, StructTag,
};
use serde_json::{Map, Value};

use crate::is_base;

pub const VEC_MAP_TYPE: &str = "0x2::vec_map::VecMap";
pub const ENTRY_TYPE: &str = "0x2::vec_map::Entry";

/// Whether `type_string` is any instantiation of `VecMap`.
pub fn is_vec_map(type_string: &str) -> bool {
    is_base(type_string, VEC_MAP_TYPE)
}

pub fn is_entry(type_string: &str) -> bool {
    is_base(type_string, ENTRY_TYPE)
}

/// `0x2::vec_map::Entry<K, V> { key: K, value: V }`
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<K, V> {
    tag: StructTag,
    pub key: K,
    pub value: V,
}

impl<K: MoveType, V: MoveType> Entry<K, V> {
    pub fn new(k: &Reified<K>, v: &Reified<V>, key: K, value: V) -> Self {
        Self {
            tag: instantiate(ENTRY_TYPE, &[k.to_type_argument(), v.to_type_argument()]),
            key,
            value,
        }
    }

    pub fn reified(k: &Reified<K>, v: &Reified<V>) -> Reified<Entry<K, V>> {
        let (key_ty, value_ty) = (k.clone(), v.clone());
        StructBuilder::new(ENTRY_TYPE)
            .type_arg(k)
            .type_arg(v)
            .field_of("key", k)
            .field_of("value", v)
            .build(move |r| {
                Ok(Entry {
                    tag: r.struct_tag().clone(),
                    key: r.decode("key", &key_ty)?,
                    value: r.decode("value", &value_ty)?,
                })
            })
    }
}

impl<K: MoveType, V: MoveType> MoveStruct for Entry<K, V> {
    fn struct_tag(&self) -> &StructTag {
        &self.tag
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr)
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl<K: MoveType, V: MoveType> Encode for Entry<K, V> {
    fn encode(&self, repr: Repr) -> Value {
        encode_record(self, repr)
    }
}

/// `0x2::vec_map::VecMap<K, V> { contents: vector<Entry<K, V>> }`
///
/// Keys are unique on chain; decoding rejects duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct VecMap<K, V> {
    tag: StructTag,
    pub contents: Vec<Entry<K, V>>,
}

impl<K: MoveType, V: MoveType> VecMap<K, V> {
    pub fn new(k: &Reified<K>, v: &Reified<V>, contents: Vec<(K, V)>) -> Self {
        Self {
            tag: instantiate(VEC_MAP_TYPE, &[k.to_type_argument(), v.to_type_argument()]),
            contents: contents
                .into_iter()
                .map(|(key, value)| Entry::new(k, v, key, value))
                .collect(),
        }
    }

    pub fn reified(k: &Reified<K>, v: &Reified<V>) -> Reified<VecMap<K, V>> {
        let contents = builtin::vector(&Entry::reified(k, v));
        StructBuilder::new(VEC_MAP_TYPE)
            .type_arg(k)
            .type_arg(v)
            .field_of("contents", &contents)
            .build(move |r| {
                let contents = r.decode("contents", &contents)?;
                check_unique_keys(&contents).map_err(|e| e.in_field("contents"))?;
                Ok(VecMap {
                    tag: r.struct_tag().clone(),
                    contents,
                })
            })
    }

    pub fn phantom(k: &Reified<K>, v: &Reified<V>) -> PhantomReified {
        Self::reified(k, v).phantom()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.contents
            .iter()
            .find(|e| &e.key == key)
            .map(|e| &e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.contents.iter().map(|e| (&e.key, &e.value))
    }
}

fn check_unique_keys<K: MoveType, V>(contents: &[Entry<K, V>]) -> Result<(), DecodeError> {
    for (i, entry) in contents.iter().enumerate() {
        if contents[..i].iter().any(|e| e.key == entry.key) {
            return Err(DecodeError::InvalidValue {
                expected: "unique vec_map keys".into(),
                got: entry.key.encode(Repr::Json).to_string(),
            }
            .in_field(&i.to_string()));
        }
    }
    Ok(())
}

impl<K: MoveType, V: MoveType> MoveStruct for VecMap<K, V> {
    fn struct_tag(&self) -> &StructTag {
        &self.tag
    }

    fn encode_fields(&self, repr: Repr) -> Map<String, Value> {
        FieldWriter::new(repr)
            .field("contents", &self.contents)
            .finish()
    }
}

impl<K: MoveType, V: MoveType> Encode for VecMap<K, V> {
    fn encode(&self, repr: Repr) -> Value {
        encode_record(self, repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movecodec_core::builtin::{string, u64};
    use serde_json::json;

    fn sample() -> VecMap<String, u64> {
        VecMap::new(
            &string(),
            &u64(),
            vec![("a".to_string(), 1), ("b".to_string(), 2)],
        )
    }

    #[test]
    fn names_nest_entry_arguments() {
        let ty = VecMap::reified(&string(), &u64());
        assert_eq!(
            ty.type_name(),
            "0x2::vec_map::VecMap<0x1::string::String, u64>"
        );
        assert_eq!(
            Entry::reified(&string(), &u64()).type_name(),
            "0x2::vec_map::Entry<0x1::string::String, u64>"
        );
    }

    #[test]
    fn type_predicates_ignore_arguments() {
        assert!(is_vec_map("0x2::vec_map::VecMap<u8, bool>"));
        assert!(!is_vec_map("0x2::vec_map::Entry<u8, bool>"));
        assert!(is_entry("0x0002::vec_map::Entry<u8, bool>"));
    }

    #[test]
    fn lookups_follow_insertion_order() {
        let map = sample();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"b".to_string()), Some(&2));
        assert_eq!(map.get(&"c".to_string()), None);
        let keys: Vec<_> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn typed_entries_carry_their_own_annotation() {
        let map = sample();
        let typed = map.to_fields_with_types();
        let first = &typed.fields["contents"][0];
        assert_eq!(
            first["type"],
            "0x2::vec_map::Entry<0x1::string::String, u64>"
        );
        assert_eq!(first["fields"], json!({ "key": "a", "value": "1" }));
        assert_eq!(
            VecMap::reified(&string(), &u64()).from_fields_with_types(&typed),
            Ok(map)
        );
    }

    #[test]
    fn bcs_round_trip() {
        let map = sample();
        let ty = VecMap::reified(&string(), &u64());
        let bytes = ty.to_bcs(&map).unwrap();
        // len, then per entry: string len + bytes + u64
        assert_eq!(bytes.len(), 1 + 2 * (1 + 1 + 8));
        assert_eq!(ty.from_bcs(&bytes), Ok(map));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let ty = VecMap::reified(&string(), &u64());
        let raw = json!({
            "contents": [
                { "key": { "bytes": [120] }, "value": "1" },
                { "key": { "bytes": [120] }, "value": "2" },
            ]
        });
        let err = ty.from_fields(raw.as_object().unwrap()).unwrap_err();
        assert_eq!(err.field_path().as_deref(), Some("contents.1"));
    }
}
