//! Move type-name canonicalization.
//!
//! Type strings have the form `address::module::Name<Arg1, Arg2>` where each
//! argument is itself a struct type, `vector<T>`, or a primitive keyword.
//! Addresses carry a `0x` prefix and may be written in full (64 hex digits)
//! or short form; the canonical rendering always uses the short form and
//! `", "` separators, so two type strings name the same type iff their
//! canonical renderings are equal.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::address::Address;
use crate::error::TypeNameError;

/// A parsed Move type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(StructTag),
}

/// A fully qualified struct type, possibly instantiated with type parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructTag {
    pub address: Address,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl TypeTag {
    pub fn vector(elem: TypeTag) -> Self {
        TypeTag::Vector(Box::new(elem))
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, TypeTag::Vector(_) | TypeTag::Struct(_))
    }

    pub fn as_struct(&self) -> Option<&StructTag> {
        match self {
            TypeTag::Struct(s) => Some(s),
            _ => None,
        }
    }

    fn primitive(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            _ => return None,
        })
    }
}

impl StructTag {
    pub fn new(address: Address, module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address,
            module: module.into(),
            name: name.into(),
            type_params: Vec::new(),
        }
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeTag>) -> Self {
        self.type_params = type_params;
        self
    }

    /// `address::module::Name` without any type parameters.
    pub fn base_name(&self) -> String {
        format!(
            "{}::{}::{}",
            self.address.to_short_string(),
            self.module,
            self.name
        )
    }

    /// Whether both tags name the same struct, ignoring type parameters.
    pub fn same_base(&self, other: &StructTag) -> bool {
        self.address == other.address && self.module == other.module && self.name == other.name
    }

    /// Canonical names of the type parameters, in order.
    pub fn type_param_names(&self) -> Vec<String> {
        self.type_params.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(elem) => write!(f, "vector<{elem}>"),
            TypeTag::Struct(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", compose(&self.base_name(), &self.type_param_names()))
    }
}

impl FromStr for TypeTag {
    type Err = TypeNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let tag = parser.parse_type()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(TypeNameError::malformed(s, "trailing input after type"));
        }
        Ok(tag)
    }
}

impl FromStr for StructTag {
    type Err = TypeNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<TypeTag>()? {
            TypeTag::Struct(tag) => Ok(tag),
            _ => Err(TypeNameError::malformed(s, "not a struct type")),
        }
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalizes every address in `type_string` to its short form.
///
/// Idempotent: `compress(compress(s)) == compress(s)`.
pub fn compress(type_string: &str) -> Result<String, TypeNameError> {
    Ok(type_string.parse::<TypeTag>()?.to_string())
}

/// Appends `<a1, a2, ...>` to `base`. With no arguments `base` is returned
/// unchanged.
pub fn compose<S: AsRef<str>>(base: &str, type_args: &[S]) -> String {
    if type_args.is_empty() {
        return base.to_string();
    }
    let args: Vec<&str> = type_args.iter().map(AsRef::as_ref).collect();
    format!("{base}<{}>", args.join(", "))
}

/// Splits a type string into its base name and top-level type arguments,
/// e.g. `0x2::coin::Coin<0x2::sui::SUI>` -> (`0x2::coin::Coin`, [`0x2::sui::SUI`]).
///
/// Both parts are returned in canonical form.
pub fn parse_type_name(type_string: &str) -> Result<(String, Vec<String>), TypeNameError> {
    match type_string.parse::<TypeTag>()? {
        TypeTag::Struct(tag) => Ok((tag.base_name(), tag.type_param_names())),
        TypeTag::Vector(elem) => Ok(("vector".to_string(), vec![elem.to_string()])),
        other => Ok((other.to_string(), Vec::new())),
    }
}

/// Whether `type_string` is an instantiation of the struct `base`.
/// Malformed input is reported as `false`.
pub fn is_type(type_string: &str, base: &StructTag) -> bool {
    type_string
        .parse::<StructTag>()
        .map(|tag| tag.same_base(base))
        .unwrap_or(false)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn err(&self, reason: impl Into<String>) -> TypeNameError {
        TypeNameError::malformed(self.input, reason)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), TypeNameError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.err(format!("expected '{c}' at offset {}", self.pos)))
        }
    }

    /// Reads a path token such as `u64`, `vector` or `0x2::coin::Coin`.
    fn token(&mut self) -> &'a str {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == ':'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn parse_type(&mut self) -> Result<TypeTag, TypeNameError> {
        let token = self.token();
        if token.is_empty() {
            return Err(self.err(format!("expected a type at offset {}", self.pos)));
        }

        if token == "vector" {
            self.expect('<')?;
            let elem = self.parse_type()?;
            self.expect('>')?;
            return Ok(TypeTag::vector(elem));
        }
        if let Some(prim) = TypeTag::primitive(token) {
            return Ok(prim);
        }

        let mut parts = token.split("::");
        let (Some(addr), Some(module), Some(name), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(self.err(format!("'{token}' is not of the form address::module::Name")));
        };
        if !is_identifier(module) || !is_identifier(name) {
            return Err(self.err(format!("invalid identifier in '{token}'")));
        }
        if !addr.starts_with("0x") {
            return Err(TypeNameError::InvalidAddress {
                input: addr.to_string(),
                reason: "type-string addresses need a 0x prefix".into(),
            });
        }
        let address = addr.parse::<Address>()?;

        let mut type_params = Vec::new();
        if self.eat('<') {
            loop {
                type_params.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                self.expect('>')?;
                break;
            }
        }

        Ok(TypeTag::Struct(StructTag {
            address,
            module: module.to_string(),
            name: name.to_string(),
            type_params,
        }))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_SUI: &str =
        "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";

    #[test]
    fn compress_shortens_addresses() {
        let long = format!(
            "0x0000000000000000000000000000000000000000000000000000000000000002::balance::Balance<{LONG_SUI}>"
        );
        assert_eq!(
            compress(&long).unwrap(),
            "0x2::balance::Balance<0x2::sui::SUI>"
        );
    }

    #[test]
    fn compress_is_idempotent() {
        let inputs = [
            "0x2::vec_map::VecMap<0x1::string::String,0x1::string::String>",
            "vector<vector<u8>>",
            "0x00ab::m::T<u64, vector<0x02::sui::SUI>>",
            "u256",
        ];
        for s in inputs {
            let once = compress(s).unwrap();
            assert_eq!(compress(&once).unwrap(), once, "input {s}");
        }
    }

    #[test]
    fn compose_without_args_is_identity() {
        let none: [&str; 0] = [];
        assert_eq!(compose("0x2::borrow::Borrow", &none), "0x2::borrow::Borrow");
        assert_eq!(
            compose("0x2::vec_map::VecMap", &["u8", "0x2::sui::SUI"]),
            "0x2::vec_map::VecMap<u8, 0x2::sui::SUI>"
        );
    }

    #[test]
    fn composed_names_round_trip_through_the_parser() {
        let name = compose("0x2::borrow::Referent", &["0x1::option::Option<u64>"]);
        let tag: StructTag = name.parse().unwrap();
        assert_eq!(tag.type_params.len(), 1);
        assert_eq!(tag.to_string(), name);
    }

    #[test]
    fn parse_type_name_splits_top_level_args() {
        let (base, args) =
            parse_type_name("0x2::vec_map::VecMap<0x1::string::String, vector<u8>>").unwrap();
        assert_eq!(base, "0x2::vec_map::VecMap");
        assert_eq!(args, vec!["0x1::string::String", "vector<u8>"]);
    }

    #[test]
    fn is_type_ignores_args_and_address_width() {
        let base: StructTag = "0x2::balance::Balance".parse().unwrap();
        let long = format!(
            "0x0000000000000000000000000000000000000000000000000000000000000002::balance::Balance<{LONG_SUI}>"
        );
        assert!(is_type(&long, &base));
        assert!(!is_type("0x2::balance::Supply<0x2::sui::SUI>", &base));
        assert!(!is_type("not a type", &base));
    }

    #[test]
    fn malformed_strings_are_rejected() {
        for bad in [
            "0x2::balance",
            "0x2::balance::Balance<u64",
            "0x2::balance::Balance<>",
            "0x2::balance::Balance<u64>>",
            "vector<u8",
            "u64<u8>",
            "0xzz::m::T",
            "0x2::9mod::T",
            "2::sui::SUI",
            "abc::m::T",
            "vector<2::sui::SUI>",
            "",
        ] {
            assert!(bad.parse::<TypeTag>().is_err(), "accepted {bad:?}");
        }
    }
}
