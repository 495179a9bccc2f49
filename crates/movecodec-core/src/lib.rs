//! # movecodec-core
//!
//! Runtime type descriptors and the decoding engine shared by every MoveCodec
//! crate. Record modules declare their fields against a [`StructBuilder`] and
//! get decoding from raw fields, RPC typed fields, JSON and BCS bytes, plus
//! the matching encoders, from the types defined here.

pub mod address;
pub mod builtin;
pub mod decoder;
pub mod encode;
pub mod error;
pub mod fields;
pub mod layout;
pub mod reified;
pub mod type_name;

pub use address::Address;
pub use alloy_primitives::U256;
pub use decoder::check_type_args;
pub use encode::{encode_record, Encode, FieldWriter, MoveStruct, MoveType};
pub use error::{DecodeError, ErrorKind, LayoutError, TypeNameError};
pub use fields::{FieldReader, RawFields, Repr, TypedFields};
pub use layout::{Layout, StructLayout};
pub use reified::{extract_type, instantiate, IntoTypeArgument, PhantomReified, Reified, StructBuilder, TypeArgument};
pub use type_name::{compose, compress, is_type, parse_type_name, StructTag, TypeTag};
