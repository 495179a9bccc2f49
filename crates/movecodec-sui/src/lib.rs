//! # movecodec-sui
//!
//! Record types of the Sui framework package (`0x2`), built on the
//! descriptors and decoding engine in `movecodec-core`.
//!
//! Each record exposes `reified(..)` returning its [`Reified`] descriptor,
//! `phantom(..)` for use as a phantom argument, a `new` constructor from
//! already-decoded fields, and a type-string predicate (`is_type`, or a free
//! `is_*` function for records generic over host types).
//!
//! [`Reified`]: movecodec_core::Reified

pub mod balance;
pub mod borrow;
pub mod display;
pub mod object;
pub mod sui;
pub mod vec_map;

pub use balance::{Balance, Supply};
pub use borrow::{is_referent, Borrow, Referent};
pub use display::{Display, DisplayCreated, VersionUpdated};
pub use object::{ID, UID};
pub use sui::SUI;
pub use vec_map::{is_entry, is_vec_map, Entry, VecMap};

use movecodec_core::{instantiate, is_type, StructTag};

pub(crate) fn base_tag(base: &str) -> StructTag {
    instantiate(base, &[])
}

pub(crate) fn is_base(type_string: &str, base: &str) -> bool {
    is_type(type_string, &base_tag(base))
}
