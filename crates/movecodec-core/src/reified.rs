//! Runtime type descriptors ("reified" types).
//!
//! BCS bytes carry no type tag, so decoding a generic record needs its type
//! arguments supplied at runtime. A [`Reified<T>`] is that runtime stand-in
//! for "the type `T` instantiated with these arguments": it knows its
//! canonical name, its binary layout, and how to turn any of the supported
//! representations into a `T`.
//!
//! Descriptors are immutable and cheap to clone; build them once and share
//! them freely across threads.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{DecodeError, TypeNameError};
use crate::fields::{FieldReader, Repr};
use crate::layout::{Layout, StructLayout};
use crate::type_name::{StructTag, TypeTag};

/// Decodes one value in the given representation.
pub type DecodeFn<T> = dyn Fn(&Value, Repr) -> Result<T, DecodeError> + Send + Sync;

/// Builds a record from its fields.
pub type ConstructFn<T> = dyn Fn(&FieldReader<'_>) -> Result<T, DecodeError> + Send + Sync;

/// The type-erased view of a descriptor, as it appears in a parent's
/// argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    /// A full descriptor: the argument's values occur in the byte layout.
    Reified(TypeTag),
    /// A phantom parameter: name only.
    Phantom(TypeTag),
}

impl TypeArgument {
    pub fn type_tag(&self) -> &TypeTag {
        match self {
            TypeArgument::Reified(tag) | TypeArgument::Phantom(tag) => tag,
        }
    }

    pub fn type_name(&self) -> String {
        self.type_tag().to_string()
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_tag())
    }
}

/// Anything that can be passed as a type argument when building a
/// descriptor.
pub trait IntoTypeArgument {
    fn to_type_argument(&self) -> TypeArgument;
}

impl IntoTypeArgument for TypeArgument {
    fn to_type_argument(&self) -> TypeArgument {
        self.clone()
    }
}

/// Canonical name of a type argument, recursing through nested generics.
pub fn extract_type(arg: &impl IntoTypeArgument) -> String {
    arg.to_type_argument().type_name()
}

/// A name-only descriptor for a phantom type parameter.
///
/// It has no decoding capability: a phantom parameter never occurs in the
/// byte layout, so there is nothing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhantomReified {
    tag: TypeTag,
}

impl PhantomReified {
    pub fn new(tag: TypeTag) -> Self {
        Self { tag }
    }

    /// Phantom descriptor for an arbitrary type string, e.g. a coin type
    /// defined in a package this crate has no record module for.
    pub fn parse(type_string: &str) -> Result<Self, TypeNameError> {
        Ok(Self::new(type_string.parse()?))
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.tag
    }

    pub fn type_name(&self) -> String {
        self.tag.to_string()
    }
}

impl IntoTypeArgument for PhantomReified {
    fn to_type_argument(&self) -> TypeArgument {
        TypeArgument::Phantom(self.tag.clone())
    }
}

pub(crate) enum Decoder<T> {
    /// Primitives and vectors: one function for every representation.
    Value(Arc<DecodeFn<T>>),
    /// Records: built field by field. Framework types the RPC layer renders
    /// flattened may override the typed and JSON representations.
    Struct {
        construct: Arc<ConstructFn<T>>,
        flat_typed: Option<Arc<DecodeFn<T>>>,
        flat_json: Option<Arc<DecodeFn<T>>>,
    },
}

impl<T> Clone for Decoder<T> {
    fn clone(&self) -> Self {
        match self {
            Decoder::Value(f) => Decoder::Value(f.clone()),
            Decoder::Struct {
                construct,
                flat_typed,
                flat_json,
            } => Decoder::Struct {
                construct: construct.clone(),
                flat_typed: flat_typed.clone(),
                flat_json: flat_json.clone(),
            },
        }
    }
}

pub(crate) struct Inner<T> {
    pub(crate) tag: TypeTag,
    pub(crate) type_args: Vec<TypeArgument>,
    pub(crate) layout: Layout,
    pub(crate) decoder: Decoder<T>,
}

/// A full type descriptor for host type `T`.
///
/// Two descriptors describe the same type iff their canonical names are
/// equal; `PartialEq` follows that rule.
pub struct Reified<T> {
    pub(crate) inner: Arc<Inner<T>>,
}

impl<T> Clone for Reified<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Reified<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reified")
            .field("type", &self.inner.tag.to_string())
            .field("type_args", &self.inner.type_args)
            .finish_non_exhaustive()
    }
}

impl<T> PartialEq for Reified<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.tag == other.inner.tag
    }
}

impl<T> Eq for Reified<T> {}

impl<T> IntoTypeArgument for Reified<T> {
    fn to_type_argument(&self) -> TypeArgument {
        TypeArgument::Reified(self.inner.tag.clone())
    }
}

impl<T> Reified<T> {
    /// Descriptor for a non-record type decoded by a single function, such
    /// as a primitive or a vector.
    pub fn from_fn<F>(tag: TypeTag, layout: Layout, type_args: Vec<TypeArgument>, decode: F) -> Self
    where
        F: Fn(&Value, Repr) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                tag,
                type_args,
                layout,
                decoder: Decoder::Value(Arc::new(decode)),
            }),
        }
    }

    /// The full canonical type, including instantiated arguments.
    pub fn type_tag(&self) -> &TypeTag {
        &self.inner.tag
    }

    /// Canonical full type name, e.g. `0x2::balance::Balance<0x2::sui::SUI>`.
    pub fn type_name(&self) -> String {
        self.inner.tag.to_string()
    }

    pub fn struct_tag(&self) -> Option<&StructTag> {
        self.inner.tag.as_struct()
    }

    pub fn type_args(&self) -> &[TypeArgument] {
        &self.inner.type_args
    }

    pub fn layout(&self) -> &Layout {
        &self.inner.layout
    }

    pub fn is_record(&self) -> bool {
        matches!(self.inner.decoder, Decoder::Struct { .. })
    }

    /// The name-only form of this descriptor.
    pub fn phantom(&self) -> PhantomReified {
        PhantomReified::new(self.inner.tag.clone())
    }
}

#[track_caller]
fn parse_base(base: &str) -> StructTag {
    match base.parse::<StructTag>() {
        Ok(tag) if tag.type_params.is_empty() => tag,
        Ok(_) => panic!("record base name '{base}' must not carry type arguments"),
        Err(e) => panic!("invalid record base name: {e}"),
    }
}

/// Full tag of the record `base` instantiated with `type_args`, as
/// [`StructBuilder::build`] would compute it.
///
/// # Panics
///
/// Under the same conditions as [`StructBuilder::new`].
#[track_caller]
pub fn instantiate(base: &str, type_args: &[TypeArgument]) -> StructTag {
    parse_base(base).with_type_params(type_args.iter().map(|a| a.type_tag().clone()).collect())
}

/// Builds the descriptor of a record type.
///
/// Record modules declare their base name, their type arguments and their
/// fields in declaration order, then hand over a constructor that reads each
/// field through a [`FieldReader`]. The same constructor serves every
/// representation.
///
/// ```ignore
/// StructBuilder::new("0x2::balance::Balance")
///     .type_arg(&t)
///     .field_of("value", &builtin::u64())
///     .build(|r| Ok(Balance { tag: r.struct_tag().clone(), value: r.decode("value", &builtin::u64())? }))
/// ```
pub struct StructBuilder<T> {
    base: StructTag,
    type_args: Vec<TypeArgument>,
    fields: Vec<(String, Layout)>,
    flat_typed: Option<Arc<DecodeFn<T>>>,
    flat_json: Option<Arc<DecodeFn<T>>>,
}

impl<T> StructBuilder<T> {
    /// # Panics
    ///
    /// If `base` is not a well-formed `address::module::Name`. Base names are
    /// fixed by the record module.
    #[track_caller]
    pub fn new(base: &str) -> Self {
        Self {
            base: parse_base(base),
            type_args: Vec::new(),
            fields: Vec::new(),
            flat_typed: None,
            flat_json: None,
        }
    }

    pub fn type_arg(mut self, arg: &impl IntoTypeArgument) -> Self {
        self.type_args.push(arg.to_type_argument());
        self
    }

    pub fn field(mut self, name: &str, layout: Layout) -> Self {
        self.fields.push((name.to_string(), layout));
        self
    }

    /// Declares a field whose layout comes from another descriptor.
    pub fn field_of<F>(self, name: &str, ty: &Reified<F>) -> Self {
        let layout = ty.layout().clone();
        self.field(name, layout)
    }

    /// Overrides nested decoding in the typed (RPC) representation.
    pub fn flatten_typed<F>(mut self, decode: F) -> Self
    where
        F: Fn(&Value, Repr) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        self.flat_typed = Some(Arc::new(decode));
        self
    }

    /// Overrides decoding in the JSON representation.
    pub fn flatten_json<F>(mut self, decode: F) -> Self
    where
        F: Fn(&Value, Repr) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        self.flat_json = Some(Arc::new(decode));
        self
    }

    pub fn build<C>(self, construct: C) -> Reified<T>
    where
        C: Fn(&FieldReader<'_>) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        let type_params = self
            .type_args
            .iter()
            .map(|arg| arg.type_tag().clone())
            .collect();
        let tag = self.base.with_type_params(type_params);

        let mut layout = StructLayout::new(tag.to_string());
        for (name, field) in self.fields {
            layout = layout.field(name, field);
        }

        Reified {
            inner: Arc::new(Inner {
                tag: TypeTag::Struct(tag),
                type_args: self.type_args,
                layout: Layout::Struct(layout),
                decoder: Decoder::Struct {
                    construct: Arc::new(construct),
                    flat_typed: self.flat_typed,
                    flat_json: self.flat_json,
                },
            }),
        }
    }
}
