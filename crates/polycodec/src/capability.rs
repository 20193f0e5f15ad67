//! The [`Named`] capability and its type-erased plumbing.

use std::any::Any;
use std::fmt;

use crate::codecs::CodecError;
use crate::{CodecContext, Pack, PackExtension, PackValue, Shape, Shaped, Unpack};

/// A value that is only known by what it can do: report a name.
///
/// Concrete types become decodable through a [`Capability`] by registering
/// them in a [`crate::registry::TypeRegistry`]; decode call sites never name
/// the concrete type.
pub trait Named: ErasedValue + fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
}

/// A [`Named`] value with its concrete type erased.
pub type Capability = Box<dyn Named>;

/// Object-safe access to the concrete value behind a `dyn Named`.
///
/// Implemented for every `Pack + PartialEq + 'static` type.
pub trait ErasedValue: Any {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
    fn pack_concrete(&self, cx: &CodecContext<'_>) -> Result<PackValue, CodecError>;
    fn eq_erased(&self, other: &dyn Any) -> bool;
}

impl<T: Pack + PartialEq + Any> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn pack_concrete(&self, cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
        self.pack(cx)
    }

    fn eq_erased(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

impl dyn Named {
    pub fn is<T: Named>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Named>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Same concrete type and structurally equal values.
impl PartialEq for dyn Named {
    fn eq(&self, other: &dyn Named) -> bool {
        self.eq_erased(other.as_any())
    }
}

impl Shaped for Capability {
    fn shape() -> Shape {
        Shape::Capability
    }
}

impl Pack for Capability {
    fn pack(&self, cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
        // `self.as_any()` would resolve to the Box, not the value inside it.
        let inner: &dyn Named = self.as_ref();
        let value = inner.pack_concrete(cx)?;
        if !cx.codec.carries_type_tags() {
            return Ok(value);
        }
        let tag = cx
            .registry
            .tag_of(cx.codec, inner.as_any().type_id())
            .ok_or_else(|| cx.unsupported(inner.type_name()))?;
        Ok(PackValue::Extension(PackExtension::new(tag.clone(), value)))
    }
}

impl Unpack for Capability {
    fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError> {
        if !cx.codec.carries_type_tags() {
            return Err(cx.unsupported("dyn Named without a type tag"));
        }
        match value {
            PackValue::Extension(ext) => {
                let entry = cx.registry.resolve(cx.codec, &ext.tag)?;
                entry.construct(*ext.val, cx)
            }
            other => Err(cx.mismatch(&Shape::Capability, &other)),
        }
    }
}
