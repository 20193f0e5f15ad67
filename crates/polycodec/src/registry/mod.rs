//! Type registry: maps wire tags back to concrete types behind a
//! [`Capability`].
//!
//! The registry has two phases. A [`RegistryBuilder`] collects registrations
//! on a single thread and rejects conflicts as they happen; [`RegistryBuilder::build`]
//! freezes it into a [`TypeRegistry`] that has no mutating methods and is
//! shared as `Arc<TypeRegistry>` by every codec and thread.
//!
//! A process-wide instance is published once through [`install`] (or lazily
//! through [`global`], which installs [`default_registry`]).

mod error;
mod tag;

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{debug, error};

use crate::codecs::CodecError;
use crate::{Capability, CodecContext, CodecId, Named, PackValue, Record, Shape, Unpack};

pub use error::RegistryError;
pub use tag::{TypeTag, MSGPACK_MAX_EXT};

type Construct = fn(PackValue, &CodecContext<'_>) -> Result<Capability, CodecError>;

fn construct<T: Named + Unpack>(
    value: PackValue,
    cx: &CodecContext<'_>,
) -> Result<Capability, CodecError> {
    Ok(Box::new(T::unpack(value, cx)?))
}

/// How to rebuild one concrete type from its decoded payload.
#[derive(Clone, Copy)]
pub struct TypeEntry {
    type_id: TypeId,
    type_name: &'static str,
    shape: fn() -> Shape,
    construct: Construct,
}

impl TypeEntry {
    pub fn of<T: Named + Unpack>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            shape: T::shape,
            construct: construct::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Layout of the concrete type's payload.
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    pub fn construct(
        &self,
        value: PackValue,
        cx: &CodecContext<'_>,
    ) -> Result<Capability, CodecError> {
        (self.construct)(value, cx)
    }
}

impl std::fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEntry")
            .field("type_name", &self.type_name)
            .finish()
    }
}

#[derive(Debug, Default)]
struct CodecTable {
    by_tag: HashMap<TypeTag, TypeEntry>,
    by_type: HashMap<TypeId, TypeTag>,
}

impl CodecTable {
    fn bind(&mut self, tag: TypeTag, entry: TypeEntry) {
        self.by_type.insert(entry.type_id, tag.clone());
        self.by_tag.insert(tag, entry);
    }
}

/// Mutable, single-threaded registration phase.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    tables: HashMap<CodecId, CodecTable>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `tag` for `codec`.
    ///
    /// Registering the same type under the same tag again is a no-op. A tag
    /// already bound to another type, a type already bound to another tag,
    /// or a tag kind the codec cannot carry are rejected here rather than
    /// surfacing later as decode failures.
    pub fn register<T: Named + Unpack>(
        &mut self,
        codec: CodecId,
        tag: impl Into<TypeTag>,
    ) -> Result<&mut Self, RegistryError> {
        let tag = tag.into();
        let entry = TypeEntry::of::<T>();
        if !tag.accepted_by(codec) {
            return Err(RegistryError::TagNotAccepted { codec, tag });
        }
        let table = self.tables.entry(codec).or_default();
        if let Some(existing) = table.by_tag.get(&tag) {
            if existing.type_id == entry.type_id {
                return Ok(self);
            }
            return Err(RegistryError::TagConflict {
                codec,
                tag,
                existing: existing.type_name,
                requested: entry.type_name,
            });
        }
        if let Some(existing) = table.by_type.get(&entry.type_id) {
            return Err(RegistryError::TypeConflict {
                codec,
                type_name: entry.type_name,
                existing: existing.clone(),
                requested: tag,
            });
        }
        debug!(%codec, %tag, type_name = entry.type_name, "registered type");
        table.bind(tag, entry);
        Ok(self)
    }

    /// Registers [`Record`] under its CBOR name, MessagePack `ext` type and
    /// Tiny code.
    pub fn register_defaults(&mut self) -> Result<&mut Self, RegistryError> {
        self.register::<Record>(CodecId::Cbor, Record::TYPE_NAME)?
            .register::<Record>(CodecId::MsgPack, Record::MSGPACK_EXT)?
            .register::<Record>(CodecId::Tiny, Record::TINY_CODE)
    }

    /// Freezes the registrations.
    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            tables: self.tables,
        }
    }
}

/// Frozen, read-only registry.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    tables: HashMap<CodecId, CodecTable>,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry with no entries; every capability encode/decode fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Finds the entry registered under `tag` for `codec`.
    pub fn resolve(&self, codec: CodecId, tag: &TypeTag) -> Result<&TypeEntry, CodecError> {
        self.tables
            .get(&codec)
            .and_then(|table| table.by_tag.get(tag))
            .ok_or_else(|| CodecError::UnregisteredType {
                codec,
                tag: tag.clone(),
            })
    }

    /// Reverse lookup used when encoding a capability.
    pub fn tag_of(&self, codec: CodecId, type_id: TypeId) -> Option<&TypeTag> {
        self.tables
            .get(&codec)
            .and_then(|table| table.by_type.get(&type_id))
    }

    /// Number of types registered for `codec`.
    pub fn len(&self, codec: CodecId) -> usize {
        self.tables.get(&codec).map_or(0, |table| table.by_tag.len())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|table| table.by_tag.is_empty())
    }
}

/// [`Record`] under all three tag-carrying codecs.
pub fn default_registry() -> Result<TypeRegistry, RegistryError> {
    let mut builder = RegistryBuilder::new();
    builder.register_defaults()?;
    Ok(builder.build())
}

static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Publishes `registry` as the process-wide registry.
///
/// Must happen before the first [`global`] call; a second install fails.
pub fn install(registry: TypeRegistry) -> Result<Arc<TypeRegistry>, RegistryError> {
    let registry = Arc::new(registry);
    GLOBAL
        .set(Arc::clone(&registry))
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    debug!("installed process-wide type registry");
    Ok(registry)
}

/// The process-wide registry, installing [`default_registry`] if nothing
/// was installed yet.
pub fn global() -> Arc<TypeRegistry> {
    Arc::clone(GLOBAL.get_or_init(|| {
        debug!("installing default type registry");
        let registry = default_registry().unwrap_or_else(|err| {
            error!(%err, "default registrations rejected, installing an empty registry");
            TypeRegistry::empty()
        });
        Arc::new(registry)
    }))
}
