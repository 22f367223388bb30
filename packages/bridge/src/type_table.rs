//! Foreign type identification.

use std::collections::HashMap;

use ocbridge_runtime::{type_names, ForeignTypeId, Handle, Runtime};

use crate::error::Result;
use crate::extension::ExtensionRegistry;

/// What a foreign type identifier stands for on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Text,
    MutableText,
    Number,
    Boolean,
    Data,
    MutableData,
    Array,
    MutableArray,
    Dictionary,
    MutableDictionary,
    Set,
    MutableSet,
    IndexArray,
    MutableIndexArray,
    IndexSet,
    MutableIndexSet,
    IndexPairSet,
    MutableIndexPairSet,
    /// Claimed by the extension converter at this registry index.
    Extension(usize),
    /// Not known to the bridge.
    Unknown(ForeignTypeId),
}

impl TypeKind {
    /// The builtin kind registered under `name`.
    pub fn from_builtin_name(name: &str) -> Option<Self> {
        let kind = match name {
            type_names::STRING => TypeKind::Text,
            type_names::MUTABLE_STRING => TypeKind::MutableText,
            type_names::NUMBER => TypeKind::Number,
            type_names::BOOLEAN => TypeKind::Boolean,
            type_names::DATA => TypeKind::Data,
            type_names::MUTABLE_DATA => TypeKind::MutableData,
            type_names::ARRAY => TypeKind::Array,
            type_names::MUTABLE_ARRAY => TypeKind::MutableArray,
            type_names::DICTIONARY => TypeKind::Dictionary,
            type_names::MUTABLE_DICTIONARY => TypeKind::MutableDictionary,
            type_names::SET => TypeKind::Set,
            type_names::MUTABLE_SET => TypeKind::MutableSet,
            type_names::INDEX_ARRAY => TypeKind::IndexArray,
            type_names::MUTABLE_INDEX_ARRAY => TypeKind::MutableIndexArray,
            type_names::INDEX_SET => TypeKind::IndexSet,
            type_names::MUTABLE_INDEX_SET => TypeKind::MutableIndexSet,
            type_names::INDEX_PAIR_SET => TypeKind::IndexPairSet,
            type_names::MUTABLE_INDEX_PAIR_SET => TypeKind::MutableIndexPairSet,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_mutable(self) -> bool {
        matches!(
            self,
            TypeKind::MutableText
                | TypeKind::MutableData
                | TypeKind::MutableArray
                | TypeKind::MutableDictionary
                | TypeKind::MutableSet
                | TypeKind::MutableIndexArray
                | TypeKind::MutableIndexSet
                | TypeKind::MutableIndexPairSet
        )
    }
}

/// Lookup table from foreign type identifier to [`TypeKind`].
///
/// Built once from the runtime's registered types and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    kinds: HashMap<ForeignTypeId, TypeKind>,
}

impl TypeTable {
    /// Build the table for a runtime.
    ///
    /// Extension claims take precedence over builtin names.
    pub fn build(runtime: &dyn Runtime, extensions: &ExtensionRegistry) -> Self {
        let kinds = runtime
            .registered_types()
            .into_iter()
            .filter_map(|desc| {
                let kind = extensions
                    .claimant(&desc.name)
                    .map(TypeKind::Extension)
                    .or_else(|| TypeKind::from_builtin_name(&desc.name))?;
                Some((desc.id, kind))
            })
            .collect::<HashMap<_, _>>();
        tracing::debug!(entries = kinds.len(), "built type table");
        Self { kinds }
    }

    /// The kind registered for a type identifier.
    pub fn kind_of(&self, id: ForeignTypeId) -> TypeKind {
        self.kinds
            .get(&id)
            .copied()
            .unwrap_or(TypeKind::Unknown(id))
    }

    /// Identify a borrowed handle. Never retains or releases it.
    pub fn identify(&self, runtime: &dyn Runtime, handle: Handle) -> Result<TypeKind> {
        Ok(self.kind_of(runtime.type_id_of(handle)?))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
