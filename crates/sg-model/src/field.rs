//! Structured content fields.
//!
//! A page owns a mapping of field name to [`Field`]: either a scalar
//! [`PlainField`] or an ordered [`BlocksField`] whose slots are addressed by
//! integer position and hold named sub-fields. The `_type` discriminator is
//! carried on the wire so generic field lookups can be narrowed safely.
//!
//! Block positions are dense-ish integer keys, not required to be
//! contiguous; rendering order is ascending position. Deleting a block is a
//! soft delete so that code holding a stale position never silently
//! re-targets a different block.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single content field variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Field {
    PlainField(PlainField),
    BlocksField(BlocksField),
}

impl Field {
    /// Discriminator name as carried on the wire.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::PlainField(_) => "PlainField",
            Self::BlocksField(_) => "BlocksField",
        }
    }

    /// Narrow to a plain field.
    #[must_use]
    pub fn as_plain(&self) -> Option<&PlainField> {
        match self {
            Self::PlainField(plain) => Some(plain),
            Self::BlocksField(_) => None,
        }
    }

    /// Narrow to a blocks field.
    #[must_use]
    pub fn as_blocks(&self) -> Option<&BlocksField> {
        match self {
            Self::BlocksField(blocks) => Some(blocks),
            Self::PlainField(_) => None,
        }
    }

    /// Narrow to a mutable blocks field.
    pub fn as_blocks_mut(&mut self) -> Option<&mut BlocksField> {
        match self {
            Self::BlocksField(blocks) => Some(blocks),
            Self::PlainField(_) => None,
        }
    }
}

/// Scalar content value attached to a page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlainField {
    /// Opaque content blob; `null` until a write lands.
    #[serde(default)]
    pub content: Value,
}

/// Ordered, position-addressed collection of typed content blocks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlocksField {
    /// Slots keyed by position; iteration order is ascending position.
    #[serde(default)]
    pub blocks: BTreeMap<u32, Block>,
}

impl BlocksField {
    /// Blocks that are not soft-deleted, in ascending position order.
    pub fn live_blocks(&self) -> impl Iterator<Item = (u32, &Block)> {
        self.blocks
            .iter()
            .filter(|(_, block)| !block.deleted)
            .map(|(&position, block)| (position, block))
    }
}

/// One slot of a blocks field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block type as defined by the page template.
    pub type_name: String,
    /// Named sub-field values.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, Value>,
    /// Soft-delete flag; the slot id is preserved for stale references.
    #[serde(default)]
    pub deleted: bool,
}

/// Registration payload: seeds field/block structure, never content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub field_name: String,
    /// When present, the registration targets a block slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockSpec>,
}

/// Block slot portion of a [`FieldSpec`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSpec {
    pub position: u32,
    pub type_name: String,
    /// When present, an empty sub-field entry is seeded under this name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_field_name: Option<String>,
}

/// Selects an existing field, block slot, or block sub-field.
///
/// How much of `block` is specified decides the granularity a delete or
/// unregister command operates at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSelector {
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockSelector>,
}

/// Block slot portion of a [`FieldSelector`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSelector {
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_field_name: Option<String>,
}

/// Content write targeting a field, discriminated like the stored variant.
///
/// The discriminator must agree with the stored field's; the store treats a
/// mismatch as a caller contract violation and leaves the field untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum FieldWrite {
    #[serde(rename_all = "camelCase")]
    PlainField { field_name: String, content: Value },
    #[serde(rename_all = "camelCase")]
    BlocksField {
        field_name: String,
        block_position: u32,
        block_field_name: String,
        value: Value,
    },
}

impl FieldWrite {
    /// Name of the targeted field.
    #[must_use]
    pub fn field_name(&self) -> &str {
        match self {
            Self::PlainField { field_name, .. } | Self::BlocksField { field_name, .. } => {
                field_name
            }
        }
    }

    /// Discriminator name as carried on the wire.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::PlainField { .. } => "PlainField",
            Self::BlocksField { .. } => "BlocksField",
        }
    }
}
