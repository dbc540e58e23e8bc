//! Field store operations.
//!
//! Registration seeds structure and never writes content; updates write
//! content and never create structure. A write whose `_type` discriminator
//! disagrees with the stored variant, or that targets an unregistered slot,
//! is a caller contract violation: it is logged and the field is left
//! untouched rather than coerced.
//!
//! `deletePageField` soft-deletes block slots only; plain fields have no
//! soft-delete and are removed hard via `unregisterPageField`.

use sg_model::{
    Block, BlocksField, Field, FieldSelector, FieldSpec, FieldWrite, PageId, PlainField,
};

use crate::state::SiteState;

impl SiteState {
    /// Seed field/block structure on a page.
    ///
    /// Without a block spec, ensures a plain field exists under the name.
    /// With one, ensures a blocks field, the slot at the given position
    /// (stamping its type name), and, when a sub-field name is given, an
    /// empty sub-field entry. Existing content is never cleared; a stored
    /// field of the wrong variant is replaced by a fresh one of the
    /// registered shape.
    pub(crate) fn register_field(&mut self, id: &PageId, spec: &FieldSpec) {
        let node = self.node_mut(id);

        let Some(block_spec) = &spec.block else {
            match node.fields.get(&spec.field_name) {
                Some(Field::PlainField(_)) => {}
                Some(Field::BlocksField(_)) => {
                    tracing::warn!(
                        field = %spec.field_name,
                        "Re-registering blocks field as plain; previous blocks dropped"
                    );
                    node.fields.insert(
                        spec.field_name.clone(),
                        Field::PlainField(PlainField::default()),
                    );
                }
                None => {
                    node.fields.insert(
                        spec.field_name.clone(),
                        Field::PlainField(PlainField::default()),
                    );
                }
            }
            return;
        };

        if let Some(Field::PlainField(_)) = node.fields.get(&spec.field_name) {
            tracing::warn!(
                field = %spec.field_name,
                "Re-registering plain field as blocks; previous content dropped"
            );
            node.fields.remove(&spec.field_name);
        }
        let Field::BlocksField(blocks) = node
            .fields
            .entry(spec.field_name.clone())
            .or_insert_with(|| Field::BlocksField(BlocksField::default()))
        else {
            return;
        };

        let block = blocks.blocks.entry(block_spec.position).or_default();
        block.type_name = block_spec.type_name.clone();
        if let Some(sub_field) = &block_spec.block_field_name {
            block
                .fields
                .entry(sub_field.clone())
                .or_insert(serde_json::Value::Null);
        }
    }

    /// Write field/block content.
    ///
    /// Overwrites a plain field's content, or a block sub-field's value. A
    /// missing page/field/slot or a discriminator mismatch leaves the state
    /// untouched (logged; see module docs).
    pub(crate) fn update_field(&mut self, id: &PageId, write: &FieldWrite) {
        let Some(node) = self.existing_node_mut(id) else {
            tracing::warn!(page = %id, "Field write on unknown page ignored");
            return;
        };
        let Some(field) = node.fields.get_mut(write.field_name()) else {
            tracing::warn!(
                page = %id,
                field = %write.field_name(),
                "Field write on unregistered field ignored"
            );
            return;
        };

        match (write, &mut *field) {
            (FieldWrite::PlainField { content, .. }, Field::PlainField(plain)) => {
                plain.content = content.clone();
            }
            (
                FieldWrite::BlocksField {
                    block_position,
                    block_field_name,
                    value,
                    ..
                },
                Field::BlocksField(blocks),
            ) => {
                let Some(block) = blocks.blocks.get_mut(block_position) else {
                    tracing::warn!(
                        page = %id,
                        field = %write.field_name(),
                        position = *block_position,
                        "Field write on unregistered block slot ignored"
                    );
                    return;
                };
                block
                    .fields
                    .insert(block_field_name.clone(), value.clone());
            }
            (write, stored) => {
                tracing::warn!(
                    page = %id,
                    field = %write.field_name(),
                    expected = %stored.type_name(),
                    found = %write.type_name(),
                    "Field write discriminator mismatch ignored"
                );
            }
        }
    }

    /// Soft-delete the block slot addressed by the selector.
    ///
    /// The slot keeps its type name and sub-fields so stale positional
    /// references never re-target a different block. On a plain field this
    /// is a logged no-op: plain fields have no soft-delete.
    pub(crate) fn delete_field(&mut self, id: &PageId, selector: &FieldSelector) {
        let Some(block_selector) = &selector.block else {
            tracing::warn!(
                page = %id,
                field = %selector.field_name,
                "Soft delete is defined for block slots only; ignored"
            );
            return;
        };
        let Some(node) = self.existing_node_mut(id) else {
            return;
        };
        let Some(blocks) = node
            .fields
            .get_mut(&selector.field_name)
            .and_then(Field::as_blocks_mut)
        else {
            return;
        };

        // The slot is reserved even when nothing was registered there yet.
        blocks
            .blocks
            .entry(block_selector.position)
            .or_insert_with(Block::default)
            .deleted = true;
    }

    /// Hard-remove a field, block slot, or block sub-field.
    ///
    /// How much of the selector's block portion is specified decides the
    /// granularity: sub-field name removes one key, position alone removes
    /// the slot, no block portion removes the whole field. Missing targets
    /// are ignored.
    pub(crate) fn unregister_field(&mut self, id: &PageId, selector: &FieldSelector) {
        let Some(node) = self.existing_node_mut(id) else {
            return;
        };

        let Some(block_selector) = &selector.block else {
            node.fields.remove(&selector.field_name);
            return;
        };

        let Some(blocks) = node
            .fields
            .get_mut(&selector.field_name)
            .and_then(Field::as_blocks_mut)
        else {
            return;
        };

        match &block_selector.block_field_name {
            Some(sub_field) => {
                if let Some(block) = blocks.blocks.get_mut(&block_selector.position) {
                    block.fields.remove(sub_field);
                }
            }
            None => {
                blocks.blocks.remove(&block_selector.position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sg_model::{BlockSelector, BlockSpec};

    use super::*;

    fn id(raw: &str) -> PageId {
        PageId::from(raw)
    }

    fn plain_spec(name: &str) -> FieldSpec {
        FieldSpec {
            field_name: name.to_owned(),
            block: None,
        }
    }

    fn block_spec(name: &str, position: u32, sub: Option<&str>) -> FieldSpec {
        FieldSpec {
            field_name: name.to_owned(),
            block: Some(BlockSpec {
                position,
                type_name: "Hero".to_owned(),
                block_field_name: sub.map(str::to_owned),
            }),
        }
    }

    fn selector(name: &str, block: Option<(u32, Option<&str>)>) -> FieldSelector {
        FieldSelector {
            field_name: name.to_owned(),
            block: block.map(|(position, sub)| BlockSelector {
                position,
                block_field_name: sub.map(str::to_owned),
            }),
        }
    }

    fn state_with_page(page_id: &str) -> SiteState {
        let mut state = SiteState::default();
        state.node_mut(&id(page_id)).slug = "page".to_owned();
        state
    }

    #[test]
    fn test_register_then_update_plain_field() {
        let mut state = state_with_page("P1");
        state.register_field(&id("P1"), &plain_spec("intro"));

        state.update_field(
            &id("P1"),
            &FieldWrite::PlainField {
                field_name: "intro".to_owned(),
                content: json!("Hello"),
            },
        );

        assert_eq!(
            state.plain_content(&id("P1"), "intro").unwrap(),
            &json!("Hello")
        );
    }

    #[test]
    fn test_register_seeds_block_without_content() {
        let mut state = state_with_page("P1");

        state.register_field(&id("P1"), &block_spec("body", 0, Some("heading")));

        let node = state.get_node(&id("P1")).unwrap();
        let blocks = node.fields["body"].as_blocks().unwrap();
        let block = &blocks.blocks[&0];
        assert_eq!(block.type_name, "Hero");
        assert_eq!(block.fields["heading"], serde_json::Value::Null);
    }

    #[test]
    fn test_register_is_not_destructive() {
        let mut state = state_with_page("P1");
        state.register_field(&id("P1"), &block_spec("body", 0, Some("heading")));
        state.update_field(
            &id("P1"),
            &FieldWrite::BlocksField {
                field_name: "body".to_owned(),
                block_position: 0,
                block_field_name: "heading".to_owned(),
                value: json!("Welcome"),
            },
        );

        // Re-registering the same slot (e.g. a component remounting) must
        // keep the written content.
        state.register_field(&id("P1"), &block_spec("body", 0, Some("heading")));

        assert_eq!(
            state.block_value(&id("P1"), "body", 0, "heading").unwrap(),
            &json!("Welcome")
        );
    }

    #[test]
    fn test_update_with_mismatched_discriminator_is_noop() {
        let mut state = state_with_page("P1");
        state.register_field(&id("P1"), &plain_spec("intro"));
        let before = state.clone();

        state.update_field(
            &id("P1"),
            &FieldWrite::BlocksField {
                field_name: "intro".to_owned(),
                block_position: 0,
                block_field_name: "heading".to_owned(),
                value: json!("nope"),
            },
        );

        assert_eq!(state, before);
    }

    #[test]
    fn test_update_unregistered_slot_is_noop() {
        let mut state = state_with_page("P1");
        state.register_field(&id("P1"), &block_spec("body", 0, None));
        let before = state.clone();

        state.update_field(
            &id("P1"),
            &FieldWrite::BlocksField {
                field_name: "body".to_owned(),
                block_position: 7,
                block_field_name: "heading".to_owned(),
                value: json!("nope"),
            },
        );

        assert_eq!(state, before);
    }

    #[test]
    fn test_delete_field_soft_deletes_block() {
        let mut state = state_with_page("P1");
        state.register_field(&id("P1"), &block_spec("body", 3, Some("heading")));
        state.update_field(
            &id("P1"),
            &FieldWrite::BlocksField {
                field_name: "body".to_owned(),
                block_position: 3,
                block_field_name: "heading".to_owned(),
                value: json!("kept"),
            },
        );

        state.delete_field(&id("P1"), &selector("body", Some((3, None))));

        let node = state.get_node(&id("P1")).unwrap();
        let block = &node.fields["body"].as_blocks().unwrap().blocks[&3];
        assert!(block.deleted);
        // Type and sub-fields survive the soft delete.
        assert_eq!(block.type_name, "Hero");
        assert_eq!(block.fields["heading"], json!("kept"));
    }

    #[test]
    fn test_delete_field_on_plain_is_noop() {
        let mut state = state_with_page("P1");
        state.register_field(&id("P1"), &plain_spec("intro"));
        let before = state.clone();

        state.delete_field(&id("P1"), &selector("intro", None));

        assert_eq!(state, before);
    }

    #[test]
    fn test_unregister_removes_sub_field_only() {
        let mut state = state_with_page("P1");
        state.register_field(&id("P1"), &block_spec("body", 0, Some("heading")));
        state.register_field(&id("P1"), &block_spec("body", 0, Some("tagline")));

        state.unregister_field(&id("P1"), &selector("body", Some((0, Some("heading")))));

        let node = state.get_node(&id("P1")).unwrap();
        let block = &node.fields["body"].as_blocks().unwrap().blocks[&0];
        assert!(!block.fields.contains_key("heading"));
        assert!(block.fields.contains_key("tagline"));
    }

    #[test]
    fn test_unregister_removes_block_slot() {
        let mut state = state_with_page("P1");
        state.register_field(&id("P1"), &block_spec("body", 0, None));
        state.register_field(&id("P1"), &block_spec("body", 1, None));

        state.unregister_field(&id("P1"), &selector("body", Some((0, None))));

        let node = state.get_node(&id("P1")).unwrap();
        let blocks = node.fields["body"].as_blocks().unwrap();
        assert!(!blocks.blocks.contains_key(&0));
        assert!(blocks.blocks.contains_key(&1));
    }

    #[test]
    fn test_unregister_removes_whole_field() {
        let mut state = state_with_page("P1");
        state.register_field(&id("P1"), &plain_spec("intro"));

        state.unregister_field(&id("P1"), &selector("intro", None));

        assert!(state.get_node(&id("P1")).unwrap().fields.is_empty());
    }

    #[test]
    fn test_unregister_missing_target_is_noop() {
        let mut state = state_with_page("P1");
        let before = state.clone();

        state.unregister_field(&id("P1"), &selector("ghost", Some((4, None))));

        assert_eq!(state, before);
    }
}
