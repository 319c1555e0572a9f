/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::BTreeSet;

use crate::{
    graph::{snapshot::ReadableSnapshot, Kind, TypeVertex},
    label::Label,
    type_::{
        implicit::ImplicitLabels,
        type_manager::{type_reader::TypeReader, validation::SchemaValidationError},
    },
};

pub(crate) struct OperationTimeValidation {}

impl OperationTimeValidation {
    pub(crate) fn validate_label_uniqueness(
        snapshot: &impl ReadableSnapshot,
        label: &Label,
    ) -> Result<(), SchemaValidationError> {
        match TypeReader::get_labelled_type(snapshot, label) {
            None => Ok(()),
            Some(existing) => Err(SchemaValidationError::LabelShouldBeUnique {
                label: label.clone(),
                existing_kind: TypeReader::get_kind(snapshot, existing)?,
            }),
        }
    }

    pub(crate) fn validate_type_kind(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
        expected: Kind,
    ) -> Result<(), SchemaValidationError> {
        let actual = TypeReader::get_kind(snapshot, type_)?;
        if actual == expected {
            Ok(())
        } else {
            let label = TypeReader::get_label(snapshot, type_)?.clone();
            Err(SchemaValidationError::KindMismatch { label, expected, actual })
        }
    }

    pub(crate) fn validate_type_is_not_root(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<(), SchemaValidationError> {
        if TypeReader::is_root(snapshot, type_)? {
            let label = TypeReader::get_label(snapshot, type_)?.clone();
            Err(SchemaValidationError::RootModification { label })
        } else {
            Ok(())
        }
    }

    pub(crate) fn validate_type_is_not_implicit(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<(), SchemaValidationError> {
        if TypeReader::is_implicit(snapshot, type_)? {
            let label = TypeReader::get_label(snapshot, type_)?.clone();
            Err(SchemaValidationError::CannotModifyImplicitType { label })
        } else {
            Ok(())
        }
    }

    pub(crate) fn validate_sub_does_not_create_cycle(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
        supertype: TypeVertex,
    ) -> Result<(), SchemaValidationError> {
        if TypeReader::is_same_or_subtype_of(snapshot, supertype, type_)? {
            Err(SchemaValidationError::CycleFoundInTypeHierarchy {
                label: TypeReader::get_label(snapshot, type_)?.clone(),
                supertype: TypeReader::get_label(snapshot, supertype)?.clone(),
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn validate_value_type_compatible_with_supertype(
        snapshot: &impl ReadableSnapshot,
        attribute_type: TypeVertex,
        supertype: TypeVertex,
    ) -> Result<(), SchemaValidationError> {
        let value_type = TypeReader::get_value_type(snapshot, attribute_type)?;
        let supertype_value_type = TypeReader::get_value_type(snapshot, supertype)?;
        match (value_type, supertype_value_type) {
            (Some(value_type), Some(supertype_value_type)) if value_type != supertype_value_type => {
                Err(SchemaValidationError::AttributeSupertypeValueTypeMismatch {
                    label: TypeReader::get_label(snapshot, attribute_type)?.clone(),
                    value_type,
                    supertype: TypeReader::get_label(snapshot, supertype)?.clone(),
                    supertype_value_type,
                })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn validate_no_subtypes_for_type_deletion(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<(), SchemaValidationError> {
        if TypeReader::get_subtypes(snapshot, type_).is_empty() {
            Ok(())
        } else {
            let label = TypeReader::get_label(snapshot, type_)?.clone();
            Err(SchemaValidationError::CannotDeleteTypeWithExistingSubtypes { label })
        }
    }

    pub(crate) fn validate_no_instances_for_type_deletion(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<(), SchemaValidationError> {
        if TypeReader::has_instances(snapshot, type_) {
            let label = TypeReader::get_label(snapshot, type_)?.clone();
            Err(SchemaValidationError::CannotDeleteTypeWithExistingInstances { label })
        } else {
            Ok(())
        }
    }

    pub(crate) fn validate_no_instances_to_set_abstract(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<(), SchemaValidationError> {
        if TypeReader::has_instances(snapshot, type_) {
            let label = TypeReader::get_label(snapshot, type_)?.clone();
            Err(SchemaValidationError::CannotSetAbstractWithExistingInstances { label })
        } else {
            Ok(())
        }
    }

    /// Resolves an implicit label to the existing implicit type of the expected kind, if any.
    pub(crate) fn validate_implicit_type(
        snapshot: &impl ReadableSnapshot,
        label: &Label,
        expected_kind: Kind,
    ) -> Result<Option<TypeVertex>, SchemaValidationError> {
        let Some(existing) = TypeReader::get_labelled_type(snapshot, label) else {
            return Ok(None);
        };
        if TypeReader::get_kind(snapshot, existing)? == expected_kind && TypeReader::is_implicit(snapshot, existing)? {
            Ok(Some(existing))
        } else {
            Err(SchemaValidationError::ImplicitLabelTakenByDeclaredType { label: label.clone(), expected_kind })
        }
    }

    /// Implicit types are wired only during synthesis, and the type API refuses to modify them or to
    /// subtype them. Neither error below can be produced through the public API: they are raised only
    /// for a store whose implicit types were rewired at the storage level.
    pub(crate) fn validate_implicit_relation_type_wiring(
        snapshot: &impl ReadableSnapshot,
        relation_type: TypeVertex,
        owner_role: TypeVertex,
        value_role: TypeVertex,
        attribute_type: TypeVertex,
    ) -> Result<(), SchemaValidationError> {
        let expected_relates = BTreeSet::from([owner_role, value_role]);
        let expected_relating = BTreeSet::from([relation_type]);
        if TypeReader::get_relates(snapshot, relation_type) != expected_relates
            || TypeReader::get_relating(snapshot, owner_role) != expected_relating
            || TypeReader::get_relating(snapshot, value_role) != expected_relating
        {
            let label = TypeReader::get_label(snapshot, relation_type)?.clone();
            return Err(SchemaValidationError::ImplicitTypeWiringConflict { label });
        }
        if let Some(player) =
            TypeReader::get_players(snapshot, value_role).into_iter().find(|player| *player != attribute_type)
        {
            return Err(SchemaValidationError::ImplicitValueRolePlayedByOtherType {
                role: TypeReader::get_label(snapshot, value_role)?.clone(),
                player: TypeReader::get_label(snapshot, player)?.clone(),
                attribute_type: TypeReader::get_label(snapshot, attribute_type)?.clone(),
            });
        }
        Ok(())
    }

    /// An owner may hold an attribute type as a has or as a key, never as both.
    pub(crate) fn validate_has_and_key_exclusive(
        snapshot: &impl ReadableSnapshot,
        owner: TypeVertex,
        attribute_type: TypeVertex,
        required: bool,
    ) -> Result<(), SchemaValidationError> {
        let attribute_label = TypeReader::get_label(snapshot, attribute_type)?;
        let opposite = ImplicitLabels::new(attribute_label, !required);
        let Some(opposite_owner_role) = TypeReader::get_labelled_type(snapshot, &opposite.owner) else {
            return Ok(());
        };
        if TypeReader::get_plays(snapshot, owner)?.contains_key(&opposite_owner_role) {
            Err(SchemaValidationError::KeyAndHasConflict {
                owner: TypeReader::get_label(snapshot, owner)?.clone(),
                attribute_type: attribute_label.clone(),
            })
        } else {
            Ok(())
        }
    }
}
