/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{
    graph::{snapshot::ReadableSnapshot, ThingVertex, TypeVertex},
    rule::{pattern::Pattern, RuleSide},
    thing::{thing_manager::validation::DataValidationError, value::Value},
    type_::type_manager::type_reader::TypeReader,
};

pub(crate) struct OperationTimeValidation {}

impl OperationTimeValidation {
    pub(crate) fn validate_type_instantiable(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<(), DataValidationError> {
        let type_label = || TypeReader::get_label(snapshot, type_).cloned();
        if TypeReader::is_root(snapshot, type_)? {
            Err(DataValidationError::CannotCreateInstanceOfRootType { type_label: type_label()? })
        } else if TypeReader::is_implicit(snapshot, type_)? {
            Err(DataValidationError::CannotCreateInstanceOfImplicitType { type_label: type_label()? })
        } else if TypeReader::is_abstract(snapshot, type_)? {
            Err(DataValidationError::CannotCreateInstanceOfAbstractType { type_label: type_label()? })
        } else {
            Ok(())
        }
    }

    pub(crate) fn validate_value_type(
        snapshot: &impl ReadableSnapshot,
        attribute_type: TypeVertex,
        value: &Value,
    ) -> Result<(), DataValidationError> {
        match TypeReader::get_value_type(snapshot, attribute_type)? {
            Some(expected) if expected == value.value_type() => Ok(()),
            expected => Err(DataValidationError::ValueTypeMismatch {
                attribute_type: TypeReader::get_label(snapshot, attribute_type)?.clone(),
                // only the root attribute type has no value type, and it is never instantiable
                expected: expected.unwrap_or(value.value_type()),
                provided: value.value_type(),
            }),
        }
    }

    pub(crate) fn validate_thing_exists(
        snapshot: &impl ReadableSnapshot,
        vertex: ThingVertex,
    ) -> Result<(), DataValidationError> {
        if snapshot.store().thing_exists(vertex) {
            Ok(())
        } else {
            Err(DataValidationError::ConceptDeleted { vertex })
        }
    }

    pub(crate) fn validate_type_exists(
        snapshot: &impl ReadableSnapshot,
        vertex: TypeVertex,
    ) -> Result<(), DataValidationError> {
        if snapshot.store().type_exists(vertex) {
            Ok(())
        } else {
            Err(DataValidationError::TypeDeleted { vertex })
        }
    }

    pub(crate) fn validate_role_not_implicit(
        snapshot: &impl ReadableSnapshot,
        role_type: TypeVertex,
    ) -> Result<(), DataValidationError> {
        if TypeReader::is_implicit(snapshot, role_type)? {
            let role = TypeReader::get_label(snapshot, role_type)?.clone();
            Err(DataValidationError::ImplicitRoleCastingNotPermitted { role })
        } else {
            Ok(())
        }
    }

    /// Returns whether the player already holds exactly this casting.
    pub(crate) fn validate_player_not_cast_in_relation(
        snapshot: &impl ReadableSnapshot,
        relation: ThingVertex,
        player: ThingVertex,
        role_type: TypeVertex,
    ) -> Result<bool, DataValidationError> {
        match snapshot.store().get_casting_role(relation, player) {
            None => Ok(false),
            Some(existing) if existing == role_type => Ok(true),
            Some(existing) => Err(DataValidationError::PlayerAlreadyCastInRelation {
                player,
                relation,
                existing_role: TypeReader::get_label(snapshot, existing)?.clone(),
                role: TypeReader::get_label(snapshot, role_type)?.clone(),
            }),
        }
    }

    pub(crate) fn validate_rule_patterns(
        snapshot: &impl ReadableSnapshot,
        rule_type: TypeVertex,
        lhs: &Pattern,
        rhs: &Pattern,
    ) -> Result<(), DataValidationError> {
        for (side, pattern) in [(RuleSide::Hypothesis, lhs), (RuleSide::Conclusion, rhs)] {
            if pattern.is_empty() {
                let rule_type = TypeReader::get_label(snapshot, rule_type)?.clone();
                return Err(DataValidationError::RuleWithEmptyPattern { rule_type, side });
            }
        }
        Ok(())
    }
}
