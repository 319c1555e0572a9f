/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::BTreeSet;

use crate::{
    error::ConceptReadError,
    graph::{snapshot::ReadableSnapshot, TypeVertex},
    rule::{Rule, RuleSide},
    type_::{relation_type::RelationType, role_type::RoleType, type_manager::type_reader::TypeReader, TypeAPI},
    validation::{LabelList, ValidationViolation},
};

pub(crate) struct CommitTimeValidation {}

impl CommitTimeValidation {
    /// A role must be related by exactly one relation type.
    pub(crate) fn validate_role_type_is_related_once(
        snapshot: &impl ReadableSnapshot,
        role_type: RoleType,
    ) -> Result<Option<ValidationViolation>, ConceptReadError> {
        if TypeReader::is_root(snapshot, role_type.vertex())? {
            return Ok(None);
        }
        let relating = TypeReader::get_relating(snapshot, role_type.vertex());
        let role = TypeReader::get_label(snapshot, role_type.vertex())?.clone();
        match relating.len() {
            0 => Ok(Some(ValidationViolation::RoleWithoutRelationType { role })),
            1 => Ok(None),
            _ => {
                let mut relation_types = Vec::with_capacity(relating.len());
                for relation_type in relating {
                    relation_types.push(TypeReader::get_label(snapshot, relation_type)?.clone());
                }
                Ok(Some(ValidationViolation::RoleRelatedByMultipleRelationTypes {
                    role,
                    relation_types: LabelList(relation_types),
                }))
            }
        }
    }

    pub(crate) fn validate_relation_type_has_roles(
        snapshot: &impl ReadableSnapshot,
        relation_type: RelationType,
    ) -> Result<Option<ValidationViolation>, ConceptReadError> {
        if TypeReader::is_root(snapshot, relation_type.vertex())?
            || !TypeReader::get_relates(snapshot, relation_type.vertex()).is_empty()
        {
            Ok(None)
        } else {
            let relation_type = TypeReader::get_label(snapshot, relation_type.vertex())?.clone();
            Ok(Some(ValidationViolation::RelationTypeWithoutRoles { relation_type }))
        }
    }

    /// Below a non-root supertype, every role a relation type relates must be, or specialise, a role
    /// related further up; and every role its supertype relates must be related or specialised here.
    pub(crate) fn validate_relation_type_role_hierarchy(
        snapshot: &impl ReadableSnapshot,
        relation_type: RelationType,
    ) -> Result<Vec<ValidationViolation>, ConceptReadError> {
        let mut violations = Vec::new();
        let Some(supertype) = TypeReader::get_supertype(snapshot, relation_type.vertex()) else {
            return Ok(violations);
        };
        if TypeReader::is_root(snapshot, supertype)? {
            return Ok(violations);
        }

        let relates = TypeReader::get_relates(snapshot, relation_type.vertex());
        let mut inherited_relates: BTreeSet<TypeVertex> = BTreeSet::new();
        for ancestor in TypeReader::get_supertypes(snapshot, relation_type.vertex())? {
            if !TypeReader::is_root(snapshot, ancestor)? {
                inherited_relates.extend(TypeReader::get_relates(snapshot, ancestor));
            }
        }

        for role in &relates {
            let specialises_inherited = TypeReader::get_supertypes_and_self(snapshot, *role)?
                .iter()
                .any(|candidate| inherited_relates.contains(candidate));
            if !specialises_inherited {
                violations.push(ValidationViolation::RelationTypeRoleWithoutSuperRole {
                    role: TypeReader::get_label(snapshot, *role)?.clone(),
                    relation_type: TypeReader::get_label(snapshot, relation_type.vertex())?.clone(),
                    supertype: TypeReader::get_label(snapshot, supertype)?.clone(),
                });
            }
        }

        for super_role in TypeReader::get_relates(snapshot, supertype) {
            let specialised = relates.contains(&super_role)
                || TypeReader::get_subtypes_transitive(snapshot, super_role).iter().any(|role| relates.contains(role));
            if !specialised {
                violations.push(ValidationViolation::RelationTypeSuperRoleNotSpecialised {
                    role: TypeReader::get_label(snapshot, super_role)?.clone(),
                    supertype: TypeReader::get_label(snapshot, supertype)?.clone(),
                    relation_type: TypeReader::get_label(snapshot, relation_type.vertex())?.clone(),
                });
            }
        }
        Ok(violations)
    }

    /// Every label mentioned by either side of the rule must name an existing type.
    pub(crate) fn validate_rule_schema_elements_exist(
        snapshot: &impl ReadableSnapshot,
        rule: Rule,
    ) -> Result<Vec<ValidationViolation>, ConceptReadError> {
        let properties = snapshot.store().get_rule(rule.vertex())?;
        let rule_type = TypeReader::get_label(snapshot, properties.rule_type)?;
        let mut violations = Vec::new();
        for (side, pattern) in [(RuleSide::Hypothesis, &properties.lhs), (RuleSide::Conclusion, &properties.rhs)] {
            for label in pattern.labels() {
                if TypeReader::get_labelled_type(snapshot, label).is_none() {
                    violations.push(ValidationViolation::RuleReferencesMissingType {
                        side,
                        rule: rule.vertex(),
                        rule_type: rule_type.clone(),
                        label: label.clone(),
                    });
                }
            }
        }
        Ok(violations)
    }
}
