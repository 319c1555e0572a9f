/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{
    error::ConceptReadError,
    graph::{snapshot::ReadableSnapshot, ThingVertex, TypeVertex},
    thing::{casting::Casting, relation::Relation, Thing, ThingAPI},
    type_::{type_manager::type_reader::TypeReader, TypeAPI},
    validation::{RolePlayerList, ValidationViolation},
};

pub(crate) struct CommitTimeValidation {}

impl CommitTimeValidation {
    /// Every role the thing's type (or a supertype) plays as required must be played exactly once,
    /// counting castings in the role itself or in any of its subroles.
    pub(crate) fn validate_thing_plays_required_roles(
        snapshot: &impl ReadableSnapshot,
        thing: Thing,
    ) -> Result<Vec<ValidationViolation>, ConceptReadError> {
        let store = snapshot.store();
        let thing_type = store.get_thing(thing.vertex())?.type_;
        let played_roles: Vec<TypeVertex> = store
            .role_players
            .sources(thing.vertex())
            .filter_map(|relation| store.get_casting_role(relation, thing.vertex()))
            .collect();

        let mut violations = Vec::new();
        for (role, required) in TypeReader::get_plays(snapshot, thing_type)? {
            if !required {
                continue;
            }
            let mut count = 0;
            for played in &played_roles {
                if TypeReader::is_same_or_subtype_of(snapshot, *played, role)? {
                    count += 1;
                }
            }
            if count != 1 {
                violations.push(ValidationViolation::RequiredRoleNotPlayedExactlyOnce {
                    thing: thing.vertex(),
                    thing_type: TypeReader::get_label(snapshot, thing_type)?.clone(),
                    role: TypeReader::get_label(snapshot, role)?.clone(),
                    count,
                });
            }
        }
        Ok(violations)
    }

    /// The player's type, or one of its supertypes, must declare that it plays the casting's exact role.
    pub(crate) fn validate_casting_plays_structure(
        snapshot: &impl ReadableSnapshot,
        casting: Casting,
    ) -> Result<Option<ValidationViolation>, ConceptReadError> {
        let player_type = snapshot.store().get_thing(casting.player().vertex())?.type_;
        for type_ in TypeReader::get_supertypes_and_self(snapshot, player_type)? {
            if TypeReader::plays_declared(snapshot, type_, casting.role().vertex()) {
                return Ok(None);
            }
        }
        Ok(Some(ValidationViolation::CastingPlayerCannotPlayRole {
            player: casting.player().vertex(),
            player_type: TypeReader::get_label(snapshot, player_type)?.clone(),
            role: TypeReader::get_label(snapshot, casting.role().vertex())?.clone(),
            relation: casting.relation().vertex(),
        }))
    }

    /// Played roles are mapped to the first of themselves or their supertypes that the relation's type
    /// relates. More distinct mapped roles than the type relates is a violation.
    pub(crate) fn validate_relation_cardinality(
        snapshot: &impl ReadableSnapshot,
        relation: Relation,
    ) -> Result<Option<ValidationViolation>, ConceptReadError> {
        let relation_type = snapshot.store().get_thing(relation.vertex())?.type_;
        let relates = TypeReader::get_relates(snapshot, relation_type);
        let mut mapped_roles: BTreeSet<TypeVertex> = BTreeSet::new();
        for role in Self::played_roles(snapshot, relation) {
            let mapped = TypeReader::get_supertypes_and_self(snapshot, role)?
                .into_iter()
                .find(|candidate| relates.contains(candidate))
                .unwrap_or(role);
            mapped_roles.insert(mapped);
        }

        if mapped_roles.len() > relates.len() {
            Ok(Some(ValidationViolation::RelationHasMoreRolesThanType {
                relation: relation.vertex(),
                relation_type: TypeReader::get_label(snapshot, relation_type)?.clone(),
                role_count: mapped_roles.len(),
                relates_count: relates.len(),
            }))
        } else {
            Ok(None)
        }
    }

    /// Each played role, or one of its supertypes, must be related by the relation's type or one of its
    /// supertypes.
    pub(crate) fn validate_relation_roles_are_related(
        snapshot: &impl ReadableSnapshot,
        relation: Relation,
    ) -> Result<Vec<ValidationViolation>, ConceptReadError> {
        let relation_type = snapshot.store().get_thing(relation.vertex())?.type_;
        let mut related_roles: BTreeSet<TypeVertex> = BTreeSet::new();
        for type_ in TypeReader::get_supertypes_and_self(snapshot, relation_type)? {
            related_roles.extend(TypeReader::get_relates(snapshot, type_));
        }

        let mut violations = Vec::new();
        for role in Self::played_roles(snapshot, relation) {
            let role_ancestry = TypeReader::get_supertypes_and_self(snapshot, role)?;
            if !role_ancestry.iter().any(|candidate| related_roles.contains(candidate)) {
                violations.push(ValidationViolation::RelationRoleNotRelatedByType {
                    relation: relation.vertex(),
                    role: TypeReader::get_label(snapshot, role)?.clone(),
                    relation_type: TypeReader::get_label(snapshot, relation_type)?.clone(),
                });
            }
        }
        Ok(violations)
    }

    /// No two relations of the same type may have identical role-player structures.
    pub(crate) fn validate_relation_is_unique(
        snapshot: &impl ReadableSnapshot,
        relation: Relation,
    ) -> Result<Option<ValidationViolation>, ConceptReadError> {
        let store = snapshot.store();
        let relation_type = store.get_thing(relation.vertex())?.type_;
        let structure = Self::role_player_structure(snapshot, relation.vertex());
        let Some((_, first_player)) = structure.iter().next() else {
            return Ok(None);
        };

        let candidates: BTreeSet<ThingVertex> = store
            .role_players
            .sources(*first_player)
            .filter(|candidate| *candidate != relation.vertex())
            .collect();
        for candidate in candidates {
            if store.get_thing(candidate)?.type_ != relation_type {
                continue;
            }
            if Self::role_player_structure(snapshot, candidate) == structure {
                let mut role_players = Vec::with_capacity(structure.len());
                for (role, player) in &structure {
                    role_players.push((TypeReader::get_label(snapshot, *role)?.clone(), *player));
                }
                return Ok(Some(ValidationViolation::DuplicateRelation {
                    relation: relation.vertex(),
                    duplicate: candidate,
                    relation_type: TypeReader::get_label(snapshot, relation_type)?.clone(),
                    role_players: RolePlayerList(role_players),
                }));
            }
        }
        Ok(None)
    }

    fn played_roles(snapshot: &impl ReadableSnapshot, relation: Relation) -> BTreeSet<TypeVertex> {
        let store = snapshot.store();
        store
            .role_players
            .targets(relation.vertex())
            .filter_map(|player| store.get_casting_role(relation.vertex(), player))
            .collect()
    }

    // Sorted (role, player) pairs, so that equal structures compare equal.
    fn role_player_structure(snapshot: &impl ReadableSnapshot, relation: ThingVertex) -> Vec<(TypeVertex, ThingVertex)> {
        let store = snapshot.store();
        store
            .role_players
            .targets(relation)
            .filter_map(|player| store.get_casting_role(relation, player).map(|role| (role, player)))
            .sorted()
            .collect()
    }
}
