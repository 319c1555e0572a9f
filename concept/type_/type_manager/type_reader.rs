/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{
    error::ConceptReadError,
    graph::{snapshot::ReadableSnapshot, Kind, RuleVertex, ThingVertex, TypeVertex},
    label::Label,
    type_::attribute_type::ValueType,
};

pub(crate) struct TypeReader {}

impl TypeReader {
    pub(crate) fn get_label(snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Result<&Label, ConceptReadError> {
        Ok(&snapshot.store().get_type(type_)?.label)
    }

    pub(crate) fn get_kind(snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Result<Kind, ConceptReadError> {
        Ok(snapshot.store().get_type(type_)?.kind)
    }

    pub(crate) fn is_root(snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Result<bool, ConceptReadError> {
        Ok(snapshot.store().get_type(type_)?.is_root)
    }

    pub(crate) fn is_abstract(snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Result<bool, ConceptReadError> {
        Ok(snapshot.store().get_type(type_)?.is_abstract)
    }

    pub(crate) fn is_implicit(snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Result<bool, ConceptReadError> {
        Ok(snapshot.store().get_type(type_)?.is_implicit)
    }

    pub(crate) fn get_value_type(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<Option<ValueType>, ConceptReadError> {
        Ok(snapshot.store().get_type(type_)?.value_type)
    }

    pub(crate) fn get_labelled_type(snapshot: &impl ReadableSnapshot, label: &Label) -> Option<TypeVertex> {
        snapshot.store().type_by_label(label)
    }

    pub(crate) fn get_root(snapshot: &impl ReadableSnapshot, kind: Kind) -> Result<TypeVertex, ConceptReadError> {
        snapshot
            .store()
            .type_by_label(&Label::build(kind.root_label()))
            .ok_or(ConceptReadError::CorruptMissingRootType { kind })
    }

    pub(crate) fn exists(snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> bool {
        snapshot.store().type_exists(type_)
    }

    pub(crate) fn get_supertype(snapshot: &impl ReadableSnapshot, subtype: TypeVertex) -> Option<TypeVertex> {
        snapshot.store().sub.targets(subtype).next()
    }

    /// Nearest first. A chain longer than the number of types can only be a cycle.
    pub(crate) fn get_supertypes(
        snapshot: &impl ReadableSnapshot,
        subtype: TypeVertex,
    ) -> Result<Vec<TypeVertex>, ConceptReadError> {
        let limit = snapshot.store().type_count();
        let mut supertypes = Vec::new();
        let mut current = subtype;
        while let Some(supertype) = Self::get_supertype(snapshot, current) {
            if supertype == subtype || supertypes.len() > limit {
                let label = Self::get_label(snapshot, subtype)?.clone();
                return Err(ConceptReadError::CorruptCyclicTypeHierarchy { label });
            }
            supertypes.push(supertype);
            current = supertype;
        }
        Ok(supertypes)
    }

    pub(crate) fn get_supertypes_and_self(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<Vec<TypeVertex>, ConceptReadError> {
        let mut types = vec![type_];
        types.extend(Self::get_supertypes(snapshot, type_)?);
        Ok(types)
    }

    pub(crate) fn is_same_or_subtype_of(
        snapshot: &impl ReadableSnapshot,
        subtype: TypeVertex,
        supertype: TypeVertex,
    ) -> Result<bool, ConceptReadError> {
        Ok(subtype == supertype || Self::get_supertypes(snapshot, subtype)?.contains(&supertype))
    }

    pub(crate) fn get_subtypes(snapshot: &impl ReadableSnapshot, supertype: TypeVertex) -> Vec<TypeVertex> {
        snapshot.store().sub.sources(supertype).collect()
    }

    /// Breadth first, excluding the type itself.
    pub(crate) fn get_subtypes_transitive(snapshot: &impl ReadableSnapshot, supertype: TypeVertex) -> Vec<TypeVertex> {
        let mut visited = BTreeSet::from([supertype]);
        let mut subtypes = Vec::new();
        let mut queue = VecDeque::from([supertype]);
        while let Some(type_) = queue.pop_front() {
            for subtype in snapshot.store().sub.sources(type_) {
                if visited.insert(subtype) {
                    subtypes.push(subtype);
                    queue.push_back(subtype);
                }
            }
        }
        subtypes
    }

    pub(crate) fn get_relates(snapshot: &impl ReadableSnapshot, relation_type: TypeVertex) -> BTreeSet<TypeVertex> {
        snapshot.store().relates.targets(relation_type).collect()
    }

    pub(crate) fn get_relating(snapshot: &impl ReadableSnapshot, role_type: TypeVertex) -> BTreeSet<TypeVertex> {
        snapshot.store().relates.sources(role_type).collect()
    }

    pub(crate) fn get_plays_declared(snapshot: &impl ReadableSnapshot, player: TypeVertex) -> BTreeSet<TypeVertex> {
        snapshot.store().plays.targets(player).collect()
    }

    /// Roles played by the type or any supertype. A role is required if any declaring type requires it.
    pub(crate) fn get_plays(
        snapshot: &impl ReadableSnapshot,
        player: TypeVertex,
    ) -> Result<BTreeMap<TypeVertex, bool>, ConceptReadError> {
        let mut plays: BTreeMap<TypeVertex, bool> = BTreeMap::new();
        for type_ in Self::get_supertypes_and_self(snapshot, player)? {
            for role in snapshot.store().plays.targets(type_) {
                *plays.entry(role).or_default() |= Self::is_plays_required(snapshot, type_, role);
            }
        }
        Ok(plays)
    }

    pub(crate) fn plays_declared(snapshot: &impl ReadableSnapshot, player: TypeVertex, role_type: TypeVertex) -> bool {
        snapshot.store().plays.contains(player, role_type)
    }

    pub(crate) fn is_plays_required(
        snapshot: &impl ReadableSnapshot,
        player: TypeVertex,
        role_type: TypeVertex,
    ) -> bool {
        snapshot.store().plays_required.contains(&(player, role_type))
    }

    pub(crate) fn get_players(snapshot: &impl ReadableSnapshot, role_type: TypeVertex) -> BTreeSet<TypeVertex> {
        snapshot.store().plays.sources(role_type).collect()
    }

    pub(crate) fn get_instances(snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Vec<ThingVertex> {
        snapshot.store().instances.targets(type_).collect()
    }

    // A role counts as instantiated while any casting uses it.
    pub(crate) fn has_instances(snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> bool {
        snapshot.store().instances.has_targets(type_)
            || snapshot.store().rule_instances.has_targets(type_)
            || snapshot.store().role_castings.has_targets(type_)
    }

    pub(crate) fn get_instances_transitive(snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Vec<ThingVertex> {
        let mut instances = Self::get_instances(snapshot, type_);
        for subtype in Self::get_subtypes_transitive(snapshot, type_) {
            instances.extend(snapshot.store().instances.targets(subtype));
        }
        instances
    }

    pub(crate) fn get_rule_instances(snapshot: &impl ReadableSnapshot, rule_type: TypeVertex) -> Vec<RuleVertex> {
        snapshot.store().rule_instances.targets(rule_type).collect()
    }

    pub(crate) fn get_rules_referencing(
        snapshot: &impl ReadableSnapshot,
        label: &Label,
    ) -> Result<Vec<RuleVertex>, ConceptReadError> {
        let store = snapshot.store();
        let mut referencing = Vec::new();
        for rule in store.rule_vertices() {
            let properties = store.get_rule(rule)?;
            if properties.lhs.references(label) || properties.rhs.references(label) {
                referencing.push(rule);
            }
        }
        Ok(referencing)
    }
}
