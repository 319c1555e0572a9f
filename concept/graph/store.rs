/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    error::ConceptReadError,
    graph::{Kind, RuleVertex, ThingVertex, TypeVertex},
    label::Label,
    rule::pattern::Pattern,
    thing::value::Value,
    type_::attribute_type::ValueType,
};

/// A bidirectional many-to-many edge set between two vertex spaces.
#[derive(Debug, Clone)]
pub(crate) struct EdgeIndex<From: Ord + Copy, To: Ord + Copy> {
    forward: BTreeMap<From, BTreeSet<To>>,
    reverse: BTreeMap<To, BTreeSet<From>>,
}

impl<From: Ord + Copy, To: Ord + Copy> EdgeIndex<From, To> {
    pub(crate) fn new() -> Self {
        Self { forward: BTreeMap::new(), reverse: BTreeMap::new() }
    }

    pub(crate) fn put(&mut self, from: From, to: To) -> bool {
        self.reverse.entry(to).or_default().insert(from);
        self.forward.entry(from).or_default().insert(to)
    }

    pub(crate) fn delete(&mut self, from: From, to: To) -> bool {
        let removed = Self::remove_from(&mut self.forward, from, to);
        Self::remove_from(&mut self.reverse, to, from);
        removed
    }

    pub(crate) fn contains(&self, from: From, to: To) -> bool {
        self.forward.get(&from).is_some_and(|targets| targets.contains(&to))
    }

    pub(crate) fn targets(&self, from: From) -> impl Iterator<Item = To> + '_ {
        self.forward.get(&from).into_iter().flatten().copied()
    }

    pub(crate) fn sources(&self, to: To) -> impl Iterator<Item = From> + '_ {
        self.reverse.get(&to).into_iter().flatten().copied()
    }

    pub(crate) fn has_targets(&self, from: From) -> bool {
        self.forward.get(&from).is_some_and(|targets| !targets.is_empty())
    }

    pub(crate) fn has_sources(&self, to: To) -> bool {
        self.reverse.get(&to).is_some_and(|sources| !sources.is_empty())
    }

    pub(crate) fn delete_all_from(&mut self, from: From) -> Vec<To> {
        let targets: Vec<To> = self.forward.remove(&from).into_iter().flatten().collect();
        for to in &targets {
            Self::remove_from(&mut self.reverse, *to, from);
        }
        targets
    }

    pub(crate) fn delete_all_to(&mut self, to: To) -> Vec<From> {
        let sources: Vec<From> = self.reverse.remove(&to).into_iter().flatten().collect();
        for from in &sources {
            Self::remove_from(&mut self.forward, *from, to);
        }
        sources
    }

    fn remove_from<K: Ord + Copy, V: Ord + Copy>(map: &mut BTreeMap<K, BTreeSet<V>>, key: K, value: V) -> bool {
        let Some(values) = map.get_mut(&key) else {
            return false;
        };
        let removed = values.remove(&value);
        if values.is_empty() {
            map.remove(&key);
        }
        removed
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TypeProperties {
    pub(crate) label: Label,
    pub(crate) kind: Kind,
    pub(crate) is_root: bool,
    pub(crate) is_abstract: bool,
    pub(crate) is_implicit: bool,
    pub(crate) value_type: Option<ValueType>,
}

#[derive(Debug, Clone)]
pub(crate) struct ThingProperties {
    pub(crate) type_: TypeVertex,
    pub(crate) kind: Kind,
    pub(crate) value: Option<Value>,
}

#[derive(Debug, Clone)]
pub(crate) struct RuleProperties {
    pub(crate) rule_type: TypeVertex,
    pub(crate) lhs: Pattern,
    pub(crate) rhs: Pattern,
    pub(crate) hypothesis_types: BTreeSet<TypeVertex>,
    pub(crate) conclusion_types: BTreeSet<TypeVertex>,
}

/// The in-memory concept graph: an arena of types, things and rules plus the edges between them.
///
/// Handles are plain indices into the arenas. Deleted slots are tombstoned and never reused, so a
/// stale handle reads as missing rather than aliasing a newer concept.
#[derive(Debug, Clone)]
pub struct ConceptStore {
    types: Vec<Option<TypeProperties>>,
    labels: HashMap<Label, TypeVertex>,
    // subtype -> supertype
    pub(crate) sub: EdgeIndex<TypeVertex, TypeVertex>,
    // relation type -> role type
    pub(crate) relates: EdgeIndex<TypeVertex, TypeVertex>,
    // player type -> role type
    pub(crate) plays: EdgeIndex<TypeVertex, TypeVertex>,
    pub(crate) plays_required: BTreeSet<(TypeVertex, TypeVertex)>,

    things: Vec<Option<ThingProperties>>,
    pub(crate) instances: EdgeIndex<TypeVertex, ThingVertex>,
    // relation -> player
    pub(crate) role_players: EdgeIndex<ThingVertex, ThingVertex>,
    // (relation, player) -> role, at most one casting per pair
    pub(crate) casting_roles: BTreeMap<(ThingVertex, ThingVertex), TypeVertex>,
    // role -> (relation, player)
    pub(crate) role_castings: EdgeIndex<TypeVertex, (ThingVertex, ThingVertex)>,
    attributes_by_value: HashMap<(TypeVertex, Value), ThingVertex>,

    rules: Vec<Option<RuleProperties>>,
    rules_by_pattern: HashMap<(TypeVertex, Pattern, Pattern), RuleVertex>,
    pub(crate) rule_instances: EdgeIndex<TypeVertex, RuleVertex>,
}

impl ConceptStore {
    pub fn new() -> Self {
        Self {
            types: Vec::new(),
            labels: HashMap::new(),
            sub: EdgeIndex::new(),
            relates: EdgeIndex::new(),
            plays: EdgeIndex::new(),
            plays_required: BTreeSet::new(),
            things: Vec::new(),
            instances: EdgeIndex::new(),
            role_players: EdgeIndex::new(),
            casting_roles: BTreeMap::new(),
            role_castings: EdgeIndex::new(),
            attributes_by_value: HashMap::new(),
            rules: Vec::new(),
            rules_by_pattern: HashMap::new(),
            rule_instances: EdgeIndex::new(),
        }
    }

    pub fn type_count(&self) -> usize {
        self.types.iter().flatten().count()
    }

    pub fn thing_count(&self) -> usize {
        self.things.iter().flatten().count()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.iter().flatten().count()
    }

    pub(crate) fn insert_type(&mut self, properties: TypeProperties) -> TypeVertex {
        let vertex = TypeVertex::new(self.types.len() as u32);
        self.labels.insert(properties.label.clone(), vertex);
        self.types.push(Some(properties));
        vertex
    }

    pub(crate) fn get_type(&self, vertex: TypeVertex) -> Result<&TypeProperties, ConceptReadError> {
        self.types
            .get(vertex.index())
            .and_then(Option::as_ref)
            .ok_or(ConceptReadError::CorruptMissingType { vertex })
    }

    pub(crate) fn get_type_mut(&mut self, vertex: TypeVertex) -> Result<&mut TypeProperties, ConceptReadError> {
        self.types
            .get_mut(vertex.index())
            .and_then(Option::as_mut)
            .ok_or(ConceptReadError::CorruptMissingType { vertex })
    }

    pub(crate) fn type_exists(&self, vertex: TypeVertex) -> bool {
        matches!(self.types.get(vertex.index()), Some(Some(_)))
    }

    pub(crate) fn type_by_label(&self, label: &Label) -> Option<TypeVertex> {
        self.labels.get(label).copied()
    }

    pub(crate) fn relabel_type(&mut self, vertex: TypeVertex, label: Label) -> Result<(), ConceptReadError> {
        let properties = self.types
            .get_mut(vertex.index())
            .and_then(Option::as_mut)
            .ok_or(ConceptReadError::CorruptMissingType { vertex })?;
        let previous = std::mem::replace(&mut properties.label, label.clone());
        self.labels.remove(&previous);
        self.labels.insert(label, vertex);
        Ok(())
    }

    pub(crate) fn remove_type(&mut self, vertex: TypeVertex) -> Option<TypeProperties> {
        let properties = self.types.get_mut(vertex.index()).and_then(Option::take)?;
        self.labels.remove(&properties.label);
        self.sub.delete_all_from(vertex);
        self.sub.delete_all_to(vertex);
        self.relates.delete_all_from(vertex);
        self.relates.delete_all_to(vertex);
        for role in self.plays.delete_all_from(vertex) {
            self.plays_required.remove(&(vertex, role));
        }
        for player in self.plays.delete_all_to(vertex) {
            self.plays_required.remove(&(player, vertex));
        }
        Some(properties)
    }

    pub(crate) fn type_vertices(&self) -> impl Iterator<Item = TypeVertex> + '_ {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, properties)| properties.is_some())
            .map(|(index, _)| TypeVertex::new(index as u32))
    }

    pub(crate) fn insert_thing(&mut self, properties: ThingProperties) -> ThingVertex {
        let vertex = ThingVertex::new(self.things.len() as u64);
        self.instances.put(properties.type_, vertex);
        if let Some(value) = &properties.value {
            self.attributes_by_value.insert((properties.type_, value.clone()), vertex);
        }
        self.things.push(Some(properties));
        vertex
    }

    pub(crate) fn get_thing(&self, vertex: ThingVertex) -> Result<&ThingProperties, ConceptReadError> {
        self.things
            .get(vertex.index())
            .and_then(Option::as_ref)
            .ok_or(ConceptReadError::CorruptMissingThing { vertex })
    }

    pub(crate) fn thing_exists(&self, vertex: ThingVertex) -> bool {
        matches!(self.things.get(vertex.index()), Some(Some(_)))
    }

    pub(crate) fn attribute_by_value(&self, attribute_type: TypeVertex, value: &Value) -> Option<ThingVertex> {
        self.attributes_by_value.get(&(attribute_type, value.clone())).copied()
    }

    /// Removes the thing together with every casting it takes part in, as relation or as player.
    /// Returns the vertices on the other side of each removed casting.
    pub(crate) fn remove_thing(&mut self, vertex: ThingVertex) -> Vec<ThingVertex> {
        let Some(properties) = self.things.get_mut(vertex.index()).and_then(Option::take) else {
            return Vec::new();
        };
        self.instances.delete(properties.type_, vertex);
        if let Some(value) = properties.value {
            self.attributes_by_value.remove(&(properties.type_, value));
        }
        let mut affected = Vec::new();
        for player in self.role_players.delete_all_from(vertex) {
            self.forget_casting_role(vertex, player);
            affected.push(player);
        }
        for relation in self.role_players.delete_all_to(vertex) {
            self.forget_casting_role(relation, vertex);
            affected.push(relation);
        }
        affected
    }

    pub(crate) fn put_casting(&mut self, relation: ThingVertex, player: ThingVertex, role: TypeVertex) {
        self.role_players.put(relation, player);
        if let Some(previous) = self.casting_roles.insert((relation, player), role) {
            self.role_castings.delete(previous, (relation, player));
        }
        self.role_castings.put(role, (relation, player));
    }

    pub(crate) fn remove_casting(&mut self, relation: ThingVertex, player: ThingVertex) -> Option<TypeVertex> {
        self.role_players.delete(relation, player);
        self.forget_casting_role(relation, player)
    }

    fn forget_casting_role(&mut self, relation: ThingVertex, player: ThingVertex) -> Option<TypeVertex> {
        let role = self.casting_roles.remove(&(relation, player))?;
        self.role_castings.delete(role, (relation, player));
        Some(role)
    }

    /// Every (relation, player) pair cast in exactly this role.
    pub(crate) fn castings_with_role(&self, role: TypeVertex) -> impl Iterator<Item = (ThingVertex, ThingVertex)> + '_ {
        self.role_castings.targets(role)
    }

    pub(crate) fn get_casting_role(&self, relation: ThingVertex, player: ThingVertex) -> Option<TypeVertex> {
        self.casting_roles.get(&(relation, player)).copied()
    }

    pub(crate) fn insert_rule(&mut self, properties: RuleProperties) -> RuleVertex {
        let vertex = RuleVertex::new(self.rules.len() as u64);
        self.rule_instances.put(properties.rule_type, vertex);
        self.rules_by_pattern
            .insert((properties.rule_type, properties.lhs.clone(), properties.rhs.clone()), vertex);
        self.rules.push(Some(properties));
        vertex
    }

    pub(crate) fn get_rule(&self, vertex: RuleVertex) -> Result<&RuleProperties, ConceptReadError> {
        self.rules
            .get(vertex.index())
            .and_then(Option::as_ref)
            .ok_or(ConceptReadError::CorruptMissingRule { vertex })
    }

    pub(crate) fn get_rule_mut(&mut self, vertex: RuleVertex) -> Result<&mut RuleProperties, ConceptReadError> {
        self.rules
            .get_mut(vertex.index())
            .and_then(Option::as_mut)
            .ok_or(ConceptReadError::CorruptMissingRule { vertex })
    }

    pub(crate) fn rule_exists(&self, vertex: RuleVertex) -> bool {
        matches!(self.rules.get(vertex.index()), Some(Some(_)))
    }

    pub(crate) fn rule_by_pattern(&self, rule_type: TypeVertex, lhs: &Pattern, rhs: &Pattern) -> Option<RuleVertex> {
        self.rules_by_pattern.get(&(rule_type, lhs.clone(), rhs.clone())).copied()
    }

    pub(crate) fn remove_rule(&mut self, vertex: RuleVertex) -> Option<RuleProperties> {
        let properties = self.rules.get_mut(vertex.index()).and_then(Option::take)?;
        self.rule_instances.delete(properties.rule_type, vertex);
        self.rules_by_pattern.remove(&(properties.rule_type, properties.lhs.clone(), properties.rhs.clone()));
        Some(properties)
    }

    pub(crate) fn rule_vertices(&self) -> impl Iterator<Item = RuleVertex> + '_ {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, properties)| properties.is_some())
            .map(|(index, _)| RuleVertex::new(index as u64))
    }
}

impl Default for ConceptStore {
    fn default() -> Self {
        Self::new()
    }
}
