/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use tracing::{event, Level};

use crate::{
    error::{ConceptReadError, ConceptWriteError},
    graph::{
        snapshot::{ReadableSnapshot, WritableSnapshot},
        store::{RuleProperties, ThingProperties},
        Kind, ThingVertex, TypeVertex,
    },
    rule::{pattern::Pattern, Rule, RuleSide},
    thing::{
        attribute::Attribute,
        casting::Casting,
        entity::Entity,
        relation::Relation,
        thing_manager::validation::{operation_time_validation::OperationTimeValidation, DataValidationError},
        value::Value,
        Thing, ThingAPI,
    },
    type_::{
        attribute_type::AttributeType, entity_type::EntityType, implicit::{ImplicitHas, ImplicitLabels}, relation_type::RelationType,
        role_type::RoleType, rule_type::RuleType, type_manager::type_reader::TypeReader, type_manager::TypeManager,
        ThingType, TypeAPI,
    },
};

pub mod validation;

/// Reads and writes instance data (entities, relations, attributes, castings and rules) in a snapshot.
#[derive(Debug)]
pub struct ThingManager {
    type_manager: Arc<TypeManager>,
}

impl ThingManager {
    pub fn new(type_manager: Arc<TypeManager>) -> Self {
        Self { type_manager }
    }

    pub fn type_manager(&self) -> &TypeManager {
        &self.type_manager
    }

    pub(crate) fn get_thing_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing: Thing,
    ) -> Result<ThingType, ConceptReadError> {
        let type_ = snapshot.store().get_thing(thing.vertex())?.type_;
        let kind = TypeReader::get_kind(snapshot, type_)?;
        match ThingType::from_vertex(type_, kind) {
            Some(thing_type) => Ok(thing_type),
            None => Err(ConceptReadError::CorruptTypeKindMismatch {
                label: TypeReader::get_label(snapshot, type_)?.clone(),
                expected: thing.kind(),
                actual: kind,
            }),
        }
    }

    fn get_instances_in<T>(
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
        constructor: fn(ThingVertex) -> T,
    ) -> Vec<T> {
        TypeReader::get_instances_transitive(snapshot, type_).into_iter().map(constructor).collect()
    }

    /// Instances of the type and of all its subtypes.
    pub fn get_entities_in(
        &self,
        snapshot: &impl ReadableSnapshot,
        entity_type: EntityType,
    ) -> Result<Vec<Entity>, ConceptReadError> {
        Ok(Self::get_instances_in(snapshot, entity_type.vertex(), Entity::new))
    }

    pub fn get_relations_in(
        &self,
        snapshot: &impl ReadableSnapshot,
        relation_type: RelationType,
    ) -> Result<Vec<Relation>, ConceptReadError> {
        Ok(Self::get_instances_in(snapshot, relation_type.vertex(), Relation::new))
    }

    pub fn get_attributes_in(
        &self,
        snapshot: &impl ReadableSnapshot,
        attribute_type: AttributeType,
    ) -> Result<Vec<Attribute>, ConceptReadError> {
        Ok(Self::get_instances_in(snapshot, attribute_type.vertex(), Attribute::new))
    }

    pub fn get_rules_in(
        &self,
        snapshot: &impl ReadableSnapshot,
        rule_type: RuleType,
    ) -> Result<Vec<Rule>, ConceptReadError> {
        let mut rule_types = vec![rule_type.vertex()];
        rule_types.extend(TypeReader::get_subtypes_transitive(snapshot, rule_type.vertex()));
        Ok(rule_types
            .into_iter()
            .flat_map(|rule_type| TypeReader::get_rule_instances(snapshot, rule_type))
            .map(Rule::new)
            .collect())
    }

    pub fn get_attribute_with_value(
        &self,
        snapshot: &impl ReadableSnapshot,
        attribute_type: AttributeType,
        value: &Value,
    ) -> Result<Option<Attribute>, ConceptReadError> {
        Ok(snapshot.store().attribute_by_value(attribute_type.vertex(), value).map(Attribute::new))
    }

    pub(crate) fn get_attribute_value<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        attribute: Attribute,
    ) -> Result<&'s Value, ConceptReadError> {
        snapshot
            .store()
            .get_thing(attribute.vertex())?
            .value
            .as_ref()
            .ok_or(ConceptReadError::CorruptMissingAttributeValue { attribute: attribute.vertex() })
    }

    fn thing_at(snapshot: &impl ReadableSnapshot, vertex: ThingVertex) -> Result<Thing, ConceptReadError> {
        let properties = snapshot.store().get_thing(vertex)?;
        Thing::from_vertex(vertex, properties.kind).ok_or(ConceptReadError::CorruptMissingThing { vertex })
    }

    fn casting_at(
        snapshot: &impl ReadableSnapshot,
        relation: ThingVertex,
        player: ThingVertex,
    ) -> Result<Casting, ConceptReadError> {
        let role = snapshot
            .store()
            .get_casting_role(relation, player)
            .ok_or(ConceptReadError::CorruptMissingCastingRole { relation, player })?;
        Ok(Casting::new(Relation::new(relation), RoleType::new(role), Self::thing_at(snapshot, player)?))
    }

    pub(crate) fn get_castings_by_relation(
        &self,
        snapshot: &impl ReadableSnapshot,
        relation: Relation,
    ) -> Result<Vec<Casting>, ConceptReadError> {
        snapshot
            .store()
            .role_players
            .targets(relation.vertex())
            .map(|player| Self::casting_at(snapshot, relation.vertex(), player))
            .collect()
    }

    pub(crate) fn get_castings_by_player(
        &self,
        snapshot: &impl ReadableSnapshot,
        player: Thing,
    ) -> Result<Vec<Casting>, ConceptReadError> {
        snapshot
            .store()
            .role_players
            .sources(player.vertex())
            .map(|relation| Self::casting_at(snapshot, relation, player.vertex()))
            .collect()
    }

    pub(crate) fn get_role_players(
        &self,
        snapshot: &impl ReadableSnapshot,
        relation: Relation,
    ) -> Result<BTreeMap<RoleType, BTreeSet<Thing>>, ConceptReadError> {
        let mut role_players: BTreeMap<RoleType, BTreeSet<Thing>> = BTreeMap::new();
        for casting in self.get_castings_by_relation(snapshot, relation)? {
            role_players.entry(casting.role()).or_default().insert(casting.player());
        }
        Ok(role_players)
    }

    /// Attributes owned through implicit relations in which `owner` plays the owner role.
    pub(crate) fn get_has(&self, snapshot: &impl ReadableSnapshot, owner: Thing) -> Result<Vec<Attribute>, ConceptReadError> {
        let mut attributes = BTreeSet::new();
        for (casting, other) in self.get_implicit_counterparts(snapshot, owner)? {
            if let Thing::Attribute(attribute) = other.player() {
                if Self::is_value_casting(snapshot, other)? && !Self::is_value_casting(snapshot, casting)? {
                    attributes.insert(attribute);
                }
            }
        }
        Ok(attributes.into_iter().collect())
    }

    pub(crate) fn get_owners(
        &self,
        snapshot: &impl ReadableSnapshot,
        attribute: Attribute,
    ) -> Result<Vec<Thing>, ConceptReadError> {
        let mut owners = BTreeSet::new();
        for (casting, other) in self.get_implicit_counterparts(snapshot, attribute.into_thing())? {
            if Self::is_value_casting(snapshot, casting)? && !Self::is_value_casting(snapshot, other)? {
                owners.insert(other.player());
            }
        }
        Ok(owners.into_iter().collect())
    }

    // Pairs of (casting of `thing`, other casting in the same relation) for relations of implicit type.
    fn get_implicit_counterparts(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing: Thing,
    ) -> Result<Vec<(Casting, Casting)>, ConceptReadError> {
        let mut counterparts = Vec::new();
        for casting in self.get_castings_by_player(snapshot, thing)? {
            let relation_type = snapshot.store().get_thing(casting.relation().vertex())?.type_;
            if !TypeReader::is_implicit(snapshot, relation_type)? {
                continue;
            }
            for other in self.get_castings_by_relation(snapshot, casting.relation())? {
                if other.player() != thing {
                    counterparts.push((casting, other));
                }
            }
        }
        Ok(counterparts)
    }

    fn is_value_casting(snapshot: &impl ReadableSnapshot, casting: Casting) -> Result<bool, ConceptReadError> {
        let relation_type = snapshot.store().get_thing(casting.relation().vertex())?.type_;
        let relation_label = TypeReader::get_label(snapshot, relation_type)?;
        let role_label = TypeReader::get_label(snapshot, casting.role().vertex())?;
        Ok(ImplicitLabels::is_value_role(relation_label, role_label))
    }

    pub(crate) fn get_rule_type(&self, snapshot: &impl ReadableSnapshot, rule: Rule) -> Result<RuleType, ConceptReadError> {
        Ok(RuleType::new(snapshot.store().get_rule(rule.vertex())?.rule_type))
    }

    pub(crate) fn get_rule_pattern<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        rule: Rule,
        side: RuleSide,
    ) -> Result<&'s Pattern, ConceptReadError> {
        let properties = snapshot.store().get_rule(rule.vertex())?;
        match side {
            RuleSide::Hypothesis => Ok(&properties.lhs),
            RuleSide::Conclusion => Ok(&properties.rhs),
        }
    }

    pub(crate) fn get_rule_types<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        rule: Rule,
        side: RuleSide,
    ) -> Result<&'s BTreeSet<TypeVertex>, ConceptReadError> {
        let properties = snapshot.store().get_rule(rule.vertex())?;
        match side {
            RuleSide::Hypothesis => Ok(&properties.hypothesis_types),
            RuleSide::Conclusion => Ok(&properties.conclusion_types),
        }
    }

    pub fn create_entity(
        &self,
        snapshot: &mut impl WritableSnapshot,
        entity_type: EntityType,
    ) -> Result<Entity, ConceptWriteError> {
        OperationTimeValidation::validate_type_instantiable(snapshot, entity_type.vertex())?;
        let vertex = Self::put_thing(snapshot, entity_type.vertex(), Kind::Entity, None);
        let entity = Entity::new(vertex);
        snapshot.record_change(entity);
        Ok(entity)
    }

    pub fn create_relation(
        &self,
        snapshot: &mut impl WritableSnapshot,
        relation_type: RelationType,
    ) -> Result<Relation, ConceptWriteError> {
        OperationTimeValidation::validate_type_instantiable(snapshot, relation_type.vertex())?;
        Ok(Self::put_relation(snapshot, relation_type))
    }

    /// Attributes are unique per type and value: putting an existing value returns the existing attribute.
    pub fn put_attribute(
        &self,
        snapshot: &mut impl WritableSnapshot,
        attribute_type: AttributeType,
        value: impl Into<Value>,
    ) -> Result<Attribute, ConceptWriteError> {
        let value = value.into();
        OperationTimeValidation::validate_type_instantiable(snapshot, attribute_type.vertex())?;
        OperationTimeValidation::validate_value_type(snapshot, attribute_type.vertex(), &value)?;
        if let Some(existing) = self.get_attribute_with_value(snapshot, attribute_type, &value)? {
            return Ok(existing);
        }
        let vertex = Self::put_thing(snapshot, attribute_type.vertex(), Kind::Attribute, Some(value));
        let attribute = Attribute::new(vertex);
        snapshot.record_change(attribute);
        Ok(attribute)
    }

    fn put_thing(
        snapshot: &mut impl WritableSnapshot,
        type_: TypeVertex,
        kind: Kind,
        value: Option<Value>,
    ) -> ThingVertex {
        let vertex = snapshot.store_mut().insert_thing(ThingProperties { type_, kind, value });
        event!(Level::TRACE, "Created {} instance {} of {}", kind, vertex, type_);
        vertex
    }

    fn put_relation(snapshot: &mut impl WritableSnapshot, relation_type: RelationType) -> Relation {
        let relation = Relation::new(Self::put_thing(snapshot, relation_type.vertex(), Kind::Relation, None));
        snapshot.record_change(relation);
        relation
    }

    pub(crate) fn add_player(
        &self,
        snapshot: &mut impl WritableSnapshot,
        relation: Relation,
        role_type: RoleType,
        player: Thing,
    ) -> Result<Casting, ConceptWriteError> {
        OperationTimeValidation::validate_thing_exists(snapshot, relation.vertex())?;
        OperationTimeValidation::validate_thing_exists(snapshot, player.vertex())?;
        OperationTimeValidation::validate_type_exists(snapshot, role_type.vertex())?;
        OperationTimeValidation::validate_role_not_implicit(snapshot, role_type.vertex())?;
        Self::put_casting(snapshot, relation, role_type, player)
    }

    fn put_casting(
        snapshot: &mut impl WritableSnapshot,
        relation: Relation,
        role_type: RoleType,
        player: Thing,
    ) -> Result<Casting, ConceptWriteError> {
        let casting = Casting::new(relation, role_type, player);
        if OperationTimeValidation::validate_player_not_cast_in_relation(
            snapshot,
            relation.vertex(),
            player.vertex(),
            role_type.vertex(),
        )? {
            return Ok(casting);
        }
        snapshot.store_mut().put_casting(relation.vertex(), player.vertex(), role_type.vertex());
        snapshot.record_change(casting);
        snapshot.record_change(relation);
        snapshot.record_change(player);
        Ok(casting)
    }

    pub(crate) fn remove_player(
        &self,
        snapshot: &mut impl WritableSnapshot,
        relation: Relation,
        role_type: RoleType,
        player: Thing,
    ) -> Result<(), ConceptWriteError> {
        OperationTimeValidation::validate_thing_exists(snapshot, relation.vertex())?;
        OperationTimeValidation::validate_role_not_implicit(snapshot, role_type.vertex())?;
        if snapshot.store().get_casting_role(relation.vertex(), player.vertex()) == Some(role_type.vertex()) {
            snapshot.store_mut().remove_casting(relation.vertex(), player.vertex());
            snapshot.record_change(relation);
            snapshot.record_change(player);
        }
        Ok(())
    }

    /// Links `owner` to `attribute` through a relation of the implicit has or key type the owner's
    /// type declares for the attribute's type or one of its supertypes. Idempotent.
    pub(crate) fn set_has(
        &self,
        snapshot: &mut impl WritableSnapshot,
        owner: Thing,
        attribute: Attribute,
    ) -> Result<Relation, ConceptWriteError> {
        OperationTimeValidation::validate_thing_exists(snapshot, owner.vertex())?;
        OperationTimeValidation::validate_thing_exists(snapshot, attribute.vertex())?;
        let owner_type = self.get_thing_type(snapshot, owner)?;
        let attribute_type = AttributeType::new(snapshot.store().get_thing(attribute.vertex())?.type_);
        let Some(implicit_has) = self.resolve_implicit_has(snapshot, owner_type, attribute_type)? else {
            return Err(DataValidationError::HasNotPermitted {
                owner_type: TypeReader::get_label(snapshot, owner_type.vertex())?.clone(),
                attribute_type: TypeReader::get_label(snapshot, attribute_type.vertex())?.clone(),
            }
            .into());
        };
        if let Some(existing) = Self::find_has_relation(snapshot, owner, attribute, implicit_has) {
            return Ok(existing);
        }

        let relation = Self::put_relation(snapshot, implicit_has.relation_type());
        Self::put_casting(snapshot, relation, implicit_has.owner_role(), owner)?;
        Self::put_casting(snapshot, relation, implicit_has.value_role(), attribute.into_thing())?;
        Ok(relation)
    }

    pub(crate) fn unset_has(
        &self,
        snapshot: &mut impl WritableSnapshot,
        owner: Thing,
        attribute: Attribute,
    ) -> Result<(), ConceptWriteError> {
        let owner_type = self.get_thing_type(snapshot, owner)?;
        let attribute_type = AttributeType::new(snapshot.store().get_thing(attribute.vertex())?.type_);
        if let Some(implicit_has) = self.resolve_implicit_has(snapshot, owner_type, attribute_type)? {
            if let Some(relation) = Self::find_has_relation(snapshot, owner, attribute, implicit_has) {
                self.delete_thing(snapshot, relation.into_thing())?;
            }
        }
        Ok(())
    }

    fn resolve_implicit_has(
        &self,
        snapshot: &impl ReadableSnapshot,
        owner_type: ThingType,
        attribute_type: AttributeType,
    ) -> Result<Option<ImplicitHas>, ConceptReadError> {
        let owner_plays = TypeReader::get_plays(snapshot, owner_type.vertex())?;
        for candidate in TypeReader::get_supertypes_and_self(snapshot, attribute_type.vertex())? {
            if TypeReader::is_root(snapshot, candidate)? {
                continue;
            }
            for required in [true, false] {
                let implicit_has = self.type_manager.get_implicit_has(snapshot, AttributeType::new(candidate), required)?;
                if let Some(implicit_has) = implicit_has {
                    if owner_plays.contains_key(&implicit_has.owner_role().vertex()) {
                        return Ok(Some(implicit_has));
                    }
                }
            }
        }
        Ok(None)
    }

    fn find_has_relation(
        snapshot: &impl ReadableSnapshot,
        owner: Thing,
        attribute: Attribute,
        implicit_has: ImplicitHas,
    ) -> Option<Relation> {
        let store = snapshot.store();
        store
            .role_players
            .sources(owner.vertex())
            .find(|relation| {
                store.get_casting_role(*relation, owner.vertex()) == Some(implicit_has.owner_role().vertex())
                    && store.get_casting_role(*relation, attribute.vertex()) == Some(implicit_has.value_role().vertex())
            })
            .map(Relation::new)
    }

    /// Deletes the thing and its castings. Implicit has relations it took part in are deleted with it.
    pub(crate) fn delete_thing(&self, snapshot: &mut impl WritableSnapshot, thing: Thing) -> Result<(), ConceptWriteError> {
        OperationTimeValidation::validate_thing_exists(snapshot, thing.vertex())?;
        let affected = snapshot.store_mut().remove_thing(thing.vertex());
        event!(Level::TRACE, "Deleted {} instance {}", thing.kind(), thing.vertex());
        for vertex in affected {
            if !snapshot.store().thing_exists(vertex) {
                continue;
            }
            let other = Self::thing_at(snapshot, vertex)?;
            let other_type = snapshot.store().get_thing(vertex)?.type_;
            if other.kind() == Kind::Relation && TypeReader::is_implicit(snapshot, other_type)? {
                self.delete_thing(snapshot, other)?;
            } else {
                snapshot.record_change(other);
            }
        }
        Ok(())
    }

    /// Rules are unique per type and pattern pair: putting an existing rule returns it.
    pub fn put_rule(
        &self,
        snapshot: &mut impl WritableSnapshot,
        rule_type: RuleType,
        lhs: Pattern,
        rhs: Pattern,
    ) -> Result<Rule, ConceptWriteError> {
        OperationTimeValidation::validate_type_instantiable(snapshot, rule_type.vertex())?;
        OperationTimeValidation::validate_rule_patterns(snapshot, rule_type.vertex(), &lhs, &rhs)?;
        if let Some(existing) = snapshot.store().rule_by_pattern(rule_type.vertex(), &lhs, &rhs) {
            return Ok(Rule::new(existing));
        }
        let vertex = snapshot.store_mut().insert_rule(RuleProperties {
            rule_type: rule_type.vertex(),
            lhs,
            rhs,
            hypothesis_types: BTreeSet::new(),
            conclusion_types: BTreeSet::new(),
        });
        let rule = Rule::new(vertex);
        snapshot.record_change(rule);
        event!(Level::DEBUG, "Created rule {} of {}", vertex, rule_type.vertex());
        Ok(rule)
    }

    pub fn delete_rule(&self, snapshot: &mut impl WritableSnapshot, rule: Rule) -> Result<(), ConceptWriteError> {
        match snapshot.store_mut().remove_rule(rule.vertex()) {
            Some(_) => Ok(()),
            None => Err(ConceptReadError::CorruptMissingRule { vertex: rule.vertex() }.into()),
        }
    }

    /// Pre-commit cleanup: relations left without role players are deleted, repeatedly, since deleting
    /// one relation may empty another it played in.
    pub fn finalise(&self, snapshot: &mut impl WritableSnapshot) -> Result<(), ConceptWriteError> {
        loop {
            let empty_relations: Vec<Relation> = snapshot
                .changes()
                .modified_relations()
                .filter(|relation| !relation.is_deleted(&*snapshot) && !relation.has_players(&*snapshot))
                .collect();
            if empty_relations.is_empty() {
                return Ok(());
            }
            for relation in empty_relations {
                event!(Level::TRACE, "Deleting relation {} as it has no role players", relation.vertex());
                self.delete_thing(snapshot, relation.into_thing())?;
            }
        }
    }

    /// Resolves and caches the types each modified rule's hypothesis and conclusion mention.
    pub fn compute_rule_types(&self, snapshot: &mut impl WritableSnapshot) -> Result<(), ConceptReadError> {
        let rules: Vec<Rule> = snapshot.changes().modified_rules().filter(|rule| !rule.is_deleted(&*snapshot)).collect();
        for rule in rules {
            let properties = snapshot.store().get_rule(rule.vertex())?;
            let hypothesis_types = Self::resolve_pattern_types(snapshot, &properties.lhs)?;
            let conclusion_types = Self::resolve_pattern_types(snapshot, &properties.rhs)?;
            let properties = snapshot.store_mut().get_rule_mut(rule.vertex())?;
            properties.hypothesis_types = hypothesis_types;
            properties.conclusion_types = conclusion_types;
        }
        Ok(())
    }

    fn resolve_pattern_types(
        snapshot: &impl ReadableSnapshot,
        pattern: &Pattern,
    ) -> Result<BTreeSet<TypeVertex>, ConceptReadError> {
        let mut types = BTreeSet::new();
        for label in pattern.labels() {
            if let Some(type_) = TypeReader::get_labelled_type(snapshot, label) {
                if TypeReader::get_kind(snapshot, type_)? != Kind::Role {
                    types.insert(type_);
                }
            }
        }
        Ok(types)
    }
}
