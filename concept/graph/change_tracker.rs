/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::BTreeSet, fmt};

use crate::{
    rule::Rule,
    thing::{attribute::Attribute, casting::Casting, entity::Entity, relation::Relation, Thing},
    type_::{relation_type::RelationType, role_type::RoleType},
};

/// The groups of modified concepts that commit-time validation inspects, in validation order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ConceptCategory {
    Entity,
    Attribute,
    RoleType,
    Casting,
    RelationType,
    Relation,
    Rule,
}

impl ConceptCategory {
    pub const VALIDATION_ORDER: [ConceptCategory; 7] = [
        ConceptCategory::Entity,
        ConceptCategory::Attribute,
        ConceptCategory::RoleType,
        ConceptCategory::Casting,
        ConceptCategory::RelationType,
        ConceptCategory::Relation,
        ConceptCategory::Rule,
    ];
}

impl fmt::Display for ConceptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConceptCategory::Entity => "entity",
            ConceptCategory::Attribute => "attribute",
            ConceptCategory::RoleType => "role type",
            ConceptCategory::Casting => "casting",
            ConceptCategory::RelationType => "relation type",
            ConceptCategory::Relation => "relation",
            ConceptCategory::Rule => "rule",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Concept {
    Entity(Entity),
    Attribute(Attribute),
    RoleType(RoleType),
    Casting(Casting),
    RelationType(RelationType),
    Relation(Relation),
    Rule(Rule),
}

impl Concept {
    pub fn category(&self) -> ConceptCategory {
        match self {
            Concept::Entity(_) => ConceptCategory::Entity,
            Concept::Attribute(_) => ConceptCategory::Attribute,
            Concept::RoleType(_) => ConceptCategory::RoleType,
            Concept::Casting(_) => ConceptCategory::Casting,
            Concept::RelationType(_) => ConceptCategory::RelationType,
            Concept::Relation(_) => ConceptCategory::Relation,
            Concept::Rule(_) => ConceptCategory::Rule,
        }
    }
}

macro_rules! concept_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Concept {
                fn from(concept: $variant) -> Self {
                    Concept::$variant(concept)
                }
            }
        )*
    };
}
concept_from!(Entity, Attribute, RoleType, Casting, RelationType, Relation, Rule);

impl From<Thing> for Concept {
    fn from(thing: Thing) -> Self {
        match thing {
            Thing::Entity(entity) => Concept::Entity(entity),
            Thing::Relation(relation) => Concept::Relation(relation),
            Thing::Attribute(attribute) => Concept::Attribute(attribute),
        }
    }
}

/// Per-transaction record of every concept whose validity may have changed.
///
/// Recording is idempotent. Concepts deleted after they were recorded stay in the record; validation
/// skips them when it finds they no longer exist.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    entities: BTreeSet<Entity>,
    attributes: BTreeSet<Attribute>,
    role_types: BTreeSet<RoleType>,
    castings: BTreeSet<Casting>,
    relation_types: BTreeSet<RelationType>,
    relations: BTreeSet<Relation>,
    rules: BTreeSet<Rule>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the concept was newly recorded.
    pub fn record(&mut self, concept: impl Into<Concept>) -> bool {
        match concept.into() {
            Concept::Entity(entity) => self.entities.insert(entity),
            Concept::Attribute(attribute) => self.attributes.insert(attribute),
            Concept::RoleType(role_type) => self.role_types.insert(role_type),
            Concept::Casting(casting) => self.castings.insert(casting),
            Concept::RelationType(relation_type) => self.relation_types.insert(relation_type),
            Concept::Relation(relation) => self.relations.insert(relation),
            Concept::Rule(rule) => self.rules.insert(rule),
        }
    }

    pub fn contains(&self, concept: impl Into<Concept>) -> bool {
        match concept.into() {
            Concept::Entity(entity) => self.entities.contains(&entity),
            Concept::Attribute(attribute) => self.attributes.contains(&attribute),
            Concept::RoleType(role_type) => self.role_types.contains(&role_type),
            Concept::Casting(casting) => self.castings.contains(&casting),
            Concept::RelationType(relation_type) => self.relation_types.contains(&relation_type),
            Concept::Relation(relation) => self.relations.contains(&relation),
            Concept::Rule(rule) => self.rules.contains(&rule),
        }
    }

    pub fn modified_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    pub fn modified_attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.attributes.iter().copied()
    }

    pub fn modified_role_types(&self) -> impl Iterator<Item = RoleType> + '_ {
        self.role_types.iter().copied()
    }

    pub fn modified_castings(&self) -> impl Iterator<Item = Casting> + '_ {
        self.castings.iter().copied()
    }

    pub fn modified_relation_types(&self) -> impl Iterator<Item = RelationType> + '_ {
        self.relation_types.iter().copied()
    }

    pub fn modified_relations(&self) -> impl Iterator<Item = Relation> + '_ {
        self.relations.iter().copied()
    }

    pub fn modified_rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.rules.iter().copied()
    }

    pub fn count(&self, category: ConceptCategory) -> usize {
        match category {
            ConceptCategory::Entity => self.entities.len(),
            ConceptCategory::Attribute => self.attributes.len(),
            ConceptCategory::RoleType => self.role_types.len(),
            ConceptCategory::Casting => self.castings.len(),
            ConceptCategory::RelationType => self.relation_types.len(),
            ConceptCategory::Relation => self.relations.len(),
            ConceptCategory::Rule => self.rules.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        ConceptCategory::VALIDATION_ORDER.iter().all(|category| self.count(*category) == 0)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeTracker, ConceptCategory};
    use crate::{
        graph::{ThingVertex, TypeVertex},
        thing::{entity::Entity, relation::Relation},
        type_::{role_type::RoleType, TypeAPI},
    };

    #[test]
    fn recording_is_idempotent_per_category() {
        let mut tracker = ChangeTracker::new();
        let entity = Entity::new(ThingVertex::new(3));
        assert!(tracker.record(entity));
        assert!(!tracker.record(entity));
        tracker.record(Relation::new(ThingVertex::new(3)));
        tracker.record(RoleType::new(TypeVertex::new(7)));

        assert_eq!(tracker.count(ConceptCategory::Entity), 1);
        assert_eq!(tracker.count(ConceptCategory::Relation), 1);
        assert_eq!(tracker.count(ConceptCategory::RoleType), 1);
        assert_eq!(tracker.count(ConceptCategory::Casting), 0);
        assert!(tracker.contains(entity));

        tracker.clear();
        assert!(tracker.is_empty());
    }
}
