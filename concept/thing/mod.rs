/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{
    error::{ConceptReadError, ConceptWriteError},
    graph::{
        snapshot::{ReadableSnapshot, WritableSnapshot},
        Kind, ThingVertex,
    },
    thing::{
        attribute::Attribute, casting::Casting, entity::Entity, relation::Relation, thing_manager::ThingManager,
    },
    type_::ThingType,
    ConceptAPI,
};

pub mod attribute;
pub mod casting;
pub mod entity;
pub mod relation;
pub mod thing_manager;
pub mod value;

pub trait ThingAPI: ConceptAPI {
    fn vertex(&self) -> ThingVertex;

    fn into_thing(self) -> Thing;

    fn is_deleted(&self, snapshot: &impl ReadableSnapshot) -> bool {
        !snapshot.store().thing_exists(self.vertex())
    }

    fn get_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<ThingType, ConceptReadError> {
        thing_manager.get_thing_type(snapshot, (*self).into_thing())
    }

    /// Every casting in which this thing is the player.
    fn get_castings(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<Vec<Casting>, ConceptReadError> {
        thing_manager.get_castings_by_player(snapshot, (*self).into_thing())
    }

    /// Relations this thing plays in, ownerships included.
    fn get_relations(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<Vec<Relation>, ConceptReadError> {
        Ok(self.get_castings(snapshot, thing_manager)?.into_iter().map(|casting| casting.relation()).collect())
    }

    fn get_has(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<Vec<Attribute>, ConceptReadError> {
        thing_manager.get_has(snapshot, (*self).into_thing())
    }

    fn set_has(
        &self,
        snapshot: &mut impl WritableSnapshot,
        thing_manager: &ThingManager,
        attribute: Attribute,
    ) -> Result<Relation, ConceptWriteError> {
        thing_manager.set_has(snapshot, (*self).into_thing(), attribute)
    }

    fn unset_has(
        &self,
        snapshot: &mut impl WritableSnapshot,
        thing_manager: &ThingManager,
        attribute: Attribute,
    ) -> Result<(), ConceptWriteError> {
        thing_manager.unset_has(snapshot, (*self).into_thing(), attribute)
    }

    fn delete(self, snapshot: &mut impl WritableSnapshot, thing_manager: &ThingManager) -> Result<(), ConceptWriteError> {
        thing_manager.delete_thing(snapshot, self.into_thing())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Thing {
    Entity(Entity),
    Relation(Relation),
    Attribute(Attribute),
}

impl Thing {
    pub(crate) fn from_vertex(vertex: ThingVertex, kind: Kind) -> Option<Self> {
        match kind {
            Kind::Entity => Some(Thing::Entity(Entity::new(vertex))),
            Kind::Relation => Some(Thing::Relation(Relation::new(vertex))),
            Kind::Attribute => Some(Thing::Attribute(Attribute::new(vertex))),
            Kind::Role | Kind::Rule => None,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Thing::Entity(_) => Kind::Entity,
            Thing::Relation(_) => Kind::Relation,
            Thing::Attribute(_) => Kind::Attribute,
        }
    }
}

impl ConceptAPI for Thing {}

impl ThingAPI for Thing {
    fn vertex(&self) -> ThingVertex {
        match self {
            Thing::Entity(entity) => entity.vertex(),
            Thing::Relation(relation) => relation.vertex(),
            Thing::Attribute(attribute) => attribute.vertex(),
        }
    }

    fn into_thing(self) -> Thing {
        self
    }
}

impl From<Entity> for Thing {
    fn from(entity: Entity) -> Self {
        Thing::Entity(entity)
    }
}

impl From<Relation> for Thing {
    fn from(relation: Relation) -> Self {
        Thing::Relation(relation)
    }
}

impl From<Attribute> for Thing {
    fn from(attribute: Attribute) -> Self {
        Thing::Attribute(attribute)
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vertex())
    }
}
