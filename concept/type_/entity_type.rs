/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{
    error::ConceptReadError,
    graph::{snapshot::ReadableSnapshot, Kind, TypeVertex},
    thing::{entity::Entity, thing_manager::ThingManager},
    type_::{ThingTypeAPI, TypeAPI},
    ConceptAPI,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EntityType {
    vertex: TypeVertex,
}

impl EntityType {
    pub fn get_instances(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<Vec<Entity>, ConceptReadError> {
        thing_manager.get_entities_in(snapshot, *self)
    }
}

impl ConceptAPI for EntityType {}

impl TypeAPI for EntityType {
    const KIND: Kind = Kind::Entity;

    fn new(vertex: TypeVertex) -> Self {
        Self { vertex }
    }

    fn vertex(&self) -> TypeVertex {
        self.vertex
    }
}

impl ThingTypeAPI for EntityType {}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityType[{}]", self.vertex)
    }
}
