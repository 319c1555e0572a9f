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
        Kind, TypeVertex,
    },
    thing::{relation::Relation, thing_manager::ThingManager},
    type_::{role_type::RoleType, type_manager::TypeManager, ThingTypeAPI, TypeAPI},
    ConceptAPI,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RelationType {
    vertex: TypeVertex,
}

impl RelationType {
    pub fn set_relates(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_manager: &TypeManager,
        role_type: RoleType,
    ) -> Result<(), ConceptWriteError> {
        type_manager.set_relates(snapshot, *self, role_type)
    }

    pub fn unset_relates(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_manager: &TypeManager,
        role_type: RoleType,
    ) -> Result<(), ConceptWriteError> {
        type_manager.unset_relates(snapshot, *self, role_type)
    }

    /// The roles declared directly on this relation type. Relates is not inherited.
    pub fn get_relates(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Vec<RoleType>, ConceptReadError> {
        type_manager.get_relates(snapshot, *self)
    }

    pub fn get_instances(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<Vec<Relation>, ConceptReadError> {
        thing_manager.get_relations_in(snapshot, *self)
    }
}

impl ConceptAPI for RelationType {}

impl TypeAPI for RelationType {
    const KIND: Kind = Kind::Relation;

    fn new(vertex: TypeVertex) -> Self {
        Self { vertex }
    }

    fn vertex(&self) -> TypeVertex {
        self.vertex
    }
}

impl ThingTypeAPI for RelationType {}

impl fmt::Debug for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelationType[{}]", self.vertex)
    }
}
