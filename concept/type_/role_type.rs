/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{
    error::ConceptReadError,
    graph::{snapshot::ReadableSnapshot, Kind, TypeVertex},
    type_::{relation_type::RelationType, type_manager::TypeManager, ThingType, TypeAPI},
    ConceptAPI,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RoleType {
    vertex: TypeVertex,
}

impl RoleType {
    /// Relation types declaring this role. A consistent schema has exactly one.
    pub fn get_relation_types(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Vec<RelationType>, ConceptReadError> {
        type_manager.get_relating_relation_types(snapshot, *self)
    }

    /// Types declaring that they play this role directly.
    pub fn get_players(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Vec<ThingType>, ConceptReadError> {
        type_manager.get_players(snapshot, *self)
    }
}

impl ConceptAPI for RoleType {}

impl TypeAPI for RoleType {
    const KIND: Kind = Kind::Role;

    fn new(vertex: TypeVertex) -> Self {
        Self { vertex }
    }

    fn vertex(&self) -> TypeVertex {
        self.vertex
    }
}

impl fmt::Debug for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoleType[{}]", self.vertex)
    }
}
