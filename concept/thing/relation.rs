/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::{
    error::{ConceptReadError, ConceptWriteError},
    graph::{
        snapshot::{ReadableSnapshot, WritableSnapshot},
        ThingVertex,
    },
    thing::{casting::Casting, thing_manager::ThingManager, Thing, ThingAPI},
    type_::role_type::RoleType,
    ConceptAPI,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Relation {
    vertex: ThingVertex,
}

impl Relation {
    pub(crate) const fn new(vertex: ThingVertex) -> Self {
        Self { vertex }
    }

    pub fn add_player(
        &self,
        snapshot: &mut impl WritableSnapshot,
        thing_manager: &ThingManager,
        role_type: RoleType,
        player: impl ThingAPI,
    ) -> Result<Casting, ConceptWriteError> {
        thing_manager.add_player(snapshot, *self, role_type, player.into_thing())
    }

    pub fn remove_player(
        &self,
        snapshot: &mut impl WritableSnapshot,
        thing_manager: &ThingManager,
        role_type: RoleType,
        player: impl ThingAPI,
    ) -> Result<(), ConceptWriteError> {
        thing_manager.remove_player(snapshot, *self, role_type, player.into_thing())
    }

    /// The role-player structure: each role mapped to the things playing it in this relation.
    pub fn get_players(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<BTreeMap<RoleType, BTreeSet<Thing>>, ConceptReadError> {
        thing_manager.get_role_players(snapshot, *self)
    }

    pub fn get_castings(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<Vec<Casting>, ConceptReadError> {
        thing_manager.get_castings_by_relation(snapshot, *self)
    }

    pub fn has_players(&self, snapshot: &impl ReadableSnapshot) -> bool {
        snapshot.store().role_players.has_targets(self.vertex)
    }
}

impl ConceptAPI for Relation {}

impl ThingAPI for Relation {
    fn vertex(&self) -> ThingVertex {
        self.vertex
    }

    fn into_thing(self) -> Thing {
        Thing::Relation(self)
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relation[{}]", self.vertex)
    }
}
