/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{
    error::ConceptReadError,
    graph::{snapshot::ReadableSnapshot, ThingVertex},
    thing::{thing_manager::ThingManager, value::Value, Thing, ThingAPI},
    ConceptAPI,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Attribute {
    vertex: ThingVertex,
}

impl Attribute {
    pub(crate) const fn new(vertex: ThingVertex) -> Self {
        Self { vertex }
    }

    pub fn get_value<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<&'s Value, ConceptReadError> {
        thing_manager.get_attribute_value(snapshot, *self)
    }

    /// Things owning this attribute through the implicit has or key relations.
    pub fn get_owners(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<Vec<Thing>, ConceptReadError> {
        thing_manager.get_owners(snapshot, *self)
    }
}

impl ConceptAPI for Attribute {}

impl ThingAPI for Attribute {
    fn vertex(&self) -> ThingVertex {
        self.vertex
    }

    fn into_thing(self) -> Thing {
        Thing::Attribute(self)
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute[{}]", self.vertex)
    }
}
