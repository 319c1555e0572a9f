/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{
    graph::ThingVertex,
    thing::{Thing, ThingAPI},
    ConceptAPI,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Entity {
    vertex: ThingVertex,
}

impl Entity {
    pub(crate) const fn new(vertex: ThingVertex) -> Self {
        Self { vertex }
    }
}

impl ConceptAPI for Entity {}

impl ThingAPI for Entity {
    fn vertex(&self) -> ThingVertex {
        self.vertex
    }

    fn into_thing(self) -> Thing {
        Thing::Entity(self)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity[{}]", self.vertex)
    }
}
