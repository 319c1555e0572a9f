/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{
    error::ConceptReadError,
    graph::{snapshot::ReadableSnapshot, Kind, TypeVertex},
    rule::Rule,
    thing::thing_manager::ThingManager,
    type_::TypeAPI,
    ConceptAPI,
};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RuleType {
    vertex: TypeVertex,
}

impl RuleType {
    pub fn get_rules(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<Vec<Rule>, ConceptReadError> {
        thing_manager.get_rules_in(snapshot, *self)
    }
}

impl ConceptAPI for RuleType {}

impl TypeAPI for RuleType {
    const KIND: Kind = Kind::Rule;

    fn new(vertex: TypeVertex) -> Self {
        Self { vertex }
    }

    fn vertex(&self) -> TypeVertex {
        self.vertex
    }
}

impl fmt::Debug for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleType[{}]", self.vertex)
    }
}
