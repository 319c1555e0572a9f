/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{
    graph::snapshot::ReadableSnapshot,
    thing::{relation::Relation, Thing, ThingAPI},
    type_::{role_type::RoleType, TypeAPI},
    ConceptAPI,
};

/// One role-player link: `player` plays `role` in `relation`.
///
/// A thing takes part in a given relation through at most one casting.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Casting {
    relation: Relation,
    player: Thing,
    role: RoleType,
}

impl Casting {
    pub(crate) fn new(relation: Relation, role: RoleType, player: Thing) -> Self {
        Self { relation, player, role }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn player(&self) -> Thing {
        self.player
    }

    pub fn role(&self) -> RoleType {
        self.role
    }

    /// Whether this exact link is still present: same relation, same player, same role.
    pub fn is_current(&self, snapshot: &impl ReadableSnapshot) -> bool {
        snapshot.store().get_casting_role(self.relation.vertex(), self.player.vertex()) == Some(self.role.vertex())
    }
}

impl ConceptAPI for Casting {}

impl fmt::Display for Casting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.relation.vertex(), self.role.vertex(), self.player)
    }
}
