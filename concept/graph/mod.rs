/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use resource::concept::{
    ROOT_ATTRIBUTE_LABEL, ROOT_ENTITY_LABEL, ROOT_RELATION_LABEL, ROOT_ROLE_LABEL, ROOT_RULE_LABEL,
};

pub mod change_tracker;
pub mod snapshot;
pub mod store;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Kind {
    Entity,
    Relation,
    Role,
    Attribute,
    Rule,
}

impl Kind {
    pub const ALL: [Kind; 5] = [Kind::Entity, Kind::Relation, Kind::Role, Kind::Attribute, Kind::Rule];

    pub const fn root_label(&self) -> &'static str {
        match self {
            Kind::Entity => ROOT_ENTITY_LABEL,
            Kind::Relation => ROOT_RELATION_LABEL,
            Kind::Role => ROOT_ROLE_LABEL,
            Kind::Attribute => ROOT_ATTRIBUTE_LABEL,
            Kind::Rule => ROOT_RULE_LABEL,
        }
    }

    /// Kinds whose instances are things that may own attributes and play roles.
    pub const fn is_thing_kind(&self) -> bool {
        matches!(self, Kind::Entity | Kind::Relation | Kind::Attribute)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root_label())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeVertex {
    id: u32,
}

impl TypeVertex {
    pub(crate) const fn new(id: u32) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> u32 {
        self.id
    }

    pub(crate) const fn index(&self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for TypeVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.id)
    }
}

impl fmt::Debug for TypeVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeVertex[{}]", self.id)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ThingVertex {
    id: u64,
}

impl ThingVertex {
    pub(crate) const fn new(id: u64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub(crate) const fn index(&self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for ThingVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.id)
    }
}

impl fmt::Debug for ThingVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThingVertex[{:#x}]", self.id)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RuleVertex {
    id: u64,
}

impl RuleVertex {
    pub(crate) const fn new(id: u64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub(crate) const fn index(&self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for RuleVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{:#x}", self.id)
    }
}

impl fmt::Debug for RuleVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleVertex[{:#x}]", self.id)
    }
}
