/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::BTreeSet, fmt};

use crate::{
    error::ConceptReadError,
    graph::{snapshot::ReadableSnapshot, RuleVertex, TypeVertex},
    rule::pattern::Pattern,
    thing::thing_manager::ThingManager,
    type_::rule_type::RuleType,
    ConceptAPI,
};

pub mod pattern;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum RuleSide {
    Hypothesis,
    Conclusion,
}

impl fmt::Display for RuleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSide::Hypothesis => write!(f, "LHS"),
            RuleSide::Conclusion => write!(f, "RHS"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Rule {
    vertex: RuleVertex,
}

impl Rule {
    pub(crate) const fn new(vertex: RuleVertex) -> Self {
        Self { vertex }
    }

    pub fn vertex(&self) -> RuleVertex {
        self.vertex
    }

    pub fn get_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<RuleType, ConceptReadError> {
        thing_manager.get_rule_type(snapshot, *self)
    }

    pub fn get_lhs<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<&'s Pattern, ConceptReadError> {
        thing_manager.get_rule_pattern(snapshot, *self, RuleSide::Hypothesis)
    }

    pub fn get_rhs<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<&'s Pattern, ConceptReadError> {
        thing_manager.get_rule_pattern(snapshot, *self, RuleSide::Conclusion)
    }

    /// Types mentioned by the hypothesis. Filled in when the rule is committed.
    pub fn get_hypothesis_types<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<&'s BTreeSet<TypeVertex>, ConceptReadError> {
        thing_manager.get_rule_types(snapshot, *self, RuleSide::Hypothesis)
    }

    /// Types mentioned by the conclusion. Filled in when the rule is committed.
    pub fn get_conclusion_types<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<&'s BTreeSet<TypeVertex>, ConceptReadError> {
        thing_manager.get_rule_types(snapshot, *self, RuleSide::Conclusion)
    }

    pub fn is_deleted(&self, snapshot: &impl ReadableSnapshot) -> bool {
        !snapshot.store().rule_exists(self.vertex)
    }
}

impl ConceptAPI for Rule {}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule[{}]", self.vertex)
    }
}

