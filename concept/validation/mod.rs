/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use error::{kgraph_error, KGraphError};
use itertools::Itertools;

use crate::{
    graph::{RuleVertex, ThingVertex},
    label::Label,
    rule::RuleSide,
};

pub mod validator;

kgraph_error!(
    pub ValidationViolation(component = "Commit validation", prefix = "VAL") {
        RequiredRoleNotPlayedExactlyOnce(1, "The thing '{thing}' of type '{thing_type}' must play the required role '{role}' exactly once, but plays it {count} times.", thing: ThingVertex, thing_type: Label, role: Label, count: usize),
        RoleWithoutRelationType(2, "The role '{role}' is not related by any relation type.", role: Label),
        RoleRelatedByMultipleRelationTypes(3, "The role '{role}' is related by more than one relation type: {relation_types}.", role: Label, relation_types: LabelList),
        RelationTypeWithoutRoles(4, "The relation type '{relation_type}' does not relate any roles.", relation_type: Label),
        RelationTypeRoleWithoutSuperRole(5, "The role '{role}' related by '{relation_type}' neither is nor specialises a role related by its supertype '{supertype}'.", role: Label, relation_type: Label, supertype: Label),
        RelationTypeSuperRoleNotSpecialised(6, "The role '{role}' related by the supertype '{supertype}' is neither related nor specialised by its subtype '{relation_type}'.", role: Label, supertype: Label, relation_type: Label),
        CastingPlayerCannotPlayRole(7, "The thing '{player}' of type '{player_type}' plays the role '{role}' in relation '{relation}', but its type is not allowed to play that role.", player: ThingVertex, player_type: Label, role: Label, relation: ThingVertex),
        RelationHasMoreRolesThanType(8, "The relation '{relation}' has players in {role_count} distinct roles, but its type '{relation_type}' relates only {relates_count}.", relation: ThingVertex, relation_type: Label, role_count: usize, relates_count: usize),
        RelationRoleNotRelatedByType(9, "The relation '{relation}' has a player in the role '{role}', which is not related by its type '{relation_type}' or any of its supertypes.", relation: ThingVertex, role: Label, relation_type: Label),
        DuplicateRelation(10, "The relation '{relation}' of type '{relation_type}' has the same role players as relation '{duplicate}': {role_players}.", relation: ThingVertex, duplicate: ThingVertex, relation_type: Label, role_players: RolePlayerList),
        RuleReferencesMissingType(11, "The {side} of rule '{rule}' of type '{rule_type}' references the type '{label}', which does not exist.", side: RuleSide, rule: RuleVertex, rule_type: Label, label: Label),
    }
);

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LabelList(pub Vec<Label>);

impl fmt::Display for LabelList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|label| format!("'{label}'")).join(", "))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RolePlayerList(pub Vec<(Label, ThingVertex)>);

impl fmt::Display for RolePlayerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().map(|(role, player)| format!("{role}: {player}")).join(", "))
    }
}

/// Every violation found by one validation pass, in the order the checks ran.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    violations: Vec<ValidationViolation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend(&mut self, violations: impl IntoIterator<Item = ValidationViolation>) {
        self.violations.extend(violations)
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[ValidationViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<ValidationViolation> {
        self.violations
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.violations.iter().map(|violation| violation.format_code_and_description()).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for description in self.descriptions() {
            writeln!(f, "- {description}")?;
        }
        Ok(())
    }
}
