/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use itertools::Itertools;

use crate::label::Label;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Variable {
    name: String,
}

impl Variable {
    pub fn new(name: &str) -> Self {
        Self { name: name.trim_start_matches('$').to_owned() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Constraint {
    Isa { thing: Variable, type_: Label },
    Sub { type_: Variable, supertype: Label },
    Has { owner: Variable, attribute_type: Label, attribute: Variable },
    Links { relation: Variable, role: Label, player: Variable },
}

impl Constraint {
    pub fn label(&self) -> &Label {
        match self {
            Constraint::Isa { type_, .. } => type_,
            Constraint::Sub { supertype, .. } => supertype,
            Constraint::Has { attribute_type, .. } => attribute_type,
            Constraint::Links { role, .. } => role,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Isa { thing, type_ } => write!(f, "{thing} isa {type_}"),
            Constraint::Sub { type_, supertype } => write!(f, "{type_} sub {supertype}"),
            Constraint::Has { owner, attribute_type, attribute } => write!(f, "{owner} has {attribute_type} {attribute}"),
            Constraint::Links { relation, role, player } => write!(f, "{relation} ({role}: {player})"),
        }
    }
}

/// A conjunction of constraints over variables, naming schema elements by label.
///
/// Patterns are compared structurally, so two rules declared with the same constraints in the same
/// order are the same rule.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Pattern {
    constraints: Vec<Constraint>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isa(mut self, thing: &str, type_: &str) -> Self {
        self.constraints.push(Constraint::Isa { thing: Variable::new(thing), type_: Label::build(type_) });
        self
    }

    pub fn sub(mut self, type_: &str, supertype: &str) -> Self {
        self.constraints.push(Constraint::Sub { type_: Variable::new(type_), supertype: Label::build(supertype) });
        self
    }

    pub fn has(mut self, owner: &str, attribute_type: &str, attribute: &str) -> Self {
        self.constraints.push(Constraint::Has {
            owner: Variable::new(owner),
            attribute_type: Label::build(attribute_type),
            attribute: Variable::new(attribute),
        });
        self
    }

    pub fn links(mut self, relation: &str, role: &str, player: &str) -> Self {
        self.constraints.push(Constraint::Links {
            relation: Variable::new(relation),
            role: Label::build(role),
            player: Variable::new(player),
        });
        self
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Every schema label the pattern mentions, in order of first appearance.
    pub fn labels(&self) -> Vec<&Label> {
        self.constraints.iter().map(Constraint::label).unique().collect()
    }

    pub fn references(&self, label: &Label) -> bool {
        self.constraints.iter().any(|constraint| constraint.label() == label)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {}; }}", self.constraints.iter().join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::Pattern;
    use crate::label::Label;

    #[test]
    fn labels_are_listed_once_in_order_of_appearance() {
        let pattern = Pattern::new().isa("$x", "person").links("$r", "friend", "$x").isa("$y", "person");
        assert_eq!(pattern.labels(), vec![&Label::build("person"), &Label::build("friend")]);
        assert!(pattern.references(&Label::build("friend")));
        assert!(!pattern.references(&Label::build("company")));
        assert_eq!(pattern.to_string(), "{ $x isa person; $r (friend: $x); $y isa person; }");
    }
}
