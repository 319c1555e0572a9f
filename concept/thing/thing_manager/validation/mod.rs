/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use error::kgraph_error;

use crate::{
    error::ConceptReadError,
    graph::{ThingVertex, TypeVertex},
    label::Label,
    rule::RuleSide,
    type_::attribute_type::ValueType,
};

pub(crate) mod commit_time_validation;
pub(crate) mod operation_time_validation;

kgraph_error!(
    pub DataValidationError(component = "Data validation", prefix = "DVL") {
        ConceptRead(1, "Data validation failed due to a read error.", ( kgraph_source: ConceptReadError )),
        CannotCreateInstanceOfAbstractType(2, "Cannot create an instance of the abstract type '{type_label}'.", type_label: Label),
        CannotCreateInstanceOfRootType(3, "Cannot create an instance of the root type '{type_label}'.", type_label: Label),
        CannotCreateInstanceOfImplicitType(4, "Cannot create an instance of the implicit type '{type_label}' directly.", type_label: Label),
        ValueTypeMismatch(5, "Attribute type '{attribute_type}' holds values of type '{expected}', but a value of type '{provided}' was given.", attribute_type: Label, expected: ValueType, provided: ValueType),
        PlayerAlreadyCastInRelation(6, "The thing '{player}' already plays '{existing_role}' in relation '{relation}' and cannot also play '{role}'.", player: ThingVertex, relation: ThingVertex, existing_role: Label, role: Label),
        HasNotPermitted(7, "Things of type '{owner_type}' may not have attributes of type '{attribute_type}'.", owner_type: Label, attribute_type: Label),
        ConceptDeleted(8, "The thing '{vertex}' has been deleted.", vertex: ThingVertex),
        RuleWithEmptyPattern(9, "A rule of type '{rule_type}' cannot be created with an empty {side}.", rule_type: Label, side: RuleSide),
        ImplicitRoleCastingNotPermitted(10, "The implicit role '{role}' can only be played through has and key.", role: Label),
        TypeDeleted(11, "The type '{vertex}' has been deleted.", vertex: TypeVertex),
    }
);

impl From<ConceptReadError> for DataValidationError {
    fn from(source: ConceptReadError) -> Self {
        Self::ConceptRead { kgraph_source: source }
    }
}
