/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use error::kgraph_error;

use crate::{error::ConceptReadError, graph::Kind, label::Label, type_::attribute_type::ValueType};

pub(crate) mod commit_time_validation;
pub(crate) mod operation_time_validation;

kgraph_error!(
    pub SchemaValidationError(component = "Schema validation", prefix = "SVL") {
        ConceptRead(1, "Schema validation failed due to a read error.", ( kgraph_source: ConceptReadError )),
        LabelShouldBeUnique(2, "The label '{label}' is already used by a type of kind '{existing_kind}'.", label: Label, existing_kind: Kind),
        RootModification(3, "The root type '{label}' cannot be modified.", label: Label),
        CycleFoundInTypeHierarchy(4, "Setting '{supertype}' as the supertype of '{label}' would create a cycle in the type hierarchy.", label: Label, supertype: Label),
        AttributeSupertypeValueTypeMismatch(5, "Attribute type '{label}' with value type '{value_type}' cannot subtype '{supertype}' with value type '{supertype_value_type}'.", label: Label, value_type: ValueType, supertype: Label, supertype_value_type: ValueType),
        CannotDeleteTypeWithExistingSubtypes(6, "Type '{label}' cannot be deleted as it has subtypes.", label: Label),
        CannotDeleteTypeWithExistingInstances(7, "Type '{label}' cannot be deleted as it has instances.", label: Label),
        CannotSetAbstractWithExistingInstances(8, "Type '{label}' cannot be made abstract as it has instances.", label: Label),
        CannotModifyImplicitType(9, "The implicit type '{label}' cannot be modified directly.", label: Label),
        ImplicitLabelTakenByDeclaredType(10, "The implicit label '{label}' is already taken by a type that is not an implicit type of kind '{expected_kind}'.", label: Label, expected_kind: Kind),
        ImplicitTypeWiringConflict(11, "The existing implicit relation type '{label}' does not relate exactly its owner and value roles.", label: Label),
        ImplicitValueRolePlayedByOtherType(12, "The implicit value role '{role}' is played by '{player}', which is not the attribute type '{attribute_type}'.", role: Label, player: Label, attribute_type: Label),
        KeyAndHasConflict(13, "The type '{owner}' cannot have the attribute type '{attribute_type}' as both a key and a has attribute.", owner: Label, attribute_type: Label),
        KindMismatch(14, "Type '{label}' is of kind '{actual}' and cannot be used as '{expected}'.", label: Label, expected: Kind, actual: Kind),
    }
);

impl From<ConceptReadError> for SchemaValidationError {
    fn from(source: ConceptReadError) -> Self {
        Self::ConceptRead { kgraph_source: source }
    }
}
