/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use error::kgraph_error;

use crate::{
    graph::{Kind, RuleVertex, ThingVertex, TypeVertex},
    label::Label,
    thing::thing_manager::validation::DataValidationError,
    type_::type_manager::validation::SchemaValidationError,
};

kgraph_error!(
    pub ConceptReadError(component = "Concept read", prefix = "CRE") {
        CorruptMissingType(1, "Type vertex '{vertex}' is referenced but does not exist.", vertex: TypeVertex),
        CorruptMissingThing(2, "Thing vertex '{vertex}' is referenced but does not exist.", vertex: ThingVertex),
        CorruptMissingRule(3, "Rule vertex '{vertex}' is referenced but does not exist.", vertex: RuleVertex),
        CorruptMissingRootType(4, "The root type of kind '{kind}' does not exist.", kind: Kind),
        CorruptTypeKindMismatch(5, "Type '{label}' was expected to be of kind '{expected}' but is of kind '{actual}'.", label: Label, expected: Kind, actual: Kind),
        CorruptCyclicTypeHierarchy(6, "The supertype chain of '{label}' is cyclic.", label: Label),
        CorruptMissingCastingRole(7, "The casting of '{player}' in relation '{relation}' has no role.", relation: ThingVertex, player: ThingVertex),
        CorruptMissingAttributeValue(8, "Attribute '{attribute}' has no value.", attribute: ThingVertex),
    }
);

kgraph_error!(
    pub ConceptWriteError(component = "Concept write", prefix = "CWR") {
        ConceptRead(1, "Concept write failed due to a read error.", ( kgraph_source: ConceptReadError )),
        SchemaValidation(2, "Concept write failed due to a schema validation error.", ( kgraph_source: SchemaValidationError )),
        DataValidation(3, "Concept write failed due to a data validation error.", ( kgraph_source: DataValidationError )),
        SchemaLocked(4, "The schema cannot be modified in a data transaction."),
    }
);

impl From<ConceptReadError> for ConceptWriteError {
    fn from(source: ConceptReadError) -> Self {
        Self::ConceptRead { kgraph_source: source }
    }
}

impl From<SchemaValidationError> for ConceptWriteError {
    fn from(source: SchemaValidationError) -> Self {
        Self::SchemaValidation { kgraph_source: source }
    }
}

impl From<DataValidationError> for ConceptWriteError {
    fn from(source: DataValidationError) -> Self {
        Self::DataValidation { kgraph_source: source }
    }
}
