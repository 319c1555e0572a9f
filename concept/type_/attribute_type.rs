/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{
    error::ConceptReadError,
    graph::{snapshot::ReadableSnapshot, Kind, TypeVertex},
    thing::{attribute::Attribute, thing_manager::ThingManager, value::Value},
    type_::{type_manager::TypeManager, ThingTypeAPI, TypeAPI},
    ConceptAPI,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ValueType {
    Boolean,
    Long,
    Double,
    String,
    Date,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Boolean => "boolean",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::Date => "date",
        };
        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AttributeType {
    vertex: TypeVertex,
}

impl AttributeType {
    /// The root attribute type has no value type; every other attribute type has exactly one.
    pub fn get_value_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Option<ValueType>, ConceptReadError> {
        type_manager.get_value_type(snapshot, *self)
    }

    pub fn get_instances(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
    ) -> Result<Vec<Attribute>, ConceptReadError> {
        thing_manager.get_attributes_in(snapshot, *self)
    }

    pub fn get_attribute(
        &self,
        snapshot: &impl ReadableSnapshot,
        thing_manager: &ThingManager,
        value: &Value,
    ) -> Result<Option<Attribute>, ConceptReadError> {
        thing_manager.get_attribute_with_value(snapshot, *self, value)
    }
}

impl ConceptAPI for AttributeType {}

impl TypeAPI for AttributeType {
    const KIND: Kind = Kind::Attribute;

    fn new(vertex: TypeVertex) -> Self {
        Self { vertex }
    }

    fn vertex(&self) -> TypeVertex {
        self.vertex
    }
}

impl ThingTypeAPI for AttributeType {}

impl fmt::Debug for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeType[{}]", self.vertex)
    }
}
