/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::BTreeMap, fmt};

use crate::{
    error::{ConceptReadError, ConceptWriteError},
    graph::{
        snapshot::{ReadableSnapshot, WritableSnapshot},
        Kind, TypeVertex,
    },
    label::Label,
    type_::{
        attribute_type::AttributeType, entity_type::EntityType, implicit::ImplicitHas, relation_type::RelationType,
        role_type::RoleType, type_manager::TypeManager,
    },
    ConceptAPI,
};

pub mod attribute_type;
pub mod entity_type;
pub mod implicit;
pub mod relation_type;
pub mod role_type;
pub mod rule_type;
pub mod type_manager;

pub trait TypeAPI: ConceptAPI + Sized {
    const KIND: Kind;

    fn new(vertex: TypeVertex) -> Self;

    fn vertex(&self) -> TypeVertex;

    fn get_label<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<&'s Label, ConceptReadError> {
        type_manager.get_type_label(snapshot, self.vertex())
    }

    fn is_root(&self, snapshot: &impl ReadableSnapshot, type_manager: &TypeManager) -> Result<bool, ConceptReadError> {
        type_manager.get_type_is_root(snapshot, self.vertex())
    }

    fn is_abstract(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<bool, ConceptReadError> {
        type_manager.get_type_is_abstract(snapshot, self.vertex())
    }

    fn is_implicit(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<bool, ConceptReadError> {
        type_manager.get_type_is_implicit(snapshot, self.vertex())
    }

    fn get_supertype(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Option<Self>, ConceptReadError> {
        Ok(type_manager.get_supertype(snapshot, self.vertex()).map(Self::new))
    }

    /// All transitive supertypes, nearest first, ending at the root of the kind.
    fn get_supertypes(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Vec<Self>, ConceptReadError> {
        Ok(type_manager.get_supertypes(snapshot, self.vertex())?.into_iter().map(Self::new).collect())
    }

    fn get_subtypes(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Vec<Self>, ConceptReadError> {
        Ok(type_manager.get_subtypes(snapshot, self.vertex()).into_iter().map(Self::new).collect())
    }

    fn get_subtypes_transitive(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Vec<Self>, ConceptReadError> {
        Ok(type_manager.get_subtypes_transitive(snapshot, self.vertex()).into_iter().map(Self::new).collect())
    }

    fn set_supertype(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_manager: &TypeManager,
        supertype: Self,
    ) -> Result<(), ConceptWriteError> {
        type_manager.set_supertype(snapshot, *self, supertype)
    }

    fn set_abstract(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_manager: &TypeManager,
        is_abstract: bool,
    ) -> Result<(), ConceptWriteError> {
        type_manager.set_abstract(snapshot, self.vertex(), is_abstract)
    }

    fn set_label(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_manager: &TypeManager,
        label: &Label,
    ) -> Result<(), ConceptWriteError> {
        type_manager.set_label(snapshot, self.vertex(), label)
    }

    fn delete(self, snapshot: &mut impl WritableSnapshot, type_manager: &TypeManager) -> Result<(), ConceptWriteError> {
        type_manager.delete_type(snapshot, self.vertex())
    }
}

/// Types whose instances are things: they may play roles and own attributes.
pub trait ThingTypeAPI: TypeAPI + Into<ThingType> {
    fn set_plays(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_manager: &TypeManager,
        role_type: RoleType,
        required: bool,
    ) -> Result<(), ConceptWriteError> {
        type_manager.set_plays(snapshot, (*self).into(), role_type, required)
    }

    fn unset_plays(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_manager: &TypeManager,
        role_type: RoleType,
    ) -> Result<(), ConceptWriteError> {
        type_manager.unset_plays(snapshot, (*self).into(), role_type)
    }

    fn get_plays_declared(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Vec<RoleType>, ConceptReadError> {
        type_manager.get_plays_declared(snapshot, (*self).into())
    }

    /// Every role this type or one of its supertypes plays, with whether it must be played.
    fn get_plays(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<BTreeMap<RoleType, bool>, ConceptReadError> {
        type_manager.get_plays(snapshot, (*self).into())
    }

    fn set_has(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_manager: &TypeManager,
        attribute_type: AttributeType,
    ) -> Result<ImplicitHas, ConceptWriteError> {
        type_manager.declare_has(snapshot, (*self).into(), attribute_type, false)
    }

    fn set_key(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_manager: &TypeManager,
        attribute_type: AttributeType,
    ) -> Result<ImplicitHas, ConceptWriteError> {
        type_manager.declare_has(snapshot, (*self).into(), attribute_type, true)
    }

    fn get_owned_attribute_types(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Vec<AttributeType>, ConceptReadError> {
        type_manager.get_owned_attribute_types(snapshot, (*self).into(), false)
    }

    fn get_key_attribute_types(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<Vec<AttributeType>, ConceptReadError> {
        type_manager.get_owned_attribute_types(snapshot, (*self).into(), true)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ThingType {
    Entity(EntityType),
    Relation(RelationType),
    Attribute(AttributeType),
}

impl ThingType {
    pub(crate) fn from_vertex(vertex: TypeVertex, kind: Kind) -> Option<Self> {
        match kind {
            Kind::Entity => Some(ThingType::Entity(EntityType::new(vertex))),
            Kind::Relation => Some(ThingType::Relation(RelationType::new(vertex))),
            Kind::Attribute => Some(ThingType::Attribute(AttributeType::new(vertex))),
            Kind::Role | Kind::Rule => None,
        }
    }

    pub fn vertex(&self) -> TypeVertex {
        match self {
            ThingType::Entity(entity_type) => entity_type.vertex(),
            ThingType::Relation(relation_type) => relation_type.vertex(),
            ThingType::Attribute(attribute_type) => attribute_type.vertex(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            ThingType::Entity(_) => Kind::Entity,
            ThingType::Relation(_) => Kind::Relation,
            ThingType::Attribute(_) => Kind::Attribute,
        }
    }

    pub fn get_label<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        type_manager: &TypeManager,
    ) -> Result<&'s Label, ConceptReadError> {
        type_manager.get_type_label(snapshot, self.vertex())
    }
}

impl ConceptAPI for ThingType {}

impl From<EntityType> for ThingType {
    fn from(entity_type: EntityType) -> Self {
        ThingType::Entity(entity_type)
    }
}

impl From<RelationType> for ThingType {
    fn from(relation_type: RelationType) -> Self {
        ThingType::Relation(relation_type)
    }
}

impl From<AttributeType> for ThingType {
    fn from(attribute_type: AttributeType) -> Self {
        ThingType::Attribute(attribute_type)
    }
}

impl fmt::Display for ThingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind(), self.vertex())
    }
}
