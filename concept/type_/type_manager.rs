/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{BTreeMap, BTreeSet};

use resource::concept::{CONSTRAINT_RULE_LABEL, INFERENCE_RULE_LABEL};
use tracing::{event, Level};

use crate::{
    error::{ConceptReadError, ConceptWriteError},
    graph::{
        snapshot::{ReadableSnapshot, SequenceNumber, WritableSnapshot, WriteSnapshot},
        store::ConceptStore,
        Kind, TypeVertex,
    },
    label::Label,
    rule::Rule,
    thing::{casting::Casting, relation::Relation, Thing},
    type_::{
        attribute_type::{AttributeType, ValueType},
        entity_type::EntityType,
        implicit::{ImplicitHas, ImplicitLabels},
        relation_type::RelationType,
        role_type::RoleType,
        rule_type::RuleType,
        type_manager::{
            type_reader::TypeReader,
            type_writer::TypeWriter,
            validation::{operation_time_validation::OperationTimeValidation, SchemaValidationError},
        },
        ThingType, TypeAPI,
    },
};

pub(crate) mod type_reader;
pub(crate) mod type_writer;
pub mod validation;

/// Reads and writes the schema held in a snapshot.
///
/// Every write is validated against the operation-time rules before it touches the graph, and
/// records the concepts whose commit-time validity it may have changed.
#[derive(Debug)]
pub struct TypeManager {
    show_implicit_concepts: bool,
}

impl TypeManager {
    pub fn new(show_implicit_concepts: bool) -> Self {
        Self { show_implicit_concepts }
    }

    /// Returns a copy of the store holding every root type, plus the built-in rule types.
    pub fn initialise_types(committed: &ConceptStore) -> Result<ConceptStore, ConceptWriteError> {
        let mut snapshot = WriteSnapshot::new(committed, SequenceNumber::MIN, true);
        for kind in Kind::ALL {
            if TypeReader::get_root(&snapshot, kind).is_err() {
                TypeWriter::storage_put_type(&mut snapshot, &Label::build(kind.root_label()), kind, true, false, None);
            }
        }
        let rule_root = TypeReader::get_root(&snapshot, Kind::Rule)?;
        for label in [INFERENCE_RULE_LABEL, CONSTRAINT_RULE_LABEL] {
            let label = Label::build(label);
            if TypeReader::get_labelled_type(&snapshot, &label).is_none() {
                let rule_type = TypeWriter::storage_put_type(&mut snapshot, &label, Kind::Rule, false, false, None);
                TypeWriter::storage_put_supertype(&mut snapshot, rule_type, rule_root);
            }
        }
        let (store, _) = snapshot.into_parts();
        Ok(store)
    }

    pub fn shows_implicit_concepts(&self) -> bool {
        self.show_implicit_concepts
    }

    pub fn get_entity_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        label: &Label,
    ) -> Result<Option<EntityType>, ConceptReadError> {
        self.get_labelled_type(snapshot, label)
    }

    pub fn get_relation_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        label: &Label,
    ) -> Result<Option<RelationType>, ConceptReadError> {
        self.get_labelled_type(snapshot, label)
    }

    pub fn get_role_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        label: &Label,
    ) -> Result<Option<RoleType>, ConceptReadError> {
        self.get_labelled_type(snapshot, label)
    }

    pub fn get_attribute_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        label: &Label,
    ) -> Result<Option<AttributeType>, ConceptReadError> {
        self.get_labelled_type(snapshot, label)
    }

    pub fn get_rule_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        label: &Label,
    ) -> Result<Option<RuleType>, ConceptReadError> {
        self.get_labelled_type(snapshot, label)
    }

    /// Label lookup always resolves implicit types; only listings hide them.
    pub fn get_labelled_type<T: TypeAPI>(
        &self,
        snapshot: &impl ReadableSnapshot,
        label: &Label,
    ) -> Result<Option<T>, ConceptReadError> {
        match TypeReader::get_labelled_type(snapshot, label) {
            Some(vertex) if TypeReader::get_kind(snapshot, vertex)? == T::KIND => Ok(Some(T::new(vertex))),
            _ => Ok(None),
        }
    }

    pub fn get_root<T: TypeAPI>(&self, snapshot: &impl ReadableSnapshot) -> Result<T, ConceptReadError> {
        Ok(T::new(TypeReader::get_root(snapshot, T::KIND)?))
    }

    /// Every type of the kind, root first. Implicit types are listed only if configured to be shown.
    pub fn get_types<T: TypeAPI>(&self, snapshot: &impl ReadableSnapshot) -> Result<Vec<T>, ConceptReadError> {
        let root = TypeReader::get_root(snapshot, T::KIND)?;
        let mut types = vec![T::new(root)];
        for subtype in TypeReader::get_subtypes_transitive(snapshot, root) {
            if self.show_implicit_concepts || !TypeReader::is_implicit(snapshot, subtype)? {
                types.push(T::new(subtype));
            }
        }
        Ok(types)
    }

    pub fn create_entity_type(
        &self,
        snapshot: &mut impl WritableSnapshot,
        label: &Label,
    ) -> Result<EntityType, ConceptWriteError> {
        self.create_type(snapshot, label, None)
    }

    pub fn create_relation_type(
        &self,
        snapshot: &mut impl WritableSnapshot,
        label: &Label,
    ) -> Result<RelationType, ConceptWriteError> {
        self.create_type(snapshot, label, None)
    }

    pub fn create_role_type(
        &self,
        snapshot: &mut impl WritableSnapshot,
        label: &Label,
    ) -> Result<RoleType, ConceptWriteError> {
        self.create_type(snapshot, label, None)
    }

    pub fn create_attribute_type(
        &self,
        snapshot: &mut impl WritableSnapshot,
        label: &Label,
        value_type: ValueType,
    ) -> Result<AttributeType, ConceptWriteError> {
        self.create_type(snapshot, label, Some(value_type))
    }

    pub fn create_rule_type(
        &self,
        snapshot: &mut impl WritableSnapshot,
        label: &Label,
    ) -> Result<RuleType, ConceptWriteError> {
        self.create_type(snapshot, label, None)
    }

    fn create_type<T: TypeAPI>(
        &self,
        snapshot: &mut impl WritableSnapshot,
        label: &Label,
        value_type: Option<ValueType>,
    ) -> Result<T, ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        OperationTimeValidation::validate_label_uniqueness(snapshot, label)?;
        let root = TypeReader::get_root(snapshot, T::KIND)?;
        let vertex = TypeWriter::storage_put_type(snapshot, label, T::KIND, false, false, value_type);
        TypeWriter::storage_put_supertype(snapshot, vertex, root);
        match T::KIND {
            Kind::Role => snapshot.record_change(RoleType::new(vertex)),
            Kind::Relation => snapshot.record_change(RelationType::new(vertex)),
            Kind::Entity | Kind::Attribute | Kind::Rule => (),
        }
        event!(Level::DEBUG, "Created {} type '{}' as {}", T::KIND, label, vertex);
        Ok(T::new(vertex))
    }

    pub(crate) fn get_type_label<'s>(
        &self,
        snapshot: &'s impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<&'s Label, ConceptReadError> {
        TypeReader::get_label(snapshot, type_)
    }

    pub(crate) fn get_type_is_root(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<bool, ConceptReadError> {
        TypeReader::is_root(snapshot, type_)
    }

    pub(crate) fn get_type_is_abstract(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<bool, ConceptReadError> {
        TypeReader::is_abstract(snapshot, type_)
    }

    pub(crate) fn get_type_is_implicit(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<bool, ConceptReadError> {
        TypeReader::is_implicit(snapshot, type_)
    }

    pub(crate) fn get_supertype(&self, snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Option<TypeVertex> {
        TypeReader::get_supertype(snapshot, type_)
    }

    pub(crate) fn get_supertypes(
        &self,
        snapshot: &impl ReadableSnapshot,
        type_: TypeVertex,
    ) -> Result<Vec<TypeVertex>, ConceptReadError> {
        TypeReader::get_supertypes(snapshot, type_)
    }

    pub(crate) fn get_subtypes(&self, snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Vec<TypeVertex> {
        TypeReader::get_subtypes(snapshot, type_)
    }

    pub(crate) fn get_subtypes_transitive(&self, snapshot: &impl ReadableSnapshot, type_: TypeVertex) -> Vec<TypeVertex> {
        TypeReader::get_subtypes_transitive(snapshot, type_)
    }

    pub(crate) fn get_value_type(
        &self,
        snapshot: &impl ReadableSnapshot,
        attribute_type: AttributeType,
    ) -> Result<Option<ValueType>, ConceptReadError> {
        TypeReader::get_value_type(snapshot, attribute_type.vertex())
    }

    pub(crate) fn set_supertype<T: TypeAPI>(
        &self,
        snapshot: &mut impl WritableSnapshot,
        subtype: T,
        supertype: T,
    ) -> Result<(), ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        let (subtype, supertype) = (subtype.vertex(), supertype.vertex());
        OperationTimeValidation::validate_type_is_not_root(snapshot, subtype)?;
        OperationTimeValidation::validate_type_is_not_implicit(snapshot, subtype)?;
        OperationTimeValidation::validate_type_is_not_implicit(snapshot, supertype)?;
        OperationTimeValidation::validate_sub_does_not_create_cycle(snapshot, subtype, supertype)?;
        if T::KIND == Kind::Attribute {
            OperationTimeValidation::validate_value_type_compatible_with_supertype(snapshot, subtype, supertype)?;
        }
        if TypeReader::get_supertype(snapshot, subtype) == Some(supertype) {
            return Ok(());
        }

        TypeWriter::storage_put_supertype(snapshot, subtype, supertype);
        self.record_hierarchy_change(snapshot, subtype, T::KIND)?;
        if T::KIND == Kind::Attribute {
            self.synchronise_implicit_hierarchy(snapshot, AttributeType::new(subtype))?;
        }
        event!(Level::TRACE, "Set supertype of {} to {}", subtype, supertype);
        Ok(())
    }

    pub(crate) fn set_abstract(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_: TypeVertex,
        is_abstract: bool,
    ) -> Result<(), ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        OperationTimeValidation::validate_type_is_not_root(snapshot, type_)?;
        if is_abstract {
            OperationTimeValidation::validate_no_instances_to_set_abstract(snapshot, type_)?;
        }
        TypeWriter::storage_set_abstract(snapshot, type_, is_abstract)?;
        Ok(())
    }

    pub(crate) fn set_label(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_: TypeVertex,
        label: &Label,
    ) -> Result<(), ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        OperationTimeValidation::validate_type_is_not_root(snapshot, type_)?;
        OperationTimeValidation::validate_type_is_not_implicit(snapshot, type_)?;
        let previous = TypeReader::get_label(snapshot, type_)?.clone();
        if previous == *label {
            return Ok(());
        }
        OperationTimeValidation::validate_label_uniqueness(snapshot, label)?;

        let mut renames = vec![(type_, previous.clone(), label.clone())];
        if TypeReader::get_kind(snapshot, type_)? == Kind::Attribute {
            for required in [false, true] {
                let (from, to) = (ImplicitLabels::new(&previous, required), ImplicitLabels::new(label, required));
                for (from, to) in [(from.relation, to.relation), (from.owner, to.owner), (from.value, to.value)] {
                    if let Some(implicit) = TypeReader::get_labelled_type(snapshot, &from) {
                        OperationTimeValidation::validate_label_uniqueness(snapshot, &to)?;
                        renames.push((implicit, from, to));
                    }
                }
            }
        }
        for (renamed, from, to) in renames {
            self.record_rules_referencing(snapshot, &from)?;
            TypeWriter::storage_set_label(snapshot, renamed, &to)?;
        }
        event!(Level::DEBUG, "Renamed type '{}' to '{}'", previous, label);
        Ok(())
    }

    pub(crate) fn delete_type(&self, snapshot: &mut impl WritableSnapshot, type_: TypeVertex) -> Result<(), ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        OperationTimeValidation::validate_type_is_not_root(snapshot, type_)?;
        OperationTimeValidation::validate_type_is_not_implicit(snapshot, type_)?;
        OperationTimeValidation::validate_no_subtypes_for_type_deletion(snapshot, type_)?;
        OperationTimeValidation::validate_no_instances_for_type_deletion(snapshot, type_)?;

        let kind = TypeReader::get_kind(snapshot, type_)?;
        match kind {
            Kind::Role => {
                for relation_type in TypeReader::get_relating(snapshot, type_) {
                    snapshot.record_change(RelationType::new(relation_type));
                }
            }
            Kind::Relation => {
                for role_type in TypeReader::get_relates(snapshot, type_) {
                    snapshot.record_change(RoleType::new(role_type));
                }
            }
            Kind::Attribute => {
                let attribute_type = AttributeType::new(type_);
                for required in [false, true] {
                    if let Some(implicit_has) = self.get_implicit_has(snapshot, attribute_type, required)? {
                        self.delete_implicit_has(snapshot, implicit_has)?;
                    }
                }
            }
            Kind::Entity | Kind::Rule => (),
        }
        let label = TypeReader::get_label(snapshot, type_)?.clone();
        self.record_rules_referencing(snapshot, &label)?;
        TypeWriter::storage_delete_type(snapshot, type_);
        event!(Level::DEBUG, "Deleted {} type '{}'", kind, label);
        Ok(())
    }

    pub(crate) fn set_relates(
        &self,
        snapshot: &mut impl WritableSnapshot,
        relation_type: RelationType,
        role_type: RoleType,
    ) -> Result<(), ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        OperationTimeValidation::validate_type_is_not_root(snapshot, relation_type.vertex())?;
        OperationTimeValidation::validate_type_is_not_implicit(snapshot, relation_type.vertex())?;
        OperationTimeValidation::validate_type_is_not_root(snapshot, role_type.vertex())?;
        OperationTimeValidation::validate_type_is_not_implicit(snapshot, role_type.vertex())?;
        if TypeWriter::storage_put_relates(snapshot, relation_type.vertex(), role_type.vertex()) {
            self.record_relates_change(snapshot, relation_type, role_type)?;
        }
        Ok(())
    }

    pub(crate) fn unset_relates(
        &self,
        snapshot: &mut impl WritableSnapshot,
        relation_type: RelationType,
        role_type: RoleType,
    ) -> Result<(), ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        OperationTimeValidation::validate_type_is_not_implicit(snapshot, relation_type.vertex())?;
        if TypeWriter::storage_delete_relates(snapshot, relation_type.vertex(), role_type.vertex()) {
            self.record_relates_change(snapshot, relation_type, role_type)?;
        }
        Ok(())
    }

    pub(crate) fn get_relates(
        &self,
        snapshot: &impl ReadableSnapshot,
        relation_type: RelationType,
    ) -> Result<Vec<RoleType>, ConceptReadError> {
        Ok(TypeReader::get_relates(snapshot, relation_type.vertex()).into_iter().map(RoleType::new).collect())
    }

    pub(crate) fn get_relating_relation_types(
        &self,
        snapshot: &impl ReadableSnapshot,
        role_type: RoleType,
    ) -> Result<Vec<RelationType>, ConceptReadError> {
        Ok(TypeReader::get_relating(snapshot, role_type.vertex()).into_iter().map(RelationType::new).collect())
    }

    pub(crate) fn set_plays(
        &self,
        snapshot: &mut impl WritableSnapshot,
        player: ThingType,
        role_type: RoleType,
        required: bool,
    ) -> Result<(), ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        OperationTimeValidation::validate_type_is_not_root(snapshot, player.vertex())?;
        OperationTimeValidation::validate_type_is_not_root(snapshot, role_type.vertex())?;
        OperationTimeValidation::validate_type_is_not_implicit(snapshot, role_type.vertex())?;
        let was_required = TypeReader::is_plays_required(snapshot, player.vertex(), role_type.vertex());
        TypeWriter::storage_put_plays(snapshot, player.vertex(), role_type.vertex(), required);
        snapshot.record_change(role_type);
        if required && !was_required {
            Self::record_instances(snapshot, player.vertex())?;
        }
        Ok(())
    }

    pub(crate) fn unset_plays(
        &self,
        snapshot: &mut impl WritableSnapshot,
        player: ThingType,
        role_type: RoleType,
    ) -> Result<(), ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        OperationTimeValidation::validate_type_is_not_implicit(snapshot, role_type.vertex())?;
        if !TypeWriter::storage_delete_plays(snapshot, player.vertex(), role_type.vertex()) {
            return Ok(());
        }
        snapshot.record_change(role_type);

        // existing castings may no longer be permitted
        let mut castings = Vec::new();
        for instance in TypeReader::get_instances_transitive(snapshot, player.vertex()) {
            let Some(instance_thing) = Thing::from_vertex(instance, snapshot.store().get_thing(instance)?.kind) else {
                continue;
            };
            for relation in snapshot.store().role_players.sources(instance) {
                if snapshot.store().get_casting_role(relation, instance) == Some(role_type.vertex()) {
                    castings.push(Casting::new(Relation::new(relation), role_type, instance_thing));
                }
            }
        }
        for casting in castings {
            snapshot.record_change(casting);
        }
        Ok(())
    }

    pub(crate) fn get_plays_declared(
        &self,
        snapshot: &impl ReadableSnapshot,
        player: ThingType,
    ) -> Result<Vec<RoleType>, ConceptReadError> {
        Ok(TypeReader::get_plays_declared(snapshot, player.vertex()).into_iter().map(RoleType::new).collect())
    }

    pub(crate) fn get_plays(
        &self,
        snapshot: &impl ReadableSnapshot,
        player: ThingType,
    ) -> Result<BTreeMap<RoleType, bool>, ConceptReadError> {
        Ok(TypeReader::get_plays(snapshot, player.vertex())?
            .into_iter()
            .map(|(role_type, required)| (RoleType::new(role_type), required))
            .collect())
    }

    pub(crate) fn get_players(
        &self,
        snapshot: &impl ReadableSnapshot,
        role_type: RoleType,
    ) -> Result<Vec<ThingType>, ConceptReadError> {
        let mut players = Vec::new();
        for player in TypeReader::get_players(snapshot, role_type.vertex()) {
            players.extend(ThingType::from_vertex(player, TypeReader::get_kind(snapshot, player)?));
        }
        Ok(players)
    }

    /// Declares that `owner` has (or, if `required`, keys) `attribute_type`, synthesizing the implicit
    /// relation type and roles that model the ownership. Idempotent.
    pub fn declare_has(
        &self,
        snapshot: &mut impl WritableSnapshot,
        owner: ThingType,
        attribute_type: AttributeType,
        required: bool,
    ) -> Result<ImplicitHas, ConceptWriteError> {
        Self::validate_schema_writable(snapshot)?;
        OperationTimeValidation::validate_type_is_not_root(snapshot, owner.vertex())?;
        OperationTimeValidation::validate_type_is_not_root(snapshot, attribute_type.vertex())?;
        OperationTimeValidation::validate_has_and_key_exclusive(
            snapshot,
            owner.vertex(),
            attribute_type.vertex(),
            required,
        )?;

        let implicit_has = self.put_implicit_has(snapshot, attribute_type, required)?;
        let owner_role = implicit_has.owner_role();
        if !TypeReader::plays_declared(snapshot, owner.vertex(), owner_role.vertex()) {
            TypeWriter::storage_put_plays(snapshot, owner.vertex(), owner_role.vertex(), required);
            snapshot.record_change(owner_role);
            if required {
                Self::record_instances(snapshot, owner.vertex())?;
            }
        }
        event!(
            Level::DEBUG,
            "Declared {} of {} on {} through {:?}",
            if required { "key" } else { "has" },
            attribute_type.vertex(),
            owner,
            implicit_has
        );
        Ok(implicit_has)
    }

    pub fn get_implicit_has(
        &self,
        snapshot: &impl ReadableSnapshot,
        attribute_type: AttributeType,
        required: bool,
    ) -> Result<Option<ImplicitHas>, ConceptReadError> {
        let labels = ImplicitLabels::new(TypeReader::get_label(snapshot, attribute_type.vertex())?, required);
        let relation_type = self.get_relation_type(snapshot, &labels.relation)?;
        let owner_role = self.get_role_type(snapshot, &labels.owner)?;
        let value_role = self.get_role_type(snapshot, &labels.value)?;
        match (relation_type, owner_role, value_role) {
            (Some(relation_type), Some(owner_role), Some(value_role)) => {
                Ok(Some(ImplicitHas::new(relation_type, owner_role, value_role)))
            }
            _ => Ok(None),
        }
    }

    pub(crate) fn get_owned_attribute_types(
        &self,
        snapshot: &impl ReadableSnapshot,
        owner: ThingType,
        required: bool,
    ) -> Result<Vec<AttributeType>, ConceptReadError> {
        let mut attribute_types = BTreeSet::new();
        for role_type in TypeReader::get_plays(snapshot, owner.vertex())?.into_keys() {
            if !TypeReader::is_implicit(snapshot, role_type)? {
                continue;
            }
            let role_label = TypeReader::get_label(snapshot, role_type)?;
            for relation_type in TypeReader::get_relating(snapshot, role_type) {
                for value_role in TypeReader::get_relates(snapshot, relation_type) {
                    for player in TypeReader::get_players(snapshot, value_role) {
                        if TypeReader::get_kind(snapshot, player)? != Kind::Attribute {
                            continue;
                        }
                        let labels = ImplicitLabels::new(TypeReader::get_label(snapshot, player)?, required);
                        if labels.owner == *role_label {
                            attribute_types.insert(AttributeType::new(player));
                        }
                    }
                }
            }
        }
        Ok(attribute_types.into_iter().collect())
    }

    fn put_implicit_has(
        &self,
        snapshot: &mut impl WritableSnapshot,
        attribute_type: AttributeType,
        required: bool,
    ) -> Result<ImplicitHas, ConceptWriteError> {
        let labels = ImplicitLabels::new(TypeReader::get_label(snapshot, attribute_type.vertex())?, required);
        let relation_type = OperationTimeValidation::validate_implicit_type(snapshot, &labels.relation, Kind::Relation)?;
        let owner_role = OperationTimeValidation::validate_implicit_type(snapshot, &labels.owner, Kind::Role)?;
        let value_role = OperationTimeValidation::validate_implicit_type(snapshot, &labels.value, Kind::Role)?;
        let implicit_has = match (relation_type, owner_role, value_role) {
            (Some(relation_type), Some(owner_role), Some(value_role)) => {
                OperationTimeValidation::validate_implicit_relation_type_wiring(
                    snapshot,
                    relation_type,
                    owner_role,
                    value_role,
                    attribute_type.vertex(),
                )?;
                ImplicitHas::new(RelationType::new(relation_type), RoleType::new(owner_role), RoleType::new(value_role))
            }
            (None, None, None) => Self::create_implicit_has(snapshot, &labels, attribute_type),
            _ => return Err(SchemaValidationError::ImplicitTypeWiringConflict { label: labels.relation }.into()),
        };
        self.synchronise_implicit_supertypes(snapshot, attribute_type, implicit_has, required)?;
        Ok(implicit_has)
    }

    fn create_implicit_has(
        snapshot: &mut impl WritableSnapshot,
        labels: &ImplicitLabels,
        attribute_type: AttributeType,
    ) -> ImplicitHas {
        let relation_type = TypeWriter::storage_put_type(snapshot, &labels.relation, Kind::Relation, false, true, None);
        let owner_role = TypeWriter::storage_put_type(snapshot, &labels.owner, Kind::Role, false, true, None);
        let value_role = TypeWriter::storage_put_type(snapshot, &labels.value, Kind::Role, false, true, None);
        TypeWriter::storage_put_relates(snapshot, relation_type, owner_role);
        TypeWriter::storage_put_relates(snapshot, relation_type, value_role);
        TypeWriter::storage_put_plays(snapshot, attribute_type.vertex(), value_role, false);

        let implicit_has =
            ImplicitHas::new(RelationType::new(relation_type), RoleType::new(owner_role), RoleType::new(value_role));
        snapshot.record_change(implicit_has.relation_type());
        snapshot.record_change(implicit_has.owner_role());
        snapshot.record_change(implicit_has.value_role());
        event!(Level::TRACE, "Created implicit relation type '{}'", labels.relation);
        implicit_has
    }

    fn delete_implicit_has(
        &self,
        snapshot: &mut impl WritableSnapshot,
        implicit_has: ImplicitHas,
    ) -> Result<(), ConceptWriteError> {
        let relation_type = implicit_has.relation_type().vertex();
        OperationTimeValidation::validate_no_subtypes_for_type_deletion(snapshot, relation_type)?;
        OperationTimeValidation::validate_no_instances_for_type_deletion(snapshot, relation_type)?;
        let role_types = [implicit_has.owner_role().vertex(), implicit_has.value_role().vertex()];
        for role_type in role_types {
            OperationTimeValidation::validate_no_subtypes_for_type_deletion(snapshot, role_type)?;
        }
        for role_type in role_types {
            TypeWriter::storage_delete_type(snapshot, role_type);
        }
        TypeWriter::storage_delete_type(snapshot, relation_type);
        Ok(())
    }

    /// The implicit types of an attribute type sit under the implicit types of its supertype, or under
    /// the roots if the supertype is the root attribute type.
    fn synchronise_implicit_supertypes(
        &self,
        snapshot: &mut impl WritableSnapshot,
        attribute_type: AttributeType,
        implicit_has: ImplicitHas,
        required: bool,
    ) -> Result<(), ConceptWriteError> {
        let supertype = match TypeReader::get_supertype(snapshot, attribute_type.vertex()) {
            Some(supertype) if !TypeReader::is_root(snapshot, supertype)? => Some(supertype),
            _ => None,
        };
        let (relation_supertype, owner_supertype, value_supertype) = match supertype {
            Some(supertype) => {
                let super_has = self.put_implicit_has(snapshot, AttributeType::new(supertype), required)?;
                (super_has.relation_type().vertex(), super_has.owner_role().vertex(), super_has.value_role().vertex())
            }
            None => {
                let role_root = TypeReader::get_root(snapshot, Kind::Role)?;
                (TypeReader::get_root(snapshot, Kind::Relation)?, role_root, role_root)
            }
        };

        let relation_type = implicit_has.relation_type();
        if TypeReader::get_supertype(snapshot, relation_type.vertex()) != Some(relation_supertype) {
            TypeWriter::storage_put_supertype(snapshot, relation_type.vertex(), relation_supertype);
            snapshot.record_change(relation_type);
        }
        for (role_type, role_supertype) in
            [(implicit_has.owner_role(), owner_supertype), (implicit_has.value_role(), value_supertype)]
        {
            if TypeReader::get_supertype(snapshot, role_type.vertex()) != Some(role_supertype) {
                TypeWriter::storage_put_supertype(snapshot, role_type.vertex(), role_supertype);
                snapshot.record_change(role_type);
                snapshot.record_change(relation_type);
            }
        }
        Ok(())
    }

    fn synchronise_implicit_hierarchy(
        &self,
        snapshot: &mut impl WritableSnapshot,
        attribute_type: AttributeType,
    ) -> Result<(), ConceptWriteError> {
        let mut attribute_types = vec![attribute_type];
        attribute_types.extend(
            TypeReader::get_subtypes_transitive(snapshot, attribute_type.vertex()).into_iter().map(AttributeType::new),
        );
        for attribute_type in attribute_types {
            for required in [false, true] {
                if let Some(implicit_has) = self.get_implicit_has(snapshot, attribute_type, required)? {
                    self.synchronise_implicit_supertypes(snapshot, attribute_type, implicit_has, required)?;
                }
            }
        }
        Ok(())
    }

    fn record_hierarchy_change(
        &self,
        snapshot: &mut impl WritableSnapshot,
        type_: TypeVertex,
        kind: Kind,
    ) -> Result<(), ConceptReadError> {
        match kind {
            Kind::Role => {
                snapshot.record_change(RoleType::new(type_));
                let mut roles = vec![type_];
                roles.extend(TypeReader::get_subtypes_transitive(snapshot, type_));
                for role in &roles {
                    for relation_type in TypeReader::get_relating(snapshot, *role) {
                        Self::record_relation_type_and_dependents(snapshot, relation_type)?;
                    }
                }
                Self::record_castings_with_roles(snapshot, &roles)?;
            }
            Kind::Relation => Self::record_relation_type_and_dependents(snapshot, type_)?,
            Kind::Entity | Kind::Attribute => Self::record_instances(snapshot, type_)?,
            Kind::Rule => (),
        }
        Ok(())
    }

    fn record_relates_change(
        &self,
        snapshot: &mut impl WritableSnapshot,
        relation_type: RelationType,
        role_type: RoleType,
    ) -> Result<(), ConceptReadError> {
        snapshot.record_change(role_type);
        Self::record_relation_type_and_dependents(snapshot, relation_type.vertex())
    }

    // The relation type, its subtypes, and every instance of either.
    fn record_relation_type_and_dependents(
        snapshot: &mut impl WritableSnapshot,
        relation_type: TypeVertex,
    ) -> Result<(), ConceptReadError> {
        snapshot.record_change(RelationType::new(relation_type));
        for subtype in TypeReader::get_subtypes_transitive(snapshot, relation_type) {
            snapshot.record_change(RelationType::new(subtype));
        }
        Self::record_instances(snapshot, relation_type)
    }

    // Every instance of the type or its subtypes, with each casting the instance plays in.
    fn record_instances(snapshot: &mut impl WritableSnapshot, type_: TypeVertex) -> Result<(), ConceptReadError> {
        let mut instances = Vec::new();
        let mut castings = Vec::new();
        for instance in TypeReader::get_instances_transitive(snapshot, type_) {
            let Some(instance_thing) = Thing::from_vertex(instance, snapshot.store().get_thing(instance)?.kind) else {
                continue;
            };
            instances.push(instance_thing);
            for relation in snapshot.store().role_players.sources(instance) {
                let role = snapshot
                    .store()
                    .get_casting_role(relation, instance)
                    .ok_or(ConceptReadError::CorruptMissingCastingRole { relation, player: instance })?;
                castings.push(Casting::new(Relation::new(relation), RoleType::new(role), instance_thing));
            }
        }
        for instance in instances {
            snapshot.record_change(instance);
        }
        for casting in castings {
            snapshot.record_change(casting);
        }
        Ok(())
    }

    // Castings in any of the roles, together with their relations and players.
    fn record_castings_with_roles(
        snapshot: &mut impl WritableSnapshot,
        roles: &[TypeVertex],
    ) -> Result<(), ConceptReadError> {
        let mut castings = Vec::new();
        for role in roles {
            for (relation, player) in snapshot.store().castings_with_role(*role) {
                let Some(player_thing) = Thing::from_vertex(player, snapshot.store().get_thing(player)?.kind) else {
                    continue;
                };
                castings.push(Casting::new(Relation::new(relation), RoleType::new(*role), player_thing));
            }
        }
        for casting in castings {
            snapshot.record_change(casting.relation());
            snapshot.record_change(casting.player());
            snapshot.record_change(casting);
        }
        Ok(())
    }

    fn record_rules_referencing(
        &self,
        snapshot: &mut impl WritableSnapshot,
        label: &Label,
    ) -> Result<(), ConceptReadError> {
        for rule in TypeReader::get_rules_referencing(snapshot, label)? {
            snapshot.record_change(Rule::new(rule));
        }
        Ok(())
    }

    fn validate_schema_writable(snapshot: &impl WritableSnapshot) -> Result<(), ConceptWriteError> {
        if snapshot.is_schema_writable() {
            Ok(())
        } else {
            Err(ConceptWriteError::SchemaLocked {})
        }
    }
}
