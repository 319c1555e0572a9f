/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use concept::{
    error::ConceptWriteError,
    graph::snapshot::{ReadableSnapshot, WriteSnapshot},
    label::Label,
    type_::{
        attribute_type::ValueType, implicit::ImplicitHas, relation_type::RelationType,
        type_manager::validation::SchemaValidationError, type_manager::TypeManager, ThingType, ThingTypeAPI, TypeAPI,
    },
};
use test_utils::init_logging;

use self::test_utils_concept::{commit, load_managers, open_schema_snapshot, setup_concept_store};


fn label_of(snapshot: &WriteSnapshot, type_manager: &TypeManager, type_: impl TypeAPI) -> String {
    type_.get_label(snapshot, type_manager).unwrap().name().to_owned()
}

fn assert_implicit_labels(snapshot: &WriteSnapshot, type_manager: &TypeManager, implicit_has: ImplicitHas, prefix: &str) {
    assert_eq!(label_of(snapshot, type_manager, implicit_has.relation_type()), prefix);
    assert_eq!(label_of(snapshot, type_manager, implicit_has.owner_role()), format!("{prefix}-owner"));
    assert_eq!(label_of(snapshot, type_manager, implicit_has.value_role()), format!("{prefix}-value"));
}

#[test]
fn has_declaration_synthesizes_implicit_triad() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let implicit_has = person.set_has(&mut snapshot, &type_manager, name).unwrap();

    assert_implicit_labels(&snapshot, &type_manager, implicit_has, "has-name");
    assert!(implicit_has.relation_type().is_implicit(&snapshot, &type_manager).unwrap());
    assert!(implicit_has.owner_role().is_implicit(&snapshot, &type_manager).unwrap());
    assert!(implicit_has.value_role().is_implicit(&snapshot, &type_manager).unwrap());

    let relates = implicit_has.relation_type().get_relates(&snapshot, &type_manager).unwrap();
    assert_eq!(relates.len(), 2);
    assert!(relates.contains(&implicit_has.owner_role()));
    assert!(relates.contains(&implicit_has.value_role()));
    assert_eq!(person.get_plays(&snapshot, &type_manager).unwrap().get(&implicit_has.owner_role()), Some(&false));
    assert_eq!(name.get_plays(&snapshot, &type_manager).unwrap().get(&implicit_has.value_role()), Some(&false));
    assert_eq!(person.get_owned_attribute_types(&snapshot, &type_manager).unwrap(), vec![name]);
    assert!(person.get_key_attribute_types(&snapshot, &type_manager).unwrap().is_empty());

    commit(snapshot);
}

#[test]
fn has_declaration_is_idempotent_and_shared_between_owners() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let company = type_manager.create_entity_type(&mut snapshot, &Label::build("company")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();

    let first = person.set_has(&mut snapshot, &type_manager, name).unwrap();
    let type_count = snapshot.store().type_count();
    let second = person.set_has(&mut snapshot, &type_manager, name).unwrap();
    let shared = company.set_has(&mut snapshot, &type_manager, name).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, shared);
    assert_eq!(snapshot.store().type_count(), type_count);
    let owners = first.owner_role().get_players(&snapshot, &type_manager).unwrap();
    assert!(owners.contains(&ThingType::from(person)));
    assert!(owners.contains(&ThingType::from(company)));

    commit(snapshot);
}

#[test]
fn key_declaration_requires_the_owner_role() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let email = type_manager.create_attribute_type(&mut snapshot, &Label::build("email"), ValueType::String).unwrap();
    let implicit_key = person.set_key(&mut snapshot, &type_manager, email).unwrap();

    assert_implicit_labels(&snapshot, &type_manager, implicit_key, "key-email");
    assert_eq!(person.get_plays(&snapshot, &type_manager).unwrap().get(&implicit_key.owner_role()), Some(&true));
    assert_eq!(email.get_plays(&snapshot, &type_manager).unwrap().get(&implicit_key.value_role()), Some(&false));
    assert_eq!(person.get_key_attribute_types(&snapshot, &type_manager).unwrap(), vec![email]);
    assert!(person.get_owned_attribute_types(&snapshot, &type_manager).unwrap().is_empty());
    assert_eq!(type_manager.get_implicit_has(&snapshot, email, true).unwrap(), Some(implicit_key));
    assert_eq!(type_manager.get_implicit_has(&snapshot, email, false).unwrap(), None);
}

#[test]
fn key_and_has_of_the_same_attribute_conflict() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let employee = type_manager.create_entity_type(&mut snapshot, &Label::build("employee")).unwrap();
    employee.set_supertype(&mut snapshot, &type_manager, person).unwrap();
    let email = type_manager.create_attribute_type(&mut snapshot, &Label::build("email"), ValueType::String).unwrap();

    person.set_key(&mut snapshot, &type_manager, email).unwrap();
    let result = person.set_has(&mut snapshot, &type_manager, email);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::KeyAndHasConflict { .. } })
    ));
    // the key is inherited, so the subtype conflicts too
    let result = employee.set_has(&mut snapshot, &type_manager, email);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::KeyAndHasConflict { .. } })
    ));
}

#[test]
fn implicit_labels_taken_by_declared_types_are_rejected() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let age = type_manager.create_attribute_type(&mut snapshot, &Label::build("age"), ValueType::Long).unwrap();
    type_manager.create_relation_type(&mut snapshot, &Label::build("has-age")).unwrap();

    let result = person.set_has(&mut snapshot, &type_manager, age);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation {
            kgraph_source: SchemaValidationError::ImplicitLabelTakenByDeclaredType { .. }
        })
    ));
}

#[test]
fn implicit_hierarchy_follows_attribute_hierarchy() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let first_name =
        type_manager.create_attribute_type(&mut snapshot, &Label::build("first-name"), ValueType::String).unwrap();

    // declared before the attribute hierarchy exists
    let first_name_has = person.set_has(&mut snapshot, &type_manager, first_name).unwrap();
    let root_relation = type_manager.get_root::<RelationType>(&snapshot).unwrap();
    assert_eq!(first_name_has.relation_type().get_supertype(&snapshot, &type_manager).unwrap(), Some(root_relation));

    first_name.set_supertype(&mut snapshot, &type_manager, name).unwrap();
    let name_has = type_manager.get_implicit_has(&snapshot, name, false).unwrap().unwrap();
    assert_eq!(first_name_has.relation_type().get_supertype(&snapshot, &type_manager).unwrap(), Some(name_has.relation_type()));
    assert_eq!(first_name_has.owner_role().get_supertype(&snapshot, &type_manager).unwrap(), Some(name_has.owner_role()));
    assert_eq!(first_name_has.value_role().get_supertype(&snapshot, &type_manager).unwrap(), Some(name_has.value_role()));

    // declared after the attribute hierarchy exists
    let surname = type_manager.create_attribute_type(&mut snapshot, &Label::build("surname"), ValueType::String).unwrap();
    surname.set_supertype(&mut snapshot, &type_manager, name).unwrap();
    let surname_has = person.set_has(&mut snapshot, &type_manager, surname).unwrap();
    assert_eq!(surname_has.relation_type().get_supertype(&snapshot, &type_manager).unwrap(), Some(name_has.relation_type()));

    commit(snapshot);
}

#[test]
fn implicit_types_are_listed_only_when_shown() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let implicit_has = person.set_has(&mut snapshot, &type_manager, name).unwrap();

    let relation_types = type_manager.get_types::<RelationType>(&snapshot).unwrap();
    assert!(!relation_types.contains(&implicit_has.relation_type()));
    // lookups by label still resolve
    assert_eq!(
        type_manager.get_relation_type(&snapshot, &Label::build("has-name")).unwrap(),
        Some(implicit_has.relation_type())
    );

    let (showing_type_manager, _) = load_managers(true);
    assert!(showing_type_manager.shows_implicit_concepts());
    let relation_types = showing_type_manager.get_types::<RelationType>(&snapshot).unwrap();
    assert!(relation_types.contains(&implicit_has.relation_type()));
}

#[test]
fn implicit_types_cannot_be_modified_directly() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let implicit_has = person.set_has(&mut snapshot, &type_manager, name).unwrap();

    let result = implicit_has.relation_type().set_label(&mut snapshot, &type_manager, &Label::build("naming"));
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::CannotModifyImplicitType { .. } })
    ));
    let result = implicit_has.relation_type().delete(&mut snapshot, &type_manager);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::CannotModifyImplicitType { .. } })
    ));
}

#[test]
fn attribute_type_changes_carry_their_implicit_types() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let implicit_has = person.set_has(&mut snapshot, &type_manager, name).unwrap();

    name.set_label(&mut snapshot, &type_manager, &Label::build("full-name")).unwrap();
    assert_implicit_labels(&snapshot, &type_manager, implicit_has, "has-full-name");
    assert_eq!(type_manager.get_relation_type(&snapshot, &Label::build("has-name")).unwrap(), None);
    assert_eq!(person.get_owned_attribute_types(&snapshot, &type_manager).unwrap(), vec![name]);

    name.delete(&mut snapshot, &type_manager).unwrap();
    assert_eq!(type_manager.get_relation_type(&snapshot, &Label::build("has-full-name")).unwrap(), None);
    assert_eq!(type_manager.get_role_type(&snapshot, &Label::build("has-full-name-owner")).unwrap(), None);
    assert!(person.get_plays(&snapshot, &type_manager).unwrap().is_empty());

    commit(snapshot);
}

#[test]
fn declaring_through_the_manager_matches_the_type_api() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let company = type_manager.create_entity_type(&mut snapshot, &Label::build("company")).unwrap();
    let email = type_manager.create_attribute_type(&mut snapshot, &Label::build("email"), ValueType::String).unwrap();

    let declared = type_manager.declare_has(&mut snapshot, ThingType::Entity(person), email, true).unwrap();
    let through_type = company.set_key(&mut snapshot, &type_manager, email).unwrap();
    assert_eq!(declared, through_type);
    assert_implicit_labels(&snapshot, &type_manager, declared, "key-email");
    commit(snapshot);
}

#[test]
fn implicit_wiring_cannot_be_changed_through_declared_types() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let company = type_manager.create_entity_type(&mut snapshot, &Label::build("company")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let implicit_has = person.set_has(&mut snapshot, &type_manager, name).unwrap();

    let alias = type_manager.create_role_type(&mut snapshot, &Label::build("alias")).unwrap();
    let result = alias.set_supertype(&mut snapshot, &type_manager, implicit_has.value_role());
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::CannotModifyImplicitType { .. } })
    ));
    let naming = type_manager.create_relation_type(&mut snapshot, &Label::build("naming")).unwrap();
    let result = naming.set_relates(&mut snapshot, &type_manager, implicit_has.value_role());
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::CannotModifyImplicitType { .. } })
    ));
    let result = company.set_plays(&mut snapshot, &type_manager, implicit_has.value_role(), false);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::CannotModifyImplicitType { .. } })
    ));

    // the wiring is intact, so a second owner reuses it
    assert_eq!(company.set_has(&mut snapshot, &type_manager, name).unwrap(), implicit_has);
}
