/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use concept::{
    error::ConceptWriteError,
    label::Label,
    thing::{thing_manager::validation::DataValidationError, ThingAPI},
    type_::{
        attribute_type::{AttributeType, ValueType},
        entity_type::EntityType,
        relation_type::RelationType,
        role_type::RoleType,
        type_manager::validation::SchemaValidationError,
        ThingType, ThingTypeAPI, TypeAPI,
    },
};
use test_utils::init_logging;

use self::test_utils_concept::{load_managers, open_data_snapshot, open_schema_snapshot, setup_concept_store};


#[test]
fn entity_type_hierarchy() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let root_entity = type_manager.get_entity_type(&snapshot, &Label::build("entity")).unwrap().unwrap();
    assert!(root_entity.is_root(&snapshot, &type_manager).unwrap());
    assert!(root_entity.is_abstract(&snapshot, &type_manager).unwrap());
    assert_eq!(root_entity, type_manager.get_root::<EntityType>(&snapshot).unwrap());

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let child = type_manager.create_entity_type(&mut snapshot, &Label::build("child")).unwrap();
    assert_eq!(child.get_supertype(&snapshot, &type_manager).unwrap(), Some(root_entity));

    child.set_supertype(&mut snapshot, &type_manager, person).unwrap();
    assert!(!child.is_root(&snapshot, &type_manager).unwrap());
    assert!(!child.is_abstract(&snapshot, &type_manager).unwrap());
    assert_eq!(child.get_label(&snapshot, &type_manager).unwrap(), &Label::build("child"));
    assert_eq!(child.get_supertype(&snapshot, &type_manager).unwrap(), Some(person));
    assert_eq!(child.get_supertypes(&snapshot, &type_manager).unwrap(), vec![person, root_entity]);
    assert_eq!(person.get_subtypes(&snapshot, &type_manager).unwrap(), vec![child]);
    assert_eq!(root_entity.get_subtypes_transitive(&snapshot, &type_manager).unwrap(), vec![person, child]);
    assert_eq!(type_manager.get_types::<EntityType>(&snapshot).unwrap(), vec![root_entity, person, child]);
}

#[test]
fn labels_are_unique_across_kinds() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let duplicate = type_manager.create_entity_type(&mut snapshot, &Label::build("person"));
    assert!(matches!(
        duplicate,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::LabelShouldBeUnique { .. } })
    ));
    let other_kind = type_manager.create_relation_type(&mut snapshot, &Label::build("person"));
    assert!(matches!(
        other_kind,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::LabelShouldBeUnique { .. } })
    ));

    // lookups are typed by kind
    assert_eq!(type_manager.get_entity_type(&snapshot, &Label::build("person")).unwrap(), Some(person));
    assert_eq!(type_manager.get_relation_type(&snapshot, &Label::build("person")).unwrap(), None);
}

#[test]
fn supertype_cycles_are_rejected() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let animal = type_manager.create_entity_type(&mut snapshot, &Label::build("animal")).unwrap();
    let dog = type_manager.create_entity_type(&mut snapshot, &Label::build("dog")).unwrap();
    let puppy = type_manager.create_entity_type(&mut snapshot, &Label::build("puppy")).unwrap();
    dog.set_supertype(&mut snapshot, &type_manager, animal).unwrap();
    puppy.set_supertype(&mut snapshot, &type_manager, dog).unwrap();

    let result = animal.set_supertype(&mut snapshot, &type_manager, puppy);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation {
            kgraph_source: SchemaValidationError::CycleFoundInTypeHierarchy { .. }
        })
    ));
    let result = animal.set_supertype(&mut snapshot, &type_manager, animal);
    assert!(result.is_err());
    assert_eq!(puppy.get_supertypes(&snapshot, &type_manager).unwrap().len(), 3);
}

#[test]
fn root_types_cannot_be_modified() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let root_entity = type_manager.get_root::<EntityType>(&snapshot).unwrap();
    let result = root_entity.set_label(&mut snapshot, &type_manager, &Label::build("thing"));
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::RootModification { .. } })
    ));
    assert!(root_entity.delete(&mut snapshot, &type_manager).is_err());
    assert!(type_manager.get_entity_type(&snapshot, &Label::build("entity")).unwrap().is_some());
}

#[test]
fn attribute_supertype_must_share_value_type() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let nickname =
        type_manager.create_attribute_type(&mut snapshot, &Label::build("nickname"), ValueType::String).unwrap();
    let age = type_manager.create_attribute_type(&mut snapshot, &Label::build("age"), ValueType::Long).unwrap();

    nickname.set_supertype(&mut snapshot, &type_manager, name).unwrap();
    assert_eq!(nickname.get_value_type(&snapshot, &type_manager).unwrap(), Some(ValueType::String));

    let result = age.set_supertype(&mut snapshot, &type_manager, name);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation {
            kgraph_source: SchemaValidationError::AttributeSupertypeValueTypeMismatch { .. }
        })
    ));
    let root_attribute = type_manager.get_root::<AttributeType>(&snapshot).unwrap();
    assert_eq!(root_attribute.get_value_type(&snapshot, &type_manager).unwrap(), None);
}

#[test]
fn type_deletion_requires_no_subtypes_or_instances() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let child = type_manager.create_entity_type(&mut snapshot, &Label::build("child")).unwrap();
    child.set_supertype(&mut snapshot, &type_manager, person).unwrap();

    let result = person.delete(&mut snapshot, &type_manager);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation {
            kgraph_source: SchemaValidationError::CannotDeleteTypeWithExistingSubtypes { .. }
        })
    ));

    let instance = thing_manager.create_entity(&mut snapshot, child).unwrap();
    let result = child.delete(&mut snapshot, &type_manager);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation {
            kgraph_source: SchemaValidationError::CannotDeleteTypeWithExistingInstances { .. }
        })
    ));

    instance.delete(&mut snapshot, &thing_manager).unwrap();
    child.delete(&mut snapshot, &type_manager).unwrap();
    person.delete(&mut snapshot, &type_manager).unwrap();
    assert_eq!(type_manager.get_entity_type(&snapshot, &Label::build("person")).unwrap(), None);
    assert_eq!(type_manager.get_entity_type(&snapshot, &Label::build("child")).unwrap(), None);
}

#[test]
fn abstract_types_cannot_be_instantiated() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    person.set_abstract(&mut snapshot, &type_manager, true).unwrap();
    let result = thing_manager.create_entity(&mut snapshot, person);
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation {
            kgraph_source: DataValidationError::CannotCreateInstanceOfAbstractType { .. }
        })
    ));

    person.set_abstract(&mut snapshot, &type_manager, false).unwrap();
    thing_manager.create_entity(&mut snapshot, person).unwrap();
    let result = person.set_abstract(&mut snapshot, &type_manager, true);
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation {
            kgraph_source: SchemaValidationError::CannotSetAbstractWithExistingInstances { .. }
        })
    ));

    let root_entity = type_manager.get_root::<EntityType>(&snapshot).unwrap();
    let result = thing_manager.create_entity(&mut snapshot, root_entity);
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation {
            kgraph_source: DataValidationError::CannotCreateInstanceOfRootType { .. }
        })
    ));
}

#[test]
fn relabelling_moves_the_label() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    type_manager.create_entity_type(&mut snapshot, &Label::build("company")).unwrap();

    person.set_label(&mut snapshot, &type_manager, &Label::build("human")).unwrap();
    assert_eq!(type_manager.get_entity_type(&snapshot, &Label::build("person")).unwrap(), None);
    assert_eq!(type_manager.get_entity_type(&snapshot, &Label::build("human")).unwrap(), Some(person));

    let result = person.set_label(&mut snapshot, &type_manager, &Label::build("company"));
    assert!(matches!(
        result,
        Err(ConceptWriteError::SchemaValidation { kgraph_source: SchemaValidationError::LabelShouldBeUnique { .. } })
    ));
}

#[test]
fn relates_and_plays_are_navigable_both_ways() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let child = type_manager.create_entity_type(&mut snapshot, &Label::build("child")).unwrap();
    child.set_supertype(&mut snapshot, &type_manager, person).unwrap();
    let marriage = type_manager.create_relation_type(&mut snapshot, &Label::build("marriage")).unwrap();
    let spouse = type_manager.create_role_type(&mut snapshot, &Label::build("spouse")).unwrap();

    marriage.set_relates(&mut snapshot, &type_manager, spouse).unwrap();
    person.set_plays(&mut snapshot, &type_manager, spouse, false).unwrap();

    assert_eq!(marriage.get_relates(&snapshot, &type_manager).unwrap(), vec![spouse]);
    assert_eq!(spouse.get_relation_types(&snapshot, &type_manager).unwrap(), vec![marriage]);
    assert_eq!(spouse.get_players(&snapshot, &type_manager).unwrap(), vec![ThingType::from(person)]);
    assert_eq!(person.get_plays_declared(&snapshot, &type_manager).unwrap(), vec![spouse]);

    // plays is inherited, relates is not
    assert_eq!(child.get_plays_declared(&snapshot, &type_manager).unwrap(), Vec::<RoleType>::new());
    assert_eq!(child.get_plays(&snapshot, &type_manager).unwrap().get(&spouse), Some(&false));
    let civil_union = type_manager.create_relation_type(&mut snapshot, &Label::build("civil-union")).unwrap();
    civil_union.set_supertype(&mut snapshot, &type_manager, marriage).unwrap();
    assert!(civil_union.get_relates(&snapshot, &type_manager).unwrap().is_empty());

    marriage.unset_relates(&mut snapshot, &type_manager, spouse).unwrap();
    assert!(spouse.get_relation_types(&snapshot, &type_manager).unwrap().is_empty());
    person.unset_plays(&mut snapshot, &type_manager, spouse).unwrap();
    assert!(child.get_plays(&snapshot, &type_manager).unwrap().is_empty());
}

#[test]
fn schema_writes_need_a_schema_snapshot() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, _) = load_managers(false);
    let mut snapshot = open_data_snapshot(&store);

    let result = type_manager.create_entity_type(&mut snapshot, &Label::build("person"));
    assert!(matches!(result, Err(ConceptWriteError::SchemaLocked { .. })));
    let root_relation = type_manager.get_root::<RelationType>(&snapshot).unwrap();
    assert!(root_relation.is_root(&snapshot, &type_manager).unwrap());
}

#[test]
fn roles_cannot_be_deleted_while_played() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let employment = type_manager.create_relation_type(&mut snapshot, &Label::build("employment")).unwrap();
    let employee = type_manager.create_role_type(&mut snapshot, &Label::build("employee")).unwrap();
    let contractor = type_manager.create_role_type(&mut snapshot, &Label::build("contractor")).unwrap();
    employment.set_relates(&mut snapshot, &type_manager, employee).unwrap();
    employment.set_relates(&mut snapshot, &type_manager, contractor).unwrap();
    person.set_plays(&mut snapshot, &type_manager, employee, false).unwrap();
    person.set_plays(&mut snapshot, &type_manager, contractor, false).unwrap();

    let alice = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let job = thing_manager.create_relation(&mut snapshot, employment).unwrap();
    job.add_player(&mut snapshot, &thing_manager, employee, alice).unwrap();

    match employee.delete(&mut snapshot, &type_manager) {
        Err(ConceptWriteError::SchemaValidation {
            kgraph_source: SchemaValidationError::CannotDeleteTypeWithExistingInstances { label },
        }) => assert_eq!(label, Label::build("employee")),
        other => panic!("unexpected result {other:?}"),
    }
    assert!(type_manager.get_role_type(&snapshot, &Label::build("employee")).unwrap().is_some());

    // an unplayed role goes, and can no longer be cast
    contractor.delete(&mut snapshot, &type_manager).unwrap();
    let bob = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let result = job.add_player(&mut snapshot, &thing_manager, contractor, bob);
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation { kgraph_source: DataValidationError::TypeDeleted { .. } })
    ));
    assert!(bob.get_relations(&snapshot, &thing_manager).unwrap().is_empty());

    job.remove_player(&mut snapshot, &thing_manager, employee, alice).unwrap();
    employee.delete(&mut snapshot, &type_manager).unwrap();
    assert_eq!(type_manager.get_role_type(&snapshot, &Label::build("employee")).unwrap(), None);
}
