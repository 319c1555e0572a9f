/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use chrono::NaiveDate;
use concept::{
    error::ConceptWriteError,
    graph::snapshot::WritableSnapshot,
    label::Label,
    rule::pattern::Pattern,
    thing::{thing_manager::validation::DataValidationError, value::Value, Thing, ThingAPI},
    type_::{attribute_type::ValueType, ThingType, ThingTypeAPI, TypeAPI},
};
use test_utils::init_logging;

use self::test_utils_concept::{commit, load_managers, open_data_snapshot, open_schema_snapshot, setup_concept_store};


#[test]
fn instances_are_listed_through_the_type_hierarchy() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let child = type_manager.create_entity_type(&mut snapshot, &Label::build("child")).unwrap();
    child.set_supertype(&mut snapshot, &type_manager, person).unwrap();

    let alice = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let bob = thing_manager.create_entity(&mut snapshot, child).unwrap();

    assert_eq!(alice.get_type(&snapshot, &thing_manager).unwrap(), ThingType::from(person));
    assert_eq!(bob.get_type(&snapshot, &thing_manager).unwrap(), ThingType::from(child));
    assert_eq!(person.get_instances(&snapshot, &thing_manager).unwrap(), vec![alice, bob]);
    assert_eq!(child.get_instances(&snapshot, &thing_manager).unwrap(), vec![bob]);
    assert!(!snapshot.changes().is_empty());

    let store = commit(snapshot);
    let snapshot = open_data_snapshot(&store);
    assert_eq!(person.get_instances(&snapshot, &thing_manager).unwrap().len(), 2);
}

#[test]
fn attributes_are_unique_per_type_and_value() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let birthday =
        type_manager.create_attribute_type(&mut snapshot, &Label::build("birthday"), ValueType::Date).unwrap();

    let alice = thing_manager.put_attribute(&mut snapshot, name, "Alice").unwrap();
    let again = thing_manager.put_attribute(&mut snapshot, name, "Alice").unwrap();
    let bob = thing_manager.put_attribute(&mut snapshot, name, "Bob").unwrap();
    assert_eq!(alice, again);
    assert_ne!(alice, bob);
    assert_eq!(alice.get_value(&snapshot, &thing_manager).unwrap(), &Value::from("Alice"));
    assert_eq!(name.get_attribute(&snapshot, &thing_manager, &Value::from("Bob")).unwrap(), Some(bob));
    assert_eq!(name.get_attribute(&snapshot, &thing_manager, &Value::from("Carol")).unwrap(), None);
    assert_eq!(name.get_instances(&snapshot, &thing_manager).unwrap().len(), 2);

    let date = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
    let day = thing_manager.put_attribute(&mut snapshot, birthday, date).unwrap();
    let day_value = day.get_value(&snapshot, &thing_manager).unwrap();
    assert_eq!(day_value.as_date(), Some(date));
    assert_eq!(day_value.as_string(), None);
    assert_eq!(alice.get_value(&snapshot, &thing_manager).unwrap().as_string(), Some("Alice"));

    let result = thing_manager.put_attribute(&mut snapshot, name, 42i64);
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation {
            kgraph_source: DataValidationError::ValueTypeMismatch {
                expected: ValueType::String,
                provided: ValueType::Long,
                ..
            }
        })
    ));
}

#[test]
fn relations_hold_one_role_per_player() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let employment = type_manager.create_relation_type(&mut snapshot, &Label::build("employment")).unwrap();
    let employee = type_manager.create_role_type(&mut snapshot, &Label::build("employee")).unwrap();
    let employer = type_manager.create_role_type(&mut snapshot, &Label::build("employer")).unwrap();
    employment.set_relates(&mut snapshot, &type_manager, employee).unwrap();
    employment.set_relates(&mut snapshot, &type_manager, employer).unwrap();
    person.set_plays(&mut snapshot, &type_manager, employee, false).unwrap();
    person.set_plays(&mut snapshot, &type_manager, employer, false).unwrap();

    let alice = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let bob = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let job = thing_manager.create_relation(&mut snapshot, employment).unwrap();
    let casting = job.add_player(&mut snapshot, &thing_manager, employee, alice).unwrap();
    job.add_player(&mut snapshot, &thing_manager, employer, bob).unwrap();

    assert_eq!(casting.relation(), job);
    assert_eq!(casting.role(), employee);
    assert_eq!(casting.player(), Thing::from(alice));
    assert_eq!(job.get_castings(&snapshot, &thing_manager).unwrap().len(), 2);
    assert_eq!(alice.get_castings(&snapshot, &thing_manager).unwrap(), vec![casting]);
    let players = job.get_players(&snapshot, &thing_manager).unwrap();
    assert!(players[&employee].contains(&Thing::from(alice)));
    assert!(players[&employer].contains(&Thing::from(bob)));

    // re-adding the same casting is a no-op, a second role for the same player is not
    assert_eq!(job.add_player(&mut snapshot, &thing_manager, employee, alice).unwrap(), casting);
    let result = job.add_player(&mut snapshot, &thing_manager, employer, alice);
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation {
            kgraph_source: DataValidationError::PlayerAlreadyCastInRelation { .. }
        })
    ));

    job.remove_player(&mut snapshot, &thing_manager, employer, bob).unwrap();
    assert!(!job.get_players(&snapshot, &thing_manager).unwrap().contains_key(&employer));
    assert!(bob.get_castings(&snapshot, &thing_manager).unwrap().is_empty());
}

#[test]
fn ownership_goes_through_implicit_relations() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let company = type_manager.create_entity_type(&mut snapshot, &Label::build("company")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let implicit_has = person.set_has(&mut snapshot, &type_manager, name).unwrap();

    let alice = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let acme = thing_manager.create_entity(&mut snapshot, company).unwrap();
    let alice_name = thing_manager.put_attribute(&mut snapshot, name, "Alice").unwrap();

    let ownership = alice.set_has(&mut snapshot, &thing_manager, alice_name).unwrap();
    assert_eq!(ownership.get_type(&snapshot, &thing_manager).unwrap(), ThingType::from(implicit_has.relation_type()));
    assert_eq!(alice.set_has(&mut snapshot, &thing_manager, alice_name).unwrap(), ownership);
    assert_eq!(alice.get_has(&snapshot, &thing_manager).unwrap(), vec![alice_name]);
    assert_eq!(alice_name.get_owners(&snapshot, &thing_manager).unwrap(), vec![Thing::from(alice)]);
    assert!(alice_name.get_has(&snapshot, &thing_manager).unwrap().is_empty());

    let result = acme.set_has(&mut snapshot, &thing_manager, alice_name);
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation { kgraph_source: DataValidationError::HasNotPermitted { .. } })
    ));

    alice.unset_has(&mut snapshot, &thing_manager, alice_name).unwrap();
    assert!(alice.get_has(&snapshot, &thing_manager).unwrap().is_empty());
    assert!(ownership.is_deleted(&snapshot));
}

#[test]
fn ownership_of_a_subtype_uses_the_inherited_declaration() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let nickname =
        type_manager.create_attribute_type(&mut snapshot, &Label::build("nickname"), ValueType::String).unwrap();
    nickname.set_supertype(&mut snapshot, &type_manager, name).unwrap();
    let implicit_has = person.set_has(&mut snapshot, &type_manager, name).unwrap();

    let alice = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let ali = thing_manager.put_attribute(&mut snapshot, nickname, "Ali").unwrap();
    let ownership = alice.set_has(&mut snapshot, &thing_manager, ali).unwrap();

    assert_eq!(ownership.get_type(&snapshot, &thing_manager).unwrap(), ThingType::from(implicit_has.relation_type()));
    assert_eq!(alice.get_has(&snapshot, &thing_manager).unwrap(), vec![ali]);
    commit(snapshot);
}

#[test]
fn implicit_types_are_only_instantiated_through_has() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    let implicit_has = person.set_has(&mut snapshot, &type_manager, name).unwrap();
    let friendship = type_manager.create_relation_type(&mut snapshot, &Label::build("friendship")).unwrap();
    let friend = type_manager.create_role_type(&mut snapshot, &Label::build("friend")).unwrap();
    friendship.set_relates(&mut snapshot, &type_manager, friend).unwrap();

    let result = thing_manager.create_relation(&mut snapshot, implicit_has.relation_type());
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation {
            kgraph_source: DataValidationError::CannotCreateInstanceOfImplicitType { .. }
        })
    ));

    let alice = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let friends = thing_manager.create_relation(&mut snapshot, friendship).unwrap();
    let result = friends.add_player(&mut snapshot, &thing_manager, implicit_has.owner_role(), alice);
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation {
            kgraph_source: DataValidationError::ImplicitRoleCastingNotPermitted { .. }
        })
    ));
}

#[test]
fn deleting_an_owner_deletes_its_ownerships() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let name = type_manager.create_attribute_type(&mut snapshot, &Label::build("name"), ValueType::String).unwrap();
    person.set_has(&mut snapshot, &type_manager, name).unwrap();

    let alice = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let alice_name = thing_manager.put_attribute(&mut snapshot, name, "Alice").unwrap();
    let ownership = alice.set_has(&mut snapshot, &thing_manager, alice_name).unwrap();

    alice.delete(&mut snapshot, &thing_manager).unwrap();
    assert!(alice.is_deleted(&snapshot));
    assert!(ownership.is_deleted(&snapshot));
    assert!(!alice_name.is_deleted(&snapshot));
    assert!(alice_name.get_owners(&snapshot, &thing_manager).unwrap().is_empty());

    let result = alice.delete(&mut snapshot, &thing_manager);
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation { kgraph_source: DataValidationError::ConceptDeleted { .. } })
    ));
    commit(snapshot);
}

#[test]
fn finalise_deletes_relations_without_players() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let friendship = type_manager.create_relation_type(&mut snapshot, &Label::build("friendship")).unwrap();
    let friend = type_manager.create_role_type(&mut snapshot, &Label::build("friend")).unwrap();
    friendship.set_relates(&mut snapshot, &type_manager, friend).unwrap();
    person.set_plays(&mut snapshot, &type_manager, friend, false).unwrap();

    let alice = thing_manager.create_entity(&mut snapshot, person).unwrap();
    let kept = thing_manager.create_relation(&mut snapshot, friendship).unwrap();
    kept.add_player(&mut snapshot, &thing_manager, friend, alice).unwrap();
    let emptied = thing_manager.create_relation(&mut snapshot, friendship).unwrap();
    emptied.add_player(&mut snapshot, &thing_manager, friend, alice).unwrap();
    emptied.remove_player(&mut snapshot, &thing_manager, friend, alice).unwrap();
    let never_filled = thing_manager.create_relation(&mut snapshot, friendship).unwrap();

    thing_manager.finalise(&mut snapshot).unwrap();
    assert!(!kept.is_deleted(&snapshot));
    assert!(emptied.is_deleted(&snapshot));
    assert!(never_filled.is_deleted(&snapshot));
    assert_eq!(friendship.get_instances(&snapshot, &thing_manager).unwrap(), vec![kept]);
}

#[test]
fn rules_are_unique_per_pattern_pair() {
    init_logging();
    let store = setup_concept_store();
    let (type_manager, thing_manager) = load_managers(false);
    let mut snapshot = open_schema_snapshot(&store);

    let person = type_manager.create_entity_type(&mut snapshot, &Label::build("person")).unwrap();
    let friendship = type_manager.create_relation_type(&mut snapshot, &Label::build("friendship")).unwrap();
    let friend = type_manager.create_role_type(&mut snapshot, &Label::build("friend")).unwrap();
    friendship.set_relates(&mut snapshot, &type_manager, friend).unwrap();
    person.set_plays(&mut snapshot, &type_manager, friend, false).unwrap();
    let inference_rule = type_manager.get_rule_type(&snapshot, &Label::build("inference-rule")).unwrap().unwrap();

    let lhs = Pattern::new().isa("$x", "person").isa("$y", "person");
    let rhs = Pattern::new().isa("$f", "friendship").links("$f", "friend", "$x").links("$f", "friend", "$y");
    let rule = thing_manager.put_rule(&mut snapshot, inference_rule, lhs.clone(), rhs.clone()).unwrap();
    let again = thing_manager.put_rule(&mut snapshot, inference_rule, lhs.clone(), rhs.clone()).unwrap();
    assert_eq!(rule, again);
    assert_eq!(rule.get_type(&snapshot, &thing_manager).unwrap(), inference_rule);
    assert_eq!(rule.get_lhs(&snapshot, &thing_manager).unwrap(), &lhs);
    assert_eq!(rule.get_rhs(&snapshot, &thing_manager).unwrap(), &rhs);
    assert_eq!(inference_rule.get_rules(&snapshot, &thing_manager).unwrap(), vec![rule]);

    let result = thing_manager.put_rule(&mut snapshot, inference_rule, Pattern::new(), rhs.clone());
    assert!(matches!(
        result,
        Err(ConceptWriteError::DataValidation { kgraph_source: DataValidationError::RuleWithEmptyPattern { .. } })
    ));

    // roles are not collected as rule types
    thing_manager.compute_rule_types(&mut snapshot).unwrap();
    assert_eq!(
        rule.get_hypothesis_types(&snapshot, &thing_manager).unwrap().iter().copied().collect::<Vec<_>>(),
        vec![person.vertex()]
    );
    assert_eq!(
        rule.get_conclusion_types(&snapshot, &thing_manager).unwrap().iter().copied().collect::<Vec<_>>(),
        vec![friendship.vertex()]
    );
    let root_rule = type_manager.get_rule_type(&snapshot, &Label::build("rule")).unwrap().unwrap();
    assert!(inference_rule.delete(&mut snapshot, &type_manager).is_err());
    assert!(root_rule.get_rules(&snapshot, &thing_manager).unwrap().contains(&rule));

    commit(snapshot);
}
