/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use logger::{debug, trace};

use crate::{
    error::ConceptReadError,
    graph::{
        change_tracker::ConceptCategory,
        snapshot::{ReadableSnapshot, WritableSnapshot},
    },
    thing::{
        thing_manager::validation::commit_time_validation::CommitTimeValidation as DataCommitTimeValidation,
        ThingAPI,
    },
    type_::{type_manager::validation::commit_time_validation::CommitTimeValidation as SchemaCommitTimeValidation, TypeAPI},
    validation::ValidationReport,
};

/// Runs every commit-time check over the concepts a transaction modified.
///
/// Categories are visited in [`ConceptCategory::VALIDATION_ORDER`]. Checks never short-circuit each
/// other: every violation found is reported. Concepts deleted since they were recorded are skipped.
/// The validator keeps no state, so it may be re-run against the same open transaction.
pub struct Validator {}

impl Validator {
    pub fn validate(snapshot: &impl WritableSnapshot) -> Result<ValidationReport, ConceptReadError> {
        let mut report = ValidationReport::new();
        for category in ConceptCategory::VALIDATION_ORDER {
            let before = report.len();
            Self::validate_category(snapshot, category, &mut report)?;
            trace!(
                "Validated {} modified concepts of category '{}': {} violations",
                snapshot.changes().count(category),
                category,
                report.len() - before
            );
        }
        if !report.is_empty() {
            debug!("Validation found {} violations", report.len());
        }
        Ok(report)
    }

    fn validate_category(
        snapshot: &impl WritableSnapshot,
        category: ConceptCategory,
        report: &mut ValidationReport,
    ) -> Result<(), ConceptReadError> {
        let changes = snapshot.changes();
        match category {
            ConceptCategory::Entity => {
                for entity in changes.modified_entities().filter(|entity| !entity.is_deleted(snapshot)) {
                    report.extend(DataCommitTimeValidation::validate_thing_plays_required_roles(
                        snapshot,
                        entity.into_thing(),
                    )?);
                }
            }
            ConceptCategory::Attribute => {
                for attribute in changes.modified_attributes().filter(|attribute| !attribute.is_deleted(snapshot)) {
                    report.extend(DataCommitTimeValidation::validate_thing_plays_required_roles(
                        snapshot,
                        attribute.into_thing(),
                    )?);
                }
            }
            ConceptCategory::RoleType => {
                for role_type in changes.modified_role_types().filter(|role_type| Self::type_exists(snapshot, *role_type)) {
                    report.extend(SchemaCommitTimeValidation::validate_role_type_is_related_once(snapshot, role_type)?);
                }
            }
            ConceptCategory::Casting => {
                for casting in changes.modified_castings().filter(|casting| casting.is_current(snapshot)) {
                    report.extend(DataCommitTimeValidation::validate_casting_plays_structure(snapshot, casting)?);
                }
            }
            ConceptCategory::RelationType => {
                for relation_type in
                    changes.modified_relation_types().filter(|relation_type| Self::type_exists(snapshot, *relation_type))
                {
                    report.extend(SchemaCommitTimeValidation::validate_relation_type_has_roles(snapshot, relation_type)?);
                    report.extend(SchemaCommitTimeValidation::validate_relation_type_role_hierarchy(
                        snapshot,
                        relation_type,
                    )?);
                }
            }
            ConceptCategory::Relation => {
                for relation in changes.modified_relations().filter(|relation| !relation.is_deleted(snapshot)) {
                    report.extend(DataCommitTimeValidation::validate_thing_plays_required_roles(
                        snapshot,
                        relation.into_thing(),
                    )?);
                    report.extend(DataCommitTimeValidation::validate_relation_cardinality(snapshot, relation)?);
                    report.extend(DataCommitTimeValidation::validate_relation_roles_are_related(snapshot, relation)?);
                    report.extend(DataCommitTimeValidation::validate_relation_is_unique(snapshot, relation)?);
                }
            }
            ConceptCategory::Rule => {
                for rule in changes.modified_rules().filter(|rule| !rule.is_deleted(snapshot)) {
                    report.extend(SchemaCommitTimeValidation::validate_rule_schema_elements_exist(snapshot, rule)?);
                }
            }
        }
        Ok(())
    }

    fn type_exists(snapshot: &impl ReadableSnapshot, type_: impl TypeAPI) -> bool {
        snapshot.store().type_exists(type_.vertex())
    }
}
