/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{sync::Arc, time::Instant};

use concept::{
    error::{ConceptReadError, ConceptWriteError},
    graph::snapshot::{ReadSnapshot, SequenceNumber, WritableSnapshot, WriteSnapshot},
    thing::thing_manager::ThingManager,
    type_::type_manager::TypeManager,
    validation::{validator::Validator, ValidationReport},
};
use error::kgraph_error;
use options::TransactionOptions;
use tracing::{event, Level};

use crate::Database;

#[derive(Debug)]
pub struct TransactionRead {
    pub snapshot: ReadSnapshot,
    pub type_manager: Arc<TypeManager>,
    pub thing_manager: Arc<ThingManager>,
    pub database: Arc<Database>,
    transaction_options: TransactionOptions,
}

impl TransactionRead {
    pub fn open(database: Arc<Database>, transaction_options: TransactionOptions) -> Self {
        let snapshot = database.open_snapshot_read();
        let (type_manager, thing_manager) = open_managers(&transaction_options);
        event!(Level::TRACE, "Opened read transaction on '{}'", database.name());
        Self { snapshot, type_manager, thing_manager, database, transaction_options }
    }

    pub fn type_manager(&self) -> &TypeManager {
        &self.type_manager
    }

    pub fn thing_manager(&self) -> &ThingManager {
        &self.thing_manager
    }

    pub fn options(&self) -> &TransactionOptions {
        &self.transaction_options
    }

    pub fn close(self) {
        drop(self)
    }
}

macro_rules! write_transaction {
    ($name:ident, $kind:literal, $schema_writable:literal) => {
        #[derive(Debug)]
        pub struct $name {
            pub snapshot: WriteSnapshot,
            pub type_manager: Arc<TypeManager>,
            pub thing_manager: Arc<ThingManager>,
            pub database: Arc<Database>,
            transaction_options: TransactionOptions,
            opened_at: Instant,
        }

        impl $name {
            pub fn open(database: Arc<Database>, transaction_options: TransactionOptions) -> Self {
                let snapshot = database.open_snapshot_write($schema_writable);
                let (type_manager, thing_manager) = open_managers(&transaction_options);
                event!(Level::TRACE, "Opened {} transaction on '{}'", $kind, database.name());
                Self { snapshot, type_manager, thing_manager, database, transaction_options, opened_at: Instant::now() }
            }

            pub fn type_manager(&self) -> &TypeManager {
                &self.type_manager
            }

            pub fn thing_manager(&self) -> &ThingManager {
                &self.thing_manager
            }

            pub fn options(&self) -> &TransactionOptions {
                &self.transaction_options
            }

            /// Runs commit-time validation against the current state without committing.
            pub fn validate(&self) -> Result<ValidationReport, TransactionError> {
                Validator::validate(&self.snapshot).map_err(|source| TransactionError::ConceptRead { kgraph_source: source })
            }

            pub fn commit(mut self) -> Result<SequenceNumber, TransactionError> {
                let result = prepare_commit(
                    &self.database,
                    &mut self.snapshot,
                    &self.thing_manager,
                    &self.transaction_options,
                    self.opened_at,
                );
                match result {
                    Ok(()) => self.database.install(self.snapshot),
                    Err(error) => {
                        event!(Level::DEBUG, "Aborted {} transaction on '{}': {}", $kind, self.database.name(), error);
                        Err(error)
                    }
                }
            }

            pub fn rollback(&mut self) {
                let (sequence_number, store) = self.database.committed();
                self.snapshot.reset(&store, sequence_number);
                event!(Level::DEBUG, "Rolled back {} transaction on '{}'", $kind, self.database.name());
            }

            pub fn close(self) {
                drop(self)
            }
        }
    };
}

write_transaction!(TransactionWrite, "write", false);
write_transaction!(TransactionSchema, "schema", true);

fn open_managers(transaction_options: &TransactionOptions) -> (Arc<TypeManager>, Arc<ThingManager>) {
    let type_manager = Arc::new(TypeManager::new(transaction_options.show_implicit_concepts));
    let thing_manager = Arc::new(ThingManager::new(type_manager.clone()));
    (type_manager, thing_manager)
}

fn prepare_commit(
    database: &Database,
    snapshot: &mut WriteSnapshot,
    thing_manager: &ThingManager,
    transaction_options: &TransactionOptions,
    opened_at: Instant,
) -> Result<(), TransactionError> {
    thing_manager.finalise(snapshot).map_err(|source| TransactionError::ConceptWrite { kgraph_source: source })?;
    let report =
        Validator::validate(&*snapshot).map_err(|source| TransactionError::ConceptRead { kgraph_source: source })?;
    if opened_at.elapsed() > transaction_options.transaction_timeout() {
        event!(Level::WARN, "Commit validation on '{}' finished after the transaction deadline", database.name());
        return Err(TransactionError::Timeout { timeout_millis: transaction_options.transaction_timeout_millis });
    }
    if !report.is_empty() {
        return Err(TransactionError::Validation { report });
    }
    if !snapshot.changes().is_empty() {
        thing_manager
            .compute_rule_types(snapshot)
            .map_err(|source| TransactionError::ConceptRead { kgraph_source: source })?;
    }
    Ok(())
}

kgraph_error!(
    pub TransactionError(component = "Transaction", prefix = "TXN") {
        Validation(1, "Commit rejected: the transaction would leave the graph invalid.\n{report}", report: ValidationReport),
        ConceptRead(2, "Transaction failed due to a concept read error.", ( kgraph_source: ConceptReadError )),
        ConceptWrite(3, "Transaction failed due to a concept write error.", ( kgraph_source: ConceptWriteError )),
        ConcurrentCommit(4, "Another transaction committed to database '{database}' after this transaction was opened.", database: String),
        Timeout(5, "Transaction timeout: commit validation finished after the {timeout_millis}ms deadline.", timeout_millis: u64),
    }
);

impl TransactionError {
    /// Only a lost commit race may succeed when the same work is retried in a fresh transaction.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentCommit { .. })
    }
}
