/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use concept::{
    error::ConceptWriteError,
    graph::{
        snapshot::{ReadSnapshot, ReadableSnapshot, SequenceNumber, WriteSnapshot},
        store::ConceptStore,
    },
    type_::type_manager::TypeManager,
};
use error::kgraph_error;
use tracing::{event, Level};

use crate::transaction::TransactionError;

/// The committed graph of one database. Transactions work on private copies and install them on commit.
pub struct Database {
    name: String,
    committed: RwLock<CommittedState>,
}

struct CommittedState {
    sequence_number: SequenceNumber,
    store: Arc<ConceptStore>,
}

impl Database {
    pub fn new(name: impl AsRef<str>) -> Result<Self, DatabaseCreateError> {
        let name = name.as_ref().to_owned();
        let store = TypeManager::initialise_types(&ConceptStore::new())
            .map_err(|source| DatabaseCreateError::SchemaInitialisation { name: name.clone(), kgraph_source: source })?;
        event!(Level::INFO, "Created database '{}'", name);
        Ok(Self {
            name,
            committed: RwLock::new(CommittedState { sequence_number: SequenceNumber::MIN, store: Arc::new(store) }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence_number(&self) -> SequenceNumber {
        self.committed.read().unwrap_or_else(PoisonError::into_inner).sequence_number
    }

    pub(crate) fn committed(&self) -> (SequenceNumber, Arc<ConceptStore>) {
        let committed = self.committed.read().unwrap_or_else(PoisonError::into_inner);
        (committed.sequence_number, committed.store.clone())
    }

    pub(crate) fn open_snapshot_read(&self) -> ReadSnapshot {
        let (sequence_number, store) = self.committed();
        ReadSnapshot::new(store, sequence_number)
    }

    pub(crate) fn open_snapshot_write(&self, schema_writable: bool) -> WriteSnapshot {
        let (sequence_number, store) = self.committed();
        WriteSnapshot::new(&store, sequence_number, schema_writable)
    }

    /// Makes the snapshot the committed state, unless another commit landed after it was opened.
    pub(crate) fn install(&self, snapshot: WriteSnapshot) -> Result<SequenceNumber, TransactionError> {
        let open_sequence_number = snapshot.open_sequence_number();
        let mut committed = self.committed.write().unwrap_or_else(PoisonError::into_inner);
        if committed.sequence_number != open_sequence_number {
            event!(
                Level::DEBUG,
                "Rejected commit to '{}' opened at {}: database is at {}",
                self.name,
                open_sequence_number,
                committed.sequence_number
            );
            return Err(TransactionError::ConcurrentCommit { database: self.name.clone() });
        }
        let (store, _) = snapshot.into_parts();
        committed.sequence_number = committed.sequence_number.next();
        committed.store = Arc::new(store);
        event!(Level::INFO, "Committed to database '{}' at {}", self.name, committed.sequence_number);
        Ok(committed.sequence_number)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").field("name", &self.name).field("sequence_number", &self.sequence_number()).finish()
    }
}

kgraph_error!(
    pub DatabaseCreateError(component = "Database create", prefix = "DBC") {
        SchemaInitialisation(1, "Failed to initialise the meta schema of database '{name}'.", name: String, ( kgraph_source: ConceptWriteError )),
    }
);
