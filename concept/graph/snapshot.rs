/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, sync::Arc};

use crate::graph::{
    change_tracker::{ChangeTracker, Concept},
    store::ConceptStore,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SequenceNumber {
    number: u64,
}

impl SequenceNumber {
    pub const MIN: SequenceNumber = SequenceNumber { number: 0 };

    pub const fn new(number: u64) -> Self {
        Self { number }
    }

    pub const fn number(&self) -> u64 {
        self.number
    }

    pub const fn next(&self) -> Self {
        Self { number: self.number + 1 }
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}

pub trait ReadableSnapshot {
    fn store(&self) -> &ConceptStore;

    fn open_sequence_number(&self) -> SequenceNumber;
}

pub trait WritableSnapshot: ReadableSnapshot {
    fn store_mut(&mut self) -> &mut ConceptStore;

    fn changes(&self) -> &ChangeTracker;

    fn record_change(&mut self, concept: impl Into<Concept>);

    fn is_schema_writable(&self) -> bool;
}

/// A read-only view of one committed version of the graph.
#[derive(Debug, Clone)]
pub struct ReadSnapshot {
    store: Arc<ConceptStore>,
    open_sequence_number: SequenceNumber,
}

impl ReadSnapshot {
    pub fn new(store: Arc<ConceptStore>, open_sequence_number: SequenceNumber) -> Self {
        Self { store, open_sequence_number }
    }
}

impl ReadableSnapshot for ReadSnapshot {
    fn store(&self) -> &ConceptStore {
        &self.store
    }

    fn open_sequence_number(&self) -> SequenceNumber {
        self.open_sequence_number
    }
}

/// A private working copy of the graph together with the record of what was changed in it.
#[derive(Debug)]
pub struct WriteSnapshot {
    store: ConceptStore,
    changes: ChangeTracker,
    schema_writable: bool,
    open_sequence_number: SequenceNumber,
}

impl WriteSnapshot {
    pub fn new(committed: &ConceptStore, open_sequence_number: SequenceNumber, schema_writable: bool) -> Self {
        Self { store: committed.clone(), changes: ChangeTracker::new(), schema_writable, open_sequence_number }
    }

    /// Discards every uncommitted write and the change record.
    pub fn reset(&mut self, committed: &ConceptStore, open_sequence_number: SequenceNumber) {
        self.store = committed.clone();
        self.changes.clear();
        self.open_sequence_number = open_sequence_number;
    }

    pub fn into_parts(self) -> (ConceptStore, ChangeTracker) {
        (self.store, self.changes)
    }
}

impl ReadableSnapshot for WriteSnapshot {
    fn store(&self) -> &ConceptStore {
        &self.store
    }

    fn open_sequence_number(&self) -> SequenceNumber {
        self.open_sequence_number
    }
}

impl WritableSnapshot for WriteSnapshot {
    fn store_mut(&mut self) -> &mut ConceptStore {
        &mut self.store
    }

    fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    fn record_change(&mut self, concept: impl Into<Concept>) {
        self.changes.record(concept);
    }

    fn is_schema_writable(&self) -> bool {
        self.schema_writable
    }
}
