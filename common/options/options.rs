/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use resource::transaction::{DEFAULT_SHOW_IMPLICIT_CONCEPTS, DEFAULT_TRANSACTION_TIMEOUT_MILLIS};

#[derive(Debug, Clone, Copy)]
pub struct TransactionOptions {
    /// List implicit has/key schema elements alongside user-declared ones.
    pub show_implicit_concepts: bool,
    pub transaction_timeout_millis: u64,
}

impl TransactionOptions {
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_millis)
    }
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            show_implicit_concepts: DEFAULT_SHOW_IMPLICIT_CONCEPTS,
            transaction_timeout_millis: DEFAULT_TRANSACTION_TIMEOUT_MILLIS,
        }
    }
}
