/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub use tracing::{debug, error, info, trace, warn};
use tracing::{subscriber::DefaultGuard, Subscriber};
use tracing_subscriber::{prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info";

fn subscriber() -> impl Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer())
}

/// Installs the subscriber for the current thread only; logging stops when the guard is dropped.
pub fn initialise_logging() -> DefaultGuard {
    tracing::subscriber::set_default(subscriber())
}

pub fn initialise_logging_global() {
    tracing::subscriber::set_global_default(subscriber()).expect("Failed to set up logging subscriber.");
}
