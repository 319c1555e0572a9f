/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![deny(unused_must_use)]
#![deny(elided_lifetimes_in_paths)]

use std::{fmt, hash::Hash};

pub mod error;
pub mod graph;
pub mod label;
pub mod rule;
pub mod thing;
pub mod type_;
pub mod validation;

/// Marker for every copyable concept handle: types, things, castings and rules.
pub trait ConceptAPI: Copy + Eq + Ord + Hash + fmt::Debug {}
