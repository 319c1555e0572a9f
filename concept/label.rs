/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Label {
    name: String,
}

impl Label {
    pub fn build(name: &str) -> Self {
        Self { name: name.to_owned() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::build(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self { name }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label[{}]", self.name)
    }
}
