/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod transaction {
    use std::time::Duration;

    pub const DEFAULT_TRANSACTION_TIMEOUT_MILLIS: u64 = Duration::from_secs(5 * 60).as_millis() as u64;
    pub const DEFAULT_SHOW_IMPLICIT_CONCEPTS: bool = false;
}

pub mod concept {
    pub const ROOT_ENTITY_LABEL: &str = "entity";
    pub const ROOT_RELATION_LABEL: &str = "relation";
    pub const ROOT_ROLE_LABEL: &str = "role";
    pub const ROOT_ATTRIBUTE_LABEL: &str = "attribute";
    pub const ROOT_RULE_LABEL: &str = "rule";

    pub const INFERENCE_RULE_LABEL: &str = "inference-rule";
    pub const CONSTRAINT_RULE_LABEL: &str = "constraint-rule";

    // Implicit has/key schema: `<prefix>-<attribute>` and `<prefix>-<attribute>-<suffix>`
    pub const IMPLICIT_HAS_PREFIX: &str = "has";
    pub const IMPLICIT_KEY_PREFIX: &str = "key";
    pub const IMPLICIT_OWNER_SUFFIX: &str = "owner";
    pub const IMPLICIT_VALUE_SUFFIX: &str = "value";
}
