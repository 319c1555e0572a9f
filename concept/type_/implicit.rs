/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use resource::concept::{
    IMPLICIT_HAS_PREFIX, IMPLICIT_KEY_PREFIX, IMPLICIT_OWNER_SUFFIX, IMPLICIT_VALUE_SUFFIX,
};

use crate::{
    label::Label,
    type_::{relation_type::RelationType, role_type::RoleType},
};

/// Labels of the implicit relation type and roles standing for ownership of one attribute type.
///
/// A plain `has` of attribute type `name` is modelled as relation type `has-name` relating
/// `has-name-owner` and `has-name-value`. A `key` uses the `key` prefix instead.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ImplicitLabels {
    pub relation: Label,
    pub owner: Label,
    pub value: Label,
}

impl ImplicitLabels {
    pub fn new(attribute_label: &Label, required: bool) -> Self {
        let prefix = if required { IMPLICIT_KEY_PREFIX } else { IMPLICIT_HAS_PREFIX };
        let relation = format!("{prefix}-{}", attribute_label.name());
        Self {
            owner: Label::from(format!("{relation}-{IMPLICIT_OWNER_SUFFIX}")),
            value: Label::from(format!("{relation}-{IMPLICIT_VALUE_SUFFIX}")),
            relation: Label::from(relation),
        }
    }

    /// Whether `role` is the value role of the implicit relation type labelled `relation`.
    pub(crate) fn is_value_role(relation: &Label, role: &Label) -> bool {
        role.name().strip_prefix(relation.name()).and_then(|suffix| suffix.strip_prefix('-'))
            == Some(IMPLICIT_VALUE_SUFFIX)
    }
}

/// The implicit relation type and its two roles, as synthesized for one attribute type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImplicitHas {
    relation_type: RelationType,
    owner_role: RoleType,
    value_role: RoleType,
}

impl ImplicitHas {
    pub(crate) fn new(relation_type: RelationType, owner_role: RoleType, value_role: RoleType) -> Self {
        Self { relation_type, owner_role, value_role }
    }

    pub fn relation_type(&self) -> RelationType {
        self.relation_type
    }

    pub fn owner_role(&self) -> RoleType {
        self.owner_role
    }

    pub fn value_role(&self) -> RoleType {
        self.value_role
    }
}

#[cfg(test)]
mod tests {
    use super::ImplicitLabels;
    use crate::label::Label;

    #[test]
    fn has_and_key_labels_use_distinct_prefixes() {
        let name = Label::build("name");
        let has = ImplicitLabels::new(&name, false);
        assert_eq!(has.relation, Label::build("has-name"));
        assert_eq!(has.owner, Label::build("has-name-owner"));
        assert_eq!(has.value, Label::build("has-name-value"));

        let key = ImplicitLabels::new(&name, true);
        assert_eq!(key.relation, Label::build("key-name"));
        assert_eq!(key.owner, Label::build("key-name-owner"));
        assert_eq!(key.value, Label::build("key-name-value"));
    }
}
