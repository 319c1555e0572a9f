/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{
    error::ConceptReadError,
    graph::{snapshot::WritableSnapshot, store::TypeProperties, Kind, TypeVertex},
    label::Label,
    type_::attribute_type::ValueType,
};

// Raw graph writes. Callers are responsible for validation and for recording changes.
pub(crate) struct TypeWriter {}

impl TypeWriter {
    pub(crate) fn storage_put_type(
        snapshot: &mut impl WritableSnapshot,
        label: &Label,
        kind: Kind,
        is_root: bool,
        is_implicit: bool,
        value_type: Option<ValueType>,
    ) -> TypeVertex {
        snapshot.store_mut().insert_type(TypeProperties {
            label: label.clone(),
            kind,
            is_root,
            is_abstract: is_root,
            is_implicit,
            value_type,
        })
    }

    pub(crate) fn storage_put_supertype(snapshot: &mut impl WritableSnapshot, subtype: TypeVertex, supertype: TypeVertex) {
        let store = snapshot.store_mut();
        store.sub.delete_all_from(subtype);
        store.sub.put(subtype, supertype);
    }

    pub(crate) fn storage_set_abstract(
        snapshot: &mut impl WritableSnapshot,
        type_: TypeVertex,
        is_abstract: bool,
    ) -> Result<(), ConceptReadError> {
        snapshot.store_mut().get_type_mut(type_)?.is_abstract = is_abstract;
        Ok(())
    }

    pub(crate) fn storage_set_label(
        snapshot: &mut impl WritableSnapshot,
        type_: TypeVertex,
        label: &Label,
    ) -> Result<(), ConceptReadError> {
        snapshot.store_mut().relabel_type(type_, label.clone())
    }

    pub(crate) fn storage_put_relates(
        snapshot: &mut impl WritableSnapshot,
        relation_type: TypeVertex,
        role_type: TypeVertex,
    ) -> bool {
        snapshot.store_mut().relates.put(relation_type, role_type)
    }

    pub(crate) fn storage_delete_relates(
        snapshot: &mut impl WritableSnapshot,
        relation_type: TypeVertex,
        role_type: TypeVertex,
    ) -> bool {
        snapshot.store_mut().relates.delete(relation_type, role_type)
    }

    pub(crate) fn storage_put_plays(
        snapshot: &mut impl WritableSnapshot,
        player: TypeVertex,
        role_type: TypeVertex,
        required: bool,
    ) {
        let store = snapshot.store_mut();
        store.plays.put(player, role_type);
        if required {
            store.plays_required.insert((player, role_type));
        } else {
            store.plays_required.remove(&(player, role_type));
        }
    }

    pub(crate) fn storage_delete_plays(
        snapshot: &mut impl WritableSnapshot,
        player: TypeVertex,
        role_type: TypeVertex,
    ) -> bool {
        let store = snapshot.store_mut();
        store.plays_required.remove(&(player, role_type));
        store.plays.delete(player, role_type)
    }

    pub(crate) fn storage_delete_type(snapshot: &mut impl WritableSnapshot, type_: TypeVertex) {
        snapshot.store_mut().remove_type(type_);
    }
}
