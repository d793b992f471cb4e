// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use foldhash::HashMap;

use crate::{Instance, TypeKey};

/// One slot per requested type.
///
/// The cache does not judge liveness; a slot holding a dead host object stays until it is
/// overwritten or evicted.
#[derive(Debug, Default)]
pub(crate) struct InstanceCache {
    slots: HashMap<TypeKey, Instance>,
}

impl InstanceCache {
    pub(crate) fn get(&self, requested: TypeKey) -> Option<&Instance> {
        self.slots.get(&requested)
    }

    pub(crate) fn put(&mut self, requested: TypeKey, instance: Instance) {
        self.slots.insert(requested, instance);
    }

    pub(crate) fn evict(&mut self, requested: TypeKey) -> Option<Instance> {
        self.slots.remove(&requested)
    }

    pub(crate) fn contains(&self, requested: TypeKey) -> bool {
        self.slots.contains_key(&requested)
    }

    pub(crate) fn cached_types(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.slots.keys().copied()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
