//! Slab of fixed-size item slots
//!
//! Items are addressed by `ItemId` handles instead of pointers. Freed slots
//! are threaded on a free list and handed out again before the slab grows.

use crate::error::{AddError, KHashMapError};
use crate::types::Key;
use std::mem;
use std::num::NonZeroUsize;

/// Handle of an item slot
///
/// Stored as index + 1 so that `Option<ItemId>` keeps the size of a `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct ItemId(NonZeroUsize);

impl ItemId {
    #[inline]
    fn from_index(index: usize) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroUsize::new).map(ItemId)
    }

    #[inline]
    fn index(self) -> usize {
        self.0.get() - 1
    }
}

/// Chain link: a bucket head or an item's successor, `None` ends the chain
pub(crate) type Link = Option<ItemId>;

/// Key/value item linked into exactly one chain
pub(crate) struct Item<V> {
    pub(crate) key: Key,
    pub(crate) value: V,
    pub(crate) next: Link,
}

enum Slot<V> {
    Occupied(Item<V>),
    Vacant { next_free: Link },
}

pub(crate) struct ItemCache<V> {
    slots: Vec<Slot<V>>,
    /// Head of the free-slot list
    free: Link,
}

impl<V> ItemCache<V> {
    pub(crate) const fn new() -> Self {
        ItemCache {
            slots: Vec::new(),
            free: None,
        }
    }

    /// Store a new item and return its handle
    ///
    /// On failure nothing is modified and `value` is handed back.
    pub(crate) fn alloc(
        &mut self,
        key: Key,
        value: V,
        next: Link,
    ) -> Result<ItemId, AddError<V>> {
        if let Some(id) = self.free {
            let slot = &mut self.slots[id.index()];
            let Slot::Vacant { next_free } = *slot else {
                unreachable!("free list points at a live item");
            };
            *slot = Slot::Occupied(Item { key, value, next });
            self.free = next_free;
            return Ok(id);
        }

        let Some(id) = ItemId::from_index(self.slots.len()) else {
            return Err(AddError::new(KHashMapError::OutOfMemory, value));
        };
        if self.slots.try_reserve(1).is_err() {
            return Err(AddError::new(KHashMapError::OutOfMemory, value));
        }
        self.slots.push(Slot::Occupied(Item { key, value, next }));
        Ok(id)
    }

    /// Release the slot of `id`, handing its value back
    pub(crate) fn free(&mut self, id: ItemId) -> V {
        let vacant = Slot::Vacant {
            next_free: self.free,
        };
        match mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied(item) => {
                self.free = Some(id);
                item.value
            }
            Slot::Vacant { .. } => unreachable!("double free of item slot"),
        }
    }

    /// Live item behind `id`
    #[inline]
    pub(crate) fn get(&self, id: ItemId) -> Option<&Item<V>> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(item)) => Some(item),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item<V>> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(item)) => Some(item),
            _ => None,
        }
    }

    /// Drop every slot and give the memory back
    pub(crate) fn clear(&mut self) {
        self.slots = Vec::new();
        self.free = None;
    }
}
