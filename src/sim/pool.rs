//! Fixed-capacity entity pools
//!
//! Slots are allocated once at construction and never grow. Allocation is a
//! linear scan for the first inactive slot; slot indices are stable for the
//! lifetime of the pool so renderers may cache per-slot handles.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// An entity that can live in a [`Pool`] slot
pub trait Slot: Default {
    fn is_active(&self) -> bool;
    fn deactivate(&mut self);
}

/// Fixed-capacity arena with an active/inactive tag per slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Slot> Pool<T> {
    /// Create a pool of `capacity` inactive slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| T::default()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// Index of the first inactive slot at or after `start`
    pub fn first_free_from(&self, start: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, s)| !s.is_active())
            .map(|(i, _)| i)
    }

    /// Place `entity` into the first free slot. Returns `None` (and drops the
    /// entity) when the pool is full.
    pub fn spawn(&mut self, entity: T) -> Option<usize> {
        self.spawn_from(0, entity)
    }

    /// Like [`Pool::spawn`] but only considers slots at or after `start`
    pub fn spawn_from(&mut self, start: usize, entity: T) -> Option<usize> {
        let index = self.first_free_from(start)?;
        self.slots[index] = entity;
        Some(index)
    }

    /// Deactivate every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.deactivate();
        }
    }

    /// All slots, active or not, in index order
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Active slots with their indices
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.is_active())
    }
}

impl<T> Index<usize> for Pool<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.slots[index]
    }
}

impl<T> IndexMut<usize> for Pool<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Token {
        active: bool,
        tag: u32,
    }

    impl Slot for Token {
        fn is_active(&self) -> bool {
            self.active
        }

        fn deactivate(&mut self) {
            self.active = false;
        }
    }

    fn live(tag: u32) -> Token {
        Token { active: true, tag }
    }

    #[test]
    fn test_spawn_uses_first_free_slot() {
        let mut pool = Pool::<Token>::with_capacity(3);
        assert_eq!(pool.spawn(live(1)), Some(0));
        assert_eq!(pool.spawn(live(2)), Some(1));
        pool[0].deactivate();
        assert_eq!(pool.spawn(live(3)), Some(0));
        assert_eq!(pool[0].tag, 3);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_full_pool_drops_spawn() {
        let mut pool = Pool::<Token>::with_capacity(2);
        pool.spawn(live(1));
        pool.spawn(live(2));
        assert_eq!(pool.spawn(live(3)), None);
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.capacity(), 2);
        assert!(pool.iter_active().all(|(_, t)| t.tag != 3));
    }

    #[test]
    fn test_spawn_from_skips_earlier_slots() {
        let mut pool = Pool::<Token>::with_capacity(4);
        assert_eq!(pool.spawn_from(2, live(9)), Some(2));
        assert_eq!(pool.spawn_from(2, live(10)), Some(3));
        assert_eq!(pool.spawn_from(2, live(11)), None);
        assert_eq!(pool.first_free_from(0), Some(0));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut pool = Pool::<Token>::with_capacity(5);
        for i in 0..5 {
            pool.spawn(live(i));
        }
        pool.clear();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.slots().len(), 5);
    }
}
