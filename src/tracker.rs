//! Per (mover, edge) memory of "was overlapping last frame".
//!
//! A mover resting exactly on an edge would otherwise re-trigger a collision
//! response every tick. The row for a mover is created when a roster refresh
//! first sees it and dropped by the refresh that no longer does; refresh is
//! the only cleanup path.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec;
use alloc::vec::Vec as AllocVec;

use crate::mover::MoverId;

#[derive(Clone, Debug, Default)]
pub struct CollisionTracker {
    rows: BTreeMap<MoverId, AllocVec<bool>>,
}

impl CollisionTracker {
    pub fn new() -> Self {
        CollisionTracker { rows: BTreeMap::new() }
    }

    /// Sync rows with the roster: add missing movers, drop absent ones, and
    /// grow every row to `edge_count` entries.
    pub fn refresh(&mut self, roster: &[MoverId], edge_count: usize) {
        let live: BTreeSet<MoverId> = roster.iter().copied().collect();
        self.rows.retain(|id, _| live.contains(id));
        for id in roster.iter() {
            let row = self.rows.entry(*id).or_insert_with(|| vec![false; edge_count]);
            if row.len() < edge_count {
                row.resize(edge_count, false);
            }
        }
    }

    /// False for unknown movers or edges.
    pub fn get(&self, mover: MoverId, edge: usize) -> bool {
        self.rows
            .get(&mover)
            .and_then(|row| row.get(edge).copied())
            .unwrap_or(false)
    }

    /// No-op for movers the last refresh did not see.
    pub fn set(&mut self, mover: MoverId, edge: usize, overlapping: bool) {
        if let Some(slot) = self.rows.get_mut(&mover).and_then(|row| row.get_mut(edge)) {
            *slot = overlapping;
        }
    }

    /// Read the flag and clear it.
    pub fn take(&mut self, mover: MoverId, edge: usize) -> bool {
        match self.rows.get_mut(&mover).and_then(|row| row.get_mut(edge)) {
            Some(slot) => core::mem::replace(slot, false),
            None => false,
        }
    }

    /// Whether the last refresh saw `mover`.
    pub fn contains(&self, mover: MoverId) -> bool {
        self.rows.contains_key(&mover)
    }

    pub fn tracked(&self) -> impl Iterator<Item = MoverId> + '_ {
        self.rows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
