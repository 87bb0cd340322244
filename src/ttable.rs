/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{tune, Move, Score};

/// How a stored value bounds the true minimax value of its node.
///
/// See [CPW](https://www.chessprogramming.org/Node_Types) for more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// The true value is at least `value` (a cut-node).
    Lower,

    /// `value` is the true minimax value at `depth`.
    Exact,

    /// The true value is at most `value` (an all-node).
    Upper,
}

/// An entry in the transposition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TTableEntry {
    /// Full hash of the position this entry describes. Verified on probe,
    /// since slots are shared.
    pub hash: u64,

    /// Depth the entry was searched to.
    pub depth: u16,

    /// Value found at that depth.
    pub value: Score,

    /// How `value` bounds the true value.
    pub bound: Bound,

    /// Best move found for this position.
    pub best_move: Move,

    /// Principal variation from this position, starting with `best_move`.
    pub pv: Vec<Move>,
}

/// Transposition table: a direct-mapped, always-replace cache of search
/// results keyed by Zobrist hash.
///
/// Avoids re-searching positions reached through transposed move orders.
/// Not thread-safe; the searcher owning it is single-threaded.
#[derive(Debug)]
pub struct TTable {
    slots: Vec<Option<TTableEntry>>,
}

impl TTable {
    /// Default number of slots.
    pub const DEFAULT_CAPACITY: usize = tune::ttable_capacity!();

    /// Create a new [`TTable`] with `capacity` slots.
    ///
    /// `capacity` must be a power of two, since indexing masks the hash.
    #[inline(always)]
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "table capacity must be a power of two, got {capacity}"
        );
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Returns the number of slots in this [`TTable`].
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline(always)]
    pub fn num_entries(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Clears every entry.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Map `hash` to an index into this [`TTable`].
    #[inline(always)]
    fn index(&self, hash: u64) -> usize {
        hash as usize & (self.capacity() - 1)
    }

    /// Get the entry for `hash`, if and only if one was stored for it.
    ///
    /// A slot occupied by a different position (same index, different hash)
    /// is a miss.
    #[inline(always)]
    pub fn get(&self, hash: u64) -> Option<&TTableEntry> {
        self.slots[self.index(hash)]
            .as_ref()
            .filter(|entry| entry.hash == hash)
    }

    /// Store `entry` at its slot, replacing whatever was there.
    #[inline(always)]
    pub fn store(&mut self, entry: TTableEntry) {
        let index = self.index(entry.hash);
        self.slots[index] = Some(entry);
    }
}

impl Default for TTable {
    #[inline(always)]
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
