use arrayvec::ArrayVec;

use crate::types::Square;

/// Capacity of a single location list. The largest per-type population is
/// the knight's: four starters plus every pawn promoted.
pub const LIST_CAPACITY: usize = 28;

/// The squares occupied by one (piece type, colour) pair. Entry order is
/// never meaningful; removal swaps with the last entry.
#[derive(Clone, Debug, Default)]
pub struct PieceList {
    data: ArrayVec<Square, LIST_CAPACITY>,
}

impl PieceList {
    pub const fn new() -> Self {
        Self {
            data: ArrayVec::new_const(),
        }
    }

    pub fn insert(&mut self, sq: Square) {
        debug_assert!(
            !self.data.contains(&sq),
            "PieceList already contains {sq}: {:?}",
            self.data
        );
        self.data.push(sq);
    }

    pub fn remove(&mut self, sq: Square) {
        let idx = self.data.iter().position(|&s| s == sq);
        debug_assert!(
            idx.is_some(),
            "PieceList::remove: no entry for {sq} in {:?}",
            self.data
        );
        if let Some(idx) = idx {
            self.data.swap_remove(idx);
        }
    }

    /// Fused remove+insert: rewrites the matching entry in place so the
    /// list never passes through a state where the piece is nowhere.
    pub fn relocate(&mut self, from: Square, to: Square) {
        let entry = self.data.iter_mut().find(|s| **s == from);
        debug_assert!(
            entry.is_some(),
            "PieceList::relocate: no entry for {from}"
        );
        if let Some(entry) = entry {
            *entry = to;
        }
    }

    pub fn contains(&self, sq: Square) -> bool {
        self.data.contains(&sq)
    }

    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.data.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}
