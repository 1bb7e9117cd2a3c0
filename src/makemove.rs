// move making doesn't actually happen here,
// it happens in board/mod.rs, but the hash-toggle
// primitives used by Board::make_move() live here.

use crate::{
    lookups::{CASTLE_KEYS, EP_FILE_KEYS, PIECE_KEYS, SIDE_KEY},
    piece::{Colour, PieceType},
    types::Square,
};

pub fn hash_piece(key: &mut u64, piece_type: PieceType, colour: Colour, sq: Square) {
    *key ^= PIECE_KEYS[piece_type.index()][colour.index()][sq];
}

pub fn hash_side(key: &mut u64) {
    *key ^= SIDE_KEY;
}

/// `ep_file` is the biased encoding stored in the game-state word
/// (file + 1); zero means "no en-passant file" and must not be hashed.
pub fn hash_ep(key: &mut u64, ep_file: u32) {
    debug_assert!(ep_file >= 1 && (ep_file as usize) < EP_FILE_KEYS.len());
    *key ^= EP_FILE_KEYS[ep_file as usize];
}

pub fn hash_castling(key: &mut u64, rights: u32) {
    debug_assert!((rights as usize) < CASTLE_KEYS.len());
    *key ^= CASTLE_KEYS[rights as usize];
}
