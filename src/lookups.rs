#![allow(clippy::cast_possible_truncation)]

use crate::{
    piece::TAG_SPACE,
    rng::XorShiftState,
    types::{File, NUM_SQUARES},
};

/// En-passant keys are indexed by the biased file (file + 1), so the table
/// carries one unused slot at zero.
pub const NUM_EP_KEYS: usize = File::COUNT + 1;

type PieceKeys = [[[u64; NUM_SQUARES]; 2]; TAG_SPACE];

const fn init_hash_keys() -> (PieceKeys, [u64; NUM_EP_KEYS], [u64; 16], u64) {
    let mut state = XorShiftState::new();
    let mut piece_keys = [[[0; NUM_SQUARES]; 2]; TAG_SPACE];
    cfor!(let mut tag = 0; tag < TAG_SPACE; tag += 1; {
        cfor!(let mut colour = 0; colour < 2; colour += 1; {
            cfor!(let mut sq = 0; sq < NUM_SQUARES; sq += 1; {
                let key;
                (key, state) = state.next_self();
                piece_keys[tag][colour][sq] = key;
            });
        });
    });
    let mut ep_keys = [0; NUM_EP_KEYS];
    cfor!(let mut file = 0; file < NUM_EP_KEYS; file += 1; {
        let key;
        (key, state) = state.next_self();
        ep_keys[file] = key;
    });
    let mut castle_keys = [0; 16];
    cfor!(let mut index = 0; index < 16; index += 1; {
        let key;
        (key, state) = state.next_self();
        castle_keys[index] = key;
    });
    let key;
    (key, _) = state.next_self();
    let side_key = key;
    (piece_keys, ep_keys, castle_keys, side_key)
}

pub static PIECE_KEYS: PieceKeys = init_hash_keys().0;
pub static EP_FILE_KEYS: [u64; NUM_EP_KEYS] = init_hash_keys().1;
pub static CASTLE_KEYS: [u64; 16] = init_hash_keys().2;
pub const SIDE_KEY: u64 = init_hash_keys().3;
