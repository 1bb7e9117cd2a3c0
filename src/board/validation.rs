#![cfg(debug_assertions)]

use crate::{
    board::Board,
    errors::PositionValidityError,
    piece::{Colour, Piece, PieceType},
    types::{File, Square},
};

impl Board {
    /// Cross-check every piece of mutually-dependent state. Runs around
    /// each apply/undo in debug builds; an `Err` means a bookkeeping bug,
    /// not a bad position.
    #[allow(clippy::cognitive_complexity)]
    pub fn check_validity(&self) -> Result<(), PositionValidityError> {
        // every list entry points at a matching board code
        for colour in Colour::all() {
            for piece_type in PieceType::all() {
                if piece_type == PieceType::King {
                    continue;
                }
                let list = self.piece_list(piece_type, colour);
                if list.len() > piece_type.max_population() {
                    return Err(format!(
                        "{colour} {piece_type} list over its population bound: {}",
                        list.len()
                    ));
                }
                let expected = Piece::new(colour, piece_type);
                for sq in list.iter() {
                    if self.piece_at(sq) != expected {
                        return Err(format!(
                            "piece list corrupt: expected {sq} to hold {expected:?}, found {:?}",
                            self.piece_at(sq)
                        ));
                    }
                }
            }
        }

        // each king on the board is the one its scalar slot tracks
        let mut kings_on_board = 0;
        for sq in Square::all() {
            let piece = self.piece_at(sq);
            if piece.piece_type() == Some(PieceType::King) {
                kings_on_board += 1;
                let colour = piece.colour().expect("king code carries a colour");
                if self.king_sq(colour) != sq {
                    return Err(format!(
                        "untracked {colour} king on {sq}: slot says {}",
                        self.king_sq(colour)
                    ));
                }
            }
        }

        // the lists plus the kings cover every occupied square exactly
        let listed: usize = Colour::all()
            .map(|colour| {
                PieceType::all()
                    .filter(|&pt| pt != PieceType::King)
                    .map(|pt| self.piece_list(pt, colour).len())
                    .sum::<usize>()
            })
            .sum();
        let occupied = Square::all()
            .filter(|&sq| !self.piece_at(sq).is_empty())
            .count();
        if listed + kings_on_board != occupied {
            return Err(format!(
                "list/board bijection broken: {listed} listed + {kings_on_board} kings != {occupied} occupied"
            ));
        }

        // the incremental hash matches a full recompute
        if self.generate_pos_key() != self.zobrist_key() {
            return Err(format!(
                "key corrupt: expected {:#018x}, got {:#018x}",
                self.generate_pos_key(),
                self.zobrist_key()
            ));
        }

        // game-state word sanity
        let state = self.game_state();
        if state.ep_file() > File::COUNT as u32 {
            return Err(format!(
                "en-passant file out of range: {}",
                state.ep_file()
            ));
        }

        // the stack always carries the load-time word plus one per move
        match self.history.last().copied() {
            None => return Err("no game-state history: board not loaded".to_string()),
            Some(top) if top != state => {
                return Err(format!(
                    "current game-state word {:#x} diverged from history top {:#x}",
                    state.bits(),
                    top.bits()
                ));
            }
            Some(_) => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;

    #[test]
    fn fresh_boards_are_not_valid_until_loaded() {
        let board = Board::new();
        assert!(board.check_validity().is_err());
        let board = Board::from_notation(Board::START_POSITION).unwrap();
        board.check_validity().unwrap();
    }
}
