pub mod validation;

use std::fmt::{self, Debug, Display, Formatter};

use crate::{
    chessmove::{Move, MoveFlag},
    errors::{FenParseError, MoveParseError},
    fen::{Fen, push_empty_run},
    gamestate::GameState,
    makemove::{hash_castling, hash_ep, hash_piece, hash_side},
    piece::{Colour, Piece, PieceType, TAG_SPACE},
    piecelist::PieceList,
    types::{File, NUM_SQUARES, Rank, Square},
};

/// Upper bound on the undo/repetition stacks; sized so a full game never
/// reallocates.
pub const MAX_GAME_MOVES: usize = 1024;

/// One location-list slot per (colour, tag) pair. The king tag and the two
/// unused tags own permanently empty slots so dispatch stays a flat index.
const NUM_PIECE_LISTS: usize = 2 * TAG_SPACE;

const fn sq(index: u16) -> Square {
    match Square::new(index) {
        Some(sq) => sq,
        None => panic!("square constant off the board"),
    }
}

/// The board-state engine: the square array, the per-(type, colour)
/// location lists, the two king squares, the packed game-state word with
/// its undo stack, the incremental position hash, and the repetition
/// history. One instance must be confined to one logical thread of
/// control; clone it to explore in parallel.
#[derive(Clone)]
pub struct Board {
    pieces: [Piece; NUM_SQUARES],
    king_sq: [Square; 2],
    side: Colour,
    state: GameState,
    ply: usize,
    fifty_move_counter: u32,
    key: u64,
    piece_lists: [PieceList; NUM_PIECE_LISTS],
    history: Vec<GameState>,
    repetition_history: Vec<u64>,
}

impl Board {
    /// The canonical starting notation: mirrored armies, silver generals
    /// written `<` and `>`, kings on m1 and m24.
    pub const START_POSITION: &'static str = "rmxxxxcfnnhikqnnfcxxxx>r/uljvwobzaadeedaazbowvjlu/pppppppppppppppppppppppp/888/888/888/888/888/888/888/888/888/888/888/888/888/888/888/888/888/888/PPPPPPPPPPPPPPPPPPPPPPPP/ULJVWOBZAADEEDAAZBOWVJLU/R<XXXXCFNNHIKQNNFCXXXXMR w - - 0 1";

    pub const WHITE_KING_START: Square = sq(12);
    pub const BLACK_KING_START: Square = sq(564);
    const WHITE_KINGSIDE_DEST: Square = sq(14);
    const WHITE_QUEENSIDE_DEST: Square = sq(10);
    const BLACK_KINGSIDE_DEST: Square = sq(566);
    const BLACK_QUEENSIDE_DEST: Square = sq(562);

    pub fn new() -> Self {
        Self {
            pieces: [Piece::EMPTY; NUM_SQUARES],
            king_sq: [Square::A1; 2],
            side: Colour::White,
            state: GameState::empty(),
            ply: 0,
            fifty_move_counter: 0,
            key: 0,
            piece_lists: std::array::from_fn(|_| PieceList::new()),
            history: Vec::with_capacity(MAX_GAME_MOVES),
            repetition_history: Vec::with_capacity(MAX_GAME_MOVES),
        }
    }

    pub fn from_notation(notation: &str) -> Result<Self, FenParseError> {
        let mut board = Self::new();
        board.load_position(notation)?;
        Ok(board)
    }

    /// The two fixed king destination squares for `side`:
    /// (kingside, queenside).
    pub const fn castle_destinations(side: Colour) -> (Square, Square) {
        match side {
            Colour::White => (Self::WHITE_KINGSIDE_DEST, Self::WHITE_QUEENSIDE_DEST),
            Colour::Black => (Self::BLACK_KINGSIDE_DEST, Self::BLACK_QUEENSIDE_DEST),
        }
    }

    /// Where the rook stands before and after a castle whose king lands on
    /// `king_to`: from the corner of the crossed side to the king's inward
    /// neighbour.
    fn castle_rook_squares(king_to: Square, kingside: bool) -> (Square, Square) {
        let home = king_to.rank();
        if kingside {
            (
                File::X.with(home),
                king_to.sub(1).expect("castle keeps the rook on the board"),
            )
        } else {
            (
                File::A.with(home),
                king_to.add(1).expect("castle keeps the rook on the board"),
            )
        }
    }

    pub fn piece_list(&self, piece_type: PieceType, colour: Colour) -> &PieceList {
        debug_assert!(
            piece_type != PieceType::King,
            "kings are tracked by the king-square slots, not a list"
        );
        &self.piece_lists[colour.index() * TAG_SPACE + piece_type.index()]
    }

    fn piece_list_mut(&mut self, piece_type: PieceType, colour: Colour) -> &mut PieceList {
        debug_assert!(
            piece_type != PieceType::King,
            "kings are tracked by the king-square slots, not a list"
        );
        &mut self.piece_lists[colour.index() * TAG_SPACE + piece_type.index()]
    }

    // --- read surface ---------------------------------------------------

    pub fn piece_at(&self, sq: Square) -> Piece {
        self.pieces[sq]
    }

    /// The whole square array, for renderers and move generators that
    /// want to scan rather than probe.
    pub fn squares(&self) -> &[Piece; NUM_SQUARES] {
        &self.pieces
    }

    pub fn king_sq(&self, colour: Colour) -> Square {
        self.king_sq[colour]
    }

    pub const fn turn(&self) -> Colour {
        self.side
    }

    pub const fn ply(&self) -> usize {
        self.ply
    }

    pub const fn fifty_move_counter(&self) -> u32 {
        self.fifty_move_counter
    }

    pub const fn zobrist_key(&self) -> u64 {
        self.key
    }

    pub const fn game_state(&self) -> GameState {
        self.state
    }

    pub fn ep_file(&self) -> Option<File> {
        match self.state.ep_file() {
            0 => None,
            biased => File::new((biased - 1) as u8),
        }
    }

    /// The square a pawn skipped on the most recent double step, if any.
    pub fn ep_square(&self) -> Option<Square> {
        let file = self.ep_file()?;
        // white to move means the opponent's pawn just crossed rank 21
        let rank = match self.side {
            Colour::White => Rank::new(20),
            Colour::Black => Rank::new(3),
        }?;
        Some(Square::from_rank_file(rank, file))
    }

    pub fn repetition_history(&self) -> &[u64] {
        &self.repetition_history
    }

    // --- loading --------------------------------------------------------

    fn reset(&mut self) {
        self.pieces = [Piece::EMPTY; NUM_SQUARES];
        self.king_sq = [Square::A1; 2];
        self.side = Colour::White;
        self.state = GameState::empty();
        self.ply = 0;
        self.fifty_move_counter = 0;
        self.key = 0;
        for list in &mut self.piece_lists {
            list.clear();
        }
        self.history.clear();
        self.repetition_history.clear();
    }

    /// Load a position from its notation, replacing all engine state. A
    /// malformed notation is rejected before anything is touched.
    pub fn load_position(&mut self, notation: &str) -> Result<(), FenParseError> {
        let parsed = Fen::parse(notation)?;
        self.reset();

        for sq in Square::all() {
            let piece = parsed.squares[sq];
            if let (Some(piece_type), Some(colour)) = (piece.piece_type(), piece.colour()) {
                self.pieces[sq] = piece;
                if piece_type == PieceType::King {
                    self.king_sq[colour] = sq;
                } else {
                    self.piece_list_mut(piece_type, colour).insert(sq);
                }
            }
        }

        self.side = parsed.turn;
        self.ply = parsed.ply_count;

        let initial = GameState::empty()
            .with_castling(parsed.castling)
            .with_ep_file(parsed.ep_file);
        self.state = initial;
        self.history.push(initial);

        self.key = self.generate_pos_key();
        Ok(())
    }

    pub fn load_start_position(&mut self) {
        self.load_position(Self::START_POSITION)
            .expect("for some reason, START_POSITION is now broken.");
    }

    /// Recompute the position hash from scratch. Only used at load time
    /// and as a debug cross-check; apply/undo maintain it incrementally.
    pub fn generate_pos_key(&self) -> u64 {
        let mut key = 0;
        for sq in Square::all() {
            let piece = self.pieces[sq];
            if let (Some(piece_type), Some(colour)) = (piece.piece_type(), piece.colour()) {
                hash_piece(&mut key, piece_type, colour, sq);
            }
        }

        if self.side == Colour::Black {
            hash_side(&mut key);
        }

        let ep_file = self.state.ep_file();
        if ep_file != 0 {
            hash_ep(&mut key, ep_file);
        }

        hash_castling(&mut key, self.state.castling());

        key
    }

    // --- apply / undo ---------------------------------------------------

    /// Apply `m` to the board as one atomic transition. The move must be
    /// well-formed against the loaded position; legality is the move
    /// generator's business. With `record_repetition` false the repetition
    /// history and the fifty-move reset are both skipped, for callers that
    /// probe positions without building game history.
    pub fn make_move(&mut self, m: Move, record_repetition: bool) {
        #[cfg(debug_assertions)]
        self.check_validity().unwrap();
        debug_assert!(!m.is_null());

        let from = m.from();
        let to = m.to();
        let us = self.side;
        let them = us.flip();

        let piece = self.pieces[from];
        let moved_type = piece
            .piece_type()
            .expect("make_move: no piece on the from-square");
        debug_assert!(piece.is_colour(us), "make_move: moving an enemy piece");

        let old_ep_file = self.state.ep_file();
        let original_castling = self.state.castling();
        let mut new_castling = original_castling;
        let mut new_state = GameState::empty();

        // an ordinary capture sits on the target square; the en-passant
        // victim is off-target and handled below
        let captured_type = self.pieces[to].piece_type();
        if let Some(captured) = captured_type {
            debug_assert!(!m.is_ep());
            debug_assert!(self.pieces[to].is_colour(them), "capturing our own piece");
            new_state = new_state.with_captured(captured);
            hash_piece(&mut self.key, captured, them, to);
            self.piece_list_mut(captured, them).remove(to);
        }

        if moved_type == PieceType::King {
            self.king_sq[us] = to;
            new_castling &= match us {
                Colour::White => !GameState::WHITE_RIGHTS,
                Colour::Black => !GameState::BLACK_RIGHTS,
            };
        } else {
            self.piece_list_mut(moved_type, us).relocate(from, to);
        }

        let mut target_piece = piece;
        if m.is_promo() {
            let promo = m.promotion_type();
            self.piece_list_mut(promo, us).insert(to);
            self.piece_list_mut(PieceType::Pawn, us).remove(to);
            target_piece = Piece::new(us, promo);
        } else if m.is_ep() {
            let victim_sq = to
                .pawn_behind(us)
                .expect("en-passant target has a rank behind it");
            debug_assert_eq!(self.pieces[victim_sq], Piece::new(them, PieceType::Pawn));
            new_state = new_state.with_captured(PieceType::Pawn);
            self.pieces[victim_sq] = Piece::EMPTY;
            self.piece_list_mut(PieceType::Pawn, them).remove(victim_sq);
            hash_piece(&mut self.key, PieceType::Pawn, them, victim_sq);
        } else if m.is_castle() {
            let kingside = to == Self::castle_destinations(us).0;
            debug_assert!(kingside || to == Self::castle_destinations(us).1);
            let (rook_from, rook_to) = Self::castle_rook_squares(to, kingside);
            debug_assert_eq!(self.pieces[rook_from], Piece::new(us, PieceType::Rook));
            self.pieces[rook_to] = self.pieces[rook_from];
            self.pieces[rook_from] = Piece::EMPTY;
            self.piece_list_mut(PieceType::Rook, us)
                .relocate(rook_from, rook_to);
            hash_piece(&mut self.key, PieceType::Rook, us, rook_from);
            hash_piece(&mut self.key, PieceType::Rook, us, rook_to);
        }

        self.pieces[to] = target_piece;
        self.pieces[from] = Piece::EMPTY;

        if m.is_double_step() {
            let ep_file = from.file().index() as u32 + 1;
            new_state = new_state.with_ep_file(ep_file);
            hash_ep(&mut self.key, ep_file);
        }

        hash_side(&mut self.key);
        hash_piece(&mut self.key, moved_type, us, from);
        let target_type = target_piece
            .piece_type()
            .expect("the landing piece is never empty");
        hash_piece(&mut self.key, target_type, us, to);

        if old_ep_file != 0 {
            hash_ep(&mut self.key, old_ep_file);
        }
        if new_castling != original_castling {
            hash_castling(&mut self.key, original_castling);
            hash_castling(&mut self.key, new_castling);
        }

        let new_state = new_state
            .with_castling(new_castling)
            .with_fifty_move_counter(self.fifty_move_counter);
        self.state = new_state;
        self.history.push(new_state);

        self.side = them;
        self.ply += 1;
        self.fifty_move_counter += 1;

        if record_repetition {
            if moved_type == PieceType::Pawn || new_state.captured_type().is_some() {
                self.repetition_history.clear();
                self.fifty_move_counter = 0;
            } else {
                self.repetition_history.push(self.key);
            }
        }

        #[cfg(debug_assertions)]
        self.check_validity().unwrap();
    }

    /// Reverse the most recently applied move. Every undo must pair with
    /// the matching apply in LIFO order; breaking the pairing is a
    /// programming error and panics rather than corrupting the position.
    pub fn unmake_move(&mut self, m: Move, record_repetition: bool) {
        #[cfg(debug_assertions)]
        self.check_validity().unwrap();

        // the side that made the move we are undoing
        let us = self.side.flip();
        let them = self.side;
        self.side = us;

        let from = m.from();
        let to = m.to();
        let is_promo = m.is_promo();

        let original_castling = self.state.castling();
        let old_ep_file = self.state.ep_file();
        let captured_type = self.state.captured_type();

        let to_type = self.pieces[to]
            .piece_type()
            .expect("unmake_move: no piece on the to-square");
        let moved_type = if is_promo { PieceType::Pawn } else { to_type };

        hash_side(&mut self.key);
        hash_piece(&mut self.key, moved_type, us, from);
        hash_piece(&mut self.key, to_type, us, to);
        if old_ep_file != 0 {
            hash_ep(&mut self.key, old_ep_file);
        }

        let captured_piece = match captured_type {
            Some(captured) => Piece::new(them, captured),
            None => Piece::EMPTY,
        };

        if !m.is_ep() {
            if let Some(captured) = captured_type {
                hash_piece(&mut self.key, captured, them, to);
                self.piece_list_mut(captured, them).insert(to);
            }
        }

        if moved_type == PieceType::King {
            self.king_sq[us] = from;
        } else if !is_promo {
            self.piece_list_mut(moved_type, us).relocate(to, from);
        }

        self.pieces[from] = Piece::new(us, moved_type);
        self.pieces[to] = captured_piece;

        if is_promo {
            self.piece_list_mut(PieceType::Pawn, us).insert(from);
            self.piece_list_mut(m.promotion_type(), us).remove(to);
        } else if m.is_ep() {
            let victim_sq = to
                .pawn_behind(us)
                .expect("en-passant target has a rank behind it");
            debug_assert_eq!(captured_type, Some(PieceType::Pawn));
            self.pieces[to] = Piece::EMPTY;
            self.pieces[victim_sq] = captured_piece;
            self.piece_list_mut(PieceType::Pawn, them).insert(victim_sq);
            hash_piece(&mut self.key, PieceType::Pawn, them, victim_sq);
        } else if m.is_castle() {
            let kingside = to == Self::castle_destinations(us).0;
            let (rook_from, rook_to) = Self::castle_rook_squares(to, kingside);
            self.pieces[rook_from] = self.pieces[rook_to];
            self.pieces[rook_to] = Piece::EMPTY;
            self.piece_list_mut(PieceType::Rook, us)
                .relocate(rook_to, rook_from);
            hash_piece(&mut self.key, PieceType::Rook, us, rook_from);
            hash_piece(&mut self.key, PieceType::Rook, us, rook_to);
        }

        self.history
            .pop()
            .expect("unmake_move without a matching make_move");
        self.state = *self
            .history
            .last()
            .expect("unmake_move: game-state stack underflow");

        self.fifty_move_counter = self.state.fifty_move_counter();
        let new_ep_file = self.state.ep_file();
        if new_ep_file != 0 {
            hash_ep(&mut self.key, new_ep_file);
        }
        let new_castling = self.state.castling();
        if new_castling != original_castling {
            hash_castling(&mut self.key, original_castling);
            hash_castling(&mut self.key, new_castling);
        }

        self.ply -= 1;

        if record_repetition && !self.repetition_history.is_empty() {
            self.repetition_history.pop();
        }

        #[cfg(debug_assertions)]
        self.check_validity().unwrap();
    }

    // --- serialization --------------------------------------------------

    /// Serialize the live position back into its six-field notation.
    pub fn fen(&self) -> String {
        let mut fen = String::with_capacity(128);

        for rank in Rank::all().rev() {
            let mut empty_run = 0;
            for file in File::all() {
                let piece = self.pieces[Square::from_rank_file(rank, file)];
                if let Some(symbol) = piece.symbol() {
                    push_empty_run(&mut fen, empty_run);
                    empty_run = 0;
                    fen.push(symbol);
                } else {
                    empty_run += 1;
                }
            }
            push_empty_run(&mut fen, empty_run);
            if rank.index() != 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side {
            Colour::White => 'w',
            Colour::Black => 'b',
        });

        fen.push(' ');
        if self.state.castling() == 0 {
            fen.push('-');
        } else {
            if self.state.white_kingside() {
                fen.push('K');
            }
            if self.state.white_queenside() {
                fen.push('Q');
            }
            if self.state.black_kingside() {
                fen.push('k');
            }
            if self.state.black_queenside() {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.ep_square() {
            None => fen.push('-'),
            Some(sq) => {
                fen.push_str(&sq.to_string());
            }
        }

        fen.push(' ');
        fen.push_str(&self.fifty_move_counter.to_string());
        fen.push(' ');
        fen.push_str(&(self.ply / 2 + 1).to_string());

        fen
    }

    // --- move text ------------------------------------------------------

    /// Read a coordinate move like `g3g5` or `w23w24q` against the current
    /// position, inferring the move-kind flag from board state. This is
    /// bookkeeping, not legality checking.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let (from, rest) = take_square(text)
            .ok_or_else(|| MoveParseError::InvalidFromSquare(text.to_string()))?;
        let (to, rest) =
            take_square(rest).ok_or_else(|| MoveParseError::InvalidToSquare(text.to_string()))?;

        let mut promotion = None;
        let mut rest_chars = rest.chars();
        if let Some(c) = rest_chars.next() {
            promotion = Some(match c {
                'q' => PieceType::Queen,
                'r' => PieceType::Rook,
                'b' => PieceType::Bishop,
                'n' => PieceType::Knight,
                _ => return Err(MoveParseError::InvalidPromotionPiece(c)),
            });
            if rest_chars.next().is_some() {
                return Err(MoveParseError::TrailingInput(text.to_string()));
            }
        }

        let piece_type = self
            .pieces[from]
            .piece_type()
            .ok_or_else(|| MoveParseError::EmptyFromSquare(text.to_string()))?;

        let flag = if let Some(promo) = promotion {
            MoveFlag::from_promotion(promo).expect("promotion set is restricted above")
        } else if piece_type == PieceType::Pawn
            && from.rank().index().abs_diff(to.rank().index()) == 2
        {
            MoveFlag::PawnDoubleStep
        } else if piece_type == PieceType::Pawn
            && from.file() != to.file()
            && self.pieces[to].is_empty()
        {
            MoveFlag::EnPassantCapture
        } else if piece_type == PieceType::King
            && from.file().index().abs_diff(to.file().index()) == 2
        {
            MoveFlag::Castle
        } else {
            MoveFlag::None
        };

        Ok(Move::new(from, to, flag))
    }
}

/// Split a square name off the front of a move string: a file letter
/// followed by one or two rank digits, taken greedily.
fn take_square(s: &str) -> Option<(Square, &str)> {
    let file = File::from_char(s.chars().next()?)?;
    let bytes = s.as_bytes();
    let mut end = 1;
    while end < s.len() && end < 3 && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == 1 {
        return None;
    }
    let rank = s[1..end].parse::<u32>().ok().and_then(Rank::from_number)?;
    Some((Square::from_rank_file(rank, file), &s[end..]))
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.side == other.side
            && self.king_sq == other.king_sq
            && self.state == other.state
            && self.fifty_move_counter == other.fifty_move_counter
            && self.key == other.key
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for rank in Rank::all().rev() {
            write!(f, "{:>2} ", rank.number())?;
            for file in File::all() {
                write!(f, " {}", self.pieces[Square::from_rank_file(rank, file)])?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for file in File::all() {
            write!(f, " {}", file.char())?;
        }
        writeln!(f)?;
        writeln!(f, "side to move: {}", self.side)?;
        writeln!(f, "fifty-move counter: {}", self.fifty_move_counter)?;
        writeln!(f, "hash: {:#018x}", self.key)?;
        write!(f, "notation: {}", self.fen())
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Board {{ {} }}", self.fen())
    }
}
