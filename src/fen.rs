use arrayvec::ArrayVec;

use crate::{
    errors::FenParseError,
    gamestate::GameState,
    piece::{Colour, Piece, TAG_SPACE},
    types::{File, NUM_SQUARES, Rank, Square},
};

/// A parsed position notation: the loader-friendly intermediate form.
/// Field five of the notation drives the ply count; the fifty-move counter
/// always restarts at zero when a position is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub squares: [Piece; NUM_SQUARES],
    pub turn: Colour,
    /// Castling rights in the game-state word's low-bit encoding.
    pub castling: u32,
    /// Biased en-passant file: 0 = none, else file + 1.
    pub ep_file: u32,
    pub ply_count: usize,
}

impl Fen {
    /// Parse a notation string. All six fields must be present and no
    /// extra tokens are allowed.
    pub fn parse(text: &str) -> Result<Self, FenParseError> {
        let mut tokens = text.split_whitespace();

        let board_str = tokens.next().ok_or(FenParseError::MissingBoard)?;
        let squares = Self::parse_board(board_str)?;

        let turn = Self::parse_turn(tokens.next().ok_or(FenParseError::MissingSide)?)?;
        let castling = Self::parse_castling(tokens.next().ok_or(FenParseError::MissingCastling)?)?;
        let ep_file = Self::parse_ep(tokens.next().ok_or(FenParseError::MissingEnPassant)?)?;
        let ply_count = Self::parse_ply(tokens.next().ok_or(FenParseError::MissingPlyCount)?)?;
        Self::parse_fullmove(tokens.next().ok_or(FenParseError::MissingFullmove)?)?;

        if tokens.next().is_some() {
            return Err(FenParseError::ExtraTokens);
        }

        Ok(Self {
            squares,
            turn,
            castling,
            ep_file,
            ply_count,
        })
    }

    fn parse_board(board_str: &str) -> Result<[Piece; NUM_SQUARES], FenParseError> {
        let mut ranks = ArrayVec::<&str, { Rank::COUNT }>::new();
        let mut board_parts = board_str.split('/');
        while let Some(segment) = board_parts.next() {
            if ranks.try_push(segment).is_err() {
                // 24 successfully pushed, plus this one, plus the rest.
                return Err(FenParseError::BoardSegments(
                    Rank::COUNT + 1 + board_parts.count(),
                ));
            }
        }
        if ranks.len() != Rank::COUNT {
            return Err(FenParseError::BoardSegments(ranks.len()));
        }

        let mut squares = [Piece::EMPTY; NUM_SQUARES];
        let mut populations = [[0usize; TAG_SPACE]; 2];

        for (segment_idx, segment) in ranks.iter().enumerate() {
            // rank 24 is written first
            let rank = Rank::new((Rank::COUNT - 1 - segment_idx) as u8)
                .expect("segment count is bounded by Rank::COUNT");
            let mut file = 0usize;

            for c in segment.chars() {
                if let Some(digit) = c.to_digit(10) {
                    // adjacent digits accumulate: an empty rank is "888"
                    if digit == 0 {
                        return Err(FenParseError::BadDigit);
                    }
                    file += digit as usize;
                    if file > File::COUNT {
                        return Err(FenParseError::BadSquaresInSegment);
                    }
                } else {
                    let piece =
                        Piece::from_symbol(c).ok_or(FenParseError::UnexpectedCharacter(c))?;
                    if file >= File::COUNT {
                        return Err(FenParseError::BadSquaresInSegment);
                    }
                    let (piece_type, colour) = match (piece.piece_type(), piece.colour()) {
                        (Some(pt), Some(col)) => (pt, col),
                        _ => return Err(FenParseError::UnexpectedCharacter(c)),
                    };
                    populations[colour.index()][piece_type.index()] += 1;
                    if populations[colour.index()][piece_type.index()] > piece_type.max_population()
                    {
                        return Err(FenParseError::TooManyPieces(piece_type));
                    }
                    let sq = Square::from_rank_file(
                        rank,
                        File::new(file as u8).expect("file is bounded by File::COUNT"),
                    );
                    squares[sq] = piece;
                    file += 1;
                }
            }

            if file != File::COUNT {
                return Err(FenParseError::BadSquaresInSegment);
            }
        }

        Ok(squares)
    }

    fn parse_turn(s: &str) -> Result<Colour, FenParseError> {
        match s {
            "w" => Ok(Colour::White),
            "b" => Ok(Colour::Black),
            _ => Err(FenParseError::InvalidSide(s.to_string())),
        }
    }

    fn parse_castling(s: &str) -> Result<u32, FenParseError> {
        if s == "-" {
            return Ok(0);
        }
        let mut rights = 0;
        for c in s.chars() {
            rights |= match c {
                'K' => GameState::WHITE_KINGSIDE,
                'Q' => GameState::WHITE_QUEENSIDE,
                'k' => GameState::BLACK_KINGSIDE,
                'q' => GameState::BLACK_QUEENSIDE,
                _ => return Err(FenParseError::InvalidCastling(s.to_string())),
            };
        }
        Ok(rights)
    }

    /// The file letter is what matters; the trailing rank digits are
    /// validated for shape but reconstructed from side to move on output.
    fn parse_ep(s: &str) -> Result<u32, FenParseError> {
        if s == "-" {
            return Ok(0);
        }
        let mut chars = s.chars();
        let file = chars
            .next()
            .and_then(File::from_char)
            .ok_or_else(|| FenParseError::InvalidEnPassant(s.to_string()))?;
        if !chars.as_str().chars().all(|c| c.is_ascii_digit()) {
            return Err(FenParseError::InvalidEnPassant(s.to_string()));
        }
        Ok(file.index() as u32 + 1)
    }

    fn parse_ply(s: &str) -> Result<usize, FenParseError> {
        s.parse()
            .map_err(|_| FenParseError::InvalidPlyCount(s.to_string()))
    }

    fn parse_fullmove(s: &str) -> Result<usize, FenParseError> {
        s.parse()
            .map_err(|_| FenParseError::InvalidFullmove(s.to_string()))
    }
}

/// Append an empty-square run in eight-chunks, the canonical form: a whole
/// empty rank is "888", seventeen squares are "881".
pub(crate) fn push_empty_run(out: &mut String, mut run: usize) {
    while run >= 8 {
        out.push('8');
        run -= 8;
    }
    if run > 0 {
        out.push(char::from_digit(run as u32, 10).expect("run is below 8"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{board::Board, piece::PieceType};

    #[test]
    fn parse_start_position() {
        let fen = Fen::parse(Board::START_POSITION).unwrap();
        assert_eq!(fen.turn, Colour::White);
        assert_eq!(fen.castling, 0);
        assert_eq!(fen.ep_file, 0);
        assert_eq!(fen.ply_count, 0);

        let occupied = fen.squares.iter().filter(|p| !p.is_empty()).count();
        assert_eq!(occupied, 140);

        // kings on m1 and m24
        let m1: Square = "m1".parse().unwrap();
        let m24: Square = "m24".parse().unwrap();
        assert_eq!(
            fen.squares[m1],
            Piece::new(Colour::White, PieceType::King)
        );
        assert_eq!(
            fen.squares[m24],
            Piece::new(Colour::Black, PieceType::King)
        );

        // the silver generals sit mirrored on b1 and w24
        let b1: Square = "b1".parse().unwrap();
        let w24: Square = "w24".parse().unwrap();
        assert_eq!(
            fen.squares[b1],
            Piece::new(Colour::White, PieceType::SilverGeneral)
        );
        assert_eq!(
            fen.squares[w24],
            Piece::new(Colour::Black, PieceType::SilverGeneral)
        );

        // 24 pawns per side on ranks 3 and 22
        let white_pawns = Square::all()
            .filter(|&sq| fen.squares[sq] == Piece::new(Colour::White, PieceType::Pawn))
            .count();
        let black_pawns = Square::all()
            .filter(|&sq| fen.squares[sq] == Piece::new(Colour::Black, PieceType::Pawn))
            .count();
        assert_eq!(white_pawns, 24);
        assert_eq!(black_pawns, 24);
    }

    #[test]
    fn wrong_field_counts_are_rejected() {
        assert_eq!(Fen::parse(""), Err(FenParseError::MissingBoard));
        assert_eq!(Fen::parse("888/888"), Err(FenParseError::BoardSegments(2)));

        let board_only = Board::START_POSITION.split(' ').next().unwrap().to_string();
        assert_eq!(Fen::parse(&board_only), Err(FenParseError::MissingSide));
        assert_eq!(
            Fen::parse(&format!("{board_only} w")),
            Err(FenParseError::MissingCastling)
        );
        assert_eq!(
            Fen::parse(&format!("{board_only} w - - 0")),
            Err(FenParseError::MissingFullmove)
        );
        assert_eq!(
            Fen::parse(&format!("{board_only} w - - 0 1 extra")),
            Err(FenParseError::ExtraTokens)
        );
    }

    #[test]
    fn too_many_rank_segments_are_counted() {
        let mut ranks = vec!["888"; 30];
        ranks[0] = "4k883";
        ranks[29] = "4K883";
        let text = format!("{} w - - 0 1", ranks.join("/"));
        assert_eq!(Fen::parse(&text), Err(FenParseError::BoardSegments(30)));
    }

    #[test]
    fn bad_placement_characters_are_rejected() {
        let mut ranks = vec!["888"; 24];
        ranks[10] = "4?883";
        let text = format!("{} w - - 0 1", ranks.join("/"));
        assert_eq!(
            Fen::parse(&text),
            Err(FenParseError::UnexpectedCharacter('?'))
        );
    }

    #[test]
    fn digit_runs_must_fill_the_rank_exactly() {
        let mut ranks = vec!["888"; 24];
        ranks[3] = "8888"; // 32 squares
        let text = format!("{} w - - 0 1", ranks.join("/"));
        assert_eq!(Fen::parse(&text), Err(FenParseError::BadSquaresInSegment));

        let mut ranks = vec!["888"; 24];
        ranks[3] = "88"; // 16 squares
        let text = format!("{} w - - 0 1", ranks.join("/"));
        assert_eq!(Fen::parse(&text), Err(FenParseError::BadSquaresInSegment));

        let mut ranks = vec!["888"; 24];
        ranks[3] = "0888";
        let text = format!("{} w - - 0 1", ranks.join("/"));
        assert_eq!(Fen::parse(&text), Err(FenParseError::BadDigit));
    }

    #[test]
    fn over_populated_types_are_rejected() {
        // the queen cap is 25: one starter plus twenty-four promotions
        let mut ranks = vec!["888"; 24];
        ranks[0] = "4k883";
        ranks[23] = "4K883";
        ranks[5] = "QQQQQQQQQQQQQQQQQQQQQQQQ";
        ranks[6] = "QQ8886";
        let text = format!("{} w - - 0 1", ranks.join("/"));
        assert_eq!(
            Fen::parse(&text),
            Err(FenParseError::TooManyPieces(PieceType::Queen))
        );
    }

    #[test]
    fn side_castling_and_counter_tokens() {
        let board = Board::START_POSITION.split(' ').next().unwrap().to_string();
        assert_eq!(
            Fen::parse(&format!("{board} W - - 0 1")),
            Err(FenParseError::InvalidSide("W".to_string()))
        );
        assert_eq!(
            Fen::parse(&format!("{board} w KX - 0 1")),
            Err(FenParseError::InvalidCastling("KX".to_string()))
        );
        assert_eq!(
            Fen::parse(&format!("{board} w - z9 0 1")),
            Err(FenParseError::InvalidEnPassant("z9".to_string()))
        );
        assert_eq!(
            Fen::parse(&format!("{board} w - - x 1")),
            Err(FenParseError::InvalidPlyCount("x".to_string()))
        );
        assert_eq!(
            Fen::parse(&format!("{board} w - - 0 x")),
            Err(FenParseError::InvalidFullmove("x".to_string()))
        );

        let fen = Fen::parse(&format!("{board} b Kq g21 4 3")).unwrap();
        assert_eq!(fen.turn, Colour::Black);
        assert_eq!(
            fen.castling,
            GameState::WHITE_KINGSIDE | GameState::BLACK_QUEENSIDE
        );
        assert_eq!(fen.ep_file, 7);
        assert_eq!(fen.ply_count, 4);
    }

    #[test]
    fn empty_runs_chunk_into_eights() {
        let mut s = String::new();
        push_empty_run(&mut s, 24);
        assert_eq!(s, "888");
        let mut s = String::new();
        push_empty_run(&mut s, 17);
        assert_eq!(s, "881");
        let mut s = String::new();
        push_empty_run(&mut s, 7);
        assert_eq!(s, "7");
        let mut s = String::new();
        push_empty_run(&mut s, 0);
        assert_eq!(s, "");
    }
}
