use thiserror::Error;

use crate::piece::PieceType;

#[cfg(debug_assertions)]
pub type PositionValidityError = String;

/// Everything that can be wrong with a position notation string. Parsing
/// rejects before any engine state is touched, so these are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenParseError {
    #[error("missing piece placement field")]
    MissingBoard,
    #[error("missing side-to-move field")]
    MissingSide,
    #[error("missing castling field")]
    MissingCastling,
    #[error("missing en-passant field")]
    MissingEnPassant,
    #[error("missing ply-count field")]
    MissingPlyCount,
    #[error("missing fullmove field")]
    MissingFullmove,
    #[error("unexpected trailing tokens")]
    ExtraTokens,
    #[error("expected 24 rank segments, got {0}")]
    BoardSegments(usize),
    #[error("rank segment does not describe exactly 24 files")]
    BadSquaresInSegment,
    #[error("empty-square digit out of range")]
    BadDigit,
    #[error("unexpected character in placement field: {0:?}")]
    UnexpectedCharacter(char),
    #[error("more {0}s than one side can field")]
    TooManyPieces(PieceType),
    #[error("invalid side-to-move token: {0:?}")]
    InvalidSide(String),
    #[error("invalid castling token: {0:?}")]
    InvalidCastling(String),
    #[error("invalid en-passant token: {0:?}")]
    InvalidEnPassant(String),
    #[error("invalid ply-count token: {0:?}")]
    InvalidPlyCount(String),
    #[error("invalid fullmove token: {0:?}")]
    InvalidFullmove(String),
}

/// Failures when reading a coordinate move like `g3g5` or `w23w24q`
/// against the current position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("invalid from-square in {0:?}")]
    InvalidFromSquare(String),
    #[error("invalid to-square in {0:?}")]
    InvalidToSquare(String),
    #[error("invalid promotion piece {0:?}")]
    InvalidPromotionPiece(char),
    #[error("unexpected trailing characters in {0:?}")]
    TrailingInput(String),
    #[error("no piece on the from-square of {0:?}")]
    EmptyFromSquare(String),
}
