use std::fmt::{Debug, Display, Formatter};

use crate::{piece::PieceType, types::Square};

/// The move-kind flag carried in the top bits of a [`Move`]. Values are
/// the wire encoding used by the move-enumeration collaborator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum MoveFlag {
    None = 0,
    EnPassantCapture = 1,
    Castle = 2,
    PromoteToQueen = 3,
    PromoteToKnight = 4,
    PromoteToRook = 5,
    PromoteToBishop = 6,
    PawnDoubleStep = 7,
}

impl MoveFlag {
    pub const fn new(v: u8) -> Option<Self> {
        if v <= 7 {
            // SAFETY: every value in 0..=7 is a declared discriminant.
            Some(unsafe { std::mem::transmute::<u8, Self>(v) })
        } else {
            None
        }
    }

    pub const fn is_promotion(self) -> bool {
        matches!(
            self,
            Self::PromoteToQueen | Self::PromoteToKnight | Self::PromoteToRook | Self::PromoteToBishop
        )
    }

    pub const fn promotion_type(self) -> Option<PieceType> {
        match self {
            Self::PromoteToQueen => Some(PieceType::Queen),
            Self::PromoteToKnight => Some(PieceType::Knight),
            Self::PromoteToRook => Some(PieceType::Rook),
            Self::PromoteToBishop => Some(PieceType::Bishop),
            _ => None,
        }
    }

    pub const fn from_promotion(piece_type: PieceType) -> Option<Self> {
        match piece_type {
            PieceType::Queen => Some(Self::PromoteToQueen),
            PieceType::Knight => Some(Self::PromoteToKnight),
            PieceType::Rook => Some(Self::PromoteToRook),
            PieceType::Bishop => Some(Self::PromoteToBishop),
            _ => None,
        }
    }
}

/// A move as consumed by the board: 10-bit from square, 10-bit to square,
/// 4-bit kind flag. `Move::NULL` is the "no move yet" sentinel used by
/// presentation code and must never reach `make_move`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Move {
    data: u32,
}

impl Move {
    const FROM_MASK: u32 = 0b11_1111_1111;
    const TO_SHIFT: u32 = 10;
    const TO_MASK: u32 = 0b11_1111_1111 << Self::TO_SHIFT;
    const FLAG_SHIFT: u32 = 20;

    pub const NULL: Self = Self { data: 0 };

    pub fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Self {
            data: from.inner() as u32
                | (to.inner() as u32) << Self::TO_SHIFT
                | (flag as u32) << Self::FLAG_SHIFT,
        }
    }

    pub const fn from(self) -> Square {
        // SAFETY: the constructor packs a valid square into these bits.
        unsafe { Square::new_unchecked((self.data & Self::FROM_MASK) as u16) }
    }

    pub const fn to(self) -> Square {
        // SAFETY: the constructor packs a valid square into these bits.
        unsafe { Square::new_unchecked(((self.data & Self::TO_MASK) >> Self::TO_SHIFT) as u16) }
    }

    pub const fn flag(self) -> MoveFlag {
        let bits = (self.data >> Self::FLAG_SHIFT) as u8;
        match MoveFlag::new(bits) {
            Some(flag) => flag,
            None => unreachable!(),
        }
    }

    pub const fn is_promo(self) -> bool {
        self.flag().is_promotion()
    }

    pub fn promotion_type(self) -> PieceType {
        debug_assert!(self.is_promo());
        self.flag()
            .promotion_type()
            .expect("promotion_type on a non-promotion move")
    }

    pub const fn is_ep(self) -> bool {
        matches!(self.flag(), MoveFlag::EnPassantCapture)
    }

    pub const fn is_castle(self) -> bool {
        matches!(self.flag(), MoveFlag::Castle)
    }

    pub const fn is_double_step(self) -> bool {
        matches!(self.flag(), MoveFlag::PawnDoubleStep)
    }

    pub const fn is_null(self) -> bool {
        self.data == 0
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.is_null() {
            return write!(f, "null");
        }

        if self.is_promo() {
            let pchar = self.promotion_type().promo_char().unwrap_or('?');
            write!(f, "{}{}{pchar}", self.from(), self.to())
        } else {
            write!(f, "{}{}", self.from(), self.to())
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "move from {} to {}, flag {:?}",
            self.from(),
            self.to(),
            self.flag()
        )
    }
}
