//! Events recorded by the grid for the level and the renderer.

use super::piece::{PieceId, PieceKind, PieceType};

/// One logical change on the board, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A piece came into existence (refill spawns start at y = -1).
    Spawned {
        id: PieceId,
        kind: PieceKind,
        x: i32,
        y: i32,
    },
    /// A piece changed slot (gravity, diagonal slide, refill drop or swap).
    Moved {
        id: PieceId,
        from: (i32, i32),
        to: (usize, usize),
    },
    /// A piece was cleared; fired exactly once per piece.
    Cleared {
        id: PieceId,
        kind: PieceKind,
        x: usize,
        y: usize,
        score: u32,
    },
    /// A valid swap was committed and its immediate clears ran.
    MoveConsumed,
}

impl BoardEvent {
    pub fn cleared_type(&self) -> Option<PieceType> {
        match self {
            Self::Cleared { kind, .. } => Some(kind.piece_type()),
            _ => None,
        }
    }
}
