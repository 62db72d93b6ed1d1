//! Piece model: tile colours, piece kinds and the capabilities derived from them.

/// Tile colour. `Any` is the wildcard carried by rainbow pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileColor {
    Yellow,
    Purple,
    Red,
    Blue,
    Green,
    Pink,
    Any,
}

impl TileColor {
    /// Colours a freshly spawned normal piece can take.
    pub const PLAYABLE: [Self; 6] = [
        Self::Yellow,
        Self::Purple,
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Pink,
    ];

    /// Palette index 0..6 for `Theme::tile_color`. `Any` maps past the playable range.
    pub fn index(self) -> u8 {
        match self {
            Self::Yellow => 0,
            Self::Purple => 1,
            Self::Red => 2,
            Self::Blue => 3,
            Self::Green => 4,
            Self::Pink => 5,
            Self::Any => 6,
        }
    }

    /// Layout character for a normal piece of this colour.
    pub fn from_layout_char(c: char) -> Option<Self> {
        match c {
            'y' => Some(Self::Yellow),
            'p' => Some(Self::Purple),
            'r' => Some(Self::Red),
            'b' => Some(Self::Blue),
            'g' => Some(Self::Green),
            'k' => Some(Self::Pink),
            _ => None,
        }
    }
}

/// Type tag of a piece, without colour. Used for queries such as obstacle counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Empty,
    Normal,
    Bubble,
    RowClear,
    ColumnClear,
    Rainbow,
}

impl PieceType {
    /// Score reported to the level when a piece of this type is cleared.
    pub fn score(self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Normal => 10,
            Self::Bubble => 20,
            Self::RowClear | Self::ColumnClear => 30,
            Self::Rainbow => 50,
        }
    }
}

/// What occupies a grid slot. Colour lives inside the variants that have one,
/// so a piece can never be "colored" without a colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Empty,
    Normal(TileColor),
    Bubble,
    RowClear(TileColor),
    ColumnClear(TileColor),
    Rainbow(TileColor),
}

impl PieceKind {
    pub fn piece_type(self) -> PieceType {
        match self {
            Self::Empty => PieceType::Empty,
            Self::Normal(_) => PieceType::Normal,
            Self::Bubble => PieceType::Bubble,
            Self::RowClear(_) => PieceType::RowClear,
            Self::ColumnClear(_) => PieceType::ColumnClear,
            Self::Rainbow(_) => PieceType::Rainbow,
        }
    }

    pub fn color(self) -> Option<TileColor> {
        match self {
            Self::Normal(c) | Self::RowClear(c) | Self::ColumnClear(c) | Self::Rainbow(c) => {
                Some(c)
            }
            Self::Empty | Self::Bubble => None,
        }
    }

    /// Same kind re-tagged with `color`; uncoloured kinds are returned unchanged.
    pub fn with_color(self, color: TileColor) -> Self {
        match self {
            Self::Normal(_) => Self::Normal(color),
            Self::RowClear(_) => Self::RowClear(color),
            Self::ColumnClear(_) => Self::ColumnClear(color),
            Self::Rainbow(_) => Self::Rainbow(color),
            other => other,
        }
    }

    /// Empty slots never move and bubbles are anchored obstacles.
    #[inline]
    pub fn is_movable(self) -> bool {
        !matches!(self, Self::Empty | Self::Bubble)
    }

    #[inline]
    pub fn is_colored(self) -> bool {
        self.color().is_some()
    }

    #[inline]
    pub fn is_clearable(self) -> bool {
        self != Self::Empty
    }

    #[inline]
    pub fn is_line_clear(self) -> bool {
        matches!(self, Self::RowClear(_) | Self::ColumnClear(_))
    }
}

/// Stable identity of a piece for as long as it lives on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u64);

/// A piece on the grid. `x`/`y` always equal the slot holding it; `y` is -1 only
/// in the `Spawned` event of a top-edge refill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub x: i32,
    pub y: i32,
    pub(crate) being_cleared: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            being_cleared: false,
        }
    }

    pub fn piece_type(&self) -> PieceType {
        self.kind.piece_type()
    }

    pub fn color(&self) -> Option<TileColor> {
        self.kind.color()
    }

    pub fn is_movable(&self) -> bool {
        self.kind.is_movable()
    }

    pub fn is_colored(&self) -> bool {
        self.kind.is_colored()
    }

    pub fn is_clearable(&self) -> bool {
        self.kind.is_clearable()
    }

    /// True between the start of a clear and the slot being emptied.
    pub fn is_being_cleared(&self) -> bool {
        self.being_cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_follow_kind() {
        assert!(!PieceKind::Empty.is_movable());
        assert!(!PieceKind::Empty.is_clearable());
        assert!(!PieceKind::Empty.is_colored());

        assert!(!PieceKind::Bubble.is_movable());
        assert!(PieceKind::Bubble.is_clearable());
        assert!(!PieceKind::Bubble.is_colored());

        for kind in [
            PieceKind::Normal(TileColor::Red),
            PieceKind::RowClear(TileColor::Blue),
            PieceKind::ColumnClear(TileColor::Green),
            PieceKind::Rainbow(TileColor::Any),
        ] {
            assert!(kind.is_movable(), "{kind:?}");
            assert!(kind.is_clearable(), "{kind:?}");
            assert!(kind.is_colored(), "{kind:?}");
        }
    }

    #[test]
    fn test_with_color_keeps_uncoloured_kinds() {
        assert_eq!(
            PieceKind::Rainbow(TileColor::Any).with_color(TileColor::Blue),
            PieceKind::Rainbow(TileColor::Blue)
        );
        assert_eq!(PieceKind::Bubble.with_color(TileColor::Red), PieceKind::Bubble);
        assert_eq!(PieceKind::Empty.with_color(TileColor::Red), PieceKind::Empty);
    }
}
