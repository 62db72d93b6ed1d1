//! Clearing: match sweep with special-piece promotion, single-piece clears with
//! obstacle propagation, and the row/column/colour area clears.

use super::event::BoardEvent;
use super::matcher::{Match, find_match};
use super::piece::{PieceId, PieceKind, PieceType, TileColor};
use super::swap::SwapAxis;
use super::Grid;
use tracing::debug;

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl Grid {
    /// Clear every match on the board, scanning row-major. Matches of four become
    /// a line-clear piece and five or more a rainbow. Returns whether any piece was
    /// removed, i.e. whether a refill is needed.
    pub fn clear_all_valid_matches(&mut self) -> bool {
        let mut needs_refill = false;

        for y in 0..self.height {
            for x in 0..self.width {
                if !self.piece(x, y).is_clearable() {
                    continue;
                }
                let Some(found) = find_match(self, self.piece(x, y), x, y) else {
                    continue;
                };
                if self.clear_match(&found) {
                    needs_refill = true;
                }
            }
        }

        needs_refill
    }

    fn clear_match(&mut self, found: &Match) -> bool {
        let special = self.special_for(found);
        let ids: Vec<PieceId> = found
            .cells
            .iter()
            .map(|&(x, y)| self.piece(x, y).id)
            .collect();

        let mut location = found.cells[self.rng.index(found.len())];
        let mut removed = false;
        for (&(x, y), &id) in found.cells.iter().zip(&ids) {
            if self.clear_piece(x, y) {
                removed = true;
            }
            if self.swap_context.is_some_and(|ctx| ctx.involves(id)) {
                location = (x, y);
            }
        }

        if let Some(kind) = special {
            let (sx, sy) = location;
            debug!(?kind, x = sx, y = sy, size = found.len(), "special piece promoted");
            self.place(sx, sy, kind);
        }
        removed
    }

    /// Special piece earned by a match, if any. Line-clear orientation follows the
    /// swap axis; without a swap in progress it is random.
    fn special_for(&mut self, found: &Match) -> Option<PieceKind> {
        match found.len() {
            4 => {
                let row = match self.swap_context.map(|ctx| ctx.axis) {
                    Some(SwapAxis::Horizontal) => true,
                    Some(SwapAxis::Vertical) => false,
                    None => self.rng.coin(),
                };
                Some(if row {
                    PieceKind::RowClear(found.color)
                } else {
                    PieceKind::ColumnClear(found.color)
                })
            }
            n if n >= 5 => Some(PieceKind::Rainbow(TileColor::Any)),
            _ => None,
        }
    }

    /// Clear one piece. No-op (false) for Empty slots and pieces already being
    /// cleared or outside the board. Fires the piece's area effect, empties the
    /// slot, then clears bubbles directly next to it (one hop, no flood).
    pub fn clear_piece(&mut self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.idx(x, y);
        let piece = &mut self.cells[i];
        if !piece.is_clearable() || piece.being_cleared {
            return false;
        }
        piece.being_cleared = true;
        let (id, kind) = (piece.id, piece.kind);
        self.report_cleared(id, kind, x, y);

        match kind {
            PieceKind::RowClear(_) => self.clear_row(y),
            PieceKind::ColumnClear(_) => self.clear_column(x),
            PieceKind::Rainbow(color) => self.clear_color(color),
            _ => {}
        }

        self.put_empty(x, y);
        self.clear_obstacles(x, y);
        true
    }

    fn clear_obstacles(&mut self, x: usize, y: usize) {
        for (dx, dy) in ORTHOGONAL {
            let (nx, ny) = (x as i32 + dx, y as i32 + dy);
            let Some(p) = self.get(nx, ny) else {
                continue;
            };
            if p.piece_type() != PieceType::Bubble || !p.is_clearable() || p.being_cleared {
                continue;
            }
            let (id, kind) = (p.id, p.kind);
            let (nx, ny) = (nx as usize, ny as usize);
            self.report_cleared(id, kind, nx, ny);
            self.put_empty(nx, ny);
        }
    }

    fn report_cleared(&mut self, id: PieceId, kind: PieceKind, x: usize, y: usize) {
        self.events.push(BoardEvent::Cleared {
            id,
            kind,
            x,
            y,
            score: kind.piece_type().score(),
        });
    }

    pub fn clear_row(&mut self, row: usize) {
        if row >= self.height {
            return;
        }
        for x in 0..self.width {
            self.clear_piece(x, row);
        }
    }

    pub fn clear_column(&mut self, column: usize) {
        if column >= self.width {
            return;
        }
        for y in 0..self.height {
            self.clear_piece(column, y);
        }
    }

    /// Clear every piece of `color`; `Any` clears every coloured piece.
    pub fn clear_color(&mut self, color: TileColor) {
        let targets: Vec<(usize, usize)> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| match self.piece(x, y).color() {
                Some(c) => color == TileColor::Any || c == color,
                None => false,
            })
            .collect();
        for (x, y) in targets {
            self.clear_piece(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{BoardEvent, PieceKind, PieceType, TileColor};

    #[test]
    fn test_clear_piece_empties_slot_and_reports_once() {
        let mut g = grid(&["ypb", "bgy"]);
        assert!(g.clear_piece(1, 0));
        assert_eq!(kind(&g, 1, 0), PieceKind::Empty);
        assert!(!g.clear_piece(1, 0), "empty slot is not clearable");
        let events: Vec<BoardEvent> = g.drain_events().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            BoardEvent::Cleared { kind: PieceKind::Normal(TileColor::Purple), x: 1, y: 0, score: 10, .. }
        ));
    }

    #[test]
    fn test_clear_piece_outside_board_is_rejected() {
        let mut g = grid(&["ypb", "bgy", "ypb"]);
        assert!(!g.clear_piece(3, 0));
        assert!(!g.clear_piece(0, 3));
        assert_eq!(kind(&g, 0, 1), PieceKind::Normal(TileColor::Blue));
        assert_eq!(g.drain_events().count(), 0);
    }

    #[test]
    fn test_orthogonal_bubble_cleared_diagonal_kept() {
        let mut g = grid(&[
            "oyo", //
            "bpo", //
            "gyb", //
        ]);
        g.clear_piece(1, 1);
        // (0,0) and (2,0) are diagonal to (1,1); (2,1) is orthogonal.
        assert_eq!(kind(&g, 2, 1), PieceKind::Empty);
        assert_eq!(kind(&g, 0, 0), PieceKind::Bubble);
        assert_eq!(kind(&g, 2, 0), PieceKind::Bubble);
        assert_eq!(cleared_count(&mut g), 2);
    }

    #[test]
    fn test_obstacle_propagation_is_one_hop() {
        let mut g = grid(&["poo", "ygb"]);
        g.clear_piece(0, 0);
        assert_eq!(kind(&g, 1, 0), PieceKind::Empty);
        assert_eq!(kind(&g, 2, 0), PieceKind::Bubble);
    }

    #[test]
    fn test_row_clear_wipes_its_row() {
        let mut g = grid(&["ypbg", "bgyp", "ypbg"]);
        g.place(2, 1, PieceKind::RowClear(TileColor::Green));
        g.drain_events().for_each(drop);
        assert!(g.clear_piece(2, 1));
        for x in 0..4 {
            assert_eq!(kind(&g, x, 1), PieceKind::Empty);
        }
        assert!(matches!(kind(&g, 2, 0), PieceKind::Normal(_)));
        assert_eq!(cleared_count(&mut g), 4);
    }

    #[test]
    fn test_column_clear_wipes_its_column() {
        let mut g = grid(&["ypb", "bgy", "ypb"]);
        g.place(0, 1, PieceKind::ColumnClear(TileColor::Red));
        g.clear_piece(0, 1);
        for y in 0..3 {
            assert_eq!(kind(&g, 0, y), PieceKind::Empty);
        }
        assert!(matches!(kind(&g, 1, 1), PieceKind::Normal(_)));
    }

    #[test]
    fn test_chained_specials_clear_each_piece_once() {
        let mut g = grid(&["ypbg", "bgyp", "ypbg", "gbpy"]);
        g.place(1, 1, PieceKind::RowClear(TileColor::Blue));
        g.place(3, 1, PieceKind::ColumnClear(TileColor::Blue));
        g.drain_events().for_each(drop);
        g.clear_piece(1, 1);
        for x in 0..4 {
            assert_eq!(kind(&g, x, 1), PieceKind::Empty);
        }
        for y in 0..4 {
            assert_eq!(kind(&g, 3, y), PieceKind::Empty);
        }
        // Row of 4 plus the 3 other cells of column 3.
        assert_eq!(cleared_count(&mut g), 7);
    }

    #[test]
    fn test_clear_color_only_hits_that_color() {
        let mut g = grid(&["yrb", "rgr", "obr"]);
        g.clear_color(TileColor::Red);
        assert!(g.pieces().all(|p| p.color() != Some(TileColor::Red)));
        assert_eq!(kind(&g, 0, 0), PieceKind::Normal(TileColor::Yellow));
        assert_eq!(kind(&g, 2, 0), PieceKind::Normal(TileColor::Blue));
        assert_eq!(kind(&g, 1, 1), PieceKind::Normal(TileColor::Green));
        assert_eq!(kind(&g, 1, 2), PieceKind::Normal(TileColor::Blue));
    }

    #[test]
    fn test_clear_color_any_clears_every_coloured_piece() {
        let mut g = grid(&["ypo", "bgk", "ooy"]);
        g.clear_color(TileColor::Any);
        assert!(g.pieces().all(|p| !p.is_colored()));
        // Bubbles are only reachable through adjacency.
        assert!(g.pieces_of_type(PieceType::Bubble).len() < 3);
    }

    #[test]
    fn test_rainbow_broadcasts_its_tag() {
        let mut g = grid(&["rbr", "yrg", "bpr"]);
        g.place(1, 1, PieceKind::Rainbow(TileColor::Red));
        g.drain_events().for_each(drop);
        g.clear_piece(1, 1);
        assert!(g.pieces().all(|p| p.color() != Some(TileColor::Red)));
        assert_eq!(kind(&g, 1, 0), PieceKind::Normal(TileColor::Blue));
        assert_eq!(kind(&g, 0, 1), PieceKind::Normal(TileColor::Yellow));
        // The rainbow itself plus the reds at (0,0), (2,0) and (2,2).
        assert_eq!(cleared_count(&mut g), 4);
    }

    #[test]
    fn test_cascade_match_of_three_spawns_nothing() {
        let mut g = grid(&["ypby", "rrrg", "ypbp"]);
        assert!(g.clear_all_valid_matches());
        for x in 0..3 {
            assert_eq!(kind(&g, x, 1), PieceKind::Empty);
        }
        assert_eq!(cleared_count(&mut g), 3);
    }

    #[test]
    fn test_cascade_match_of_four_spawns_line_clear_in_match() {
        let mut g = grid(&["ypbgy", "rrrrg", "ypbgy"]);
        assert!(g.clear_all_valid_matches());
        let specials: Vec<_> = (0..4)
            .map(|x| kind(&g, x, 1))
            .filter(|k| k.is_line_clear())
            .collect();
        assert_eq!(specials.len(), 1);
        assert_eq!(specials[0].color(), Some(TileColor::Red));
    }

    #[test]
    fn test_match_of_five_spawns_wildcard_rainbow() {
        let mut g = grid(&["ypbgyp", "gggggb", "ypbrrp"]);
        assert!(g.clear_all_valid_matches());
        let rainbows = g.pieces_of_type(PieceType::Rainbow);
        assert_eq!(rainbows.len(), 1);
        assert_eq!(rainbows[0].kind, PieceKind::Rainbow(TileColor::Any));
        assert_eq!(rainbows[0].y, 1);
    }

    #[test]
    fn test_no_match_means_no_refill() {
        let mut g = grid(&["ypb", "bgy", "ypb"]);
        assert!(!g.clear_all_valid_matches());
    }
}
