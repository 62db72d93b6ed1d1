//! Match detection: a straight run of three or more plus at most one perpendicular branch.

use super::Grid;
use super::piece::{Piece, TileColor};

/// A connected same-colour group of at least three slots. The first entry is
/// the slot the search started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub color: TileColor,
    pub cells: Vec<(usize, usize)>,
}

impl Match {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.cells.contains(&(x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Match for `piece` evaluated as if it sat at `(x, y)`. The slot itself is not
/// read, so swap pre-checks can ask about a hypothetical placement.
///
/// Horizontal first: a run of three or more, extended by the first member whose
/// vertical run has two more pieces. Only when that fails is the vertical run
/// tried, with a horizontal branch. Returns `None` for uncoloured pieces.
pub fn find_match(grid: &Grid, piece: &Piece, x: usize, y: usize) -> Option<Match> {
    let color = piece.color()?;
    [Axis::Horizontal, Axis::Vertical]
        .into_iter()
        .find_map(|axis| match_along(grid, color, x, y, axis))
}

fn match_along(grid: &Grid, color: TileColor, x: usize, y: usize, axis: Axis) -> Option<Match> {
    let mut line = vec![(x, y)];
    line.extend(run(grid, color, x, y, axis));
    if line.len() < 3 {
        return None;
    }
    let mut cells = line.clone();
    for &(px, py) in &line {
        let branch = run(grid, color, px, py, axis.cross());
        if branch.len() >= 2 {
            cells.extend(branch);
            break;
        }
    }
    Some(Match { color, cells })
}

/// Contiguous same-colour slots next to `(x, y)` along `axis`, excluding `(x, y)`:
/// the backward direction first, then forward.
fn run(grid: &Grid, color: TileColor, x: usize, y: usize, axis: Axis) -> Vec<(usize, usize)> {
    let (dx, dy) = match axis {
        Axis::Horizontal => (1, 0),
        Axis::Vertical => (0, 1),
    };
    let mut out = Vec::new();
    for sign in [-1i32, 1] {
        let mut step = 1;
        loop {
            let nx = x as i32 + sign * dx * step;
            let ny = y as i32 + sign * dy * step;
            match grid.get(nx, ny) {
                Some(p) if p.color() == Some(color) => out.push((nx as usize, ny as usize)),
                _ => break,
            }
            step += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::super::test_support::grid;
    use super::*;

    fn sorted(mut cells: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_straight_three_is_exact() {
        let g = grid(&["ypby", "rrrg", "ypbp"]);
        let m = find_match(&g, g.piece(1, 1), 1, 1).unwrap();
        assert_eq!(m.color, TileColor::Red);
        assert_eq!(sorted(m.cells), vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_run_of_two_is_none() {
        let g = grid(&["ypbg", "rrbg", "ypyp"]);
        assert!(find_match(&g, g.piece(0, 1), 0, 1).is_none());
    }

    #[test]
    fn test_t_shape_returns_all_five() {
        let g = grid(&[
            "rrrb", //
            "yrpb", //
            "grgy", //
        ]);
        let m = find_match(&g, g.piece(0, 0), 0, 0).unwrap();
        assert_eq!(m.len(), 5);
        assert_eq!(sorted(m.cells), vec![(0, 0), (1, 0), (1, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn test_l_shape_from_the_corner() {
        let g = grid(&[
            "ryy", //
            "rpb", //
            "rrr", //
        ]);
        let m = find_match(&g, g.piece(0, 2), 0, 2).unwrap();
        assert_eq!(sorted(m.cells), vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_only_the_first_branch_is_taken() {
        // Both ends of the row have a vertical pair below; only the left one joins.
        let g = grid(&[
            "rrr", //
            "rpr", //
            "rbr", //
        ]);
        let m = find_match(&g, g.piece(1, 0), 1, 0).unwrap();
        assert_eq!(m.len(), 5);
        assert!(m.contains(0, 2));
        assert!(!m.contains(2, 2));
    }

    #[test]
    fn test_vertical_when_horizontal_fails() {
        let g = grid(&["pbg", "yrb", "yrg", "pry"]);
        let m = find_match(&g, g.piece(1, 2), 1, 2).unwrap();
        assert_eq!(m.cells[0], (1, 2));
        assert_eq!(sorted(m.cells), vec![(1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_four_in_a_line() {
        let g = grid(&["gggg", "ypby"]);
        assert_eq!(find_match(&g, g.piece(3, 0), 3, 0).unwrap().len(), 4);
    }

    #[test]
    fn test_hypothetical_position() {
        // The blue at (3,0) would complete the run if it sat at (2,1).
        let g = grid(&["pyyb", "bbgy"]);
        let m = find_match(&g, g.piece(3, 0), 2, 1).unwrap();
        assert_eq!(sorted(m.cells), vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_uncoloured_piece_never_matches() {
        let g = grid(&["ooo", "ypb"]);
        assert!(find_match(&g, g.piece(1, 0), 1, 0).is_none());
    }
}
