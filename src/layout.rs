//! Text board layouts: one line per row, one character per cell.
//!
//! `.` empty, `o` bubble, `y p r b g k` normal yellow/purple/red/blue/green/pink,
//! `*` rainbow. Blank lines are skipped.

use crate::board::{PieceKind, Seed, TileColor};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown cell {ch:?} at line {line}, column {column}")]
    UnknownCell { ch: char, line: usize, column: usize },
    #[error("line {line} has {found} cells, expected {expected}")]
    Ragged {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("layout has no rows")]
    Empty,
}

/// Parsed layout: board dimensions plus the non-empty seed entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub seeds: Vec<Seed>,
}

impl Layout {
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let s = std::fs::read_to_string(path)?;
        Self::parse(&s)
    }

    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        let mut seeds = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (n, line) in s.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                continue;
            }
            let mut cells = 0;
            for (column, ch) in line.chars().enumerate() {
                let kind = cell_kind(ch).ok_or(LayoutError::UnknownCell {
                    ch,
                    line: n + 1,
                    column: column + 1,
                })?;
                if kind != PieceKind::Empty {
                    seeds.push(Seed {
                        x: column as i32,
                        y: height as i32,
                        kind,
                    });
                }
                cells += 1;
            }
            match width {
                None => width = Some(cells),
                Some(expected) if expected != cells => {
                    return Err(LayoutError::Ragged {
                        line: n + 1,
                        found: cells,
                        expected,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }

        let width = width.ok_or(LayoutError::Empty)?;
        Ok(Self {
            width,
            height,
            seeds,
        })
    }
}

fn cell_kind(ch: char) -> Option<PieceKind> {
    match ch {
        '.' => Some(PieceKind::Empty),
        'o' => Some(PieceKind::Bubble),
        '*' => Some(PieceKind::Rainbow(TileColor::Any)),
        c => TileColor::from_layout_char(c).map(PieceKind::Normal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions_and_seeds() {
        let layout = Layout::parse("y.o\n*kb\n").unwrap();
        assert_eq!((layout.width, layout.height), (3, 2));
        assert_eq!(layout.seeds.len(), 5);
        assert_eq!(
            layout.seeds[0],
            Seed {
                x: 0,
                y: 0,
                kind: PieceKind::Normal(TileColor::Yellow)
            }
        );
        assert_eq!(layout.seeds[1].kind, PieceKind::Bubble);
        assert_eq!(layout.seeds[2].kind, PieceKind::Rainbow(TileColor::Any));
        assert_eq!((layout.seeds[3].x, layout.seeds[3].y), (1, 1));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let layout = Layout::parse("\nyp\n\n  \nbg\n").unwrap();
        assert_eq!(layout.height, 2);
        assert_eq!(layout.seeds[2].y, 1);
    }

    #[test]
    fn test_unknown_cell_reports_position() {
        let err = Layout::parse("yp\nbx").unwrap_err();
        assert!(matches!(
            err,
            LayoutError::UnknownCell {
                ch: 'x',
                line: 2,
                column: 2
            }
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Layout::parse("ypb\nbg").unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Ragged {
                line: 2,
                found: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn test_empty_layout_rejected() {
        assert!(matches!(Layout::parse("\n\n"), Err(LayoutError::Empty)));
    }
}
