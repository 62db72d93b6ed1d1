//! Layout and drawing: board, sidebar, pause, level end, score popups and clear flash.

use crate::app::{Screen, ScorePopup};
use crate::theme::Theme;
use matchtui::board::{Grid, PieceKind, PieceType};
use matchtui::level::{Goal, Level, Outcome};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// One tile is 4 columns by 2 rows so it reads roughly square.
const TILE_W: u16 = 4;
const TILE_H: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
/// Sum of the sidebar sections in `draw_sidebar`.
const SIDEBAR_MIN_HEIGHT: u16 = 18;
/// Flash on cleared slots.
const CLEAR_FADE_MS: u32 = 350;

/// Board size in terminal cells, border included.
fn board_outer_size(grid_w: usize, grid_h: usize) -> (u16, u16) {
    (grid_w as u16 * TILE_W + 2, grid_h as u16 * TILE_H + 2)
}

/// Board and sidebar centred in `area`, as laid out by `draw_game`.
fn split_game_area(area: Rect, grid_w: usize, grid_h: usize) -> (Rect, Rect) {
    let (bw, bh) = board_outer_size(grid_w, grid_h);
    let total_w = bw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bh.max(SIDEBAR_MIN_HEIGHT)),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let board = Rect {
        height: bh.min(inner[0].height),
        ..inner[0]
    };
    (board, inner[1])
}

/// Tile area inside the board border.
fn board_rect(area: Rect, grid_w: usize, grid_h: usize) -> Rect {
    let (outer, _) = split_game_area(area, grid_w, grid_h);
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: (grid_w as u16 * TILE_W).min(outer.width.saturating_sub(2)),
        height: (grid_h as u16 * TILE_H).min(outer.height.saturating_sub(2)),
    }
}

/// Grid slot under a terminal position, if any. Used for mouse play.
pub fn cell_at(area: Rect, grid_w: usize, grid_h: usize, column: u16, row: u16) -> Option<(usize, usize)> {
    let board = board_rect(area, grid_w, grid_h);
    if !board.contains(Position::new(column, row)) {
        return None;
    }
    let x = ((column - board.x) / TILE_W) as usize;
    let y = ((row - board.y) / TILE_H) as usize;
    (x < grid_w && y < grid_h).then_some((x, y))
}

/// Buffer positions covered by the given slots.
fn tile_buffer_positions(board: Rect, cells: &[(usize, usize)]) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for &(gx, gy) in cells {
        let x0 = board.x + gx as u16 * TILE_W;
        let y0 = board.y + gy as u16 * TILE_H;
        for bx in x0..(x0 + TILE_W).min(board.x + board.width) {
            for by in y0..(y0 + TILE_H).min(board.y + board.height) {
                set.insert((bx, by));
            }
        }
    }
    set
}

/// Create or advance the clear flash (TachyonFX: cleared slots fade in from white).
fn apply_clear_effect(
    frame: &mut Frame,
    board: Rect,
    cleared: &[(usize, usize)],
    theme: &Theme,
    clear_effect: &mut Option<Effect>,
    process_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *process_time = Some(now);

    if clear_effect.is_none() {
        let positions = tile_buffer_positions(board, cleared);
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            positions.contains(&(pos.x, pos.y))
        }));
        let effect = fx::fade_from(theme.special, theme.special, (CLEAR_FADE_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board);
        *clear_effect = Some(effect);
    }

    if let Some(effect) = clear_effect {
        frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
    }
}

/// Draw the current screen with optional pause overlay, popups and clear flash.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    grid: &Grid,
    level: &Level,
    theme: &Theme,
    cursor: (usize, usize),
    paused: bool,
    popups: &[ScorePopup],
    cleared: &[(usize, usize)],
    clear_effect: &mut Option<Effect>,
    clear_process_time: &mut Option<Instant>,
    now: Instant,
    no_animation: bool,
) {
    let area = frame.area();
    draw_game(frame, grid, level, theme, cursor, popups, area);
    let board = board_rect(area, grid.width(), grid.height());
    if !cleared.is_empty() && !no_animation {
        apply_clear_effect(frame, board, cleared, theme, clear_effect, clear_process_time, now);
    }
    match screen {
        Screen::Playing if paused => draw_pause_overlay(frame, theme, area),
        Screen::Playing => {}
        Screen::LevelEnd => draw_level_end(frame, level, theme, area),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P: Resume    Q: Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_level_end(frame: &mut Frame, level: &Level, theme: &Theme, area: Rect) {
    let (title, title_style, stars) = match level.outcome() {
        Some(Outcome::Won { stars }) => (
            " Level complete! ",
            Style::default().fg(Color::Black).bg(Color::Green),
            stars,
        ),
        _ => {
            let title = match level.goal() {
                Goal::Timer { .. } => " Time's up! ",
                _ => " Out of moves ",
            };
            (title, Style::default().fg(Color::White).bg(Color::Red), 0)
        }
    };
    let fg = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, title_style)),
        Line::from(""),
        Line::from(Span::styled(star_string(stars), Style::default().fg(theme.title).bold())),
        Line::from(Span::styled(format!(" Score: {} ", level.score()), fg)),
        Line::from(Span::styled(format!(" Target: {} ", level.target_score()), fg)),
        Line::from(""),
        Line::from(Span::styled(" R: Restart    Q: Quit ", fg)),
        Line::from(""),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" matchtui ", theme.title)),
        )
        .render(centered(area, 30, 11), frame.buffer_mut());
}

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn star_string(stars: u8) -> String {
    (0..3)
        .map(|i| if i < stars { '★' } else { '☆' })
        .collect()
}

/// Board plus sidebar, centred in the full area.
fn draw_game(
    frame: &mut Frame,
    grid: &Grid,
    level: &Level,
    theme: &Theme,
    cursor: (usize, usize),
    popups: &[ScorePopup],
    area: Rect,
) {
    let (board_area, sidebar_area) = split_game_area(area, grid.width(), grid.height());
    draw_board(frame, grid, theme, cursor, popups, board_area);
    draw_sidebar(frame, grid, level, theme, sidebar_area);
}

/// Background, two glyph characters and glyph colour for a tile.
fn tile_look(kind: PieceKind, theme: &Theme) -> (Color, [&'static str; 2], Color) {
    match kind {
        PieceKind::Empty => (theme.bg, [" ", " "], theme.bg),
        PieceKind::Normal(c) => (theme.tile_color(c.index()), [" ", " "], theme.bg),
        PieceKind::Bubble => (theme.bg, ["(", ")"], theme.bubble),
        PieceKind::RowClear(c) => (theme.tile_color(c.index()), ["◀", "▶"], theme.special),
        PieceKind::ColumnClear(c) => (theme.tile_color(c.index()), ["▲", "▼"], theme.special),
        PieceKind::Rainbow(c) => (theme.bg, ["✦", "✦"], theme.tile_color(c.index())),
    }
}

fn draw_board(
    frame: &mut Frame,
    grid: &Grid,
    theme: &Theme,
    cursor: (usize, usize),
    popups: &[ScorePopup],
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" matchtui ", theme.title));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let selected = grid.pressed_slot();
    let buf = frame.buffer_mut();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let piece = grid.piece(x, y);
            let (bg, glyph, glyph_fg) = tile_look(piece.kind, theme);
            let rainbow = piece.piece_type() == PieceType::Rainbow;
            let frame_color = if selected == Some((x, y)) {
                Some(theme.title)
            } else if cursor == (x, y) {
                Some(theme.special)
            } else {
                None
            };

            for dy in 0..TILE_H {
                for dx in 0..TILE_W {
                    let rx = inner.x + x as u16 * TILE_W + dx;
                    let ry = inner.y + y as u16 * TILE_H + dy;
                    if rx >= inner.x + inner.width || ry >= inner.y + inner.height {
                        continue;
                    }
                    let corner = match (dx, dy) {
                        (0, 0) => Some("▛"),
                        (d, 0) if d == TILE_W - 1 => Some("▜"),
                        (0, d) if d == TILE_H - 1 => Some("▙"),
                        (a, b) if a == TILE_W - 1 && b == TILE_H - 1 => Some("▟"),
                        _ => None,
                    };
                    let (symbol, fg) = match (frame_color, corner) {
                        (Some(color), Some(c)) => (c, color),
                        _ if dy == 0 && (dx == 1 || dx == 2) => {
                            let fg = if rainbow {
                                theme.tile_color(((x + y + dx as usize) % 6) as u8)
                            } else {
                                glyph_fg
                            };
                            (glyph[dx as usize - 1], fg)
                        }
                        _ => (" ", glyph_fg),
                    };
                    buf[(rx, ry)]
                        .set_symbol(symbol)
                        .set_style(Style::default().fg(fg).bg(bg));
                }
            }
        }
    }

    for popup in popups {
        let rx = inner.x + popup.x as u16 * TILE_W;
        let ry = (inner.y + popup.y as u16 * TILE_H).saturating_sub(popup.rise);
        if rx < inner.x + inner.width && ry >= inner.y && ry < inner.y + inner.height {
            let style = Style::default().fg(theme.title).bg(theme.bg).bold();
            buf.set_string(rx, ry, format!("+{}", popup.amount), style);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, grid: &Grid, level: &Level, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Level (border + goal, left, stars, status)
            Constraint::Length(1), // gap
            Constraint::Length(5), // Score (border + score + progress bar)
            Constraint::Length(1), // gap
            Constraint::Length(3), // Colours
        ])
        .split(area);

    let level_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let level_inner = level_block.inner(chunks[0]);
    level_block.render(chunks[0], frame.buffer_mut());
    let goal = match level.goal() {
        Goal::Moves { .. } => "Score",
        Goal::Timer { .. } => "Beat the clock",
        Goal::Obstacle { .. } => "Pop bubbles",
    };
    let mut lines = vec![
        Line::from(vec![Span::styled("Goal: ", title_style), Span::styled(goal, fg_style)]),
        Line::from(vec![
            Span::styled("Left: ", title_style),
            Span::styled(level.remaining_label(), fg_style),
        ]),
    ];
    if matches!(level.goal(), Goal::Obstacle { .. }) {
        lines.push(Line::from(vec![
            Span::styled("Bubbles: ", title_style),
            Span::styled(grid.pieces_of_type(PieceType::Bubble).len().to_string(), fg_style),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Stars: ", title_style),
        Span::styled(star_string(level.stars()), fg_style),
    ]));
    let status = if grid.is_filling() {
        Span::styled("filling…", Style::default().fg(theme.inactive_fg))
    } else {
        Span::styled("your move", fg_style)
    };
    lines.push(Line::from(status));
    Paragraph::new(Text::from(lines)).render(level_inner, frame.buffer_mut());

    let score_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let score_inner = score_block.inner(chunks[2]);
    score_block.render(chunks[2], frame.buffer_mut());
    let score_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(score_inner);
    Paragraph::new(Line::from(vec![
        Span::styled("Score: ", title_style),
        Span::styled(level.score().to_string(), fg_style),
    ]))
    .render(score_layout[0], frame.buffer_mut());
    Paragraph::new(Line::from(vec![
        Span::styled("Target: ", title_style),
        Span::styled(level.target_score().to_string(), fg_style),
    ]))
    .render(score_layout[1], frame.buffer_mut());
    let ratio = if level.target_score() > 0 {
        (level.score() as f64 / level.target_score() as f64).min(1.0)
    } else {
        1.0
    };
    let bar_color = if ratio >= 1.0 {
        Color::Green
    } else if ratio > 0.5 {
        Color::Yellow
    } else {
        Color::Red
    };
    Gauge::default()
        .ratio(ratio)
        .gauge_style(Style::default().fg(bar_color))
        .render(score_layout[2], frame.buffer_mut());

    let colours_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let colours_inner = colours_block.inner(chunks[4]);
    colours_block.render(chunks[4], frame.buffer_mut());
    draw_colour_strip(frame, theme, colours_inner);
}

/// One swatch per tile colour.
fn draw_colour_strip(frame: &mut Frame, theme: &Theme, area: Rect) {
    let spans: Vec<Span> = theme
        .tiles
        .iter()
        .map(|&c| Span::styled("██ ", Style::default().fg(c)))
        .collect();
    Paragraph::new(Line::from(spans)).render(area, frame.buffer_mut());
}
