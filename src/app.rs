//! App: terminal init, main loop, cascade pacing, key and mouse handling.

use crate::GameConfig;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use matchtui::board::{BoardEvent, BoardRng, Grid};
use matchtui::level::{Level, Outcome};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tachyonfx::Effect;
use tracing::{debug, info};

/// Render at roughly 60 FPS.
const FRAME: Duration = Duration::from_millis(16);
/// Score popups float up one row per step and vanish after their lifetime.
const POPUP_STEP_MS: u32 = 200;
const POPUP_LIFETIME_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    LevelEnd,
}

/// "+N" shown where a burst of clears happened.
#[derive(Debug, Clone)]
pub struct ScorePopup {
    pub x: usize,
    pub y: usize,
    pub amount: u32,
    pub age_ms: u32,
    /// Rows floated up so far.
    pub rise: u16,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    grid: Grid,
    level: Level,
    screen: Screen,
    paused: bool,
    /// The first cascade fills the board; its clears are not scored and input waits for it.
    warming_up: bool,
    cursor: (usize, usize),
    last_tick: Instant,
    last_frame: Instant,
    popups: Vec<ScorePopup>,
    /// Slots cleared by the latest burst, flashed by `clear_effect`.
    cleared: Vec<(usize, usize)>,
    clear_effect: Option<Effect>,
    clear_effect_process_time: Option<Instant>,
    /// Frame area of the last draw, for mouse hit tests.
    area: Rect,
}

fn new_board(config: &GameConfig) -> Grid {
    let rng = config.seed.map_or_else(BoardRng::default, BoardRng::seeded);
    let mut grid = Grid::new(config.width, config.height, &config.seeds, rng);
    if config.seeds.is_empty() {
        grid.scatter_bubbles(config.bubbles);
    }
    grid
}

fn new_level(config: &GameConfig) -> Level {
    Level::new(config.goal, config.target_score, config.stars)
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let now = Instant::now();
        Self {
            grid: new_board(&config),
            level: new_level(&config),
            config,
            theme,
            screen: Screen::Playing,
            paused: false,
            warming_up: true,
            cursor: (0, 0),
            last_tick: now,
            last_frame: now,
            popups: Vec::new(),
            cleared: Vec::new(),
            clear_effect: None,
            clear_effect_process_time: None,
            area: Rect::default(),
        }
    }

    fn reset_game(&mut self) {
        let now = Instant::now();
        self.grid = new_board(&self.config);
        self.level = new_level(&self.config);
        self.screen = Screen::Playing;
        self.paused = false;
        self.warming_up = true;
        self.cursor = (0, 0);
        self.last_tick = now;
        self.last_frame = now;
        self.popups.clear();
        self.cleared.clear();
        self.clear_effect = None;
        self.clear_effect_process_time = None;
        info!("level restarted");
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            let dt = now.saturating_duration_since(self.last_frame);
            self.last_frame = now;

            let mut area = self.area;
            terminal.draw(|f| {
                area = f.area();
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.grid,
                    &self.level,
                    &self.theme,
                    self.cursor,
                    self.paused,
                    &self.popups,
                    &self.cleared,
                    &mut self.clear_effect,
                    &mut self.clear_effect_process_time,
                    now,
                    self.config.no_animation,
                );
            })?;
            self.area = area;

            if self.clear_effect.as_ref().is_some_and(|e| e.done()) {
                self.clear_effect = None;
                self.clear_effect_process_time = None;
                self.cleared.clear();
            }
            self.tick_popups(dt);

            let timeout = FRAME.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            if self.handle_key(key) {
                                return Ok(());
                            }
                        }
                        Event::Mouse(mouse) => self.handle_mouse(mouse),
                        _ => {}
                    }
                }
            }

            if self.screen == Screen::Playing && !self.paused {
                self.update(dt);
            }
        }
    }

    /// Advance the level clock and the cascade, fold board events into the level
    /// and end the level once it is decided.
    fn update(&mut self, dt: Duration) {
        if !self.warming_up {
            self.level.advance(dt);
        }
        if self.grid.is_filling() && self.last_tick.elapsed() >= self.config.fill_interval {
            self.last_tick = Instant::now();
            if self.config.no_animation {
                self.grid.settle();
            } else {
                self.grid.tick();
            }
        }
        self.collect_events();

        if self.warming_up {
            if !self.grid.is_filling() {
                self.warming_up = false;
                debug!("board ready");
            }
            return;
        }
        if let Some(outcome) = self.level.evaluate(&self.grid) {
            self.grid.game_over();
            self.screen = Screen::LevelEnd;
            match outcome {
                Outcome::Won { stars } => info!(score = self.level.score(), stars, "level won"),
                Outcome::Lost => info!(score = self.level.score(), "level lost"),
            }
        }
    }

    fn collect_events(&mut self) {
        let mut burst = Vec::new();
        let mut points = 0;
        for event in self.grid.drain_events() {
            if self.warming_up {
                continue;
            }
            self.level.apply(&event);
            if let BoardEvent::Cleared { x, y, score, .. } = event {
                burst.push((x, y));
                points += score;
            }
        }
        if let Some(&(x, y)) = burst.first() {
            self.popups.push(ScorePopup {
                x,
                y,
                amount: points,
                age_ms: 0,
                rise: 0,
            });
            self.cleared = burst;
            self.clear_effect = None;
            self.clear_effect_process_time = None;
        }
    }

    fn tick_popups(&mut self, dt: Duration) {
        let delta_ms = dt.as_millis().min(u32::MAX as u128) as u32;
        self.popups.retain_mut(|p| {
            let old_steps = p.age_ms / POPUP_STEP_MS;
            p.age_ms += delta_ms;
            let new_steps = p.age_ms / POPUP_STEP_MS;
            if new_steps > old_steps {
                p.rise = p.rise.saturating_add(1);
            }
            p.age_ms < POPUP_LIFETIME_MS
        });
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let action = key_to_action(key);
        match (self.screen, action) {
            (_, Action::Quit) => return true,
            (Screen::LevelEnd, Action::Restart) => self.reset_game(),
            (Screen::Playing, Action::Pause) => self.paused = !self.paused,
            (Screen::Playing, _) if self.paused => {}
            (Screen::Playing, Action::CursorLeft) => self.move_cursor(-1, 0),
            (Screen::Playing, Action::CursorRight) => self.move_cursor(1, 0),
            (Screen::Playing, Action::CursorUp) => self.move_cursor(0, -1),
            (Screen::Playing, Action::CursorDown) => self.move_cursor(0, 1),
            (Screen::Playing, Action::Select) if !self.warming_up => self.select(),
            _ => {}
        }
        false
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.cursor;
        let nx = (x as i32 + dx).clamp(0, self.grid.width() as i32 - 1);
        let ny = (y as i32 + dy).clamp(0, self.grid.height() as i32 - 1);
        self.cursor = (nx as usize, ny as usize);
    }

    /// Keyboard play goes through the same press/enter/release gesture as the mouse.
    fn select(&mut self) {
        let (x, y) = self.cursor;
        match self.grid.pressed_slot() {
            None => self.grid.press_piece(x, y),
            Some(slot) if slot == self.cursor => {
                self.grid.release();
            }
            Some(slot) => {
                self.grid.enter_piece(x, y);
                let swapped = self.grid.release();
                debug!(from = ?slot, to = ?self.cursor, swapped, "keyboard swap");
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen != Screen::Playing || self.paused || self.warming_up {
            return;
        }
        let slot = crate::ui::cell_at(
            self.area,
            self.grid.width(),
            self.grid.height(),
            mouse.column,
            mouse.row,
        );
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((x, y)) = slot {
                    self.cursor = (x, y);
                    self.grid.press_piece(x, y);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x, y)) = slot {
                    self.grid.enter_piece(x, y);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.grid.release();
            }
            _ => {}
        }
    }
}
