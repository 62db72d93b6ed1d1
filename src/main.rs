//! matchtui: match-three puzzle in the terminal.

mod app;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result, ensure};
use app::App;
use clap::{Parser, ValueEnum};
use matchtui::board::Seed;
use matchtui::layout::Layout;
use matchtui::level::Goal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Bubbles scattered for an obstacle goal when neither a layout nor `--bubbles` provides any.
const DEFAULT_OBSTACLE_BUBBLES: usize = 6;
/// Largest board side; tiles are drawn 4 cells wide, so this also keeps
/// terminal coordinates well inside `u16`.
const MAX_BOARD_SIDE: usize = 64;

/// Options derived from CLI that shape the board and the level rules.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Initial pieces from `--layout`; empty means a board filled by gravity.
    pub seeds: Vec<Seed>,
    pub bubbles: usize,
    pub seed: Option<u64>,
    pub goal: Goal,
    pub target_score: u32,
    pub stars: [u32; 3],
    /// Delay between two cascade steps.
    pub fill_interval: Duration,
    pub no_animation: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig::from_args(&args)?;
    tracing::info!(
        width = config.width,
        height = config.height,
        goal = ?config.goal,
        seed = ?config.seed,
        "starting"
    );
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// The terminal belongs to the UI, so logs only go to a file when one is requested.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

impl GameConfig {
    fn from_args(args: &Args) -> Result<Self> {
        let (width, height, seeds) = match &args.layout {
            Some(path) => {
                let layout = Layout::load(path)
                    .with_context(|| format!("cannot load layout {}", path.display()))?;
                (layout.width, layout.height, layout.seeds)
            }
            None => (args.width as usize, args.height as usize, Vec::new()),
        };
        ensure!(width >= 3 && height >= 3, "board must be at least 3x3");
        ensure!(
            width <= MAX_BOARD_SIDE && height <= MAX_BOARD_SIDE,
            "board must be at most {MAX_BOARD_SIDE}x{MAX_BOARD_SIDE}"
        );

        let goal = match args.goal {
            GoalKind::Moves => Goal::Moves { moves: args.moves },
            GoalKind::Timer => Goal::Timer {
                limit: Duration::from_secs(args.time_limit),
            },
            GoalKind::Obstacle => Goal::Obstacle { moves: args.moves },
        };
        let bubbles = match (args.goal, args.bubbles, args.layout.is_some()) {
            (GoalKind::Obstacle, 0, false) => DEFAULT_OBSTACLE_BUBBLES,
            (_, n, _) => n,
        };

        let stars: [u32; 3] = args
            .stars
            .as_slice()
            .try_into()
            .context("--stars takes exactly three thresholds")?;
        ensure!(
            stars.windows(2).all(|w| w[0] <= w[1]),
            "--stars thresholds must be ascending"
        );

        Ok(Self {
            width,
            height,
            seeds,
            bubbles,
            seed: args.seed,
            goal,
            target_score: args.target_score,
            stars,
            fill_interval: Duration::from_millis(args.fill_time_ms.max(1)),
            no_animation: args.no_animation,
        })
    }
}

/// Match-three puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "matchtui",
    version,
    about = "Match-three puzzle in the terminal. Swap neighbouring tiles to line up three or more of a colour.",
    long_about = "matchtui is a terminal match-three puzzle.\n\n\
        Swap two neighbouring tiles to make a line of three or more of one colour. \
        Four in a line leaves a row or column blaster, five or more a rainbow that clears \
        every tile of the colour it is swapped with. Bubbles are cleared by matches next to them.\n\n\
        CONTROLS:\n  Arrows / hjkl  Move cursor   Space / Enter  Select, then pick a neighbour\n  \
        Mouse          Drag a tile onto a neighbour\n  P  Pause    R  Restart (after game over)    Q / Esc  Quit"
)]
pub struct Args {
    /// Board width in tiles (ignored with --layout).
    #[arg(long, default_value = "8", value_name = "COLS")]
    pub width: u16,

    /// Board height in tiles (ignored with --layout).
    #[arg(long, default_value = "8", value_name = "ROWS")]
    pub height: u16,

    /// Text layout for the initial board (`.` empty, `o` bubble, `ypbgrk` colours, `*` rainbow).
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Level goal: moves (score within a move budget), timer (score before time runs out), obstacle (clear all bubbles).
    #[arg(short, long, default_value = "moves")]
    pub goal: GoalKind,

    /// Move budget for the moves and obstacle goals.
    #[arg(long, default_value = "20", value_name = "N")]
    pub moves: u32,

    /// In goal 'timer': time limit in seconds.
    #[arg(long, default_value = "120", value_name = "SECS")]
    pub time_limit: u64,

    /// Score needed to win the moves and timer goals.
    #[arg(long, default_value = "600", value_name = "N")]
    pub target_score: u32,

    /// Score thresholds for one, two and three stars.
    #[arg(long, value_delimiter = ',', default_value = "600,1200,1800", value_name = "A,B,C")]
    pub stars: Vec<u32>,

    /// Bubbles scattered over the lower half when no layout is given (obstacle goal defaults to 6).
    #[arg(long, default_value = "0", value_name = "N")]
    pub bubbles: usize,

    /// Seed for the board's random source; random when absent.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Milliseconds between cascade steps (falling, refilling, chain clears).
    #[arg(long, default_value = "90", value_name = "MS")]
    pub fill_time_ms: u64,

    /// Resolve cascades instantly and skip the clear flash.
    #[arg(long)]
    pub no_animation: bool,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write logs to this file (filter with RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GoalKind {
    #[default]
    Moves,
    Timer,
    Obstacle,
}
