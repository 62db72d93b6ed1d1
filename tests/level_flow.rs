use matchtui::board::{BoardRng, Grid};
use matchtui::layout::Layout;
use matchtui::level::{Goal, Level, Outcome};

fn grid(text: &str) -> Grid {
    let layout = Layout::parse(text).unwrap();
    Grid::new(layout.width, layout.height, &layout.seeds, BoardRng::seeded(21))
}

fn feed(level: &mut Level, grid: &mut Grid) {
    for event in grid.drain_events() {
        level.apply(&event);
    }
}

const BOARD: &str = "\
ypbgyp
bgypbg
rrbgyp
gyrpgy
ypbgyp
bgypbg
";

#[test]
fn test_single_move_level_is_scored_after_cascade() {
    let mut g = grid(BOARD);
    g.settle();
    let mut level = Level::new(Goal::Moves { moves: 1 }, 30, [30, 100, 1000]);

    assert!(g.try_swap((2, 3), (2, 2)));
    feed(&mut level, &mut g);
    assert!(level.score() >= 30);
    assert_eq!(level.remaining_moves(), Some(0));
    // The board is still refilling; nothing is decided yet.
    assert_eq!(level.evaluate(&g), None);

    g.settle();
    feed(&mut level, &mut g);
    let outcome = level.evaluate(&g);
    assert!(matches!(outcome, Some(Outcome::Won { stars }) if stars >= 1));
    g.game_over();
    assert!(!g.try_swap((0, 0), (1, 0)));
}

#[test]
fn test_obstacle_level_clears_its_only_bubble() {
    let mut g = grid(
        "\
ypbgyp
bgypbg
rrbgyp
gorpgy
ypbgyp
bgypbg
",
    );
    g.settle();
    let mut level = Level::new(Goal::Obstacle { moves: 5 }, 0, [10, 20, 30]);
    assert_eq!(level.evaluate(&g), None);

    assert!(g.try_swap((2, 3), (2, 2)));
    feed(&mut level, &mut g);
    g.settle();
    feed(&mut level, &mut g);
    assert!(matches!(level.evaluate(&g), Some(Outcome::Won { .. })));
}
