use std::{collections::HashSet, fmt::Display};

use crate::{
    lab::{Direction, Laboratory, Layout, Position, Tile},
    Error,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guard {
    pos: Position,
    dir: Direction,
}

impl Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.dir, self.pos())
    }
}

impl Guard {
    pub fn new(pos: &Position, dir: Direction) -> Self {
        Self {
            pos: pos.clone(),
            dir,
        }
    }

    pub fn pos(&self) -> &Position {
        &self.pos
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }

    pub fn ahead_pos(&self) -> Option<Position> {
        self.pos.along(self.dir)
    }

    /// Guard after one step of patrol, `None` if the guard walks out of `layout`.
    ///
    /// Facing an obstacle, the guard turns right and stays where it is, otherwise it
    /// moves one tile ahead.
    pub fn step<L: Layout + ?Sized>(&self, layout: &L) -> Option<Guard> {
        let ahead_pos = self.ahead_pos()?;
        match layout.tile(&ahead_pos)? {
            Tile::Obstacle => Some(Self::new(&self.pos, self.dir.turn_right())),
            Tile::Floor => Some(Self::new(&ahead_pos, self.dir)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolOutcome {
    Exited,
    Looped,
}

/// What a patrol records besides guard states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    StatesOnly,
    Positions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatrolRecord {
    outcome: PatrolOutcome,
    state_n: usize,
    positions: HashSet<Position>,
}

impl PatrolRecord {
    pub fn outcome(&self) -> PatrolOutcome {
        self.outcome
    }

    /// Count of distinct guard states met during patrol.
    pub fn state_n(&self) -> usize {
        self.state_n
    }

    /// Visited positions, always empty if not tracked.
    pub fn positions(&self) -> &HashSet<Position> {
        &self.positions
    }
}

/// Simulate patrol of guard from `start` until it leaves `layout` or meets a state seen before.
///
/// A patrol can't take more steps than guard states in `layout`, exceeding that means
/// something is broken and `Error::PatrolOverrun` is returned.
pub fn patrol<L: Layout + ?Sized>(
    layout: &L,
    start: &Guard,
    track: Track,
) -> Result<PatrolRecord, Error> {
    let max_step_n = layout.row_n() * layout.col_n() * 4;
    let mut seen_guards = HashSet::new();
    let mut positions = HashSet::new();
    let mut cur_guard = start.clone();
    let mut step_n = 0;
    let outcome = loop {
        if track == Track::Positions {
            positions.insert(cur_guard.pos().clone());
        }

        if !seen_guards.insert(cur_guard.clone()) {
            break PatrolOutcome::Looped;
        }

        match cur_guard.step(layout) {
            Some(next_guard) => cur_guard = next_guard,
            None => break PatrolOutcome::Exited,
        }

        step_n += 1;
        if step_n > max_step_n {
            return Err(Error::PatrolOverrun(step_n));
        }
    };

    Ok(PatrolRecord {
        outcome,
        state_n: seen_guards.len(),
        positions,
    })
}

impl Laboratory {
    /// Baseline patrol with visited positions tracked.
    pub fn patrol_positions(&self) -> Result<PatrolRecord, Error> {
        patrol(self, self.guard(), Track::Positions)
    }

    pub fn is_loop_if_patrol(&self) -> Result<bool, Error> {
        patrol(self, self.guard(), Track::StatesOnly)
            .map(|record| record.outcome() == PatrolOutcome::Looped)
    }
}

#[test]
fn test_example_visits_41() {
    let lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let record = lab.patrol_positions().unwrap();
    assert_eq!(record.outcome(), PatrolOutcome::Exited);
    assert_eq!(record.positions().len(), 41);
    assert!(record.positions().contains(lab.guard().pos()));
    assert!(!lab.is_loop_if_patrol().unwrap());
}

#[test]
fn test_render_example_patrol() {
    let lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let record = lab.patrol_positions().unwrap();
    let expect = "\
....#.....
....XXXXX#
....X...X.
..#.X...X.
..XXXXX#X.
..X.X.X.X.
.#XXXXXXX.
.XXXXXXX#.
#XXXXXXX..
......#X..";
    assert_eq!(lab.render_patrol(record.positions()), expect);
}

#[test]
fn test_patrol_is_repeatable() {
    let lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let view = lab.with_obstacle(&Position::new(7, 6));
    let first = patrol(&view, lab.guard(), Track::Positions).unwrap();
    let second = patrol(&view, lab.guard(), Track::Positions).unwrap();
    assert_eq!(first.outcome(), PatrolOutcome::Looped);
    assert_eq!(first, second);
}

#[test]
fn test_loop_states_within_bound() {
    let lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let view = lab.with_obstacle(&Position::new(6, 3));
    let record = patrol(&view, lab.guard(), Track::StatesOnly).unwrap();
    assert_eq!(record.outcome(), PatrolOutcome::Looped);
    assert!(record.state_n() <= lab.row_n() * lab.col_n() * 4);
    assert!(record.positions().is_empty());
}

#[test]
fn test_single_tile_exits() {
    let lab = crate::parse_lab("^").unwrap();
    let record = lab.patrol_positions().unwrap();
    assert_eq!(record.outcome(), PatrolOutcome::Exited);
    assert_eq!(record.state_n(), 1);
    assert_eq!(record.positions().len(), 1);
}

#[test]
fn test_corridor_open_end_exits() {
    let lab = crate::parse_lab(".\n.\n.\n^").unwrap();
    let record = lab.patrol_positions().unwrap();
    assert_eq!(record.outcome(), PatrolOutcome::Exited);
    assert_eq!(record.positions().len(), 4);

    let lab = crate::parse_lab(">....").unwrap();
    let record = lab.patrol_positions().unwrap();
    assert_eq!(record.outcome(), PatrolOutcome::Exited);
    assert_eq!(record.positions().len(), 5);
}

#[test]
fn test_turn_without_moving() {
    let lab = crate::parse_lab(".#.\n.^#\n.#.").unwrap();
    let start = lab.guard().clone();
    let turned = start.step(&lab).unwrap();
    assert_eq!(turned.pos(), start.pos());
    assert_eq!(turned.dir(), Direction::Right);
    let turned = turned.step(&lab).unwrap();
    assert_eq!(turned.pos(), start.pos());
    assert_eq!(turned.dir(), Direction::Down);
    let turned = turned.step(&lab).unwrap();
    assert_eq!(turned.pos(), start.pos());
    assert_eq!(turned.dir(), Direction::Left);
    let moved = turned.step(&lab).unwrap();
    assert_eq!(moved.pos(), &Position::new(1, 0));
    assert_eq!(moved.dir(), Direction::Left);
    assert_eq!(moved.step(&lab), None);

    let record = lab.patrol_positions().unwrap();
    assert_eq!(record.outcome(), PatrolOutcome::Exited);
    assert_eq!(record.state_n(), 5);
    assert_eq!(record.positions().len(), 2);
}

#[test]
fn test_boxed_in_loops() {
    let lab = crate::parse_lab(".#.\n#^#\n.#.").unwrap();
    let record = lab.patrol_positions().unwrap();
    assert_eq!(record.outcome(), PatrolOutcome::Looped);
    assert_eq!(record.state_n(), 4);
    assert_eq!(record.positions().len(), 1);
}
