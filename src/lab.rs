use std::{collections::HashSet, fmt::Display, ops::Deref};

use crate::{patrol::Guard, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "^"),
            Direction::Right => write!(f, ">"),
            Direction::Down => write!(f, "v"),
            Direction::Left => write!(f, "<"),
        }
    }
}

impl Direction {
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '^' => Some(Direction::Up),
            '>' => Some(Direction::Right),
            'v' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            _ => None,
        }
    }

    pub fn turn_right(&self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Unit step as (row delta, column delta).
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    r: usize,
    c: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    /// Neighbor one step along `dir`, `None` when it would leave the top or left edge.
    pub fn along(&self, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        let r = self.r.checked_add_signed(dr)?;
        let c = self.c.checked_add_signed(dc)?;
        Some(Self::new(r, c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Obstacle,
}

impl Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tile::Floor => write!(f, "."),
            Tile::Obstacle => write!(f, "#"),
        }
    }
}

/// Read-only view of tiles the guard patrols over.
pub trait Layout {
    fn row_n(&self) -> usize;
    fn col_n(&self) -> usize;
    /// Tile at `pos`, `None` if `pos` is outside.
    fn tile(&self, pos: &Position) -> Option<Tile>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Laboratory {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: usize,
    guard: Guard,
}

impl Display for Laboratory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.row_n {
            if r > 0 {
                writeln!(f)?;
            }

            for c in 0..self.col_n {
                let pos = Position::new(r, c);
                if pos == *self.guard.pos() {
                    write!(f, "{}", self.guard.dir())?;
                } else {
                    write!(f, "{}", self.tiles[r * self.col_n + c])?;
                }
            }
        }

        Ok(())
    }
}

impl Layout for Laboratory {
    fn row_n(&self) -> usize {
        self.row_n
    }

    fn col_n(&self) -> usize {
        self.col_n
    }

    fn tile(&self, pos: &Position) -> Option<Tile> {
        Laboratory::tile(self, pos)
    }
}

impl Laboratory {
    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn is_inside(&self, pos: &Position) -> bool {
        pos.r < self.row_n && pos.c < self.col_n
    }

    pub fn tile(&self, pos: &Position) -> Option<Tile> {
        self.index(pos).map(|ind| self.tiles[ind])
    }

    pub fn tile_at(&self, pos: &Position) -> Result<Tile, Error> {
        self.tile(pos).ok_or_else(|| Error::OutOfBounds(pos.clone()))
    }

    /// Replace tile at `pos`, returns the replaced one.
    pub fn set_tile(&mut self, pos: &Position, tile: Tile) -> Result<Tile, Error> {
        let ind = self
            .index(pos)
            .ok_or_else(|| Error::OutOfBounds(pos.clone()))?;
        Ok(std::mem::replace(&mut self.tiles[ind], tile))
    }

    /// Put an obstacle at `pos` until the returned value is dropped.
    pub fn obstruct(&mut self, pos: &Position) -> Result<ObstructedLab<'_>, Error> {
        let last_tile = self.set_tile(pos, Tile::Obstacle)?;
        Ok(ObstructedLab {
            lab: self,
            pos: pos.clone(),
            last_tile,
        })
    }

    /// View of this laboratory with one extra obstacle at `pos`, leaving tiles untouched.
    pub fn with_obstacle(&self, pos: &Position) -> Obstructed<'_> {
        Obstructed {
            lab: self,
            obstacle: pos.clone(),
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.row_n).flat_map(move |r| (0..self.col_n).map(move |c| Position::new(r, c)))
    }

    pub fn render_patrol(&self, visited: &HashSet<Position>) -> String {
        let mut text = String::with_capacity((self.col_n + 1) * self.row_n);
        for r in 0..self.row_n {
            if r > 0 {
                text.push('\n');
            }

            for c in 0..self.col_n {
                let pos = Position::new(r, c);
                let glyph = match self.tiles[r * self.col_n + c] {
                    Tile::Obstacle => '#',
                    Tile::Floor if visited.contains(&pos) => 'X',
                    Tile::Floor => '.',
                };
                text.push(glyph);
            }
        }

        text
    }

    fn index(&self, pos: &Position) -> Option<usize> {
        if self.is_inside(pos) {
            Some(pos.r * self.col_n + pos.c)
        } else {
            None
        }
    }
}

/// Single-cell override on top of a shared laboratory.
#[derive(Debug, Clone)]
pub struct Obstructed<'a> {
    lab: &'a Laboratory,
    obstacle: Position,
}

impl Layout for Obstructed<'_> {
    fn row_n(&self) -> usize {
        self.lab.row_n
    }

    fn col_n(&self) -> usize {
        self.lab.col_n
    }

    fn tile(&self, pos: &Position) -> Option<Tile> {
        if *pos == self.obstacle && self.lab.is_inside(pos) {
            Some(Tile::Obstacle)
        } else {
            self.lab.tile(pos)
        }
    }
}

/// Laboratory with one obstacle put in place, restores the replaced tile on drop.
#[derive(Debug)]
pub struct ObstructedLab<'a> {
    lab: &'a mut Laboratory,
    pos: Position,
    last_tile: Tile,
}

impl Deref for ObstructedLab<'_> {
    type Target = Laboratory;

    fn deref(&self) -> &Self::Target {
        &*self.lab
    }
}

impl Layout for ObstructedLab<'_> {
    fn row_n(&self) -> usize {
        self.lab.row_n
    }

    fn col_n(&self) -> usize {
        self.lab.col_n
    }

    fn tile(&self, pos: &Position) -> Option<Tile> {
        self.lab.tile(pos)
    }
}

impl Drop for ObstructedLab<'_> {
    fn drop(&mut self) {
        // Position was checked when obstructing.
        if let Some(ind) = self.lab.index(&self.pos) {
            self.lab.tiles[ind] = self.last_tile;
        }
        debug_assert!(self.lab.tile(&self.pos) == Some(self.last_tile));
    }
}

#[derive(Debug)]
pub struct LaboratoryBuilder {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: Option<usize>,
    guard: Option<Guard>,
}

impl LaboratoryBuilder {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            row_n: 0,
            col_n: None,
            guard: None,
        }
    }

    pub fn add_row(&mut self, row_text: &str) -> Result<(), Error> {
        let tile_n = row_text.chars().count();
        match self.col_n {
            Some(col_n) if col_n != tile_n => return Err(Error::InconsistentRow(col_n, tile_n)),
            _ => self.col_n = Some(tile_n),
        }

        let r = self.row_n;
        for (c, glyph) in row_text.chars().enumerate() {
            let tile = match glyph {
                '.' => Tile::Floor,
                '#' => Tile::Obstacle,
                marker => self.place_guard(Position::new(r, c), marker)?,
            };
            self.tiles.push(tile);
        }
        self.row_n += 1;

        Ok(())
    }

    /// The guard stands on floor, so the tile under a guard marker is floor.
    fn place_guard(&mut self, pos: Position, marker: char) -> Result<Tile, Error> {
        let dir = Direction::from_marker(marker).ok_or(Error::InvalidChar(marker))?;
        let guard = Guard::new(&pos, dir);
        match self.guard.take() {
            Some(first_guard) => Err(Error::MultipleGuards(first_guard, guard)),
            None => {
                self.guard = Some(guard);
                Ok(Tile::Floor)
            }
        }
    }

    pub fn build(self) -> Result<Laboratory, Error> {
        let guard = self.guard.ok_or(Error::NoGuard)?;
        Ok(Laboratory {
            tiles: self.tiles,
            row_n: self.row_n,
            col_n: self.col_n.unwrap_or(0),
            guard,
        })
    }
}

#[test]
fn test_turn_right_cycle() {
    let mut dir = Direction::Up;
    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(dir);
        dir = dir.turn_right();
    }

    assert_eq!(
        seen,
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    );
    assert_eq!(dir, Direction::Up);
}

#[test]
fn test_along_edges() {
    let corner = Position::new(0, 0);
    assert_eq!(corner.along(Direction::Up), None);
    assert_eq!(corner.along(Direction::Left), None);
    assert_eq!(corner.along(Direction::Right), Some(Position::new(0, 1)));
    assert_eq!(corner.along(Direction::Down), Some(Position::new(1, 0)));
}

#[test]
fn test_build_example() {
    let lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    assert_eq!(lab.row_n(), 10);
    assert_eq!(lab.col_n(), 10);
    assert_eq!(lab.guard().pos(), &Position::new(6, 4));
    assert_eq!(lab.guard().dir(), Direction::Up);
    assert_eq!(lab.tile(&Position::new(0, 4)), Some(Tile::Obstacle));
    assert_eq!(lab.tile(&Position::new(6, 4)), Some(Tile::Floor));
    assert_eq!(lab.tile(&Position::new(10, 0)), None);
    assert_eq!(lab.to_string(), crate::EXAMPLE_LAB);
}

#[test]
fn test_other_markers() {
    let lab = crate::parse_lab("..\n.<").unwrap();
    assert_eq!(lab.guard().pos(), &Position::new(1, 1));
    assert_eq!(lab.guard().dir(), Direction::Left);
}

#[test]
fn test_inconsistent_row() {
    let err = crate::parse_lab("...\n.^\n...").unwrap_err();
    assert!(matches!(err, Error::InconsistentRow(3, 2)));
}

#[test]
fn test_no_guard() {
    assert!(matches!(crate::parse_lab("..\n.#"), Err(Error::NoGuard)));
    assert!(matches!(crate::parse_lab(""), Err(Error::NoGuard)));
}

#[test]
fn test_multiple_guards() {
    let err = crate::parse_lab(".^.\n..^").unwrap_err();
    match err {
        Error::MultipleGuards(first, second) => {
            assert_eq!(first.pos(), &Position::new(0, 1));
            assert_eq!(second.pos(), &Position::new(1, 2));
        }
        other => panic!("Unexpected error: {}", other),
    }
}

#[test]
fn test_invalid_char() {
    assert!(matches!(
        crate::parse_lab(".^.\n.O."),
        Err(Error::InvalidChar('O'))
    ));
}

#[test]
fn test_tile_at_out_of_bounds() {
    let lab = crate::parse_lab("^.").unwrap();
    assert_eq!(lab.tile_at(&Position::new(0, 1)).unwrap(), Tile::Floor);
    assert!(matches!(
        lab.tile_at(&Position::new(0, 2)),
        Err(Error::OutOfBounds(_))
    ));
}

#[test]
fn test_set_tile_then_restore() {
    let mut lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let origin = lab.clone();
    let pos = Position::new(3, 3);
    let last_tile = lab.set_tile(&pos, Tile::Obstacle).unwrap();
    assert_eq!(last_tile, Tile::Floor);
    assert_ne!(lab, origin);
    lab.set_tile(&pos, last_tile).unwrap();
    assert_eq!(lab, origin);
    assert!(lab.set_tile(&Position::new(0, 10), Tile::Obstacle).is_err());
}

#[test]
fn test_obstruct_restores_on_drop() {
    let mut lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let origin = lab.clone();
    {
        let obstructed = lab.obstruct(&Position::new(6, 3)).unwrap();
        assert_eq!(obstructed.tile(&Position::new(6, 3)), Some(Tile::Obstacle));
    }
    assert_eq!(lab, origin);
}

#[test]
fn test_obstruct_restores_on_panic() {
    let mut lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let origin = lab.clone();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _obstructed = lab.obstruct(&Position::new(0, 0)).unwrap();
        panic!("trial failed midway");
    }));

    assert!(result.is_err());
    assert_eq!(lab, origin);
}

#[test]
fn test_with_obstacle_overrides_one_tile() {
    let lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let view = lab.with_obstacle(&Position::new(2, 2));
    assert_eq!(view.tile(&Position::new(2, 2)), Some(Tile::Obstacle));
    assert_eq!(view.tile(&Position::new(2, 3)), Some(Tile::Floor));
    assert_eq!(view.tile(&Position::new(0, 4)), Some(Tile::Obstacle));
    assert_eq!(lab.tile(&Position::new(2, 2)), Some(Tile::Floor));

    let outside = lab.with_obstacle(&Position::new(20, 20));
    assert_eq!(outside.tile(&Position::new(20, 20)), None);
}
