pub mod lab;
pub mod obstruction;
pub mod patrol;

use std::{
    error,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;

use lab::{Laboratory, LaboratoryBuilder, Position};
use obstruction::CandidateSet;
use patrol::Guard;

#[derive(Debug)]
pub enum Error {
    InconsistentRow(usize, usize),
    MultipleGuards(Guard, Guard),
    InvalidChar(char),
    NoGuard,
    OutOfBounds(Position),
    PatrolOverrun(usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InconsistentRow(col_n, tile_n) => write!(
                f,
                "Row has {} tile(s) while the first row has {}.",
                tile_n, col_n
            ),
            Error::MultipleGuards(first, second) => write!(
                f,
                "Guard {} and guard {} both found, only one guard may patrol.",
                first, second
            ),
            Error::InvalidChar(c) => write!(f, "Unknown tile character({}).", c),
            Error::NoGuard => write!(f, "No guard marker in laboratory layout."),
            Error::OutOfBounds(pos) => write!(f, "Position{} is outside the laboratory.", pos),
            Error::PatrolOverrun(step_n) => write!(
                f,
                "Patrol still running after {} step(s), more than guard states in laboratory.",
                step_n
            ),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct Part1Args {
    /// Laboratory layout: '.' floor, '#' obstacle, and one guard marker,
    /// '^' (also '>', 'v' or '<' for a guard facing right, down or left).
    pub input_path: PathBuf,
    /// Print the laboratory with visited positions marked as X.
    #[arg(long)]
    pub draw: bool,
}

#[derive(Debug, Parser)]
pub struct Part2Args {
    /// Laboratory layout: '.' floor, '#' obstacle, and one guard marker,
    /// '^' (also '>', 'v' or '<' for a guard facing right, down or left).
    pub input_path: PathBuf,
    /// Number of worker threads, defaults to one per CPU.
    #[arg(short, long)]
    pub jobs: Option<usize>,
    #[arg(long, value_enum, default_value_t = CandidateSet::AllFloor)]
    pub candidates: CandidateSet,
    /// Run trials one by one, obstructing the laboratory itself.
    #[arg(long)]
    pub in_place: bool,
}

pub fn parse_lab(text: &str) -> Result<Laboratory, Error> {
    let mut builder = LaboratoryBuilder::new();
    for line in text.lines() {
        builder.add_row(line)?;
    }

    builder.build()
}

pub fn read_lab<P: AsRef<Path>>(path: P) -> Result<Laboratory> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read laboratory layout({}).", path.display()))?;
    let mut builder = LaboratoryBuilder::new();
    for (line_ind, row_text) in text.lines().enumerate() {
        builder
            .add_row(row_text)
            .with_context(|| format!("Bad layout at line {} of {}.", line_ind + 1, path.display()))?;
    }

    Ok(builder.build()?)
}

#[cfg(test)]
pub(crate) const EXAMPLE_LAB: &str = "\
....#.....
.........#
..........
..#.......
.......#..
..........
.#..^.....
........#.
#.........
......#...";
