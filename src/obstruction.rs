use clap::ValueEnum;
use rayon::prelude::*;

use crate::{
    lab::{Laboratory, Layout, Position, Tile},
    patrol::{patrol, Guard, PatrolOutcome, Track},
    Error,
};

/// Which positions get tried as a new obstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CandidateSet {
    /// Every floor tile except the guard's start.
    AllFloor,
    /// Only tiles on the guard's original route if the guard leaves the laboratory,
    /// tiles off that route can't change it. When the original route loops already,
    /// every floor tile keeps it looping, so all of them are tried.
    PatrolPath,
}

/// Candidate positions in row-major order, never including the guard's start position.
pub fn candidates(lab: &Laboratory, set: CandidateSet) -> Result<Vec<Position>, Error> {
    let floor_positions = || {
        lab.positions()
            .filter(|pos| lab.tile(pos) == Some(Tile::Floor))
            .collect::<Vec<_>>()
    };
    let mut positions = match set {
        CandidateSet::AllFloor => floor_positions(),
        CandidateSet::PatrolPath => {
            let record = lab.patrol_positions()?;
            if record.outcome() == PatrolOutcome::Looped {
                floor_positions()
            } else {
                let mut positions = record.positions().iter().cloned().collect::<Vec<_>>();
                positions.sort();
                positions
            }
        }
    };
    positions.retain(|pos| pos != lab.guard().pos());

    Ok(positions)
}

fn is_loop_trial<L: Layout + ?Sized>(layout: &L, start: &Guard) -> Result<bool, Error> {
    patrol(layout, start, Track::StatesOnly)
        .map(|record| record.outcome() == PatrolOutcome::Looped)
}

/// Positions where one more obstacle makes the guard patrol forever.
///
/// Trials run in parallel, each one sees the shared laboratory through its own
/// single-tile override.
pub fn loop_obstructions(lab: &Laboratory, set: CandidateSet) -> Result<Vec<Position>, Error> {
    let trial_results = candidates(lab, set)?
        .into_par_iter()
        .map(|pos| {
            let is_loop = is_loop_trial(&lab.with_obstacle(&pos), lab.guard())?;
            Ok::<_, Error>(is_loop.then_some(pos))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(trial_results.into_iter().flatten().collect())
}

/// Same as [`loop_obstructions`], but trials run one by one on `lab` itself.
///
/// Each trial's obstacle is removed before the next one starts, `lab` is unchanged on return.
pub fn loop_obstructions_in_place(
    lab: &mut Laboratory,
    set: CandidateSet,
) -> Result<Vec<Position>, Error> {
    let candidates = candidates(lab, set)?;
    let start = lab.guard().clone();
    let mut loop_positions = Vec::new();
    for pos in candidates {
        let obstructed = lab.obstruct(&pos)?;
        if is_loop_trial(&obstructed, &start)? {
            loop_positions.push(pos);
        }
    }

    Ok(loop_positions)
}

pub fn count_loop_obstructions(lab: &Laboratory) -> Result<usize, Error> {
    loop_obstructions(lab, CandidateSet::AllFloor).map(|positions| positions.len())
}

#[cfg(test)]
fn example_loop_positions() -> Vec<Position> {
    [(6, 3), (7, 6), (7, 7), (8, 1), (8, 3), (9, 7)]
        .into_iter()
        .map(|(r, c)| Position::new(r, c))
        .collect()
}

#[test]
fn test_example_loop_obstructions() {
    let lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    assert_eq!(count_loop_obstructions(&lab).unwrap(), 6);
    assert_eq!(
        loop_obstructions(&lab, CandidateSet::AllFloor).unwrap(),
        example_loop_positions()
    );
    assert_eq!(
        loop_obstructions(&lab, CandidateSet::PatrolPath).unwrap(),
        example_loop_positions()
    );
}

#[test]
fn test_in_place_matches_parallel() {
    let mut lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let origin = lab.clone();
    for set in [CandidateSet::AllFloor, CandidateSet::PatrolPath] {
        assert_eq!(
            loop_obstructions_in_place(&mut lab, set).unwrap(),
            example_loop_positions()
        );
        assert_eq!(lab, origin);
    }
}

#[test]
fn test_candidates_skip_start_and_obstacles() {
    let lab = crate::parse_lab(crate::EXAMPLE_LAB).unwrap();
    let all_floor = candidates(&lab, CandidateSet::AllFloor).unwrap();
    assert_eq!(all_floor.len(), 100 - 8 - 1);
    assert!(!all_floor.contains(lab.guard().pos()));
    assert!(all_floor
        .iter()
        .all(|pos| lab.tile(pos) == Some(Tile::Floor)));

    let on_path = candidates(&lab, CandidateSet::PatrolPath).unwrap();
    assert_eq!(on_path.len(), 40);
    assert!(!on_path.contains(lab.guard().pos()));
}

#[test]
fn test_single_tile_has_no_candidates() {
    let mut lab = crate::parse_lab("^").unwrap();
    assert!(candidates(&lab, CandidateSet::AllFloor).unwrap().is_empty());
    assert_eq!(count_loop_obstructions(&lab).unwrap(), 0);
    assert!(loop_obstructions_in_place(&mut lab, CandidateSet::AllFloor)
        .unwrap()
        .is_empty());
}

#[test]
fn test_looping_route_keeps_looping_anywhere() {
    let corners = [(0, 0), (0, 2), (2, 0), (2, 2)]
        .into_iter()
        .map(|(r, c)| Position::new(r, c))
        .collect::<Vec<_>>();
    let mut lab = crate::parse_lab(".#.\n#^#\n.#.").unwrap();
    assert!(lab.is_loop_if_patrol().unwrap());
    assert_eq!(
        candidates(&lab, CandidateSet::PatrolPath).unwrap(),
        corners
    );
    assert_eq!(
        loop_obstructions(&lab, CandidateSet::AllFloor).unwrap(),
        corners
    );
    assert_eq!(
        loop_obstructions(&lab, CandidateSet::PatrolPath).unwrap(),
        corners
    );
    let origin = lab.clone();
    for set in [CandidateSet::AllFloor, CandidateSet::PatrolPath] {
        assert_eq!(loop_obstructions_in_place(&mut lab, set).unwrap(), corners);
        assert_eq!(lab, origin);
    }
}

#[test]
fn test_corridor_never_loops() {
    let lab = crate::parse_lab(".\n.\n.\n^").unwrap();
    assert_eq!(candidates(&lab, CandidateSet::AllFloor).unwrap().len(), 3);
    assert_eq!(count_loop_obstructions(&lab).unwrap(), 0);
}
