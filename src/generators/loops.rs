use rand::Rng;

use crate::{
    error::MazeError,
    maze::{CellSet, Coord, Direction, Grid, Maze},
};

/// Attempts allowed per requested loop before the injector gives up.
pub const ATTEMPTS_PER_LOOP: usize = 20;

/// How many extra passages an imperfect maze gets, and how hard to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopPolicy {
    pub target: usize,
    pub max_attempts: usize,
}

impl LoopPolicy {
    /// Target proportional to the maze area, e.g. `0.1` gives one loop per ten cells.
    pub fn from_density(width: u16, height: u16, density: f64) -> Self {
        let area = width as usize * height as usize;
        let target = (area as f64 * density.clamp(0.0, 1.0)).floor() as usize;
        Self::with_target(target)
    }

    pub fn with_target(target: usize) -> Self {
        LoopPolicy {
            target,
            max_attempts: target.saturating_mul(ATTEMPTS_PER_LOOP),
        }
    }
}

/// Removes random walls from a carved maze to create cycles.
///
/// Walls touching a blocked cell, the entry or the exit are never removed, and
/// already-open sides do not count.
pub struct LoopInjector {
    policy: LoopPolicy,
    excluded: Grid<bool>,
    added: usize,
    attempts: usize,
}

impl LoopInjector {
    pub fn new(maze: &Maze, policy: LoopPolicy, blocked: &CellSet, keep: &[Coord]) -> Self {
        let mut excluded = Grid::new(maze.width(), maze.height(), false);
        blocked
            .iter()
            .chain(keep)
            .filter(|&&coord| maze.is_in_bounds(coord))
            .for_each(|&coord| excluded[coord] = true);
        LoopInjector {
            policy,
            excluded,
            added: 0,
            attempts: 0,
        }
    }

    pub fn added(&self) -> usize {
        self.added
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn is_done(&self) -> bool {
        self.added >= self.policy.target || self.attempts >= self.policy.max_attempts
    }

    /// Keeps drawing candidates until one wall is removed. Returns the cell the new
    /// passage starts from, or `None` once the target or the attempt budget is reached.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        maze: &mut Maze,
        rng: &mut R,
    ) -> Result<Option<Coord>, MazeError> {
        if maze.area() == 0 {
            return Ok(None);
        }
        while !self.is_done() {
            self.attempts += 1;
            let coord = (
                rng.random_range(0..maze.width()),
                rng.random_range(0..maze.height()),
            );
            let dir = Direction::ALL[rng.random_range(0..Direction::ALL.len())];

            let Some(next) = maze.neighbor(coord, dir) else {
                continue;
            };
            if self.excluded[coord] || self.excluded[next] || !maze.has_wall(coord, dir) {
                continue;
            }
            maze.remove_wall(coord, next)?;
            self.added += 1;
            return Ok(Some(coord));
        }
        Ok(None)
    }

    /// Injects loops until done. Returns the number of passages added.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        maze: &mut Maze,
        rng: &mut R,
    ) -> Result<usize, MazeError> {
        while self.step(maze, rng)?.is_some() {}
        Ok(self.added)
    }
}
