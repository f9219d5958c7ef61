use rand::{SeedableRng, rngs::StdRng};

pub mod animated;
pub mod backtrack;
pub mod loops;

pub use animated::{AnimatedGeneration, Frame, Phase};
pub use loops::LoopPolicy;

use crate::{
    error::{ConfigError, MazeError},
    maze::{CellSet, Coord, Maze, blocked::stencil_isolates_cells},
    solvers::{Path, solve_maze},
};

/// Share of the maze area carved as extra passages in an imperfect maze.
pub const DEFAULT_LOOP_DENSITY: f64 = 0.1;

/// Get a random number generator seeded for reproducibility.
fn get_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Everything the generator needs for one run. Seed resolution happens before this
/// record is built, so generation is a pure function of it.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub width: u16,
    pub height: u16,
    pub entry: Coord,
    pub exit: Coord,
    pub seed: u64,
    pub perfect: bool,
    pub loops: LoopPolicy,
}

impl GenerationParams {
    /// A perfect maze with the default loop policy kept for [`Self::with_perfect`].
    pub fn new(width: u16, height: u16, entry: Coord, exit: Coord, seed: u64) -> Self {
        GenerationParams {
            width,
            height,
            entry,
            exit,
            seed,
            perfect: true,
            loops: LoopPolicy::from_density(width, height, DEFAULT_LOOP_DENSITY),
        }
    }

    pub fn with_perfect(mut self, perfect: bool) -> Self {
        self.perfect = perfect;
        self
    }

    pub fn with_loop_policy(mut self, loops: LoopPolicy) -> Self {
        self.loops = loops;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the geometry the core itself depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if stencil_isolates_cells(self.width, self.height) {
            return Err(ConfigError::IsolatedPockets {
                width: self.width,
                height: self.height,
            });
        }
        let in_bounds = |(x, y): Coord| x < self.width && y < self.height;
        if !in_bounds(self.entry) {
            return Err(ConfigError::OutOfBounds {
                name: "entry",
                coord: self.entry,
            });
        }
        if !in_bounds(self.exit) {
            return Err(ConfigError::OutOfBounds {
                name: "exit",
                coord: self.exit,
            });
        }
        if self.entry == self.exit {
            return Err(ConfigError::SameEntryExit);
        }
        Ok(())
    }
}

/// A finished, validated maze. Read-only from here on; regenerating builds a new one.
#[derive(Debug, Clone)]
pub struct GeneratedMaze {
    pub maze: Maze,
    pub entry: Coord,
    pub exit: Coord,
    /// Blocked cells, with entry and exit already exempted.
    pub blocked: CellSet,
    pub seed: u64,
    pub perfect: bool,
    /// Passages added on top of the spanning tree.
    pub loops_added: usize,
}

impl GeneratedMaze {
    /// Shortest route from entry to exit.
    pub fn solve(&self) -> Result<Path, MazeError> {
        solve_maze(&self.maze, self.entry, self.exit)
    }
}

/// Carves a maze for `params`: blocked region, spanning tree, optional loops, then
/// the connectivity check.
pub fn generate_maze(params: GenerationParams) -> Result<GeneratedMaze, MazeError> {
    AnimatedGeneration::new(params)?.finish()
}
