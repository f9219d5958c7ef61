use std::fmt;

mod bfs;

pub use bfs::solve_bfs;

use crate::{
    error::MazeError,
    maze::{Coord, Direction, Maze},
};

/// A route through the maze: a start cell and the moves taken from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    start: Coord,
    directions: Vec<Direction>,
}

impl Path {
    pub fn new(start: Coord, directions: Vec<Direction>) -> Self {
        Path { start, directions }
    }

    /// Parses a `NESW` letter string. Returns `None` on an unknown letter or a move
    /// off the top or left edge.
    pub fn from_letters(start: Coord, letters: &str) -> Option<Self> {
        let directions = letters
            .chars()
            .map(Direction::from_letter)
            .collect::<Option<Vec<_>>>()?;
        let path = Path::new(start, directions);
        path.try_cells().map(|_| path)
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Number of edges traversed.
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    fn try_cells(&self) -> Option<Vec<Coord>> {
        let mut cells = Vec::with_capacity(self.directions.len() + 1);
        cells.push(self.start);
        let mut current = self.start;
        for dir in &self.directions {
            current = dir.step(current)?;
            cells.push(current);
        }
        Some(cells)
    }

    /// Every cell visited, start and end included.
    pub fn cells(&self) -> Vec<Coord> {
        // Paths are only built by the solver or from_letters, both of which stay in range
        self.try_cells().unwrap_or_default()
    }

    pub fn end(&self) -> Coord {
        self.cells().last().copied().unwrap_or(self.start)
    }

    /// Whether every move goes through an open passage of `maze`.
    pub fn is_walkable(&self, maze: &Maze) -> bool {
        let mut current = self.start;
        for &dir in &self.directions {
            let Some(next) = maze.neighbor(current, dir) else {
                return false;
            };
            if maze.has_wall(current, dir) || maze.has_wall(next, dir.opposite()) {
                return false;
            }
            current = next;
        }
        true
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.directions
            .iter()
            .try_for_each(|dir| write!(f, "{}", dir))
    }
}

/// Finds the shortest route from `entry` to `exit`.
pub fn solve_maze(maze: &Maze, entry: Coord, exit: Coord) -> Result<Path, MazeError> {
    solve_bfs(maze, entry, exit)
}
