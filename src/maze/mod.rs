pub mod blocked;
pub mod cell;
pub mod grid;

use std::collections::HashSet;

pub use cell::{Direction, Walls};
pub use grid::Grid;

use crate::error::MazeError;

/// Cell coordinate `(x, y)`, origin at the top-left, x growing east and y growing south.
pub type Coord = (u16, u16);

/// Set of permanently walled cells.
pub type CellSet = HashSet<Coord>;

/// A rectangular maze of wall masks.
///
/// Every wall between two cells is stored twice, once on each side. All mutation
/// goes through [`Maze::remove_wall`] / [`Maze::carve`], which always clear both
/// bits together so the two sides never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    grid: Grid<Walls>,
}

impl Maze {
    /// Creates a new maze with the given width and height, every cell fully walled.
    pub fn new(width: u16, height: u16) -> Self {
        Maze {
            grid: Grid::new(width, height, Walls::ALL),
        }
    }

    /// Builds a maze from raw cell masks, e.g. when reading a saved file.
    /// Returns `None` if the masks disagree about a shared wall.
    pub fn from_grid(grid: Grid<Walls>) -> Option<Self> {
        let maze = Maze { grid };
        maze.is_consistent().then_some(maze)
    }

    pub fn grid(&self) -> &Grid<Walls> {
        &self.grid
    }

    /// Returns the height of the maze in cells.
    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    /// Returns the width of the maze in cells.
    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        self.grid.is_in_bounds(coord)
    }

    /// The in-bounds neighbor of `coord` in direction `dir`, if any.
    pub fn neighbor(&self, coord: Coord, dir: Direction) -> Option<Coord> {
        dir.step(coord).filter(|&c| self.is_in_bounds(c))
    }

    /// Tests the wall bit of `coord` facing `dir`.
    pub fn has_wall(&self, coord: Coord, dir: Direction) -> bool {
        self.grid[coord].contains(dir.wall())
    }

    /// Removes the wall between two 4-neighbors, clearing both sides at once.
    ///
    /// # Returns
    /// `Ok(true)` if a wall was removed, `Ok(false)` if the passage was already open.
    ///
    /// # Errors
    /// `OutOfBounds` if either cell lies outside the maze, `NotAdjacent` if the
    /// cells are not 4-neighbors.
    pub fn remove_wall(&mut self, a: Coord, b: Coord) -> Result<bool, MazeError> {
        for coord in [a, b] {
            if !self.is_in_bounds(coord) {
                return Err(MazeError::OutOfBounds(coord));
            }
        }
        let dir = Direction::between(a, b).ok_or(MazeError::NotAdjacent(a, b))?;
        Ok(self.open(a, b, dir))
    }

    /// Removes the wall on side `dir` of `coord`, together with the matching wall of
    /// the neighbor. Returns the neighbor and whether a wall was removed.
    ///
    /// # Errors
    /// `OutOfBounds` if `coord` is outside the maze or the side faces the border.
    pub fn carve(&mut self, coord: Coord, dir: Direction) -> Result<(Coord, bool), MazeError> {
        if !self.is_in_bounds(coord) {
            return Err(MazeError::OutOfBounds(coord));
        }
        let next = self
            .neighbor(coord, dir)
            .ok_or(MazeError::OutOfBounds(coord))?;
        Ok((next, self.open(coord, next, dir)))
    }

    fn open(&mut self, a: Coord, b: Coord, dir: Direction) -> bool {
        let removed = self.has_wall(a, dir);
        self.grid[a].remove(dir.wall());
        self.grid[b].remove(dir.opposite().wall());
        removed
    }

    /// Iterates over the open neighbors of `coord` in canonical N, E, S, W order.
    pub fn passages(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL.into_iter().filter_map(move |dir| {
            if self.has_wall(coord, dir) {
                return None;
            }
            self.neighbor(coord, dir).map(|next| (dir, next))
        })
    }

    /// Counts passages between cells. Each open edge is counted once.
    pub fn open_edge_count(&self) -> usize {
        self.coords()
            .map(|coord| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|&dir| {
                        self.neighbor(coord, dir).is_some() && !self.has_wall(coord, dir)
                    })
                    .count()
            })
            .sum()
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (width, height) = (self.width(), self.height());
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Checks that every shared wall agrees on both sides.
    pub fn is_consistent(&self) -> bool {
        self.coords().all(|coord| {
            [Direction::East, Direction::South].into_iter().all(|dir| {
                match self.neighbor(coord, dir) {
                    Some(next) => self.has_wall(coord, dir) == self.has_wall(next, dir.opposite()),
                    None => true,
                }
            })
        })
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = Walls;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[index]
    }
}
