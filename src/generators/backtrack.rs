use rand::{Rng, seq::SliceRandom};

use crate::{
    error::MazeError,
    maze::{CellSet, Coord, Direction, Grid, Maze},
};

/// Outcome of one backtracker step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveStep {
    /// A wall was removed and `to` pushed onto the stack.
    Carved { from: Coord, to: Coord },
    /// `from` had no unvisited neighbor left and was popped.
    Backtracked(Coord),
}

impl CarveStep {
    /// The cell the carver is looking at after this step.
    pub fn cursor(&self) -> Coord {
        match *self {
            CarveStep::Carved { to, .. } => to,
            CarveStep::Backtracked(from) => from,
        }
    }
}

/// Randomized depth-first carver with an explicit stack, so large mazes do not
/// hit recursion limits. Produces a spanning tree over every non-blocked cell
/// reachable from the start.
pub struct Backtracker {
    stack: Vec<Coord>,
    /// Cells the carver may no longer enter: visited or blocked.
    closed: Grid<bool>,
}

impl Backtracker {
    /// Starts a carving run from `start`. Blocked cells are never entered; the
    /// caller is expected to have exempted `start` from `blocked`.
    ///
    /// # Errors
    /// `OutOfBounds` if `start` lies outside the maze.
    pub fn new(maze: &Maze, start: Coord, blocked: &CellSet) -> Result<Self, MazeError> {
        if !maze.is_in_bounds(start) {
            return Err(MazeError::OutOfBounds(start));
        }
        let mut closed = Grid::new(maze.width(), maze.height(), false);
        blocked
            .iter()
            .filter(|&&coord| maze.is_in_bounds(coord))
            .for_each(|&coord| closed[coord] = true);
        closed[start] = true;
        Ok(Backtracker {
            stack: vec![start],
            closed,
        })
    }

    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    /// Performs one push or one pop. Returns `None` once the stack is empty.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        maze: &mut Maze,
        rng: &mut R,
    ) -> Result<Option<CarveStep>, MazeError> {
        let Some(&current) = self.stack.last() else {
            return Ok(None);
        };

        // The shuffle is the only consumer of randomness in this algorithm
        let mut directions = Direction::ALL;
        directions.shuffle(rng);

        let next = directions
            .into_iter()
            .filter_map(|dir| maze.neighbor(current, dir))
            .find(|&coord| !self.closed[coord]);

        match next {
            Some(next) => {
                maze.remove_wall(current, next)?;
                self.closed[next] = true;
                self.stack.push(next);
                Ok(Some(CarveStep::Carved {
                    from: current,
                    to: next,
                }))
            }
            None => {
                self.stack.pop();
                Ok(Some(CarveStep::Backtracked(current)))
            }
        }
    }

    /// Carves until the stack is empty.
    pub fn run<R: Rng + ?Sized>(&mut self, maze: &mut Maze, rng: &mut R) -> Result<(), MazeError> {
        while self.step(maze, rng)?.is_some() {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::blocked::{blocked_cells, blocked_cells_excluding};
    use rand::{SeedableRng, rngs::StdRng};

    /// Walks the open edges and reports whether a cycle exists.
    fn has_cycle(maze: &Maze, start: Coord) -> bool {
        let mut seen = Grid::new(maze.width(), maze.height(), false);
        let mut stack = vec![(start, None)];
        seen[start] = true;
        while let Some((coord, parent)) = stack.pop() {
            for (_, next) in maze.passages(coord) {
                if Some(next) == parent {
                    continue;
                }
                if seen[next] {
                    return true;
                }
                seen[next] = true;
                stack.push((next, Some(coord)));
            }
        }
        false
    }

    #[test]
    fn test_carves_spanning_tree() {
        let mut maze = Maze::new(12, 9);
        let blocked = blocked_cells(12, 9);
        let mut rng = StdRng::seed_from_u64(42);
        let mut carver = Backtracker::new(&maze, (0, 0), &blocked).unwrap();
        carver.run(&mut maze, &mut rng).unwrap();

        assert!(carver.is_done());
        assert_eq!(maze.open_edge_count(), maze.area() - blocked.len() - 1);
        assert!(!has_cycle(&maze, (0, 0)));
        assert!(maze.is_consistent());
    }

    #[test]
    fn test_exact_fit_stencil_cells_are_closed() {
        let (entry, exit) = ((0, 0), (6, 4));
        let mut maze = Maze::new(7, 5);
        let blocked = blocked_cells_excluding(7, 5, &[entry, exit]);
        let mut rng = StdRng::seed_from_u64(7);
        Backtracker::new(&maze, entry, &blocked)
            .unwrap()
            .run(&mut maze, &mut rng)
            .unwrap();

        for (row, y) in crate::maze::blocked::STENCIL.iter().zip(0u16..) {
            for (bit, x) in row.chars().zip(0u16..) {
                if bit == '1' && (x, y) != entry && (x, y) != exit {
                    assert!(maze[(x, y)].is_closed(), "cell {:?} was carved", (x, y));
                }
            }
        }
        // The exempted entry is carved out of the stencil
        assert!(!maze[entry].is_closed());
    }

    #[test]
    fn test_step_reports_cursor() {
        let mut maze = Maze::new(2, 1);
        let mut rng = StdRng::seed_from_u64(0);
        let mut carver = Backtracker::new(&maze, (0, 0), &CellSet::new()).unwrap();
        let steps = std::iter::from_fn(|| carver.step(&mut maze, &mut rng).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            steps,
            vec![
                CarveStep::Carved {
                    from: (0, 0),
                    to: (1, 0)
                },
                CarveStep::Backtracked((1, 0)),
                CarveStep::Backtracked((0, 0)),
            ]
        );
        assert_eq!(steps[0].cursor(), (1, 0));
    }

    #[test]
    fn test_start_out_of_bounds() {
        let maze = Maze::new(4, 3);
        assert!(matches!(
            Backtracker::new(&maze, (4, 0), &CellSet::new()),
            Err(MazeError::OutOfBounds((4, 0)))
        ));
        assert!(Backtracker::new(&maze, (3, 2), &CellSet::new()).is_ok());
    }
}
