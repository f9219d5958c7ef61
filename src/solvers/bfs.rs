use std::collections::VecDeque;

use super::Path;
use crate::{
    error::MazeError,
    maze::{Coord, Direction, Grid, Maze},
};

/// Breadth-first search from `entry` to `exit` through open passages.
///
/// Neighbors are expanded in N, E, S, W order, so among equally short routes the
/// result is always the same for a given maze. The search stops when `exit` is
/// dequeued.
///
/// # Errors
/// `OutOfBounds` for an entry or exit outside the maze, `NoPath` if `exit` cannot
/// be reached.
pub fn solve_bfs(maze: &Maze, entry: Coord, exit: Coord) -> Result<Path, MazeError> {
    for coord in [entry, exit] {
        if !maze.is_in_bounds(coord) {
            return Err(MazeError::OutOfBounds(coord));
        }
    }

    // Direction used to enter each discovered cell
    let mut parent: Grid<Option<Direction>> = Grid::new(maze.width(), maze.height(), None);
    let mut discovered = Grid::new(maze.width(), maze.height(), false);
    discovered[entry] = true;
    let mut queue = VecDeque::from([entry]);
    let mut found = false;

    while let Some(current) = queue.pop_front() {
        if current == exit {
            found = true;
            break;
        }
        for (dir, next) in maze.passages(current) {
            if !discovered[next] {
                discovered[next] = true;
                parent[next] = Some(dir);
                queue.push_back(next);
            }
        }
    }

    if !found {
        tracing::error!("[solve] no path from {:?} to {:?}", entry, exit);
        return Err(MazeError::NoPath { entry, exit });
    }

    let mut directions = Vec::new();
    let mut current = exit;
    while current != entry {
        let dir = parent[current].ok_or(MazeError::NoPath { entry, exit })?;
        directions.push(dir);
        current = dir
            .opposite()
            .step(current)
            .ok_or(MazeError::OutOfBounds(current))?;
    }
    directions.reverse();

    tracing::debug!("[solve] path of length {} found", directions.len());
    Ok(Path::new(entry, directions))
}
