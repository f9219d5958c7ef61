use crate::{
    error::MazeError,
    maze::{CellSet, Coord, Grid, Maze},
};

/// Counts the cells reachable from `start` through open passages.
pub fn count_reachable(maze: &Maze, start: Coord) -> usize {
    if !maze.is_in_bounds(start) {
        return 0;
    }
    let mut visited = Grid::new(maze.width(), maze.height(), false);
    visited[start] = true;
    let mut stack = vec![start];
    let mut count = 1;

    while let Some(coord) = stack.pop() {
        for (_, next) in maze.passages(coord) {
            if !visited[next] {
                visited[next] = true;
                count += 1;
                stack.push(next);
            }
        }
    }
    count
}

/// Checks that every non-blocked cell is reachable from `entry`.
///
/// # Errors
/// `Disconnected` with the reached and expected counts otherwise.
pub fn validate_connectivity(
    maze: &Maze,
    entry: Coord,
    blocked: &CellSet,
) -> Result<(), MazeError> {
    let expected = maze.area() - blocked.iter().filter(|&&c| maze.is_in_bounds(c)).count();
    let reached = count_reachable(maze, entry);
    if reached == expected {
        Ok(())
    } else {
        Err(MazeError::Disconnected { reached, expected })
    }
}

pub fn is_fully_connected(maze: &Maze, entry: Coord, blocked: &CellSet) -> bool {
    validate_connectivity(maze, entry, blocked).is_ok()
}
