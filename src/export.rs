//! Text format of a saved maze:
//!
//! ```text
//! <one hex digit per cell, one line per row>
//!
//! <entry x> <entry y>
//! <exit x> <exit y>
//! <path as N/E/S/W letters>
//! ```
//!
//! Wall bits are N=8, E=4, S=2, W=1. The file ends with a newline.

use std::fmt::Write as _;

use crate::{
    error::MazeError,
    maze::{Coord, Grid, Maze, Walls},
    solvers::Path,
};

/// Contents of a saved maze file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeFile {
    pub maze: Maze,
    pub entry: Coord,
    pub exit: Coord,
    pub path: Path,
}

/// Rows of hex digits, no separators.
pub fn grid_to_hex(maze: &Maze) -> String {
    let mut out = String::with_capacity(maze.area() + maze.height() as usize);
    for row in maze.grid().rows() {
        row.iter().for_each(|walls| out.push(walls.to_hex()));
        out.push('\n');
    }
    out
}

pub fn to_hex_string(maze: &Maze, entry: Coord, exit: Coord, path: &Path) -> String {
    let mut out = grid_to_hex(maze);
    // Writing to a String never fails
    let _ = write!(
        out,
        "\n{} {}\n{} {}\n{}\n",
        entry.0, entry.1, exit.0, exit.1, path
    );
    out
}

/// Writes the maze file to `file`.
pub fn save(
    file: impl AsRef<std::path::Path>,
    maze: &Maze,
    entry: Coord,
    exit: Coord,
    path: &Path,
) -> std::io::Result<()> {
    std::fs::write(file.as_ref(), to_hex_string(maze, entry, exit, path))?;
    tracing::info!("[export] maze saved to {}", file.as_ref().display());
    Ok(())
}

fn format_error(line: usize, reason: impl Into<String>) -> MazeError {
    MazeError::Format {
        line,
        reason: reason.into(),
    }
}

fn parse_coord(line_no: usize, line: Option<&str>) -> Result<Coord, MazeError> {
    let line = line.ok_or_else(|| format_error(line_no, "missing coordinates"))?;
    let parts = line
        .split_whitespace()
        .map(|s| s.parse::<u16>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format_error(line_no, e.to_string()))?;
    match parts[..] {
        [x, y] => Ok((x, y)),
        _ => Err(format_error(line_no, "expected two coordinates")),
    }
}

/// Parses the text produced by [`to_hex_string`].
pub fn parse(text: &str) -> Result<MazeFile, MazeError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    let mut rows: Vec<Vec<Walls>> = Vec::new();
    for (line_no, line) in lines.by_ref() {
        if line.is_empty() {
            break;
        }
        let row = line
            .chars()
            .map(Walls::from_hex)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| format_error(line_no, "invalid hex digit"))?;
        if rows.first().is_some_and(|first| first.len() != row.len()) {
            return Err(format_error(line_no, "row width differs from the first row"));
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(format_error(1, "no maze rows"));
    }

    let (width, height) = (rows[0].len(), rows.len());
    let (width, height) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(format_error(1, "maze too large")),
    };
    let mut grid = Grid::new(width, height, Walls::ALL);
    for (row, y) in rows.into_iter().zip(0u16..) {
        for (walls, x) in row.into_iter().zip(0u16..) {
            grid[(x, y)] = walls;
        }
    }
    let rows_end = height as usize + 1;
    let maze = Maze::from_grid(grid)
        .ok_or_else(|| format_error(1, "neighboring cells disagree about a wall"))?;

    let mut lines = lines.map(|(_, l)| l);
    let entry = parse_coord(rows_end + 1, lines.next())?;
    let exit = parse_coord(rows_end + 2, lines.next())?;
    let letters = lines.next().unwrap_or_default();
    let path = Path::from_letters(entry, letters)
        .ok_or_else(|| format_error(rows_end + 3, "invalid path letters"))?;

    for coord in [entry, exit] {
        if !maze.is_in_bounds(coord) {
            return Err(MazeError::OutOfBounds(coord));
        }
    }

    Ok(MazeFile {
        maze,
        entry,
        exit,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{GenerationParams, generate_maze};

    #[test]
    fn test_known_layout() {
        let mut maze = Maze::new(2, 1);
        maze.remove_wall((0, 0), (1, 0)).unwrap();
        let path = Path::from_letters((0, 0), "E").unwrap();
        assert_eq!(
            to_hex_string(&maze, (0, 0), (1, 0), &path),
            "BE\n\n0 0\n1 0\nE\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let params = GenerationParams::new(19, 11, (0, 0), (18, 10), 77).with_perfect(false);
        let generated = generate_maze(params).unwrap();
        let path = generated.solve().unwrap();
        let text = to_hex_string(&generated.maze, generated.entry, generated.exit, &path);

        let file = parse(&text).unwrap();
        assert_eq!(file.maze, generated.maze);
        assert_eq!(file.entry, (0, 0));
        assert_eq!(file.exit, (18, 10));
        assert_eq!(file.path, path);
        assert_eq!(grid_to_hex(&file.maze), grid_to_hex(&generated.maze));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = parse("FF\nF\n\n0 0\n1 0\n\n").unwrap_err();
        assert!(matches!(err, MazeError::Format { line: 2, .. }));
    }

    #[test]
    fn test_rejects_bad_digit_and_coords() {
        assert!(matches!(
            parse("FZ\n\n0 0\n1 0\n\n"),
            Err(MazeError::Format { line: 1, .. })
        ));
        assert!(matches!(
            parse("FF\n\n0\n1 0\n\n"),
            Err(MazeError::Format { line: 3, .. })
        ));
        assert!(matches!(
            parse("FF\n\n0 0\n1 0\nQ\n"),
            Err(MazeError::Format { line: 5, .. })
        ));
        assert!(matches!(
            parse("FF\n\n0 0\n2 0\n\n"),
            Err(MazeError::OutOfBounds((2, 0)))
        ));
    }

    #[test]
    fn test_rejects_inconsistent_walls() {
        // West cell claims an open east side, east cell keeps its west wall
        assert!(parse("B F\n\n0 0\n1 0\n\n").is_err());
        assert!(parse("BF\n\n0 0\n1 0\n\n").is_err());
    }

    #[test]
    fn test_save_writes_file() {
        let generated = generate_maze(GenerationParams::new(9, 7, (0, 0), (8, 6), 1)).unwrap();
        let path = generated.solve().unwrap();
        let file = std::env::temp_dir().join(format!("amazeing-export-{}.txt", std::process::id()));
        save(&file, &generated.maze, generated.entry, generated.exit, &path).unwrap();
        let text = std::fs::read_to_string(&file).unwrap();
        std::fs::remove_file(&file).ok();
        assert!(text.ends_with('\n'));
        assert_eq!(parse(&text).unwrap().path, path);
    }
}
