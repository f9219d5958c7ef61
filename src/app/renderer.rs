use std::{collections::HashSet, io::Write};

use crossterm::{
    cursor, queue,
    style::{self, Color, StyledContent, Stylize},
};

use crate::{
    app::theme::Theme,
    maze::{CellSet, Coord, Direction, Maze},
};

/// What the renderer needs to know besides the walls.
pub struct Overlay<'a> {
    pub entry: Coord,
    pub exit: Coord,
    pub blocked: &'a CellSet,
    /// Cell being carved during the animation, or the player in play mode.
    pub cursor: Option<Coord>,
    /// Cells of the solution route or the play-mode trail.
    pub route: Option<&'a HashSet<Coord>>,
    pub theme: &'a Theme,
}

/// Width in terminal columns of a cell interior.
pub const CELL_WIDTH: usize = 2;

fn styled(symbol: &'static str, color: Color) -> StyledContent<&'static str> {
    #[cfg(debug_assertions)]
    {
        use unicode_width::UnicodeWidthStr;
        assert_eq!(
            symbol.width(),
            CELL_WIDTH,
            "Each cell must occupy exactly two character widths."
        );
    }
    symbol.with(color)
}

fn cell_symbol(coord: Coord, overlay: &Overlay<'_>) -> StyledContent<&'static str> {
    if overlay.cursor == Some(coord) {
        styled("@@", Color::Yellow)
    } else if coord == overlay.entry {
        styled("S ", Color::Green)
    } else if coord == overlay.exit {
        styled("G ", Color::Red)
    } else if overlay.blocked.contains(&coord) {
        styled("██", overlay.theme.pattern)
    } else if overlay.route.is_some_and(|route| route.contains(&coord)) {
        styled("··", overlay.theme.inner)
    } else {
        styled("  ", Color::Reset)
    }
}

/// Number of terminal rows and columns a maze takes up.
pub fn frame_size(maze: &Maze) -> (usize, usize) {
    (
        maze.width() as usize * (CELL_WIDTH + 1) + 1,
        maze.height() as usize * 2 + 1,
    )
}

/// Draws the maze over whatever is at the top-left of the terminal. Every cell is
/// rewritten, so consecutive frames of the same maze need no clear in between.
/// Nothing is flushed.
pub fn draw_maze(out: &mut impl Write, maze: &Maze, overlay: &Overlay<'_>) -> std::io::Result<()> {
    queue!(out, cursor::MoveTo(0, 0))?;
    let walls = overlay.theme.walls;
    let wall = |s: &'static str| s.with(walls);
    let horizontal = "-".repeat(CELL_WIDTH);
    let gap = " ".repeat(CELL_WIDTH);

    for y in 0..maze.height() {
        for x in 0..maze.width() {
            let top = if maze.has_wall((x, y), Direction::North) {
                &horizontal
            } else {
                &gap
            };
            queue!(
                out,
                style::PrintStyledContent(wall("+")),
                style::PrintStyledContent(top.as_str().with(walls))
            )?;
        }
        queue!(out, style::PrintStyledContent(wall("+\r\n")))?;

        for x in 0..maze.width() {
            let side = if maze.has_wall((x, y), Direction::West) {
                "|"
            } else {
                " "
            };
            queue!(
                out,
                style::PrintStyledContent(wall(side)),
                style::PrintStyledContent(cell_symbol((x, y), overlay))
            )?;
        }
        let last = (maze.width().saturating_sub(1), y);
        let side = if maze.has_wall(last, Direction::East) {
            "|\r\n"
        } else {
            " \r\n"
        };
        queue!(out, style::PrintStyledContent(wall(side)))?;
    }

    let bottom_row = maze.height().saturating_sub(1);
    for x in 0..maze.width() {
        let bottom = if maze.has_wall((x, bottom_row), Direction::South) {
            &horizontal
        } else {
            &gap
        };
        queue!(
            out,
            style::PrintStyledContent(wall("+")),
            style::PrintStyledContent(bottom.as_str().with(walls))
        )?;
    }
    queue!(out, style::PrintStyledContent(wall("+\r\n")))?;
    Ok(())
}
