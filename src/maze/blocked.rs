use super::{CellSet, Coord};

pub const STENCIL_WIDTH: u16 = 7;
pub const STENCIL_HEIGHT: u16 = 5;

/// The blocked region glyph ("42"), one string per row, `1` marking a blocked cell.
pub const STENCIL: [&str; STENCIL_HEIGHT as usize] =
    ["1000111", "1000001", "1110111", "0010100", "0010111"];

/// Whether a `width` x `height` maze is large enough to host the stencil.
pub fn stencil_fits(width: u16, height: u16) -> bool {
    width >= STENCIL_WIDTH && height >= STENCIL_HEIGHT
}

/// Whether the stencil, once centered, walls off some of its open cells from the rest
/// of the maze. Its right-hand pocket needs a free column east of the stencil and its
/// middle needs a free row below it, so a maze exactly as wide or as tall as the
/// stencil can never be fully connected.
pub fn stencil_isolates_cells(width: u16, height: u16) -> bool {
    stencil_fits(width, height) && (width == STENCIL_WIDTH || height == STENCIL_HEIGHT)
}

/// Top-left corner of the centered stencil.
pub fn stencil_anchor(width: u16, height: u16) -> Option<Coord> {
    stencil_fits(width, height)
        .then(|| ((width - STENCIL_WIDTH) / 2, (height - STENCIL_HEIGHT) / 2))
}

/// Coordinates of the blocked region for a maze of the given size.
/// Empty when the stencil does not fit.
pub fn blocked_cells(width: u16, height: u16) -> CellSet {
    let Some((ax, ay)) = stencil_anchor(width, height) else {
        return CellSet::new();
    };
    STENCIL
        .iter()
        .zip(0u16..)
        .flat_map(|(row, dy)| {
            row.chars()
                .zip(0u16..)
                .filter(|&(bit, _)| bit == '1')
                .map(move |(_, dx)| (ax + dx, ay + dy))
        })
        .collect()
}

/// Blocked region with `keep_open` cells (entry and exit) exempted, so carving can
/// still start from or reach them even when they fall on the stencil.
pub fn blocked_cells_excluding(width: u16, height: u16, keep_open: &[Coord]) -> CellSet {
    let mut blocked = blocked_cells(width, height);
    for coord in keep_open {
        if blocked.remove(coord) {
            tracing::debug!("[blocked] {:?} exempted from the blocked region", coord);
        }
    }
    blocked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_small_is_empty() {
        assert!(blocked_cells(3, 3).is_empty());
        assert!(blocked_cells(6, 5).is_empty());
        assert!(blocked_cells(7, 4).is_empty());
        assert_eq!(stencil_anchor(6, 10), None);
    }

    #[test]
    fn test_isolating_sizes() {
        assert!(stencil_isolates_cells(7, 5));
        assert!(stencil_isolates_cells(7, 20));
        assert!(stencil_isolates_cells(20, 5));
        assert!(stencil_isolates_cells(8, 5));
        assert!(!stencil_isolates_cells(8, 6));
        assert!(!stencil_isolates_cells(9, 7));
        // No stencil at all below 7x5
        assert!(!stencil_isolates_cells(6, 5));
        assert!(!stencil_isolates_cells(7, 4));
    }

    #[test]
    fn test_exact_fit_matches_stencil() {
        let blocked = blocked_cells(7, 5);
        #[rustfmt::skip]
        let expected = [
            (0, 0), (4, 0), (5, 0), (6, 0),
            (0, 1), (6, 1),
            (0, 2), (1, 2), (2, 2), (4, 2), (5, 2), (6, 2),
            (2, 3), (4, 3),
            (2, 4), (4, 4), (5, 4), (6, 4),
        ];
        assert_eq!(blocked.len(), expected.len());
        assert!(expected.iter().all(|c| blocked.contains(c)));
    }

    #[test]
    fn test_anchor_is_centered_with_floor_division() {
        assert_eq!(stencil_anchor(9, 7), Some((1, 1)));
        assert_eq!(stencil_anchor(10, 8), Some((1, 1)));
        assert_eq!(stencil_anchor(20, 15), Some((6, 5)));
        let blocked = blocked_cells(20, 15);
        assert!(blocked.contains(&(6, 5)));
        assert!(!blocked.contains(&(7, 5)));
        assert!(blocked.contains(&(12, 9)));
    }

    #[test]
    fn test_excluding_entry_and_exit() {
        let blocked = blocked_cells_excluding(7, 5, &[(0, 0), (6, 4), (3, 3)]);
        assert!(!blocked.contains(&(0, 0)));
        assert!(!blocked.contains(&(6, 4)));
        assert_eq!(blocked.len(), blocked_cells(7, 5).len() - 2);
    }
}
