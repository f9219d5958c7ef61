use std::fmt;

/// Wall state of a single cell: one bit per side, set when the wall is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Walls(u8);

impl Walls {
    pub const NONE: Walls = Walls(0);
    pub const NORTH: Walls = Walls(0b1000);
    pub const EAST: Walls = Walls(0b0100);
    pub const SOUTH: Walls = Walls(0b0010);
    pub const WEST: Walls = Walls(0b0001);
    /// A fully walled cell, serialized as `F`.
    pub const ALL: Walls = Walls(0b1111);

    /// Builds a mask from its raw bits. Returns `None` if any bit above the low nibble is set.
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits <= Self::ALL.0).then_some(Walls(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Walls) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Walls) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Walls) {
        self.0 &= !other.0;
    }

    pub fn is_closed(self) -> bool {
        self == Self::ALL
    }

    /// Parses a single hexadecimal digit, either case.
    pub fn from_hex(digit: char) -> Option<Self> {
        digit
            .to_digit(16)
            .and_then(|bits| Self::from_bits(bits as u8))
    }

    pub fn to_hex(self) -> char {
        // Always a valid digit since the mask never exceeds 0xF
        char::from_digit(self.0 as u32, 16)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('F')
    }
}

impl Default for Walls {
    fn default() -> Self {
        Walls::ALL
    }
}

impl fmt::Display for Walls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// The four cardinal directions. `Direction::ALL` is the canonical order used by
/// the solver: North, East, South, West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The wall bit guarding this side of a cell.
    pub fn wall(self) -> Walls {
        match self {
            Direction::North => Walls::NORTH,
            Direction::East => Walls::EAST,
            Direction::South => Walls::SOUTH,
            Direction::West => Walls::WEST,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Moves one step from `coord`. Returns `None` on underflow or overflow;
    /// the upper bound of the maze is left to the caller.
    pub fn step(self, coord: (u16, u16)) -> Option<(u16, u16)> {
        let (x, y) = coord;
        match self {
            Direction::North => Some((x, y.checked_sub(1)?)),
            Direction::East => Some((x.checked_add(1)?, y)),
            Direction::South => Some((x, y.checked_add(1)?)),
            Direction::West => Some((x.checked_sub(1)?, y)),
        }
    }

    /// The direction leading from `from` to its 4-neighbor `to`, if they are adjacent.
    pub fn between(from: (u16, u16), to: (u16, u16)) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| dir.step(from) == Some(to))
    }

    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<Direction> {
        match letter {
            'N' => Some(Direction::North),
            'E' => Some(Direction::East),
            'S' => Some(Direction::South),
            'W' => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_bits_layout() {
        assert_eq!(Walls::NORTH.bits(), 8);
        assert_eq!(Walls::EAST.bits(), 4);
        assert_eq!(Walls::SOUTH.bits(), 2);
        assert_eq!(Walls::WEST.bits(), 1);
        assert_eq!(Walls::ALL.to_hex(), 'F');
        assert_eq!(Walls::NONE.to_hex(), '0');
    }

    #[test]
    fn test_insert_remove() {
        let mut walls = Walls::ALL;
        walls.remove(Walls::EAST);
        assert_eq!(walls.to_hex(), 'B');
        assert!(!walls.contains(Walls::EAST));
        assert!(!walls.is_closed());
        walls.insert(Walls::EAST);
        assert!(walls.is_closed());
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Walls::from_hex('a'), Walls::from_bits(10));
        assert_eq!(Walls::from_hex('A').map(Walls::to_hex), Some('A'));
        assert_eq!(Walls::from_hex('g'), None);
        assert_eq!(Walls::from_bits(16), None);
    }

    #[test]
    fn test_step_and_between() {
        assert_eq!(Direction::North.step((0, 0)), None);
        assert_eq!(Direction::West.step((0, 3)), None);
        assert_eq!(Direction::East.step((2, 3)), Some((3, 3)));
        assert_eq!(Direction::between((2, 3), (2, 4)), Some(Direction::South));
        assert_eq!(Direction::between((2, 3), (3, 4)), None);
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(Direction::from_letter(dir.letter()), Some(dir));
        }
    }
}
