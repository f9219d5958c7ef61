use crossterm::style::Color;

/// Colors used to draw a maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub walls: Color,
    /// Route and play-mode trail.
    pub inner: Color,
    /// Blocked region.
    pub pattern: Color,
}

const fn theme(name: &'static str, walls: u8, inner: u8, pattern: u8) -> Theme {
    Theme {
        name,
        walls: Color::AnsiValue(walls),
        inner: Color::AnsiValue(inner),
        pattern: Color::AnsiValue(pattern),
    }
}

/// Palettes cycled through with the theme key, in order.
pub const PALETTES: [Theme; 6] = [
    theme("Classic/Bold", 160, 231, 21),
    theme("Vibrant/Natural", 30, 201, 220),
    theme("Earth/Moody", 172, 235, 244),
    theme("Calm/Modern", 182, 181, 103),
    theme("Dynamic", 34, 208, 129),
    theme("Crisp/Natural", 24, 15, 196),
];

/// Palette at `index`, wrapping around.
pub fn palette(index: usize) -> &'static Theme {
    &PALETTES[index % PALETTES.len()]
}
