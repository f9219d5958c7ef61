use crossterm::event::KeyCode;

use crate::maze::{Coord, Direction, Maze};

/// Wall bumps a player can survive, plus one.
pub const STARTING_HEARTS: u8 = 3;

/// Keys understood in play mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayKey {
    Move(Direction),
    Leave,
}

impl PlayKey {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
                Some(PlayKey::Move(Direction::North))
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                Some(PlayKey::Move(Direction::East))
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
                Some(PlayKey::Move(Direction::South))
            }
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                Some(PlayKey::Move(Direction::West))
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(PlayKey::Leave),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRunResult {
    /// The player walked onto the exit
    ExitReached,
    /// Every heart was lost on walls
    OutOfHearts,
    /// Game is canceled by user
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(Coord),
    /// Walked into a wall; `hearts` are left.
    Bumped { hearts: u8 },
    Finished(GameRunResult),
}

/// One play-mode run over a finished maze.
pub struct GameState<'a> {
    maze: &'a Maze,
    /// Tracks where the player currently is
    current: Coord,
    goal: Coord,
    hearts: u8,
    /// Cells walked from the entry, without the dead ends the player came back from.
    trail: Vec<Coord>,
    result: Option<GameRunResult>,
}

impl<'a> GameState<'a> {
    pub fn new(maze: &'a Maze, entry: Coord, exit: Coord) -> Self {
        GameState {
            maze,
            current: entry,
            goal: exit,
            hearts: STARTING_HEARTS,
            trail: vec![entry],
            result: None,
        }
    }

    pub fn current(&self) -> Coord {
        self.current
    }

    pub fn hearts(&self) -> u8 {
        self.hearts
    }

    pub fn trail(&self) -> &[Coord] {
        &self.trail
    }

    /// Set once the game is over. Later keys are ignored.
    pub fn result(&self) -> Option<GameRunResult> {
        self.result
    }

    pub fn apply(&mut self, key: PlayKey) -> MoveOutcome {
        if let Some(result) = self.result {
            return MoveOutcome::Finished(result);
        }
        match key {
            PlayKey::Leave => self.finish(GameRunResult::Canceled),
            PlayKey::Move(dir) => self.move_player(dir),
        }
    }

    fn finish(&mut self, result: GameRunResult) -> MoveOutcome {
        tracing::info!("[game] finished: {:?}", result);
        self.result = Some(result);
        MoveOutcome::Finished(result)
    }

    fn move_player(&mut self, dir: Direction) -> MoveOutcome {
        let next = self
            .maze
            .neighbor(self.current, dir)
            .filter(|_| !self.maze.has_wall(self.current, dir));
        let Some(next) = next else {
            self.hearts = self.hearts.saturating_sub(1);
            tracing::debug!("[game] bumped into {} wall at {:?}", dir, self.current);
            if self.hearts == 0 {
                return self.finish(GameRunResult::OutOfHearts);
            }
            return MoveOutcome::Bumped {
                hearts: self.hearts,
            };
        };

        // Stepping back onto the previous cell shortens the trail
        if self.trail.len() >= 2 && self.trail[self.trail.len() - 2] == next {
            self.trail.pop();
        } else {
            self.trail.push(next);
        }
        self.current = next;

        if next == self.goal {
            return self.finish(GameRunResult::ExitReached);
        }
        MoveOutcome::Moved(next)
    }
}
