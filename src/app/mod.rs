pub mod game;
pub mod renderer;
pub mod theme;

use std::{
    collections::HashSet,
    io::{Stdout, Write},
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    app::{
        game::{GameRunResult, GameState, MoveOutcome, PlayKey, STARTING_HEARTS},
        renderer::{Overlay, draw_maze, frame_size},
        theme::{PALETTES, Theme, palette},
    },
    config::MazeConfig,
    error::MazeError,
    export,
    generators::{AnimatedGeneration, GeneratedMaze, GenerationParams},
    maze::{Coord, Maze},
    solvers::Path,
};

/// Keys accepted once a maze is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    Regenerate,
    /// Reveal the shortest route, or hide it again
    Solve,
    Play,
    CycleTheme,
    ToggleInfo,
    Save,
    Quit,
}

impl UserAction {
    fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('r') | KeyCode::Char('R') => Some(UserAction::Regenerate),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(UserAction::Solve),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(UserAction::Play),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(UserAction::CycleTheme),
            KeyCode::Char('i') | KeyCode::Char('I') => Some(UserAction::ToggleInfo),
            KeyCode::Char('w') | KeyCode::Char('W') => Some(UserAction::Save),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(UserAction::Quit),
            _ => None,
        }
    }
}

/// What the result screen shows besides the maze.
#[derive(Debug, Default)]
struct View {
    palette: usize,
    show_path: bool,
    show_info: bool,
    status: String,
}

fn to_io_error(err: MazeError) -> std::io::Error {
    std::io::Error::other(err)
}

/// Lines of the info panel.
fn info_lines(config: &MazeConfig, generated: &GeneratedMaze, theme: &Theme) -> Vec<String> {
    let kind = if generated.perfect {
        "perfect maze".to_string()
    } else {
        format!("imperfect maze, {} loops added", generated.loops_added)
    };
    vec![
        format!("theme: {}", theme.name),
        format!("entry: {:?}   exit: {:?}", generated.entry, generated.exit),
        format!(
            "width: {}   height: {}",
            generated.maze.width(),
            generated.maze.height()
        ),
        format!("output file: {}", config.output_file.display()),
        kind,
        format!("seed: {}", generated.seed),
    ]
}

/// Inner cells of the route, in walking order. Entry and exit keep their own glyphs.
fn reveal_order(path: &Path) -> Vec<Coord> {
    let cells = path.cells();
    cells
        .get(1..cells.len().saturating_sub(1))
        .unwrap_or_default()
        .to_vec()
}

fn hearts_line(hearts: u8) -> String {
    let lost = STARTING_HEARTS.saturating_sub(hearts);
    format!(
        "hearts: {}{}\r\n",
        "♥ ".repeat(hearts as usize),
        "♡ ".repeat(lost as usize)
    )
}

pub struct App {
    config: MazeConfig,
    /// Delay between two animation frames
    frame_delay: Duration,
}

impl App {
    pub fn new(config: MazeConfig) -> Self {
        Self {
            config,
            frame_delay: Duration::from_millis(15),
        }
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Generates, solves and saves one maze without any terminal interaction.
    /// Returns the maze and its route.
    pub fn generate_and_save(&self) -> Result<(GeneratedMaze, Path), MazeError> {
        let generated = crate::generators::generate_maze(self.config.params())?;
        let path = generated.solve()?;
        self.save(&generated, &path)?;
        Ok((generated, path))
    }

    fn save(&self, generated: &GeneratedMaze, path: &Path) -> Result<(), MazeError> {
        export::save(
            &self.config.output_file,
            &generated.maze,
            generated.entry,
            generated.exit,
            path,
        )
        .map_err(|source| MazeError::Io {
            path: self.config.output_file.display().to_string(),
            source,
        })
    }

    /// Whether a full frame of `maze` plus the status lines below it fits on screen.
    fn fits_terminal(maze: &Maze) -> std::io::Result<bool> {
        let (columns, rows) = frame_size(maze);
        let (term_width, term_height) = terminal::size()?;
        let fits = columns <= term_width as usize && rows < term_height as usize;
        if !fits {
            tracing::warn!(
                "[app] terminal {}x{} too small for a {}x{} frame, drawing the result only",
                term_width,
                term_height,
                columns,
                rows
            );
        }
        Ok(fits)
    }

    /// Waits up to one frame delay. Returns `true` if a key was pressed meanwhile.
    fn key_pressed_within(&self) -> std::io::Result<bool> {
        if event::poll(self.frame_delay)? {
            if let Event::Key(key) = event::read()? {
                return Ok(key.kind == KeyEventKind::Press);
            }
        }
        Ok(false)
    }

    /// Plays the generation frame by frame. Any key skips the rest of the animation.
    fn animate(
        &self,
        stdout: &mut Stdout,
        params: GenerationParams,
        theme: &Theme,
    ) -> std::io::Result<GeneratedMaze> {
        let mut generation = AnimatedGeneration::new(params).map_err(to_io_error)?;
        let fits = App::fits_terminal(generation.maze())?;

        // Cleared once per run; frames then overwrite each other in place
        queue!(stdout, terminal::Clear(ClearType::All))?;
        let params = generation.params().clone();
        let blocked = generation.blocked().clone();
        while fits {
            let Some(frame) = generation.next() else {
                break;
            };
            let overlay = Overlay {
                entry: params.entry,
                exit: params.exit,
                blocked: &blocked,
                cursor: Some(frame.cursor),
                route: None,
                theme,
            };
            draw_maze(stdout, &frame.maze, &overlay)?;
            stdout.flush()?;

            if self.key_pressed_within()? {
                tracing::debug!("[app] animation skipped");
                break;
            }
        }
        generation.finish().map_err(to_io_error)
    }

    /// Draws the route one cell at a time. Any key shows the rest at once.
    fn reveal_path(
        &self,
        stdout: &mut Stdout,
        generated: &GeneratedMaze,
        path: &Path,
        theme: &Theme,
    ) -> std::io::Result<()> {
        if !App::fits_terminal(&generated.maze)? {
            return Ok(());
        }
        let mut visible = HashSet::new();
        for cell in reveal_order(path) {
            visible.insert(cell);
            let overlay = Overlay {
                entry: generated.entry,
                exit: generated.exit,
                blocked: &generated.blocked,
                cursor: None,
                route: Some(&visible),
                theme,
            };
            draw_maze(stdout, &generated.maze, &overlay)?;
            stdout.flush()?;
            if self.key_pressed_within()? {
                tracing::debug!("[app] path reveal skipped");
                break;
            }
        }
        Ok(())
    }

    /// Runs play mode on `generated` until the player wins, loses or leaves.
    fn play(
        &self,
        stdout: &mut Stdout,
        generated: &GeneratedMaze,
        theme: &Theme,
    ) -> std::io::Result<GameRunResult> {
        tracing::info!("[game] play mode started");
        let mut game = GameState::new(&generated.maze, generated.entry, generated.exit);
        let mut message =
            "Guide @@ to the exit. Every wall you hit costs a heart.".with(Color::Green);

        loop {
            let trail = game.trail().iter().copied().collect::<HashSet<_>>();
            let overlay = Overlay {
                entry: generated.entry,
                exit: generated.exit,
                blocked: &generated.blocked,
                cursor: Some(game.current()),
                route: Some(&trail),
                theme,
            };
            draw_maze(stdout, &generated.maze, &overlay)?;
            queue!(
                stdout,
                terminal::Clear(ClearType::FromCursorDown),
                style::PrintStyledContent(hearts_line(game.hearts()).with(Color::Red)),
                style::PrintStyledContent(
                    "[W/A/S/D] move  [Esc/Q] leave\r\n"
                        .with(Color::Yellow)
                        .attribute(Attribute::Bold)
                ),
                style::PrintStyledContent(message),
            )?;
            stdout.flush()?;

            match game.result() {
                Some(GameRunResult::Canceled) => return Ok(GameRunResult::Canceled),
                Some(result) => {
                    // Leave the end screen up until the next key press
                    loop {
                        if let Event::Key(key) = event::read()? {
                            if key.kind == KeyEventKind::Press {
                                return Ok(result);
                            }
                        }
                    }
                }
                None => {}
            }

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let Some(play_key) = PlayKey::from_key(key.code) else {
                continue;
            };
            message = match game.apply(play_key) {
                MoveOutcome::Moved(_) => "".with(Color::Reset),
                MoveOutcome::Bumped { .. } => "Ouch, a wall! You lose a heart.".with(Color::Red),
                MoveOutcome::Finished(GameRunResult::ExitReached) => {
                    "You reached the exit! Press any key.".with(Color::Green)
                }
                MoveOutcome::Finished(GameRunResult::OutOfHearts) => {
                    "Game over, no hearts left. Press any key.".with(Color::Red)
                }
                MoveOutcome::Finished(GameRunResult::Canceled) => "".with(Color::Reset),
            };
        }
    }

    fn draw_result(
        &self,
        stdout: &mut Stdout,
        generated: &GeneratedMaze,
        path: &Path,
        view: &View,
    ) -> std::io::Result<()> {
        let theme = palette(view.palette);
        let route = path.cells().into_iter().collect::<HashSet<_>>();
        let overlay = Overlay {
            entry: generated.entry,
            exit: generated.exit,
            blocked: &generated.blocked,
            cursor: None,
            route: view.show_path.then_some(&route),
            theme,
        };
        draw_maze(stdout, &generated.maze, &overlay)?;
        queue!(
            stdout,
            terminal::Clear(ClearType::FromCursorDown),
            style::PrintStyledContent(
                format!(
                    "seed {} | path length {} | loops added {}\r\n",
                    generated.seed,
                    path.len(),
                    generated.loops_added
                )
                .with(Color::Cyan)
            ),
            style::PrintStyledContent(
                "[R] regen  [S] solve  [P] play  [C] theme  [I] info  [W] save  [Esc/Q] quit\r\n"
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold)
            ),
        )?;
        if view.show_info {
            for line in info_lines(&self.config, generated, theme) {
                queue!(
                    stdout,
                    style::PrintStyledContent(format!("  {}\r\n", line).with(Color::Yellow))
                )?;
            }
        }
        queue!(
            stdout,
            style::PrintStyledContent(view.status.as_str().with(Color::Green))
        )?;
        stdout.flush()
    }

    /// Main application loop
    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        tracing::info!("Started main app loop");
        let mut params = self.config.params();
        let mut view = View::default();
        let mut first = true;

        'generate: loop {
            let generated = self.animate(stdout, params.clone(), palette(view.palette))?;
            let path = generated.solve().map_err(to_io_error)?;
            view.show_path = false;
            view.status.clear();
            if first {
                self.save(&generated, &path).map_err(to_io_error)?;
                view.status = format!("saved to {}\r\n", self.config.output_file.display());
                first = false;
            }

            loop {
                self.draw_result(stdout, &generated, &path, &view)?;
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match UserAction::from_key(key.code) {
                    Some(UserAction::Regenerate) => {
                        params = params.with_seed(rand::random());
                        continue 'generate;
                    }
                    Some(UserAction::Solve) => {
                        if !view.show_path {
                            self.reveal_path(stdout, &generated, &path, palette(view.palette))?;
                        }
                        view.show_path = !view.show_path;
                    }
                    Some(UserAction::Play) => {
                        let result = self.play(stdout, &generated, palette(view.palette))?;
                        view.status = match result {
                            GameRunResult::ExitReached => "escaped the maze\r\n".to_string(),
                            GameRunResult::OutOfHearts => "out of hearts\r\n".to_string(),
                            GameRunResult::Canceled => String::new(),
                        };
                    }
                    Some(UserAction::CycleTheme) => {
                        view.palette = (view.palette + 1) % PALETTES.len();
                        tracing::debug!("[app] theme {}", palette(view.palette).name);
                    }
                    Some(UserAction::ToggleInfo) => view.show_info = !view.show_info,
                    Some(UserAction::Save) => {
                        self.save(&generated, &path).map_err(to_io_error)?;
                        view.status = format!("saved to {}\r\n", self.config.output_file.display());
                    }
                    Some(UserAction::Quit) => {
                        tracing::debug!("[app loop] Esc key pressed, exiting");
                        break 'generate;
                    }
                    None => {}
                }
            }
        }

        tracing::info!("Exiting main app loop");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::generate_maze;

    fn sample_config(output_file: std::path::PathBuf) -> MazeConfig {
        MazeConfig {
            width: 11,
            height: 9,
            entry: (0, 0),
            exit: (10, 8),
            output_file,
            perfect: false,
            seed: Some(21),
            loop_density: 0.1,
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            UserAction::from_key(KeyCode::Char('r')),
            Some(UserAction::Regenerate)
        );
        assert_eq!(UserAction::from_key(KeyCode::Esc), Some(UserAction::Quit));
        assert_eq!(
            UserAction::from_key(KeyCode::Char('S')),
            Some(UserAction::Solve)
        );
        assert_eq!(
            UserAction::from_key(KeyCode::Char('p')),
            Some(UserAction::Play)
        );
        assert_eq!(
            UserAction::from_key(KeyCode::Char('c')),
            Some(UserAction::CycleTheme)
        );
        assert_eq!(
            UserAction::from_key(KeyCode::Char('I')),
            Some(UserAction::ToggleInfo)
        );
        assert_eq!(UserAction::from_key(KeyCode::Enter), None);
    }

    #[test]
    fn test_generate_and_save() {
        let file = std::env::temp_dir().join(format!("amazeing-app-{}.txt", std::process::id()));
        let config = sample_config(file.clone());
        let (generated, path) = App::new(config).generate_and_save().unwrap();
        let saved = export::parse(&std::fs::read_to_string(&file).unwrap()).unwrap();
        std::fs::remove_file(&file).ok();
        assert_eq!(saved.maze, generated.maze);
        assert_eq!(saved.path, path);
    }

    #[test]
    fn test_info_panel() {
        let config = sample_config("maze.txt".into());
        let generated = generate_maze(config.params()).unwrap();
        let lines = info_lines(&config, &generated, palette(1));
        assert_eq!(lines[0], "theme: Vibrant/Natural");
        assert_eq!(lines[1], "entry: (0, 0)   exit: (10, 8)");
        assert_eq!(lines[2], "width: 11   height: 9");
        assert_eq!(lines[3], "output file: maze.txt");
        assert!(lines[4].starts_with("imperfect maze"));
        assert_eq!(lines[5], "seed: 21");
    }

    #[test]
    fn test_reveal_order_skips_endpoints() {
        let path = Path::from_letters((0, 0), "EES").unwrap();
        assert_eq!(reveal_order(&path), vec![(1, 0), (2, 0)]);
        assert!(reveal_order(&Path::from_letters((0, 0), "E").unwrap()).is_empty());
        assert!(reveal_order(&Path::from_letters((0, 0), "").unwrap()).is_empty());
    }

    #[test]
    fn test_hearts_line() {
        assert_eq!(hearts_line(3), "hearts: ♥ ♥ ♥ \r\n");
        assert_eq!(hearts_line(1), "hearts: ♥ ♡ ♡ \r\n");
    }
}
