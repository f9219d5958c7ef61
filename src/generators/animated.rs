use rand::rngs::StdRng;

use super::{
    GeneratedMaze, GenerationParams, get_rng,
    backtrack::Backtracker,
    loops::LoopInjector,
};
use crate::{
    error::MazeError,
    maze::{CellSet, Coord, Maze, blocked::blocked_cells_excluding},
    validator::validate_connectivity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Building the spanning tree.
    Carving,
    /// Adding extra passages (imperfect mazes only).
    Loops,
    Done,
}

/// One step of an animated generation run.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Copy of the maze right after the step.
    pub maze: Maze,
    /// The cell being processed.
    pub cursor: Coord,
    pub phase: Phase,
}

/// A generation run that only advances when asked to.
///
/// Driving it to the end with [`AnimatedGeneration::finish`] produces exactly the
/// maze [`super::generate_maze`] returns for the same parameters. Dropping it early
/// leaves a partially carved maze that must not be treated as finished.
pub struct AnimatedGeneration {
    params: GenerationParams,
    maze: Maze,
    blocked: CellSet,
    rng: StdRng,
    phase: Phase,
    carver: Backtracker,
    injector: Option<LoopInjector>,
    /// First error hit while iterating, reported again by `finish`.
    failure: Option<MazeError>,
}

impl AnimatedGeneration {
    /// Validates `params`, stamps the blocked region and prepares the carver.
    /// No carving happens until the first call to `advance`.
    pub fn new(params: GenerationParams) -> Result<Self, MazeError> {
        params.validate()?;
        tracing::info!(
            "[generate] {}x{} maze, seed {}, perfect {}",
            params.width,
            params.height,
            params.seed,
            params.perfect
        );

        // A fresh maze is fully walled, so the blocked region is stamped by never carving it
        let maze = Maze::new(params.width, params.height);
        let blocked =
            blocked_cells_excluding(params.width, params.height, &[params.entry, params.exit]);
        let carver = Backtracker::new(&maze, params.entry, &blocked)?;
        Ok(AnimatedGeneration {
            rng: get_rng(params.seed),
            maze,
            blocked,
            phase: Phase::Carving,
            carver,
            injector: None,
            failure: None,
            params,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The maze in its current, possibly unfinished, state.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Blocked cells, entry and exit exempted.
    pub fn blocked(&self) -> &CellSet {
        &self.blocked
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Performs one carving step or one loop insertion.
    /// Returns the processed cell, or `None` when generation is complete.
    pub fn advance(&mut self) -> Result<Option<Coord>, MazeError> {
        loop {
            match self.phase {
                Phase::Carving => {
                    if let Some(step) = self.carver.step(&mut self.maze, &mut self.rng)? {
                        return Ok(Some(step.cursor()));
                    }
                    tracing::debug!(
                        "[generate] carving done, {} passages",
                        self.maze.open_edge_count()
                    );
                    if self.params.perfect {
                        self.phase = Phase::Done;
                    } else {
                        self.injector = Some(LoopInjector::new(
                            &self.maze,
                            self.params.loops,
                            &self.blocked,
                            &[self.params.entry, self.params.exit],
                        ));
                        self.phase = Phase::Loops;
                    }
                }
                Phase::Loops => {
                    let Some(injector) = self.injector.as_mut() else {
                        self.phase = Phase::Done;
                        continue;
                    };
                    if let Some(coord) = injector.step(&mut self.maze, &mut self.rng)? {
                        return Ok(Some(coord));
                    }
                    tracing::debug!(
                        "[generate] {} loops added in {} attempts",
                        injector.added(),
                        injector.attempts()
                    );
                    self.phase = Phase::Done;
                }
                Phase::Done => return Ok(None),
            }
        }
    }

    /// Runs the remaining steps, checks connectivity and hands out the finished maze.
    ///
    /// # Errors
    /// `Disconnected` if some open cell cannot be reached from the entry, which
    /// means the generator is broken.
    pub fn finish(mut self) -> Result<GeneratedMaze, MazeError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        while self.advance()?.is_some() {}

        if let Err(err) = validate_connectivity(&self.maze, self.params.entry, &self.blocked) {
            tracing::error!("[generate] {}", err);
            return Err(err);
        }
        let loops_added = self.injector.as_ref().map_or(0, LoopInjector::added);
        tracing::info!("[generate] done, {} loops added", loops_added);

        Ok(GeneratedMaze {
            maze: self.maze,
            entry: self.params.entry,
            exit: self.params.exit,
            blocked: self.blocked,
            seed: self.params.seed,
            perfect: self.params.perfect,
            loops_added,
        })
    }
}

impl Iterator for AnimatedGeneration {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failure.is_some() {
            return None;
        }
        match self.advance() {
            Ok(Some(cursor)) => Some(Frame {
                maze: self.maze.clone(),
                cursor,
                phase: self.phase,
            }),
            Ok(None) => None,
            Err(err) => {
                self.failure = Some(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::generators::{LoopPolicy, generate_maze};

    #[test]
    fn test_frames_end_in_same_maze_as_direct_generation() {
        let params = GenerationParams::new(13, 9, (0, 0), (12, 8), 99).with_perfect(false);
        let direct = generate_maze(params.clone()).unwrap();

        let mut animated = AnimatedGeneration::new(params).unwrap();
        let frames = animated.by_ref().collect::<Vec<_>>();
        let last = frames.last().unwrap();
        assert_eq!(last.maze, direct.maze);

        let finished = animated.finish().unwrap();
        assert_eq!(finished.maze, direct.maze);
        assert_eq!(finished.loops_added, direct.loops_added);
    }

    #[test]
    fn test_perfect_frame_count() {
        // Every open cell is pushed once and popped once; the entry push is not a step
        let params = GenerationParams::new(9, 7, (0, 0), (8, 6), 1234);
        let animated = AnimatedGeneration::new(params).unwrap();
        let open_cells = 9 * 7 - animated.blocked.len();
        let frames = animated.collect::<Vec<_>>();
        assert_eq!(frames.len(), 2 * open_cells - 1);
        assert!(frames.iter().all(|f| f.phase == Phase::Carving));
        assert_eq!(frames.last().map(|f| f.cursor), Some((0, 0)));
    }

    #[test]
    fn test_loop_frames_follow_carving() {
        let params = GenerationParams::new(15, 11, (0, 0), (14, 10), 8)
            .with_perfect(false)
            .with_loop_policy(LoopPolicy::with_target(5));
        let frames = AnimatedGeneration::new(params).unwrap().collect::<Vec<_>>();
        let loop_frames = frames.iter().filter(|f| f.phase == Phase::Loops).count();
        assert!(loop_frames <= 5);
        let first_loop = frames.iter().position(|f| f.phase == Phase::Loops);
        if let Some(idx) = first_loop {
            assert!(frames[idx..].iter().all(|f| f.phase == Phase::Loops));
        }
    }

    #[test]
    fn test_abandoned_run_is_partial() {
        let params = GenerationParams::new(9, 7, (0, 0), (8, 6), 3);
        let mut animated = AnimatedGeneration::new(params).unwrap();
        assert_eq!(animated.phase(), Phase::Carving);
        for _ in 0..5 {
            animated.advance().unwrap();
        }
        let edges = animated.maze().open_edge_count();
        assert!(edges > 0 && edges <= 5);
        assert_eq!(animated.phase(), Phase::Carving);
        assert!(validate_connectivity(animated.maze(), (0, 0), &animated.blocked).is_err());
    }

    #[test]
    fn test_isolating_geometry_produces_no_frames() {
        let params = GenerationParams::new(7, 5, (0, 0), (6, 4), 7);
        assert!(matches!(
            AnimatedGeneration::new(params),
            Err(MazeError::Config(ConfigError::IsolatedPockets {
                width: 7,
                height: 5
            }))
        ));
    }

    #[test]
    fn test_abandoned_maze_fails_validation_as_fatal() {
        let params = GenerationParams::new(9, 7, (0, 0), (8, 6), 3);
        let mut animated = AnimatedGeneration::new(params).unwrap();
        animated.advance().unwrap();
        let err = validate_connectivity(animated.maze(), (0, 0), animated.blocked()).unwrap_err();
        assert!(matches!(err, MazeError::Disconnected { reached: 2, .. }));
        assert!(err.is_fatal());
    }
}
