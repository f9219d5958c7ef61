pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod generators;
pub mod maze;
pub mod solvers;
pub mod validator;

pub use error::{ConfigError, MazeError};
pub use generators::{AnimatedGeneration, GeneratedMaze, GenerationParams, generate_maze};
pub use maze::{Coord, Direction, Maze, Walls};
pub use solvers::{Path, solve_maze};
