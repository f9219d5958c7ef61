use std::{collections::HashMap, path::PathBuf};

use crate::{
    error::ConfigError,
    generators::{DEFAULT_LOOP_DENSITY, GenerationParams, LoopPolicy},
    maze::{Coord, blocked::blocked_cells},
};

/// Smallest maze the front end accepts. The blocked region needs a free border
/// around it so none of its pockets are cut off from the rest of the maze.
pub const MIN_WIDTH: u16 = 9;
pub const MIN_HEIGHT: u16 = 7;

const VALID_KEYS: [&str; 8] = [
    "WIDTH",
    "HEIGHT",
    "ENTRY",
    "EXIT",
    "OUTPUT_FILE",
    "PERFECT",
    "SEED",
    "LOOP_DENSITY",
];

/// Validated user configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    pub width: u16,
    pub height: u16,
    pub entry: Coord,
    pub exit: Coord,
    pub output_file: PathBuf,
    pub perfect: bool,
    pub seed: Option<u64>,
    pub loop_density: f64,
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_coord(key: &'static str, value: &str) -> Result<Coord, ConfigError> {
    match value.split(',').collect::<Vec<_>>()[..] {
        [x, y] => Ok((parse_number(key, x)?, parse_number(key, y)?)),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

impl MazeConfig {
    /// Reads and validates a `KEY=VALUE` config file.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses and validates config text. Blank lines and `#` comments are skipped;
    /// keys are case-insensitive.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut values: HashMap<&'static str, &str> = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = match line.split('=').collect::<Vec<_>>()[..] {
                [key, value] => (key.trim(), value.trim()),
                [_] => {
                    return Err(ConfigError::Syntax {
                        line: line_no,
                        reason: "missing '='".to_string(),
                    });
                }
                _ => {
                    return Err(ConfigError::Syntax {
                        line: line_no,
                        reason: "too many '='".to_string(),
                    });
                }
            };
            let key_upper = key.to_ascii_uppercase();
            let Some(&key) = VALID_KEYS.iter().find(|&&k| k == key_upper) else {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                    line: line_no,
                });
            };
            if values.insert(key, value).is_some() {
                return Err(ConfigError::Syntax {
                    line: line_no,
                    reason: format!("duplicate key {}", key),
                });
            }
        }

        let required =
            |key: &'static str| values.get(key).copied().ok_or(ConfigError::MissingKey(key));

        let seed: Option<u64> = match values.get("SEED") {
            Some(value) if !value.is_empty() => Some(parse_number("SEED", value)?),
            _ => None,
        };
        let loop_density = match values.get("LOOP_DENSITY") {
            Some(value) => {
                let density: f64 = parse_number("LOOP_DENSITY", value)?;
                if !(0.0..=1.0).contains(&density) {
                    return Err(ConfigError::InvalidValue {
                        key: "LOOP_DENSITY",
                        value: value.to_string(),
                    });
                }
                density
            }
            None => DEFAULT_LOOP_DENSITY,
        };

        let config = MazeConfig {
            width: parse_number("WIDTH", required("WIDTH")?)?,
            height: parse_number("HEIGHT", required("HEIGHT")?)?,
            entry: parse_coord("ENTRY", required("ENTRY")?)?,
            exit: parse_coord("EXIT", required("EXIT")?)?,
            output_file: PathBuf::from(required("OUTPUT_FILE")?),
            perfect: parse_bool("PERFECT", required("PERFECT")?)?,
            seed,
            loop_density,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if self.width < MIN_WIDTH || self.height < MIN_HEIGHT {
            return Err(ConfigError::TooSmall {
                width: self.width,
                height: self.height,
                min_width: MIN_WIDTH,
                min_height: MIN_HEIGHT,
            });
        }
        for (name, coord) in [("entry", self.entry), ("exit", self.exit)] {
            if coord.0 >= self.width || coord.1 >= self.height {
                return Err(ConfigError::OutOfBounds { name, coord });
            }
        }
        if self.entry == self.exit {
            return Err(ConfigError::SameEntryExit);
        }
        let blocked = blocked_cells(self.width, self.height);
        for (name, coord) in [("entry", self.entry), ("exit", self.exit)] {
            if blocked.contains(&coord) {
                return Err(ConfigError::InsideBlockedRegion { name, coord });
            }
        }

        let file_name = self.output_file.to_string_lossy();
        if file_name.trim().is_empty()
            || matches!(&*file_name, "." | ".." | "./" | "../" | "/")
            || file_name.ends_with('/')
        {
            return Err(ConfigError::InvalidOutputFile(file_name.into_owned()));
        }
        if self.output_file.extension().is_none_or(|ext| ext != "txt") {
            tracing::warn!("[config] output file {} should end in .txt", file_name);
        }
        Ok(())
    }

    /// Core parameters for one generation run. A missing seed is drawn at random here.
    pub fn params(&self) -> GenerationParams {
        let seed = self.seed.unwrap_or_else(rand::random);
        GenerationParams::new(self.width, self.height, self.entry, self.exit, seed)
            .with_perfect(self.perfect)
            .with_loop_policy(LoopPolicy::from_density(
                self.width,
                self.height,
                self.loop_density,
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# sample config
WIDTH=20
HEIGHT=15
ENTRY=0,0
EXIT=19,14
OUTPUT_FILE=maze.txt
PERFECT=True
SEED=42
";

    #[test]
    fn test_parse_sample() {
        let config = MazeConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.width, 20);
        assert_eq!(config.height, 15);
        assert_eq!(config.entry, (0, 0));
        assert_eq!(config.exit, (19, 14));
        assert_eq!(config.output_file, PathBuf::from("maze.txt"));
        assert!(config.perfect);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.loop_density, DEFAULT_LOOP_DENSITY);

        let params = config.params();
        assert_eq!(params.seed, 42);
        assert_eq!(params.loops.target, 30);
    }

    #[test]
    fn test_keys_are_case_insensitive_and_seed_optional() {
        let text = SAMPLE
            .replace("SEED=42", "seed=")
            .replace("WIDTH", "width")
            .replace("PERFECT=True", "perfect = false");
        let config = MazeConfig::parse(&text).unwrap();
        assert_eq!(config.width, 20);
        assert_eq!(config.seed, None);
        assert!(!config.perfect);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            MazeConfig::parse("WIDTH 20"),
            Err(ConfigError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            MazeConfig::parse("\nWIDTH=2=0"),
            Err(ConfigError::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            MazeConfig::parse(&format!("{SAMPLE}width=30\n")),
            Err(ConfigError::Syntax { line: 9, .. })
        ));
        assert!(matches!(
            MazeConfig::parse("COLOR=red"),
            Err(ConfigError::UnknownKey { line: 1, .. })
        ));
        assert!(matches!(
            MazeConfig::parse(&SAMPLE.replace("PERFECT=True\n", "")),
            Err(ConfigError::MissingKey("PERFECT"))
        ));
        assert!(matches!(
            MazeConfig::parse(&SAMPLE.replace("ENTRY=0,0", "ENTRY=0;0")),
            Err(ConfigError::InvalidValue { key: "ENTRY", .. })
        ));
        assert!(matches!(
            MazeConfig::parse(&SAMPLE.replace("PERFECT=True", "PERFECT=yes")),
            Err(ConfigError::InvalidValue { key: "PERFECT", .. })
        ));
    }

    #[test]
    fn test_geometry_errors() {
        assert!(matches!(
            MazeConfig::parse(&SAMPLE.replace("EXIT=19,14", "EXIT=0,0")),
            Err(ConfigError::SameEntryExit)
        ));
        assert!(matches!(
            MazeConfig::parse(&SAMPLE.replace("EXIT=19,14", "EXIT=20,14")),
            Err(ConfigError::OutOfBounds { name: "exit", .. })
        ));
        assert!(matches!(
            MazeConfig::parse(&SAMPLE.replace("WIDTH=20", "WIDTH=8")),
            Err(ConfigError::TooSmall { .. })
        ));
        assert!(matches!(
            MazeConfig::parse(&SAMPLE.replace("HEIGHT=15", "HEIGHT=0")),
            Err(ConfigError::ZeroSize)
        ));
        // (6, 5) is the stencil's top-left cell on a 20x15 maze
        assert!(matches!(
            MazeConfig::parse(&SAMPLE.replace("ENTRY=0,0", "ENTRY=6,5")),
            Err(ConfigError::InsideBlockedRegion { name: "entry", .. })
        ));
        assert!(matches!(
            MazeConfig::parse(&SAMPLE.replace("OUTPUT_FILE=maze.txt", "OUTPUT_FILE=../")),
            Err(ConfigError::InvalidOutputFile(_))
        ));
    }

    #[test]
    fn test_loop_density() {
        let config = MazeConfig::parse(&format!("{SAMPLE}LOOP_DENSITY=0.2\n")).unwrap();
        assert_eq!(config.params().loops.target, 60);
        assert!(matches!(
            MazeConfig::parse(&format!("{SAMPLE}LOOP_DENSITY=2\n")),
            Err(ConfigError::InvalidValue {
                key: "LOOP_DENSITY",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            MazeConfig::load("/nonexistent/amazeing.cfg"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_random_seed_when_absent() {
        let config = MazeConfig::parse(&SAMPLE.replace("SEED=42\n", "")).unwrap();
        assert!(config.params().validate().is_ok());
    }
}
