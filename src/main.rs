use amazeing::{app::App, config::MazeConfig, export};
use tracing_appender::non_blocking::WorkerGuard;

const USAGE: &str = "Usage: amazeing <config.txt> [--print]";

/// Log to a file so the terminal display stays clean. The level comes from `AMAZEING_LOG`.
fn init_tracing() -> WorkerGuard {
    let level = std::env::var("AMAZEING_LOG")
        .ok()
        .and_then(|s| s.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    let file_appender = tracing_appender::rolling::never(".", "amazeing.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .init();
    guard
}

fn main() -> std::io::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let Some(config_path) = args.next() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let print_only = match args.next().as_deref() {
        None => false,
        Some("--print") => true,
        Some(other) => {
            eprintln!("Unknown argument '{other}'\n{USAGE}");
            std::process::exit(2);
        }
    };

    let _guard = init_tracing();

    let config = match MazeConfig::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("[config] {}", err);
            eprintln!("Configuration error: {err}");
            std::process::exit(1);
        }
    };
    tracing::info!("[config] loaded {}", config_path);

    let app = App::new(config);
    if print_only {
        return match app.generate_and_save() {
            Ok((generated, path)) => {
                print!(
                    "{}",
                    export::to_hex_string(&generated.maze, generated.entry, generated.exit, &path)
                );
                Ok(())
            }
            Err(err) => {
                tracing::error!("[generate] {}", err);
                eprintln!("Error: {err}");
                std::process::exit(if err.is_fatal() { 70 } else { 1 });
            }
        };
    }

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    if let Err(err) = &result {
        tracing::error!("[app] {}", err);
    }
    result
}
