use std::fs::File;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes the global logger.
///
/// The terminal belongs to the game while it runs, so records only go to
/// `log_file` when one is given. Without a file, logging stays off unless
/// `RUST_LOG` asks for it. When `verbose` is `true` debug messages are
/// included, otherwise info and above.
pub fn init(verbose: bool, log_file: Option<&Path>) -> std::io::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let default_filter = if log_file.is_some() {
        level
    } else {
        LevelFilter::Off
    };
    let env = Env::default().default_filter_or(default_filter.to_string());
    let mut builder = Builder::from_env(env);

    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
    Ok(())
}
