use std::fs::File;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

use crate::error::GameError;

/// Initializes the global logger.
///
/// The game draws on the terminal's alternate screen, so log lines only go to
/// `log_file` when one is given and are dropped otherwise. With `verbose` the
/// default filter is `debug`, else `info`; `RUST_LOG` overrides both.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<(), GameError> {
    let Some(path) = log_file else {
        log::set_max_level(LevelFilter::Off);
        return Ok(());
    };

    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => return Err(GameError::Logging(format!("{}: {e}", path.display()))),
    };

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.target(Target::Pipe(Box::new(file)));

    // `try_init` only fails if a logger was already set; tests may call
    // `init` more than once.
    let _ = builder.try_init();
    Ok(())
}
