use color_eyre::{eyre::WrapErr, Result};
use env_logger::{Builder, Env, Target};
use std::{fs::File, path::Path};

/// Routes `log` output to stderr, or to `log_file` so the terminal UI stays clean.
///
/// `RUST_LOG` overrides the default level.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let mut builder = match log_file {
        Some(path) => {
            let file = File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?;
            let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
            builder.target(Target::Pipe(Box::new(file)));
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("warn")),
    };
    builder.try_init().wrap_err("failed to install logger")
}
