//! Loading of [`Inputs`] from the process environment and `.env` files.

use std::path::Path;

use super::resolve::{vars, Inputs};
use super::ConfigError;

/// Load inputs from the process environment, layered over a `.env` file.
///
/// With `env_file` set, that file must exist. Without it, a `.env` is searched from the
/// current directory upward and skipped if none is found. Process variables always win
/// over `.env` entries; the process environment itself is left untouched.
pub fn load(env_file: Option<&Path>) -> Result<Inputs, ConfigError> {
    load_from(env_file, process_vars())
}

/// Same as [`load`], but with an explicit set of process variables.
pub fn load_from<I, K, V>(env_file: Option<&Path>, process: I) -> Result<Inputs, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut inputs = read_env_file(env_file)?;
    inputs.extend(
        process
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .filter(|(name, _)| vars::is_recognized(name)),
    );
    log::debug!("loaded {} recognized configuration inputs", inputs.len());
    Ok(inputs)
}

fn read_env_file(env_file: Option<&Path>) -> Result<Inputs, ConfigError> {
    let iter = match env_file {
        Some(path) => {
            log::debug!("reading environment file {}", path.display());
            dotenvy::from_path_iter(path)?
        }
        None => match dotenvy::dotenv_iter() {
            Ok(iter) => iter,
            Err(err) if err.not_found() => {
                log::debug!("no .env file found");
                return Ok(Inputs::new());
            }
            Err(err) => return Err(err.into()),
        },
    };

    let mut inputs = Inputs::new();
    for entry in iter {
        let (name, value) = entry?;
        if vars::is_recognized(&name) {
            inputs.set(name, value);
        }
    }
    Ok(inputs)
}

fn process_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os().filter_map(|(name, value)| {
        Some((name.into_string().ok()?, value.into_string().ok()?))
    })
}
