use std::{env, path::PathBuf};

use anyhow::{Result, anyhow};

const DEFAULT_CONFIG_FILE: &str = "paramforge.jsonc";

pub fn config_path_from_args() -> Result<PathBuf> {
    config_path_from(env::args().skip(1))
}

fn config_path_from(mut args: impl Iterator<Item = String>) -> Result<PathBuf> {
    let first = args.next();

    if args.next().is_some() {
        return Err(anyhow!(
            "expected at most one argument: <config-path>. Example: paramforge ./paramforge.jsonc"
        ));
    }

    match first {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(env::current_dir()?.join(DEFAULT_CONFIG_FILE)),
    }
}
