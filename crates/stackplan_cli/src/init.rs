//! `stackplan init`: writes a default configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use stackplan_config::{RunConfig, CONFIG_FILE_NAME};

use crate::GlobalArgs;

/// Runs the `stackplan init` command.
///
/// Writes `stackplan.toml` with every default spelled out into `dir` (or the
/// current directory). Refuses to replace an existing file unless `force` is
/// set. Returns exit code 0 on success.
pub fn run(
    dir: Option<String>,
    force: bool,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let target_dir = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };

    let path = write_default_config(&target_dir, force)?;
    if !global.quiet {
        eprintln!("     Created {}", path.display());
    }
    Ok(0)
}

/// Writes the default configuration into `dir`, returning the file path.
pub fn write_default_config(
    dir: &Path,
    force: bool,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }

    fs::create_dir_all(dir)?;
    let content = toml::to_string_pretty(&RunConfig::default())?;
    fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackplan_config::load_config;

    #[test]
    fn written_config_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_default_config(dir.path(), false).unwrap();
        assert_eq!(path, dir.path().join("stackplan.toml"));

        let config = load_config(&path).unwrap();
        assert_eq!(config, RunConfig::default());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[anneal]"));
        assert!(text.contains("cooling_rate = 0.003"));
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stackplan.toml");
        fs::write(&path, "[sample]\nlayers = 5\n").unwrap();

        let err = write_default_config(dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[sample]\nlayers = 5\n");
    }

    #[test]
    fn force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stackplan.toml"), "[sample]\nlayers = 5\n").unwrap();

        let path = write_default_config(dir.path(), true).unwrap();
        assert_eq!(load_config(&path).unwrap(), RunConfig::default());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = write_default_config(&nested, false).unwrap();
        assert!(path.is_file());
    }
}
