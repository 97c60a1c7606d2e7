use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dirs::home_dir;

pub const HOME_ENV: &str = "DEMONSTRATIVO_HOME";
const DEFAULT_DIR_NAME: &str = ".demonstrativo";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.txt";

/// Resolves the on-disk layout under the application base directory.
pub struct PathResolver;

impl PathResolver {
    /// `$DEMONSTRATIVO_HOME`, else `~/.demonstrativo`, else `./.demonstrativo`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    /// Line-editor history for the interactive shell.
    pub fn history_file_in(base: &Path) -> PathBuf {
        base.join(HISTORY_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_under_config_dir() {
        let base = Path::new("/tmp/demo");
        assert_eq!(
            PathResolver::config_file_in(base),
            PathBuf::from("/tmp/demo/config/config.json")
        );
        assert_eq!(
            PathResolver::resolve_base(Some(base.to_path_buf())),
            base.to_path_buf()
        );
    }
}
