use anyhow::{Context, Result};
use std::path::PathBuf;

const DATA_DIR_VAR: &str = "GROUPSAVE_DATA_DIR";
const DB_VAR: &str = "GROUPSAVE_DB";
const USER_VAR: &str = "GROUPSAVE_USER";

/// Where things live and who is using the app.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    /// E-mail of the current user, when pinned through the environment.
    pub(crate) user_email: Option<String>,
}

impl Config {
    pub(crate) fn load() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let data_dir = match non_empty(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = non_empty(DB_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("groupsave.db"));

        Ok(Self {
            data_dir,
            db_path,
            user_email: non_empty(USER_VAR).map(|e| e.trim().to_lowercase()),
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "groupsave", "GroupSave")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
