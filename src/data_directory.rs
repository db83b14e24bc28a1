use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use directories::ProjectDirs;

const TX_DIRECTORY: &str = "tx";

/// Root directory for all verdigris-cli state.
///
/// Defaults to the platform data directory (e.g. `~/.local/share/verdigris`
/// on Linux); an explicit `--data-dir` overrides it. Resolution never touches
/// the filesystem, directories are created on first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub fn get(root_dir: Option<PathBuf>) -> Result<Self> {
        let root = match root_dir {
            Some(root) => root,
            None => ProjectDirs::from("org", "verdigris", "verdigris")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .context("Could not determine data directory")?,
        };
        Ok(DataDirectory { root })
    }

    pub fn root_dir_path(&self) -> PathBuf {
        self.root.clone()
    }

    /// Directory holding staged transactions, one file per draft id.
    pub fn tx_directory_path(&self) -> PathBuf {
        self.root.join(TX_DIRECTORY)
    }
}

impl fmt::Display for DataDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn explicit_root_wins() {
        let temp_dir = TempDir::new().unwrap();
        let explicit = temp_dir.path().to_path_buf();
        let data_dir = DataDirectory::get(Some(explicit.clone())).unwrap();
        assert_eq!(explicit, data_dir.root_dir_path());
        assert_eq!(explicit.join("tx"), data_dir.tx_directory_path());
    }

    #[test]
    fn tx_directory_is_under_the_root() {
        // No HOME in some CI sandboxes; only assert when resolution works.
        if let Ok(data_dir) = DataDirectory::get(None) {
            assert!(data_dir.tx_directory_path().ends_with("tx"));
            assert!(data_dir.tx_directory_path().starts_with(data_dir.root_dir_path()));
        }
    }
}
