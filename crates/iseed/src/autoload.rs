//! Composer autoload refresh after new seeder classes are written.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{info, warn};

/// Runs `<composer> dump-autoload` in a project directory.
#[derive(Debug, Clone)]
pub struct Composer {
    binary: String,
    working_dir: PathBuf,
}

impl Composer {
    pub fn new(binary: impl Into<String>, working_dir: impl AsRef<Path>) -> Self {
        Self {
            binary: binary.into(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    /// Regenerates the autoloader. Failures are logged and reported as `false`;
    /// a stale autoloader does not invalidate the written seed.
    pub async fn dump_autoloads(&self) -> bool {
        let result = Command::new(&self.binary)
            .arg("dump-autoload")
            .current_dir(&self.working_dir)
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                info!("Regenerated autoload files");
                true
            }
            Ok(output) => {
                warn!(
                    "{} dump-autoload exited with {}: {}",
                    self.binary,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                false
            }
            Err(e) => {
                warn!("Could not run {} dump-autoload: {e}", self.binary);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let composer = Composer::new("iseed-no-such-composer-binary", dir.path());
        assert!(!composer.dump_autoloads().await);
    }
}
