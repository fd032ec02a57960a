//! External process launching
//!
//! The runner talks to the operating system only through [`Launcher`], so the
//! sequencing logic can be exercised without the photogrammetry toolchain.

use std::future::Future;
use std::io;
use std::path::Path;

use tokio::process::Command;
use tracing::debug;

/// Starts an external program and waits for it to finish
pub trait Launcher {
    /// Resolves to the exit code, or `None` when the process was killed by a signal
    fn launch(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> impl Future<Output = io::Result<Option<i32>>>;
}

/// Launches real processes that inherit stdout and stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    async fn launch(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> io::Result<Option<i32>> {
        debug!(program = %program.display(), cwd = %working_dir.display(), "spawning");
        let status = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .status()
            .await?;
        Ok(status.code())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_exit_code() {
        let temp_dir = tempfile::tempdir().unwrap();
        let code = ProcessLauncher
            .launch(
                Path::new("sh"),
                &["-c".to_string(), "exit 3".to_string()],
                temp_dir.path(),
            )
            .await
            .unwrap();
        assert_eq!(code, Some(3));
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        ProcessLauncher
            .launch(
                Path::new("sh"),
                &["-c".to_string(), "touch here.txt".to_string()],
                temp_dir.path(),
            )
            .await
            .unwrap();
        assert!(temp_dir.path().join("here.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = ProcessLauncher
            .launch(
                Path::new("/nonexistent/openMVG_main_GlobalSfM"),
                &[],
                temp_dir.path(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
