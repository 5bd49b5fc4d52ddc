use crate::error::{ReleaseError, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a user-supplied shell command.
///
/// The command is executed via `sh -c` in `workdir` with the given extra
/// environment variables, inheriting the action's stdout/stderr so its
/// output lands in the workflow log. Any non-zero exit is an error.
pub fn run_command(command: &str, workdir: &Path, env: &[(&str, &str)]) -> Result<()> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .current_dir(workdir)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    for (key, value) in env {
        cmd.env(key, value);
    }

    let status = cmd
        .status()
        .map_err(|e| ReleaseError::hook(format!("failed to spawn '{}': {}", command, e)))?;

    if !status.success() {
        return Err(ReleaseError::hook(format!(
            "'{}' exited with {}",
            command,
            status.code().unwrap_or(-1)
        )));
    }

    Ok(())
}
