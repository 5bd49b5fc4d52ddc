use crate::error::Result;
use log::info;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;

/// Publish a step output.
///
/// Appends `key=value` to the file named by `GITHUB_OUTPUT`. Outside a
/// workflow run (no variable set) the value is only logged, which keeps
/// local runs and tests harmless.
pub fn set_output(key: &str, value: &str) -> Result<()> {
    info!("output {}={}", key, value);

    if let Ok(path) = env::var("GITHUB_OUTPUT") {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}={}", key, value)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn test_outputs_append_to_file() {
        let file = NamedTempFile::new().unwrap();
        env::set_var("GITHUB_OUTPUT", file.path());

        set_output("bump-type", "minor").unwrap();
        set_output("new-tag", "v1.5.0").unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "bump-type=minor\nnew-tag=v1.5.0\n");

        env::remove_var("GITHUB_OUTPUT");
    }

    #[test]
    #[serial]
    fn test_outputs_without_file_do_not_fail() {
        env::remove_var("GITHUB_OUTPUT");
        assert!(set_output("bump-type", "none").is_ok());
    }
}
