//! # Source Formatting
//!
//! Runs the target language's formatter over the generated tree. Process
//! execution sits behind [`CommandExecutor`] so the pipeline is testable
//! without the external tools installed.

use crate::error::{AppError, AppResult};
use std::path::Path;
use std::process::{Command, Output};
use walkdir::WalkDir;

/// Abstraction over launching an external command.
pub trait CommandExecutor {
    /// Runs `program` with `args`, capturing its output.
    fn execute(&self, program: &str, args: &[String]) -> AppResult<Output>;
}

/// The executor used in production: spawns the real process.
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, program: &str, args: &[String]) -> AppResult<Output> {
        Command::new(program)
            .args(args)
            .output()
            .map_err(|e| AppError::External {
                command: program.to_string(),
                detail: format!("failed to launch: {}", e),
            })
    }
}

/// Formats every generated source file under `out_dir` with the target
/// language's formatter.
///
/// Walks the tree in sorted order so the formatter always sees the same
/// file list. A run with no matching files is a no-op, not an error.
pub fn format_source_tree<E: CommandExecutor>(
    language: &str,
    out_dir: &Path,
    executor: &E,
) -> AppResult<()> {
    let (program, leading_args, extension) = match language {
        "rust" => ("rustfmt", vec!["--edition".to_string(), "2021".to_string()], "rs"),
        "go" => ("gofmt", vec!["-w".to_string()], "go"),
        _ => return Ok(()),
    };
    let mut files = Vec::new();
    for entry in WalkDir::new(out_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| AppError::General(format!("cannot walk output: {}", e)))?;
        if entry.file_type().is_file()
            && entry.path().extension().map(|ext| ext == extension) == Some(true)
        {
            files.push(entry.path().to_string_lossy().into_owned());
        }
    }
    if files.is_empty() {
        return Ok(());
    }
    let mut args = leading_args;
    args.extend(files);
    let output = executor.execute(program, &args)?;
    if !output.status.success() {
        return Err(AppError::External {
            command: program.to_string(),
            detail: format!(
                "{}{}",
                String::from_utf8_lossy(&output.stderr),
                String::from_utf8_lossy(&output.stdout)
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    /// Records invocations instead of spawning anything.
    struct MockExecutor {
        calls: RefCell<Vec<(String, Vec<String>)>>,
        exit_code: i32,
        stderr: &'static str,
    }

    impl MockExecutor {
        fn succeeding() -> MockExecutor {
            MockExecutor {
                calls: RefCell::new(Vec::new()),
                exit_code: 0,
                stderr: "",
            }
        }

        fn failing(stderr: &'static str) -> MockExecutor {
            MockExecutor {
                calls: RefCell::new(Vec::new()),
                exit_code: 1,
                stderr,
            }
        }
    }

    impl CommandExecutor for MockExecutor {
        fn execute(&self, program: &str, args: &[String]) -> AppResult<Output> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            Ok(Output {
                status: ExitStatus::from_raw(self.exit_code << 8),
                stdout: Vec::new(),
                stderr: self.stderr.as_bytes().to_vec(),
            })
        }
    }

    fn touch(dir: &tempfile::TempDir, name: &str) {
        std::fs::write(dir.path().join(name), "x\n").unwrap();
    }

    #[test]
    fn test_formats_rust_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir, "model.rs");
        touch(&dir, "client.rs");
        touch(&dir, "notes.md");
        let executor = MockExecutor::succeeding();
        format_source_tree("rust", dir.path(), &executor).unwrap();
        let calls = executor.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (program, args) = &calls[0];
        assert_eq!(program, "rustfmt");
        assert_eq!(args[0], "--edition");
        assert_eq!(args[1], "2021");
        assert!(args[2].ends_with("client.rs"));
        assert!(args[3].ends_with("model.rs"));
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn test_no_matching_files_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir, "notes.md");
        let executor = MockExecutor::succeeding();
        format_source_tree("rust", dir.path(), &executor).unwrap();
        assert!(executor.calls.borrow().is_empty());
    }

    #[test]
    fn test_go_uses_gofmt() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir, "client.go");
        let executor = MockExecutor::succeeding();
        format_source_tree("go", dir.path(), &executor).unwrap();
        let calls = executor.calls.borrow();
        assert_eq!(calls[0].0, "gofmt");
        assert_eq!(calls[0].1[0], "-w");
    }

    #[test]
    fn test_formatter_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir, "model.rs");
        let executor = MockExecutor::failing("bad syntax");
        let err = format_source_tree("rust", dir.path(), &executor).unwrap_err();
        match err {
            AppError::External { command, detail } => {
                assert_eq!(command, "rustfmt");
                assert!(detail.contains("bad syntax"));
            }
            other => panic!("expected External, got {}", other),
        }
    }
}
