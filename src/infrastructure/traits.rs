//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Exit status of an attached (streaming) external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command and capture its output.
    fn run(&self, cmd: &str, args: &[String]) -> io::Result<CommandOutput>;

    /// Run a command attached to the terminal (inherited stdio).
    /// Blocks until the command exits.
    fn run_attached(&self, cmd: &str, args: &[String]) -> io::Result<CommandStatus>;
}

/// Interactive yes/no confirmation.
pub trait Prompter: Send + Sync {
    /// Ask a question, returning true only for an affirmative answer.
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Affirmative answers accepted by [`Prompter::confirm`].
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = std::process::Command::new(cmd).args(args).output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_attached(&self, cmd: &str, args: &[String]) -> io::Result<CommandStatus> {
        let status = std::process::Command::new(cmd).args(args).status()?;
        Ok(CommandStatus {
            code: status.code(),
        })
    }
}

/// Real prompter reading one line from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        ask(question, &mut io::stdin().lock(), &mut io::stdout())
    }
}

/// Write the question, read one answer line.
fn ask(question: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{} ", format!("{} [y/N]", question).cyan())?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn given_answer_line_when_ask_then_question_shown_and_answer_judged() {
        colored::control::set_override(false);
        let mut shown = Vec::<u8>::new();

        let yes = ask("Remove?", &mut io::Cursor::new("yes\n"), &mut shown).unwrap();
        let no = ask("Remove?", &mut io::Cursor::new(""), &mut Vec::<u8>::new()).unwrap();

        assert!(yes);
        assert!(!no);
        assert_eq!(String::from_utf8(shown).unwrap(), "Remove? [y/N] ");
    }

    #[test]
    fn given_true_command_when_run_then_success() {
        let out = RealCommandRunner.run("sh", &["-c".into(), "echo hi".into()]).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hi");
    }

    #[test]
    fn given_failing_command_when_run_attached_then_reports_code() {
        let status = RealCommandRunner
            .run_attached("sh", &["-c".into(), "exit 3".into()])
            .unwrap();
        assert!(!status.success());
        assert_eq!(status.code, Some(3));
    }
}
