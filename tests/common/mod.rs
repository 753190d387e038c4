//! Shared fixtures: recording command runner, scripted prompter, temp project

#![allow(dead_code)]

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use launchpad::config::Settings;
use launchpad::infrastructure::traits::{
    CommandOutput, CommandRunner, CommandStatus, Prompter, RealFileSystem,
};
use launchpad::infrastructure::ServiceContainer;

type Responder = Box<dyn Fn(&[String]) -> CommandOutput + Send + Sync>;

/// Records every call and answers from a scripted responder.
pub struct MockRunner {
    calls: Mutex<Vec<Vec<String>>>,
    responder: Responder,
}

impl MockRunner {
    pub fn new(responder: impl Fn(&[String]) -> CommandOutput + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Every command succeeds with empty output.
    pub fn succeeding() -> Self {
        Self::new(|_| ok(""))
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &str, args: &[String]) -> io::Result<CommandOutput> {
        assert_eq!(cmd, "docker");
        self.calls.lock().unwrap().push(args.to_vec());
        Ok((self.responder)(args))
    }

    fn run_attached(&self, cmd: &str, args: &[String]) -> io::Result<CommandStatus> {
        assert_eq!(cmd, "docker");
        self.calls.lock().unwrap().push(args.to_vec());
        Ok(CommandStatus {
            code: (self.responder)(args).code,
        })
    }
}

/// Answers every confirmation with a fixed value and counts questions.
pub struct MockPrompter {
    answer: bool,
    asked: Mutex<usize>,
}

impl MockPrompter {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        *self.asked.lock().unwrap()
    }
}

impl Prompter for MockPrompter {
    fn confirm(&self, _question: &str) -> io::Result<bool> {
        *self.asked.lock().unwrap() += 1;
        Ok(self.answer)
    }
}

pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn fail(code: i32) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: String::new(),
        stderr: "boom".to_string(),
    }
}

pub fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("write fixture");
}

pub fn settings(dir: &Path) -> Settings {
    Settings {
        project_dir: dir.to_path_buf(),
        project_name: Some("stack".into()),
        ..Settings::default()
    }
}

pub fn container(
    dir: &Path,
    runner: Arc<MockRunner>,
    prompter: Arc<MockPrompter>,
) -> ServiceContainer {
    ServiceContainer::with_deps(settings(dir), Arc::new(RealFileSystem), runner, prompter)
}

pub fn project() -> TempDir {
    launchpad::util::testing::init_test_setup();
    TempDir::new().expect("temp dir")
}

// ============================================================
// Call inspection
// ============================================================

pub fn has_fragment(call: &[String], fragment: &str) -> bool {
    call.iter().any(|a| a.ends_with(fragment))
}

pub fn is_local(call: &[String]) -> bool {
    has_fragment(call, "docker-compose.local.yml")
}

pub fn is_external(call: &[String]) -> bool {
    has_fragment(call, "docker-compose.external.yml")
}

pub fn has_pair(call: &[String], flag: &str, value: &str) -> bool {
    call.windows(2).any(|w| w[0] == flag && w[1] == value)
}

pub fn has_arg(call: &[String], arg: &str) -> bool {
    call.iter().any(|a| a == arg)
}
