//! `docker compose` argument construction

use std::path::{Path, PathBuf};

use crate::domain::{Backend, ComposeFragmentSet};

/// Label docker compose puts on every container, network and volume it creates.
pub const PROJECT_LABEL: &str = "com.docker.compose.project";

/// One `docker compose` call against a fragment set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeInvocation {
    pub project_name: String,
    pub project_dir: PathBuf,
    pub fragments: ComposeFragmentSet,
    pub profiles: Vec<Backend>,
    pub verb: String,
    pub args: Vec<String>,
}

impl ComposeInvocation {
    pub fn new(
        project_name: &str,
        project_dir: &Path,
        fragments: ComposeFragmentSet,
        verb: &str,
    ) -> Self {
        Self {
            project_name: project_name.to_string(),
            project_dir: project_dir.to_path_buf(),
            fragments,
            profiles: Vec::new(),
            verb: verb.to_string(),
            args: Vec::new(),
        }
    }

    pub fn with_profile(mut self, profile: Backend) -> Self {
        if !self.profiles.contains(&profile) {
            self.profiles.push(profile);
        }
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Arguments for the docker binary, starting with `compose`.
    ///
    /// Fragment files are resolved against the project directory.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "-p".to_string(),
            self.project_name.clone(),
            "--project-directory".to_string(),
            self.project_dir.to_string_lossy().to_string(),
        ];
        for file in self.fragments.files() {
            args.push("-f".to_string());
            args.push(self.project_dir.join(file).to_string_lossy().to_string());
        }
        for profile in &self.profiles {
            args.push("--profile".to_string());
            args.push(profile.as_str().to_string());
        }
        args.push(self.verb.clone());
        args.extend(self.args.iter().cloned());
        args
    }
}

/// Filter selecting docker objects owned by a compose project.
pub fn project_label_filter(project_name: &str) -> String {
    format!("label={}={}", PROJECT_LABEL, project_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments() -> ComposeFragmentSet {
        ComposeFragmentSet::new(vec![
            "docker-compose.yml".into(),
            "docker-compose.local.yml".into(),
        ])
    }

    #[test]
    fn given_profile_and_args_when_to_args_then_ordered_before_and_after_verb() {
        let inv = ComposeInvocation::new("stack", Path::new("/srv/stack"), fragments(), "up")
            .with_profile(Backend::Vllm)
            .with_args(["-d", "--build"]);

        assert_eq!(
            inv.to_args(),
            vec![
                "compose",
                "-p",
                "stack",
                "--project-directory",
                "/srv/stack",
                "-f",
                "/srv/stack/docker-compose.yml",
                "-f",
                "/srv/stack/docker-compose.local.yml",
                "--profile",
                "vllm",
                "up",
                "-d",
                "--build",
            ]
        );
    }

    #[test]
    fn given_no_profile_when_to_args_then_omits_profile_flag() {
        let inv = ComposeInvocation::new("stack", Path::new("/srv/stack"), fragments(), "ps");
        let args = inv.to_args();
        assert!(!args.contains(&"--profile".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("ps"));
    }

    #[test]
    fn given_several_profiles_when_to_args_then_each_flagged_once() {
        let inv = ComposeInvocation::new("stack", Path::new("/srv/stack"), fragments(), "down")
            .with_profile(Backend::Ollama)
            .with_profile(Backend::Vllm)
            .with_profile(Backend::Ollama);
        let args = inv.to_args();
        assert_eq!(args.iter().filter(|a| *a == "--profile").count(), 2);
        assert!(args.contains(&"ollama".to_string()));
        assert!(args.contains(&"vllm".to_string()));
    }

    #[test]
    fn test_project_label_filter() {
        assert_eq!(
            project_label_filter("stack"),
            "label=com.docker.compose.project=stack"
        );
    }
}
