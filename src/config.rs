//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/launchpad/launchpad.toml`
//! 3. Local config: `<project_dir>/.launchpad.toml`
//! 4. Environment variables: `LAUNCHPAD_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Directory inside the project holding launcher state.
pub const STATE_DIR: &str = ".launchpad";

/// Project-relative config file names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilesConfig {
    /// Backend selector (`LOCAL_LLM_BACKEND=ollama|vllm`)
    pub backend: PathBuf,
    /// Service toggles (`ENABLE_<NAME>=true|false`)
    pub services: PathBuf,
    /// Provider credentials required by external mode
    pub credentials: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            backend: PathBuf::from("llm.env"),
            services: PathBuf::from("services.env"),
            credentials: PathBuf::from(".env"),
        }
    }
}

/// URLs printed in the startup banner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UrlsConfig {
    /// Streamlit client
    pub ui: String,
    /// LLM dispatcher API
    pub dispatcher: String,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            ui: "http://localhost:8501".into(),
            dispatcher: "http://localhost:5100".into(),
        }
    }
}

/// Raw files config for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFilesConfig {
    pub backend: Option<PathBuf>,
    pub services: Option<PathBuf>,
    pub credentials: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawUrlsConfig {
    pub ui: Option<String>,
    pub dispatcher: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub docker_bin: Option<String>,
    pub project_name: Option<String>,
    pub fallback_volumes: Option<Vec<String>>,
    pub files: RawFilesConfig,
    pub urls: RawUrlsConfig,
}

/// Unified configuration for launchpad.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Project directory holding the compose fragments (not read from files)
    #[serde(skip)]
    pub project_dir: PathBuf,
    /// Docker executable (default: "docker")
    pub docker_bin: String,
    /// Compose project name (default: normalized project directory name)
    pub project_name: Option<String>,
    /// Named volumes removed by `remove` even when unlabelled,
    /// prefixed with `<project_name>_`
    pub fallback_volumes: Vec<String>,
    pub files: FilesConfig,
    pub urls: UrlsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            docker_bin: "docker".into(),
            project_name: None,
            fallback_volumes: vec!["ollama_data".into(), "postgres_data".into()],
            files: FilesConfig::default(),
            urls: UrlsConfig::default(),
        }
    }
}

/// Get the XDG config directory for launchpad.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "launchpad").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("launchpad.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".launchpad.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input unchanged on failure.
fn expand_env_vars(s: &str) -> String {
    shellexpand::full(s)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()))
}

/// Normalize a directory name the way compose derives project names:
/// lowercase, only `[a-z0-9_-]`.
pub fn normalize_project_name(name: &str) -> String {
    let normalized: String = name
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    let normalized = normalized.trim_start_matches(['_', '-']);
    if normalized.is_empty() {
        "launchpad".to_string()
    } else {
        normalized.to_string()
    }
}

impl Settings {
    /// Effective compose project name, normalized whether configured or derived.
    pub fn project_name(&self) -> String {
        match &self.project_name {
            Some(name) if !name.trim().is_empty() => normalize_project_name(name.trim()),
            _ => {
                let dir_name = self
                    .project_dir
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
                    .or_else(|| {
                        self.project_dir
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                    })
                    .unwrap_or_default();
                normalize_project_name(&dir_name)
            }
        }
    }

    /// Backend selector file, resolved against the project directory.
    pub fn backend_file(&self) -> PathBuf {
        self.project_dir.join(&self.files.backend)
    }

    /// Service toggle file, resolved against the project directory.
    pub fn services_file(&self) -> PathBuf {
        self.project_dir.join(&self.files.services)
    }

    /// Credentials file, resolved against the project directory.
    pub fn credentials_file(&self) -> PathBuf {
        self.project_dir.join(&self.files.credentials)
    }

    /// Session record of the last started mode.
    pub fn session_file(&self) -> PathBuf {
        self.project_dir.join(STATE_DIR).join("session.toml")
    }

    /// Fully qualified fallback volume names.
    pub fn fallback_volume_names(&self) -> Vec<String> {
        let project = self.project_name();
        self.fallback_volumes
            .iter()
            .map(|v| format!("{}_{}", project, v))
            .collect()
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.docker_bin = expand_env_vars(&self.docker_bin);
        self.files.backend = expand_path(&self.files.backend);
        self.files.services = expand_path(&self.files.services);
        self.files.credentials = expand_path(&self.files.credentials);
    }

    /// Overlay wins where specified; arrays are replaced, not merged.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            project_dir: self.project_dir.clone(),
            docker_bin: overlay
                .docker_bin
                .clone()
                .unwrap_or_else(|| self.docker_bin.clone()),
            project_name: overlay
                .project_name
                .clone()
                .or_else(|| self.project_name.clone()),
            fallback_volumes: overlay
                .fallback_volumes
                .clone()
                .unwrap_or_else(|| self.fallback_volumes.clone()),
            files: FilesConfig {
                backend: overlay
                    .files
                    .backend
                    .clone()
                    .unwrap_or_else(|| self.files.backend.clone()),
                services: overlay
                    .files
                    .services
                    .clone()
                    .unwrap_or_else(|| self.files.services.clone()),
                credentials: overlay
                    .files
                    .credentials
                    .clone()
                    .unwrap_or_else(|| self.files.credentials.clone()),
            },
            urls: UrlsConfig {
                ui: overlay.urls.ui.clone().unwrap_or_else(|| self.urls.ui.clone()),
                dispatcher: overlay
                    .urls
                    .dispatcher
                    .clone()
                    .unwrap_or_else(|| self.urls.dispatcher.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Project directory (compose fragments, local config)
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/launchpad/launchpad.toml`
    /// 3. Local config: `<project_dir>/.launchpad.toml`
    /// 4. Environment variables: `LAUNCHPAD_*` prefix
    pub fn load(project_dir: &Path) -> Result<Self, ApplicationError> {
        let mut current = Self {
            project_dir: project_dir.to_path_buf(),
            ..Self::default()
        };

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        let local_path = project_config_path(project_dir);
        if local_path.exists() {
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply LAUNCHPAD_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`: `LAUNCHPAD_FILES__BACKEND=conf/llm.env`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("LAUNCHPAD")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("fallback_volumes")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("docker_bin") {
            settings.docker_bin = val;
        }
        if let Ok(val) = config.get_string("project_name") {
            settings.project_name = Some(val);
        }
        if let Ok(val) = config.get::<Vec<String>>("fallback_volumes") {
            settings.fallback_volumes = val;
        }
        if let Ok(val) = config.get_string("files.backend") {
            settings.files.backend = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("files.services") {
            settings.files.services = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("files.credentials") {
            settings.files.credentials = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("urls.ui") {
            settings.urls.ui = val;
        }
        if let Ok(val) = config.get_string("urls.dispatcher") {
            settings.urls.dispatcher = val;
        }

        Ok(settings)
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
