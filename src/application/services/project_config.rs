//! Project config files: backend selector, service toggles, credentials
//!
//! All files are read fresh on every call. Missing or unreadable files are
//! normal: they mean "default backend" and "no services enabled".

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{resolve, Backend, ComposeFragmentSet, KeyValues, RunMode, ServiceToggles};
use crate::infrastructure::traits::FileSystem;

/// Variables the LLM dispatcher reads from the credentials file in external mode.
const CREDENTIAL_KEYS: [&str; 3] = ["LLM_PROVIDER", "LLM_API_KEY", "LLM_MODEL"];

/// Reads the project's flat config files.
pub struct ProjectConfigService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ProjectConfigService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Load `KEY=value` entries from a file, failing soft.
    pub fn load_key_values(&self, path: &Path) -> KeyValues {
        if !self.fs.is_file(path) {
            debug!("load_key_values: {} absent, using empty config", path.display());
            return KeyValues::default();
        }
        match self.fs.read_to_string(path) {
            Ok(content) => {
                let kv = KeyValues::parse(&content);
                debug!("load_key_values: {} entries from {}", kv.len(), path.display());
                kv
            }
            Err(e) => {
                warn!("cannot read {}: {}; treating as empty", path.display(), e);
                KeyValues::default()
            }
        }
    }

    /// Selected local LLM backend.
    pub fn backend(&self) -> ApplicationResult<Backend> {
        let kv = self.load_key_values(&self.settings.backend_file());
        Ok(Backend::from_selector(&kv)?)
    }

    /// Service toggles in file order.
    pub fn toggles(&self) -> ServiceToggles {
        ServiceToggles::from_key_values(&self.load_key_values(&self.settings.services_file()))
    }

    /// Fragment set for a run mode, from the current toggle file.
    pub fn fragments(&self, mode: RunMode) -> ComposeFragmentSet {
        resolve(&self.toggles(), mode)
    }

    pub fn credentials_present(&self) -> bool {
        self.fs.is_file(&self.settings.credentials_file())
    }

    /// Fail fast when external mode cannot work.
    pub fn require_credentials(&self) -> ApplicationResult<()> {
        let path = self.settings.credentials_file();
        if self.fs.is_file(&path) {
            return Ok(());
        }
        debug!("require_credentials: {} missing", path.display());
        Err(ApplicationError::MissingPrerequisite {
            remediation: credentials_remediation(&path),
            path,
        })
    }
}

fn credentials_remediation(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let mut text = format!(
        "External mode needs provider credentials. Create {} with:\n",
        name
    );
    for key in CREDENTIAL_KEYS {
        text.push_str(&format!("  {}=...\n", key));
    }
    text.push_str("(LLM_PROVIDER is one of: openai, anthropic)");
    text
}
