//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Key for the local LLM backend selector.
pub const BACKEND_KEY: &str = "LOCAL_LLM_BACKEND";

/// Prefix of service toggle keys, e.g. `ENABLE_REDIS`.
pub const TOGGLE_PREFIX: &str = "ENABLE_";

/// Ordered `KEY=value` entries of a flat config file.
///
/// File order is preserved. A repeated key keeps its first position
/// and takes its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValues {
    entries: Vec<(String, String)>,
}

impl KeyValues {
    /// Parse flat config content.
    ///
    /// Skips blank lines, `#` comments, lines without `=` and lines with an
    /// empty key. Values are trimmed, trailing comments and one pair of
    /// surrounding quotes are stripped.
    pub fn parse(content: &str) -> Self {
        let mut kv = Self::default();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = parse_line(trimmed) {
                kv.insert(key, value);
            }
        }
        kv
    }

    /// Insert or overwrite a value, keeping the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn parse_line(line: &str) -> Option<(&str, String)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = strip_quotes(strip_trailing_comment(value));
    Some((key, value))
}

/// Strip trailing comment from a value, respecting quotes.
/// `value  # comment` → `value`
/// `'val#ue'` → `'val#ue'`
fn strip_trailing_comment(s: &str) -> &str {
    let s = s.trim();
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for (i, b) in s.bytes().enumerate() {
        match b {
            b'\'' if !in_double_quote => in_single_quote = !in_single_quote,
            b'"' if !in_single_quote => in_double_quote = !in_double_quote,
            b'#' if !in_single_quote && !in_double_quote => return s[..i].trim_end(),
            _ => {}
        }
    }
    s
}

fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    let quoted = (s.starts_with('"') && s.ends_with('"'))
        || (s.starts_with('\'') && s.ends_with('\''));
    if quoted && s.len() >= 2 {
        return s[1..s.len() - 1].to_string();
    }
    s.to_string()
}

/// Local LLM backend, passed to compose as `--profile`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    #[default]
    Ollama,
    Vllm,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Ollama => "ollama",
            Backend::Vllm => "vllm",
        }
    }

    /// Resolve the backend from selector file entries.
    ///
    /// Absent key or empty value selects the default backend.
    pub fn from_selector(kv: &KeyValues) -> Result<Self, DomainError> {
        match kv.get(BACKEND_KEY).map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for Backend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Backend::Ollama),
            "vllm" => Ok(Backend::Vllm),
            _ => Err(DomainError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the LLM runs: in a local container or at an external provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Local,
    External,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Local => "local",
            RunMode::External => "external",
        }
    }

    /// The other mode, used as the probe fallback.
    pub fn other(&self) -> Self {
        match self {
            RunMode::Local => RunMode::External,
            RunMode::External => RunMode::Local,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `ENABLE_<NAME>` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceToggle {
    /// Service name, lower-cased suffix of the key (`ENABLE_REDIS` → `redis`)
    pub name: String,
    pub enabled: bool,
}

/// Service toggles in config-file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceToggles {
    toggles: Vec<ServiceToggle>,
}

impl ServiceToggles {
    /// Collect toggles from config entries.
    ///
    /// Keys without the `ENABLE_` prefix are ignored. A toggle is enabled only
    /// when its value is `true` (case-insensitive).
    pub fn from_key_values(kv: &KeyValues) -> Self {
        let toggles = kv
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(TOGGLE_PREFIX)?;
                if name.is_empty() {
                    return None;
                }
                Some(ServiceToggle {
                    name: name.to_ascii_lowercase(),
                    enabled: value.eq_ignore_ascii_case("true"),
                })
            })
            .collect();
        Self { toggles }
    }

    pub fn all(&self) -> &[ServiceToggle] {
        &self.toggles
    }

    /// Names of enabled services, in file order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.toggles
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.name.as_str())
    }
}

/// Ordered compose files to union; later files override earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeFragmentSet {
    files: Vec<String>,
}

impl ComposeFragmentSet {
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn contains(&self, file: &str) -> bool {
        self.files.iter().any(|f| f == file)
    }

}

impl fmt::Display for ComposeFragmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.files.join(" + "))
    }
}
