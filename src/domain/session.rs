//! Record of the last started run mode

use serde::{Deserialize, Serialize};

use crate::domain::RunMode;

/// Written after a successful `run-*`, read by commands that act on
/// "whatever is running".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub mode: RunMode,
    /// RFC 3339 timestamp
    pub started_at: String,
    pub host: String,
}

impl Session {
    /// Probe order for commands that must find the active mode.
    ///
    /// The recorded mode comes first; the other mode stays as fallback
    /// in case the record is stale.
    pub fn probe_order(session: Option<&Session>) -> [RunMode; 2] {
        let first = session.map(|s| s.mode).unwrap_or(RunMode::Local);
        [first, first.other()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mode: RunMode) -> Session {
        Session {
            mode,
            started_at: "2024-01-01T00:00:00+00:00".into(),
            host: "box".into(),
        }
    }

    #[test]
    fn given_no_session_when_probe_order_then_local_first() {
        assert_eq!(
            Session::probe_order(None),
            [RunMode::Local, RunMode::External]
        );
    }

    #[test]
    fn given_external_session_when_probe_order_then_external_first() {
        let s = session(RunMode::External);
        assert_eq!(
            Session::probe_order(Some(&s)),
            [RunMode::External, RunMode::Local]
        );
    }

    #[test]
    fn given_session_when_toml_roundtrip_then_mode_is_lowercase() {
        let s = session(RunMode::Local);
        let text = toml::to_string(&s).unwrap();
        assert!(text.contains("mode = \"local\""));
        assert_eq!(toml::from_str::<Session>(&text).unwrap(), s);
    }
}
