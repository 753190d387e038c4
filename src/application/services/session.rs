//! Last-started run mode, persisted in the project state directory

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{RunMode, Session};
use crate::infrastructure::traits::FileSystem;

/// Records which mode `run-*` started so later commands know where to look.
pub struct SessionService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl SessionService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Current session, `None` when absent or unreadable.
    pub fn load(&self) -> Option<Session> {
        let path = self.settings.session_file();
        if !self.fs.is_file(&path) {
            return None;
        }
        let parsed = self
            .fs
            .read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str::<Session>(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(session) => {
                debug!("load: session mode={} since {}", session.mode, session.started_at);
                Some(session)
            }
            Err(e) => {
                warn!("ignoring unreadable session file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Record the mode being started.
    pub fn record(&self, mode: RunMode) -> ApplicationResult<Session> {
        let session = Session {
            mode,
            started_at: Utc::now().to_rfc3339(),
            host: Self::get_hostname(),
        };
        self.save(&session)?;
        Ok(session)
    }

    /// Put back a previously loaded session; `None` clears the record.
    pub fn restore(&self, previous: Option<&Session>) -> ApplicationResult<()> {
        match previous {
            Some(session) => self.save(session),
            None => self.clear(),
        }
    }

    fn save(&self, session: &Session) -> ApplicationResult<()> {
        let path = self.settings.session_file();
        let content = toml::to_string(session).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize session".to_string(),
            source: Box::new(e),
        })?;
        self.fs
            .ensure_parent(&path)
            .with_path_context("create state dir", &path)?;
        self.fs
            .write(&path, &content)
            .with_path_context("write session", &path)?;
        debug!("save: mode={} -> {}", session.mode, path.display());
        Ok(())
    }

    /// Forget the session. Absent file is not an error.
    pub fn clear(&self) -> ApplicationResult<()> {
        let path = self.settings.session_file();
        if self.fs.exists(&path) {
            self.fs
                .remove_file(&path)
                .with_path_context("remove session", &path)?;
        }
        Ok(())
    }

    fn get_hostname() -> String {
        hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> SessionService {
        let settings = Settings {
            project_dir: temp.path().to_path_buf(),
            ..Settings::default()
        };
        SessionService::new(Arc::new(RealFileSystem), Arc::new(settings))
    }

    #[test]
    fn given_recorded_mode_when_load_then_returns_it() {
        let temp = TempDir::new().unwrap();
        let svc = service(&temp);

        svc.record(RunMode::External).unwrap();
        let loaded = svc.load().expect("session");

        assert_eq!(loaded.mode, RunMode::External);
        assert!(!loaded.host.is_empty());
        assert!(temp.path().join(".launchpad/session.toml").is_file());
    }

    #[test]
    fn given_garbage_file_when_load_then_none() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".launchpad")).unwrap();
        std::fs::write(temp.path().join(".launchpad/session.toml"), "mode = 42").unwrap();

        assert!(service(&temp).load().is_none());
    }

    #[test]
    fn given_no_session_when_clear_then_ok() {
        let temp = TempDir::new().unwrap();
        let svc = service(&temp);
        svc.clear().unwrap();
        svc.record(RunMode::Local).unwrap();
        svc.clear().unwrap();
        assert!(svc.load().is_none());
    }

    #[test]
    fn given_previous_session_when_restore_then_previous_mode_back() {
        let temp = TempDir::new().unwrap();
        let svc = service(&temp);
        let previous = svc.record(RunMode::External).unwrap();
        svc.record(RunMode::Local).unwrap();

        svc.restore(Some(&previous)).unwrap();

        assert_eq!(svc.load(), Some(previous));
    }

    #[test]
    fn given_no_previous_session_when_restore_then_cleared() {
        let temp = TempDir::new().unwrap();
        let svc = service(&temp);
        svc.record(RunMode::Local).unwrap();

        svc.restore(None).unwrap();

        assert!(svc.load().is_none());
    }
}
