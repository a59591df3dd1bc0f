//! Project file import/export and the persistence port
//!
//! The store never touches storage directly: hosts inject a
//! [`PersistencePort`] and drive [`Autosave`] from their own timer. Import
//! validates the raw payload before anything is deserialized, so a rejected
//! file leaves the current state untouched.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::models::Project;
use crate::store::GraphStore;

/// Boundary errors for project persistence
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The payload is not a valid project file
    #[error("invalid project format")]
    InvalidFormat,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Fields a payload must carry to be accepted as a project file
const REQUIRED_FIELDS: [&str; 3] = ["projectId", "poem", "notes"];

/// Parse and validate a project file.
///
/// Rejects with [`ProjectError::InvalidFormat`] unless `projectId`, `poem`
/// and `notes` are all present; every parse failure maps to the same
/// condition so callers surface one "invalid project format" message.
/// Missing special notes are re-seeded after acceptance.
pub fn import_project(json: &str) -> Result<Project, ProjectError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|_| ProjectError::InvalidFormat)?;

    for field in REQUIRED_FIELDS {
        if value.get(field).is_none() {
            log::warn!("import rejected: missing field {:?}", field);
            return Err(ProjectError::InvalidFormat);
        }
    }

    let mut project: Project =
        serde_json::from_value(value).map_err(|_| ProjectError::InvalidFormat)?;
    project.ensure_special_notes();
    Ok(project)
}

/// Serialize a project as pretty-printed JSON
pub fn export_project(project: &Project) -> Result<String, ProjectError> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Storage the host injects; `load`/`save` is the whole contract
pub trait PersistencePort {
    /// Load the stored project, or `None` when nothing was saved yet
    fn load(&self) -> Result<Option<Project>, ProjectError>;

    fn save(&self, project: &Project) -> Result<(), ProjectError>;
}

/// JSON file on disk; the default port for desktop hosts and tests
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PersistencePort for FilePersistence {
    fn load(&self) -> Result<Option<Project>, ProjectError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        import_project(&json).map(Some)
    }

    fn save(&self, project: &Project) -> Result<(), ProjectError> {
        let json = export_project(project)?;
        fs::write(&self.path, json)?;
        log::debug!("saved project {} to {:?}", project.project_id, self.path);
        Ok(())
    }
}

/// Timer-driven reader of the latest committed snapshot.
///
/// Saving is read-only over an `Arc<Project>` snapshot; with the store as
/// the single writer no further locking is needed. A save runs only when
/// the interval elapsed and the revision moved since the last save.
#[derive(Debug)]
pub struct Autosave {
    interval: Duration,
    last_run: Option<Instant>,
    last_saved_revision: Option<u64>,
}

impl Autosave {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            last_saved_revision: None,
        }
    }

    /// Returns true when a save actually happened
    pub fn tick(
        &mut self,
        now: Instant,
        store: &GraphStore,
        port: &dyn PersistencePort,
    ) -> Result<bool, ProjectError> {
        let due = self
            .last_run
            .map_or(true, |t| now.duration_since(t) >= self.interval);
        if !due {
            return Ok(false);
        }
        self.last_run = Some(now);

        if self.last_saved_revision == Some(store.revision()) {
            return Ok(false);
        }
        port.save(&store.snapshot())?;
        self.last_saved_revision = Some(store.revision());
        Ok(true)
    }
}
