//! Group persistence
//!
//! Program groups and their window geometry live in a JSON document shaped
//! like `{ "groups": [...], ... }`. The window-management core only talks to
//! storage through [`WindowStateStore`]; [`GroupStore`] is the file-backed
//! implementation. Keys the core does not understand (group items, the
//! shell's settings block) are carried through untouched.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MdiError;
use crate::window::{GroupId, WindowGeometry, WindowStateUpdate};

/// Default file name of the group store
pub const STORE_FILE: &str = "program-manager-data.json";

/// A named group of launchable items, shown as one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramGroup {
    pub id: GroupId,
    pub name: String,
    #[serde(default = "ProgramGroup::default_icon")]
    pub icon: String,
    #[serde(default)]
    pub window_state: WindowGeometry,
    /// Launchable items; never interpreted here
    #[serde(default)]
    pub items: Vec<Value>,
}

impl ProgramGroup {
    pub fn new(name: impl Into<String>, window_state: WindowGeometry) -> Self {
        Self {
            id: GroupId::generate(),
            name: name.into(),
            icon: Self::default_icon(),
            window_state,
            items: Vec::new(),
        }
    }

    fn default_icon() -> String {
        "folder".to_string()
    }
}

/// On-disk document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub groups: Vec<ProgramGroup>,

    /// Everything else in the document, preserved on save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persistence collaborator for committed window geometry
#[cfg_attr(test, mockall::automock)]
pub trait WindowStateStore {
    fn group_window_state(&self, group_id: &GroupId) -> Option<WindowGeometry>;

    /// Merge a partial geometry into the stored state of one group
    fn set_group_window_state(&mut self, group_id: &GroupId, update: &WindowStateUpdate) -> Result<()>;

    fn insert_group(&mut self, group: &ProgramGroup) -> Result<()>;

    fn rename_group(&mut self, group_id: &GroupId, name: &str) -> Result<()>;

    fn remove_group(&mut self, group_id: &GroupId) -> Result<()>;
}

/// JSON file backed group store
#[derive(Debug, Clone, Default)]
pub struct GroupStore {
    path: Option<PathBuf>,
    data: StoreData,
    autosave: bool,
}

impl GroupStore {
    /// A store that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_groups(groups: Vec<ProgramGroup>) -> Self {
        Self {
            data: StoreData {
                groups,
                ..StoreData::default()
            },
            ..Self::default()
        }
    }

    /// Load the store from `path`; a missing file yields an empty store
    /// that will be created on first save
    pub fn load<P: AsRef<Path>>(path: P, autosave: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read group store: {}", path.display()))?;
            let data: StoreData = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse group store: {}", path.display()))?;
            info!("Loaded {} groups from {}", data.groups.len(), path.display());
            data
        } else {
            info!("No group store at {}, starting empty", path.display());
            StoreData::default()
        };

        Ok(Self {
            path: Some(path),
            data,
            autosave,
        })
    }

    /// Write the store to its file (no-op for in-memory stores)
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize group store")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write group store: {}", path.display()))?;

        debug!("Saved {} groups to {}", self.data.groups.len(), path.display());
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn groups(&self) -> &[ProgramGroup] {
        &self.data.groups
    }

    pub fn group(&self, group_id: &GroupId) -> Option<&ProgramGroup> {
        self.data.groups.iter().find(|g| &g.id == group_id)
    }

    fn group_mut(&mut self, group_id: &GroupId) -> Result<&mut ProgramGroup> {
        self.data
            .groups
            .iter_mut()
            .find(|g| &g.id == group_id)
            .ok_or_else(|| MdiError::UnknownGroup(group_id.clone()).into())
    }

    fn persist(&self) -> Result<()> {
        if self.autosave {
            self.save()
        } else {
            Ok(())
        }
    }
}

impl WindowStateStore for GroupStore {
    fn group_window_state(&self, group_id: &GroupId) -> Option<WindowGeometry> {
        self.group(group_id).map(|g| g.window_state)
    }

    fn set_group_window_state(&mut self, group_id: &GroupId, update: &WindowStateUpdate) -> Result<()> {
        self.group_mut(group_id)?.window_state.apply(update);
        self.persist()
    }

    fn insert_group(&mut self, group: &ProgramGroup) -> Result<()> {
        match self.data.groups.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group.clone(),
            None => self.data.groups.push(group.clone()),
        }
        self.persist()
    }

    fn rename_group(&mut self, group_id: &GroupId, name: &str) -> Result<()> {
        self.group_mut(group_id)?.name = name.to_string();
        self.persist()
    }

    fn remove_group(&mut self, group_id: &GroupId) -> Result<()> {
        let before = self.data.groups.len();
        self.data.groups.retain(|g| &g.id != group_id);
        if self.data.groups.len() == before {
            return Err(MdiError::UnknownGroup(group_id.clone()).into());
        }
        self.persist()
    }
}
