//! Open-window registry
//!
//! Tracks which group windows are open, their stacking order and which one
//! is active. Z-indices come from a single allocator that only ever grows:
//! opening or focusing a window stamps it with the next value, so the entry
//! with the highest z-index is always the one touched last.

use log::debug;
use serde::{Deserialize, Serialize};

use super::GroupId;
use crate::error::{MdiError, MdiResult};

/// What minimizing a window does to its registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinimizePolicy {
    /// Drop the entry; the window reopens on restore (Windows 3.1 skin)
    #[default]
    Remove,
    /// Keep the entry so a taskbar button survives (Windows 95 skin)
    Keep,
}

/// One open window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub group_id: GroupId,
    pub z_index: u64,
}

#[derive(Debug, Clone)]
pub struct WindowRegistry {
    /// Entries in open order
    entries: Vec<RegistryEntry>,

    /// Currently active window
    active: Option<GroupId>,

    /// Next z-index to hand out
    next_z_index: u64,

    minimize_policy: MinimizePolicy,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new(MinimizePolicy::default())
    }
}

impl WindowRegistry {
    pub fn new(minimize_policy: MinimizePolicy) -> Self {
        Self {
            entries: Vec::new(),
            active: None,
            next_z_index: 1,
            minimize_policy,
        }
    }

    pub fn minimize_policy(&self) -> MinimizePolicy {
        self.minimize_policy
    }

    /// Open a window, or focus it if it is already open.
    /// Returns the window's new z-index.
    pub fn open(&mut self, group_id: &GroupId) -> u64 {
        if let Ok(z_index) = self.focus(group_id) {
            return z_index;
        }

        let z_index = self.allocate_z_index();
        self.entries.push(RegistryEntry {
            group_id: group_id.clone(),
            z_index,
        });
        self.active = Some(group_id.clone());
        debug!("Opened window {} at z-index {}", group_id, z_index);
        z_index
    }

    /// Close a window. Returns whether an entry was removed.
    pub fn close(&mut self, group_id: &GroupId) -> bool {
        let Some(index) = self.entries.iter().position(|e| &e.group_id == group_id) else {
            return false;
        };
        self.entries.remove(index);

        if self.active.as_ref() == Some(group_id) {
            self.active = self.topmost().map(|e| e.group_id.clone());
            debug!(
                "Closed active window {}, active is now {:?}",
                group_id,
                self.active.as_ref().map(GroupId::as_str)
            );
        } else {
            debug!("Closed window {}", group_id);
        }
        true
    }

    /// Raise an open window to the top and make it active.
    /// Focusing a window that is not open is a caller bug and reported as such.
    pub fn focus(&mut self, group_id: &GroupId) -> MdiResult<u64> {
        let index = self
            .entries
            .iter()
            .position(|e| &e.group_id == group_id)
            .ok_or_else(|| MdiError::NotOpen(group_id.clone()))?;

        let z_index = self.allocate_z_index();
        self.entries[index].z_index = z_index;
        self.active = Some(group_id.clone());
        debug!("Focused window {} at z-index {}", group_id, z_index);
        Ok(z_index)
    }

    /// Apply the minimize policy to a window that was just minimized.
    /// Returns whether the entry was removed.
    pub fn minimize(&mut self, group_id: &GroupId) -> bool {
        match self.minimize_policy {
            MinimizePolicy::Remove => self.close(group_id),
            MinimizePolicy::Keep => false,
        }
    }

    pub fn z_index_of(&self, group_id: &GroupId) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| &e.group_id == group_id)
            .map(|e| e.z_index)
    }

    pub fn active(&self) -> Option<&GroupId> {
        self.active.as_ref()
    }

    /// Override the active window without touching the stacking order
    pub fn set_active(&mut self, group_id: Option<GroupId>) {
        self.active = group_id;
    }

    pub fn contains(&self, group_id: &GroupId) -> bool {
        self.entries.iter().any(|e| &e.group_id == group_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in open order
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Open windows from bottom to top
    pub fn stacking_order(&self) -> Vec<GroupId> {
        let mut sorted: Vec<&RegistryEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.z_index);
        sorted.into_iter().map(|e| e.group_id.clone()).collect()
    }

    fn topmost(&self) -> Option<&RegistryEntry> {
        self.entries.iter().max_by_key(|e| e.z_index)
    }

    fn allocate_z_index(&mut self) -> u64 {
        let z_index = self.next_z_index;
        self.next_z_index += 1;
        z_index
    }
}
