//! Error types for the window-management core
//!
//! Core operations never panic: a missing window or a malformed argument is
//! reported as an [`MdiError`] value and callers decide whether to ignore it.
//! I/O and parsing paths use `anyhow` instead.

use crate::window::GroupId;
use thiserror::Error;

/// Failures reported by the registry, gesture routing and desktop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MdiError {
    /// The group has no open registry entry.
    #[error("window for group {0} is not open")]
    NotOpen(GroupId),

    /// No group with this id exists on the desktop.
    #[error("unknown group {0}")]
    UnknownGroup(GroupId),

    /// A resize direction tag outside the eight compass directions.
    #[error("invalid resize direction: {0:?}")]
    InvalidDirection(String),

    /// The window is already being dragged or resized.
    #[error("a gesture is already in progress for group {0}")]
    GestureInProgress(GroupId),
}

pub type MdiResult<T> = std::result::Result<T, MdiError>;
