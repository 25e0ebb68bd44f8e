//! Recorded input replay
//!
//! A replay script is a JSON array of tagged steps, e.g.
//!
//! ```json
//! [
//!   {"type": "Container", "width": 800, "height": 600},
//!   {"type": "PointerDown", "group": "accessories", "x": 40, "y": 30},
//!   {"type": "PointerMove", "x": 140, "y": 80},
//!   {"type": "Frame"},
//!   {"type": "PointerUp", "x": 140, "y": 80},
//!   {"type": "Key", "combo": "Shift+F4"}
//! ]
//! ```
//!
//! Steps are fed to a desktop in order, the way a UI event loop would.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::desktop::MdiDesktop;
use crate::input::{MdiCommand, PointerEvent};
use crate::store::WindowStateStore;
use crate::window::{GroupId, ResizeDirection, Size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReplayStep {
    /// Press on a group window; the hit region decides what starts
    PointerDown {
        group: GroupId,
        #[serde(flatten)]
        event: PointerEvent,
    },
    /// Start a resize from an explicit handle, bypassing the hit test
    BeginResize {
        group: GroupId,
        direction: ResizeDirection,
        #[serde(flatten)]
        event: PointerEvent,
    },
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    Frame,
    Command {
        command: MdiCommand,
    },
    Key {
        combo: String,
    },
    /// Set the container bounds; omit both fields to clear them
    Container {
        #[serde(default)]
        width: Option<i32>,
        #[serde(default)]
        height: Option<i32>,
    },
}

/// What a replay did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub frames_rendered: usize,
    pub commits: usize,
    pub rejected: usize,
}

pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<ReplayStep>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read replay script: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse replay script: {}", path.display()))
}

/// Feed every step to the desktop. Steps the desktop rejects (unknown
/// group, window busy) are logged and counted, never fatal.
pub fn run<S: WindowStateStore>(desktop: &mut MdiDesktop<S>, steps: &[ReplayStep]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for step in steps {
        summary.steps += 1;
        debug!("Replay step {}: {:?}", summary.steps, step);

        let outcome = match step {
            ReplayStep::PointerDown { group, event } => desktop.pointer_down(group, event).map(|_| ()),
            ReplayStep::BeginResize {
                group,
                direction,
                event,
            } => desktop.begin_resize(group, event, *direction).map(|_| ()),
            ReplayStep::PointerMove(event) => {
                desktop.pointer_move(event);
                Ok(())
            }
            ReplayStep::PointerUp(event) => {
                if desktop.pointer_up(event).is_some() {
                    summary.commits += 1;
                }
                Ok(())
            }
            ReplayStep::Frame => {
                summary.frames_rendered += desktop.on_frame().len();
                Ok(())
            }
            ReplayStep::Command { command } => {
                desktop.dispatch(*command);
                Ok(())
            }
            ReplayStep::Key { combo } => {
                if desktop.handle_key(combo).is_none() {
                    debug!("No binding for {}", combo);
                }
                Ok(())
            }
            ReplayStep::Container { width, height } => {
                let container = match (width, height) {
                    (Some(width), Some(height)) => Some(Size::new(*width, *height)),
                    _ => None,
                };
                desktop.set_container(container);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            warn!("Replay step {} rejected: {}", summary.steps, e);
            summary.rejected += 1;
        }
    }

    info!(
        "▶️ Replayed {} steps: {} commits, {} live frames, {} rejected",
        summary.steps, summary.commits, summary.frames_rendered, summary.rejected
    );
    summary
}
