//! # Progman MDI Core
//!
//! Window management for a retro Program Manager shell: every program group
//! is a child window inside one desktop container, Windows 3.1 / 95 style.
//!
//! ## Architecture
//!
//! - `window`: geometry types, hit testing and the open-window registry
//! - `input`: drag and resize gestures, frame coalescing, key bindings
//! - `arrange`: cascade, tile and arrange-icons layouts
//! - `store`: JSON persistence of groups and their window state
//! - `desktop`: the orchestrator tying the above together
//! - `replay`: feeds recorded input scripts through a desktop
//! - `config`: TOML configuration
//!
//! ## Usage
//!
//! ```rust,no_run
//! use progman::{GroupStore, MdiCommand, MdiDesktop, ProgmanConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ProgmanConfig::default();
//!     let store = GroupStore::load("program-manager-data.json", true)?;
//!     let mut desktop = MdiDesktop::from_store(config, store);
//!     desktop.dispatch(MdiCommand::Cascade);
//!     Ok(())
//! }
//! ```

pub mod arrange;
pub mod config;
pub mod desktop;
pub mod error;
pub mod input;
pub mod replay;
pub mod store;
pub mod window;

// Re-export main types for easy access
pub use arrange::{ArrangementEngine, Placement};
pub use config::ProgmanConfig;
pub use desktop::{DesktopEvent, MdiDesktop, RenderUpdate, WindowView};
pub use error::{MdiError, MdiResult};
pub use input::{MdiCommand, PointerButton, PointerEvent};
pub use store::{GroupStore, ProgramGroup, WindowStateStore};
pub use window::{GroupId, Point, Rectangle, ResizeDirection, Size, WindowGeometry, WindowRegistry};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
