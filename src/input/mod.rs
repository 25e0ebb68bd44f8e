//! Pointer gestures and key bindings
//!
//! Pointer input drives the drag and resize controllers; keyboard input is
//! resolved against the configured bindings into [`MdiCommand`]s.

use crate::config::BindingsConfig;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::window::Point;

pub mod drag;
pub mod frame;
pub mod resize;

pub use drag::DragController;
pub use frame::FrameCoalescer;
pub use resize::ResizeController;

/// Pointer buttons, numbered the conventional way (0 = primary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl PointerButton {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => PointerButton::Primary,
            1 => PointerButton::Middle,
            2 => PointerButton::Secondary,
            n => PointerButton::Other(n),
        }
    }

    pub fn is_primary(self) -> bool {
        self == PointerButton::Primary
    }
}

/// A pointer down/move/up sample in container coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Identifies the pointer holding capture during a gesture
    #[serde(default)]
    pub pointer_id: u32,
    #[serde(default)]
    pub button: PointerButton,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            pointer_id: 0,
            button: PointerButton::Primary,
            x,
            y,
        }
    }

    pub fn point(&self) -> Point {
        Point::from_f64(self.x, self.y)
    }
}

/// Window commands reachable from the menu bar or a key binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MdiCommand {
    Cascade,
    Tile,
    ArrangeIcons,
    CloseActive,
    MinimizeActive,
}

/// Key combination → command lookup
#[derive(Debug, Clone, Default)]
pub struct CommandBindings {
    bindings: HashMap<String, MdiCommand>,
}

impl CommandBindings {
    pub fn new(config: &BindingsConfig) -> Self {
        let mut bindings = HashMap::new();
        let entries = [
            (&config.cascade, MdiCommand::Cascade),
            (&config.tile, MdiCommand::Tile),
            (&config.arrange_icons, MdiCommand::ArrangeIcons),
            (&config.close_active, MdiCommand::CloseActive),
            (&config.minimize_active, MdiCommand::MinimizeActive),
        ];
        for (combo, command) in entries {
            if combo.trim().is_empty() {
                continue;
            }
            bindings.insert(normalize_combo(combo), command);
        }

        debug!("Loaded {} key bindings", bindings.len());
        Self { bindings }
    }

    /// Look up a combo such as `"Shift+F5"`; modifier order and case do not matter
    pub fn resolve(&self, combo: &str) -> Option<MdiCommand> {
        let command = self.bindings.get(&normalize_combo(combo)).copied();
        if let Some(command) = command {
            info!("Key {} triggered {:?}", combo, command);
        }
        command
    }

    /// Resolve a key press given separately from its modifiers
    pub fn resolve_key(&self, key: &str, modifiers: &[String]) -> Option<MdiCommand> {
        if modifiers.is_empty() {
            self.resolve(key)
        } else {
            self.resolve(&format!("{}+{}", modifiers.join("+"), key))
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn normalize_combo(combo: &str) -> String {
    let mut parts: Vec<String> = combo
        .split('+')
        .map(|p| p.trim().to_ascii_lowercase())
        .filter(|p| !p.is_empty())
        .collect();
    let key = parts.pop().unwrap_or_default();
    let mut modifiers: Vec<String> = parts
        .into_iter()
        .map(|m| match m.as_str() {
            "control" => "ctrl".to_string(),
            "option" => "alt".to_string(),
            _ => m,
        })
        .collect();
    modifiers.sort();
    modifiers.dedup();
    modifiers.push(key);
    modifiers.join("+")
}
