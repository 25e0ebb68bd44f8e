//! Configuration management for Progman
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files. It combines settings for window defaults, gesture
//! handling, arrangement algorithms and key bindings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::window::registry::MinimizePolicy;

/// Smallest window size any resize may produce, whatever the config says.
pub const MIN_SIZE_FLOOR: (i32, i32) = (150, 100);

/// Main configuration struct containing all Progman settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProgmanConfig {
    /// Group window defaults and registry behavior
    #[serde(default)]
    pub window: WindowConfig,

    /// Title bar drag settings
    #[serde(default)]
    pub drag: DragConfig,

    /// Cascade / tile / arrange-icons settings
    #[serde(default)]
    pub arrange: ArrangeConfig,

    /// Key bindings for window commands
    #[serde(default)]
    pub bindings: BindingsConfig,

    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Group window configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    /// Minimum window width (pixels)
    pub min_width: i32,

    /// Minimum window height (pixels)
    pub min_height: i32,

    /// Default position of the first group window
    pub default_x: i32,
    pub default_y: i32,

    /// Default size of a new group window
    pub default_width: i32,
    pub default_height: i32,

    /// Diagonal offset applied per existing group when creating a new one
    pub new_group_offset: i32,

    /// Whether minimizing keeps the registry entry ("keep", Windows 95 skin)
    /// or removes it ("remove", Windows 3.1 skin)
    #[serde(default)]
    pub minimize_policy: MinimizePolicy,

    /// Width of the resize border around each window (pixels)
    #[serde(default = "WindowConfig::default_border_width")]
    pub border_width: i32,

    /// Height of the title bar below the top border (pixels)
    #[serde(default = "WindowConfig::default_title_bar_height")]
    pub title_bar_height: i32,
}

/// Drag configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DragConfig {
    /// Horizontal distance kept inside the container while dragging
    pub visible_margin_x: i32,

    /// Vertical distance kept inside the container (keeps the title bar grabbable)
    pub visible_margin_y: i32,
}

/// Arrangement configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArrangeConfig {
    /// Position of the first cascaded window
    pub cascade_offset: i32,

    /// Diagonal step between cascaded windows
    pub cascade_step: i32,

    /// Size given to every cascaded window
    pub cascade_width: i32,
    pub cascade_height: i32,

    /// Number of icon columns before wrapping
    pub icon_columns: usize,

    /// Distance between icon anchors
    pub icon_pitch: i32,

    /// Top-left of the icon grid
    pub icon_origin: i32,
}

/// Key bindings configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BindingsConfig {
    /// Cascade all group windows
    pub cascade: String,

    /// Tile visible group windows
    pub tile: String,

    /// Arrange minimized group icons
    #[serde(default)]
    pub arrange_icons: String,

    /// Close the active group window
    #[serde(default)]
    pub close_active: String,

    /// Minimize the active group window
    #[serde(default)]
    pub minimize_active: String,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Enable debug logging
    pub debug: bool,

    /// Write the group store after every committed change
    pub save_on_commit: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            min_width: MIN_SIZE_FLOOR.0,
            min_height: MIN_SIZE_FLOOR.1,
            default_x: 20,
            default_y: 20,
            default_width: 300,
            default_height: 200,
            new_group_offset: 30,
            minimize_policy: MinimizePolicy::default(),
            border_width: Self::default_border_width(),
            title_bar_height: Self::default_title_bar_height(),
        }
    }
}

impl WindowConfig {
    fn default_border_width() -> i32 {
        4
    }
    fn default_title_bar_height() -> i32 {
        18
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            visible_margin_x: 100,
            visible_margin_y: 30,
        }
    }
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        Self {
            cascade_offset: 20,
            cascade_step: 30,
            cascade_width: 300,
            cascade_height: 200,
            icon_columns: 8,
            icon_pitch: 75,
            icon_origin: 10,
        }
    }
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            cascade: "Shift+F5".to_string(),
            tile: "Shift+F4".to_string(),
            arrange_icons: String::new(),
            close_active: "Ctrl+F4".to_string(),
            minimize_active: String::new(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            debug: false,
            save_on_commit: true,
        }
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.to_string_lossy().starts_with('~') {
        let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
        let rest = path.strip_prefix("~").unwrap_or(path);
        Ok(Path::new(&home).join(rest))
    } else {
        Ok(path.to_path_buf())
    }
}

impl ProgmanConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_home(path)?;

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: ProgmanConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let window = &self.window;
        if window.min_width <= 0 || window.min_height <= 0 {
            anyhow::bail!("Invalid minimum size: both dimensions must be positive");
        }
        if window.default_width < window.min_width || window.default_height < window.min_height {
            anyhow::bail!(
                "Invalid default size {}x{}: below minimum {}x{}",
                window.default_width,
                window.default_height,
                window.min_width,
                window.min_height
            );
        }
        if window.new_group_offset < 0 {
            anyhow::bail!("Invalid new_group_offset: must not be negative");
        }
        if window.border_width < 0 || window.title_bar_height < 0 {
            anyhow::bail!("Invalid window chrome: border and title bar must not be negative");
        }

        if self.drag.visible_margin_x < 0 || self.drag.visible_margin_y < 0 {
            anyhow::bail!("Invalid drag margins: must not be negative");
        }

        let arrange = &self.arrange;
        if arrange.icon_columns == 0 {
            anyhow::bail!("Invalid icon_columns: must be at least 1");
        }
        if arrange.icon_pitch <= 0 {
            anyhow::bail!("Invalid icon_pitch: must be positive");
        }
        if arrange.cascade_width < window.min_width || arrange.cascade_height < window.min_height {
            anyhow::bail!(
                "Invalid cascade size {}x{}: below minimum window size",
                arrange.cascade_width,
                arrange.cascade_height
            );
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Merge a partial configuration into this one
    /// Non-default sections from the partial config override this config
    pub fn merge_partial(mut self, partial: ProgmanConfig) -> Self {
        let default_config = ProgmanConfig::default();

        if partial.window != default_config.window {
            self.window = partial.window;
        }
        if partial.drag != default_config.drag {
            self.drag = partial.drag;
        }
        if partial.arrange != default_config.arrange {
            self.arrange = partial.arrange;
        }
        if partial.bindings != default_config.bindings {
            self.bindings = partial.bindings;
        }
        if partial.general != default_config.general {
            self.general = partial.general;
        }

        self
    }
}
