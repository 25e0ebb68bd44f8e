//! Group window geometry
//!
//! Plain value types describing where a group window sits inside the MDI
//! container: positions, sizes, the persisted [`WindowGeometry`] and the
//! partial [`WindowStateUpdate`] used to change it. Also hosts the resize
//! direction tags and the hit test that maps a pointer inside a window to
//! the part of the chrome it landed on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MdiError;

pub mod registry;

pub use registry::{MinimizePolicy, RegistryEntry, WindowRegistry};

/// Identity of a program group (and of its window)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identity for a newly created group
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A point in container coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round fractional pointer coordinates to whole pixels
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }

    /// Component-wise `self - origin`, saturating at the `i32` range
    pub fn delta_from(self, origin: Point) -> (i32, i32) {
        (self.x.saturating_sub(origin.x), self.y.saturating_sub(origin.y))
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum
    pub fn max(self, other: Size) -> Size {
        Size {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// Rectangle for window positioning and sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub fn from_loc_and_size(position: Point, size: Size) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Persisted geometry of one group window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub minimized: bool,
    /// Ignored while `minimized` is set
    pub maximized: bool,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            x: 20,
            y: 20,
            width: 300,
            height: 200,
            minimized: false,
            maximized: false,
        }
    }
}

impl WindowGeometry {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn rect(&self) -> Rectangle {
        Rectangle::from_loc_and_size(self.position(), self.size())
    }

    /// Maximized only counts while the window is not minimized
    pub fn is_maximized(&self) -> bool {
        self.maximized && !self.minimized
    }

    /// Merge a partial update field by field
    pub fn apply(&mut self, update: &WindowStateUpdate) {
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if let Some(width) = update.width {
            self.width = width;
        }
        if let Some(height) = update.height {
            self.height = height;
        }
        if let Some(minimized) = update.minimized {
            self.minimized = minimized;
        }
        if let Some(maximized) = update.maximized {
            self.maximized = maximized;
        }
    }
}

/// Partial geometry; `None` fields leave the stored value alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximized: Option<bool>,
}

impl WindowStateUpdate {
    pub fn position(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    pub fn bounds(size: Size, position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            width: Some(size.width),
            height: Some(size.height),
            ..Self::default()
        }
    }

    /// Full placement that also clears both state flags
    pub fn placed(rect: Rectangle) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            minimized: Some(false),
            maximized: Some(false),
        }
    }

    pub fn minimized(minimized: bool) -> Self {
        Self {
            minimized: Some(minimized),
            ..Self::default()
        }
    }

    pub fn maximized(maximized: bool) -> Self {
        Self {
            maximized: Some(maximized),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Edge or corner handle a resize gesture starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDirection {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeDirection {
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::N,
        ResizeDirection::S,
        ResizeDirection::E,
        ResizeDirection::W,
        ResizeDirection::NE,
        ResizeDirection::NW,
        ResizeDirection::SE,
        ResizeDirection::SW,
    ];

    pub fn has_north(self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    pub fn has_south(self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }

    pub fn has_east(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    pub fn has_west(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::S => "s",
            Self::E => "e",
            Self::W => "w",
            Self::NE => "ne",
            Self::NW => "nw",
            Self::SE => "se",
            Self::SW => "sw",
        }
    }
}

impl FromStr for ResizeDirection {
    type Err = MdiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeDirection::ALL
            .into_iter()
            .find(|dir| dir.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MdiError::InvalidDirection(s.to_string()))
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part of a window's chrome under a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Content,
    TitleBar,
    Edge(ResizeDirection),
}

/// Classify a window-relative point. Returns `None` outside the window.
pub fn hit_test(size: Size, local: Point, border: i32, title_bar_height: i32) -> Option<HitRegion> {
    let (x, y) = (local.x, local.y);
    if x < 0 || y < 0 || x >= size.width || y >= size.height {
        return None;
    }

    let west = x < border;
    let east = x >= size.width.saturating_sub(border);
    let north = y < border;
    let south = y >= size.height.saturating_sub(border);

    let region = match (north, south, west, east) {
        (true, _, true, _) => HitRegion::Edge(ResizeDirection::NW),
        (true, _, _, true) => HitRegion::Edge(ResizeDirection::NE),
        (_, true, true, _) => HitRegion::Edge(ResizeDirection::SW),
        (_, true, _, true) => HitRegion::Edge(ResizeDirection::SE),
        (true, _, _, _) => HitRegion::Edge(ResizeDirection::N),
        (_, true, _, _) => HitRegion::Edge(ResizeDirection::S),
        (_, _, true, _) => HitRegion::Edge(ResizeDirection::W),
        (_, _, _, true) => HitRegion::Edge(ResizeDirection::E),
        _ if y < border.saturating_add(title_bar_height) => HitRegion::TitleBar,
        _ => HitRegion::Content,
    };
    Some(region)
}
