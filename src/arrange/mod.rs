//! Bulk window layouts: cascade, tile and arrange icons
//!
//! The engine holds only configuration. Each layout takes the relevant group
//! windows in order and returns the updates to apply; callers route them
//! through the normal geometry path so persistence sees them.

use log::debug;

use crate::config::ArrangeConfig;
use crate::window::{GroupId, Rectangle, Size, WindowGeometry, WindowStateUpdate};

/// One computed layout update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub group_id: GroupId,
    pub update: WindowStateUpdate,
}

#[derive(Debug, Clone)]
pub struct ArrangementEngine {
    config: ArrangeConfig,
    min_size: Size,
}

impl ArrangementEngine {
    pub fn new(config: &ArrangeConfig, min_size: Size) -> Self {
        Self {
            config: config.clone(),
            min_size,
        }
    }

    /// Stack every group diagonally at a fixed size, restoring each window
    pub fn cascade<'a, I>(&self, groups: I) -> Vec<Placement>
    where
        I: IntoIterator<Item = (&'a GroupId, &'a WindowGeometry)>,
    {
        let cfg = &self.config;
        let placements: Vec<Placement> = groups
            .into_iter()
            .enumerate()
            .map(|(index, (group_id, _))| {
                let step = cfg.cascade_step.saturating_mul(index as i32);
                let offset = cfg.cascade_offset.saturating_add(step);
                Placement {
                    group_id: group_id.clone(),
                    update: WindowStateUpdate::placed(Rectangle {
                        x: offset,
                        y: offset,
                        width: cfg.cascade_width,
                        height: cfg.cascade_height,
                    }),
                }
            })
            .collect();

        debug!("Cascade placed {} windows", placements.len());
        placements
    }

    /// Partition the container into a near-square grid of visible windows.
    /// Minimized windows are skipped; with none visible nothing changes.
    pub fn tile<'a, I>(&self, groups: I, container: Size) -> Vec<Placement>
    where
        I: IntoIterator<Item = (&'a GroupId, &'a WindowGeometry)>,
    {
        let visible: Vec<&GroupId> = groups
            .into_iter()
            .filter(|(_, geometry)| !geometry.minimized)
            .map(|(group_id, _)| group_id)
            .collect();

        let count = visible.len();
        if count == 0 {
            return Vec::new();
        }

        let columns = (count as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(columns);
        let cell_width = container.width / columns as i32;
        let cell_height = container.height / rows as i32;

        // Cells narrower than the minimum overlap rather than shrink the window
        let width = cell_width.max(self.min_size.width);
        let height = cell_height.max(self.min_size.height);

        let placements: Vec<Placement> = visible
            .into_iter()
            .enumerate()
            .map(|(index, group_id)| {
                let column = (index % columns) as i32;
                let row = (index / columns) as i32;
                Placement {
                    group_id: group_id.clone(),
                    update: WindowStateUpdate::placed(Rectangle {
                        x: column.saturating_mul(cell_width),
                        y: row.saturating_mul(cell_height),
                        width,
                        height,
                    }),
                }
            })
            .collect();

        debug!(
            "Tile placed {} windows in a {}x{} grid of {}x{} cells",
            count, columns, rows, cell_width, cell_height
        );
        placements
    }

    /// Line up minimized windows' icons row by row. Only x/y change.
    pub fn arrange_icons<'a, I>(&self, groups: I) -> Vec<Placement>
    where
        I: IntoIterator<Item = (&'a GroupId, &'a WindowGeometry)>,
    {
        let cfg = &self.config;
        let columns = cfg.icon_columns.max(1);
        let placements: Vec<Placement> = groups
            .into_iter()
            .filter(|(_, geometry)| geometry.minimized)
            .enumerate()
            .map(|(index, (group_id, _))| {
                let column = (index % columns) as i32;
                let row = (index / columns) as i32;
                let x = cfg.icon_origin.saturating_add(column.saturating_mul(cfg.icon_pitch));
                let y = cfg.icon_origin.saturating_add(row.saturating_mul(cfg.icon_pitch));
                Placement {
                    group_id: group_id.clone(),
                    update: WindowStateUpdate {
                        x: Some(x),
                        y: Some(y),
                        ..WindowStateUpdate::default()
                    },
                }
            })
            .collect();

        debug!("Arranged {} icons", placements.len());
        placements
    }
}
