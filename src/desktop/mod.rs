//! The MDI desktop
//!
//! Owns every program group's geometry, the window registry and the active
//! gestures, and routes pointer, keyboard and command input to them. Live
//! gesture geometry is only rendered; the group state (and the persistence
//! collaborator behind it) changes once, when the gesture is released.

use log::{debug, info, warn};
use std::collections::BTreeMap;

use crate::arrange::{ArrangementEngine, Placement};
use crate::config::ProgmanConfig;
use crate::error::{MdiError, MdiResult};
use crate::input::{CommandBindings, DragController, MdiCommand, PointerEvent, ResizeController};
use crate::store::{GroupStore, ProgramGroup, WindowStateStore};
use crate::window::{
    hit_test, GroupId, HitRegion, Point, Rectangle, ResizeDirection, Size, WindowGeometry,
    WindowRegistry, WindowStateUpdate,
};

/// Desktop events for listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopEvent {
    GroupCreated(GroupId),
    GroupDeleted(GroupId),
    WindowOpened(GroupId),
    WindowClosed(GroupId),
    WindowFocused(GroupId),
    GeometryCommitted {
        group_id: GroupId,
        geometry: WindowGeometry,
    },
}

/// Live geometry of a window mid-gesture, emitted at most once per frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderUpdate {
    pub group_id: GroupId,
    pub rect: Rectangle,
}

/// What the renderer needs to draw one group window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowView {
    pub group_id: GroupId,
    pub name: String,
    pub rect: Rectangle,
    pub z_index: u64,
    pub active: bool,
    pub maximized: bool,
}

#[derive(Debug)]
enum GestureKind {
    Drag(DragController),
    Resize(ResizeController),
}

#[derive(Debug)]
struct ActiveGesture {
    group_id: GroupId,
    kind: GestureKind,
    /// Latest live rectangle, used by the views until the gesture commits
    live: Option<Rectangle>,
}

pub struct MdiDesktop<S: WindowStateStore> {
    config: ProgmanConfig,
    store: S,
    groups: Vec<ProgramGroup>,
    registry: WindowRegistry,
    engine: ArrangementEngine,
    bindings: CommandBindings,
    min_size: Size,
    container: Option<Size>,

    /// Active gestures keyed by the pointer holding capture
    gestures: BTreeMap<u32, ActiveGesture>,

    listeners: Vec<Box<dyn Fn(&DesktopEvent) + Send + Sync>>,
}

impl MdiDesktop<GroupStore> {
    /// Build a desktop over the groups currently held by a file store
    pub fn from_store(config: ProgmanConfig, store: GroupStore) -> Self {
        let groups = store.groups().to_vec();
        Self::new(config, store, groups)
    }
}

impl<S: WindowStateStore> MdiDesktop<S> {
    /// Create a desktop; every group that is not minimized gets a window
    pub fn new(config: ProgmanConfig, store: S, groups: Vec<ProgramGroup>) -> Self {
        let min_size = ResizeController::new(Size::new(
            config.window.min_width,
            config.window.min_height,
        ))
        .min_size();

        let mut registry = WindowRegistry::new(config.window.minimize_policy);
        for group in groups.iter().filter(|g| !g.window_state.minimized) {
            registry.open(&group.id);
        }

        info!(
            "🪟 Desktop ready: {} groups, {} open windows",
            groups.len(),
            registry.len()
        );

        Self {
            engine: ArrangementEngine::new(&config.arrange, min_size),
            bindings: CommandBindings::new(&config.bindings),
            config,
            store,
            groups,
            registry,
            min_size,
            container: None,
            gestures: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &ProgmanConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn groups(&self) -> &[ProgramGroup] {
        &self.groups
    }

    pub fn group(&self, group_id: &GroupId) -> Option<&ProgramGroup> {
        self.groups.iter().find(|g| &g.id == group_id)
    }

    pub fn active_window(&self) -> Option<&GroupId> {
        self.registry.active()
    }

    pub fn container(&self) -> Option<Size> {
        self.container
    }

    /// Update the container bounds. Gestures already running keep the
    /// bounds they captured at start. Bounds without a positive width and
    /// height are treated as unknown.
    pub fn set_container(&mut self, container: Option<Size>) {
        self.container = match container {
            Some(size) if size.width <= 0 || size.height <= 0 => {
                warn!(
                    "Ignoring container bounds {}x{}, treating them as unknown",
                    size.width, size.height
                );
                None
            }
            other => other,
        };
        debug!("Container bounds set to {:?}", self.container);
    }

    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: Fn(&DesktopEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // Group lifecycle

    /// Create a group with the default geometry, shifted diagonally by the
    /// number of groups that already exist, and open its window
    pub fn create_group(&mut self, name: &str) -> GroupId {
        let window = &self.config.window;
        let count = i32::try_from(self.groups.len()).unwrap_or(i32::MAX);
        let offset = window.new_group_offset.saturating_mul(count);
        let geometry = WindowGeometry {
            x: window.default_x.saturating_add(offset),
            y: window.default_y.saturating_add(offset),
            width: window.default_width.max(self.min_size.width),
            height: window.default_height.max(self.min_size.height),
            minimized: false,
            maximized: false,
        };

        let group = ProgramGroup::new(name, geometry);
        let group_id = group.id.clone();
        if let Err(e) = self.store.insert_group(&group) {
            warn!("Failed to persist new group {}: {:#}", group_id, e);
        }
        self.groups.push(group);
        info!("📁 Created group {:?} ({})", name, group_id);
        self.emit(DesktopEvent::GroupCreated(group_id.clone()));

        self.registry.open(&group_id);
        self.emit(DesktopEvent::WindowOpened(group_id.clone()));
        group_id
    }

    /// Delete a group, its window and any gesture in progress on it
    pub fn delete_group(&mut self, group_id: &GroupId) -> MdiResult<()> {
        let index = self.group_index(group_id)?;

        self.discard_gestures(group_id);
        if self.registry.close(group_id) {
            self.emit(DesktopEvent::WindowClosed(group_id.clone()));
        }
        self.groups.remove(index);
        if let Err(e) = self.store.remove_group(group_id) {
            warn!("Failed to persist removal of group {}: {:#}", group_id, e);
        }

        info!("🗑️ Deleted group {}", group_id);
        self.emit(DesktopEvent::GroupDeleted(group_id.clone()));
        Ok(())
    }

    pub fn rename_group(&mut self, group_id: &GroupId, name: &str) -> MdiResult<()> {
        let index = self.group_index(group_id)?;
        self.groups[index].name = name.to_string();
        if let Err(e) = self.store.rename_group(group_id, name) {
            warn!("Failed to persist rename of group {}: {:#}", group_id, e);
        }
        Ok(())
    }

    // Window actions

    /// Open the group's window, or raise it if it is already open
    pub fn open_window(&mut self, group_id: &GroupId) -> MdiResult<u64> {
        self.group_index(group_id)?;
        let was_open = self.registry.contains(group_id);
        let z_index = self.registry.open(group_id);
        self.emit(if was_open {
            DesktopEvent::WindowFocused(group_id.clone())
        } else {
            DesktopEvent::WindowOpened(group_id.clone())
        });
        Ok(z_index)
    }

    /// Raise an open window and make it active
    pub fn focus_window(&mut self, group_id: &GroupId) -> MdiResult<u64> {
        let z_index = self.registry.focus(group_id)?;
        self.emit(DesktopEvent::WindowFocused(group_id.clone()));
        Ok(z_index)
    }

    /// Close a window: the group drops to an icon and leaves the registry
    pub fn close_window(&mut self, group_id: &GroupId) -> MdiResult<()> {
        self.group_index(group_id)?;
        self.discard_gestures(group_id);
        self.commit(group_id, WindowStateUpdate::minimized(true));
        if self.registry.close(group_id) {
            self.emit(DesktopEvent::WindowClosed(group_id.clone()));
        }
        Ok(())
    }

    /// Minimize a window; whether it keeps its registry entry depends on the
    /// configured minimize policy
    pub fn minimize_window(&mut self, group_id: &GroupId) -> MdiResult<()> {
        self.group_index(group_id)?;
        self.discard_gestures(group_id);
        self.commit(group_id, WindowStateUpdate::minimized(true));
        if self.registry.minimize(group_id) {
            self.emit(DesktopEvent::WindowClosed(group_id.clone()));
        }
        Ok(())
    }

    /// Bring a minimized or closed window back and make it active
    pub fn restore_window(&mut self, group_id: &GroupId) -> MdiResult<u64> {
        let index = self.group_index(group_id)?;
        if self.groups[index].window_state.minimized {
            self.commit(group_id, WindowStateUpdate::minimized(false));
        }
        self.open_window(group_id)
    }

    /// Flip the maximized flag. Returns the new value.
    pub fn toggle_maximize(&mut self, group_id: &GroupId) -> MdiResult<bool> {
        let index = self.group_index(group_id)?;
        let maximized = !self.groups[index].window_state.maximized;
        self.commit(group_id, WindowStateUpdate::maximized(maximized));
        if self.registry.contains(group_id) {
            self.focus_window(group_id)?;
        }
        Ok(maximized)
    }

    // Pointer routing

    /// Route a pointer press on a window to the part of the chrome it hit.
    /// Returns the region, or `None` when the point is outside the window.
    pub fn pointer_down(
        &mut self,
        group_id: &GroupId,
        event: &PointerEvent,
    ) -> MdiResult<Option<HitRegion>> {
        let rect = self
            .window_rect(group_id)
            .ok_or_else(|| MdiError::UnknownGroup(group_id.clone()))?;
        if !self.registry.contains(group_id) {
            return Err(MdiError::NotOpen(group_id.clone()));
        }

        let (dx, dy) = event.point().delta_from(rect.position());
        let region = hit_test(
            rect.size(),
            Point::new(dx, dy),
            self.config.window.border_width,
            self.config.window.title_bar_height,
        );

        match region {
            Some(HitRegion::TitleBar) => {
                self.begin_drag(group_id, event)?;
            }
            Some(HitRegion::Edge(direction)) => {
                self.begin_resize(group_id, event, direction)?;
            }
            Some(HitRegion::Content) => {
                if event.button.is_primary() {
                    self.focus_window(group_id)?;
                }
            }
            None => {}
        }
        Ok(region)
    }

    /// Start dragging a window by its title bar. Returns whether a drag
    /// started; maximized and minimized windows do not move.
    pub fn begin_drag(&mut self, group_id: &GroupId, event: &PointerEvent) -> MdiResult<bool> {
        let geometry = self.gesture_target(group_id, event)?;
        if geometry.is_maximized() || geometry.minimized {
            debug!("Ignoring drag on {}: window is not in normal state", group_id);
            return Ok(false);
        }

        let mut drag = DragController::new(&self.config.drag);
        if !drag.start(event.button, event.point(), geometry.position(), self.container) {
            return Ok(false);
        }

        self.gestures.insert(
            event.pointer_id,
            ActiveGesture {
                group_id: group_id.clone(),
                kind: GestureKind::Drag(drag),
                live: None,
            },
        );
        self.focus_window(group_id)?;
        Ok(true)
    }

    /// Start resizing a window from one of its edges or corners
    pub fn begin_resize(
        &mut self,
        group_id: &GroupId,
        event: &PointerEvent,
        direction: ResizeDirection,
    ) -> MdiResult<bool> {
        let geometry = self.gesture_target(group_id, event)?;
        if geometry.is_maximized() || geometry.minimized {
            debug!("Ignoring resize on {}: window is not in normal state", group_id);
            return Ok(false);
        }

        let mut resize = ResizeController::new(self.min_size);
        if !resize.start(
            event.button,
            event.point(),
            geometry.size(),
            geometry.position(),
            direction,
            self.container,
        ) {
            return Ok(false);
        }

        self.gestures.insert(
            event.pointer_id,
            ActiveGesture {
                group_id: group_id.clone(),
                kind: GestureKind::Resize(resize),
                live: None,
            },
        );
        self.focus_window(group_id)?;
        Ok(true)
    }

    /// Feed a pointer move to the gesture captured by this pointer.
    /// Returns false if the pointer holds no gesture.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        let Some(gesture) = self.gestures.get_mut(&event.pointer_id) else {
            return false;
        };
        let Some(index) = self.groups.iter().position(|g| g.id == gesture.group_id) else {
            return false;
        };
        let geometry = self.groups[index].window_state;

        let live = match &mut gesture.kind {
            GestureKind::Drag(drag) => drag
                .pointer_move(event.point())
                .map(|position| Rectangle::from_loc_and_size(position, geometry.size())),
            GestureKind::Resize(resize) => resize
                .pointer_move(event.point())
                .map(|(size, position)| Rectangle::from_loc_and_size(position, size)),
        };
        if live.is_some() {
            gesture.live = live;
        }
        true
    }

    /// Release the pointer: commit the gesture it holds, persisting once.
    /// Returns the group whose geometry was committed.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> Option<GroupId> {
        let gesture = self.gestures.remove(&event.pointer_id)?;
        let update = match gesture.kind {
            GestureKind::Drag(mut drag) => drag.end().map(WindowStateUpdate::position),
            GestureKind::Resize(mut resize) => resize
                .end()
                .map(|(size, position)| WindowStateUpdate::bounds(size, position)),
        }?;

        self.commit(&gesture.group_id, update);
        Some(gesture.group_id)
    }

    /// Frame tick: the live geometry of every gesture that moved since the
    /// previous frame
    pub fn on_frame(&mut self) -> Vec<RenderUpdate> {
        let mut updates = Vec::new();
        for gesture in self.gestures.values_mut() {
            let rect = match &mut gesture.kind {
                GestureKind::Drag(drag) => drag.take_frame().and(gesture.live),
                GestureKind::Resize(resize) => resize.take_frame().and(gesture.live),
            };
            if let Some(rect) = rect {
                updates.push(RenderUpdate {
                    group_id: gesture.group_id.clone(),
                    rect,
                });
            }
        }
        updates
    }

    /// True when some gesture has live geometry waiting for the next
    /// `on_frame`; hosts schedule a frame when this turns true
    pub fn frame_requested(&self) -> bool {
        self.gestures.values().any(|gesture| match &gesture.kind {
            GestureKind::Drag(drag) => drag.frame_requested(),
            GestureKind::Resize(resize) => resize.frame_requested(),
        })
    }

    pub fn has_gesture(&self, group_id: &GroupId) -> bool {
        self.gestures.values().any(|g| &g.group_id == group_id)
    }

    // Commands

    /// Run a window command. Returns whether anything changed.
    pub fn dispatch(&mut self, command: MdiCommand) -> bool {
        info!("Dispatching {:?}", command);
        match command {
            MdiCommand::Cascade => {
                let placements = self
                    .engine
                    .cascade(self.groups.iter().map(|g| (&g.id, &g.window_state)));
                self.apply_layout(placements, true)
            }
            MdiCommand::Tile => {
                let Some(container) = self.container else {
                    warn!("Tile requested without container bounds");
                    return false;
                };
                let placements = self
                    .engine
                    .tile(self.groups.iter().map(|g| (&g.id, &g.window_state)), container);
                self.apply_layout(placements, true)
            }
            MdiCommand::ArrangeIcons => {
                let placements = self
                    .engine
                    .arrange_icons(self.groups.iter().map(|g| (&g.id, &g.window_state)));
                self.apply_layout(placements, false)
            }
            MdiCommand::CloseActive => match self.registry.active().cloned() {
                Some(group_id) => self.close_window(&group_id).is_ok(),
                None => false,
            },
            MdiCommand::MinimizeActive => match self.registry.active().cloned() {
                Some(group_id) => self.minimize_window(&group_id).is_ok(),
                None => false,
            },
        }
    }

    /// Resolve a key combination against the bindings and run its command
    pub fn handle_key(&mut self, combo: &str) -> Option<MdiCommand> {
        let command = self.bindings.resolve(combo)?;
        self.dispatch(command);
        Some(command)
    }

    // Views

    /// Open, non-minimized windows from bottom to top
    pub fn visible_windows(&self) -> Vec<WindowView> {
        let active = self.registry.active();
        self.registry
            .stacking_order()
            .into_iter()
            .filter_map(|group_id| {
                let group = self.group(&group_id)?;
                if group.window_state.minimized {
                    return None;
                }
                Some(WindowView {
                    rect: self.window_rect(&group_id)?,
                    name: group.name.clone(),
                    z_index: self.registry.z_index_of(&group_id)?,
                    active: active == Some(&group_id),
                    maximized: group.window_state.is_maximized(),
                    group_id,
                })
            })
            .collect()
    }

    /// Minimized groups in group order, for the icon strip or taskbar
    pub fn minimized_windows(&self) -> Vec<&ProgramGroup> {
        self.groups
            .iter()
            .filter(|g| g.window_state.minimized)
            .collect()
    }

    /// Rectangle a window is drawn at right now
    pub fn window_rect(&self, group_id: &GroupId) -> Option<Rectangle> {
        let group = self.group(group_id)?;
        if let Some(live) = self
            .gestures
            .values()
            .find(|g| &g.group_id == group_id)
            .and_then(|g| g.live)
        {
            return Some(live);
        }

        match self.container {
            Some(container) if group.window_state.is_maximized() => {
                Some(Rectangle::from_loc_and_size(Point::default(), container))
            }
            _ => Some(group.window_state.rect()),
        }
    }

    // Internals

    fn group_index(&self, group_id: &GroupId) -> MdiResult<usize> {
        self.groups
            .iter()
            .position(|g| &g.id == group_id)
            .ok_or_else(|| MdiError::UnknownGroup(group_id.clone()))
    }

    /// Checks shared by both gesture kinds; returns the starting geometry
    fn gesture_target(&self, group_id: &GroupId, event: &PointerEvent) -> MdiResult<WindowGeometry> {
        let index = self.group_index(group_id)?;
        if !self.registry.contains(group_id) {
            return Err(MdiError::NotOpen(group_id.clone()));
        }
        if self.has_gesture(group_id) {
            return Err(MdiError::GestureInProgress(group_id.clone()));
        }
        if let Some(held) = self.gestures.get(&event.pointer_id) {
            return Err(MdiError::GestureInProgress(held.group_id.clone()));
        }
        Ok(self.groups[index].window_state)
    }

    fn discard_gestures(&mut self, group_id: &GroupId) {
        let before = self.gestures.len();
        self.gestures.retain(|_, g| &g.group_id != group_id);
        if self.gestures.len() != before {
            debug!("Discarded gesture on {}", group_id);
        }
    }

    /// Apply layout placements; layouts that restore windows also open them
    fn apply_layout(&mut self, placements: Vec<Placement>, open_windows: bool) -> bool {
        if placements.is_empty() {
            return false;
        }

        let previously_active = self.registry.active().cloned();
        for placement in &placements {
            self.commit(&placement.group_id, placement.update);
            if open_windows && !self.registry.contains(&placement.group_id) {
                self.registry.open(&placement.group_id);
                self.emit(DesktopEvent::WindowOpened(placement.group_id.clone()));
            }
        }

        if let Some(group_id) = previously_active {
            if self.registry.active() != Some(&group_id) && self.registry.contains(&group_id) {
                let _ = self.focus_window(&group_id);
            }
        }
        true
    }

    /// Apply an update to the in-memory geometry and hand it to the store
    fn commit(&mut self, group_id: &GroupId, update: WindowStateUpdate) {
        let Some(group) = self.groups.iter_mut().find(|g| &g.id == group_id) else {
            return;
        };
        group.window_state.apply(&update);
        let geometry = group.window_state;

        if let Err(e) = self.store.set_group_window_state(group_id, &update) {
            warn!("Failed to persist window state of {}: {:#}", group_id, e);
        }
        self.emit(DesktopEvent::GeometryCommitted {
            group_id: group_id.clone(),
            geometry,
        });
    }

    fn emit(&self, event: DesktopEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests;
