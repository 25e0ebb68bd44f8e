//! Edge and corner resize gesture
//!
//! East and south handles grow the window from a fixed top-left corner.
//! West and north handles move that corner with the pointer while the
//! opposite edge stays put; at the minimum size the moving edge stops at the
//! floor, so the position only advances as far as the minimum allows.

use log::debug;

use super::frame::FrameCoalescer;
use super::PointerButton;
use crate::config::MIN_SIZE_FLOOR;
use crate::window::{Point, ResizeDirection, Size};

#[derive(Debug, Clone)]
struct ResizeSession {
    direction: ResizeDirection,
    pointer_start: Point,
    size_start: Size,
    position_start: Point,
    container: Option<Size>,
    candidate: Option<(Size, Point)>,
}

#[derive(Debug, Clone)]
pub struct ResizeController {
    min_size: Size,
    session: Option<ResizeSession>,
    frames: FrameCoalescer<(Size, Point)>,
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::new(Size::new(MIN_SIZE_FLOOR.0, MIN_SIZE_FLOOR.1))
    }
}

impl ResizeController {
    /// Create a controller; minimums below 150x100 are raised to that floor
    pub fn new(min_size: Size) -> Self {
        Self {
            min_size: min_size.max(Size::new(MIN_SIZE_FLOOR.0, MIN_SIZE_FLOOR.1)),
            session: None,
            frames: FrameCoalescer::new(),
        }
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    /// Begin a resize from one of the eight handles. Ignored (returns false)
    /// for non-primary buttons or while a resize is already in progress.
    pub fn start(
        &mut self,
        button: PointerButton,
        pointer: Point,
        size: Size,
        position: Point,
        direction: ResizeDirection,
        container: Option<Size>,
    ) -> bool {
        if !button.is_primary() || self.session.is_some() {
            return false;
        }

        debug!(
            "Resize {} started at {:?} from {}x{}",
            direction, pointer, size.width, size.height
        );
        self.session = Some(ResizeSession {
            direction,
            pointer_start: pointer,
            size_start: size,
            position_start: position,
            container,
            candidate: None,
        });
        true
    }

    /// Track a pointer move. Returns the new live size and position.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<(Size, Point)> {
        let min = self.min_size;
        let session = self.session.as_mut()?;
        let (dx, dy) = pointer.delta_from(session.pointer_start);
        let dir = session.direction;

        let mut size = session.size_start;
        let mut position = session.position_start;

        let start = session.size_start;
        if dir.has_east() {
            size.width = start.width.saturating_add(dx).max(min.width);
        } else if dir.has_west() {
            size.width = start.width.saturating_sub(dx).max(min.width);
            position.x = session
                .position_start
                .x
                .saturating_add(start.width.saturating_sub(size.width));
        }

        if dir.has_south() {
            size.height = start.height.saturating_add(dy).max(min.height);
        } else if dir.has_north() {
            size.height = start.height.saturating_sub(dy).max(min.height);
            position.y = session
                .position_start
                .y
                .saturating_add(start.height.saturating_sub(size.height));
        }

        if let Some(container) = session.container {
            let max_width = container.width.saturating_sub(position.x);
            let max_height = container.height.saturating_sub(position.y);
            if size.width > max_width {
                size.width = max_width.max(min.width);
            }
            if size.height > max_height {
                size.height = max_height.max(min.height);
            }
        }

        let candidate = (size, position);
        session.candidate = Some(candidate);
        self.frames.push(candidate);
        Some(candidate)
    }

    /// Live size and position for this frame, if changed since the last one
    pub fn take_frame(&mut self) -> Option<(Size, Point)> {
        self.frames.take_frame()
    }

    /// True while a live size is waiting for the next frame
    pub fn frame_requested(&self) -> bool {
        self.frames.frame_requested()
    }

    /// Finish the resize and return the size and position to commit
    pub fn end(&mut self) -> Option<(Size, Point)> {
        let session = self.session.take()?;
        self.frames.cancel();
        let (size, position) = session
            .candidate
            .unwrap_or((session.size_start, session.position_start));
        debug!(
            "Resize ended at {}x{} ({}, {})",
            size.width, size.height, position.x, position.y
        );
        Some((size, position))
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn direction(&self) -> Option<ResizeDirection> {
        self.session.as_ref().map(|s| s.direction)
    }
}
