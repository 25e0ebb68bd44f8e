//! Title bar drag gesture
//!
//! A drag session captures the pointer and window positions at start. Each
//! move offsets the start position by the pointer delta, optionally clamped
//! so that a strip of the window (and with it the title bar) stays inside the
//! container. Release commits the last candidate.

use log::debug;

use super::frame::FrameCoalescer;
use super::PointerButton;
use crate::config::DragConfig;
use crate::window::{Point, Size};

#[derive(Debug, Clone)]
struct DragSession {
    pointer_start: Point,
    position_start: Point,
    container: Option<Size>,
    candidate: Option<Point>,
}

#[derive(Debug, Clone)]
pub struct DragController {
    visible_margin: Size,
    session: Option<DragSession>,
    frames: FrameCoalescer<Point>,
}

impl DragController {
    pub fn new(config: &DragConfig) -> Self {
        Self {
            visible_margin: Size::new(config.visible_margin_x, config.visible_margin_y),
            session: None,
            frames: FrameCoalescer::new(),
        }
    }

    /// Begin a drag. Ignored (returns false) for non-primary buttons or while
    /// a drag is already in progress; true means the drag has started.
    pub fn start(
        &mut self,
        button: PointerButton,
        pointer: Point,
        position: Point,
        container: Option<Size>,
    ) -> bool {
        if !button.is_primary() || self.session.is_some() {
            return false;
        }

        debug!("Drag started at {:?} from window position {:?}", pointer, position);
        self.session = Some(DragSession {
            pointer_start: pointer,
            position_start: position,
            container,
            candidate: None,
        });
        true
    }

    /// Track a pointer move. Returns the new live position.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Point> {
        let session = self.session.as_mut()?;
        let (dx, dy) = pointer.delta_from(session.pointer_start);

        let mut x = session.position_start.x.saturating_add(dx);
        let mut y = session.position_start.y.saturating_add(dy);

        if let Some(container) = session.container {
            let max_x = container.width.saturating_sub(self.visible_margin.width);
            let max_y = container.height.saturating_sub(self.visible_margin.height);
            x = x.min(max_x).max(0);
            y = y.min(max_y).max(0);
        }

        let candidate = Point::new(x, y);
        session.candidate = Some(candidate);
        self.frames.push(candidate);
        Some(candidate)
    }

    /// Live position for this frame, if it changed since the last one
    pub fn take_frame(&mut self) -> Option<Point> {
        self.frames.take_frame()
    }

    /// True while a live position is waiting for the next frame
    pub fn frame_requested(&self) -> bool {
        self.frames.frame_requested()
    }

    /// Finish the drag and return the position to commit
    pub fn end(&mut self) -> Option<Point> {
        let session = self.session.take()?;
        self.frames.cancel();
        let final_position = session.candidate.unwrap_or(session.position_start);
        debug!("Drag ended at {:?}", final_position);
        Some(final_position)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }
}
