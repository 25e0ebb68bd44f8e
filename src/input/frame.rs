//! Per-frame coalescing of live gesture updates
//!
//! Pointer moves can arrive many times per frame. Only the latest value
//! pending at a frame boundary is handed to the renderer; the rest are
//! dropped from the visual stream. Commits never go through here.

#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    frame_requested: bool,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            frame_requested: false,
        }
    }
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending value and mark a frame as requested
    pub fn push(&mut self, value: T) {
        self.pending = Some(value);
        self.frame_requested = true;
    }

    /// Frame boundary: take the latest pending value, if any
    pub fn take_frame(&mut self) -> Option<T> {
        self.frame_requested = false;
        self.pending.take()
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Drop anything pending; used when the gesture ends
    pub fn cancel(&mut self) {
        self.pending = None;
        self.frame_requested = false;
    }
}
