//! Scroll offset sampling, coalesced to one recomputation per animation frame.

/// Offset past which the header switches to an opaque background.
pub const HEADER_OPAQUE_THRESHOLD: f64 = 50.0;
/// Offset past which the back-to-top button is shown.
pub const BACK_TO_TOP_THRESHOLD: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollFlags {
    pub is_scrolled: bool,
    pub is_visible: bool,
}

impl ScrollFlags {
    pub fn from_offset(offset: f64) -> Self {
        Self {
            is_scrolled: offset > HEADER_OPAQUE_THRESHOLD,
            is_visible: offset > BACK_TO_TOP_THRESHOLD,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScrollTracker {
    offset: f64,
    flags: ScrollFlags,
    frame_pending: bool,
    detached: bool,
}

impl ScrollTracker {
    /// Start from the offset the page was loaded at.
    pub fn new(initial_offset: f64) -> Self {
        Self {
            offset: initial_offset,
            flags: ScrollFlags::from_offset(initial_offset),
            frame_pending: false,
            detached: false,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn flags(&self) -> ScrollFlags {
        self.flags
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Record a scroll event. Returns `true` when the caller must request an
    /// animation frame; further events before that frame are absorbed.
    pub fn on_scroll(&mut self) -> bool {
        if self.detached || self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Sample the offset inside the requested frame. Returns the new flags
    /// when they differ from the previous ones.
    pub fn on_animation_frame(&mut self, offset: f64) -> Option<ScrollFlags> {
        if self.detached {
            return None;
        }
        self.frame_pending = false;
        self.offset = offset;

        let flags = ScrollFlags::from_offset(offset);
        if flags == self.flags {
            return None;
        }
        self.flags = flags;
        Some(flags)
    }

    pub fn unmount(&mut self) {
        self.detached = true;
        self.frame_pending = false;
    }
}
