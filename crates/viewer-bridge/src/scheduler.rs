//! Cooperative frame scheduling
//!
//! Animations never run on their own: they ask for the next frame and the
//! host drives them by calling `on_frame` once per presented frame.

/// Identity of one animation run.
///
/// Every transition or auto-rotate start takes a fresh id, so a request left
/// over from an earlier run can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// What a pending frame request wants to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTask {
    Transition,
    AutoRotate,
}

/// Pending frame requests, drained once per frame.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Vec<(SessionId, FrameTask)>,
    next_session: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a session id that has never been handed out before.
    pub fn next_session(&mut self) -> SessionId {
        self.next_session += 1;
        SessionId(self.next_session)
    }

    /// Ask for `task` to be stepped on the next frame.
    pub fn request(&mut self, session: SessionId, task: FrameTask) {
        if !self.pending.contains(&(session, task)) {
            self.pending.push((session, task));
        }
    }

    /// Drop every pending request for `task`.
    pub fn cancel(&mut self, task: FrameTask) {
        self.pending.retain(|(_, t)| *t != task);
    }

    /// Take the requests for the current frame, in request order.
    pub fn take_pending(&mut self) -> Vec<(SessionId, FrameTask)> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_pending(&self, task: FrameTask) -> bool {
        self.pending.iter().any(|(_, t)| *t == task)
    }
}
