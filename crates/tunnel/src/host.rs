/// Handle of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Capabilities the embedding host provides to a tunnel.
pub trait Host {
    /// Size of the mounting container in device pixels.
    fn container_size(&self) -> (u32, u32);

    /// Ask for one more frame callback. The host calls [`Tunnel::tick`] when it fires.
    ///
    /// [`Tunnel::tick`]: crate::Tunnel::tick
    fn request_frame(&mut self) -> FrameRequest;

    /// Drop a pending frame callback.
    fn cancel_frame(&mut self, request: FrameRequest);

    /// Start forwarding resize notifications.
    fn subscribe_resize(&mut self);

    /// Stop forwarding resize notifications.
    fn unsubscribe_resize(&mut self);
}

/// Host driven by hand: frames fire only when the caller takes them.
#[derive(Debug, Clone, Default)]
pub struct ManualHost {
    size: (u32, u32),
    pending: Option<FrameRequest>,
    next_request: u64,
    requested: u64,
    cancelled: u64,
    resize_subscribed: bool,
    subscribe_calls: usize,
    unsubscribe_calls: usize,
    spurious_unsubscribes: usize,
}

impl ManualHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    pub fn set_container_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// Fire the pending frame, if any. The caller then runs one tick.
    pub fn take_pending(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    pub fn resize_subscribed(&self) -> bool {
        self.resize_subscribed
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls
    }

    /// Unsubscribe calls made while not subscribed.
    pub fn spurious_unsubscribes(&self) -> usize {
        self.spurious_unsubscribes
    }
}

impl Host for ManualHost {
    fn container_size(&self) -> (u32, u32) {
        self.size
    }

    fn request_frame(&mut self) -> FrameRequest {
        self.next_request += 1;
        self.requested += 1;
        let request = FrameRequest(self.next_request);
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
            self.cancelled += 1;
        }
    }

    fn subscribe_resize(&mut self) {
        self.subscribe_calls += 1;
        self.resize_subscribed = true;
    }

    fn unsubscribe_resize(&mut self) {
        self.unsubscribe_calls += 1;
        if !self.resize_subscribed {
            self.spurious_unsubscribes += 1;
        }
        self.resize_subscribed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_numbered() {
        let mut host = ManualHost::new(10, 10);
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.take_pending(), Some(b));
        assert!(!host.has_pending());
    }

    #[test]
    fn cancel_only_matches_pending() {
        let mut host = ManualHost::new(10, 10);
        let stale = host.request_frame();
        let live = host.request_frame();
        host.cancel_frame(stale);
        assert!(host.has_pending());
        host.cancel_frame(live);
        assert!(!host.has_pending());
        assert_eq!(host.cancelled(), 1);
    }

    #[test]
    fn tracks_spurious_unsubscribe() {
        let mut host = ManualHost::new(10, 10);
        host.unsubscribe_resize();
        assert_eq!(host.spurious_unsubscribes(), 1);
        host.subscribe_resize();
        host.unsubscribe_resize();
        assert_eq!(host.spurious_unsubscribes(), 1);
        assert!(!host.resize_subscribed());
    }
}
