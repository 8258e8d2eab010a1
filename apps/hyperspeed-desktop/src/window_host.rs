use std::sync::Arc;

use hyperspeed_tunnel::{FrameRequest, Host};
use winit::window::Window;

/// Host backed by a winit window: frames are redraw requests.
///
/// winit cannot withdraw a redraw request, so a cancelled frame still
/// arrives and the tunnel ignores it once disposed.
pub struct WindowHost {
    window: Arc<Window>,
    next_request: u64,
    resize_subscribed: bool,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_request: 0,
            resize_subscribed: false,
        }
    }

    /// Whether `Resized` events should reach the tunnel.
    pub fn resize_subscribed(&self) -> bool {
        self.resize_subscribed
    }
}

impl Host for WindowHost {
    fn container_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn request_frame(&mut self) -> FrameRequest {
        self.next_request += 1;
        self.window.request_redraw();
        FrameRequest(self.next_request)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        tracing::trace!(request = request.0, "frame cancelled");
    }

    fn subscribe_resize(&mut self) {
        self.resize_subscribed = true;
    }

    fn unsubscribe_resize(&mut self) {
        self.resize_subscribed = false;
    }
}
