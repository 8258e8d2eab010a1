/// Everything an overlay needs to draw on top of a finished scene frame.
pub struct OverlayTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Color target already holding the scene. Load, don't clear.
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub size: [u32; 2],
}

/// A pass recorded after the scene and submitted with it, such as a HUD.
pub trait OverlayPass {
    fn draw(&mut self, target: OverlayTarget<'_>);
}
