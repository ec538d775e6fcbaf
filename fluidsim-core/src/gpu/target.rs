//! Render-target textures. Mirrors the teacher's `FrameResources::ensure_size`
//! resize-on-demand pattern, specialized to the single-texture and
//! ping-pong-pair shapes the fluid fields need (spec §4.1).

/// One GPU texture usable both as a render target and a sampled input, with
/// its view cached (unlike the teacher's `FrameResources`, which re-derives a
/// `TextureView` on every access — here the view is read every Jacobi
/// iteration, so it is created once up front).
pub struct FboTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

impl FboTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view, width, height, format }
    }

    pub fn size_matches(&self, width: u32, height: u32, format: wgpu::TextureFormat) -> bool {
        self.width == width && self.height == height && self.format == format
    }
}

/// Read/write pair for a field advected or projected in place each step
/// (velocity, dye, pressure). `read` holds the current value; a pass renders
/// into `write`, then `swap()` exchanges the two so the freshly written
/// texture becomes the new `read` (spec §4.1 GPU Resource Layer).
pub struct PingPongTarget {
    pub read: FboTarget,
    pub write: FboTarget,
}

impl PingPongTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat, label: &str) -> Self {
        let read = FboTarget::new(device, width, height, format, &format!("{label}_a"));
        let write = FboTarget::new(device, width, height, format, &format!("{label}_b"));
        Self { read, write }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.read, &mut self.write);
    }

    pub fn size_matches(&self, width: u32, height: u32, format: wgpu::TextureFormat) -> bool {
        self.read.size_matches(width, height, format) && self.write.size_matches(width, height, format)
    }
}
