//! Bridge plugin: owns the `fluidsim_core::Simulator` for a given
//! `Device`/`Queue` pair and forwards input into it. No windowing
//! dependency of its own — `window_backend` layers the surface/swapchain
//! on top of this.

use fluid_api::{InputEvent, LandmarkFrame, SimConfig, SimError};
use fluidsim_core::Simulator;

/// Wraps a `Simulator` the way a host without its own windowing story (an
/// embedded viewport, a headless render target) would drive one directly.
pub struct FluidPlugin {
    simulator: Simulator,
}

impl FluidPlugin {
    /// Builds a simulator for a render target of `width`x`height` using the
    /// default `SimConfig`.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, adapter: &wgpu::Adapter, output_format: wgpu::TextureFormat, width: u32, height: u32) -> Result<Self, SimError> {
        Self::new_with_config(device, queue, adapter, output_format, width, height, SimConfig::default())
    }

    pub fn new_with_config(
        device: wgpu::Device,
        queue: wgpu::Queue,
        adapter: &wgpu::Adapter,
        output_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: SimConfig,
    ) -> Result<Self, SimError> {
        let simulator = Simulator::new(device, queue, adapter, output_format, width, height, config)?;
        Ok(Self { simulator })
    }

    pub fn device(&self) -> &wgpu::Device {
        self.simulator.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.simulator.queue()
    }

    pub fn config(&self) -> &SimConfig {
        self.simulator.config()
    }

    pub fn config_mut(&mut self) -> &mut SimConfig {
        self.simulator.config_mut()
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        self.simulator.handle_event(event);
    }

    pub fn handle_landmarks(&mut self, frame: &LandmarkFrame) {
        self.simulator.handle_landmarks(frame);
    }

    /// Runs one frame straight into an already-created render target view,
    /// e.g. an offscreen texture the host owns.
    pub fn render_frame(&mut self, output_view: &wgpu::TextureView, width: u32, height: u32, dt: f32) -> Result<(), SimError> {
        self.simulator.render_frame(output_view, width, height, dt)
    }

    /// Renders into `swapchain_view` and submits — identical to
    /// `render_frame`, named separately so a windowed host's intent reads
    /// clearly at the call site.
    pub fn render_frame_to_swapchain(&mut self, swapchain_view: &wgpu::TextureView, width: u32, height: u32, dt: f32) -> Result<(), SimError> {
        self.simulator.render_frame(swapchain_view, width, height, dt)
    }
}
