//! Window-capable backend: created from a window, owns the wgpu `Instance`
//! and presents each frame via a freshly created `Surface`.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use wgpu::SurfaceTargetUnsafe;

use fluid_api::{InputEvent, LandmarkFrame, SimConfig, SimError};

use crate::plugin::FluidPlugin;

/// Backend that owns a `wgpu::Instance` and `FluidPlugin`; presents to a
/// window. Created via `FluidWindowBridge::from_window(window)`; each frame
/// call `render_frame_to_window(raw_window_handle, raw_display_handle, ...)`.
///
/// The surface is recreated every frame rather than held across frames:
/// a `wgpu::Surface` borrows the window for its lifetime, which is awkward
/// to thread through a host's own window abstraction, and recreating it
/// sidesteps platform-specific staleness when the window is dragged or
/// resized mid-frame.
pub struct FluidWindowBridge {
    instance: wgpu::Instance,
    plugin: FluidPlugin,
    swapchain_format: wgpu::TextureFormat,
}

impl FluidWindowBridge {
    /// Creates a window-capable bridge from a window (e.g. winit). The
    /// window is only used here to get raw handles and to create an initial
    /// surface for adapter selection; the host must keep the window alive
    /// and pass its raw handles to `render_frame_to_window` each frame.
    pub fn from_window(
        window: &(impl HasWindowHandle + HasDisplayHandle),
        width: u32,
        height: u32,
        config: SimConfig,
    ) -> Result<Self, SimError> {
        let (raw_window, raw_display) = {
            let wh = window.window_handle().map_err(|e| SimError::UnsupportedGpu(e.to_string()))?;
            let dh = window.display_handle().map_err(|e| SimError::UnsupportedGpu(e.to_string()))?;
            (wh.as_raw(), dh.as_raw())
        };
        pollster::block_on(Self::from_raw_handles_async(raw_window, raw_display, width, height, config))
    }

    async fn from_raw_handles_async(
        raw_window_handle: RawWindowHandle,
        raw_display_handle: RawDisplayHandle,
        width: u32,
        height: u32,
        config: SimConfig,
    ) -> Result<Self, SimError> {
        let instance = wgpu::Instance::default();
        let target = SurfaceTargetUnsafe::RawHandle { raw_window_handle, raw_display_handle };
        let surface = unsafe { instance.create_surface_unsafe(target) }.map_err(|e| SimError::UnsupportedGpu(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| SimError::UnsupportedGpu("no compatible adapter".into()))?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .map_err(|e| SimError::UnsupportedGpu(e.to_string()))?;
        let caps = surface.get_capabilities(&adapter);
        let swapchain_format = caps.formats.first().copied().unwrap_or(wgpu::TextureFormat::Rgba8Unorm);
        drop(surface);

        let plugin = FluidPlugin::new_with_config(device, queue, &adapter, swapchain_format, width, height, config)?;
        Ok(Self { instance, plugin, swapchain_format })
    }

    fn surface_config(&self, width: u32, height: u32) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.swapchain_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    pub fn config_mut(&mut self) -> &mut SimConfig {
        self.plugin.config_mut()
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        self.plugin.handle_event(event);
    }

    pub fn handle_landmarks(&mut self, frame: &LandmarkFrame) {
        self.plugin.handle_landmarks(frame);
    }

    /// Recreates the surface from the window's current raw handles,
    /// configures it for `width`x`height`, runs one simulator frame into the
    /// acquired swapchain texture, and presents.
    pub fn render_frame_to_window(
        &mut self,
        raw_window_handle: RawWindowHandle,
        raw_display_handle: RawDisplayHandle,
        width: u32,
        height: u32,
        dt: f32,
    ) -> Result<(), SimError> {
        let target = SurfaceTargetUnsafe::RawHandle { raw_window_handle, raw_display_handle };
        let surface = unsafe { self.instance.create_surface_unsafe(target) }.map_err(|e| SimError::ResourceAlloc(e.to_string()))?;

        let width = width.max(1);
        let height = height.max(1);
        let config = self.surface_config(width, height);
        surface.configure(self.plugin.device(), &config);

        let frame = match surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Outdated) | Err(wgpu::SurfaceError::Lost) => {
                surface.configure(self.plugin.device(), &config);
                surface.get_current_texture().map_err(|e| SimError::ResourceAlloc(e.to_string()))?
            }
            Err(e) => return Err(SimError::ResourceAlloc(e.to_string())),
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.swapchain_format.add_srgb_suffix()),
            ..Default::default()
        });

        self.plugin.render_frame_to_swapchain(&view, width, height, dt)?;
        frame.present();
        Ok(())
    }
}
