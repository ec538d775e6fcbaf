//! GPU-resident 2D Eulerian fluid simulator: owns the `wgpu::Device`/`Queue`
//! pair and every simulation resource, and wires the GPU Resource Layer,
//! Shader Pipeline, Simulation Stepper, Post-Effects, Display Compositor,
//! Pointer State, and Input Adapter into one `Simulator` a host drives one
//! frame at a time. No windowing dependency — `fluidsim-bridge` owns the
//! surface/swapchain and forwards events here.

pub mod bloom;
pub mod compositor;
pub mod cpu_ref;
pub mod gpu;
pub mod input_adapter;
pub mod pipeline;
pub mod pointer;
pub mod resources;
pub mod stepper;
pub mod sunrays;

pub use bloom::BloomEffect;
pub use compositor::DisplayCompositor;
pub use fluid_api::{Color, HandLandmarks, InputEvent, KeyCode, LandmarkFrame, PointerId, SimConfig, SimError};
pub use gpu::GpuCaps;
pub use input_adapter::InputAdapter;
pub use pointer::{PointerState, PointerTracker};
pub use resources::SimTextures;
pub use stepper::Stepper;
pub use sunrays::SunraysEffect;

use gpu::target::FboTarget;
use pipeline::{CopyKernel, FluidKernels, SplatKernel};

/// Owns every GPU resource the simulator needs and drives one frame at a
/// time: input → pointer-driven splats → (if not paused) simulation step →
/// post-effects → display composite (spec §5).
pub struct Simulator {
    device: wgpu::Device,
    queue: wgpu::Queue,
    caps: GpuCaps,
    config: SimConfig,
    textures: SimTextures,
    kernels: FluidKernels,
    splat_kernel: SplatKernel,
    copy_kernel: CopyKernel,
    bloom: BloomEffect,
    /// Target `composite_onto` writes the intensity/dither-scaled bloom
    /// result into, separate from `BloomEffect`'s internal mip chain so the
    /// Display Compositor always samples a single, already-finished texture.
    bloom_output: FboTarget,
    sunrays: SunraysEffect,
    compositor: DisplayCompositor,
    stepper: Stepper,
    input_adapter: InputAdapter,
    surface_width: u32,
    surface_height: u32,
}

impl Simulator {
    /// Builds every GPU resource for a surface of the given initial size.
    /// `adapter` is only used transiently to probe texture-format
    /// capabilities; the simulator does not hold onto it afterward.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        adapter: &wgpu::Adapter,
        output_format: wgpu::TextureFormat,
        surface_width: u32,
        surface_height: u32,
        config: SimConfig,
    ) -> Result<Self, SimError> {
        let caps = GpuCaps::probe(adapter)?;
        let precise_pressure_format = Self::precise_pressure_format(&caps);

        let textures = SimTextures::new(
            &device,
            &caps,
            config.sim_resolution,
            config.dye_resolution,
            surface_width,
            surface_height,
            precise_pressure_format,
        );

        let kernels = FluidKernels::new(
            &device,
            caps.scalar_format,
            caps.velocity_format,
            caps.color_format,
            !caps.supports_linear_filter,
        )?;
        let splat_kernel = SplatKernel::new(&device, caps.velocity_format, caps.color_format)?;
        let pressure_format = precise_pressure_format.unwrap_or(caps.scalar_format);
        let copy_kernel = CopyKernel::new(
            &device,
            caps.velocity_format,
            pressure_format,
            caps.scalar_format,
            caps.color_format,
            caps.supports_linear_filter,
        )?;

        let bloom = BloomEffect::new(&device, &queue, caps.color_format, config.bloom_resolution, config.bloom_iterations)?;
        let bloom_side = config.bloom_resolution.max(2);
        let bloom_output = FboTarget::new(&device, bloom_side, bloom_side, caps.color_format, "bloom_output");

        let sunrays = SunraysEffect::new(&device, caps.scalar_format, caps.color_format, config.sunrays_resolution)?;
        let compositor = DisplayCompositor::new(&device, output_format)?;

        let stepper = Stepper::new(&device, pressure_format)?;
        let input_adapter = InputAdapter::new();

        Ok(Self {
            device,
            queue,
            caps,
            config,
            textures,
            kernels,
            splat_kernel,
            copy_kernel,
            bloom,
            bloom_output,
            sunrays,
            compositor,
            stepper,
            input_adapter,
            surface_width,
            surface_height,
        })
    }

    /// Promotes the pressure field to full float when the `precise-pressure`
    /// feature is enabled, matching `caps.scalar_format`'s channel count
    /// (spec §3 Precision Policy).
    fn precise_pressure_format(caps: &GpuCaps) -> Option<wgpu::TextureFormat> {
        if !cfg!(feature = "precise-pressure") {
            return None;
        }
        Some(match caps.scalar_format {
            wgpu::TextureFormat::R16Float => wgpu::TextureFormat::R32Float,
            wgpu::TextureFormat::Rg16Float => wgpu::TextureFormat::Rg32Float,
            _ => wgpu::TextureFormat::Rgba32Float,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SimConfig {
        &mut self.config
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_width, self.surface_height)
    }

    pub fn pointer_count(&self) -> usize {
        self.input_adapter.pointer_count()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Forwards one push-style input event (spec §6) to the Input Adapter.
    pub fn handle_event(&mut self, event: InputEvent) {
        self.input_adapter.handle_event(event, &mut self.config, self.surface_width, self.surface_height);
    }

    /// Forwards one frame of hand-landmark detections (spec §4.7).
    pub fn handle_landmarks(&mut self, frame: &LandmarkFrame) {
        self.input_adapter.handle_landmarks(frame, self.surface_width, self.surface_height);
    }

    /// Reallocates any field whose resolution changed, either because the
    /// surface resized or `config`'s `sim_resolution`/`dye_resolution`
    /// changed since the last frame (spec §6 "changing a resolution
    /// triggers resource reallocation at the next frame start").
    fn ensure_resources(&mut self, surface_width: u32, surface_height: u32) -> Result<(), SimError> {
        self.surface_width = surface_width;
        self.surface_height = surface_height;
        let precise_pressure_format = Self::precise_pressure_format(&self.caps);
        self.textures.ensure_size(
            &self.device,
            &self.queue,
            &self.caps,
            self.config.sim_resolution,
            self.config.dye_resolution,
            surface_width,
            surface_height,
            precise_pressure_format,
            &self.copy_kernel,
        )
    }

    /// Runs one full frame: reallocate resources if the surface or
    /// resolution config changed, apply queued input as splats, advance the
    /// simulation unless paused, run the enabled post-effects, and composite
    /// the result into `output_view` (spec §5).
    pub fn render_frame(
        &mut self,
        output_view: &wgpu::TextureView,
        surface_width: u32,
        surface_height: u32,
        dt: f32,
    ) -> Result<(), SimError> {
        self.ensure_resources(surface_width, surface_height)?;

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("fluid_frame") });
        let aspect_ratio = surface_width.max(1) as f32 / surface_height.max(1) as f32;

        self.input_adapter.update(
            &self.device,
            &self.queue,
            &mut encoder,
            &self.splat_kernel,
            &mut self.textures,
            &self.config,
            aspect_ratio,
            dt,
        );

        if !self.config.paused {
            self.stepper.step(&self.device, &self.queue, &mut encoder, &self.kernels, &mut self.textures, &self.config, dt);
        }

        let bloom_view = if self.config.bloom {
            self.bloom.apply(
                &self.device,
                &self.queue,
                &mut encoder,
                &self.textures.dye.read.view,
                self.config.bloom_threshold,
                self.config.bloom_soft_knee,
            );
            self.bloom.composite_onto(&self.device, &self.queue, &mut encoder, &self.bloom_output.view, self.config.bloom_intensity);
            Some(self.bloom_output.view.clone())
        } else {
            None
        };

        let sunrays_view = if self.config.sunrays {
            Some(
                self.sunrays
                    .apply(&self.device, &self.queue, &mut encoder, &self.textures.dye.read.view, self.config.sunrays_weight)
                    .clone(),
            )
        } else {
            None
        };

        self.compositor.composite(
            &self.device,
            &self.queue,
            &mut encoder,
            output_view,
            &self.textures.dye.read.view,
            bloom_view.as_ref(),
            sunrays_view.as_ref(),
            self.textures.dye_texel_size(),
            self.config.back_color,
            self.config.transparent,
            aspect_ratio,
            self.config.display_keyword_bits(),
        )?;

        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }
}
