//! Small fullscreen utility kernels that don't belong to the PDE solve
//! proper: scaling a field by a constant (pressure warm-start decay),
//! resampling a field into a newly (re)allocated texture, filling a texture
//! with a solid color, and the checkerboard transparency background (spec
//! §4.1, §4.2, §6).

use bytemuck::{Pod, Zeroable};
use fluid_api::SimError;

use crate::gpu::fullscreen::{draw_fullscreen, draw_fullscreen_clear};
use crate::pipeline::program::{make_sampler, make_uniform_buffer, sampler_entry, texture_entry, uniform_entry, Program};

const CLEAR_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/clear.wgsl"));
const COPY_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/copy.wgsl"));
const COLOR_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/color.wgsl"));
const CHECKERBOARD_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/checkerboard.wgsl"));

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ClearParams {
    value: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ColorParams {
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct CheckerboardParams {
    tile_size: f32,
    aspect_ratio: f32,
    _pad: [f32; 2],
}

pub struct ClearKernel {
    program: Program,
    sampler: wgpu::Sampler,
    uniform: wgpu::Buffer,
}

impl ClearKernel {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, SimError> {
        let entries = [texture_entry(0, true), sampler_entry(1, true), uniform_entry(2, std::mem::size_of::<ClearParams>() as u64)];
        let program = Program::new(device, "clear", CLEAR_WGSL, "fs_main", &entries, format, &[])?;
        let sampler = make_sampler(device, "clear_sampler", wgpu::FilterMode::Linear);
        let uniform = make_uniform_buffer(device, "clear_uniform", std::mem::size_of::<ClearParams>() as u64);
        Ok(Self { program, sampler, uniform })
    }

    pub fn scale(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        src: &wgpu::TextureView,
        target: &wgpu::TextureView,
        value: f32,
    ) {
        let params = ClearParams { value, _pad: [0.0; 3] };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("clear_bg"),
            layout: &self.program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(src) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: self.uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen(encoder, "clear_scale", target, &self.program.pipeline, &bind_group);
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct CopyParams {
    boundary_coefficient: f32,
    _pad: [f32; 3],
}

/// Per-field `BOUNDARY_COEFFICIENT` (spec §4.2 Boundary handling): -1
/// (no-slip) for velocity, +1 (Neumann) for pressure and the scalar fields
/// derived from it (divergence, curl), 0 (absorbing) for dye.
pub const BOUNDARY_VELOCITY: f32 = -1.0;
pub const BOUNDARY_PRESSURE: f32 = 1.0;
pub const BOUNDARY_DYE: f32 = 0.0;

/// Resamples a field into a freshly (re)allocated texture of a different
/// size (spec §4.1 `resize_target`), one render pipeline per distinct
/// target format since a field's format is fixed at resize time. Each
/// pipeline clears its destination to transparent black before drawing, and
/// extrapolates edge texels by the field's `BOUNDARY_COEFFICIENT`.
pub struct CopyKernel {
    velocity_program: Program,
    pressure_program: Program,
    scalar_program: Program,
    dye_program: Program,
    sampler: wgpu::Sampler,
    uniform: wgpu::Buffer,
}

impl CopyKernel {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        velocity_format: wgpu::TextureFormat,
        pressure_format: wgpu::TextureFormat,
        scalar_format: wgpu::TextureFormat,
        color_format: wgpu::TextureFormat,
        linear_filter: bool,
    ) -> Result<Self, SimError> {
        let entries = [texture_entry(0, true), sampler_entry(1, true), uniform_entry(2, std::mem::size_of::<CopyParams>() as u64)];
        let velocity_program = Program::new(device, "copy_velocity", COPY_WGSL, "fs_main", &entries, velocity_format, &[])?;
        let pressure_program = Program::new(device, "copy_pressure", COPY_WGSL, "fs_main", &entries, pressure_format, &[])?;
        let scalar_program = Program::new(device, "copy_scalar", COPY_WGSL, "fs_main", &entries, scalar_format, &[])?;
        let dye_program = Program::new(device, "copy_dye", COPY_WGSL, "fs_main", &entries, color_format, &[])?;
        let filter = if linear_filter { wgpu::FilterMode::Linear } else { wgpu::FilterMode::Nearest };
        let sampler = make_sampler(device, "copy_sampler", filter);
        let uniform = make_uniform_buffer(device, "copy_uniform", std::mem::size_of::<CopyParams>() as u64);
        Ok(Self { velocity_program, pressure_program, scalar_program, dye_program, sampler, uniform })
    }

    pub fn copy_velocity(&self, device: &wgpu::Device, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder, src: &wgpu::TextureView, target: &wgpu::TextureView) {
        self.encode(device, queue, encoder, &self.velocity_program, src, target, BOUNDARY_VELOCITY, "copy_velocity");
    }

    pub fn copy_pressure(&self, device: &wgpu::Device, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder, src: &wgpu::TextureView, target: &wgpu::TextureView) {
        self.encode(device, queue, encoder, &self.pressure_program, src, target, BOUNDARY_PRESSURE, "copy_pressure");
    }

    /// Divergence and curl: scalar fields with the same Neumann-like
    /// boundary treatment as pressure (spec §4.2 groups them together under
    /// "Pressure/divergence approximate Neumann conditions"; curl isn't
    /// named explicitly but is the same kind of derived scalar field).
    pub fn copy_scalar(&self, device: &wgpu::Device, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder, src: &wgpu::TextureView, target: &wgpu::TextureView) {
        self.encode(device, queue, encoder, &self.scalar_program, src, target, BOUNDARY_PRESSURE, "copy_scalar");
    }

    pub fn copy_dye(&self, device: &wgpu::Device, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder, src: &wgpu::TextureView, target: &wgpu::TextureView) {
        self.encode(device, queue, encoder, &self.dye_program, src, target, BOUNDARY_DYE, "copy_dye");
    }

    #[allow(clippy::too_many_arguments)]
    fn encode(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        program: &Program,
        src: &wgpu::TextureView,
        target: &wgpu::TextureView,
        boundary_coefficient: f32,
        label: &str,
    ) {
        let params = CopyParams { boundary_coefficient, _pad: [0.0; 3] };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(src) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: self.uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen_clear(encoder, label, target, wgpu::Color::TRANSPARENT, &program.pipeline, &bind_group);
    }
}

pub struct ColorKernel {
    program: Program,
    uniform: wgpu::Buffer,
}

impl ColorKernel {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, SimError> {
        let entries = [uniform_entry(0, std::mem::size_of::<ColorParams>() as u64)];
        let program = Program::new(device, "color_fill", COLOR_WGSL, "fs_main", &entries, format, &[])?;
        let uniform = make_uniform_buffer(device, "color_fill_uniform", std::mem::size_of::<ColorParams>() as u64);
        Ok(Self { program, uniform })
    }

    pub fn fill(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        color: [f32; 4],
    ) {
        let params = ColorParams { color };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("color_fill_bg"),
            layout: &self.program.bind_group_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: self.uniform.as_entire_binding() }],
        });
        draw_fullscreen_clear(encoder, "color_fill", target, wgpu::Color::BLACK, &self.program.pipeline, &bind_group);
    }
}

pub struct CheckerboardKernel {
    program: Program,
    uniform: wgpu::Buffer,
}

impl CheckerboardKernel {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, SimError> {
        let entries = [uniform_entry(0, std::mem::size_of::<CheckerboardParams>() as u64)];
        let program = Program::new(device, "checkerboard", CHECKERBOARD_WGSL, "fs_main", &entries, format, &[])?;
        let uniform = make_uniform_buffer(device, "checkerboard_uniform", std::mem::size_of::<CheckerboardParams>() as u64);
        Ok(Self { program, uniform })
    }

    pub fn draw(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        aspect_ratio: f32,
    ) {
        let params = CheckerboardParams { tile_size: 0.1, aspect_ratio, _pad: [0.0; 2] };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("checkerboard_bg"),
            layout: &self.program.bind_group_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: self.uniform.as_entire_binding() }],
        });
        draw_fullscreen(encoder, "checkerboard", target, &self.program.pipeline, &bind_group);
    }
}
