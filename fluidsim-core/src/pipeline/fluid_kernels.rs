//! The Eulerian PDE kernels (spec §4.2): advection, divergence, curl,
//! vorticity confinement, pressure Jacobi iteration, and the gradient-
//! subtract projection. Each is a `Program` built once at startup; bind
//! groups are rebuilt every call since the source/target textures rotate
//! through the ping-pong pairs every frame.
//!
//! Advection needs two pipeline instances of the same WGSL source: one
//! targeting the velocity field's format, one targeting the dye/color
//! format, since a wgpu render pipeline's fragment target format is fixed at
//! creation and the two advected fields use different texture formats.

use bytemuck::{Pod, Zeroable};
use fluid_api::SimError;

use crate::gpu::fullscreen::draw_fullscreen;
use crate::pipeline::program::{
    make_sampler, make_uniform_buffer, sampler_entry, texture_entry, uniform_entry, Program,
};

const ADVECTION_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/advection.wgsl"));
const DIVERGENCE_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/divergence.wgsl"));
const CURL_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/curl.wgsl"));
const VORTICITY_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/vorticity.wgsl"));
const PRESSURE_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/pressure.wgsl"));
const GRADIENT_SUBTRACT_WGSL: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/gradient_subtract.wgsl"));

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct AdvectionParams {
    texel_size: [f32; 2],
    dt: f32,
    dissipation: f32,
    dye_texel_size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct TexelParams {
    texel_size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct VorticityParams {
    texel_size: [f32; 2],
    curl_strength: f32,
    dt: f32,
}

pub struct FluidKernels {
    pub advection_velocity: Program,
    pub advection_dye: Program,
    pub divergence: Program,
    pub curl: Program,
    pub vorticity: Program,
    pub pressure: Program,
    pub gradient_subtract: Program,
    pub sampler_linear: wgpu::Sampler,
    pub sampler_nearest: wgpu::Sampler,
    advection_uniform: wgpu::Buffer,
    divergence_uniform: wgpu::Buffer,
    curl_uniform: wgpu::Buffer,
    vorticity_uniform: wgpu::Buffer,
    pressure_uniform: wgpu::Buffer,
    gradient_subtract_uniform: wgpu::Buffer,
    pub manual_filtering: bool,
}

impl FluidKernels {
    pub fn new(
        device: &wgpu::Device,
        scalar_format: wgpu::TextureFormat,
        velocity_format: wgpu::TextureFormat,
        color_format: wgpu::TextureFormat,
        manual_filtering: bool,
    ) -> Result<Self, SimError> {
        let sampler_linear = make_sampler(device, "fluid_sampler_linear", wgpu::FilterMode::Linear);
        let sampler_nearest = make_sampler(device, "fluid_sampler_nearest", wgpu::FilterMode::Nearest);
        let filterable = !manual_filtering;

        let advection_entries = [
            texture_entry(0, filterable),
            sampler_entry(1, filterable),
            texture_entry(2, filterable),
            sampler_entry(3, filterable),
            uniform_entry(4, std::mem::size_of::<AdvectionParams>() as u64),
        ];
        let advection_constants = [("MANUAL_FILTERING", if manual_filtering { 1.0 } else { 0.0 })];
        let advection_velocity = Program::new(
            device,
            "advection_velocity",
            ADVECTION_WGSL,
            "fs_main",
            &advection_entries,
            velocity_format,
            &advection_constants,
        )?;
        let advection_dye = Program::new(
            device,
            "advection_dye",
            ADVECTION_WGSL,
            "fs_main",
            &advection_entries,
            color_format,
            &advection_constants,
        )?;

        let divergence = Program::new(
            device,
            "divergence",
            DIVERGENCE_WGSL,
            "fs_main",
            &[
                texture_entry(0, true),
                sampler_entry(1, true),
                uniform_entry(2, std::mem::size_of::<TexelParams>() as u64),
            ],
            scalar_format,
            &[],
        )?;

        let curl = Program::new(
            device,
            "curl",
            CURL_WGSL,
            "fs_main",
            &[
                texture_entry(0, true),
                sampler_entry(1, true),
                uniform_entry(2, std::mem::size_of::<TexelParams>() as u64),
            ],
            scalar_format,
            &[],
        )?;

        let vorticity = Program::new(
            device,
            "vorticity",
            VORTICITY_WGSL,
            "fs_main",
            &[
                texture_entry(0, true),
                sampler_entry(1, true),
                texture_entry(2, true),
                sampler_entry(3, true),
                uniform_entry(4, std::mem::size_of::<VorticityParams>() as u64),
            ],
            velocity_format,
            &[],
        )?;

        let pressure = Program::new(
            device,
            "pressure",
            PRESSURE_WGSL,
            "fs_main",
            &[
                texture_entry(0, true),
                sampler_entry(1, true),
                texture_entry(2, true),
                sampler_entry(3, true),
                uniform_entry(4, std::mem::size_of::<TexelParams>() as u64),
            ],
            scalar_format,
            &[],
        )?;

        let gradient_subtract = Program::new(
            device,
            "gradient_subtract",
            GRADIENT_SUBTRACT_WGSL,
            "fs_main",
            &[
                texture_entry(0, true),
                sampler_entry(1, true),
                texture_entry(2, true),
                sampler_entry(3, true),
                uniform_entry(4, std::mem::size_of::<TexelParams>() as u64),
            ],
            velocity_format,
            &[],
        )?;

        Ok(Self {
            advection_velocity,
            advection_dye,
            divergence,
            curl,
            vorticity,
            pressure,
            gradient_subtract,
            advection_uniform: make_uniform_buffer(
                device,
                "advection_uniform",
                std::mem::size_of::<AdvectionParams>() as u64,
            ),
            divergence_uniform: make_uniform_buffer(
                device,
                "divergence_uniform",
                std::mem::size_of::<TexelParams>() as u64,
            ),
            curl_uniform: make_uniform_buffer(device, "curl_uniform", std::mem::size_of::<TexelParams>() as u64),
            vorticity_uniform: make_uniform_buffer(
                device,
                "vorticity_uniform",
                std::mem::size_of::<VorticityParams>() as u64,
            ),
            pressure_uniform: make_uniform_buffer(
                device,
                "pressure_uniform",
                std::mem::size_of::<TexelParams>() as u64,
            ),
            gradient_subtract_uniform: make_uniform_buffer(
                device,
                "gradient_subtract_uniform",
                std::mem::size_of::<TexelParams>() as u64,
            ),
            sampler_linear,
            sampler_nearest,
            manual_filtering,
        })
    }

    fn sampler_for(&self) -> &wgpu::Sampler {
        if self.manual_filtering {
            &self.sampler_nearest
        } else {
            &self.sampler_linear
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn advect_velocity(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        velocity_src: &wgpu::TextureView,
        target: &wgpu::TextureView,
        texel_size: [f32; 2],
        dt: f32,
        dissipation: f32,
    ) {
        let params = AdvectionParams {
            texel_size,
            dt,
            dissipation,
            dye_texel_size: texel_size,
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.advection_uniform, 0, bytemuck::bytes_of(&params));
        let sampler = self.sampler_for();
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("advection_velocity_bg"),
            layout: &self.advection_velocity.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(velocity_src) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(velocity_src) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(sampler) },
                wgpu::BindGroupEntry { binding: 4, resource: self.advection_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen(encoder, "advect_velocity", target, &self.advection_velocity.pipeline, &bind_group);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn advect_dye(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        velocity: &wgpu::TextureView,
        dye_src: &wgpu::TextureView,
        target: &wgpu::TextureView,
        velocity_texel_size: [f32; 2],
        dye_texel_size: [f32; 2],
        dt: f32,
        dissipation: f32,
    ) {
        let params = AdvectionParams {
            texel_size: velocity_texel_size,
            dt,
            dissipation,
            dye_texel_size,
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.advection_uniform, 0, bytemuck::bytes_of(&params));
        let sampler = self.sampler_for();
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("advection_dye_bg"),
            layout: &self.advection_dye.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(velocity) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(dye_src) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(sampler) },
                wgpu::BindGroupEntry { binding: 4, resource: self.advection_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen(encoder, "advect_dye", target, &self.advection_dye.pipeline, &bind_group);
    }

    pub fn compute_divergence(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        velocity: &wgpu::TextureView,
        target: &wgpu::TextureView,
        texel_size: [f32; 2],
    ) {
        let params = TexelParams { texel_size, _pad: [0.0; 2] };
        queue.write_buffer(&self.divergence_uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("divergence_bg"),
            layout: &self.divergence.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(velocity) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler_linear) },
                wgpu::BindGroupEntry { binding: 2, resource: self.divergence_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen(encoder, "divergence", target, &self.divergence.pipeline, &bind_group);
    }

    pub fn compute_curl(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        velocity: &wgpu::TextureView,
        target: &wgpu::TextureView,
        texel_size: [f32; 2],
    ) {
        let params = TexelParams { texel_size, _pad: [0.0; 2] };
        queue.write_buffer(&self.curl_uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("curl_bg"),
            layout: &self.curl.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(velocity) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler_linear) },
                wgpu::BindGroupEntry { binding: 2, resource: self.curl_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen(encoder, "curl", target, &self.curl.pipeline, &bind_group);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn apply_vorticity(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        velocity_src: &wgpu::TextureView,
        curl: &wgpu::TextureView,
        target: &wgpu::TextureView,
        texel_size: [f32; 2],
        curl_strength: f32,
        dt: f32,
    ) {
        let params = VorticityParams { texel_size, curl_strength, dt };
        queue.write_buffer(&self.vorticity_uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vorticity_bg"),
            layout: &self.vorticity.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(velocity_src) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler_linear) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(curl) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&self.sampler_linear) },
                wgpu::BindGroupEntry { binding: 4, resource: self.vorticity_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen(encoder, "vorticity", target, &self.vorticity.pipeline, &bind_group);
    }

    pub fn jacobi_step(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        pressure_src: &wgpu::TextureView,
        divergence: &wgpu::TextureView,
        target: &wgpu::TextureView,
        texel_size: [f32; 2],
    ) {
        let params = TexelParams { texel_size, _pad: [0.0; 2] };
        queue.write_buffer(&self.pressure_uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pressure_bg"),
            layout: &self.pressure.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(pressure_src) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler_linear) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(divergence) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&self.sampler_linear) },
                wgpu::BindGroupEntry { binding: 4, resource: self.pressure_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen(encoder, "pressure_jacobi", target, &self.pressure.pipeline, &bind_group);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn subtract_gradient(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        pressure: &wgpu::TextureView,
        velocity_src: &wgpu::TextureView,
        target: &wgpu::TextureView,
        texel_size: [f32; 2],
    ) {
        let params = TexelParams { texel_size, _pad: [0.0; 2] };
        queue.write_buffer(&self.gradient_subtract_uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gradient_subtract_bg"),
            layout: &self.gradient_subtract.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(pressure) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler_linear) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(velocity_src) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&self.sampler_linear) },
                wgpu::BindGroupEntry { binding: 4, resource: self.gradient_subtract_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen(encoder, "gradient_subtract", target, &self.gradient_subtract.pipeline, &bind_group);
    }
}
