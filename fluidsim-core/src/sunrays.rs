//! Sunrays (god-rays) post effect (spec §4.6): thresholds the dye buffer
//! into a silhouette mask, scatters it radially from the viewport center,
//! then softens the result with a couple of blur passes.

use bytemuck::{Pod, Zeroable};
use fluid_api::SimError;

use crate::gpu::fullscreen::draw_fullscreen_clear;
use crate::gpu::target::{FboTarget, PingPongTarget};
use crate::pipeline::program::{make_sampler, make_uniform_buffer, sampler_entry, texture_entry, uniform_entry, Program};

const SUNRAYS_MASK_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/sunrays_mask.wgsl"));
const SUNRAYS_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/sunrays.wgsl"));
const BLUR_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/blur.wgsl"));

const BLUR_ITERATIONS: u32 = 1;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct WeightParams {
    weight: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct BlurParams {
    texel_size: [f32; 2],
    _pad: [f32; 2],
}

pub struct SunraysEffect {
    mask_program: Program,
    sunrays_program: Program,
    blur_program: Program,
    sampler: wgpu::Sampler,
    weight_uniform: wgpu::Buffer,
    blur_uniform: wgpu::Buffer,
    mask_target: FboTarget,
    rays: PingPongTarget,
}

impl SunraysEffect {
    pub fn new(
        device: &wgpu::Device,
        scalar_format: wgpu::TextureFormat,
        color_format: wgpu::TextureFormat,
        resolution: u32,
    ) -> Result<Self, SimError> {
        let mask_entries = [texture_entry(0, true), sampler_entry(1, true)];
        let mask_program = Program::new(device, "sunrays_mask", SUNRAYS_MASK_WGSL, "fs_main", &mask_entries, scalar_format, &[])?;

        let sunrays_entries = [texture_entry(0, true), sampler_entry(1, true), uniform_entry(2, std::mem::size_of::<WeightParams>() as u64)];
        let sunrays_program = Program::new(device, "sunrays", SUNRAYS_WGSL, "fs_main", &sunrays_entries, scalar_format, &[])?;

        let blur_entries = [texture_entry(0, true), sampler_entry(1, true), uniform_entry(2, std::mem::size_of::<BlurParams>() as u64)];
        let blur_program = Program::new(device, "sunrays_blur", BLUR_WGSL, "fs_main", &blur_entries, scalar_format, &[])?;

        let sampler = make_sampler(device, "sunrays_sampler", wgpu::FilterMode::Linear);
        let weight_uniform = make_uniform_buffer(device, "sunrays_weight_uniform", std::mem::size_of::<WeightParams>() as u64);
        let blur_uniform = make_uniform_buffer(device, "sunrays_blur_uniform", std::mem::size_of::<BlurParams>() as u64);

        let mask_target = FboTarget::new(device, resolution, resolution, scalar_format, "sunrays_mask");
        let rays = PingPongTarget::new(device, resolution, resolution, scalar_format, "sunrays_rays");
        let _ = color_format;

        Ok(Self { mask_program, sunrays_program, blur_program, sampler, weight_uniform, blur_uniform, mask_target, rays })
    }

    pub fn apply(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        dye_view: &wgpu::TextureView,
        weight: f32,
    ) -> &wgpu::TextureView {
        let mask_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sunrays_mask_bg"),
            layout: &self.mask_program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(dye_view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
            ],
        });
        draw_fullscreen_clear(encoder, "sunrays_mask", &self.mask_target.view, wgpu::Color::TRANSPARENT, &self.mask_program.pipeline, &mask_bg);

        let weight_params = WeightParams { weight, _pad: [0.0; 3] };
        queue.write_buffer(&self.weight_uniform, 0, bytemuck::bytes_of(&weight_params));
        let rays_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sunrays_bg"),
            layout: &self.sunrays_program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&self.mask_target.view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: self.weight_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen_clear(encoder, "sunrays", &self.rays.write.view, wgpu::Color::TRANSPARENT, &self.sunrays_program.pipeline, &rays_bg);
        self.rays.swap();

        for _ in 0..BLUR_ITERATIONS {
            let blur_params = BlurParams {
                texel_size: [1.0 / self.rays.read.width as f32, 1.0 / self.rays.read.height as f32],
                _pad: [0.0; 2],
            };
            queue.write_buffer(&self.blur_uniform, 0, bytemuck::bytes_of(&blur_params));
            let blur_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("sunrays_blur_bg"),
                layout: &self.blur_program.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&self.rays.read.view) },
                    wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                    wgpu::BindGroupEntry { binding: 2, resource: self.blur_uniform.as_entire_binding() },
                ],
            });
            draw_fullscreen_clear(encoder, "sunrays_blur", &self.rays.write.view, wgpu::Color::TRANSPARENT, &self.blur_program.pipeline, &blur_bg);
            self.rays.swap();
        }

        &self.rays.read.view
    }
}
