//! Bloom post effect (spec §4.5): extracts the bright part of the dye
//! buffer, downsamples it through a mip chain with a cheap blur at each
//! level, then additively upsamples the chain back to the top level and
//! composites it onto the output with a small dither texture to hide
//! banding in the low-intensity glow.

use bytemuck::{Pod, Zeroable};
use fluid_api::SimError;

use crate::gpu::fullscreen::{draw_fullscreen, draw_fullscreen_clear};
use crate::gpu::target::FboTarget;
use crate::pipeline::program::{make_sampler, make_uniform_buffer, sampler_entry, texture_entry, uniform_entry, Program};

const BLOOM_PREFILTER_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/bloom_prefilter.wgsl"));
const BLUR_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/blur.wgsl"));
const BLOOM_FINAL_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/bloom_final.wgsl"));

const DITHER_TILE: u32 = 8;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct PrefilterParams {
    threshold: f32,
    knee: f32,
    _pad: [f32; 2],
    /// `(threshold - knee, 2 * knee, 0.25 / knee, unused)` (spec §4.4).
    curve: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct BlurParams {
    texel_size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct FinalParams {
    intensity: f32,
    dither_scale: [f32; 2],
    _pad: f32,
}

pub struct BloomEffect {
    prefilter: Program,
    blur_down: Program,
    blur_up: Program,
    final_composite: Program,
    sampler: wgpu::Sampler,
    dither_view: wgpu::TextureView,
    prefilter_uniform: wgpu::Buffer,
    blur_uniform: wgpu::Buffer,
    final_uniform: wgpu::Buffer,
    mip_chain: Vec<FboTarget>,
}

impl BloomEffect {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        bloom_resolution: u32,
        iterations: u32,
    ) -> Result<Self, SimError> {
        let single_tex_entries =
            [texture_entry(0, true), sampler_entry(1, true), uniform_entry(2, std::mem::size_of::<PrefilterParams>() as u64)];
        let prefilter = Program::new(device, "bloom_prefilter", BLOOM_PREFILTER_WGSL, "fs_main", &single_tex_entries, color_format, &[])?;

        let blur_entries = [texture_entry(0, true), sampler_entry(1, true), uniform_entry(2, std::mem::size_of::<BlurParams>() as u64)];
        let blur_down = Program::new(device, "bloom_blur_down", BLUR_WGSL, "fs_main", &blur_entries, color_format, &[])?;
        let blur_up = Program::new_with_blend(
            device,
            "bloom_blur_up",
            BLUR_WGSL,
            "fs_main",
            &blur_entries,
            color_format,
            wgpu::BlendState { color: wgpu::BlendComponent { src_factor: wgpu::BlendFactor::One, dst_factor: wgpu::BlendFactor::One, operation: wgpu::BlendOperation::Add }, alpha: wgpu::BlendComponent::REPLACE },
            &[],
        )?;

        let final_entries = [
            texture_entry(0, true),
            sampler_entry(1, true),
            texture_entry(2, true),
            sampler_entry(3, true),
            uniform_entry(4, std::mem::size_of::<FinalParams>() as u64),
        ];
        let final_composite = Program::new(device, "bloom_final", BLOOM_FINAL_WGSL, "fs_main", &final_entries, color_format, &[])?;

        let sampler = make_sampler(device, "bloom_sampler", wgpu::FilterMode::Linear);
        let dither_view = Self::build_dither_texture(device, queue);

        let prefilter_uniform = make_uniform_buffer(device, "bloom_prefilter_uniform", std::mem::size_of::<PrefilterParams>() as u64);
        let blur_uniform = make_uniform_buffer(device, "bloom_blur_uniform", std::mem::size_of::<BlurParams>() as u64);
        let final_uniform = make_uniform_buffer(device, "bloom_final_uniform", std::mem::size_of::<FinalParams>() as u64);

        let mip_chain = Self::build_mip_chain(device, color_format, bloom_resolution, iterations);

        Ok(Self {
            prefilter,
            blur_down,
            blur_up,
            final_composite,
            sampler,
            dither_view,
            prefilter_uniform,
            blur_uniform,
            final_uniform,
            mip_chain,
        })
    }

    /// Halves width/height at each step, stopping once a side would drop
    /// below 2 (the smallest side a box blur can still sample); `iterations`
    /// upper-bounds the chain length but never forces it past that floor.
    fn build_mip_chain(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        base_resolution: u32,
        iterations: u32,
    ) -> Vec<FboTarget> {
        let mut width = base_resolution.max(2);
        let mut height = base_resolution.max(2);
        let mut chain = Vec::new();
        for i in 0..iterations.max(1) {
            chain.push(FboTarget::new(device, width, height, format, &format!("bloom_mip_{i}")));
            let next_width = width / 2;
            let next_height = height / 2;
            if next_width < 2 || next_height < 2 {
                break;
            }
            width = next_width;
            height = next_height;
        }
        chain
    }

    /// Builds an 8x8 ordered-dither (Bayer) tiling texture procedurally
    /// rather than shipping a binary image asset: the original ships a blue
    /// noise PNG, but a Bayer matrix serves the same banding-breakup role
    /// and keeps the crate's assets as plain source.
    fn build_dither_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::TextureView {
        const BAYER_8X8: [[u8; 8]; 8] = [
            [0, 32, 8, 40, 2, 34, 10, 42],
            [48, 16, 56, 24, 50, 18, 58, 26],
            [12, 44, 4, 36, 14, 46, 6, 38],
            [60, 28, 52, 20, 62, 30, 54, 22],
            [3, 35, 11, 43, 1, 33, 9, 41],
            [51, 19, 59, 27, 49, 17, 57, 25],
            [15, 47, 7, 39, 13, 45, 5, 37],
            [63, 31, 55, 23, 61, 29, 53, 21],
        ];
        let mut image = image::GrayImage::new(DITHER_TILE, DITHER_TILE);
        for y in 0..DITHER_TILE {
            for x in 0..DITHER_TILE {
                let v = (BAYER_8X8[y as usize][x as usize] as f32 / 63.0 * 255.0) as u8;
                image.put_pixel(x, y, image::Luma([v]));
            }
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("bloom_dither"),
            size: wgpu::Extent3d { width: DITHER_TILE, height: DITHER_TILE, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo { texture: &texture, mip_level: 0, origin: wgpu::Origin3d::ZERO, aspect: wgpu::TextureAspect::All },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(DITHER_TILE), rows_per_image: Some(DITHER_TILE) },
            wgpu::Extent3d { width: DITHER_TILE, height: DITHER_TILE, depth_or_array_layers: 1 },
        );
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Runs the full bloom chain and returns a view of the level-0 mip
    /// texture holding the final composited glow, ready to sample from the
    /// Display Compositor.
    pub fn apply(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        dye_view: &wgpu::TextureView,
        threshold: f32,
        soft_knee: f32,
    ) -> &wgpu::TextureView {
        let knee = threshold * soft_knee + 0.0001;
        let curve = [threshold - knee, knee * 2.0, 0.25 / knee, 0.0];
        let prefilter_params = PrefilterParams { threshold, knee, _pad: [0.0; 2], curve };
        queue.write_buffer(&self.prefilter_uniform, 0, bytemuck::bytes_of(&prefilter_params));
        let first = &self.mip_chain[0];
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bloom_prefilter_bg"),
            layout: &self.prefilter.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(dye_view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: self.prefilter_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen_clear(encoder, "bloom_prefilter", &first.view, wgpu::Color::TRANSPARENT, &self.prefilter.pipeline, &bind_group);

        for pair in self.mip_chain.windows(2) {
            let (src, dst) = (&pair[0], &pair[1]);
            self.blur_pass(device, queue, encoder, &self.blur_down, src, dst, false);
        }

        for pair in self.mip_chain.windows(2).rev() {
            let (dst, src) = (&pair[0], &pair[1]);
            self.blur_pass(device, queue, encoder, &self.blur_up, src, dst, true);
        }

        &self.mip_chain[0].view
    }

    fn blur_pass(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        program: &Program,
        src: &FboTarget,
        dst: &FboTarget,
        additive: bool,
    ) {
        let params = BlurParams { texel_size: [1.0 / src.width as f32, 1.0 / src.height as f32], _pad: [0.0; 2] };
        queue.write_buffer(&self.blur_uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bloom_blur_bg"),
            layout: &program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&src.view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: self.blur_uniform.as_entire_binding() },
            ],
        });
        if additive {
            draw_fullscreen(encoder, "bloom_blur_up", &dst.view, &program.pipeline, &bind_group);
        } else {
            draw_fullscreen_clear(encoder, "bloom_blur_down", &dst.view, wgpu::Color::TRANSPARENT, &program.pipeline, &bind_group);
        }
    }

    /// Composites the finished bloom mip-0 texture onto `target` (the dye
    /// buffer view at display time is not touched here; the Display
    /// Compositor samples this effect's output separately).
    pub fn composite_onto(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        intensity: f32,
    ) {
        let bloom_view = &self.mip_chain[0].view;
        let dither_scale = [
            self.mip_chain[0].width as f32 / DITHER_TILE as f32,
            self.mip_chain[0].height as f32 / DITHER_TILE as f32,
        ];
        let params = FinalParams { intensity, dither_scale, _pad: 0.0 };
        queue.write_buffer(&self.final_uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bloom_final_bg"),
            layout: &self.final_composite.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(bloom_view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(&self.dither_view) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                wgpu::BindGroupEntry { binding: 4, resource: self.final_uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen_clear(encoder, "bloom_final", target, wgpu::Color::TRANSPARENT, &self.final_composite.pipeline, &bind_group);
    }
}
