//! Pointer-driven impulse injection (spec §4.4): adds a gaussian splat of
//! velocity or dye color into the base field at the pointer's current
//! position. Aspect-ratio correction is the caller's job (folded into the
//! `radius` it passes in, SPEC_FULL §9 Open Question c) — this kernel has no
//! notion of aspect ratio at all.

use bytemuck::{Pod, Zeroable};
use fluid_api::SimError;

use crate::gpu::fullscreen::draw_fullscreen;
use crate::pipeline::program::{make_sampler, make_uniform_buffer, sampler_entry, texture_entry, uniform_entry, Program};

const SPLAT_WGSL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/splat.wgsl"));

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct SplatParams {
    point: [f32; 2],
    color: [f32; 3],
    radius: f32,
    _pad: [f32; 4],
}

pub struct SplatKernel {
    velocity_program: Program,
    dye_program: Program,
    sampler: wgpu::Sampler,
    uniform: wgpu::Buffer,
}

impl SplatKernel {
    pub fn new(
        device: &wgpu::Device,
        velocity_format: wgpu::TextureFormat,
        color_format: wgpu::TextureFormat,
    ) -> Result<Self, SimError> {
        let entries = [texture_entry(0, true), sampler_entry(1, true), uniform_entry(2, std::mem::size_of::<SplatParams>() as u64)];
        let velocity_program = Program::new(device, "splat_velocity", SPLAT_WGSL, "fs_main", &entries, velocity_format, &[])?;
        let dye_program = Program::new(device, "splat_dye", SPLAT_WGSL, "fs_main", &entries, color_format, &[])?;
        let sampler = make_sampler(device, "splat_sampler", wgpu::FilterMode::Linear);
        let uniform = make_uniform_buffer(device, "splat_uniform", std::mem::size_of::<SplatParams>() as u64);
        Ok(Self { velocity_program, dye_program, sampler, uniform })
    }

    /// Splats a velocity impulse (`color` is `(dx, dy, 0)` scaled by splat
    /// force) into `target`, reading `base` as the pre-splat value.
    #[allow(clippy::too_many_arguments)]
    pub fn splat_velocity(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        base: &wgpu::TextureView,
        target: &wgpu::TextureView,
        point: [f32; 2],
        velocity_delta: [f32; 2],
        radius: f32,
    ) {
        self.encode(
            device,
            queue,
            encoder,
            &self.velocity_program,
            base,
            target,
            point,
            [velocity_delta[0], velocity_delta[1], 0.0],
            radius,
            "splat_velocity",
        );
    }

    /// Splats a dye color into `target`, reading `base` as the pre-splat
    /// value.
    pub fn splat_dye(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        base: &wgpu::TextureView,
        target: &wgpu::TextureView,
        point: [f32; 2],
        color: [f32; 3],
        radius: f32,
    ) {
        self.encode(device, queue, encoder, &self.dye_program, base, target, point, color, radius, "splat_dye");
    }

    #[allow(clippy::too_many_arguments)]
    fn encode(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        program: &Program,
        base: &wgpu::TextureView,
        target: &wgpu::TextureView,
        point: [f32; 2],
        color: [f32; 3],
        radius: f32,
        label: &str,
    ) {
        let params = SplatParams { point, color, radius, _pad: [0.0; 4] };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&params));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(base) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: self.uniform.as_entire_binding() },
            ],
        });
        draw_fullscreen(encoder, label, target, &program.pipeline, &bind_group);
    }
}

/// Corrects a normalized splat radius for the surface aspect ratio
/// (`width/height`), applied once at the call site so the shader itself
/// never re-derives aspect (SPEC_FULL §9 Open Question c): widescreen
/// surfaces widen the Gaussian so it reads as round on screen.
pub fn aspect_corrected_radius(radius: f32, aspect_ratio: f32) -> f32 {
    if aspect_ratio > 1.0 {
        radius * aspect_ratio
    } else {
        radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widescreen_widens_radius() {
        assert!((aspect_corrected_radius(0.25, 1.7778) - 0.25 * 1.7778).abs() < 1e-6);
    }

    #[test]
    fn portrait_leaves_radius_unchanged() {
        assert_eq!(aspect_corrected_radius(0.25, 0.5), 0.25);
    }
}
